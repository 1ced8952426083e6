// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! The orchestrator: turns a physical plan into scheduling decisions,
//! reacts to task-group events, and drives recovery. Owns the only mutex
//! guarding plan + state-manager handle + initial schedule group; the
//! dispatch loop it spawns never takes that mutex.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::collaborators::{BlockManagerMaster, TaskLauncher};
use crate::config::SchedulerConfig;
use crate::error::{Result, SchedulerError};
use crate::event::{DynamicOptimizationEvent, JobEventBus, SchedulerEvent};
use crate::metrics::SchedulerMetricsCollector;
use crate::model::{
    ExecutorId, ExecutorLabel, FailureCause, JobState, PhysicalPlan, StageId, StageState,
    TaskGroupId, TaskGroupState, BYPASS_ATTEMPT_IDX,
};
use crate::pending_queue::PendingTaskGroupQueue;
use crate::policy::{CapacityLabelPolicy, SchedulingPolicy};
use crate::runner::{self, SchedulerRunnerHandle, StageLabelLookup};
use crate::state::JobStateManager;

fn timestamp_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

struct MutableState {
    plan: PhysicalPlan,
    state_manager: Arc<JobStateManager>,
    initial_schedule_group: u32,
    job_id: String,
    submitted_at_millis: u64,
}

/// Holds the scheduler's mutable fields and doubles as the stage-label
/// lookup the dispatch loop consults, so the runner never needs a
/// separate handle into the scheduler's internals.
struct SharedState {
    inner: Mutex<Option<MutableState>>,
}

impl StageLabelLookup for SharedState {
    fn label_for_stage(&self, stage_id: StageId) -> Option<ExecutorLabel> {
        self.inner
            .lock()
            .as_ref()
            .and_then(|s| s.plan.stage(stage_id))
            .and_then(|stage| stage.executor_label)
    }
}

pub struct BatchSingleJobScheduler<L: TaskLauncher + 'static> {
    shared: Arc<SharedState>,
    queue: Arc<PendingTaskGroupQueue>,
    policy: Arc<dyn SchedulingPolicy>,
    block_manager: Arc<dyn BlockManagerMaster>,
    metrics: Arc<dyn SchedulerMetricsCollector>,
    events: Arc<JobEventBus>,
    launcher: Arc<L>,
    executor_pool_changed: Arc<Notify>,
    runner: Mutex<Option<SchedulerRunnerHandle>>,
}

impl<L: TaskLauncher + 'static> BatchSingleJobScheduler<L> {
    pub fn new(
        config: SchedulerConfig,
        block_manager: Arc<dyn BlockManagerMaster>,
        metrics: Arc<dyn SchedulerMetricsCollector>,
        events: Arc<JobEventBus>,
        launcher: Arc<L>,
    ) -> Self {
        Self::with_policy(
            Arc::new(CapacityLabelPolicy::new(config.task_distribution)),
            block_manager,
            metrics,
            events,
            launcher,
        )
    }

    /// As [`Self::new`], but takes an already-built policy directly. Useful
    /// wherever a caller needs a policy other than the one `SchedulerConfig`
    /// would select.
    pub fn with_policy(
        policy: Arc<dyn SchedulingPolicy>,
        block_manager: Arc<dyn BlockManagerMaster>,
        metrics: Arc<dyn SchedulerMetricsCollector>,
        events: Arc<JobEventBus>,
        launcher: Arc<L>,
    ) -> Self {
        Self {
            shared: Arc::new(SharedState {
                inner: Mutex::new(None),
            }),
            queue: Arc::new(PendingTaskGroupQueue::new()),
            policy,
            block_manager,
            metrics,
            events,
            launcher,
            executor_pool_changed: Arc::new(Notify::new()),
            runner: Mutex::new(None),
        }
    }

    fn state_manager(&self) -> Result<Arc<JobStateManager>> {
        self.shared
            .inner
            .lock()
            .as_ref()
            .map(|s| s.state_manager.clone())
            .ok_or_else(|| SchedulerError::Internal("no job scheduled yet".to_owned()))
    }

    fn job_id(&self) -> Result<String> {
        self.shared
            .inner
            .lock()
            .as_ref()
            .map(|s| s.job_id.clone())
            .ok_or_else(|| SchedulerError::Internal("no job scheduled yet".to_owned()))
    }

    fn plan(&self) -> Result<PhysicalPlan> {
        self.shared
            .inner
            .lock()
            .as_ref()
            .map(|s| s.plan.clone())
            .ok_or_else(|| SchedulerError::Internal("no job scheduled yet".to_owned()))
    }

    /// Initializes scheduler state for `plan`, starts the dispatch loop,
    /// and schedules the root stages (the lowest `scheduleGroupIndex`) in
    /// reverse topological order.
    pub async fn schedule_job(&self, plan: PhysicalPlan) -> Result<()> {
        let initial_schedule_group = plan.min_schedule_group_index().unwrap_or(0);
        let state_manager = Arc::new(JobStateManager::new(&plan));
        state_manager.set_job_state(JobState::Executing)?;

        let job_id = plan.plan_id.clone();
        let submitted_at_millis = timestamp_millis();

        {
            let mut guard = self.shared.inner.lock();
            *guard = Some(MutableState {
                plan: plan.clone(),
                state_manager: state_manager.clone(),
                initial_schedule_group,
                job_id: job_id.clone(),
                submitted_at_millis,
            });
        }

        self.queue.on_job_scheduled();
        self.metrics.record_submitted(&job_id, submitted_at_millis);

        let handle = runner::spawn(
            self.queue.clone(),
            self.policy.clone(),
            state_manager,
            self.shared.clone() as Arc<dyn StageLabelLookup>,
            self.launcher.clone(),
            self.executor_pool_changed.clone(),
        );
        *self.runner.lock() = Some(handle);

        let root_stage_ids: Vec<StageId> = plan
            .stages_in_schedule_group(initial_schedule_group)
            .iter()
            .map(|s| s.stage_id)
            .collect();
        for stage_id in plan.reverse_topological(&root_stage_ids) {
            self.schedule_stage(stage_id).await?;
        }
        Ok(())
    }

    /// Stops the dispatch loop and closes the pending queue.
    pub fn shutdown(&self) {
        self.queue.close();
        if let Some(handle) = self.runner.lock().take() {
            handle.shutdown();
        }
    }

    /// Enqueues the eligible task groups of `stage_id`, honoring the
    /// "scheduling a stage" rules: skip COMPLETE/EXECUTING/ON_HOLD task
    /// groups, reset FAILED_RECOVERABLE ones to READY, and fail fast on
    /// FAILED_UNRECOVERABLE.
    async fn schedule_stage(&self, stage_id: StageId) -> Result<()> {
        let (task_groups, plan_id, incoming, outgoing) = {
            let guard = self.shared.inner.lock();
            let state = guard
                .as_ref()
                .ok_or_else(|| SchedulerError::Internal("no job scheduled yet".to_owned()))?;
            let stage = state.plan.stage(stage_id).ok_or_else(|| {
                SchedulerError::Internal(format!("unknown stage {stage_id}"))
            })?;
            (
                stage.task_groups.clone(),
                state.plan.plan_id.clone(),
                state.plan.incoming_edges(stage_id),
                state.plan.outgoing_edges(stage_id),
            )
        };

        let state_manager = self.state_manager()?;
        let stage_state = state_manager.stage_state(stage_id).ok_or_else(|| {
            SchedulerError::Internal(format!("unknown stage {stage_id}"))
        })?;
        let stage_was_failed_recoverable = stage_state == StageState::FailedRecoverable;
        let stage_already_executing = stage_state == StageState::Executing;

        let mut chosen = Vec::new();
        for tg in &task_groups {
            let tg_state = state_manager
                .task_group_state(&tg.task_group_id)
                .unwrap_or(TaskGroupState::Ready);
            match tg_state {
                TaskGroupState::Complete | TaskGroupState::Executing => continue,
                TaskGroupState::Ready => {
                    if stage_was_failed_recoverable {
                        log::debug!(
                            "task group {} is still queued from before stage {stage_id}'s recovery; skipping",
                            tg.task_group_id
                        );
                        continue;
                    }
                    chosen.push(tg.clone());
                }
                TaskGroupState::FailedRecoverable => {
                    state_manager.force_task_group_state(&tg.task_group_id, TaskGroupState::Ready);
                    chosen.push(tg.clone());
                }
                TaskGroupState::OnHold => continue,
                TaskGroupState::FailedUnrecoverable => {
                    return Err(SchedulerError::UnrecoverableFailure {
                        detail: format!(
                            "stage {stage_id} task group {} is unrecoverable",
                            tg.task_group_id
                        ),
                    });
                }
            }
        }

        if !stage_already_executing {
            if stage_was_failed_recoverable {
                state_manager.force_stage_state(stage_id, StageState::Ready);
            }
            state_manager.on_stage_state_changed(stage_id, StageState::Executing)?;
        }
        let attempt_idx = state_manager.attempt_count_for_stage(stage_id);

        for tg in chosen {
            self.queue.enqueue(crate::model::ScheduledTaskGroup {
                plan_id: plan_id.clone(),
                task_group: tg.clone(),
                incoming_stage_edges: incoming.clone(),
                outgoing_stage_edges: outgoing.clone(),
                attempt_idx,
            });
            self.block_manager
                .on_producer_task_group_scheduled(&tg.task_group_id)
                .await;
        }
        Ok(())
    }

    /// The recursive earliest-failed-recoverable-first next-stage
    /// selection algorithm.
    fn select_next_stages_to_schedule(
        &self,
        plan: &PhysicalPlan,
        state_manager: &JobStateManager,
        initial: u32,
        current: u32,
    ) -> Option<Vec<StageId>> {
        if current > initial {
            if let Some(stages) =
                self.select_next_stages_to_schedule(plan, state_manager, initial, current - 1)
            {
                if !stages.is_empty() {
                    return Some(stages);
                }
            }
        }

        let stages_here = plan.stages_in_schedule_group(current);
        let mut failed_recoverable = Vec::new();
        let mut all_complete = true;
        for stage in &stages_here {
            match state_manager.stage_state(stage.stage_id) {
                Some(StageState::FailedRecoverable) => {
                    failed_recoverable.push(stage.stage_id);
                    all_complete = false;
                }
                Some(StageState::Ready) | Some(StageState::Executing) => {
                    all_complete = false;
                }
                Some(StageState::Complete) => {}
                _ => all_complete = false,
            }
        }

        if !all_complete {
            return if failed_recoverable.is_empty() {
                None
            } else {
                Some(plan.reverse_topological(&failed_recoverable))
            };
        }

        let next_stages = plan.stages_in_schedule_group(current + 1);
        if next_stages.is_empty() {
            return None;
        }
        let candidates: Vec<StageId> = next_stages
            .iter()
            .filter(|stage| {
                !matches!(
                    state_manager.stage_state(stage.stage_id),
                    Some(StageState::Executing) | Some(StageState::Complete)
                )
            })
            .map(|stage| stage.stage_id)
            .collect();
        if candidates.is_empty() {
            None
        } else {
            Some(plan.reverse_topological(&candidates))
        }
    }

    async fn schedule_next_stage(&self, from_stage: StageId) -> Result<()> {
        let (plan, state_manager, initial) = {
            let guard = self.shared.inner.lock();
            let state = guard
                .as_ref()
                .ok_or_else(|| SchedulerError::Internal("no job scheduled yet".to_owned()))?;
            (state.plan.clone(), state.state_manager.clone(), state.initial_schedule_group)
        };
        let current_group = plan
            .stage(from_stage)
            .map(|s| s.schedule_group_index)
            .unwrap_or(initial);

        if let Some(stage_ids) =
            self.select_next_stages_to_schedule(&plan, &state_manager, initial, current_group)
        {
            for stage_id in stage_ids {
                self.schedule_stage(stage_id).await?;
            }
        }
        Ok(())
    }

    async fn maybe_complete_job(&self, state_manager: &Arc<JobStateManager>) -> Result<()> {
        if state_manager.check_job_termination() {
            return Ok(());
        }
        let all_complete = state_manager
            .all_stage_ids()
            .into_iter()
            .all(|stage_id| state_manager.is_stage_complete(stage_id));
        if !all_complete {
            return Ok(());
        }

        state_manager.set_job_state(JobState::Complete)?;
        self.queue.close();
        if let Some(handle) = self.runner.lock().take() {
            handle.shutdown();
        }

        let (job_id, submitted_at_millis) = {
            let guard = self.shared.inner.lock();
            let state = guard
                .as_ref()
                .ok_or_else(|| SchedulerError::Internal("no job scheduled yet".to_owned()))?;
            (state.job_id.clone(), state.submitted_at_millis)
        };
        self.metrics
            .record_completed(&job_id, submitted_at_millis, timestamp_millis());
        let _ = self
            .events
            .publish(SchedulerEvent::JobStatusChanged {
                job_id,
                state: JobState::Complete,
            })
            .await;
        Ok(())
    }

    fn stage_ready_for_dynamic_optimization(
        &self,
        state_manager: &JobStateManager,
        stage_id: StageId,
    ) -> bool {
        let task_groups = state_manager.task_groups_of_stage(stage_id);
        !task_groups.is_empty()
            && task_groups.iter().all(|id| {
                matches!(
                    state_manager.task_group_state(id),
                    Some(TaskGroupState::Complete) | Some(TaskGroupState::OnHold)
                )
            })
    }

    /// Ingests an executor's report of a task-group state transition.
    pub async fn on_task_group_state_changed(
        &self,
        executor_id: ExecutorId,
        task_group_id: TaskGroupId,
        new_state: TaskGroupState,
        attempt_idx: u32,
        tasks_on_hold: Option<Vec<crate::model::Task>>,
        failure_cause: Option<FailureCause>,
    ) -> Result<()> {
        let state_manager = self.state_manager()?;
        let stage_id = state_manager.stage_of(&task_group_id).ok_or_else(|| {
            SchedulerError::Internal(format!("unknown task group {task_group_id}"))
        })?;

        if attempt_idx != BYPASS_ATTEMPT_IDX {
            let current_attempt = state_manager.attempt_count_for_stage(stage_id);
            if attempt_idx < current_attempt {
                log::debug!(
                    "dropping late message for stage {stage_id} task group {task_group_id}: attempt {attempt_idx} < current {current_attempt}"
                );
                return Ok(());
            }
            if attempt_idx > current_attempt {
                return Err(SchedulerError::SchedulingFault {
                    detail: format!(
                        "attempt {attempt_idx} for stage {stage_id} exceeds current attempt {current_attempt}"
                    ),
                });
            }
        }

        match new_state {
            TaskGroupState::Complete => {
                let stage_became_complete =
                    state_manager.on_task_group_state_changed(&task_group_id, TaskGroupState::Complete)?;
                self.policy
                    .on_task_group_execution_complete(&executor_id, &task_group_id);
                if stage_became_complete && !state_manager.check_job_termination() {
                    self.schedule_next_stage(stage_id).await?;
                }
                self.maybe_complete_job(&state_manager).await
            }
            TaskGroupState::OnHold => {
                state_manager.on_task_group_state_changed(&task_group_id, TaskGroupState::OnHold)?;
                self.policy
                    .on_task_group_execution_complete(&executor_id, &task_group_id);

                if self.stage_ready_for_dynamic_optimization(&state_manager, stage_id) {
                    let barrier = tasks_on_hold
                        .unwrap_or_default()
                        .into_iter()
                        .find(|t| t.is_barrier());
                    match barrier {
                        Some(barrier) => {
                            let plan = self.plan()?;
                            let task_group = plan
                                .stage(stage_id)
                                .and_then(|stage| {
                                    stage
                                        .task_groups
                                        .iter()
                                        .find(|tg| tg.task_group_id == task_group_id)
                                })
                                .cloned()
                                .ok_or_else(|| {
                                    SchedulerError::Internal(format!(
                                        "unknown task group {task_group_id}"
                                    ))
                                })?;
                            self.events
                                .publish(SchedulerEvent::DynamicOptimization(
                                    DynamicOptimizationEvent {
                                        plan,
                                        barrier_ir_vertex_id: barrier.ir_vertex_id,
                                        executor_id,
                                        task_group,
                                    },
                                ))
                                .await?;
                        }
                        None => log::warn!(
                            "stage {stage_id} is ready for dynamic optimization but no barrier task was reported on hold"
                        ),
                    }
                }
                Ok(())
            }
            TaskGroupState::FailedRecoverable => {
                self.policy
                    .on_task_group_execution_failed(&executor_id, &task_group_id);
                let cause = failure_cause.ok_or_else(|| SchedulerError::UnknownFailureCause {
                    value: "missing".to_owned(),
                })?;
                match cause {
                    FailureCause::InputReadFailure => {
                        self.handle_input_read_failure(&state_manager, stage_id, &task_group_id)
                            .await
                    }
                    FailureCause::OutputWriteFailure => {
                        self.handle_output_write_failure(&state_manager, stage_id, &task_group_id)
                            .await
                    }
                    FailureCause::ContainerFailure => {
                        state_manager.force_task_group_state(&task_group_id, TaskGroupState::FailedRecoverable);
                        Ok(())
                    }
                }
            }
            TaskGroupState::FailedUnrecoverable => {
                self.policy
                    .on_task_group_execution_failed(&executor_id, &task_group_id);
                state_manager.force_task_group_state(&task_group_id, TaskGroupState::FailedUnrecoverable);
                state_manager.force_stage_state(stage_id, StageState::FailedUnrecoverable);
                state_manager.set_job_state(JobState::Failed)?;
                self.queue.close();
                if let Some(handle) = self.runner.lock().take() {
                    handle.shutdown();
                }
                self.metrics.record_failed(&self.job_id()?);
                Err(SchedulerError::UnrecoverableFailure {
                    detail: format!("task group {task_group_id} reported an unrecoverable failure"),
                })
            }
            TaskGroupState::Ready | TaskGroupState::Executing => {
                Err(SchedulerError::IllegalStateTransition {
                    entity: format!("task group {task_group_id}"),
                    from: "notification".to_owned(),
                    to: format!("{new_state:?}"),
                })
            }
        }
    }

    async fn handle_input_read_failure(
        &self,
        state_manager: &Arc<JobStateManager>,
        stage_id: StageId,
        failing_task_group_id: &str,
    ) -> Result<()> {
        {
            let guard = self.shared.inner.lock();
            let state = guard
                .as_ref()
                .ok_or_else(|| SchedulerError::Internal("no job scheduled yet".to_owned()))?;
            self.queue.remove_task_groups_and_descendants(&state.plan, stage_id);
        }

        for task_group_id in state_manager.task_groups_of_stage(stage_id) {
            if state_manager.task_group_state(&task_group_id) != Some(TaskGroupState::Complete) {
                state_manager.force_task_group_state(&task_group_id, TaskGroupState::FailedRecoverable);
                self.block_manager
                    .on_producer_task_group_failed(&task_group_id)
                    .await;
            }
        }
        let _ = failing_task_group_id;

        state_manager.on_stage_state_changed(stage_id, StageState::FailedRecoverable)?;
        self.schedule_next_stage(stage_id).await
    }

    async fn handle_output_write_failure(
        &self,
        state_manager: &Arc<JobStateManager>,
        stage_id: StageId,
        task_group_id: &str,
    ) -> Result<()> {
        state_manager.force_task_group_state(task_group_id, TaskGroupState::FailedRecoverable);
        self.block_manager
            .on_producer_task_group_failed(task_group_id)
            .await;
        // The stage itself stays EXECUTING (only this task group retries),
        // so `select_next_stages_to_schedule`'s stage-level FAILED_RECOVERABLE
        // scan would never find it; re-enqueue this stage's eligible task
        // groups directly instead. `schedule_stage` leaves the attempt
        // counter untouched when the stage is already EXECUTING, so
        // in-flight siblings' eventual reports are not mistaken for late
        // messages.
        self.schedule_stage(stage_id).await
    }

    /// Replaces the active plan atomically. If `task_info` is present (the
    /// `ON_HOLD` barrier task group completing dynamic optimization),
    /// synthesizes its completion.
    pub async fn update_job(
        &self,
        job_id: &str,
        new_plan: PhysicalPlan,
        task_info: Option<(ExecutorId, TaskGroupId)>,
    ) -> Result<()> {
        {
            let mut guard = self.shared.inner.lock();
            let state = guard
                .as_mut()
                .ok_or_else(|| SchedulerError::Internal("no job scheduled yet".to_owned()))?;
            if state.job_id != job_id {
                return Err(SchedulerError::Internal(format!(
                    "update_job for unknown job {job_id}"
                )));
            }
            state.plan = new_plan;
        }

        if let Some((executor_id, task_group_id)) = task_info {
            let state_manager = self.state_manager()?;
            let stage_id = state_manager.stage_of(&task_group_id).ok_or_else(|| {
                SchedulerError::Internal(format!("unknown task group {task_group_id}"))
            })?;
            let stage_became_complete =
                state_manager.on_task_group_state_changed(&task_group_id, TaskGroupState::Complete)?;
            self.policy
                .on_task_group_execution_complete(&executor_id, &task_group_id);
            if stage_became_complete && !state_manager.check_job_termination() {
                self.schedule_next_stage(stage_id).await?;
            }
            self.maybe_complete_job(&state_manager).await?;
        }
        Ok(())
    }

    pub fn on_executor_added(&self, executor_id: ExecutorId, capacity: u32, label: ExecutorLabel) {
        self.policy.on_executor_added(executor_id, capacity, label);
        self.executor_pool_changed.notify_waiters();
    }

    /// Evicts an executor and re-injects every task group it affected as
    /// `FAILED_RECOVERABLE` with cause `CONTAINER_FAILURE`, bypassing the
    /// late-message guard, then selects a next stage to schedule starting
    /// from any one of the impacted task groups.
    pub async fn on_executor_removed(&self, executor_id: ExecutorId) -> Result<()> {
        let lost_running = self.policy.on_executor_removed(&executor_id);
        let lost_blocks = self.block_manager.remove_worker(&executor_id).await;
        self.executor_pool_changed.notify_waiters();

        let mut impacted: HashSet<TaskGroupId> = lost_running;
        impacted.extend(lost_blocks);

        if impacted.is_empty() {
            return Ok(());
        }

        let state_manager = self.state_manager()?;
        let mut any_stage = None;
        for task_group_id in &impacted {
            if let Some(stage_id) = state_manager.stage_of(task_group_id) {
                any_stage.get_or_insert(stage_id);
            }
            self.on_task_group_state_changed(
                executor_id.clone(),
                task_group_id.clone(),
                TaskGroupState::FailedRecoverable,
                BYPASS_ATTEMPT_IDX,
                None,
                Some(FailureCause::ContainerFailure),
            )
            .await?;
        }

        if let Some(stage_id) = any_stage {
            // As with OUTPUT_WRITE_FAILURE, the evicted task groups' owning
            // stage is still EXECUTING; re-enqueue its FAILED_RECOVERABLE
            // task groups directly rather than through the stage-level
            // selection scan.
            self.schedule_stage(stage_id).await?;
        }
        Ok(())
    }

    pub fn queue(&self) -> Arc<PendingTaskGroupQueue> {
        self.queue.clone()
    }

    pub fn events(&self) -> Arc<JobEventBus> {
        self.events.clone()
    }

    /// Query operations mirroring `JobStateManager`'s own state accessors,
    /// exposed here since the state manager itself isn't public API.
    pub fn job_state(&self) -> Result<JobState> {
        Ok(self.state_manager()?.job_state())
    }

    pub fn stage_state(&self, stage_id: StageId) -> Result<Option<StageState>> {
        Ok(self.state_manager()?.stage_state(stage_id))
    }

    pub fn task_group_state(&self, task_group_id: &str) -> Result<Option<TaskGroupState>> {
        Ok(self.state_manager()?.task_group_state(task_group_id))
    }

    pub fn attempt_count_for_stage(&self, stage_id: StageId) -> Result<u32> {
        Ok(self.state_manager()?.attempt_count_for_stage(stage_id))
    }
}
