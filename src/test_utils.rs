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

//! An in-process virtual-cluster harness: fake collaborators
//! (`InMemoryBlockManagerMaster`, `VirtualTaskLauncher`,
//! `TestMetricsCollector`) plus a `SchedulerHarness` that wires a
//! `BatchSingleJobScheduler` up to them with no network or process
//! boundary, so end-to-end scheduling scenarios can be driven directly.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::collaborators::{BlockManagerMaster, TaskLauncher};
use crate::config::SchedulerConfig;
use crate::error::Result;
use crate::event::JobEventBus;
use crate::metrics::SchedulerMetricsCollector;
use crate::model::{ExecutorId, ExecutorLabel, FailureCause, PhysicalPlan, ScheduledTaskGroup, TaskGroupId, TaskGroupState};
use crate::scheduler::BatchSingleJobScheduler;

/// A `BlockManagerMaster` test double. Producer scheduling/failure calls
/// are just recorded; `remove_worker` always reports no lost blocks,
/// since nothing in this harness actually tracks shuffle-block placement
/// — tests that need a lost-executor's running task groups re-injected
/// rely on `SchedulingPolicy::on_executor_removed` alone, which is free to
/// find nothing of its own to collect.
#[derive(Default)]
pub struct InMemoryBlockManagerMaster {
    scheduled: Mutex<Vec<TaskGroupId>>,
    failed: Mutex<Vec<TaskGroupId>>,
}

impl InMemoryBlockManagerMaster {
    pub fn scheduled_producers(&self) -> Vec<TaskGroupId> {
        self.scheduled.lock().clone()
    }

    pub fn failed_producers(&self) -> Vec<TaskGroupId> {
        self.failed.lock().clone()
    }
}

#[async_trait]
impl BlockManagerMaster for InMemoryBlockManagerMaster {
    async fn on_producer_task_group_scheduled(&self, task_group_id: &TaskGroupId) {
        self.scheduled.lock().push(task_group_id.clone());
    }

    async fn on_producer_task_group_failed(&self, task_group_id: &TaskGroupId) {
        self.failed.lock().push(task_group_id.clone());
    }

    async fn remove_worker(&self, _executor_id: &ExecutorId) -> HashSet<TaskGroupId> {
        HashSet::new()
    }
}

/// A `TaskLauncher` that records every launch instead of issuing an RPC.
/// Tests drive task-group completion themselves by calling
/// `BatchSingleJobScheduler::on_task_group_state_changed` directly, the
/// way a real executor's status report would arrive.
#[derive(Default)]
pub struct VirtualTaskLauncher {
    launched: Mutex<Vec<(ExecutorId, ScheduledTaskGroup)>>,
}

impl VirtualTaskLauncher {
    pub fn launched(&self) -> Vec<(ExecutorId, ScheduledTaskGroup)> {
        self.launched.lock().clone()
    }

    pub fn launched_task_group_ids(&self) -> Vec<String> {
        self.launched
            .lock()
            .iter()
            .map(|(_, scheduled)| scheduled.task_group.task_group_id.clone())
            .collect()
    }
}

#[async_trait]
impl TaskLauncher for VirtualTaskLauncher {
    async fn launch_task_group(
        &self,
        executor_id: &ExecutorId,
        scheduled: ScheduledTaskGroup,
    ) -> Result<()> {
        self.launched.lock().push((executor_id.clone(), scheduled));
        Ok(())
    }
}

/// A single recorded metrics call, for assertion in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricEvent {
    Submitted(String),
    Completed(String),
    Failed(String),
}

/// A `SchedulerMetricsCollector` that records every call instead of
/// exporting it.
#[derive(Default)]
pub struct TestMetricsCollector {
    events: Mutex<Vec<MetricEvent>>,
}

impl TestMetricsCollector {
    pub fn events_for(&self, job_id: &str) -> Vec<MetricEvent> {
        self.events
            .lock()
            .iter()
            .filter(|event| match event {
                MetricEvent::Submitted(id) | MetricEvent::Completed(id) | MetricEvent::Failed(id) => {
                    id == job_id
                }
            })
            .cloned()
            .collect()
    }
}

impl SchedulerMetricsCollector for TestMetricsCollector {
    fn record_submitted(&self, job_id: &str, _submitted_at_millis: u64) {
        self.events.lock().push(MetricEvent::Submitted(job_id.to_owned()));
    }

    fn record_completed(&self, job_id: &str, _submitted_at_millis: u64, _completed_at_millis: u64) {
        self.events.lock().push(MetricEvent::Completed(job_id.to_owned()));
    }

    fn record_failed(&self, job_id: &str) {
        self.events.lock().push(MetricEvent::Failed(job_id.to_owned()));
    }

    fn set_pending_task_groups(&self, _value: u64) {}

    fn gather_metrics(&self) -> Result<Option<(Vec<u8>, String)>> {
        Ok(None)
    }
}

pub fn assert_submitted_event(job_id: &str, collector: &TestMetricsCollector) {
    assert!(
        collector
            .events_for(job_id)
            .iter()
            .any(|e| matches!(e, MetricEvent::Submitted(_))),
        "expected a submitted event for job {job_id}"
    );
}

pub fn assert_completed_event(job_id: &str, collector: &TestMetricsCollector) {
    assert!(
        collector
            .events_for(job_id)
            .iter()
            .any(|e| matches!(e, MetricEvent::Completed(_))),
        "expected a completed event for job {job_id}"
    );
}

pub fn assert_failed_event(job_id: &str, collector: &TestMetricsCollector) {
    assert!(
        collector
            .events_for(job_id)
            .iter()
            .any(|e| matches!(e, MetricEvent::Failed(_))),
        "expected a failed event for job {job_id}"
    );
}

/// Wires a `BatchSingleJobScheduler` to the virtual-cluster test doubles
/// above, with the default `SchedulerConfig` (and the `CapacityLabelPolicy`
/// it selects) for placement — everything the literal end-to-end scenarios
/// need, with no network or process boundary.
pub struct SchedulerHarness {
    pub scheduler: Arc<BatchSingleJobScheduler<VirtualTaskLauncher>>,
    pub block_manager: Arc<InMemoryBlockManagerMaster>,
    pub launcher: Arc<VirtualTaskLauncher>,
    pub metrics: Arc<TestMetricsCollector>,
    pub events: Arc<JobEventBus>,
}

impl SchedulerHarness {
    pub fn new() -> Self {
        let block_manager = Arc::new(InMemoryBlockManagerMaster::default());
        let launcher = Arc::new(VirtualTaskLauncher::default());
        let metrics = Arc::new(TestMetricsCollector::default());
        let events = Arc::new(JobEventBus::default());

        let scheduler = Arc::new(BatchSingleJobScheduler::new(
            SchedulerConfig::default(),
            block_manager.clone(),
            metrics.clone() as Arc<dyn SchedulerMetricsCollector>,
            events.clone(),
            launcher.clone(),
        ));

        Self {
            scheduler,
            block_manager,
            launcher,
            metrics,
            events,
        }
    }

    /// Registers a transient executor with the given capacity and notifies
    /// the scheduler, waking a dispatch loop stalled on "no eligible
    /// executor".
    pub fn add_executor(&self, executor_id: &str, capacity: u32, label: ExecutorLabel) {
        self.scheduler
            .on_executor_added(executor_id.to_owned(), capacity, label);
    }

    pub async fn remove_executor(&self, executor_id: &str) -> Result<()> {
        self.scheduler.on_executor_removed(executor_id.to_owned()).await
    }

    pub async fn submit(&self, plan: PhysicalPlan) -> Result<()> {
        self.scheduler.schedule_job(plan).await
    }

    /// Simulates an executor's `TaskGroupStateChanged` report.
    pub async fn report(
        &self,
        executor_id: &str,
        task_group_id: &str,
        new_state: TaskGroupState,
        attempt_idx: u32,
        failure_cause: Option<FailureCause>,
    ) -> Result<()> {
        self.scheduler
            .on_task_group_state_changed(
                executor_id.to_owned(),
                task_group_id.to_owned(),
                new_state,
                attempt_idx,
                None,
                failure_cause,
            )
            .await
    }

    pub async fn report_on_hold(
        &self,
        executor_id: &str,
        task_group_id: &str,
        attempt_idx: u32,
        tasks_on_hold: Vec<crate::model::Task>,
    ) -> Result<()> {
        self.scheduler
            .on_task_group_state_changed(
                executor_id.to_owned(),
                task_group_id.to_owned(),
                TaskGroupState::OnHold,
                attempt_idx,
                Some(tasks_on_hold),
                None,
            )
            .await
    }
}

impl Default for SchedulerHarness {
    fn default() -> Self {
        Self::new()
    }
}
