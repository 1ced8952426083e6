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

//! The dispatch loop: marries pending task groups to executor capacity.
//! Runs as its own tokio task and never touches the orchestrator's mutex
//! directly — only the (internally synchronized) queue, policy and state
//! manager.

use std::sync::Arc;

use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::collaborators::TaskLauncher;
use crate::model::{ExecutorLabel, JobState, TaskGroupState};
use crate::pending_queue::PendingTaskGroupQueue;
use crate::policy::SchedulingPolicy;
use crate::state::JobStateManager;

/// Looks up the executor-class preference for the stage a task group
/// belongs to. Kept as a trait so the runner doesn't need to hold a whole
/// `PhysicalPlan`; `BatchSingleJobScheduler` supplies a closure-backed
/// implementation over its current plan.
pub trait StageLabelLookup: Send + Sync {
    fn label_for_stage(&self, stage_id: crate::model::StageId) -> Option<ExecutorLabel>;
}

/// Handle to a running dispatch loop. Dropping it does not stop the loop;
/// call `shutdown` explicitly, matching the queue's own graceful-close
/// semantics.
pub struct SchedulerRunnerHandle {
    shutdown: Arc<Notify>,
    join: JoinHandle<()>,
}

impl SchedulerRunnerHandle {
    pub fn shutdown(&self) {
        self.shutdown.notify_waiters();
    }

    pub async fn join(self) {
        let _ = self.join.await;
    }
}

/// Spawns the five-step dispatch loop from the orchestrator's runner
/// contract. `executor_pool_changed` should be notified by the caller
/// whenever `on_executor_added`/`on_executor_removed` fires, so a runner
/// stalled on "no eligible executor" wakes up and retries.
pub fn spawn<L>(
    queue: Arc<PendingTaskGroupQueue>,
    policy: Arc<dyn SchedulingPolicy>,
    state: Arc<JobStateManager>,
    labels: Arc<dyn StageLabelLookup>,
    launcher: Arc<L>,
    executor_pool_changed: Arc<Notify>,
) -> SchedulerRunnerHandle
where
    L: TaskLauncher + 'static,
{
    let shutdown = Arc::new(Notify::new());
    let loop_shutdown = shutdown.clone();

    let join = tokio::task::spawn(async move {
        loop {
            if state.check_job_termination() {
                return;
            }

            let shutdown_signal = loop_shutdown.notified();
            tokio::pin!(shutdown_signal);

            let scheduled = tokio::select! {
                scheduled = queue.peek() => scheduled,
                _ = &mut shutdown_signal => return,
            };

            let Some(scheduled) = scheduled else {
                // Queue closed with nothing left: nothing more to dispatch.
                return;
            };

            let label = labels.label_for_stage(scheduled.task_group.stage_id);
            let Some(executor_id) = policy.schedule_task_group(&scheduled.task_group, label) else {
                // No eligible executor right now. Wait for either the
                // queue or the executor pool to change before retrying;
                // the head stays in place (no head-of-line bypass).
                let queue_changed = queue.changed();
                let pool_changed = executor_pool_changed.notified();
                tokio::pin!(queue_changed);
                tokio::pin!(pool_changed);
                tokio::select! {
                    _ = &mut queue_changed => {},
                    _ = &mut pool_changed => {},
                    _ = loop_shutdown.notified() => return,
                }
                continue;
            };

            queue.remove(&scheduled.task_group.task_group_id);

            if let Err(err) = state.on_task_group_state_changed(
                &scheduled.task_group.task_group_id,
                TaskGroupState::Executing,
            ) {
                log::error!(
                    "failed to transition task group {} to executing: {err}",
                    scheduled.task_group.task_group_id
                );
                continue;
            }

            if let Err(err) = launcher.launch_task_group(&executor_id, scheduled.clone()).await {
                log::error!(
                    "failed to launch task group {} on {executor_id}: {err}",
                    scheduled.task_group.task_group_id
                );
            }
        }
    });

    SchedulerRunnerHandle {
        shutdown,
        join,
    }
}
