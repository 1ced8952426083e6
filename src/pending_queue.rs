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

//! The schedule-group-ordered backlog the runner drains. Built directly on
//! a `VecDeque` rather than on `ClosableQueue`, since bulk removal by
//! stage needs to scan the whole backlog — something a pure FIFO
//! abstraction doesn't expose.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::model::{PhysicalPlan, ScheduledTaskGroup, StageId};

pub struct PendingTaskGroupQueue {
    backlog: Mutex<VecDeque<ScheduledTaskGroup>>,
    closed: AtomicBool,
    notify: Notify,
}

impl PendingTaskGroupQueue {
    pub fn new() -> Self {
        Self {
            backlog: Mutex::new(VecDeque::new()),
            closed: AtomicBool::new(false),
            notify: Notify::new(),
        }
    }

    /// Called once when a job starts: nothing to reset yet, but gives the
    /// queue a chance to clear any leftover state from a prior plan.
    pub fn on_job_scheduled(&self) {
        self.backlog.lock().clear();
        self.closed.store(false, Ordering::Release);
    }

    pub fn enqueue(&self, scheduled: ScheduledTaskGroup) {
        self.backlog.lock().push_back(scheduled);
        self.notify.notify_waiters();
    }

    /// Removes every pending task group belonging to `stage_id` or any
    /// stage reachable forward from it, per `plan`'s edges. Used when a
    /// stage is re-run from scratch (`INPUT_READ_FAILURE`) and any
    /// already-queued downstream work for it is now stale.
    pub fn remove_task_groups_and_descendants(&self, plan: &PhysicalPlan, stage_id: StageId) {
        let doomed = plan.stage_and_descendants(stage_id);
        {
            let mut backlog = self.backlog.lock();
            backlog.retain(|scheduled| !doomed.contains(&scheduled.task_group.stage_id));
        }
        self.notify.notify_waiters();
    }

    /// Blocks until a task group is available or the queue is closed.
    pub async fn dequeue(&self) -> Option<ScheduledTaskGroup> {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(item) = self.backlog.lock().pop_front() {
                return Some(item);
            }
            if self.closed.load(Ordering::Acquire) {
                return None;
            }
            notified.await;
        }
    }

    /// Non-destructive look at the head, per the runner's peek-then-place
    /// step.
    pub async fn peek(&self) -> Option<ScheduledTaskGroup> {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(item) = self.backlog.lock().front().cloned() {
                return Some(item);
            }
            if self.closed.load(Ordering::Acquire) {
                return None;
            }
            notified.await;
        }
    }

    /// Removes a specific task group from the head once the runner has
    /// successfully placed it (used instead of `dequeue` so a failed
    /// placement can leave the head in place for the next attempt).
    pub fn remove(&self, task_group_id: &str) {
        let mut backlog = self.backlog.lock();
        if let Some(front) = backlog.front() {
            if front.task_group.task_group_id == task_group_id {
                backlog.pop_front();
            }
        }
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.notify.notify_waiters();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.backlog.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.backlog.lock().is_empty()
    }

    /// Wake anyone blocked in `dequeue`/`peek` so they can re-check
    /// external conditions (e.g. the job reaching a terminal state, or the
    /// executor pool changing) even though the backlog itself didn't
    /// change.
    pub fn notify_external_change(&self) {
        self.notify.notify_waiters();
    }

    /// A future that resolves the next time the backlog is mutated (push,
    /// pop, or bulk removal). Lets a caller that already holds the head
    /// wait for a *different* change than "this same head is still here".
    pub fn changed(&self) -> tokio::sync::futures::Notified<'_> {
        self.notify.notified()
    }
}

impl Default for PendingTaskGroupQueue {
    fn default() -> Self {
        Self::new()
    }
}
