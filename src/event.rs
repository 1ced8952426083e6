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

//! The job-wide event bus: dynamic-optimization events out, plan-update
//! events in (the latter folded into `BatchSingleJobScheduler::update_job`
//! directly rather than routed back through the bus).

use crate::error::{Result, SchedulerError};
use crate::model::{ExecutorId, JobState, PhysicalPlan, TaskGroup};

/// Published when a `MetricCollectionBarrierTask`'s task group finishes
/// `OnHold` and completes its stage.
#[derive(Debug, Clone)]
pub struct DynamicOptimizationEvent {
    pub plan: PhysicalPlan,
    pub barrier_ir_vertex_id: String,
    pub executor_id: ExecutorId,
    pub task_group: TaskGroup,
}

#[derive(Debug, Clone)]
pub enum SchedulerEvent {
    DynamicOptimization(DynamicOptimizationEvent),
    JobStatusChanged { job_id: String, state: JobState },
}

/// A single-consumer event bus the scheduler publishes to. The hosting
/// application subscribes once via `subscribe` and drains events from the
/// returned receiver.
pub struct JobEventBus {
    sender: tokio::sync::mpsc::Sender<SchedulerEvent>,
    receiver: parking_lot::Mutex<Option<tokio::sync::mpsc::Receiver<SchedulerEvent>>>,
}

impl JobEventBus {
    pub fn new(buffer_size: usize) -> Self {
        let (sender, receiver) = tokio::sync::mpsc::channel(buffer_size);
        Self {
            sender,
            receiver: parking_lot::Mutex::new(Some(receiver)),
        }
    }

    /// Take ownership of the event stream. Returns `None` if a subscriber
    /// has already taken it.
    pub fn subscribe(&self) -> Option<tokio::sync::mpsc::Receiver<SchedulerEvent>> {
        self.receiver.lock().take()
    }

    pub async fn publish(&self, event: SchedulerEvent) -> Result<()> {
        self.sender
            .send(event)
            .await
            .map_err(|e| SchedulerError::Internal(format!("publishing event: {e}")))
    }
}

impl Default for JobEventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}
