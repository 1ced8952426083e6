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

//! Contracts for collaborators this crate treats as external: the block
//! (shuffle data) manager master, and whatever launches a task group on an
//! executor over the RPC transport.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{ExecutorId, ScheduledTaskGroup, TaskGroupId};

/// The block/shuffle data-manager master's contract. Its implementation
/// (tracking where shuffle blocks live) is out of scope for this crate.
#[async_trait]
pub trait BlockManagerMaster: Send + Sync {
    async fn on_producer_task_group_scheduled(&self, task_group_id: &TaskGroupId);
    async fn on_producer_task_group_failed(&self, task_group_id: &TaskGroupId);
    /// Remove a worker and return the set of task groups whose blocks are
    /// now lost as a result.
    async fn remove_worker(&self, executor_id: &ExecutorId) -> HashSet<TaskGroupId>;
}

/// Issues the `LaunchTaskGroup` RPC to an executor. The RPC transport
/// itself is out of scope; this trait is the seam.
#[async_trait]
pub trait TaskLauncher: Send + Sync {
    async fn launch_task_group(
        &self,
        executor_id: &ExecutorId,
        scheduled: ScheduledTaskGroup,
    ) -> Result<()>;
}

/// Launcher that logs and drops the task group. Usable as a placeholder
/// wherever no real executor pool is wired in.
#[derive(Default)]
pub struct LoggingTaskLauncher;

#[async_trait]
impl TaskLauncher for LoggingTaskLauncher {
    async fn launch_task_group(
        &self,
        executor_id: &ExecutorId,
        scheduled: ScheduledTaskGroup,
    ) -> Result<()> {
        log::info!(
            "launching task group {} (attempt {}) on executor {executor_id}",
            scheduled.task_group.task_group_id,
            scheduled.attempt_idx
        );
        Ok(())
    }
}

/// Block manager master that logs producer bookkeeping calls and reports no
/// lost blocks on worker removal. Usable as a placeholder wherever no real
/// block manager master is wired in.
#[derive(Default)]
pub struct LoggingBlockManagerMaster;

#[async_trait]
impl BlockManagerMaster for LoggingBlockManagerMaster {
    async fn on_producer_task_group_scheduled(&self, task_group_id: &TaskGroupId) {
        log::debug!("task group {task_group_id} scheduled as a shuffle producer");
    }

    async fn on_producer_task_group_failed(&self, task_group_id: &TaskGroupId) {
        log::debug!("task group {task_group_id} failed as a shuffle producer");
    }

    async fn remove_worker(&self, executor_id: &ExecutorId) -> HashSet<TaskGroupId> {
        log::debug!("executor {executor_id} removed; no shuffle blocks tracked");
        HashSet::new()
    }
}
