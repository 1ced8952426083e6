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

//! Runs a small two-stage job against an in-memory executor pool so the
//! dispatch loop, recovery paths and `log`-based diagnostics can be
//! observed end to end. Set `RUST_LOG=debug` for the late-message and
//! stage-scheduling trace lines.

use std::sync::Arc;
use std::time::Duration;

use strata_scheduler::collaborators::{LoggingBlockManagerMaster, LoggingTaskLauncher};
use strata_scheduler::config::SchedulerConfig;
use strata_scheduler::event::JobEventBus;
use strata_scheduler::metrics::LoggingMetricsCollector;
use strata_scheduler::model::{
    ExecutorLabel, PhysicalPlan, PhysicalStage, PhysicalStageEdge, StageEdgeKind, Task, TaskGroup,
    TaskKind,
};
use strata_scheduler::BatchSingleJobScheduler;

fn demo_plan() -> PhysicalPlan {
    let task_group = |id: &str, stage_id: u32| TaskGroup {
        task_group_id: id.to_owned(),
        stage_id,
        tasks: vec![Task {
            task_id: format!("{id}-0"),
            ir_vertex_id: format!("v-{id}"),
            kind: TaskKind::Normal,
        }],
    };

    PhysicalPlan {
        plan_id: "demo-job".to_owned(),
        stages: vec![
            PhysicalStage {
                stage_id: 0,
                schedule_group_index: 0,
                task_groups: vec![task_group("scan-left", 0), task_group("scan-right", 0)],
                executor_label: None,
            },
            PhysicalStage {
                stage_id: 1,
                schedule_group_index: 1,
                task_groups: vec![task_group("join", 1)],
                executor_label: None,
            },
        ],
        edges: vec![PhysicalStageEdge {
            from_stage: 0,
            to_stage: 1,
            kind: StageEdgeKind::Shuffle,
        }],
    }
}

#[tokio::main]
async fn main() -> strata_scheduler::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = SchedulerConfig::default();
    let block_manager = Arc::new(LoggingBlockManagerMaster);
    let metrics = Arc::new(LoggingMetricsCollector);
    let events = Arc::new(JobEventBus::default());
    let launcher = Arc::new(LoggingTaskLauncher);

    let scheduler = Arc::new(BatchSingleJobScheduler::new(
        config,
        block_manager,
        metrics,
        events,
        launcher,
    ));

    scheduler.on_executor_added("executor-0".to_owned(), 4, ExecutorLabel::Transient);
    scheduler.schedule_job(demo_plan()).await?;

    // `LoggingTaskLauncher` only logs a dispatch; nothing reports these task
    // groups back as complete, so we settle for observing the dispatch and
    // stage-scheduling log lines rather than driving the job to completion.
    tokio::time::sleep(Duration::from_millis(200)).await;

    log::info!(
        "stage 0 state after dispatch: {:?}",
        scheduler.stage_state(0)?
    );
    for task_group_id in ["scan-left", "scan-right"] {
        log::info!(
            "{task_group_id} state: {:?}",
            scheduler.task_group_state(task_group_id)?
        );
    }

    scheduler.shutdown();
    Ok(())
}
