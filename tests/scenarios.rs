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

//! The six literal end-to-end scenarios from the scheduling spec, driven
//! against the in-process virtual-cluster harness.

use std::time::Duration;

use strata_scheduler::model::{
    ExecutorLabel, FailureCause, JobState, PhysicalPlan, PhysicalStage, PhysicalStageEdge,
    StageEdgeKind, StageState, Task, TaskGroup, TaskGroupState, TaskKind,
};
use strata_scheduler::test_utils::{
    assert_completed_event, assert_failed_event, assert_submitted_event, SchedulerHarness,
};

fn task_group(id: &str, stage_id: u32) -> TaskGroup {
    TaskGroup {
        task_group_id: id.to_owned(),
        stage_id,
        tasks: vec![Task {
            task_id: format!("{id}-0"),
            ir_vertex_id: format!("v-{id}"),
            kind: TaskKind::Normal,
        }],
    }
}

fn barrier_task_group(id: &str, stage_id: u32) -> TaskGroup {
    TaskGroup {
        task_group_id: id.to_owned(),
        stage_id,
        tasks: vec![Task {
            task_id: format!("{id}-0"),
            ir_vertex_id: format!("v-{id}"),
            kind: TaskKind::MetricCollectionBarrier,
        }],
    }
}

/// `s0` (`t00`, `t01`) at schedule group 0, `s1` (`t10`) at schedule
/// group 1, a shuffle edge `s0 -> s1`.
fn two_stage_plan(plan_id: &str) -> PhysicalPlan {
    PhysicalPlan {
        plan_id: plan_id.to_owned(),
        stages: vec![
            PhysicalStage {
                stage_id: 0,
                schedule_group_index: 0,
                task_groups: vec![task_group("t00", 0), task_group("t01", 0)],
                executor_label: None,
            },
            PhysicalStage {
                stage_id: 1,
                schedule_group_index: 1,
                task_groups: vec![task_group("t10", 1)],
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

async fn wait_until_launched(harness: &SchedulerHarness, task_group_id: &str) {
    tokio::time::timeout(Duration::from_secs(1), async {
        loop {
            if harness
                .launcher
                .launched_task_group_ids()
                .iter()
                .any(|id| id == task_group_id)
            {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("task group {task_group_id} was never dispatched"));
}

async fn wait_until_job_state(harness: &SchedulerHarness, expected: JobState) {
    tokio::time::timeout(Duration::from_secs(1), async {
        loop {
            if harness.scheduler.job_state().unwrap() == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("job never reached {expected:?}"));
}

#[tokio::test]
async fn happy_path_two_stages_two_schedule_groups() {
    let harness = SchedulerHarness::new();
    harness.add_executor("exec-1", 10, ExecutorLabel::Transient);

    let plan = two_stage_plan("job-1");
    harness.submit(plan).await.unwrap();

    wait_until_launched(&harness, "t00").await;
    wait_until_launched(&harness, "t01").await;
    assert_submitted_event("job-1", &harness.metrics);

    harness
        .report("exec-1", "t00", TaskGroupState::Complete, 1, None)
        .await
        .unwrap();
    harness
        .report("exec-1", "t01", TaskGroupState::Complete, 1, None)
        .await
        .unwrap();

    assert_eq!(
        harness.scheduler.stage_state(0).unwrap(),
        Some(StageState::Complete)
    );

    wait_until_launched(&harness, "t10").await;
    harness
        .report("exec-1", "t10", TaskGroupState::Complete, 1, None)
        .await
        .unwrap();

    wait_until_job_state(&harness, JobState::Complete).await;
    assert_completed_event("job-1", &harness.metrics);
}

#[tokio::test]
async fn container_failure_mid_stage_is_recovered() {
    let harness = SchedulerHarness::new();
    // One slot each: t00 lands on exec-1, t01 (least-loaded next) on exec-2.
    harness.add_executor("exec-1", 1, ExecutorLabel::Transient);
    harness.add_executor("exec-2", 1, ExecutorLabel::Transient);

    let plan = two_stage_plan("job-2");
    harness.submit(plan).await.unwrap();

    wait_until_launched(&harness, "t00").await;
    wait_until_launched(&harness, "t01").await;

    // exec-1 is evicted while only t00 is executing on it; t01 keeps
    // running undisturbed on exec-2.
    harness.remove_executor("exec-1").await.unwrap();

    assert_eq!(
        harness.scheduler.task_group_state("t01").unwrap(),
        Some(TaskGroupState::Executing)
    );

    // A fresh executor joins; the re-injected t00 gets re-dispatched.
    harness.add_executor("exec-3", 1, ExecutorLabel::Transient);

    tokio::time::timeout(Duration::from_secs(1), async {
        loop {
            let launched = harness.launcher.launched_task_group_ids();
            if launched.iter().filter(|id| *id == "t00").count() >= 2 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("t00 should be re-dispatched after recovery");

    harness
        .report("exec-3", "t00", TaskGroupState::Complete, 1, None)
        .await
        .unwrap();
    harness
        .report("exec-2", "t01", TaskGroupState::Complete, 1, None)
        .await
        .unwrap();

    wait_until_launched(&harness, "t10").await;
    harness
        .report("exec-2", "t10", TaskGroupState::Complete, 1, None)
        .await
        .unwrap();

    wait_until_job_state(&harness, JobState::Complete).await;
}

#[tokio::test]
async fn stale_recoverable_message_is_dropped() {
    let harness = SchedulerHarness::new();
    harness.add_executor("exec-1", 10, ExecutorLabel::Transient);

    let plan = two_stage_plan("job-3");
    harness.submit(plan).await.unwrap();
    wait_until_launched(&harness, "t00").await;

    // Force stage 0 to attempt 2 via an input-read-failure reschedule.
    harness
        .report(
            "exec-1",
            "t01",
            TaskGroupState::FailedRecoverable,
            1,
            Some(FailureCause::InputReadFailure),
        )
        .await
        .unwrap();
    assert_eq!(harness.scheduler.attempt_count_for_stage(0).unwrap(), 2);

    let state_before = harness.scheduler.task_group_state("t00").unwrap();

    // A late message from attempt 1 must be ignored.
    harness
        .report(
            "exec-1",
            "t00",
            TaskGroupState::FailedRecoverable,
            1,
            Some(FailureCause::InputReadFailure),
        )
        .await
        .unwrap();

    assert_eq!(harness.scheduler.task_group_state("t00").unwrap(), state_before);
}

#[tokio::test]
async fn input_read_failure_cascades_the_whole_stage() {
    let harness = SchedulerHarness::new();
    harness.add_executor("exec-1", 10, ExecutorLabel::Transient);

    let plan = two_stage_plan("job-4");
    harness.submit(plan).await.unwrap();
    wait_until_launched(&harness, "t00").await;
    wait_until_launched(&harness, "t01").await;

    harness
        .report("exec-1", "t00", TaskGroupState::Complete, 1, None)
        .await
        .unwrap();

    harness
        .report(
            "exec-1",
            "t01",
            TaskGroupState::FailedRecoverable,
            1,
            Some(FailureCause::InputReadFailure),
        )
        .await
        .unwrap();

    // t00 already completed; only non-complete groups are turned
    // FailedRecoverable.
    assert_eq!(
        harness.scheduler.task_group_state("t00").unwrap(),
        Some(TaskGroupState::Complete)
    );
    assert_eq!(harness.scheduler.attempt_count_for_stage(0).unwrap(), 2);

    assert!(harness
        .block_manager
        .failed_producers()
        .contains(&"t01".to_owned()));

    tokio::time::timeout(Duration::from_secs(1), async {
        loop {
            if harness.launcher.launched_task_group_ids().iter().filter(|id| *id == "t01").count() >= 2 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("t01 should be re-dispatched after the stage-wide reschedule");
}

#[tokio::test]
async fn output_write_failure_is_local_to_the_task_group() {
    let harness = SchedulerHarness::new();
    harness.add_executor("exec-1", 10, ExecutorLabel::Transient);

    let plan = two_stage_plan("job-5");
    harness.submit(plan).await.unwrap();
    wait_until_launched(&harness, "t00").await;
    wait_until_launched(&harness, "t01").await;

    harness
        .report(
            "exec-1",
            "t00",
            TaskGroupState::FailedRecoverable,
            1,
            Some(FailureCause::OutputWriteFailure),
        )
        .await
        .unwrap();

    // t00 was reset FAILED_RECOVERABLE -> READY and re-enqueued; the
    // dispatch loop may have already picked it back up concurrently.
    assert!(matches!(
        harness.scheduler.task_group_state("t00").unwrap(),
        Some(TaskGroupState::Ready) | Some(TaskGroupState::Executing)
    ));
    // t01 untouched.
    assert_eq!(
        harness.scheduler.task_group_state("t01").unwrap(),
        Some(TaskGroupState::Executing)
    );

    assert!(harness
        .block_manager
        .failed_producers()
        .contains(&"t00".to_owned()));

    tokio::time::timeout(Duration::from_secs(1), async {
        loop {
            if harness.launcher.launched_task_group_ids().iter().filter(|id| *id == "t00").count() >= 2 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("t00 should be re-enqueued on its own");
}

#[tokio::test]
async fn dynamic_optimization_round_trip() {
    let harness = SchedulerHarness::new();
    harness.add_executor("exec-1", 10, ExecutorLabel::Transient);

    let barrier_tg = barrier_task_group("sb0", 0);
    let plan = PhysicalPlan {
        plan_id: "job-6".to_owned(),
        stages: vec![PhysicalStage {
            stage_id: 0,
            schedule_group_index: 0,
            task_groups: vec![task_group("sb-sibling", 0), barrier_tg.clone()],
            executor_label: None,
        }],
        edges: vec![],
    };

    harness.submit(plan.clone()).await.unwrap();
    wait_until_launched(&harness, "sb-sibling").await;
    wait_until_launched(&harness, "sb0").await;

    harness
        .report("exec-1", "sb-sibling", TaskGroupState::Complete, 1, None)
        .await
        .unwrap();

    let mut receiver = harness.events.subscribe().expect("events not yet taken");
    harness
        .report_on_hold("exec-1", "sb0", 1, barrier_tg.tasks.clone())
        .await
        .unwrap();

    let published = tokio::time::timeout(Duration::from_secs(1), receiver.recv())
        .await
        .expect("dynamic optimization event should be published")
        .expect("channel should not be closed");
    match published {
        strata_scheduler::event::SchedulerEvent::DynamicOptimization(event) => {
            assert_eq!(event.task_group.task_group_id, "sb0");
            assert_eq!(event.barrier_ir_vertex_id, "v-sb0");
        }
        other => panic!("expected a DynamicOptimization event, got {other:?}"),
    }

    assert_eq!(
        harness.scheduler.task_group_state("sb0").unwrap(),
        Some(TaskGroupState::OnHold)
    );

    // The optimization completes; the barrier task group resumes and the
    // scheduler is handed the (possibly rewritten) plan.
    harness
        .scheduler
        .update_job(
            "job-6",
            plan,
            Some(("exec-1".to_owned(), "sb0".to_owned())),
        )
        .await
        .unwrap();

    wait_until_job_state(&harness, JobState::Complete).await;
    assert_eq!(
        harness.scheduler.task_group_state("sb0").unwrap(),
        Some(TaskGroupState::Complete)
    );
}

#[tokio::test]
async fn unrecoverable_failure_fails_the_job() {
    let harness = SchedulerHarness::new();
    harness.add_executor("exec-1", 10, ExecutorLabel::Transient);

    let plan = two_stage_plan("job-7");
    harness.submit(plan).await.unwrap();
    wait_until_launched(&harness, "t00").await;

    let result = harness
        .report("exec-1", "t00", TaskGroupState::FailedUnrecoverable, 1, None)
        .await;
    assert!(result.is_err());

    wait_until_job_state(&harness, JobState::Failed).await;
    assert_failed_event("job-7", &harness.metrics);
}
