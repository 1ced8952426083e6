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

//! The authoritative state store for a job's stages and task groups. No
//! other component writes state directly; everything funnels through
//! here so illegal transitions are caught in one place.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::{Result, SchedulerError};
use crate::model::{JobState, PhysicalPlan, StageId, StageState, TaskGroupId, TaskGroupState};

struct Inner {
    job_state: JobState,
    stage_states: HashMap<StageId, StageState>,
    task_group_states: HashMap<TaskGroupId, TaskGroupState>,
    task_group_stage: HashMap<TaskGroupId, StageId>,
    stage_task_groups: HashMap<StageId, Vec<TaskGroupId>>,
    stage_attempts: HashMap<StageId, u32>,
}

pub struct JobStateManager {
    inner: RwLock<Inner>,
}

fn legal_job_transition(from: JobState, to: JobState) -> bool {
    use JobState::*;
    matches!(
        (from, to),
        (Ready, Executing) | (Executing, Complete) | (Executing, Failed)
    )
}

fn legal_stage_transition(from: StageState, to: StageState) -> bool {
    use StageState::*;
    matches!(
        (from, to),
        (Ready, Executing)
            | (Executing, Complete)
            | (Executing, FailedRecoverable)
            | (Executing, FailedUnrecoverable)
            | (FailedRecoverable, Ready)
    )
}

fn legal_task_group_transition(from: TaskGroupState, to: TaskGroupState) -> bool {
    use TaskGroupState::*;
    matches!(
        (from, to),
        (Ready, Executing)
            | (Executing, Complete)
            | (Executing, OnHold)
            | (Executing, FailedRecoverable)
            | (Executing, FailedUnrecoverable)
            | (OnHold, Complete)
            | (FailedRecoverable, Ready)
    )
}

impl JobStateManager {
    /// Build the manager from the plan being scheduled: seeds every stage
    /// and task group to `Ready` and indexes task group -> stage
    /// membership for lookups.
    pub fn new(plan: &PhysicalPlan) -> Self {
        let mut stage_states = HashMap::new();
        let mut task_group_states = HashMap::new();
        let mut task_group_stage = HashMap::new();
        let mut stage_task_groups = HashMap::new();
        let mut stage_attempts = HashMap::new();

        for stage in &plan.stages {
            stage_states.insert(stage.stage_id, StageState::Ready);
            stage_attempts.insert(stage.stage_id, 0);
            let mut ids = Vec::with_capacity(stage.task_groups.len());
            for tg in &stage.task_groups {
                task_group_states.insert(tg.task_group_id.clone(), TaskGroupState::Ready);
                task_group_stage.insert(tg.task_group_id.clone(), stage.stage_id);
                ids.push(tg.task_group_id.clone());
            }
            stage_task_groups.insert(stage.stage_id, ids);
        }

        Self {
            inner: RwLock::new(Inner {
                job_state: JobState::Ready,
                stage_states,
                task_group_states,
                task_group_stage,
                stage_task_groups,
                stage_attempts,
            }),
        }
    }

    pub fn job_state(&self) -> JobState {
        self.inner.read().job_state
    }

    pub fn set_job_state(&self, new_state: JobState) -> Result<()> {
        let mut inner = self.inner.write();
        if !legal_job_transition(inner.job_state, new_state) {
            return Err(SchedulerError::IllegalStateTransition {
                entity: "job".to_owned(),
                from: format!("{:?}", inner.job_state),
                to: format!("{new_state:?}"),
            });
        }
        inner.job_state = new_state;
        Ok(())
    }

    pub fn stage_state(&self, stage_id: StageId) -> Option<StageState> {
        self.inner.read().stage_states.get(&stage_id).copied()
    }

    pub fn task_group_state(&self, task_group_id: &str) -> Option<TaskGroupState> {
        self.inner
            .read()
            .task_group_states
            .get(task_group_id)
            .copied()
    }

    /// Validates and applies a stage transition. Entering `Executing`
    /// bumps the attempt counter.
    pub fn on_stage_state_changed(&self, stage_id: StageId, new_state: StageState) -> Result<()> {
        let mut inner = self.inner.write();
        let current = *inner.stage_states.get(&stage_id).ok_or_else(|| {
            SchedulerError::Internal(format!("unknown stage {stage_id}"))
        })?;

        if !legal_stage_transition(current, new_state) {
            return Err(SchedulerError::IllegalStateTransition {
                entity: format!("stage {stage_id}"),
                from: format!("{current:?}"),
                to: format!("{new_state:?}"),
            });
        }

        if new_state == StageState::Executing {
            *inner.stage_attempts.entry(stage_id).or_insert(0) += 1;
        }
        inner.stage_states.insert(stage_id, new_state);
        Ok(())
    }

    /// Validates and applies a task-group transition. On `Complete`,
    /// checks whether the owning stage is now complete and, if so, marks
    /// it (bypassing the normal stage-transition call since this is an
    /// internal derived fact, not an externally requested edge).
    pub fn on_task_group_state_changed(
        &self,
        task_group_id: &str,
        new_state: TaskGroupState,
    ) -> Result<bool> {
        let mut inner = self.inner.write();
        let current = *inner
            .task_group_states
            .get(task_group_id)
            .ok_or_else(|| SchedulerError::Internal(format!("unknown task group {task_group_id}")))?;

        if !legal_task_group_transition(current, new_state) {
            return Err(SchedulerError::IllegalStateTransition {
                entity: format!("task group {task_group_id}"),
                from: format!("{current:?}"),
                to: format!("{new_state:?}"),
            });
        }

        inner
            .task_group_states
            .insert(task_group_id.to_owned(), new_state);

        if new_state != TaskGroupState::Complete {
            return Ok(false);
        }

        let stage_id = *inner
            .task_group_stage
            .get(task_group_id)
            .ok_or_else(|| SchedulerError::Internal(format!("unknown task group {task_group_id}")))?;

        let stage_complete = inner
            .stage_task_groups
            .get(&stage_id)
            .map(|ids| {
                ids.iter()
                    .all(|id| inner.task_group_states.get(id) == Some(&TaskGroupState::Complete))
            })
            .unwrap_or(false);

        if stage_complete {
            inner.stage_states.insert(stage_id, StageState::Complete);
        }

        Ok(stage_complete)
    }

    pub fn check_stage_completion(&self, stage_id: StageId) -> bool {
        let inner = self.inner.read();
        inner
            .stage_task_groups
            .get(&stage_id)
            .map(|ids| {
                ids.iter()
                    .all(|id| inner.task_group_states.get(id) == Some(&TaskGroupState::Complete))
            })
            .unwrap_or(false)
    }

    /// True once the job has reached `Complete` or `Failed`.
    pub fn check_job_termination(&self) -> bool {
        matches!(
            self.inner.read().job_state,
            JobState::Complete | JobState::Failed
        )
    }

    pub fn attempt_count_for_stage(&self, stage_id: StageId) -> u32 {
        self.inner
            .read()
            .stage_attempts
            .get(&stage_id)
            .copied()
            .unwrap_or(0)
    }

    pub fn stage_of(&self, task_group_id: &str) -> Option<StageId> {
        self.inner.read().task_group_stage.get(task_group_id).copied()
    }

    pub fn task_groups_of_stage(&self, stage_id: StageId) -> Vec<TaskGroupId> {
        self.inner
            .read()
            .stage_task_groups
            .get(&stage_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn all_stage_ids(&self) -> Vec<StageId> {
        self.inner.read().stage_states.keys().copied().collect()
    }

    pub fn is_stage_complete(&self, stage_id: StageId) -> bool {
        self.stage_state(stage_id) == Some(StageState::Complete)
    }

    /// Force a task group into a state without legal-transition checking
    /// (used only to reset `FailedRecoverable -> Ready` en masse during
    /// stage-level recovery, and to seed re-injected task groups whose
    /// prior state the dispatcher never observed).
    pub fn force_task_group_state(&self, task_group_id: &str, new_state: TaskGroupState) {
        self.inner
            .write()
            .task_group_states
            .insert(task_group_id.to_owned(), new_state);
    }

    pub fn force_stage_state(&self, stage_id: StageId, new_state: StageState) {
        self.inner.write().stage_states.insert(stage_id, new_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PhysicalStage, Task, TaskGroup, TaskKind};

    fn plan_two_stages() -> PhysicalPlan {
        PhysicalPlan {
            plan_id: "p".to_owned(),
            stages: vec![
                PhysicalStage {
                    stage_id: 0,
                    schedule_group_index: 0,
                    task_groups: vec![
                        TaskGroup {
                            task_group_id: "t00".to_owned(),
                            stage_id: 0,
                            tasks: vec![Task {
                                task_id: "t00-0".to_owned(),
                                ir_vertex_id: "v0".to_owned(),
                                kind: TaskKind::Normal,
                            }],
                        },
                        TaskGroup {
                            task_group_id: "t01".to_owned(),
                            stage_id: 0,
                            tasks: vec![Task {
                                task_id: "t01-0".to_owned(),
                                ir_vertex_id: "v1".to_owned(),
                                kind: TaskKind::Normal,
                            }],
                        },
                    ],
                    executor_label: None,
                },
                PhysicalStage {
                    stage_id: 1,
                    schedule_group_index: 1,
                    task_groups: vec![TaskGroup {
                        task_group_id: "t10".to_owned(),
                        stage_id: 1,
                        tasks: vec![Task {
                            task_id: "t10-0".to_owned(),
                            ir_vertex_id: "v2".to_owned(),
                            kind: TaskKind::Normal,
                        }],
                    }],
                    executor_label: None,
                },
            ],
            edges: vec![],
        }
    }

    #[test]
    fn stage_completes_exactly_when_all_task_groups_complete() {
        let plan = plan_two_stages();
        let manager = JobStateManager::new(&plan);
        manager.on_stage_state_changed(0, StageState::Executing).unwrap();
        manager.on_task_group_state_changed("t00", TaskGroupState::Executing).unwrap();
        manager.on_task_group_state_changed("t01", TaskGroupState::Executing).unwrap();

        assert!(!manager.check_stage_completion(0));
        manager.on_task_group_state_changed("t00", TaskGroupState::Complete).unwrap();
        assert!(!manager.check_stage_completion(0));

        let became_complete = manager
            .on_task_group_state_changed("t01", TaskGroupState::Complete)
            .unwrap();
        assert!(became_complete);
        assert!(manager.check_stage_completion(0));
        assert_eq!(manager.stage_state(0), Some(StageState::Complete));
    }

    #[test]
    fn attempt_count_increments_only_on_entering_executing() {
        let plan = plan_two_stages();
        let manager = JobStateManager::new(&plan);
        assert_eq!(manager.attempt_count_for_stage(0), 0);

        manager.on_stage_state_changed(0, StageState::Executing).unwrap();
        assert_eq!(manager.attempt_count_for_stage(0), 1);

        manager
            .on_stage_state_changed(0, StageState::FailedRecoverable)
            .unwrap();
        manager.on_stage_state_changed(0, StageState::Ready).unwrap();
        manager.on_stage_state_changed(0, StageState::Executing).unwrap();
        assert_eq!(manager.attempt_count_for_stage(0), 2);
    }

    #[test]
    fn illegal_transition_is_rejected() {
        let plan = plan_two_stages();
        let manager = JobStateManager::new(&plan);
        let result = manager.on_stage_state_changed(0, StageState::Complete);
        assert!(matches!(
            result,
            Err(SchedulerError::IllegalStateTransition { .. })
        ));
    }

    #[test]
    fn job_completes_only_via_legal_edges() {
        let plan = plan_two_stages();
        let manager = JobStateManager::new(&plan);
        assert!(manager.set_job_state(JobState::Complete).is_err());
        manager.set_job_state(JobState::Executing).unwrap();
        manager.set_job_state(JobState::Complete).unwrap();
        assert!(manager.check_job_termination());
    }
}
