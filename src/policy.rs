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

//! Executor placement. `CapacityLabelPolicy` is the "Pado-like" policy:
//! labeled stages stick to their matching executor class, unlabeled
//! stages prefer transient capacity first.

use std::collections::HashSet;

use dashmap::DashMap;

use crate::model::{ExecutorId, ExecutorLabel, TaskGroup, TaskGroupId};

/// How a policy should spread placements across equally-eligible
/// executors when more than one qualifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TaskDistribution {
    /// Pack onto the least-loaded executor, breaking ties by executor id.
    Bias,
    /// Spread round-robin across eligible executors.
    RoundRobin,
}

/// Placement and capacity-accounting contract a scheduler runner drives.
pub trait SchedulingPolicy: Send + Sync {
    /// Choose an executor for `task_group`, honoring `executor_label` if
    /// its owning stage has one. `None` means no executor is currently
    /// eligible; the caller should retry later.
    ///
    /// Takes the label directly rather than a whole job-state-manager
    /// handle, since that manager doesn't carry stage-label metadata in
    /// this data model — the caller already has it from the plan.
    fn schedule_task_group(
        &self,
        task_group: &TaskGroup,
        executor_label: Option<ExecutorLabel>,
    ) -> Option<ExecutorId>;

    fn on_executor_added(&self, executor_id: ExecutorId, capacity: u32, label: ExecutorLabel);

    /// Evict an executor from the pool and return the task groups that
    /// were running on it and must be re-executed.
    fn on_executor_removed(&self, executor_id: &ExecutorId) -> HashSet<TaskGroupId>;

    fn on_task_group_execution_complete(&self, executor_id: &ExecutorId, task_group_id: &TaskGroupId);

    fn on_task_group_execution_failed(&self, executor_id: &ExecutorId, task_group_id: &TaskGroupId);
}

struct ExecutorSlot {
    capacity: u32,
    label: ExecutorLabel,
    running: HashSet<TaskGroupId>,
}

impl ExecutorSlot {
    fn load(&self) -> usize {
        self.running.len()
    }

    fn has_room(&self) -> bool {
        self.running.len() < self.capacity as usize
    }
}

/// The Pado-like capacity/label policy: stages labeled `Transient`/
/// `Reserved` run only on executors of that class; unlabeled stages
/// prefer transient capacity, falling back to reserved.
pub struct CapacityLabelPolicy {
    executors: DashMap<ExecutorId, ExecutorSlot>,
    distribution: TaskDistribution,
    round_robin_cursor: std::sync::atomic::AtomicUsize,
}

impl CapacityLabelPolicy {
    pub fn new(distribution: TaskDistribution) -> Self {
        Self {
            executors: DashMap::new(),
            distribution,
            round_robin_cursor: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    fn eligible_executors(&self, label: Option<ExecutorLabel>) -> Vec<ExecutorId> {
        let preferred: Vec<ExecutorLabel> = match label {
            Some(l) => vec![l],
            None => vec![ExecutorLabel::Transient, ExecutorLabel::Reserved],
        };

        for class in preferred {
            let mut matching: Vec<ExecutorId> = self
                .executors
                .iter()
                .filter(|entry| entry.label == class && entry.has_room())
                .map(|entry| entry.key().clone())
                .collect();
            if !matching.is_empty() {
                matching.sort();
                return matching;
            }
        }
        Vec::new()
    }

    fn pick(&self, candidates: &[ExecutorId]) -> Option<ExecutorId> {
        if candidates.is_empty() {
            return None;
        }
        match self.distribution {
            TaskDistribution::Bias => candidates
                .iter()
                .min_by_key(|id| {
                    let load = self
                        .executors
                        .get(*id)
                        .map(|slot| slot.load())
                        .unwrap_or(usize::MAX);
                    (load, (*id).clone())
                })
                .cloned(),
            TaskDistribution::RoundRobin => {
                let cursor = self
                    .round_robin_cursor
                    .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                candidates.get(cursor % candidates.len()).cloned()
            }
        }
    }
}

impl SchedulingPolicy for CapacityLabelPolicy {
    fn schedule_task_group(
        &self,
        task_group: &TaskGroup,
        executor_label: Option<ExecutorLabel>,
    ) -> Option<ExecutorId> {
        let candidates = self.eligible_executors(executor_label);
        let chosen = self.pick(&candidates)?;
        self.executors
            .get_mut(&chosen)
            .map(|mut slot| slot.running.insert(task_group.task_group_id.clone()));
        Some(chosen)
    }

    fn on_executor_added(&self, executor_id: ExecutorId, capacity: u32, label: ExecutorLabel) {
        self.executors.insert(
            executor_id,
            ExecutorSlot {
                capacity,
                label,
                running: HashSet::new(),
            },
        );
    }

    fn on_executor_removed(&self, executor_id: &ExecutorId) -> HashSet<TaskGroupId> {
        self.executors
            .remove(executor_id)
            .map(|(_, slot)| slot.running)
            .unwrap_or_default()
    }

    fn on_task_group_execution_complete(&self, executor_id: &ExecutorId, task_group_id: &TaskGroupId) {
        if let Some(mut slot) = self.executors.get_mut(executor_id) {
            slot.running.remove(task_group_id);
        }
    }

    fn on_task_group_execution_failed(&self, executor_id: &ExecutorId, task_group_id: &TaskGroupId) {
        if let Some(mut slot) = self.executors.get_mut(executor_id) {
            slot.running.remove(task_group_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Task, TaskKind};

    fn task_group(id: &str) -> TaskGroup {
        TaskGroup {
            task_group_id: id.to_owned(),
            stage_id: 0,
            tasks: vec![Task {
                task_id: format!("{id}-0"),
                ir_vertex_id: "v0".to_owned(),
                kind: TaskKind::Normal,
            }],
        }
    }

    #[test]
    fn prefers_transient_then_falls_back_to_reserved() {
        let policy = CapacityLabelPolicy::new(TaskDistribution::Bias);
        policy.on_executor_added("reserved-1".to_owned(), 4, ExecutorLabel::Reserved);

        let chosen = policy
            .schedule_task_group(&task_group("tg-1"), None)
            .expect("reserved executor should be used when no transient exists");
        assert_eq!(chosen, "reserved-1");

        policy.on_executor_added("transient-1".to_owned(), 4, ExecutorLabel::Transient);
        let chosen = policy
            .schedule_task_group(&task_group("tg-2"), None)
            .expect("transient executor should now be preferred");
        assert_eq!(chosen, "transient-1");
    }

    #[test]
    fn labeled_stage_only_uses_matching_class() {
        let policy = CapacityLabelPolicy::new(TaskDistribution::Bias);
        policy.on_executor_added("transient-1".to_owned(), 4, ExecutorLabel::Transient);

        let chosen = policy.schedule_task_group(&task_group("tg-1"), Some(ExecutorLabel::Reserved));
        assert_eq!(chosen, None);
    }

    #[test]
    fn ties_broken_by_least_loaded_then_executor_id() {
        let policy = CapacityLabelPolicy::new(TaskDistribution::Bias);
        policy.on_executor_added("b".to_owned(), 4, ExecutorLabel::Transient);
        policy.on_executor_added("a".to_owned(), 4, ExecutorLabel::Transient);

        let chosen = policy
            .schedule_task_group(&task_group("tg-1"), None)
            .unwrap();
        assert_eq!(chosen, "a");
    }

    #[test]
    fn removed_executor_returns_its_running_task_groups() {
        let policy = CapacityLabelPolicy::new(TaskDistribution::Bias);
        policy.on_executor_added("e1".to_owned(), 4, ExecutorLabel::Transient);
        policy.schedule_task_group(&task_group("tg-1"), None);

        let lost = policy.on_executor_removed(&"e1".to_owned());
        assert_eq!(lost, HashSet::from(["tg-1".to_owned()]));
        assert!(policy.on_executor_removed(&"e1".to_owned()).is_empty());
    }

    #[test]
    fn full_executor_is_not_eligible() {
        let policy = CapacityLabelPolicy::new(TaskDistribution::Bias);
        policy.on_executor_added("e1".to_owned(), 1, ExecutorLabel::Transient);
        assert!(policy
            .schedule_task_group(&task_group("tg-1"), None)
            .is_some());
        assert!(policy
            .schedule_task_group(&task_group("tg-2"), None)
            .is_none());
    }
}
