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

//! The physical plan data model: stages, task groups, tasks, and the
//! per-entity state machines the scheduler drives.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

pub type PlanId = String;
pub type StageId = u32;
pub type TaskGroupId = String;
pub type TaskId = String;
pub type ExecutorId = String;

/// A distinguished task variant whose `OnHold` completion triggers dynamic
/// plan optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskKind {
    Normal,
    MetricCollectionBarrier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: TaskId,
    /// The IR vertex this task was compiled from.
    pub ir_vertex_id: String,
    pub kind: TaskKind,
}

impl Task {
    pub fn is_barrier(&self) -> bool {
        matches!(self.kind, TaskKind::MetricCollectionBarrier)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskGroup {
    pub task_group_id: TaskGroupId,
    pub stage_id: StageId,
    pub tasks: Vec<Task>,
}

impl TaskGroup {
    /// The `MetricCollectionBarrierTask`, if this group carries one.
    pub fn barrier_task(&self) -> Option<&Task> {
        self.tasks.iter().find(|t| t.is_barrier())
    }
}

/// Whether a stage edge is a pull (shuffle) edge or a push edge. Push
/// edges require the consumer to be scheduled before or simultaneously
/// with the producer within one schedule group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageEdgeKind {
    Shuffle,
    Push,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalStageEdge {
    pub from_stage: StageId,
    pub to_stage: StageId,
    pub kind: StageEdgeKind,
}

/// Executor class a stage may be pinned to by the resource substrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutorLabel {
    Transient,
    Reserved,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalStage {
    pub stage_id: StageId,
    pub schedule_group_index: u32,
    pub task_groups: Vec<TaskGroup>,
    /// `None` means the stage has no executor-class preference.
    pub executor_label: Option<ExecutorLabel>,
}

impl PhysicalStage {
    pub fn task_group_ids(&self) -> impl Iterator<Item = &TaskGroupId> {
        self.task_groups.iter().map(|tg| &tg.task_group_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicalPlan {
    pub plan_id: PlanId,
    pub stages: Vec<PhysicalStage>,
    pub edges: Vec<PhysicalStageEdge>,
}

impl PhysicalPlan {
    pub fn stage(&self, stage_id: StageId) -> Option<&PhysicalStage> {
        self.stages.iter().find(|s| s.stage_id == stage_id)
    }

    pub fn stage_of_task_group(&self, task_group_id: &str) -> Option<&PhysicalStage> {
        self.stages
            .iter()
            .find(|s| s.task_groups.iter().any(|tg| tg.task_group_id == task_group_id))
    }

    /// The lowest `scheduleGroupIndex` across all stages, i.e.
    /// `initialScheduleGroup`.
    pub fn min_schedule_group_index(&self) -> Option<u32> {
        self.stages.iter().map(|s| s.schedule_group_index).min()
    }

    pub fn stages_in_schedule_group(&self, index: u32) -> Vec<&PhysicalStage> {
        self.stages
            .iter()
            .filter(|s| s.schedule_group_index == index)
            .collect()
    }

    pub fn incoming_edges(&self, stage_id: StageId) -> Vec<PhysicalStageEdge> {
        self.edges
            .iter()
            .filter(|e| e.to_stage == stage_id)
            .cloned()
            .collect()
    }

    pub fn outgoing_edges(&self, stage_id: StageId) -> Vec<PhysicalStageEdge> {
        self.edges
            .iter()
            .filter(|e| e.from_stage == stage_id)
            .cloned()
            .collect()
    }

    /// All stages reachable from `stage_id` by following edges forward
    /// (producer -> consumer), including `stage_id` itself.
    pub fn stage_and_descendants(&self, stage_id: StageId) -> HashSet<StageId> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();
        seen.insert(stage_id);
        queue.push_back(stage_id);

        while let Some(current) = queue.pop_front() {
            for edge in self.outgoing_edges(current) {
                if seen.insert(edge.to_stage) {
                    queue.push_back(edge.to_stage);
                }
            }
        }

        seen
    }

    /// Order the given stages so that consumers are scheduled before (or
    /// with) their producers within the group: a topological sort over
    /// producer -> consumer edges restricted to this set, reversed.
    pub fn reverse_topological(&self, stage_ids: &[StageId]) -> Vec<StageId> {
        let members: HashSet<StageId> = stage_ids.iter().copied().collect();
        let mut in_degree: HashMap<StageId, usize> =
            stage_ids.iter().map(|id| (*id, 0)).collect();
        let mut adjacency: HashMap<StageId, Vec<StageId>> = HashMap::new();

        for edge in &self.edges {
            if members.contains(&edge.from_stage) && members.contains(&edge.to_stage) {
                adjacency
                    .entry(edge.from_stage)
                    .or_default()
                    .push(edge.to_stage);
                *in_degree.entry(edge.to_stage).or_insert(0) += 1;
            }
        }

        let mut ready: VecDeque<StageId> = stage_ids
            .iter()
            .copied()
            .filter(|id| in_degree.get(id).copied().unwrap_or(0) == 0)
            .collect();

        let mut topo = Vec::with_capacity(stage_ids.len());
        while let Some(stage_id) = ready.pop_front() {
            topo.push(stage_id);
            if let Some(children) = adjacency.get(&stage_id) {
                for child in children {
                    if let Some(degree) = in_degree.get_mut(child) {
                        *degree -= 1;
                        if *degree == 0 {
                            ready.push_back(*child);
                        }
                    }
                }
            }
        }

        topo.reverse();
        topo
    }
}

/// The message handed to an executor to launch a task group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledTaskGroup {
    pub plan_id: PlanId,
    pub task_group: TaskGroup,
    pub incoming_stage_edges: Vec<PhysicalStageEdge>,
    pub outgoing_stage_edges: Vec<PhysicalStageEdge>,
    pub attempt_idx: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    Ready,
    Executing,
    Complete,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageState {
    Ready,
    Executing,
    Complete,
    FailedRecoverable,
    FailedUnrecoverable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskGroupState {
    Ready,
    Executing,
    Complete,
    OnHold,
    FailedRecoverable,
    FailedUnrecoverable,
}

/// Cause reported alongside a `FailedRecoverable` task-group transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureCause {
    InputReadFailure,
    OutputWriteFailure,
    ContainerFailure,
}

/// Attempt index that bypasses the late-message guard: used when
/// re-injecting task groups evicted by a lost executor, since there is no
/// single well-defined "current attempt" those messages are replying to.
pub const BYPASS_ATTEMPT_IDX: u32 = u32::MAX;

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(from: StageId, to: StageId, kind: StageEdgeKind) -> PhysicalStageEdge {
        PhysicalStageEdge {
            from_stage: from,
            to_stage: to,
            kind,
        }
    }

    fn stage(stage_id: StageId, schedule_group_index: u32) -> PhysicalStage {
        PhysicalStage {
            stage_id,
            schedule_group_index,
            task_groups: vec![],
            executor_label: None,
        }
    }

    #[test]
    fn reverse_topological_orders_children_first() {
        let plan = PhysicalPlan {
            plan_id: "p".to_owned(),
            stages: vec![stage(0, 0), stage(1, 0), stage(2, 0)],
            edges: vec![
                edge(0, 1, StageEdgeKind::Push),
                edge(1, 2, StageEdgeKind::Push),
            ],
        };

        let order = plan.reverse_topological(&[0, 1, 2]);
        assert_eq!(order, vec![2, 1, 0]);
    }

    #[test]
    fn stage_and_descendants_follows_edges_forward() {
        let plan = PhysicalPlan {
            plan_id: "p".to_owned(),
            stages: vec![stage(0, 0), stage(1, 1), stage(2, 2)],
            edges: vec![
                edge(0, 1, StageEdgeKind::Shuffle),
                edge(1, 2, StageEdgeKind::Shuffle),
            ],
        };

        let descendants = plan.stage_and_descendants(0);
        assert_eq!(descendants, HashSet::from([0, 1, 2]));

        let descendants = plan.stage_and_descendants(1);
        assert_eq!(descendants, HashSet::from([1, 2]));
    }

    #[test]
    fn min_schedule_group_index_finds_initial_group() {
        let plan = PhysicalPlan {
            plan_id: "p".to_owned(),
            stages: vec![stage(0, 2), stage(1, 0), stage(2, 1)],
            edges: vec![],
        };

        assert_eq!(plan.min_schedule_group_index(), Some(0));
    }
}
