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
//

//! Scheduler core configuration.

use crate::policy::TaskDistribution;

/// Configuration for a single `BatchSingleJobScheduler` instance.
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    /// How the scheduling policy should spread tasks across executors
    /// when several are equally eligible.
    pub task_distribution: TaskDistribution,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            task_distribution: TaskDistribution::Bias,
        }
    }
}

impl SchedulerConfig {
    pub fn with_task_distribution(mut self, distribution: TaskDistribution) -> Self {
        self.task_distribution = distribution;
        self
    }
}
