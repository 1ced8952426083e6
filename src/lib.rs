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

//! Core of a distributed dataflow job scheduler: the master-side
//! component that takes a compiled physical execution plan for a single
//! batch job and drives it to completion across a dynamic pool of remote
//! executors.
//!
//! The IR-to-physical-plan compiler, the block/shuffle data-manager
//! master, the executor processes, the RPC transport, the naming service
//! and the cluster-resource provider are all external collaborators; this
//! crate fixes their contracts as traits (see [`collaborators`]) and does
//! not implement them.

pub mod collaborators;
pub mod config;
pub mod error;
pub mod event;
pub mod id;
pub mod metrics;
pub mod model;
pub mod pending_queue;
pub mod policy;
pub mod queue;
pub mod runner;
pub mod scheduler;
pub mod state;

pub mod test_utils;

pub use error::{Result, SchedulerError};
pub use scheduler::BatchSingleJobScheduler;
