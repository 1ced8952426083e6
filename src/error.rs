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

use std::fmt;

pub type Result<T> = std::result::Result<T, SchedulerError>;

/// Errors raised by the scheduler core.
///
/// `LateMessage` is intentionally absent: a state-change event whose
/// attempt index is stale is not an error, it is logged and dropped.
#[derive(Debug)]
pub enum SchedulerError {
    /// A requested state-machine edge does not exist.
    IllegalStateTransition {
        entity: String,
        from: String,
        to: String,
    },
    /// A received execution state value falls outside the enumeration.
    UnknownExecutionState { value: String },
    /// E.g. an attempt index greater than the stage's current attempt.
    SchedulingFault { detail: String },
    /// A failure cause falls outside the enumeration.
    UnknownFailureCause { value: String },
    /// The executor reported an unrecoverable failure.
    UnrecoverableFailure { detail: String },
    /// A `put` was attempted on a closed `ClosableQueue`.
    QueueClosed,
    /// Catch-all for collaborator failures that don't fit the taxonomy above.
    Internal(String),
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SchedulerError::IllegalStateTransition { entity, from, to } => {
                write!(f, "illegal state transition for {entity}: {from} -> {to}")
            }
            SchedulerError::UnknownExecutionState { value } => {
                write!(f, "unknown execution state: {value}")
            }
            SchedulerError::SchedulingFault { detail } => {
                write!(f, "scheduling fault: {detail}")
            }
            SchedulerError::UnknownFailureCause { value } => {
                write!(f, "unknown failure cause: {value}")
            }
            SchedulerError::UnrecoverableFailure { detail } => {
                write!(f, "unrecoverable failure: {detail}")
            }
            SchedulerError::QueueClosed => write!(f, "queue is closed"),
            SchedulerError::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for SchedulerError {}
