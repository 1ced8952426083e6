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

#[cfg(feature = "prometheus-metrics")]
pub mod prometheus;

use crate::error::Result;

/// Collector for scheduler-observable job-lifecycle metrics.
pub trait SchedulerMetricsCollector: Send + Sync {
    fn record_submitted(&self, job_id: &str, submitted_at_millis: u64);
    fn record_completed(&self, job_id: &str, submitted_at_millis: u64, completed_at_millis: u64);
    fn record_failed(&self, job_id: &str);
    fn set_pending_task_groups(&self, value: u64);
    /// Encode the current metric snapshot, if this collector supports it.
    fn gather_metrics(&self) -> Result<Option<(Vec<u8>, String)>>;
}

/// Collector that just logs; the default when no metrics backend is wired
/// up.
#[derive(Default)]
pub struct LoggingMetricsCollector;

impl SchedulerMetricsCollector for LoggingMetricsCollector {
    fn record_submitted(&self, job_id: &str, _submitted_at_millis: u64) {
        log::info!("job {job_id} submitted");
    }

    fn record_completed(
        &self,
        job_id: &str,
        submitted_at_millis: u64,
        completed_at_millis: u64,
    ) {
        log::info!(
            "job {job_id} completed in {}ms",
            completed_at_millis.saturating_sub(submitted_at_millis)
        );
    }

    fn record_failed(&self, job_id: &str) {
        log::warn!("job {job_id} failed");
    }

    fn set_pending_task_groups(&self, value: u64) {
        log::debug!("pending task groups: {value}");
    }

    fn gather_metrics(&self) -> Result<Option<(Vec<u8>, String)>> {
        Ok(None)
    }
}
