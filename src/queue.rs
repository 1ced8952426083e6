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

//! A FIFO queue with a monotonic close marker. Blocking consumers
//! (`take`/`peek`) unblock once the queue is closed and drained. Adapted
//! from the producer/consumer hand-off the original executor-side
//! block-transfer code uses, so that any shutdown path gets the same
//! graceful-drain behavior.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::error::{Result, SchedulerError};

pub struct ClosableQueue<T> {
    inner: Mutex<VecDeque<T>>,
    closed: AtomicBool,
    notify: Notify,
}

impl<T: Clone> ClosableQueue<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
            closed: AtomicBool::new(false),
            notify: Notify::new(),
        }
    }

    /// Appends `item`. Fails if the queue has been closed.
    pub fn put(&self, item: T) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(SchedulerError::QueueClosed);
        }
        self.inner.lock().push_back(item);
        self.notify.notify_waiters();
        Ok(())
    }

    /// Blocks until an element is available or the queue is closed.
    /// Returns `None` once the queue is empty and closed — the "no more
    /// elements" sentinel.
    pub async fn take(&self) -> Option<T> {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(item) = self.inner.lock().pop_front() {
                return Some(item);
            }
            if self.closed.load(Ordering::Acquire) {
                return None;
            }
            notified.await;
        }
    }

    /// Same blocking semantics as `take`, but non-destructive.
    pub async fn peek(&self) -> Option<T> {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(item) = self.inner.lock().front().cloned() {
                return Some(item);
            }
            if self.closed.load(Ordering::Acquire) {
                return None;
            }
            notified.await;
        }
    }

    /// Idempotent; wakes all waiters so they can observe closure.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.notify.notify_waiters();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl<T: Clone> Default for ClosableQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn put_then_take_round_trips() {
        let queue: ClosableQueue<i32> = ClosableQueue::new();
        queue.put(1).unwrap();
        queue.put(2).unwrap();
        assert_eq!(queue.take().await, Some(1));
        assert_eq!(queue.take().await, Some(2));
    }

    #[tokio::test]
    async fn take_blocks_until_put_then_unblocks() {
        let queue = Arc::new(ClosableQueue::<i32>::new());
        let reader = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.take().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        queue.put(42).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(1), reader)
            .await
            .expect("reader should not hang")
            .unwrap();
        assert_eq!(result, Some(42));
    }

    #[tokio::test]
    async fn close_unblocks_waiting_take_with_none() {
        let queue = Arc::new(ClosableQueue::<i32>::new());
        let reader = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.take().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        queue.close();

        let result = tokio::time::timeout(Duration::from_secs(1), reader)
            .await
            .expect("reader should not hang")
            .unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn put_after_close_fails() {
        let queue: ClosableQueue<i32> = ClosableQueue::new();
        queue.close();
        assert!(matches!(queue.put(1), Err(SchedulerError::QueueClosed)));
    }

    #[tokio::test]
    async fn peek_does_not_remove() {
        let queue: ClosableQueue<i32> = ClosableQueue::new();
        queue.put(7).unwrap();
        assert_eq!(queue.peek().await, Some(7));
        assert_eq!(queue.peek().await, Some(7));
        assert_eq!(queue.take().await, Some(7));
    }
}
