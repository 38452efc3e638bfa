//! Concurrency primitives for the scan pipeline.
//!
//! Two small building blocks shared by every walk and hash task:
//!
//! - [`Limiter`]: a counting semaphore capping how many blocking filesystem
//!   operations (directory listings, file reads) run at once. Traversal and
//!   hashing draw from the same budget, since both consume OS handles.
//! - [`TaskTracker`]: an outstanding-work counter with a blocking
//!   wait-until-zero, used to join a dynamically growing set of spawned
//!   tasks whose total count is not known up front.
//!
//! Both hand out RAII guards so a slot or a work registration is released on
//! every exit path, including panics.

use std::sync::{Arc, Condvar, Mutex};

/// Counting semaphore with a fixed capacity.
///
/// Cloning is cheap and shares the same budget; one instance is shared by
/// all tasks of a scan.
#[derive(Debug, Clone)]
pub struct Limiter {
    inner: Arc<LimiterInner>,
}

#[derive(Debug)]
struct LimiterInner {
    capacity: usize,
    in_use: Mutex<usize>,
    freed: Condvar,
}

impl Limiter {
    /// Create a limiter with the given capacity. Capacities below 1 are
    /// clamped to 1, otherwise no task could ever run.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(LimiterInner {
                capacity: capacity.max(1),
                in_use: Mutex::new(0),
                freed: Condvar::new(),
            }),
        }
    }

    /// Block until a slot is free, then take it.
    ///
    /// The slot is returned when the guard drops.
    #[must_use]
    pub fn acquire(&self) -> SlotGuard {
        let mut in_use = self
            .inner
            .in_use
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        while *in_use >= self.inner.capacity {
            in_use = self
                .inner
                .freed
                .wait(in_use)
                .unwrap_or_else(std::sync::PoisonError::into_inner);
        }
        *in_use += 1;
        SlotGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Configured capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Number of slots currently held. Used for instrumentation in tests.
    #[must_use]
    pub fn in_use(&self) -> usize {
        *self
            .inner
            .in_use
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// RAII handle for one limiter slot.
#[derive(Debug)]
pub struct SlotGuard {
    inner: Arc<LimiterInner>,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        let mut in_use = self
            .inner
            .in_use
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *in_use -= 1;
        self.inner.freed.notify_one();
    }
}

/// Outstanding-work counter for dynamically spawned tasks.
///
/// A spawner calls [`TaskTracker::register`] *before* handing the guard to
/// the spawned task, so the count can never be observed at zero while work
/// is still pending. The guard decrements when the task finishes, whether it
/// succeeded, failed, or panicked.
#[derive(Debug, Clone)]
pub struct TaskTracker {
    inner: Arc<TrackerInner>,
}

#[derive(Debug)]
struct TrackerInner {
    count: Mutex<usize>,
    zero: Condvar,
}

impl TaskTracker {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(TrackerInner {
                count: Mutex::new(0),
                zero: Condvar::new(),
            }),
        }
    }

    /// Register one unit of outstanding work.
    #[must_use]
    pub fn register(&self) -> TaskGuard {
        let mut count = self
            .inner
            .count
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *count += 1;
        TaskGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Block until every registered unit of work has completed.
    pub fn wait_until_zero(&self) {
        let mut count = self
            .inner
            .count
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        while *count > 0 {
            count = self
                .inner
                .zero
                .wait(count)
                .unwrap_or_else(std::sync::PoisonError::into_inner);
        }
    }

    /// Current number of unfinished tasks.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        *self
            .inner
            .count
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Default for TaskTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII handle for one registered unit of work.
#[derive(Debug)]
pub struct TaskGuard {
    inner: Arc<TrackerInner>,
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        let mut count = self
            .inner
            .count
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *count -= 1;
        if *count == 0 {
            self.inner.zero.notify_all();
        }
    }
}
