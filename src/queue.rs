//! FIFO buffer queues for handing media buffers from a capture producer to a
//! consumer, and the factory that creates them.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::BufferQueueError;
use crate::sample::SampleBuffer;

static NEXT_QUEUE_ID: AtomicU64 = AtomicU64::new(1);

/// Configuration for a new buffer queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BufferQueueConfig {
    /// Maximum number of queued buffers. `0` means unbounded.
    pub capacity: usize,
}

impl BufferQueueConfig {
    pub fn unbounded() -> Self {
        Self { capacity: 0 }
    }

    pub fn bounded(capacity: usize) -> Self {
        Self { capacity }
    }

    pub fn is_bounded(&self) -> bool {
        self.capacity > 0
    }
}

/// Creates buffer queues, optionally within a budget of live queues.
///
/// Clones share the budget.
#[derive(Debug, Clone, Default)]
pub struct BufferQueueFactory {
    limit: Option<usize>,
    live: Arc<AtomicUsize>,
}

impl BufferQueueFactory {
    /// A factory with no limit on live queues.
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory that fails with [`BufferQueueError::ResourceExhausted`]
    /// once `max_live` queues created by it are alive.
    pub fn with_limit(max_live: usize) -> Self {
        Self {
            limit: Some(max_live),
            live: Arc::default(),
        }
    }

    /// Number of queues created by this factory that are still alive.
    pub fn live_queues(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }

    /// Create a new, empty queue. Ownership passes entirely to the caller;
    /// on failure nothing is allocated and no budget is consumed.
    pub fn create<T>(&self, config: BufferQueueConfig) -> Result<BufferQueue<T>, BufferQueueError> {
        let result = self.try_create(config);
        if let Err(e) = &result {
            tracing::warn!(
                status = e.code(),
                live = self.live_queues(),
                limit = ?self.limit,
                "buffer queue creation failed: {e}"
            );
        }
        result
    }

    fn try_create<T>(&self, config: BufferQueueConfig) -> Result<BufferQueue<T>, BufferQueueError> {
        let lease = self.reserve()?;

        let mut buffers = VecDeque::<T>::new();
        if config.is_bounded() {
            buffers
                .try_reserve_exact(config.capacity)
                .map_err(|_| BufferQueueError::ResourceExhausted)?;
        }

        let id = NEXT_QUEUE_ID.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(queue_id = id, capacity = config.capacity, "created buffer queue");

        Ok(BufferQueue {
            shared: Arc::new(Shared {
                id,
                capacity: config.capacity,
                state: Mutex::new(State {
                    buffers,
                    end_of_data: false,
                }),
                _lease: lease,
            }),
        })
    }

    fn reserve(&self) -> Result<Lease, BufferQueueError> {
        match self.limit {
            Some(limit) => self
                .live
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |live| {
                    (live < limit).then_some(live + 1)
                })
                .map_err(|_| BufferQueueError::ResourceExhausted)?,
            None => self.live.fetch_add(1, Ordering::AcqRel),
        };
        Ok(Lease {
            live: self.live.clone(),
        })
    }
}

/// Create an unbounded queue with no live-queue budget.
pub fn create_buffer_queue<T>() -> Result<BufferQueue<T>, BufferQueueError> {
    create_buffer_queue_with(BufferQueueConfig::default())
}

pub fn create_buffer_queue_with<T>(
    config: BufferQueueConfig,
) -> Result<BufferQueue<T>, BufferQueueError> {
    BufferQueueFactory::new().create(config)
}

/// Returns its budget slot to the factory when the queue is released.
#[derive(Debug)]
struct Lease {
    live: Arc<AtomicUsize>,
}

impl Drop for Lease {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::AcqRel);
    }
}

#[derive(Debug)]
struct State<T> {
    buffers: VecDeque<T>,
    end_of_data: bool,
}

#[derive(Debug)]
struct Shared<T> {
    id: u64,
    capacity: usize,
    state: Mutex<State<T>>,
    _lease: Lease,
}

/// An ordered FIFO of media buffers.
///
/// Handles are cheap to clone and all refer to the same queue, so a
/// producer and a consumer on different threads can each hold one. The
/// queue is released when the last handle is dropped.
#[derive(Debug)]
pub struct BufferQueue<T = SampleBuffer> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for BufferQueue<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T> BufferQueue<T> {
    fn state(&self) -> MutexGuard<'_, State<T>> {
        self.shared.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Process-unique identifier of this queue.
    pub fn id(&self) -> u64 {
        self.shared.id
    }

    /// Maximum number of buffers, `0` if unbounded.
    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    /// Whether `other` is a handle onto the same queue.
    pub fn same_queue(&self, other: &BufferQueue<T>) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Append a buffer at the tail.
    pub fn enqueue(&self, buffer: T) -> Result<(), BufferQueueError> {
        let mut state = self.state();
        if state.end_of_data {
            return Err(BufferQueueError::EnqueueAfterEndOfData);
        }
        if self.shared.capacity > 0 && state.buffers.len() >= self.shared.capacity {
            return Err(BufferQueueError::QueueIsFull);
        }
        state.buffers.push_back(buffer);
        Ok(())
    }

    /// Remove and return the buffer at the head.
    pub fn dequeue(&self) -> Option<T> {
        self.state().buffers.pop_front()
    }

    /// A copy of the handle at the head, leaving it queued.
    pub fn head(&self) -> Option<T>
    where
        T: Clone,
    {
        self.state().buffers.front().cloned()
    }

    pub fn len(&self) -> usize {
        self.state().buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().buffers.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.shared.capacity > 0 && self.len() >= self.shared.capacity
    }

    /// Drop every queued buffer and clear the end-of-data mark.
    pub fn reset(&self) {
        let mut state = self.state();
        let dropped = state.buffers.len();
        state.buffers.clear();
        state.end_of_data = false;
        tracing::debug!(queue_id = self.shared.id, dropped, "reset buffer queue");
    }

    /// Refuse further enqueues until the next [`reset`](Self::reset).
    pub fn mark_end_of_data(&self) {
        self.state().end_of_data = true;
        tracing::debug!(queue_id = self.shared.id, "marked end of data");
    }

    /// End of data was marked and every buffer has been dequeued.
    pub fn is_at_end_of_data(&self) -> bool {
        let state = self.state();
        state.end_of_data && state.buffers.is_empty()
    }
}
