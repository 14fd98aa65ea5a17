use std::ptr::{self, NonNull};

use objc2_core_foundation::CFRetained;
use objc2_core_media::{
    CMBufferQueue, CMBufferQueueCreate, CMBufferQueueGetCallbacksForUnsortedSampleBuffers,
};

use crate::error::{BufferQueueError, check_status};

/// Create a Core Media buffer queue of sample buffers, kept in enqueue order.
///
/// `capacity` of `0` means unbounded. A failed creation never yields a queue:
/// the status is mapped to a [`BufferQueueError`] and anything Core Media
/// may have written is discarded.
pub fn create_core_media_buffer_queue(
    capacity: usize,
) -> Result<CFRetained<CMBufferQueue>, BufferQueueError> {
    let result = try_create(capacity);
    match &result {
        Ok(_) => tracing::debug!(capacity, "created Core Media buffer queue"),
        Err(e) => tracing::warn!(
            status = e.code(),
            capacity,
            "Core Media buffer queue creation failed: {e}"
        ),
    }
    result
}

fn try_create(capacity: usize) -> Result<CFRetained<CMBufferQueue>, BufferQueueError> {
    let capacity = isize::try_from(capacity).map_err(|_| BufferQueueError::ResourceExhausted)?;

    let mut queue: *const CMBufferQueue = ptr::null();
    let callbacks = unsafe { CMBufferQueueGetCallbacksForUnsortedSampleBuffers() };
    let status =
        unsafe { CMBufferQueueCreate(None, capacity, callbacks, NonNull::from(&mut queue)) };
    check_status(status)?;

    let queue = NonNull::new(queue.cast_mut()).ok_or(BufferQueueError::ResourceExhausted)?;
    // SAFETY: `CMBufferQueueCreate` follows the create rule, so the caller
    // owns the +1 reference written to `queue`.
    Ok(unsafe { CFRetained::from_raw(queue) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_distinct_queues() {
        let queues: Vec<_> = (0..10)
            .map(|i| create_core_media_buffer_queue(i % 2).unwrap())
            .collect();
        for (i, a) in queues.iter().enumerate() {
            for b in &queues[i + 1..] {
                assert!(!ptr::eq(&**a, &**b));
            }
        }
    }

    #[test]
    fn unrepresentable_capacity_yields_no_queue() {
        assert_eq!(
            create_core_media_buffer_queue(usize::MAX).unwrap_err(),
            BufferQueueError::ResourceExhausted
        );
    }
}
