use thiserror::Error;

/// A Core Foundation style status code. `0` is success.
pub type OsStatus = i32;

/// Failure statuses reported by buffer queues and the buffer queue factory.
///
/// Codes match Core Media's `kCMBufferQueueError_*` values so they can be
/// handed back to platform code unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[non_exhaustive]
pub enum BufferQueueError {
    /// The queue could not be allocated, or the factory's live-queue budget
    /// is exhausted.
    #[error("buffer queue allocation failed: resources exhausted")]
    ResourceExhausted,
    #[error("cannot enqueue after end of data was marked")]
    EnqueueAfterEndOfData,
    #[error("buffer queue is full")]
    QueueIsFull,
    /// Any other non-zero status reported by a platform buffer queue.
    #[error("buffer queue call failed with status {0}")]
    Unrecognized(OsStatus),
}

impl BufferQueueError {
    pub const fn code(&self) -> OsStatus {
        match self {
            Self::ResourceExhausted => -12760,
            Self::EnqueueAfterEndOfData => -12763,
            Self::QueueIsFull => -12764,
            Self::Unrecognized(code) => *code,
        }
    }

    /// The known error for `code`; `None` for success and unknown codes.
    pub const fn from_code(code: OsStatus) -> Option<Self> {
        match code {
            -12760 => Some(Self::ResourceExhausted),
            -12763 => Some(Self::EnqueueAfterEndOfData),
            -12764 => Some(Self::QueueIsFull),
            _ => None,
        }
    }
}

/// Turn a platform buffer queue status into a result (`0` is success).
pub fn check_status(status: OsStatus) -> Result<(), BufferQueueError> {
    if status == 0 {
        return Ok(());
    }
    Err(BufferQueueError::from_code(status).unwrap_or(BufferQueueError::Unrecognized(status)))
}

/// Collapse a buffer queue result into its status code (`0` on success).
pub fn status_code<T>(result: &Result<T, BufferQueueError>) -> OsStatus {
    match result {
        Ok(_) => 0,
        Err(e) => e.code(),
    }
}

/// Platform-specific error details.
#[cfg(target_os = "macos")]
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlatformError {
    /// A non-zero `CVReturn` from Core Video.
    #[error("Core Video call failed with CVReturn {0}")]
    CoreVideo(i32),
}

/// Top-level crate error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("unsupported format")]
    UnsupportedFormat,
    #[error("plane {index} needs {required} bytes but only {actual} were provided")]
    PlaneTooSmall {
        index: usize,
        required: usize,
        actual: usize,
    },
    #[error("expected {expected} planes, got {actual}")]
    PlaneCountMismatch { expected: usize, actual: usize },
    #[error(transparent)]
    BufferQueue(#[from] BufferQueueError),
    #[cfg(target_os = "macos")]
    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_from_code() {
        for e in [
            BufferQueueError::ResourceExhausted,
            BufferQueueError::EnqueueAfterEndOfData,
            BufferQueueError::QueueIsFull,
        ] {
            assert_eq!(BufferQueueError::from_code(e.code()), Some(e));
        }
        assert_eq!(BufferQueueError::from_code(0), None);
        assert_eq!(BufferQueueError::from_code(-1), None);
    }

    #[test]
    fn check_status_maps_platform_codes() {
        assert_eq!(check_status(0), Ok(()));
        assert_eq!(check_status(-12764), Err(BufferQueueError::QueueIsFull));
        assert_eq!(check_status(-12760), Err(BufferQueueError::ResourceExhausted));
        assert_eq!(check_status(-108), Err(BufferQueueError::Unrecognized(-108)));
        assert_eq!(status_code(&check_status(-108)), -108);
    }

    #[test]
    fn unrecognized_status_keeps_its_code() {
        let e = BufferQueueError::Unrecognized(-50);
        assert_eq!(e.code(), -50);
        assert_eq!(e.to_string(), "buffer queue call failed with status -50");
    }

    #[test]
    fn status_code_is_zero_on_success() {
        let ok: Result<(), BufferQueueError> = Ok(());
        assert_eq!(status_code(&ok), 0);
        let err: Result<(), BufferQueueError> = Err(BufferQueueError::QueueIsFull);
        assert_eq!(status_code(&err), -12764);
    }

    #[test]
    fn queue_errors_convert_into_crate_error() {
        let e: Error = BufferQueueError::ResourceExhausted.into();
        assert!(matches!(e, Error::BufferQueue(BufferQueueError::ResourceExhausted)));
        assert_eq!(e.to_string(), "buffer queue allocation failed: resources exhausted");
    }

    #[cfg(target_os = "macos")]
    #[test]
    fn core_video_status_converts_into_crate_error() {
        let e: Error = PlatformError::CoreVideo(-6661).into();
        assert!(matches!(e, Error::Platform(PlatformError::CoreVideo(-6661))));
        assert_eq!(e.to_string(), "platform error: Core Video call failed with CVReturn -6661");
    }
}
