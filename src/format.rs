//! Format descriptors and their audio refinement.
//!
//! A [`FormatDescriptor`] is a shared, reference-counted handle. Narrowing it
//! to an [`AudioFormatDescriptor`] reinterprets the handle in place: no copy
//! is made and no reference count changes.

use alloc::sync::Arc;

use crate::types::{AudioStreamDescription, FourCc, MediaKind, VideoDimensions};

#[derive(Debug, PartialEq)]
enum MediaDetails {
    Audio(Option<AudioStreamDescription>),
    Video(VideoDimensions),
    None,
}

#[derive(Debug, PartialEq)]
struct Inner {
    kind: MediaKind,
    media_subtype: FourCc,
    details: MediaDetails,
}

/// Describes the format of one media stream (audio, video or other).
///
/// Cloning is cheap and yields another handle onto the same description.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatDescriptor {
    inner: Arc<Inner>,
}

impl FormatDescriptor {
    pub fn video(media_subtype: FourCc, dimensions: VideoDimensions) -> Self {
        Self::from_parts(MediaKind::Video, media_subtype, MediaDetails::Video(dimensions))
    }

    pub fn audio(media_subtype: FourCc, stream: AudioStreamDescription) -> Self {
        Self::from_parts(MediaKind::Audio, media_subtype, MediaDetails::Audio(Some(stream)))
    }

    /// A descriptor with a media type and subtype but no further details.
    ///
    /// Audio descriptors built this way report no stream description and
    /// video descriptors report `0x0` dimensions.
    pub fn bare(media_type: FourCc, media_subtype: FourCc) -> Self {
        let kind = MediaKind::from_media_type(media_type);
        let details = match kind {
            MediaKind::Audio => MediaDetails::Audio(None),
            MediaKind::Video => MediaDetails::Video(VideoDimensions::default()),
            MediaKind::Other(_) => MediaDetails::None,
        };
        Self::from_parts(kind, media_subtype, details)
    }

    fn from_parts(kind: MediaKind, media_subtype: FourCc, details: MediaDetails) -> Self {
        Self {
            inner: Arc::new(Inner {
                kind,
                media_subtype,
                details,
            }),
        }
    }

    pub fn media_kind(&self) -> MediaKind {
        self.inner.kind
    }

    pub fn media_subtype(&self) -> FourCc {
        self.inner.media_subtype
    }

    /// Whether `other` is a handle onto the very same description.
    pub fn same_handle(&self, other: &FormatDescriptor) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Checked narrowing: `Some` only if this descriptor describes audio.
    pub fn as_audio(&self) -> Option<&AudioFormatDescriptor> {
        try_narrow_to_audio_descriptor(self)
    }

    /// Video dimensions, or `0x0` if this descriptor carries none.
    pub fn video_dimensions(&self) -> VideoDimensions {
        get_video_dimensions(self)
    }
}

/// The audio-specific refinement of a [`FormatDescriptor`].
///
/// Only ever obtained by narrowing; it shares its representation with the
/// general descriptor.
#[derive(Debug, PartialEq)]
#[repr(transparent)]
pub struct AudioFormatDescriptor(FormatDescriptor);

impl AudioFormatDescriptor {
    /// Widen back to the general descriptor. Always valid.
    pub fn as_descriptor(&self) -> &FormatDescriptor {
        &self.0
    }

    /// The basic stream parameters, if the source recorded them.
    pub fn stream_description(&self) -> Option<AudioStreamDescription> {
        match self.0.inner.details {
            MediaDetails::Audio(stream) => stream,
            _ => None,
        }
    }

    pub fn media_subtype(&self) -> FourCc {
        self.0.media_subtype()
    }
}

/// Re-type a format descriptor as its audio refinement, without checking.
///
/// # Safety
///
/// `descriptor.media_kind()` must be [`MediaKind::Audio`]. This is a
/// reinterpretation of the handle, not a validating parse; consumers of an
/// [`AudioFormatDescriptor`] (including platform code handed its address)
/// assume the audio kind holds. Use [`try_narrow_to_audio_descriptor`] when
/// the kind is not already established upstream.
pub unsafe fn narrow_to_audio_descriptor(descriptor: &FormatDescriptor) -> &AudioFormatDescriptor {
    debug_assert_eq!(descriptor.media_kind(), MediaKind::Audio);
    // SAFETY: `AudioFormatDescriptor` is `repr(transparent)` over
    // `FormatDescriptor`, so the layouts are identical.
    unsafe { &*(descriptor as *const FormatDescriptor as *const AudioFormatDescriptor) }
}

/// Checked narrowing; `None` if the descriptor is not audio.
pub fn try_narrow_to_audio_descriptor(
    descriptor: &FormatDescriptor,
) -> Option<&AudioFormatDescriptor> {
    if descriptor.media_kind() == MediaKind::Audio {
        // SAFETY: kind checked above.
        Some(unsafe { narrow_to_audio_descriptor(descriptor) })
    } else {
        None
    }
}

/// Read the width and height of a video format descriptor.
///
/// Callers gate on [`MediaKind::Video`] first. For any other kind this
/// reports whatever the descriptor carries, which is `0x0` here.
pub fn get_video_dimensions(descriptor: &FormatDescriptor) -> VideoDimensions {
    match descriptor.inner.details {
        MediaDetails::Video(dimensions) => dimensions,
        _ => VideoDimensions::default(),
    }
}
