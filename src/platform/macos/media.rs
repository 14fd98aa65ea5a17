use objc2_core_audio_types::AudioStreamBasicDescription;
use objc2_core_media::{
    CMAudioFormatDescription, CMAudioFormatDescriptionGetStreamBasicDescription,
    CMFormatDescription, CMSampleBuffer, CMVideoFormatDescriptionGetDimensions,
};

use crate::error::Error;
use crate::format::FormatDescriptor;
use crate::platform::macos::frame::{import_pixel_buffer, narrow_core_video_pixel_buffer};
use crate::sample::SampleBuffer;
use crate::types::{AudioStreamDescription, FourCc, MediaKind, SampleTime, VideoDimensions};

/// Re-type a Core Media format description as an audio format description,
/// without checking.
///
/// # Safety
///
/// `description` must describe an audio stream.
#[allow(clippy::needless_lifetimes)]
pub unsafe fn narrow_core_media_audio_description<'a>(
    description: &'a CMFormatDescription,
) -> &'a CMAudioFormatDescription {
    description
}

/// Width and height of a video format description. `0x0` for non-video.
pub fn core_media_video_dimensions(description: &CMFormatDescription) -> VideoDimensions {
    let dims = unsafe { CMVideoFormatDescriptionGetDimensions(description) };
    VideoDimensions::new(dims.width, dims.height)
}

pub fn core_media_media_kind(description: &CMFormatDescription) -> MediaKind {
    MediaKind::from_media_type(FourCc(unsafe { description.media_type() }))
}

/// Copy a Core Media format description into a [`FormatDescriptor`].
pub fn import_format_description(description: &CMFormatDescription) -> FormatDescriptor {
    let media_type = FourCc(unsafe { description.media_type() });
    let media_subtype = FourCc(unsafe { description.media_sub_type() });
    match MediaKind::from_media_type(media_type) {
        MediaKind::Video => {
            FormatDescriptor::video(media_subtype, core_media_video_dimensions(description))
        }
        MediaKind::Audio => {
            // SAFETY: the media type says this is an audio description.
            let audio = unsafe { narrow_core_media_audio_description(description) };
            match core_media_stream_description(audio) {
                Some(stream) => FormatDescriptor::audio(media_subtype, stream),
                None => FormatDescriptor::bare(media_type, media_subtype),
            }
        }
        _ => FormatDescriptor::bare(media_type, media_subtype),
    }
}

/// The basic stream description of an audio format description, if it
/// carries one. The channel layout is not read.
pub fn core_media_stream_description(
    description: &CMAudioFormatDescription,
) -> Option<AudioStreamDescription> {
    let asbd = unsafe { CMAudioFormatDescriptionGetStreamBasicDescription(description) };
    // SAFETY: non-null results point into `description`, which outlives this read.
    unsafe { asbd.as_ref() }.map(stream_description_from_basic)
}

fn stream_description_from_basic(asbd: &AudioStreamBasicDescription) -> AudioStreamDescription {
    AudioStreamDescription {
        format_id: FourCc(asbd.mFormatID),
        sample_rate: asbd.mSampleRate,
        channels: asbd.mChannelsPerFrame,
        bits_per_channel: asbd.mBitsPerChannel,
    }
}

/// Copy a Core Media sample buffer into a [`SampleBuffer`].
///
/// # Safety
///
/// For video samples the attached image buffer must be a pixel buffer, as
/// it is when the video data output was configured with a pixel format type.
pub unsafe fn import_sample_buffer(sample_buffer: &CMSampleBuffer) -> Result<SampleBuffer, Error> {
    let description =
        unsafe { sample_buffer.format_description() }.ok_or(Error::UnsupportedFormat)?;
    let format = import_format_description(&description);

    let image_buffer = match (format.media_kind(), unsafe { sample_buffer.image_buffer() }) {
        (MediaKind::Video, Some(image)) => {
            // SAFETY: guaranteed by the caller.
            let pixel_buffer = unsafe { narrow_core_video_pixel_buffer(&image) };
            Some(import_pixel_buffer(pixel_buffer)?)
        }
        _ => None,
    };

    let cm_time = unsafe { sample_buffer.presentation_time_stamp() };
    let presentation_time = SampleTime {
        value: cm_time.value,
        timescale: cm_time.timescale,
        flags: cm_time.flags.0,
        epoch: cm_time.epoch,
    };

    Ok(SampleBuffer::new(format, image_buffer, presentation_time))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_description_maps_stream_fields() {
        let asbd = AudioStreamBasicDescription {
            mSampleRate: 44_100.0,
            mFormatID: u32::from_be_bytes(*b"lpcm"),
            mFormatFlags: 0,
            mBytesPerPacket: 4,
            mFramesPerPacket: 1,
            mBytesPerFrame: 4,
            mChannelsPerFrame: 2,
            mBitsPerChannel: 16,
            mReserved: 0,
        };
        let stream = stream_description_from_basic(&asbd);
        assert_eq!(stream.format_id, FourCc::new(*b"lpcm"));
        assert_eq!(stream.sample_rate, 44_100.0);
        assert_eq!((stream.channels, stream.bits_per_channel), (2, 16));
    }
}
