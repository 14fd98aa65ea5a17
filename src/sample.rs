use crate::buffer::ImageBuffer;
use crate::format::FormatDescriptor;
use crate::types::SampleTime;

/// One timed media sample as delivered by a capture output.
///
/// Video samples carry an image buffer; audio samples usually do not.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    format: FormatDescriptor,
    image_buffer: Option<ImageBuffer>,
    presentation_time: SampleTime,
}

impl SampleBuffer {
    pub fn new(
        format: FormatDescriptor,
        image_buffer: Option<ImageBuffer>,
        presentation_time: SampleTime,
    ) -> Self {
        Self {
            format,
            image_buffer,
            presentation_time,
        }
    }

    pub fn format_descriptor(&self) -> &FormatDescriptor {
        &self.format
    }

    pub fn image_buffer(&self) -> Option<&ImageBuffer> {
        self.image_buffer.as_ref()
    }

    pub fn presentation_time(&self) -> SampleTime {
        self.presentation_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FourCc, VideoDimensions};

    #[test]
    fn sample_keeps_handles() {
        let dims = VideoDimensions::new(640, 480);
        let format = FormatDescriptor::video(FourCc::new(*b"BGRA"), dims);
        let image = ImageBuffer::texture(dims);
        let sample = SampleBuffer::new(format.clone(), Some(image.clone()), SampleTime::new(3, 30));

        assert!(sample.format_descriptor().same_handle(&format));
        assert!(sample.image_buffer().unwrap().same_handle(&image));
        assert_eq!(sample.presentation_time().as_secs_f64(), 0.1);
    }
}
