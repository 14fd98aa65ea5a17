use core::fmt;

/// A four-character code, as used for media types, media subtypes and pixel
/// format identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FourCc(pub u32);

impl FourCc {
    pub const fn new(code: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(code))
    }

    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.to_bytes() {
            if byte.is_ascii_graphic() || byte == b' ' {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "\\x{byte:02x}")?;
            }
        }
        Ok(())
    }
}

/// The kind of media a format descriptor describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Audio,
    Video,
    /// Any other media type (muxed, text, metadata, ...), keeping its code.
    Other(FourCc),
}

impl MediaKind {
    pub const AUDIO_MEDIA_TYPE: FourCc = FourCc::new(*b"soun");
    pub const VIDEO_MEDIA_TYPE: FourCc = FourCc::new(*b"vide");

    pub fn from_media_type(media_type: FourCc) -> Self {
        match media_type {
            Self::AUDIO_MEDIA_TYPE => Self::Audio,
            Self::VIDEO_MEDIA_TYPE => Self::Video,
            other => Self::Other(other),
        }
    }

    pub fn media_type(&self) -> FourCc {
        match self {
            Self::Audio => Self::AUDIO_MEDIA_TYPE,
            Self::Video => Self::VIDEO_MEDIA_TYPE,
            Self::Other(code) => *code,
        }
    }
}

/// Pixel formats encountered in capture pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PixelFormat {
    Nv12,
    Yuyv,
    Uyvy,
    Bgra32,
    Jpeg,
}

impl PixelFormat {
    /// Map a `kCVPixelFormatType` code to a pixel format.
    pub fn from_fourcc(fourcc: FourCc) -> Option<Self> {
        #[allow(clippy::mistyped_literal_suffixes)]
        match fourcc.0 {
            0x34_32_30_76 => Some(Self::Nv12),   // '420v'
            0x34_32_30_66 => Some(Self::Nv12),   // '420f'
            0x79_75_76_73 => Some(Self::Yuyv),   // 'yuvs'
            0x79_75_76_32 => Some(Self::Yuyv),   // 'yuv2'
            0x32_76_75_79 => Some(Self::Uyvy),   // '2vuy'
            0x42_47_52_41 => Some(Self::Bgra32), // 'BGRA'
            0x6A_70_65_67 => Some(Self::Jpeg),   // 'jpeg'
            _ => None,
        }
    }

    pub fn fourcc(&self) -> FourCc {
        #[allow(clippy::mistyped_literal_suffixes)]
        let code = match self {
            Self::Nv12 => 0x34_32_30_76,   // '420v'
            Self::Yuyv => 0x79_75_76_73,   // 'yuvs'
            Self::Uyvy => 0x32_76_75_79,   // '2vuy'
            Self::Bgra32 => 0x42_47_52_41, // 'BGRA'
            Self::Jpeg => 0x6A_70_65_67,   // 'jpeg'
        };
        FourCc(code)
    }

    /// Number of planes a buffer of this format carries.
    pub fn plane_count(&self) -> usize {
        match self {
            Self::Nv12 => 2,
            _ => 1,
        }
    }
}

/// Width and height of a video stream, in pixels.
///
/// Signed to match what capture descriptors report; a descriptor that
/// carries no video dimensions reports `0x0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct VideoDimensions {
    pub width: i32,
    pub height: i32,
}

impl VideoDimensions {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// The basic stream parameters carried by an audio format descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioStreamDescription {
    /// Audio data format, e.g. `lpcm` or `aac `.
    pub format_id: FourCc,
    pub sample_rate: f64,
    pub channels: u32,
    /// Zero for compressed formats.
    pub bits_per_channel: u32,
}

/// A presentation timestamp mirroring Core Media's `CMTime`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SampleTime {
    /// The numerator of the time value (ticks).
    pub value: i64,
    /// Ticks per second.
    pub timescale: i32,
    /// CMTime flags (valid, has been rounded, positive/negative infinity, indefinite).
    pub flags: u32,
    /// Distinguishes separate timelines that may restart from zero.
    pub epoch: i64,
}

impl SampleTime {
    const FLAG_VALID: u32 = 1;

    pub const INVALID: SampleTime = SampleTime {
        value: 0,
        timescale: 0,
        flags: 0,
        epoch: 0,
    };

    pub const fn new(value: i64, timescale: i32) -> Self {
        Self {
            value,
            timescale,
            flags: Self::FLAG_VALID,
            epoch: 0,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.flags & Self::FLAG_VALID != 0
    }

    pub fn as_secs_f64(&self) -> f64 {
        if self.timescale > 0 {
            self.value as f64 / self.timescale as f64
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fourcc_display() {
        assert_eq!(FourCc::new(*b"vide").to_string(), "vide");
        assert_eq!(FourCc(0x6175_6400).to_string(), "aud\\x00");
    }

    #[test]
    fn media_kind_from_media_type() {
        assert_eq!(MediaKind::from_media_type(FourCc::new(*b"soun")), MediaKind::Audio);
        assert_eq!(MediaKind::from_media_type(FourCc::new(*b"vide")), MediaKind::Video);
        let text = FourCc::new(*b"text");
        assert_eq!(MediaKind::from_media_type(text), MediaKind::Other(text));
        assert_eq!(MediaKind::Other(text).media_type(), text);
    }

    #[test]
    fn pixel_format_fourcc_mapping() {
        assert_eq!(PixelFormat::from_fourcc(FourCc::new(*b"BGRA")), Some(PixelFormat::Bgra32));
        assert_eq!(PixelFormat::from_fourcc(FourCc::new(*b"420f")), Some(PixelFormat::Nv12));
        assert_eq!(PixelFormat::from_fourcc(FourCc::new(*b"xxxx")), None);
        assert_eq!(PixelFormat::Uyvy.fourcc(), FourCc::new(*b"2vuy"));
    }

    #[test]
    fn nv12_is_biplanar() {
        assert_eq!(PixelFormat::Nv12.plane_count(), 2);
        assert_eq!(PixelFormat::Bgra32.plane_count(), 1);
    }

    #[test]
    fn sample_time_seconds() {
        let t = SampleTime::new(1001, 30000);
        assert!(t.is_valid());
        assert!((t.as_secs_f64() - 0.033366).abs() < 1e-6);
        assert!(!SampleTime::INVALID.is_valid());
        assert_eq!(SampleTime::INVALID.as_secs_f64(), 0.0);
    }
}
