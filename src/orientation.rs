//! Mapping from physical device orientation to capture orientation.

use core::f64::consts::{FRAC_PI_2, PI};

/// Physical orientation reported by the host device.
///
/// Raw values match `UIDeviceOrientation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i64)]
pub enum DeviceOrientation {
    #[default]
    Unknown = 0,
    Portrait = 1,
    PortraitUpsideDown = 2,
    /// Device held landscape with the home button on the right.
    LandscapeLeft = 3,
    /// Device held landscape with the home button on the left.
    LandscapeRight = 4,
    FaceUp = 5,
    FaceDown = 6,
}

impl DeviceOrientation {
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            0 => Some(Self::Unknown),
            1 => Some(Self::Portrait),
            2 => Some(Self::PortraitUpsideDown),
            3 => Some(Self::LandscapeLeft),
            4 => Some(Self::LandscapeRight),
            5 => Some(Self::FaceUp),
            6 => Some(Self::FaceDown),
            _ => None,
        }
    }

    pub fn as_raw(self) -> i64 {
        self as i64
    }

    /// Portrait or landscape, as opposed to flat or unknown.
    pub fn is_axis_aligned(self) -> bool {
        try_map_orientation(self).is_some()
    }
}

/// Rotation consumed by the capture pipeline.
///
/// Raw values match `AVCaptureVideoOrientation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i64)]
pub enum CaptureOrientation {
    #[default]
    Portrait = 1,
    PortraitUpsideDown = 2,
    LandscapeRight = 3,
    LandscapeLeft = 4,
}

impl CaptureOrientation {
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            1 => Some(Self::Portrait),
            2 => Some(Self::PortraitUpsideDown),
            3 => Some(Self::LandscapeRight),
            4 => Some(Self::LandscapeLeft),
            _ => None,
        }
    }

    pub fn as_raw(self) -> i64 {
        self as i64
    }

    /// Rotation of this orientation relative to portrait, in radians.
    pub fn angle_offset(self) -> f64 {
        match self {
            Self::Portrait => 0.0,
            Self::PortraitUpsideDown => PI,
            Self::LandscapeLeft => FRAC_PI_2,
            Self::LandscapeRight => -FRAC_PI_2,
        }
    }

    /// Angle, in radians, that rotates video captured in this orientation
    /// into `reference`.
    pub fn rotation_to(self, reference: CaptureOrientation) -> f64 {
        reference.angle_offset() - self.angle_offset()
    }
}

/// Capture orientation used for device orientations with no capture
/// equivalent: face-up, face-down and unknown.
pub const FALLBACK_CAPTURE_ORIENTATION: CaptureOrientation = CaptureOrientation::Portrait;

/// Map a device orientation to the capture orientation that keeps video
/// upright.
///
/// Landscape is swapped: the capture sensor's landscape rotation runs
/// opposite to the device's home-button-relative convention. Flat and
/// unknown orientations map to [`FALLBACK_CAPTURE_ORIENTATION`]; use
/// [`try_map_orientation`] to keep the previous orientation instead.
pub fn map_orientation(device_orientation: DeviceOrientation) -> CaptureOrientation {
    try_map_orientation(device_orientation).unwrap_or_else(|| {
        tracing::trace!(
            ?device_orientation,
            fallback = ?FALLBACK_CAPTURE_ORIENTATION,
            "no capture orientation for device orientation"
        );
        FALLBACK_CAPTURE_ORIENTATION
    })
}

/// Strict mapping; `None` for face-up, face-down and unknown.
pub fn try_map_orientation(device_orientation: DeviceOrientation) -> Option<CaptureOrientation> {
    match device_orientation {
        DeviceOrientation::Portrait => Some(CaptureOrientation::Portrait),
        DeviceOrientation::PortraitUpsideDown => Some(CaptureOrientation::PortraitUpsideDown),
        DeviceOrientation::LandscapeLeft => Some(CaptureOrientation::LandscapeRight),
        DeviceOrientation::LandscapeRight => Some(CaptureOrientation::LandscapeLeft),
        DeviceOrientation::FaceUp | DeviceOrientation::FaceDown | DeviceOrientation::Unknown => {
            None
        }
    }
}
