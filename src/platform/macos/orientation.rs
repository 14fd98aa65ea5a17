#![allow(deprecated)]

use objc2_av_foundation::AVCaptureVideoOrientation;

use crate::orientation::CaptureOrientation;

impl From<CaptureOrientation> for AVCaptureVideoOrientation {
    fn from(orientation: CaptureOrientation) -> Self {
        AVCaptureVideoOrientation(orientation.as_raw() as isize)
    }
}

/// `None` for raw values outside the four capture orientations.
pub fn capture_orientation_from_av(
    orientation: AVCaptureVideoOrientation,
) -> Option<CaptureOrientation> {
    CaptureOrientation::from_raw(orientation.0 as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn av_orientation_round_trip() {
        for o in [
            CaptureOrientation::Portrait,
            CaptureOrientation::PortraitUpsideDown,
            CaptureOrientation::LandscapeLeft,
            CaptureOrientation::LandscapeRight,
        ] {
            assert_eq!(capture_orientation_from_av(o.into()), Some(o));
        }
        assert_eq!(capture_orientation_from_av(AVCaptureVideoOrientation(0)), None);
    }
}
