use objc2_core_video::{
    CVImageBuffer, CVPixelBuffer, CVPixelBufferGetBaseAddress, CVPixelBufferGetBaseAddressOfPlane,
    CVPixelBufferGetBytesPerRow, CVPixelBufferGetBytesPerRowOfPlane, CVPixelBufferGetHeight,
    CVPixelBufferGetHeightOfPlane, CVPixelBufferGetPixelFormatType, CVPixelBufferGetPlaneCount,
    CVPixelBufferGetWidth, CVPixelBufferLockBaseAddress, CVPixelBufferLockFlags,
    CVPixelBufferUnlockBaseAddress,
};

use crate::buffer::{ImageBuffer, PlaneData};
use crate::error::{Error, PlatformError};
use crate::types::{FourCc, PixelFormat, VideoDimensions};

/// Re-type a Core Video image buffer as a pixel buffer, without checking.
///
/// # Safety
///
/// `buffer` must be backed by pixel-addressable memory, e.g. because the
/// video data output was configured with a pixel format type.
#[allow(clippy::needless_lifetimes)]
pub unsafe fn narrow_core_video_pixel_buffer<'a>(buffer: &'a CVImageBuffer) -> &'a CVPixelBuffer {
    buffer
}

/// Copy a Core Video pixel buffer into an [`ImageBuffer`].
///
/// Locks the base address read-only for the duration of the copy.
pub fn import_pixel_buffer(pixel_buffer: &CVPixelBuffer) -> Result<ImageBuffer, Error> {
    let fourcc = FourCc(CVPixelBufferGetPixelFormatType(pixel_buffer));
    let pixel_format = PixelFormat::from_fourcc(fourcc).ok_or(Error::UnsupportedFormat)?;
    let size = VideoDimensions::new(
        CVPixelBufferGetWidth(pixel_buffer) as i32,
        CVPixelBufferGetHeight(pixel_buffer) as i32,
    );

    let lock_flags = CVPixelBufferLockFlags::ReadOnly;
    let status = unsafe { CVPixelBufferLockBaseAddress(pixel_buffer, lock_flags) };
    if status != 0 {
        return Err(PlatformError::CoreVideo(status).into());
    }

    // SAFETY: base address locked above until the unlock below.
    let planes = unsafe { copy_locked_planes(pixel_buffer) };

    let status = unsafe { CVPixelBufferUnlockBaseAddress(pixel_buffer, lock_flags) };
    if status != 0 {
        // The planes are already copied, so the import still succeeds.
        tracing::warn!(status, "failed to unlock pixel buffer base address");
    }

    ImageBuffer::from_planes(pixel_format, size, planes)
}

/// SAFETY: The pixel buffer base address must be locked.
unsafe fn copy_locked_planes(pixel_buffer: &CVPixelBuffer) -> Vec<PlaneData> {
    let plane_count = CVPixelBufferGetPlaneCount(pixel_buffer);
    if plane_count == 0 {
        // Non-planar: single plane
        let base = CVPixelBufferGetBaseAddress(pixel_buffer);
        let bytes_per_row = CVPixelBufferGetBytesPerRow(pixel_buffer);
        let height = CVPixelBufferGetHeight(pixel_buffer);
        return unsafe { copy_plane(base.cast(), bytes_per_row, height) }
            .into_iter()
            .collect();
    }

    (0..plane_count)
        .filter_map(|i| {
            let base = CVPixelBufferGetBaseAddressOfPlane(pixel_buffer, i);
            let bytes_per_row = CVPixelBufferGetBytesPerRowOfPlane(pixel_buffer, i);
            let height = CVPixelBufferGetHeightOfPlane(pixel_buffer, i);
            unsafe { copy_plane(base.cast(), bytes_per_row, height) }
        })
        .collect()
}

/// SAFETY: `base` must be null or point to `bytes_per_row * height`
/// readable bytes.
unsafe fn copy_plane(base: *const u8, bytes_per_row: usize, height: usize) -> Option<PlaneData> {
    if base.is_null() {
        return None;
    }
    let len = bytes_per_row.checked_mul(height)?;
    let data = unsafe { std::slice::from_raw_parts(base, len) };
    Some(PlaneData {
        data: data.to_vec(),
        bytes_per_row,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_plane_is_skipped() {
        assert!(unsafe { copy_plane(std::ptr::null(), 4, 2) }.is_none());
    }

    #[test]
    fn plane_copy_spans_every_row() {
        let bytes = [1u8, 2, 3, 4, 5, 6];
        let plane = unsafe { copy_plane(bytes.as_ptr(), 3, 2) }.unwrap();
        assert_eq!(plane.data, bytes);
        assert_eq!((plane.bytes_per_row, plane.height), (3, 2));
    }
}
