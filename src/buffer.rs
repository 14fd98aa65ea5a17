//! Image buffers and their pixel-addressable refinement.

use alloc::sync::Arc;
use alloc::vec::Vec;

use arrayvec::ArrayVec;

use crate::error::Error;
use crate::frame::Plane;
use crate::types::{PixelFormat, VideoDimensions};

/// Maximum number of planes a pixel buffer can carry.
pub const MAX_PLANES: usize = 4;

/// What backs an image buffer's memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackingKind {
    /// Memory is directly addressable by pixel row.
    Pixel,
    /// A GPU texture or surface not mapped into this process.
    Texture,
    Opaque,
}

/// Owned memory for one plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaneData {
    pub data: Vec<u8>,
    pub bytes_per_row: usize,
    pub height: usize,
}

#[derive(Debug)]
struct PixelStorage {
    pixel_format: PixelFormat,
    planes: ArrayVec<PlaneData, MAX_PLANES>,
}

#[derive(Debug)]
enum Backing {
    Pixel(PixelStorage),
    Texture,
    Opaque,
}

#[derive(Debug)]
struct Inner {
    size: VideoDimensions,
    backing: Backing,
}

/// A handle to a frame's backing memory.
///
/// Cloning is cheap and yields another handle onto the same memory.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    inner: Arc<Inner>,
}

impl ImageBuffer {
    /// Build a pixel-addressable buffer from owned planes.
    ///
    /// The number of planes must match the pixel format and every plane must
    /// hold at least `bytes_per_row * height` bytes.
    pub fn from_planes(
        pixel_format: PixelFormat,
        size: VideoDimensions,
        planes: impl IntoIterator<Item = PlaneData>,
    ) -> Result<Self, Error> {
        let mut stored = ArrayVec::<PlaneData, MAX_PLANES>::new();
        let mut count = 0;
        for plane in planes {
            count += 1;
            // An overflowing size can never be satisfied.
            let required = plane
                .bytes_per_row
                .checked_mul(plane.height)
                .unwrap_or(usize::MAX);
            if plane.data.len() < required {
                return Err(Error::PlaneTooSmall {
                    index: count - 1,
                    required,
                    actual: plane.data.len(),
                });
            }
            // Surplus planes only matter to the count check below.
            let _ = stored.try_push(plane);
        }
        if count != pixel_format.plane_count() {
            return Err(Error::PlaneCountMismatch {
                expected: pixel_format.plane_count(),
                actual: count,
            });
        }
        Ok(Self::from_backing(
            size,
            Backing::Pixel(PixelStorage {
                pixel_format,
                planes: stored,
            }),
        ))
    }

    /// Build a single-plane (packed) pixel buffer.
    pub fn packed(
        pixel_format: PixelFormat,
        size: VideoDimensions,
        bytes_per_row: usize,
        data: Vec<u8>,
    ) -> Result<Self, Error> {
        let height = size.height.max(0) as usize;
        Self::from_planes(
            pixel_format,
            size,
            [PlaneData {
                data,
                bytes_per_row,
                height,
            }],
        )
    }

    /// A buffer backed by a texture that is not pixel-addressable here.
    pub fn texture(size: VideoDimensions) -> Self {
        Self::from_backing(size, Backing::Texture)
    }

    pub fn opaque(size: VideoDimensions) -> Self {
        Self::from_backing(size, Backing::Opaque)
    }

    fn from_backing(size: VideoDimensions, backing: Backing) -> Self {
        Self {
            inner: Arc::new(Inner { size, backing }),
        }
    }

    pub fn backing_kind(&self) -> BackingKind {
        match self.inner.backing {
            Backing::Pixel(_) => BackingKind::Pixel,
            Backing::Texture => BackingKind::Texture,
            Backing::Opaque => BackingKind::Opaque,
        }
    }

    /// Encoded display size.
    pub fn size(&self) -> VideoDimensions {
        self.inner.size
    }

    /// Whether `other` is a handle onto the very same memory.
    pub fn same_handle(&self, other: &ImageBuffer) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Checked narrowing: `Some` only for pixel-addressable buffers.
    pub fn as_pixel_buffer(&self) -> Option<&PixelBuffer> {
        try_narrow_to_pixel_buffer(self)
    }

    fn pixels(&self) -> Option<&PixelStorage> {
        match &self.inner.backing {
            Backing::Pixel(storage) => Some(storage),
            Backing::Texture | Backing::Opaque => None,
        }
    }
}

/// An [`ImageBuffer`] whose memory is directly pixel-addressable.
#[derive(Debug)]
#[repr(transparent)]
pub struct PixelBuffer(ImageBuffer);

impl PixelBuffer {
    /// Widen back to the general image buffer. Always valid.
    pub fn as_image_buffer(&self) -> &ImageBuffer {
        &self.0
    }

    pub fn width(&self) -> usize {
        self.0.size().width.max(0) as usize
    }

    pub fn height(&self) -> usize {
        self.0.size().height.max(0) as usize
    }

    pub fn size(&self) -> VideoDimensions {
        self.0.size()
    }

    // The `Option`s below are only ever `None` when a caller broke the
    // narrowing contract; they degrade to empty values.

    pub fn pixel_format(&self) -> Option<PixelFormat> {
        self.0.pixels().map(|p| p.pixel_format)
    }

    pub fn plane_count(&self) -> usize {
        self.0.pixels().map_or(0, |p| p.planes.len())
    }

    /// Bytes per row of the first plane.
    pub fn bytes_per_row(&self) -> usize {
        self.0
            .pixels()
            .and_then(|p| p.planes.first())
            .map_or(0, |plane| plane.bytes_per_row)
    }

    /// Borrowed views of every plane, in order.
    pub fn planes(&self) -> ArrayVec<Plane<'_>, MAX_PLANES> {
        self.0
            .pixels()
            .map(|p| {
                p.planes
                    .iter()
                    .map(|plane| Plane {
                        data: &plane.data,
                        bytes_per_row: plane.bytes_per_row,
                        height: plane.height,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Re-type an image buffer as a pixel buffer, without checking.
///
/// # Safety
///
/// `buffer.backing_kind()` must be [`BackingKind::Pixel`]. The capture
/// pipeline is expected to guarantee this upstream, typically by configuring
/// video output to always emit pixel-addressable buffers. Use
/// [`try_narrow_to_pixel_buffer`] when that is not established.
pub unsafe fn narrow_to_pixel_buffer(buffer: &ImageBuffer) -> &PixelBuffer {
    debug_assert_eq!(buffer.backing_kind(), BackingKind::Pixel);
    // SAFETY: `PixelBuffer` is `repr(transparent)` over `ImageBuffer`.
    unsafe { &*(buffer as *const ImageBuffer as *const PixelBuffer) }
}

/// Checked narrowing; `None` if the buffer is not pixel-addressable.
pub fn try_narrow_to_pixel_buffer(buffer: &ImageBuffer) -> Option<&PixelBuffer> {
    if buffer.backing_kind() == BackingKind::Pixel {
        // SAFETY: backing kind checked above.
        Some(unsafe { narrow_to_pixel_buffer(buffer) })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn bgra_2x2() -> ImageBuffer {
        let data = vec![
            1, 2, 3, 255, 4, 5, 6, 255, //
            7, 8, 9, 255, 10, 11, 12, 255,
        ];
        ImageBuffer::packed(PixelFormat::Bgra32, VideoDimensions::new(2, 2), 8, data).unwrap()
    }

    #[test]
    fn pixel_narrowing_shares_memory() {
        let image = bgra_2x2();
        let pixels = unsafe { narrow_to_pixel_buffer(&image) };
        assert!(core::ptr::eq(pixels.as_image_buffer(), &image));

        let planes = pixels.planes();
        assert_eq!(planes.len(), 1);
        let Backing::Pixel(storage) = &image.inner.backing else {
            panic!("expected pixel backing");
        };
        assert!(core::ptr::eq(planes[0].data.as_ptr(), storage.planes[0].data.as_ptr()));
        assert_eq!(planes[0].row(1), Some(&[7u8, 8, 9, 255, 10, 11, 12, 255][..]));
    }

    #[test]
    fn pixel_buffer_accessors() {
        let image = bgra_2x2();
        let pixels = image.as_pixel_buffer().unwrap();
        assert_eq!(pixels.width(), 2);
        assert_eq!(pixels.height(), 2);
        assert_eq!(pixels.pixel_format(), Some(PixelFormat::Bgra32));
        assert_eq!(pixels.plane_count(), 1);
        assert_eq!(pixels.bytes_per_row(), 8);
    }

    #[test]
    fn biplanar_nv12() {
        let size = VideoDimensions::new(4, 2);
        let luma = PlaneData {
            data: vec![16; 4 * 2],
            bytes_per_row: 4,
            height: 2,
        };
        let chroma = PlaneData {
            data: vec![128; 4],
            bytes_per_row: 4,
            height: 1,
        };
        let image = ImageBuffer::from_planes(PixelFormat::Nv12, size, [luma, chroma]).unwrap();
        let pixels = image.as_pixel_buffer().unwrap();
        let planes = pixels.planes();
        assert_eq!(planes.len(), 2);
        assert_eq!(planes[1].height, 1);
        assert!(planes[1].data.iter().all(|&b| b == 128));
    }

    #[test]
    fn short_planes_are_rejected() {
        let err =
            ImageBuffer::packed(PixelFormat::Bgra32, VideoDimensions::new(2, 2), 8, vec![0; 10])
                .unwrap_err();
        assert!(matches!(
            err,
            Error::PlaneTooSmall {
                index: 0,
                required: 16,
                actual: 10
            }
        ));
    }

    #[test]
    fn overflowing_plane_size_is_rejected() {
        let plane = PlaneData {
            data: vec![0; 4],
            bytes_per_row: usize::MAX / 2 + 2,
            height: 2,
        };
        let err = ImageBuffer::from_planes(PixelFormat::Bgra32, VideoDimensions::new(1, 2), [plane])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::PlaneTooSmall {
                index: 0,
                required: usize::MAX,
                actual: 4
            }
        ));
    }

    #[test]
    fn plane_count_must_match_format() {
        let plane = PlaneData {
            data: vec![0; 8],
            bytes_per_row: 4,
            height: 2,
        };
        let err = ImageBuffer::from_planes(PixelFormat::Nv12, VideoDimensions::new(4, 2), [plane])
            .unwrap_err();
        assert!(matches!(err, Error::PlaneCountMismatch { expected: 2, actual: 1 }));
    }

    #[test]
    fn checked_narrowing_rejects_non_pixel_backing() {
        let texture = ImageBuffer::texture(VideoDimensions::new(1920, 1080));
        assert_eq!(texture.backing_kind(), BackingKind::Texture);
        assert!(try_narrow_to_pixel_buffer(&texture).is_none());
        assert!(ImageBuffer::opaque(VideoDimensions::default()).as_pixel_buffer().is_none());
    }
}
