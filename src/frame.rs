/// A single plane of image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plane<'a> {
    pub data: &'a [u8],
    pub bytes_per_row: usize,
    pub height: usize,
}

impl Plane<'_> {
    /// Borrow one row of the plane, including any row padding.
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.bytes_per_row)?;
        let end = start.checked_add(self.bytes_per_row)?;
        self.data.get(start..end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_sliced_by_stride() {
        let data = [0u8, 1, 2, 3, 10, 11, 12, 13];
        let plane = Plane {
            data: &data,
            bytes_per_row: 4,
            height: 2,
        };
        assert_eq!(plane.row(1), Some(&[10u8, 11, 12, 13][..]));
        assert_eq!(plane.row(2), None);
    }

    #[test]
    fn oversized_stride_yields_no_rows() {
        let data = [0u8; 4];
        let plane = Plane {
            data: &data,
            bytes_per_row: usize::MAX / 2 + 2,
            height: 2,
        };
        assert_eq!(plane.row(0), None);
        assert_eq!(plane.row(1), None);
    }
}
