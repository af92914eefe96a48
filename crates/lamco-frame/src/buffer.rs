//! Pixel buffers
//!
//! A [`PixelBuffer`] is a set of byte planes tagged with its size and
//! [`PixelFormat`]. Buffers handed out by a
//! [`PixelBufferPool`](crate::pool::PixelBufferPool) remember the pool they
//! came from and give their storage back to it when dropped, so the pool
//! keeps ownership of the memory across the buffer's lifetime while the
//! buffer itself can be moved into a sample and across threads.

use std::fmt;
use std::sync::Weak;

use crate::error::PoolError;
use crate::format::{checked_aligned_stride, FrameSize, PixelFormat, PlaneDimensions};
use crate::pool::{PoolId, PoolShared};

/// One plane of a [`PixelBuffer`]
#[derive(Clone)]
pub struct Plane {
    data: Vec<u8>,
    stride: usize,
    row_bytes: usize,
    rows: usize,
}

impl Plane {
    /// `None` if the plane's byte size overflows
    pub(crate) fn allocate(dims: PlaneDimensions, row_alignment: usize) -> Option<Self> {
        let stride = checked_aligned_stride(dims.row_bytes, row_alignment)?;
        let len = stride
            .checked_mul(dims.rows)
            .filter(|&len| len <= isize::MAX as usize)?;
        Some(Self {
            data: vec![0; len],
            stride,
            row_bytes: dims.row_bytes,
            rows: dims.rows,
        })
    }

    /// Bytes between the starts of consecutive rows
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Visible bytes per row
    pub fn row_bytes(&self) -> usize {
        self.row_bytes
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Raw plane storage including stride padding
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw plane storage including stride padding
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Visible bytes of one row
    pub fn row(&self, row: usize) -> Option<&[u8]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.stride;
        self.data.get(start..start + self.row_bytes)
    }

    /// Visible bytes of the whole plane with stride padding removed
    pub fn packed(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.row_bytes * self.rows);
        for row in self.data.chunks(self.stride.max(1)).take(self.rows) {
            out.extend_from_slice(&row[..self.row_bytes]);
        }
        out
    }
}

impl fmt::Debug for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plane")
            .field("stride", &self.stride)
            .field("row_bytes", &self.row_bytes)
            .field("rows", &self.rows)
            .finish()
    }
}

/// Image buffer with one or more planes
///
/// Plane layout is fixed at allocation. Outside this crate planes are
/// read-only, so a buffer cannot be handed back to its pool with planes
/// swapped for a different geometry:
///
/// ```compile_fail
/// use lamco_frame::{FrameSize, PixelBuffer, PixelFormat};
///
/// let mut buffer = PixelBuffer::detached(FrameSize::new(4, 4), PixelFormat::Nv12, 64).unwrap();
/// let _planes = buffer.planes_mut();
/// ```
pub struct PixelBuffer {
    size: FrameSize,
    format: PixelFormat,
    planes: Vec<Plane>,
    origin: Option<(PoolId, Weak<PoolShared>)>,
}

impl PixelBuffer {
    /// Allocate a buffer that does not belong to any pool
    ///
    /// Used for native buffers produced outside the renderer, such as
    /// frames a hardware decoder hands over already in a displayable format.
    ///
    /// Fails with [`PoolError::InvalidGeometry`] if the geometry is too
    /// large to address. Zero-sized buffers are allowed and have empty planes.
    pub fn detached(size: FrameSize, format: PixelFormat, row_alignment: usize) -> Result<Self, PoolError> {
        let planes = format
            .plane_dimensions(size)
            .into_iter()
            .map(|dims| Plane::allocate(dims, row_alignment))
            .collect::<Option<Vec<_>>>()
            .ok_or(PoolError::InvalidGeometry(size))?;

        Ok(Self {
            size,
            format,
            planes,
            origin: None,
        })
    }

    pub(crate) fn from_pool(
        size: FrameSize,
        format: PixelFormat,
        planes: Vec<Plane>,
        id: PoolId,
        pool: Weak<PoolShared>,
    ) -> Self {
        Self {
            size,
            format,
            planes,
            origin: Some((id, pool)),
        }
    }

    /// Buffer dimensions
    pub fn size(&self) -> FrameSize {
        self.size
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Pixel layout
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Pool that owns this buffer's storage, if any
    pub fn pool_id(&self) -> Option<PoolId> {
        self.origin.as_ref().map(|(id, _)| *id)
    }

    /// Number of planes
    pub fn plane_count(&self) -> usize {
        self.planes.len()
    }

    /// Plane by index (0 = luma for YUV layouts)
    pub fn plane(&self, index: usize) -> Option<&Plane> {
        self.planes.get(index)
    }

    /// Mutable access to all planes
    pub(crate) fn planes_mut(&mut self) -> &mut [Plane] {
        &mut self.planes
    }

    /// Total allocated bytes across planes
    pub fn byte_len(&self) -> usize {
        self.planes.iter().map(|plane| plane.data.len()).sum()
    }
}

impl Drop for PixelBuffer {
    fn drop(&mut self) {
        if let Some((_, pool)) = self.origin.take() {
            // A discarded pool frees the storage instead
            if let Some(pool) = pool.upgrade() {
                pool.recycle(std::mem::take(&mut self.planes));
            }
        }
    }
}

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("size", &self.size)
            .field("format", &self.format)
            .field("planes", &self.planes)
            .field("pool", &self.pool_id())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detached_nv12_layout() {
        let buffer = PixelBuffer::detached(FrameSize::new(4, 4), PixelFormat::Nv12, 64).expect("detached buffer");

        assert_eq!(buffer.plane_count(), 2);
        assert_eq!(buffer.pool_id(), None);

        let luma = buffer.plane(0).expect("luma plane");
        assert_eq!(luma.stride(), 64);
        assert_eq!(luma.row_bytes(), 4);
        assert_eq!(luma.rows(), 4);

        let chroma = buffer.plane(1).expect("chroma plane");
        assert_eq!(chroma.row_bytes(), 4);
        assert_eq!(chroma.rows(), 2);
        assert_eq!(buffer.byte_len(), 64 * 4 + 64 * 2);
    }

    #[test]
    fn test_detached_rejects_unaddressable_geometry() {
        let size = FrameSize::new(u32::MAX, u32::MAX);
        let result = PixelBuffer::detached(size, PixelFormat::Bgra, 64);
        assert!(matches!(result, Err(PoolError::InvalidGeometry(s)) if s == size));
    }

    #[test]
    fn test_row_access() {
        let mut buffer = PixelBuffer::detached(FrameSize::new(2, 2), PixelFormat::Bgra, 16).expect("detached buffer");
        let plane = &mut buffer.planes_mut()[0];
        let stride = plane.stride();
        plane.data_mut()[stride..stride + 8].copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);

        let plane = buffer.plane(0).expect("plane");
        assert_eq!(plane.row(1), Some(&[1, 2, 3, 4, 5, 6, 7, 8][..]));
        assert_eq!(plane.row(2), None);
        assert_eq!(plane.packed().len(), 16);
    }
}
