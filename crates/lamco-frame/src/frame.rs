//! Video frames as delivered by the media pipeline
//!
//! Frames arrive either as a native buffer that a display sink can take
//! as-is, or as three I420 sample planes with independent strides. Plane
//! storage is reference counted so a frame can be cloned cheaply, e.g.
//! when a capture hook both renders it locally and passes it on to the
//! encoder.

use std::fmt;
use std::sync::Arc;

use crate::buffer::PixelBuffer;
use crate::error::{ConversionError, Result};
use crate::format::{FrameSize, PixelFormat};

/// One 8-bit sample plane with its row stride
#[derive(Clone)]
pub struct SamplePlane {
    data: Arc<[u8]>,
    stride: usize,
}

impl SamplePlane {
    /// Wrap plane bytes laid out with `stride` bytes per row
    pub fn new(data: impl Into<Arc<[u8]>>, stride: usize) -> Self {
        Self {
            data: data.into(),
            stride,
        }
    }

    /// Plane bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Bytes between the starts of consecutive rows
    pub fn stride(&self) -> usize {
        self.stride
    }
}

impl fmt::Debug for SamplePlane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SamplePlane")
            .field("len", &self.data.len())
            .field("stride", &self.stride)
            .finish()
    }
}

/// Planar YUV 4:2:0 frame data
///
/// Chroma planes are subsampled 2x2 against luma.
#[derive(Debug, Clone)]
pub struct I420Buffer {
    size: FrameSize,
    y: SamplePlane,
    u: SamplePlane,
    v: SamplePlane,
}

impl I420Buffer {
    /// Create from three planes
    pub fn new(size: FrameSize, y: SamplePlane, u: SamplePlane, v: SamplePlane) -> Self {
        Self { size, y, u, v }
    }

    /// Split a tightly packed I420 byte sequence (Y, then U, then V)
    ///
    /// Returns `None` if `data` is shorter than the geometry requires.
    pub fn from_packed(size: FrameSize, data: &[u8]) -> Option<Self> {
        let width = size.width as usize;
        let chroma = size.chroma_size();
        let chroma_width = chroma.width as usize;

        let y_len = width.checked_mul(size.height as usize)?;
        let c_len = chroma_width.checked_mul(chroma.height as usize)?;
        if data.len() < c_len.checked_mul(2)?.checked_add(y_len)? {
            return None;
        }

        Some(Self {
            size,
            y: SamplePlane::new(&data[..y_len], width),
            u: SamplePlane::new(&data[y_len..y_len + c_len], chroma_width),
            v: SamplePlane::new(&data[y_len + c_len..y_len + c_len * 2], chroma_width),
        })
    }

    /// Luma dimensions
    pub fn size(&self) -> FrameSize {
        self.size
    }

    /// Luma plane
    pub fn y(&self) -> &SamplePlane {
        &self.y
    }

    /// Cb plane
    pub fn u(&self) -> &SamplePlane {
        &self.u
    }

    /// Cr plane
    pub fn v(&self) -> &SamplePlane {
        &self.v
    }

    /// Check that every plane covers the frame geometry
    ///
    /// Runs before any destination buffer is requested, so a malformed
    /// frame never reaches the pool.
    pub fn validate(&self) -> Result<()> {
        if self.size.is_empty() {
            return Err(ConversionError::EmptyFrame);
        }

        let chroma = self.size.chroma_size();
        check_plane(self.size, "Y", &self.y, self.size.width as usize, self.size.height as usize)?;
        check_plane(self.size, "U", &self.u, chroma.width as usize, chroma.height as usize)?;
        check_plane(self.size, "V", &self.v, chroma.width as usize, chroma.height as usize)
    }

    /// Total bytes across the three planes
    pub fn byte_len(&self) -> usize {
        self.y.data.len() + self.u.data.len() + self.v.data.len()
    }
}

fn check_plane(size: FrameSize, name: &'static str, plane: &SamplePlane, row_bytes: usize, rows: usize) -> Result<()> {
    if plane.stride < row_bytes {
        return Err(ConversionError::InvalidStride {
            plane: name,
            stride: plane.stride,
            row_bytes,
        });
    }

    let needed = plane
        .stride
        .checked_mul(rows - 1)
        .and_then(|n| n.checked_add(row_bytes))
        .ok_or(ConversionError::GeometryTooLarge(size))?;
    if plane.data.len() < needed {
        return Err(ConversionError::PlaneTooSmall {
            plane: name,
            needed,
            actual: plane.data.len(),
        });
    }

    Ok(())
}

/// Frame contents
#[derive(Debug, Clone)]
pub enum FramePayload {
    /// Native buffer, passed to the display sink without copying when its
    /// format is displayable
    Native(Arc<PixelBuffer>),

    /// Planar YUV that needs conversion before display
    I420(I420Buffer),
}

impl FramePayload {
    /// Pixel layout of the payload
    pub fn format(&self) -> PixelFormat {
        match self {
            Self::Native(buffer) => buffer.format(),
            Self::I420(_) => PixelFormat::I420,
        }
    }

    /// Dimensions of the payload
    pub fn size(&self) -> FrameSize {
        match self {
            Self::Native(buffer) => buffer.size(),
            Self::I420(planar) => planar.size(),
        }
    }
}

/// Raw frame pushed by a capturer or decoder
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Capture timestamp in nanoseconds
    pub timestamp_ns: i64,

    /// Frame contents
    pub payload: FramePayload,
}

impl VideoFrame {
    /// Frame wrapping a native buffer
    pub fn native(buffer: Arc<PixelBuffer>, timestamp_ns: i64) -> Self {
        Self {
            timestamp_ns,
            payload: FramePayload::Native(buffer),
        }
    }

    /// Frame carrying I420 planes
    pub fn i420(buffer: I420Buffer, timestamp_ns: i64) -> Self {
        Self {
            timestamp_ns,
            payload: FramePayload::I420(buffer),
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.payload.size().width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.payload.size().height
    }

    /// Frame dimensions
    pub fn size(&self) -> FrameSize {
        self.payload.size()
    }

    /// Pixel layout
    pub fn format(&self) -> PixelFormat {
        self.payload.format()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_packed() {
        let data: Vec<u8> = (0..24).collect();
        let frame = I420Buffer::from_packed(FrameSize::new(4, 4), &data).expect("packed frame");

        assert_eq!(frame.y().data(), &data[..16]);
        assert_eq!(frame.y().stride(), 4);
        assert_eq!(frame.u().data(), &[16, 17, 18, 19]);
        assert_eq!(frame.v().data(), &[20, 21, 22, 23]);
        assert_eq!(frame.u().stride(), 2);
        assert_eq!(frame.byte_len(), 24);
    }

    #[test]
    fn test_from_packed_too_short() {
        assert!(I420Buffer::from_packed(FrameSize::new(4, 4), &[0; 23]).is_none());
    }

    #[test]
    fn test_from_packed_huge_geometry() {
        assert!(I420Buffer::from_packed(FrameSize::new(u32::MAX, u32::MAX), &[0; 24]).is_none());
    }

    #[test]
    fn test_validate() {
        let planar = I420Buffer::from_packed(FrameSize::new(4, 4), &[0; 24]).expect("frame");
        assert!(planar.validate().is_ok());

        let short = I420Buffer::new(
            FrameSize::new(8, 8),
            SamplePlane::new(vec![0u8; 4], 8),
            SamplePlane::new(vec![0u8; 4], 4),
            SamplePlane::new(vec![0u8; 4], 4),
        );
        assert_eq!(
            short.validate(),
            Err(ConversionError::PlaneTooSmall {
                plane: "Y",
                needed: 64,
                actual: 4
            })
        );
    }

    #[test]
    fn test_validate_huge_geometry_does_not_panic() {
        let huge = FrameSize::new(u32::MAX, u32::MAX);
        let narrow = I420Buffer::new(
            huge,
            SamplePlane::new(vec![0u8; 4], 4),
            SamplePlane::new(vec![0u8; 4], 4),
            SamplePlane::new(vec![0u8; 4], 4),
        );
        assert!(matches!(narrow.validate(), Err(ConversionError::InvalidStride { plane: "Y", .. })));

        let wide = I420Buffer::new(
            huge,
            SamplePlane::new(vec![0u8; 4], usize::MAX),
            SamplePlane::new(vec![0u8; 4], usize::MAX),
            SamplePlane::new(vec![0u8; 4], usize::MAX),
        );
        assert_eq!(wide.validate(), Err(ConversionError::GeometryTooLarge(huge)));
    }

    #[test]
    fn test_frame_geometry_follows_payload() {
        let planar = I420Buffer::from_packed(FrameSize::new(2, 2), &[0; 6]).expect("frame");
        let frame = VideoFrame::i420(planar, 42);

        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.format(), PixelFormat::I420);

        let native = Arc::new(PixelBuffer::detached(FrameSize::new(8, 6), PixelFormat::Nv12, 64).expect("detached buffer"));
        let frame = VideoFrame::native(native, 0);
        assert_eq!(frame.size(), FrameSize::new(8, 6));
        assert_eq!(frame.format(), PixelFormat::Nv12);
    }
}
