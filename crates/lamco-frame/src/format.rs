//! Pixel formats and frame geometry
//!
//! Describes the handful of layouts that flow through the call renderer:
//! planar I420 as delivered by software decoders and capturers, biplanar
//! NV12 as accepted by display sinks, and packed BGRA for native buffers
//! that are already displayable.

use std::fmt;

/// Frame dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FrameSize {
    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,
}

impl FrameSize {
    /// Create a new frame size
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Total pixel count
    #[must_use]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Size of a chroma plane subsampled 2x2 against this luma size
    ///
    /// Odd dimensions round up so the last column and row of luma
    /// still have a chroma sample.
    #[must_use]
    pub const fn chroma_size(&self) -> Self {
        Self {
            width: self.width / 2 + self.width % 2,
            height: self.height / 2 + self.height % 2,
        }
    }
}

impl fmt::Display for FrameSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Visible extent of one plane in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneDimensions {
    /// Bytes of image data per row (excluding stride padding)
    pub row_bytes: usize,

    /// Number of rows
    pub rows: usize,
}

/// Pixel layouts understood by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Biplanar YUV 4:2:0 (full range): luma plane plus interleaved CbCr plane
    Nv12,

    /// Planar YUV 4:2:0: separate Y, U and V planes
    I420,

    /// Packed 32-bit BGRA
    Bgra,
}

impl PixelFormat {
    /// Whether a display sink can present this format without conversion
    #[must_use]
    pub const fn is_displayable(self) -> bool {
        matches!(self, Self::Nv12 | Self::Bgra)
    }

    /// Number of planes in the layout
    #[must_use]
    pub const fn plane_count(self) -> usize {
        match self {
            Self::Nv12 => 2,
            Self::I420 => 3,
            Self::Bgra => 1,
        }
    }

    /// FourCC code, used in format descriptions and logs
    #[must_use]
    pub const fn fourcc(self) -> &'static str {
        match self {
            Self::Nv12 => "NV12",
            Self::I420 => "I420",
            Self::Bgra => "BGRA",
        }
    }

    /// Per-plane visible dimensions for a frame of `size`
    #[must_use]
    pub fn plane_dimensions(self, size: FrameSize) -> Vec<PlaneDimensions> {
        let luma = PlaneDimensions {
            row_bytes: size.width as usize,
            rows: size.height as usize,
        };
        let chroma = size.chroma_size();

        match self {
            Self::Nv12 => vec![
                luma,
                PlaneDimensions {
                    row_bytes: (chroma.width as usize).saturating_mul(2),
                    rows: chroma.height as usize,
                },
            ],
            Self::I420 => {
                let plane = PlaneDimensions {
                    row_bytes: chroma.width as usize,
                    rows: chroma.height as usize,
                };
                vec![luma, plane, plane]
            }
            Self::Bgra => vec![PlaneDimensions {
                row_bytes: (size.width as usize).saturating_mul(4),
                rows: size.height as usize,
            }],
        }
    }

    /// Bytes a buffer of `size` occupies with rows aligned to `row_alignment`
    ///
    /// `None` if the geometry does not fit in memory arithmetic.
    #[must_use]
    pub fn buffer_len(self, size: FrameSize, row_alignment: usize) -> Option<usize> {
        self.plane_dimensions(size)
            .iter()
            .try_fold(0usize, |total, plane| {
                checked_aligned_stride(plane.row_bytes, row_alignment)?
                    .checked_mul(plane.rows)?
                    .checked_add(total)
            })
            .filter(|&len| len <= isize::MAX as usize)
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.fourcc())
    }
}

/// Round `row_bytes` up to a multiple of `alignment`
///
/// An alignment of 0 or 1 leaves the row unpadded.
#[must_use]
pub fn aligned_stride(row_bytes: usize, alignment: usize) -> usize {
    checked_aligned_stride(row_bytes, alignment).unwrap_or(usize::MAX)
}

/// [`aligned_stride`], or `None` on overflow
#[must_use]
pub fn checked_aligned_stride(row_bytes: usize, alignment: usize) -> Option<usize> {
    if alignment <= 1 {
        return Some(row_bytes);
    }
    row_bytes.div_ceil(alignment).checked_mul(alignment)
}
