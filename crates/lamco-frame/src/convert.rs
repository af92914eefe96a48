//! Color Conversion for Display
//!
//! Display sinks take biplanar NV12. Frames that already carry a
//! displayable native buffer pass straight through; planar I420 frames are
//! repacked into an NV12 buffer drawn from a [`PixelBufferPool`].
//!
//! # Layout
//!
//! - **I420**: Y plane, U plane and V plane, each with its own stride
//! - **NV12**: Y plane, then one CbCr plane holding `U0 V0 U1 V1 ...`,
//!   one pair per 2x2 block of luma
//!
//! No colorspace math is involved: luma is copied and chroma interleaved.
//!
//! # Examples
//!
//! ```rust
//! use lamco_frame::{ColorConverter, FrameSize, I420Buffer, PixelBufferPool, PoolConfig, VideoFrame};
//!
//! let planar = I420Buffer::from_packed(FrameSize::new(4, 4), &[0u8; 24]).expect("frame");
//! let frame = VideoFrame::i420(planar, 0);
//!
//! let mut pool = PixelBufferPool::new(PoolConfig::default());
//! let mut converter = ColorConverter::new();
//! let nv12 = converter.convert(&frame, &mut pool)?;
//! assert_eq!(nv12.plane_count(), 2);
//! # Ok::<(), lamco_frame::ConversionError>(())
//! ```

use std::sync::Arc;

use tracing::trace;

use crate::buffer::PixelBuffer;
use crate::error::{ConversionError, Result};
use crate::format::PixelFormat;
use crate::frame::{FramePayload, I420Buffer, VideoFrame};
use crate::pool::PixelBufferPool;

/// Repack an I420 frame into an NV12 buffer
///
/// Luma rows are copied one at a time because source and destination
/// strides generally differ. Chroma rows are built by writing the U sample
/// then the V sample of each 2x2 block into consecutive bytes.
///
/// `dst` must be an NV12 buffer of the same size as `src`.
pub fn i420_to_nv12(src: &I420Buffer, dst: &mut PixelBuffer) -> Result<()> {
    if dst.format() != PixelFormat::Nv12 {
        return Err(ConversionError::UnsupportedFormat(dst.format()));
    }

    src.validate()?;
    let size = src.size();
    if dst.size() != size {
        return Err(ConversionError::DestinationMismatch {
            expected: size,
            actual: dst.size(),
        });
    }

    let width = size.width as usize;
    let height = size.height as usize;
    let chroma = size.chroma_size();
    let chroma_width = chroma.width as usize;
    let chroma_height = chroma.height as usize;

    let [luma, uv] = dst.planes_mut() else {
        return Err(ConversionError::UnsupportedFormat(PixelFormat::Nv12));
    };

    // Copy Y
    let y = src.y();
    let luma_stride = luma.stride();
    for (dst_row, src_row) in luma
        .data_mut()
        .chunks_mut(luma_stride)
        .zip(y.data().chunks(y.stride()))
        .take(height)
    {
        dst_row[..width].copy_from_slice(&src_row[..width]);
    }

    // Interleave U and V
    let (u, v) = (src.u(), src.v());
    let uv_stride = uv.stride();
    for (row, dst_row) in uv.data_mut().chunks_mut(uv_stride).take(chroma_height).enumerate() {
        let u_row = &u.data()[row * u.stride()..][..chroma_width];
        let v_row = &v.data()[row * v.stride()..][..chroma_width];

        for ((pair, &cb), &cr) in dst_row[..chroma_width * 2]
            .chunks_exact_mut(2)
            .zip(u_row)
            .zip(v_row)
        {
            pair[0] = cb;
            pair[1] = cr;
        }
    }

    Ok(())
}

/// Conversion statistics
#[derive(Debug, Clone, Default)]
pub struct ConversionStats {
    /// Frames repacked from I420
    pub frames_converted: u64,

    /// Native frames passed through without copying
    pub frames_passed_through: u64,

    /// Source bytes read by conversions
    pub bytes_processed: u64,

    /// Frames that could not be converted
    pub failures: u64,
}

/// Converts incoming frames into displayable NV12 buffers
#[derive(Debug, Default)]
pub struct ColorConverter {
    stats: ConversionStats,
}

impl ColorConverter {
    /// Create a new converter
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce a displayable buffer for `frame`
    ///
    /// Native buffers in a displayable format are returned as-is and never
    /// touch the pool. I420 payloads are converted into a buffer from
    /// `pool`. Anything else fails, as does pool exhaustion; the caller is
    /// expected to drop the frame.
    pub fn convert(&mut self, frame: &VideoFrame, pool: &mut PixelBufferPool) -> Result<Arc<PixelBuffer>> {
        let result = self.convert_payload(&frame.payload, pool);
        if result.is_err() {
            self.stats.failures += 1;
        }
        result
    }

    fn convert_payload(&mut self, payload: &FramePayload, pool: &mut PixelBufferPool) -> Result<Arc<PixelBuffer>> {
        match payload {
            FramePayload::Native(buffer) if buffer.format().is_displayable() => {
                self.stats.frames_passed_through += 1;
                Ok(Arc::clone(buffer))
            }
            FramePayload::Native(buffer) => Err(ConversionError::UnsupportedFormat(buffer.format())),
            FramePayload::I420(planar) => {
                planar.validate()?;
                let mut nv12 = pool.buffer(planar.size(), PixelFormat::Nv12)?;
                i420_to_nv12(planar, &mut nv12)?;

                self.stats.frames_converted += 1;
                self.stats.bytes_processed += planar.byte_len() as u64;
                trace!(size = %planar.size(), pool = ?nv12.pool_id(), "Converted I420 frame to NV12");

                Ok(Arc::new(nv12))
            }
        }
    }

    /// Check if a format needs conversion before display
    #[must_use]
    pub fn needs_conversion(format: PixelFormat) -> bool {
        !format.is_displayable()
    }

    /// Get conversion statistics
    pub fn stats(&self) -> &ConversionStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PoolConfig;
    use crate::format::FrameSize;
    use crate::frame::SamplePlane;

    /// 4x4 luma with distinct values, 2x2 chroma
    fn synthetic_frame() -> I420Buffer {
        let y: Vec<u8> = (0..16).collect();
        I420Buffer::new(
            FrameSize::new(4, 4),
            SamplePlane::new(y, 4),
            SamplePlane::new(vec![100, 101, 102, 103], 2),
            SamplePlane::new(vec![200, 201, 202, 203], 2),
        )
    }

    #[test]
    fn test_i420_to_nv12_layout() {
        let src = synthetic_frame();
        let mut dst = PixelBuffer::detached(FrameSize::new(4, 4), PixelFormat::Nv12, 64).expect("detached buffer");

        i420_to_nv12(&src, &mut dst).expect("conversion");

        let luma = dst.plane(0).expect("luma");
        assert_eq!(luma.packed(), (0..16).collect::<Vec<u8>>());

        let chroma = dst.plane(1).expect("chroma");
        assert_eq!(chroma.packed(), vec![100, 200, 101, 201, 102, 202, 103, 203]);
    }

    #[test]
    fn test_i420_to_nv12_with_padded_source_strides() {
        // Source rows padded to 8 (luma) and 4 (chroma) bytes
        let mut y = vec![0xEE; 8 * 4];
        for row in 0..4 {
            for col in 0..4 {
                y[row * 8 + col] = (row * 4 + col) as u8;
            }
        }
        let src = I420Buffer::new(
            FrameSize::new(4, 4),
            SamplePlane::new(y, 8),
            SamplePlane::new(vec![1, 2, 0xEE, 0xEE, 3, 4], 4),
            SamplePlane::new(vec![5, 6, 0xEE, 0xEE, 7, 8], 4),
        );
        let mut dst = PixelBuffer::detached(FrameSize::new(4, 4), PixelFormat::Nv12, 16).expect("detached buffer");

        i420_to_nv12(&src, &mut dst).expect("conversion");

        assert_eq!(dst.plane(0).expect("luma").packed(), (0..16).collect::<Vec<u8>>());
        assert_eq!(dst.plane(1).expect("chroma").packed(), vec![1, 5, 2, 6, 3, 7, 4, 8]);
    }

    #[test]
    fn test_odd_dimensions() {
        // 3x3 luma, 2x2 chroma
        let src = I420Buffer::from_packed(FrameSize::new(3, 3), &[9; 9 + 4 + 4]).expect("frame");
        let mut dst = PixelBuffer::detached(FrameSize::new(3, 3), PixelFormat::Nv12, 1).expect("detached buffer");

        i420_to_nv12(&src, &mut dst).expect("conversion");
        assert_eq!(dst.plane(1).expect("chroma").row_bytes(), 4);
        assert_eq!(dst.plane(1).expect("chroma").rows(), 2);
    }

    #[test]
    fn test_short_plane_rejected() {
        let src = I420Buffer::new(
            FrameSize::new(4, 4),
            SamplePlane::new(vec![0; 16], 4),
            SamplePlane::new(vec![0; 3], 2),
            SamplePlane::new(vec![0; 4], 2),
        );
        let mut dst = PixelBuffer::detached(FrameSize::new(4, 4), PixelFormat::Nv12, 64).expect("detached buffer");

        let err = i420_to_nv12(&src, &mut dst).expect_err("short U plane");
        assert_eq!(
            err,
            ConversionError::PlaneTooSmall {
                plane: "U",
                needed: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_stride_shorter_than_row_rejected() {
        let src = I420Buffer::new(
            FrameSize::new(4, 4),
            SamplePlane::new(vec![0; 16], 3),
            SamplePlane::new(vec![0; 4], 2),
            SamplePlane::new(vec![0; 4], 2),
        );
        let mut dst = PixelBuffer::detached(FrameSize::new(4, 4), PixelFormat::Nv12, 64).expect("detached buffer");

        let err = i420_to_nv12(&src, &mut dst).expect_err("bad stride");
        assert!(matches!(err, ConversionError::InvalidStride { plane: "Y", .. }));
    }

    #[test]
    fn test_destination_mismatch() {
        let src = synthetic_frame();
        let mut dst = PixelBuffer::detached(FrameSize::new(8, 8), PixelFormat::Nv12, 64).expect("detached buffer");
        assert!(matches!(
            i420_to_nv12(&src, &mut dst),
            Err(ConversionError::DestinationMismatch { .. })
        ));

        let mut dst = PixelBuffer::detached(FrameSize::new(4, 4), PixelFormat::Bgra, 64).expect("detached buffer");
        assert_eq!(
            i420_to_nv12(&src, &mut dst),
            Err(ConversionError::UnsupportedFormat(PixelFormat::Bgra))
        );
    }

    #[test]
    fn test_native_passthrough_skips_pool() {
        let native = Arc::new(PixelBuffer::detached(FrameSize::new(8, 8), PixelFormat::Nv12, 64).expect("detached buffer"));
        let frame = VideoFrame::native(Arc::clone(&native), 0);

        let mut pool = PixelBufferPool::new(PoolConfig::default());
        let mut converter = ColorConverter::new();
        let out = converter.convert(&frame, &mut pool).expect("passthrough");

        assert!(Arc::ptr_eq(&out, &native));
        assert_eq!(pool.current_id(), None);
        assert_eq!(converter.stats().frames_passed_through, 1);
        assert_eq!(converter.stats().frames_converted, 0);
    }

    #[test]
    fn test_native_non_displayable_rejected() {
        let native = Arc::new(PixelBuffer::detached(FrameSize::new(8, 8), PixelFormat::I420, 64).expect("detached buffer"));
        let frame = VideoFrame::native(native, 0);

        let mut pool = PixelBufferPool::new(PoolConfig::default());
        let mut converter = ColorConverter::new();

        let err = converter.convert(&frame, &mut pool).expect_err("unsupported");
        assert_eq!(err, ConversionError::UnsupportedFormat(PixelFormat::I420));
        assert_eq!(converter.stats().failures, 1);
    }

    #[test]
    fn test_planar_conversion_uses_pool() {
        let frame = VideoFrame::i420(synthetic_frame(), 0);
        let mut pool = PixelBufferPool::new(PoolConfig::default());
        let mut converter = ColorConverter::new();

        let out = converter.convert(&frame, &mut pool).expect("converted");
        assert_eq!(out.format(), PixelFormat::Nv12);
        assert_eq!(out.pool_id(), pool.current_id());
        assert_eq!(converter.stats().frames_converted, 1);
        assert_eq!(converter.stats().bytes_processed, 24);
    }

    #[test]
    fn test_malformed_frame_leaves_pool_untouched() {
        let mut pool = PixelBufferPool::new(PoolConfig::default());
        let mut converter = ColorConverter::new();
        let good = VideoFrame::i420(synthetic_frame(), 0);
        let _first = converter.convert(&good, &mut pool).expect("first");
        let id = pool.current_id();

        let short = I420Buffer::new(
            FrameSize::new(8, 8),
            SamplePlane::new(vec![0; 4], 8),
            SamplePlane::new(vec![0; 4], 4),
            SamplePlane::new(vec![0; 4], 4),
        );
        let err = converter
            .convert(&VideoFrame::i420(short, 1), &mut pool)
            .expect_err("short planes");
        assert!(matches!(err, ConversionError::PlaneTooSmall { plane: "Y", .. }));

        let huge = I420Buffer::new(
            FrameSize::new(u32::MAX, u32::MAX),
            SamplePlane::new(vec![0; 4], 4),
            SamplePlane::new(vec![0; 4], 4),
            SamplePlane::new(vec![0; 4], 4),
        );
        assert!(converter.convert(&VideoFrame::i420(huge, 2), &mut pool).is_err());

        assert_eq!(pool.current_id(), id);
        assert_eq!(pool.pools_created(), 1);
        assert_eq!(pool.outstanding(), 1);
        assert_eq!(converter.stats().failures, 2);
    }

    #[test]
    fn test_pool_exhaustion_is_a_failure() {
        let frame = VideoFrame::i420(synthetic_frame(), 0);
        let mut pool = PixelBufferPool::new(PoolConfig::builder().max_buffers(1).build());
        let mut converter = ColorConverter::new();

        let _held = converter.convert(&frame, &mut pool).expect("first");
        let err = converter.convert(&frame, &mut pool).expect_err("exhausted");
        assert!(err.is_resource_exhaustion());
    }

    #[test]
    fn test_needs_conversion() {
        assert!(ColorConverter::needs_conversion(PixelFormat::I420));
        assert!(!ColorConverter::needs_conversion(PixelFormat::Nv12));
        assert!(!ColorConverter::needs_conversion(PixelFormat::Bgra));
    }
}
