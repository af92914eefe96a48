//! Basic lamco-frame usage example
//!
//! Builds a synthetic I420 frame, converts it to NV12 through a pool and
//! shows how the pool reacts to a geometry change.
//!
//! # Running
//!
//! ```bash
//! cargo run --example basic
//! ```

use lamco_frame::{
    ColorConverter, FrameSize, FrameThrottler, I420Buffer, PixelBufferPool, PoolConfig, VideoFrame,
};

fn synthetic_frame(size: FrameSize, timestamp_ns: i64) -> VideoFrame {
    let chroma = size.chroma_size();
    let luma_len = (size.width * size.height) as usize;
    let chroma_len = (chroma.width * chroma.height) as usize;

    let mut data = vec![128u8; luma_len + chroma_len * 2];
    for (i, byte) in data[..luma_len].iter_mut().enumerate() {
        *byte = (i % 256) as u8;
    }

    let planar = I420Buffer::from_packed(size, &data).expect("buffer sized for geometry");
    VideoFrame::i420(planar, timestamp_ns)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("lamco-frame v{}", lamco_frame::VERSION);
    println!();

    let config = PoolConfig::builder().max_buffers(4).row_alignment(64).build();
    println!("Pool Config:");
    println!("  Max buffers: {}", config.max_buffers);
    println!("  Row alignment: {} bytes", config.row_alignment);
    println!();

    let mut pool = PixelBufferPool::new(config);
    let mut converter = ColorConverter::new();
    let throttler = FrameThrottler::default();

    // 640x480 for a few frames, then the remote switches to 1280x720
    for index in 1..=8u64 {
        let size = if index <= 4 {
            FrameSize::new(640, 480)
        } else {
            FrameSize::new(1280, 720)
        };
        let frame = synthetic_frame(size, index as i64 * 33_333_333);

        if !throttler.admit(index) {
            println!("Frame {index}: throttled");
            continue;
        }

        let nv12 = converter.convert(&frame, &mut pool)?;
        println!(
            "Frame {index}: {} {} from {:?}, luma stride {}",
            nv12.size(),
            nv12.format(),
            nv12.pool_id(),
            nv12.plane(0).map_or(0, |plane| plane.stride()),
        );
    }

    println!();
    let stats = converter.stats();
    println!("Converted: {}", stats.frames_converted);
    println!("Bytes processed: {}", stats.bytes_processed);
    println!("Pools created: {}", pool.pools_created());

    Ok(())
}
