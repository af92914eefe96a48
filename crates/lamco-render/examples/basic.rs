//! Basic lamco-render usage example
//!
//! Feeds synthetic local and remote streams through a compositor into two
//! printing sinks, then makes the remote sink fail to show the recovery.
//!
//! # Running
//!
//! ```bash
//! cargo run --example basic
//! ```

use std::sync::Arc;

use lamco_frame::I420Buffer;
use lamco_render::{
    DisplaySink, DualStreamCompositor, FrameSize, MediaSample, PresentationQueue, RendererConfig, SinkStatus,
    StreamRole, VideoFrame,
};
use parking_lot::Mutex;

struct PrintSink {
    name: &'static str,
    status: Mutex<SinkStatus>,
}

impl PrintSink {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            status: Mutex::new(SinkStatus::Unknown),
        }
    }
}

impl DisplaySink for PrintSink {
    fn status(&self) -> SinkStatus {
        *self.status.lock()
    }

    fn flush(&self) {
        println!("[{}] flush", self.name);
        *self.status.lock() = SinkStatus::Unknown;
    }

    fn enqueue(&self, sample: MediaSample) {
        println!(
            "[{}] {} {} at {}",
            self.name,
            sample.format().size,
            sample.format().pixel_format,
            sample.presentation_time()
        );
        *self.status.lock() = SinkStatus::Rendering;
    }
}

fn synthetic_frame(size: FrameSize, timestamp_ns: i64) -> VideoFrame {
    let len = size.area() as usize + 2 * size.chroma_size().area() as usize;
    let planar = I420Buffer::from_packed(size, &vec![128u8; len]).expect("buffer sized for geometry");
    VideoFrame::i420(planar, timestamp_ns)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("lamco-render v{}", lamco_render::VERSION);
    println!();

    let config = RendererConfig::builder().throttle_interval(2).build();
    println!("Renderer Config:");
    println!("  Throttle interval: {}", config.throttle_interval);
    println!("  Lane capacity: {}", config.lane_capacity);
    println!();

    let (presentation, _task) = PresentationQueue::spawn(32)?;
    let compositor = DualStreamCompositor::new(&config, &presentation)?;

    let local = Arc::new(PrintSink::new("local"));
    let remote = Arc::new(PrintSink::new("remote"));
    let local_sink: Arc<dyn DisplaySink> = local.clone();
    let remote_sink: Arc<dyn DisplaySink> = remote.clone();
    compositor.attach_sinks(&local_sink, &remote_sink);

    compositor.renderer(StreamRole::Remote).set_size(FrameSize::new(640, 360));

    for index in 1..=6i64 {
        let timestamp = index * 33_333_333;
        compositor.render_local_frame(synthetic_frame(FrameSize::new(320, 240), timestamp));
        compositor.render_remote_frame(synthetic_frame(FrameSize::new(640, 360), timestamp));

        if index == 3 {
            *remote.status.lock() = SinkStatus::Failed;
        }
    }
    compositor.drain().await?;

    println!();
    for role in StreamRole::ALL {
        let stats = compositor.stats(role);
        println!("{role}:");
        println!("  Received: {}", stats.frames_received);
        println!("  Delivered: {}", stats.samples_delivered);
        println!("  Sink recoveries: {}", stats.sink_recoveries);
        println!("  Pools created: {}", stats.pools_created);
    }

    Ok(())
}
