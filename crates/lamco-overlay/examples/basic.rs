//! Basic lamco-overlay usage example
//!
//! Wires a call context to a console "platform", attaches a remote track,
//! pushes a few frames and walks PiP through its lifecycle.
//!
//! # Running
//!
//! ```bash
//! cargo run --example basic
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use lamco_frame::I420Buffer;
use lamco_overlay::{
    NativeBridge, OverlayConfig, PipContentSource, PipContext, PipPlatform, PipWindow, SurfaceHandle, SurfacePair,
    TrackRegistry, VideoTrack,
};
use lamco_render::{DisplaySink, FrameSize, MediaSample, SinkStatus, StreamRole, VideoFrame, VideoRenderer};
use parking_lot::Mutex;

struct ConsoleSink(&'static str);

impl DisplaySink for ConsoleSink {
    fn status(&self) -> SinkStatus {
        SinkStatus::Rendering
    }

    fn flush(&self) {}

    fn enqueue(&self, sample: MediaSample) {
        println!("[{}] {} at {}", self.0, sample.format().size, sample.presentation_time());
    }

    fn flush_and_remove_image(&self) {
        println!("[{}] cleared", self.0);
    }
}

struct ConsoleWindow;

impl PipWindow for ConsoleWindow {
    fn start(&mut self) {
        println!("[pip] window shown");
    }

    fn stop(&mut self) {
        println!("[pip] window hidden");
    }
}

struct ConsolePlatform;

impl PipPlatform for ConsolePlatform {
    fn is_supported(&self) -> bool {
        true
    }

    fn root_surface(&self) -> Option<SurfaceHandle> {
        Some(SurfaceHandle::new(1))
    }

    fn create_window(&mut self, source: PipContentSource) -> Box<dyn PipWindow> {
        println!(
            "[pip] window from {} at {}",
            source.source_surface, source.preferred_content_size
        );
        Box::new(ConsoleWindow)
    }
}

struct Track {
    id: String,
    renderers: Mutex<Vec<Arc<dyn VideoRenderer>>>,
}

impl VideoTrack for Track {
    fn track_id(&self) -> &str {
        &self.id
    }

    fn add_renderer(&self, renderer: Arc<dyn VideoRenderer>) {
        self.renderers.lock().push(renderer);
    }
}

struct Registry(HashMap<String, Arc<Track>>);

impl TrackRegistry for Registry {
    fn remote_track(&self, track_id: &str) -> Option<Arc<dyn VideoTrack>> {
        self.0.get(track_id).map(|track| Arc::clone(track) as Arc<dyn VideoTrack>)
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
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("lamco-overlay v{}", lamco_overlay::VERSION);
    println!();

    let surfaces = SurfacePair::new(Arc::new(ConsoleSink("local")), Arc::new(ConsoleSink("remote")));
    let context = Arc::new(PipContext::new(
        OverlayConfig::default(),
        surfaces,
        Box::new(ConsolePlatform),
    )?);

    let track = Arc::new(Track {
        id: "remote-video".to_string(),
        renderers: Mutex::new(Vec::new()),
    });
    let registry = Registry(HashMap::from([("remote-video".to_string(), Arc::clone(&track))]));
    let bridge = NativeBridge::new(Arc::clone(&context), Arc::new(registry));

    bridge.attach_renderer("remote-video");
    bridge.attach_renderer("no-such-track");

    let capture = bridge.local_capture_processor();
    for index in 1..=4i64 {
        let timestamp = index * 33_333_333;
        let _ = capture.process(synthetic_frame(FrameSize::new(320, 240), timestamp));
        for renderer in track.renderers.lock().iter() {
            renderer.render_frame(synthetic_frame(FrameSize::new(640, 360), timestamp));
        }
    }

    bridge.setup_pip();
    bridge.start_pip();
    context.compositor().drain().await?;
    println!("PiP state: {}", context.pip_state());

    bridge.stop_pip();
    context.presentation().drain().await?;
    println!("PiP state: {}", context.pip_state());

    println!();
    for role in StreamRole::ALL {
        let stats = context.compositor().stats(role);
        println!("{role}: {} received, {} delivered", stats.frames_received, stats.samples_delivered);
    }

    context.shutdown().await?;
    Ok(())
}
