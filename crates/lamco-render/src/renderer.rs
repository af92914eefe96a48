//! Frame renderer
//!
//! A [`FrameRenderer`] takes frames from a real-time source thread and puts
//! them on a [`DisplaySink`]:
//!
//! 1. `render_frame` counts the frame and consults the throttler on the
//!    caller's thread. Admitted frames are handed to the renderer's lane
//!    with `try_send`; nothing on this path waits.
//! 2. The lane is a task that owns the pixel buffer pool and the converter.
//!    It processes commands strictly in arrival order, so pool recreation
//!    (from a resize or a geometry change) never races with conversion.
//! 3. Converted samples hop to the presentation context, where the sink is
//!    checked for a failed status, flushed if needed, and fed the sample.
//!
//! The lane and the delivery closures only hold weak references to the
//! renderer. Once the renderer is dropped, queued work does nothing.

use std::fmt;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use lamco_frame::{ColorConverter, FrameSize, FrameThrottler, PixelBufferPool, PixelFormat, VideoFrame};
use parking_lot::{Mutex, RwLock};
use tokio::runtime::Handle;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace, warn};

use crate::config::RendererConfig;
use crate::error::{RenderError, Result};
use crate::presentation::PresentationQueue;
use crate::sample::{MediaSample, MediaTime, SampleTiming};
use crate::sink::DisplaySink;

/// Capability interface of anything that renders a stream of frames
pub trait VideoRenderer: Send + Sync {
    /// Display frames on `sink`, replacing any previous sink
    ///
    /// Only a weak reference is kept; the caller owns the sink.
    fn attach(&self, sink: &Arc<dyn DisplaySink>);

    /// Render `frame`, never blocking the caller
    fn render_frame(&self, frame: VideoFrame);

    /// Announce the geometry of upcoming frames
    fn set_size(&self, size: FrameSize);
}

enum LaneCommand {
    Frame(VideoFrame),
    Resize,
    Barrier(oneshot::Sender<()>),
}

#[derive(Debug, Default)]
struct Counters {
    admitted: AtomicU64,
    backlog_drops: AtomicU64,
    conversions: AtomicU64,
    conversion_failures: AtomicU64,
    delivered: AtomicU64,
    discarded: AtomicU64,
    sink_recoveries: AtomicU64,
    pools_created: AtomicU64,
}

/// Latest announced size not yet applied by the lane
#[derive(Debug, Default)]
struct PendingResize {
    size: Option<FrameSize>,
    /// A `Resize` command is in the lane and will pick up `size`
    queued: bool,
}

/// Renderer state reachable from the lane and the presentation context
struct RendererShared {
    label: Arc<str>,
    sink: RwLock<Option<Weak<dyn DisplaySink>>>,
    pending_resize: Mutex<PendingResize>,
    counters: Counters,
}

impl RendererShared {
    /// Runs on the presentation context
    fn deliver(&self, sample: MediaSample) {
        let sink = self.sink.read().as_ref().and_then(Weak::upgrade);
        let Some(sink) = sink else {
            self.counters.discarded.fetch_add(1, Ordering::Relaxed);
            trace!(renderer = %self.label, "No sink attached, discarding sample");
            return;
        };

        let status = sink.status();
        if status.needs_flush() {
            warn!(renderer = %self.label, %status, "Display sink failed, flushing before enqueue");
            sink.flush();
            self.counters.sink_recoveries.fetch_add(1, Ordering::Relaxed);
        }

        trace!(renderer = %self.label, pts = %sample.presentation_time(), "Enqueueing sample");
        sink.enqueue(sample);
        self.counters.delivered.fetch_add(1, Ordering::Relaxed);
    }
}

/// Snapshot of a renderer's counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RendererStats {
    /// Frames passed to `render_frame`
    pub frames_received: u64,

    /// Frames the throttler let through
    pub frames_admitted: u64,

    /// Admitted frames dropped because the lane was full
    pub backlog_drops: u64,

    /// Converter invocations
    pub conversions: u64,

    /// Frames dropped because conversion failed
    pub conversion_failures: u64,

    /// Samples enqueued on a sink
    pub samples_delivered: u64,

    /// Samples dropped because no sink was attached
    pub samples_discarded: u64,

    /// Flushes issued to recover a failed sink
    pub sink_recoveries: u64,

    /// Pixel buffer pools created by the lane
    pub pools_created: u64,
}

/// Renderer with its own serial lane
///
/// Must be created from inside a Tokio runtime.
pub struct FrameRenderer {
    shared: Arc<RendererShared>,
    throttler: FrameThrottler,
    frame_count: AtomicU64,
    lane: mpsc::Sender<LaneCommand>,
    presentation: PresentationQueue,
}

impl FrameRenderer {
    /// Create a renderer and start its lane
    ///
    /// # Arguments
    ///
    /// * `label` - Name used in logs
    /// * `config` - Throttle, lane and pool settings
    /// * `presentation` - Context samples are delivered on
    pub fn spawn(label: impl Into<String>, config: &RendererConfig, presentation: PresentationQueue) -> Result<Self> {
        config.validate().map_err(|issues| RenderError::invalid_config(&issues))?;
        let handle = Handle::try_current().map_err(|_| RenderError::NoRuntime)?;

        let label: Arc<str> = Arc::from(label.into());
        let shared = Arc::new(RendererShared {
            label: Arc::clone(&label),
            sink: RwLock::new(None),
            pending_resize: Mutex::new(PendingResize::default()),
            counters: Counters::default(),
        });

        let (lane_tx, lane_rx) = mpsc::channel(config.lane_capacity);
        let lane = RenderLane {
            label: Arc::clone(&label),
            renderer: Arc::downgrade(&shared),
            pool: PixelBufferPool::new(config.pool.clone()),
            converter: ColorConverter::new(),
            presentation: presentation.clone(),
            rx: lane_rx,
        };
        handle.spawn(lane.run());

        debug!(
            renderer = %label,
            throttle_interval = config.throttle_interval,
            lane_capacity = config.lane_capacity,
            "Frame renderer started"
        );

        Ok(Self {
            shared,
            throttler: FrameThrottler::new(config.throttle_interval),
            frame_count: AtomicU64::new(0),
            lane: lane_tx,
            presentation,
        })
    }

    /// Attach a display sink, replacing any previous one
    pub fn attach(&self, sink: &Arc<dyn DisplaySink>) {
        let replaced = self.shared.sink.write().replace(Arc::downgrade(sink)).is_some();
        debug!(renderer = %self.shared.label, replaced, "Display sink attached");
    }

    /// Detach the current sink; later samples are discarded
    pub fn detach(&self) {
        self.shared.sink.write().take();
    }

    /// Whether a live sink is attached
    pub fn has_sink(&self) -> bool {
        self.shared
            .sink
            .read()
            .as_ref()
            .is_some_and(|sink| sink.strong_count() > 0)
    }

    /// Render `frame`
    ///
    /// Counts the frame, drops it if throttled, otherwise queues it on the
    /// lane. A full lane drops the frame. Never blocks.
    pub fn render_frame(&self, frame: VideoFrame) {
        let index = self.frame_count.fetch_add(1, Ordering::Relaxed) + 1;
        if !self.throttler.admit(index) {
            trace!(renderer = %self.shared.label, index, "Frame throttled");
            return;
        }
        self.shared.counters.admitted.fetch_add(1, Ordering::Relaxed);

        match self.lane.try_send(LaneCommand::Frame(frame)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.shared.counters.backlog_drops.fetch_add(1, Ordering::Relaxed);
                debug!(renderer = %self.shared.label, index, "Render lane full, dropping frame");
            }
            Err(TrySendError::Closed(_)) => {
                trace!(renderer = %self.shared.label, index, "Render lane stopped, dropping frame");
            }
        }
    }

    /// Prepare the pool for frames of `size`
    ///
    /// The size is recorded right away and applied by the lane, ordered
    /// with the frames queued before it. When the lane is full the size is
    /// still applied, after the next command the lane handles. Only the
    /// latest size announced before the lane gets to it is applied.
    pub fn set_size(&self, size: FrameSize) {
        let mut pending = self.shared.pending_resize.lock();
        pending.size = Some(size);
        if pending.queued {
            return;
        }

        match self.lane.try_send(LaneCommand::Resize) {
            Ok(()) => pending.queued = true,
            Err(TrySendError::Full(_)) => {
                debug!(renderer = %self.shared.label, %size, "Render lane full, resize deferred");
            }
            Err(TrySendError::Closed(_)) => {
                trace!(renderer = %self.shared.label, %size, "Render lane stopped, ignoring resize");
            }
        }
    }

    /// Wait until every frame queued so far has been delivered or dropped
    pub async fn drain(&self) -> Result<()> {
        let (done_tx, done_rx) = oneshot::channel();
        self.lane
            .send(LaneCommand::Barrier(done_tx))
            .await
            .map_err(|_| RenderError::PresentationClosed)?;
        done_rx.await.map_err(|_| RenderError::PresentationClosed)?;
        self.presentation.drain().await
    }

    /// Counter snapshot
    pub fn stats(&self) -> RendererStats {
        let counters = &self.shared.counters;
        RendererStats {
            frames_received: self.frame_count.load(Ordering::Relaxed),
            frames_admitted: counters.admitted.load(Ordering::Relaxed),
            backlog_drops: counters.backlog_drops.load(Ordering::Relaxed),
            conversions: counters.conversions.load(Ordering::Relaxed),
            conversion_failures: counters.conversion_failures.load(Ordering::Relaxed),
            samples_delivered: counters.delivered.load(Ordering::Relaxed),
            samples_discarded: counters.discarded.load(Ordering::Relaxed),
            sink_recoveries: counters.sink_recoveries.load(Ordering::Relaxed),
            pools_created: counters.pools_created.load(Ordering::Relaxed),
        }
    }

    /// Name used in logs
    pub fn label(&self) -> &str {
        &self.shared.label
    }

    /// Throttle interval in frames
    pub fn throttle_interval(&self) -> u64 {
        self.throttler.interval()
    }
}

impl VideoRenderer for FrameRenderer {
    fn attach(&self, sink: &Arc<dyn DisplaySink>) {
        FrameRenderer::attach(self, sink);
    }

    fn render_frame(&self, frame: VideoFrame) {
        FrameRenderer::render_frame(self, frame);
    }

    fn set_size(&self, size: FrameSize) {
        FrameRenderer::set_size(self, size);
    }
}

impl fmt::Debug for FrameRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameRenderer")
            .field("label", &self.shared.label)
            .field("throttle_interval", &self.throttler.interval())
            .field("stats", &self.stats())
            .finish()
    }
}

impl Drop for FrameRenderer {
    fn drop(&mut self) {
        debug!(renderer = %self.shared.label, "Dropping frame renderer");
    }
}

/// Serial lane owning a renderer's pool and converter
struct RenderLane {
    label: Arc<str>,
    renderer: Weak<RendererShared>,
    pool: PixelBufferPool,
    converter: ColorConverter,
    presentation: PresentationQueue,
    rx: mpsc::Receiver<LaneCommand>,
}

impl RenderLane {
    async fn run(mut self) {
        while let Some(command) = self.rx.recv().await {
            if self.handle(command).await.is_break() {
                break;
            }
        }
        debug!(renderer = %self.label, pools_created = self.pool.pools_created(), "Render lane stopped");
    }

    async fn handle(&mut self, command: LaneCommand) -> ControlFlow<()> {
        let Some(shared) = self.renderer.upgrade() else {
            trace!(renderer = %self.label, "Renderer gone, abandoning queued work");
            return ControlFlow::Break(());
        };

        match command {
            LaneCommand::Frame(frame) => {
                let sample = self.prepare(&shared, &frame);
                self.apply_deferred_resize(&shared);
                drop(shared);
                let Some(sample) = sample else {
                    return ControlFlow::Continue(());
                };

                let renderer = Weak::clone(&self.renderer);
                let posted = self
                    .presentation
                    .submit(move || {
                        if let Some(shared) = renderer.upgrade() {
                            shared.deliver(sample);
                        }
                    })
                    .await;
                if posted.is_err() {
                    debug!(renderer = %self.label, "Presentation context closed");
                    return ControlFlow::Break(());
                }
            }
            LaneCommand::Resize => {
                let size = {
                    let mut pending = shared.pending_resize.lock();
                    pending.queued = false;
                    pending.size.take()
                };
                if let Some(size) = size {
                    self.resize(&shared, size);
                }
            }
            LaneCommand::Barrier(done) => {
                self.apply_deferred_resize(&shared);
                let _ = done.send(());
            }
        }
        ControlFlow::Continue(())
    }

    /// Apply a size whose `Resize` command could not be queued
    fn apply_deferred_resize(&mut self, shared: &RendererShared) {
        let size = {
            let mut pending = shared.pending_resize.lock();
            if pending.queued {
                None
            } else {
                pending.size.take()
            }
        };
        if let Some(size) = size {
            self.resize(shared, size);
        }
    }

    fn prepare(&mut self, shared: &RendererShared, frame: &VideoFrame) -> Option<MediaSample> {
        shared.counters.conversions.fetch_add(1, Ordering::Relaxed);
        let result = self.convert(frame);
        self.sync_pool_count(shared);

        match result {
            Ok(sample) => Some(sample),
            Err(e) => {
                shared.counters.conversion_failures.fetch_add(1, Ordering::Relaxed);
                warn!(
                    renderer = %self.label,
                    size = %frame.size(),
                    format = %frame.format(),
                    "Dropping frame: {}", e
                );
                None
            }
        }
    }

    fn convert(&mut self, frame: &VideoFrame) -> Result<MediaSample> {
        let image = self.converter.convert(frame, &mut self.pool)?;
        let timing = SampleTiming::live(MediaTime::from_nanos(frame.timestamp_ns));
        MediaSample::ready_with_image(image, timing)
    }

    fn resize(&mut self, shared: &RendererShared, size: FrameSize) {
        match self.pool.prepare(size, PixelFormat::Nv12) {
            Ok(pool) => debug!(renderer = %self.label, %size, %pool, "Pool ready for announced size"),
            Err(e) => warn!(renderer = %self.label, %size, "Ignoring resize: {}", e),
        }
        self.sync_pool_count(shared);
    }

    fn sync_pool_count(&self, shared: &RendererShared) {
        shared
            .counters
            .pools_created
            .store(self.pool.pools_created(), Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::SinkStatus;
    use lamco_frame::{I420Buffer, PixelBuffer, SamplePlane};
    use parking_lot::Mutex;
    use std::time::Duration;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum SinkEvent {
        Flush,
        Enqueue,
    }

    #[derive(Default)]
    struct RecordingSink {
        status: Mutex<SinkStatus>,
        events: Mutex<Vec<SinkEvent>>,
        samples: Mutex<Vec<MediaSample>>,
    }

    impl RecordingSink {
        fn fail(&self) {
            *self.status.lock() = SinkStatus::Failed;
        }

        fn events(&self) -> Vec<SinkEvent> {
            self.events.lock().clone()
        }

        fn pts_secs(&self) -> Vec<f64> {
            self.samples
                .lock()
                .iter()
                .filter_map(|sample| sample.presentation_time().as_secs_f64())
                .collect()
        }
    }

    impl DisplaySink for RecordingSink {
        fn status(&self) -> SinkStatus {
            *self.status.lock()
        }

        fn flush(&self) {
            self.events.lock().push(SinkEvent::Flush);
            *self.status.lock() = SinkStatus::Unknown;
        }

        fn enqueue(&self, sample: MediaSample) {
            self.events.lock().push(SinkEvent::Enqueue);
            self.samples.lock().push(sample);
            *self.status.lock() = SinkStatus::Rendering;
        }
    }

    fn i420_frame(size: FrameSize, timestamp_ns: i64) -> VideoFrame {
        let chroma = size.chroma_size();
        let len = size.area() as usize + 2 * chroma.area() as usize;
        let planar = I420Buffer::from_packed(size, &vec![64u8; len]).expect("packed frame");
        VideoFrame::i420(planar, timestamp_ns)
    }

    fn setup(interval: u32) -> (FrameRenderer, Arc<RecordingSink>) {
        let (presentation, _task) = PresentationQueue::spawn(32).expect("runtime available");
        let config = RendererConfig::builder().throttle_interval(interval).build();
        let renderer = FrameRenderer::spawn("test", &config, presentation).expect("renderer");

        let sink = Arc::new(RecordingSink::default());
        let dyn_sink: Arc<dyn DisplaySink> = sink.clone();
        renderer.attach(&dyn_sink);
        (renderer, sink)
    }

    #[tokio::test]
    async fn test_throttle_every_second_frame() {
        let (renderer, sink) = setup(2);
        let size = FrameSize::new(4, 4);

        for index in 1..=10i64 {
            renderer.render_frame(i420_frame(size, index * 1_000_000_000));
        }
        renderer.drain().await.expect("drain");

        assert_eq!(sink.pts_secs(), vec![2.0, 4.0, 6.0, 8.0, 10.0]);
        let stats = renderer.stats();
        assert_eq!(stats.frames_received, 10);
        assert_eq!(stats.frames_admitted, 5);
        assert_eq!(stats.conversions, 5);
        assert_eq!(stats.samples_delivered, 5);
    }

    #[tokio::test]
    async fn test_pool_reused_until_geometry_changes() {
        let (renderer, sink) = setup(1);

        renderer.render_frame(i420_frame(FrameSize::new(4, 4), 1));
        renderer.render_frame(i420_frame(FrameSize::new(4, 4), 2));
        renderer.render_frame(i420_frame(FrameSize::new(8, 8), 3));
        renderer.drain().await.expect("drain");

        let pools: Vec<_> = sink.samples.lock().iter().map(|s| s.image().pool_id()).collect();
        assert_eq!(pools.len(), 3);
        assert!(pools[0].is_some());
        assert_eq!(pools[0], pools[1]);
        assert_ne!(pools[1], pools[2]);
        assert_eq!(renderer.stats().pools_created, 2);
    }

    #[tokio::test]
    async fn test_live_sample_timing() {
        let (renderer, sink) = setup(1);

        renderer.render_frame(i420_frame(FrameSize::new(4, 4), 2_000_000_000));
        renderer.drain().await.expect("drain");

        let samples = sink.samples.lock();
        let timing = samples[0].timing();
        assert_eq!(timing.presentation.as_secs_f64(), Some(2.0));
        assert!(!timing.duration.is_valid());
        assert!(!timing.decode.is_valid());
    }

    #[tokio::test]
    async fn test_failed_sink_flushed_before_enqueue() {
        let (renderer, sink) = setup(1);

        sink.fail();
        renderer.render_frame(i420_frame(FrameSize::new(4, 4), 1));
        renderer.drain().await.expect("drain");
        assert_eq!(sink.events(), vec![SinkEvent::Flush, SinkEvent::Enqueue]);

        renderer.render_frame(i420_frame(FrameSize::new(4, 4), 2));
        renderer.drain().await.expect("drain");
        assert_eq!(
            sink.events(),
            vec![SinkEvent::Flush, SinkEvent::Enqueue, SinkEvent::Enqueue]
        );
        assert_eq!(renderer.stats().sink_recoveries, 1);
    }

    #[tokio::test]
    async fn test_healthy_sink_not_flushed() {
        let (renderer, sink) = setup(1);

        renderer.render_frame(i420_frame(FrameSize::new(4, 4), 1));
        renderer.drain().await.expect("drain");

        assert_eq!(sink.events(), vec![SinkEvent::Enqueue]);
        assert_eq!(renderer.stats().sink_recoveries, 0);
    }

    #[tokio::test]
    async fn test_no_sink_discards() {
        let (presentation, _task) = PresentationQueue::spawn(8).expect("runtime available");
        let config = RendererConfig::builder().throttle_interval(1).build();
        let renderer = FrameRenderer::spawn("unattached", &config, presentation).expect("renderer");

        renderer.render_frame(i420_frame(FrameSize::new(4, 4), 1));
        renderer.drain().await.expect("drain");

        let stats = renderer.stats();
        assert_eq!(stats.samples_delivered, 0);
        assert_eq!(stats.samples_discarded, 1);
        assert!(!renderer.has_sink());
    }

    #[tokio::test]
    async fn test_expired_sink_discards() {
        let (renderer, sink) = setup(1);
        assert!(renderer.has_sink());
        drop(sink);
        assert!(!renderer.has_sink());

        renderer.render_frame(i420_frame(FrameSize::new(4, 4), 1));
        renderer.drain().await.expect("drain");
        assert_eq!(renderer.stats().samples_discarded, 1);
    }

    #[tokio::test]
    async fn test_dropped_renderer_abandons_queued_frames() {
        let (presentation, _task) = PresentationQueue::spawn(8).expect("runtime available");
        let config = RendererConfig::builder().throttle_interval(1).build();
        let renderer = FrameRenderer::spawn("short-lived", &config, presentation.clone()).expect("renderer");

        let sink = Arc::new(RecordingSink::default());
        let dyn_sink: Arc<dyn DisplaySink> = sink.clone();
        renderer.attach(&dyn_sink);

        // Current-thread runtime: the lane has not run yet
        for index in 1..=4 {
            renderer.render_frame(i420_frame(FrameSize::new(4, 4), index));
        }
        drop(renderer);

        tokio::time::sleep(Duration::from_millis(10)).await;
        presentation.drain().await.expect("context alive");
        assert!(sink.events().is_empty());
    }

    #[tokio::test]
    async fn test_native_buffer_passthrough() {
        let (renderer, sink) = setup(1);
        let native = Arc::new(PixelBuffer::detached(FrameSize::new(16, 8), PixelFormat::Bgra, 64).expect("detached buffer"));

        renderer.render_frame(VideoFrame::native(Arc::clone(&native), 5));
        renderer.drain().await.expect("drain");

        let samples = sink.samples.lock();
        assert!(Arc::ptr_eq(samples[0].image(), &native));
        assert_eq!(samples[0].image().pool_id(), None);
        assert_eq!(renderer.stats().pools_created, 0);
    }

    #[tokio::test]
    async fn test_unsupported_native_dropped() {
        let (renderer, sink) = setup(1);
        let native = Arc::new(PixelBuffer::detached(FrameSize::new(4, 4), PixelFormat::I420, 64).expect("detached buffer"));

        renderer.render_frame(VideoFrame::native(native, 1));
        renderer.render_frame(i420_frame(FrameSize::new(4, 4), 2));
        renderer.drain().await.expect("drain");

        let stats = renderer.stats();
        assert_eq!(stats.conversions, 2);
        assert_eq!(stats.conversion_failures, 1);
        assert_eq!(sink.events(), vec![SinkEvent::Enqueue]);
    }

    #[tokio::test]
    async fn test_set_size_creates_pool_eagerly() {
        let (renderer, _sink) = setup(1);

        renderer.set_size(FrameSize::new(16, 16));
        renderer.drain().await.expect("drain");
        assert_eq!(renderer.stats().pools_created, 1);

        renderer.render_frame(i420_frame(FrameSize::new(16, 16), 1));
        renderer.set_size(FrameSize::new(0, 0));
        renderer.drain().await.expect("drain");

        let stats = renderer.stats();
        assert_eq!(stats.pools_created, 1);
        assert_eq!(stats.samples_delivered, 1);
    }

    #[tokio::test]
    async fn test_full_lane_drops_frames() {
        let (presentation, _task) = PresentationQueue::spawn(8).expect("runtime available");
        let config = RendererConfig::builder()
            .throttle_interval(1)
            .lane_capacity(1)
            .build();
        let renderer = FrameRenderer::spawn("backlogged", &config, presentation).expect("renderer");

        for index in 1..=3 {
            renderer.render_frame(i420_frame(FrameSize::new(4, 4), index));
        }
        renderer.drain().await.expect("drain");

        let stats = renderer.stats();
        assert_eq!(stats.frames_admitted, 3);
        assert_eq!(stats.backlog_drops, 2);
        assert_eq!(stats.conversions, 1);
    }

    #[tokio::test]
    async fn test_set_size_survives_full_lane() {
        let (presentation, _task) = PresentationQueue::spawn(8).expect("runtime available");
        let config = RendererConfig::builder()
            .throttle_interval(1)
            .lane_capacity(1)
            .build();
        let renderer = FrameRenderer::spawn("backlogged", &config, presentation).expect("renderer");

        renderer.render_frame(i420_frame(FrameSize::new(4, 4), 1));
        renderer.set_size(FrameSize::new(16, 16));
        renderer.drain().await.expect("drain");

        let stats = renderer.stats();
        assert_eq!(stats.conversions, 1);
        assert_eq!(stats.pools_created, 2);
    }

    #[tokio::test]
    async fn test_latest_set_size_wins() {
        let (renderer, _sink) = setup(1);

        renderer.set_size(FrameSize::new(16, 16));
        renderer.set_size(FrameSize::new(32, 32));
        renderer.drain().await.expect("drain");
        assert_eq!(renderer.stats().pools_created, 1);

        // Matches the announced size, so no new pool
        renderer.render_frame(i420_frame(FrameSize::new(32, 32), 1));
        renderer.drain().await.expect("drain");
        assert_eq!(renderer.stats().pools_created, 1);
    }

    #[tokio::test]
    async fn test_malformed_frame_does_not_stop_renderer() {
        let (renderer, sink) = setup(1);

        renderer.render_frame(i420_frame(FrameSize::new(4, 4), 1));
        let malformed = I420Buffer::new(
            FrameSize::new(u32::MAX, u32::MAX),
            SamplePlane::new(vec![0u8; 4], 4),
            SamplePlane::new(vec![0u8; 4], 4),
            SamplePlane::new(vec![0u8; 4], 4),
        );
        renderer.render_frame(VideoFrame::i420(malformed, 2));
        renderer.render_frame(i420_frame(FrameSize::new(4, 4), 3));
        renderer.drain().await.expect("lane still running");

        let stats = renderer.stats();
        assert_eq!(stats.samples_delivered, 2);
        assert_eq!(stats.conversion_failures, 1);
        assert_eq!(sink.events(), vec![SinkEvent::Enqueue, SinkEvent::Enqueue]);
    }

    #[tokio::test]
    async fn test_rejected_frame_keeps_pool() {
        let (renderer, sink) = setup(1);

        renderer.render_frame(i420_frame(FrameSize::new(4, 4), 1));
        let short = I420Buffer::new(
            FrameSize::new(8, 8),
            SamplePlane::new(vec![0u8; 4], 8),
            SamplePlane::new(vec![0u8; 4], 4),
            SamplePlane::new(vec![0u8; 4], 4),
        );
        renderer.render_frame(VideoFrame::i420(short, 2));
        renderer.render_frame(i420_frame(FrameSize::new(4, 4), 3));
        renderer.drain().await.expect("drain");

        let stats = renderer.stats();
        assert_eq!(stats.conversion_failures, 1);
        assert_eq!(stats.pools_created, 1);

        let pools: Vec<_> = sink.samples.lock().iter().map(|s| s.image().pool_id()).collect();
        assert_eq!(pools.len(), 2);
        assert_eq!(pools[0], pools[1]);
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let (presentation, _task) = PresentationQueue::spawn(8).expect("runtime available");
        let config = RendererConfig {
            lane_capacity: 0,
            ..Default::default()
        };

        let result = FrameRenderer::spawn("bad", &config, presentation);
        assert!(matches!(result, Err(RenderError::InvalidConfig(_))));
    }

    #[test]
    fn test_spawn_outside_runtime() {
        let (presentation, _driver) = PresentationQueue::channel(8);
        let result = FrameRenderer::spawn("orphan", &RendererConfig::default(), presentation);
        assert!(matches!(result, Err(RenderError::NoRuntime)));
    }
}
