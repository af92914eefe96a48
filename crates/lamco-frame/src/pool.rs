//! Reusable pixel buffer pools
//!
//! A [`PixelBufferPool`] holds at most one live pool for one geometry
//! (size + format). Asking for a buffer of a different geometry discards
//! the current pool and creates a fresh one; pools are never resized in
//! place. Buffers still in flight from a discarded pool stay valid and
//! free their storage when dropped.
//!
//! The pool is owned by a single renderer lane, so it needs `&mut self`
//! and no locking of its own. Only the free list is shared, because
//! buffers return to it from whichever thread drops the sample.
//!
//! # Examples
//!
//! ```rust
//! use lamco_frame::{FrameSize, PixelBufferPool, PixelFormat, PoolConfig};
//!
//! let mut pool = PixelBufferPool::new(PoolConfig::default());
//!
//! let first = pool.buffer(FrameSize::new(640, 480), PixelFormat::Nv12)?;
//! let id = first.pool_id();
//! drop(first);
//!
//! // Same geometry reuses the pool
//! let second = pool.buffer(FrameSize::new(640, 480), PixelFormat::Nv12)?;
//! assert_eq!(second.pool_id(), id);
//! # Ok::<(), lamco_frame::PoolError>(())
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::buffer::{PixelBuffer, Plane};
use crate::config::PoolConfig;
use crate::error::PoolError;
use crate::format::{FrameSize, PixelFormat};

static NEXT_POOL_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one pool instance
///
/// Every (re)creation yields a new id, so comparing ids tells whether two
/// buffers came from the same pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolId(u64);

impl PoolId {
    fn next() -> Self {
        Self(NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pool-{}", self.0)
    }
}

/// Geometry a pool allocates for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferGeometry {
    /// Buffer dimensions
    pub size: FrameSize,

    /// Pixel layout
    pub format: PixelFormat,
}

pub(crate) struct PoolShared {
    id: PoolId,
    geometry: BufferGeometry,
    max_buffers: usize,
    row_alignment: usize,
    free: Mutex<Vec<Vec<Plane>>>,
    outstanding: AtomicUsize,
}

impl PoolShared {
    fn new(geometry: BufferGeometry, config: &PoolConfig) -> Self {
        Self {
            id: PoolId::next(),
            geometry,
            max_buffers: config.max_buffers,
            row_alignment: config.row_alignment,
            free: Mutex::new(Vec::with_capacity(config.max_buffers)),
            outstanding: AtomicUsize::new(0),
        }
    }

    fn allocate(self: &Arc<Self>) -> Result<PixelBuffer, PoolError> {
        let reserved = self
            .outstanding
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.max_buffers).then_some(n + 1)
            });
        if reserved.is_err() {
            return Err(PoolError::Exhausted {
                capacity: self.max_buffers,
            });
        }

        let recycled = self.free.lock().pop();
        let planes = match recycled {
            Some(planes) => planes,
            None => {
                trace!(pool = %self.id, "Allocating new pixel buffer storage");
                let planes = self
                    .geometry
                    .format
                    .plane_dimensions(self.geometry.size)
                    .into_iter()
                    .map(|dims| Plane::allocate(dims, self.row_alignment))
                    .collect::<Option<Vec<_>>>();
                match planes {
                    Some(planes) => planes,
                    None => {
                        self.outstanding.fetch_sub(1, Ordering::AcqRel);
                        return Err(PoolError::InvalidGeometry(self.geometry.size));
                    }
                }
            }
        };

        Ok(PixelBuffer::from_pool(
            self.geometry.size,
            self.geometry.format,
            planes,
            self.id,
            Arc::downgrade(self),
        ))
    }

    pub(crate) fn recycle(&self, planes: Vec<Plane>) {
        self.outstanding.fetch_sub(1, Ordering::AcqRel);
        if !planes.is_empty() {
            self.free.lock().push(planes);
        }
    }
}

/// Pool of reusable pixel buffers for one geometry at a time
pub struct PixelBufferPool {
    config: PoolConfig,
    current: Option<Arc<PoolShared>>,
    pools_created: u64,
}

impl PixelBufferPool {
    /// Create an empty pool holder; the first request creates the pool
    #[must_use]
    pub fn new(config: PoolConfig) -> Self {
        Self {
            config,
            current: None,
            pools_created: 0,
        }
    }

    /// Get a buffer for `size` and `format`
    ///
    /// Reuses the current pool when the geometry matches, otherwise
    /// replaces it first. Fails without blocking when the pool is exhausted.
    pub fn buffer(&mut self, size: FrameSize, format: PixelFormat) -> Result<PixelBuffer, PoolError> {
        self.pool_for(size, format)?.allocate()
    }

    /// Make sure a pool exists for `size` and `format` without allocating
    ///
    /// Used when the expected geometry is announced ahead of the frames.
    pub fn prepare(&mut self, size: FrameSize, format: PixelFormat) -> Result<PoolId, PoolError> {
        self.pool_for(size, format).map(|pool| pool.id)
    }

    fn pool_for(&mut self, size: FrameSize, format: PixelFormat) -> Result<Arc<PoolShared>, PoolError> {
        // Checked before the current pool is touched, so a bad request never
        // costs the live pool.
        if size.is_empty() || format.buffer_len(size, self.config.row_alignment).is_none() {
            return Err(PoolError::InvalidGeometry(size));
        }

        let geometry = BufferGeometry { size, format };
        if let Some(pool) = self.current.as_ref().filter(|pool| pool.geometry == geometry) {
            return Ok(Arc::clone(pool));
        }

        if let Some(old) = self.current.take() {
            debug!(
                pool = %old.id,
                from = %old.geometry.size,
                to = %size,
                "Discarding pixel buffer pool after geometry change"
            );
        }

        let pool = Arc::new(PoolShared::new(geometry, &self.config));
        self.pools_created += 1;
        debug!(
            pool = %pool.id,
            %size,
            %format,
            max_buffers = self.config.max_buffers,
            "Created pixel buffer pool"
        );

        self.current = Some(Arc::clone(&pool));
        Ok(pool)
    }

    /// Id of the live pool, if one has been created
    pub fn current_id(&self) -> Option<PoolId> {
        self.current.as_ref().map(|pool| pool.id)
    }

    /// Geometry of the live pool
    pub fn geometry(&self) -> Option<BufferGeometry> {
        self.current.as_ref().map(|pool| pool.geometry)
    }

    /// Buffers of the live pool currently in flight
    pub fn outstanding(&self) -> usize {
        self.current
            .as_ref()
            .map_or(0, |pool| pool.outstanding.load(Ordering::Acquire))
    }

    /// Number of pools created over this holder's lifetime
    pub fn pools_created(&self) -> u64 {
        self.pools_created
    }

    /// Configuration
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }
}

impl fmt::Debug for PixelBufferPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBufferPool")
            .field("current", &self.current_id())
            .field("geometry", &self.geometry())
            .field("pools_created", &self.pools_created)
            .finish()
    }
}
