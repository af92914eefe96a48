//! Presentation context
//!
//! Display sinks are driven from exactly one context. Work destined for it
//! is posted as closures onto a bounded queue with a single consumer, the
//! [`PresentationDriver`]. The driver either runs on its own task
//! ([`PresentationQueue::spawn`]) or is pumped by a platform main loop
//! through [`PresentationDriver::run_pending`].

use std::fmt;

use tokio::runtime::Handle;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::error::{RenderError, Result};

/// Unit of work for the presentation context
pub type UiTask = Box<dyn FnOnce() + Send + 'static>;

/// Handle for posting work onto the presentation context
#[derive(Clone)]
pub struct PresentationQueue {
    tx: mpsc::Sender<UiTask>,
}

impl PresentationQueue {
    /// Create a queue and the driver that consumes it
    ///
    /// A zero capacity is raised to 1.
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, PresentationDriver) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, PresentationDriver { rx })
    }

    /// Create a queue whose driver runs on a task of the current runtime
    pub fn spawn(capacity: usize) -> Result<(Self, JoinHandle<()>)> {
        let handle = Handle::try_current().map_err(|_| RenderError::NoRuntime)?;
        let (queue, driver) = Self::channel(capacity);
        let task = handle.spawn(driver.run());
        debug!(capacity, "Presentation context started");
        Ok((queue, task))
    }

    /// Post `task` without waiting
    ///
    /// Returns `false` if the queue is full or closed; the task is dropped.
    pub fn post<F>(&self, task: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        match self.tx.try_send(Box::new(task)) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!("Presentation queue full, dropping task");
                false
            }
            Err(TrySendError::Closed(_)) => {
                debug!("Presentation context closed, dropping task");
                false
            }
        }
    }

    /// Queue `task`, waiting for room if the queue is full
    pub async fn submit<F>(&self, task: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.tx
            .send(Box::new(task))
            .await
            .map_err(|_| RenderError::PresentationClosed)
    }

    /// Wait until every task queued before this call has run
    pub async fn drain(&self) -> Result<()> {
        let (done_tx, done_rx) = oneshot::channel();
        self.submit(move || {
            let _ = done_tx.send(());
        })
        .await?;
        done_rx.await.map_err(|_| RenderError::PresentationClosed)
    }

    /// Whether the driver has gone away
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl fmt::Debug for PresentationQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentationQueue")
            .field("capacity", &self.tx.max_capacity())
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

/// Single consumer of a [`PresentationQueue`]
pub struct PresentationDriver {
    rx: mpsc::Receiver<UiTask>,
}

impl PresentationDriver {
    /// Run tasks in order until every queue handle is dropped
    pub async fn run(mut self) {
        while let Some(task) = self.rx.recv().await {
            task();
        }
        debug!("Presentation context stopped");
    }

    /// Run whatever is queued right now and return how many tasks ran
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            task();
            ran += 1;
        }
        if ran > 0 {
            trace!(ran, "Ran pending presentation tasks");
        }
        ran
    }
}

impl fmt::Debug for PresentationDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentationDriver")
            .field("queued", &self.rx.len())
            .finish()
    }
}
