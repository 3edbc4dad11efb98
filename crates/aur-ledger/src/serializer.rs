//! Write serializer
//!
//! A bounded FIFO of write jobs drained by one dedicated thread, so at most
//! one job touches the store at a time and jobs complete in admission order.
//! Each job carries a oneshot that receives its result.
//!
//! A handler error is fatal: the worker replies with it, answers every job
//! still queued with [`LedgerError::Halted`], and stops. Later submissions
//! are refused with `Halted` as well.

use crate::error::{LedgerError, LedgerResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

/// Work executed on the writer thread
pub trait WriteHandler: Send + 'static {
    /// Job description
    type Job: Send + 'static;
    /// Job result
    type Output: Send + 'static;

    /// Run one job; an error halts the writer
    fn handle(&mut self, job: Self::Job) -> LedgerResult<Self::Output>;
}

struct Request<H: WriteHandler> {
    job: H::Job,
    reply: oneshot::Sender<LedgerResult<H::Output>>,
}

/// Handle to the writer thread
pub struct WriteQueue<H: WriteHandler> {
    tx: mpsc::Sender<Request<H>>,
    halted: Arc<AtomicBool>,
    admission_timeout: Option<Duration>,
    worker: Option<JoinHandle<()>>,
}

impl<H: WriteHandler> WriteQueue<H> {
    /// Spawn the writer thread.
    ///
    /// `depth` bounds the number of admitted jobs not yet started. With an
    /// `admission_timeout`, a submission that cannot get a slot in time is
    /// refused with [`LedgerError::QueueFull`].
    pub fn spawn(
        name: &str,
        handler: H,
        depth: usize,
        admission_timeout: Option<Duration>,
    ) -> LedgerResult<Self> {
        if depth == 0 {
            return Err(LedgerError::Config("queue depth must be at least 1".into()));
        }
        let (tx, rx) = mpsc::channel(depth);
        let halted = Arc::new(AtomicBool::new(false));
        let worker_halted = Arc::clone(&halted);
        let worker = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || run_worker(handler, rx, worker_halted))?;
        info!(thread = name, depth, "write serializer started");

        Ok(Self {
            tx,
            halted,
            admission_timeout,
            worker: Some(worker),
        })
    }

    /// Wait for a slot, enqueue `job` and return the receiver of its result
    pub async fn submit(&self, job: H::Job) -> LedgerResult<oneshot::Receiver<LedgerResult<H::Output>>> {
        if self.is_halted() {
            return Err(LedgerError::Halted);
        }

        let permit = match self.admission_timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.tx.reserve())
                .await
                .map_err(|_| LedgerError::QueueFull)?,
            None => self.tx.reserve().await,
        }
        .map_err(|_| self.closed_error())?;

        let (reply, rx) = oneshot::channel();
        permit.send(Request { job, reply });
        Ok(rx)
    }

    /// Jobs admitted and not yet picked up by the worker
    pub fn queued(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    /// Whether a fatal error stopped the worker
    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::Acquire)
    }

    /// Stop accepting jobs, let the worker finish the queue, and join it
    pub fn shutdown(mut self) {
        let worker = self.worker.take();
        drop(self);
        if let Some(worker) = worker {
            if worker.join().is_err() {
                error!("writer thread panicked");
            }
        }
    }

    fn closed_error(&self) -> LedgerError {
        if self.is_halted() {
            LedgerError::Halted
        } else {
            LedgerError::QueueClosed
        }
    }
}

fn run_worker<H: WriteHandler>(mut handler: H, mut rx: mpsc::Receiver<Request<H>>, halted: Arc<AtomicBool>) {
    while let Some(Request { job, reply }) = rx.blocking_recv() {
        match handler.handle(job) {
            Ok(output) => {
                // the caller may have stopped waiting
                let _ = reply.send(Ok(output));
            }
            Err(e) => {
                error!(error = %e, "fatal error in writer, halting");
                halted.store(true, Ordering::Release);
                let _ = reply.send(Err(e));
                rx.close();
                while let Some(Request { reply, .. }) = rx.blocking_recv() {
                    let _ = reply.send(Err(LedgerError::Halted));
                }
                return;
            }
        }
    }
    debug!("write queue closed, writer exiting");
}
