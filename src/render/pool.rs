//! Worker threads that drain the draw-job queue.
//!
//! ```text
//!   Engine::render_frame
//!          │ push_batch
//!          ▼
//!   ┌───────────────────────────┐
//!   │ JobQueue                  │
//!   │ Mutex<VecDeque<DrawJob>>  │
//!   │ + Condvar                 │
//!   └───────────────────────────┘
//!      │        │         │
//!      ▼        ▼         ▼
//!   trirast-  trirast-  trirast-     RenderContext::execute
//!   worker-0  worker-1  worker-N ──► fill, publish stats, count down
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use super::context::RenderContext;
use super::job::DrawJob;
use crate::error::{Error, Result};

/// FIFO of pending jobs. One lock guards both ends.
#[derive(Debug, Default)]
struct JobQueue {
    jobs: Mutex<VecDeque<DrawJob>>,
    ready: Condvar,
}

impl JobQueue {
    fn push_batch(&self, batch: impl IntoIterator<Item = DrawJob>) -> usize {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        let before = jobs.len();
        jobs.extend(batch);
        let added = jobs.len() - before;
        match added {
            0 => {}
            1 => self.ready.notify_one(),
            _ => self.ready.notify_all(),
        }
        added
    }

    /// Block until a job is available or `stop` is raised.
    fn pop(&self, stop: &AtomicBool) -> Option<DrawJob> {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if stop.load(Ordering::Acquire) {
                return None;
            }
            if let Some(job) = jobs.pop_front() {
                return Some(job);
            }
            jobs = self
                .ready
                .wait(jobs)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn drain(&self) -> usize {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        let dropped = jobs.len();
        jobs.clear();
        dropped
    }

    fn len(&self) -> usize {
        self.jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Wake every sleeper so it can observe the stop flag.
    fn wake_all(&self) {
        let _jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        self.ready.notify_all();
    }
}

/// A fixed set of named worker threads rendering draw jobs.
///
/// Dropping the pool shuts it down.
#[derive(Debug)]
pub struct WorkerPool {
    queue: Arc<JobQueue>,
    shutdown: Arc<AtomicBool>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `workers` threads (at least one) executing jobs against
    /// `context`.
    pub fn start(workers: usize, context: Arc<RenderContext>) -> Result<Self> {
        let workers = workers.max(1);
        let mut pool = Self {
            queue: Arc::new(JobQueue::default()),
            shutdown: Arc::new(AtomicBool::new(false)),
            workers: Vec::with_capacity(workers),
        };

        for worker_id in 0..workers {
            let queue = Arc::clone(&pool.queue);
            let shutdown = Arc::clone(&pool.shutdown);
            let context = Arc::clone(&context);

            // On error `pool` is dropped, which stops the threads already running.
            let handle = thread::Builder::new()
                .name(format!("trirast-worker-{worker_id}"))
                .spawn(move || Self::worker_loop(worker_id, &queue, &shutdown, &context))
                .map_err(Error::WorkerSpawn)?;
            pool.workers.push(handle);
        }

        log::info!("started {workers} render worker(s)");
        Ok(pool)
    }

    fn worker_loop(
        worker_id: usize,
        queue: &JobQueue,
        shutdown: &AtomicBool,
        context: &RenderContext,
    ) {
        while let Some(job) = queue.pop(shutdown) {
            context.execute(worker_id, &job);
        }
        log::trace!("worker {worker_id} exiting");
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Queue a frame's jobs. Returns how many were added.
    pub fn push_batch(&self, jobs: impl IntoIterator<Item = DrawJob>) -> usize {
        self.queue.push_batch(jobs)
    }

    /// Jobs queued but not yet picked up by a worker.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Drop every queued job. Jobs already running are unaffected.
    pub fn cancel_pending(&self) -> usize {
        self.queue.drain()
    }

    /// Stop and join every worker. Queued jobs are discarded; a worker in the
    /// middle of a fill finishes that job first.
    pub fn shutdown(&mut self) {
        if self.workers.is_empty() {
            return;
        }
        self.shutdown.store(true, Ordering::Release);
        self.queue.wake_all();

        let count = self.workers.len();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                log::warn!("render worker panicked");
            }
        }
        let dropped = self.queue.drain();
        log::info!("stopped {count} render worker(s), {dropped} job(s) discarded");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
