//! Per-frame counters.

use std::ops::AddAssign;
use std::sync::{Mutex, PoisonError};

/// Counters accumulated while rendering a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Fragments that passed the depth test and were written.
    pub drawn_fragments: u64,
    /// Fragments that projected outside the view.
    pub discarded_fragments: u64,
    /// Fragments that failed the depth test.
    pub occluded_fragments: u64,
    /// Back-facing triangles.
    pub discarded_triangles: u64,
    /// Triangles skipped because their step size fell below the floor.
    pub dense_triangles: u64,
    /// Triangles cut short by the per-triangle budget.
    pub timed_out_triangles: u64,
    /// Jobs that ran to an outcome within their frame.
    pub completed_jobs: u64,
}

impl AddAssign for FrameStats {
    fn add_assign(&mut self, rhs: Self) {
        self.drawn_fragments += rhs.drawn_fragments;
        self.discarded_fragments += rhs.discarded_fragments;
        self.occluded_fragments += rhs.occluded_fragments;
        self.discarded_triangles += rhs.discarded_triangles;
        self.dense_triangles += rhs.dense_triangles;
        self.timed_out_triangles += rhs.timed_out_triangles;
        self.completed_jobs += rhs.completed_jobs;
    }
}

/// One stats slot per worker.
///
/// A worker only ever locks its own slot, so the locks are uncontended while
/// a frame is in flight. The orchestrator sums and clears every slot once per
/// frame.
#[derive(Debug)]
pub struct StatsBoard {
    slots: Box<[Mutex<FrameStats>]>,
}

impl StatsBoard {
    pub fn new(workers: usize) -> Self {
        Self {
            slots: (0..workers.max(1))
                .map(|_| Mutex::new(FrameStats::default()))
                .collect(),
        }
    }

    /// Add a finished job's counters to `worker`'s slot.
    pub fn record(&self, worker: usize, stats: FrameStats) {
        let slot = &self.slots[worker % self.slots.len()];
        *slot.lock().unwrap_or_else(PoisonError::into_inner) += stats;
    }

    /// Totals so far without resetting.
    pub fn snapshot(&self) -> FrameStats {
        let mut total = FrameStats::default();
        for slot in self.slots.iter() {
            total += *slot.lock().unwrap_or_else(PoisonError::into_inner);
        }
        total
    }

    /// Totals so far, leaving every slot at zero.
    pub fn drain(&self) -> FrameStats {
        let mut total = FrameStats::default();
        for slot in self.slots.iter() {
            total += std::mem::take(&mut *slot.lock().unwrap_or_else(PoisonError::into_inner));
        }
        total
    }
}
