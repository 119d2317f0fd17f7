//! Countdown latch that marks a frame as complete.

use std::sync::{Condvar, Mutex, PoisonError};
use std::time::Duration;

use super::job::Generation;

#[derive(Debug, Default)]
struct LatchState {
    generation: Generation,
    remaining: usize,
}

/// Counts a frame's outstanding jobs down to zero.
///
/// The latch is armed with the frame's generation; completions reported for
/// any other generation are ignored, so a straggler from a sealed frame can
/// never complete the next one early.
#[derive(Debug, Default)]
pub struct FrameLatch {
    state: Mutex<LatchState>,
    done: Condvar,
}

impl FrameLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting `jobs` completions for `generation`.
    pub fn arm(&self, generation: Generation, jobs: usize) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.generation = generation;
        state.remaining = jobs;
        if jobs == 0 {
            self.done.notify_all();
        }
    }

    /// Record one completed job. Returns `false` if the job belonged to a
    /// different generation or the latch had already reached zero.
    pub fn count_down(&self, generation: Generation) -> bool {
        self.complete(generation, || ())
    }

    /// Like [`FrameLatch::count_down`], but runs `publish` first while the
    /// latch is held, and only if the job still counts.
    ///
    /// Once [`FrameLatch::seal`] has returned, no `publish` for an older
    /// generation can run.
    pub fn complete(&self, generation: Generation, publish: impl FnOnce()) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.generation != generation || state.remaining == 0 {
            return false;
        }
        publish();
        state.remaining -= 1;
        if state.remaining == 0 {
            self.done.notify_all();
        }
        true
    }

    /// Close the armed frame and move to `next`. Completions for the old
    /// generation are ignored from here on.
    pub fn seal(&self, next: Generation) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.generation = next;
        state.remaining = 0;
        self.done.notify_all();
    }

    /// Jobs still outstanding for the armed generation.
    pub fn remaining(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remaining
    }

    /// Block until the count reaches zero or `timeout` elapses.
    ///
    /// Returns `true` if every job completed in time.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let (state, _) = self
            .done
            .wait_timeout_while(state, timeout, |s| s.remaining > 0)
            .unwrap_or_else(PoisonError::into_inner);
        state.remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn empty_frame_is_complete_immediately() {
        let latch = FrameLatch::new();
        latch.arm(1, 0);
        assert!(latch.wait_timeout(Duration::from_millis(1)));
    }

    #[test]
    fn completes_when_all_jobs_count_down() {
        let latch = Arc::new(FrameLatch::new());
        latch.arm(7, 4);
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let latch = Arc::clone(&latch);
                thread::spawn(move || latch.count_down(7))
            })
            .collect();
        assert!(latch.wait_timeout(Duration::from_secs(5)));
        for w in workers {
            assert!(w.join().unwrap());
        }
        assert_eq!(latch.remaining(), 0);
    }

    #[test]
    fn times_out_with_jobs_outstanding() {
        let latch = FrameLatch::new();
        latch.arm(1, 2);
        latch.count_down(1);
        let start = Instant::now();
        assert!(!latch.wait_timeout(Duration::from_millis(30)));
        assert!(start.elapsed() >= Duration::from_millis(30));
        assert_eq!(latch.remaining(), 1);
    }

    #[test]
    fn stale_generation_is_ignored() {
        let latch = FrameLatch::new();
        latch.arm(2, 1);
        assert!(!latch.count_down(1));
        assert_eq!(latch.remaining(), 1);
        assert!(latch.count_down(2));
        assert!(!latch.count_down(2));
    }

    #[test]
    fn sealed_frame_rejects_late_completions() {
        let latch = FrameLatch::new();
        latch.arm(3, 2);
        latch.seal(4);
        let mut published = false;
        assert!(!latch.complete(3, || published = true));
        assert!(!published);
        assert_eq!(latch.remaining(), 0);
    }
}
