//! L3 Molecular Layer: Sequencer trait and the owned `Motion` handle
//!
//! A sequencer turns timestamps into a value snapshot. It never draws
//! anything; a render step reads [`Motion::frame`] and applies it.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use super::clock::{CancelHandle, Flow, FrameScheduler};
use super::timing::Millis;

/// Time-driven state that advances once per frame
pub trait Sequencer: Send + 'static {
    /// Snapshot handed to the render step
    type Frame: Clone;

    /// Advance to `now`. Returning [`Flow::Stop`] ends the clock registration.
    fn tick(&mut self, now: Millis) -> Flow;

    /// Current computed values
    fn frame(&self) -> Self::Frame;
}

fn lock<S>(sequencer: &Mutex<S>) -> MutexGuard<'_, S> {
    sequencer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// An explicitly owned, running (or idle) sequencer
///
/// Dropping the handle cancels its clock registration, so the sequencer can
/// never outlive the view that owns it.
pub struct Motion<S: Sequencer> {
    sequencer: Arc<Mutex<S>>,
    cancel: Option<CancelHandle>,
}

impl<S: Sequencer> Motion<S> {
    /// Register `sequencer` with `scheduler` and start ticking
    pub fn start(scheduler: &dyn FrameScheduler, sequencer: S) -> Self {
        let sequencer = Arc::new(Mutex::new(sequencer));
        let ticking = Arc::clone(&sequencer);
        let cancel = scheduler.start(Box::new(move |now| lock(&ticking).tick(now)));
        debug!(sequencer = std::any::type_name::<S>(), "Motion started");
        Self {
            sequencer,
            cancel: Some(cancel),
        }
    }

    /// Hold a sequencer without any clock; its frame stays as constructed
    pub fn idle(sequencer: S) -> Self {
        Self {
            sequencer: Arc::new(Mutex::new(sequencer)),
            cancel: None,
        }
    }

    /// Snapshot of the current values
    pub fn frame(&self) -> S::Frame {
        lock(&self.sequencer).frame()
    }

    /// Run host input (scroll, hover, pause) against the sequencer
    pub fn with<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut lock(&self.sequencer))
    }

    /// Cancel the clock registration. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
            debug!(sequencer = std::any::type_name::<S>(), "Motion stopped");
        }
    }

    /// Whether a clock is still driving the sequencer
    pub fn is_running(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|cancel| !cancel.is_cancelled())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::clock::ManualClock;

    /// Counts how often its state was mutated
    struct Counter {
        mutations: u32,
        stop_after: u32,
    }

    impl Sequencer for Counter {
        type Frame = u32;

        fn tick(&mut self, _now: Millis) -> Flow {
            self.mutations += 1;
            if self.mutations >= self.stop_after {
                Flow::Stop
            } else {
                Flow::Continue
            }
        }

        fn frame(&self) -> u32 {
            self.mutations
        }
    }

    fn counter(stop_after: u32) -> Counter {
        Counter {
            mutations: 0,
            stop_after,
        }
    }

    #[test]
    fn test_stop_prevents_further_mutation() {
        let clock = ManualClock::new();
        let mut motion = Motion::start(&clock, counter(u32::MAX));

        clock.advance_to(16.0);
        clock.advance_to(32.0);
        assert!(motion.is_running());

        motion.stop();
        motion.stop();
        assert!(!motion.is_running());

        for i in 3..10 {
            clock.advance_to(i as f64 * 16.0);
        }
        assert_eq!(motion.frame(), 2);
    }

    #[test]
    fn test_drop_releases_registration() {
        let clock = ManualClock::new();
        let motion = Motion::start(&clock, counter(u32::MAX));
        clock.advance_to(16.0);
        assert_eq!(clock.active(), 1);

        drop(motion);
        assert_eq!(clock.advance_to(32.0), 0);
        assert_eq!(clock.active(), 0);
    }

    #[test]
    fn test_self_stopping_sequencer() {
        let clock = ManualClock::new();
        let motion = Motion::start(&clock, counter(3));
        clock.run_until(160.0, 16.0);
        assert_eq!(motion.frame(), 3);
        assert!(!motion.is_running());
    }

    #[test]
    fn test_idle_motion_never_ticks() {
        let motion = Motion::idle(counter(u32::MAX));
        assert!(!motion.is_running());
        motion.with(|c| c.mutations = 7);
        assert_eq!(motion.frame(), 7);
    }
}
