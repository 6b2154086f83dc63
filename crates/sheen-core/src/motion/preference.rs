//! L4 Atomic Layer: Reduced-motion preference
//!
//! The host owns a [`MotionPreference`] and flips it when the platform reports
//! a change. Sequencers only ever see a read-only [`MotionSignal`]: they branch
//! on it when configured, and consult it again before starting new motion.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

/// Writable side of the reduced-motion flag
#[derive(Debug, Clone)]
pub struct MotionPreference {
    tx: Arc<watch::Sender<bool>>,
}

impl MotionPreference {
    pub fn new(reduced: bool) -> Self {
        let (tx, _rx) = watch::channel(reduced);
        Self { tx: Arc::new(tx) }
    }

    /// Update the flag; observers are notified only on an actual change
    pub fn set_reduced(&self, reduced: bool) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == reduced {
                false
            } else {
                *current = reduced;
                true
            }
        });
        if changed {
            info!(reduced, "Reduced-motion preference changed");
        }
    }

    /// Flip the flag and return the new value
    pub fn toggle(&self) -> bool {
        let reduced = !self.prefers_reduced();
        self.set_reduced(reduced);
        reduced
    }

    pub fn prefers_reduced(&self) -> bool {
        *self.tx.borrow()
    }

    /// Read-only observer for sequencers
    pub fn signal(&self) -> MotionSignal {
        MotionSignal {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for MotionPreference {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Read-only view of the reduced-motion flag
#[derive(Debug, Clone)]
pub struct MotionSignal {
    rx: watch::Receiver<bool>,
}

impl MotionSignal {
    /// Current value; keeps the last value after the preference is dropped
    #[inline]
    pub fn is_reduced(&self) -> bool {
        *self.rx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_tracks_preference() {
        let preference = MotionPreference::new(false);
        let signal = preference.signal();
        assert!(!signal.is_reduced());

        preference.set_reduced(true);
        assert!(signal.is_reduced());
        assert!(!preference.toggle());
        assert!(!signal.is_reduced());
    }

    #[test]
    fn test_signal_outlives_preference() {
        let preference = MotionPreference::new(true);
        let signal = preference.signal();
        drop(preference);
        assert!(signal.is_reduced());
    }
}
