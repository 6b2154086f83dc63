//! L3 Molecular Layer: Looping track position and its pause gate
//!
//! The track renders its content list at least twice. The position advances
//! by a fixed velocity per frame and wraps by whole content periods, so the
//! duplicated copy continues seamlessly where the first one ends.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::clock::{Flow, FrameScheduler};
use super::preference::MotionSignal;
use super::sequencer::{Motion, Sequencer};
use super::timing::Millis;
use crate::config::{CarouselConfig, RampConfig};
use crate::error::{ensure_finite, ensure_positive};
use crate::{Error, Result};

/// Host-controlled pause flag, shared between the input handler and the track
#[derive(Debug, Clone, Default)]
pub struct PauseGate {
    paused: Arc<AtomicBool>,
}

impl PauseGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the flag, returning the new paused state
    pub fn toggle(&self) -> bool {
        !self.paused.fetch_xor(true, Ordering::SeqCst)
    }

    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }
}

/// Smoothly varying velocity that slows down while the track is touched
#[derive(Debug, Clone)]
pub struct SpeedRamp {
    current: f64,
    target: f64,
    base: f64,
    slow: f64,
    acceleration: f64,
    resume_delay: Millis,
    resume_at: Option<Millis>,
    interacting: bool,
}

impl SpeedRamp {
    pub fn new(base: f64, config: &RampConfig) -> Self {
        Self {
            current: base,
            target: base,
            base,
            slow: config.slow_velocity,
            acceleration: config.acceleration,
            resume_delay: config.resume_delay_ms as f64,
            resume_at: None,
            interacting: false,
        }
    }

    /// Pointer entered or touch started
    pub fn interaction_start(&mut self) {
        self.interacting = true;
        self.target = self.slow;
        self.resume_at = None;
    }

    /// Pointer left; speed returns to base after the resume delay
    pub fn interaction_end(&mut self, now: Millis) {
        self.resume_at = Some(now + self.resume_delay);
    }

    pub fn is_interacting(&self) -> bool {
        self.interacting
    }

    pub fn velocity(&self) -> f64 {
        self.current
    }

    /// Advance one frame. Returns the distance to travel, or `None` while held.
    pub fn step(&mut self, now: Millis) -> Option<f64> {
        if let Some(resume_at) = self.resume_at {
            if now >= resume_at {
                self.resume_at = None;
                self.interacting = false;
                self.target = self.base;
            }
        }
        self.current += (self.target - self.current) * self.acceleration;
        if self.interacting {
            None
        } else {
            Some(self.current)
        }
    }
}

/// Snapshot of a looping track
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoopFrame {
    pub position: f64,
    pub extent: f64,
    /// Translation to apply to the track (negated position)
    pub translate_x: f64,
    pub velocity: f64,
    pub paused: bool,
}

/// Wrapping scalar position for an infinitely scrolling track
#[derive(Debug, Clone)]
pub struct LoopTracker {
    position: f64,
    item_width: f64,
    extent: f64,
    velocity: f64,
    gate: PauseGate,
    ramp: Option<SpeedRamp>,
    signal: Option<MotionSignal>,
}

impl LoopTracker {
    /// Track of `item_count` items, each `item_width` wide including its gap
    pub fn new(item_width: f64, item_count: usize, velocity: f64) -> Result<Self> {
        ensure_positive("item_width", item_width)?;
        ensure_finite("velocity", velocity)?;
        let extent = Self::extent_for(item_width, item_count)?;
        Ok(Self {
            position: 0.0,
            item_width,
            extent,
            velocity,
            gate: PauseGate::new(),
            ramp: None,
            signal: None,
        })
    }

    pub fn from_config(config: &CarouselConfig, item_count: usize) -> Result<Self> {
        config.validate()?;
        let mut tracker = Self::new(config.item_width, item_count, config.velocity)?;
        if let Some(ramp) = &config.ramp {
            tracker.ramp = Some(SpeedRamp::new(config.velocity, ramp));
        }
        Ok(tracker)
    }

    fn extent_for(item_width: f64, item_count: usize) -> Result<f64> {
        if item_count == 0 {
            return Err(Error::Config("looping track needs at least one item".to_string()));
        }
        let extent = item_width * item_count as f64;
        ensure_positive("track extent", extent)?;
        Ok(extent)
    }

    /// Share an externally owned pause gate
    pub fn with_gate(mut self, gate: PauseGate) -> Self {
        self.gate = gate;
        self
    }

    /// Stop advancing whenever reduced motion is switched on
    pub fn with_signal(mut self, signal: MotionSignal) -> Self {
        self.signal = Some(signal);
        self
    }

    pub fn gate(&self) -> PauseGate {
        self.gate.clone()
    }

    pub fn ramp_mut(&mut self) -> Option<&mut SpeedRamp> {
        self.ramp.as_mut()
    }

    #[inline]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[inline]
    pub fn extent(&self) -> f64 {
        self.extent
    }

    /// Move to `position`, wrapped into [0, extent)
    pub fn set_position(&mut self, position: f64) {
        self.position = self.wrap(position);
    }

    /// Swap in a new content list; the position is kept, rewrapped to the new period
    pub fn set_item_count(&mut self, item_count: usize) -> Result<()> {
        self.extent = Self::extent_for(self.item_width, item_count)?;
        self.position = self.wrap(self.position);
        debug!(item_count, extent = self.extent, "Looping track resized");
        Ok(())
    }

    fn wrap(&self, position: f64) -> f64 {
        let wrapped = position.rem_euclid(self.extent);
        // rem_euclid may round up to the divisor for tiny negative inputs
        if wrapped >= self.extent || wrapped.is_nan() {
            0.0
        } else {
            wrapped
        }
    }

    /// Advance one frame by the fixed velocity unless paused
    pub fn advance(&mut self) -> f64 {
        if !self.gate.is_paused() {
            self.position = self.wrap(self.position + self.velocity);
        }
        self.position
    }

    fn reduced(&self) -> bool {
        self.signal.as_ref().map(MotionSignal::is_reduced).unwrap_or(false)
    }
}

impl Sequencer for LoopTracker {
    type Frame = LoopFrame;

    fn tick(&mut self, now: Millis) -> Flow {
        if self.reduced() || self.gate.is_paused() {
            return Flow::Continue;
        }
        match self.ramp.as_mut() {
            Some(ramp) => {
                if let Some(distance) = ramp.step(now) {
                    self.position = self.wrap(self.position + distance);
                }
            }
            None => {
                self.advance();
            }
        }
        Flow::Continue
    }

    fn frame(&self) -> LoopFrame {
        LoopFrame {
            position: self.position,
            extent: self.extent,
            translate_x: -self.position,
            velocity: self
                .ramp
                .as_ref()
                .map(SpeedRamp::velocity)
                .unwrap_or(self.velocity),
            paused: self.gate.is_paused(),
        }
    }
}

/// Start a looping track, or leave it parked at 0 under reduced motion
pub fn launch_track(
    scheduler: &dyn FrameScheduler,
    config: &CarouselConfig,
    item_count: usize,
    signal: &MotionSignal,
) -> Result<Motion<LoopTracker>> {
    let tracker = LoopTracker::from_config(config, item_count)?.with_signal(signal.clone());
    if signal.is_reduced() {
        debug!("Reduced motion: looping track parked");
        return Ok(Motion::idle(tracker));
    }
    Ok(Motion::start(scheduler, tracker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::clock::ManualClock;
    use crate::motion::preference::MotionPreference;

    fn reviews_track() -> LoopTracker {
        LoopTracker::new(344.0, 6, 0.4).expect("tracker")
    }

    #[test]
    fn test_position_stays_in_range() {
        let mut tracker = reviews_track();
        for _ in 0..20_000 {
            let position = tracker.advance();
            assert!(position >= 0.0 && position < tracker.extent());
        }
    }

    #[test]
    fn test_wrap_lands_inside_first_velocity_step() {
        let velocity = 8.0;
        let mut tracker = LoopTracker::new(100.0, 3, velocity).expect("tracker");
        tracker.set_position(tracker.extent() - 0.5 * velocity);
        let position = tracker.advance();
        assert!(position >= 0.0 && position < velocity);
        assert!((position - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_velocity_larger_than_period_still_wraps() {
        let mut tracker = LoopTracker::new(10.0, 2, 55.0).expect("tracker");
        for _ in 0..100 {
            let position = tracker.advance();
            assert!(position >= 0.0 && position < 20.0, "position {}", position);
        }
        let mut backwards = LoopTracker::new(10.0, 2, -7.5).expect("tracker");
        for _ in 0..100 {
            let position = backwards.advance();
            assert!(position >= 0.0 && position < 20.0, "position {}", position);
        }
    }

    #[test]
    fn test_pause_is_lossless() {
        let mut paused = reviews_track();
        let mut reference = reviews_track();
        for _ in 0..50 {
            paused.advance();
            reference.advance();
        }

        let gate = paused.gate();
        assert!(gate.toggle());
        let frozen = paused.position();
        for _ in 0..30 {
            assert_eq!(paused.advance(), frozen);
        }
        assert!(!gate.toggle());

        for _ in 0..50 {
            paused.advance();
            reference.advance();
        }
        assert_eq!(paused.position(), reference.position());
    }

    #[test]
    fn test_rejects_degenerate_tracks() {
        assert!(LoopTracker::new(344.0, 0, 0.4).is_err());
        assert!(LoopTracker::new(0.0, 6, 0.4).is_err());
        assert!(LoopTracker::new(344.0, 6, f64::NAN).is_err());
    }

    #[test]
    fn test_set_item_count_rewraps() {
        let mut tracker = LoopTracker::new(100.0, 6, 1.0).expect("tracker");
        tracker.set_position(450.0);
        tracker.set_item_count(4).expect("resize");
        assert_eq!(tracker.extent(), 400.0);
        assert!((tracker.position() - 50.0).abs() < 1e-9);
        assert!(tracker.set_item_count(0).is_err());
    }

    #[test]
    fn test_shared_gate_pauses_running_track() {
        let clock = ManualClock::new();
        let gate = PauseGate::new();
        let tracker = reviews_track().with_gate(gate.clone());
        let motion = Motion::start(&clock, tracker);

        clock.run_until(160.0, 16.0);
        let before = motion.frame().position;
        assert!(before > 0.0);

        gate.set_paused(true);
        clock.run_until(320.0, 16.0);
        let frame = motion.frame();
        assert_eq!(frame.position, before);
        assert!(frame.paused);
    }

    #[test]
    fn test_ramp_slows_and_resumes() {
        let config = CarouselConfig {
            ramp: Some(RampConfig::default()),
            ..Default::default()
        };
        let mut tracker = LoopTracker::from_config(&config, 6).expect("tracker");

        tracker.tick(0.0);
        let start = tracker.position();
        assert!(start > 0.0);

        tracker.ramp_mut().expect("ramp").interaction_start();
        for i in 1..=100 {
            tracker.tick(i as f64 * 16.0);
        }
        // Held while the pointer is over the track
        assert_eq!(tracker.position(), start);
        let slowed = tracker.frame().velocity;
        assert!(slowed < 0.4 && slowed > 0.1);

        tracker.ramp_mut().expect("ramp").interaction_end(1600.0);
        tracker.tick(2000.0);
        assert_eq!(tracker.position(), start);
        tracker.tick(3600.0);
        assert!(tracker.position() > start);
        assert!(!tracker.ramp_mut().expect("ramp").is_interacting());
    }

    #[test]
    fn test_reduced_motion_parks_track() {
        let clock = ManualClock::new();
        let preference = MotionPreference::new(true);
        let motion = launch_track(&clock, &CarouselConfig::default(), 6, &preference.signal())
            .expect("track");
        assert_eq!(clock.active(), 0);
        assert_eq!(motion.frame().position, 0.0);
    }

    #[test]
    fn test_reduced_motion_flip_freezes_running_track() {
        let clock = ManualClock::new();
        let preference = MotionPreference::new(false);
        let motion = launch_track(&clock, &CarouselConfig::default(), 6, &preference.signal())
            .expect("track");

        clock.run_until(160.0, 16.0);
        preference.set_reduced(true);
        let frozen = motion.frame().position;
        clock.run_until(480.0, 16.0);
        assert_eq!(motion.frame().position, frozen);
    }
}
