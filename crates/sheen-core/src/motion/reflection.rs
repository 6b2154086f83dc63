//! L3 Molecular Layer: Scroll-reactive reflection band
//!
//! Every scroll event snaps the band to `rest + clamp(delta * gain)`. After
//! `idle_timeout_ms` without scrolling the band eases back to rest over
//! `ease_ms`. A scroll during the ease cancels it and takes over again.

use serde::Serialize;
use tracing::debug;

use super::clock::{Flow, FrameScheduler};
use super::easing::Easing;
use super::preference::MotionSignal;
use super::sequencer::{Motion, Sequencer};
use super::timing::{elapsed_since, lerp, progress, Millis};
use crate::config::ReflectionConfig;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReflectionFrame {
    pub offset: f64,
    pub target: f64,
    pub easing: bool,
}

#[derive(Debug, Clone, Copy)]
struct EaseToRest {
    start: Millis,
    from: f64,
}

#[derive(Debug, Clone)]
pub struct ReflectionTracker {
    config: ReflectionConfig,
    current: f64,
    target: f64,
    last_scroll_y: f64,
    idle_deadline: Option<Millis>,
    easing: Option<EaseToRest>,
    signal: MotionSignal,
}

impl ReflectionTracker {
    /// Create the band, or `None` when reduced motion is preferred
    pub fn configure(config: &ReflectionConfig, signal: &MotionSignal) -> Result<Option<Self>> {
        config.validate()?;
        if signal.is_reduced() {
            debug!("Reduced motion: reflection band not created");
            return Ok(None);
        }
        Ok(Some(Self {
            config: config.clone(),
            current: config.rest,
            target: config.rest,
            last_scroll_y: 0.0,
            idle_deadline: None,
            easing: None,
            signal: signal.clone(),
        }))
    }

    #[inline]
    pub fn offset(&self) -> f64 {
        self.current
    }

    pub fn is_easing(&self) -> bool {
        self.easing.is_some()
    }

    /// Handle a scroll event at page offset `scroll_y`
    pub fn on_scroll(&mut self, scroll_y: f64, now: Millis) {
        let delta = scroll_y - self.last_scroll_y;
        self.last_scroll_y = scroll_y;
        if self.signal.is_reduced() {
            return;
        }

        if self.easing.take().is_some() {
            debug!("Scroll interrupted ease to rest");
        }

        let max = self.config.max_offset;
        let movement = (delta * self.config.gain).clamp(-max, max);
        self.target = self.config.rest + movement;
        self.current = self.target;
        self.idle_deadline = Some(now + self.config.idle_timeout_ms as f64);
    }

    fn sample_ease(&mut self, ease: EaseToRest, now: Millis) {
        let duration = self.config.ease_ms as f64;
        let t = progress(elapsed_since(ease.start, now), duration);
        if t >= 1.0 {
            self.current = self.config.rest;
            self.easing = None;
        } else {
            self.current = lerp(ease.from, self.config.rest, Easing::CubicOut.apply(t));
        }
    }
}

impl Sequencer for ReflectionTracker {
    type Frame = ReflectionFrame;

    fn tick(&mut self, now: Millis) -> Flow {
        if let Some(deadline) = self.idle_deadline {
            if now >= deadline {
                self.idle_deadline = None;
                // No new motion once reduced motion is on
                if !self.signal.is_reduced() {
                    // The ease is timed from when the idle timer fired, not
                    // from whichever frame first noticed it.
                    self.target = self.config.rest;
                    self.easing = Some(EaseToRest {
                        start: deadline,
                        from: self.current,
                    });
                    debug!(from = self.current, "Reflection easing to rest");
                }
            }
        }

        if let Some(ease) = self.easing {
            self.sample_ease(ease, now);
        }
        Flow::Continue
    }

    fn frame(&self) -> ReflectionFrame {
        ReflectionFrame {
            offset: self.current,
            target: self.target,
            easing: self.easing.is_some(),
        }
    }
}

/// Start the reflection band, or `None` under reduced motion (no clock at all)
pub fn launch_reflection(
    scheduler: &dyn FrameScheduler,
    config: &ReflectionConfig,
    signal: &MotionSignal,
) -> Result<Option<Motion<ReflectionTracker>>> {
    Ok(ReflectionTracker::configure(config, signal)?
        .map(|tracker| Motion::start(scheduler, tracker)))
}
