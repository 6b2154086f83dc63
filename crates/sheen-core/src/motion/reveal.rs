//! L3 Molecular Layer: Staggered reveal of a group of items
//!
//! Once the group is triggered (it came into view), item `i` starts fading in
//! at `trigger + delay_ms + i * stagger_ms` and takes `duration_ms` to land.
//! With `trigger_once` the first trigger latches; otherwise concealing the
//! group hides every item again and the next trigger replays the cascade.
//! Under reduced motion every item is shown at once.

use serde::Serialize;
use tracing::debug;

use super::clock::{Flow, FrameScheduler};
use super::easing::Easing;
use super::preference::MotionSignal;
use super::sequencer::{Motion, Sequencer};
use super::timing::{elapsed_since, lerp, progress, Millis};
use crate::config::RevealConfig;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RevealItem {
    /// The item's reveal time has passed
    pub visible: bool,
    pub opacity: f64,
    /// Distance still left to rise, `rise_offset` down to 0
    pub offset_y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevealFrame {
    pub triggered: bool,
    /// Every item has finished its entrance
    pub settled: bool,
    pub items: Vec<RevealItem>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum RevealState {
    Waiting,
    Triggered(Millis),
    /// Shown in full without any entrance
    Shown,
}

#[derive(Debug, Clone)]
pub struct RevealSequencer {
    count: usize,
    delay: Millis,
    stagger: Millis,
    duration: Millis,
    rise_offset: f64,
    easing: Easing,
    trigger_once: bool,
    state: RevealState,
    now: Millis,
    signal: Option<MotionSignal>,
}

impl RevealSequencer {
    pub fn new(config: &RevealConfig, count: usize) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            count,
            delay: config.delay_ms as f64,
            stagger: config.stagger_ms as f64,
            duration: config.duration_ms as f64,
            rise_offset: config.rise_offset,
            easing: config.easing,
            trigger_once: config.trigger_once,
            state: RevealState::Waiting,
            now: 0.0,
            signal: None,
        })
    }

    pub fn with_signal(mut self, signal: MotionSignal) -> Self {
        self.signal = Some(signal);
        self
    }

    fn reduced(&self) -> bool {
        self.signal.as_ref().map(MotionSignal::is_reduced).unwrap_or(false)
    }

    /// The group came into view at `now`
    pub fn trigger(&mut self, now: Millis) {
        if self.state != RevealState::Waiting {
            return;
        }
        self.now = self.now.max(now);
        if self.reduced() {
            self.state = RevealState::Shown;
        } else {
            self.state = RevealState::Triggered(now);
            debug!(count = self.count, at = now, "Reveal triggered");
        }
    }

    /// The group left the view; only a repeatable reveal hides again
    pub fn conceal(&mut self) {
        if !self.trigger_once && self.state != RevealState::Waiting {
            self.state = RevealState::Waiting;
            debug!("Reveal concealed");
        }
    }

    /// Show every item immediately
    pub fn show_all(&mut self) {
        self.state = RevealState::Shown;
    }

    pub fn is_triggered(&self) -> bool {
        self.state != RevealState::Waiting
    }

    /// When item `index` starts its entrance
    pub fn reveal_at(&self, index: usize) -> Option<Millis> {
        match self.state {
            RevealState::Triggered(at) => Some(at + self.delay + index as f64 * self.stagger),
            _ => None,
        }
    }

    fn settled_at(&self, now: Millis) -> bool {
        match self.state {
            RevealState::Waiting => false,
            RevealState::Shown => true,
            RevealState::Triggered(_) => {
                let last = self.count.saturating_sub(1);
                self.reveal_at(last)
                    .map(|start| now >= start + self.duration)
                    .unwrap_or(true)
            }
        }
    }

    fn item(&self, index: usize) -> RevealItem {
        let shown = RevealItem {
            visible: true,
            opacity: 1.0,
            offset_y: 0.0,
        };
        if self.reduced() {
            return shown;
        }
        match (self.state, self.reveal_at(index)) {
            (RevealState::Shown, _) => shown,
            (_, Some(start)) => {
                let t = progress(elapsed_since(start, self.now), self.duration);
                let eased = self.easing.apply(t);
                RevealItem {
                    visible: self.now >= start,
                    opacity: eased,
                    offset_y: lerp(self.rise_offset, 0.0, eased),
                }
            }
            _ => hidden(self.rise_offset),
        }
    }
}

fn hidden(rise_offset: f64) -> RevealItem {
    RevealItem {
        visible: false,
        opacity: 0.0,
        offset_y: rise_offset,
    }
}

impl Sequencer for RevealSequencer {
    type Frame = RevealFrame;

    fn tick(&mut self, now: Millis) -> Flow {
        self.now = self.now.max(now);
        if self.reduced() && matches!(self.state, RevealState::Triggered(_)) {
            self.state = RevealState::Shown;
        }
        if self.trigger_once && self.settled_at(self.now) {
            debug!(count = self.count, "Reveal settled");
            return Flow::Stop;
        }
        Flow::Continue
    }

    fn frame(&self) -> RevealFrame {
        let reduced = self.reduced();
        RevealFrame {
            triggered: self.is_triggered() || reduced,
            settled: reduced || self.settled_at(self.now),
            items: (0..self.count).map(|index| self.item(index)).collect(),
        }
    }
}

/// Start a reveal group; under reduced motion it is shown in full with no clock
pub fn launch_reveal(
    scheduler: &dyn FrameScheduler,
    config: &RevealConfig,
    count: usize,
    signal: &MotionSignal,
) -> Result<Motion<RevealSequencer>> {
    let mut reveal = RevealSequencer::new(config, count)?.with_signal(signal.clone());
    if signal.is_reduced() {
        reveal.show_all();
        return Ok(Motion::idle(reveal));
    }
    Ok(Motion::start(scheduler, reveal))
}
