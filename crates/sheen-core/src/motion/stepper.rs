//! L3 Molecular Layer: Discrete auto-advancing list window
//!
//! Shows `visible` consecutive items out of `total`, wrapping around, and
//! steps the window forward every `interval_ms` while nobody is hovering or
//! focusing it.

use serde::Serialize;
use tracing::debug;

use super::clock::{Flow, FrameScheduler};
use super::preference::MotionSignal;
use super::sequencer::{Motion, Sequencer};
use super::timing::{elapsed_since, Millis};
use crate::config::StepperConfig;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepperFrame {
    pub start_index: usize,
    /// Indices of the items currently shown, in display order
    pub visible: Vec<usize>,
    pub auto_advancing: bool,
}

#[derive(Debug, Clone)]
pub struct IndexStepper {
    start_index: usize,
    total: usize,
    visible: usize,
    interval: Millis,
    anchor: Option<Millis>,
    hovered: bool,
    focused: bool,
    signal: Option<MotionSignal>,
}

impl IndexStepper {
    pub fn new(config: &StepperConfig, total: usize) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            start_index: 0,
            total,
            visible: config.visible,
            interval: config.interval_ms as f64,
            anchor: None,
            hovered: false,
            focused: false,
            signal: None,
        })
    }

    pub fn with_signal(mut self, signal: MotionSignal) -> Self {
        self.signal = Some(signal);
        self
    }

    /// More items than fit in the window
    pub fn can_scroll(&self) -> bool {
        self.total > self.visible
    }

    pub fn start_index(&self) -> usize {
        self.start_index
    }

    pub fn advance(&mut self) {
        if self.can_scroll() {
            self.start_index = (self.start_index + 1) % self.total;
        }
    }

    pub fn retreat(&mut self) {
        if self.can_scroll() {
            self.start_index = (self.start_index + self.total - 1) % self.total;
        }
    }

    /// Hovering suspends auto-advance; leaving restarts the full interval
    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
        self.anchor = None;
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        self.anchor = None;
    }

    pub fn visible_indices(&self) -> Vec<usize> {
        if self.total == 0 {
            return Vec::new();
        }
        (0..self.visible.min(self.total))
            .map(|offset| (self.start_index + offset) % self.total)
            .collect()
    }

    fn auto_advancing(&self) -> bool {
        let reduced = self.signal.as_ref().map(MotionSignal::is_reduced).unwrap_or(false);
        !reduced && !self.hovered && !self.focused && self.can_scroll()
    }
}

impl Sequencer for IndexStepper {
    type Frame = StepperFrame;

    fn tick(&mut self, now: Millis) -> Flow {
        if !self.auto_advancing() {
            self.anchor = None;
            return Flow::Continue;
        }
        let anchor = *self.anchor.get_or_insert(now);
        if elapsed_since(anchor, now) >= self.interval {
            self.advance();
            self.anchor = Some(now);
            debug!(start_index = self.start_index, "Stepper advanced");
        }
        Flow::Continue
    }

    fn frame(&self) -> StepperFrame {
        StepperFrame {
            start_index: self.start_index,
            visible: self.visible_indices(),
            auto_advancing: self.auto_advancing(),
        }
    }
}

/// Start a stepper; under reduced motion it only moves on manual input
pub fn launch_stepper(
    scheduler: &dyn FrameScheduler,
    config: &StepperConfig,
    total: usize,
    signal: &MotionSignal,
) -> Result<Motion<IndexStepper>> {
    let stepper = IndexStepper::new(config, total)?.with_signal(signal.clone());
    if signal.is_reduced() || !stepper.can_scroll() {
        return Ok(Motion::idle(stepper));
    }
    Ok(Motion::start(scheduler, stepper))
}
