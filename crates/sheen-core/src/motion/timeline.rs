//! L4 Atomic Layer: Phase timelines
//!
//! A timeline is an immutable, gap-free sequence of phases. Phase start
//! offsets are derived from the lengths, so phase `i` always ends exactly
//! where phase `i + 1` begins and the lengths sum to the total.

use super::easing::Easing;
use super::timing::{progress, Millis};
use crate::{Error, Result};

/// One contiguous span of a timeline
#[derive(Debug, Clone, PartialEq)]
pub struct Phase {
    pub start: Millis,
    pub length: Millis,
    /// Curve used while the phase animates in
    pub easing_in: Easing,
    /// Curve used while the phase animates out
    pub easing_out: Easing,
}

impl Phase {
    #[inline]
    pub fn end(&self) -> Millis {
        self.start + self.length
    }

    /// Time spent inside this phase, clamped to [0, length]
    #[inline]
    pub fn local(&self, elapsed: Millis) -> Millis {
        (elapsed - self.start).clamp(0.0, self.length)
    }

    #[inline]
    pub fn progress(&self, elapsed: Millis) -> f64 {
        progress(self.local(elapsed), self.length)
    }
}

/// Where a point in time falls on a timeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub index: usize,
    pub local: Millis,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    phases: Vec<Phase>,
    total: Millis,
}

impl Timeline {
    pub fn builder() -> TimelineBuilder {
        TimelineBuilder::default()
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn phase(&self, index: usize) -> Option<&Phase> {
        self.phases.get(index)
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn total(&self) -> Millis {
        self.total
    }

    /// Locate `elapsed` on the timeline
    ///
    /// Times before the start land at the beginning of the first phase, times
    /// past the end stay at the end of the last phase.
    pub fn locate(&self, elapsed: Millis) -> Cursor {
        let last = self.phases.len() - 1;
        let index = if elapsed <= 0.0 || elapsed.is_nan() {
            0
        } else {
            // Phases are sorted by start, so the last phase starting at or
            // before `elapsed` is the active one.
            self.phases
                .partition_point(|phase| phase.start <= elapsed)
                .saturating_sub(1)
                .min(last)
        };
        Cursor {
            index,
            local: self.phases[index].local(elapsed),
        }
    }
}

/// Collects phase lengths and validates them into a [`Timeline`]
#[derive(Debug, Clone, Default)]
pub struct TimelineBuilder {
    lengths: Vec<(Millis, Easing, Easing)>,
}

impl TimelineBuilder {
    pub fn phase(mut self, length: Millis, easing_in: Easing, easing_out: Easing) -> Self {
        self.lengths.push((length, easing_in, easing_out));
        self
    }

    /// Append `count` identical phases splitting `span` evenly
    pub fn split(mut self, span: Millis, count: usize, easing_in: Easing, easing_out: Easing) -> Self {
        let length = if count == 0 { 0.0 } else { span / count as f64 };
        for _ in 0..count {
            self.lengths.push((length, easing_in, easing_out));
        }
        self
    }

    pub fn build(self) -> Result<Timeline> {
        if self.lengths.is_empty() {
            return Err(Error::Timeline("timeline needs at least one phase".to_string()));
        }

        let mut phases = Vec::with_capacity(self.lengths.len());
        let mut start = 0.0;
        for (index, (length, easing_in, easing_out)) in self.lengths.into_iter().enumerate() {
            if !length.is_finite() || length <= 0.0 {
                return Err(Error::Timeline(format!(
                    "phase {} must have a positive finite length, got {}",
                    index, length
                )));
            }
            phases.push(Phase {
                start,
                length,
                easing_in,
                easing_out,
            });
            start += length;
        }

        Ok(Timeline {
            phases,
            total: start,
        })
    }
}
