//! L3 Molecular Layer: Scroll-linked hero parallax
//!
//! Unlike the other sequencers this one has no clock: its values are a pure
//! function of the scroll offset, sampled whenever the host scrolls.

use serde::Serialize;

use super::preference::MotionSignal;
use crate::config::DepthConfig;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DepthFrame {
    pub progress: f64,
    pub background_translate_y: f64,
    pub background_scale: f64,
    pub content_translate_y: f64,
}

impl DepthFrame {
    pub const REST: DepthFrame = DepthFrame {
        progress: 0.0,
        background_translate_y: 0.0,
        background_scale: 1.0,
        content_translate_y: 0.0,
    };
}

#[derive(Debug, Clone)]
pub struct HeroDepth {
    config: DepthConfig,
    viewport_width: u32,
    signal: MotionSignal,
}

impl HeroDepth {
    pub fn new(config: &DepthConfig, viewport_width: u32, signal: &MotionSignal) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
            viewport_width,
            signal: signal.clone(),
        })
    }

    pub fn set_viewport_width(&mut self, width: u32) {
        self.viewport_width = width;
    }

    pub fn is_enabled(&self) -> bool {
        !self.signal.is_reduced() && self.viewport_width >= self.config.min_viewport_width
    }

    pub fn sample(&self, scroll_y: f64) -> DepthFrame {
        if !self.is_enabled() {
            return DepthFrame::REST;
        }
        let progress = if scroll_y.is_nan() {
            0.0
        } else {
            (scroll_y / self.config.max_scroll).clamp(0.0, 1.0)
        };
        DepthFrame {
            progress,
            background_translate_y: progress * self.config.background_shift,
            background_scale: 1.0 + progress * self.config.background_zoom,
            content_translate_y: progress * self.config.content_shift,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::preference::MotionPreference;

    #[test]
    fn test_progress_saturates() {
        let preference = MotionPreference::new(false);
        let depth = HeroDepth::new(&DepthConfig::default(), 1280, &preference.signal()).expect("depth");

        let half = depth.sample(150.0);
        assert!((half.progress - 0.5).abs() < 1e-9);
        assert!((half.background_translate_y + 10.0).abs() < 1e-9);
        assert!((half.background_scale - 1.025).abs() < 1e-9);
        assert!((half.content_translate_y + 5.0).abs() < 1e-9);

        assert_eq!(depth.sample(900.0).progress, 1.0);
        assert_eq!(depth.sample(-50.0), DepthFrame::REST);
    }

    #[test]
    fn test_disabled_on_narrow_or_reduced() {
        let preference = MotionPreference::new(false);
        let mut depth = HeroDepth::new(&DepthConfig::default(), 800, &preference.signal()).expect("depth");
        assert_eq!(depth.sample(150.0), DepthFrame::REST);

        depth.set_viewport_width(1024);
        assert!(depth.is_enabled());
        preference.set_reduced(true);
        assert_eq!(depth.sample(150.0), DepthFrame::REST);
    }
}
