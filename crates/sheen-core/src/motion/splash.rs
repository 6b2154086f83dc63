//! L3 Molecular Layer: Splash overlay sequencer
//!
//! Drives the splash timeline `Logo -> CarouselItem(0..n) -> FadingOut -> Done`
//! purely from elapsed time. The overlay fade runs on top of whichever phase
//! is active during the last `final_fade_ms`; reaching full transparency
//! finishes the sequence and fires the completion callback once.

use serde::Serialize;
use tracing::{debug, info};

use super::clock::{Flow, FrameScheduler};
use super::easing::Easing;
use super::preference::MotionSignal;
use super::sequencer::{Motion, Sequencer};
use super::timeline::{Phase, Timeline};
use super::timing::{elapsed_since, lerp, progress, Millis};
use crate::config::{SplashConfig, SweepConfig};
use crate::{Error, Result};

/// Splash state machine position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SplashState {
    Logo,
    CarouselItem(usize),
    FadingOut,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LogoStyle {
    pub opacity: f64,
    pub scale: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepStyle {
    /// Horizontal translation in percent of the logo width
    pub translate: f64,
    pub opacity: f64,
}

impl SweepStyle {
    const PARKED: SweepStyle = SweepStyle {
        translate: -110.0,
        opacity: 1.0,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CardStyle {
    pub opacity: f64,
    /// Vertical offset; positive is below the resting line
    pub offset_y: f64,
}

impl CardStyle {
    /// Baseline every inactive card is reset to
    pub const HIDDEN: CardStyle = CardStyle {
        opacity: 0.0,
        offset_y: 0.0,
    };
}

/// Everything the render step needs to paint the overlay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplashFrame {
    pub state: SplashState,
    pub elapsed: Millis,
    pub logo: LogoStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sweep: Option<SweepStyle>,
    pub active_card: Option<usize>,
    pub cards: Vec<CardStyle>,
    pub overlay_opacity: f64,
}

/// Rise, hold and fade windows of one card phase; they sum to its length
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardSegments {
    pub rise: Millis,
    pub hold: Millis,
    pub fade: Millis,
}

impl CardSegments {
    pub fn split(length: Millis, rise: Millis, fade: Millis) -> Result<Self> {
        let hold = length - rise - fade;
        if hold < 0.0 {
            return Err(Error::Config(format!(
                "card rise ({}ms) and fade ({}ms) do not fit in a {:.2}ms card",
                rise, fade, length
            )));
        }
        Ok(Self { rise, hold, fade })
    }
}

type Completion = Box<dyn FnOnce() + Send>;

pub struct SplashSequencer {
    timeline: Timeline,
    segments: CardSegments,
    card_count: usize,
    rise_offset: f64,
    exit_offset: f64,
    logo_scale_from: f64,
    final_fade: Millis,
    sweep: Option<SweepConfig>,
    start: Option<Millis>,
    frame: SplashFrame,
    on_done: Option<Completion>,
    mutations: u64,
}

impl SplashSequencer {
    /// Build the timeline for `card_count` cards
    pub fn new(config: &SplashConfig, card_count: usize) -> Result<Self> {
        config.validate()?;
        if card_count == 0 {
            return Err(Error::Config("splash needs at least one card".to_string()));
        }

        let timeline = Timeline::builder()
            .phase(config.logo_ms as f64, Easing::CubicOut, Easing::CubicIn)
            .split(config.cards_ms as f64, card_count, Easing::CubicOut, Easing::CubicIn)
            .build()?;
        let card_length = timeline.phases()[1].length;
        let segments = CardSegments::split(
            card_length,
            config.card_rise_ms as f64,
            config.card_fade_ms as f64,
        )?;

        let frame = SplashFrame {
            state: SplashState::Logo,
            elapsed: 0.0,
            logo: LogoStyle {
                opacity: 0.0,
                scale: config.logo_scale_from,
            },
            sweep: config.sweep.as_ref().map(|_| SweepStyle::PARKED),
            active_card: None,
            cards: vec![CardStyle::HIDDEN; card_count],
            overlay_opacity: 1.0,
        };

        Ok(Self {
            timeline,
            segments,
            card_count,
            rise_offset: config.rise_offset,
            exit_offset: config.exit_offset,
            logo_scale_from: config.logo_scale_from,
            final_fade: config.final_fade_ms as f64,
            sweep: config.sweep.clone(),
            start: None,
            frame,
            on_done: None,
            mutations: 0,
        })
    }

    /// Callback fired exactly once when the overlay is fully faded
    pub fn on_done(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.on_done = Some(Box::new(callback));
        self
    }

    /// A splash that is already finished: overlay transparent, nothing visible
    pub fn dismissed(config: &SplashConfig, card_count: usize) -> Result<Self> {
        let mut splash = Self::new(config, card_count)?;
        splash.frame.state = SplashState::Done;
        splash.frame.elapsed = splash.timeline.total();
        splash.frame.logo = LogoStyle {
            opacity: 0.0,
            scale: 1.0,
        };
        splash.frame.overlay_opacity = 0.0;
        Ok(splash)
    }

    pub fn state(&self) -> SplashState {
        self.frame.state
    }

    pub fn is_done(&self) -> bool {
        self.frame.state == SplashState::Done
    }

    pub fn total(&self) -> Millis {
        self.timeline.total()
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Number of ticks that changed state
    pub fn mutations(&self) -> u64 {
        self.mutations
    }

    /// Which card is showing at `elapsed`, clamped to the last card
    pub fn card_index_at(&self, elapsed: Millis) -> Option<usize> {
        let cursor = self.timeline.locate(elapsed);
        if cursor.index == 0 && elapsed < self.timeline.phases()[0].end() {
            None
        } else {
            Some((cursor.index.max(1) - 1).min(self.card_count - 1))
        }
    }

    fn logo_style(&self, elapsed: Millis) -> LogoStyle {
        let logo = &self.timeline.phases()[0];
        let half = logo.length / 2.0;
        if elapsed < half {
            let eased = logo.easing_in.apply(progress(elapsed, half));
            LogoStyle {
                opacity: eased,
                scale: lerp(self.logo_scale_from, 1.0, eased),
            }
        } else {
            let eased = logo.easing_out.apply(progress(elapsed - half, half));
            LogoStyle {
                opacity: 1.0 - eased,
                scale: 1.0,
            }
        }
    }

    fn card_style(&self, phase: &Phase, local: Millis) -> CardStyle {
        let CardSegments { rise, hold, fade } = self.segments;
        if local < rise {
            let eased = phase.easing_in.apply(progress(local, rise));
            CardStyle {
                opacity: eased,
                offset_y: lerp(self.rise_offset, 0.0, eased),
            }
        } else if local < rise + hold {
            CardStyle {
                opacity: 1.0,
                offset_y: 0.0,
            }
        } else {
            let eased = phase.easing_out.apply(progress(local - rise - hold, fade));
            CardStyle {
                opacity: 1.0 - eased,
                offset_y: lerp(0.0, -self.exit_offset, eased),
            }
        }
    }

    fn sweep_style(sweep: &SweepConfig, elapsed: Millis) -> SweepStyle {
        let delay = sweep.delay_ms as f64;
        if elapsed < delay {
            return SweepStyle::PARKED;
        }
        let t = progress(elapsed - delay, sweep.duration_ms as f64);
        SweepStyle {
            translate: -110.0 + t * 220.0,
            opacity: if t < 0.95 { 1.0 } else { 1.0 - (t - 0.95) / 0.05 },
        }
    }

    /// Switch the visible card, resetting both cards to the hidden baseline first
    fn activate_card(&mut self, index: usize) {
        if self.frame.active_card == Some(index) {
            return;
        }
        if let Some(outgoing) = self.frame.active_card {
            self.frame.cards[outgoing] = CardStyle::HIDDEN;
        }
        self.frame.cards[index] = CardStyle::HIDDEN;
        self.frame.active_card = Some(index);
        debug!(card = index, "Splash card activated");
    }

    fn finish(&mut self) {
        self.frame.state = SplashState::Done;
        self.frame.overlay_opacity = 0.0;
        info!(elapsed_ms = self.frame.elapsed, "Splash finished");
        if let Some(on_done) = self.on_done.take() {
            on_done();
        }
    }
}

impl Sequencer for SplashSequencer {
    type Frame = SplashFrame;

    fn tick(&mut self, now: Millis) -> Flow {
        if self.is_done() {
            return Flow::Stop;
        }

        let start = *self.start.get_or_insert(now);
        // Elapsed never decreases, even if the clock does
        let elapsed = elapsed_since(start, now).max(self.frame.elapsed);
        self.frame.elapsed = elapsed;
        self.mutations += 1;

        let logo_end = self.timeline.phases()[0].end();
        let total = self.timeline.total();

        if elapsed < logo_end {
            self.frame.logo = self.logo_style(elapsed);
            self.frame.state = SplashState::Logo;
        } else {
            self.frame.logo = LogoStyle {
                opacity: 0.0,
                scale: 1.0,
            };
            if let Some(index) = self.card_index_at(elapsed) {
                self.activate_card(index);
                let phase = self.timeline.phases()[index + 1].clone();
                self.frame.cards[index] = self.card_style(&phase, phase.local(elapsed));
                self.frame.state = SplashState::CarouselItem(index);
            }
        }

        if let Some(sweep) = &self.sweep {
            self.frame.sweep = Some(Self::sweep_style(sweep, elapsed));
        }

        let fade_start = total - self.final_fade;
        if elapsed >= fade_start {
            let eased = Easing::CubicIn.apply(progress(elapsed - fade_start, self.final_fade));
            self.frame.overlay_opacity = 1.0 - eased;
            self.frame.state = SplashState::FadingOut;
        }

        if elapsed >= total || self.frame.overlay_opacity <= 0.0 {
            self.finish();
            return Flow::Stop;
        }

        Flow::Continue
    }

    fn frame(&self) -> SplashFrame {
        self.frame.clone()
    }
}

/// Start a splash on `scheduler`, honouring the reduced-motion preference
///
/// With reduced motion no clock is registered: the splash is returned already
/// dismissed and `on_done` runs immediately so the host can drop the overlay.
pub fn launch_splash(
    scheduler: &dyn FrameScheduler,
    config: &SplashConfig,
    card_count: usize,
    signal: &MotionSignal,
    on_done: impl FnOnce() + Send + 'static,
) -> Result<Motion<SplashSequencer>> {
    if signal.is_reduced() {
        debug!("Reduced motion: splash skipped");
        let splash = SplashSequencer::dismissed(config, card_count)?;
        on_done();
        return Ok(Motion::idle(splash));
    }
    let splash = SplashSequencer::new(config, card_count)?.on_done(on_done);
    Ok(Motion::start(scheduler, splash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::clock::ManualClock;
    use crate::motion::preference::MotionPreference;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn five_second_config() -> SplashConfig {
        SplashConfig {
            logo_ms: 500,
            cards_ms: 4500,
            ..Default::default()
        }
    }

    #[test]
    fn test_card_index_examples() {
        let splash = SplashSequencer::new(&SplashConfig::default(), 8).expect("splash");
        assert_eq!(splash.card_index_at(100.0), None);
        assert_eq!(splash.card_index_at(600.0), Some(0));
        assert_eq!(splash.card_index_at(550.0 + 618.75 * 3.5), Some(3));
        assert_eq!(splash.card_index_at(5500.0), Some(7));
        assert_eq!(splash.card_index_at(9000.0), Some(7));
    }

    #[test]
    fn test_states_follow_timeline() {
        let mut splash = SplashSequencer::new(&SplashConfig::default(), 8).expect("splash");
        splash.tick(0.0);
        assert_eq!(splash.state(), SplashState::Logo);
        splash.tick(600.0);
        assert_eq!(splash.state(), SplashState::CarouselItem(0));
        splash.tick(2000.0);
        assert_eq!(splash.state(), SplashState::CarouselItem(2));
        splash.tick(5300.0);
        assert_eq!(splash.state(), SplashState::FadingOut);
        assert_eq!(splash.frame().active_card, Some(7));
    }

    #[test]
    fn test_completion_fires_exactly_once() {
        let clock = ManualClock::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let splash = SplashSequencer::new(&five_second_config(), 6)
            .expect("splash")
            .on_done(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        let motion = Motion::start(&clock, splash);

        clock.run_until(5016.0, 16.0);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!motion.is_running());

        let frame = motion.frame();
        let mutations = motion.with(|s| s.mutations());
        assert_eq!(frame.state, SplashState::Done);
        assert_eq!(frame.overlay_opacity, 0.0);

        clock.run_until(8000.0, 16.0);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(motion.with(|s| s.mutations()), mutations);
        assert_eq!(motion.frame(), frame);
    }

    #[test]
    fn test_ticks_after_done_are_noops() {
        let mut splash = SplashSequencer::new(&five_second_config(), 6).expect("splash");
        splash.tick(0.0);
        assert_eq!(splash.tick(5001.0), Flow::Stop);
        let mutations = splash.mutations();
        assert_eq!(splash.tick(6000.0), Flow::Stop);
        assert_eq!(splash.mutations(), mutations);
    }

    #[test]
    fn test_logo_fades_in_then_out() {
        let mut splash = SplashSequencer::new(&SplashConfig::default(), 8).expect("splash");
        splash.tick(0.0);
        let first = splash.frame().logo;
        assert_eq!(first.opacity, 0.0);
        assert!((first.scale - 0.94).abs() < 1e-9);

        splash.tick(275.0);
        let peak = splash.frame().logo;
        assert!((peak.opacity - 1.0).abs() < 1e-9);
        assert!((peak.scale - 1.0).abs() < 1e-9);

        splash.tick(500.0);
        let fading = splash.frame().logo;
        assert!(fading.opacity > 0.0 && fading.opacity < 1.0);
    }

    #[test]
    fn test_card_rise_hold_fade() {
        let config = SplashConfig::default();
        let mut splash = SplashSequencer::new(&config, 8).expect("splash");
        splash.tick(0.0);

        // Rising: partially visible, below the resting line
        splash.tick(550.0 + 90.0);
        let rising = splash.frame().cards[0];
        assert!(rising.opacity > 0.0 && rising.opacity < 1.0);
        assert!(rising.offset_y > 0.0 && rising.offset_y < config.rise_offset);

        // Held
        splash.tick(550.0 + 300.0);
        assert_eq!(splash.frame().cards[0], CardStyle { opacity: 1.0, offset_y: 0.0 });

        // Fading: drifting up, never further than the exit offset
        splash.tick(550.0 + 618.75 - 40.0);
        let fading = splash.frame().cards[0];
        assert!(fading.opacity < 1.0);
        assert!(fading.offset_y < 0.0 && fading.offset_y >= -config.exit_offset);
    }

    #[test]
    fn test_switching_card_resets_outgoing() {
        let mut splash = SplashSequencer::new(&SplashConfig::default(), 8).expect("splash");
        splash.tick(0.0);
        splash.tick(550.0 + 300.0);
        assert_eq!(splash.frame().cards[0].opacity, 1.0);

        splash.tick(550.0 + 618.75 + 10.0);
        let frame = splash.frame();
        assert_eq!(frame.active_card, Some(1));
        assert_eq!(frame.cards[0], CardStyle::HIDDEN);
        assert_eq!(frame.cards.iter().filter(|c| c.opacity > 0.0).count(), 1);
    }

    #[test]
    fn test_backwards_clock_does_not_rewind() {
        let mut splash = SplashSequencer::new(&SplashConfig::default(), 8).expect("splash");
        splash.tick(1000.0);
        splash.tick(2000.0);
        let before = splash.frame();
        splash.tick(1500.0);
        let after = splash.frame();
        assert_eq!(after.elapsed, before.elapsed);
        assert_eq!(after.state, before.state);
        assert!(after.overlay_opacity.is_finite());
    }

    #[test]
    fn test_sweep_crosses_logo() {
        let config = SplashConfig {
            sweep: Some(SweepConfig::default()),
            ..Default::default()
        };
        let mut splash = SplashSequencer::new(&config, 8).expect("splash");
        splash.tick(0.0);
        assert_eq!(splash.frame().sweep, Some(SweepStyle::PARKED));

        splash.tick(1100.0);
        let mid = splash.frame().sweep.expect("sweep");
        assert!((mid.translate - 0.0).abs() < 1e-9);
        assert_eq!(mid.opacity, 1.0);

        splash.tick(1500.0);
        let end = splash.frame().sweep.expect("sweep");
        assert!((end.translate - 110.0).abs() < 1e-9);
        assert!(end.opacity.abs() < 1e-9);
    }

    #[test]
    fn test_rejects_bad_configuration() {
        assert!(SplashSequencer::new(&SplashConfig::default(), 0).is_err());

        let crowded = SplashConfig {
            card_rise_ms: 400,
            card_fade_ms: 400,
            ..Default::default()
        };
        assert!(SplashSequencer::new(&crowded, 8).is_err());
    }

    #[test]
    fn test_reduced_motion_skips_clock() {
        let clock = ManualClock::new();
        let preference = MotionPreference::new(true);
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);

        let motion = launch_splash(&clock, &SplashConfig::default(), 8, &preference.signal(), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .expect("splash");

        assert_eq!(clock.active(), 0);
        assert!(!motion.is_running());
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        let frame = motion.frame();
        assert_eq!(frame.state, SplashState::Done);
        assert_eq!(frame.overlay_opacity, 0.0);
    }

    #[test]
    fn test_progress_is_monotonic_within_phase() {
        let mut splash = SplashSequencer::new(&SplashConfig::default(), 8).expect("splash");
        splash.tick(0.0);
        let mut last_elapsed = 0.0;
        let mut last_overlay = 1.0;
        let mut t = 0.0;
        while t <= 5500.0 {
            splash.tick(t);
            let frame = splash.frame();
            assert!(frame.elapsed >= last_elapsed);
            assert!(frame.overlay_opacity <= last_overlay);
            last_elapsed = frame.elapsed;
            last_overlay = frame.overlay_opacity;
            t += 16.0;
        }
    }
}
