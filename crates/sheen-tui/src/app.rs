use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use ratatui::layout::{Position, Rect};
use tracing::{debug, info};

use sheen_core::config::CarouselConfig;
use sheen_core::motion::{
    launch_reflection, launch_reveal, launch_splash, launch_stepper, launch_track, DepthFrame,
    FrameScheduler, HeroDepth, IndexStepper, LoopTracker, Motion, MotionPreference, PauseGate,
    ReflectionTracker, RevealSequencer, Sequencer, SplashSequencer,
};
use sheen_core::AppConfig;

use crate::input::Action;
use crate::theme::Theme;
use crate::widgets::ShowcaseLayout;

/// Page distance of one scroll step
pub const SCROLL_STEP: f64 = 40.0;

/// Approximate pixel width of one terminal column
pub const CELL_WIDTH_PX: u32 = 8;

/// Which view is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Splash,
    Showcase,
}

pub type SharedScheduler = Arc<dyn FrameScheduler + Send + Sync>;

/// Application state
///
/// Owns every `Motion` handle; dropping the app cancels all of them.
pub struct App {
    pub config: Arc<AppConfig>,
    pub theme: Theme,
    pub preference: MotionPreference,
    scheduler: SharedScheduler,

    splash: Option<Motion<SplashSequencer>>,
    splash_done: Arc<AtomicBool>,

    pub gallery: Motion<LoopTracker>,
    pub gallery_gate: PauseGate,
    pub gallery_hovered: bool,
    pub reviews: Motion<LoopTracker>,
    pub services: Motion<IndexStepper>,
    pub services_focused: bool,
    pub services_hovered: bool,
    pub reveal: Motion<RevealSequencer>,
    pub reflection: Option<Motion<ReflectionTracker>>,
    pub depth: HeroDepth,

    pub scroll_y: f64,
    pub viewport: Rect,
    pub should_quit: bool,
    pub status_message: Option<String>,
}

impl App {
    pub fn new(config: Arc<AppConfig>, scheduler: SharedScheduler) -> Result<Self> {
        let preference = MotionPreference::new(config.motion.reduced_motion);
        let signal = preference.signal();
        let content = &config.content;

        let gallery_gate = PauseGate::new();
        let gallery_config = CarouselConfig {
            ramp: Some(config.carousel.ramp.clone().unwrap_or_default()),
            ..config.carousel.clone()
        };
        let gallery = Self::start_track(
            scheduler.as_ref(),
            &gallery_config,
            content.gallery.len(),
            &preference,
            Some(gallery_gate.clone()),
        )?;

        let reviews_config = CarouselConfig {
            ramp: None,
            ..config.carousel.clone()
        };
        let reviews = Self::start_track(
            scheduler.as_ref(),
            &reviews_config,
            content.reviews.len(),
            &preference,
            None,
        )?;

        let services = launch_stepper(
            scheduler.as_ref(),
            &config.stepper,
            content.services.len(),
            &signal,
        )?;
        let reveal = launch_reveal(
            scheduler.as_ref(),
            &config.reveal,
            content.services.len(),
            &signal,
        )?;
        let reflection = launch_reflection(scheduler.as_ref(), &config.reflection, &signal)?;
        let depth = HeroDepth::new(&config.depth, 0, &signal)?;

        let mut app = Self {
            config: Arc::clone(&config),
            theme: Theme::default(),
            preference,
            scheduler,
            splash: None,
            splash_done: Arc::new(AtomicBool::new(false)),
            gallery,
            gallery_gate,
            gallery_hovered: false,
            reviews,
            services,
            services_focused: false,
            services_hovered: false,
            reveal,
            reflection,
            depth,
            scroll_y: 0.0,
            viewport: Rect::default(),
            should_quit: false,
            status_message: None,
        };
        app.start_splash()?;
        Ok(app)
    }

    fn start_track(
        scheduler: &dyn FrameScheduler,
        config: &CarouselConfig,
        item_count: usize,
        preference: &MotionPreference,
        gate: Option<PauseGate>,
    ) -> Result<Motion<LoopTracker>> {
        let signal = preference.signal();
        match gate {
            Some(gate) => {
                let tracker = LoopTracker::from_config(config, item_count)?
                    .with_gate(gate)
                    .with_signal(signal.clone());
                if signal.is_reduced() {
                    Ok(Motion::idle(tracker))
                } else {
                    Ok(Motion::start(scheduler, tracker))
                }
            }
            None => Ok(launch_track(scheduler, config, item_count, &signal)?),
        }
    }

    fn start_splash(&mut self) -> Result<()> {
        // A fresh flag per run so a replaced splash cannot report for the new one
        let done = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&done);
        self.splash_done = done;
        self.splash = Some(launch_splash(
            self.scheduler.as_ref(),
            &self.config.splash,
            self.config.content.services.len(),
            &self.preference.signal(),
            move || flag.store(true, Ordering::SeqCst),
        )?);
        Ok(())
    }

    pub fn screen(&self) -> Screen {
        if self.splash.is_some() && !self.splash_done.load(Ordering::SeqCst) {
            Screen::Splash
        } else {
            Screen::Showcase
        }
    }

    pub fn splash(&self) -> Option<&Motion<SplashSequencer>> {
        self.splash.as_ref()
    }

    /// Timestamp on the clock's timebase
    pub fn now(&self) -> f64 {
        self.scheduler.now()
    }

    /// Per-frame housekeeping before drawing
    pub fn update(&mut self) {
        if self.splash.is_some() && self.splash_done.load(Ordering::SeqCst) {
            self.splash = None;
            debug!("Splash overlay removed");
        }
        // The service cards come into view with the showcase
        if self.screen() == Screen::Showcase {
            let now = self.now();
            self.reveal.with(|reveal| reveal.trigger(now));
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.viewport = Rect::new(0, 0, width, height);
        self.depth.set_viewport_width(width as u32 * CELL_WIDTH_PX);
    }

    /// Values for the hero background and content layers
    pub fn depth_frame(&self) -> DepthFrame {
        self.depth.sample(self.scroll_y)
    }

    /// Set a status message
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
    }

    pub fn apply(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Quit => self.should_quit = true,
            Action::SkipSplash => {
                self.splash = None;
                self.splash_done.store(true, Ordering::SeqCst);
            }
            Action::ReplaySplash => {
                self.start_splash()?;
                self.status_message = None;
            }
            Action::TogglePause => self.toggle_pause(),
            Action::ScrollDown => self.scroll_by(SCROLL_STEP),
            Action::ScrollUp => self.scroll_by(-SCROLL_STEP),
            Action::NextService => self.services.with(IndexStepper::advance),
            Action::PrevService => self.services.with(IndexStepper::retreat),
            Action::ToggleGalleryHover => self.toggle_gallery_hover(),
            Action::ToggleServicesFocus => {
                self.services_focused = !self.services_focused;
                let focused = self.services_focused;
                self.services.with(|stepper| stepper.set_focused(focused));
            }
            Action::ToggleReducedMotion => self.toggle_reduced_motion()?,
            Action::None => {}
        }
        Ok(())
    }

    /// A click on the gallery track toggles its pause gate
    pub fn click(&mut self, column: u16, row: u16) {
        if self.screen() != Screen::Showcase {
            return;
        }
        let layout = ShowcaseLayout::new(self.viewport);
        if layout.gallery.contains(Position::new(column, row)) {
            self.toggle_pause();
        }
    }

    /// Pointer movement; resting over the service list holds its auto-advance
    pub fn hover(&mut self, column: u16, row: u16) {
        if self.screen() != Screen::Showcase {
            return;
        }
        let layout = ShowcaseLayout::new(self.viewport);
        let hovered = layout.services.contains(Position::new(column, row));
        if hovered != self.services_hovered {
            self.services_hovered = hovered;
            self.services.with(|stepper| stepper.set_hovered(hovered));
        }
    }

    pub fn scroll_by(&mut self, delta: f64) {
        self.scroll_y = (self.scroll_y + delta).max(0.0);
        let (scroll_y, now) = (self.scroll_y, self.now());
        if let Some(reflection) = &self.reflection {
            reflection.with(|band| band.on_scroll(scroll_y, now));
        }
    }

    fn toggle_pause(&mut self) {
        let paused = self.gallery_gate.toggle();
        self.set_status(if paused { "Gallery paused" } else { "Gallery playing" });
    }

    fn toggle_gallery_hover(&mut self) {
        self.gallery_hovered = !self.gallery_hovered;
        let (hovered, now) = (self.gallery_hovered, self.now());
        self.gallery.with(|track| {
            if let Some(ramp) = track.ramp_mut() {
                if hovered {
                    ramp.interaction_start();
                } else {
                    ramp.interaction_end(now);
                }
            }
        });
    }

    fn toggle_reduced_motion(&mut self) -> Result<()> {
        let reduced = self.preference.toggle();
        info!(reduced, "Motion preference toggled from the keyboard");
        self.set_status(if reduced { "Reduced motion on" } else { "Reduced motion off" });
        if reduced {
            return Ok(());
        }

        // Motions created while reduced have no clock yet
        let scheduler = Arc::clone(&self.scheduler);
        resume(scheduler.as_ref(), &mut self.gallery);
        resume(scheduler.as_ref(), &mut self.reviews);
        if self.services.with(|stepper| stepper.can_scroll()) {
            resume(scheduler.as_ref(), &mut self.services);
        }
        if !self.reveal.frame().settled {
            resume(scheduler.as_ref(), &mut self.reveal);
        }
        if self.reflection.is_none() {
            self.reflection = launch_reflection(
                scheduler.as_ref(),
                &self.config.reflection,
                &self.preference.signal(),
            )?;
        }
        Ok(())
    }
}

/// Put an idle motion on the clock, keeping its current state
fn resume<S: Sequencer + Clone>(scheduler: &dyn FrameScheduler, motion: &mut Motion<S>) {
    if !motion.is_running() {
        let state = motion.with(|sequencer| sequencer.clone());
        *motion = Motion::start(scheduler, state);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use sheen_core::motion::ManualClock;

    pub(crate) fn test_app(reduced: bool) -> (App, ManualClock) {
        let mut config = AppConfig::default();
        config.motion.reduced_motion = reduced;
        let clock = ManualClock::new();
        let app = App::new(Arc::new(config), Arc::new(clock.clone())).expect("app");
        (app, clock)
    }

    fn showcase_app() -> (App, ManualClock) {
        let (mut app, clock) = test_app(false);
        app.apply(Action::SkipSplash).expect("skip");
        app.update();
        (app, clock)
    }

    #[test]
    fn test_splash_hands_over_to_showcase() {
        let (mut app, clock) = test_app(false);
        assert_eq!(app.screen(), Screen::Splash);

        clock.run_until(3000.0, 16.0);
        app.update();
        assert_eq!(app.screen(), Screen::Splash);

        clock.run_until(7000.0, 16.0);
        assert_eq!(app.screen(), Screen::Showcase);
        app.update();
        assert!(app.splash().is_none());
    }

    #[test]
    fn test_reduced_motion_starts_still() {
        let (app, clock) = test_app(true);
        assert_eq!(app.screen(), Screen::Showcase);
        assert!(app.reflection.is_none());
        assert!(!app.gallery.is_running());
        assert_eq!(clock.active(), 0);

        clock.run_until(1000.0, 16.0);
        assert_eq!(app.gallery.frame().position, 0.0);
        assert_eq!(app.services.frame().start_index, 0);
    }

    #[test]
    fn test_pause_freezes_gallery() {
        let (mut app, clock) = showcase_app();
        clock.run_until(500.0, 16.0);
        let moving = app.gallery.frame().position;
        assert!(moving > 0.0);

        app.apply(Action::TogglePause).expect("pause");
        assert!(app.gallery.frame().paused);
        clock.run_until(1000.0, 16.0);
        assert_eq!(app.gallery.frame().position, moving);

        app.apply(Action::TogglePause).expect("resume");
        clock.run_until(1500.0, 16.0);
        assert!(app.gallery.frame().position > moving);
    }

    #[test]
    fn test_click_on_gallery_toggles_pause() {
        let (mut app, _clock) = showcase_app();
        app.resize(120, 40);
        let gallery = ShowcaseLayout::new(app.viewport).gallery;

        app.click(gallery.x + 1, gallery.y + 1);
        assert!(app.gallery_gate.is_paused());

        let hero = ShowcaseLayout::new(app.viewport).hero;
        app.click(hero.x + 1, hero.y + 1);
        assert!(app.gallery_gate.is_paused());
    }

    #[test]
    fn test_scroll_drives_reflection() {
        let (mut app, clock) = showcase_app();
        clock.advance_to(100.0);
        app.apply(Action::ScrollDown).expect("scroll");
        let band = app.reflection.as_ref().expect("band");
        assert_eq!(band.frame().offset, 80.0);

        clock.run_until(1400.0, 16.0);
        let band = app.reflection.as_ref().expect("band");
        assert_eq!(band.frame().offset, 50.0);

        app.apply(Action::ScrollUp).expect("scroll");
        app.apply(Action::ScrollUp).expect("scroll");
        assert_eq!(app.scroll_y, 0.0);
    }

    #[test]
    fn test_service_cards_reveal_with_showcase() {
        let (mut app, clock) = test_app(false);
        clock.run_until(3000.0, 16.0);
        app.update();
        assert!(!app.reveal.frame().triggered);

        clock.run_until(7000.0, 16.0);
        app.update();
        assert_eq!(app.screen(), Screen::Showcase);
        let at = clock.now();
        assert_eq!(app.reveal.with(|reveal| reveal.reveal_at(1)), Some(at + 80.0));

        clock.run_until(at + 100.0, 16.0);
        let frame = app.reveal.frame();
        assert!(frame.items[0].visible && frame.items[1].visible);
        assert!(!frame.items[2].visible);

        // Eight cards: the last starts 560ms in and lands 600ms later
        clock.run_until(at + 1200.0, 16.0);
        let frame = app.reveal.frame();
        assert!(frame.settled);
        assert!(frame.items.iter().all(|item| item.opacity == 1.0));
        assert!(!app.reveal.is_running());

        // Replaying the splash does not replay the cascade
        app.apply(Action::ReplaySplash).expect("replay");
        clock.run_until(at + 9000.0, 16.0);
        app.update();
        assert!(app.reveal.frame().settled);
    }

    #[test]
    fn test_reduced_motion_shows_cards_at_once() {
        let (app, _clock) = test_app(true);
        let frame = app.reveal.frame();
        assert!(frame.settled);
        assert!(frame.items.iter().all(|item| item.visible));
    }

    #[test]
    fn test_hovering_services_holds_stepper() {
        let (mut app, clock) = showcase_app();
        app.resize(120, 40);
        let layout = ShowcaseLayout::new(app.viewport);

        app.hover(layout.services.x + 2, layout.services.y + 1);
        assert!(app.services_hovered);
        assert!(!app.services.frame().auto_advancing);
        clock.run_until(8000.0, 16.0);
        assert_eq!(app.services.frame().start_index, 0);

        app.hover(layout.hero.x + 1, layout.hero.y + 1);
        assert!(!app.services_hovered);
        assert!(app.services.frame().auto_advancing);
        clock.run_until(8000.0 + 3600.0, 16.0);
        assert_eq!(app.services.frame().start_index, 1);
    }

    #[test]
    fn test_reenabling_motion_resumes_tracks() {
        let (mut app, clock) = test_app(true);
        app.apply(Action::ToggleReducedMotion).expect("toggle");
        assert!(!app.preference.prefers_reduced());
        assert!(app.gallery.is_running());
        assert!(app.reflection.is_some());

        clock.run_until(500.0, 16.0);
        assert!(app.gallery.frame().position > 0.0);
        assert!(app.reviews.frame().position > 0.0);
    }

    #[test]
    fn test_reduced_motion_freezes_running_tracks() {
        let (mut app, clock) = showcase_app();
        clock.run_until(200.0, 16.0);
        app.apply(Action::ToggleReducedMotion).expect("toggle");
        let frozen = app.reviews.frame().position;
        clock.run_until(800.0, 16.0);
        assert_eq!(app.reviews.frame().position, frozen);
    }

    #[test]
    fn test_replay_splash() {
        let (mut app, clock) = showcase_app();
        app.apply(Action::ReplaySplash).expect("replay");
        assert_eq!(app.screen(), Screen::Splash);
        let start = clock.now();
        clock.run_until(start + 7000.0, 16.0);
        assert_eq!(app.screen(), Screen::Showcase);
    }

    #[test]
    fn test_depth_follows_scroll_on_wide_terminals() {
        let (mut app, _clock) = showcase_app();
        app.resize(80, 24);
        app.scroll_by(120.0);
        assert_eq!(app.depth_frame(), DepthFrame::REST);

        app.resize(200, 50);
        let frame = app.depth_frame();
        assert!((frame.progress - 0.4).abs() < 1e-9);
        assert!((frame.content_translate_y + 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_drop_cancels_every_motion() {
        let (app, clock) = showcase_app();
        assert!(clock.active() > 0);
        drop(app);
        clock.advance_by(16.0);
        assert_eq!(clock.active(), 0);
    }
}
