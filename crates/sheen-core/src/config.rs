use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::content::{default_gallery, default_reviews, default_services, DisplayItem};
use crate::error::{ensure_finite, ensure_positive};
use crate::motion::easing::Easing;
use crate::motion::clock::MAX_FRAME_RATE;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub splash: SplashConfig,
    #[serde(default)]
    pub carousel: CarouselConfig,
    #[serde(default)]
    pub stepper: StepperConfig,
    #[serde(default)]
    pub reflection: ReflectionConfig,
    #[serde(default)]
    pub depth: DepthConfig,
    #[serde(default)]
    pub reveal: RevealConfig,
    #[serde(default)]
    pub content: ContentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log files)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Start with the reduced-motion preference set
    #[serde(default)]
    pub reduced_motion: bool,
    /// Frames per second for the real-time clock (0 = ~60fps)
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            frame_rate: default_frame_rate(),
        }
    }
}

impl MotionConfig {
    pub fn validate(&self) -> crate::Result<()> {
        if self.frame_rate > MAX_FRAME_RATE {
            return Err(crate::Error::Config(format!(
                "motion.frame_rate ({}) exceeds {} frames per second",
                self.frame_rate, MAX_FRAME_RATE
            )));
        }
        Ok(())
    }
}

/// Splash overlay timeline: logo, then one card per service, with a final fade
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplashConfig {
    /// Logo phase length (fade in over the first half, out over the second)
    #[serde(default = "default_logo_ms")]
    pub logo_ms: u64,
    /// Card phase length, split evenly across the cards
    #[serde(default = "default_cards_ms")]
    pub cards_ms: u64,
    /// Rise-in portion of each card
    #[serde(default = "default_card_rise_ms")]
    pub card_rise_ms: u64,
    /// Fade-out portion of each card
    #[serde(default = "default_card_fade_ms")]
    pub card_fade_ms: u64,
    /// Vertical distance a card rises from
    #[serde(default = "default_rise_offset")]
    pub rise_offset: f64,
    /// Vertical distance a card drifts away on exit
    #[serde(default = "default_exit_offset")]
    pub exit_offset: f64,
    /// Overlay fade at the very end of the timeline
    #[serde(default = "default_final_fade_ms")]
    pub final_fade_ms: u64,
    /// Logo scale at the start of its fade-in
    #[serde(default = "default_logo_scale_from")]
    pub logo_scale_from: f64,
    /// Optional light sweep across the logo
    #[serde(default)]
    pub sweep: Option<SweepConfig>,
}

impl Default for SplashConfig {
    fn default() -> Self {
        Self {
            logo_ms: default_logo_ms(),
            cards_ms: default_cards_ms(),
            card_rise_ms: default_card_rise_ms(),
            card_fade_ms: default_card_fade_ms(),
            rise_offset: default_rise_offset(),
            exit_offset: default_exit_offset(),
            final_fade_ms: default_final_fade_ms(),
            logo_scale_from: default_logo_scale_from(),
            sweep: None,
        }
    }
}

impl SplashConfig {
    pub fn total_ms(&self) -> u64 {
        self.logo_ms + self.cards_ms
    }

    pub fn validate(&self) -> crate::Result<()> {
        ensure_positive("splash.logo_ms", self.logo_ms as f64)?;
        ensure_positive("splash.cards_ms", self.cards_ms as f64)?;
        ensure_positive("splash.card_rise_ms", self.card_rise_ms as f64)?;
        ensure_positive("splash.card_fade_ms", self.card_fade_ms as f64)?;
        ensure_positive("splash.final_fade_ms", self.final_fade_ms as f64)?;
        ensure_finite("splash.rise_offset", self.rise_offset)?;
        ensure_finite("splash.exit_offset", self.exit_offset)?;
        ensure_positive("splash.logo_scale_from", self.logo_scale_from)?;
        if self.exit_offset >= self.rise_offset {
            return Err(crate::Error::Config(format!(
                "splash.exit_offset ({}) must be smaller than splash.rise_offset ({})",
                self.exit_offset, self.rise_offset
            )));
        }
        if self.final_fade_ms > self.total_ms() {
            return Err(crate::Error::Config(format!(
                "splash.final_fade_ms ({}) exceeds the timeline ({})",
                self.final_fade_ms,
                self.total_ms()
            )));
        }
        if let Some(sweep) = &self.sweep {
            ensure_positive("splash.sweep.duration_ms", sweep.duration_ms as f64)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    #[serde(default = "default_sweep_delay_ms")]
    pub delay_ms: u64,
    #[serde(default = "default_sweep_duration_ms")]
    pub duration_ms: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_sweep_delay_ms(),
            duration_ms: default_sweep_duration_ms(),
        }
    }
}

/// Infinite auto-scrolling track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselConfig {
    /// Width of one item including the gap after it
    #[serde(default = "default_item_width")]
    pub item_width: f64,
    /// Distance travelled per frame
    #[serde(default = "default_velocity")]
    pub velocity: f64,
    /// How many times the content is repeated on the rendered track
    #[serde(default = "default_copies")]
    pub copies: usize,
    /// Slow down while hovered and ease back afterwards
    #[serde(default)]
    pub ramp: Option<RampConfig>,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            item_width: default_item_width(),
            velocity: default_velocity(),
            copies: default_copies(),
            ramp: None,
        }
    }
}

impl CarouselConfig {
    pub fn validate(&self) -> crate::Result<()> {
        ensure_positive("carousel.item_width", self.item_width)?;
        ensure_finite("carousel.velocity", self.velocity)?;
        if self.copies < 2 {
            return Err(crate::Error::Config(format!(
                "carousel.copies must be at least 2 to hide the wrap seam, got {}",
                self.copies
            )));
        }
        if let Some(ramp) = &self.ramp {
            ensure_finite("carousel.ramp.slow_velocity", ramp.slow_velocity)?;
            if !(ramp.acceleration > 0.0 && ramp.acceleration <= 1.0) {
                return Err(crate::Error::Config(format!(
                    "carousel.ramp.acceleration must be in (0, 1], got {}",
                    ramp.acceleration
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RampConfig {
    /// Velocity while the pointer is over the track
    #[serde(default = "default_slow_velocity")]
    pub slow_velocity: f64,
    /// Fraction of the remaining velocity gap closed each frame
    #[serde(default = "default_acceleration")]
    pub acceleration: f64,
    /// Delay after the pointer leaves before speeding back up
    #[serde(default = "default_resume_delay_ms")]
    pub resume_delay_ms: u64,
}

impl Default for RampConfig {
    fn default() -> Self {
        Self {
            slow_velocity: default_slow_velocity(),
            acceleration: default_acceleration(),
            resume_delay_ms: default_resume_delay_ms(),
        }
    }
}

/// Discrete service list that advances one item at a time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepperConfig {
    #[serde(default = "default_visible")]
    pub visible: usize,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for StepperConfig {
    fn default() -> Self {
        Self {
            visible: default_visible(),
            interval_ms: default_interval_ms(),
        }
    }
}

impl StepperConfig {
    pub fn validate(&self) -> crate::Result<()> {
        ensure_positive("stepper.visible", self.visible as f64)?;
        ensure_positive("stepper.interval_ms", self.interval_ms as f64)
    }
}

/// Scroll-reactive highlight band
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectionConfig {
    /// Offset the band settles at
    #[serde(default = "default_rest")]
    pub rest: f64,
    /// Largest displacement from rest
    #[serde(default = "default_max_offset")]
    pub max_offset: f64,
    /// Scroll delta to offset factor
    #[serde(default = "default_gain")]
    pub gain: f64,
    /// Quiet period before easing back to rest
    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,
    /// Length of the ease back to rest
    #[serde(default = "default_ease_ms")]
    pub ease_ms: u64,
}

impl Default for ReflectionConfig {
    fn default() -> Self {
        Self {
            rest: default_rest(),
            max_offset: default_max_offset(),
            gain: default_gain(),
            idle_timeout_ms: default_idle_timeout_ms(),
            ease_ms: default_ease_ms(),
        }
    }
}

impl ReflectionConfig {
    pub fn validate(&self) -> crate::Result<()> {
        ensure_finite("reflection.rest", self.rest)?;
        ensure_positive("reflection.max_offset", self.max_offset)?;
        ensure_finite("reflection.gain", self.gain)?;
        ensure_positive("reflection.ease_ms", self.ease_ms as f64)
    }
}

/// Scroll-linked hero parallax
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepthConfig {
    /// Scroll distance at which the effect is fully applied
    #[serde(default = "default_max_scroll")]
    pub max_scroll: f64,
    #[serde(default = "default_background_shift")]
    pub background_shift: f64,
    #[serde(default = "default_background_zoom")]
    pub background_zoom: f64,
    #[serde(default = "default_content_shift")]
    pub content_shift: f64,
    /// Narrower viewports get no parallax
    #[serde(default = "default_min_viewport_width")]
    pub min_viewport_width: u32,
}

impl Default for DepthConfig {
    fn default() -> Self {
        Self {
            max_scroll: default_max_scroll(),
            background_shift: default_background_shift(),
            background_zoom: default_background_zoom(),
            content_shift: default_content_shift(),
            min_viewport_width: default_min_viewport_width(),
        }
    }
}

impl DepthConfig {
    pub fn validate(&self) -> crate::Result<()> {
        ensure_positive("depth.max_scroll", self.max_scroll)?;
        ensure_finite("depth.background_shift", self.background_shift)?;
        ensure_finite("depth.background_zoom", self.background_zoom)?;
        ensure_finite("depth.content_shift", self.content_shift)
    }
}

/// Display items fed to the carousels
/// Staggered entrance of the service cards once the showcase is in view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealConfig {
    /// Wait after the trigger before the first item moves
    #[serde(default)]
    pub delay_ms: u64,
    /// Gap between consecutive items
    #[serde(default = "default_stagger_ms")]
    pub stagger_ms: u64,
    #[serde(default = "default_reveal_duration_ms")]
    pub duration_ms: u64,
    /// Distance an item rises while fading in
    #[serde(default = "default_rise_offset")]
    pub rise_offset: f64,
    /// Reveal on the first trigger only; otherwise hide again when concealed
    #[serde(default = "default_trigger_once")]
    pub trigger_once: bool,
    #[serde(default = "default_reveal_easing")]
    pub easing: Easing,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            delay_ms: 0,
            stagger_ms: default_stagger_ms(),
            duration_ms: default_reveal_duration_ms(),
            rise_offset: default_rise_offset(),
            trigger_once: default_trigger_once(),
            easing: default_reveal_easing(),
        }
    }
}

impl RevealConfig {
    pub fn validate(&self) -> crate::Result<()> {
        ensure_positive("reveal.duration_ms", self.duration_ms as f64)?;
        ensure_finite("reveal.rise_offset", self.rise_offset)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    #[serde(default = "default_services")]
    pub services: Vec<DisplayItem>,
    #[serde(default = "default_gallery")]
    pub gallery: Vec<DisplayItem>,
    #[serde(default = "default_reviews")]
    pub reviews: Vec<DisplayItem>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            services: default_services(),
            gallery: default_gallery(),
            reviews: default_reviews(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sheen")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_frame_rate() -> u32 {
    60
}

fn default_logo_ms() -> u64 {
    550
}

fn default_cards_ms() -> u64 {
    4950
}

fn default_card_rise_ms() -> u64 {
    180
}

fn default_card_fade_ms() -> u64 {
    160
}

fn default_rise_offset() -> f64 {
    24.0
}

fn default_exit_offset() -> f64 {
    12.0
}

fn default_final_fade_ms() -> u64 {
    400
}

fn default_logo_scale_from() -> f64 {
    0.94
}

fn default_sweep_delay_ms() -> u64 {
    700
}

fn default_sweep_duration_ms() -> u64 {
    800
}

fn default_item_width() -> f64 {
    344.0 // 320 card + 24 gap
}

fn default_velocity() -> f64 {
    0.4
}

fn default_copies() -> usize {
    2
}

fn default_slow_velocity() -> f64 {
    0.1
}

fn default_acceleration() -> f64 {
    0.02
}

fn default_resume_delay_ms() -> u64 {
    2000
}

fn default_visible() -> usize {
    4
}

fn default_interval_ms() -> u64 {
    3500
}

fn default_rest() -> f64 {
    50.0
}

fn default_max_offset() -> f64 {
    30.0
}

fn default_gain() -> f64 {
    0.8
}

fn default_idle_timeout_ms() -> u64 {
    800
}

fn default_ease_ms() -> u64 {
    400
}

fn default_max_scroll() -> f64 {
    300.0
}

fn default_background_shift() -> f64 {
    -20.0
}

fn default_background_zoom() -> f64 {
    0.05
}

fn default_content_shift() -> f64 {
    -10.0
}

fn default_stagger_ms() -> u64 {
    80
}

fn default_reveal_duration_ms() -> u64 {
    600
}

fn default_trigger_once() -> bool {
    true
}

fn default_reveal_easing() -> Easing {
    Easing::ExpoOut
}

fn default_min_viewport_width() -> u32 {
    1024
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file, defaults when it does not exist
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &std::path::Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every section for values that would break an animation
    pub fn validate(&self) -> crate::Result<()> {
        self.motion.validate()?;
        self.splash.validate()?;
        self.carousel.validate()?;
        self.stepper.validate()?;
        self.reflection.validate()?;
        self.depth.validate()?;
        self.reveal.validate()
    }

    /// Get the configuration file path
    /// Always uses ~/.config/sheen/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("sheen")
            .join("config.toml")
    }

    /// Get the log file path used while the terminal preview owns the screen
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("sheen.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}
