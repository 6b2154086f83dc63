//! Frame-driven motion engine
//!
//! Every animation is a [`Sequencer`]: a value snapshot computed purely from
//! elapsed time and host input, advanced by a [`FrameScheduler`] and owned by
//! a [`Motion`] handle that cancels its clock when dropped.
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `easing` - Pure easing functions (cubic in/out, quintic, exponential)
//! - `timing` - Clamped elapsed/progress math and interpolation
//! - `clock` - Frame schedulers (manual and tokio-backed) and cancel handles
//! - `preference` - Reduced-motion flag and its read-only signal
//! - `timeline` - Immutable sequences of contiguous phases
//!
//! ## L3 Molecular Layer
//! - `sequencer` - The `Sequencer` trait and the owned `Motion` handle
//! - `splash` - Logo, card carousel and overlay fade
//! - `carousel` - Looping track position, pause gate and speed ramp
//! - `stepper` - Auto-advancing list window
//! - `reflection` - Scroll-reactive band with idle ease to rest
//! - `reveal` - Staggered entrance of a group once it comes into view
//! - `depth` - Scroll-linked hero parallax
//!
//! # Usage
//!
//! ```ignore
//! use sheen_core::motion::{launch_splash, FrameClock, MotionPreference};
//!
//! let clock = FrameClock::new(60)?;
//! let preference = MotionPreference::new(false);
//! let splash = launch_splash(&clock, &config.splash, 8, &preference.signal(), || {})?;
//!
//! // In the render loop
//! let frame = splash.frame();
//! ```

// L4 Atomic Layer
pub mod clock;
pub mod easing;
pub mod preference;
pub mod timeline;
pub mod timing;

// L3 Molecular Layer
pub mod carousel;
pub mod depth;
pub mod reflection;
pub mod reveal;
pub mod sequencer;
pub mod splash;
pub mod stepper;

pub use carousel::{launch_track, LoopFrame, LoopTracker, PauseGate, SpeedRamp};
pub use clock::{CancelHandle, Flow, FrameClock, FrameScheduler, ManualClock};
pub use depth::{DepthFrame, HeroDepth};
pub use easing::Easing;
pub use preference::{MotionPreference, MotionSignal};
pub use reflection::{launch_reflection, ReflectionFrame, ReflectionTracker};
pub use reveal::{launch_reveal, RevealFrame, RevealItem, RevealSequencer};
pub use sequencer::{Motion, Sequencer};
pub use splash::{launch_splash, SplashFrame, SplashSequencer, SplashState};
pub use stepper::{launch_stepper, IndexStepper, StepperFrame};
pub use timeline::{Phase, Timeline};
pub use timing::Millis;
