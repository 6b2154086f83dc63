//! L4 Atomic Layer: Frame clock drivers
//!
//! A frame scheduler invokes a tick callback once per display frame with a
//! monotonically increasing millisecond timestamp, until the returned
//! [`CancelHandle`] is cancelled (or dropped) or the tick asks to stop.
//!
//! Two schedulers are provided:
//! - [`ManualClock`] - synthetic timestamps pushed by the caller (tests, traces)
//! - [`FrameClock`] - a tokio interval ticking at the configured frame rate

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

use super::timing::Millis;
use crate::{Error, Result};

/// What a tick wants to happen next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep the registration alive for the next frame
    Continue,
    /// Unregister; the callback is never invoked again
    Stop,
}

/// Per-frame callback
pub type TickFn = Box<dyn FnMut(Millis) -> Flow + Send>;

/// Something that can drive tick callbacks once per frame
pub trait FrameScheduler {
    /// Register `tick` and start invoking it every frame
    fn start(&self, tick: TickFn) -> CancelHandle;

    /// Current timestamp on the same timebase handed to ticks
    fn now(&self) -> Millis;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Shared between a registration and its handle.
///
/// `gate` is held for the whole duration of a tick, so `cancel()` cannot
/// return while a tick is still running.
#[derive(Debug, Default)]
struct CancelState {
    cancelled: AtomicBool,
    gate: Mutex<()>,
}

/// Handle to a running clock registration
///
/// Cancelling is idempotent. Dropping the handle cancels the registration,
/// so a handle that goes out of scope with its owning view can never leave a
/// callback ticking against discarded state.
///
/// A tick must not cancel its own handle (that would wait on itself); it
/// returns [`Flow::Stop`] instead.
#[derive(Debug)]
pub struct CancelHandle {
    state: Arc<CancelState>,
}

impl CancelHandle {
    fn new() -> (Self, Arc<CancelState>) {
        let state = Arc::new(CancelState::default());
        (
            Self {
                state: Arc::clone(&state),
            },
            state,
        )
    }

    /// Stop the registration. After this returns the tick is never invoked again.
    pub fn cancel(&self) {
        let _guard = lock(&self.state.gate);
        if !self.state.cancelled.swap(true, Ordering::SeqCst) {
            debug!("Frame registration cancelled");
        }
    }

    /// Whether the registration was cancelled or stopped itself
    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }
}

impl Drop for CancelHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

struct Registration {
    state: Arc<CancelState>,
    tick: TickFn,
}

impl Registration {
    /// Run one tick unless cancelled. Returns whether the registration stays alive.
    fn fire(&mut self, now: Millis) -> bool {
        let _guard = lock(&self.state.gate);
        if self.state.cancelled.load(Ordering::SeqCst) {
            return false;
        }
        match (self.tick)(now) {
            Flow::Continue => true,
            Flow::Stop => {
                self.state.cancelled.store(true, Ordering::SeqCst);
                false
            }
        }
    }
}

#[derive(Default)]
struct ManualState {
    now: Millis,
    registrations: Vec<Registration>,
}

/// Synthetic clock driven by explicit timestamps
///
/// Every call to [`ManualClock::advance_to`] is one frame: all live
/// registrations are ticked in registration order. Timestamps never go
/// backwards; an earlier timestamp is clamped to the latest one seen.
#[derive(Clone, Default)]
pub struct ManualClock {
    inner: Arc<Mutex<ManualState>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registrations still alive
    pub fn active(&self) -> usize {
        lock(&self.inner).registrations.len()
    }

    /// Emit one frame at `now` and return how many ticks ran
    pub fn advance_to(&self, now: Millis) -> usize {
        let (now, mut registrations) = {
            let mut state = lock(&self.inner);
            if now < state.now || now.is_nan() {
                warn!(requested = now, current = state.now, "Clamping non-monotonic frame timestamp");
            } else {
                state.now = now;
            }
            (state.now, std::mem::take(&mut state.registrations))
        };

        let mut invoked = 0;
        registrations.retain_mut(|registration| {
            let cancelled_before = registration.state.cancelled.load(Ordering::SeqCst);
            let alive = registration.fire(now);
            if !cancelled_before {
                invoked += 1;
            }
            alive
        });

        // Keep registrations added by ticks during this frame
        let mut state = lock(&self.inner);
        registrations.append(&mut state.registrations);
        state.registrations = registrations;
        invoked
    }

    /// Emit one frame `delta` milliseconds after the current one
    pub fn advance_by(&self, delta: Millis) -> usize {
        let now = self.now() + delta.max(0.0);
        self.advance_to(now)
    }

    /// Emit frames every `step` milliseconds up to and including `until`
    pub fn run_until(&self, until: Millis, step: Millis) -> usize {
        let step = if step > 0.0 { step } else { 16.0 };
        let mut invoked = 0;
        let mut now = self.now();
        while now < until {
            now = (now + step).min(until);
            invoked += self.advance_to(now);
        }
        invoked
    }
}

impl FrameScheduler for ManualClock {
    fn start(&self, tick: TickFn) -> CancelHandle {
        let (handle, state) = CancelHandle::new();
        lock(&self.inner).registrations.push(Registration { state, tick });
        handle
    }

    /// Latest timestamp handed out
    fn now(&self) -> Millis {
        lock(&self.inner).now
    }
}

/// Real-time clock backed by a tokio interval
///
/// Each registration runs on its own task. Timestamps are milliseconds since
/// the clock was created, shared by every registration; missed frames are
/// skipped rather than bursted.
#[derive(Debug, Clone)]
pub struct FrameClock {
    frame: Duration,
    origin: Instant,
    runtime: Handle,
}

impl FrameClock {
    /// Create a clock on the current tokio runtime
    pub fn new(frame_rate: u32) -> Result<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| Error::Runtime(format!("frame clock needs a tokio runtime: {}", e)))?;
        Ok(Self {
            frame: frame_duration(frame_rate),
            origin: Instant::now(),
            runtime,
        })
    }

    /// Interval between frames
    pub fn frame(&self) -> Duration {
        self.frame
    }
}

/// Highest frame rate a clock will honour; faster rates are capped at 1ms frames
pub const MAX_FRAME_RATE: u32 = 1000;

/// Frame interval for a frame rate, ~60fps when unset, never shorter than 1ms
pub fn frame_duration(frame_rate: u32) -> Duration {
    if frame_rate == 0 {
        Duration::from_millis(16)
    } else {
        Duration::from_micros(1_000_000 / frame_rate.min(MAX_FRAME_RATE) as u64)
    }
}

impl FrameScheduler for FrameClock {
    fn start(&self, tick: TickFn) -> CancelHandle {
        let (handle, state) = CancelHandle::new();
        let frame = self.frame;
        let origin = self.origin;
        let mut registration = Registration { state, tick };

        self.runtime.spawn(async move {
            let mut interval = tokio::time::interval(frame);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                let at = interval.tick().await;
                let now = at.duration_since(origin).as_secs_f64() * 1000.0;
                if !registration.fire(now) {
                    break;
                }
            }
            debug!("Frame clock task finished");
        });

        handle
    }

    fn now(&self) -> Millis {
        Instant::now().duration_since(self.origin).as_secs_f64() * 1000.0
    }
}
