use std::io::Write;

use anyhow::{bail, Result};
use clap::ValueEnum;
use serde::Serialize;
use tracing::debug;

use sheen_core::motion::{
    launch_reflection, launch_reveal, launch_splash, launch_stepper, launch_track, ManualClock,
    Motion, MotionPreference, ReflectionTracker, Sequencer,
};
use sheen_core::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TraceTarget {
    Splash,
    Carousel,
    Reflection,
    Stepper,
    Reveal,
}

#[derive(Debug, Clone)]
pub struct TraceOptions {
    pub target: TraceTarget,
    pub until_ms: f64,
    pub step_ms: f64,
    pub cards: Option<usize>,
    pub items: Option<usize>,
    /// `(at_ms, scroll_y)` pairs fed to the reflection band
    pub scrolls: Vec<(f64, f64)>,
}

#[derive(Serialize)]
struct TraceLine<F> {
    t: f64,
    frame: F,
}

/// Parse a scroll event written as `at_ms:scroll_y`
pub fn parse_scroll(value: &str) -> std::result::Result<(f64, f64), String> {
    let (at, scroll_y) = value
        .split_once(':')
        .ok_or_else(|| format!("expected AT_MS:SCROLL_Y, got '{}'", value))?;
    let at: f64 = at.trim().parse().map_err(|e| format!("bad time '{}': {}", at, e))?;
    let scroll_y: f64 = scroll_y
        .trim()
        .parse()
        .map_err(|e| format!("bad scroll offset '{}': {}", scroll_y, e))?;
    if !at.is_finite() || at < 0.0 || !scroll_y.is_finite() {
        return Err(format!("scroll event out of range: '{}'", value));
    }
    Ok((at, scroll_y))
}

/// Print one JSON object per frame until `until_ms` or until the sequencer stops
pub fn run(config: &AppConfig, options: &TraceOptions, out: &mut impl Write) -> Result<()> {
    if !options.until_ms.is_finite() || options.until_ms < 0.0 {
        bail!("--until-ms must be a non-negative number, got {}", options.until_ms);
    }

    let clock = ManualClock::new();
    let preference = MotionPreference::new(config.motion.reduced_motion);
    let signal = preference.signal();
    let content = &config.content;

    let lines = match options.target {
        TraceTarget::Splash => {
            let cards = options.cards.unwrap_or(content.services.len());
            let motion = launch_splash(&clock, &config.splash, cards, &signal, || {})?;
            drive(&clock, &motion, options, out, |_, _| {})?
        }
        TraceTarget::Carousel => {
            let items = options.items.unwrap_or(content.gallery.len());
            let motion = launch_track(&clock, &config.carousel, items, &signal)?;
            drive(&clock, &motion, options, out, |_, _| {})?
        }
        TraceTarget::Stepper => {
            let items = options.items.unwrap_or(content.services.len());
            let motion = launch_stepper(&clock, &config.stepper, items, &signal)?;
            drive(&clock, &motion, options, out, |_, _| {})?
        }
        TraceTarget::Reveal => {
            let items = options.items.unwrap_or(content.services.len());
            let motion = launch_reveal(&clock, &config.reveal, items, &signal)?;
            motion.with(|reveal| reveal.trigger(0.0));
            drive(&clock, &motion, options, out, |_, _| {})?
        }
        TraceTarget::Reflection => {
            let Some(motion) = launch_reflection(&clock, &config.reflection, &signal)? else {
                bail!("the reflection band is not created when reduced motion is preferred");
            };
            let mut scrolls = options.scrolls.clone();
            scrolls.sort_by(|a, b| a.0.total_cmp(&b.0));
            let mut pending = scrolls.into_iter().peekable();
            drive(&clock, &motion, options, out, |motion: &Motion<ReflectionTracker>, now| {
                while let Some((at, scroll_y)) = pending.next_if(|(at, _)| *at <= now) {
                    motion.with(|band| band.on_scroll(scroll_y, at));
                }
            })?
        }
    };

    debug!(trace = ?options.target, lines, "Trace finished");
    Ok(())
}

fn drive<S>(
    clock: &ManualClock,
    motion: &Motion<S>,
    options: &TraceOptions,
    out: &mut impl Write,
    mut before_frame: impl FnMut(&Motion<S>, f64),
) -> Result<usize>
where
    S: Sequencer,
    S::Frame: Serialize,
{
    let step = if options.step_ms > 0.0 { options.step_ms } else { 16.0 };
    let mut now = 0.0;
    let mut lines = 0;

    loop {
        before_frame(motion, now);
        clock.advance_to(now);
        serde_json::to_writer(
            &mut *out,
            &TraceLine {
                t: now,
                frame: motion.frame(),
            },
        )?;
        writeln!(out)?;
        lines += 1;

        if now >= options.until_ms || !motion.is_running() {
            break;
        }
        now = (now + step).min(options.until_ms);
    }

    Ok(lines)
}
