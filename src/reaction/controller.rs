//! Single-flight playback of reactions.
//!
//! At most one effect drives the surface at any time. A notification that
//! arrives while an effect is playing blocks on a condition variable until
//! the strip is idle again, then plays. Whatever happens inside the effect,
//! the strip is cleared and the controller returns to idle afterwards.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use ledreaccs_surface::{FrameBuffer, PixelSurface};
use parking_lot::{Condvar, Mutex, MutexGuard};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::config::{validate_params, ReactionConfig};
use super::event::{EventKind, ReactionEvent};
use crate::clock::{FrameClock, SystemClock};
use crate::effect::{Effect, EffectContext, EffectError, EffectParams, EffectRegistry};
use crate::error::{Error, Result};

// ── State ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Idle,
    Playing,
}

/// How a single playback ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Completed,
    /// The effect returned an error or panicked.
    Failed(String),
}

impl Outcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Completed => f.write_str("completed"),
            Outcome::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Summary of one dispatch.
#[derive(Debug, Clone, Serialize)]
pub struct PlaybackReport {
    /// `None` for direct `play` calls.
    pub event: Option<EventKind>,
    pub effect: String,
    pub params: EffectParams,
    /// Time spent blocked behind another playback.
    pub waited: Duration,
    /// Time spent inside the effect.
    pub elapsed: Duration,
    pub outcome: Outcome,
}

/// Result of a non-blocking dispatch.
#[derive(Debug, Clone)]
pub enum Dispatch {
    Played(PlaybackReport),
    /// Another effect was playing; nothing was run.
    Skipped,
}

// ── Gate ─────────────────────────────────────────────────────────────

struct PlaybackGate {
    state: Mutex<PlaybackState>,
    idle: Condvar,
}

impl PlaybackGate {
    fn new() -> Self {
        Self {
            state: Mutex::new(PlaybackState::Idle),
            idle: Condvar::new(),
        }
    }

    /// Block until idle, then mark playing. Returns the time spent waiting.
    fn acquire(&self) -> (PlaybackGuard<'_>, Option<Duration>) {
        let mut state = self.state.lock();
        let waited = if *state == PlaybackState::Playing {
            let start = Instant::now();
            while *state == PlaybackState::Playing {
                self.idle.wait(&mut state);
            }
            Some(start.elapsed())
        } else {
            None
        };
        *state = PlaybackState::Playing;
        (PlaybackGuard { gate: self }, waited)
    }

    fn try_acquire(&self) -> Option<PlaybackGuard<'_>> {
        let mut state = self.state.lock();
        if *state == PlaybackState::Playing {
            return None;
        }
        *state = PlaybackState::Playing;
        Some(PlaybackGuard { gate: self })
    }

    fn state(&self) -> PlaybackState {
        *self.state.lock()
    }
}

/// Returns the gate to idle and wakes one waiter on drop.
struct PlaybackGuard<'a> {
    gate: &'a PlaybackGate,
}

impl Drop for PlaybackGuard<'_> {
    fn drop(&mut self) {
        *self.gate.state.lock() = PlaybackState::Idle;
        self.gate.idle.notify_one();
    }
}

/// Clears and flushes the surface on drop, restoring the global brightness
/// it had when locked.
struct ClearOnDrop<'a, S: PixelSurface> {
    surface: MutexGuard<'a, S>,
    brightness: f32,
}

impl<'a, S: PixelSurface> ClearOnDrop<'a, S> {
    fn new(surface: MutexGuard<'a, S>) -> Self {
        let brightness = surface.brightness();
        Self {
            surface,
            brightness,
        }
    }
}

impl<S: PixelSurface> Deref for ClearOnDrop<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.surface
    }
}

impl<S: PixelSurface> DerefMut for ClearOnDrop<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

impl<S: PixelSurface> Drop for ClearOnDrop<'_, S> {
    fn drop(&mut self) {
        self.surface.clear();
        self.surface.set_brightness(self.brightness);
        if let Err(e) = self.surface.show() {
            warn!("Failed to flush cleared surface: {e}");
        }
    }
}

// ── Controller ───────────────────────────────────────────────────────

/// Maps host events to effects and plays them one at a time.
///
/// Shared between threads behind an `Arc`.
pub struct ReactionController<S: PixelSurface> {
    registry: Arc<EffectRegistry>,
    config: Arc<ReactionConfig>,
    surface: Mutex<S>,
    clock: Arc<dyn FrameClock>,
    rng: Mutex<StdRng>,
    gate: PlaybackGate,
}

impl<S: PixelSurface> ReactionController<S> {
    /// Controller on real time with an OS-seeded random source.
    pub fn new(registry: Arc<EffectRegistry>, config: Arc<ReactionConfig>, surface: S) -> Self {
        Self {
            registry,
            config,
            surface: Mutex::new(surface),
            clock: Arc::new(SystemClock),
            rng: Mutex::new(StdRng::from_os_rng()),
            gate: PlaybackGate::new(),
        }
    }

    /// Replace the frame clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn FrameClock>) -> Self {
        self.clock = clock;
        self
    }

    /// Use a deterministic random source.
    #[must_use]
    pub fn with_rng_seed(self, seed: u64) -> Self {
        *self.rng.lock() = StdRng::seed_from_u64(seed);
        self
    }

    pub fn registry(&self) -> &EffectRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ReactionConfig {
        &self.config
    }

    /// Current state, without waiting.
    pub fn state(&self) -> PlaybackState {
        self.gate.state()
    }

    /// Play the effect mapped to `event`, waiting for any running effect
    /// to finish first.
    ///
    /// Only setup problems (unmapped event, unknown effect, bad override)
    /// are errors. A failing effect is reported in the returned report.
    pub fn notify(&self, event: impl Into<ReactionEvent>) -> Result<PlaybackReport> {
        let event = event.into();
        let (effect, params) = self.prepare(&event)?;
        Ok(self.dispatch(Some(event.kind), effect, params))
    }

    /// `notify` by event name; accepts both `sad` and `on_sad`.
    pub fn notify_named(&self, name: &str) -> Result<PlaybackReport> {
        let kind: EventKind = name.parse()?;
        self.notify(kind)
    }

    /// Like `notify`, but returns `Dispatch::Skipped` instead of waiting
    /// when an effect is already playing.
    pub fn try_notify(&self, event: impl Into<ReactionEvent>) -> Result<Dispatch> {
        let event = event.into();
        let (effect, params) = self.prepare(&event)?;
        let Some(gate) = self.gate.try_acquire() else {
            debug!(event = %event.kind, effect = effect.name(), "skipped");
            return Ok(Dispatch::Skipped);
        };
        log_start(event.kind.as_str(), effect.as_ref(), &params);
        Ok(Dispatch::Played(self.run_gated(
            gate,
            Some(event.kind),
            effect,
            params,
            Duration::ZERO,
        )))
    }

    /// Play an effect by name, bypassing the event mapping.
    pub fn play(&self, effect: &str, params: EffectParams) -> Result<PlaybackReport> {
        validate_params(&params)?;
        let effect = self.registry.resolve(effect)?;
        Ok(self.dispatch(None, effect, params))
    }

    /// Snapshot of the surface's current frame.
    pub fn frame(&self) -> FrameBuffer {
        self.surface.lock().frame().clone()
    }

    /// Run `f` against the surface. Blocks while an effect is playing.
    pub fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.surface.lock())
    }

    /// Clear and flush the strip if the surface can be locked within
    /// `timeout`. Returns `false` when it could not.
    pub fn blackout(&self, timeout: Duration) -> bool {
        let Some(mut surface) = self.surface.try_lock_for(timeout) else {
            return false;
        };
        surface.clear();
        if let Err(e) = surface.show() {
            warn!("Blackout flush failed: {e}");
        }
        true
    }

    fn prepare(&self, event: &ReactionEvent) -> Result<(Arc<dyn Effect>, EffectParams)> {
        let (name, params) = self.config.resolve(event)?;
        let effect = self.registry.resolve(&name).map_err(|e| match e {
            Error::UnknownEffect(name) => Error::Configuration(format!(
                "event {} maps to unknown effect `{name}`",
                event.kind
            )),
            other => other,
        })?;
        Ok((effect, params))
    }

    fn dispatch(
        &self,
        event: Option<EventKind>,
        effect: Arc<dyn Effect>,
        params: EffectParams,
    ) -> PlaybackReport {
        log_start(event_label(event), effect.as_ref(), &params);
        let (gate, waited) = self.gate.acquire();
        self.run_gated(gate, event, effect, params, waited.unwrap_or_default())
    }

    /// Run with the gate held. Drop order releases the surface (clearing
    /// it) before the gate.
    fn run_gated(
        &self,
        _gate: PlaybackGuard<'_>,
        event: Option<EventKind>,
        effect: Arc<dyn Effect>,
        params: EffectParams,
        waited: Duration,
    ) -> PlaybackReport {
        let label = event_label(event);
        info!(
            event = %label,
            effect = effect.name(),
            waited_ms = waited.as_millis() as u64,
            "waited"
        );

        let start = Instant::now();
        let outcome = {
            let mut surface = ClearOnDrop::new(self.surface.lock());
            let mut rng = self.rng.lock();
            let mut ctx = EffectContext::new(&mut *surface, self.clock.as_ref(), &mut *rng);
            match panic::catch_unwind(AssertUnwindSafe(|| effect.run(&mut ctx, &params))) {
                Ok(Ok(())) => Outcome::Completed,
                Ok(Err(e)) => {
                    warn!(event = %label, effect = effect.name(), "Effect failed: {e}");
                    Outcome::Failed(e.to_string())
                }
                Err(payload) => {
                    let reason = panic_message(payload.as_ref());
                    error!(event = %label, effect = effect.name(), "Effect panicked: {reason}");
                    Outcome::Failed(EffectError::Failed(format!("panicked: {reason}")).to_string())
                }
            }
        };
        let elapsed = start.elapsed();

        info!(
            event = %label,
            effect = effect.name(),
            elapsed_ms = elapsed.as_millis() as u64,
            outcome = %outcome,
            "end"
        );

        PlaybackReport {
            event,
            effect: effect.name().to_string(),
            params,
            waited,
            elapsed,
            outcome,
        }
    }
}

fn log_start(label: &str, effect: &dyn Effect, params: &EffectParams) {
    info!(
        event = %label,
        effect = effect.name(),
        duration = params.duration,
        speed = params.speed,
        color = %params.color,
        "start"
    );
}

fn event_label(event: Option<EventKind>) -> &'static str {
    event.map(|kind| kind.as_str()).unwrap_or("play")
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
