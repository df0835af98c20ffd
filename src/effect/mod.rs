//! Frame-stepped LED effects.
//!
//! Every effect implements [`Effect`]: a stateless entry point whose `run`
//! builds its own simulation state, steps it at a fixed frame rate, and
//! returns when its duration or frame budget is spent. Effects draw through
//! an [`EffectContext`], which owns nothing but borrows the surface, the
//! clock and the random source for exactly one run.
//!
//! # Built-in effects
//!
//! | Name            | Behavior                                        |
//! |-----------------|-------------------------------------------------|
//! | `solid`         | one color for `duration` seconds                |
//! | `shootingstars` | stars with fading trails cross the strip        |
//! | `fireworks`     | paired sparks burst outward and decay           |
//! | `rainbow`       | a full hue gradient sweeps along the strip      |
//! | `confetti`      | a narrow, fast-cycling hue band                 |

pub mod fireworks;
pub mod preview;
pub mod rainbow;
pub mod registry;
pub mod shooting_stars;
pub mod solid;

pub use fireworks::Fireworks;
pub use preview::TerminalSurface;
pub use rainbow::{Confetti, Rainbow};
pub use registry::{normalize_name, EffectRegistry};
pub use shooting_stars::ShootingStars;
pub use solid::Solid;

use std::time::Duration;

use ledreaccs_surface::{PixelSurface, SurfaceError};
use rand::rngs::StdRng;
use serde::Serialize;
use thiserror::Error;

use crate::clock::FrameClock;
use crate::color::Rgb;

/// Simulation rate of the particle effects.
pub const SIMULATION_FPS: f64 = 50.0;

/// Delay between simulation frames.
pub const FRAME_DELAY: Duration = Duration::from_millis(20);

// ── Parameters ───────────────────────────────────────────────────────

/// Per-invocation effect parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EffectParams {
    /// Seconds to play. Effects with a fixed frame count ignore it.
    pub duration: f64,
    /// Effect-defined rate. Fireworks caps it at 10.
    pub speed: f32,
    /// Base color.
    pub color: Rgb,
    /// Base luminance 0.0-1.0.
    pub luminance: f32,
}

impl EffectParams {
    pub const DEFAULT_DURATION: f64 = 3.0;
    pub const DEFAULT_SPEED: f32 = 5.0;
    pub const DEFAULT_COLOR: Rgb = Rgb::new(180, 150, 200);
    pub const DEFAULT_LUMINANCE: f32 = 1.0;

    /// Number of simulation frames needed to cover `duration` at `fps`.
    pub fn frame_count(&self, fps: f64) -> u64 {
        if self.duration <= 0.0 {
            return 0;
        }
        (self.duration * fps).ceil() as u64
    }

    /// Duration as a `Duration`, with negative or NaN values treated as zero.
    pub fn duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.duration).unwrap_or(Duration::ZERO)
    }
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            duration: Self::DEFAULT_DURATION,
            speed: Self::DEFAULT_SPEED,
            color: Self::DEFAULT_COLOR,
            luminance: Self::DEFAULT_LUMINANCE,
        }
    }
}

// ── Effect contract ──────────────────────────────────────────────────

/// Errors raised inside a running effect.
#[derive(Error, Debug)]
pub enum EffectError {
    #[error("surface: {0}")]
    Surface(#[from] SurfaceError),

    #[error("{0}")]
    Failed(String),
}

/// Everything an effect may touch while it runs.
pub struct EffectContext<'a> {
    pub surface: &'a mut dyn PixelSurface,
    pub clock: &'a dyn FrameClock,
    pub rng: &'a mut StdRng,
}

impl<'a> EffectContext<'a> {
    pub fn new(
        surface: &'a mut dyn PixelSurface,
        clock: &'a dyn FrameClock,
        rng: &'a mut StdRng,
    ) -> Self {
        Self {
            surface,
            clock,
            rng,
        }
    }
}

/// A named animation.
///
/// `run` blocks until the animation is finished. Implementations keep no
/// state between runs.
pub trait Effect: Send + Sync {
    /// Display name; the registry key is derived from it.
    fn name(&self) -> &'static str;

    /// One-line description for listings.
    fn description(&self) -> &'static str;

    fn run(&self, ctx: &mut EffectContext<'_>, params: &EffectParams) -> Result<(), EffectError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use ledreaccs_surface::MemorySurface;
    use rand::SeedableRng;

    use super::*;
    use crate::clock::ManualClock;

    /// Run an effect against an in-memory surface with virtual time.
    pub(crate) fn run_simulated(
        effect: &dyn Effect,
        params: &EffectParams,
        clock: &ManualClock,
    ) -> (MemorySurface, Result<(), EffectError>) {
        let mut surface = MemorySurface::new(16);
        let mut rng = StdRng::seed_from_u64(7);
        let result = {
            let mut ctx = EffectContext::new(&mut surface, clock, &mut rng);
            effect.run(&mut ctx, params)
        };
        (surface, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let p = EffectParams::default();
        assert_eq!(p.duration, 3.0);
        assert_eq!(p.speed, 5.0);
        assert_eq!(p.color, Rgb::new(180, 150, 200));
        assert_eq!(p.luminance, 1.0);
    }

    #[test]
    fn test_frame_count_rounds_up() {
        let p = EffectParams {
            duration: 0.03,
            ..EffectParams::default()
        };
        assert_eq!(p.frame_count(SIMULATION_FPS), 2);
        let p = EffectParams {
            duration: 0.0,
            ..EffectParams::default()
        };
        assert_eq!(p.frame_count(SIMULATION_FPS), 0);
    }

    #[test]
    fn test_negative_duration_is_zero() {
        let p = EffectParams {
            duration: -1.0,
            ..EffectParams::default()
        };
        assert_eq!(p.duration(), Duration::ZERO);
    }
}
