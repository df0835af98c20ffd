//! Hue sweeps driven by wall-clock time.
//!
//! Both effects recompute the whole strip from the current time on every
//! iteration, so consecutive runs pick up where the clock is rather than
//! where the last run stopped.

use std::time::Duration;

use super::{Effect, EffectContext, EffectError, EffectParams};
use crate::color::hsv_to_rgb;

/// Iterations per run, independent of `duration`.
pub const SWEEP_ITERATIONS: u32 = 100;

/// Requested delay between iterations. Flushing usually takes longer.
const SWEEP_DELAY: Duration = Duration::from_millis(1);

/// Pixel spacing of the gradient, in degrees.
const HUE_SPACING: f64 = 360.0 / 16.0;

/// Shape of one hue sweep.
#[derive(Debug, Clone, Copy)]
struct Sweep {
    /// The time-driven phase wraps at this many degrees.
    phase_modulus: i64,
    /// Each pixel's hue wraps at this many degrees before normalizing.
    band: f64,
}

impl Sweep {
    /// Hue in turns for pixel `x` at `now` (seconds).
    fn hue(&self, now: f64, x: usize) -> f64 {
        let phase = ((now * 100.0) as i64).rem_euclid(self.phase_modulus) as f64;
        ((phase + x as f64 * HUE_SPACING) % self.band) / self.band
    }

    fn frame(&self, ctx: &mut EffectContext<'_>) -> Result<(), EffectError> {
        let now = ctx.clock.now();
        for x in 0..ctx.surface.len() {
            let (r, g, b) = hsv_to_rgb(self.hue(now, x), 1.0, 1.0).channels();
            ctx.surface.set_rgb(x, r, g, b)?;
        }
        ctx.surface.show()?;
        ctx.clock.sleep(SWEEP_DELAY);
        Ok(())
    }
}

const RAINBOW: Sweep = Sweep {
    phase_modulus: 360,
    band: 360.0,
};

const CONFETTI: Sweep = Sweep {
    phase_modulus: 180,
    band: 30.0,
};

/// Confetti ignores the luminance parameter.
const CONFETTI_BRIGHTNESS: f32 = 0.8;

pub struct Rainbow;

impl Effect for Rainbow {
    fn name(&self) -> &'static str {
        "Rainbow"
    }

    fn description(&self) -> &'static str {
        "Full hue gradient sweeping along the strip"
    }

    fn run(&self, ctx: &mut EffectContext<'_>, params: &EffectParams) -> Result<(), EffectError> {
        ctx.surface.clear();
        ctx.surface.set_brightness(params.luminance);
        for _ in 0..SWEEP_ITERATIONS {
            RAINBOW.frame(ctx)?;
        }
        Ok(())
    }
}

pub struct Confetti;

impl Effect for Confetti {
    fn name(&self) -> &'static str {
        "Confetti"
    }

    fn description(&self) -> &'static str {
        "Tight, fast-cycling band of hues"
    }

    fn run(&self, ctx: &mut EffectContext<'_>, _params: &EffectParams) -> Result<(), EffectError> {
        ctx.surface.clear();
        ctx.surface.set_brightness(CONFETTI_BRIGHTNESS);
        for _ in 0..SWEEP_ITERATIONS {
            CONFETTI.frame(ctx)?;
        }
        ctx.surface.clear();
        ctx.surface.show()?;
        Ok(())
    }
}
