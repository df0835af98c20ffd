//! Solid block of color.

use super::{Effect, EffectContext, EffectError, EffectParams};

pub struct Solid;

impl Effect for Solid {
    fn name(&self) -> &'static str {
        "Solid"
    }

    fn description(&self) -> &'static str {
        "Whole strip in one color for the given duration"
    }

    fn run(&self, ctx: &mut EffectContext<'_>, params: &EffectParams) -> Result<(), EffectError> {
        let (r, g, b) = params.color.channels();
        ctx.surface.set_all(r, g, b, params.luminance);
        ctx.surface.show()?;
        ctx.clock.sleep(params.duration());
        ctx.surface.clear();
        Ok(())
    }
}
