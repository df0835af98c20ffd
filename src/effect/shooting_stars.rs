//! Shooting stars: bright heads with fading trails crossing the strip.
//!
//! Stars are simulated at 50 fps into an intensity buffer, but the buffer is
//! only pushed to the LEDs on every other frame.

use ledreaccs_surface::PixelSurface;
use rand::Rng;

use super::{Effect, EffectContext, EffectError, EffectParams, FRAME_DELAY, SIMULATION_FPS};
use crate::color::Rgb;

/// Tint added under the stars.
pub const BACKGROUND: Rgb = Rgb::new(0, 0, 40);

/// Percent roll a frame must exceed to spawn an extra star.
const SPAWN_THRESHOLD: u32 = 90;

/// One star. Position is the head; the trail extends towards lower indices.
#[derive(Debug, Clone)]
pub struct Star {
    t: u32,
    x: f32,
    step_divisor: u32,
    trail: u32,
    intensity_step: i32,
    alive: bool,
}

impl Star {
    /// A star just left of pixel 0.
    pub fn new(step_divisor: u32, trail: u32) -> Self {
        let step_divisor = step_divisor.max(1);
        let trail = trail.max(1);
        Self {
            t: 0,
            x: -1.0,
            step_divisor,
            trail,
            intensity_step: 255 / trail as i32,
            alive: true,
        }
    }

    /// Divisor 1-2, trail 3-7.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::new(rng.random_range(1..=2), rng.random_range(3..=7))
    }

    pub fn position(&self) -> f32 {
        self.x
    }

    pub fn intensity_step(&self) -> i32 {
        self.intensity_step
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Advance one simulation tick.
    pub fn update(&mut self, width: usize) {
        self.t += 1;
        if (self.x - self.trail as f32) as i32 > width as i32 {
            self.alive = false;
        }
        if self.t % self.step_divisor == 0 {
            self.x += 1.0;
        }
    }

    /// Add this star's head and trail to the buffer.
    pub fn draw(&self, buffer: &mut StarBuffer) {
        let mut intensity = 255;
        for i in 0..self.trail {
            let px = (self.x - i as f32) as i32;
            if px >= 0 {
                buffer.set_max(px as usize, intensity as f32 / 255.0);
            }
            intensity -= self.intensity_step;
        }
    }
}

/// Per-pixel star intensity, 0.0-1.0.
#[derive(Debug, Clone)]
pub struct StarBuffer {
    intensity: Vec<f32>,
}

impl StarBuffer {
    pub fn new(width: usize) -> Self {
        Self {
            intensity: vec![0.0; width],
        }
    }

    pub fn get(&self, index: usize) -> f32 {
        self.intensity.get(index).copied().unwrap_or(0.0)
    }

    /// Keep the brighter of the current and new value. Out-of-range writes
    /// are ignored.
    pub fn set_max(&mut self, index: usize, value: f32) {
        if let Some(slot) = self.intensity.get_mut(index) {
            *slot = slot.max(value);
        }
    }

    pub fn clear(&mut self) {
        self.intensity.fill(0.0);
    }

    /// Composite `color × intensity` over the background onto the surface.
    pub fn write(
        &self,
        surface: &mut dyn PixelSurface,
        color: Rgb,
        luminance: f32,
    ) -> Result<(), EffectError> {
        let mix = |bg: u8, c: u8, v: f32| (bg as f32 + c as f32 * v) as i32;
        for (i, &v) in self.intensity.iter().enumerate() {
            surface.set_pixel(
                i,
                mix(BACKGROUND.r, color.r, v),
                mix(BACKGROUND.g, color.g, v),
                mix(BACKGROUND.b, color.b, v),
                luminance,
            )?;
        }
        Ok(())
    }
}

pub struct ShootingStars;

impl Effect for ShootingStars {
    fn name(&self) -> &'static str {
        "Shooting Stars"
    }

    fn description(&self) -> &'static str {
        "Stars with fading trails streak across a dim blue sky"
    }

    fn run(&self, ctx: &mut EffectContext<'_>, params: &EffectParams) -> Result<(), EffectError> {
        let width = ctx.surface.len();
        let mut buffer = StarBuffer::new(width);
        let mut stars: Vec<Star> = Vec::new();

        for frame in 0..params.frame_count(SIMULATION_FPS) {
            for star in &mut stars {
                star.update(width);
                star.draw(&mut buffer);
            }
            stars.retain(Star::is_alive);

            if stars.is_empty() || ctx.rng.random_range(0..=100) > SPAWN_THRESHOLD {
                stars.push(Star::random(&mut *ctx.rng));
            }

            if frame % 2 == 0 {
                buffer.write(&mut *ctx.surface, params.color, params.luminance)?;
                ctx.surface.show()?;
            }

            buffer.clear();
            ctx.clock.sleep(FRAME_DELAY);
        }

        ctx.surface.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::clock::ManualClock;
    use crate::effect::testing::run_simulated;

    #[test]
    fn test_step_divisor_two_moves_every_other_tick() {
        let mut star = Star::new(2, 5);
        assert_eq!(star.intensity_step(), 51);

        let start = star.position();
        for tick in 1..=10u32 {
            star.update(16);
            let expected = start + (tick / 2) as f32;
            assert_eq!(star.position(), expected, "tick {tick}");
        }
    }

    #[test]
    fn test_trail_falloff() {
        let mut star = Star::new(1, 5);
        for _ in 0..5 {
            star.update(16);
        }
        assert_eq!(star.position(), 4.0);

        let mut buffer = StarBuffer::new(16);
        star.draw(&mut buffer);
        let expected = [51, 102, 153, 204, 255];
        for (px, want) in expected.iter().enumerate() {
            assert!((buffer.get(px) - *want as f32 / 255.0).abs() < 1e-6);
        }
        assert_eq!(buffer.get(5), 0.0);
    }

    #[test]
    fn test_star_culled_after_leaving_strip() {
        let mut star = Star::new(1, 3);
        let mut ticks = 0;
        while star.is_alive() {
            star.update(16);
            ticks += 1;
            assert!(ticks < 100, "star never died");
        }
        // Tail (head - trail) must be past the last pixel.
        assert!(star.position() - 3.0 > 16.0);
    }

    #[test]
    fn test_set_max_keeps_brightest() {
        let mut buffer = StarBuffer::new(4);
        buffer.set_max(1, 0.8);
        buffer.set_max(1, 0.2);
        buffer.set_max(9, 1.0);
        assert_eq!(buffer.get(1), 0.8);
    }

    #[test]
    fn test_write_composites_background() {
        let mut buffer = StarBuffer::new(16);
        buffer.set_max(0, 1.0);
        buffer.set_max(1, 0.5);
        let mut surface = ledreaccs_surface::MemorySurface::new(16);
        buffer
            .write(&mut surface, Rgb::new(100, 100, 250), 0.6)
            .unwrap();

        let p0 = surface.pixel(0).unwrap();
        assert_eq!((p0.r, p0.g, p0.b), (100, 100, 255));
        let p1 = surface.pixel(1).unwrap();
        assert_eq!((p1.r, p1.g, p1.b), (50, 50, 165));
        let p2 = surface.pixel(2).unwrap();
        assert_eq!((p2.r, p2.g, p2.b), (0, 0, 40));
        assert_eq!(p2.luminance, 0.6);
    }

    #[test]
    fn test_run_flushes_every_other_frame() {
        let clock = ManualClock::new();
        let params = EffectParams {
            duration: 0.1,
            ..EffectParams::default()
        };
        let (surface, result) = run_simulated(&ShootingStars, &params, &clock);
        result.unwrap();

        // 5 frames, flushed on 0, 2, 4
        assert_eq!(surface.flush_count(), 3);
        assert_eq!(clock.slept(), Duration::from_millis(100));
        assert!(surface.is_cleared());
        let shown = surface.last_shown().unwrap();
        assert!(shown.pixels().iter().all(|p| p.b >= BACKGROUND.b));
    }
}
