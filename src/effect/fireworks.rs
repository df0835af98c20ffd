//! Fireworks: sparks burst in opposite directions and slow to a stop.

use ledreaccs_surface::PixelSurface;
use rand::Rng;

use super::{Effect, EffectContext, EffectError, EffectParams, FRAME_DELAY, SIMULATION_FPS};
use crate::color::{hsv_to_rgb, Rgb};

/// Speeds above this are treated as this.
pub const MAX_SPEED: f32 = 10.0;

/// Per-frame velocity multiplier.
pub const VELOCITY_DECAY: f32 = 0.8;

/// Sparks slower than this are dead.
pub const ALIVE_THRESHOLD: f32 = 0.01;

/// Frames without sparks after which an explosion is forced.
const IDLE_FRAMES_BEFORE_EXPLOSION: u32 = 10;

/// One spark.
#[derive(Debug, Clone)]
pub struct Spark {
    width: usize,
    x: f32,
    dx: f32,
    initial_dx: f32,
    color: Rgb,
    luminance: f32,
    alive: bool,
}

impl Spark {
    pub fn new(width: usize, x: f32, dx: f32, color: Rgb) -> Self {
        Self {
            width,
            x,
            dx,
            initial_dx: dx,
            color,
            luminance: 1.0,
            alive: true,
        }
    }

    pub fn position(&self) -> f32 {
        self.x
    }

    pub fn velocity(&self) -> f32 {
        self.dx
    }

    pub fn luminance(&self) -> f32 {
        self.luminance
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    fn in_bounds(&self) -> bool {
        self.x >= 0.0 && (self.x as usize) < self.width
    }

    /// Advance one frame: move, fade with speed, then decay velocity.
    pub fn update(&mut self) {
        self.x += self.dx;
        self.luminance = if self.initial_dx == 0.0 {
            0.0
        } else {
            (self.dx / (self.initial_dx * 0.3)).abs().min(1.0)
        };

        if self.dx.abs() < ALIVE_THRESHOLD || !self.in_bounds() {
            self.alive = false;
        }

        self.dx *= VELOCITY_DECAY;
    }

    /// Draw onto the surface if the spark is on the strip.
    pub fn draw(&self, surface: &mut dyn PixelSurface, luminance: f32) -> Result<(), EffectError> {
        if self.in_bounds() {
            let (r, g, b) = self.color.channels();
            surface.set_pixel(self.x as usize, r, g, b, self.luminance * luminance)?;
        }
        Ok(())
    }
}

/// Launch a pair of sparks from a random point away from the strip edges.
pub fn explode(sparks: &mut Vec<Spark>, width: usize, speed: f32, rng: &mut impl Rng) {
    let pad = width / 5;
    let x = rng.random_range(pad..=width.saturating_sub(pad).max(pad));
    let hue = rng.random_range(0..=360) as f64 / 360.0;
    let color = hsv_to_rgb(hue, 1.0, 1.0);
    let dx = rng.random_range(0.4..3.7) * (speed / 3.0);
    sparks.push(Spark::new(width, x as f32, dx, color));
    sparks.push(Spark::new(width, x as f32, -dx, color));
}

pub struct Fireworks;

impl Effect for Fireworks {
    fn name(&self) -> &'static str {
        "Fireworks"
    }

    fn description(&self) -> &'static str {
        "Colored sparks burst outward and fade; higher speed, more bursts"
    }

    fn run(&self, ctx: &mut EffectContext<'_>, params: &EffectParams) -> Result<(), EffectError> {
        let width = ctx.surface.len();
        let speed = params.speed.min(MAX_SPEED);
        let mut sparks: Vec<Spark> = Vec::new();
        let mut idle_frames = 0;

        for _ in 0..params.frame_count(SIMULATION_FPS) {
            ctx.surface.clear();

            if sparks.is_empty() {
                idle_frames += 1;
            }

            if idle_frames > IDLE_FRAMES_BEFORE_EXPLOSION
                || ctx.rng.random_range(0..100) as f32 > 92.0 - speed
            {
                explode(&mut sparks, width, speed, &mut *ctx.rng);
                idle_frames = 0;
            }

            for spark in &mut sparks {
                spark.update();
                spark.draw(&mut *ctx.surface, params.luminance)?;
            }
            sparks.retain(Spark::is_alive);

            ctx.surface.show()?;
            ctx.clock.sleep(FRAME_DELAY);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::clock::ManualClock;
    use crate::effect::testing::run_simulated;

    #[test]
    fn test_spark_dies_by_frame_30() {
        let mut spark = Spark::new(16, 2.0, 2.0, Rgb::new(255, 0, 0));
        let mut frames = 0;
        while spark.is_alive() {
            spark.update();
            frames += 1;
            assert!(frames <= 30, "spark still alive after 30 frames");
        }
        // ceil(log(0.01 / 2.0) / log(0.8)) ≈ 24 decays, checked on the next update
        assert!(frames >= 24);
        assert!(spark.position() < 16.0);
    }

    #[test]
    fn test_velocity_decay_and_fade() {
        let mut spark = Spark::new(16, 8.0, 1.0, Rgb::new(0, 255, 0));
        spark.update();
        assert_eq!(spark.position(), 9.0);
        assert!((spark.velocity() - 0.8).abs() < 1e-6);
        // |1.0 / 0.3| capped at 1
        assert_eq!(spark.luminance(), 1.0);

        for _ in 0..10 {
            spark.update();
        }
        assert!(spark.luminance() < 1.0);
    }

    #[test]
    fn test_spark_leaving_strip_dies() {
        let mut spark = Spark::new(16, 1.0, -3.0, Rgb::new(0, 0, 255));
        spark.update();
        assert!(!spark.is_alive());
    }

    #[test]
    fn test_explosion_is_symmetric_pair() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut sparks = Vec::new();
        explode(&mut sparks, 16, 5.0, &mut rng);
        assert_eq!(sparks.len(), 2);
        assert_eq!(sparks[0].position(), sparks[1].position());
        assert_eq!(sparks[0].velocity(), -sparks[1].velocity());
        assert!((3.0..=13.0).contains(&sparks[0].position()));
    }

    #[test]
    fn test_run_flushes_every_frame() {
        let clock = ManualClock::new();
        let params = EffectParams {
            duration: 0.2,
            speed: 50.0,
            ..EffectParams::default()
        };
        let (surface, result) = run_simulated(&Fireworks, &params, &clock);
        result.unwrap();
        assert_eq!(surface.flush_count(), 10);
        assert_eq!(clock.sleep_count(), 10);
    }
}
