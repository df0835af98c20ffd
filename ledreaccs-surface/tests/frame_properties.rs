//! Property tests for the `PixelSurface` contract.
//!
//! These run against the public API only, with the in-memory driver standing
//! in for hardware.

use ledreaccs_surface::{MemorySurface, PixelSurface, StreamSurface, SurfaceError};
use proptest::prelude::*;

proptest! {
    #[test]
    fn set_pixel_reads_back_clamped(
        len in 1usize..64,
        idx_seed in any::<usize>(),
        r in -1000i32..1000,
        g in -1000i32..1000,
        b in -1000i32..1000,
        l in -2.0f32..2.0,
    ) {
        let index = idx_seed % len;
        let mut surface = MemorySurface::new(len);
        surface.set_pixel(index, r, g, b, l).unwrap();

        let p = surface.pixel(index).unwrap();
        prop_assert_eq!(p.r as i32, r.clamp(0, 255));
        prop_assert_eq!(p.g as i32, g.clamp(0, 255));
        prop_assert_eq!(p.b as i32, b.clamp(0, 255));
        prop_assert_eq!(p.luminance, l.clamp(0.0, 1.0));
    }

    #[test]
    fn set_pixel_outside_strip_fails(len in 1usize..64, past in 0usize..1000) {
        let mut surface = MemorySurface::new(len);
        let index = len + past;
        let err = surface.set_pixel(index, 1, 2, 3, 1.0).unwrap_err();
        prop_assert_eq!(err, SurfaceError::OutOfRange { index, len });
        prop_assert!(surface.is_cleared());
    }

    #[test]
    fn brightness_always_clamped(level in -10.0f32..10.0) {
        let mut surface = MemorySurface::new(16);
        surface.set_brightness(level);
        prop_assert!((0.0..=1.0).contains(&surface.brightness()));
    }

    #[test]
    fn streamed_bytes_never_exceed_input(
        r in 0i32..=255,
        g in 0i32..=255,
        b in 0i32..=255,
        l in 0.0f32..=1.0,
        level in 0.0f32..=1.0,
    ) {
        let mut surface = StreamSurface::new(Vec::new(), 1);
        surface.set_brightness(level);
        surface.set_pixel(0, r, g, b, l).unwrap();
        surface.show().unwrap();
        let bytes = surface.into_inner();
        prop_assert!(bytes[0] as i32 <= r);
        prop_assert!(bytes[1] as i32 <= g);
        prop_assert!(bytes[2] as i32 <= b);
    }
}

#[test]
fn set_all_then_clear() {
    let mut surface = MemorySurface::new(16);
    surface.set_all(300, 20, -5, 0.7);
    for i in 0..16 {
        let p = surface.pixel(i).unwrap();
        assert_eq!((p.r, p.g, p.b), (255, 20, 0));
    }
    surface.clear();
    assert!(surface.is_cleared());
}

#[test]
fn show_is_idempotent() {
    let mut surface = MemorySurface::new(16);
    surface.set_rgb(3, 1, 2, 3).unwrap();
    surface.show().unwrap();
    let first = surface.last_shown().cloned();
    surface.show().unwrap();
    assert_eq!(surface.last_shown().cloned(), first);
}
