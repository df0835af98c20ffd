//! Tolerance for transient flush failures.
//!
//! A single dropped frame is harmless for an animation, a device that stays
//! unreachable is not. `FailureGuard` swallows isolated flush errors and only
//! reports `DeviceError` once failures have been consecutive for
//! `max_consecutive_failures` frames.

use tracing::{debug, warn};

use crate::error::SurfaceError;
use crate::frame::FrameBuffer;
use crate::surface::PixelSurface;

/// Default number of consecutive failed flushes before giving up.
pub const DEFAULT_MAX_CONSECUTIVE_FAILURES: u32 = 3;

/// Wraps a surface and counts consecutive flush failures.
pub struct FailureGuard<S> {
    inner: S,
    max_consecutive_failures: u32,
    consecutive_failures: u32,
}

impl<S: PixelSurface> FailureGuard<S> {
    /// `max_consecutive_failures` of 0 or 1 means every failure propagates.
    pub fn new(inner: S, max_consecutive_failures: u32) -> Self {
        Self {
            inner,
            max_consecutive_failures: max_consecutive_failures.max(1),
            consecutive_failures: 0,
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: PixelSurface> PixelSurface for FailureGuard<S> {
    fn frame(&self) -> &FrameBuffer {
        self.inner.frame()
    }

    fn frame_mut(&mut self) -> &mut FrameBuffer {
        self.inner.frame_mut()
    }

    fn flush(&mut self) -> Result<(), SurfaceError> {
        match self.inner.flush() {
            Ok(()) => {
                if self.consecutive_failures > 0 {
                    debug!(
                        "LED flush recovered after {} failure(s)",
                        self.consecutive_failures
                    );
                }
                self.consecutive_failures = 0;
                Ok(())
            }
            Err(e) => {
                self.consecutive_failures += 1;
                if self.consecutive_failures >= self.max_consecutive_failures {
                    Err(e)
                } else {
                    warn!(
                        "LED flush failed ({}/{}): {}",
                        self.consecutive_failures, self.max_consecutive_failures, e
                    );
                    Ok(())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemorySurface;

    /// Fails the flushes whose sequence number is listed in `fail_on`.
    struct Flaky {
        frame: FrameBuffer,
        calls: u32,
        fail_on: Vec<u32>,
    }

    impl Flaky {
        fn new(fail_on: Vec<u32>) -> Self {
            Self {
                frame: FrameBuffer::new(4),
                calls: 0,
                fail_on,
            }
        }
    }

    impl PixelSurface for Flaky {
        fn frame(&self) -> &FrameBuffer {
            &self.frame
        }
        fn frame_mut(&mut self) -> &mut FrameBuffer {
            &mut self.frame
        }
        fn flush(&mut self) -> Result<(), SurfaceError> {
            self.calls += 1;
            if self.fail_on.contains(&self.calls) {
                Err(SurfaceError::Device("i2c write failed".into()))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_isolated_failures_tolerated() {
        let mut s = FailureGuard::new(Flaky::new(vec![1, 3, 5]), 2);
        for _ in 0..6 {
            assert!(s.show().is_ok());
        }
        assert_eq!(s.consecutive_failures(), 0);
    }

    #[test]
    fn test_persistent_failure_propagates() {
        let mut s = FailureGuard::new(Flaky::new(vec![1, 2, 3, 4]), 3);
        assert!(s.show().is_ok());
        assert!(s.show().is_ok());
        assert!(matches!(s.show(), Err(SurfaceError::Device(_))));
        assert!(s.show().is_err());
        assert!(s.show().is_ok());
        assert_eq!(s.consecutive_failures(), 0);
    }

    #[test]
    fn test_threshold_of_one_never_retries() {
        let mut s = FailureGuard::new(Flaky::new(vec![1]), 0);
        assert!(s.show().is_err());
    }

    #[test]
    fn test_delegates_frame() {
        let mut s = FailureGuard::new(MemorySurface::new(4), 3);
        s.set_rgb(1, 9, 9, 9).unwrap();
        s.show().unwrap();
        assert_eq!(s.get_ref().flush_count(), 1);
        assert_eq!(s.pixel(1).unwrap().r, 9);
    }
}
