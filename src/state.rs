use std::f64::consts::TAU;
use std::time::Instant;

/// Default rotation speed of the dome, in milliseconds per radian
pub const DEFAULT_MS_PER_RADIAN: f64 = 2200.0;
/// Period divisor of the ring's breathing pulse, in milliseconds
pub const PULSE_MS_DIVISOR: f64 = 900.0;

/// Monotonic time source for the frame loop
#[derive(Debug, Clone, Copy)]
pub struct AnimationClock {
    start: Instant,
}

impl AnimationClock {
    pub fn start() -> Self {
        AnimationClock {
            start: Instant::now(),
        }
    }

    /// Milliseconds since the clock started
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

/// Maps elapsed time to the dome's rotation angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationTiming {
    pub ms_per_radian: f64,
}

impl Default for RotationTiming {
    fn default() -> Self {
        RotationTiming {
            ms_per_radian: DEFAULT_MS_PER_RADIAN,
        }
    }
}

impl RotationTiming {
    /// Angle in `[0, 2π)`, recomputed from scratch so it never drifts
    pub fn angle_at(&self, elapsed_ms: f64) -> f64 {
        (elapsed_ms / self.ms_per_radian).rem_euclid(TAU)
    }
}

/// Breathing factor of the ring radius, in `[0.8, 1.0]`
pub fn ring_pulse(elapsed_ms: f64) -> f64 {
    0.9 + 0.1 * (elapsed_ms / PULSE_MS_DIVISOR).sin()
}
