//! Smooth scroll-bar motion for windowed lists.
//!
//! The scroll bar position is continuous while the selection it follows is
//! discrete. Each frame the bar chases its target with exponential decay, so
//! the motion depends only on the current position, the target and the frame
//! delta.
mod scrollbar_math;

pub use self::scrollbar_math::{linear_map, linear_map_index, scroll_bar_target};

/// Fraction of the remaining distance covered per second.
pub const SCROLL_CHASE_RATE: f32 = 5.0;

/// Moves `current` toward `target` and clamps the result into `[min, max]`.
///
/// A bar already on target is returned as is (still clamped, so a position
/// left outside the track by a layout change snaps back in).
pub fn advance(current: f32, target: f32, elapsed_seconds: f32, min: f32, max: f32) -> f32 {
    let (low, high) = if min <= max { (min, max) } else { (max, min) };
    if current == target {
        return clamp_to(current, low, high);
    }

    let fraction = if elapsed_seconds.is_finite() {
        (SCROLL_CHASE_RATE * elapsed_seconds).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let next = current + (target - current) * fraction;
    clamp_to(next, low, high)
}

fn clamp_to(value: f32, low: f32, high: f32) -> f32 {
    value.max(low).min(high)
}

/// The single persisted value behind a menu's scroll bar.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollAnimator {
    position: f32,
}

impl ScrollAnimator {
    pub const fn new(position: f32) -> Self {
        Self { position }
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn snap_to(&mut self, position: f32) {
        self.position = position;
    }

    pub fn step(&mut self, target: f32, elapsed_seconds: f32, min: f32, max: f32) -> f32 {
        self.position = advance(self.position, target, elapsed_seconds, min, max);
        self.position
    }
}
