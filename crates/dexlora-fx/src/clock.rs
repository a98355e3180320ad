#![forbid(unsafe_code)]

//! Frame delta clock.
//!
//! Uses `web_time::Instant` so the same code runs on `wasm32-unknown-unknown`
//! (where `std::time::Instant` panics) and natively.

use std::time::Duration;

use web_time::Instant;

/// Upper bound on a single frame step, in seconds.
///
/// A tab that was backgrounded resumes with one long gap; effects would
/// otherwise jump forward by that whole gap.
pub const MAX_FRAME_DT: f64 = 0.1;

/// Measures the time between consecutive frames.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    #[must_use]
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Seconds since the previous tick, clamped to `[0, MAX_FRAME_DT]`.
    /// The first tick returns `0.0`.
    pub fn tick(&mut self) -> f64 {
        self.tick_at(Instant::now())
    }

    /// [`tick`](Self::tick) against an explicit timestamp.
    pub fn tick_at(&mut self, now: Instant) -> f64 {
        let dt = match self.last {
            Some(last) => now.saturating_duration_since(last),
            None => Duration::ZERO,
        };
        self.last = Some(now);
        dt.as_secs_f64().min(MAX_FRAME_DT)
    }

    /// Forget the previous tick, e.g. after the effect was paused.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
