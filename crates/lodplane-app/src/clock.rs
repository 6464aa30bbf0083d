//! Frame timing: elapsed time for the plasma animation and a clamped delta
//! for camera movement.

use std::time::{Duration, Instant};

use tracing::warn;

/// Longest delta handed to the camera after a stall.
pub const MAX_FRAME_TIME: f32 = 0.25;

pub struct FrameClock {
    start: Instant,
    previous: Instant,
    frame_count: u64,
}

/// Timing for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous frame, at most [`MAX_FRAME_TIME`].
    pub delta: f32,
    /// Seconds since the clock started.
    pub elapsed: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    fn starting_at(start: Instant) -> Self {
        Self {
            start,
            previous: start,
            frame_count: 0,
        }
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let mut delta = now.saturating_duration_since(self.previous).as_secs_f32();
        self.previous = now;
        self.frame_count += 1;

        if delta > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                delta * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            delta = MAX_FRAME_TIME;
        }

        FrameTime {
            delta,
            elapsed: now.saturating_duration_since(self.start).as_secs_f32(),
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn uptime(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
