//! Frame scheduling and timing utilities.
//!
//! Provides frame pacing without owning a timer: the caller asks the
//! scheduler when the next frame is due and sleeps in whatever way suits
//! the platform. [`FpsCounter`] measures the rate actually achieved.

use embassy_time::{Duration, Instant};

/// Default target frame rate (30 FPS).
pub const DEFAULT_FPS: u32 = 30;

/// Length of the FPS accounting window.
pub const FPS_WINDOW: Duration = Duration::from_secs(1);

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (may be zero if behind schedule).
    pub sleep_duration: Duration,
}

/// Frame duration for a target rate, with microsecond precision
///
/// A rate of zero is treated as one frame per second.
pub const fn frame_duration(fps: u32) -> Duration {
    let fps = if fps == 0 { 1 } else { fps };
    Duration::from_micros(1_000_000 / fps as u64)
}

/// Fixed cadence scheduler with drift correction.
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = FrameScheduler::new(30);
///
/// loop {
///     let result = scheduler.tick(Instant::now());
///     render_frame();
///     sleep(result.sleep_duration);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    next_frame: Option<Instant>,
    frame_duration: Duration,
}

impl FrameScheduler {
    pub const fn new(fps: u32) -> Self {
        Self::with_frame_duration(frame_duration(fps))
    }

    pub const fn with_frame_duration(frame_duration: Duration) -> Self {
        Self {
            next_frame: None,
            frame_duration,
        }
    }

    pub const fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// Forget the current deadline; the next tick starts a new timeline
    pub const fn reset(&mut self) {
        self.next_frame = None;
    }

    /// Account for a frame starting at `now` and return the next deadline.
    ///
    /// If the caller has fallen more than two frames behind, the timeline
    /// restarts at `now` instead of bursting to catch up.
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        let max_drift = self.frame_duration.as_micros() * 2;
        let scheduled = match self.next_frame {
            Some(deadline) if now.as_micros() <= deadline.as_micros() + max_drift => deadline,
            _ => now,
        };

        let next_frame = scheduled + self.frame_duration;
        self.next_frame = Some(next_frame);

        let sleep_duration = if next_frame.as_micros() > now.as_micros() {
            Duration::from_micros(next_frame.as_micros() - now.as_micros())
        } else {
            Duration::from_micros(0)
        };

        FrameResult {
            next_deadline: next_frame,
            sleep_duration,
        }
    }
}

/// Achieved frame rate over one-second windows
///
/// The first recorded frame opens the window. Once a frame lands at least
/// [`FPS_WINDOW`] after the window start, the rate of that window becomes
/// the reported value and a new window opens.
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    window_start: Option<Instant>,
    frames: u32,
    fps: u32,
}

impl FpsCounter {
    pub const fn new() -> Self {
        Self {
            window_start: None,
            frames: 0,
            fps: 0,
        }
    }

    /// Reset the window and the reported value
    pub const fn reset(&mut self) {
        *self = Self::new();
    }

    /// Rate of the last completed window, zero before the first one
    pub const fn fps(&self) -> u32 {
        self.fps
    }

    /// Count a frame at `now`
    ///
    /// Returns the new rate when a window completed.
    #[allow(clippy::cast_possible_truncation, clippy::cast_lossless)]
    pub fn record(&mut self, now: Instant) -> Option<u32> {
        let Some(start) = self.window_start else {
            self.window_start = Some(now);
            return None;
        };
        self.frames += 1;

        let elapsed = now.as_micros().saturating_sub(start.as_micros());
        if elapsed < FPS_WINDOW.as_micros() {
            return None;
        }

        let window = FPS_WINDOW.as_micros();
        self.fps = ((self.frames as u64 * window + elapsed / 2) / elapsed) as u32;
        self.frames = 0;
        self.window_start = Some(now);
        Some(self.fps)
    }
}
