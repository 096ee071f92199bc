use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use embassy_time::{Duration, Instant};

use super::OutputDriver;
use crate::{color::Rgb, error::OutputError};

/// Interval between throughput log lines
const REPORT_INTERVAL: Duration = Duration::from_secs(30);

/// Driver for hosts without LED hardware
///
/// Accepts every frame and periodically logs the achieved frame rate.
#[derive(Debug)]
pub struct MockDriver {
    led_count: usize,
    frames: Arc<AtomicU64>,
    window_frames: u64,
    window_start: Option<Instant>,
}

impl MockDriver {
    pub fn new(led_count: usize) -> Self {
        Self {
            led_count,
            frames: Arc::new(AtomicU64::new(0)),
            window_frames: 0,
            window_start: None,
        }
    }

    /// Shared counter of frames written, readable after the driver has been
    /// moved into a sink
    pub fn frame_counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.frames)
    }

    #[allow(clippy::cast_precision_loss)]
    fn report(&mut self) {
        let now = Instant::now();
        let Some(start) = self.window_start else {
            self.window_start = Some(now);
            return;
        };
        self.window_frames += 1;

        let elapsed = now.as_micros().saturating_sub(start.as_micros());
        if elapsed >= REPORT_INTERVAL.as_micros() {
            let fps = self.window_frames as f64 * 1_000_000.0 / elapsed as f64;
            log::debug!("output: mock driver {} LEDs at {fps:.1} FPS", self.led_count);
            self.window_frames = 0;
            self.window_start = Some(now);
        }
    }
}

impl OutputDriver for MockDriver {
    fn write(&mut self, _colors: &[Rgb]) -> Result<(), OutputError> {
        self.frames.fetch_add(1, Ordering::Relaxed);
        self.report();
        Ok(())
    }
}
