//! Fixed-rate render loop
//!
//! The loop thread wakes once per frame period, ticks the wired effect and
//! pushes the frame to the output sink. All mutations go through the same
//! state mutex, so they land between ticks, never inside one.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use embassy_time::Instant;

use crate::{
    effect::SharedEffect,
    error::{Error, Result},
    frame_scheduler::{FpsCounter, FrameScheduler, frame_duration},
    lock,
    output::OutputSink,
    param::EffectParams,
};

const THREAD_NAME: &str = "render-loop";

struct LoopState {
    sink: OutputSink,
    effect: Option<SharedEffect>,
    power: bool,
    /// Sink has been blanked since power went off
    blanked: bool,
    /// Last tick panicked; suppresses repeated fault logs
    faulted: bool,
    frame: u64,
    fps: FpsCounter,
}

impl LoopState {
    fn step(&mut self, now: Instant, interval_ms: f64) {
        self.frame += 1;
        self.fps.record(now);

        if !self.power {
            if !self.blanked {
                if let Err(err) = self.sink.clear() {
                    log::warn!("render_loop: failed to blank strip: {err}");
                }
                self.blanked = true;
            }
            return;
        }

        let Some(effect) = &self.effect else {
            return;
        };

        let frame = self.frame;
        let sink = &mut self.sink;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut effect = lock(effect);
            sink.set_all(effect.tick(frame, interval_ms));
        }));

        match outcome {
            Ok(()) => self.faulted = false,
            Err(payload) => {
                if !self.faulted {
                    log::warn!(
                        "render_loop: effect tick failed at frame {frame}: {}",
                        panic_message(payload.as_ref())
                    );
                }
                self.faulted = true;
                return;
            }
        }

        if let Err(err) = self.sink.render() {
            log::warn!("render_loop: {err}");
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Render loop driving one effect into one sink
///
/// Starts stopped. Dropping the loop stops it.
pub struct RenderLoop {
    state: Arc<Mutex<LoopState>>,
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
    led_count: usize,
    target_fps: u32,
}

impl RenderLoop {
    pub fn new(sink: OutputSink, target_fps: u32) -> Self {
        let led_count = sink.led_count();
        let state = LoopState {
            sink,
            effect: None,
            power: true,
            blanked: false,
            faulted: false,
            frame: 0,
            fps: FpsCounter::new(),
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            running: Arc::new(AtomicBool::new(false)),
            thread: None,
            led_count,
            target_fps: target_fps.max(1),
        }
    }

    pub const fn led_count(&self) -> usize {
        self.led_count
    }

    pub const fn target_fps(&self) -> u32 {
        self.target_fps
    }

    /// Frame interval handed to effects, in milliseconds
    pub fn interval_ms(&self) -> f64 {
        1000.0 / f64::from(self.target_fps)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Start ticking on a dedicated thread. No-op when already running.
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Ok(());
        }

        {
            let mut state = lock(&self.state);
            state.frame = 0;
            state.fps.reset();
        }

        self.running.store(true, Ordering::Release);
        let state = Arc::clone(&self.state);
        let running = Arc::clone(&self.running);
        let mut scheduler = FrameScheduler::new(self.target_fps);
        let interval_ms = self.interval_ms();

        let spawned = thread::Builder::new()
            .name(THREAD_NAME.into())
            .spawn(move || {
                while running.load(Ordering::Acquire) {
                    let now = Instant::now();
                    let timing = scheduler.tick(now);
                    lock(&state).step(now, interval_ms);
                    thread::sleep(std::time::Duration::from_micros(
                        timing.sleep_duration.as_micros(),
                    ));
                }
            });

        match spawned {
            Ok(handle) => {
                self.thread = Some(handle);
                log::info!("render_loop: started at {} FPS", self.target_fps);
                Ok(())
            }
            Err(err) => {
                self.running.store(false, Ordering::Release);
                Err(Error::Spawn(err))
            }
        }
    }

    /// Stop ticking and blank the strip. No-op when already stopped.
    pub fn stop(&mut self) {
        if !self.running.swap(false, Ordering::AcqRel) {
            return;
        }
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                log::warn!("render_loop: loop thread panicked");
            }
        }
        if let Err(err) = lock(&self.state).sink.clear() {
            log::warn!("render_loop: failed to blank strip: {err}");
        }
        log::info!("render_loop: stopped");
    }

    /// Run one frame at `now` on the calling thread
    ///
    /// The loop thread calls this once per period; it is public so the loop
    /// can be stepped with a synthetic clock.
    pub fn tick(&self, now: Instant) {
        let interval_ms = self.interval_ms();
        lock(&self.state).step(now, interval_ms);
    }

    /// Wire in a new effect, initialized for this strip
    ///
    /// The previously wired effect is disposed unless it is the same object.
    pub fn set_effect(&self, effect: SharedEffect, params: Option<&EffectParams>) {
        let mut state = lock(&self.state);
        if let Some(previous) = state.effect.take() {
            if !Arc::ptr_eq(&previous, &effect) {
                lock(&previous).dispose();
            }
        }
        lock(&effect).init(self.led_count, params);
        state.effect = Some(effect);
        state.faulted = false;
    }

    /// Unwire the current effect without disposing it
    ///
    /// Returns once no tick holds the effect any more.
    pub fn detach_effect(&self) -> Option<SharedEffect> {
        lock(&self.state).effect.take()
    }

    /// Wire an effect that is already initialized for this strip
    pub fn attach_effect(&self, effect: SharedEffect) {
        let mut state = lock(&self.state);
        state.effect = Some(effect);
        state.faulted = false;
    }

    /// Unwire the current effect; the strip keeps its last frame
    pub fn clear_effect(&self) {
        if let Some(previous) = lock(&self.state).effect.take() {
            lock(&previous).dispose();
        }
    }

    pub fn set_power(&self, on: bool) {
        let mut state = lock(&self.state);
        state.power = on;
        if on {
            state.blanked = false;
        }
    }

    pub fn power(&self) -> bool {
        lock(&self.state).power
    }

    pub fn set_brightness(&self, brightness: u8) {
        lock(&self.state).sink.set_brightness(brightness);
    }

    pub fn brightness(&self) -> u8 {
        lock(&self.state).sink.brightness()
    }

    /// Frames counted in the last completed one-second window
    pub fn fps(&self) -> u32 {
        lock(&self.state).fps.fps()
    }

    /// Ticks since the last start
    pub fn frame_count(&self) -> u64 {
        lock(&self.state).frame
    }

    /// Whether the sink fell back to the mock driver
    pub fn is_mock(&self) -> bool {
        lock(&self.state).sink.is_mock()
    }

    /// Stop and release the output hardware
    pub fn shutdown(&mut self) {
        self.stop();
        lock(&self.state).sink.shutdown();
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
