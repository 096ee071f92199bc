//! Control surface of the strip engine
//!
//! [`Engine`] ties the effect manager to the render loop. Anything that
//! drives the strip from outside (HTTP handlers, the daemon's startup path)
//! goes through it.

use crate::{
    color::Rgb,
    effect::EffectInfo,
    error::{LoadError, Result},
    manager::{EffectLoader, EffectManager, EffectWithSource},
    output::OutputSink,
    param::EffectParams,
    render_loop::RenderLoop,
    state::{DEFAULT_EFFECT, LedState},
};

pub struct Engine {
    manager: EffectManager,
    render_loop: RenderLoop,
}

impl Engine {
    pub fn new(sink: OutputSink, target_fps: u32) -> Self {
        let led_count = sink.led_count();
        Self {
            manager: EffectManager::new(led_count),
            render_loop: RenderLoop::new(sink, target_fps),
        }
    }

    pub const fn manager(&self) -> &EffectManager {
        &self.manager
    }

    pub const fn render_loop(&self) -> &RenderLoop {
        &self.render_loop
    }

    pub fn list_effects(&self) -> Vec<EffectInfo> {
        self.manager.list_effects()
    }

    pub fn effects_with_source(&self) -> Vec<EffectWithSource> {
        self.manager.effects_with_source()
    }

    /// Activate an effect and wire it into the render loop
    ///
    /// The loop lets go of the outgoing effect before the manager disposes
    /// it, and skips frames until the new one is initialized.
    pub fn set_effect(&mut self, name: &str, params: Option<&EffectParams>) -> bool {
        let Some(next) = self.manager.get_effect(name) else {
            log::warn!("engine: unknown effect {name}");
            return false;
        };

        let previous = self.render_loop.detach_effect();
        if !self.manager.set_effect(name, params) {
            if let Some(previous) = previous {
                self.render_loop.attach_effect(previous);
            }
            return false;
        }
        self.render_loop.attach_effect(next);
        true
    }

    pub fn set_params(&self, params: &EffectParams) {
        self.manager.set_params(params);
    }

    pub fn sanitize_params(&self, name: &str, params: &EffectParams) -> EffectParams {
        self.manager.sanitize_params(name, params)
    }

    pub fn default_params(&self, name: &str) -> EffectParams {
        self.manager.default_params(name)
    }

    pub fn current_name(&self) -> String {
        self.manager.current_name()
    }

    pub fn set_power(&self, on: bool) {
        self.render_loop.set_power(on);
    }

    pub fn set_brightness(&self, brightness: u8) {
        self.render_loop.set_brightness(brightness);
    }

    pub fn set_color(&mut self, color: impl Into<Rgb>) {
        self.manager.set_color(color.into());
    }

    pub fn fps(&self) -> u32 {
        self.render_loop.fps()
    }

    pub fn start(&mut self) -> Result<()> {
        self.render_loop.start()
    }

    pub fn stop(&mut self) {
        self.render_loop.stop();
    }

    /// Stop the loop and release the output hardware
    pub fn shutdown(&mut self) {
        self.render_loop.shutdown();
    }

    pub fn install_effect(
        &mut self,
        source: &str,
        loader: &dyn EffectLoader,
    ) -> Result<EffectWithSource, LoadError> {
        self.manager.install(source, loader)
    }

    /// Bring the strip in line with a persisted state
    ///
    /// An unknown effect falls back to the default one. The state color is
    /// applied unless the effect parameters carry their own `color`.
    pub fn apply_state(&mut self, state: &LedState) {
        self.set_brightness(state.brightness);

        if !self.set_effect(&state.effect, Some(&state.effect_params)) {
            log::warn!(
                "engine: saved effect {} not found, falling back to {DEFAULT_EFFECT}",
                state.effect
            );
            self.set_effect(DEFAULT_EFFECT, None);
        }
        if !state.effect_params.contains("color") {
            self.set_color(state.color);
        }

        self.set_power(state.power);
    }
}
