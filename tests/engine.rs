mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use myrtio_strip_engine::{
        BLACK, ColorOrder, Effect, EffectCore, EffectInfo, EffectLoader, EffectParams, Engine,
        Instant, LedState, LoadError, OutputDriver, OutputError, OutputSink, Rgb, RgbColor,
        StripConfig,
    };

    type Frames = Arc<Mutex<Vec<Vec<Rgb>>>>;

    struct Recorder(Frames);

    impl OutputDriver for Recorder {
        fn write(&mut self, colors: &[Rgb]) -> Result<(), OutputError> {
            self.0.lock().unwrap().push(colors.to_vec());
            Ok(())
        }
    }

    /// Effect holding a resource that `dispose` releases
    struct Leased {
        core: EffectCore,
        released: Arc<AtomicBool>,
    }

    impl Effect for Leased {
        fn info(&self) -> EffectInfo {
            EffectInfo::new_static("leased", "Leased", "Releases on dispose", &[])
        }

        fn core(&self) -> &EffectCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut EffectCore {
            &mut self.core
        }

        fn reset(&mut self) {
            self.released.store(false, Ordering::SeqCst);
        }

        fn render(&mut self, _frame: u64, _delta_ms: f64) {
            assert!(!self.released.load(Ordering::SeqCst), "ticked after dispose");
            self.core.fill(Rgb::new(3, 3, 3));
        }

        fn dispose(&mut self) {
            self.released.store(true, Ordering::SeqCst);
        }
    }

    #[derive(Default)]
    struct LeasedLoader {
        released: Arc<AtomicBool>,
    }

    impl EffectLoader for LeasedLoader {
        fn load(&self, _source: &str) -> Result<Box<dyn Effect>, LoadError> {
            Ok(Box::new(Leased {
                core: EffectCore::new(&[]),
                released: Arc::clone(&self.released),
            }))
        }
    }

    fn engine(led_count: usize) -> (Engine, Frames) {
        let frames = Frames::default();
        let config = StripConfig {
            led_count,
            color_order: ColorOrder::Rgb,
            ..StripConfig::default()
        };
        let sink = OutputSink::new(&config, Box::new(Recorder(Arc::clone(&frames))));
        (Engine::new(sink, 30), frames)
    }

    fn last_frame(engine: &Engine, frames: &Frames) -> Vec<Rgb> {
        engine.render_loop().tick(Instant::from_micros(0));
        frames.lock().unwrap().last().cloned().unwrap_or_default()
    }

    #[test]
    fn test_set_effect_wires_render_loop() {
        let (mut engine, frames) = engine(3);
        assert_eq!(engine.current_name(), "none");
        assert!(!engine.set_effect("nonexistent", None));

        let params = EffectParams::new().with("color", [0u8, 50, 0]).with("bogus", 1.0);
        assert!(engine.set_effect("solid", Some(&params)));
        assert_eq!(engine.current_name(), "solid");
        assert_eq!(last_frame(&engine, &frames), [Rgb::new(0, 50, 0); 3]);

        engine.set_color(Rgb::new(7, 0, 0));
        assert_eq!(last_frame(&engine, &frames), [Rgb::new(7, 0, 0); 3]);

        engine.set_params(&EffectParams::new().with("color", [1u8, 1, 1]));
        assert_eq!(last_frame(&engine, &frames), [Rgb::new(1, 1, 1); 3]);
    }

    #[test]
    fn test_base_color_carries_across_switch() {
        let (mut engine, frames) = engine(2);
        engine.set_effect("comet", None);
        engine.set_color(Rgb::new(0, 0, 255));
        engine.set_effect("solid", None);

        assert_eq!(last_frame(&engine, &frames), [Rgb::new(0, 0, 255); 2]);
    }

    #[test]
    fn test_switch_releases_outgoing_effect() {
        let (mut engine, frames) = engine(2);
        let loader = LeasedLoader::default();
        engine.install_effect("leased", &loader).unwrap();

        assert!(engine.set_effect("leased", None));
        assert_eq!(last_frame(&engine, &frames), [Rgb::new(3, 3, 3); 2]);

        assert!(engine.set_effect("solid", None));
        assert!(loader.released.load(Ordering::SeqCst));
        assert_eq!(last_frame(&engine, &frames), [Rgb::new(255, 0, 100); 2]);

        let leased = engine.manager().get_effect("leased").unwrap();
        assert_eq!(Arc::strong_count(&leased), 2);
    }

    #[test]
    fn test_unknown_effect_keeps_loop_wired() {
        let (mut engine, frames) = engine(2);
        engine.set_effect("solid", Some(&EffectParams::new().with("color", [5u8, 5, 5])));
        assert!(!engine.set_effect("nonexistent", None));
        assert_eq!(last_frame(&engine, &frames), [Rgb::new(5, 5, 5); 2]);
    }

    #[test]
    fn test_apply_state_uses_state_color() {
        let (mut engine, frames) = engine(2);
        let state = LedState {
            power: true,
            brightness: 255,
            color: RgbColor::new(10, 20, 30),
            ..LedState::default()
        };
        engine.apply_state(&state);

        assert_eq!(engine.current_name(), "solid");
        assert_eq!(last_frame(&engine, &frames), [Rgb::new(10, 20, 30); 2]);
    }

    #[test]
    fn test_apply_state_prefers_param_color() {
        let (mut engine, frames) = engine(2);
        let state = LedState {
            power: true,
            color: RgbColor::new(10, 20, 30),
            effect_params: EffectParams::new().with("color", [90u8, 0, 0]),
            ..LedState::default()
        };
        engine.apply_state(&state);
        assert_eq!(last_frame(&engine, &frames), [Rgb::new(90, 0, 0); 2]);
    }

    #[test]
    fn test_apply_state_unknown_effect_falls_back() {
        let (mut engine, frames) = engine(2);
        let state = LedState {
            power: false,
            effect: "vanished".into(),
            ..LedState::default()
        };
        engine.apply_state(&state);

        assert_eq!(engine.current_name(), "solid");
        assert!(!engine.render_loop().power());
        assert_eq!(last_frame(&engine, &frames), [BLACK; 2]);
    }

    #[test]
    fn test_listing_and_defaults() {
        let (engine, _frames) = engine(2);
        assert_eq!(engine.list_effects().len(), 12);
        assert_eq!(engine.effects_with_source().len(), 12);
        assert_eq!(engine.default_params("strobe").len(), 4);
        assert!(
            engine
                .sanitize_params("strobe", &EffectParams::new().with("tailLength", 3.0))
                .is_empty()
        );
        assert_eq!(engine.fps(), 0);
    }
}
