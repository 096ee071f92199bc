mod tests {
    use std::collections::HashSet;
    use std::f64::consts::FRAC_PI_2;

    use myrtio_strip_engine::{
        BLACK, BUILTIN_EFFECTS, Effect, EffectParams, Rgb,
        effect::{BreathingEffect, CometEffect, FireEffect, SolidEffect, StrobeEffect},
    };
    use rstest::rstest;

    const DELTA_MS: f64 = 1000.0 / 30.0;

    fn builtin(index: usize) -> Box<dyn Effect> {
        BUILTIN_EFFECTS[index]()
    }

    fn run(effect: &mut dyn Effect, frames: u64) -> Vec<Vec<Rgb>> {
        (1..=frames)
            .map(|frame| effect.tick(frame, DELTA_MS).to_vec())
            .collect()
    }

    #[rstest]
    fn test_frame_length_matches_strip(
        #[values(0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11)] index: usize,
        #[values(1, 2, 7, 60, 202)] led_count: usize,
    ) {
        let mut effect = builtin(index);
        effect.init(led_count, None);
        for frame in run(effect.as_mut(), 120) {
            assert_eq!(frame.len(), led_count);
        }
    }

    #[rstest]
    fn test_reinit_restarts_sequence(
        #[values(0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11)] index: usize,
    ) {
        let mut effect = builtin(index);
        effect.init(24, None);
        let first = run(effect.as_mut(), 40);

        effect.init(24, None);
        effect.init(24, None);
        let second = run(effect.as_mut(), 40);

        assert_eq!(first, second, "{}", effect.info().name);
    }

    #[rstest]
    #[case("solid")]
    #[case("rainbow")]
    #[case("breathing")]
    #[case("color-wipe")]
    #[case("strobe")]
    #[case("plasma")]
    #[case("comet")]
    #[case("aurora")]
    fn test_deterministic_without_randomness(#[case] name: &str) {
        let make = || {
            BUILTIN_EFFECTS
                .iter()
                .map(|factory| factory())
                .find(|effect| effect.info().name == name)
                .unwrap()
        };
        let params = EffectParams::new().with("speed", 1.5);

        let mut a = make();
        let mut b = make();
        a.init(33, Some(&params));
        b.init(33, Some(&params));

        assert_eq!(run(a.as_mut(), 90), run(b.as_mut(), 90));
    }

    #[test]
    fn test_seeded_effects_are_reproducible() {
        let mut a = FireEffect::with_seed(99);
        let mut b = FireEffect::with_seed(99);
        a.init(40, None);
        b.init(40, None);
        assert_eq!(run(&mut a, 60), run(&mut b, 60));
    }

    #[test]
    fn test_builtin_metadata() {
        let mut names = HashSet::new();
        for factory in BUILTIN_EFFECTS {
            let info = factory().info();
            assert!(!info.name.is_empty());
            assert!(names.insert(info.name.clone()), "duplicate {}", info.name);

            let mut params = HashSet::new();
            for param in info.params.iter() {
                assert!(params.insert(param.name), "{}: duplicate {}", info.name, param.name);
            }
        }
        assert_eq!(names.len(), 12);
    }

    #[test]
    fn test_fire_sparks_only_at_base() {
        let mut fire = FireEffect::default();
        let params = EffectParams::new().with("cooling", 55.0).with("sparking", 120.0);
        fire.init(50, Some(&params));
        assert!(fire.heat().iter().all(|h| *h == 0.0));

        fire.tick(1, DELTA_MS);
        for (i, heat) in fire.heat().iter().enumerate() {
            assert!(*heat <= 255.0);
            if i > 6 {
                assert_eq!(*heat, 0.0, "cell {i} heated");
            }
        }

        fire.init(50, Some(&params));
        assert!(fire.heat().iter().all(|h| *h == 0.0));
    }

    #[test]
    fn test_breathing_init_resets_phase() {
        let mut breathing = BreathingEffect::new();
        breathing.init(10, None);
        run(&mut breathing, 25);
        assert!(breathing.phase() > 0.0);

        breathing.init(10, None);
        assert_eq!(breathing.phase(), 0.0);
        breathing.init(10, None);
        assert_eq!(breathing.phase(), 0.0);
    }

    #[test]
    fn test_breathing_brightness_curve() {
        let close = |a: f64, b: f64| (a - b).abs() < 1e-9;
        assert!(close(BreathingEffect::brightness_at(0.0, 0.1), 0.55));
        assert!(close(BreathingEffect::brightness_at(FRAC_PI_2, 0.1), 1.0));
        assert!(close(BreathingEffect::brightness_at(-FRAC_PI_2, 0.1), 0.1));
    }

    #[test]
    fn test_breathing_scales_channels_once() {
        let mut breathing = BreathingEffect::new();
        let params = EffectParams::new()
            .with("color", [61u8, 101, 0])
            .with("speed", 0.0)
            .with("minBrightness", 10.0);
        breathing.init(2, Some(&params));

        // 0.55 * 61 = 33.55 and 0.55 * 101 = 55.55
        assert_eq!(breathing.tick(1, 33.3), &[Rgb::new(34, 56, 0); 2]);
    }

    #[test]
    fn test_comet_bounce_scenario() {
        let mut comet = CometEffect::new();
        let params = EffectParams::new()
            .with("tailLength", 5.0)
            .with("bounce", true)
            .with("speed", 2.0);
        comet.init(10, Some(&params));
        comet.set_head(9.0, 1.0);

        comet.tick(1, DELTA_MS);
        assert_eq!(comet.position(), 9.0);
        assert_eq!(comet.direction(), -1.0);
    }

    #[test]
    fn test_solid_takes_shared_color() {
        let mut solid = SolidEffect::new();
        solid.init(3, None);
        assert_eq!(solid.tick(1, DELTA_MS), &[Rgb::new(255, 0, 100); 3]);

        solid.set_color(Rgb::new(0, 10, 20));
        assert_eq!(solid.tick(2, DELTA_MS), &[Rgb::new(0, 10, 20); 3]);

        solid.set_params(&EffectParams::new().with("color", vec![[1u8, 2, 3]]));
        assert_eq!(solid.tick(3, DELTA_MS), &[Rgb::new(1, 2, 3); 3]);
    }

    #[test]
    fn test_strobe_duty_cycle() {
        let mut strobe = StrobeEffect::new();
        let params = EffectParams::new().with("frequency", 5.0).with("dutyCycle", 50.0);
        strobe.init(2, Some(&params));

        assert_eq!(strobe.tick(1, 50.0), &[Rgb::new(255, 0, 100); 2]);
        assert_eq!(strobe.tick(2, 50.0), &[BLACK; 2]);
        assert_eq!(strobe.tick(3, 100.0), &[Rgb::new(255, 0, 100); 2]);
    }

    #[rstest]
    #[case::wrong_types(serde_json::json!({
        "speed": "fast",
        "color": "red",
        "backgroundColor": [[1]],
        "tailLength": null,
        "groupSize": -4,
        "spacing": 0,
        "size": 1e9,
        "complexity": 0,
    }))]
    #[case::huge_numbers(serde_json::json!({
        "spacing": 1e300,
        "step": 1e300,
        "groupSize": 1e300,
        "tailLength": 1e300,
        "size": 1e300,
        "spawnRate": 1e300,
        "complexity": 1e300,
    }))]
    fn test_malformed_params_never_fail(#[case] junk: serde_json::Value) {
        let junk: EffectParams = serde_json::from_value(junk).unwrap();

        for factory in BUILTIN_EFFECTS {
            let mut effect = factory();
            effect.init(16, Some(&junk));
            for frame in run(effect.as_mut(), 30) {
                assert_eq!(frame.len(), 16);
            }
        }
    }
}
