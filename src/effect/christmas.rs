//! Christmas lights effect
//!
//! Groups of LEDs in festive colors blink alternately: on every blink the
//! lit and dark groups swap and the lit ones get new random colors.

use super::{Effect, EffectCore, EffectInfo};
use crate::{
    color::{BLACK, Rgb},
    param::ParamSchema,
};

const PALETTE: [Rgb; 5] = [
    Rgb::new(255, 255, 255),
    Rgb::new(255, 20, 10),
    Rgb::new(255, 0, 0),
    Rgb::new(0, 255, 0),
    Rgb::new(10, 255, 10),
];

const PARAMS: &[ParamSchema] = &[
    ParamSchema::number("speed", "Speed", 2.0, 0.5, 10.0, 0.5)
        .with_description("Blinks per second"),
    ParamSchema::number("groupSize", "Group Size", 5.0, 1.0, 20.0, 1.0)
        .with_description("LEDs per color group"),
];

const INFO: EffectInfo = EffectInfo::new_static(
    "christmas",
    "Christmas",
    "Festive alternating blinking lights",
    PARAMS,
);

#[derive(Debug, Clone)]
pub struct ChristmasEffect {
    core: EffectCore,
    elapsed_ms: f64,
    /// Even groups are lit when set, odd groups otherwise
    invert: bool,
    group_colors: Vec<Rgb>,
    seed: u64,
    rng: fastrand::Rng,
}

impl Default for ChristmasEffect {
    fn default() -> Self {
        Self::with_seed(fastrand::u64(..))
    }
}

impl ChristmasEffect {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            core: EffectCore::new(PARAMS),
            elapsed_ms: 0.0,
            invert: false,
            group_colors: Vec::new(),
            seed,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn group_size(&self) -> usize {
        libm::round(self.core.number("groupSize")).max(1.0) as usize
    }

    fn regenerate_colors(&mut self) {
        let count = self.core.led_count().div_ceil(self.group_size());
        self.group_colors.clear();
        for _ in 0..count {
            let pick = self.rng.usize(..PALETTE.len());
            self.group_colors.push(PALETTE[pick]);
        }
    }
}

impl Effect for ChristmasEffect {
    fn info(&self) -> EffectInfo {
        INFO
    }

    fn core(&self) -> &EffectCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EffectCore {
        &mut self.core
    }

    fn reset(&mut self) {
        self.elapsed_ms = 0.0;
        self.invert = false;
        self.rng.seed(self.seed);
        self.regenerate_colors();
    }

    fn render(&mut self, _frame: u64, delta_ms: f64) {
        let interval_ms = 1000.0 / self.core.number("speed").max(f64::EPSILON);
        let group_size = self.group_size();

        self.elapsed_ms += delta_ms;
        if self.elapsed_ms >= interval_ms {
            self.elapsed_ms -= interval_ms;
            if self.elapsed_ms >= interval_ms {
                self.elapsed_ms = 0.0;
            }
            self.invert = !self.invert;
            self.regenerate_colors();
        }

        // groupSize may have changed since the colors were picked
        if self.group_colors.len() < self.core.led_count().div_ceil(group_size) {
            self.regenerate_colors();
        }

        let lit_parity = usize::from(!self.invert);
        let group_colors = &self.group_colors;
        for (i, led) in self.core.pixels_mut().iter_mut().enumerate() {
            let group = i / group_size;
            *led = if group % 2 == lit_parity {
                group_colors[group]
            } else {
                BLACK
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::EffectParams;

    fn lit_groups(pixels: &[Rgb], group_size: usize) -> Vec<usize> {
        pixels
            .chunks(group_size)
            .enumerate()
            .filter(|(_, group)| group.iter().all(|p| *p != BLACK))
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_alternating_groups_swap_on_blink() {
        let mut effect = ChristmasEffect::with_seed(9);
        let params = EffectParams::new().with("groupSize", 2.0);
        effect.init(8, Some(&params));

        let first = effect.tick(0, 10.0).to_vec();
        assert_eq!(lit_groups(&first, 2), vec![1, 3]);

        let second = effect.tick(1, 500.0).to_vec();
        assert_eq!(lit_groups(&second, 2), vec![0, 2]);
    }

    #[test]
    fn test_lit_colors_come_from_palette() {
        let mut effect = ChristmasEffect::with_seed(5);
        effect.init(50, None);

        for frame in 0..20 {
            let pixels = effect.tick(frame, 250.0);
            assert!(pixels.iter().all(|p| *p == BLACK || PALETTE.contains(p)));
        }
    }
}
