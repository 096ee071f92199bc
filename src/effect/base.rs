use crate::color::{BLACK, Rgb, RgbTuple, rgb_from_tuple, rgb_to_tuple};
use crate::param::{EffectParams, ParamKind, ParamSchema, ParamValue, find_schema};

/// Name of the parameter that receives the shared base color
const PRIMARY_COLOR_PARAM: &str = "color";

/// State common to every effect: size, live parameters and pixel buffer
///
/// Parameter readers never fail. A missing value or a value of the wrong
/// kind reads as the schema default.
#[derive(Debug, Clone)]
pub struct EffectCore {
    schema: &'static [ParamSchema],
    led_count: usize,
    params: EffectParams,
    pixels: Vec<Rgb>,
}

impl EffectCore {
    pub fn new(schema: &'static [ParamSchema]) -> Self {
        Self {
            schema,
            led_count: 0,
            params: EffectParams::defaults(schema),
            pixels: Vec::new(),
        }
    }

    /// Resize the buffer to `led_count` black pixels and reload parameters
    pub fn init(&mut self, led_count: usize, params: Option<&EffectParams>) {
        self.led_count = led_count;
        self.pixels.clear();
        self.pixels.resize(led_count, BLACK);

        self.params = EffectParams::defaults(self.schema);
        if let Some(params) = params {
            self.params.overlay(params);
        }
    }

    pub fn overlay(&mut self, params: &EffectParams) {
        self.params.overlay(params);
    }

    /// Replace the first entry of the `color` parameter, keeping the rest of
    /// a palette. No-op for effects without that parameter.
    pub fn set_primary_color(&mut self, color: Rgb) {
        if find_schema(self.schema, PRIMARY_COLOR_PARAM).is_none() {
            return;
        }
        let mut colors = self.colors(PRIMARY_COLOR_PARAM).to_vec();
        match colors.first_mut() {
            Some(first) => *first = rgb_to_tuple(color),
            None => colors.push(rgb_to_tuple(color)),
        }
        self.params.insert(PRIMARY_COLOR_PARAM, colors);
    }

    pub const fn schema(&self) -> &'static [ParamSchema] {
        self.schema
    }

    pub const fn led_count(&self) -> usize {
        self.led_count
    }

    pub const fn params(&self) -> &EffectParams {
        &self.params
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgb] {
        &mut self.pixels
    }

    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    fn kind(&self, name: &str) -> Option<ParamKind> {
        find_schema(self.schema, name).map(|param| param.kind)
    }

    pub fn number(&self, name: &str) -> f64 {
        if let Some(value) = self.params.get(name).and_then(ParamValue::as_number) {
            if value.is_finite() {
                return value;
            }
        }
        match self.kind(name) {
            Some(ParamKind::Number { default, .. }) => default,
            _ => 0.0,
        }
    }

    pub fn boolean(&self, name: &str) -> bool {
        if let Some(value) = self.params.get(name).and_then(ParamValue::as_bool) {
            return value;
        }
        match self.kind(name) {
            Some(ParamKind::Boolean { default }) => default,
            _ => false,
        }
    }

    /// Non-empty palette, or the declared default palette
    pub fn colors(&self, name: &str) -> &[RgbTuple] {
        if let Some(colors) = self.params.get(name).and_then(ParamValue::as_colors) {
            return colors;
        }
        match self.kind(name) {
            Some(ParamKind::Color { default, .. }) => default,
            _ => &[],
        }
    }

    /// First color of a color parameter
    pub fn color(&self, name: &str) -> Rgb {
        self.colors(name)
            .first()
            .copied()
            .map(rgb_from_tuple)
            .unwrap_or(BLACK)
    }

    pub fn text(&self, name: &str) -> &str {
        if let Some(text) = self.params.get(name).and_then(ParamValue::as_text) {
            return text;
        }
        match self.kind(name) {
            Some(ParamKind::Select { default, .. }) => default,
            _ => "",
        }
    }
}
