//! Effect parameter model
//!
//! Each effect declares its knobs as a static [`ParamSchema`] list. Runtime
//! values arrive as a loosely typed [`EffectParams`] map (usually straight
//! from JSON) and are only ever read through the schema, so a value of the
//! wrong kind falls back to the declared default instead of failing.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};

use crate::color::RgbTuple;

/// Option of a `select` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Declared type of a parameter together with its default value
///
/// Numeric ranges and steps are hints for the UI; the engine does not clamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ParamKind {
    Number {
        default: f64,
        min: f64,
        max: f64,
        step: f64,
    },
    Boolean {
        default: bool,
    },
    Color {
        default: &'static [RgbTuple],
        /// Whether the parameter is a palette rather than a single color
        #[serde(rename = "multipleColors")]
        multiple: bool,
    },
    Select {
        default: &'static str,
        options: &'static [SelectOption],
    },
}

/// Declaration of a single configurable knob
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParamSchema {
    /// Unique name within the owning effect
    pub name: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    #[serde(flatten)]
    pub kind: ParamKind,
}

impl ParamSchema {
    pub const fn number(
        name: &'static str,
        label: &'static str,
        default: f64,
        min: f64,
        max: f64,
        step: f64,
    ) -> Self {
        Self {
            name,
            label,
            description: None,
            kind: ParamKind::Number {
                default,
                min,
                max,
                step,
            },
        }
    }

    pub const fn boolean(name: &'static str, label: &'static str, default: bool) -> Self {
        Self {
            name,
            label,
            description: None,
            kind: ParamKind::Boolean { default },
        }
    }

    pub const fn color(
        name: &'static str,
        label: &'static str,
        default: &'static [RgbTuple],
    ) -> Self {
        Self {
            name,
            label,
            description: None,
            kind: ParamKind::Color {
                default,
                multiple: false,
            },
        }
    }

    /// Color parameter accepting several colors
    pub const fn palette(
        name: &'static str,
        label: &'static str,
        default: &'static [RgbTuple],
    ) -> Self {
        Self {
            name,
            label,
            description: None,
            kind: ParamKind::Color {
                default,
                multiple: true,
            },
        }
    }

    pub const fn select(
        name: &'static str,
        label: &'static str,
        default: &'static str,
        options: &'static [SelectOption],
    ) -> Self {
        Self {
            name,
            label,
            description: None,
            kind: ParamKind::Select { default, options },
        }
    }

    #[must_use]
    pub const fn with_description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    /// Declared default as a runtime value
    pub fn default_value(&self) -> ParamValue {
        match self.kind {
            ParamKind::Number { default, .. } => ParamValue::Number(default),
            ParamKind::Boolean { default } => ParamValue::Boolean(default),
            ParamKind::Color { default, .. } => ParamValue::Colors(default.to_vec()),
            ParamKind::Select { default, .. } => ParamValue::Text(default.into()),
        }
    }
}

/// Find a parameter declaration by name
pub fn find_schema<'a>(schema: &'a [ParamSchema], name: &str) -> Option<&'a ParamSchema> {
    schema.iter().find(|param| param.name == name)
}

/// Dynamically typed parameter value
///
/// Anything that is not one of the known shapes is kept as [`ParamValue::Other`]
/// so that one malformed entry does not reject the whole parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Boolean(bool),
    Number(f64),
    Colors(Vec<RgbTuple>),
    Text(String),
    Other(serde_json::Value),
}

impl ParamValue {
    /// JSON `null`, treated as "not specified"
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Other(serde_json::Value::Null))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// Non-empty color list
    pub fn as_colors(&self) -> Option<&[RgbTuple]> {
        match self {
            Self::Colors(colors) if !colors.is_empty() => Some(colors),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<RgbTuple> for ParamValue {
    fn from(value: RgbTuple) -> Self {
        Self::Colors(vec![value])
    }
}

impl From<Vec<RgbTuple>> for ParamValue {
    fn from(value: Vec<RgbTuple>) -> Self {
        Self::Colors(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

/// Parameter name to value mapping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectParams(BTreeMap<String, ParamValue>);

impl EffectParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every declared parameter mapped to its default
    pub fn defaults(schema: &[ParamSchema]) -> Self {
        schema
            .iter()
            .map(|param| (param.name.to_owned(), param.default_value()))
            .collect()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        self.0.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        self.0.remove(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ParamValue> {
        self.0.iter()
    }

    /// Merge `other` on top of this set
    ///
    /// `null` values are skipped so they never erase a live value.
    pub fn overlay(&mut self, other: &EffectParams) {
        for (name, value) in other {
            if !value.is_null() {
                self.0.insert(name.clone(), value.clone());
            }
        }
    }

    /// Keep only the entries declared by `schema`
    #[must_use]
    pub fn sanitized(&self, schema: &[ParamSchema]) -> Self {
        self.iter()
            .filter(|(name, _)| find_schema(schema, name).is_some())
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

impl FromIterator<(String, ParamValue)> for EffectParams {
    fn from_iter<T: IntoIterator<Item = (String, ParamValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a EffectParams {
    type Item = (&'a String, &'a ParamValue);
    type IntoIter = btree_map::Iter<'a, String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
