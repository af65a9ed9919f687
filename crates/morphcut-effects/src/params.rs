//! Declarative parameter schema for effects.
//!
//! Each effect publishes an [`EffectDescriptor`]: an ordered list of
//! [`ParamSpec`]s describing its tunables. The factory resolves caller
//! input against the descriptor into an immutable [`ParamValues`] that is
//! reused unchanged for every frame of a job.

use morphcut_core::{MorphcutError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parameter kinds an effect may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Choice,
    Int,
    Float,
    Bool,
    Str,
}

/// A single validated parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl ParamValue {
    /// True if this value can satisfy a spec of the given kind.
    pub fn matches(&self, kind: ParamKind) -> bool {
        matches!(
            (self, kind),
            (ParamValue::Str(_), ParamKind::Choice)
                | (ParamValue::Str(_), ParamKind::Str)
                | (ParamValue::Int(_), ParamKind::Int)
                | (ParamValue::Float(_), ParamKind::Float)
                | (ParamValue::Int(_), ParamKind::Float)
                | (ParamValue::Bool(_), ParamKind::Bool)
        )
    }

    fn as_numeric(&self) -> Option<f64> {
        match self {
            ParamValue::Int(i) => Some(*i as f64),
            ParamValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

/// Declarative description of one effect tunable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
    pub default: ParamValue,
    /// Allowed values, `Choice` kind only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    pub description: String,
}

impl ParamSpec {
    pub fn choice(name: &str, default: &str, options: &[&str], description: &str) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Choice,
            default: ParamValue::Str(default.into()),
            options: options.iter().map(|s| s.to_string()).collect(),
            min: None,
            max: None,
            step: None,
            description: description.into(),
        }
    }

    pub fn int(name: &str, default: i64, min: i64, max: i64, description: &str) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Int,
            default: ParamValue::Int(default),
            options: Vec::new(),
            min: Some(min as f64),
            max: Some(max as f64),
            step: None,
            description: description.into(),
        }
    }

    pub fn float(name: &str, default: f64, min: f64, max: f64, description: &str) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Float,
            default: ParamValue::Float(default),
            options: Vec::new(),
            min: Some(min),
            max: Some(max),
            step: None,
            description: description.into(),
        }
    }

    pub fn float_stepped(
        name: &str,
        default: f64,
        min: f64,
        max: f64,
        step: f64,
        description: &str,
    ) -> Self {
        Self {
            step: Some(step),
            ..Self::float(name, default, min, max, description)
        }
    }

    pub fn boolean(name: &str, default: bool, description: &str) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Bool,
            default: ParamValue::Bool(default),
            options: Vec::new(),
            min: None,
            max: None,
            step: None,
            description: description.into(),
        }
    }

    pub fn string(name: &str, default: &str, description: &str) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Str,
            default: ParamValue::Str(default.into()),
            options: Vec::new(),
            min: None,
            max: None,
            step: None,
            description: description.into(),
        }
    }

    /// Check the spec's own invariants.
    pub fn validate(&self) -> Result<()> {
        match self.kind {
            ParamKind::Choice => {
                if self.options.is_empty() {
                    return Err(MorphcutError::Validation(format!(
                        "choice parameter '{}' has no options",
                        self.name
                    )));
                }
                match &self.default {
                    ParamValue::Str(d) if self.options.iter().any(|o| o == d) => {}
                    _ => {
                        return Err(MorphcutError::Validation(format!(
                            "default for choice parameter '{}' is not one of its options",
                            self.name
                        )));
                    }
                }
            }
            ParamKind::Int | ParamKind::Float => {
                if !self.default.matches(self.kind) {
                    return Err(MorphcutError::Validation(format!(
                        "default for numeric parameter '{}' has the wrong kind",
                        self.name
                    )));
                }
                let d = self.default.as_numeric().unwrap_or(0.0);
                if let (Some(min), Some(max)) = (self.min, self.max) {
                    if min > max {
                        return Err(MorphcutError::Validation(format!(
                            "parameter '{}' has min {} > max {}",
                            self.name, min, max
                        )));
                    }
                }
                if self.min.is_some_and(|min| d < min) || self.max.is_some_and(|max| d > max) {
                    return Err(MorphcutError::Validation(format!(
                        "default {} for parameter '{}' is outside its bounds",
                        d, self.name
                    )));
                }
            }
            ParamKind::Bool | ParamKind::Str => {
                if !self.default.matches(self.kind) {
                    return Err(MorphcutError::Validation(format!(
                        "default for parameter '{}' has the wrong kind",
                        self.name
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Name plus ordered parameter schema of one registered effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectDescriptor {
    pub name: String,
    pub params: Vec<ParamSpec>,
}

impl EffectDescriptor {
    pub fn new(name: &str, params: Vec<ParamSpec>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    /// Find the spec for a parameter name.
    pub fn find(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Check every spec invariant plus parameter name uniqueness.
    pub fn validate(&self) -> Result<()> {
        for (i, spec) in self.params.iter().enumerate() {
            spec.validate()?;
            if self.params[..i].iter().any(|p| p.name == spec.name) {
                return Err(MorphcutError::Validation(format!(
                    "effect '{}' declares parameter '{}' twice",
                    self.name, spec.name
                )));
            }
        }
        Ok(())
    }
}

/// Validated name→value mapping produced by the factory.
///
/// Every key of the descriptor's schema is present. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamValues(BTreeMap<String, ParamValue>);

impl ParamValues {
    pub(crate) fn from_map(map: BTreeMap<String, ParamValue>) -> Self {
        Self(map)
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// String value of a `Str` or `Choice` parameter.
    pub fn str(&self, name: &str) -> Result<&str> {
        match self.get(name) {
            Some(ParamValue::Str(s)) => Ok(s),
            other => Err(missing(name, other)),
        }
    }

    pub fn i64(&self, name: &str) -> Result<i64> {
        match self.get(name) {
            Some(ParamValue::Int(i)) => Ok(*i),
            other => Err(missing(name, other)),
        }
    }

    /// Numeric value; accepts both `Int` and `Float` parameters.
    pub fn f64(&self, name: &str) -> Result<f64> {
        match self.get(name) {
            Some(ParamValue::Float(f)) => Ok(*f),
            Some(ParamValue::Int(i)) => Ok(*i as f64),
            other => Err(missing(name, other)),
        }
    }

    pub fn bool(&self, name: &str) -> Result<bool> {
        match self.get(name) {
            Some(ParamValue::Bool(b)) => Ok(*b),
            other => Err(missing(name, other)),
        }
    }
}

fn missing(name: &str, got: Option<&ParamValue>) -> MorphcutError {
    match got {
        None => MorphcutError::Internal(format!("parameter '{name}' missing from values")),
        Some(v) => MorphcutError::Internal(format!("parameter '{name}' has unexpected value {v:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_spec_requires_default_in_options() {
        let ok = ParamSpec::choice("mode", "a", &["a", "b"], "");
        assert!(ok.validate().is_ok());

        let bad = ParamSpec::choice("mode", "c", &["a", "b"], "");
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_numeric_spec_default_within_bounds() {
        assert!(ParamSpec::int("n", 5, 0, 10, "").validate().is_ok());
        assert!(ParamSpec::int("n", 50, 0, 10, "").validate().is_err());
        assert!(ParamSpec::float("f", 0.5, 0.0, 1.0, "").validate().is_ok());
        assert!(ParamSpec::float("f", -0.1, 0.0, 1.0, "").validate().is_err());
    }

    #[test]
    fn test_descriptor_rejects_duplicate_params() {
        let desc = EffectDescriptor::new(
            "x",
            vec![
                ParamSpec::int("n", 1, 0, 10, ""),
                ParamSpec::int("n", 2, 0, 10, ""),
            ],
        );
        assert!(desc.validate().is_err());
    }

    #[test]
    fn test_value_accessors() {
        let mut map = BTreeMap::new();
        map.insert("mode".to_string(), ParamValue::Str("swirl".into()));
        map.insert("count".to_string(), ParamValue::Int(7));
        map.insert("strength".to_string(), ParamValue::Float(1.5));
        map.insert("enabled".to_string(), ParamValue::Bool(true));
        let values = ParamValues::from_map(map);

        assert_eq!(values.str("mode").unwrap(), "swirl");
        assert_eq!(values.i64("count").unwrap(), 7);
        assert_eq!(values.f64("strength").unwrap(), 1.5);
        assert_eq!(values.f64("count").unwrap(), 7.0);
        assert!(values.bool("enabled").unwrap());
        assert!(values.str("absent").is_err());
    }
}
