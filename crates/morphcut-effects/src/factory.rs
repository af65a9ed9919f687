//! Factory resolving an effect name plus raw parameters into a validated,
//! ready-to-run effect instance.
//!
//! Raw values arrive as a JSON object. For every spec in the descriptor the
//! caller value (or the spec default) is coerced to the declared kind;
//! coercion failures, unknown choice values and out-of-range numbers are
//! `Validation` errors detected before any frame is rendered. Unknown keys
//! are ignored for forward compatibility, with a warning.

use crate::params::{ParamKind, ParamSpec, ParamValue, ParamValues};
use crate::registry::Registry;
use crate::transition::Transition;
use morphcut_core::{MorphcutError, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Builder for validated effect instances.
pub struct Factory;

impl Factory {
    /// Resolve `name` and `raw` into an effect plus its validated values.
    pub fn build(
        registry: &Registry,
        name: &str,
        raw: &Map<String, Value>,
    ) -> Result<(Arc<dyn Transition>, ParamValues)> {
        let (descriptor, effect) = registry.lookup(name)?;

        for key in raw.keys() {
            if descriptor.find(key).is_none() {
                tracing::warn!(effect = name, parameter = %key, "ignoring unknown parameter");
            }
        }

        let mut values = BTreeMap::new();
        for spec in &descriptor.params {
            let value = match raw.get(&spec.name) {
                Some(raw_value) => coerce(name, spec, raw_value)?,
                None => spec.default.clone(),
            };
            check_constraints(name, spec, &value)?;
            values.insert(spec.name.clone(), value);
        }

        Ok((effect, ParamValues::from_map(values)))
    }
}

/// Coerce a raw JSON value to the spec's declared kind.
fn coerce(effect: &str, spec: &ParamSpec, raw: &Value) -> Result<ParamValue> {
    let fail = |detail: &str| {
        MorphcutError::Validation(format!(
            "{effect}.{}: expected {:?}, {detail}",
            spec.name, spec.kind
        ))
    };

    match spec.kind {
        ParamKind::Choice | ParamKind::Str => match raw {
            Value::String(s) => Ok(ParamValue::Str(s.clone())),
            other => Err(fail(&format!("got {other}"))),
        },
        ParamKind::Int => match raw {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(ParamValue::Int(i))
                } else {
                    Err(fail(&format!("got non-integer number {n}")))
                }
            }
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(ParamValue::Int)
                .map_err(|_| fail(&format!("could not parse '{s}' as an integer"))),
            other => Err(fail(&format!("got {other}"))),
        },
        ParamKind::Float => match raw {
            Value::Number(n) => n
                .as_f64()
                .map(ParamValue::Float)
                .ok_or_else(|| fail(&format!("got unrepresentable number {n}"))),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map(ParamValue::Float)
                .map_err(|_| fail(&format!("could not parse '{s}' as a number"))),
            other => Err(fail(&format!("got {other}"))),
        },
        ParamKind::Bool => match raw {
            Value::Bool(b) => Ok(ParamValue::Bool(*b)),
            Value::String(s) => match s.trim() {
                "true" => Ok(ParamValue::Bool(true)),
                "false" => Ok(ParamValue::Bool(false)),
                _ => Err(fail(&format!("could not parse '{s}' as a boolean"))),
            },
            other => Err(fail(&format!("got {other}"))),
        },
    }
}

/// Enforce choice membership and numeric bounds. Out-of-range values are
/// rejected rather than clamped so caller mistakes stay visible.
fn check_constraints(effect: &str, spec: &ParamSpec, value: &ParamValue) -> Result<()> {
    match (spec.kind, value) {
        (ParamKind::Choice, ParamValue::Str(s)) => {
            if !spec.options.iter().any(|o| o == s) {
                return Err(MorphcutError::Validation(format!(
                    "{effect}.{}: '{s}' is not one of {:?}",
                    spec.name, spec.options
                )));
            }
        }
        (ParamKind::Int, ParamValue::Int(i)) => {
            let v = *i as f64;
            if spec.min.is_some_and(|min| v < min) || spec.max.is_some_and(|max| v > max) {
                return Err(out_of_range(effect, spec, v));
            }
        }
        (ParamKind::Float, ParamValue::Float(f)) => {
            if !f.is_finite() {
                return Err(MorphcutError::Validation(format!(
                    "{effect}.{}: value must be finite",
                    spec.name
                )));
            }
            if spec.min.is_some_and(|min| *f < min) || spec.max.is_some_and(|max| *f > max) {
                return Err(out_of_range(effect, spec, *f));
            }
        }
        (ParamKind::Float, ParamValue::Int(i)) => {
            let v = *i as f64;
            if spec.min.is_some_and(|min| v < min) || spec.max.is_some_and(|max| v > max) {
                return Err(out_of_range(effect, spec, v));
            }
        }
        _ => {}
    }
    Ok(())
}

fn out_of_range(effect: &str, spec: &ParamSpec, value: f64) -> MorphcutError {
    MorphcutError::Validation(format!(
        "{effect}.{}: {value} is outside [{}, {}]",
        spec.name,
        spec.min.map_or("-inf".into(), |m| m.to_string()),
        spec.max.map_or("inf".into(), |m| m.to_string()),
    ))
}
