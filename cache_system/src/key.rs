//! Cache key derivation
//!
//! Keys follow a versioned schema:
//!
//! ```text
//! {prefix}:v{KEY_SCHEMA_VERSION}:{operation}:{positional}:{named}
//! ```
//!
//! `positional` is a JSON array in call order. `named` is a JSON object whose
//! members are sorted by name, so the order in which named arguments were
//! supplied never changes the key. Nested maps inside argument values are
//! sorted the same way.

use crate::errors::CacheError;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Bump when the rendering below changes; old entries then simply miss.
pub const KEY_SCHEMA_VERSION: u32 = 1;

/// A fully derived cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Collects the arguments of one call.
///
/// Serialization failures are remembered and reported by
/// [`KeyDeriver::derive`], so argument chains stay fluent.
#[derive(Debug, Default)]
pub struct KeyArgs {
    positional: Vec<Value>,
    named: BTreeMap<String, Value>,
    error: Option<serde_json::Error>,
}

impl KeyArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument
    pub fn arg<T>(mut self, value: &T) -> Self
    where
        T: Serialize + ?Sized,
    {
        match serde_json::to_value(value) {
            Ok(value) => self.positional.push(canonicalize(value)),
            Err(e) => self.remember(e),
        }
        self
    }

    /// Set a named argument; a repeated name replaces the earlier value
    pub fn named<T>(mut self, name: &str, value: &T) -> Self
    where
        T: Serialize + ?Sized,
    {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.named.insert(name.to_string(), canonicalize(value));
            }
            Err(e) => self.remember(e),
        }
        self
    }

    fn remember(&mut self, err: serde_json::Error) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}

/// Sort object members recursively, whatever map ordering serde_json was built with
fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map
                .into_iter()
                .map(|(k, v)| (k, canonicalize(v)))
                .collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// Builds [`CacheKey`]s under a fixed prefix
#[derive(Debug, Clone)]
pub struct KeyDeriver {
    prefix: String,
}

impl KeyDeriver {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Derive the key for `operation` called with `args`.
    ///
    /// `operation` should be fully qualified (`Component::method`) so that
    /// same-named operations on different components do not share entries.
    pub fn derive(&self, operation: &str, args: KeyArgs) -> Result<CacheKey, CacheError> {
        if operation.trim().is_empty() {
            return Err(CacheError::InvalidKey(
                "operation identifier cannot be empty".to_string(),
            ));
        }
        if let Some(err) = args.error {
            return Err(CacheError::InvalidKey(format!(
                "argument of {operation} is not serializable: {err}"
            )));
        }

        let positional = Value::Array(args.positional);
        let named = Value::Object(args.named.into_iter().collect::<Map<String, Value>>());

        let key = if self.prefix.is_empty() {
            format!("v{KEY_SCHEMA_VERSION}:{operation}:{positional}:{named}")
        } else {
            format!(
                "{}:v{KEY_SCHEMA_VERSION}:{operation}:{positional}:{named}",
                self.prefix
            )
        };

        Ok(CacheKey(key))
    }
}

impl Default for KeyDeriver {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    const AVG: &str = "FlightInsights::avg_dep_delay_per_airline";

    #[test]
    fn test_key_layout() {
        let key = KeyDeriver::new("flights")
            .derive(AVG, KeyArgs::new().arg("VX").named("months", &[6, 7, 8]))
            .unwrap();
        assert_eq!(
            key.as_str(),
            r#"flights:v1:FlightInsights::avg_dep_delay_per_airline:["VX"]:{"months":[6,7,8]}"#
        );
    }

    #[test]
    fn test_same_arguments_same_key() {
        let deriver = KeyDeriver::new("flights");
        let first = deriver.derive(AVG, KeyArgs::new().arg("VX")).unwrap();
        let second = deriver.derive(AVG, KeyArgs::new().arg("VX")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_different_airlines_differ() {
        let deriver = KeyDeriver::new("flights");
        let vx = deriver.derive(AVG, KeyArgs::new().arg("VX")).unwrap();
        let aa = deriver.derive(AVG, KeyArgs::new().arg("AA")).unwrap();
        assert_ne!(vx, aa);
    }

    #[test]
    fn test_operation_is_part_of_key() {
        let deriver = KeyDeriver::default();
        let avg = deriver.derive(AVG, KeyArgs::new().arg("VX")).unwrap();
        let max = deriver
            .derive("FlightInsights::max_dep_delay_per_airline", KeyArgs::new().arg("VX"))
            .unwrap();
        assert_ne!(avg, max);
    }

    #[test]
    fn test_named_argument_order_ignored() {
        let deriver = KeyDeriver::default();
        let a = deriver
            .derive(AVG, KeyArgs::new().named("airline", "VX").named("months", &[12]))
            .unwrap();
        let b = deriver
            .derive(AVG, KeyArgs::new().named("months", &[12]).named("airline", "VX"))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_positional_order_matters() {
        let deriver = KeyDeriver::default();
        let a = deriver.derive(AVG, KeyArgs::new().arg("VX").arg("SFO")).unwrap();
        let b = deriver.derive(AVG, KeyArgs::new().arg("SFO").arg("VX")).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_positional_and_named_are_distinct() {
        let deriver = KeyDeriver::default();
        let positional = deriver.derive(AVG, KeyArgs::new().arg("VX")).unwrap();
        let named = deriver
            .derive(AVG, KeyArgs::new().named("airline", "VX"))
            .unwrap();
        assert_ne!(positional, named);
    }

    #[test]
    fn test_nested_map_argument_is_sorted() {
        let mut first = HashMap::new();
        let mut second = HashMap::new();
        for (k, v) in [("b", 2), ("a", 1), ("c", 3)] {
            first.insert(k, v);
        }
        for (k, v) in [("c", 3), ("a", 1), ("b", 2)] {
            second.insert(k, v);
        }

        let deriver = KeyDeriver::default();
        assert_eq!(
            deriver.derive(AVG, KeyArgs::new().arg(&first)).unwrap(),
            deriver.derive(AVG, KeyArgs::new().arg(&second)).unwrap()
        );
    }

    #[test]
    fn test_unserializable_argument() {
        // Maps with non-string keys cannot become JSON objects
        let mut bad = HashMap::new();
        bad.insert(vec![1u8], 1);

        let err = KeyDeriver::default()
            .derive(AVG, KeyArgs::new().arg(&bad))
            .unwrap_err();
        assert!(matches!(err, CacheError::InvalidKey(_)));
    }

    #[test]
    fn test_empty_operation_rejected() {
        let err = KeyDeriver::default()
            .derive("  ", KeyArgs::new())
            .unwrap_err();
        assert!(matches!(err, CacheError::InvalidKey(_)));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_distinct_arguments_distinct_keys(a in ".{0,16}", b in ".{0,16}") {
            prop_assume!(a != b);
            let deriver = KeyDeriver::new("flights");
            let ka = deriver.derive(AVG, KeyArgs::new().arg(&a)).unwrap();
            let kb = deriver.derive(AVG, KeyArgs::new().arg(&b)).unwrap();
            prop_assert_ne!(ka, kb);
        }

        #[test]
        fn prop_key_is_stable(airline in "[A-Z0-9]{2}", months in prop::collection::vec(1u32..=12, 0..6)) {
            let deriver = KeyDeriver::new("flights");
            let first = deriver
                .derive(AVG, KeyArgs::new().arg(&airline).named("months", &months))
                .unwrap();
            let second = deriver
                .derive(AVG, KeyArgs::new().arg(&airline).named("months", &months))
                .unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
