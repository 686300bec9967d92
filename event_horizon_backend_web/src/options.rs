// Copyright 2026 the Event Horizon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Directive options as JSON.
//!
//! ```json
//! { "y": { "from": 0, "to": -100 }, "o": { "from": 0, "to": 1 }, "fx_range_end": 0.5 }
//! ```
//!
//! Property keys are `x y r rx ry s o`, each an object with numeric `from`
//! and `to` (missing values are 0). Keys keep their declaration order, which
//! is the order transform functions are written in. Unknown keys and
//! non-object property values are ignored.

use alloc::string::{String, ToString as _};

use event_horizon_core::options::EffectOptions;
use event_horizon_core::property::PropertyKind;
use serde_json::{Map, Value};

/// Why an options document was rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OptionsError {
    /// The text is not valid JSON.
    #[error("options are not valid JSON: {0}")]
    Syntax(String),
    /// The document is valid JSON but not an object.
    #[error("options must be a JSON object")]
    NotAnObject,
    /// A top-level setting has the wrong type.
    #[error("`{0}` must be a number")]
    NotANumber(&'static str),
}

/// Options parsed from one JSON document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedOptions {
    /// Parallax tracks and range end.
    pub options: EffectOptions,
    /// `callback_threshold`, if present.
    pub callback_threshold: Option<f64>,
}

impl ParsedOptions {
    /// The threshold a trigger's enter callback fires at: `explicit` if
    /// given, else the document's `callback_threshold`, else 0.
    #[must_use]
    pub fn effective_callback_threshold(&self, explicit: Option<f64>) -> f64 {
        explicit.or(self.callback_threshold).unwrap_or(0.0)
    }
}

/// Parses an options document.
///
/// # Errors
///
/// Returns an [`OptionsError`] if the text is not a JSON object, or if
/// `fx_range_end` or `callback_threshold` is present but not a number.
pub fn parse_options(json: &str) -> Result<ParsedOptions, OptionsError> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| OptionsError::Syntax(e.to_string()))?;
    let Value::Object(map) = value else {
        return Err(OptionsError::NotAnObject);
    };
    from_map(&map)
}

fn from_map(map: &Map<String, Value>) -> Result<ParsedOptions, OptionsError> {
    let mut options = EffectOptions::new();
    for (key, value) in map {
        let (Some(kind), Value::Object(range)) = (PropertyKind::from_key(key), value) else {
            continue;
        };
        let from = range.get("from").and_then(Value::as_f64).unwrap_or(0.0);
        let to = range.get("to").and_then(Value::as_f64).unwrap_or(0.0);
        options.set(kind, from, to);
    }

    if let Some(range_end) = number(map, "fx_range_end")? {
        options = options.with_range_end(range_end);
    }
    let callback_threshold = number(map, "callback_threshold")?;

    Ok(ParsedOptions {
        options,
        callback_threshold,
    })
}

fn number(map: &Map<String, Value>, key: &'static str) -> Result<Option<f64>, OptionsError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_f64().map(Some).ok_or(OptionsError::NotANumber(key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn tracks_keep_declaration_order() {
        let json = r#"{"o":{"from":0,"to":1},"y":{"from":0,"to":-100},"x":{"to":5}}"#;
        let parsed = parse_options(json).unwrap();
        let kinds: Vec<PropertyKind> = parsed.options.tracks().iter().map(|t| t.kind()).collect();
        assert_eq!(
            kinds,
            [PropertyKind::Opacity, PropertyKind::TranslateY, PropertyKind::TranslateX]
        );
        let x = parsed.options.track(PropertyKind::TranslateX).unwrap();
        assert_eq!((x.from(), x.to()), (0.0, 5.0));
    }

    #[test]
    fn top_level_settings() {
        let json = r#"{"s":{"from":1,"to":2},"fx_range_end":0.5,"callback_threshold":50}"#;
        let parsed = parse_options(json).unwrap();
        assert_eq!(parsed.options.range_end(), 0.5);
        assert_eq!(parsed.callback_threshold, Some(50.0));
    }

    #[test]
    fn trigger_threshold_prefers_explicit_argument() {
        let parsed = parse_options(r#"{"callback_threshold":75}"#).unwrap();
        assert!(parsed.options.is_empty());
        assert_eq!(parsed.effective_callback_threshold(None), 75.0);
        assert_eq!(parsed.effective_callback_threshold(Some(25.0)), 25.0);
        assert_eq!(ParsedOptions::default().effective_callback_threshold(None), 0.0);
    }

    #[test]
    fn unknown_and_malformed_keys_are_ignored() {
        let parsed = parse_options(r#"{"z":{"from":1,"to":2},"x":3,"callback":null}"#).unwrap();
        assert!(parsed.options.is_empty());
        assert_eq!(parsed.callback_threshold, None);
    }

    #[test]
    fn rejects_non_objects_and_bad_numbers() {
        assert_eq!(parse_options("[1, 2]"), Err(OptionsError::NotAnObject));
        assert!(
            matches!(parse_options("{"), Err(OptionsError::Syntax(_))),
            "truncated JSON must be a syntax error"
        );
        assert_eq!(
            parse_options(r#"{"fx_range_end":"half"}"#),
            Err(OptionsError::NotANumber("fx_range_end"))
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            OptionsError::NotANumber("callback_threshold").to_string(),
            "`callback_threshold` must be a number"
        );
        assert_eq!(OptionsError::NotAnObject.to_string(), "options must be a JSON object");
    }
}
