//! Type definitions for SondeHub recovery records.

use serde::Deserialize;
use serde_json::Value;

/// Value the API schema template leaves in text fields nobody filled in.
pub const PLACEHOLDER_SENTINEL: &str = "string";

/// Fallback for any positional or identifier field that is missing.
pub const UNKNOWN: &str = "Unknown";

/// One recovery report as returned by `GET /recovered`.
///
/// Every field is optional because the upstream payload is loosely typed:
/// positions arrive as numbers or strings, and some entries omit fields
/// entirely. A JSON `null` deserializes to `None`, same as an absent key.
/// Unrecognized keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecoveryEvent {
    #[serde(default)]
    pub datetime: Option<Value>,
    #[serde(default)]
    pub serial: Option<Value>,
    #[serde(default)]
    pub lat: Option<Value>,
    #[serde(default)]
    pub lon: Option<Value>,
    #[serde(default)]
    pub alt: Option<Value>,
    #[serde(default)]
    pub recovered: Option<Value>,
    #[serde(default)]
    pub recovered_by: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
}

impl RecoveryEvent {
    /// Build a record from one element of the response array.
    ///
    /// Only JSON objects are accepted. serde would otherwise happily read a
    /// positional array into the struct fields.
    pub fn from_value(value: &Value) -> Result<Self, String> {
        if !value.is_object() {
            return Err(format!(
                "expected an event record object, found {}",
                kind_of(value)
            ));
        }
        Self::deserialize(value).map_err(|e| e.to_string())
    }

    /// Raw `datetime` text, if any.
    pub fn raw_datetime(&self) -> Option<String> {
        self.datetime.as_ref().map(render_value)
    }

    pub fn serial(&self) -> String {
        or_unknown(self.serial.as_ref())
    }

    pub fn latitude(&self) -> String {
        or_unknown(self.lat.as_ref())
    }

    pub fn longitude(&self) -> String {
        or_unknown(self.lon.as_ref())
    }

    pub fn altitude(&self) -> String {
        or_unknown(self.alt.as_ref())
    }

    pub fn is_recovered(&self) -> bool {
        self.recovered.as_ref().is_some_and(is_truthy)
    }

    /// Who recovered the device. Suppressed unless the device is recovered.
    pub fn recovered_by(&self) -> Option<String> {
        if !self.is_recovered() {
            return None;
        }
        meaningful(self.recovered_by.as_ref())
    }

    pub fn description(&self) -> Option<String> {
        meaningful(self.description.as_ref())
    }
}

/// Normalize an optional free-text field: falsy values and the placeholder
/// sentinel both collapse to `None`.
pub fn meaningful(value: Option<&Value>) -> Option<String> {
    let value = value.filter(|v| is_truthy(v))?;
    if value.as_str() == Some(PLACEHOLDER_SENTINEL) {
        return None;
    }
    Some(render_value(value))
}

/// Render a JSON value the way it should read in prose.
///
/// Strings lose their quotes. Numbers keep their JSON spelling, so `100.0`
/// stays `100.0`.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Truthiness used for flags and optional text: empty and zero are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Short name of a JSON value's type, for diagnostics.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn or_unknown(value: Option<&Value>) -> String {
    value.map(render_value).unwrap_or_else(|| UNKNOWN.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_fields_default_to_unknown() {
        let event = RecoveryEvent::from_value(&json!({})).unwrap();

        assert_eq!(event.serial(), "Unknown");
        assert_eq!(event.latitude(), "Unknown");
        assert_eq!(event.longitude(), "Unknown");
        assert_eq!(event.altitude(), "Unknown");
        assert!(!event.is_recovered());
        assert!(event.raw_datetime().is_none());
    }

    #[test]
    fn test_null_fields_treated_as_absent() {
        let event = RecoveryEvent::from_value(&json!({
            "serial": null,
            "lat": null,
            "recovered": null
        }))
        .unwrap();

        assert_eq!(event.serial(), "Unknown");
        assert_eq!(event.latitude(), "Unknown");
        assert!(!event.is_recovered());
    }

    #[test]
    fn test_positions_render_verbatim() {
        let event = RecoveryEvent::from_value(&json!({
            "lat": 51.5,
            "lon": "-0.12",
            "alt": 100.0
        }))
        .unwrap();

        assert_eq!(event.latitude(), "51.5");
        assert_eq!(event.longitude(), "-0.12");
        assert_eq!(event.altitude(), "100.0");
    }

    #[test]
    fn test_sentinel_collapses_to_none() {
        assert_eq!(meaningful(Some(&json!("string"))), None);
        assert_eq!(meaningful(Some(&json!(""))), None);
        assert_eq!(meaningful(None), None);
        assert_eq!(
            meaningful(Some(&json!("Found in a field"))),
            Some("Found in a field".to_string())
        );
    }

    #[test]
    fn test_recovered_by_requires_recovered_flag() {
        let event = RecoveryEvent::from_value(&json!({
            "recovered": false,
            "recovered_by": "Jane Doe"
        }))
        .unwrap();
        assert_eq!(event.recovered_by(), None);

        let event = RecoveryEvent::from_value(&json!({
            "recovered": true,
            "recovered_by": "Jane Doe"
        }))
        .unwrap();
        assert_eq!(event.recovered_by(), Some("Jane Doe".to_string()));
    }

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("yes")));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!([])));
        assert!(!is_truthy(&json!({})));
        assert!(!is_truthy(&Value::Null));
    }

    #[test]
    fn test_non_object_record_rejected() {
        let err = RecoveryEvent::from_value(&json!(["a", "b"])).unwrap_err();
        assert!(err.contains("found an array"));

        let err = RecoveryEvent::from_value(&json!("S1234567")).unwrap_err();
        assert!(err.contains("found a string"));
    }
}
