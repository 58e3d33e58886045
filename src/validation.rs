//! Request shape validation.
//!
//! Every write endpoint declares the fields it requires as a static list of
//! [`FieldSpec`]s. The raw JSON body is checked against that list first so
//! that a client error can name the offending field, and only then is it
//! deserialised into the typed request struct.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

/// Primitive JSON type a field must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A JSON string.
    String,
    /// Any JSON number.
    Number,
    /// A JSON integer literal within the signed 64-bit range (`5`, not `5.0`).
    Integer,
}

impl FieldKind {
    /// Returns true if `value` has this kind.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Number => value.is_number(),
            FieldKind::Integer => value.is_i64(),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::String => write!(f, "string"),
            FieldKind::Number => write!(f, "number"),
            FieldKind::Integer => write!(f, "integer"),
        }
    }
}

/// A required field in a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// JSON field name.
    pub name: &'static str,
    /// Expected kind.
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Declares a required string field.
    #[must_use]
    pub const fn string(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::String,
        }
    }

    /// Declares a required numeric field.
    #[must_use]
    pub const fn number(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Number,
        }
    }

    /// Declares a required integer field.
    #[must_use]
    pub const fn integer(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Integer,
        }
    }
}

/// Reason a request body was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The field is absent (or null).
    #[error("{field} is required")]
    Missing {
        /// Field name.
        field: String,
    },
    /// The field is present with the wrong JSON type.
    #[error("{field} must be of type {expected}")]
    WrongType {
        /// Field name.
        field: String,
        /// Expected kind.
        expected: String,
    },
    /// The field has the right type but an unacceptable value.
    #[error("{field} {reason}")]
    OutOfRange {
        /// Field name.
        field: String,
        /// What is wrong with the value.
        reason: String,
    },
}

impl ValidationError {
    /// Name of the rejected field.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Missing { field }
            | ValidationError::WrongType { field, .. }
            | ValidationError::OutOfRange { field, .. } => field,
        }
    }
}

/// Checks that `payload` carries every field in `fields` with the right kind.
///
/// Fields are checked in declaration order and the first failure is
/// returned. Extra fields in the payload are ignored.
///
/// # Errors
/// Returns [`ValidationError`] naming the first missing or mistyped field.
pub fn validate_fields(fields: &[FieldSpec], payload: &Value) -> Result<(), ValidationError> {
    for spec in fields {
        match payload.get(spec.name) {
            None | Some(Value::Null) => {
                return Err(ValidationError::Missing {
                    field: spec.name.to_string(),
                });
            }
            Some(value) if !spec.kind.matches(value) => {
                return Err(ValidationError::WrongType {
                    field: spec.name.to_string(),
                    expected: spec.kind.to_string(),
                });
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Like [`validate_fields`], but absent or null fields are accepted.
///
/// # Errors
/// Returns [`ValidationError::WrongType`] for the first mistyped field.
pub fn validate_optional_fields(
    fields: &[FieldSpec],
    payload: &Value,
) -> Result<(), ValidationError> {
    for spec in fields {
        if let Some(value) = payload.get(spec.name)
            && !value.is_null()
            && !spec.kind.matches(value)
        {
            return Err(ValidationError::WrongType {
                field: spec.name.to_string(),
                expected: spec.kind.to_string(),
            });
        }
    }
    Ok(())
}

/// A request body with a declared shape.
pub trait RequestSchema: DeserializeOwned {
    /// Fields the body must carry.
    const FIELDS: &'static [FieldSpec];

    /// Fields the body may carry; checked only when present.
    const OPTIONAL: &'static [FieldSpec] = &[];

    /// Semantic checks run after deserialisation.
    ///
    /// # Errors
    /// Returns [`ValidationError`] if a value is out of range.
    fn check(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Validates the shape of `payload` and converts it into `Self`.
    ///
    /// # Errors
    /// Returns [`ValidationError`] naming the first offending field.
    fn parse(payload: Value) -> Result<Self, ValidationError> {
        validate_fields(Self::FIELDS, &payload)?;
        validate_optional_fields(Self::OPTIONAL, &payload)?;
        // The shape already matched, so a failure here is a value the typed
        // field cannot hold, such as an integer overflow.
        let parsed: Self =
            serde_json::from_value(payload).map_err(|e| ValidationError::OutOfRange {
                field: "body".to_string(),
                reason: e.to_string(),
            })?;
        parsed.check()?;
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    const FIELDS: &[FieldSpec] = &[
        FieldSpec::string("link"),
        FieldSpec::number("initialPrice"),
        FieldSpec::integer("numShares"),
    ];

    #[test]
    fn test_valid_payload_passes() {
        let payload = json!({"link": "abc", "initialPrice": 20.5, "numShares": 5});
        assert!(validate_fields(FIELDS, &payload).is_ok());
    }

    #[test]
    fn test_extra_fields_ignored() {
        let payload = json!({"link": "abc", "initialPrice": 20, "numShares": 5, "extra": true});
        assert!(validate_fields(FIELDS, &payload).is_ok());
    }

    #[test]
    fn test_first_missing_field_reported() {
        let payload = json!({"numShares": 5});
        let err = validate_fields(FIELDS, &payload).unwrap_err();
        assert_eq!(err.field(), "link");
        assert_eq!(err.to_string(), "link is required");
    }

    #[test]
    fn test_null_counts_as_missing() {
        let payload = json!({"link": null, "initialPrice": 1, "numShares": 1});
        let err = validate_fields(FIELDS, &payload).unwrap_err();
        assert!(matches!(err, ValidationError::Missing { .. }));
    }

    #[test]
    fn test_string_for_number_rejected() {
        let payload = json!({"link": "abc", "initialPrice": "20", "numShares": 5});
        let err = validate_fields(FIELDS, &payload).unwrap_err();
        assert_eq!(err.field(), "initialPrice");
        assert_eq!(err.to_string(), "initialPrice must be of type number");
    }

    #[test]
    fn test_fractional_integer_rejected() {
        let payload = json!({"link": "abc", "initialPrice": 20, "numShares": 2.5});
        let err = validate_fields(FIELDS, &payload).unwrap_err();
        assert_eq!(err.field(), "numShares");
    }

    #[test]
    fn test_integer_kind() {
        assert!(FieldKind::Integer.matches(&json!(-3)));
        assert!(FieldKind::Integer.matches(&json!(3)));
        assert!(!FieldKind::Integer.matches(&json!(3.0)));
        assert!(!FieldKind::Integer.matches(&json!("3")));
        assert!(FieldKind::Integer.matches(&json!(i64::MAX)));
        assert!(!FieldKind::Integer.matches(&json!(u64::MAX)));
    }

    #[test]
    fn test_integer_beyond_signed_range_names_field() {
        let payload = json!({"link": "abc", "initialPrice": 20, "numShares": u64::MAX});
        let err = validate_fields(FIELDS, &payload).unwrap_err();
        assert_eq!(err.field(), "numShares");
        assert_eq!(err.to_string(), "numShares must be of type integer");
    }

    #[test]
    fn test_non_object_payload_fails_on_first_field() {
        let err = validate_fields(FIELDS, &json!([1, 2, 3])).unwrap_err();
        assert_eq!(err.field(), "link");
    }

    #[test]
    fn test_optional_fields() {
        let optional = &[FieldSpec::string("name"), FieldSpec::number("value")];
        assert!(validate_optional_fields(optional, &json!({})).is_ok());
        assert!(validate_optional_fields(optional, &json!({"value": 10})).is_ok());

        let err = validate_optional_fields(optional, &json!({"name": 7})).unwrap_err();
        assert_eq!(err.field(), "name");
    }

    #[derive(Debug, Deserialize)]
    struct Sample {
        count: i64,
    }

    impl RequestSchema for Sample {
        const FIELDS: &'static [FieldSpec] = &[FieldSpec::integer("count")];

        fn check(&self) -> Result<(), ValidationError> {
            if self.count < 0 {
                return Err(ValidationError::OutOfRange {
                    field: "count".to_string(),
                    reason: "must not be negative".to_string(),
                });
            }
            Ok(())
        }
    }

    #[test]
    fn test_parse_runs_semantic_check() {
        assert_eq!(Sample::parse(json!({"count": 4})).unwrap().count, 4);

        let err = Sample::parse(json!({"count": -1})).unwrap_err();
        assert_eq!(err.to_string(), "count must not be negative");
    }
}
