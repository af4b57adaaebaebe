//! Expected response shapes and the check primitives used against them.
//!
//! Every check works on raw `serde_json::Value` payloads and reports
//! deviations as [`CheckFailure`] values instead of failing fast, so a
//! single response can surface several mismatches at once.

use std::fmt;

use serde_json::Value;

// =============================================================================
// EXPECTED KEY SETS
// =============================================================================

pub const POST_KEYS: &[&str] = &["userId", "id", "title", "body"];
pub const COMMENT_KEYS: &[&str] = &["postId", "id", "name", "email", "body"];
pub const PHOTO_KEYS: &[&str] = &["albumId", "id", "title", "url", "thumbnailUrl"];
pub const ALBUM_KEYS: &[&str] = &["userId", "id", "title"];
pub const TODO_KEYS: &[&str] = &["userId", "id", "title", "completed"];

// =============================================================================
// CHECK FAILURES
// =============================================================================

/// One observed deviation from the contract, tied to the request that
/// produced it (e.g. `GET /posts/1`).
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CheckFailure {
    pub target: String,
    pub kind: CheckFailureKind,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum CheckFailureKind {
    StatusMismatch { expected: u16, actual: u16 },
    NotAnObject,
    NotAnArray,
    EmptyPayload,
    NonEmptyPayload,
    MissingKey { key: String },
    UnexpectedKey { key: String },
    MissingField { field: String },
    NullField { field: String },
    TypeMismatch { field: String, expected: String },
    ValueMismatch { field: String, expected: Value, actual: Value },
    NotDecodable { model: String, detail: String },
}

impl CheckFailure {
    pub fn new(target: &str, kind: CheckFailureKind) -> Self {
        Self {
            target: target.to_string(),
            kind,
        }
    }
}

impl fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.target)?;
        match &self.kind {
            CheckFailureKind::StatusMismatch { expected, actual } => {
                write!(f, "expected status {expected}, got {actual}")
            }
            CheckFailureKind::NotAnObject => write!(f, "payload is not a JSON object"),
            CheckFailureKind::NotAnArray => write!(f, "payload is not a JSON array"),
            CheckFailureKind::EmptyPayload => write!(f, "payload is unexpectedly empty"),
            CheckFailureKind::NonEmptyPayload => write!(f, "payload is unexpectedly non-empty"),
            CheckFailureKind::MissingKey { key } => write!(f, "missing key '{key}'"),
            CheckFailureKind::UnexpectedKey { key } => write!(f, "unexpected key '{key}'"),
            CheckFailureKind::MissingField { field } => write!(f, "missing field '{field}'"),
            CheckFailureKind::NullField { field } => write!(f, "field '{field}' is null"),
            CheckFailureKind::TypeMismatch { field, expected } => {
                write!(f, "field '{field}' is not a {expected}")
            }
            CheckFailureKind::ValueMismatch {
                field,
                expected,
                actual,
            } => write!(f, "field '{field}' is {actual}, expected {expected}"),
            CheckFailureKind::NotDecodable { model, detail } => {
                write!(f, "payload does not decode as {model}: {detail}")
            }
        }
    }
}

// =============================================================================
// CHECK PRIMITIVES
// =============================================================================

pub fn check_status(target: &str, expected: u16, actual: u16) -> Vec<CheckFailure> {
    if expected == actual {
        Vec::new()
    } else {
        vec![CheckFailure::new(
            target,
            CheckFailureKind::StatusMismatch { expected, actual },
        )]
    }
}

/// The payload object must carry exactly the expected keys, no more, no
/// less. Order is irrelevant.
pub fn check_exact_keys(target: &str, value: &Value, expected: &[&str]) -> Vec<CheckFailure> {
    let Some(object) = value.as_object() else {
        return vec![CheckFailure::new(target, CheckFailureKind::NotAnObject)];
    };
    let mut failures = Vec::new();
    for key in expected {
        if !object.contains_key(*key) {
            failures.push(CheckFailure::new(
                target,
                CheckFailureKind::MissingKey {
                    key: (*key).to_string(),
                },
            ));
        }
    }
    for key in object.keys() {
        if !expected.contains(&key.as_str()) {
            failures.push(CheckFailure::new(
                target,
                CheckFailureKind::UnexpectedKey { key: key.clone() },
            ));
        }
    }
    failures
}

/// Non-empty array or object. Anything else counts as empty.
pub fn check_non_empty(target: &str, value: &Value) -> Vec<CheckFailure> {
    let non_empty = match value {
        Value::Array(items) => !items.is_empty(),
        Value::Object(entries) => !entries.is_empty(),
        _ => false,
    };
    if non_empty {
        Vec::new()
    } else {
        vec![CheckFailure::new(target, CheckFailureKind::EmptyPayload)]
    }
}

pub fn check_empty_array(target: &str, value: &Value) -> Vec<CheckFailure> {
    match value.as_array() {
        None => vec![CheckFailure::new(target, CheckFailureKind::NotAnArray)],
        Some(items) if items.is_empty() => Vec::new(),
        Some(_) => vec![CheckFailure::new(target, CheckFailureKind::NonEmptyPayload)],
    }
}

/// The field must exist and not be null. No type is asserted.
pub fn check_present(target: &str, value: &Value, field: &str) -> Vec<CheckFailure> {
    match value.get(field) {
        None => vec![CheckFailure::new(
            target,
            CheckFailureKind::MissingField {
                field: field.to_string(),
            },
        )],
        Some(Value::Null) => vec![CheckFailure::new(
            target,
            CheckFailureKind::NullField {
                field: field.to_string(),
            },
        )],
        Some(_) => Vec::new(),
    }
}

pub fn check_number(target: &str, value: &Value, field: &str) -> Vec<CheckFailure> {
    check_typed(target, value, field, "number", Value::is_number)
}

pub fn check_string(target: &str, value: &Value, field: &str) -> Vec<CheckFailure> {
    check_typed(target, value, field, "string", Value::is_string)
}

pub fn check_bool(target: &str, value: &Value, field: &str) -> Vec<CheckFailure> {
    check_typed(target, value, field, "boolean", Value::is_boolean)
}

fn check_typed(
    target: &str,
    value: &Value,
    field: &str,
    expected: &str,
    predicate: fn(&Value) -> bool,
) -> Vec<CheckFailure> {
    match value.get(field) {
        None => vec![CheckFailure::new(
            target,
            CheckFailureKind::MissingField {
                field: field.to_string(),
            },
        )],
        Some(found) if predicate(found) => Vec::new(),
        Some(_) => vec![CheckFailure::new(
            target,
            CheckFailureKind::TypeMismatch {
                field: field.to_string(),
                expected: expected.to_string(),
            },
        )],
    }
}

pub fn check_field_equals(
    target: &str,
    value: &Value,
    field: &str,
    expected: &Value,
) -> Vec<CheckFailure> {
    match value.get(field) {
        None => vec![CheckFailure::new(
            target,
            CheckFailureKind::MissingField {
                field: field.to_string(),
            },
        )],
        Some(found) if found == expected => Vec::new(),
        Some(found) => vec![CheckFailure::new(
            target,
            CheckFailureKind::ValueMismatch {
                field: field.to_string(),
                expected: expected.clone(),
                actual: found.clone(),
            },
        )],
    }
}

/// Every field of the submitted body must come back unchanged in the
/// response. Extra response fields are ignored here; key-set checks cover
/// those separately.
pub fn check_echoed(target: &str, response: &Value, submitted: &Value) -> Vec<CheckFailure> {
    let Some(entries) = submitted.as_object() else {
        return Vec::new();
    };
    let mut failures = Vec::new();
    for (field, expected) in entries {
        failures.extend(check_field_equals(target, response, field, expected));
    }
    failures
}

/// Decodes the payload into a typed model, reporting a failure instead of
/// an error when the field types do not line up.
pub fn decode_model<T: serde::de::DeserializeOwned>(
    target: &str,
    model: &str,
    value: &Value,
) -> Result<T, CheckFailure> {
    serde_json::from_value(value.clone()).map_err(|e| {
        CheckFailure::new(
            target,
            CheckFailureKind::NotDecodable {
                model: model.to_string(),
                detail: e.to_string(),
            },
        )
    })
}
