//! Response normalization
//!
//! Turns a raw status code and body bytes into an [`Outcome`]. Rate limiting
//! is decided from the status alone. Every other response is parsed first; a
//! body that is not valid UTF-8 JSON is `MalformedResponse` whatever the
//! status says.

use debtwise_domain::{ErrorKind, Failure, FieldErrors, Outcome, TokenPair};
use serde_json::{Map, Value};

use super::tokens::tokens_in;

/// Normalized response plus any tokens the body carried.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub outcome: Outcome,
    /// Present whether or not the outcome is a success.
    pub tokens: Option<TokenPair>,
}

impl Normalized {
    fn plain(outcome: Outcome) -> Self {
        Self { outcome, tokens: None }
    }
}

pub fn normalize(status: u16, body: &[u8]) -> Normalized {
    if status == 429 {
        return Normalized::plain(Failure::new(ErrorKind::RateLimited).with_status(status).into());
    }

    let parsed = match parse_body(body) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::debug!(status, error = %err, "response body is not valid JSON");
            return Normalized::plain(
                Failure::new(ErrorKind::MalformedResponse).with_status(status).into(),
            );
        }
    };

    match parsed {
        Value::Array(items) => {
            let outcome = if (200..300).contains(&status) {
                Outcome::success(Value::Array(items), status)
            } else {
                Failure::new(ErrorKind::Unknown).with_status(status).into()
            };
            Normalized::plain(outcome)
        }
        Value::Object(object) => {
            let tokens = tokens_in(&object);
            Normalized { outcome: classify(status, Some(object), None), tokens }
        }
        other => Normalized::plain(classify(status, None, Some(other))),
    }
}

/// Empty or whitespace-only bodies are `null`.
pub(crate) fn parse_body(body: &[u8]) -> Result<Value, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
}

fn classify(status: u16, object: Option<Map<String, Value>>, scalar: Option<Value>) -> Outcome {
    let kind = match status {
        200 | 201 | 204 => {
            let payload = match (object, scalar) {
                (Some(mut object), _) => match object.remove("data") {
                    Some(data) => data,
                    None => Value::Object(object),
                },
                (None, Some(scalar)) => scalar,
                (None, None) => Value::Null,
            };
            return Outcome::success(payload, status);
        }
        400 => ErrorKind::BadRequest,
        401 => ErrorKind::Unauthorized,
        403 => ErrorKind::Forbidden,
        404 => ErrorKind::NotFound,
        422 => ErrorKind::Validation,
        500..=u16::MAX => ErrorKind::ServerError,
        _ => ErrorKind::Unknown,
    };

    let mut failure = Failure::new(kind).with_status(status);

    if let Some(object) = &object {
        if let Some(message) = message_from(object) {
            failure = failure.with_message(message);
        }

        if matches!(kind, ErrorKind::BadRequest | ErrorKind::Validation) {
            let fields = field_errors_from(object);
            if !fields.is_empty() {
                failure = failure.with_field_errors(fields);
            }
        }
    }

    failure.into()
}

fn message_from(object: &Map<String, Value>) -> Option<String> {
    ["message", "detail", "error"].iter().find_map(|key| match object.get(*key) {
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text.clone()),
        _ => None,
    })
}

fn field_errors_from(object: &Map<String, Value>) -> FieldErrors {
    match object.get("errors") {
        Some(Value::Object(errors)) => return collect_fields(errors),
        Some(Value::Array(items)) => {
            let messages = strings(items);
            let mut fields = FieldErrors::new();
            if !messages.is_empty() {
                fields.insert("non_field_errors".to_string(), messages);
            }
            return fields;
        }
        _ => {}
    }

    if let Some(Value::Object(errors)) = object.get("error") {
        return collect_fields(errors);
    }

    object
        .iter()
        .filter(|(key, _)| !matches!(key.as_str(), "message" | "detail"))
        .filter_map(|(key, value)| match value {
            Value::Array(items) => {
                let messages = strings(items);
                (!messages.is_empty()).then(|| (key.clone(), messages))
            }
            _ => None,
        })
        .collect()
}

fn collect_fields(errors: &Map<String, Value>) -> FieldErrors {
    errors
        .iter()
        .filter_map(|(field, value)| {
            let messages = match value {
                Value::String(text) => vec![text.clone()],
                Value::Array(items) => strings(items),
                _ => Vec::new(),
            };
            (!messages.is_empty()).then(|| (field.clone(), messages))
        })
        .collect()
}

fn strings(items: &[Value]) -> Vec<String> {
    items.iter().filter_map(|item| item.as_str().map(str::to_string)).collect()
}
