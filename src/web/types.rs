//! Request data that needs validating, its parsing implementations and tests for those.

use axum::http::{header, HeaderMap};
use lazy_regex::regex_is_match;
use serde::Serialize;
use serde_json::Value;

/// Column width of `subscribers.email`.
const MAX_EMAIL_CHARS: usize = 255;

// ###################################
// ->   STRUCTS
// ###################################
/// Leniently decoded subscribe request.
/// A body without a JSON content type, or that isn't a JSON object, decodes to an empty
/// request. `email` keeps whatever JSON value the client sent so a non-string can be
/// treated as missing.
#[derive(Debug, Default)]
pub struct SubscribeRequest {
    pub email: Option<Value>,
}

impl SubscribeRequest {
    pub fn from_body(headers: &HeaderMap, body: &[u8]) -> Self {
        if !has_json_content_type(headers) {
            return Self::default();
        }

        match serde_json::from_slice(body) {
            Ok(Value::Object(mut map)) => Self {
                email: map.remove("email"),
            },
            _ => Self::default(),
        }
    }

    /// The raw email, or an empty string when it is missing or not a string.
    pub fn email(&self) -> &str {
        self.email.as_ref().and_then(Value::as_str).unwrap_or("")
    }
}

/// `application/json` or any `application/*+json` type, parameters ignored.
fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
    else {
        return false;
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

/// Validated and normalized (trimmed, lower-cased) subscriber email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidEmail(String);

impl AsRef<str> for ValidEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ValidEmail {
    pub fn parse<S>(value: S) -> Result<Self, DataParsingError>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref().trim().to_lowercase();

        if value.is_empty() {
            return Err(DataParsingError::EmailMissing);
        }

        if value.chars().count() > MAX_EMAIL_CHARS {
            return Err(DataParsingError::EmailTooLong);
        }

        if regex_is_match!(r"^[^@\s]+@[^@\s]+\.[^@\s]+$", &value) {
            Ok(ValidEmail(value))
        } else {
            Err(DataParsingError::EmailInvalid(value))
        }
    }
}

impl TryFrom<&SubscribeRequest> for ValidEmail {
    type Error = DataParsingError;

    fn try_from(request: &SubscribeRequest) -> Result<Self, Self::Error> {
        ValidEmail::parse(request.email())
    }
}

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, thiserror::Error)]
pub enum DataParsingError {
    #[error("email missing")]
    EmailMissing,
    #[error("email too long")]
    EmailTooLong,
    #[error("email invalid: {0}")]
    EmailInvalid(String),
}
