//! Error taxonomy for everything that talks to the REST API or validates
//! user input, and the single place where errors become user-facing text.
//!
//! Nothing is retried and nothing is sent to a remote sink: call sites turn
//! an `ApiError` into a message with `handle_api_error` and show it inline or
//! as a toast, leaving the previous UI state untouched.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Client-side validation failed before any request was made.
    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Words that must never reach the screen: credentials, stack traces and
/// storage internals the API sometimes echoes back in error bodies.
pub const SENSITIVE_KEYWORDS: &[&str] = &[
    "password",
    "token",
    "secret",
    "credential",
    "api_key",
    "apikey",
    "authorization",
    "bearer",
    "stack",
    "trace",
    "exception",
    "sql",
    "database",
    "internal",
];

pub const SESSION_EXPIRED: &str = "เซสชันหมดอายุ กรุณาเข้าสู่ระบบใหม่ (Session expired, please sign in again)";
pub const FORBIDDEN: &str = "คุณไม่มีสิทธิ์ดำเนินการนี้ (You do not have permission)";
pub const NOT_FOUND: &str = "ไม่พบข้อมูลที่ร้องขอ (Not found)";
pub const SERVER_ERROR: &str = "เซิร์ฟเวอร์ขัดข้อง กรุณาลองใหม่ภายหลัง (Server error, please try again later)";
pub const NETWORK_ERROR: &str = "ไม่สามารถเชื่อมต่อเซิร์ฟเวอร์ได้ (Unable to reach the server)";
pub const GENERIC_ERROR: &str = "เกิดข้อผิดพลาด กรุณาลองใหม่ (Something went wrong, please try again)";

/// True when `message` mentions any of the sensitive keywords.
pub fn is_sensitive(message: &str) -> bool {
    let lower = message.to_lowercase();
    SENSITIVE_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Converts an error into the string shown to the user.
///
/// 401 means the session expired, but the user is not logged out here.
pub fn handle_api_error(error: &ApiError) -> String {
    match error {
        ApiError::Network(_) => NETWORK_ERROR.to_string(),
        ApiError::Http { status: 401, .. } => SESSION_EXPIRED.to_string(),
        ApiError::Http { status: 403, .. } => FORBIDDEN.to_string(),
        ApiError::Http { status: 404, .. } => NOT_FOUND.to_string(),
        ApiError::Http { status, .. } if *status >= 500 => SERVER_ERROR.to_string(),
        ApiError::Http { message, .. } => safe_message(message),
        ApiError::Decode(_) => GENERIC_ERROR.to_string(),
        ApiError::Validation(message) => safe_message(message),
    }
}

fn safe_message(message: &str) -> String {
    let message = message.trim();
    if message.is_empty() || is_sensitive(message) {
        GENERIC_ERROR.to_string()
    } else {
        message.to_string()
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Pulls the human message out of an error response body.
///
/// The API answers `{"error": "..."}` or `{"message": "..."}`; anything else
/// is used verbatim.
pub fn extract_error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { error: Some(e), .. }) => e,
        Ok(ErrorBody { message: Some(m), .. }) => m,
        _ => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn http(status: u16, message: &str) -> ApiError {
        ApiError::Http {
            status,
            message: message.to_string(),
        }
    }

    #[test]
    fn status_codes_map_to_fixed_messages() {
        assert_eq!(handle_api_error(&http(401, "jwt expired")), SESSION_EXPIRED);
        assert_eq!(handle_api_error(&http(403, "")), FORBIDDEN);
        assert_eq!(handle_api_error(&http(404, "no template")), NOT_FOUND);
        assert_eq!(handle_api_error(&http(502, "bad gateway")), SERVER_ERROR);
        assert!(http(401, "").is_unauthorized());
    }

    #[test]
    fn other_statuses_show_the_server_message_unless_sensitive() {
        assert_eq!(handle_api_error(&http(400, "Email already registered")), "Email already registered");
        assert_eq!(handle_api_error(&http(400, "invalid password hash")), GENERIC_ERROR);
        assert_eq!(handle_api_error(&http(422, "SQL error near SELECT")), GENERIC_ERROR);
        assert_eq!(handle_api_error(&http(409, "  ")), GENERIC_ERROR);
    }

    #[test]
    fn network_and_validation() {
        assert_eq!(handle_api_error(&ApiError::Network("failed to fetch".into())), NETWORK_ERROR);
        assert_eq!(
            handle_api_error(&ApiError::Validation("Amount must be a number".into())),
            "Amount must be a number"
        );
    }

    #[test]
    fn error_bodies() {
        assert_eq!(extract_error_message(r#"{"error":"quota exceeded"}"#), "quota exceeded");
        assert_eq!(extract_error_message(r#"{"message":"bad input"}"#), "bad input");
        assert_eq!(extract_error_message(" plain text \n"), "plain text");
    }
}
