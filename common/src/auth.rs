//! Browser-persisted session and UI preferences.
//!
//! The frontend stores the `AuthResponse` it got at login as JSON under
//! `AUTH_STORAGE_KEY`; anything it cannot parse is treated as logged out.

use crate::model::user::AuthResponse;

pub const AUTH_STORAGE_KEY: &str = "dooform_auth";
pub const SIDEBAR_WIDTH_KEY: &str = "dooform_sidebar_width";

pub const SIDEBAR_MIN_WIDTH: u32 = 200;
pub const SIDEBAR_MAX_WIDTH: u32 = 480;
pub const SIDEBAR_DEFAULT_WIDTH: u32 = 280;

pub fn decode_session(raw: &str) -> Option<AuthResponse> {
    serde_json::from_str(raw).ok()
}

pub fn encode_session(session: &AuthResponse) -> String {
    serde_json::to_string(session).unwrap_or_default()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Reads a stored sidebar width, clamped to the allowed range.
pub fn parse_sidebar_width(raw: Option<&str>) -> u32 {
    raw.and_then(|r| r.trim().parse::<u32>().ok())
        .map_or(SIDEBAR_DEFAULT_WIDTH, |w| w.clamp(SIDEBAR_MIN_WIDTH, SIDEBAR_MAX_WIDTH))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::user::User;
    use pretty_assertions::assert_eq;

    #[test]
    fn sessions_round_trip_and_garbage_is_ignored() {
        let session = AuthResponse {
            access_token: "a".into(),
            refresh_token: "r".into(),
            user: User {
                id: "1".into(),
                email: "admin@dooform.com".into(),
                first_name: String::new(),
                last_name: String::new(),
                roles: vec!["admin".into()],
                picture_url: None,
            },
        };
        let raw = encode_session(&session);
        assert!(raw.contains("accessToken"));
        assert_eq!(decode_session(&raw), Some(session));
        assert_eq!(decode_session("{not json"), None);
    }

    #[test]
    fn sidebar_width_is_clamped() {
        assert_eq!(parse_sidebar_width(None), SIDEBAR_DEFAULT_WIDTH);
        assert_eq!(parse_sidebar_width(Some("abc")), SIDEBAR_DEFAULT_WIDTH);
        assert_eq!(parse_sidebar_width(Some("100")), SIDEBAR_MIN_WIDTH);
        assert_eq!(parse_sidebar_width(Some("320")), 320);
        assert_eq!(parse_sidebar_width(Some("9999")), SIDEBAR_MAX_WIDTH);
    }
}
