//! REST endpoint paths and base-URL resolution.
//!
//! Paths are relative to the API base (`…/api/v1`). Query strings are added
//! by the HTTP client so values get encoded there.

use serde::{Deserialize, Serialize};

/// Used when neither the host nor the build provides a base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1";

/// Served by the static host at `GET /config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeConfig {
    pub api_url: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

/// Picks the first non-blank candidate, without trailing slashes.
pub fn resolve_api_url(candidates: &[Option<&str>]) -> String {
    candidates
        .iter()
        .flatten()
        .map(|c| c.trim().trim_end_matches('/'))
        .find(|c| !c.is_empty())
        .unwrap_or(DEFAULT_API_URL)
        .to_string()
}

/// Joins a base URL and an endpoint path with exactly one slash.
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

pub fn templates() -> String {
    "/templates".to_string()
}

pub fn template(id: &str) -> String {
    format!("/templates/{id}")
}

pub fn template_fields(id: &str) -> String {
    format!("/templates/{id}/fields")
}

pub fn template_html_preview(id: &str) -> String {
    format!("/templates/{id}/html-preview")
}

pub fn template_upload() -> String {
    "/templates/upload".to_string()
}

pub fn template_process(id: &str) -> String {
    format!("/templates/{id}/process")
}

pub fn ocr_extract() -> String {
    "/ocr/extract".to_string()
}

pub fn address_search() -> String {
    "/address/search".to_string()
}

pub fn console_data_types() -> String {
    "/console/data-types".to_string()
}

pub fn console_data_type(id: &str) -> String {
    format!("/console/data-types/{id}")
}

pub fn console_filters() -> String {
    "/console/filters".to_string()
}

pub fn console_filter(id: &str) -> String {
    format!("/console/filters/{id}")
}

pub fn console_doctypes() -> String {
    "/console/doctypes".to_string()
}

pub fn console_doctype(id: &str) -> String {
    format!("/console/doctypes/{id}")
}

pub fn console_doctype_suggestions() -> String {
    "/console/doctypes/suggestions".to_string()
}

pub fn stats() -> String {
    "/stats".to_string()
}

pub fn auth_register() -> String {
    "/auth/register".to_string()
}

pub fn auth_login() -> String {
    "/auth/login".to_string()
}

pub fn auth_google_login() -> String {
    "/auth/google/login".to_string()
}

pub fn auth_me() -> String {
    "/auth/me".to_string()
}

pub fn auth_profile() -> String {
    "/auth/profile".to_string()
}

pub fn auth_profile_picture() -> String {
    "/auth/profile/picture".to_string()
}

pub fn admin_users() -> String {
    "/admin/users".to_string()
}

pub fn admin_user_quota(id: &str) -> String {
    format!("/admin/users/{id}/quota")
}

pub fn admin_user_roles(id: &str) -> String {
    format!("/admin/users/{id}/roles")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn base_url_resolution() {
        assert_eq!(resolve_api_url(&[None, Some("  ")]), DEFAULT_API_URL);
        assert_eq!(
            resolve_api_url(&[Some("https://api.dooform.com/api/v1/"), Some("http://other")]),
            "https://api.dooform.com/api/v1"
        );
        assert_eq!(resolve_api_url(&[None, Some("http://x/api")]), "http://x/api");
    }

    #[test]
    fn urls_join_with_one_slash() {
        assert_eq!(join_url("http://h/api/v1/", &template_fields("t1")), "http://h/api/v1/templates/t1/fields");
        assert_eq!(join_url("http://h", &admin_user_roles("u")), "http://h/admin/users/u/roles");
    }

    #[test]
    fn runtime_config_json_shape() {
        let json = serde_json::to_string(&RuntimeConfig::default()).unwrap();
        assert_eq!(json, r#"{"apiUrl":"http://localhost:8080/api/v1"}"#);
    }
}
