//! Host configuration read from the environment at startup.
//!
//! | variable               | default                          |
//! |------------------------|----------------------------------|
//! | `DOOFORM_HOST`         | `127.0.0.1`                      |
//! | `DOOFORM_PORT`         | `3000`                           |
//! | `DOOFORM_API_URL`      | `http://localhost:8080/api/v1`   |
//! | `DOOFORM_OPEN_BROWSER` | `false`                          |

use common::requests::{resolve_api_url, RuntimeConfig};

#[derive(Debug, Clone, PartialEq)]
pub struct HostConfig {
    pub host: String,
    pub port: u16,
    pub api_url: String,
    pub open_browser: bool,
}

impl HostConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source; unparsable values
    /// fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("DOOFORM_HOST")
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("DOOFORM_PORT")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(3000);
        let api_url = resolve_api_url(&[lookup("DOOFORM_API_URL").as_deref()]);
        let open_browser = lookup("DOOFORM_OPEN_BROWSER")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            host,
            port,
            api_url,
            open_browser,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            api_url: self.api_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_unset_or_invalid() {
        let config = HostConfig::from_lookup(lookup(&[("DOOFORM_PORT", "http")]));
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.api_url, "http://localhost:8080/api/v1");
        assert!(!config.open_browser);
        assert_eq!(config.url(), "http://127.0.0.1:3000");
    }

    #[test]
    fn values_are_read_from_the_environment() {
        let config = HostConfig::from_lookup(lookup(&[
            ("DOOFORM_HOST", "0.0.0.0"),
            ("DOOFORM_PORT", "8081"),
            ("DOOFORM_API_URL", "https://api.dooform.com/api/v1/"),
            ("DOOFORM_OPEN_BROWSER", "TRUE"),
        ]));
        assert_eq!(config.port, 8081);
        assert_eq!(config.runtime_config().api_url, "https://api.dooform.com/api/v1");
        assert!(config.open_browser);
    }
}
