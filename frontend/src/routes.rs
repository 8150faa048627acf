//! Hash-based routing.
//!
//! The static host serves `index.html` for every path, but routes live in the
//! fragment so deep links also work from a plain file server.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    /// Landing page after the Google redirect; carries the ID token.
    GoogleCallback(String),
    Templates,
    Fill(String),
    Editor(String),
    Console,
    AdminUsers,
    Profile,
    NotFound,
}

impl Route {
    pub fn parse(hash: &str) -> Route {
        let hash = hash.trim_start_matches('#').trim_start_matches('/');
        // Google's implicit flow appends its answer as a bare fragment.
        if hash.starts_with("id_token=") || hash.contains("&id_token=") {
            return match query_param(hash, "id_token") {
                Some(token) => Route::GoogleCallback(token),
                None => Route::Login,
            };
        }
        let (path, query) = hash.split_once('?').unwrap_or((hash, ""));
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] | ["templates"] => Route::Templates,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["auth", "google"] => match query_param(query, "id_token") {
                Some(token) => Route::GoogleCallback(token),
                None => Route::Login,
            },
            ["fill", id] => Route::Fill(id.to_string()),
            ["editor", id] => Route::Editor(id.to_string()),
            ["console"] => Route::Console,
            ["admin", "users"] => Route::AdminUsers,
            ["profile"] => Route::Profile,
            _ => Route::NotFound,
        }
    }

    pub fn to_hash(&self) -> String {
        match self {
            Route::Login => "#/login".to_string(),
            Route::Register => "#/register".to_string(),
            Route::GoogleCallback(token) => format!("#/auth/google?id_token={token}"),
            Route::Templates => "#/templates".to_string(),
            Route::Fill(id) => format!("#/fill/{id}"),
            Route::Editor(id) => format!("#/editor/{id}"),
            Route::Console => "#/console".to_string(),
            Route::AdminUsers => "#/admin/users".to_string(),
            Route::Profile => "#/profile".to_string(),
            Route::NotFound => "#/404".to_string(),
        }
    }

    /// Pages reachable without a session.
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login | Route::Register | Route::GoogleCallback(_))
    }

    pub fn requires_admin(&self) -> bool {
        matches!(self, Route::Console | Route::AdminUsers | Route::Editor(_))
    }
}

fn query_param(query: &str, name: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

pub fn current() -> Route {
    let hash = web_sys::window()
        .and_then(|w| w.location().hash().ok())
        .unwrap_or_default();
    Route::parse(&hash)
}

pub fn navigate(route: &Route) {
    if let Some(window) = web_sys::window() {
        let _ = window.location().set_hash(&route.to_hash());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_every_page() {
        assert_eq!(Route::parse(""), Route::Templates);
        assert_eq!(Route::parse("#/"), Route::Templates);
        assert_eq!(Route::parse("#/login"), Route::Login);
        assert_eq!(Route::parse("#/fill/tpl-1"), Route::Fill("tpl-1".into()));
        assert_eq!(Route::parse("#/editor/tpl-1/"), Route::Editor("tpl-1".into()));
        assert_eq!(Route::parse("#/admin/users"), Route::AdminUsers);
        assert_eq!(Route::parse("#/nowhere"), Route::NotFound);
    }

    #[test]
    fn google_callback_needs_a_token() {
        assert_eq!(
            Route::parse("#/auth/google?state=x&id_token=abc.def.ghi"),
            Route::GoogleCallback("abc.def.ghi".into())
        );
        assert_eq!(Route::parse("#/auth/google?id_token="), Route::Login);
        assert_eq!(
            Route::parse("#state=s&id_token=jwt&authuser=0"),
            Route::GoogleCallback("jwt".into())
        );
    }

    #[test]
    fn hashes_parse_back() {
        for route in [
            Route::Login,
            Route::Templates,
            Route::Fill("a".into()),
            Route::Editor("b".into()),
            Route::Console,
            Route::AdminUsers,
            Route::Profile,
        ] {
            assert_eq!(Route::parse(&route.to_hash()), route);
        }
    }

    #[test]
    fn access_rules() {
        assert!(Route::Login.is_public());
        assert!(!Route::Templates.is_public());
        assert!(Route::Console.requires_admin());
        assert!(!Route::Fill("x".into()).requires_admin());
    }
}
