//! `localStorage` access for the session and the sidebar width.
//!
//! Storage failures (private mode, quota) are logged and otherwise ignored;
//! the app then behaves as if nothing was stored.

use common::auth::{
    decode_session, encode_session, parse_sidebar_width, AUTH_STORAGE_KEY, SIDEBAR_WIDTH_KEY,
};
use common::model::user::AuthResponse;
use gloo_console::error;
use web_sys::Storage;

fn local_storage() -> Option<Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

fn read(key: &str) -> Option<String> {
    local_storage().and_then(|s| s.get_item(key).ok().flatten())
}

fn write(key: &str, value: &str) {
    if let Some(storage) = local_storage() {
        if storage.set_item(key, value).is_err() {
            error!(format!("Unable to persist {key}"));
        }
    }
}

pub fn load_session() -> Option<AuthResponse> {
    read(AUTH_STORAGE_KEY).and_then(|raw| decode_session(&raw))
}

pub fn save_session(session: &AuthResponse) {
    write(AUTH_STORAGE_KEY, &encode_session(session));
}

pub fn clear_session() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(AUTH_STORAGE_KEY);
    }
}

pub fn load_sidebar_width() -> u32 {
    parse_sidebar_width(read(SIDEBAR_WIDTH_KEY).as_deref())
}

pub fn save_sidebar_width(width: u32) {
    write(SIDEBAR_WIDTH_KEY, &width.to_string());
}
