//! Small browser utilities shared by every page.
//!
//! - **User feedback**: `show_toast` injects a transient notification.
//! - **Dirty tracking**: `compute_md5` fingerprints serialized state so pages
//!   can tell whether something changed since the last save, and
//!   `set_window_dirty_flag` mirrors that on `window.app_dirty`.
//! - **Formatting**: thousands separators for counters and quotas.
//! - **Events**: reading values out of input, select and textarea events.

use js_sys::Reflect;
use num_format::{Locale, ToFormattedString};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

/// Displays a temporary notification at the bottom of the screen.
///
/// The text is set with `textContent`, so server messages cannot inject
/// markup. The toast removes itself after three seconds.
pub fn show_toast(message: &str) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let (Ok(toast), Some(body)) = (document.create_element("div"), document.body()) else {
        return;
    };
    toast.set_text_content(Some(message));
    let html_toast: HtmlElement = toast.unchecked_into();
    html_toast.set_class_name("toast");

    if body.append_child(&html_toast).is_ok() {
        wasm_bindgen_futures::spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(3000).await;
            if let Some(parent) = html_toast.parent_node() {
                parent.remove_child(&html_toast).ok();
            }
        });
    }
}

/// Hex MD5 digest of `input`.
pub fn compute_md5(input: &str) -> String {
    format!("{:x}", md5::compute(input))
}

/// Publishes the unsaved-changes state on `window.app_dirty` so the page
/// shell can warn before navigating away.
pub fn set_window_dirty_flag(dirty: bool) {
    if let Some(window) = web_sys::window() {
        let _ = Reflect::set(
            &window,
            &JsValue::from_str("app_dirty"),
            &JsValue::from_bool(dirty),
        );
    }
}

pub fn format_count(value: u64) -> String {
    value.to_formatted_string(&Locale::en)
}

pub fn format_quota(value: i64) -> String {
    value.to_formatted_string(&Locale::en)
}

pub fn input_value(e: &InputEvent) -> String {
    let input: HtmlInputElement = e.target_unchecked_into();
    input.value()
}

pub fn textarea_value(e: &InputEvent) -> String {
    let input: HtmlTextAreaElement = e.target_unchecked_into();
    input.value()
}

pub fn select_value(e: &Event) -> String {
    let select: HtmlSelectElement = e.target_unchecked_into();
    select.value()
}

pub fn checkbox_checked(e: &Event) -> bool {
    let input: HtmlInputElement = e.target_unchecked_into();
    input.checked()
}

/// First file chosen in a file input, if any.
pub fn selected_file(e: &Event) -> Option<web_sys::File> {
    let input: HtmlInputElement = e.target_unchecked_into();
    let file = input.files().and_then(|files| files.get(0));
    // Reset so picking the same file again fires another change event.
    input.set_value("");
    file
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn md5_is_stable_hex() {
        assert_eq!(compute_md5(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(compute_md5("{}").len(), 32);
    }

    #[test]
    fn counters_get_thousands_separators() {
        assert_eq!(format_count(1_234_567), "1,234,567");
        assert_eq!(format_quota(-1500), "-1,500");
        assert_eq!(format_count(12), "12");
    }
}
