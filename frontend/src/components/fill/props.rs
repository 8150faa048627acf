use crate::api::Api;
use yew::prelude::*;

/// Properties for the `FillComponent`.
#[derive(Properties, PartialEq, Clone)]
pub struct FillProps {
    pub api: Api,
    /// Template whose placeholders are being filled. A new id reloads the page.
    pub template_id: AttrValue,
}
