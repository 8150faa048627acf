use crate::api::Api;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct EditorProps {
    pub api: Api,
    pub template_id: AttrValue,
}
