//! Form-fill page: loads a template and its field definitions, renders the
//! sections, and turns the collected values into a generated document.
//!
//! Definitions come from the API when the template has been configured;
//! placeholders it does not cover get detected defaults, and a template
//! nobody configured yet is rendered entirely from detection.

use common::errors::handle_api_error;
use gloo_console::error;
use yew::platform::spawn_local;
use yew::prelude::*;

mod messages;
mod props;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use props::FillProps;
pub use state::FillComponent;

impl Component for FillComponent {
    type Message = Msg;
    type Properties = FillProps;

    fn create(_ctx: &Context<Self>) -> Self {
        FillComponent::new()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        if old_props.template_id != ctx.props().template_id {
            *self = FillComponent::new();
            self.loaded = true;
            load(ctx);
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render && !self.loaded {
            self.loaded = true;
            load(ctx);
        }
    }
}

fn load(ctx: &Context<FillComponent>) {
    let api = ctx.props().api.clone();
    let template_id = ctx.props().template_id.to_string();
    let link = ctx.link().clone();
    spawn_local(async move {
        match api.load_template_with_fields(&template_id).await {
            Ok((template, definitions)) => link.send_message(Msg::Loaded {
                template,
                definitions,
            }),
            Err(err) => {
                error!(format!("Loading template {template_id} failed: {err}"));
                link.send_message(Msg::LoadFailed(handle_api_error(&err)));
            }
        }
    });
}
