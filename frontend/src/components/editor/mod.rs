//! Field editor: root module wiring the `Component` implementation with
//! submodules for state, update logic, view rendering and dialogs.
//!
//! On first render it loads the template, its saved field definitions (or
//! detected defaults when none are saved) and the console data types.

use common::errors::handle_api_error;
use gloo_console::error;
use yew::platform::spawn_local;
use yew::prelude::*;

mod dialogs;
mod messages;
mod props;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use props::EditorProps;
pub use state::EditorComponent;

use crate::helpers::set_window_dirty_flag;

impl Component for EditorComponent {
    type Message = Msg;
    type Properties = EditorProps;

    fn create(_ctx: &Context<Self>) -> Self {
        EditorComponent::new()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        if old_props.template_id != ctx.props().template_id {
            *self = EditorComponent::new();
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

    fn destroy(&mut self, _ctx: &Context<Self>) {
        set_window_dirty_flag(false);
    }
}

fn load(ctx: &Context<EditorComponent>) {
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
                error!(format!("Loading editor for {template_id} failed: {err}"));
                link.send_message(Msg::LoadFailed(handle_api_error(&err)));
                return;
            }
        }
        match api.list_data_types().await {
            Ok(types) => link.send_message(Msg::DataTypesLoaded(types)),
            Err(err) => error!(format!("Loading data types failed: {err}")),
        }
    });
}
