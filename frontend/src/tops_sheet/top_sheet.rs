use gloo_timers::callback::Timeout;
use uuid::Uuid;
use yew::{html, AttrValue, Callback, Component, Context, Html, NodeRef, Properties};

/// Sliding panel used for the editor and admin dialogs. Visibility is driven
/// by the `show` class so the slide-in transition runs.
pub struct TopSheet {
    pub id: String,
}

#[derive(Properties, PartialEq)]
pub struct Props {
    #[prop_or_default]
    pub children: Html,
    pub node_ref: NodeRef,
    #[prop_or_default]
    pub title: AttrValue,
    #[prop_or_default]
    pub on_close: Callback<()>,
}

pub enum Msg {
    Close,
}

impl Component for TopSheet {
    type Message = Msg;
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            id: format!("sheet-{}", Uuid::new_v4()),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Close => {
                close_top_sheet(ctx.props().node_ref.clone());
                ctx.props().on_close.emit(());
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        html! {
            <div class="top-sheet" id={self.id.clone()} ref={props.node_ref.clone()}>
                <div class="top-sheet-header">
                    <h3>{ props.title.clone() }</h3>
                    <button class="icon-btn" title="ปิด" onclick={ctx.link().callback(|_| Msg::Close)}>
                        <span class="material-icons">{"close"}</span>
                    </button>
                </div>
                <div class="top-sheet-body">
                    { props.children.clone() }
                </div>
            </div>
        }
    }
}

fn toggle_show(top_sheet_ref: NodeRef, visible: bool) {
    // Deferred so a sheet rendered in the same update exists in the DOM.
    Timeout::new(50, move || {
        if let Some(sheet) = top_sheet_ref.cast::<web_sys::HtmlElement>() {
            let classes = sheet.class_list();
            let _ = if visible {
                classes.add_1("show")
            } else {
                classes.remove_1("show")
            };
        }
    })
    .forget();
}

pub fn open_top_sheet(top_sheet_ref: NodeRef) {
    toggle_show(top_sheet_ref, true);
}

pub fn close_top_sheet(top_sheet_ref: NodeRef) {
    toggle_show(top_sheet_ref, false);
}
