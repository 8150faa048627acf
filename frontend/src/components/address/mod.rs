//! Thai address autocomplete input.
//!
//! Typing waits for a 300 ms pause before searching. Each search takes a new
//! generation ticket and aborts the request it supersedes, so only the
//! latest query can populate the list. Answers are cached per normalized
//! query.

use crate::api::Api;
use crate::helpers::input_value;
use common::address::{is_searchable, AddressCache, SearchGeneration, ADDRESS_DEBOUNCE_MS};
use common::model::address::AddressResult;
use gloo_console::error;
use gloo_timers::callback::Timeout;
use web_sys::AbortController;
use yew::platform::spawn_local;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct AddressAutocompleteProps {
    pub api: Api,
    pub value: AttrValue,
    #[prop_or_default]
    pub placeholder: AttrValue,
    #[prop_or_default]
    pub invalid: bool,
    pub on_input: Callback<String>,
    pub on_select: Callback<AddressResult>,
}

pub enum Msg {
    Input(String),
    Search(String),
    Results {
        ticket: u64,
        query: String,
        results: Vec<AddressResult>,
    },
    Failed {
        ticket: u64,
        message: String,
    },
    Select(usize),
    Close,
}

pub struct AddressAutocomplete {
    cache: AddressCache,
    generation: SearchGeneration,
    in_flight: Option<AbortController>,
    debounce: Option<Timeout>,
    results: Vec<AddressResult>,
    open: bool,
    loading: bool,
}

impl AddressAutocomplete {
    fn cancel_pending(&mut self) {
        self.debounce = None;
        if let Some(controller) = self.in_flight.take() {
            controller.abort();
        }
    }
}

impl Component for AddressAutocomplete {
    type Message = Msg;
    type Properties = AddressAutocompleteProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            cache: AddressCache::default(),
            generation: SearchGeneration::default(),
            in_flight: None,
            debounce: None,
            results: Vec::new(),
            open: false,
            loading: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Input(text) => {
                ctx.props().on_input.emit(text.clone());
                self.cancel_pending();
                // Invalidate whatever is still on its way back.
                self.generation.next();
                self.loading = false;

                if !is_searchable(&text) {
                    self.results.clear();
                    self.open = false;
                    return true;
                }
                if let Some(cached) = self.cache.get(&text) {
                    self.results = cached.to_vec();
                    self.open = !self.results.is_empty();
                    return true;
                }
                let link = ctx.link().clone();
                self.debounce = Some(Timeout::new(ADDRESS_DEBOUNCE_MS, move || {
                    link.send_message(Msg::Search(text));
                }));
                true
            }
            Msg::Search(query) => {
                self.debounce = None;
                if let Some(controller) = self.in_flight.take() {
                    controller.abort();
                }
                let ticket = self.generation.next();
                let controller = AbortController::new().ok();
                let signal = controller.as_ref().map(|c| c.signal());
                self.in_flight = controller;
                self.loading = true;

                let api = ctx.props().api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    match api.search_address(&query, signal.as_ref()).await {
                        Ok(results) => link.send_message(Msg::Results {
                            ticket,
                            query,
                            results,
                        }),
                        Err(err) => link.send_message(Msg::Failed {
                            ticket,
                            message: err.to_string(),
                        }),
                    }
                });
                true
            }
            Msg::Results {
                ticket,
                query,
                results,
            } => {
                self.cache.insert(&query, results.clone());
                if !self.generation.is_current(ticket) {
                    return false;
                }
                self.in_flight = None;
                self.loading = false;
                self.open = !results.is_empty();
                self.results = results;
                true
            }
            Msg::Failed { ticket, message } => {
                if !self.generation.is_current(ticket) {
                    // Aborted or superseded.
                    return false;
                }
                error!(format!("Address search failed: {message}"));
                self.in_flight = None;
                self.loading = false;
                self.results.clear();
                self.open = false;
                true
            }
            Msg::Select(index) => {
                if let Some(result) = self.results.get(index).cloned() {
                    ctx.props().on_select.emit(result);
                }
                self.open = false;
                true
            }
            Msg::Close => {
                let changed = self.open;
                self.open = false;
                changed
            }
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.cancel_pending();
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let props = ctx.props();

        html! {
            <div class="autocomplete">
                <input
                    class={classes!(props.invalid.then_some("invalid"))}
                    value={props.value.clone()}
                    placeholder={props.placeholder.clone()}
                    autocomplete="off"
                    oninput={link.callback(|e: InputEvent| Msg::Input(input_value(&e)))}
                    onblur={link.callback(|_| Msg::Close)}
                />
                if self.loading {
                    <span class="autocomplete-loading material-icons">{"autorenew"}</span>
                }
                if self.open {
                    <ul class="autocomplete-list">
                        { for self.results.iter().enumerate().map(|(i, result)| html! {
                            // mousedown fires before the input's blur closes the list.
                            <li onmousedown={link.callback(move |e: MouseEvent| {
                                e.prevent_default();
                                Msg::Select(i)
                            })}>
                                { result.label() }
                            </li>
                        }) }
                    </ul>
                }
            </div>
        }
    }
}
