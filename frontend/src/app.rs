//! Application shell: resolves the API base URL, restores the session from
//! `localStorage`, follows the URL fragment and lays out the sidebar next to
//! the active page.

use crate::api::{load_base_url, Api};
use crate::components::admin::UsersPage;
use crate::components::auth::{AuthMode, LoginPage};
use crate::components::console::ConsolePage;
use crate::components::editor::EditorComponent;
use crate::components::fill::FillComponent;
use crate::components::layout::Sidebar;
use crate::components::profile::ProfilePage;
use crate::components::templates::TemplateListPage;
use crate::helpers::show_toast;
use crate::routes::{self, Route};
use crate::storage;
use common::auth::{SIDEBAR_MAX_WIDTH, SIDEBAR_MIN_WIDTH};
use common::errors::handle_api_error;
use common::model::user::{AuthResponse, User};
use gloo_console::{error, log};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use yew::platform::spawn_local;
use yew::prelude::*;

pub struct App {
    route: Route,
    api: Option<Api>,
    session: Option<AuthResponse>,
    sidebar_width: u32,
    resizing: bool,
    _hash_listener: Option<Closure<dyn Fn()>>,
}

pub enum Msg {
    RouteChanged(Route),
    BaseUrlLoaded(String),
    SessionStarted(AuthResponse),
    UserRefreshed(User),
    Logout,
    StartResize,
    Resize(i32),
    StopResize,
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link().clone();
        spawn_local(async move {
            link.send_message(Msg::BaseUrlLoaded(load_base_url().await));
        });

        Self {
            route: routes::current(),
            api: None,
            session: storage::load_session(),
            sidebar_width: storage::load_sidebar_width(),
            resizing: false,
            _hash_listener: listen_hash_changes(ctx),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::RouteChanged(route) => {
                self.route = route;
                self.handle_route(ctx);
                true
            }
            Msg::BaseUrlLoaded(base_url) => {
                let token = self.session.as_ref().map(|s| s.access_token.clone());
                self.api = Some(Api::new(base_url, token));
                if self.session.is_some() {
                    self.refresh_user(ctx);
                }
                self.handle_route(ctx);
                true
            }
            Msg::SessionStarted(session) => {
                storage::save_session(&session);
                self.api = self
                    .api
                    .as_ref()
                    .map(|api| api.with_token(Some(session.access_token.clone())));
                log!(format!("Signed in as {}", session.user.email));
                self.session = Some(session);
                routes::navigate(&Route::Templates);
                true
            }
            Msg::UserRefreshed(user) => {
                if let Some(session) = &mut self.session {
                    session.user = user;
                    storage::save_session(session);
                }
                true
            }
            Msg::Logout => {
                storage::clear_session();
                self.session = None;
                self.api = self.api.as_ref().map(|api| api.with_token(None));
                routes::navigate(&Route::Login);
                true
            }
            Msg::StartResize => {
                self.resizing = true;
                false
            }
            Msg::Resize(x) => {
                if !self.resizing {
                    return false;
                }
                let width = (x.max(0) as u32).clamp(SIDEBAR_MIN_WIDTH, SIDEBAR_MAX_WIDTH);
                let changed = width != self.sidebar_width;
                self.sidebar_width = width;
                changed
            }
            Msg::StopResize => {
                if self.resizing {
                    self.resizing = false;
                    storage::save_sidebar_width(self.sidebar_width);
                }
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let Some(api) = self.api.clone() else {
            return html! { <div class="app-loading">{"กำลังโหลด..."}</div> };
        };
        let link = ctx.link();

        let Some(session) = &self.session else {
            let mode = if self.route == Route::Register {
                AuthMode::Register
            } else {
                AuthMode::Login
            };
            return html! {
                <LoginPage
                    {api}
                    {mode}
                    on_authenticated={link.callback(Msg::SessionStarted)}
                />
            };
        };

        html! {
            <div
                class={classes!("app-shell", self.resizing.then_some("resizing"))}
                onmousemove={link.callback(|e: MouseEvent| Msg::Resize(e.client_x()))}
                onmouseup={link.callback(|_| Msg::StopResize)}
                onmouseleave={link.callback(|_| Msg::StopResize)}
            >
                <Sidebar
                    user={session.user.clone()}
                    route={self.route.clone()}
                    width={self.sidebar_width}
                    on_logout={link.callback(|_| Msg::Logout)}
                    on_resize_start={link.callback(|_| Msg::StartResize)}
                />
                <main class="app-main">
                    { self.page(api, &session.user, ctx) }
                </main>
            </div>
        }
    }
}

impl App {
    fn page(&self, api: Api, user: &User, ctx: &Context<Self>) -> Html {
        if self.route.requires_admin() && !user.is_admin() {
            return html! {
                <div class="empty-state">{ common::errors::FORBIDDEN }</div>
            };
        }
        match &self.route {
            Route::Templates | Route::Login | Route::Register | Route::GoogleCallback(_) => html! {
                <TemplateListPage {api} is_admin={user.is_admin()} />
            },
            Route::Fill(id) => html! {
                <FillComponent {api} template_id={id.clone()} />
            },
            Route::Editor(id) => html! {
                <EditorComponent {api} template_id={id.clone()} />
            },
            Route::Console => html! { <ConsolePage {api} /> },
            Route::AdminUsers => html! { <UsersPage {api} /> },
            Route::Profile => html! {
                <ProfilePage
                    {api}
                    user={user.clone()}
                    on_updated={ctx.link().callback(Msg::UserRefreshed)}
                />
            },
            Route::NotFound => html! {
                <div class="empty-state">{ common::errors::NOT_FOUND }</div>
            },
        }
    }

    /// Redirects according to the session, and completes a Google sign-in
    /// once the API location is known.
    fn handle_route(&self, ctx: &Context<Self>) {
        let Some(api) = self.api.clone() else {
            return;
        };
        match &self.route {
            Route::GoogleCallback(id_token) => {
                let link = ctx.link().clone();
                let id_token = id_token.clone();
                spawn_local(async move {
                    match api.google_login(&id_token).await {
                        Ok(session) => link.send_message(Msg::SessionStarted(session)),
                        Err(err) => {
                            error!(format!("Google sign-in failed: {err}"));
                            show_toast(&handle_api_error(&err));
                            routes::navigate(&Route::Login);
                        }
                    }
                });
            }
            route if route.is_public() && self.session.is_some() => {
                routes::navigate(&Route::Templates);
            }
            route if !route.is_public() && self.session.is_none() => {
                routes::navigate(&Route::Login);
            }
            _ => {}
        }
    }

    /// Reloads the signed-in user. A 401 only warns; the session is kept.
    fn refresh_user(&self, ctx: &Context<Self>) {
        let Some(api) = self.api.clone() else {
            return;
        };
        let link = ctx.link().clone();
        spawn_local(async move {
            match api.me().await {
                Ok(user) => link.send_message(Msg::UserRefreshed(user)),
                Err(err) => {
                    error!(format!("Unable to refresh the current user: {err}"));
                    if err.is_unauthorized() {
                        show_toast(&handle_api_error(&err));
                    }
                }
            }
        });
    }
}

fn listen_hash_changes(ctx: &Context<App>) -> Option<Closure<dyn Fn()>> {
    let window = web_sys::window()?;
    let link = ctx.link().clone();
    let listener = Closure::<dyn Fn()>::new(move || {
        link.send_message(Msg::RouteChanged(routes::current()));
    });
    window
        .add_event_listener_with_callback("hashchange", listener.as_ref().unchecked_ref())
        .ok()?;
    Some(listener)
}
