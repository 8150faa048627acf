//! Sign-in and registration page.
//!
//! Email/password both go straight to the API. Google sign-in is offered when
//! the build sets `DOOFORM_GOOGLE_CLIENT_ID`: the browser leaves for Google and
//! comes back with an `id_token` in the fragment, which the app shell trades
//! for a session.

use crate::api::Api;
use crate::helpers::input_value;
use crate::routes::{self, Route};
use common::errors::{handle_api_error, ApiError};
use common::model::user::{AuthResponse, LoginRequest, RegisterRequest};
use gloo_console::error;
use yew::platform::spawn_local;
use yew::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

#[derive(Properties, PartialEq)]
pub struct LoginProps {
    pub api: Api,
    pub mode: AuthMode,
    pub on_authenticated: Callback<AuthResponse>,
}

pub enum Msg {
    SetEmail(String),
    SetPassword(String),
    SetFirstName(String),
    SetLastName(String),
    Submit,
    Failed(String),
    GoogleSignIn,
}

pub struct LoginPage {
    email: String,
    password: String,
    first_name: String,
    last_name: String,
    loading: bool,
    error: Option<String>,
}

impl LoginPage {
    fn validate(&self, mode: AuthMode) -> Result<(), ApiError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(ApiError::Validation("กรุณากรอกอีเมลและรหัสผ่าน".to_string()));
        }
        if mode == AuthMode::Register && self.first_name.trim().is_empty() {
            return Err(ApiError::Validation("กรุณากรอกชื่อ".to_string()));
        }
        Ok(())
    }
}

fn google_sign_in_url(client_id: &str) -> Option<String> {
    let origin = web_sys::window()?.location().origin().ok()?;
    let redirect = String::from(js_sys::encode_uri_component(&format!("{origin}/")));
    Some(format!(
        "https://accounts.google.com/o/oauth2/v2/auth?client_id={client_id}\
         &redirect_uri={redirect}&response_type=id_token&scope=openid%20email%20profile\
         &nonce={}",
        uuid::Uuid::new_v4()
    ))
}

impl Component for LoginPage {
    type Message = Msg;
    type Properties = LoginProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            loading: false,
            error: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::SetEmail(v) => self.email = v,
            Msg::SetPassword(v) => self.password = v,
            Msg::SetFirstName(v) => self.first_name = v,
            Msg::SetLastName(v) => self.last_name = v,
            Msg::Submit => {
                let mode = ctx.props().mode;
                if let Err(err) = self.validate(mode) {
                    self.error = Some(handle_api_error(&err));
                    return true;
                }
                self.loading = true;
                self.error = None;

                let api = ctx.props().api.clone();
                let on_authenticated = ctx.props().on_authenticated.clone();
                let link = ctx.link().clone();
                let email = self.email.trim().to_string();
                let password = self.password.clone();
                let first_name = self.first_name.trim().to_string();
                let last_name = self.last_name.trim().to_string();
                spawn_local(async move {
                    let result = match mode {
                        AuthMode::Login => api.login(&LoginRequest { email, password }).await,
                        AuthMode::Register => {
                            api.register(&RegisterRequest {
                                email,
                                password,
                                first_name,
                                last_name,
                            })
                            .await
                        }
                    };
                    match result {
                        Ok(session) => on_authenticated.emit(session),
                        Err(err) => {
                            error!(format!("Authentication failed: {err}"));
                            link.send_message(Msg::Failed(handle_api_error(&err)));
                        }
                    }
                });
            }
            Msg::Failed(message) => {
                self.loading = false;
                self.error = Some(message);
            }
            Msg::GoogleSignIn => {
                let target = option_env!("DOOFORM_GOOGLE_CLIENT_ID").and_then(google_sign_in_url);
                if let (Some(url), Some(window)) = (target, web_sys::window()) {
                    let _ = window.location().set_href(&url);
                }
                return false;
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let mode = ctx.props().mode;
        let register = mode == AuthMode::Register;
        let onsubmit = link.callback(|e: SubmitEvent| {
            e.prevent_default();
            Msg::Submit
        });

        html! {
            <div class="auth-page">
                <form class="auth-card" {onsubmit}>
                    <h1>{ if register { "สมัครสมาชิก" } else { "เข้าสู่ระบบ" } }</h1>
                    if register {
                        <input
                            placeholder="ชื่อ"
                            value={self.first_name.clone()}
                            oninput={link.callback(|e: InputEvent| Msg::SetFirstName(input_value(&e)))}
                        />
                        <input
                            placeholder="นามสกุล"
                            value={self.last_name.clone()}
                            oninput={link.callback(|e: InputEvent| Msg::SetLastName(input_value(&e)))}
                        />
                    }
                    <input
                        type="email"
                        placeholder="อีเมล"
                        value={self.email.clone()}
                        oninput={link.callback(|e: InputEvent| Msg::SetEmail(input_value(&e)))}
                    />
                    <input
                        type="password"
                        placeholder="รหัสผ่าน"
                        value={self.password.clone()}
                        oninput={link.callback(|e: InputEvent| Msg::SetPassword(input_value(&e)))}
                    />
                    if let Some(error) = &self.error {
                        <div class="form-error">{ error.clone() }</div>
                    }
                    <button class="btn-primary" type="submit" disabled={self.loading}>
                        { if self.loading { "กำลังดำเนินการ..." } else if register { "สมัครสมาชิก" } else { "เข้าสู่ระบบ" } }
                    </button>
                    if option_env!("DOOFORM_GOOGLE_CLIENT_ID").is_some() {
                        <button class="btn-outline" type="button" onclick={link.callback(|_| Msg::GoogleSignIn)}>
                            {"เข้าสู่ระบบด้วย Google"}
                        </button>
                    }
                    <button
                        class="btn-text"
                        type="button"
                        onclick={Callback::from(move |_: MouseEvent| {
                            routes::navigate(if register { &Route::Login } else { &Route::Register })
                        })}
                    >
                        { if register { "มีบัญชีอยู่แล้ว? เข้าสู่ระบบ" } else { "ยังไม่มีบัญชี? สมัครสมาชิก" } }
                    </button>
                </form>
            </div>
        }
    }
}
