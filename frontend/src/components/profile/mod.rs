//! Profile page: edit the display name and remove the stored picture.

use crate::api::Api;
use crate::helpers::{input_value, show_toast};
use common::errors::{handle_api_error, ApiError};
use common::model::user::{ProfileUpdate, User};
use gloo_console::error;
use yew::platform::spawn_local;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ProfileProps {
    pub api: Api,
    pub user: User,
    pub on_updated: Callback<User>,
}

pub enum Msg {
    SetFirstName(String),
    SetLastName(String),
    Save,
    Saved(User),
    DeletePicture,
    PictureDeleted,
    Failed(String),
}

pub struct ProfilePage {
    first_name: String,
    last_name: String,
    saving: bool,
}

fn profile_update(first_name: &str, last_name: &str) -> Result<ProfileUpdate, ApiError> {
    let first_name = first_name.trim();
    if first_name.is_empty() {
        return Err(ApiError::Validation("กรุณากรอกชื่อ".into()));
    }
    Ok(ProfileUpdate {
        first_name: first_name.to_string(),
        last_name: last_name.trim().to_string(),
    })
}

impl Component for ProfilePage {
    type Message = Msg;
    type Properties = ProfileProps;

    fn create(ctx: &Context<Self>) -> Self {
        let user = &ctx.props().user;
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            saving: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::SetFirstName(value) => self.first_name = value,
            Msg::SetLastName(value) => self.last_name = value,
            Msg::Save => {
                let body = match profile_update(&self.first_name, &self.last_name) {
                    Ok(body) => body,
                    Err(err) => {
                        show_toast(&handle_api_error(&err));
                        return false;
                    }
                };
                self.saving = true;
                let api = ctx.props().api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    match api.update_profile(&body).await {
                        Ok(user) => link.send_message(Msg::Saved(user)),
                        Err(err) => {
                            error!(format!("Profile update failed: {err}"));
                            link.send_message(Msg::Failed(handle_api_error(&err)));
                        }
                    }
                });
            }
            Msg::Saved(user) => {
                self.saving = false;
                show_toast("บันทึกโปรไฟล์แล้ว");
                ctx.props().on_updated.emit(user);
            }
            Msg::DeletePicture => {
                let api = ctx.props().api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    match api.delete_profile_picture().await {
                        Ok(()) => link.send_message(Msg::PictureDeleted),
                        Err(err) => {
                            error!(format!("Deleting profile picture failed: {err}"));
                            link.send_message(Msg::Failed(handle_api_error(&err)));
                        }
                    }
                });
                return false;
            }
            Msg::PictureDeleted => {
                let mut user = ctx.props().user.clone();
                user.picture_url = None;
                ctx.props().on_updated.emit(user);
            }
            Msg::Failed(message) => {
                self.saving = false;
                show_toast(&message);
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let user = &ctx.props().user;
        html! {
            <div class="page profile-page">
                <div class="page-header"><h2>{"โปรไฟล์"}</h2></div>
                <div class="profile-picture">
                    if let Some(url) = &user.picture_url {
                        <img src={url.clone()} alt="avatar" />
                        <button class="btn-outline" onclick={link.callback(|_| Msg::DeletePicture)}>
                            {"ลบรูปโปรไฟล์"}
                        </button>
                    } else {
                        <span class="material-icons avatar-placeholder">{"account_circle"}</span>
                    }
                </div>
                <div class="form-grid">
                    <label>{"อีเมล"}</label>
                    <input value={user.email.clone()} disabled=true />
                    <label>{"ชื่อ"}</label>
                    <input
                        value={self.first_name.clone()}
                        oninput={link.callback(|e: InputEvent| Msg::SetFirstName(input_value(&e)))}
                    />
                    <label>{"นามสกุล"}</label>
                    <input
                        value={self.last_name.clone()}
                        oninput={link.callback(|e: InputEvent| Msg::SetLastName(input_value(&e)))}
                    />
                    <label>{"สิทธิ์"}</label>
                    <span>{ user.roles.join(", ") }</span>
                    <button class="btn-primary" disabled={self.saving} onclick={link.callback(|_| Msg::Save)}>
                        { if self.saving { "กำลังบันทึก..." } else { "บันทึก" } }
                    </button>
                </div>
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_update_trims_names() {
        let body = profile_update(" สมหญิง ", " ดีใจ ").unwrap();
        assert_eq!(body.first_name, "สมหญิง");
        assert_eq!(body.last_name, "ดีใจ");
    }

    #[test]
    fn blank_first_name_is_rejected() {
        assert!(matches!(profile_update("  ", "x"), Err(ApiError::Validation(_))));
    }
}
