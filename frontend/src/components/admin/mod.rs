//! User administration: quota top-ups and the admin role.

use crate::api::Api;
use crate::helpers::{format_quota, input_value, show_toast};
use crate::tops_sheet::top_sheet::{close_top_sheet, open_top_sheet, TopSheet};
use common::errors::{handle_api_error, ApiError};
use common::form::validation::parse_quota_amount;
use common::model::user::{QuotaInfo, QuotaRequest, UserListItem, ROLE_ADMIN};
use gloo_console::error;
use yew::platform::spawn_local;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct UsersProps {
    pub api: Api,
}

pub enum Msg {
    Loaded(Vec<UserListItem>),
    LoadFailed(String),
    SetFilter(String),
    OpenQuota(String),
    QuotaLoaded(QuotaInfo),
    SetAmount(String),
    SetReason(String),
    AddQuota,
    QuotaAdded(QuotaInfo),
    ToggleAdmin(String),
    RoleChanged { user_id: String, admin: bool },
    RequestFailed(String),
}

pub struct UsersPage {
    users: Vec<UserListItem>,
    filter: String,
    loading: bool,
    error: Option<String>,
    quota_ref: NodeRef,
    quota_user: Option<String>,
    quota: Option<QuotaInfo>,
    amount: String,
    reason: String,
    busy: bool,
}

fn has_admin(user: &UserListItem) -> bool {
    user.roles.iter().any(|r| r == ROLE_ADMIN)
}

fn full_name(user: &UserListItem) -> String {
    let name = format!("{} {}", user.first_name, user.last_name);
    match name.trim() {
        "" => user.email.clone(),
        trimmed => trimmed.to_string(),
    }
}

fn report(link: &yew::html::Scope<UsersPage>, what: &str, err: ApiError) {
    error!(format!("{what} failed: {err}"));
    link.send_message(Msg::RequestFailed(handle_api_error(&err)));
}

impl UsersPage {
    fn visible(&self) -> impl Iterator<Item = &UserListItem> {
        let needle = self.filter.trim().to_lowercase();
        self.users.iter().filter(move |u| {
            needle.is_empty()
                || u.email.to_lowercase().contains(&needle)
                || full_name(u).to_lowercase().contains(&needle)
        })
    }

    fn user(&self, id: &str) -> Option<&UserListItem> {
        self.users.iter().find(|u| u.id == id)
    }
}

impl Component for UsersPage {
    type Message = Msg;
    type Properties = UsersProps;

    fn create(ctx: &Context<Self>) -> Self {
        let api = ctx.props().api.clone();
        let link = ctx.link().clone();
        spawn_local(async move {
            match api.list_users().await {
                Ok(users) => link.send_message(Msg::Loaded(users)),
                Err(err) => {
                    error!(format!("Loading users failed: {err}"));
                    link.send_message(Msg::LoadFailed(handle_api_error(&err)));
                }
            }
        });

        Self {
            users: Vec::new(),
            filter: String::new(),
            loading: true,
            error: None,
            quota_ref: NodeRef::default(),
            quota_user: None,
            quota: None,
            amount: String::new(),
            reason: String::new(),
            busy: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Loaded(users) => {
                self.users = users;
                self.loading = false;
            }
            Msg::LoadFailed(message) => {
                self.loading = false;
                self.error = Some(message);
            }
            Msg::SetFilter(filter) => self.filter = filter,
            Msg::OpenQuota(user_id) => {
                self.quota = None;
                self.amount.clear();
                self.reason.clear();
                self.quota_user = Some(user_id.clone());
                open_top_sheet(self.quota_ref.clone());

                let api = ctx.props().api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    match api.user_quota(&user_id).await {
                        Ok(info) => link.send_message(Msg::QuotaLoaded(info)),
                        Err(err) => report(&link, "Loading quota", err),
                    }
                });
            }
            Msg::QuotaLoaded(info) => self.quota = Some(info),
            Msg::SetAmount(amount) => self.amount = amount,
            Msg::SetReason(reason) => self.reason = reason,
            Msg::AddQuota => {
                let Some(user_id) = self.quota_user.clone() else {
                    return false;
                };
                let amount = match parse_quota_amount(&self.amount) {
                    Ok(amount) => amount,
                    Err(err) => {
                        show_toast(&handle_api_error(&err));
                        return false;
                    }
                };
                let body = QuotaRequest {
                    amount,
                    reason: Some(self.reason.trim().to_string()).filter(|r| !r.is_empty()),
                };
                self.busy = true;
                let api = ctx.props().api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    match api.add_quota(&user_id, &body).await {
                        Ok(info) => link.send_message(Msg::QuotaAdded(info)),
                        Err(err) => report(&link, "Adding quota", err),
                    }
                });
            }
            Msg::QuotaAdded(info) => {
                self.busy = false;
                if let Some(id) = &self.quota_user {
                    if let Some(user) = self.users.iter_mut().find(|u| &u.id == id) {
                        user.quota_remaining = info.remaining;
                    }
                }
                show_toast(&format!("โควตาคงเหลือ {}", format_quota(info.remaining)));
                self.quota = Some(info);
                self.amount.clear();
                self.reason.clear();
                close_top_sheet(self.quota_ref.clone());
            }
            Msg::ToggleAdmin(user_id) => {
                let Some(user) = self.user(&user_id) else {
                    return false;
                };
                let grant = !has_admin(user);
                let api = ctx.props().api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = if grant {
                        api.add_role(&user_id, ROLE_ADMIN).await
                    } else {
                        api.remove_role(&user_id, ROLE_ADMIN).await
                    };
                    match result {
                        Ok(()) => link.send_message(Msg::RoleChanged {
                            user_id,
                            admin: grant,
                        }),
                        Err(err) => report(&link, "Changing role", err),
                    }
                });
                return false;
            }
            Msg::RoleChanged { user_id, admin } => {
                if let Some(user) = self.users.iter_mut().find(|u| u.id == user_id) {
                    user.roles.retain(|r| r != ROLE_ADMIN);
                    if admin {
                        user.roles.push(ROLE_ADMIN.to_string());
                    }
                }
            }
            Msg::RequestFailed(message) => {
                self.busy = false;
                show_toast(&message);
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        html! {
            <div class="page">
                <div class="page-header">
                    <h2>{"ผู้ใช้งาน"}</h2>
                    <input
                        class="search"
                        placeholder="ค้นหาผู้ใช้"
                        value={self.filter.clone()}
                        oninput={link.callback(|e: InputEvent| Msg::SetFilter(input_value(&e)))}
                    />
                </div>
                { self.body(ctx) }
                { self.quota_sheet(ctx) }
            </div>
        }
    }
}

impl UsersPage {
    fn body(&self, ctx: &Context<Self>) -> Html {
        if self.loading {
            return html! { <div class="spinner" /> };
        }
        if let Some(error) = &self.error {
            return html! { <div class="form-error">{ error.clone() }</div> };
        }
        let link = ctx.link();
        html! {
            <table class="user-table">
                <thead>
                    <tr>
                        <th>{"ชื่อ"}</th>
                        <th>{"อีเมล"}</th>
                        <th>{"สิทธิ์"}</th>
                        <th>{"โควตา"}</th>
                        <th />
                    </tr>
                </thead>
                <tbody>
                    { for self.visible().map(|user| {
                        let quota_id = user.id.clone();
                        let role_id = user.id.clone();
                        let admin = has_admin(user);
                        html! {
                            <tr>
                                <td>{ full_name(user) }</td>
                                <td>{ user.email.clone() }</td>
                                <td>{ user.roles.join(", ") }</td>
                                <td>{ format_quota(user.quota_remaining) }</td>
                                <td class="row-actions">
                                    <button class="btn-outline" onclick={link.callback(move |_| Msg::OpenQuota(quota_id.clone()))}>
                                        {"เพิ่มโควตา"}
                                    </button>
                                    <button class="btn-outline" onclick={link.callback(move |_| Msg::ToggleAdmin(role_id.clone()))}>
                                        { if admin { "ถอนสิทธิ์ผู้ดูแล" } else { "ตั้งเป็นผู้ดูแล" } }
                                    </button>
                                </td>
                            </tr>
                        }
                    }) }
                </tbody>
            </table>
        }
    }

    fn quota_sheet(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let title = self
            .quota_user
            .as_deref()
            .and_then(|id| self.user(id))
            .map_or_else(|| "โควตา".to_string(), |u| format!("โควตา: {}", full_name(u)));

        html! {
            <TopSheet node_ref={self.quota_ref.clone()} {title}>
                if let Some(info) = &self.quota {
                    <div class="quota-summary">
                        <span>{ format!("คงเหลือ {}", format_quota(info.remaining)) }</span>
                        <span class="muted">{ format!("ใช้ไปแล้ว {}", format_quota(info.used)) }</span>
                    </div>
                    <ul class="quota-history">
                        { for info.transactions.iter().map(|t| html! {
                            <li>
                                <span>{ format_quota(t.amount) }</span>
                                <span class="muted">{ t.reason.clone().unwrap_or_default() }</span>
                                <span class="muted">{ t.created_at.clone() }</span>
                            </li>
                        }) }
                    </ul>
                } else {
                    <div class="spinner" />
                }
                <div class="form-grid">
                    <input
                        type="number"
                        min="1"
                        placeholder="จำนวน"
                        value={self.amount.clone()}
                        oninput={link.callback(|e: InputEvent| Msg::SetAmount(input_value(&e)))}
                    />
                    <input
                        placeholder="เหตุผล (ไม่บังคับ)"
                        value={self.reason.clone()}
                        oninput={link.callback(|e: InputEvent| Msg::SetReason(input_value(&e)))}
                    />
                    <button class="btn-primary" disabled={self.busy} onclick={link.callback(|_| Msg::AddQuota)}>
                        {"เพิ่มโควตา"}
                    </button>
                </div>
            </TopSheet>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(first: &str, last: &str, roles: &[&str]) -> UserListItem {
        UserListItem {
            id: "u1".into(),
            email: "somchai@example.com".into(),
            first_name: first.into(),
            last_name: last.into(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            quota_remaining: 0,
        }
    }

    #[test]
    fn full_name_falls_back_to_email() {
        assert_eq!(full_name(&item("", " ", &[])), "somchai@example.com");
        assert_eq!(full_name(&item("สมชาย", "ใจดี", &[])), "สมชาย ใจดี");
    }

    #[test]
    fn admin_role_is_detected() {
        assert!(has_admin(&item("a", "b", &["user", ROLE_ADMIN])));
        assert!(!has_admin(&item("a", "b", &["user"])));
    }
}
