use crate::routes::Route;
use common::model::user::User;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct SidebarProps {
    pub user: User,
    pub route: Route,
    pub width: u32,
    pub on_logout: Callback<()>,
    /// Fired on mouse down over the drag handle; the shell tracks the drag.
    pub on_resize_start: Callback<()>,
}

fn nav_item(route: &Route, current: &Route, icon: &str, label: &str) -> Html {
    let active = match (route, current) {
        (Route::Templates, Route::Fill(_) | Route::Editor(_)) => true,
        _ => route == current,
    };
    html! {
        <a class={classes!("nav-item", active.then_some("active"))} href={route.to_hash()}>
            <span class="material-icons">{ icon.to_string() }</span>
            <span>{ label.to_string() }</span>
        </a>
    }
}

#[function_component(Sidebar)]
pub fn sidebar(props: &SidebarProps) -> Html {
    let on_logout = {
        let cb = props.on_logout.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };
    let on_resize_start = {
        let cb = props.on_resize_start.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            cb.emit(());
        })
    };
    let current = &props.route;

    html! {
        <aside class="sidebar" style={format!("width: {}px;", props.width)}>
            <div class="sidebar-brand">{"Dooform"}</div>
            <nav>
                { nav_item(&Route::Templates, current, "description", "เอกสาร") }
                if props.user.is_admin() {
                    { nav_item(&Route::Console, current, "tune", "คอนโซล") }
                    { nav_item(&Route::AdminUsers, current, "group", "ผู้ใช้งาน") }
                }
                { nav_item(&Route::Profile, current, "person", "โปรไฟล์") }
            </nav>
            <div class="sidebar-footer">
                <div class="sidebar-user">
                    if let Some(picture) = &props.user.picture_url {
                        <img class="avatar" src={picture.clone()} alt="" />
                    }
                    <span>{ props.user.display_name() }</span>
                </div>
                <button class="btn-text" onclick={on_logout}>{"ออกจากระบบ"}</button>
            </div>
            <div class="sidebar-resize-handle" onmousedown={on_resize_start} />
        </aside>
    }
}
