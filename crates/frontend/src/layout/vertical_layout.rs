use contracts::system::users::UserRole;
use leptos::prelude::*;

use crate::routes::routes::{use_navigator, Route};
use crate::shared::icons::icon;
use crate::system::auth::storage;

/// Icons of the vertical bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutIcon {
    Window,
    Mail,
}

/// Icon highlighted for the rendered view, if any
pub fn active_icon(route: Route) -> Option<LayoutIcon> {
    match route {
        Route::Bills => Some(LayoutIcon::Window),
        Route::NewBill => Some(LayoutIcon::Mail),
        Route::Login | Route::Dashboard => None,
    }
}

#[component]
pub fn VerticalLayout(
    /// View rendered next to the bar
    route: Route,
    children: Children,
) -> impl IntoView {
    let navigator = use_navigator();
    let active = active_icon(route);
    let employee_view = route.required_role() == Some(UserRole::Employee);

    let on_disconnect = move |_| {
        if storage::clear_session().is_ok() {
            log::info!("Session cleared");
        }
        navigator.navigate(Route::Login);
    };

    view! {
        <div class="page-layout">
            <div class="vertical-navbar">
                <div class="layout-title">"Billed"</div>
                <Show when=move || employee_view>
                    <div
                        id="layout-icon1"
                        data-testid="icon-window"
                        class="layout-icon"
                        class:active-icon={active == Some(LayoutIcon::Window)}
                        on:click=move |_| navigator.navigate(Route::Bills)
                    >
                        {icon("window")}
                    </div>
                    <div
                        id="layout-icon2"
                        data-testid="icon-mail"
                        class="layout-icon"
                        class:active-icon={active == Some(LayoutIcon::Mail)}
                        on:click=move |_| navigator.navigate(Route::NewBill)
                    >
                        {icon("mail")}
                    </div>
                </Show>
                <div
                    id="layout-disconnect"
                    data-testid="layout-disconnect"
                    class="layout-disconnect"
                    title="Se déconnecter"
                    on:click=on_disconnect
                >
                    {icon("disconnect")}
                </div>
            </div>
            <div class="content">{children()}</div>
        </div>
    }
}
