use contracts::system::users::{SessionUser, UserRole};
use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::domain::a001_bill::ui::dashboard::DashboardPage;
use crate::domain::a001_bill::ui::list::BillsPage;
use crate::domain::a001_bill::ui::new::NewBillPage;
use crate::layout::VerticalLayout;
use crate::system::auth::storage;
use crate::system::pages::login::LoginPage;

/// Views of the application, addressed by the URL hash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Bills,
    NewBill,
    Dashboard,
}

impl Route {
    pub const LOGIN_PATH: &'static str = "/";
    pub const BILLS_PATH: &'static str = "#employee/bills";
    pub const NEW_BILL_PATH: &'static str = "#employee/bill/new";
    pub const DASHBOARD_PATH: &'static str = "#admin/dashboard";

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => Self::LOGIN_PATH,
            Route::Bills => Self::BILLS_PATH,
            Route::NewBill => Self::NEW_BILL_PATH,
            Route::Dashboard => Self::DASHBOARD_PATH,
        }
    }

    /// Unknown paths open the login page
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            Self::BILLS_PATH => Route::Bills,
            Self::NEW_BILL_PATH => Route::NewBill,
            Self::DASHBOARD_PATH => Route::Dashboard,
            _ => Route::Login,
        }
    }

    /// Role a session needs to open this view
    pub fn required_role(&self) -> Option<UserRole> {
        match self {
            Route::Login => None,
            Route::Bills | Route::NewBill => Some(UserRole::Employee),
            Route::Dashboard => Some(UserRole::Admin),
        }
    }

    /// First view shown after login
    pub fn landing_for(role: UserRole) -> Self {
        match role {
            UserRole::Employee => Route::Bills,
            UserRole::Admin => Route::Dashboard,
        }
    }
}

/// View actually rendered for `route` given the stored session
pub fn resolve(route: Route, user: Option<&SessionUser>) -> Route {
    match (route.required_role(), user) {
        (None, _) => Route::Login,
        (Some(role), Some(user)) if user.role == role => route,
        _ => Route::Login,
    }
}

/// URL pushed into history. Views live in the hash of the page the app is
/// served from, so the path is kept and login simply drops the hash.
pub fn history_url(route: Route, pathname: &str) -> String {
    let pathname = if pathname.is_empty() { "/" } else { pathname };
    match route {
        Route::Login => pathname.to_string(),
        other => format!("{}{}", pathname, other.path()),
    }
}

fn current_pathname() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_default()
}

fn current_hash() -> String {
    web_sys::window()
        .and_then(|w| w.location().hash().ok())
        .unwrap_or_default()
}

/// Global navigation, provided through context by `AppRoutes`
#[derive(Clone, Copy)]
pub struct Navigator {
    route: RwSignal<Route>,
}

impl Navigator {
    fn new() -> Self {
        let navigator = Self {
            route: RwSignal::new(Route::from_path(&current_hash())),
        };
        navigator.follow_history();
        navigator
    }

    pub fn route(&self) -> Route {
        self.route.get()
    }

    pub fn navigate(&self, route: Route) {
        if let Some(window) = web_sys::window() {
            if let Ok(history) = window.history() {
                let url = history_url(route, &current_pathname());
                if let Err(e) =
                    history.push_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&url))
                {
                    log::error!("Failed to push {} into history: {:?}", url, e);
                }
            }
        }
        log::debug!("Navigate to {:?}", route);
        self.route.set(route);
    }

    /// Back and forward buttons
    fn follow_history(&self) {
        let route = self.route;
        let closure = Closure::wrap(Box::new(move |_: web_sys::Event| {
            route.set(Route::from_path(&current_hash()));
        }) as Box<dyn FnMut(_)>);

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

pub fn use_navigator() -> Navigator {
    use_context::<Navigator>().expect("Navigator context not found")
}

#[component]
pub fn AppRoutes() -> impl IntoView {
    let navigator = Navigator::new();
    provide_context(navigator);

    move || {
        let requested = navigator.route();
        let user = storage::get_session_user();
        let route = resolve(requested, user.as_ref());
        if route != requested {
            log::info!("{:?} is not available for this session, showing login", requested);
        }

        match route {
            Route::Login => view! { <LoginPage /> }.into_any(),
            Route::Bills => view! {
                <VerticalLayout route=route>
                    <BillsPage />
                </VerticalLayout>
            }
            .into_any(),
            Route::NewBill => view! {
                <VerticalLayout route=route>
                    <NewBillPage />
                </VerticalLayout>
            }
            .into_any(),
            Route::Dashboard => view! {
                <VerticalLayout route=route>
                    <DashboardPage />
                </VerticalLayout>
            }
            .into_any(),
        }
    }
}
