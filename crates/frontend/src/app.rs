use std::sync::Arc;

use crate::domain::a001_bill::api::HttpStore;
use crate::routes::routes::AppRoutes;
use crate::shared::store::SharedStore;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    // Store client shared by every container
    let store: SharedStore = Arc::new(HttpStore::default());
    provide_context(store);

    view! {
        <AppRoutes />
    }
}
