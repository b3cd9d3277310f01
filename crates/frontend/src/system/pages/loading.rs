use leptos::prelude::*;

#[component]
pub fn LoadingPage() -> impl IntoView {
    view! {
        <div class="loading" id="loading">
            "Chargement..."
        </div>
    }
}
