use leptos::prelude::*;

#[component]
pub fn ErrorPage(message: String) -> impl IntoView {
    view! {
        <div class="error-page">
            <div class="error-title">"Oups, une erreur est survenue"</div>
            <div class="error-message" data-testid="error-message">
                {message}
            </div>
        </div>
    }
}
