use contracts::system::users::{SessionUser, UserRole};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::routes::routes::{use_navigator, Route};
use crate::system::auth::{api, storage};

/// Prefix of the form and input test ids for a role
fn form_prefix(role: UserRole) -> &'static str {
    match role {
        UserRole::Employee => "employee",
        UserRole::Admin => "admin",
    }
}

#[component]
fn LoginForm(role: UserRole, title: &'static str) -> impl IntoView {
    let navigator = use_navigator();
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error_message, set_error_message) = signal(Option::<String>::None);
    let (is_loading, set_is_loading) = signal(false);
    let prefix = form_prefix(role);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let email_val = email.get();
        let password_val = password.get();

        set_is_loading.set(true);
        set_error_message.set(None);

        spawn_local(async move {
            match api::login(email_val.clone(), password_val, role).await {
                Ok(response) => {
                    let user = SessionUser {
                        role: response.user.role,
                        email: Some(response.user.email),
                    };
                    set_is_loading.set(false);
                    if let Err(e) = storage::save_session(&user, &response.jwt) {
                        set_error_message.set(Some(format!("Connexion impossible : {}", e)));
                        return;
                    }
                    log::info!("Logged in as {}", email_val);
                    navigator.navigate(Route::landing_for(user.role));
                }
                Err(e) => {
                    log::warn!("Login failed for {}: {}", email_val, e);
                    set_error_message.set(Some(format!("Connexion impossible : {}", e)));
                    set_is_loading.set(false);
                }
            }
        });
    };

    view! {
        <div class="login-box">
            <h2>{title}</h2>

            <Show when=move || error_message.get().is_some()>
                <div class="error-message">
                    {move || error_message.get().unwrap_or_default()}
                </div>
            </Show>

            <form data-testid={format!("form-{}", prefix)} on:submit=on_submit>
                <div class="form-group">
                    <label>"Votre email"</label>
                    <input
                        type="email"
                        data-testid={format!("{}-email-input", prefix)}
                        placeholder="johndoe@email.com"
                        value=move || email.get()
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                        required
                        disabled=move || is_loading.get()
                    />
                </div>

                <div class="form-group">
                    <label>"Mot de passe"</label>
                    <input
                        type="password"
                        data-testid={format!("{}-password-input", prefix)}
                        placeholder="******"
                        value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                        required
                        disabled=move || is_loading.get()
                    />
                </div>

                <button
                    type="submit"
                    class="btn-primary"
                    data-testid={format!("{}-login-button", prefix)}
                    disabled=move || is_loading.get()
                >
                    {move || if is_loading.get() { "Connexion..." } else { "Se connecter" }}
                </button>
            </form>
        </div>
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    view! {
        <div class="login-container">
            <h1>"Billed"</h1>
            <LoginForm role=UserRole::Employee title="Employé" />
            <LoginForm role=UserRole::Admin title="Administration" />
        </div>
    }
}
