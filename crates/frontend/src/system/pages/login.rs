use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::shared::api_client::ClientRouter;
use crate::shared::config::load_config;
use crate::shared::storage::durable_store;
use crate::system::auth::api;

#[component]
pub fn LoginPage() -> impl IntoView {
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error_message, set_error_message) = signal(Option::<String>::None);
    let (welcome, set_welcome) = signal(Option::<String>::None);
    let (is_loading, set_is_loading) = signal(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let email_val = email.get();
        let password_val = password.get();

        set_is_loading.set(true);
        set_error_message.set(None);

        spawn_local(async move {
            let router = ClientRouter::from_browser(&load_config());
            match api::login(&router, email_val, password_val).await {
                Ok(response) => {
                    api::save_session(durable_store().as_ref(), &response);
                    log::info!("session started for user {}", response.user.id);
                    set_welcome.set(Some(format!("Hola, {}", response.user.nombre)));
                }
                Err(e) => {
                    set_error_message.set(Some(e));
                }
            }
            set_is_loading.set(false);
        });
    };

    view! {
        <div class="login-container">
            <div class="login-box">
                <h2>"Iniciar sesión"</h2>

                <Show when=move || error_message.get().is_some()>
                    <div class="error-message">
                        {move || error_message.get().unwrap_or_default()}
                    </div>
                </Show>

                <Show when=move || welcome.get().is_some()>
                    <div class="login-info">
                        {move || welcome.get().unwrap_or_default()}
                        " · "
                        <a href="/">"Ir a la tienda"</a>
                    </div>
                </Show>

                <form on:submit=on_submit>
                    <div class="form-group">
                        <label for="email">"Correo"</label>
                        <input
                            type="email"
                            id="email"
                            value=move || email.get()
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                            required
                            disabled=move || is_loading.get()
                        />
                    </div>

                    <div class="form-group">
                        <label for="password">"Contraseña"</label>
                        <input
                            type="password"
                            id="password"
                            value=move || password.get()
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                            required
                            disabled=move || is_loading.get()
                        />
                    </div>

                    <button
                        type="submit"
                        class="btn-primary"
                        disabled=move || is_loading.get()
                    >
                        {move || if is_loading.get() { "Ingresando..." } else { "Ingresar" }}
                    </button>
                </form>
            </div>
        </div>
    }
}
