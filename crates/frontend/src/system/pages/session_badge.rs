use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::shared::api_client::ClientRouter;
use crate::shared::config::load_config;
use crate::shared::storage::durable_store;
use crate::system::auth::{api, storage};

/// Header badge: current user name, or a login link for guests
#[component]
pub fn SessionBadge() -> impl IntoView {
    let (user_name, set_user_name) = signal(Option::<String>::None);

    Effect::new(move |_| {
        spawn_local(async move {
            let router = ClientRouter::from_browser(&load_config());
            match api::get_current_user(&router).await {
                Ok(user) => set_user_name.set(Some(user.nombre)),
                Err(e) => log::debug!("no user session: {}", e),
            }
        });
    });

    let logout = move |_| {
        storage::clear_session(durable_store().as_ref());
        set_user_name.set(None);
    };

    view! {
        <div class="session-badge">
            {move || match user_name.get() {
                Some(name) => view! {
                    <span class="session-badge__name">{name}</span>
                    <button class="btn-link" on:click=logout>"Cerrar sesión"</button>
                }.into_any(),
                None => view! { <a href="/login">"Iniciar sesión"</a> }.into_any(),
            }}
        </div>
    }
}
