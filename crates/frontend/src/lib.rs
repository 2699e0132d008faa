pub mod app;
pub mod domain;
pub mod routes;
pub mod shared;
pub mod system;

use wasm_bindgen::prelude::wasm_bindgen;

use crate::domain::a001_invoice::reconciler::ReturnContext;
use crate::shared::api_utils::current_query;

#[wasm_bindgen]
pub fn hydrate() {
    // `?debug=1` turns on the reconciler's per-attempt diagnostics
    let level = if ReturnContext::from_query(&current_query()).debug {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    _ = console_log::init_with_level(level);
    console_error_panic_hook::set_once();

    leptos::mount::mount_to_body(app::App);
}

#[wasm_bindgen(start)]
pub fn start() {
    hydrate();
}
