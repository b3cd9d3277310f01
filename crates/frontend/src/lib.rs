//! Billed web client: expense reports for employees, review for admins.

pub mod app;
pub mod domain;
pub mod layout;
pub mod routes;
pub mod shared;
pub mod system;

use wasm_bindgen::prelude::wasm_bindgen;

/// Entry point called by the wasm bundle once loaded
#[wasm_bindgen(start)]
pub fn start() {
    _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();

    log::info!("Billed client starting");
    leptos::mount::mount_to_body(app::App);
}
