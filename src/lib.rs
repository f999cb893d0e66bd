pub mod app;
pub mod config;
pub mod controller;
pub mod error;
pub mod grid;
pub mod model;
pub mod provider;
pub mod sampler;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::app::*;
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(App);
}
