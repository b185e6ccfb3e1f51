//! Bitbucket Cloud pull-request helpers, built to wasm and loaded by a
//! userscript:
//!
//! - ticks "delete source branch" on every fresh create-PR form,
//! - steps through a pull request's changed files from the keyboard,
//! - collapses or hides inline comments.

use leptos::task::spawn_local;
use log::LevelFilter;
use wasm_bindgen::prelude::*;

mod app;
pub mod comments;
pub mod config;
pub mod delete_branch;
pub mod dom;
pub mod error;
pub mod file_nav;
mod logging;
pub mod route;
pub mod shortcuts;

use config::{HelperConfig, WINDOW_CONFIG_KEY};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let (config, config_error) = match dom::window_config(WINDOW_CONFIG_KEY) {
        Some(raw) => match HelperConfig::from_js(raw) {
            Ok(config) => (config, None),
            Err(err) => (HelperConfig::default(), Some(err)),
        },
        None => (HelperConfig::default(), None),
    };
    logging::init(config.level_filter().unwrap_or(LevelFilter::Info));
    if let Some(err) = config_error {
        log::warn!("using default settings: {err}");
    }

    spawn_local(async move {
        if let Err(err) = app::run(config).await {
            log::error!("not active on this page: {err}");
        }
    });
}
