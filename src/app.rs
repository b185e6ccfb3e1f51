use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CustomEvent, Element, KeyboardEvent, MutationObserver, MutationObserverInit};

use crate::comments::{
    self, key_hint, COMMENT_RULES, NOTIFICATION_CLASS, NOTIFICATION_COLLAPSED_CLASS,
    NOTIFICATION_HIDDEN_CLASS,
};
use crate::config::{HelperConfig, SETTINGS_EVENT};
use crate::delete_branch::{DeleteBranchWatcher, Sighting};
use crate::dom::{self, DocumentRoot, DomHost, PollSchedule};
use crate::error::HelperError;
use crate::file_nav::{self, FileTreeHost, NavOutcome};
use crate::route;
use crate::shortcuts::{self, Enabled};

#[component]
fn CommentsNotification(config: RwSignal<HelperConfig>) -> impl IntoView {
    let hide_hint = move || config.with(|c| key_hint(&c.hide_key));
    let collapse_hint = move || config.with(|c| key_hint(&c.collapse_key));

    view! {
        <div class={NOTIFICATION_CLASS}>
            <span class={NOTIFICATION_HIDDEN_CLASS}>
                "Comments are hidden. Press " <kbd>{hide_hint}</kbd> " to show them"
            </span>
            <span class={NOTIFICATION_COLLAPSED_CLASS}>
                "Comments are collapsed. Press " <kbd>{collapse_hint}</kbd> " to show them"
            </span>
        </div>
    }
}

/// Waits for `<body>`, then installs every feature. Listeners stay registered
/// for the life of the page.
pub async fn run(config: HelperConfig) -> Result<(), HelperError> {
    let schedule = PollSchedule {
        timeout_ms: config.setup_timeout_ms,
        interval_ms: config.setup_poll_interval_ms,
    };
    let body = dom::wait_for_selector("body", schedule).await?;
    let config = RwSignal::new(config);

    if let Err(err) = dom::add_stylesheet_rules(COMMENT_RULES) {
        log::warn!("comment styles not installed: {err}");
    }
    mount_notification(&body, config)?;
    observe_create_form(&body, config)?;
    listen_for_shortcuts(config)?;
    listen_for_settings(config)?;

    log::debug!("installed on {}", FileTreeHost::pathname(&DomHost));
    Ok(())
}

fn mount_notification(body: &Element, config: RwSignal<HelperConfig>) -> Result<(), HelperError> {
    let parent = body
        .clone()
        .dyn_into::<web_sys::HtmlElement>()
        .map_err(|_| HelperError::Js("<body> is not an HtmlElement".to_string()))?;
    leptos::mount::mount_to(parent, move || view! { <CommentsNotification config=config /> })
        .forget();
    Ok(())
}

/// Watches the whole body: the host swaps the create form in and out without a
/// page load, so narrower targets would go stale.
fn observe_create_form(body: &Element, config: RwSignal<HelperConfig>) -> Result<(), HelperError> {
    let watcher = Rc::new(RefCell::new(DeleteBranchWatcher::new()));

    let callback = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
        move |_records: js_sys::Array, _observer: MutationObserver| {
            if !config.with_untracked(|c| c.auto_delete_branch) {
                return;
            }
            let Ok(mut watcher) = watcher.try_borrow_mut() else {
                return;
            };
            let outcome = watcher.on_mutation(&DomHost);
            if matches!(outcome.sighting, Sighting::NewInstance | Sighting::BranchChanged) {
                log::debug!("{:?}, clicked: {}", outcome.sighting, outcome.clicked);
            }
        },
    );

    let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
    let init = MutationObserverInit::new();
    init.set_child_list(true);
    init.set_subtree(true);
    observer.observe_with_options(body, &init)?;
    callback.forget();
    Ok(())
}

fn listen_for_shortcuts(config: RwSignal<HelperConfig>) -> Result<(), HelperError> {
    let closure = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
        config.with_untracked(|c| handle_keydown(c, &event));
    });
    document().add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn handle_keydown(config: &HelperConfig, event: &KeyboardEvent) {
    let enabled = Enabled {
        comment_toggles: config.comment_toggles,
        file_navigation: config.file_navigation,
    };
    let press = dom::key_press(event);
    let Some(command) = shortcuts::dispatch(&config.keymap(), enabled, &press) else {
        return;
    };

    if let Some(toggle) = command.visibility_toggle() {
        let Some(root) = DocumentRoot::current() else {
            return;
        };
        event.prevent_default();
        log::debug!("toggling comment visibility: {toggle:?}");
        comments::apply_toggle(&root, toggle);
        return;
    }

    if let Some(direction) = command.direction() {
        let host = DomHost;
        if !route::is_pull_request(&FileTreeHost::pathname(&host)) {
            return;
        }
        event.prevent_default();
        match file_nav::advance(&host, direction, config.fragment_policy()) {
            NavOutcome::Selected(entry) => log::debug!("moved {direction:?} to {}", entry.href),
            other => log::debug!("file navigation {direction:?}: {other:?}"),
        }
    }
}

fn listen_for_settings(config: RwSignal<HelperConfig>) -> Result<(), HelperError> {
    let closure = Closure::<dyn FnMut(CustomEvent)>::new(move |e: CustomEvent| {
        let Some(detail) = e.detail().as_string() else {
            log::warn!("{SETTINGS_EVENT} detail must be a JSON string");
            return;
        };
        match HelperConfig::from_json(&detail) {
            Ok(next) => {
                if let Ok(level) = next.level_filter() {
                    log::set_max_level(level);
                }
                config.set(next);
                log::info!("settings updated");
            }
            Err(err) => log::warn!("ignoring settings: {err}"),
        }
    });
    window().add_event_listener_with_callback(SETTINGS_EVENT, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}
