//! The page side of the host traits, over `web-sys`.
//!
//! Every lookup degrades to `None`/no-op when the host has not rendered the
//! element, which is the normal state for most mutation batches.

use leptos::prelude::{document, window};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CssStyleSheet, Element, HtmlElement, HtmlInputElement, HtmlStyleElement, KeyboardEvent,
};

use crate::comments::RootMarkers;
use crate::delete_branch::CreateFormHost;
use crate::error::HelperError;
use crate::file_nav::{FileEntry, FileTreeHost};
use crate::shortcuts::KeyPress;

pub const DELETE_BRANCH_LABEL: &str = "[data-testid=\"delete-branch--checkbox-label\"]";
pub const DESTINATION_BRANCH: &str =
    "[data-testid=\"create-pull-request-destination-branch-selector\"] div[data-value]";
pub const FILES_TAB: &str = "[data-testid=\"sidebar-tab-files\"]";
pub const FILE_TREE_ANCHORS: &str = "[data-testid=\"file-tree\"] a[href^=\"#chg\"]";
const EDITABLE: &str = "input, textarea, button, [contenteditable=\"true\"]";

pub fn query(selector: &str) -> Result<Element, HelperError> {
    document()
        .query_selector(selector)?
        .ok_or_else(|| HelperError::ElementNotFound(selector.to_string()))
}

fn click(element: &Element) {
    if let Some(el) = element.dyn_ref::<HtmlElement>() {
        el.click();
    }
}

fn file_anchors() -> Vec<Element> {
    let Ok(list) = document().query_selector_all(FILE_TREE_ANCHORS) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Reads and pokes the live page. Holds nothing: every call goes back to the DOM.
#[derive(Clone, Copy, Debug, Default)]
pub struct DomHost;

impl CreateFormHost for DomHost {
    fn pathname(&self) -> String {
        window().location().pathname().unwrap_or_default()
    }

    fn label_identity(&self) -> Option<String> {
        query(DELETE_BRANCH_LABEL).ok().map(|label| label.id())
    }

    fn destination_branch(&self) -> Option<String> {
        query(DESTINATION_BRANCH)
            .ok()
            .and_then(|el| el.text_content())
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    }

    fn is_checked(&self) -> Option<bool> {
        let label = query(DELETE_BRANCH_LABEL).ok()?;
        let input = label.query_selector("input").ok()??;
        input.dyn_into::<HtmlInputElement>().ok().map(|input| input.checked())
    }

    fn click_label(&self) {
        if let Ok(label) = query(DELETE_BRANCH_LABEL) {
            click(&label);
        }
    }
}

impl FileTreeHost for DomHost {
    fn pathname(&self) -> String {
        window().location().pathname().unwrap_or_default()
    }

    fn is_files_tab_active(&self) -> bool {
        query(FILES_TAB)
            .ok()
            .and_then(|tab| tab.get_attribute("aria-selected"))
            .is_some_and(|selected| selected == "true")
    }

    fn activate_files_tab(&self) {
        if let Ok(tab) = query(FILES_TAB) {
            click(&tab);
        }
    }

    fn file_entries(&self) -> Vec<FileEntry> {
        file_anchors()
            .iter()
            .enumerate()
            .filter_map(|(order, anchor)| {
                let href = anchor.get_attribute("href")?;
                Some(FileEntry { href, order })
            })
            .collect()
    }

    fn fragment(&self) -> Option<String> {
        window().location().hash().ok().filter(|hash| !hash.is_empty())
    }

    fn activate_entry(&self, entry: &FileEntry) -> Result<(), HelperError> {
        let anchors = file_anchors();
        let anchor = anchors
            .get(entry.order)
            .ok_or_else(|| HelperError::ElementNotFound(entry.href.clone()))?;
        if anchor.get_attribute("href").as_deref() != Some(entry.href.as_str()) {
            return Err(HelperError::StaleReference(format!(
                "file entry {} is no longer {}",
                entry.order, entry.href
            )));
        }
        click(anchor);
        Ok(())
    }

    fn set_fragment(&self, href: &str) {
        if let Err(err) = window().location().set_hash(href) {
            log::warn!("could not set location fragment: {}", HelperError::from(err));
        }
    }
}

/// `<html>`, which carries the comment visibility classes.
pub struct DocumentRoot(Element);

impl DocumentRoot {
    pub fn current() -> Option<Self> {
        document().document_element().map(DocumentRoot)
    }
}

impl RootMarkers for DocumentRoot {
    fn contains(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn remove(&self, class: &str) {
        if let Err(err) = self.0.class_list().remove_1(class) {
            log::debug!("could not remove class {class}: {}", HelperError::from(err));
        }
    }

    fn toggle(&self, class: &str) -> bool {
        self.0.class_list().toggle(class).unwrap_or(false)
    }
}

pub fn key_press(event: &KeyboardEvent) -> KeyPress {
    let in_editable = event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok())
        .is_some_and(|target| {
            target.matches(EDITABLE).unwrap_or(false)
                || target
                    .dyn_ref::<HtmlElement>()
                    .is_some_and(|el| el.is_content_editable())
        });
    KeyPress {
        key: event.key(),
        shift: event.shift_key(),
        meta: event.meta_key(),
        ctrl: event.ctrl_key(),
        alt: event.alt_key(),
        in_editable,
    }
}

/// Appends one `<style>` to `<head>` and inserts the rules in order. A rule the
/// browser refuses is logged and skipped.
pub fn add_stylesheet_rules(rules: &[&str]) -> Result<(), HelperError> {
    let doc = document();
    let head = doc
        .head()
        .ok_or_else(|| HelperError::ElementNotFound("head".to_string()))?;
    let style: HtmlStyleElement = doc.create_element("style")?.dyn_into().map_err(|_| {
        HelperError::Js("created <style> is not an HtmlStyleElement".to_string())
    })?;
    head.append_child(&style)?;

    let sheet: CssStyleSheet = style
        .sheet()
        .and_then(|sheet| sheet.dyn_into().ok())
        .ok_or_else(|| HelperError::Js("<style> has no CSS style sheet".to_string()))?;
    for rule in rules {
        let index = sheet.css_rules()?.length();
        if let Err(err) = sheet.insert_rule_with_index(rule, index) {
            log::warn!("skipping stylesheet rule: {}", HelperError::from(err));
        }
    }
    Ok(())
}

/// How often and how long to poll for an element during start-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollSchedule {
    pub timeout_ms: u32,
    pub interval_ms: u32,
}

impl PollSchedule {
    /// Number of lookups, always at least one.
    pub fn attempts(&self) -> u32 {
        if self.interval_ms == 0 {
            return 1;
        }
        self.timeout_ms / self.interval_ms + 1
    }
}

async fn sleep(ms: u32) -> Result<(), HelperError> {
    let delay = i32::try_from(ms).unwrap_or(i32::MAX);
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let _ = window().set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, delay);
    });
    JsFuture::from(promise).await?;
    Ok(())
}

pub async fn wait_for_selector(
    selector: &str,
    schedule: PollSchedule,
) -> Result<Element, HelperError> {
    let attempts = schedule.attempts();
    for attempt in 1..=attempts {
        if let Ok(element) = query(selector) {
            return Ok(element);
        }
        if attempt < attempts {
            sleep(schedule.interval_ms).await?;
        }
    }
    Err(HelperError::Timeout {
        selector: selector.to_string(),
        timeout_ms: schedule.timeout_ms,
    })
}

/// Reads the config object the userscript left on `window`, if any.
pub fn window_config(key: &str) -> Option<JsValue> {
    let value = js_sys::Reflect::get(&window(), &JsValue::from_str(key)).ok()?;
    if value.is_undefined() || value.is_null() {
        None
    } else {
        Some(value)
    }
}
