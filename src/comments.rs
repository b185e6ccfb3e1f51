//! Comment visibility: normal, collapsed or hidden.
//!
//! The mode lives only as a class on the document root; the injected rules in
//! [`COMMENT_RULES`] do all of the presentation.

pub const COLLAPSED_CLASS: &str = "comments-toggled-collapsed";
pub const HIDDEN_CLASS: &str = "comments-toggled-hidden";
pub const NOTIFICATION_CLASS: &str = "comments-hidden-notification";
pub const NOTIFICATION_HIDDEN_CLASS: &str = "comments-hidden-notification__hidden";
pub const NOTIFICATION_COLLAPSED_CLASS: &str = "comments-hidden-notification__collapsed";

pub const COMMENT_RULES: &[&str] = &[
    // whole inline comment thread
    ".comments-toggled-hidden .bitkit-diff-inline-content-container {
      display: none;
    }",
    // comment body
    ".comments-toggled-collapsed .bitkit-diff-inline-content-container .ak-renderer-document {
      display: none;
    }",
    ".comments-toggled-collapsed .bitkit-diff-inline-content-container div[id^=\"comment-\"] {
      opacity: 0.5;
      row-gap: 0;
    }",
    // the host's own collapse button
    ".comments-toggled-collapsed .bitkit-diff-inline-content-container button {
      display: none;
    }",
    // author line, vertically centered once the body is gone
    ".comments-toggled-collapsed .bitkit-diff-inline-content-container div[id^=\"comment-\"] > div:nth-child(2) {
      padding-top: 6px;
    }",
    // actions row
    ".comments-toggled-collapsed .bitkit-diff-inline-content-container div[id^=\"comment-\"] > div:nth-child(2) > div > div:nth-child(3) {
      display: none;
    }",
    ".comments-hidden-notification {
      display: none;
      position: fixed;
      bottom: 0px;
      padding: 10px;
      width: 100%;
      z-index: 9999;
      text-align: center;
      pointer-events: none;
    }",
    ".comments-toggled-collapsed .comments-hidden-notification,
    .comments-toggled-hidden .comments-hidden-notification {
      display: block;
    }",
    ".comments-hidden-notification span {
      display: none;
      padding: 10px;
      border-radius: 6px;
      border: 1px solid #ccc;
      background-color: white;
    }",
    ".comments-toggled-hidden .comments-hidden-notification__hidden,
    .comments-toggled-collapsed .comments-hidden-notification__collapsed {
      display: inline-block;
    }",
    ".comments-hidden-notification kbd {
      border: 1px solid #ccc;
      background-color: #eee;
      padding: 1px 6px;
      border-radius: 3px;
    }",
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VisibilityMode {
    #[default]
    Normal,
    Collapsed,
    Hidden,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisibilityToggle {
    Collapse,
    Hide,
}

impl VisibilityToggle {
    fn classes(self) -> (&'static str, &'static str) {
        match self {
            VisibilityToggle::Collapse => (COLLAPSED_CLASS, HIDDEN_CLASS),
            VisibilityToggle::Hide => (HIDDEN_CLASS, COLLAPSED_CLASS),
        }
    }
}

/// Class membership on the element that carries the mode.
pub trait RootMarkers {
    fn contains(&self, class: &str) -> bool;
    fn remove(&self, class: &str);
    /// Returns whether the class is present afterwards.
    fn toggle(&self, class: &str) -> bool;
}

impl VisibilityMode {
    pub fn read<M: RootMarkers + ?Sized>(markers: &M) -> Self {
        if markers.contains(HIDDEN_CLASS) {
            VisibilityMode::Hidden
        } else if markers.contains(COLLAPSED_CLASS) {
            VisibilityMode::Collapsed
        } else {
            VisibilityMode::Normal
        }
    }

    /// The mode a toggle leads to, without touching the page.
    pub fn after(self, toggle: VisibilityToggle) -> Self {
        match (self, toggle) {
            (VisibilityMode::Collapsed, VisibilityToggle::Collapse) => VisibilityMode::Normal,
            (VisibilityMode::Hidden, VisibilityToggle::Hide) => VisibilityMode::Normal,
            (_, VisibilityToggle::Collapse) => VisibilityMode::Collapsed,
            (_, VisibilityToggle::Hide) => VisibilityMode::Hidden,
        }
    }
}

/// Clears the opposite class first, so both can never be set together.
pub fn apply_toggle<M: RootMarkers + ?Sized>(
    markers: &M,
    toggle: VisibilityToggle,
) -> VisibilityMode {
    let (requested, opposite) = toggle.classes();
    markers.remove(opposite);
    markers.toggle(requested);
    let mode = VisibilityMode::read(markers);
    log::debug!("comment visibility is now {mode:?}");
    mode
}

/// Label shown in the notification for a shortcut key, e.g. `Shift + C`.
pub fn key_hint(key: &str) -> String {
    if crate::shortcuts::is_shifted(key) {
        format!("Shift + {key}")
    } else {
        key.to_string()
    }
}
