//! Keeps the "delete source branch" checkbox ticked on the create-PR form.
//!
//! The host page remounts the form whenever it feels like it and gives no
//! diff of what changed, so the watcher keeps a small memo of the last label
//! id and destination branch it acted on and compares against it on every
//! mutation batch. Its own click produces more mutations; the memo is what
//! turns those into no-ops.

use crate::route;

/// What the watcher needs from the page. Implemented over `web-sys` in
/// `dom.rs` and by fakes in the tests below.
pub trait CreateFormHost {
    fn pathname(&self) -> String;
    /// DOM id of the checkbox label, `None` when the label is not rendered.
    fn label_identity(&self) -> Option<String>;
    /// Display text of the selected destination branch.
    fn destination_branch(&self) -> Option<String>;
    /// Checked state of the control nested in the label.
    fn is_checked(&self) -> Option<bool>;
    fn click_label(&self);
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WatchedLabelState {
    pub identity: Option<String>,
    pub target_branch: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sighting {
    OffRoute,
    NoLabel,
    /// First sighting, or the form was rebuilt under a new label id.
    NewInstance,
    BranchChanged,
    Unchanged,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reconcile {
    pub sighting: Sighting,
    pub clicked: bool,
}

impl Reconcile {
    fn idle(sighting: Sighting) -> Self {
        Self {
            sighting,
            clicked: false,
        }
    }
}

/// Clicks the label only when its control is currently unchecked. Clicking an
/// already ticked box would untick it. The click goes to the label because
/// the host binds its handler there.
pub fn ensure_checked<H: CreateFormHost + ?Sized>(host: &H) -> bool {
    match host.is_checked() {
        Some(false) => {
            log::info!("Setting source branch to auto-delete");
            host.click_label();
            true
        }
        Some(true) => false,
        None => {
            log::debug!("delete-branch label has no checkbox control");
            false
        }
    }
}

#[derive(Debug, Default)]
pub struct DeleteBranchWatcher {
    state: WatchedLabelState,
}

impl DeleteBranchWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &WatchedLabelState {
        &self.state
    }

    /// Called once per mutation batch. The batch content is ignored: the
    /// decision is re-derived from the page every time.
    pub fn on_mutation<H: CreateFormHost + ?Sized>(&mut self, host: &H) -> Reconcile {
        // Leaving the form, or losing its label, forgets the memo so the next
        // label is a first sighting even if it reuses the old id.
        if !route::is_create_pull_request(&host.pathname()) {
            self.state = WatchedLabelState::default();
            return Reconcile::idle(Sighting::OffRoute);
        }
        let Some(identity) = host.label_identity() else {
            self.state = WatchedLabelState::default();
            return Reconcile::idle(Sighting::NoLabel);
        };

        if self.state.identity.as_deref() != Some(identity.as_str()) {
            log::debug!("delete-branch label sighted with id {identity:?}");
            let clicked = ensure_checked(host);
            self.state = WatchedLabelState {
                identity: Some(identity),
                target_branch: host.destination_branch(),
            };
            return Reconcile {
                sighting: Sighting::NewInstance,
                clicked,
            };
        }

        match host.destination_branch() {
            Some(branch) if self.state.target_branch.as_deref() != Some(branch.as_str()) => {
                log::debug!("destination branch changed to {branch:?}");
                let clicked = ensure_checked(host);
                self.state.target_branch = Some(branch);
                Reconcile {
                    sighting: Sighting::BranchChanged,
                    clicked,
                }
            }
            _ => Reconcile::idle(Sighting::Unchanged),
        }
    }
}
