//! Stepping through the changed files of a pull request.
//!
//! There is no stored index. The cursor is whichever file entry matches the
//! location fragment right now, and the entry list is read again from the page
//! on every key press, since the host re-renders the tree freely.

use crate::error::HelperError;
use crate::route;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileEntry {
    pub href: String,
    pub order: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Whether navigation writes the selected href into `location.hash`. Newer
/// host builds manage the fragment themselves when a file is clicked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FragmentPolicy {
    #[default]
    LeaveToHost,
    Reflect,
}

impl FragmentPolicy {
    pub fn from_flag(reflect: bool) -> Self {
        if reflect {
            FragmentPolicy::Reflect
        } else {
            FragmentPolicy::LeaveToHost
        }
    }
}

pub trait FileTreeHost {
    fn pathname(&self) -> String;
    fn is_files_tab_active(&self) -> bool;
    fn activate_files_tab(&self);
    /// Entries in document order. Must be read fresh on every call.
    fn file_entries(&self) -> Vec<FileEntry>;
    /// Current location fragment including the leading `#`, `None` when unset.
    fn fragment(&self) -> Option<String>;
    fn activate_entry(&self, entry: &FileEntry) -> Result<(), HelperError>;
    fn set_fragment(&self, href: &str);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavOutcome {
    OffRoute,
    EmptyList,
    /// The fragment points at something that is not in the file list.
    Unmatched,
    Stale,
    Selected(FileEntry),
}

/// Position to select given the current fragment. `None` when the list is
/// empty or the fragment matches no entry.
pub fn resolve(
    entries: &[FileEntry],
    fragment: Option<&str>,
    direction: Direction,
) -> Option<usize> {
    let len = entries.len();
    if len == 0 {
        return None;
    }
    let Some(fragment) = fragment else {
        return Some(0);
    };
    let current = entries.iter().position(|entry| entry.href == fragment)?;
    Some(match direction {
        Direction::Next => (current + 1) % len,
        Direction::Previous => (current + len - 1) % len,
    })
}

pub fn advance<H: FileTreeHost + ?Sized>(
    host: &H,
    direction: Direction,
    policy: FragmentPolicy,
) -> NavOutcome {
    if !route::is_pull_request(&host.pathname()) {
        return NavOutcome::OffRoute;
    }
    if !host.is_files_tab_active() {
        log::debug!("activating files tab");
        host.activate_files_tab();
    }

    let entries = host.file_entries();
    if entries.is_empty() {
        return NavOutcome::EmptyList;
    }
    let fragment = host.fragment().filter(|hash| !matches!(hash.as_str(), "" | "#"));
    let Some(index) = resolve(&entries, fragment.as_deref(), direction) else {
        log::debug!("fragment {fragment:?} matches no file entry");
        return NavOutcome::Unmatched;
    };

    let entry = entries[index].clone();
    if let Err(err) = host.activate_entry(&entry) {
        log::debug!("file navigation skipped: {err}");
        return NavOutcome::Stale;
    }
    if policy == FragmentPolicy::Reflect {
        host.set_fragment(&entry.href);
    }
    log::debug!("selected file {} of {}", entry.order + 1, entries.len());
    NavOutcome::Selected(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    fn entries(hrefs: &[&str]) -> Vec<FileEntry> {
        hrefs
            .iter()
            .enumerate()
            .map(|(order, href)| FileEntry {
                href: href.to_string(),
                order,
            })
            .collect()
    }

    struct FakeTree {
        path: String,
        tab_active: Cell<bool>,
        hrefs: RefCell<Vec<&'static str>>,
        fragment: RefCell<Option<String>>,
        clicked: RefCell<Vec<String>>,
        fragment_writes: Cell<u32>,
        stale: Cell<bool>,
    }

    impl FakeTree {
        fn new(hrefs: &[&'static str], fragment: Option<&str>) -> Self {
            Self {
                path: "/acme/widgets/pull-requests/12/diff".to_string(),
                tab_active: Cell::new(true),
                hrefs: RefCell::new(hrefs.to_vec()),
                fragment: RefCell::new(fragment.map(str::to_string)),
                clicked: RefCell::new(Vec::new()),
                fragment_writes: Cell::new(0),
                stale: Cell::new(false),
            }
        }
    }

    impl FileTreeHost for FakeTree {
        fn pathname(&self) -> String {
            self.path.clone()
        }

        fn is_files_tab_active(&self) -> bool {
            self.tab_active.get()
        }

        fn activate_files_tab(&self) {
            self.tab_active.set(true);
        }

        fn file_entries(&self) -> Vec<FileEntry> {
            if !self.tab_active.get() {
                return Vec::new();
            }
            entries(&self.hrefs.borrow())
        }

        fn fragment(&self) -> Option<String> {
            self.fragment.borrow().clone()
        }

        fn activate_entry(&self, entry: &FileEntry) -> Result<(), HelperError> {
            if self.stale.get() {
                return Err(HelperError::StaleReference(entry.href.clone()));
            }
            self.clicked.borrow_mut().push(entry.href.clone());
            Ok(())
        }

        fn set_fragment(&self, href: &str) {
            self.fragment_writes.set(self.fragment_writes.get() + 1);
            *self.fragment.borrow_mut() = Some(href.to_string());
        }
    }

    #[test]
    fn wraps_around_in_both_directions() {
        let list = entries(&["#chg1", "#chg2", "#chg3"]);
        assert_eq!(resolve(&list, Some("#chg3"), Direction::Next), Some(0));
        assert_eq!(resolve(&list, Some("#chg1"), Direction::Previous), Some(2));
        assert_eq!(resolve(&list, Some("#chg2"), Direction::Next), Some(2));
        assert_eq!(resolve(&list, Some("#chg2"), Direction::Previous), Some(0));
    }

    #[test]
    fn single_entry_list_stays_put() {
        let list = entries(&["#chg1"]);
        assert_eq!(resolve(&list, Some("#chg1"), Direction::Next), Some(0));
        assert_eq!(resolve(&list, Some("#chg1"), Direction::Previous), Some(0));
    }

    #[test]
    fn no_fragment_selects_first_entry() {
        let list = entries(&["#chg1", "#chg2"]);
        assert_eq!(resolve(&list, None, Direction::Next), Some(0));
        assert_eq!(resolve(&list, None, Direction::Previous), Some(0));
        assert_eq!(resolve(&[], None, Direction::Next), None);
    }

    #[test]
    fn unmatched_fragment_does_not_guess() {
        let list = entries(&["#chg1", "#chg2"]);
        assert_eq!(resolve(&list, Some("#comment-99"), Direction::Next), None);

        let tree = FakeTree::new(&["#chg1", "#chg2"], Some("#comment-99"));
        let outcome = advance(&tree, Direction::Next, FragmentPolicy::Reflect);
        assert_eq!(outcome, NavOutcome::Unmatched);
        assert!(tree.clicked.borrow().is_empty());
        assert_eq!(tree.fragment_writes.get(), 0);
    }

    #[test]
    fn advance_clicks_without_touching_fragment_by_default() {
        let tree = FakeTree::new(&["#chg1", "#chg2", "#chg3"], Some("#chg3"));
        let outcome = advance(&tree, Direction::Next, FragmentPolicy::LeaveToHost);
        assert!(matches!(outcome, NavOutcome::Selected(ref e) if e.href == "#chg1"));
        assert_eq!(*tree.clicked.borrow(), vec!["#chg1".to_string()]);
        assert_eq!(tree.fragment_writes.get(), 0);
    }

    #[test]
    fn reflect_policy_writes_fragment_once() {
        let tree = FakeTree::new(&["#chg1", "#chg2", "#chg3"], None);
        advance(&tree, Direction::Previous, FragmentPolicy::Reflect);
        assert_eq!(tree.fragment().as_deref(), Some("#chg1"));

        advance(&tree, Direction::Previous, FragmentPolicy::Reflect);
        assert_eq!(tree.fragment().as_deref(), Some("#chg3"));
        assert_eq!(tree.fragment_writes.get(), 2);
    }

    #[test]
    fn activates_files_tab_before_reading_the_list() {
        let tree = FakeTree::new(&["#chg1", "#chg2"], Some("#chg1"));
        tree.tab_active.set(false);
        let outcome = advance(&tree, Direction::Next, FragmentPolicy::LeaveToHost);
        assert!(tree.tab_active.get());
        assert!(matches!(outcome, NavOutcome::Selected(ref e) if e.order == 1));
    }

    #[test]
    fn list_changes_between_steps_are_picked_up() {
        let tree = FakeTree::new(&["#chg1", "#chg2"], Some("#chg2"));
        tree.hrefs.borrow_mut().push("#chg3");
        let outcome = advance(&tree, Direction::Next, FragmentPolicy::LeaveToHost);
        assert!(matches!(outcome, NavOutcome::Selected(ref e) if e.href == "#chg3"));
    }

    #[test]
    fn empty_list_and_off_route_are_no_ops() {
        let tree = FakeTree::new(&[], None);
        assert_eq!(
            advance(&tree, Direction::Next, FragmentPolicy::Reflect),
            NavOutcome::EmptyList
        );

        let mut off_route = FakeTree::new(&["#chg1"], None);
        off_route.path = "/acme/widgets/src/main".to_string();
        assert_eq!(
            advance(&off_route, Direction::Next, FragmentPolicy::Reflect),
            NavOutcome::OffRoute
        );
        assert!(off_route.clicked.borrow().is_empty());
    }

    #[test]
    fn stale_entry_is_a_no_op() {
        let tree = FakeTree::new(&["#chg1", "#chg2"], Some("#chg1"));
        tree.stale.set(true);
        assert_eq!(
            advance(&tree, Direction::Next, FragmentPolicy::Reflect),
            NavOutcome::Stale
        );
        assert_eq!(tree.fragment_writes.get(), 0);
    }
}
