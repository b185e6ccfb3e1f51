use crate::comments::VisibilityToggle;
use crate::file_nav::Direction;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    ToggleCollapsed,
    ToggleHidden,
    NextFile,
    PreviousFile,
}

impl Command {
    pub fn visibility_toggle(self) -> Option<VisibilityToggle> {
        match self {
            Command::ToggleCollapsed => Some(VisibilityToggle::Collapse),
            Command::ToggleHidden => Some(VisibilityToggle::Hide),
            _ => None,
        }
    }

    pub fn direction(self) -> Option<Direction> {
        match self {
            Command::NextFile => Some(Direction::Next),
            Command::PreviousFile => Some(Direction::Previous),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Keymap {
    pub collapse: String,
    pub hide: String,
    pub next_file: String,
    pub previous_file: String,
}

/// The parts of a `keydown` event the dispatcher looks at.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    pub shift: bool,
    pub meta: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// Focus is in an input, textarea, button or editable content.
    pub in_editable: bool,
}

impl KeyPress {
    fn has_platform_modifier(&self) -> bool {
        self.meta || self.ctrl || self.alt
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Enabled {
    pub comment_toggles: bool,
    pub file_navigation: bool,
}

pub fn dispatch(keymap: &Keymap, enabled: Enabled, press: &KeyPress) -> Option<Command> {
    if press.in_editable || press.has_platform_modifier() {
        return None;
    }
    let key = press.key.as_str();

    if enabled.comment_toggles {
        if key == keymap.hide && press.shift == is_shifted(&keymap.hide) {
            return Some(Command::ToggleHidden);
        }
        if key == keymap.collapse && press.shift == is_shifted(&keymap.collapse) {
            return Some(Command::ToggleCollapsed);
        }
    }
    if enabled.file_navigation && !press.shift {
        if key == keymap.next_file {
            return Some(Command::NextFile);
        }
        if key == keymap.previous_file {
            return Some(Command::PreviousFile);
        }
    }
    None
}

/// A single uppercase letter, which the browser only reports with Shift held.
pub(crate) fn is_shifted(key: &str) -> bool {
    let mut chars = key.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HelperConfig;

    const ALL: Enabled = Enabled {
        comment_toggles: true,
        file_navigation: true,
    };

    fn press(key: &str) -> KeyPress {
        KeyPress {
            key: key.to_string(),
            shift: key.chars().any(|c| c.is_ascii_uppercase()),
            ..KeyPress::default()
        }
    }

    #[test]
    fn default_keys_map_to_commands() {
        let keymap = HelperConfig::default().keymap();
        assert_eq!(dispatch(&keymap, ALL, &press("c")), Some(Command::ToggleCollapsed));
        assert_eq!(dispatch(&keymap, ALL, &press("C")), Some(Command::ToggleHidden));
        assert_eq!(dispatch(&keymap, ALL, &press("j")), Some(Command::NextFile));
        assert_eq!(dispatch(&keymap, ALL, &press("k")), Some(Command::PreviousFile));
        assert_eq!(dispatch(&keymap, ALL, &press("x")), None);
    }

    #[test]
    fn uppercase_without_shift_is_not_the_hide_key() {
        // Caps lock produces "C" with shift up.
        let keymap = HelperConfig::default().keymap();
        let caps = KeyPress {
            key: "C".to_string(),
            ..KeyPress::default()
        };
        assert_eq!(dispatch(&keymap, ALL, &caps), None);
    }

    #[test]
    fn editable_focus_suppresses_everything() {
        let keymap = HelperConfig::default().keymap();
        for key in ["c", "C", "j", "k"] {
            let typing = KeyPress {
                in_editable: true,
                ..press(key)
            };
            assert_eq!(dispatch(&keymap, ALL, &typing), None, "{key}");
        }
    }

    #[test]
    fn platform_modifiers_suppress_shortcuts() {
        let keymap = HelperConfig::default().keymap();
        let copy = KeyPress {
            ctrl: true,
            ..press("c")
        };
        let cmd_c = KeyPress {
            meta: true,
            ..press("c")
        };
        let alt_j = KeyPress {
            alt: true,
            ..press("j")
        };
        assert_eq!(dispatch(&keymap, ALL, &copy), None);
        assert_eq!(dispatch(&keymap, ALL, &cmd_c), None);
        assert_eq!(dispatch(&keymap, ALL, &alt_j), None);
    }

    #[test]
    fn disabled_features_do_not_claim_keys() {
        let keymap = HelperConfig::default().keymap();
        let nav_only = Enabled {
            comment_toggles: false,
            file_navigation: true,
        };
        assert_eq!(dispatch(&keymap, nav_only, &press("c")), None);
        assert_eq!(dispatch(&keymap, nav_only, &press("j")), Some(Command::NextFile));
    }

    #[test]
    fn commands_split_into_their_features() {
        assert_eq!(
            Command::ToggleHidden.visibility_toggle(),
            Some(VisibilityToggle::Hide)
        );
        assert_eq!(Command::PreviousFile.direction(), Some(Direction::Previous));
        assert_eq!(Command::NextFile.visibility_toggle(), None);
    }
}
