use log::LevelFilter;
use serde::Deserialize;
use wasm_bindgen::JsValue;

use crate::error::HelperError;
use crate::file_nav::FragmentPolicy;
use crate::shortcuts::Keymap;

/// Global the userscript may set before the wasm module starts.
pub const WINDOW_CONFIG_KEY: &str = "__PR_HELPER_CONFIG__";
/// `CustomEvent` whose `detail` is a JSON config string, applied live.
pub const SETTINGS_EVENT: &str = "pr-helper-settings";

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct HelperConfig {
    pub auto_delete_branch: bool,
    pub file_navigation: bool,
    pub comment_toggles: bool,
    pub reflect_fragment: bool,
    pub collapse_key: String,
    pub hide_key: String,
    pub next_file_key: String,
    pub previous_file_key: String,
    pub setup_timeout_ms: u32,
    pub setup_poll_interval_ms: u32,
    pub log_level: String,
}

impl Default for HelperConfig {
    fn default() -> Self {
        Self {
            auto_delete_branch: true,
            file_navigation: true,
            comment_toggles: true,
            reflect_fragment: false,
            collapse_key: "c".to_string(),
            hide_key: "C".to_string(),
            next_file_key: "j".to_string(),
            previous_file_key: "k".to_string(),
            setup_timeout_ms: 10_000,
            setup_poll_interval_ms: 100,
            log_level: "info".to_string(),
        }
    }
}

impl HelperConfig {
    pub fn from_json(raw: &str) -> Result<Self, HelperError> {
        let config: HelperConfig =
            serde_json::from_str(raw).map_err(|e| HelperError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Config object set by the userscript, e.g. `{ reflect_fragment: true }`.
    pub fn from_js(value: JsValue) -> Result<Self, HelperError> {
        let config: HelperConfig = serde_wasm_bindgen::from_value(value)
            .map_err(|e| HelperError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), HelperError> {
        self.level_filter()?;
        for (name, key) in [
            ("collapse_key", &self.collapse_key),
            ("hide_key", &self.hide_key),
            ("next_file_key", &self.next_file_key),
            ("previous_file_key", &self.previous_file_key),
        ] {
            if key.is_empty() {
                return Err(HelperError::Config(format!("{name} must not be empty")));
            }
        }
        if self.setup_poll_interval_ms == 0 {
            return Err(HelperError::Config(
                "setup_poll_interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn level_filter(&self) -> Result<LevelFilter, HelperError> {
        self.log_level
            .parse()
            .map_err(|_| HelperError::Config(format!("unknown log level {:?}", self.log_level)))
    }

    pub fn fragment_policy(&self) -> FragmentPolicy {
        FragmentPolicy::from_flag(self.reflect_fragment)
    }

    pub fn keymap(&self) -> Keymap {
        Keymap {
            collapse: self.collapse_key.clone(),
            hide: self.hide_key.clone(),
            next_file: self.next_file_key.clone(),
            previous_file: self.previous_file_key.clone(),
        }
    }
}
