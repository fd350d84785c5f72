use serde::{Deserialize, Serialize};

use crate::browser::session::DEFAULT_BROWSER_SERVER;
use crate::error::ConfigError;

pub const DEFAULT_SETTINGS_FILE: &str = "ui-fixture.yaml";

/// Per-run fixture configuration: the defaults test scripts refer to by
/// placeholder, plus how to reach the browser.
///
/// Loaded from `ui-fixture.yaml` (or `--config`), then handed to each fixture
/// at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureSettings {
    #[serde(default)]
    pub default_user: String,

    #[serde(default)]
    pub default_password: String,

    #[serde(default)]
    pub default_company: String,

    #[serde(default)]
    pub default_date: String,

    /// Prefix for relative navigation targets; falls back to the UI's `url`
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_browser_server")]
    pub browser_server: String,

    #[serde(default = "default_wait_timeout_ms")]
    pub wait_timeout_ms: u64,
}

impl Default for FixtureSettings {
    fn default() -> Self {
        Self {
            default_user: String::new(),
            default_password: String::new(),
            default_company: String::new(),
            default_date: String::new(),
            base_url: None,
            browser_server: default_browser_server(),
            wait_timeout_ms: default_wait_timeout_ms(),
        }
    }
}

fn default_browser_server() -> String {
    DEFAULT_BROWSER_SERVER.to_string()
}

fn default_wait_timeout_ms() -> u64 {
    10_000
}

impl FixtureSettings {
    /// Replace `{user}`, `{password}`, `{company}` and `{date}` with the
    /// configured defaults. Other text passes through untouched.
    pub fn expand(&self, value: &str) -> String {
        if !value.contains('{') {
            return value.to_string();
        }
        value
            .replace("{user}", &self.default_user)
            .replace("{password}", &self.default_password)
            .replace("{company}", &self.default_company)
            .replace("{date}", &self.default_date)
    }
}

/// Load settings from a YAML file.
///
/// A missing file yields defaults. A file that exists but does not parse is
/// an error.
pub fn load_settings(path: Option<&str>) -> Result<FixtureSettings, ConfigError> {
    let settings_path = path.unwrap_or(DEFAULT_SETTINGS_FILE);
    match std::fs::read_to_string(settings_path) {
        Ok(content) => serde_yaml::from_str(&content).map_err(|e| ConfigError::InvalidSettings {
            path: settings_path.to_string(),
            source: e,
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = settings_path, "no settings file, using defaults");
            Ok(FixtureSettings::default())
        }
        Err(e) => Err(ConfigError::Io {
            path: settings_path.into(),
            source: e,
        }),
    }
}
