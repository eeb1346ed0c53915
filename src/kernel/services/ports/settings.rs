use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::config::SessionConfig;

/// User-editable settings, persisted as JSON. Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub scroll_sync: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dirty_debounce_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render_debounce_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_extension: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scroll_sync: true,
            dirty_debounce_ms: None,
            render_debounce_ms: None,
            default_extension: None,
        }
    }
}

impl Settings {
    pub fn session_config(&self) -> SessionConfig {
        let mut config = SessionConfig::default();
        if let Some(ms) = self.dirty_debounce_ms {
            config.dirty_debounce = Duration::from_millis(ms);
        }
        if let Some(ms) = self.render_debounce_ms {
            config.render_debounce = Duration::from_millis(ms);
        }
        if let Some(ext) = &self.default_extension {
            config.default_extension = ext.trim_start_matches('.').to_string();
        }
        config
    }
}
