use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use tracing::warn;

use crate::client::FetchOptions;

const DEFAULT_EVENT_BUFFER: usize = 100;
const DEFAULT_CACHE_CAPACITY: usize = 64;
const DEFAULT_COLLECTION_LABEL: &str = "Stock";
const CONFIG_FILE: &str = "config/stockview";

fn default_event_buffer() -> usize {
    DEFAULT_EVENT_BUFFER
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

fn default_collection_label() -> String {
    DEFAULT_COLLECTION_LABEL.to_string()
}

fn default_true() -> bool {
    true
}

/// Fetch expansion toggles as they appear in configuration.
///
/// The detail view cannot function without the expansions, so a disabled
/// toggle is overridden (with a warning) rather than honored.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FetchSettings {
    #[serde(default = "default_true")]
    pub part_detail: bool,
    #[serde(default = "default_true")]
    pub location_detail: bool,
    #[serde(default = "default_true")]
    pub path_detail: bool,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            part_detail: true,
            location_detail: true,
            path_detail: true,
        }
    }
}

impl FetchSettings {
    pub fn options(&self) -> FetchOptions {
        FetchOptions {
            part_detail: self.part_detail,
            location_detail: self.location_detail,
            path_detail: self.path_detail,
        }
    }
}

/// Configuration for the detail-view engine.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewConfig {
    /// Capacity of the event channel between the store/workflows and the
    /// embedding application.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,

    /// Maximum number of derived-view cache entries.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Label of the root breadcrumb entry.
    #[serde(default = "default_collection_label")]
    pub collection_label: String,

    #[serde(default)]
    pub fetch: FetchSettings,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            event_buffer: default_event_buffer(),
            cache_capacity: default_cache_capacity(),
            collection_label: default_collection_label(),
            fetch: FetchSettings::default(),
        }
    }
}

impl ViewConfig {
    /// Loads configuration from the optional `config/stockview` file,
    /// overlaid with `STOCKVIEW__*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix("STOCKVIEW").separator("__"))
            .build()?;

        let mut config: ViewConfig = settings.try_deserialize()?;
        config.enforce_mandatory_expansions();
        Ok(config)
    }

    /// Mandatory expansions win over configuration.
    fn enforce_mandatory_expansions(&mut self) {
        let fetch = &mut self.fetch;
        if !(fetch.part_detail && fetch.location_detail && fetch.path_detail) {
            warn!("fetch expansions are mandatory for the detail view; re-enabling");
            *fetch = FetchSettings::default();
        }
    }

    pub fn fetch_options(&self) -> FetchOptions {
        self.fetch.options()
    }
}
