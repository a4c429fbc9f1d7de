//! Settings consumed by the search command.
//!
//! Values are layered with the `config` crate: built-in defaults first, then
//! an optional settings file (any format `config` recognizes by extension),
//! then `CHATSEARCH_*` environment variables.

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_MAX_SEARCH_RESULTS: usize = 50;
pub const DEFAULT_DISPLAY_ROWS: usize = 5;
pub const DEFAULT_FUZZY_LIMIT: usize = 20;
pub const DEFAULT_COMMAND_TRIGGER: &str = "!search";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Largest number of rows a single search may list.
    pub max_search_results: usize,
    /// The bot's own account, whose messages never show up in results.
    pub self_id: u64,
    pub mod_channel_id: u64,
    pub spoiler_channel_id: u64,
    /// Messages starting with this word (followed by a space) are searches
    /// themselves and are excluded.
    pub command_trigger: String,
    /// Rows listed when no range is given; also the threshold for the
    /// "more results" flag.
    pub display_rows: usize,
    /// Cap on the accounts a single name fragment may resolve to.
    pub fuzzy_limit: usize,
    /// Path of the SQLite database, used by the binary.
    pub database: String,
    /// `tracing` filter directive, used by the binary.
    pub log: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_search_results: DEFAULT_MAX_SEARCH_RESULTS,
            self_id: 0,
            mod_channel_id: 0,
            spoiler_channel_id: 0,
            command_trigger: DEFAULT_COMMAND_TRIGGER.to_string(),
            display_rows: DEFAULT_DISPLAY_ROWS,
            fuzzy_limit: DEFAULT_FUZZY_LIMIT,
            database: "chatsearch.db".to_string(),
            log: "info".to_string(),
        }
    }
}

impl SearchConfig {
    /// Loads settings from `path` (extension optional, file optional) and the
    /// environment.
    pub fn load(path: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("CHATSEARCH").try_parsing(true))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}
