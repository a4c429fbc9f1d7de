use thiserror::Error;

/// Everything that can stop a search before a result listing is produced.
///
/// The `Display` text of each variant is what the requesting user sees, so
/// it is phrased for a chat reader rather than for a log.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Sorry, I'm busy processing another request right now. Please try again later!")]
    Busy,
    #[error("Error: No users specified")]
    NoUsers,
    #[error("Error: Unknown channel format {0} - Must be an actual recognized channel by discord!")]
    ChannelFormat(String),
    #[error("Error: Invalid number of seconds specified. Expected ~000")]
    Seconds,
    #[error("Error: {token} is not a valid {expected}")]
    Malformed { token: String, expected: &'static str },
    #[error("Error: Could not find any usernames or aliases matching {0}!")]
    UnknownUser(String),
    #[error("Error: no searchable terms specified! You must have either a message, a user, or a channel.")]
    EmptyFilter,
    #[error("Error: Failed to prepare statement!")]
    Prepare(String),
    #[error("Error: Expected 1 row, but got no rows!")]
    MissingAggregate,
    /// The driver text is logged, never shown.
    #[error("Error: Failed to search the chat log!")]
    Storage(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Lock poisoned: {0}")]
    Lock(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;

// Helper conversions
impl From<rusqlite::Error> for SearchError {
    fn from(e: rusqlite::Error) -> Self { Self::Storage(e.to_string()) }
}
impl From<config::ConfigError> for SearchError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
