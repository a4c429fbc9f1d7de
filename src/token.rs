//! Splits the raw search arguments into typed filter fragments.
//!
//! Classification looks at the first one or two characters of a token only:
//!
//! | Prefix       | Meaning                                        |
//! |--------------|------------------------------------------------|
//! | `*`          | result range (`*`, `*N`, `*A-B`)               |
//! | `@`, `<@`    | user group, alternatives separated by a pipe   |
//! | `#`          | rejected, channels must be real mentions       |
//! | `<#`         | channel group, alternatives separated by a pipe|
//! | `~`          | recency window in seconds                      |
//! | anything else| part of the message text                       |

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Result, SearchError};
use crate::filter::ResultRange;

lazy_static! {
    static ref USER_MENTION: Regex = Regex::new(r"^<@!?([0-9]+)>$").unwrap();
    static ref CHANNEL_MENTION: Regex = Regex::new(r"^<#([0-9]+)>$").unwrap();
}

/// The id embedded in a `<@id>` or `<@!id>` mention.
pub fn user_mention(token: &str) -> Option<u64> {
    USER_MENTION
        .captures(token)
        .and_then(|c| c[1].parse().ok())
}

/// The id embedded in a `<#id>` mention.
pub fn channel_mention(token: &str) -> Option<u64> {
    CHANNEL_MENTION
        .captures(token)
        .and_then(|c| c[1].parse().ok())
}

/// Output of [`classify`]. User references are still unresolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedTokens {
    /// Mentions (`<@id>`) or names (`@name` / `name`) in the order given.
    pub users: Vec<String>,
    pub channels: BTreeSet<u64>,
    pub seconds: Option<i64>,
    pub messages: Vec<String>,
    /// `None` when no `*` token was given.
    pub range: Option<ResultRange>,
}

impl ClassifiedTokens {
    pub fn message(&self) -> String {
        self.messages.join(" ")
    }
    pub fn is_searchable(&self) -> bool {
        !self.users.is_empty() || !self.channels.is_empty() || !self.messages.is_empty()
    }
}

pub fn classify<S: AsRef<str>>(tokens: &[S]) -> Result<ClassifiedTokens> {
    let mut classified = ClassifiedTokens::default();
    for token in tokens.iter().map(AsRef::as_ref) {
        if token.is_empty() {
            continue;
        }
        if let Some(bounds) = token.strip_prefix('*') {
            classified.range = Some(parse_range(token, bounds)?);
        } else if token.starts_with('@') || token.starts_with("<@") {
            classify_users(token, &mut classified.users)?;
        } else if token.starts_with('#') {
            return Err(SearchError::ChannelFormat(token.to_string()));
        } else if token.starts_with("<#") {
            for channel in token.split('|').map(str::trim) {
                let id = channel_mention(channel)
                    .ok_or_else(|| SearchError::ChannelFormat(channel.to_string()))?;
                classified.channels.insert(id);
            }
        } else if let Some(seconds) = token.strip_prefix('~') {
            if seconds.is_empty() {
                return Err(SearchError::Seconds);
            }
            let seconds = seconds.parse::<i64>().map_err(|_| SearchError::Malformed {
                token: token.to_string(),
                expected: "number of seconds",
            })?;
            classified.seconds = Some(seconds);
        } else {
            classified.messages.push(token.to_string());
        }
    }
    Ok(classified)
}

fn classify_users(token: &str, users: &mut Vec<String>) -> Result<()> {
    let before = users.len();
    for user in token.split('|').map(str::trim) {
        // "@" on its own names nobody
        if user.is_empty() || user == "@" || user == "<@" {
            continue;
        }
        users.push(user.to_string());
    }
    if users.len() == before {
        return Err(SearchError::NoUsers);
    }
    Ok(())
}

fn parse_range(token: &str, bounds: &str) -> Result<ResultRange> {
    if bounds.is_empty() {
        return Ok(ResultRange::CountOnly);
    }
    // bounds end up as SQLite integers, so they must fit an i64
    let bound = |text: &str| {
        text.parse::<i64>()
            .ok()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| SearchError::Malformed {
                token: token.to_string(),
                expected: "result range",
            })
    };
    match bounds.split_once('-') {
        Some((begin, end)) => Ok(ResultRange::Rows { begin: bound(begin)?, end: bound(end)? }),
        None => Ok(ResultRange::first(bound(bounds)?)),
    }
}
