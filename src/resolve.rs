use std::collections::BTreeSet;

use rusqlite::{params, Connection};
use tracing::debug;

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::filter::{ResultRange, SearchFilter};
use crate::token::{user_mention, ClassifiedTokens};

/// Looks up accounts by username or alias.
pub trait UserDirectory {
    /// Ids of users with a username or alias `LIKE` the given pattern.
    fn find_users(&self, pattern: &str, limit: usize, offset: usize) -> Result<Vec<u64>>;
}

/// Directory backed by the `users` and `aliases` tables.
pub struct SqliteDirectory<'db> {
    db: &'db Connection,
}

impl<'db> SqliteDirectory<'db> {
    pub fn new(db: &'db Connection) -> Self {
        Self { db }
    }
}

impl UserDirectory for SqliteDirectory<'_> {
    fn find_users(&self, pattern: &str, limit: usize, offset: usize) -> Result<Vec<u64>> {
        let mut statement = self.db.prepare_cached(
            "
            select distinct ID from (
                select ID, Username as Name from users
                union all
                select User, Alias from aliases
            )
            where Name like ?
            order by ID
            limit ? offset ?
        ",
        )?;
        let ids = statement
            .query_map(params![pattern, limit as i64, offset as i64], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<u64>>>()?;
        Ok(ids)
    }
}

/// Turns user references into ids and fixes the result range.
///
/// A name that matches nobody fails the whole search, even when other names
/// in the same group resolve.
pub fn resolve<D: UserDirectory + ?Sized>(
    classified: ClassifiedTokens,
    directory: &D,
    config: &SearchConfig,
) -> Result<SearchFilter> {
    if !classified.is_searchable() {
        return Err(SearchError::EmptyFilter);
    }
    let message = classified.message();
    let mut users = BTreeSet::new();
    for user in &classified.users {
        if let Some(id) = user_mention(user) {
            users.insert(id);
            continue;
        }
        let name = user.strip_prefix('@').unwrap_or(user);
        let ids = directory.find_users(&format!("%{name}%"), config.fuzzy_limit, 0)?;
        if ids.is_empty() {
            return Err(SearchError::UnknownUser(name.to_string()));
        }
        debug!(name, matches = ids.len(), "resolved user name");
        users.extend(ids);
    }
    Ok(SearchFilter {
        users,
        channels: classified.channels,
        seconds: classified.seconds,
        message,
        range: classified.range.unwrap_or(ResultRange::first(config.display_rows)),
    })
}
