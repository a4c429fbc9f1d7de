use chrono::{DateTime, Utc};
use rusqlite::params_from_iter;
use tracing::debug;

use crate::cache::CachedStatementPair;
use crate::error::{Result, SearchError};
use crate::predicate::{clamp, CompiledQuery};

/// One listed chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub author: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing matched at all.
    NoResults,
    /// Only the number of matches was asked for.
    Counted(usize),
    /// Something matched, but not within the requested range.
    NoneInRange(usize),
    Listed { count: usize, rows: Vec<ResultRow> },
}

/// Counts the matches and, unless only a count was asked for, fetches the
/// clamped range of rows.
pub fn run(
    statements: &mut CachedStatementPair<'_>,
    query: &CompiledQuery,
    max_results: usize,
) -> Result<Outcome> {
    let count: usize = match statements
        .count
        .query_row(params_from_iter(query.params.iter()), |row| row.get(0))
    {
        Ok(count) => count,
        Err(rusqlite::Error::QueryReturnedNoRows) => return Err(SearchError::MissingAggregate),
        Err(err) => return Err(err.into()),
    };
    if count == 0 {
        return Ok(Outcome::NoResults);
    }
    let Some(window) = clamp(query.range, max_results) else {
        return Ok(Outcome::Counted(count));
    };
    debug!(count, limit = window.limit, offset = ?window.offset, "fetching rows");

    let params = query.params.iter().cloned().chain(window.params());
    let mut rows = statements.select.query(params_from_iter(params))?;
    let mut collected = Vec::with_capacity(window.limit);
    while let Some(row) = rows.next()? {
        if collected.len() == window.limit {
            break;
        }
        collected.push(ResultRow {
            author: row.get(0)?,
            message: row.get(1)?,
            timestamp: row.get(2)?,
        });
    }
    if collected.is_empty() {
        return Ok(Outcome::NoneInRange(count));
    }
    Ok(Outcome::Listed { count, rows: collected })
}
