use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::BuildHasherDefault;

use rusqlite::{Connection, Statement};
use seahash::SeaHasher;
use tracing::{debug, error};

use crate::error::{Result, SearchError};
use crate::predicate::CompiledQuery;

pub type QueryHasher = BuildHasherDefault<SeaHasher>;

/// Prepared statements for one query shape.
pub struct CachedStatementPair<'db> {
    pub count: Statement<'db>,
    pub select: Statement<'db>,
}

/// Keeps one statement pair per canonical query text.
///
/// Entries live as long as the cache. Nothing is ever evicted, which relies
/// on equivalent searches producing identical text.
pub struct StatementCache<'db> {
    db: &'db Connection,
    kept: HashMap<String, CachedStatementPair<'db>, QueryHasher>,
}

impl<'db> StatementCache<'db> {
    pub fn new(db: &'db Connection) -> Self {
        Self {
            db,
            kept: HashMap::default(),
        }
    }
    /// Returns the pair for `query`, preparing both statements on a miss.
    /// Nothing is kept when either statement fails to prepare.
    pub fn get_or_prepare(&mut self, query: &CompiledQuery) -> Result<&mut CachedStatementPair<'db>> {
        let db = self.db;
        match self.kept.entry(query.paginated.clone()) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => {
                let prepared = db
                    .prepare(&query.count_sql())
                    .and_then(|count| Ok((count, db.prepare(&query.select_sql())?)));
                match prepared {
                    Ok((count, select)) => {
                        debug!(query = %query.paginated, "prepared search statements");
                        Ok(e.insert(CachedStatementPair { count, select }))
                    }
                    Err(err) => {
                        error!(error = %err, query = %query.paginated, "could not prepare search statements");
                        Err(SearchError::Prepare(err.to_string()))
                    }
                }
            }
        }
    }
    pub fn contains(&self, query: &CompiledQuery) -> bool {
        self.kept.contains_key(&query.paginated)
    }
    pub fn len(&self) -> usize {
        self.kept.len()
    }
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }
}
