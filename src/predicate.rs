//! Assembles the `WHERE` clause of a search.
//!
//! Fragments are always appended in the same order (users, channels,
//! message, recency, exclusions) whatever order the tokens came in, so two
//! equivalent searches produce the same text. That text is also the key of
//! the statement cache.

use rusqlite::types::{ToSql, ToSqlOutput};

use crate::config::SearchConfig;
use crate::filter::{MessageContext, ResultRange, SearchFilter};

/// A positional statement parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Id(u64),
    Int(i64),
    Text(String),
}

impl ToSql for Param {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            Param::Id(id) => id.to_sql(),
            Param::Int(int) => int.to_sql(),
            Param::Text(text) => text.to_sql(),
        }
    }
}

/// Keeps every fragment next to the parameters it binds.
#[derive(Debug, Default)]
struct PredicateBuilder {
    text: String,
    params: Vec<Param>,
}

impl PredicateBuilder {
    fn push(&mut self, fragment: &str, params: impl IntoIterator<Item = Param>) {
        self.text.push_str(fragment);
        self.params.extend(params);
    }
    /// `(column = ? OR column = ?) AND ` for a non-empty group.
    fn push_any<'a>(&mut self, column: &str, ids: impl ExactSizeIterator<Item = &'a u64>) {
        if ids.len() == 0 {
            return;
        }
        let mut alternatives = Vec::with_capacity(ids.len());
        for id in ids {
            alternatives.push(format!("{column} = ?"));
            self.params.push(Param::Id(*id));
        }
        self.text.push('(');
        self.text.push_str(&alternatives.join(" OR "));
        self.text.push_str(") AND ");
    }
}

/// The canonical text of a search together with its bound parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery {
    /// Un-paginated clause, used by the count statement.
    pub predicate: String,
    /// Clause with the `LIMIT`/`OFFSET` placeholders the range needs. This is
    /// the cache key.
    pub paginated: String,
    /// Parameters of `predicate`; pagination values are appended at execution.
    pub params: Vec<Param>,
    pub range: ResultRange,
    pub message: String,
}

impl CompiledQuery {
    pub fn count_sql(&self) -> String {
        format!("SELECT COUNT(*) FROM chatlog C WHERE {}", self.predicate)
    }
    pub fn select_sql(&self) -> String {
        format!(
            "SELECT U.Username, C.Message, C.Timestamp FROM chatlog C INNER JOIN users U ON C.Author = U.ID WHERE {}",
            self.paginated
        )
    }
}

pub fn build(filter: &SearchFilter, context: &MessageContext, config: &SearchConfig) -> CompiledQuery {
    let mut builder = PredicateBuilder::default();
    builder.push_any("C.Author", filter.users.iter());
    builder.push_any("C.Channel", filter.channels.iter());
    if !filter.message.is_empty() {
        builder.push("C.Message LIKE ? AND ", [Param::Text(format!("%{}%", filter.message))]);
    }
    if let Some(seconds) = filter.seconds.filter(|s| *s >= 0) {
        builder.push(
            "julianday(C.Timestamp) > julianday('now') - ? / 86400.0 AND ",
            [Param::Int(seconds)],
        );
    }
    // exclusions close the clause, so it never ends in a dangling AND
    if context.channel_id != config.spoiler_channel_id {
        builder.push("C.Channel != ? AND ", [Param::Id(config.spoiler_channel_id)]);
    }
    builder.push("C.ID != ? AND ", [Param::Id(context.message_id)]);
    builder.push("C.Author != ? AND ", [Param::Id(config.self_id)]);
    builder.push("C.Channel != ? AND ", [Param::Id(config.mod_channel_id)]);
    builder.push(
        "C.Message NOT LIKE ? ORDER BY C.Timestamp DESC",
        [Param::Text(format!("{} %", config.command_trigger))],
    );

    let predicate = builder.text;
    let mut paginated = predicate.clone();
    if filter.range.has_limit() {
        paginated.push_str(" LIMIT ?");
        if filter.range.has_offset() {
            paginated.push_str(" OFFSET ?");
        }
    }
    CompiledQuery {
        predicate,
        paginated,
        params: builder.params,
        range: filter.range,
        message: filter.message.clone(),
    }
}

/// The rows a clamped range fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub limit: usize,
    /// Zero-based; `None` when the statement has no `OFFSET` placeholder.
    pub offset: Option<usize>,
}

impl Window {
    pub fn params(&self) -> Vec<Param> {
        let int = |n: usize| Param::Int(i64::try_from(n).unwrap_or(i64::MAX));
        let mut params = vec![int(self.limit)];
        if let Some(offset) = self.offset {
            params.push(int(offset));
        }
        params
    }
}

/// Shrinks a requested range to at most `max` rows, keeping where it starts.
///
/// Returns `None` for count-only ranges.
pub fn clamp(range: ResultRange, max: usize) -> Option<Window> {
    match range {
        ResultRange::CountOnly => None,
        ResultRange::Rows { begin: 0, end } => Some(Window { limit: end.min(max), offset: None }),
        ResultRange::Rows { begin, end } => {
            let end = end.max(begin);
            Some(Window {
                limit: (end - begin + 1).min(max),
                offset: Some(begin - 1),
            })
        }
    }
}
