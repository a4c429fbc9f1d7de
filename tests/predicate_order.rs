use std::cell::Cell;

use chatsearch::config::SearchConfig;
use chatsearch::error::{Result, SearchError};
use chatsearch::filter::{MessageContext, ResultRange};
use chatsearch::predicate::{build, clamp, CompiledQuery, Param, Window};
use chatsearch::resolve::{resolve, UserDirectory};
use chatsearch::token::classify;

/// Directory over a fixed list, counting how often it is asked.
struct Names {
    users: Vec<(u64, &'static str)>,
    lookups: Cell<usize>,
}

impl Names {
    fn new(users: Vec<(u64, &'static str)>) -> Self {
        Self { users, lookups: Cell::new(0) }
    }
}

impl UserDirectory for Names {
    fn find_users(&self, pattern: &str, limit: usize, offset: usize) -> Result<Vec<u64>> {
        self.lookups.set(self.lookups.get() + 1);
        let needle = pattern.trim_matches('%').to_lowercase();
        Ok(self
            .users
            .iter()
            .filter(|(_, name)| name.to_lowercase().contains(&needle))
            .map(|(id, _)| *id)
            .skip(offset)
            .take(limit)
            .collect())
    }
}

fn config() -> SearchConfig {
    SearchConfig {
        self_id: 1,
        mod_channel_id: 999,
        spoiler_channel_id: 555,
        max_search_results: 10,
        ..SearchConfig::default()
    }
}

fn context() -> MessageContext {
    MessageContext { message_id: 9000, channel_id: 111, author_id: 42 }
}

fn compile(tokens: &[&str], directory: &Names) -> Result<CompiledQuery> {
    let config = config();
    let filter = resolve(classify(tokens)?, directory, &config)?;
    Ok(build(&filter, &context(), &config))
}

fn permutations(items: &[&'static str]) -> Vec<Vec<&'static str>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut all = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let first = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, first);
            all.push(tail);
        }
    }
    all
}

#[test]
fn fragment_order_does_not_change_the_query() {
    let directory = Names::new(vec![(42, "alice")]);
    let tokens = ["<#111>|<#222>", "@alice", "*3-4", "hello", "~60"];
    let reference = compile(&tokens, &directory).expect("reference query");
    for order in permutations(&tokens) {
        let query = compile(&order, &directory).expect("permuted query");
        assert_eq!(query.predicate, reference.predicate, "order {order:?}");
        assert_eq!(query.paginated, reference.paginated, "order {order:?}");
        assert_eq!(query.params, reference.params, "order {order:?}");
    }
}

#[test]
fn duplicate_mentions_collapse() {
    let directory = Names::new(vec![]);
    let once = compile(&["<@42>", "<#111>", "hi"], &directory).expect("once");
    let twice = compile(&["<@42>|<@42>", "<#111>", "<#111>", "hi"], &directory).expect("twice");
    assert_eq!(once, twice);
}

#[test]
fn channel_user_message_scenario() {
    let directory = Names::new(vec![(42, "alice")]);
    let query = compile(&["<#111>", "@alice", "*3", "hello"], &directory).expect("query");
    assert!(query.predicate.starts_with("(C.Author = ?) AND (C.Channel = ?) AND C.Message LIKE ? AND "));
    assert_eq!(
        &query.params[..3],
        &[Param::Id(42), Param::Id(111), Param::Text("%hello%".to_string())]
    );
    assert_eq!(query.range, ResultRange::Rows { begin: 0, end: 3 });
    assert!(query.paginated.ends_with(" LIMIT ?"));
    assert_eq!(clamp(query.range, 10), Some(Window { limit: 3, offset: None }));
    assert_eq!(clamp(query.range, 2), Some(Window { limit: 2, offset: None }));
}

#[test]
fn exclusions_close_the_clause_in_order() {
    let directory = Names::new(vec![]);
    let query = compile(&["hello"], &directory).expect("query");
    assert_eq!(
        query.predicate,
        "C.Message LIKE ? AND C.Channel != ? AND C.ID != ? AND C.Author != ? AND C.Channel != ? \
         AND C.Message NOT LIKE ? ORDER BY C.Timestamp DESC"
    );
    assert_eq!(
        query.params,
        vec![
            Param::Text("%hello%".to_string()),
            Param::Id(555),
            Param::Id(9000),
            Param::Id(1),
            Param::Id(999),
            Param::Text("!search %".to_string()),
        ]
    );
}

#[test]
fn spoiler_channel_is_searchable_from_inside() {
    let config = config();
    let filter = resolve(classify(&["hello"]).unwrap(), &Names::new(vec![]), &config).unwrap();
    let inside = MessageContext { channel_id: 555, ..context() };
    let query = build(&filter, &inside, &config);
    assert!(!query.params.contains(&Param::Id(555)));
    assert!(query.predicate.starts_with("C.Message LIKE ? AND C.ID != ?"));
}

#[test]
fn pagination_placeholders_follow_the_range() {
    let directory = Names::new(vec![]);
    let listing = compile(&["hi"], &directory).expect("default range");
    assert_eq!(listing.range, ResultRange::first(5));
    assert_eq!(listing.paginated, format!("{} LIMIT ?", listing.predicate));

    let offset = compile(&["hi", "*5-10"], &directory).expect("offset range");
    assert_eq!(offset.paginated, format!("{} LIMIT ? OFFSET ?", offset.predicate));

    let count = compile(&["hi", "*"], &directory).expect("count only");
    assert_eq!(count.paginated, count.predicate);
}

#[test]
fn several_users_become_alternatives() {
    let directory = Names::new(vec![(7, "cloud"), (8, "cloudy"), (9, "james")]);
    let query = compile(&["@cloud|@james"], &directory).expect("query");
    assert!(query.predicate.starts_with("(C.Author = ? OR C.Author = ? OR C.Author = ?) AND "));
    assert_eq!(&query.params[..3], &[Param::Id(7), Param::Id(8), Param::Id(9)]);
}

#[test]
fn recency_only_when_not_negative() {
    let directory = Names::new(vec![]);
    let recent = compile(&["hi", "~60"], &directory).expect("recent");
    assert!(recent.predicate.contains("julianday(C.Timestamp) > julianday('now') - ? / 86400.0 AND "));
    assert!(recent.params.contains(&Param::Int(60)));
    let unbounded = compile(&["hi", "~-1"], &directory).expect("unbounded");
    assert!(!unbounded.predicate.contains("julianday"));
}

#[test]
fn empty_filter_never_consults_the_directory() {
    let directory = Names::new(vec![(42, "alice")]);
    let res = compile(&["*3", "~60"], &directory);
    assert!(matches!(res, Err(SearchError::EmptyFilter)));
    assert_eq!(directory.lookups.get(), 0);
}

#[test]
fn one_unknown_name_fails_the_whole_group() {
    let directory = Names::new(vec![(42, "alice")]);
    match compile(&["@alice|@nobody", "hi"], &directory) {
        Err(SearchError::UnknownUser(name)) => assert_eq!(name, "nobody"),
        other => panic!("expected unknown user, got {other:?}"),
    }
}

#[test]
fn mentions_skip_the_directory() {
    let directory = Names::new(vec![]);
    let query = compile(&["<@!42>"], &directory).expect("mention");
    assert_eq!(query.params[0], Param::Id(42));
    assert_eq!(directory.lookups.get(), 0);
}
