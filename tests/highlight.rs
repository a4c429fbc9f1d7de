use chatsearch::execute::{Outcome, ResultRow};
use chatsearch::format::{format_row, highlight, neutralize_links, render};
use chrono::{TimeZone, Utc};
use proptest::prelude::*;

#[test]
fn every_occurrence_is_wrapped() {
    assert_eq!(highlight("hello there, hello", "hello"), "**hello** there, **hello**");
    assert_eq!(highlight("nothing here", "hello"), "nothing here");
    assert_eq!(highlight("untouched", ""), "untouched", "empty match leaves text alone");
}

#[test]
fn existing_emphasis_is_not_stacked() {
    assert_eq!(highlight("**hello** world", "hello"), "**hello** world");
    assert_eq!(highlight("**hello world", "hello"), "**hello** world");
    assert_eq!(highlight("****hello", "hello"), "**hello**");
}

#[test]
fn links_do_not_unfurl() {
    assert_eq!(
        neutralize_links("see http://a.b and https://c.d"),
        "see http\u{200B}://a.b and https\u{200B}://c.d"
    );
}

#[test]
fn row_layout() {
    let row = ResultRow {
        author: "alice".to_string(),
        message: "hello world".to_string(),
        timestamp: Utc.with_ymd_and_hms(2024, 1, 2, 15, 4, 5).unwrap(),
    };
    assert_eq!(format_row(&row, "world"), "[1/2 3:04:05PM] alice: hello **world**\n");
}

fn rows(n: usize) -> Vec<ResultRow> {
    (0..n)
        .map(|i| ResultRow {
            author: "bob".to_string(),
            message: format!("message {i} https://example.com"),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, i as u32).unwrap(),
        })
        .collect()
}

#[test]
fn rendered_outcomes() {
    assert_eq!(render(&Outcome::NoResults, "", 5).text, "```No results found.```");
    assert_eq!(render(&Outcome::NoneInRange(7), "", 5).text, "```No results in range.```");

    let counted = render(&Outcome::Counted(1), "", 5);
    assert_eq!(counted.text, "```Search results: 1 match.```\n");
    assert!(!counted.more);

    let listed = render(&Outcome::Listed { count: 12, rows: rows(5) }, "message", 5);
    assert!(listed.text.starts_with("```Search results: 12 matches.```\n[3/4 9:00:00AM] bob: **message** 0"));
    assert!(listed.text.contains("https\u{200B}://example.com"));
    assert!(!listed.text.contains("https://"));
    assert!(!listed.more, "five rows fit the display");

    let listed = render(&Outcome::Listed { count: 12, rows: rows(6) }, "message", 5);
    assert!(listed.more, "a sixth row signals more results");
}

proptest! {
    #[test]
    fn highlighting_is_idempotent(text in "[ab* ]{0,24}", pattern in "[ab ]{1,3}") {
        let once = highlight(&text, &pattern);
        prop_assert_eq!(highlight(&once, &pattern), once);
    }
}
