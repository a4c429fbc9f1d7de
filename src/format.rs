use crate::execute::{Outcome, ResultRow};

/// Text handed back to the caller, plus whether more rows were listed than
/// fit the usual display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReply {
    pub text: String,
    pub more: bool,
}

impl SearchReply {
    /// A single preformatted line with no follow-up.
    pub fn notice(text: impl AsRef<str>) -> Self {
        Self { text: fence(text.as_ref()), more: false }
    }
}

pub fn fence(text: &str) -> String {
    format!("```{text}```")
}

/// Wraps every occurrence of `pattern` in `**`.
///
/// Emphasis already surrounding the pattern (`**m**`, or just `**m`) is
/// stripped first, so formatting the same text twice gives the same result.
pub fn highlight(text: &str, pattern: &str) -> String {
    if pattern.is_empty() {
        return text.to_string();
    }
    let wrapped = format!("**{pattern}**");
    let opened = format!("**{pattern}");
    let mut text = text.to_string();
    loop {
        let stripped = text.replace(&wrapped, pattern).replace(&opened, pattern);
        if stripped == text {
            break;
        }
        text = stripped;
    }
    text.replace(pattern, &wrapped)
}

/// Keeps chat clients from expanding links into previews.
pub fn neutralize_links(text: &str) -> String {
    text.replace("http://", "http\u{200B}://")
        .replace("https://", "https\u{200B}://")
}

pub fn format_row(row: &ResultRow, pattern: &str) -> String {
    format!(
        "[{}] {}: {}\n",
        row.timestamp.format("%-m/%-d %-I:%M:%S%p"),
        row.author,
        highlight(&row.message, pattern)
    )
}

fn header(count: usize) -> String {
    let noun = if count == 1 { "match" } else { "matches" };
    fence(&format!("Search results: {count} {noun}."))
}

/// Renders an executed search. `display_rows` is the listing size beyond
/// which the reply reports that more results are available.
pub fn render(outcome: &Outcome, pattern: &str, display_rows: usize) -> SearchReply {
    match outcome {
        Outcome::NoResults => SearchReply::notice("No results found."),
        Outcome::NoneInRange(_) => SearchReply::notice("No results in range."),
        Outcome::Counted(count) => SearchReply { text: header(*count) + "\n", more: false },
        Outcome::Listed { count, rows } => {
            let mut text = header(*count) + "\n";
            for row in rows {
                text.push_str(&format_row(row, pattern));
            }
            SearchReply {
                text: neutralize_links(&text),
                more: rows.len() > display_rows,
            }
        }
    }
}
