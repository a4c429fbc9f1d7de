//! Chatsearch – a free-text search command over a rolling chat log.
//!
//! A search is a list of loosely structured tokens, for example
//! `@cloud|@JamesNotABot <#111> ~600 *4 hello there`. The tokens are turned
//! into a parameterized SQL query against the chat log, run, and the
//! resulting messages formatted for a chat reply.
//!
//! ## Pipeline
//! * [`token`] – Classifies tokens into ranges, user groups, channel
//!   mentions, recency windows and message text.
//! * [`resolve`] – Turns user names into ids through a [`resolve::UserDirectory`],
//!   matching usernames and aliases by substring.
//! * [`predicate`] – Builds the canonical `WHERE` clause and its parameters,
//!   and clamps the requested range.
//! * [`cache`] – Keeps one prepared count/select statement pair per query shape.
//! * [`flight`] – Rejects a search while another one is running.
//! * [`execute`] – Counts, then fetches the requested rows.
//! * [`format`] – Highlights matches, defuses links and composes the reply.
//! * [`command`] – [`command::SearchCommand`] wires all of the above.
//!
//! ## Quick Start
//! ```
//! use std::sync::Arc;
//! use rusqlite::Connection;
//! use chatsearch::{command::SearchCommand, config::SearchConfig, filter::MessageContext};
//! use chatsearch::{flight::SingleFlight, persist::Persistor};
//! let conn = Connection::open_in_memory().unwrap();
//! let mut persistor = Persistor::new(&conn).unwrap();
//! persistor.persist_user(42, "alice").unwrap();
//! persistor.persist_message(1, 42, 111, "hello world", chrono::Utc::now()).unwrap();
//! let command = SearchCommand::new(&conn, SearchConfig::default(), Arc::new(SingleFlight::new()));
//! let reply = command.process(&["@alice", "hello"], &MessageContext::default());
//! assert!(reply.text.contains("**hello** world"));
//! ```
//!
//! ## Storage
//! The [`persist::Persistor`] creates the `chatlog`, `users` and `aliases`
//! tables in SQLite. The search only ever reads them.

pub mod cache;
pub mod command;
pub mod config;
pub mod error;
pub mod execute;
pub mod filter;
pub mod flight;
pub mod format;
pub mod persist;
pub mod predicate;
pub mod resolve;
pub mod token;
