use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tracing::{error, info, info_span, warn};

use crate::cache::StatementCache;
use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::execute::run;
use crate::filter::MessageContext;
use crate::flight::SingleFlight;
use crate::format::{render, SearchReply};
use crate::predicate::build;
use crate::resolve::{resolve, SqliteDirectory, UserDirectory};
use crate::token::classify;

const USAGE: &str = "[*[result-range]] [@user[|@user2|...]] [#channel[|#channel2|...]] [~seconds] [message]";

/// The chat log search command.
///
/// One instance serves one connection. Commands that share an
/// `Arc<SingleFlight>` never run searches at the same time.
pub struct SearchCommand<'db> {
    config: SearchConfig,
    directory: Box<dyn UserDirectory + 'db>,
    flight: Arc<SingleFlight>,
    // The borrowed connection keeps this type on one thread, so the lock is
    // never contended. It only lets `search` take `&self`.
    statements: Mutex<StatementCache<'db>>,
}

impl<'db> SearchCommand<'db> {
    pub fn new(db: &'db Connection, config: SearchConfig, flight: Arc<SingleFlight>) -> Self {
        Self::with_directory(db, config, flight, Box::new(SqliteDirectory::new(db)))
    }
    /// Like [`SearchCommand::new`] but resolving names through `directory`.
    pub fn with_directory(
        db: &'db Connection,
        config: SearchConfig,
        flight: Arc<SingleFlight>,
        directory: Box<dyn UserDirectory + 'db>,
    ) -> Self {
        Self {
            config,
            directory,
            flight,
            statements: Mutex::new(StatementCache::new(db)),
        }
    }
    pub fn name(&self) -> &'static str {
        "Search"
    }
    pub fn usage_short(&self) -> &'static str {
        "Performs a complex search on the chat history."
    }
    pub fn usage(&self) -> String {
        format!(
            "{trigger} {USAGE}\n\
            Searches the chat log. All parameters are optional and may come in any order; \
            they are combined into a single search, but at least a message, a user or a channel is required.\n\
            *N returns the first N results, *A-B the A-th to the B-th result (inclusive), \
            and a lone * only reports how many results there are. At most {max} results are listed.\n\
            @user searches for a user. A ping uses the user id directly, a name is looked up in the username \
            and alias tables. Separate several users with | to search for any of them; each still needs its @.\n\
            #channel must be a channel mention recognized by discord. Several channels are separated the same way.\n\
            ~N only searches the last N seconds, so ~600 covers the past 10 minutes.\n\
            Everything else is the message to look for; it does not need quotes.\n\n\
            Example: {trigger} #manechat @cloud|@JamesNotABot *4 ~600\n\
            Returns the 4 most recent messages in #manechat from the past 10 minutes by any user with \"cloud\" \
            in their name, or by JamesNotABot.",
            trigger = self.config.command_trigger,
            max = self.config.max_search_results,
        )
    }
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
    pub fn single_flight(&self) -> &Arc<SingleFlight> {
        &self.flight
    }
    /// Number of distinct query shapes prepared so far.
    pub fn cached_statements(&self) -> usize {
        self.statements.lock().map(|s| s.len()).unwrap_or(0)
    }

    /// Runs a search and renders its reply. Every failure becomes a one-line
    /// reply without the "more" flag.
    pub fn process<S: AsRef<str>>(&self, tokens: &[S], context: &MessageContext) -> SearchReply {
        match self.search(tokens, context) {
            Ok(reply) => reply,
            Err(err) => {
                match &err {
                    SearchError::Storage(cause) => error!(%cause, "search failed"),
                    SearchError::Lock(cause) => error!(%cause, "search failed"),
                    _ => warn!(reason = %err, "search rejected"),
                }
                SearchReply::notice(err.to_string())
            }
        }
    }

    pub fn search<S: AsRef<str>>(&self, tokens: &[S], context: &MessageContext) -> Result<SearchReply> {
        let span = info_span!(
            "search",
            message_id = context.message_id,
            channel = context.channel_id,
            author = context.author_id
        );
        let _entered = span.enter();

        let Some(_permit) = self.flight.try_acquire() else {
            return Err(SearchError::Busy);
        };
        let classified = classify(tokens)?;
        let filter = resolve(classified, &*self.directory, &self.config)?;
        let query = build(&filter, context, &self.config);

        let mut statements = self
            .statements
            .lock()
            .map_err(|e| SearchError::Lock(e.to_string()))?;
        let pair = statements.get_or_prepare(&query)?;
        let outcome = run(pair, &query, self.config.max_search_results)?;
        let reply = render(&outcome, &query.message, self.config.display_rows);
        info!(users = filter.users.len(), channels = filter.channels.len(), more = reply.more, "search complete");
        Ok(reply)
    }
}
