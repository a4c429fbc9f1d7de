use std::sync::Arc;

use rusqlite::Connection;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chatsearch::command::SearchCommand;
use chatsearch::config::SearchConfig;
use chatsearch::error::Result;
use chatsearch::filter::MessageContext;
use chatsearch::flight::SingleFlight;
use chatsearch::persist::Persistor;

/// Runs one search given on the command line, e.g.
/// `chatsearch @cloud ~600 *4 hello`.
///
/// Settings come from `chatsearch.{toml,json,yaml}` (or the file named by
/// `CHATSEARCH_CONFIG`) and `CHATSEARCH_*` environment variables.
fn main() -> Result<()> {
    let path = std::env::var("CHATSEARCH_CONFIG").unwrap_or_else(|_| "chatsearch".to_string());
    let config = SearchConfig::load(&path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log)),
        )
        .init();

    let connection = Connection::open(&config.database)?;
    // makes sure the tables exist
    Persistor::new(&connection)?;
    info!(database = %config.database, "chat log opened");

    let command = SearchCommand::new(&connection, config, Arc::new(SingleFlight::new()));
    let tokens: Vec<String> = std::env::args().skip(1).collect();
    if tokens.is_empty() {
        println!("{}", command.usage());
        return Ok(());
    }
    let reply = command.process(tokens.as_slice(), &MessageContext::default());
    println!("{}", reply.text);
    if reply.more {
        println!("(more results available)");
    }
    Ok(())
}
