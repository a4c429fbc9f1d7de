// used for persistence
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Statement};

use crate::error::Result;

// ------------- Persistence -------------
/// Owns the chat log schema and the statements that fill it.
///
/// The search itself only reads these tables; writing them belongs to
/// whatever records the chat. This is what the binary and the tests use.
pub struct Persistor<'db> {
    pub db: &'db Connection,
    pub add_user: Statement<'db>,
    pub add_alias: Statement<'db>,
    pub add_message: Statement<'db>,
}
impl<'db> Persistor<'db> {
    pub fn new(connection: &'db Connection) -> Result<Persistor<'db>> {
        connection.execute_batch(
            "
            create table if not exists users (
                ID integer not null,
                Username text not null,
                constraint referenceable_User primary key (
                    ID
                )
            );
            create table if not exists aliases (
                User integer not null,
                Alias text not null,
                constraint Alias_of_User foreign key (
                    User
                ) references users(ID),
                constraint unique_Alias primary key (
                    User,
                    Alias
                )
            );
            create table if not exists chatlog (
                ID integer not null,
                Author integer not null,
                Channel integer not null,
                Message text not null,
                Timestamp text not null,
                constraint referenceable_Message primary key (
                    ID
                )
            );
            create index if not exists chatlog_by_Timestamp on chatlog (
                Timestamp
            );
            ",
        )?;
        Ok(Persistor {
            db: connection,
            add_user: connection.prepare(
                "
                insert or replace into users (
                    ID,
                    Username
                ) values (?, ?)
            ",
            )?,
            add_alias: connection.prepare(
                "
                insert or ignore into aliases (
                    User,
                    Alias
                ) values (?, ?)
            ",
            )?,
            add_message: connection.prepare(
                "
                insert into chatlog (
                    ID,
                    Author,
                    Channel,
                    Message,
                    Timestamp
                ) values (?, ?, ?, ?, ?)
            ",
            )?,
        })
    }
    pub fn persist_user(&mut self, id: u64, username: &str) -> Result<()> {
        self.add_user.execute(params![id, username])?;
        Ok(())
    }
    pub fn persist_alias(&mut self, user: u64, alias: &str) -> Result<()> {
        self.add_alias.execute(params![user, alias])?;
        Ok(())
    }
    pub fn persist_message(
        &mut self,
        id: u64,
        author: u64,
        channel: u64,
        message: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<()> {
        self.add_message
            .execute(params![id, author, channel, message, timestamp])?;
        Ok(())
    }
}
