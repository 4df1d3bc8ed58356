//! Database set up shared by the server and the tests.

use std::time::Duration;

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::category::create_category_table;

/// How long a statement waits on a locked database before failing.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Create the tables for the domain models if they do not exist.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_category_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Open the SQLite database at `path`, creating the file if needed.
///
/// Statements wait up to `busy_timeout` for a lock held by another connection
/// before failing.
///
/// # Errors
/// Returns an error if the file cannot be opened or there is an SQL error.
pub fn open(path: &str, busy_timeout: Duration) -> Result<Connection, rusqlite::Error> {
    let connection = Connection::open(path)?;
    connection.busy_timeout(busy_timeout)?;

    Ok(connection)
}
