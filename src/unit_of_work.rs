//! Runs a unit of work inside a single database transaction.

use rusqlite::{Connection, Transaction};

use crate::Error;

/// Run `unit_of_work` inside a new transaction on `connection`.
///
/// The transaction is committed if `unit_of_work` returns `Ok`, otherwise it
/// is rolled back and the error from `unit_of_work` is returned unchanged.
/// The transaction is always closed before this function returns.
///
/// Taking `&mut Connection` means the borrow checker rules out a second
/// transaction on the same connection while this one is open.
///
/// # Errors
///
/// Returns the error from `unit_of_work`, or [Error::SqlError] if the
/// transaction could not be started or committed. A failed rollback is logged
/// and does not replace the error from `unit_of_work`.
pub fn in_transaction<T, F>(connection: &mut Connection, unit_of_work: F) -> Result<T, Error>
where
    F: FnOnce(&Transaction) -> Result<T, Error>,
{
    let transaction = connection.transaction()?;

    match unit_of_work(&transaction) {
        Ok(value) => {
            // If the commit fails, dropping the transaction rolls it back.
            transaction.commit()?;
            Ok(value)
        }
        Err(error) => {
            if let Err(rollback_error) = transaction.rollback() {
                tracing::error!(
                    "could not roll back transaction after error \"{error}\": {rollback_error}"
                );
            }

            Err(error)
        }
    }
}
