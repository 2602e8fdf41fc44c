//! Write connection utilities: BEGIN IMMEDIATE transactions.

use logbook_core::errors::LogbookResult;
use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::to_storage_err;

/// Execute `f` inside a BEGIN IMMEDIATE transaction.
///
/// The write lock is acquired at transaction start, preventing SQLITE_BUSY
/// half-way through. If `f` fails the transaction rolls back on drop.
pub fn with_immediate_transaction<F, T>(conn: &Connection, f: F) -> LogbookResult<T>
where
    F: FnOnce(&Transaction<'_>) -> LogbookResult<T>,
{
    // new_unchecked takes &Connection, so callers holding the writer guard
    // don't need a mutable borrow.
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)
        .map_err(|e| to_storage_err(format!("failed to begin immediate transaction: {e}")))?;

    let result = f(&tx)?;

    tx.commit()
        .map_err(|e| to_storage_err(format!("failed to commit: {e}")))?;

    Ok(result)
}
