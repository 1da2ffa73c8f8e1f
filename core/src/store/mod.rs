//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! Views receive plain record lists and never execute SQL directly.

use crate::error::MonitorResult;
mod transactions;
use rusqlite::Connection;

pub struct TransactionStore {
    conn: Connection,
}

impl TransactionStore {
    pub fn open(path: &str) -> MonitorResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        log::debug!("Opened transaction store at {}", path);
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> MonitorResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> MonitorResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_transactions.sql"))?;
        Ok(())
    }
}
