//! Transaction table queries: inserts for seeding, reads for the three views.

use super::TransactionStore;
use crate::{error::MonitorResult, timeline::ScenarioFilter, transaction::TransactionRecord};
use rusqlite::{params, Connection, Row};

const SELECT_COLUMNS: &str = "SELECT CAST(id AS TEXT), transaction_id, timestamp, from_account,
        to_account, amount, transaction_type, suspicious_score, pattern_type, scenario
     FROM transactions";

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<TransactionRecord> {
    Ok(TransactionRecord {
        id: row.get(0)?,
        transaction_id: row.get(1)?,
        timestamp: row.get(2)?,
        from_account: row.get(3)?,
        to_account: row.get(4)?,
        amount: row.get(5)?,
        transaction_type: row.get(6)?,
        suspicious_score: row.get(7)?,
        pattern_type: row.get(8)?,
        scenario: row.get(9)?,
    })
}

fn insert_with(conn: &Connection, t: &TransactionRecord) -> MonitorResult<()> {
    conn.execute(
        "INSERT INTO transactions (
            transaction_id, from_account, to_account, amount, timestamp,
            transaction_type, suspicious_score, pattern_type, scenario
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            t.transaction_id,
            t.from_account,
            t.to_account,
            t.amount,
            t.timestamp,
            t.transaction_type,
            t.suspicious_score,
            t.pattern_type,
            t.scenario,
        ],
    )?;
    Ok(())
}

impl TransactionStore {
    // ── Writes ─────────────────────────────────────────────────

    /// Insert one record. The row id is assigned by the database.
    pub fn insert_transaction(&self, record: &TransactionRecord) -> MonitorResult<()> {
        insert_with(&self.conn, record)
    }

    /// Insert a batch inside a single SQLite transaction.
    pub fn insert_transactions(&self, records: &[TransactionRecord]) -> MonitorResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        for record in records {
            insert_with(&tx, record)?;
        }
        tx.commit()?;
        Ok(records.len())
    }

    // ── Reads ──────────────────────────────────────────────────

    pub fn transaction_count(&self) -> MonitorResult<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count)
    }

    /// The full table, in insertion order. Feeds pattern aggregation.
    pub fn all_transactions(&self) -> MonitorResult<Vec<TransactionRecord>> {
        let mut stmt = self.conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY id ASC"))?;
        let rows = stmt.query_map([], record_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Records for the timeline view, ordered by timestamp.
    pub fn timeline_transactions(
        &self,
        filter: &ScenarioFilter,
    ) -> MonitorResult<Vec<TransactionRecord>> {
        let rows = match filter {
            ScenarioFilter::All => {
                let mut stmt = self
                    .conn
                    .prepare(&format!("{SELECT_COLUMNS} ORDER BY timestamp ASC, id ASC"))?;
                let rows = stmt.query_map([], record_from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            ScenarioFilter::Scenario(scenario) => {
                let mut stmt = self.conn.prepare(&format!(
                    "{SELECT_COLUMNS} WHERE scenario = ?1 ORDER BY timestamp ASC, id ASC"
                ))?;
                let rows = stmt.query_map(params![scenario], record_from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };
        log::debug!("timeline query {:?} returned {} rows", filter, rows.len());
        Ok(rows)
    }

    /// Records feeding a SAR: one scenario, score strictly above
    /// `min_score`, at most `limit` rows in insertion order.
    pub fn report_transactions(
        &self,
        scenario: &str,
        min_score: f64,
        limit: usize,
    ) -> MonitorResult<Vec<TransactionRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SELECT_COLUMNS} WHERE scenario = ?1 AND suspicious_score > ?2
             ORDER BY id ASC LIMIT ?3"
        ))?;
        let rows = stmt.query_map(params![scenario, min_score, limit as i64], record_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
