//! Metadata store inspection
//!
//! Opens the local metadata database read-only and counts rows in the
//! known set of tables. Each query runs independently; a failing query
//! is reported inline and does not affect the others.

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A labeled aggregation query against the metadata store
#[derive(Debug, Clone, Copy)]
pub struct CountQuery {
    /// Human label printed in the report
    pub label: &'static str,
    /// One-row one-column aggregate, developer-authored and trusted
    pub sql: &'static str,
}

/// The fixed query set, in report order. Labels are contractual.
pub const COUNT_QUERIES: [CountQuery; 12] = [
    CountQuery {
        label: "databases",
        sql: "SELECT COUNT(*) FROM databases",
    },
    CountQuery {
        label: "tables (non-embedded)",
        sql: "SELECT COUNT(*) FROM tables WHERE is_embedded = 0 OR is_embedded IS NULL",
    },
    CountQuery {
        label: "tables (all)",
        sql: "SELECT COUNT(*) FROM tables",
    },
    CountQuery {
        label: "fields (non-calculated)",
        sql: "SELECT COUNT(*) FROM fields WHERE is_calculated = 0 OR is_calculated IS NULL",
    },
    CountQuery {
        label: "metrics (calculated)",
        sql: "SELECT COUNT(*) FROM fields \
              WHERE is_calculated = 1 AND (role = 'measure' OR role IS NULL)",
    },
    CountQuery {
        label: "fields (all)",
        sql: "SELECT COUNT(*) FROM fields",
    },
    CountQuery {
        label: "datasources (non-embedded)",
        sql: "SELECT COUNT(*) FROM datasources WHERE is_embedded = 0 OR is_embedded IS NULL",
    },
    CountQuery {
        label: "datasources (all)",
        sql: "SELECT COUNT(*) FROM datasources",
    },
    CountQuery {
        label: "workbooks",
        sql: "SELECT COUNT(*) FROM workbooks",
    },
    CountQuery {
        label: "views",
        sql: "SELECT COUNT(*) FROM views",
    },
    CountQuery {
        label: "unique_regular_fields",
        sql: "SELECT COUNT(*) FROM unique_regular_fields",
    },
    CountQuery {
        label: "unique_calculated_fields",
        sql: "SELECT COUNT(*) FROM unique_calculated_fields",
    },
];

/// Result of one count query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountReport {
    /// Label from the query set
    pub label: String,
    /// Row count, or the error description when the query failed
    pub outcome: std::result::Result<i64, String>,
}

impl CountReport {
    /// Render the report line: `<label>: <count>` or `<label>: Error - <message>`
    pub fn render(&self) -> String {
        match &self.outcome {
            Ok(count) => format!("{}: {}", self.label, count),
            Err(message) => format!("{}: Error - {}", self.label, message),
        }
    }
}

/// Metadata store handle (read-only)
pub struct MetadataDb {
    conn: Connection,
}

impl MetadataDb {
    /// Open the metadata store read-only
    pub fn open_readonly<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open_with_flags(
            db_path.as_ref(),
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .context("Failed to open metadata store read-only")?;

        Ok(MetadataDb { conn })
    }

    /// Run a one-row one-column aggregate and return the integer
    pub fn count(&self, sql: &str) -> Result<i64> {
        let count: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(count)
    }

    /// Run the full query set, catching per-query failures inline
    pub fn run_counts(&self) -> Vec<CountReport> {
        COUNT_QUERIES
            .iter()
            .map(|query| CountReport {
                label: query.label.to_string(),
                outcome: self.count(query.sql).map_err(|e| e.to_string()),
            })
            .collect()
    }
}

/// Inspect the metadata store at `db_path` and return one report per
/// label in declaration order.
pub fn inspect<P: AsRef<Path>>(db_path: P) -> Result<Vec<CountReport>> {
    let db = MetadataDb::open_readonly(db_path)?;
    Ok(db.run_counts())
}
