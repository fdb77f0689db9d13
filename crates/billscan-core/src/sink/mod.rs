//! Line-item table persistence.
//!
//! Every write replaces the whole table: the previous run's rows are dropped
//! together with the table and recreated from the new record set.

use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use rusqlite::{params, Connection};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::SinkError;
use crate::models::line_item::InvoiceLineItem;

lazy_static! {
    static ref TABLE_NAME: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// Destination for extracted line items.
pub trait TableSink {
    /// Replace `table` with `items`, returning the number of rows written.
    fn replace(&mut self, table: &str, items: &[InvoiceLineItem]) -> Result<usize, SinkError>;

    /// Run `SELECT * FROM <table> LIMIT 1`.
    ///
    /// `Ok(true)` when a row came back, `Ok(false)` for an empty table, and an
    /// error when the table is missing or the store is unreachable.
    fn probe(&self, table: &str) -> Result<bool, SinkError>;
}

/// SQLite-backed sink.
pub struct SqliteSink {
    conn: Connection,
}

impl SqliteSink {
    /// Open (or create) a database file.
    pub fn open(path: &Path) -> Result<Self, SinkError> {
        let conn = Connection::open(path)?;
        debug!("Opened line-item database {}", path.display());
        Ok(Self { conn })
    }

    /// Open an existing database file without creating it.
    pub fn open_existing(path: &Path) -> Result<Self, SinkError> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    /// In-memory database.
    pub fn in_memory() -> Result<Self, SinkError> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Read every row of `table` back, in insertion order.
    pub fn read_back(&self, table: &str) -> Result<Vec<InvoiceLineItem>, SinkError> {
        let table = quoted(table)?;
        let mut stmt = self.conn.prepare(&format!(
            "SELECT Bill_Date, Bill_No, Bill_Product, Bill_Quantity, Unit_Price \
             FROM {} ORDER BY rowid",
            table
        ))?;

        let rows = stmt.query_map([], |row| {
            let price: Option<f64> = row.get(4)?;
            Ok(InvoiceLineItem {
                bill_date: row.get(0)?,
                bill_no: row.get(1)?,
                product: row.get(2)?,
                quantity: row.get(3)?,
                unit_price: price.and_then(Decimal::from_f64_retain).map(|d| d.normalize()),
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

impl TableSink for SqliteSink {
    fn replace(&mut self, table: &str, items: &[InvoiceLineItem]) -> Result<usize, SinkError> {
        let table = quoted(table)?;
        let tx = self.conn.transaction()?;

        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {table};
             CREATE TABLE {table} (
               Bill_Date TEXT,
               Bill_No TEXT,
               Bill_Product TEXT,
               Bill_Quantity INTEGER,
               Unit_Price REAL
             );"
        ))?;

        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {} (Bill_Date, Bill_No, Bill_Product, Bill_Quantity, Unit_Price) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                table
            ))?;
            for item in items {
                stmt.execute(params![
                    item.bill_date,
                    item.bill_no,
                    item.product,
                    item.quantity,
                    item.unit_price.and_then(|p| p.to_f64()),
                ])?;
            }
        }

        tx.commit()?;
        info!("Wrote {} line items to {}", items.len(), table);
        Ok(items.len())
    }

    fn probe(&self, table: &str) -> Result<bool, SinkError> {
        let table = quoted(table)?;
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT * FROM {} LIMIT 1", table))?;
        let mut rows = stmt.query([])?;
        Ok(rows.next()?.is_some())
    }
}

/// Validate a table name and quote it as an identifier.
fn quoted(table: &str) -> Result<String, SinkError> {
    if TABLE_NAME.is_match(table) {
        Ok(format!("\"{}\"", table))
    } else {
        Err(SinkError::InvalidTableName(table.to_string()))
    }
}
