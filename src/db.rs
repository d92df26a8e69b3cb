// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use crate::models::{Holding, InvestmentType, Transaction, TxKind};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Sterling", "sterling"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("sterling.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS categories(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        color TEXT
    );

    CREATE TABLE IF NOT EXISTS holdings(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        ticker TEXT NOT NULL UNIQUE,
        investment_type TEXT NOT NULL,
        total_invested TEXT NOT NULL DEFAULT '0',
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        description TEXT NOT NULL,
        amount TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('income','expense')),
        category_id INTEGER,
        holding_id INTEGER,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE SET NULL,
        FOREIGN KEY(holding_id) REFERENCES holdings(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);

    CREATE TABLE IF NOT EXISTS rules(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        pattern TEXT NOT NULL,
        category_id INTEGER,
        description_rewrite TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE SET NULL
    );
    "#,
    )?;
    Ok(())
}

/// Load the full transaction set as a typed snapshot for the aggregator.
/// Stored TEXT amounts/dates that fail to parse abort the load with row
/// context; nothing malformed reaches aggregation.
pub fn load_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.date, t.description, t.amount, t.kind, c.name, t.holding_id
         FROM transactions t
         LEFT JOIN categories c ON t.category_id=c.id
         ORDER BY t.date, t.id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, Option<String>>(5)?,
            r.get::<_, Option<i64>>(6)?,
        ))
    })?;

    let mut out = Vec::new();
    for row in rows {
        let (id, date_s, description, amount_s, kind_s, category, holding_id) = row?;
        let date = chrono::NaiveDate::parse_from_str(&date_s, "%Y-%m-%d")
            .with_context(|| format!("Invalid stored date '{}' for transaction {}", date_s, id))?;
        let amount = Decimal::from_str_exact(&amount_s)
            .with_context(|| format!("Invalid stored amount '{}' for transaction {}", amount_s, id))?;
        let kind = TxKind::from_str(&kind_s)
            .with_context(|| format!("Invalid stored kind for transaction {}", id))?;
        out.push(Transaction {
            id,
            date,
            description,
            amount,
            kind,
            category,
            holding_id,
        });
    }
    Ok(out)
}

pub fn load_holdings(conn: &Connection) -> Result<Vec<Holding>> {
    let mut stmt = conn.prepare(
        "SELECT h.id, h.ticker, h.investment_type, h.total_invested,
                (SELECT COUNT(*) FROM transactions t WHERE t.holding_id=h.id)
         FROM holdings h
         ORDER BY h.ticker",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, i64>(4)?,
        ))
    })?;

    let mut out = Vec::new();
    for row in rows {
        let (id, ticker, type_s, invested_s, count) = row?;
        let investment_type = InvestmentType::from_str(&type_s)
            .with_context(|| format!("Invalid stored investment type for holding {}", ticker))?;
        let total_invested = Decimal::from_str_exact(&invested_s).with_context(|| {
            format!("Invalid stored total '{}' for holding {}", invested_s, ticker)
        })?;
        out.push(Holding {
            id,
            ticker,
            investment_type,
            total_invested,
            transaction_count: count as u64,
        });
    }
    Ok(out)
}
