// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::load_holdings;
use crate::models::InvestmentType;
use crate::utils::{fmt_gbp_cents, id_for_holding, maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use std::str::FromStr;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        Some(("link", sub)) => link(conn, sub)?,
        Some(("unlink", sub)) => unlink(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ticker = sub
        .get_one::<String>("ticker")
        .map(|s| s.trim().to_uppercase())
        .unwrap();
    let investment_type = InvestmentType::from_str(sub.get_one::<String>("type").unwrap())?;
    let invested = match sub.get_one::<String>("invested") {
        Some(raw) => parse_decimal(raw.trim())?,
        None => Decimal::ZERO,
    };
    conn.execute(
        "INSERT INTO holdings(ticker, investment_type, total_invested) VALUES (?1,?2,?3)",
        params![ticker, investment_type.as_str(), invested.to_string()],
    )?;
    println!("Added holding {} ({})", ticker, investment_type);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let holdings = load_holdings(conn)?;
    if !maybe_print_json(json_flag, jsonl_flag, &holdings)? {
        let rows = holdings
            .into_iter()
            .map(|h| {
                vec![
                    h.ticker,
                    h.investment_type.display_name().to_string(),
                    fmt_gbp_cents(&h.total_invested),
                    h.transaction_count.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Ticker", "Type", "Invested", "Txns"], rows)
        );
    }
    Ok(())
}

/// Linked transactions survive removal; the FK sets their holding_id
/// back to NULL.
fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ticker = sub
        .get_one::<String>("ticker")
        .map(|s| s.trim().to_uppercase())
        .unwrap();
    let id = id_for_holding(conn, &ticker)?;
    let detached: i64 = conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE holding_id=?1",
        params![id],
        |r| r.get(0),
    )?;
    conn.execute("DELETE FROM holdings WHERE id=?1", params![id])?;
    println!("Removed holding {} ({} transactions detached)", ticker, detached);
    Ok(())
}

fn link(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ticker = sub
        .get_one::<String>("ticker")
        .map(|s| s.trim().to_uppercase())
        .unwrap();
    let tx_id = *sub.get_one::<i64>("tx").unwrap();
    let holding_id = id_for_holding(conn, &ticker)?;
    let n = conn.execute(
        "UPDATE transactions SET holding_id=?1 WHERE id=?2",
        params![holding_id, tx_id],
    )?;
    if n == 0 {
        println!("No transaction with id {}", tx_id);
    } else {
        println!("Linked transaction {} to {}", tx_id, ticker);
    }
    Ok(())
}

fn unlink(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let tx_id = *sub.get_one::<i64>("tx").unwrap();
    let n = conn.execute(
        "UPDATE transactions SET holding_id=NULL WHERE id=?1",
        params![tx_id],
    )?;
    if n == 0 {
        println!("No transaction with id {}", tx_id);
    } else {
        println!("Unlinked transaction {}", tx_id);
    }
    Ok(())
}
