// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::TxKind;
use crate::utils::{
    apply_rules, id_for_category, maybe_print_json, parse_date, parse_decimal, parse_month,
    pretty_table,
};
use anyhow::Result;
use rusqlite::{Connection, params};
use serde::Serialize;
use std::str::FromStr;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        Some(("purge", sub)) => purge(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let mut description = sub.get_one::<String>("description").unwrap().to_string();
    let category = sub.get_one::<String>("category").map(|s| s.to_string());
    let kind = match sub.get_one::<String>("kind") {
        Some(raw) => TxKind::from_str(raw)?,
        None => TxKind::from_amount(amount),
    };

    let mut category_id = if let Some(cat) = category {
        Some(id_for_category(conn, &cat)?)
    } else {
        None
    };

    let (rule_cat, rewrite) = apply_rules(conn, &description)?;
    if category_id.is_none() {
        category_id = rule_cat;
    }
    if let Some(newd) = rewrite.filter(|newd| newd != &description) {
        println!("Description rewritten: {} -> {}", description, newd);
        description = newd;
    }

    conn.execute(
        "INSERT INTO transactions(date, description, amount, kind, category_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            date.to_string(),
            description,
            amount.to_string(),
            kind.as_str(),
            category_id
        ],
    )?;
    println!("Recorded {} {} on {} '{}'", kind, amount, date, description);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.description.clone(),
                    r.amount.clone(),
                    r.kind.clone(),
                    r.category.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Description", "Amount", "Kind", "Category"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub description: String,
    pub amount: String,
    pub kind: String,
    pub category: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let mut sql = String::from(
        "SELECT t.id, t.date, t.description, t.amount, t.kind, c.name FROM transactions t LEFT JOIN categories c ON t.category_id=c.id WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(t.date,1,7)=?");
        params_vec.push(month.into());
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        sql.push_str(" AND c.name=?");
        params_vec.push(cat.into());
    }
    if let Some(kind) = sub.get_one::<String>("kind") {
        let kind = TxKind::from_str(kind)?;
        sql.push_str(" AND t.kind=?");
        params_vec.push(kind.as_str().into());
    }
    sql.push_str(" ORDER BY t.date DESC, t.id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = if params_vec.is_empty() {
        stmt.query([])?
    } else {
        let params: Vec<&dyn rusqlite::ToSql> = params_vec
            .iter()
            .map(|s| s as &dyn rusqlite::ToSql)
            .collect();
        stmt.query(rusqlite::params_from_iter(params))?
    };

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let date: String = r.get(1)?;
        let description: String = r.get(2)?;
        let amount: String = r.get(3)?;
        let kind: String = r.get(4)?;
        let category: Option<String> = r.get(5)?;
        data.push(TransactionRow {
            id,
            date,
            description,
            amount,
            kind,
            category: category.unwrap_or_default(),
        });
    }
    Ok(data)
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim().parse::<i64>()?;
    let n = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    if n == 0 {
        println!("No transaction with id {}", id);
    } else {
        println!("Removed transaction {}", id);
    }
    Ok(())
}

/// Bulk delete; reports how many rows went away so the caller can
/// confirm the blast radius after the fact.
pub fn purge(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let n = if let Some(cat) = sub.get_one::<String>("category") {
        let cat_id = id_for_category(conn, cat)?;
        conn.execute(
            "DELETE FROM transactions WHERE substr(date,1,7)=?1 AND category_id=?2",
            params![month, cat_id],
        )?
    } else {
        conn.execute(
            "DELETE FROM transactions WHERE substr(date,1,7)=?1",
            params![month],
        )?
    };
    println!("Deleted {} transactions in {}", n, month);
    Ok(())
}
