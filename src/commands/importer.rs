// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::TxKind;
use crate::utils::{apply_rules, id_for_category, parse_date, parse_decimal};
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use rusqlite::{Connection, params};
use std::collections::{HashMap, hash_map::Entry};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => import_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn import_transactions(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let tx = conn.transaction()?;
    let mut category_cache: HashMap<String, i64> = HashMap::new();
    let mut imported = 0usize;

    for result in rdr.records() {
        let rec = result?;
        let date_raw = rec.get(0).context("date missing")?.trim().to_string();
        let mut description = rec.get(1).context("description missing")?.trim().to_string();
        let amount_raw = rec.get(2).context("amount missing")?.trim().to_string();
        let category = rec.get(3).unwrap_or("").trim().to_string();

        let date = parse_date(&date_raw)
            .with_context(|| format!("Invalid transaction date '{}'", date_raw))?;
        let amount = parse_decimal(&amount_raw)
            .with_context(|| format!("Invalid amount '{}' for {}", amount_raw, description))?;
        let kind = TxKind::from_amount(amount);

        let mut cat_id = if category.is_empty() {
            None
        } else {
            let cat_id = match category_cache.entry(category.clone()) {
                Entry::Occupied(entry) => *entry.get(),
                Entry::Vacant(entry) => {
                    let fetched = id_for_category(&tx, &category)?;
                    *entry.insert(fetched)
                }
            };
            Some(cat_id)
        };

        let (rule_cat, rewrite) = apply_rules(&tx, &description)?;
        if cat_id.is_none() {
            cat_id = rule_cat;
        }
        if let Some(newd) = rewrite.filter(|newd| newd != &description) {
            description = newd;
        }

        tx.execute(
            "INSERT INTO transactions(date, description, amount, kind, category_id) \
             VALUES (?1,?2,?3,?4,?5)",
            params![
                date.to_string(),
                description,
                amount.to_string(),
                kind.as_str(),
                cat_id
            ],
        )?;
        imported += 1;
    }
    tx.commit()?;
    println!("Imported {} transactions from {}", imported, path);
    Ok(())
}
