// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::str::FromStr;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Rows the snapshot loader would refuse, and kind/sign mismatches
    let mut stmt = conn.prepare("SELECT id, date, amount, kind FROM transactions ORDER BY id")?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let date_s: String = r.get(1)?;
        let amount_s: String = r.get(2)?;
        let kind: String = r.get(3)?;

        if chrono::NaiveDate::parse_from_str(&date_s, "%Y-%m-%d").is_err() {
            rows.push(vec!["bad_date".into(), format!("tx {} '{}'", id, date_s)]);
            continue;
        }
        let Ok(amount) = Decimal::from_str(&amount_s) else {
            rows.push(vec!["bad_amount".into(), format!("tx {} '{}'", id, amount_s)]);
            continue;
        };
        let mismatch = match kind.as_str() {
            "income" => amount < Decimal::ZERO,
            "expense" => amount > Decimal::ZERO,
            _ => true,
        };
        if mismatch {
            rows.push(vec![
                "kind_sign_mismatch".into(),
                format!("tx {} {} {}", id, kind, amount),
            ]);
        }
    }

    // 2) Uncategorized expenses
    let uncategorized: i64 = conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE kind='expense' AND category_id IS NULL",
        [],
        |r| r.get(0),
    )?;
    if uncategorized > 0 {
        rows.push(vec![
            "uncategorized_expenses".into(),
            format!("{} transactions", uncategorized),
        ]);
    }

    // 3) Holdings whose recorded total drifts from their linked flows
    let mut hstmt = conn.prepare(
        "SELECT h.ticker, h.total_invested,
                (SELECT COALESCE(SUM(CAST(t.amount AS REAL)),0) FROM transactions t WHERE t.holding_id=h.id),
                (SELECT COUNT(*) FROM transactions t WHERE t.holding_id=h.id)
         FROM holdings h ORDER BY h.ticker",
    )?;
    let mut hcur = hstmt.query([])?;
    while let Some(r) = hcur.next()? {
        let ticker: String = r.get(0)?;
        let invested_s: String = r.get(1)?;
        let linked_sum: f64 = r.get(2)?;
        let linked_count: i64 = r.get(3)?;
        if linked_count == 0 {
            continue;
        }
        let Ok(invested) = Decimal::from_str(&invested_s) else {
            rows.push(vec![
                "bad_amount".into(),
                format!("holding {} '{}'", ticker, invested_s),
            ]);
            continue;
        };
        let linked = Decimal::try_from(linked_sum).unwrap_or(Decimal::ZERO).abs();
        if (invested - linked).abs() > Decimal::new(1, 2) {
            rows.push(vec![
                "invested_drift".into(),
                format!("{} recorded {} vs linked {}", ticker, invested, linked),
            ]);
        }
    }

    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
