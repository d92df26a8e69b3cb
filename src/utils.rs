// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use regex::Regex;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<String> {
    chrono::NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok(s.to_string())
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Headline convention: pound sign, no pence. "£2,000", "-£1,234".
pub fn fmt_gbp(d: &Decimal) -> String {
    let rounded = d.round_dp(0);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}£{}", sign, group_thousands(&rounded.abs().to_string()))
}

/// Row convention: pound sign, two decimal places. "£1,234.50".
pub fn fmt_gbp_cents(d: &Decimal) -> String {
    let rounded = d.round_dp(2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let s = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));
    format!("{}£{}.{}", sign, group_thousands(int_part), frac_part)
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn id_for_category(conn: &Connection, name: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM categories WHERE name=?1")?;
    let id: i64 = stmt
        .query_row(params![name], |r| r.get(0))
        .with_context(|| format!("Category '{}' not found", name))?;
    Ok(id)
}

pub fn id_for_holding(conn: &Connection, ticker: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM holdings WHERE ticker=?1")?;
    let id: i64 = stmt
        .query_row(params![ticker], |r| r.get(0))
        .with_context(|| format!("Holding '{}' not found", ticker))?;
    Ok(id)
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

/// Scan rules newest-first and return the first match's category and
/// description rewrite.
pub fn apply_rules(conn: &Connection, description: &str) -> Result<(Option<i64>, Option<String>)> {
    let mut stmt = conn
        .prepare("SELECT id, pattern, category_id, description_rewrite FROM rules ORDER BY id DESC")?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let _id: i64 = r.get(0)?;
        let pat: String = r.get(1)?;
        let cat: Option<i64> = r.get(2)?;
        let rewrite: Option<String> = r.get(3)?;
        if let Ok(re) = Regex::new(&pat) {
            if re.is_match(description) {
                return Ok((cat, rewrite));
            }
        }
    }
    Ok((None, None))
}
