// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate;
use crate::db::{load_holdings, load_transactions};
use crate::utils::{fmt_gbp, fmt_gbp_cents, maybe_print_json, parse_month, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("monthly", sub)) => monthly(conn, sub)?,
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("allocation", sub)) => allocation(conn, sub)?,
        Some(("spend-by-category", sub)) => spend_by_category(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn monthly(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let months: u32 = *sub.get_one::<u32>("months").unwrap_or(&12);
    let transactions = load_transactions(conn)?;
    let as_of = chrono::Utc::now().date_naive();
    let buckets = aggregate::bucket_by_month(&transactions, months, as_of)?;

    if !maybe_print_json(json_flag, jsonl_flag, &buckets)? {
        let rows = buckets
            .iter()
            .map(|b| {
                vec![
                    b.month.clone(),
                    fmt_gbp_cents(&b.income),
                    fmt_gbp_cents(&b.expenses_abs()),
                    fmt_gbp_cents(&b.amount),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expenses", "Net"], rows)
        );
    }
    Ok(())
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let transactions = load_transactions(conn)?;
    let as_of = chrono::Utc::now().date_naive();
    let metrics = aggregate::compute_metrics(&transactions, as_of);

    if !maybe_print_json(json_flag, jsonl_flag, &metrics)? {
        let change = format!("{}%", metrics.expense_change_pct.round_dp(1));
        let rows = vec![
            vec!["Total savings".into(), fmt_gbp(&metrics.total_savings)],
            vec![
                "Total invested".into(),
                fmt_gbp(&metrics.total_investments_abs()),
            ],
            vec!["Income this month".into(), fmt_gbp(&metrics.monthly_income)],
            vec![
                "Expenses this month".into(),
                fmt_gbp(&metrics.monthly_expenses_abs()),
            ],
            vec![
                "Income last month".into(),
                fmt_gbp(&metrics.last_month_income),
            ],
            vec![
                "Expenses last month".into(),
                fmt_gbp(&metrics.last_month_expenses_abs()),
            ],
            vec![
                "Average income (12m)".into(),
                fmt_gbp(&metrics.average_income_12_months),
            ],
            vec!["Expense change MoM".into(), change],
        ];
        println!("{}", pretty_table(&["Metric", "Value"], rows));
    }
    Ok(())
}

fn allocation(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let holdings = load_holdings(conn)?;
    let slices = aggregate::allocation_breakdown(&holdings);

    if !maybe_print_json(json_flag, jsonl_flag, &slices)? {
        let rows = slices
            .iter()
            .map(|s| {
                vec![
                    s.name.clone(),
                    fmt_gbp_cents(&s.amount),
                    format!("{}%", s.percentage.round_dp(1)),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Type", "Invested", "Share"], rows));
    }
    Ok(())
}

fn spend_by_category(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let as_of = crate::utils::parse_date(&format!("{}-01", month))?;

    let transactions = load_transactions(conn)?;
    let buckets = aggregate::bucket_by_month(&transactions, 1, as_of)?;
    let bucket = &buckets[0];

    // Spending only: categories netting to an outflow, largest first.
    let mut items: Vec<(String, Decimal)> = bucket
        .categories
        .iter()
        .filter(|(_, amt)| **amt < Decimal::ZERO)
        .map(|(name, amt)| (name.clone(), amt.abs()))
        .collect();
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let data: Vec<Vec<String>> = items
        .into_iter()
        .map(|(name, amt)| vec![name, fmt_gbp_cents(&amt)])
        .collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!("{}", pretty_table(&["Category", "Spent"], data));
    }
    Ok(())
}
