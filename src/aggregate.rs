// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use thiserror::Error;

use crate::models::{Holding, InvestmentType, Transaction, TxKind};

/// Portfolio buckets that never take part in allocation breakdowns.
pub const ALLOCATION_EXCLUDED: [InvestmentType; 2] =
    [InvestmentType::HighYieldSavings, InvestmentType::Cash];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    #[error("monthly window must cover at least one month")]
    EmptyWindow,
}

/// One calendar month of activity. All figures are signed (outflow
/// negative); callers wanting display magnitudes go through the `_abs`
/// accessors instead of re-deriving them.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyBucket {
    pub month: String, // YYYY-MM
    pub amount: Decimal,
    pub income: Decimal,
    pub expenses: Decimal,
    pub categories: BTreeMap<String, Decimal>,
}

impl MonthlyBucket {
    fn empty(month: String) -> Self {
        MonthlyBucket {
            month,
            amount: Decimal::ZERO,
            income: Decimal::ZERO,
            expenses: Decimal::ZERO,
            categories: BTreeMap::new(),
        }
    }

    pub fn expenses_abs(&self) -> Decimal {
        self.expenses.abs()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Metrics {
    pub total_savings: Decimal,
    pub total_investments: Decimal,
    pub monthly_income: Decimal,
    pub monthly_expenses: Decimal,
    pub last_month_income: Decimal,
    pub last_month_expenses: Decimal,
    pub average_income_12_months: Decimal,
    pub expense_change_pct: Decimal,
}

impl Metrics {
    pub fn monthly_expenses_abs(&self) -> Decimal {
        self.monthly_expenses.abs()
    }

    pub fn last_month_expenses_abs(&self) -> Decimal {
        self.last_month_expenses.abs()
    }

    pub fn total_investments_abs(&self) -> Decimal {
        self.total_investments.abs()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AllocationSlice {
    pub name: String,
    pub amount: Decimal,
    pub percentage: Decimal,
    pub color: String,
}

pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Year/month pair `back` whole months before `as_of`'s month.
fn month_back(as_of: NaiveDate, back: u32) -> (i32, u32) {
    let total = as_of.year() * 12 + as_of.month0() as i32 - back as i32;
    (total.div_euclid(12), total.rem_euclid(12) as u32 + 1)
}

fn month_back_key(as_of: NaiveDate, back: u32) -> String {
    let (y, m) = month_back(as_of, back);
    format!("{:04}-{:02}", y, m)
}

/// Bucket the snapshot into the trailing `months_back` calendar months
/// ending at `as_of`'s month, oldest first. Every month in the window is
/// present even when empty; transactions outside the window are dropped.
pub fn bucket_by_month(
    transactions: &[Transaction],
    months_back: u32,
    as_of: NaiveDate,
) -> Result<Vec<MonthlyBucket>, AggregateError> {
    if months_back == 0 {
        return Err(AggregateError::EmptyWindow);
    }

    let mut buckets = Vec::with_capacity(months_back as usize);
    let mut index = HashMap::with_capacity(months_back as usize);
    for back in (0..months_back).rev() {
        let key = month_back_key(as_of, back);
        index.insert(key.clone(), buckets.len());
        buckets.push(MonthlyBucket::empty(key));
    }

    for tx in transactions {
        let Some(&i) = index.get(&month_key(tx.date)) else {
            continue;
        };
        let bucket = &mut buckets[i];
        bucket.amount += tx.amount;
        match tx.kind {
            TxKind::Income => bucket.income += tx.amount,
            TxKind::Expense => bucket.expenses += tx.amount,
        }
        if let Some(cat) = &tx.category {
            *bucket
                .categories
                .entry(cat.clone())
                .or_insert(Decimal::ZERO) += tx.amount;
        }
    }

    Ok(buckets)
}

/// Headline figures for the dashboard. Savings accumulate every
/// non-investment transaction; investment flows (holding-linked) net
/// into `total_investments` instead.
pub fn compute_metrics(transactions: &[Transaction], as_of: NaiveDate) -> Metrics {
    let current = month_back_key(as_of, 0);
    let previous = month_back_key(as_of, 1);

    let mut total_savings = Decimal::ZERO;
    let mut total_investments = Decimal::ZERO;
    let mut monthly_income = Decimal::ZERO;
    let mut monthly_expenses = Decimal::ZERO;
    let mut last_month_income = Decimal::ZERO;
    let mut last_month_expenses = Decimal::ZERO;

    for tx in transactions {
        if tx.is_investment() {
            total_investments += tx.amount;
        } else {
            total_savings += tx.amount;
        }

        let key = month_key(tx.date);
        if key == current {
            match tx.kind {
                TxKind::Income => monthly_income += tx.amount,
                TxKind::Expense => monthly_expenses += tx.amount,
            }
        } else if key == previous {
            match tx.kind {
                TxKind::Income => last_month_income += tx.amount,
                TxKind::Expense => last_month_expenses += tx.amount,
            }
        }
    }

    let trailing: HashSet<String> = (0..12u32).map(|back| month_back_key(as_of, back)).collect();
    let mut trailing_income = Decimal::ZERO;
    for tx in transactions {
        if tx.kind == TxKind::Income && trailing.contains(&month_key(tx.date)) {
            trailing_income += tx.amount;
        }
    }
    let average_income_12_months = trailing_income / Decimal::from(12);

    let prev_abs = last_month_expenses.abs();
    let expense_change_pct = if prev_abs.is_zero() {
        Decimal::ZERO
    } else {
        (monthly_expenses.abs() - prev_abs) / prev_abs * Decimal::from(100)
    };

    Metrics {
        total_savings,
        total_investments,
        monthly_income,
        monthly_expenses,
        last_month_income,
        last_month_expenses,
        average_income_12_months,
        expense_change_pct,
    }
}

/// Per-investment-type portfolio slices, largest first. High-yield
/// savings and cash positions never appear, nor do non-positive ones; a
/// portfolio with nothing allocatable yields zero percentages, not a
/// division fault.
pub fn allocation_breakdown(holdings: &[Holding]) -> Vec<AllocationSlice> {
    let mut totals: HashMap<InvestmentType, Decimal> = HashMap::new();
    for h in holdings {
        if ALLOCATION_EXCLUDED.contains(&h.investment_type) {
            continue;
        }
        if h.total_invested <= Decimal::ZERO {
            continue;
        }
        *totals.entry(h.investment_type).or_insert(Decimal::ZERO) += h.total_invested;
    }

    let grand_total: Decimal = totals.values().copied().sum();
    let mut slices: Vec<AllocationSlice> = totals
        .into_iter()
        .map(|(ty, amount)| {
            let percentage = if grand_total.is_zero() {
                Decimal::ZERO
            } else {
                amount / grand_total * Decimal::from(100)
            };
            AllocationSlice {
                name: ty.display_name().to_string(),
                amount,
                percentage,
                color: ty.color().to_string(),
            }
        })
        .collect();
    slices.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.name.cmp(&b.name)));
    slices
}
