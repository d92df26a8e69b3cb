// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Income,
    Expense,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Income => "income",
            TxKind::Expense => "expense",
        }
    }

    /// Positive amounts are income, everything else an expense.
    pub fn from_amount(amount: Decimal) -> Self {
        if amount > Decimal::ZERO {
            TxKind::Income
        } else {
            TxKind::Expense
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown transaction kind '{0}', expected income|expense")]
pub struct ParseTxKindError(pub String);

impl FromStr for TxKind {
    type Err = ParseTxKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TxKind::Income),
            "expense" => Ok(TxKind::Expense),
            other => Err(ParseTxKindError(other.to_string())),
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single ledger entry, already normalized to the base currency.
/// Immutable once recorded; `holding_id` marks it as investment flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub kind: TxKind,
    pub category: Option<String>,
    pub holding_id: Option<i64>,
}

impl Transaction {
    pub fn is_investment(&self) -> bool {
        self.holding_id.is_some()
    }
}

/// The closed set of portfolio buckets a holding can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvestmentType {
    Stock,
    Etf,
    Bond,
    Crypto,
    HighYieldSavings,
    Cash,
}

impl InvestmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvestmentType::Stock => "stock",
            InvestmentType::Etf => "etf",
            InvestmentType::Bond => "bond",
            InvestmentType::Crypto => "crypto",
            InvestmentType::HighYieldSavings => "high-yield-savings",
            InvestmentType::Cash => "cash",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            InvestmentType::Stock => "Stocks",
            InvestmentType::Etf => "ETFs",
            InvestmentType::Bond => "Bonds",
            InvestmentType::Crypto => "Crypto",
            InvestmentType::HighYieldSavings => "High-Yield Savings",
            InvestmentType::Cash => "Cash",
        }
    }

    /// Fixed chart color per bucket.
    pub fn color(&self) -> &'static str {
        match self {
            InvestmentType::Stock => "#4385be",
            InvestmentType::Etf => "#879a39",
            InvestmentType::Bond => "#8b7ec8",
            InvestmentType::Crypto => "#da702c",
            InvestmentType::HighYieldSavings => "#3aa99f",
            InvestmentType::Cash => "#d14d41",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown investment type '{0}', expected one of stock|etf|bond|crypto|high-yield-savings|cash")]
pub struct ParseInvestmentTypeError(pub String);

impl FromStr for InvestmentType {
    type Err = ParseInvestmentTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stock" | "stocks" => Ok(InvestmentType::Stock),
            "etf" | "etfs" => Ok(InvestmentType::Etf),
            "bond" | "bonds" => Ok(InvestmentType::Bond),
            "crypto" => Ok(InvestmentType::Crypto),
            "high-yield-savings" | "high yield savings" | "hysa" => {
                Ok(InvestmentType::HighYieldSavings)
            }
            "cash" => Ok(InvestmentType::Cash),
            other => Err(ParseInvestmentTypeError(other.to_string())),
        }
    }
}

impl fmt::Display for InvestmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A portfolio position. `transaction_count` is derived from the link
/// table at load time, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    pub id: i64,
    pub ticker: String,
    pub investment_type: InvestmentType,
    pub total_invested: Decimal,
    pub transaction_count: u64,
}
