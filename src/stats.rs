// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Monthly income/expense aggregation. Savings operations are moved money,
//! not spending, so they never count here.

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{Currency, Operation};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyStat {
    /// `MM.YYYY`, or `MM` when the month spans every year
    pub label: String,
    pub income: Decimal,
    /// magnitude of the debits
    pub expense: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsFilter {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

fn accumulate<'a>(label: String, ops: impl Iterator<Item = &'a Operation>) -> MonthlyStat {
    let mut stat = MonthlyStat {
        label,
        income: Decimal::ZERO,
        expense: Decimal::ZERO,
        count: 0,
    };
    for op in ops {
        if op.amount > Decimal::ZERO {
            stat.income = stat.income.saturating_add(op.amount);
        } else {
            stat.expense = stat.expense.saturating_add(-op.amount);
        }
        stat.count += 1;
    }
    stat
}

fn in_scope<'a>(
    ops: &'a [Operation],
    ccy: Currency,
    savings: Option<i64>,
) -> impl Iterator<Item = &'a Operation> + 'a {
    ops.iter()
        .filter(move |o| o.currency == ccy && Some(o.category_id) != savings)
}

/// Totals for one calendar month.
pub fn month_summary(
    ops: &[Operation],
    ccy: Currency,
    savings: Option<i64>,
    year: i32,
    month: u32,
) -> MonthlyStat {
    accumulate(
        format!("{:02}.{}", month, year),
        in_scope(ops, ccy, savings)
            .filter(|o| o.created_at.year() == year && o.created_at.month() == month),
    )
}

/// Builds the statistics series for a filter:
/// month set gives one row, year alone gives twelve rows, neither gives one
/// row per month that has operations, oldest first.
pub fn monthly(
    ops: &[Operation],
    ccy: Currency,
    savings: Option<i64>,
    filter: StatsFilter,
) -> Vec<MonthlyStat> {
    match (filter.year, filter.month) {
        (Some(y), Some(m)) => vec![month_summary(ops, ccy, savings, y, m)],
        (None, Some(m)) => vec![accumulate(
            format!("{:02}", m),
            in_scope(ops, ccy, savings).filter(|o| o.created_at.month() == m),
        )],
        (Some(y), None) => (1..=12)
            .map(|m| month_summary(ops, ccy, savings, y, m))
            .collect(),
        (None, None) => {
            let mut groups: BTreeMap<(i32, u32), Vec<&Operation>> = BTreeMap::new();
            for op in in_scope(ops, ccy, savings) {
                groups
                    .entry((op.created_at.year(), op.created_at.month()))
                    .or_default()
                    .push(op);
            }
            groups
                .into_iter()
                .map(|((y, m), g)| accumulate(format!("{:02}.{}", m, y), g.into_iter()))
                .collect()
        }
    }
}

/// Distinct years that have operations, ascending.
pub fn years(ops: &[Operation]) -> Vec<i32> {
    ops.iter()
        .map(|o| o.created_at.year())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
