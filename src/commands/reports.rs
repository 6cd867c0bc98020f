// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::authenticate;
use super::goals::describe;
use crate::ledger::{GoalProgress, Ledger};
use crate::models::{Currency, Operation};
use crate::stats::{MonthlyStat, StatsFilter};
use crate::store::Store;
use crate::utils::{TS_FORMAT, fmt_money, maybe_print_json, pretty_table, resolve_currency};
use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct BalanceRow {
    pub currency: Currency,
    pub balance: Decimal,
}

pub fn balance_rows(ledger: &Ledger<'_>) -> Vec<BalanceRow> {
    ledger
        .balances()
        .into_iter()
        .map(|(currency, balance)| BalanceRow { currency, balance })
        .collect()
}

pub fn balances(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    authenticate(store, sub)?;
    let ledger = Ledger::load(store)?;
    let data = balance_rows(&ledger);
    if !maybe_print_json(sub.get_flag("json"), &data)? {
        let rows = data
            .iter()
            .map(|r| vec![r.currency.to_string(), format!("{:.2}", r.balance)])
            .collect();
        println!("{}", pretty_table(&["CCY", "Balance"], rows));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub currency: Currency,
    pub balance: Decimal,
    pub month: MonthlyStat,
    pub last: Option<Operation>,
    pub goal: GoalProgress,
}

/// Header figures for the month containing `today`; savings are left out of
/// the month totals.
pub fn summary_for(ledger: &Ledger<'_>, ccy: Currency, today: NaiveDate) -> Summary {
    Summary {
        currency: ccy,
        balance: ledger.balance(ccy),
        month: ledger.month_summary(ccy, today.year(), today.month()),
        last: ledger.last_operation(ccy).cloned(),
        goal: ledger.goal_progress(ccy),
    }
}

pub fn summary(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    authenticate(store, sub)?;
    let ledger = Ledger::load(store)?;
    let ccy = resolve_currency(store, sub.get_one::<String>("currency"))?;
    let s = summary_for(&ledger, ccy, Local::now().date_naive());
    if maybe_print_json(sub.get_flag("json"), &s)? {
        return Ok(());
    }
    let last = match &s.last {
        Some(op) => format!(
            "{} • {} ({})",
            fmt_money(&op.amount, op.currency),
            op.category_name,
            op.created_at.format(TS_FORMAT)
        ),
        None => "—".to_string(),
    };
    let rows = vec![
        vec!["Balance".to_string(), fmt_money(&s.balance, ccy)],
        vec![
            format!("Income {}", s.month.label),
            format!("+ {:.2}", s.month.income),
        ],
        vec![
            format!("Expense {}", s.month.label),
            format!("- {:.2}", s.month.expense),
        ],
        vec!["Operations this month".to_string(), s.month.count.to_string()],
        vec!["Last operation".to_string(), last],
        vec!["Savings".to_string(), describe(s.goal, ccy)],
    ];
    println!("{}", pretty_table(&["", ccy.code()], rows));
    Ok(())
}

pub fn stats(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    authenticate(store, sub)?;
    let ledger = Ledger::load(store)?;
    let ccy = resolve_currency(store, sub.get_one::<String>("currency"))?;
    let filter = StatsFilter {
        year: sub.get_one::<i32>("year").copied(),
        month: sub.get_one::<u32>("month").copied(),
    };
    let series = ledger.statistics(ccy, filter);
    if !maybe_print_json(sub.get_flag("json"), &series)? {
        let rows = series
            .iter()
            .map(|m| {
                vec![
                    m.label.clone(),
                    format!("{:.2}", m.income),
                    format!("{:.2}", m.expense),
                    m.count.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expense", "Operations"], rows)
        );
        let years = ledger.years();
        if !years.is_empty() {
            let list: Vec<String> = years.iter().map(|y| y.to_string()).collect();
            println!("Years with operations: {}", list.join(", "));
        }
    }
    Ok(())
}
