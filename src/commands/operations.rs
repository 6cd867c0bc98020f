// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::authenticate;
use crate::error::LedgerError;
use crate::ledger::{Ledger, OperationDraft};
use crate::models::{Currency, Operation};
use crate::store::Store;
use crate::utils::{
    TS_FORMAT, fmt_money, maybe_print_json, parse_datetime, parse_decimal, pretty_table,
    resolve_currency,
};
use anyhow::Result;
use chrono::Local;
use rust_decimal::Decimal;

pub fn handle(store: &dyn Store, m: &clap::ArgMatches) -> Result<()> {
    authenticate(store, m)?;
    let mut ledger = Ledger::load(store)?;
    match m.subcommand() {
        Some(("add", sub)) => add(store, &mut ledger, sub)?,
        Some(("list", sub)) => list(store, &ledger, sub)?,
        Some(("edit", sub)) => edit(&mut ledger, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let op = ledger.remove_operation(id)?;
            println!(
                "Removed operation #{} ({})",
                op.id,
                fmt_money(&op.amount, op.currency)
            );
        }
        _ => {}
    }
    Ok(())
}

fn optional_decimal(sub: &clap::ArgMatches, id: &str) -> Result<Option<Decimal>> {
    sub.get_one::<String>(id)
        .map(|s| parse_decimal(s))
        .transpose()
}

fn add(store: &dyn Store, ledger: &mut Ledger<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let draft = OperationDraft {
        category_id: *sub.get_one::<i64>("category").unwrap(),
        description: sub
            .get_one::<String>("description")
            .cloned()
            .unwrap_or_default(),
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        currency: resolve_currency(store, sub.get_one::<String>("currency"))?,
        created_at: match sub.get_one::<String>("date") {
            Some(d) => parse_datetime(d)?,
            None => Local::now().naive_local(),
        },
        goal: optional_decimal(sub, "goal")?,
    };
    let op = ledger.add_operation(draft)?;
    println!(
        "Recorded #{} {} in '{}'",
        op.id,
        fmt_money(&op.amount, op.currency),
        op.category_name
    );
    Ok(())
}

fn edit(ledger: &mut Ledger<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let current = ledger
        .operation(id)
        .cloned()
        .ok_or(LedgerError::NotFound {
            entity: "Operation",
            id,
        })?;
    let draft = OperationDraft {
        category_id: sub
            .get_one::<i64>("category")
            .copied()
            .unwrap_or(current.category_id),
        description: sub
            .get_one::<String>("description")
            .cloned()
            .unwrap_or(current.description),
        amount: match sub.get_one::<String>("amount") {
            Some(a) => parse_decimal(a)?,
            None => current.amount.abs(),
        },
        currency: match sub.get_one::<String>("currency") {
            Some(c) => c.parse::<Currency>()?,
            None => current.currency,
        },
        created_at: match sub.get_one::<String>("date") {
            Some(d) => parse_datetime(d)?,
            None => current.created_at,
        },
        goal: optional_decimal(sub, "goal")?,
    };
    let op = ledger.update_operation(id, draft)?;
    println!(
        "Updated #{} {} in '{}'",
        op.id,
        fmt_money(&op.amount, op.currency),
        op.category_name
    );
    Ok(())
}

fn list(store: &dyn Store, ledger: &Ledger<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let ccy = resolve_currency(store, sub.get_one::<String>("currency"))?;
    let category = sub.get_one::<i64>("category").copied();
    let mut ops = ledger.list(ccy, category);
    if let Some(limit) = sub.get_one::<usize>("limit") {
        ops.truncate(*limit);
    }
    if !maybe_print_json(sub.get_flag("json"), &ops)? {
        let rows = ops.iter().map(|op| row(op)).collect::<Vec<_>>();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Category", "Description", "Amount", "CCY"],
                rows
            )
        );
    }
    Ok(())
}

fn signed(d: Decimal) -> String {
    if d > Decimal::ZERO {
        format!("+{:.2}", d)
    } else {
        format!("{:.2}", d)
    }
}

fn row(op: &Operation) -> Vec<String> {
    vec![
        op.id.to_string(),
        op.created_at.format(TS_FORMAT).to_string(),
        op.category_name.clone(),
        op.description.clone(),
        signed(op.amount),
        op.currency.to_string(),
    ]
}
