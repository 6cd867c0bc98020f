// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::authenticate;
use crate::ledger::{CategoryDraft, Ledger};
use crate::models::CategoryKind;
use crate::store::Store;
use crate::utils::{maybe_print_json, pretty_table, resolve_currency};
use anyhow::Result;

pub fn handle(store: &dyn Store, m: &clap::ArgMatches) -> Result<()> {
    authenticate(store, m)?;
    let mut ledger = Ledger::load(store)?;
    match m.subcommand() {
        Some(("add", sub)) => {
            let draft = CategoryDraft {
                name: sub.get_one::<String>("name").unwrap().clone(),
                kind: sub.get_one::<String>("type").unwrap().parse()?,
                emoji: sub.get_one::<String>("emoji").cloned(),
            };
            let cat = ledger.add_category(draft)?;
            println!("Added category #{} {} '{}'", cat.id, cat.emoji, cat.name);
        }
        Some(("list", sub)) => list(store, &ledger, sub)?,
        Some(("edit", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let current = ledger
                .category(id)
                .cloned()
                .ok_or(crate::error::LedgerError::NotFound {
                    entity: "Category",
                    id,
                })?;
            let kind = match sub.get_one::<String>("type") {
                Some(t) => t.parse::<CategoryKind>()?,
                None => current.kind,
            };
            let draft = CategoryDraft {
                name: sub
                    .get_one::<String>("name")
                    .cloned()
                    .unwrap_or(current.name),
                kind,
                emoji: Some(
                    sub.get_one::<String>("emoji")
                        .cloned()
                        .unwrap_or(current.emoji),
                ),
            };
            let cat = ledger.update_category(id, draft)?;
            println!("Updated category #{} {} '{}'", cat.id, cat.emoji, cat.name);
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let removed = ledger.remove_category(id)?;
            println!("Removed category #{} and {} operation(s)", id, removed);
        }
        _ => {}
    }
    Ok(())
}

fn list(store: &dyn Store, ledger: &Ledger<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let ccy = resolve_currency(store, sub.get_one::<String>("currency"))?;
    let totals = ledger.category_totals(ccy);
    if !maybe_print_json(sub.get_flag("json"), &totals)? {
        let rows = totals
            .iter()
            .map(|t| {
                let mut name = format!("{} {}", t.emoji, t.name);
                if ledger.is_savings(t.id) {
                    name.push_str(" (savings)");
                }
                vec![
                    t.id.to_string(),
                    name,
                    t.kind.as_str().to_string(),
                    format!("{:.2}", t.total),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Category", "Type", &format!("Total ({})", ccy)], rows)
        );
    }
    Ok(())
}
