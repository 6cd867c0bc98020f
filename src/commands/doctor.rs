// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::authenticate;
use crate::ledger::Ledger;
use crate::store::Store;
use crate::utils::pretty_table;
use anyhow::Result;

/// Lists integrity problems as (issue, detail) pairs.
pub fn check(ledger: &mut Ledger<'_>) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // 1) Running balances that disagree with the stored operations
    for d in ledger.reconcile()? {
        rows.push(vec![
            "balance_drift".into(),
            format!("{} cached {} actual {}", d.currency, d.cached, d.actual),
        ]);
    }

    // 2) Operations pointing at a category that no longer exists
    for op in ledger.operations() {
        if ledger.category(op.category_id).is_none() {
            rows.push(vec![
                "orphan_operation".into(),
                format!("#{} -> category #{}", op.id, op.category_id),
            ]);
        }
    }
    Ok(rows)
}

pub fn handle(store: &dyn Store, m: &clap::ArgMatches) -> Result<()> {
    authenticate(store, m)?;
    let mut ledger = Ledger::load(store)?;
    let rows = check(&mut ledger)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
