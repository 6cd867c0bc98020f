// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::authenticate;
use crate::ledger::{GoalProgress, Ledger};
use crate::models::Currency;
use crate::store::Store;
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, resolve_currency};
use anyhow::Result;

pub fn handle(store: &dyn Store, m: &clap::ArgMatches) -> Result<()> {
    authenticate(store, m)?;
    let mut ledger = Ledger::load(store)?;
    match m.subcommand() {
        Some(("set", sub)) => {
            let ccy = resolve_currency(store, sub.get_one::<String>("currency"))?;
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            ledger.set_goal(ccy, amount)?;
            println!("{}", describe(ledger.goal_progress(ccy), ccy));
        }
        Some(("show", sub)) => {
            let ccy = resolve_currency(store, sub.get_one::<String>("currency"))?;
            let progress = ledger.goal_progress(ccy);
            if !maybe_print_json(sub.get_flag("json"), &progress)? {
                println!("{}", describe(progress, ccy));
            }
        }
        _ => {}
    }
    Ok(())
}

pub fn describe(progress: GoalProgress, ccy: Currency) -> String {
    match progress {
        GoalProgress::NotSet => "No goal set".to_string(),
        GoalProgress::Accumulated { saved } => format!("Saved: {}", fmt_money(&saved, ccy)),
        GoalProgress::Progress {
            saved,
            goal,
            percent,
        } => format!(
            "{}/{} {} • {}%",
            saved.round_dp(2).normalize(),
            goal.round_dp(2).normalize(),
            ccy,
            percent.round_dp(2).normalize()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn describes_each_state() {
        assert_eq!(describe(GoalProgress::NotSet, Currency::Uah), "No goal set");
        assert_eq!(
            describe(
                GoalProgress::Accumulated {
                    saved: Decimal::from(40)
                },
                Currency::Usd
            ),
            "Saved: USD 40"
        );
        assert_eq!(
            describe(
                GoalProgress::Progress {
                    saved: Decimal::from(25),
                    goal: Decimal::from(200),
                    percent: Decimal::new(125, 1),
                },
                Currency::Eur
            ),
            "25/200 EUR • 12.5%"
        );
    }
}
