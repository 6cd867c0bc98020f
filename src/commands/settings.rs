// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Currency;
use crate::store::Store;
use crate::utils::{get_display_currency, set_display_currency};
use anyhow::Result;

pub fn handle(store: &dyn Store, m: &clap::ArgMatches) -> Result<()> {
    match m.get_one::<String>("code") {
        Some(code) => {
            let ccy = code.parse::<Currency>()?;
            set_display_currency(store, ccy)?;
            println!("Display currency set to {}", ccy);
        }
        None => println!("{}", get_display_currency(store)?),
    }
    Ok(())
}
