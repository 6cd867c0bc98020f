// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod account;
pub mod categories;
pub mod operations;
pub mod goals;
pub mod reports;
pub mod settings;
pub mod doctor;

use anyhow::{Context, Result};

use crate::auth::Auth;
use crate::models::User;
use crate::store::Store;

/// Reads an argument or falls back to a hidden terminal prompt.
pub(crate) fn secret(m: &clap::ArgMatches, id: &str, prompt: &str) -> Result<String> {
    if let Some(v) = m.get_one::<String>(id) {
        return Ok(v.clone());
    }
    rpassword::prompt_password(prompt).context("Failed to read password")
}

/// Logs in with `--password` (or a prompt) before any ledger access.
pub(crate) fn authenticate(store: &dyn Store, m: &clap::ArgMatches) -> Result<User> {
    let password = secret(m, "password", "Password: ")?;
    Auth::new(store).login(&password)
}
