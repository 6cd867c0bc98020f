// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use super::secret;
use crate::auth::{Auth, StartupMode};
use crate::store::Store;

pub fn init(store: &dyn Store) -> Result<()> {
    match Auth::new(store).mode()? {
        StartupMode::FirstRun => println!("No user yet, run `finkeep register`"),
        StartupMode::Returning => println!("User registered, ready"),
    }
    Ok(())
}

pub fn register(store: &dyn Store, m: &clap::ArgMatches) -> Result<()> {
    let auth = Auth::new(store);
    // fail before prompting; `Auth::register` checks again
    if auth.mode()? == StartupMode::Returning {
        return Err(crate::error::AuthError::AlreadyRegistered.into());
    }
    let new = secret(m, "new", "New password: ")?;
    let confirm = secret(m, "confirm", "Confirm password: ")?;
    let user = auth.register(&new, &confirm)?;
    println!("Registered '{}'", user.login);
    Ok(())
}

pub fn passwd(store: &dyn Store, m: &clap::ArgMatches) -> Result<()> {
    let old = secret(m, "password", "Current password: ")?;
    let new = secret(m, "new", "New password: ")?;
    let confirm = secret(m, "confirm", "Confirm new password: ")?;
    Auth::new(store).change_password(&old, &new, &confirm)?;
    println!("Password changed");
    Ok(())
}
