// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing::{info, warn};

use crate::credentials::{self, KdfParams};
use crate::error::AuthError;
use crate::models::{Goals, User};
use crate::password;
use crate::store::Store;

pub const DEFAULT_LOGIN: &str = "admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupMode {
    /// No user row yet: registration flow
    FirstRun,
    Returning,
}

/// Registration, login and password change against the single user row.
pub struct Auth<'s> {
    store: &'s dyn Store,
    kdf: KdfParams,
}

impl<'s> Auth<'s> {
    pub fn new(store: &'s dyn Store) -> Self {
        Self::with_kdf(store, KdfParams::default())
    }

    /// Uses `kdf` for newly created hashes. Verification always uses the
    /// parameters stored with the user.
    pub fn with_kdf(store: &'s dyn Store, kdf: KdfParams) -> Self {
        Self { store, kdf }
    }

    pub fn mode(&self) -> Result<StartupMode> {
        Ok(match self.store.load_user()? {
            Some(_) => StartupMode::Returning,
            None => StartupMode::FirstRun,
        })
    }

    pub fn register(&self, password: &str, confirm: &str) -> Result<User> {
        if self.mode()? == StartupMode::Returning {
            return Err(AuthError::AlreadyRegistered.into());
        }
        password::validate(password).map_err(AuthError::from)?;
        if password != confirm {
            return Err(AuthError::Mismatch.into());
        }
        let hashed = credentials::create_hash_with(password, self.kdf)?;
        let user = User {
            id: 1,
            login: DEFAULT_LOGIN.to_string(),
            password_hash: hashed.hash,
            salt: hashed.salt,
            kdf: hashed.params,
            goals: Goals::default(),
        };
        self.store.insert_user(&user)?;
        info!(login = %user.login, "user registered");
        Ok(user)
    }

    pub fn login(&self, password: &str) -> Result<User> {
        if password.trim().is_empty() {
            return Err(AuthError::EmptyPassword.into());
        }
        let user = self.store.load_user()?.ok_or(AuthError::NoUser)?;
        if !credentials::verify(password, &user.password_hash, &user.salt, user.kdf) {
            warn!("rejected login");
            return Err(AuthError::WrongPassword.into());
        }
        Ok(user)
    }

    pub fn change_password(&self, old: &str, new: &str, confirm: &str) -> Result<User> {
        if old.trim().is_empty() {
            return Err(AuthError::EmptyPassword.into());
        }
        let mut user = self.store.load_user()?.ok_or(AuthError::NoUser)?;
        if !credentials::verify(old, &user.password_hash, &user.salt, user.kdf) {
            warn!("rejected password change");
            return Err(AuthError::WrongPassword.into());
        }
        password::validate(new).map_err(AuthError::from)?;
        if new != confirm {
            return Err(AuthError::Mismatch.into());
        }
        let hashed = credentials::create_hash_with(new, self.kdf)?;
        user.password_hash = hashed.hash;
        user.salt = hashed.salt;
        user.kdf = hashed.params;
        self.store.update_credentials(&user)?;
        info!("password changed");
        Ok(user)
    }
}
