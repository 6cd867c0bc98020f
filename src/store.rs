// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Persistence gateway used by the ledger and the auth flows.
//!
//! Every method is a point operation keyed by an application-assigned id.
//! There is no transaction spanning several calls.

use anyhow::Result;

use crate::models::{Category, Goals, Operation, User};

pub trait Store {
    fn load_user(&self) -> Result<Option<User>>;
    fn insert_user(&self, user: &User) -> Result<()>;
    fn update_credentials(&self, user: &User) -> Result<()>;
    fn update_goals(&self, goals: &Goals) -> Result<()>;

    fn load_categories(&self) -> Result<Vec<Category>>;
    fn insert_category(&self, cat: &Category) -> Result<()>;
    fn update_category(&self, cat: &Category) -> Result<()>;
    fn delete_category(&self, id: i64) -> Result<()>;

    fn load_operations(&self) -> Result<Vec<Operation>>;
    fn insert_operation(&self, op: &Operation) -> Result<()>;
    fn update_operation(&self, op: &Operation) -> Result<()>;
    fn delete_operation(&self, id: i64) -> Result<()>;
    fn delete_operations_by_category(&self, category_id: i64) -> Result<usize>;

    fn get_setting(&self, key: &str) -> Result<Option<String>>;
    fn set_setting(&self, key: &str, value: &str) -> Result<()>;
}
