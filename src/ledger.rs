// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! In-memory ledger of categories and operations.
//!
//! Balances are recomputed from the operation list on load and then adjusted
//! in lock-step with every mutation. Each mutation validates first, writes the
//! affected row(s) through the [`Store`], and only then touches memory, so a
//! rejected or failed call leaves the ledger as it was.

use anyhow::Result;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::error::LedgerError;
use crate::models::{Category, CategoryKind, Currency, Goals, Operation};
use crate::stats::{self, MonthlyStat, StatsFilter};
use crate::store::Store;

pub const SAVINGS_NAME: &str = "Savings";
pub const SAVINGS_KEY: &str = "savings_category_id";
pub const DEFAULT_EMOJI: &str = "🛜";
/// Largest magnitude accepted for one operation (one trillion).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

const DEFAULT_CATEGORIES: [(&str, CategoryKind, &str); 6] = [
    ("Main income", CategoryKind::Income, "💰"),
    ("Gifts", CategoryKind::Income, "🎁"),
    ("Food", CategoryKind::Expense, "🍔"),
    ("Transport", CategoryKind::Expense, "🚌"),
    ("Clothes", CategoryKind::Expense, "👕"),
    (SAVINGS_NAME, CategoryKind::Income, "🐷"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDraft {
    pub name: String,
    pub kind: CategoryKind,
    pub emoji: Option<String>,
}

/// User input for creating or editing an operation. `amount` is the entered
/// magnitude; the sign is derived from the target category.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationDraft {
    pub category_id: i64,
    pub description: String,
    pub amount: Decimal,
    pub currency: Currency,
    pub created_at: NaiveDateTime,
    /// New savings goal for `currency`, only valid on the savings category
    pub goal: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub id: i64,
    pub name: String,
    pub emoji: String,
    pub kind: CategoryKind,
    pub total: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GoalProgress {
    NotSet,
    Accumulated { saved: Decimal },
    Progress { saved: Decimal, goal: Decimal, percent: Decimal },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BalanceDrift {
    pub currency: Currency,
    pub cached: Decimal,
    pub actual: Decimal,
}

pub struct Ledger<'s> {
    store: &'s dyn Store,
    categories: Vec<Category>,
    operations: Vec<Operation>,
    balances: BTreeMap<Currency, Decimal>,
    goals: Goals,
    /// goals live on the user row, so they need a registered user
    registered: bool,
    savings: Option<i64>,
    next_category_id: i64,
    next_operation_id: i64,
}

impl<'s> Ledger<'s> {
    /// Loads everything from the store, seeds default categories on an empty
    /// database and resolves the savings category once.
    pub fn load(store: &'s dyn Store) -> Result<Self> {
        let categories = store.load_categories()?;
        let operations = store.load_operations()?;
        let user = store.load_user()?;
        let registered = user.is_some();
        let goals = user.map(|u| u.goals).unwrap_or_default();

        let mut ledger = Self {
            store,
            next_category_id: categories.iter().map(|c| c.id).max().unwrap_or(0) + 1,
            next_operation_id: operations.iter().map(|o| o.id).max().unwrap_or(0) + 1,
            categories,
            operations,
            balances: BTreeMap::new(),
            goals,
            registered,
            savings: None,
        };

        if ledger.categories.is_empty() {
            ledger.seed_categories()?;
        }
        ledger.resolve_savings()?;
        ledger.balances = Self::sum_by_currency(&ledger.operations)?;
        Ok(ledger)
    }

    fn seed_categories(&mut self) -> Result<()> {
        info!("seeding default categories");
        for (name, kind, emoji) in DEFAULT_CATEGORIES {
            let cat = Category {
                id: self.next_category_id,
                name: name.to_string(),
                kind,
                emoji: emoji.to_string(),
            };
            self.store.insert_category(&cat)?;
            self.categories.push(cat);
            self.next_category_id += 1;
        }
        Ok(())
    }

    fn resolve_savings(&mut self) -> Result<()> {
        let stored = self
            .store
            .get_setting(SAVINGS_KEY)?
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|id| self.categories.iter().any(|c| c.id == *id));
        let id = match stored {
            Some(id) => id,
            None => {
                let found = self
                    .categories
                    .iter()
                    .find(|c| c.name == SAVINGS_NAME && c.kind == CategoryKind::Income)
                    .map(|c| c.id);
                let id = match found {
                    Some(id) => id,
                    None => {
                        let cat = Category {
                            id: self.next_category_id,
                            name: SAVINGS_NAME.to_string(),
                            kind: CategoryKind::Income,
                            emoji: "🐷".to_string(),
                        };
                        self.store.insert_category(&cat)?;
                        self.next_category_id += 1;
                        let id = cat.id;
                        self.categories.push(cat);
                        id
                    }
                };
                self.store.set_setting(SAVINGS_KEY, &id.to_string())?;
                id
            }
        };
        self.savings = Some(id);
        Ok(())
    }

    fn sum_by_currency(ops: &[Operation]) -> Result<BTreeMap<Currency, Decimal>, LedgerError> {
        let mut out: BTreeMap<Currency, Decimal> =
            Currency::ALL.iter().map(|c| (*c, Decimal::ZERO)).collect();
        for op in ops {
            let slot = out.entry(op.currency).or_insert(Decimal::ZERO);
            *slot = slot.checked_add(op.amount).ok_or_else(|| {
                LedgerError::Validation(format!("{} operations overflow the balance", op.currency))
            })?;
        }
        Ok(out)
    }

    /// Balances after applying `changes`, computed before anything is
    /// written so an overflow is rejected up front.
    fn shifted(
        &self,
        changes: &[(Currency, Decimal)],
    ) -> Result<BTreeMap<Currency, Decimal>, LedgerError> {
        let mut next = self.balances.clone();
        for (ccy, delta) in changes {
            let slot = next.entry(*ccy).or_insert(Decimal::ZERO);
            *slot = slot.checked_add(*delta).ok_or_else(|| {
                LedgerError::Validation(format!("The {} balance would overflow", ccy))
            })?;
        }
        Ok(next)
    }

    // ---- queries ----

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn category(&self, id: i64) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn operation(&self, id: i64) -> Option<&Operation> {
        self.operations.iter().find(|o| o.id == id)
    }

    pub fn savings_category_id(&self) -> Option<i64> {
        self.savings
    }

    pub fn is_savings(&self, category_id: i64) -> bool {
        self.savings == Some(category_id)
    }

    pub fn goals(&self) -> Goals {
        self.goals
    }

    pub fn balance(&self, ccy: Currency) -> Decimal {
        self.balances.get(&ccy).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn balances(&self) -> Vec<(Currency, Decimal)> {
        Currency::ALL.iter().map(|c| (*c, self.balance(*c))).collect()
    }

    /// Per-category totals in one currency. The savings total is shown as a
    /// magnitude.
    pub fn category_totals(&self, ccy: Currency) -> Vec<CategoryTotal> {
        self.categories
            .iter()
            .map(|cat| {
                let sum = self
                    .operations
                    .iter()
                    .filter(|o| o.currency == ccy && o.category_id == cat.id)
                    .fold(Decimal::ZERO, |acc, o| acc.saturating_add(o.amount));
                CategoryTotal {
                    id: cat.id,
                    name: cat.name.clone(),
                    emoji: cat.emoji.clone(),
                    kind: cat.kind,
                    total: if self.is_savings(cat.id) { sum.abs() } else { sum },
                }
            })
            .collect()
    }

    pub fn saved_total(&self, ccy: Currency) -> Decimal {
        let Some(sid) = self.savings else {
            return Decimal::ZERO;
        };
        self.operations
            .iter()
            .filter(|o| o.currency == ccy && o.category_id == sid)
            .fold(Decimal::ZERO, |acc, o| acc.saturating_add(o.amount.abs()))
    }

    pub fn goal_progress(&self, ccy: Currency) -> GoalProgress {
        let saved = self.saved_total(ccy);
        let goal = self.goals.get(ccy);
        if goal <= Decimal::ZERO {
            return if saved <= Decimal::ZERO {
                GoalProgress::NotSet
            } else {
                GoalProgress::Accumulated { saved }
            };
        }
        // a ratio too large to represent is far past the cap
        let percent = saved
            .checked_div(goal)
            .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
            .map_or(Decimal::ONE_HUNDRED, |p| p.min(Decimal::ONE_HUNDRED));
        GoalProgress::Progress {
            saved,
            goal,
            percent,
        }
    }

    /// Operations in one currency, optionally one category, newest first.
    pub fn list(&self, ccy: Currency, category_id: Option<i64>) -> Vec<&Operation> {
        let mut out: Vec<&Operation> = self
            .operations
            .iter()
            .filter(|o| o.currency == ccy && category_id.is_none_or(|id| o.category_id == id))
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        out
    }

    pub fn last_operation(&self, ccy: Currency) -> Option<&Operation> {
        self.list(ccy, None).into_iter().next()
    }

    pub fn month_summary(&self, ccy: Currency, year: i32, month: u32) -> MonthlyStat {
        stats::month_summary(&self.operations, ccy, self.savings, year, month)
    }

    pub fn years(&self) -> Vec<i32> {
        stats::years(&self.operations)
    }

    pub fn statistics(&self, ccy: Currency, filter: StatsFilter) -> Vec<MonthlyStat> {
        stats::monthly(&self.operations, ccy, self.savings, filter)
    }

    /// Compares the running balances with a fresh sum over the stored
    /// operations and reports any drift. The ledger then takes the stored
    /// operations as authoritative.
    pub fn reconcile(&mut self) -> Result<Vec<BalanceDrift>> {
        let stored = self.store.load_operations()?;
        let actual = Self::sum_by_currency(&stored)?;
        let mut drift = Vec::new();
        for (ccy, value) in &actual {
            let cached = self.balance(*ccy);
            if cached != *value {
                warn!(currency = %ccy, %cached, actual = %value, "balance drift");
                drift.push(BalanceDrift {
                    currency: *ccy,
                    cached,
                    actual: *value,
                });
            }
        }
        let next_id = stored.iter().map(|o| o.id).max().unwrap_or(0) + 1;
        self.next_operation_id = self.next_operation_id.max(next_id);
        self.operations = stored;
        self.balances = actual;
        Ok(drift)
    }

    // ---- categories ----

    fn validate_category(draft: &CategoryDraft) -> Result<(String, String), LedgerError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation("Enter a category name".into()));
        }
        let emoji = draft
            .emoji
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .unwrap_or(DEFAULT_EMOJI);
        Ok((name.to_string(), emoji.to_string()))
    }

    pub fn add_category(&mut self, draft: CategoryDraft) -> Result<Category> {
        let (name, emoji) = Self::validate_category(&draft)?;
        let cat = Category {
            id: self.next_category_id,
            name,
            kind: draft.kind,
            emoji,
        };
        self.store.insert_category(&cat)?;
        self.next_category_id += 1;
        self.categories.push(cat.clone());
        info!(id = cat.id, name = %cat.name, "category added");
        Ok(cat)
    }

    /// Edits a category in place and refreshes the name snapshot on its
    /// operations. Existing amounts keep their sign.
    pub fn update_category(&mut self, id: i64, draft: CategoryDraft) -> Result<Category> {
        let (name, emoji) = Self::validate_category(&draft)?;
        let idx = self
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or(LedgerError::NotFound {
                entity: "Category",
                id,
            })?;
        let updated = Category {
            id,
            name,
            kind: draft.kind,
            emoji,
        };
        let renamed = self.categories[idx].name != updated.name;
        if renamed {
            for op in self.operations.iter().filter(|o| o.category_id == id) {
                self.store.update_operation(&Operation {
                    category_name: updated.name.clone(),
                    ..op.clone()
                })?;
            }
        }
        self.store.update_category(&updated)?;

        if renamed {
            for op in self.operations.iter_mut().filter(|o| o.category_id == id) {
                op.category_name = updated.name.clone();
            }
        }
        self.categories[idx] = updated.clone();
        info!(id, "category updated");
        Ok(updated)
    }

    /// Deletes a category together with every operation that references it,
    /// reversing their effect on the balances. Returns the number of
    /// operations removed.
    pub fn remove_category(&mut self, id: i64) -> Result<usize> {
        if self.is_savings(id) {
            return Err(LedgerError::ProtectedCategory.into());
        }
        if self.category(id).is_none() {
            return Err(LedgerError::NotFound {
                entity: "Category",
                id,
            }
            .into());
        }

        let reversals: Vec<(Currency, Decimal)> = self
            .operations
            .iter()
            .filter(|o| o.category_id == id)
            .map(|o| (o.currency, -o.amount))
            .collect();
        let balances = self.shifted(&reversals)?;

        self.store.delete_operations_by_category(id)?;
        self.store.delete_category(id)?;

        let (removed, kept): (Vec<Operation>, Vec<Operation>) = std::mem::take(&mut self.operations)
            .into_iter()
            .partition(|o| o.category_id == id);
        self.operations = kept;
        self.balances = balances;
        self.categories.retain(|c| c.id != id);
        info!(id, operations = removed.len(), "category removed");
        Ok(removed.len())
    }

    // ---- operations ----

    /// Checks a draft and returns the signed amount and category snapshot.
    fn validate_operation(&self, draft: &OperationDraft) -> Result<(Decimal, String), LedgerError> {
        if draft.amount <= Decimal::ZERO {
            return Err(LedgerError::Validation(
                "Enter a valid amount greater than 0".into(),
            ));
        }
        if draft.amount > MAX_AMOUNT {
            return Err(LedgerError::Validation(format!(
                "Amount cannot exceed {}",
                MAX_AMOUNT
            )));
        }
        let cat = self
            .category(draft.category_id)
            .ok_or(LedgerError::NotFound {
                entity: "Category",
                id: draft.category_id,
            })?;
        let savings = self.is_savings(cat.id);
        if let Some(goal) = draft.goal {
            if !savings {
                return Err(LedgerError::Validation(
                    "A goal can only be set on a savings operation".into(),
                ));
            }
            if goal <= Decimal::ZERO {
                return Err(LedgerError::Validation(
                    "Enter a valid goal greater than 0".into(),
                ));
            }
            self.ensure_registered()?;
        }
        // savings always leave the spendable balance
        let signed = match (savings, cat.kind) {
            (true, _) | (false, CategoryKind::Expense) => -draft.amount,
            (false, CategoryKind::Income) => draft.amount,
        };
        Ok((signed, cat.name.clone()))
    }

    fn ensure_registered(&self) -> Result<(), LedgerError> {
        if self.registered {
            Ok(())
        } else {
            Err(LedgerError::Validation(
                "Register a user before setting a goal".into(),
            ))
        }
    }

    fn apply_goal(&mut self, ccy: Currency, goal: Option<Decimal>) -> Result<()> {
        if let Some(g) = goal {
            let mut goals = self.goals;
            goals.set(ccy, g);
            self.store.update_goals(&goals)?;
            self.goals = goals;
            info!(currency = %ccy, goal = %g, "savings goal updated");
        }
        Ok(())
    }

    pub fn add_operation(&mut self, draft: OperationDraft) -> Result<Operation> {
        let (amount, category_name) = self.validate_operation(&draft)?;
        let op = Operation {
            id: self.next_operation_id,
            category_id: draft.category_id,
            category_name,
            description: draft.description.trim().to_string(),
            amount,
            currency: draft.currency,
            created_at: draft.created_at,
        };
        let balances = self.shifted(&[(op.currency, op.amount)])?;
        self.store.insert_operation(&op)?;
        self.next_operation_id += 1;
        self.apply_goal(op.currency, draft.goal)?;

        self.balances = balances;
        self.operations.push(op.clone());
        info!(id = op.id, amount = %op.amount, currency = %op.currency, "operation added");
        Ok(op)
    }

    pub fn update_operation(&mut self, id: i64, draft: OperationDraft) -> Result<Operation> {
        let (amount, category_name) = self.validate_operation(&draft)?;
        let idx = self
            .operations
            .iter()
            .position(|o| o.id == id)
            .ok_or(LedgerError::NotFound {
                entity: "Operation",
                id,
            })?;
        let updated = Operation {
            id,
            category_id: draft.category_id,
            category_name,
            description: draft.description.trim().to_string(),
            amount,
            currency: draft.currency,
            created_at: draft.created_at,
        };
        let old = &self.operations[idx];
        let balances = self.shifted(&[
            (old.currency, -old.amount),
            (updated.currency, updated.amount),
        ])?;
        self.store.update_operation(&updated)?;
        self.apply_goal(updated.currency, draft.goal)?;

        self.operations[idx] = updated.clone();
        self.balances = balances;
        info!(id, "operation updated");
        Ok(updated)
    }

    pub fn remove_operation(&mut self, id: i64) -> Result<Operation> {
        let idx = self
            .operations
            .iter()
            .position(|o| o.id == id)
            .ok_or(LedgerError::NotFound {
                entity: "Operation",
                id,
            })?;
        let old = &self.operations[idx];
        let balances = self.shifted(&[(old.currency, -old.amount)])?;
        self.store.delete_operation(id)?;
        let op = self.operations.remove(idx);
        self.balances = balances;
        info!(id, "operation removed");
        Ok(op)
    }

    /// Sets (or with zero clears) the savings goal for one currency.
    pub fn set_goal(&mut self, ccy: Currency, goal: Decimal) -> Result<()> {
        if goal < Decimal::ZERO {
            return Err(LedgerError::Validation("A goal cannot be negative".into()).into());
        }
        self.ensure_registered()?;
        self.apply_goal(ccy, Some(goal))
    }
}
