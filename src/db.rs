// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::credentials::KdfParams;
use crate::error::AuthError;
use crate::models::{Category, CategoryKind, Currency, Goals, Operation, User};
use crate::store::Store;
use crate::utils::{TS_FORMAT, parse_datetime, parse_decimal};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Finkeep", "finkeep"));

pub const DB_ENV: &str = "FINKEEP_DB";

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_ENV) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("finkeep.sqlite"))
}

pub fn open_at(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).context("Failed to create data dir")?;
    }
    let conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS users(
        id INTEGER PRIMARY KEY,
        login TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        salt TEXT NOT NULL,
        kdf_memory_kib INTEGER NOT NULL,
        kdf_iterations INTEGER NOT NULL,
        kdf_lanes INTEGER NOT NULL,
        goal_uah TEXT NOT NULL DEFAULT '0',
        goal_usd TEXT NOT NULL DEFAULT '0',
        goal_eur TEXT NOT NULL DEFAULT '0'
    );

    -- ids are assigned by the application, not by sqlite
    CREATE TABLE IF NOT EXISTS categories(
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('income','expense')),
        emoji TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS operations(
        id INTEGER PRIMARY KEY,
        category_id INTEGER NOT NULL,
        category_name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        amount TEXT NOT NULL,
        currency TEXT NOT NULL CHECK(currency IN ('UAH','USD','EUR')),
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_operations_category ON operations(category_id);
    "#,
    )?;
    Ok(())
}

#[derive(Debug, Clone, Copy)]
pub struct SqliteStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

fn parse_goal(s: &str, ccy: &str) -> Result<rust_decimal::Decimal> {
    parse_decimal(s).with_context(|| format!("Invalid {} goal in users table", ccy))
}

impl Store for SqliteStore<'_> {
    fn load_user(&self) -> Result<Option<User>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, login, password_hash, salt, kdf_memory_kib, kdf_iterations, kdf_lanes,
                        goal_uah, goal_usd, goal_eur
                 FROM users ORDER BY id LIMIT 1",
                [],
                |r| {
                    Ok((
                        r.get::<_, i64>(0)?,
                        r.get::<_, String>(1)?,
                        r.get::<_, String>(2)?,
                        r.get::<_, String>(3)?,
                        (r.get::<_, u32>(4)?, r.get::<_, u32>(5)?, r.get::<_, u32>(6)?),
                        (
                            r.get::<_, String>(7)?,
                            r.get::<_, String>(8)?,
                            r.get::<_, String>(9)?,
                        ),
                    ))
                },
            )
            .optional()?;
        let Some((id, login, password_hash, salt, (m, t, p), (uah, usd, eur))) = row else {
            return Ok(None);
        };
        Ok(Some(User {
            id,
            login,
            password_hash,
            salt,
            kdf: KdfParams {
                memory_kib: m,
                iterations: t,
                lanes: p,
            },
            goals: Goals {
                uah: parse_goal(&uah, "UAH")?,
                usd: parse_goal(&usd, "USD")?,
                eur: parse_goal(&eur, "EUR")?,
            },
        }))
    }

    fn insert_user(&self, user: &User) -> Result<()> {
        debug!(id = user.id, "insert user");
        self.conn.execute(
            "INSERT INTO users(id, login, password_hash, salt, kdf_memory_kib, kdf_iterations, kdf_lanes,
                               goal_uah, goal_usd, goal_eur)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                user.id,
                user.login,
                user.password_hash,
                user.salt,
                user.kdf.memory_kib,
                user.kdf.iterations,
                user.kdf.lanes,
                user.goals.uah.to_string(),
                user.goals.usd.to_string(),
                user.goals.eur.to_string(),
            ],
        )?;
        Ok(())
    }

    fn update_credentials(&self, user: &User) -> Result<()> {
        debug!(id = user.id, "update credentials");
        self.conn.execute(
            "UPDATE users SET login=?2, password_hash=?3, salt=?4,
                    kdf_memory_kib=?5, kdf_iterations=?6, kdf_lanes=?7
             WHERE id=?1",
            params![
                user.id,
                user.login,
                user.password_hash,
                user.salt,
                user.kdf.memory_kib,
                user.kdf.iterations,
                user.kdf.lanes,
            ],
        )?;
        Ok(())
    }

    fn update_goals(&self, goals: &Goals) -> Result<()> {
        debug!("update goals");
        // same row `load_user` reads
        let n = self.conn.execute(
            "UPDATE users SET goal_uah=?1, goal_usd=?2, goal_eur=?3
             WHERE id=(SELECT id FROM users ORDER BY id LIMIT 1)",
            params![
                goals.uah.to_string(),
                goals.usd.to_string(),
                goals.eur.to_string()
            ],
        )?;
        if n == 0 {
            return Err(AuthError::NoUser).context("Cannot store goals");
        }
        Ok(())
    }

    fn load_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, kind, emoji FROM categories ORDER BY id")?;
        let rows = stmt.query_map([], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, String>(3)?,
            ))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (id, name, kind, emoji) = row?;
            let kind = kind
                .parse::<CategoryKind>()
                .with_context(|| format!("Invalid kind '{}' for category #{}", kind, id))?;
            out.push(Category {
                id,
                name,
                kind,
                emoji,
            });
        }
        Ok(out)
    }

    fn insert_category(&self, cat: &Category) -> Result<()> {
        debug!(id = cat.id, name = %cat.name, "insert category");
        self.conn.execute(
            "INSERT INTO categories(id, name, kind, emoji) VALUES (?1, ?2, ?3, ?4)",
            params![cat.id, cat.name, cat.kind.as_str(), cat.emoji],
        )?;
        Ok(())
    }

    fn update_category(&self, cat: &Category) -> Result<()> {
        debug!(id = cat.id, "update category");
        self.conn.execute(
            "UPDATE categories SET name=?2, kind=?3, emoji=?4 WHERE id=?1",
            params![cat.id, cat.name, cat.kind.as_str(), cat.emoji],
        )?;
        Ok(())
    }

    fn delete_category(&self, id: i64) -> Result<()> {
        debug!(id, "delete category");
        self.conn
            .execute("DELETE FROM categories WHERE id=?1", params![id])?;
        Ok(())
    }

    fn load_operations(&self) -> Result<Vec<Operation>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, category_id, category_name, description, amount, currency, created_at
             FROM operations ORDER BY id",
        )?;
        let mut cur = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(r) = cur.next()? {
            let id: i64 = r.get(0)?;
            let amount: String = r.get(4)?;
            let currency: String = r.get(5)?;
            let created_at: String = r.get(6)?;
            out.push(Operation {
                id,
                category_id: r.get(1)?,
                category_name: r.get(2)?,
                description: r.get(3)?,
                amount: parse_decimal(&amount)
                    .with_context(|| format!("Invalid amount in operation #{}", id))?,
                currency: currency
                    .parse::<Currency>()
                    .with_context(|| format!("Invalid currency in operation #{}", id))?,
                created_at: parse_datetime(&created_at)
                    .with_context(|| format!("Invalid timestamp in operation #{}", id))?,
            });
        }
        Ok(out)
    }

    fn insert_operation(&self, op: &Operation) -> Result<()> {
        debug!(id = op.id, category_id = op.category_id, "insert operation");
        self.conn.execute(
            "INSERT INTO operations(id, category_id, category_name, description, amount, currency, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                op.id,
                op.category_id,
                op.category_name,
                op.description,
                op.amount.to_string(),
                op.currency.code(),
                op.created_at.format(TS_FORMAT).to_string(),
            ],
        )?;
        Ok(())
    }

    fn update_operation(&self, op: &Operation) -> Result<()> {
        debug!(id = op.id, "update operation");
        self.conn.execute(
            "UPDATE operations SET category_id=?2, category_name=?3, description=?4,
                    amount=?5, currency=?6, created_at=?7
             WHERE id=?1",
            params![
                op.id,
                op.category_id,
                op.category_name,
                op.description,
                op.amount.to_string(),
                op.currency.code(),
                op.created_at.format(TS_FORMAT).to_string(),
            ],
        )?;
        Ok(())
    }

    fn delete_operation(&self, id: i64) -> Result<()> {
        debug!(id, "delete operation");
        self.conn
            .execute("DELETE FROM operations WHERE id=?1", params![id])?;
        Ok(())
    }

    fn delete_operations_by_category(&self, category_id: i64) -> Result<usize> {
        debug!(category_id, "delete operations by category");
        let n = self.conn.execute(
            "DELETE FROM operations WHERE category_id=?1",
            params![category_id],
        )?;
        Ok(n)
    }

    fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let v: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key=?1",
                params![key],
                |r| r.get(0),
            )
            .optional()?;
        Ok(v)
    }

    fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO settings(key, value) VALUES(?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}
