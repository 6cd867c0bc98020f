// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;

use crate::models::Currency;
use crate::store::Store;

pub const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Accepts a full `YYYY-MM-DD HH:MM:SS` timestamp or a bare date (midnight).
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    if let Ok(ts) = NaiveDateTime::parse_from_str(s, TS_FORMAT) {
        return Ok(ts);
    }
    let d = parse_date(s)
        .with_context(|| format!("Invalid timestamp '{}', expected YYYY-MM-DD HH:MM:SS", s))?;
    d.and_hms_opt(0, 0, 0)
        .with_context(|| format!("Invalid timestamp '{}'", s))
}

/// Parses a user-entered amount; a comma is accepted as decimal separator.
pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .replace(',', ".")
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn fmt_money(d: &Decimal, ccy: Currency) -> String {
    format!("{} {}", ccy, d.round_dp(2).normalize())
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(json_flag: bool, v: &T) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    Ok(false)
}

// Display currency setting
pub const DISPLAY_CURRENCY_KEY: &str = "display_currency";

pub fn get_display_currency(store: &dyn Store) -> Result<Currency> {
    match store.get_setting(DISPLAY_CURRENCY_KEY)? {
        Some(v) => v
            .parse::<Currency>()
            .with_context(|| format!("Invalid stored display currency '{}'", v)),
        None => Ok(Currency::Uah),
    }
}

pub fn set_display_currency(store: &dyn Store, ccy: Currency) -> Result<()> {
    store.set_setting(DISPLAY_CURRENCY_KEY, ccy.code())
}

/// Explicit `--currency` wins over the stored display currency.
pub fn resolve_currency(store: &dyn Store, flag: Option<&String>) -> Result<Currency> {
    match flag {
        Some(s) => Ok(s.parse::<Currency>()?),
        None => get_display_currency(store),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_accepts_comma() {
        assert_eq!(parse_decimal(" 12,50 ").unwrap(), Decimal::new(1250, 2));
        assert!(parse_decimal("abc").is_err());
    }

    #[test]
    fn datetime_accepts_bare_date() {
        let ts = parse_datetime("2025-03-04").unwrap();
        assert_eq!(ts.format(TS_FORMAT).to_string(), "2025-03-04 00:00:00");
        let ts = parse_datetime("2025-03-04 10:11:12").unwrap();
        assert_eq!(ts.format(TS_FORMAT).to_string(), "2025-03-04 10:11:12");
        assert!(parse_datetime("04.03.2025").is_err());
    }

    #[test]
    fn money_is_rounded() {
        assert_eq!(fmt_money(&Decimal::new(12346, 3), Currency::Usd), "USD 12.35");
        assert_eq!(fmt_money(&Decimal::new(1000, 1), Currency::Uah), "UAH 100");
    }
}
