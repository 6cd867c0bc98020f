// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::NaiveDate;
use finkeep::auth::Auth;
use finkeep::commands::{self, reports::balance_rows, reports::summary_for};
use finkeep::credentials::KdfParams;
use finkeep::db::{self, SqliteStore};
use finkeep::error::{AuthError, LedgerError};
use finkeep::ledger::{GoalProgress, Ledger};
use finkeep::models::Currency;
use finkeep::store::Store;
use finkeep::utils::get_display_currency;
use rusqlite::Connection;
use rust_decimal::Decimal;

const PW: &str = "abc123";

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let store = SqliteStore::new(&conn);
    Auth::with_kdf(
        &store,
        KdfParams {
            memory_kib: 64,
            iterations: 1,
            lanes: 1,
        },
    )
    .register(PW, PW)
    .unwrap();
    conn
}

fn run(store: &dyn Store, args: &[&str]) -> Result<()> {
    let m = finkeep::cli::build_cli()
        .try_get_matches_from(std::iter::once("finkeep").chain(args.iter().copied()))?;
    match m.subcommand() {
        Some(("category", sub)) => commands::categories::handle(store, sub),
        Some(("op", sub)) => commands::operations::handle(store, sub),
        Some(("balance", sub)) => commands::reports::balances(store, sub),
        Some(("summary", sub)) => commands::reports::summary(store, sub),
        Some(("stats", sub)) => commands::reports::stats(store, sub),
        Some(("goal", sub)) => commands::goals::handle(store, sub),
        Some(("currency", sub)) => commands::settings::handle(store, sub),
        Some(("doctor", sub)) => commands::doctor::handle(store, sub),
        Some(("register", sub)) => commands::account::register(store, sub),
        other => panic!("unexpected subcommand {:?}", other.map(|(n, _)| n)),
    }
}

fn count(conn: &Connection, sql: &str) -> i64 {
    conn.query_row(sql, [], |r| r.get(0)).unwrap()
}

#[test]
fn wrong_password_blocks_ledger_access() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let err = run(&store, &["balance", "--password", "nope12"]).unwrap_err();
    assert_eq!(
        err.downcast_ref::<AuthError>(),
        Some(&AuthError::WrongPassword)
    );
}

#[test]
fn second_register_is_refused() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let err = run(
        &store,
        &["register", "--new", "xyz789", "--confirm", "xyz789"],
    )
    .unwrap_err();
    assert_eq!(
        err.downcast_ref::<AuthError>(),
        Some(&AuthError::AlreadyRegistered)
    );
}

#[test]
fn operations_through_the_cli() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    run(
        &store,
        &[
            "op", "add", "--password", PW, "--category", "1", "--amount", "1000", "-c", "usd",
            "--date", "2025-04-01",
        ],
    )
    .unwrap();
    run(
        &store,
        &[
            "op", "add", "--password", PW, "--category", "3", "--amount", "12,50", "-c", "USD",
            "-d", "lunch", "--date", "2025-04-02 13:15:00",
        ],
    )
    .unwrap();
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM operations"), 2);
    let amount: String = conn
        .query_row("SELECT amount FROM operations WHERE id=2", [], |r| r.get(0))
        .unwrap();
    assert_eq!(amount.parse::<Decimal>().unwrap(), Decimal::new(-1250, 2));

    // only the amount changes, everything else is kept
    run(
        &store,
        &["op", "edit", "--password", PW, "--id", "2", "--amount", "20"],
    )
    .unwrap();
    let ledger = Ledger::load(&store).unwrap();
    let op = ledger.operation(2).unwrap();
    assert_eq!(op.amount, Decimal::from(-20));
    assert_eq!(op.description, "lunch");
    assert_eq!(op.currency, Currency::Usd);
    assert_eq!(ledger.balance(Currency::Usd), Decimal::from(980));

    run(&store, &["op", "rm", "--password", PW, "--id", "2"]).unwrap();
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM operations"), 1);

    run(&store, &["op", "list", "--password", PW, "-c", "USD", "--json"]).unwrap();
    run(&store, &["balance", "--password", PW]).unwrap();
    run(&store, &["stats", "--password", PW, "-c", "USD", "--year", "2025"]).unwrap();
}

#[test]
fn invalid_input_is_rejected() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let err = run(
        &store,
        &["op", "add", "--password", PW, "--category", "3", "--amount", "0"],
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::Validation(_))
    ));
    let err = run(
        &store,
        &["op", "add", "--password", PW, "--category", "99", "--amount", "5"],
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::NotFound { .. })
    ));
    assert!(run(
        &store,
        &["op", "add", "--password", PW, "--category", "3", "--amount", "abc"],
    )
    .is_err());
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM operations"), 0);
}

#[test]
fn categories_through_the_cli() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    run(
        &store,
        &["category", "add", "--password", PW, "--name", "Rent", "--type", "expense"],
    )
    .unwrap();
    let (id, emoji): (i64, String) = conn
        .query_row(
            "SELECT id, emoji FROM categories WHERE name='Rent'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(id, 7);
    assert_eq!(emoji, "🛜");

    run(
        &store,
        &["category", "edit", "--password", PW, "--id", "7", "--emoji", "🏠"],
    )
    .unwrap();
    let ledger = Ledger::load(&store).unwrap();
    let rent = ledger.category(7).unwrap();
    assert_eq!(rent.name, "Rent");
    assert_eq!(rent.emoji, "🏠");

    let err = run(&store, &["category", "rm", "--password", PW, "--id", "6"]).unwrap_err();
    assert_eq!(
        err.downcast_ref::<LedgerError>(),
        Some(&LedgerError::ProtectedCategory)
    );
    run(&store, &["category", "rm", "--password", PW, "--id", "7"]).unwrap();
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM categories"), 6);
    run(&store, &["category", "list", "--password", PW]).unwrap();
}

#[test]
fn goals_and_display_currency() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    assert_eq!(get_display_currency(&store).unwrap(), Currency::Uah);
    run(&store, &["currency", "eur"]).unwrap();
    assert_eq!(get_display_currency(&store).unwrap(), Currency::Eur);
    assert!(run(&store, &["currency", "GBP"]).is_err());

    // goal and operation default to the display currency
    run(&store, &["goal", "set", "--password", PW, "--amount", "200"]).unwrap();
    run(
        &store,
        &["op", "add", "--password", PW, "--category", "6", "--amount", "50"],
    )
    .unwrap();
    let ledger = Ledger::load(&store).unwrap();
    assert_eq!(ledger.goals().eur, Decimal::from(200));
    assert_eq!(
        ledger.goal_progress(Currency::Eur),
        GoalProgress::Progress {
            saved: Decimal::from(50),
            goal: Decimal::from(200),
            percent: Decimal::from(25),
        }
    );
    assert!(run(&store, &["goal", "set", "--password", PW, "--amount=-1"]).is_err());
    run(&store, &["goal", "show", "--password", PW, "--json"]).unwrap();
    run(&store, &["summary", "--password", PW]).unwrap();
}

#[test]
fn summary_covers_the_current_month_only() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    for args in [
        ["--category", "1", "--amount", "500", "--date", "2025-05-03"],
        ["--category", "3", "--amount", "80", "--date", "2025-05-04"],
        ["--category", "6", "--amount", "100", "--date", "2025-05-05"],
        ["--category", "4", "--amount", "30", "--date", "2025-04-28"],
    ] {
        let mut full = vec!["op", "add", "--password", PW, "-c", "UAH"];
        full.extend(args);
        run(&store, &full).unwrap();
    }
    let ledger = Ledger::load(&store).unwrap();
    let s = summary_for(
        &ledger,
        Currency::Uah,
        NaiveDate::from_ymd_opt(2025, 5, 20).unwrap(),
    );
    assert_eq!(s.balance, Decimal::from(290));
    assert_eq!(s.month.label, "05.2025");
    assert_eq!(s.month.income, Decimal::from(500));
    assert_eq!(s.month.expense, Decimal::from(80));
    assert_eq!(s.month.count, 2);
    assert_eq!(s.last.unwrap().category_id, 6);
    assert_eq!(
        s.goal,
        GoalProgress::Accumulated {
            saved: Decimal::from(100)
        }
    );
}

#[test]
fn doctor_reports_orphans() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    run(
        &store,
        &["op", "add", "--password", PW, "--category", "3", "--amount", "5"],
    )
    .unwrap();
    let mut ledger = Ledger::load(&store).unwrap();
    assert!(commands::doctor::check(&mut ledger).unwrap().is_empty());

    conn.execute("UPDATE operations SET category_id=42", []).unwrap();
    let mut ledger = Ledger::load(&store).unwrap();
    let rows = commands::doctor::check(&mut ledger).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "orphan_operation");
    run(&store, &["doctor", "--password", PW]).unwrap();
}

#[test]
fn data_survives_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("finkeep.sqlite");
    {
        let conn = db::open_at(&path).unwrap();
        let store = SqliteStore::new(&conn);
        Auth::with_kdf(
            &store,
            KdfParams {
                memory_kib: 64,
                iterations: 1,
                lanes: 1,
            },
        )
        .register(PW, PW)
        .unwrap();
        run(
            &store,
            &["op", "add", "--password", PW, "--category", "2", "--amount", "75", "-c", "EUR"],
        )
        .unwrap();
    }
    let conn = db::open_at(&path).unwrap();
    let store = SqliteStore::new(&conn);
    let ledger = Ledger::load(&store).unwrap();
    assert_eq!(ledger.categories().len(), 6);
    assert_eq!(ledger.balance(Currency::Eur), Decimal::from(75));
    assert!(Auth::new(&store).login(PW).is_ok());
}

#[test]
fn balance_json_is_typed() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    run(
        &store,
        &["op", "add", "--password", PW, "--category", "1", "--amount", "40", "-c", "USD"],
    )
    .unwrap();
    let ledger = Ledger::load(&store).unwrap();
    let json = serde_json::to_value(balance_rows(&ledger)).unwrap();
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    let usd = rows
        .iter()
        .find(|r| r["currency"] == "USD")
        .unwrap();
    assert_eq!(usd["balance"].as_str().unwrap().parse::<Decimal>().unwrap(), Decimal::from(40));
    run(&store, &["balance", "--password", PW, "--json"]).unwrap();
}
