// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print JSON instead of a table")
}

fn currency_arg() -> Arg {
    Arg::new("currency")
        .long("currency")
        .short('c')
        .help("UAH, USD or EUR (defaults to the display currency)")
}

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_parser(value_parser!(i64))
}

fn category_fields(cmd: Command, required: bool) -> Command {
    cmd.arg(Arg::new("name").long("name").required(required))
        .arg(
            Arg::new("type")
                .long("type")
                .required(required)
                .value_parser(["income", "expense"]),
        )
        .arg(Arg::new("emoji").long("emoji"))
}

fn operation_fields(cmd: Command, required: bool) -> Command {
    cmd.arg(
        Arg::new("category")
            .long("category")
            .required(required)
            .value_parser(value_parser!(i64))
            .help("Category id"),
    )
    .arg(
        Arg::new("amount")
            .long("amount")
            .required(required)
            .help("Positive amount; the sign follows the category"),
    )
    .arg(currency_arg())
    .arg(Arg::new("description").long("description").short('d'))
    .arg(
        Arg::new("date")
            .long("date")
            .help("YYYY-MM-DD or 'YYYY-MM-DD HH:MM:SS' (defaults to now)"),
    )
    .arg(
        Arg::new("goal")
            .long("goal")
            .help("Savings goal for the operation currency (savings category only)"),
    )
}

pub fn build_cli() -> Command {
    Command::new("finkeep")
        .about("Single-user ledger with savings goals and monthly statistics")
        .version(clap::crate_version!())
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env("FINKEEP_DB")
                .help("Path to the sqlite database"),
        )
        .arg(
            Arg::new("password")
                .long("password")
                .global(true)
                .env("FINKEEP_PASSWORD")
                .hide_env_values(true)
                .help("Current password (prompted when omitted)"),
        )
        .subcommand(Command::new("init").about("Create the database and report the startup mode"))
        .subcommand(
            Command::new("register")
                .about("Register the user on first run")
                .arg(Arg::new("new").long("new").help("New password"))
                .arg(Arg::new("confirm").long("confirm")),
        )
        .subcommand(
            Command::new("passwd")
                .about("Change the password")
                .arg(Arg::new("new").long("new").help("New password"))
                .arg(Arg::new("confirm").long("confirm")),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(category_fields(Command::new("add"), true))
                .subcommand(
                    Command::new("list")
                        .about("Categories with totals in one currency")
                        .arg(currency_arg())
                        .arg(json_flag()),
                )
                .subcommand(category_fields(Command::new("edit").arg(id_arg()), false))
                .subcommand(
                    Command::new("rm")
                        .about("Delete a category and all its operations")
                        .arg(id_arg()),
                ),
        )
        .subcommand(
            Command::new("op")
                .about("Manage operations")
                .subcommand(operation_fields(Command::new("add"), true))
                .subcommand(
                    Command::new("list")
                        .arg(currency_arg())
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        )
                        .arg(json_flag()),
                )
                .subcommand(operation_fields(Command::new("edit").arg(id_arg()), false))
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("balance")
                .about("Balances in every currency")
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("summary")
                .about("Balance, this month's totals, last operation and goal")
                .arg(currency_arg())
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("goal")
                .about("Savings goals")
                .subcommand(
                    Command::new("set")
                        .arg(currency_arg())
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .help("Target amount, 0 clears the goal"),
                        ),
                )
                .subcommand(Command::new("show").arg(currency_arg()).arg(json_flag())),
        )
        .subcommand(
            Command::new("stats")
                .about("Monthly income and expense")
                .arg(currency_arg())
                .arg(
                    Arg::new("year")
                        .long("year")
                        .value_parser(value_parser!(i32)),
                )
                .arg(
                    Arg::new("month")
                        .long("month")
                        .value_parser(value_parser!(u32).range(1..=12)),
                )
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("currency")
                .about("Show or set the display currency")
                .arg(Arg::new("code").help("UAH, USD or EUR")),
        )
        .subcommand(Command::new("doctor").about("Check balances against the operation list"))
}
