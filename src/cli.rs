// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

pub fn build_cli() -> Command {
    Command::new("fintrack")
        .about("Track income and expenses with a live balance")
        .version(clap::crate_version!())
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env("FINTRACK_DB")
                .help("Path to the SQLite database"),
        )
        .arg(
            Arg::new("log")
                .long("log")
                .global(true)
                .env("FINTRACK_LOG")
                .help("Log filter, e.g. fintrack=debug"),
        )
        .subcommand(
            Command::new("login")
                .about("Sign in as a user")
                .arg(Arg::new("user").required(true)),
        )
        .subcommand(Command::new("logout").about("Sign out"))
        .subcommand(Command::new("whoami").about("Show the signed-in user"))
        .subcommand(
            Command::new("add")
                .about("Record a transaction")
                .arg(
                    Arg::new("type")
                        .long("type")
                        .short('t')
                        .required(true)
                        .value_parser(["income", "expense"]),
                )
                .arg(Arg::new("amount").long("amount").short('a').required(true))
                .arg(
                    Arg::new("category")
                        .long("category")
                        .short('c')
                        .required(true),
                )
                .arg(Arg::new("description").long("description").short('d'))
                .arg(
                    Arg::new("date")
                        .long("date")
                        .help("YYYY-MM-DD, defaults to today"),
                ),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a transaction by id")
                .arg(Arg::new("id").required(true)),
        )
        .subcommand(json_args(
            Command::new("list")
                .about("List transactions")
                .arg(
                    Arg::new("type")
                        .long("type")
                        .default_value("all")
                        .value_parser(["all", "income", "expense"]),
                )
                .arg(
                    Arg::new("sort")
                        .long("sort")
                        .default_value("date")
                        .value_parser(["date", "amount"]),
                )
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(json_args(
            Command::new("dashboard")
                .about("Balance, totals and recent transactions")
                .arg(
                    Arg::new("recent")
                        .long("recent")
                        .default_value("5")
                        .value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(json_args(
            Command::new("analytics").about("Expenses by category and income vs expenses"),
        ))
}
