// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{BACKEND_ENV, Backend, DATA_DIR_ENV};
use clap::{Arg, ArgAction, ArgGroup, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
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

fn list_filters(cmd: Command) -> Command {
    json_flags(
        cmd.arg(Arg::new("account").long("account").help("Only this account"))
            .arg(
                Arg::new("limit")
                    .long("limit")
                    .value_parser(value_parser!(usize)),
            ),
    )
}

pub fn build_cli() -> Command {
    Command::new("coinpurse")
        .about("Local personal finance tracker")
        .version(clap::crate_version!())
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .env(DATA_DIR_ENV)
                .global(true)
                .help("Directory holding the data files"),
        )
        .arg(
            Arg::new("backend")
                .long("backend")
                .env(BACKEND_ENV)
                .global(true)
                .value_parser(value_parser!(Backend))
                .ignore_case(true)
                .help("Storage backend (default: json)"),
        )
        .subcommand(Command::new("init").about("Create the data files with defaults"))
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").help("Defaults to 'New account'")),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("name")
                            .required(true)
                            .num_args(1..)
                            .help("One or more account names"),
                    ),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Rename an account or overwrite its balance")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("rename").long("name"))
                        .arg(Arg::new("balance").long("balance").allow_hyphen_values(true))
                        .group(
                            ArgGroup::new("changes")
                                .args(["rename", "balance"])
                                .multiple(true)
                                .required(true),
                        ),
                )
                .subcommand(
                    Command::new("include")
                        .about("Count the account in analytics")
                        .arg(Arg::new("name").required(true)),
                )
                .subcommand(
                    Command::new("exclude")
                        .about("Leave the account out of analytics")
                        .arg(Arg::new("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("expense")
                .about("Record and list expenses")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("account").long("account").required(true))
                        .arg(Arg::new("description").long("desc").default_value(""))
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .help("YYYY-MM-DD [HH:MM]; defaults to now"),
                        ),
                )
                .subcommand(list_filters(
                    Command::new("list")
                        .arg(Arg::new("category").long("category").help("Only this category")),
                ))
                .subcommand(Command::new("rm").arg(Arg::new("id").required(true))),
        )
        .subcommand(
            Command::new("income")
                .about("Record and list incomes")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("account").long("account").required(true))
                        .arg(Arg::new("description").long("desc").default_value(""))
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .help("YYYY-MM-DD [HH:MM]; defaults to now"),
                        ),
                )
                .subcommand(list_filters(Command::new("list")))
                .subcommand(Command::new("rm").arg(Arg::new("id").required(true))),
        )
        .subcommand(
            Command::new("category")
                .about("Manage expense categories")
                .subcommand(Command::new("add").arg(Arg::new("name").required(true)))
                .subcommand(json_flags(Command::new("list")))
                .subcommand(Command::new("rm").arg(Arg::new("name").required(true)))
                .subcommand(
                    Command::new("move")
                        .arg(Arg::new("name").required(true))
                        .arg(
                            Arg::new("to")
                                .long("to")
                                .required(true)
                                .value_parser(value_parser!(usize))
                                .help("1-based target position"),
                        ),
                )
                .subcommand(
                    Command::new("rename")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("new_name").required(true)),
                )
                .subcommand(
                    Command::new("color")
                        .about("Show or set a category color")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("hex").help("#RRGGBB")),
                ),
        )
        .subcommand(
            Command::new("analytics")
                .about("Spending breakdown and balances")
                .subcommand(json_flags(
                    Command::new("breakdown")
                        .arg(Arg::new("account").long("account"))
                        .arg(
                            Arg::new("all")
                                .long("all")
                                .action(ArgAction::SetTrue)
                                .help("All accounts included in analytics"),
                        )
                        .group(
                            ArgGroup::new("scope")
                                .args(["account", "all"])
                                .required(true),
                        )
                        .arg(
                            Arg::new("from")
                                .long("from")
                                .help("YYYY-MM-DD; defaults to one month ago"),
                        )
                        .arg(Arg::new("to").long("to").help("YYYY-MM-DD; defaults to today")),
                ))
                .subcommand(json_flags(Command::new("balance"))),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv|json"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
}
