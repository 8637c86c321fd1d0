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

fn percent_parser() -> clap::builder::RangedI64ValueParser<i64> {
    value_parser!(i64).range(0..=100)
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .short('m')
        .help("Month as YYYY-MM (defaults to the current month)")
}

fn amount_arg(name: &'static str) -> Arg {
    Arg::new(name).long(name).help("Whole rupiah, e.g. 1500000 or 1.500.000")
}

fn draft_args(cmd: Command, required: bool) -> Command {
    cmd.arg(
        Arg::new("type")
            .long("type")
            .short('t')
            .required(required)
            .help("income|expense"),
    )
    .arg(
        Arg::new("category")
            .long("category")
            .short('c')
            .required(required)
            .help("living|saving|playing|emergency for expenses; salary|bonus|thr|freelance|investment|saving|other for income"),
    )
    .arg(amount_arg("amount").short('a').required(required))
    .arg(
        Arg::new("date")
            .long("date")
            .short('d')
            .help("YYYY-MM-DD (defaults to today)"),
    )
    .arg(
        Arg::new("description")
            .long("description")
            .alias("desc")
            .help("Free text; the category label is shown when empty"),
    )
}

pub fn build_cli() -> Command {
    Command::new("keuangan")
        .version(clap::crate_version!())
        .about("Household budget tracker: allocation targets, health score, and spreadsheet sync")
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .help("Act as this user instead of the logged-in one"),
        )
        .subcommand(Command::new("init").about("Create the local cache"))
        .subcommand(
            Command::new("register")
                .about("Create an account on the backend")
                .arg(Arg::new("username").long("username").required(true))
                .arg(Arg::new("password").long("password").required(true))
                .arg(amount_arg("salary").required(true)),
        )
        .subcommand(
            Command::new("login")
                .about("Log in and pull budget and transactions into the cache")
                .arg(Arg::new("username").long("username").required(true))
                .arg(Arg::new("password").long("password")),
        )
        .subcommand(
            Command::new("logout").about("End the session").arg(
                Arg::new("purge")
                    .long("purge")
                    .action(ArgAction::SetTrue)
                    .help("Also drop this user's cached budget and transactions"),
            ),
        )
        .subcommand(Command::new("whoami").about("Show the session user"))
        .subcommand(
            Command::new("config")
                .about("Local settings")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set-api-url")
                        .arg(Arg::new("url").required(true).help("Backend deployment URL")),
                )
                .subcommand(Command::new("clear-api-url")),
        )
        .subcommand(
            Command::new("budget")
                .about("Salary and allocation across living/saving/playing/emergency")
                .subcommand(json_args(Command::new("show")))
                .subcommand(
                    Command::new("set-percent")
                        .about("Split the salary by percentages")
                        .arg(
                            Arg::new("living")
                                .long("living")
                                .required(true)
                                .value_parser(percent_parser()),
                        )
                        .arg(
                            Arg::new("saving")
                                .long("saving")
                                .required(true)
                                .value_parser(percent_parser()),
                        )
                        .arg(
                            Arg::new("playing")
                                .long("playing")
                                .required(true)
                                .value_parser(percent_parser()),
                        )
                        .arg(
                            Arg::new("emergency")
                                .long("emergency")
                                .value_parser(percent_parser())
                                .help("Defaults to 10"),
                        )
                        .arg(amount_arg("salary")),
                )
                .subcommand(
                    Command::new("set-amount")
                        .about("Pin exact amounts per category")
                        .arg(amount_arg("living").required(true))
                        .arg(amount_arg("saving").required(true))
                        .arg(amount_arg("playing").required(true))
                        .arg(amount_arg("emergency").required(true))
                        .arg(amount_arg("salary")),
                )
                .subcommand(
                    Command::new("salary")
                        .about("Change the salary; pinned amounts stay unchanged")
                        .arg(Arg::new("amount").required(true)),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Income and expense transactions")
                .subcommand(draft_args(Command::new("add"), true))
                .subcommand(
                    draft_args(Command::new("edit"), false)
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        ),
                )
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                )
                .subcommand(json_args(
                    Command::new("list")
                        .arg(month_arg())
                        .arg(Arg::new("type").long("type").short('t'))
                        .arg(Arg::new("category").long("category").short('c'))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(json_args(Command::new("recent").about("Last five recorded")))
                .subcommand(
                    Command::new("salary")
                        .about("Record this month's salary unless already recorded")
                        .arg(month_arg()),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Dashboards and analysis")
                .subcommand(json_args(Command::new("dashboard").arg(month_arg())))
                .subcommand(json_args(
                    Command::new("health")
                        .about("Health score, category analysis, suggestions and tips")
                        .arg(month_arg()),
                ))
                .subcommand(json_args(
                    Command::new("trend")
                        .arg(month_arg())
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .value_parser(value_parser!(usize))
                                .default_value("6"),
                        ),
                ))
                .subcommand(json_args(
                    Command::new("savings").about("Monthly balances and accumulated savings"),
                ))
                .subcommand(json_args(
                    Command::new("breakdown")
                        .about("Expenses per category")
                        .arg(month_arg()),
                )),
        )
        .subcommand(
            Command::new("export")
                .about("Write transactions or a full backup to a file")
                .subcommand(
                    Command::new("csv")
                        .arg(month_arg())
                        .arg(Arg::new("out").long("out").required(true)),
                )
                .subcommand(Command::new("backup").arg(Arg::new("out").long("out").required(true))),
        )
        .subcommand(
            Command::new("import")
                .about("Load transactions or a full backup from a file")
                .subcommand(Command::new("csv").arg(Arg::new("path").long("path").required(true)))
                .subcommand(
                    Command::new("backup").arg(Arg::new("path").long("path").required(true)),
                ),
        )
        .subcommand(
            Command::new("sync")
                .about("Cloud synchronisation")
                .subcommand(Command::new("pull").about("Replace the cache with the backend copy")),
        )
        .subcommand(Command::new("doctor").about("Check budget and transactions for problems"))
        .subcommand(
            Command::new("reset")
                .about("Reset the budget to the default split and delete all transactions")
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .action(ArgAction::SetTrue)
                        .help("Confirm the deletion"),
                ),
        )
}
