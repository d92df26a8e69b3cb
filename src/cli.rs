// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{crate_version, value_parser, Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Emit pretty JSON instead of a table"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Emit one JSON object per line"),
    )
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Record and inspect transactions")
        .subcommand(
            Command::new("add")
                .about("Record a transaction")
                .arg(Arg::new("date").long("date").required(true).help("YYYY-MM-DD"))
                .arg(
                    Arg::new("amount")
                        .long("amount")
                        .required(true)
                        .allow_hyphen_values(true)
                        .help("Signed decimal in GBP, outflow negative"),
                )
                .arg(
                    Arg::new("description")
                        .long("description")
                        .required(true),
                )
                .arg(Arg::new("category").long("category"))
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .help("income|expense; inferred from the amount's sign when omitted"),
                ),
        )
        .subcommand(json_flags(
            Command::new("list")
                .about("List transactions")
                .arg(Arg::new("month").long("month").help("YYYY-MM"))
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("kind").long("kind").help("income|expense"))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(
            Command::new("rm")
                .about("Delete one transaction")
                .arg(Arg::new("id").long("id").required(true)),
        )
        .subcommand(
            Command::new("purge")
                .about("Bulk-delete a month of transactions")
                .arg(Arg::new("month").long("month").required(true).help("YYYY-MM"))
                .arg(Arg::new("category").long("category")),
        )
}

fn category_cmd() -> Command {
    Command::new("category")
        .about("Manage categories")
        .subcommand(
            Command::new("add")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("color").long("color").help("Display color, #rrggbb")),
        )
        .subcommand(Command::new("list"))
        .subcommand(Command::new("rm").arg(Arg::new("name").long("name").required(true)))
}

fn holding_cmd() -> Command {
    Command::new("holding")
        .about("Manage portfolio holdings")
        .subcommand(
            Command::new("add")
                .arg(Arg::new("ticker").long("ticker").required(true))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .required(true)
                        .help("stock|etf|bond|crypto|high-yield-savings|cash"),
                )
                .arg(
                    Arg::new("invested")
                        .long("invested")
                        .help("Total invested to date, GBP"),
                ),
        )
        .subcommand(json_flags(Command::new("list")))
        .subcommand(
            Command::new("rm")
                .about("Remove a holding; linked transactions are detached, not deleted")
                .arg(Arg::new("ticker").long("ticker").required(true)),
        )
        .subcommand(
            Command::new("link")
                .about("Tag a transaction as flow into a holding")
                .arg(Arg::new("ticker").long("ticker").required(true))
                .arg(
                    Arg::new("tx")
                        .long("tx")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                ),
        )
        .subcommand(
            Command::new("unlink")
                .arg(
                    Arg::new("tx")
                        .long("tx")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                ),
        )
}

fn report_cmd() -> Command {
    Command::new("report")
        .about("Derived views over the ledger")
        .subcommand(json_flags(
            Command::new("monthly")
                .about("Trailing monthly income/expense buckets")
                .arg(
                    Arg::new("months")
                        .long("months")
                        .value_parser(value_parser!(u32)),
                ),
        ))
        .subcommand(json_flags(
            Command::new("summary").about("Savings, investments, and month-over-month figures"),
        ))
        .subcommand(json_flags(
            Command::new("allocation").about("Portfolio allocation by investment type"),
        ))
        .subcommand(json_flags(
            Command::new("spend-by-category")
                .arg(Arg::new("month").long("month").required(true).help("YYYY-MM")),
        ))
}

fn import_cmd() -> Command {
    Command::new("import").about("Import data").subcommand(
        Command::new("transactions")
            .about("Import a transaction CSV (date,description,amount,category)")
            .arg(Arg::new("path").long("path").required(true)),
    )
}

fn export_cmd() -> Command {
    Command::new("export").about("Export data").subcommand(
        Command::new("transactions")
            .arg(
                Arg::new("format")
                    .long("format")
                    .required(true)
                    .help("csv|json"),
            )
            .arg(Arg::new("out").long("out").required(true)),
    )
}

fn rules_cmd() -> Command {
    Command::new("rules")
        .about("Description-matching rules applied at import and add time")
        .subcommand(
            Command::new("add")
                .arg(Arg::new("pattern").long("pattern").required(true).help("Regex"))
                .arg(Arg::new("category").long("category"))
                .arg(
                    Arg::new("rewrite")
                        .long("rewrite")
                        .help("Replacement description"),
                ),
        )
        .subcommand(Command::new("list"))
        .subcommand(Command::new("rm").arg(Arg::new("id").long("id").required(true)))
}

pub fn build_cli() -> Command {
    Command::new("sterling")
        .version(crate_version!())
        .about("Personal finance tracking, monthly cashflow, and portfolio allocation")
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(tx_cmd())
        .subcommand(category_cmd())
        .subcommand(holding_cmd())
        .subcommand(report_cmd())
        .subcommand(import_cmd())
        .subcommand(export_cmd())
        .subcommand(rules_cmd())
        .subcommand(Command::new("doctor").about("Check ledger integrity"))
}
