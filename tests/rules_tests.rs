// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, params};
use sterling::{cli, commands::rules, db};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute("INSERT INTO categories(name) VALUES('Shopping')", [])
        .unwrap();
    conn
}

#[test]
fn rule_applies_regex_and_rewrite() {
    let conn = setup();
    let cat_id: i64 = conn
        .query_row("SELECT id FROM categories WHERE name='Shopping'", [], |r| {
            r.get(0)
        })
        .unwrap();
    conn.execute(
        "INSERT INTO rules(pattern, category_id, description_rewrite) VALUES('(?i)amazon|amzn', ?1, 'Amazon')",
        params![cat_id],
    )
    .unwrap();

    let (c, r) = sterling::utils::apply_rules(&conn, "AMZN Mktp UK*AB123").unwrap();
    assert_eq!(c, Some(cat_id));
    assert_eq!(r, Some(String::from("Amazon")));
}

#[test]
fn newest_matching_rule_wins() {
    let conn = setup();
    conn.execute(
        "INSERT INTO rules(pattern, description_rewrite) VALUES('(?i)shop', 'Old Name')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO rules(pattern, description_rewrite) VALUES('(?i)shop', 'New Name')",
        [],
    )
    .unwrap();

    let (_c, r) = sterling::utils::apply_rules(&conn, "Corner Shop").unwrap();
    assert_eq!(r, Some(String::from("New Name")));
}

#[test]
fn rules_add_rejects_invalid_regex() {
    let conn = setup();
    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "sterling",
        "rules",
        "add",
        "--pattern",
        " (?P< ",
        "--category",
        " Shopping ",
    ]);

    if let Some(("rules", rules_m)) = matches.subcommand() {
        let err = rules::handle(&conn, rules_m).unwrap_err();
        assert!(err.to_string().contains("Invalid regex pattern"));
    } else {
        panic!("rules command not parsed");
    }
}

#[test]
fn rules_rm_trims_id_argument() {
    let conn = setup();
    conn.execute("INSERT INTO rules(pattern) VALUES('foo')", [])
        .unwrap();

    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["sterling", "rules", "rm", "--id", " 1 "]);

    if let Some(("rules", rules_m)) = matches.subcommand() {
        rules::handle(&conn, rules_m).unwrap();
    } else {
        panic!("rules command not parsed");
    }

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM rules", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
}
