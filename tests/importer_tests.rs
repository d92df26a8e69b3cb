// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use std::io::Write;
use sterling::{cli, commands::importer, db};
use tempfile::NamedTempFile;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn run_import(conn: &mut Connection, path: &str) -> anyhow::Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["sterling", "import", "transactions", "--path", path]);
    if let Some(("import", import_m)) = matches.subcommand() {
        importer::handle(conn, import_m)
    } else {
        panic!("no import subcommand");
    }
}

#[test]
fn importer_infers_kind_from_amount_sign() {
    let mut conn = setup();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "date,description,amount,category\n2025-02-01,Salary,2000,\n2025-02-03,Corner Shop,-12.34,"
    )
    .unwrap();
    file.flush().unwrap();

    run_import(&mut conn, file.path().to_str().unwrap()).unwrap();

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 2);
    let income: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM transactions WHERE kind='income'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(income, 1);
}

#[test]
fn importer_trims_cli_path_argument() {
    let mut conn = setup();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,description,amount,category\n2025-02-03,Shop,-5.00,").unwrap();
    file.flush().unwrap();

    let padded = format!("  {}  ", file.path().to_str().unwrap());
    run_import(&mut conn, &padded).unwrap();

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn importer_applies_rules_when_uncategorized() {
    let mut conn = setup();
    conn.execute("INSERT INTO categories(name) VALUES('Shopping')", [])
        .unwrap();
    let cat_id: i64 = conn
        .query_row("SELECT id FROM categories WHERE name='Shopping'", [], |r| {
            r.get(0)
        })
        .unwrap();
    conn.execute(
        "INSERT INTO rules(pattern, category_id, description_rewrite) VALUES('(?i)original', ?1, 'Updated Store')",
        [cat_id],
    )
    .unwrap();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "date,description,amount,category\n2025-02-03,Original Shop,-20.00,"
    )
    .unwrap();
    file.flush().unwrap();

    run_import(&mut conn, file.path().to_str().unwrap()).unwrap();

    let (description, category_id): (String, Option<i64>) = conn
        .query_row(
            "SELECT description, category_id FROM transactions ORDER BY id DESC LIMIT 1",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(description, "Updated Store");
    assert_eq!(category_id, Some(cat_id));
}

#[test]
fn importer_rewrites_but_preserves_manual_category() {
    let mut conn = setup();
    conn.execute("INSERT INTO categories(name) VALUES('ManualCat')", [])
        .unwrap();
    conn.execute("INSERT INTO categories(name) VALUES('RuleCat')", [])
        .unwrap();
    let manual_id: i64 = conn
        .query_row("SELECT id FROM categories WHERE name='ManualCat'", [], |r| {
            r.get(0)
        })
        .unwrap();
    let rule_id: i64 = conn
        .query_row("SELECT id FROM categories WHERE name='RuleCat'", [], |r| {
            r.get(0)
        })
        .unwrap();
    conn.execute(
        "INSERT INTO rules(pattern, category_id, description_rewrite) VALUES('(?i)original', ?1, 'Updated Store')",
        [rule_id],
    )
    .unwrap();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "date,description,amount,category\n2025-02-03,Original Shop,-20.00,ManualCat"
    )
    .unwrap();
    file.flush().unwrap();

    run_import(&mut conn, file.path().to_str().unwrap()).unwrap();

    let (description, category_id, amount): (String, Option<i64>, String) = conn
        .query_row(
            "SELECT description, category_id, amount FROM transactions ORDER BY id DESC LIMIT 1",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .unwrap();
    assert_eq!(description, "Updated Store");
    assert_eq!(category_id, Some(manual_id));
    assert_eq!(amount, "-20.00");
}

#[test]
fn importer_rejects_unknown_category() {
    let mut conn = setup();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "date,description,amount,category\n2025-02-03,Shop,-5.00,NoSuchCat"
    )
    .unwrap();
    file.flush().unwrap();

    let err = run_import(&mut conn, file.path().to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("not found"));
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn importer_rejects_invalid_amount() {
    let mut conn = setup();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "date,description,amount,category\n2025-02-03,Shop,5..0,"
    )
    .unwrap();
    file.flush().unwrap();

    let err = run_import(&mut conn, file.path().to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("Invalid amount"));
}
