// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, params};
use sterling::{cli, commands::transactions, db};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

#[test]
fn list_limit_respected() {
    let conn = setup();
    for i in 1..=3 {
        conn.execute(
            "INSERT INTO transactions(date,description,amount,kind) VALUES (?1,'P','-10','expense')",
            params![format!("2025-01-0{}", i)],
        )
        .unwrap();
    }

    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["sterling", "tx", "list", "--limit", "2"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&conn, list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].date, "2025-01-03");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn list_filters_by_kind() {
    let conn = setup();
    conn.execute(
        "INSERT INTO transactions(date,description,amount,kind) VALUES ('2025-01-02','Salary','2000','income')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO transactions(date,description,amount,kind) VALUES ('2025-01-03','Shop','-10','expense')",
        [],
    )
    .unwrap();

    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["sterling", "tx", "list", "--kind", "income"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&conn, list_m).unwrap();
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].description, "Salary");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn add_infers_kind_from_sign() {
    let conn = setup();
    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "sterling",
        "tx",
        "add",
        "--date",
        "2025-02-01",
        "--amount",
        "-42.50",
        "--description",
        "Coffee",
    ]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        transactions::handle(&conn, tx_m).unwrap();
    } else {
        panic!("no tx subcommand");
    }

    let (kind, amount): (String, String) = conn
        .query_row("SELECT kind, amount FROM transactions LIMIT 1", [], |r| {
            Ok((r.get(0)?, r.get(1)?))
        })
        .unwrap();
    assert_eq!(kind, "expense");
    assert_eq!(amount, "-42.50");
}

#[test]
fn add_applies_rule_category_and_rewrite() {
    let conn = setup();
    conn.execute("INSERT INTO categories(name) VALUES('Shopping')", [])
        .unwrap();
    let cat_id: i64 = conn
        .query_row("SELECT id FROM categories WHERE name='Shopping'", [], |r| {
            r.get(0)
        })
        .unwrap();
    conn.execute(
        "INSERT INTO rules(pattern, category_id, description_rewrite) VALUES('(?i)amzn|amazon', ?1, 'Amazon')",
        params![cat_id],
    )
    .unwrap();

    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "sterling",
        "tx",
        "add",
        "--date",
        "2025-02-03",
        "--amount",
        "-19.99",
        "--description",
        "AMZN Mktp UK*AB123",
    ]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        transactions::handle(&conn, tx_m).unwrap();
    } else {
        panic!("no tx subcommand");
    }

    let (description, category_id): (String, Option<i64>) = conn
        .query_row(
            "SELECT description, category_id FROM transactions LIMIT 1",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(description, "Amazon");
    assert_eq!(category_id, Some(cat_id));
}

#[test]
fn purge_deletes_only_the_requested_month() {
    let conn = setup();
    for d in ["2025-01-05", "2025-01-20", "2025-01-31", "2025-02-01"] {
        conn.execute(
            "INSERT INTO transactions(date,description,amount,kind) VALUES (?1,'P','-10','expense')",
            params![d],
        )
        .unwrap();
    }

    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["sterling", "tx", "purge", "--month", "2025-01"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        transactions::handle(&conn, tx_m).unwrap();
    } else {
        panic!("no tx subcommand");
    }

    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(remaining, 1);
    let date: String = conn
        .query_row("SELECT date FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(date, "2025-02-01");
}

#[test]
fn purge_respects_category_filter() {
    let conn = setup();
    conn.execute("INSERT INTO categories(name) VALUES('Food')", [])
        .unwrap();
    let cat_id: i64 = conn
        .query_row("SELECT id FROM categories WHERE name='Food'", [], |r| {
            r.get(0)
        })
        .unwrap();
    conn.execute(
        "INSERT INTO transactions(date,description,amount,kind,category_id) VALUES ('2025-01-05','A','-10','expense',?1)",
        params![cat_id],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO transactions(date,description,amount,kind) VALUES ('2025-01-06','B','-10','expense')",
        [],
    )
    .unwrap();

    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "sterling", "tx", "purge", "--month", "2025-01", "--category", "Food",
    ]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        transactions::handle(&conn, tx_m).unwrap();
    } else {
        panic!("no tx subcommand");
    }

    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(remaining, 1);
}

#[test]
fn snapshot_load_rejects_malformed_amounts() {
    let conn = setup();
    conn.execute(
        "INSERT INTO transactions(date,description,amount,kind) VALUES ('2025-01-05','Bad','abc','expense')",
        [],
    )
    .unwrap();
    let err = db::load_transactions(&conn).unwrap_err();
    assert!(err.to_string().contains("Invalid stored amount"));
}
