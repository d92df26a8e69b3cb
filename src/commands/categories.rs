// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::{Result, anyhow};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let color = sub
                .get_one::<String>("color")
                .map(|s| s.trim().to_lowercase());
            if let Some(ref c) = color {
                validate_color(c)?;
            }
            conn.execute(
                "INSERT INTO categories(name, color) VALUES (?1, ?2)",
                params![name, color],
            )?;
            println!("Added category '{}'", name);
        }
        Some(("list", _)) => {
            let mut stmt =
                conn.prepare("SELECT name, COALESCE(color,'') FROM categories ORDER BY name")?;
            let rows = stmt.query_map([], |r| {
                Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (n, c) = row?;
                data.push(vec![n, c]);
            }
            println!("{}", pretty_table(&["Category", "Color"], data));
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            conn.execute("DELETE FROM categories WHERE name=?1", params![name])?;
            println!("Removed category '{}'", name);
        }
        _ => {}
    }
    Ok(())
}

fn validate_color(s: &str) -> Result<()> {
    let ok = s.len() == 7
        && s.starts_with('#')
        && s[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !ok {
        return Err(anyhow!("Invalid color '{}', expected #rrggbb", s));
    }
    Ok(())
}
