use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

use crate::models::Draw;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    draw_no             INTEGER PRIMARY KEY,
    date                TEXT NOT NULL,
    num_1               INTEGER NOT NULL,
    num_2               INTEGER NOT NULL,
    num_3               INTEGER NOT NULL,
    num_4               INTEGER NOT NULL,
    num_5               INTEGER NOT NULL,
    num_6               INTEGER NOT NULL,
    bonus               INTEGER NOT NULL,
    first_winner_count  INTEGER NOT NULL DEFAULT 0,
    first_prize         REAL NOT NULL DEFAULT 0.0,
    total_sales         REAL NOT NULL DEFAULT 0.0
);
";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("loto645.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (draw_no, date, num_1, num_2, num_3, num_4, num_5, num_6, bonus, first_winner_count, first_prize, total_sales)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        rusqlite::params![
            draw.draw_no,
            draw.date,
            draw.numbers[0],
            draw.numbers[1],
            draw.numbers[2],
            draw.numbers[3],
            draw.numbers[4],
            draw.numbers[5],
            draw.bonus,
            draw.first_winner_count,
            draw.first_prize,
            draw.total_sales,
        ],
    ).context("Échec de l'insertion")?;
    Ok(changed > 0)
}

fn draw_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Draw> {
    Ok(Draw {
        draw_no: row.get(0)?,
        date: row.get(1)?,
        numbers: [
            row.get::<_, u8>(2)?,
            row.get::<_, u8>(3)?,
            row.get::<_, u8>(4)?,
            row.get::<_, u8>(5)?,
            row.get::<_, u8>(6)?,
            row.get::<_, u8>(7)?,
        ],
        bonus: row.get(8)?,
        first_winner_count: row.get(9)?,
        first_prize: row.get(10)?,
        total_sales: row.get(11)?,
    })
}

const DRAW_COLUMNS: &str =
    "draw_no, date, num_1, num_2, num_3, num_4, num_5, num_6, bonus, first_winner_count, first_prize, total_sales";

pub fn fetch_draw(conn: &Connection, draw_no: u32) -> Result<Option<Draw>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DRAW_COLUMNS} FROM draws WHERE draw_no = ?1"
    ))?;
    let mut rows = stmt.query_map([draw_no], draw_from_row)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

pub fn fetch_last_draws(conn: &Connection, limit: u32) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DRAW_COLUMNS} FROM draws ORDER BY draw_no DESC LIMIT ?1"
    ))?;
    let draws = stmt
        .query_map([limit], draw_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

pub fn latest_draw_no(conn: &Connection) -> Result<Option<u32>> {
    let latest: Option<u32> =
        conn.query_row("SELECT MAX(draw_no) FROM draws", [], |row| row.get(0))?;
    Ok(latest)
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}
