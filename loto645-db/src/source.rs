use anyhow::{Result, bail};
use rusqlite::Connection;

use crate::db::fetch_draw;
use crate::models::Draw;
use crate::remote::fetch_remote_draw;

/// Fournisseur de résultats de tirage interchangeable : API distante ou
/// table historique locale.
pub trait DrawSource {
    fn name(&self) -> &'static str;
    fn fetch(&self, draw_no: u32) -> Result<Draw>;
}

pub struct RemoteSource;

impl DrawSource for RemoteSource {
    fn name(&self) -> &'static str {
        "API distante"
    }

    fn fetch(&self, draw_no: u32) -> Result<Draw> {
        fetch_remote_draw(draw_no)
    }
}

pub struct LocalSource<'a> {
    conn: &'a Connection,
}

impl<'a> LocalSource<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl DrawSource for LocalSource<'_> {
    fn name(&self) -> &'static str {
        "base locale"
    }

    fn fetch(&self, draw_no: u32) -> Result<Draw> {
        match fetch_draw(self.conn, draw_no)? {
            Some(draw) => Ok(draw),
            None => bail!(
                "Tirage {} absent de la base locale. Lancez d'abord : loto645 import",
                draw_no
            ),
        }
    }
}

/// API distante d'abord, repli sur la base locale en cas d'échec.
pub struct FallbackSource<'a> {
    remote: RemoteSource,
    local: LocalSource<'a>,
}

impl<'a> FallbackSource<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            remote: RemoteSource,
            local: LocalSource::new(conn),
        }
    }
}

impl DrawSource for FallbackSource<'_> {
    fn name(&self) -> &'static str {
        "API distante (repli local)"
    }

    fn fetch(&self, draw_no: u32) -> Result<Draw> {
        match self.remote.fetch(draw_no) {
            Ok(draw) => Ok(draw),
            Err(err) => {
                eprintln!("API distante indisponible ({err:#}), repli sur la base locale");
                self.local.fetch(draw_no)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{insert_draw, migrate};

    fn seeded_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        insert_draw(
            &conn,
            &Draw {
                draw_no: 1102,
                date: "2024-01-06".to_string(),
                numbers: [1, 6, 20, 30, 38, 41],
                bonus: 31,
                first_winner_count: 17,
                first_prize: 1_548_546_458.0,
                total_sales: 117_055_266_000.0,
            },
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_local_source_hit() {
        let conn = seeded_conn();
        let source = LocalSource::new(&conn);
        let draw = source.fetch(1102).unwrap();
        assert_eq!(draw.numbers, [1, 6, 20, 30, 38, 41]);
    }

    #[test]
    fn test_local_source_miss() {
        let conn = seeded_conn();
        let source = LocalSource::new(&conn);
        assert!(source.fetch(9999).is_err());
    }

    #[test]
    fn test_sources_expose_names() {
        let conn = seeded_conn();
        assert_eq!(LocalSource::new(&conn).name(), "base locale");
        assert_eq!(RemoteSource.name(), "API distante");
    }
}
