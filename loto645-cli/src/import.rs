use anyhow::{Context, Result};
use loto645_db::rusqlite::Connection;
use std::path::Path;

use loto645_db::db::insert_draw;
use loto645_db::models::{Draw, validate_draw};

/// Les exports historiques portent des séparateurs de milliers dans les
/// montants ("1,548,546,458").
pub fn parse_amount(s: &str) -> Result<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(0.0);
    }
    let normalized = s.replace(',', "").replace(' ', "");
    normalized
        .parse::<f64>()
        .with_context(|| format!("Impossible de parser le montant: '{}'", s))
}

fn parse_record(record: &csv::StringRecord) -> Result<Draw> {
    let get = |idx: usize| -> Result<String> {
        record
            .get(idx)
            .map(|s| s.trim().to_string())
            .with_context(|| format!("Champ manquant à l'index {}", idx))
    };

    let get_u8 = |idx: usize| -> Result<u8> {
        let s = get(idx)?;
        s.parse::<u8>()
            .with_context(|| format!("Impossible de parser '{}' (index {})", s, idx))
    };

    let draw_no: u32 = get(0)?
        .parse()
        .context("Numéro de tirage invalide")?;
    let date = get(1)?;

    let mut numbers: [u8; 6] = [
        get_u8(2)?,
        get_u8(3)?,
        get_u8(4)?,
        get_u8(5)?,
        get_u8(6)?,
        get_u8(7)?,
    ];
    numbers.sort();
    let bonus = get_u8(8)?;

    validate_draw(&numbers, bonus)?;

    let winner_count_str = get(9).unwrap_or_default();
    let first_winner_count: u32 = if winner_count_str.is_empty() {
        0
    } else {
        winner_count_str.parse().unwrap_or(0)
    };

    let first_prize = parse_amount(&get(10).unwrap_or_default()).unwrap_or(0.0);
    let total_sales = parse_amount(&get(11).unwrap_or_default()).unwrap_or(0.0);

    Ok(Draw {
        draw_no,
        date,
        numbers,
        bonus,
        first_winner_count,
        first_prize,
        total_sales,
    })
}

pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

pub fn import_csv(conn: &Connection, path: &Path) -> Result<ImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;

    let tx = conn.unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    let mut result = ImportResult {
        total_records: 0,
        inserted: 0,
        skipped: 0,
        errors: 0,
    };

    for record_result in reader.records() {
        result.total_records += 1;
        match record_result {
            Ok(record) => {
                match parse_record(&record) {
                    Ok(draw) => {
                        match insert_draw(&tx, &draw) {
                            Ok(true) => result.inserted += 1,
                            Ok(false) => result.skipped += 1,
                            Err(e) => {
                                eprintln!("Erreur insertion ligne {}: {}", result.total_records, e);
                                result.errors += 1;
                            }
                        }
                    }
                    Err(e) => {
                        eprintln!("Erreur parsing ligne {}: {}", result.total_records, e);
                        result.errors += 1;
                    }
                }
            }
            Err(e) => {
                eprintln!("Erreur lecture ligne {}: {}", result.total_records, e);
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Échec du commit")?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert!((parse_amount("1,548,546,458").unwrap() - 1_548_546_458.0).abs() < 0.001);
        assert!((parse_amount("1200").unwrap() - 1200.0).abs() < 0.001);
        assert!((parse_amount("0").unwrap() - 0.0).abs() < 0.001);
        assert!((parse_amount("").unwrap() - 0.0).abs() < 0.001);
        assert!((parse_amount("  42 500  ").unwrap() - 42500.0).abs() < 0.001);
    }

    #[test]
    fn test_parse_record_full() {
        let record = csv::StringRecord::from(vec![
            "1102", "2024-01-06", "20", "6", "30", "38", "41", "1", "31",
            "17", "1,548,546,458", "117,055,266,000",
        ]);
        let draw = parse_record(&record).unwrap();
        assert_eq!(draw.draw_no, 1102);
        assert_eq!(draw.numbers, [1, 6, 20, 30, 38, 41]);
        assert_eq!(draw.bonus, 31);
        assert_eq!(draw.first_winner_count, 17);
        assert!((draw.first_prize - 1_548_546_458.0).abs() < 0.001);
    }

    #[test]
    fn test_parse_record_missing_amounts() {
        let record = csv::StringRecord::from(vec![
            "10", "2003-02-08", "1", "12", "23", "34", "40", "45", "7",
        ]);
        let draw = parse_record(&record).unwrap();
        assert_eq!(draw.first_winner_count, 0);
        assert!((draw.first_prize - 0.0).abs() < 0.001);
    }

    #[test]
    fn test_parse_record_invalid_draw_rejected() {
        // Bonus en collision avec un numéro tiré
        let record = csv::StringRecord::from(vec![
            "10", "2003-02-08", "1", "12", "23", "34", "40", "45", "45",
        ]);
        assert!(parse_record(&record).is_err());
    }

    #[test]
    fn test_import_csv_counts() {
        let conn = Connection::open_in_memory().unwrap();
        loto645_db::db::migrate(&conn).unwrap();

        let dir = std::env::temp_dir().join("loto645-test-import");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tirages.csv");
        std::fs::write(
            &path,
            "draw_no,date,n1,n2,n3,n4,n5,n6,bonus,winners,prize,sales\n\
             1,2002-12-07,10,23,29,33,37,40,16,0,0,0\n\
             2,2002-12-14,9,13,21,25,32,42,2,1,2002006800,0\n\
             1,2002-12-07,10,23,29,33,37,40,16,0,0,0\n\
             3,2002-12-21,11,16,19,21,27,91,30,0,0,0\n",
        )
        .unwrap();

        let result = import_csv(&conn, &path).unwrap();
        assert_eq!(result.total_records, 4);
        assert_eq!(result.inserted, 2);
        assert_eq!(result.skipped, 1, "le doublon devrait être ignoré");
        assert_eq!(result.errors, 1, "le numéro 91 devrait être rejeté");

        std::fs::remove_file(&path).ok();
    }
}
