use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};

use crate::import::ImportResult;
use loto645_core::filters::FilterSettings;
use loto645_core::grid::{Grid, low_count, max_consecutive, odd_count, sum};
use loto645_core::history::RunEntry;
use loto645_core::rank::Rank;
use loto645_core::rarity::RarityEstimate;
use loto645_db::models::Draw;

/// Couleur par dizaine, comme les boules officielles.
pub fn ball_color(n: u8) -> Color {
    match n {
        1..=10 => Color::Yellow,
        11..=20 => Color::Blue,
        21..=30 => Color::Red,
        31..=40 => Color::Grey,
        _ => Color::Green,
    }
}

fn ball_cell(n: u8) -> Cell {
    Cell::new(format!("{:2}", n)).fg(ball_color(n))
}

pub fn display_settings(label: &str, settings: &FilterSettings) {
    println!("\n⚙️  Filtres actifs ({label})");
    println!("  Somme        : {}~{}", settings.sum_range.0, settings.sum_range.1);
    println!("  Impairs      : {:?}", settings.odd_counts);
    println!("  Consécutifs  : {} max", settings.max_consecutive);
    println!("  Numéros bas  : {:?} (1-22)", settings.low_counts);
}

pub fn display_grids(grids: &[Grid]) {
    println!("\n🎲 Grilles suggérées\n");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "#", "N1", "N2", "N3", "N4", "N5", "N6", "Somme", "Impairs", "Bas", "Suite",
        ]);

    for (i, grid) in grids.iter().enumerate() {
        let mut row: Vec<Cell> = vec![Cell::new(i + 1)];
        row.extend(grid.iter().map(|&n| ball_cell(n)));
        row.push(Cell::new(sum(grid)));
        row.push(Cell::new(odd_count(grid)));
        row.push(Cell::new(low_count(grid)));
        row.push(Cell::new(max_consecutive(grid)));
        table.add_row(row);
    }
    println!("{table}");
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Tirage", "Date", "Numéros", "Bonus", "Gagnants R1", "Gain R1"]);

    for draw in draws {
        let mut sorted = draw.numbers;
        sorted.sort();

        let numbers_str = sorted
            .iter()
            .map(|n| format!("{:2}", n))
            .collect::<Vec<_>>()
            .join(" - ");

        let prize = if draw.first_prize > 0.0 {
            format!("{:.0} ₩", draw.first_prize)
        } else {
            "—".to_string()
        };

        table.add_row(vec![
            &draw.draw_no.to_string(),
            &draw.date,
            &numbers_str,
            &format!("{:2}", draw.bonus),
            &draw.first_winner_count.to_string(),
            &prize,
        ]);
    }

    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Total lignes lues : {}", result.total_records);
    println!("  Insérés           : {}", result.inserted);
    println!("  Doublons ignorés  : {}", result.skipped);
    if result.errors > 0 {
        println!("  Erreurs           : {}", result.errors);
    }
}

pub fn display_rarity(estimate: &RarityEstimate) {
    println!("\n📊 Taux d'acceptation (sur {} tirages uniformes)\n", estimate.samples);

    let pct = |pass: u32| -> String {
        if estimate.samples == 0 {
            return "—".to_string();
        }
        format!("{:.2} %", 100.0 * pass as f64 / estimate.samples as f64)
    };

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Filtre", "Taux de passage"]);

    table.add_row(vec!["Somme", &pct(estimate.sum_pass)]);
    table.add_row(vec!["Impairs", &pct(estimate.odds_pass)]);
    table.add_row(vec!["Consécutifs", &pct(estimate.consecutive_pass)]);
    table.add_row(vec!["Numéros bas", &pct(estimate.lows_pass)]);
    table.add_row(vec!["Conjoint (les 4)", &pct(estimate.accepted)]);
    println!("{table}");

    match estimate.expected_attempts() {
        Some(attempts) => {
            println!("Tirages attendus par grille acceptée : {:.1}", attempts);
        }
        None => {
            println!("Aucune grille acceptée : filtres probablement insatisfiables.");
        }
    }
}

pub fn display_check(grid: &Grid, draw: &Draw, rank: Rank) {
    println!("\n🎯 Vérification contre le tirage {} ({})\n", draw.draw_no, draw.date);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["", "N1", "N2", "N3", "N4", "N5", "N6", "Bonus"]);

    let mut winning_row: Vec<Cell> = vec![Cell::new("Tirage")];
    let mut sorted_winning = draw.numbers;
    sorted_winning.sort();
    winning_row.extend(sorted_winning.iter().map(|&n| ball_cell(n)));
    winning_row.push(ball_cell(draw.bonus));
    table.add_row(winning_row);

    let mut played_row: Vec<Cell> = vec![Cell::new("Joué")];
    for &n in grid.iter() {
        let cell = if draw.numbers.contains(&n) {
            Cell::new(format!("{:2}", n)).fg(Color::Green)
        } else if n == draw.bonus {
            Cell::new(format!("{:2}", n)).fg(Color::DarkYellow)
        } else {
            Cell::new(format!("{:2}", n))
        };
        played_row.push(cell);
    }
    played_row.push(Cell::new("—"));
    table.add_row(played_row);

    println!("{table}");

    if rank.is_winning() {
        println!("Résultat : {} 🎉", rank);
    } else {
        println!("Résultat : {}", rank);
    }
}

pub fn display_history(entries: &[RunEntry]) {
    if entries.is_empty() {
        println!("Aucune génération dans cette session.");
        return;
    }

    println!("\n📜 Historique de la session ({} générations)\n", entries.len());

    for entry in entries {
        println!("[{}] mode {}", entry.timestamp, entry.strategy);
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        for grid in &entry.grids {
            let row: Vec<Cell> = grid.iter().map(|&n| ball_cell(n)).collect();
            table.add_row(row);
        }
        println!("{table}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ball_color_by_decade() {
        assert_eq!(ball_color(1), Color::Yellow);
        assert_eq!(ball_color(10), Color::Yellow);
        assert_eq!(ball_color(11), Color::Blue);
        assert_eq!(ball_color(20), Color::Blue);
        assert_eq!(ball_color(21), Color::Red);
        assert_eq!(ball_color(30), Color::Red);
        assert_eq!(ball_color(31), Color::Grey);
        assert_eq!(ball_color(40), Color::Grey);
        assert_eq!(ball_color(41), Color::Green);
        assert_eq!(ball_color(45), Color::Green);
    }
}
