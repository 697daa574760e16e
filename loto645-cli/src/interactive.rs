use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};

use loto645_core::filters::Strategy;
use loto645_core::generator::generate_grids;
use loto645_core::grid::Grid;
use loto645_core::history::RunHistory;

use crate::display::{display_grids, display_history, display_settings};

#[derive(Debug, PartialEq)]
enum InteractiveCommand {
    Generate,
    Rarity,
    Check,
    Fetch,
    History,
    Mode,
    Quit,
}

fn parse_command(input: &str) -> Option<InteractiveCommand> {
    match input.trim().to_lowercase().as_str() {
        "1" | "generer" | "générer" | "gen" => Some(InteractiveCommand::Generate),
        "2" | "rarete" | "rareté" | "rar" => Some(InteractiveCommand::Rarity),
        "3" | "verifier" | "vérifier" | "check" => Some(InteractiveCommand::Check),
        "4" | "tirage" | "fetch" => Some(InteractiveCommand::Fetch),
        "5" | "historique" | "history" | "hist" => Some(InteractiveCommand::History),
        "6" | "mode" => Some(InteractiveCommand::Mode),
        "7" | "quitter" | "quit" | "q" | "exit" => Some(InteractiveCommand::Quit),
        _ => None,
    }
}

fn display_menu(mode: Strategy) {
    println!();
    println!("── Mode interactif (stratégie : {}) ──", mode);
    println!("  1. generer    Générer des grilles filtrées");
    println!("  2. rarete     Estimer le taux d'acceptation");
    println!("  3. verifier   Vérifier une grille contre un tirage");
    println!("  4. tirage     Consulter un tirage officiel");
    println!("  5. historique Générations de la session");
    println!("  6. mode       Changer de stratégie");
    println!("  7. quitter    Quitter");
    println!();
}

/// `read_line` renvoie `Ok(0)` en fin d'entrée : sans ce cas, un stdin
/// fermé (Ctrl+D) ferait tourner la boucle de menu indéfiniment.
fn read_trimmed<R: BufRead>(reader: &mut R) -> Result<String> {
    let mut input = String::new();
    let n = reader.read_line(&mut input).context("Erreur de lecture")?;
    if n == 0 {
        bail!("Fin de l'entrée");
    }
    Ok(input.trim().to_string())
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    read_trimmed(&mut io::stdin().lock())
}

fn prompt_with_default(msg: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}] : ", msg, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

fn prompt_numbers() -> Result<Grid> {
    loop {
        let input = prompt("6 numéros (séparés par des espaces, 1-45) : ")?;
        let nums: Result<Vec<u8>, _> = input.split_whitespace().map(|s| s.parse::<u8>()).collect();
        match nums {
            Ok(v) if v.len() == 6 => {
                let mut arr = [v[0], v[1], v[2], v[3], v[4], v[5]];
                arr.sort();
                if loto645_core::grid::validate_numbers(&arr).is_ok() {
                    return Ok(arr);
                }
                println!("Numéros invalides (1-45, pas de doublons). Réessayez.");
            }
            _ => println!("Entrez exactement 6 numéros. Réessayez."),
        }
    }
}

fn cmd_generate_interactive(mode: Strategy, history: &mut RunHistory) -> Result<()> {
    let n_str = prompt_with_default("Nombre de grilles", "5")?;
    let n: usize = n_str.parse().context("Nombre invalide")?;

    let settings = mode.settings();
    display_settings(mode.label(), &settings);

    // Pas de seed en session : chaque génération est différente
    let grids = generate_grids(&settings, n, None)?;
    display_grids(&grids);

    history.record(mode.label(), grids);
    Ok(())
}

fn cmd_rarity_interactive(mode: Strategy) -> Result<()> {
    let n_str = prompt_with_default("Nombre de tirages uniformes", "100000")?;
    let samples: u32 = n_str.parse().context("Nombre invalide")?;
    super::cmd_rarity(mode.label(), &mode.settings(), samples, None)
}

fn cmd_check_interactive(conn: &loto645_db::rusqlite::Connection) -> Result<()> {
    let grid = prompt_numbers()?;
    let draw_str = prompt("Numéro du tirage : ")?;
    let draw_no: u32 = draw_str.parse().context("Numéro de tirage invalide")?;
    let local = prompt_with_default("Base locale uniquement ? (o/n)", "n")?;
    super::cmd_check(conn, &grid, draw_no, local.to_lowercase() == "o")
}

fn cmd_fetch_interactive(conn: &loto645_db::rusqlite::Connection) -> Result<()> {
    let draw_str = prompt("Numéro du tirage : ")?;
    let draw_no: u32 = draw_str.parse().context("Numéro de tirage invalide")?;
    let save = prompt_with_default("Enregistrer dans la base locale ? (o/n)", "n")?;
    super::cmd_fetch(conn, Some(draw_no), save.to_lowercase() == "o", false)
}

fn cmd_mode_interactive(current: Strategy) -> Result<Strategy> {
    let input = prompt_with_default(
        "Stratégie (prudent/equilibre/agressif)",
        current.label(),
    )?;
    let mode: Strategy = input.parse()?;
    display_settings(mode.label(), &mode.settings());
    Ok(mode)
}

pub fn run_interactive(conn: &loto645_db::rusqlite::Connection) -> Result<()> {
    println!("Bienvenue dans le mode interactif de loto645 !");

    let mut mode = Strategy::Equilibre;
    let mut history = RunHistory::default();

    loop {
        display_menu(mode);
        let input = match prompt("> ") {
            Ok(s) => s,
            Err(_) => break, // EOF / Ctrl+D
        };

        if input.is_empty() {
            continue;
        }

        match parse_command(&input) {
            Some(InteractiveCommand::Quit) => {
                println!("Au revoir !");
                break;
            }
            Some(InteractiveCommand::Generate) => {
                if let Err(e) = cmd_generate_interactive(mode, &mut history) {
                    println!("Erreur: {e:#}");
                }
            }
            Some(InteractiveCommand::Rarity) => {
                if let Err(e) = cmd_rarity_interactive(mode) {
                    println!("Erreur: {e:#}");
                }
            }
            Some(InteractiveCommand::Check) => {
                if let Err(e) = cmd_check_interactive(conn) {
                    println!("Erreur: {e:#}");
                }
            }
            Some(InteractiveCommand::Fetch) => {
                if let Err(e) = cmd_fetch_interactive(conn) {
                    println!("Erreur: {e:#}");
                }
            }
            Some(InteractiveCommand::History) => {
                display_history(history.entries());
            }
            Some(InteractiveCommand::Mode) => match cmd_mode_interactive(mode) {
                Ok(new_mode) => mode = new_mode,
                Err(e) => println!("Erreur: {e:#}"),
            },
            None => {
                println!(
                    "Commande inconnue : '{}'. Tapez un numéro (1-7) ou un nom de commande.",
                    input
                );
            }
        }
    }

    Ok(())
}
