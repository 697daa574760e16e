mod display;
mod import;
mod interactive;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand::rngs::StdRng;

use loto645_core::filters::{FilterSettings, Strategy, load_settings};
use loto645_core::generator::{date_seed, generate_grids};
use loto645_core::grid::{Grid, validate_numbers};
use loto645_core::rank::determine_rank;
use loto645_core::rarity::{RarityEstimate, sample_acceptance};
use loto645_db::db::{
    count_draws, db_path, fetch_last_draws, insert_draw, latest_draw_no, migrate, open_db,
};
use loto645_db::source::{DrawSource, FallbackSource, LocalSource};

use crate::display::{
    display_check, display_draws, display_grids, display_import_summary, display_rarity,
    display_settings,
};

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum Mode {
    Prudent,
    #[default]
    Equilibre,
    Agressif,
}

impl Mode {
    pub fn strategy(self) -> Strategy {
        match self {
            Mode::Prudent => Strategy::Prudent,
            Mode::Equilibre => Strategy::Equilibre,
            Mode::Agressif => Strategy::Agressif,
        }
    }
}

#[derive(Parser)]
#[command(name = "loto645", about = "Générateur stratégique de grilles Lotto 6/45")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importer l'historique des tirages depuis un fichier CSV
    Import {
        /// Chemin vers le fichier CSV
        #[arg(short, long, default_value = "assets/lotto645.csv")]
        file: PathBuf,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Lister les derniers tirages importés
    List {
        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Récupérer un tirage officiel (API distante, repli local)
    Fetch {
        /// Numéro du tirage (requis sans --local ; défaut local : le dernier importé)
        #[arg(short, long)]
        draw: Option<u32>,

        /// Enregistrer le tirage dans la base locale
        #[arg(long)]
        save: bool,

        /// Ne consulter que la base locale
        #[arg(long)]
        local: bool,
    },

    /// Générer des grilles filtrées par échantillonnage avec rejet
    Generate {
        /// Stratégie prédéfinie
        #[arg(short, long, default_value = "equilibre")]
        mode: Mode,

        /// Fichier JSON de filtres personnalisés (prioritaire sur --mode)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Nombre de grilles
        #[arg(short, long, default_value = "5")]
        count: usize,

        /// Seed pour la reproductibilité (défaut: date du jour YYYYMMDD)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Estimer par Monte-Carlo le taux d'acceptation des filtres
    Rarity {
        /// Stratégie prédéfinie
        #[arg(short, long, default_value = "equilibre")]
        mode: Mode,

        /// Fichier JSON de filtres personnalisés (prioritaire sur --mode)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Nombre de grilles uniformes tirées
        #[arg(short, long, default_value = "100000")]
        samples: u32,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Vérifier une grille contre un tirage officiel
    Check {
        /// Les 6 numéros joués
        numbers: Vec<u8>,

        /// Numéro du tirage
        #[arg(short, long)]
        draw: u32,

        /// Ne consulter que la base locale
        #[arg(long)]
        local: bool,
    },

    /// Mode interactif (REPL)
    Interactive,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Import { file } => cmd_import(&conn, &file),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { last } => cmd_list(&conn, last),
        Command::Fetch { draw, save, local } => cmd_fetch(&conn, draw, save, local),
        Command::Generate {
            mode,
            config,
            count,
            seed,
        } => {
            let (label, settings) = resolve_settings(mode, config.as_deref())?;
            cmd_generate(&label, &settings, count, seed)
        }
        Command::Rarity {
            mode,
            config,
            samples,
            seed,
        } => {
            let (label, settings) = resolve_settings(mode, config.as_deref())?;
            cmd_rarity(&label, &settings, samples, seed)
        }
        Command::Check {
            numbers,
            draw,
            local,
        } => cmd_check(&conn, &numbers, draw, local),
        Command::Interactive => interactive::run_interactive(&conn),
    }
}

fn resolve_settings(mode: Mode, config: Option<&std::path::Path>) -> Result<(String, FilterSettings)> {
    match config {
        Some(path) => {
            let settings = load_settings(path)?;
            Ok((format!("personnalisé ({})", path.display()), settings))
        }
        None => {
            let strategy = mode.strategy();
            Ok((strategy.label().to_string(), strategy.settings()))
        }
    }
}

fn cmd_import(conn: &loto645_db::rusqlite::Connection, file: &PathBuf) -> Result<()> {
    let result = import::import_csv(conn, file)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_list(conn: &loto645_db::rusqlite::Connection, last: u32) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Base vide. Lancez d'abord : loto645 import");
        return Ok(());
    }
    let draws = fetch_last_draws(conn, last)?;
    display_draws(&draws);
    Ok(())
}

/// Sans numéro explicite, seul le mode local a un défaut raisonnable :
/// le dernier tirage importé.
fn resolve_fetch_draw_no(
    conn: &loto645_db::rusqlite::Connection,
    draw: Option<u32>,
    local: bool,
) -> Result<u32> {
    match draw {
        Some(n) => Ok(n),
        None => {
            if !local {
                bail!("--draw est requis sans --local");
            }
            latest_draw_no(conn)?
                .context("Base vide. Lancez d'abord : loto645 import")
        }
    }
}

pub(crate) fn cmd_fetch(
    conn: &loto645_db::rusqlite::Connection,
    draw: Option<u32>,
    save: bool,
    local: bool,
) -> Result<()> {
    let draw_no = resolve_fetch_draw_no(conn, draw, local)?;

    let draw = if local {
        LocalSource::new(conn).fetch(draw_no)?
    } else {
        FallbackSource::new(conn).fetch(draw_no)?
    };

    display_draws(&[draw.clone()]);

    if save {
        let inserted = insert_draw(conn, &draw)?;
        if inserted {
            println!("Tirage {} enregistré dans la base locale.", draw.draw_no);
        } else {
            println!("Tirage {} déjà présent (doublon ignoré).", draw.draw_no);
        }
    }

    Ok(())
}

pub(crate) fn cmd_generate(
    label: &str,
    settings: &FilterSettings,
    count: usize,
    seed: Option<u64>,
) -> Result<()> {
    let effective_seed = seed.unwrap_or_else(|| {
        let ds = date_seed();
        println!("(Seed du jour : {ds})");
        ds
    });

    display_settings(label, settings);

    let grids = generate_grids(settings, count, Some(effective_seed))?;
    display_grids(&grids);

    Ok(())
}

pub(crate) fn cmd_rarity(
    label: &str,
    settings: &FilterSettings,
    samples: u32,
    seed: Option<u64>,
) -> Result<()> {
    settings.validate()?;

    let mut rng: StdRng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    println!("Estimation Monte-Carlo sur {} tirages uniformes...", samples);

    let pb = ProgressBar::new(samples as u64);
    pb.set_style(ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap()
        .progress_chars("=> "));

    const CHUNK: u32 = 10_000;
    let mut total = RarityEstimate::default();
    let mut remaining = samples;
    while remaining > 0 {
        let batch = remaining.min(CHUNK);
        let estimate = sample_acceptance(settings, batch, &mut rng);
        total.merge(&estimate);
        pb.inc(batch as u64);
        remaining -= batch;
    }

    pb.finish_with_message("Estimation terminée");

    display_settings(label, settings);
    display_rarity(&total);

    Ok(())
}

pub(crate) fn cmd_check(
    conn: &loto645_db::rusqlite::Connection,
    numbers: &[u8],
    draw_no: u32,
    local: bool,
) -> Result<()> {
    if numbers.len() != 6 {
        bail!("Attendu 6 numéros. Reçu : {}", numbers.len());
    }

    let mut grid: Grid = [
        numbers[0], numbers[1], numbers[2], numbers[3], numbers[4], numbers[5],
    ];
    grid.sort();
    validate_numbers(&grid)?;

    let draw = if local {
        LocalSource::new(conn).fetch(draw_no)?
    } else {
        FallbackSource::new(conn).fetch(draw_no)?
    };

    let rank = determine_rank(&grid, &draw.numbers, draw.bonus);
    display_check(&grid, &draw, rank);

    Ok(())
}
