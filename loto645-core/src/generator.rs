use anyhow::{Result, bail};
use chrono::Datelike;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;

use crate::filters::FilterSettings;
use crate::grid::{Grid, PICK_COUNT, POOL_SIZE};

/// Plafond de tirages avant d'abandonner : un filtre personnalisé trop
/// restrictif devient une erreur plutôt qu'une boucle infinie.
pub const MAX_ATTEMPTS: u32 = 1_000_000;

/// Génère un seed déterministe basé sur la date du jour (YYYYMMDD).
pub fn date_seed() -> u64 {
    let today = chrono::Local::now().date_naive();
    let y = today.year() as u64;
    let m = today.month() as u64;
    let d = today.day() as u64;
    y * 10_000 + m * 100 + d
}

/// Tire une grille uniforme : 6 numéros distincts dans 1-45, triés.
pub fn draw_uniform(rng: &mut StdRng) -> Grid {
    let indices = index::sample(rng, POOL_SIZE as usize, PICK_COUNT);
    let mut grid = [0u8; PICK_COUNT];
    for (i, idx) in indices.iter().enumerate() {
        grid[i] = (idx + 1) as u8;
    }
    grid.sort();
    grid
}

/// Échantillonnage par rejet : tire des grilles uniformes jusqu'à en
/// trouver une qui passe les quatre filtres.
pub fn generate_grid(settings: &FilterSettings, rng: &mut StdRng) -> Result<Grid> {
    for _ in 0..MAX_ATTEMPTS {
        let grid = draw_uniform(rng);
        if settings.accepts(&grid) {
            return Ok(grid);
        }
    }
    bail!(
        "Aucune grille acceptée après {} tirages (filtres trop restrictifs ?)",
        MAX_ATTEMPTS
    )
}

pub fn generate_grids(
    settings: &FilterSettings,
    count: usize,
    seed: Option<u64>,
) -> Result<Vec<Grid>> {
    settings.validate()?;

    let mut rng: StdRng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let mut grids = Vec::with_capacity(count);
    for _ in 0..count {
        grids.push(generate_grid(settings, &mut rng)?);
    }
    Ok(grids)
}
