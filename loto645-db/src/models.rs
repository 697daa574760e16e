use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use loto645_core::grid::{Grid, validate_numbers};

/// Un tirage officiel : 6 numéros, bonus, et les montants du 1er rang.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draw {
    pub draw_no: u32,
    pub date: String,
    pub numbers: Grid,
    pub bonus: u8,
    pub first_winner_count: u32,
    pub first_prize: f64,
    pub total_sales: f64,
}

pub fn validate_draw(numbers: &Grid, bonus: u8) -> Result<()> {
    validate_numbers(numbers)?;
    if bonus < 1 || bonus > 45 {
        bail!("Bonus {} hors limites (1-45)", bonus);
    }
    if numbers.contains(&bonus) {
        bail!("Bonus {} déjà présent dans les numéros tirés", bonus);
    }
    Ok(())
}
