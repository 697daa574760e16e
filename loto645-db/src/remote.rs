use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::models::{Draw, validate_draw};

const API_URL: &str = "https://www.dhlottery.co.kr/common.do";

/// Réponse brute de l'API dhlottery. `returnValue` vaut "fail" quand le
/// numéro de tirage n'existe pas, et les autres champs sont alors absents.
#[derive(Debug, Deserialize)]
struct ApiDraw {
    #[serde(rename = "returnValue")]
    return_value: String,
    #[serde(rename = "drwNo", default)]
    draw_no: u32,
    #[serde(rename = "drwNoDate", default)]
    date: String,
    #[serde(rename = "drwtNo1", default)]
    num_1: u8,
    #[serde(rename = "drwtNo2", default)]
    num_2: u8,
    #[serde(rename = "drwtNo3", default)]
    num_3: u8,
    #[serde(rename = "drwtNo4", default)]
    num_4: u8,
    #[serde(rename = "drwtNo5", default)]
    num_5: u8,
    #[serde(rename = "drwtNo6", default)]
    num_6: u8,
    #[serde(rename = "bnusNo", default)]
    bonus: u8,
    #[serde(rename = "firstPrzwnerCo", default)]
    first_winner_count: u32,
    #[serde(rename = "firstWinamnt", default)]
    first_prize: f64,
    #[serde(rename = "totSellamnt", default)]
    total_sales: f64,
}

impl ApiDraw {
    fn into_draw(self) -> Result<Draw> {
        if self.return_value != "success" {
            bail!("Tirage inconnu côté API (returnValue = '{}')", self.return_value);
        }
        let mut numbers = [
            self.num_1, self.num_2, self.num_3, self.num_4, self.num_5, self.num_6,
        ];
        numbers.sort();
        validate_draw(&numbers, self.bonus)
            .with_context(|| format!("Tirage {} invalide dans la réponse API", self.draw_no))?;
        Ok(Draw {
            draw_no: self.draw_no,
            date: self.date,
            numbers,
            bonus: self.bonus,
            first_winner_count: self.first_winner_count,
            first_prize: self.first_prize,
            total_sales: self.total_sales,
        })
    }
}

pub fn fetch_remote_draw(draw_no: u32) -> Result<Draw> {
    let url = format!("{API_URL}?method=getLottoNumber&drwNo={draw_no}");
    let response = ureq::get(&url)
        .set("Accept", "application/json")
        .call()
        .map_err(|err| anyhow::anyhow!("Échec de la requête vers {url}: {err}"))?;

    let api: ApiDraw = response
        .into_json()
        .context("Réponse JSON de l'API illisible")?;
    api.into_draw()
        .with_context(|| format!("Tirage {} introuvable sur l'API distante", draw_no))
}
