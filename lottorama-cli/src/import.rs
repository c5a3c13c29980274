use std::path::Path;

use anyhow::{bail, Context, Result};

use lottorama_db::db::Ledger;
use lottorama_db::models::{validate_draw, Draw};

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

    let draw_id = get(0)?;
    let day = get(1)?;

    let raw_date = get(2)?;
    let date = parse_date(&raw_date)?;

    let balls: [u8; 5] = [get_u8(5)?, get_u8(6)?, get_u8(7)?, get_u8(8)?, get_u8(9)?];
    let stars: [u8; 2] = [get_u8(10)?, get_u8(11)?];

    validate_draw(&balls, &stars)?;

    Ok(Draw {
        draw_id,
        day,
        date,
        balls,
        stars,
    })
}

fn parse_date(raw: &str) -> Result<String> {
    let parts: Vec<&str> = raw.split('/').collect();
    if parts.len() != 3 {
        bail!("Format de date invalide: '{}'", raw);
    }
    Ok(format!("{}-{}-{}", parts[2], parts[1], parts[0]))
}

pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

/// Importe l'historique des tirages puis reconstruit l'instantané de
/// classement des deux groupes.
pub fn import_csv(ledger: &Ledger, path: &Path) -> Result<ImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;

    let mut result = ImportResult {
        total_records: 0,
        inserted: 0,
        skipped: 0,
        errors: 0,
    };

    let mut draws = Vec::new();
    for record_result in reader.records() {
        result.total_records += 1;
        match record_result {
            Ok(record) => match parse_record(&record) {
                Ok(draw) => draws.push(draw),
                Err(e) => {
                    eprintln!("Erreur parsing ligne {}: {}", result.total_records, e);
                    result.errors += 1;
                }
            },
            Err(e) => {
                eprintln!("Erreur lecture ligne {}: {}", result.total_records, e);
                result.errors += 1;
            }
        }
    }

    let (inserted, skipped) = ledger
        .insert_draws(&draws)
        .context("Échec de l'insertion des tirages")?;
    result.inserted = inserted;
    result.skipped = skipped;

    ledger
        .rebuild_rankings()
        .context("Échec de la reconstruction du classement")?;

    Ok(result)
}
