use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use lelotto_db::rusqlite::Connection;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use lelotto_db::db::insert_draw;
use lelotto_db::models::{validate_draw, Draw};

/// Enregistrement tel que renvoyé par le service de consultation des tirages 6/45.
#[derive(Debug, Deserialize)]
struct ApiDraw {
    #[serde(rename = "drwNo")]
    draw_no: u32,
    #[serde(rename = "drwNoDate")]
    date: String,
    #[serde(rename = "drwtNo1")]
    n1: u8,
    #[serde(rename = "drwtNo2")]
    n2: u8,
    #[serde(rename = "drwtNo3")]
    n3: u8,
    #[serde(rename = "drwtNo4")]
    n4: u8,
    #[serde(rename = "drwtNo5")]
    n5: u8,
    #[serde(rename = "drwtNo6")]
    n6: u8,
    #[serde(rename = "bnusNo")]
    bonus: u8,
    #[serde(rename = "firstWinamnt", default)]
    first_prize: i64,
    #[serde(rename = "firstPrzwnerCo", default)]
    first_winners: u32,
}

#[derive(Debug, Deserialize)]
struct CsvDraw {
    draw_no: u32,
    date: String,
    n1: u8,
    n2: u8,
    n3: u8,
    n4: u8,
    n5: u8,
    n6: u8,
    bonus: u8,
    // colonnes facultatives : absentes ou vides valent 0
    #[serde(default)]
    first_prize: Option<i64>,
    #[serde(default)]
    first_winners: Option<u32>,
}

pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

/// Accepte "2024-01-06" et "2024.01.06" ; renvoie toujours AAAA-MM-JJ.
pub fn normalize_date(raw: &str) -> Result<String> {
    let raw = raw.trim();
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y.%m.%d"))
        .with_context(|| format!("Format de date invalide: '{}'", raw))?;
    Ok(date.format("%Y-%m-%d").to_string())
}

fn build_draw(
    draw_no: u32,
    date: &str,
    numbers: [u8; 6],
    bonus: u8,
    first_prize: i64,
    first_winners: u32,
) -> Result<Draw> {
    validate_draw(&numbers, bonus).with_context(|| format!("Tirage {} invalide", draw_no))?;
    let mut numbers = numbers;
    numbers.sort_unstable();
    Ok(Draw {
        draw_no,
        date: normalize_date(date)?,
        numbers,
        bonus,
        first_prize,
        first_winners,
    })
}

fn parse_api_record(value: serde_json::Value) -> Result<Draw> {
    if let Some(status) = value.get("returnValue").and_then(|v| v.as_str()) {
        if status != "success" {
            bail!("Réponse en échec (returnValue = '{}')", status);
        }
    }
    let api: ApiDraw = serde_json::from_value(value).context("Champs manquants ou invalides")?;
    build_draw(
        api.draw_no,
        &api.date,
        [api.n1, api.n2, api.n3, api.n4, api.n5, api.n6],
        api.bonus,
        api.first_prize,
        api.first_winners,
    )
}

fn parse_csv_record(record: CsvDraw) -> Result<Draw> {
    build_draw(
        record.draw_no,
        &record.date,
        [record.n1, record.n2, record.n3, record.n4, record.n5, record.n6],
        record.bonus,
        record.first_prize.unwrap_or(0),
        record.first_winners.unwrap_or(0),
    )
}

/// Insère chaque tirage valide dans une transaction ; les erreurs sont comptées, pas propagées.
fn import_records<I>(conn: &Connection, records: I) -> Result<ImportResult>
where
    I: IntoIterator<Item = Result<Draw>>,
{
    let tx = conn
        .unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    let mut result = ImportResult {
        total_records: 0,
        inserted: 0,
        skipped: 0,
        errors: 0,
    };

    for record in records {
        result.total_records += 1;
        match record {
            Ok(draw) => match insert_draw(&tx, &draw) {
                Ok(true) => result.inserted += 1,
                Ok(false) => result.skipped += 1,
                Err(e) => {
                    log::warn!("Erreur insertion enregistrement {}: {}", result.total_records, e);
                    result.errors += 1;
                }
            },
            Err(e) => {
                log::warn!("Enregistrement {} ignoré: {:#}", result.total_records, e);
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Échec du commit")?;
    log::info!(
        "Import : {} lus, {} insérés, {} doublons, {} erreurs",
        result.total_records,
        result.inserted,
        result.skipped,
        result.errors
    );
    Ok(result)
}

/// Tableau JSON d'enregistrements, ou un enregistrement unique.
pub fn import_json_str(conn: &Connection, json: &str) -> Result<ImportResult> {
    let value: serde_json::Value = serde_json::from_str(json).context("JSON invalide")?;
    let values = match value {
        serde_json::Value::Array(items) => items,
        other => vec![other],
    };
    import_records(conn, values.into_iter().map(parse_api_record))
}

/// Un enregistrement JSON par ligne ; les lignes vides sont ignorées.
pub fn import_json_lines_str(conn: &Connection, text: &str) -> Result<ImportResult> {
    let records = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            serde_json::from_str::<serde_json::Value>(line)
                .context("Ligne JSON invalide")
                .and_then(parse_api_record)
        });
    import_records(conn, records)
}

pub fn import_csv_reader<R: Read>(conn: &Connection, reader: R) -> Result<ImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let records = reader
        .deserialize::<CsvDraw>()
        .map(|r| r.context("Ligne CSV illisible").and_then(parse_csv_record));
    import_records(conn, records)
}

pub fn import_file(conn: &Connection, path: &Path) -> Result<ImportResult> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if extension == "csv" {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;
        return import_csv_reader(conn, file);
    }

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;
    match extension.as_str() {
        "jsonl" | "ndjson" => import_json_lines_str(conn, &text),
        _ => import_json_str(conn, &text),
    }
}
