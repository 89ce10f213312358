//! CSV / JSON persistence for generator and validator outputs.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::config::OutputPaths;
use crate::error::StoreError;
use crate::report::ValidationReport;
use crate::types::{GeneratedVignette, RatingOutcome, ValidatedVignette};

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io { path: path.to_path_buf(), source }
}

fn json_err(path: &Path) -> impl FnOnce(serde_json::Error) -> StoreError + '_ {
    move |source| StoreError::Json { path: path.to_path_buf(), source }
}

fn csv_err(path: &Path) -> impl FnOnce(csv::Error) -> StoreError + '_ {
    move |source| StoreError::Csv { path: path.to_path_buf(), source }
}

fn ensure_parent(path: &Path) -> Result<(), StoreError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir).map_err(io_err(dir)),
        _ => Ok(()),
    }
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    ensure_parent(path)?;
    let file = File::create(path).map_err(io_err(path))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value).map_err(json_err(path))
}

pub fn write_csv<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> Result<(), StoreError> {
    ensure_parent(path)?;
    let mut wtr = csv::Writer::from_path(path).map_err(csv_err(path))?;
    for row in rows {
        wtr.serialize(row).map_err(csv_err(path))?;
    }
    wtr.flush().map_err(io_err(path))
}

pub fn write_generated(paths: &OutputPaths, rows: &[GeneratedVignette]) -> Result<(), StoreError> {
    write_csv(&paths.generated_csv(), rows)?;
    write_json(&paths.generated_json(), rows)?;
    info!(dir = %paths.dir().display(), rows = rows.len(), "generated vignettes written");
    Ok(())
}

pub fn read_generated(path: &Path) -> Result<Vec<GeneratedVignette>, StoreError> {
    let file = File::open(path).map_err(io_err(path))?;
    serde_json::from_reader(BufReader::new(file)).map_err(json_err(path))
}

/// One denormalized row of `vignettes_validated.csv`.
#[derive(Debug, Serialize)]
struct ValidatedRow<'a> {
    id: u32,
    policy: &'a str,
    text: &'a str,
    declared_word_count: u32,
    actual_word_count: u32,
    sentence_count: u32,
    syllable_count: u32,
    reading_grade: f64,
    reading_ease: f64,
    sentiment_score: i32,
    length_ok: bool,
    readability_ok: bool,
    sentiment_ok: bool,
    basic_ok: bool,
    rating_status: &'static str,
    economic_emphasis: Option<u8>,
    moral_emphasis: Option<u8>,
    policy_match: Option<u8>,
    neutrality: Option<u8>,
    partisan_cues: Option<u8>,
    llm_flags: Option<&'a str>,
    llm_ok: Option<bool>,
    all_ok: bool,
}

impl<'a> From<&'a ValidatedVignette> for ValidatedRow<'a> {
    fn from(v: &'a ValidatedVignette) -> Self {
        let rating = v.rating.as_ref().and_then(RatingOutcome::rating);
        ValidatedRow {
            id: v.record.id,
            policy: &v.record.policy,
            text: &v.record.text,
            declared_word_count: v.record.declared_word_count,
            actual_word_count: v.metrics.actual_word_count,
            sentence_count: v.metrics.sentence_count,
            syllable_count: v.metrics.syllable_count,
            reading_grade: v.metrics.reading_grade,
            reading_ease: v.metrics.reading_ease,
            sentiment_score: v.metrics.sentiment_score,
            length_ok: v.checks.length_ok,
            readability_ok: v.checks.readability_ok,
            sentiment_ok: v.checks.sentiment_ok,
            basic_ok: v.checks.basic_ok(),
            rating_status: match &v.rating {
                None => "skipped",
                Some(RatingOutcome::Rated(_)) => "rated",
                Some(RatingOutcome::Missing { .. }) => "missing",
            },
            economic_emphasis: rating.map(|r| r.economic_emphasis),
            moral_emphasis: rating.map(|r| r.moral_emphasis),
            policy_match: rating.map(|r| r.policy_match),
            neutrality: rating.map(|r| r.neutrality),
            partisan_cues: rating.map(|r| r.partisan_cues),
            llm_flags: rating.map(|r| r.flags.as_str()),
            llm_ok: v.llm_ok(),
            all_ok: v.all_ok(),
        }
    }
}

pub fn write_validated(paths: &OutputPaths, records: &[ValidatedVignette], report: &ValidationReport) -> Result<(), StoreError> {
    write_csv(&paths.validated_csv(), records.iter().map(ValidatedRow::from))?;
    write_json(&paths.report_json(), report)?;
    info!(dir = %paths.dir().display(), "validation outputs written");
    Ok(())
}
