//! Batch-level summary and the overall accept/reject decision.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sentiment::{OutlierRule, OUTLIER_SD_MULTIPLIER};
use crate::stats::{Band, Summary};
use crate::types::{LlmRating, RatingOutcome, ValidatedVignette};
use crate::validation::{GRADE_BAND, WORD_BAND};

/// Acceptance rule a dimension was judged against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Target {
    Range(Band),
    Outlier { rule: String, sd_multiplier: f64 },
    Thresholds(BTreeMap<String, String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionReport {
    pub target: Target,
    pub observed: Summary,
    pub n_pass: usize,
    pub failing_ids: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmRatingReport {
    pub target: Target,
    pub n_rated: usize,
    pub n_missing: usize,
    pub n_pass: usize,
    /// Rated, but below threshold.
    pub failing_ids: Vec<u32>,
    pub missing_ids: Vec<u32>,
    pub scales: BTreeMap<String, Summary>,
}

/// Written once per run; never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub generated_at: DateTime<Utc>,
    pub n_vignettes: usize,
    pub word_count: DimensionReport,
    pub reading_level: DimensionReport,
    pub reading_ease: Summary,
    pub sentiment: DimensionReport,
    /// Absent when the rating stage was skipped.
    pub llm_rating: Option<LlmRatingReport>,
    pub all_pass: bool,
}

fn dimension(
    records: &[ValidatedVignette],
    target: Target,
    value: impl Fn(&ValidatedVignette) -> f64,
    ok: impl Fn(&ValidatedVignette) -> bool,
) -> DimensionReport {
    let values: Vec<f64> = records.iter().map(&value).collect();
    let failing_ids: Vec<u32> = records.iter().filter(|v| !ok(v)).map(|v| v.record.id).collect();
    DimensionReport {
        target,
        observed: Summary::of(&values),
        n_pass: records.len() - failing_ids.len(),
        failing_ids,
    }
}

fn rating_thresholds() -> BTreeMap<String, String> {
    [
        ("economic_emphasis", ">= 5"),
        ("moral_emphasis", "<= 4"),
        ("policy_match", ">= 5"),
        ("neutrality", ">= 5"),
        ("partisan_cues", ">= 5"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn llm_dimension(records: &[ValidatedVignette]) -> Option<LlmRatingReport> {
    if records.iter().all(|v| v.rating.is_none()) {
        return None;
    }
    let rated: Vec<(u32, &LlmRating)> = records
        .iter()
        .filter_map(|v| v.rating.as_ref()?.rating().map(|r| (v.record.id, r)))
        .collect();
    let missing_ids: Vec<u32> = records
        .iter()
        .filter(|v| matches!(v.rating, Some(RatingOutcome::Missing { .. })))
        .map(|v| v.record.id)
        .collect();
    let failing_ids: Vec<u32> = rated.iter().filter(|(_, r)| !r.passes()).map(|(id, _)| *id).collect();

    let mut scales = BTreeMap::new();
    for (idx, name) in ["economic_emphasis", "moral_emphasis", "policy_match", "neutrality", "partisan_cues"]
        .into_iter()
        .enumerate()
    {
        let xs: Vec<f64> = rated.iter().map(|(_, r)| f64::from(r.scales()[idx].1)).collect();
        scales.insert(name.to_string(), Summary::of(&xs));
    }

    Some(LlmRatingReport {
        target: Target::Thresholds(rating_thresholds()),
        n_rated: rated.len(),
        n_missing: missing_ids.len(),
        n_pass: rated.len() - failing_ids.len(),
        failing_ids,
        missing_ids,
        scales,
    })
}

pub fn assemble_at(records: &[ValidatedVignette], rule: OutlierRule, at: DateTime<Utc>) -> ValidationReport {
    let n = records.len();
    let word_count = dimension(
        records,
        Target::Range(WORD_BAND),
        |v| f64::from(v.metrics.actual_word_count),
        |v| v.checks.length_ok,
    );
    let reading_level = dimension(
        records,
        Target::Range(GRADE_BAND),
        |v| v.metrics.reading_grade,
        |v| v.checks.readability_ok,
    );
    let sentiment = dimension(
        records,
        Target::Outlier {
            rule: match rule {
                OutlierRule::FullBatch => "full-batch".into(),
                OutlierRule::LeaveOneOut => "leave-one-out".into(),
            },
            sd_multiplier: OUTLIER_SD_MULTIPLIER,
        },
        |v| f64::from(v.metrics.sentiment_score),
        |v| v.checks.sentiment_ok,
    );
    let ease: Vec<f64> = records.iter().map(|v| v.metrics.reading_ease).collect();
    let llm_rating = llm_dimension(records);

    let all_pass = word_count.n_pass == n
        && reading_level.n_pass == n
        && sentiment.n_pass == n
        && llm_rating.as_ref().map_or(true, |l| l.n_pass == n);

    ValidationReport {
        generated_at: at,
        n_vignettes: n,
        word_count,
        reading_level,
        reading_ease: Summary::of(&ease),
        sentiment,
        llm_rating,
        all_pass,
    }
}

pub fn assemble(records: &[ValidatedVignette], rule: OutlierRule) -> ValidationReport {
    assemble_at(records, rule, Utc::now())
}
