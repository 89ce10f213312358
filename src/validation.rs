//! Deterministic checks: length, readability, sentiment.

use std::collections::{HashMap, HashSet};

use tracing::{info, warn};

use crate::config::ValidatorConfig;
use crate::error::ValidateError;
use crate::readability;
use crate::sentiment::{sentiment_flags, Lexicon};
use crate::stats::Band;
use crate::types::{BasicChecks, RatingOutcome, TextMetrics, ValidatedVignette, VignetteRecord};

pub const WORD_BAND: Band = Band::new(150.0, 175.0);
pub const GRADE_BAND: Band = Band::new(6.0, 10.0);

pub fn word_count_ok(words: u32) -> bool {
    WORD_BAND.contains(f64::from(words))
}

pub fn grade_ok(grade: f64) -> bool {
    GRADE_BAND.contains(grade)
}

/// Objective metrics for one text. Word count is recomputed here, never
/// taken from upstream.
pub fn measure(text: &str, lexicon: &Lexicon) -> TextMetrics {
    let r = readability::analyze(text);
    TextMetrics {
        actual_word_count: r.words,
        sentence_count: r.sentences,
        syllable_count: r.syllables,
        reading_grade: r.grade,
        reading_ease: r.ease,
        sentiment_score: lexicon.score(text),
    }
}

/// Runs all three checks over the batch. Output order and ids match the input.
pub fn validate_batch(records: Vec<VignetteRecord>, cfg: &ValidatorConfig) -> Result<Vec<ValidatedVignette>, ValidateError> {
    if records.is_empty() {
        return Err(ValidateError::EmptyBatch);
    }
    let mut seen = HashSet::with_capacity(records.len());
    for r in &records {
        if !seen.insert(r.id) {
            return Err(ValidateError::DuplicateId(r.id));
        }
    }

    let lexicon = cfg.lexicon();
    let metrics: Vec<TextMetrics> = records.iter().map(|r| measure(&r.text, lexicon)).collect();
    let scores: Vec<i32> = metrics.iter().map(|m| m.sentiment_score).collect();
    let sentiment_ok = sentiment_flags(&scores, cfg.outlier_rule);

    let out: Vec<ValidatedVignette> = records
        .into_iter()
        .zip(metrics)
        .zip(sentiment_ok)
        .map(|((record, metrics), sentiment_ok)| ValidatedVignette {
            record,
            checks: BasicChecks {
                length_ok: word_count_ok(metrics.actual_word_count),
                readability_ok: grade_ok(metrics.reading_grade),
                sentiment_ok,
            },
            metrics,
            rating: None,
        })
        .collect();

    let passing = out.iter().filter(|v| v.checks.basic_ok()).count();
    info!(total = out.len(), basic_ok = passing, "deterministic checks done");
    Ok(out)
}

/// Joins rating outcomes onto validated records by id. Every record gets an
/// outcome; ids without one are marked missing.
pub fn attach_ratings(records: &mut [ValidatedVignette], outcomes: Vec<(u32, RatingOutcome)>) {
    let mut by_id: HashMap<u32, RatingOutcome> = outcomes.into_iter().collect();
    for v in records.iter_mut() {
        let outcome = by_id.remove(&v.record.id).unwrap_or_else(|| RatingOutcome::Missing {
            reason: "no rating produced".into(),
        });
        v.rating = Some(outcome);
    }
    for id in by_id.keys() {
        warn!(id, "rating for unknown vignette id dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::OutlierRule;
    use crate::types::LlmRating;

    fn words(n: usize) -> String {
        let mut s = vec!["word"; n].join(" ");
        s.push('.');
        s
    }

    fn record(id: u32, text: String) -> VignetteRecord {
        VignetteRecord { id, text, policy: "tax".into(), declared_word_count: 999 }
    }

    #[test]
    fn length_boundaries() {
        assert!(word_count_ok(150));
        assert!(word_count_ok(175));
        assert!(!word_count_ok(149));
        assert!(!word_count_ok(176));
    }

    #[test]
    fn grade_boundaries() {
        assert!(grade_ok(6.0));
        assert!(grade_ok(10.0));
        assert!(!grade_ok(5.99));
        assert!(!grade_ok(10.01));
    }

    #[test]
    fn length_check_uses_recomputed_count() {
        let cfg = ValidatorConfig::default();
        let out = validate_batch(
            vec![record(1, words(149)), record(2, words(150)), record(3, words(175)), record(4, words(176))],
            &cfg,
        )
        .unwrap();
        let counts: Vec<u32> = out.iter().map(|v| v.metrics.actual_word_count).collect();
        assert_eq!(counts, vec![149, 150, 175, 176]);
        let ok: Vec<bool> = out.iter().map(|v| v.checks.length_ok).collect();
        assert_eq!(ok, vec![false, true, true, false]);
    }

    #[test]
    fn ids_and_order_are_preserved() {
        let cfg = ValidatorConfig::default();
        let out = validate_batch(vec![record(7, words(5)), record(3, words(5)), record(11, words(5))], &cfg).unwrap();
        let ids: Vec<u32> = out.iter().map(|v| v.record.id).collect();
        assert_eq!(ids, vec![7, 3, 11]);
        assert!(out.iter().all(|v| v.rating.is_none()));
    }

    #[test]
    fn rejects_duplicate_ids_and_empty_batches() {
        let cfg = ValidatorConfig::default();
        assert!(matches!(
            validate_batch(vec![record(1, words(3)), record(1, words(4))], &cfg),
            Err(ValidateError::DuplicateId(1))
        ));
        assert!(matches!(validate_batch(vec![], &cfg), Err(ValidateError::EmptyBatch)));
    }

    #[test]
    fn deterministic_validation_is_idempotent() {
        let cfg = ValidatorConfig { lexicon: None, outlier_rule: OutlierRule::LeaveOneOut };
        let batch = vec![
            record(1, "Growth helps families. Jobs improve.".into()),
            record(2, "A crisis hurts trade and causes losses.".into()),
            record(3, words(160)),
        ];
        let a = validate_batch(batch.clone(), &cfg).unwrap();
        let b = validate_batch(batch, &cfg).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn attach_ratings_joins_by_id_and_marks_gaps() {
        let cfg = ValidatorConfig::default();
        let mut out = validate_batch(vec![record(1, words(3)), record(2, words(3))], &cfg).unwrap();
        let rating = LlmRating {
            economic_emphasis: 6,
            moral_emphasis: 2,
            policy_match: 6,
            neutrality: 6,
            partisan_cues: 6,
            flags: "none".into(),
        };
        attach_ratings(&mut out, vec![(2, RatingOutcome::Rated(rating.clone())), (99, RatingOutcome::Rated(rating))]);
        assert!(matches!(out[0].rating, Some(RatingOutcome::Missing { .. })));
        assert_eq!(out[1].llm_ok(), Some(true));
    }
}
