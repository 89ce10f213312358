//! Lexicon valence scoring and the batch-relative outlier gate.

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::ConfigError;
use crate::segments::word_tokens;
use crate::stats::{mean, sample_sd};

const BUILTIN_AFINN: &str = include_str!("../data/afinn_subset.tsv");

static BUILTIN: Lazy<Lexicon> = Lazy::new(|| Lexicon::parse(BUILTIN_AFINN).unwrap_or_default());

/// A record is an outlier when `|score - mean| >= 2 * sd`.
pub const OUTLIER_SD_MULTIPLIER: f64 = 2.0;

/// Word → integer valence map in AFINN format (`word<TAB>score`).
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    scores: HashMap<String, i32>,
}

impl Lexicon {
    pub fn builtin() -> &'static Lexicon {
        &BUILTIN
    }

    /// Parses `word<TAB>score` lines; blank lines and `#` comments are skipped.
    /// On failure returns the 1-based line number and reason.
    pub fn parse(src: &str) -> Result<Self, (usize, String)> {
        let mut scores = HashMap::new();
        for (idx, line) in src.lines().enumerate() {
            let line = line.trim_end();
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let (word, score) = line
                .rsplit_once('\t')
                .ok_or_else(|| (idx + 1, "expected word<TAB>score".to_string()))?;
            let score: i32 = score
                .trim()
                .parse()
                .map_err(|_| (idx + 1, format!("bad score {score:?}")))?;
            scores.insert(word.trim().to_lowercase(), score);
        }
        Ok(Self { scores })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let src = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            what: "lexicon",
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&src).map_err(|(line, reason)| ConfigError::LexiconLine {
            path: path.to_path_buf(),
            line,
            reason,
        })
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn valence(&self, word: &str) -> Option<i32> {
        self.scores.get(&word.to_lowercase()).copied()
    }

    /// Sum of matched valences. No matches is a legitimate zero.
    pub fn score(&self, text: &str) -> i32 {
        word_tokens(text).iter().filter_map(|w| self.valence(w)).sum()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutlierRule {
    /// Mean and sd over the whole batch, candidate included.
    #[default]
    FullBatch,
    /// Mean and sd over every record except the candidate.
    LeaveOneOut,
}

fn is_outlier(x: f64, reference: &[f64]) -> bool {
    let (Some(m), Some(sd)) = (mean(reference), sample_sd(reference)) else {
        return false;
    };
    let dev = (x - m).abs();
    // zero deviation is never an outlier, even when sd is zero
    dev > 0.0 && dev >= OUTLIER_SD_MULTIPLIER * sd
}

/// `true` where the record passes the sentiment gate. Batches too small to
/// have a standard deviation always pass.
pub fn sentiment_flags(scores: &[i32], rule: OutlierRule) -> Vec<bool> {
    let xs: Vec<f64> = scores.iter().map(|&s| s as f64).collect();
    match rule {
        OutlierRule::FullBatch => xs.iter().map(|&x| !is_outlier(x, &xs)).collect(),
        OutlierRule::LeaveOneOut => (0..xs.len())
            .map(|i| {
                let others: Vec<f64> = xs
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(_, &x)| x)
                    .collect();
                !is_outlier(xs[i], &others)
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lexicon_loads() {
        let lex = Lexicon::builtin();
        assert!(lex.len() > 200);
        assert_eq!(lex.valence("Prosperity"), Some(3));
        assert_eq!(lex.valence("crisis"), Some(-3));
        assert_eq!(lex.valence("policy"), None);
    }

    #[test]
    fn score_sums_matches_and_defaults_to_zero() {
        let lex = Lexicon::builtin();
        assert_eq!(lex.score("Growth brings prosperity, not crisis."), 2 + 3 - 3);
        assert_eq!(lex.score("The committee met on Tuesday."), 0);
    }

    #[test]
    fn parse_reports_bad_lines() {
        let lex = Lexicon::parse("# header\ngood\t3\n\nawful phrase\t-4\n").unwrap();
        assert_eq!(lex.valence("good"), Some(3));
        assert_eq!(lex.len(), 2);
        assert_eq!(Lexicon::parse("good 3").unwrap_err().0, 1);
        assert_eq!(Lexicon::parse("ok\t1\nbad\tx").unwrap_err().0, 2);
    }

    // With n = 5 no value can sit 2 sample sds from a mean it is part of:
    // the largest reachable z-score is (n - 1) / sqrt(n) ≈ 1.79.
    #[test]
    fn full_batch_rule_cannot_flag_in_five_records() {
        let flags = sentiment_flags(&[0, 1, -1, 0, 50], OutlierRule::FullBatch);
        assert_eq!(flags, vec![true; 5]);
    }

    #[test]
    fn leave_one_out_flags_the_extreme_record() {
        let flags = sentiment_flags(&[0, 1, -1, 0, 50], OutlierRule::LeaveOneOut);
        assert_eq!(flags, vec![true, true, true, true, false]);
    }

    #[test]
    fn full_batch_flags_outlier_in_larger_batch() {
        let flags = sentiment_flags(&[0, 1, -1, 0, 0, 1, -1, 0, 0, 50], OutlierRule::FullBatch);
        let flagged: Vec<usize> = flags.iter().enumerate().filter(|(_, ok)| !**ok).map(|(i, _)| i).collect();
        assert_eq!(flagged, vec![9]);
    }

    #[test]
    fn single_record_batch_passes_by_convention() {
        assert_eq!(sentiment_flags(&[42], OutlierRule::FullBatch), vec![true]);
        assert_eq!(sentiment_flags(&[42], OutlierRule::LeaveOneOut), vec![true]);
    }

    #[test]
    fn uniform_batch_has_no_outliers() {
        assert_eq!(sentiment_flags(&[3, 3, 3], OutlierRule::FullBatch), vec![true; 3]);
        assert!(sentiment_flags(&[], OutlierRule::FullBatch).is_empty());
    }
}
