use serde::{Deserialize, Serialize};

/// One generated stimulus text, as the rest of the pipeline sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VignetteRecord {
    pub id: u32,
    pub text: String,
    pub policy: String,
    pub declared_word_count: u32, // model's own estimate, advisory only
}

/// Row written by the generator to `vignettes.csv` / `vignettes.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedVignette {
    pub id: u32,
    pub text: String,
    pub declared_word_count: u32,
    pub policy: String,
    pub actual_word_count: u32,
    pub word_diff: i64, // actual - declared
    pub in_range: bool,
}

impl GeneratedVignette {
    pub fn record(&self) -> VignetteRecord {
        VignetteRecord {
            id: self.id,
            text: self.text.clone(),
            policy: self.policy.clone(),
            declared_word_count: self.declared_word_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextMetrics {
    pub actual_word_count: u32,
    pub sentence_count: u32,
    pub syllable_count: u32,
    pub reading_grade: f64,
    pub reading_ease: f64,
    pub sentiment_score: i32, // 0 when no lexicon word matched
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicChecks {
    pub length_ok: bool,
    pub readability_ok: bool,
    pub sentiment_ok: bool,
}

impl BasicChecks {
    pub fn basic_ok(&self) -> bool {
        self.length_ok && self.readability_ok && self.sentiment_ok
    }
}

/// Subjective 1-7 ratings returned by the rating model for one vignette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmRating {
    pub economic_emphasis: u8,
    pub moral_emphasis: u8,
    pub policy_match: u8,
    pub neutrality: u8,
    pub partisan_cues: u8,
    #[serde(default)]
    pub flags: String,
}

impl LlmRating {
    pub fn scales(&self) -> [(&'static str, u8); 5] {
        [
            ("economic_emphasis", self.economic_emphasis),
            ("moral_emphasis", self.moral_emphasis),
            ("policy_match", self.policy_match),
            ("neutrality", self.neutrality),
            ("partisan_cues", self.partisan_cues),
        ]
    }

    pub fn passes(&self) -> bool {
        self.economic_emphasis >= 5
            && self.moral_emphasis <= 4
            && self.policy_match >= 5
            && self.neutrality >= 5
            && self.partisan_cues >= 5
    }

    /// Reviewer-facing note, if the model left one.
    pub fn flag_note(&self) -> Option<&str> {
        let note = self.flags.trim();
        if note.is_empty() || note.eq_ignore_ascii_case("none") {
            None
        } else {
            Some(note)
        }
    }
}

/// Result of rating one record. `Missing` is kept as data so a single bad
/// call never aborts the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RatingOutcome {
    Rated(LlmRating),
    Missing { reason: String },
}

impl RatingOutcome {
    pub fn rating(&self) -> Option<&LlmRating> {
        match self {
            RatingOutcome::Rated(r) => Some(r),
            RatingOutcome::Missing { .. } => None,
        }
    }
}

/// A record after the validator (and optionally the rater) has run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedVignette {
    pub record: VignetteRecord,
    pub metrics: TextMetrics,
    pub checks: BasicChecks,
    /// `None` when the rating stage was skipped.
    pub rating: Option<RatingOutcome>,
}

impl ValidatedVignette {
    /// `None` = not applicable (stage skipped). Missing ratings count as not passing.
    pub fn llm_ok(&self) -> Option<bool> {
        self.rating
            .as_ref()
            .map(|o| o.rating().map(LlmRating::passes).unwrap_or(false))
    }

    pub fn all_ok(&self) -> bool {
        self.checks.basic_ok() && self.llm_ok().unwrap_or(true)
    }

    /// Names of the gates this record failed, in report order.
    pub fn failed_gates(&self) -> Vec<&'static str> {
        let mut gates = Vec::new();
        if !self.checks.length_ok {
            gates.push("word_count");
        }
        if !self.checks.readability_ok {
            gates.push("reading_level");
        }
        if !self.checks.sentiment_ok {
            gates.push("sentiment");
        }
        match &self.rating {
            Some(RatingOutcome::Missing { .. }) => gates.push("llm_rating(missing)"),
            Some(RatingOutcome::Rated(r)) if !r.passes() => gates.push("llm_rating"),
            _ => {}
        }
        gates
    }
}
