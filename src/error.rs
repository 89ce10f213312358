//! Error types for each pipeline stage.

use std::io;
use std::path::PathBuf;

/// Problems with the run configuration, detected before any request is made.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no API key configured: set OPENAI_API_KEY or pass --api-key")]
    MissingCredential,

    #[error("cannot read {what} {path}: {source}")]
    Unreadable {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("lexicon {path} line {line}: {reason}")]
    LexiconLine { path: PathBuf, line: usize, reason: String },
}

/// Failure talking to the text-generation service.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("service returned an error: {message}")]
    Service { message: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("service returned no choices")]
    NoChoices,
}

/// Two-step decode of a JSON payload that may arrive inside a markdown fence.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("reply was empty")]
    Empty,

    #[error("no fenced block or bare JSON found in reply")]
    NoPayload { raw: String },

    #[error("opening code fence is never closed")]
    UnterminatedFence { raw: String },

    #[error("reply content is not the expected JSON: {source}")]
    InvalidJson {
        raw: String,
        #[source]
        source: serde_json::Error,
    },
}

impl DecodeError {
    /// The untouched service text, for operator diagnosis.
    pub fn raw(&self) -> Option<&str> {
        match self {
            DecodeError::Empty => None,
            DecodeError::NoPayload { raw }
            | DecodeError::UnterminatedFence { raw }
            | DecodeError::InvalidJson { raw, .. } => Some(raw),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("csv error on {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("json error on {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("generation request failed: {0}")]
    Service(#[from] LlmError),

    #[error("could not parse generated vignettes: {0}")]
    Decode(#[from] DecodeError),

    #[error("service returned an empty vignette array")]
    EmptyBatch,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, thiserror::Error)]
pub enum ValidateError {
    #[error("vignette file {path} not found; run the generator first")]
    MissingInput { path: PathBuf },

    #[error("duplicate vignette id {0} in input")]
    DuplicateId(u32),

    #[error("input contains no vignettes")]
    EmptyBatch,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Per-record rating failure. Contained by the rating driver, never fatal.
#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    #[error(transparent)]
    Service(#[from] LlmError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("{field} = {value} is outside the 1-7 scale")]
    OutOfScale { field: &'static str, value: u8 },
}
