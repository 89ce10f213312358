//! Run configuration shared by the CLI and the library entry points.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::llm::openai::LlmClient;
use crate::llm::ChatParams;
use crate::prompt::PromptTemplate;
use crate::sentiment::{Lexicon, OutlierRule};

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_FRAME: &str = "economic benefits";

/// Fixed file names under the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    dir: PathBuf,
}

impl OutputPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn generated_csv(&self) -> PathBuf {
        self.dir.join("vignettes.csv")
    }

    pub fn generated_json(&self) -> PathBuf {
        self.dir.join("vignettes.json")
    }

    pub fn validated_csv(&self) -> PathBuf {
        self.dir.join("vignettes_validated.csv")
    }

    pub fn report_json(&self) -> PathBuf {
        self.dir.join("validation_report.json")
    }
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub params: ChatParams,
    pub template: PromptTemplate,
    pub count: usize,
    pub frame: String,
    pub policies: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RaterConfig {
    pub params: ChatParams,
    pub template: PromptTemplate,
    pub frame: String,
}

#[derive(Debug, Clone, Default)]
pub struct ValidatorConfig {
    pub lexicon: Option<Lexicon>, // None = built-in lexicon
    pub outlier_rule: OutlierRule,
}

impl ValidatorConfig {
    pub fn lexicon(&self) -> &Lexicon {
        self.lexicon.as_ref().unwrap_or_else(|| Lexicon::builtin())
    }
}

/// Blank keys count as absent.
pub fn credential(api_key: Option<String>) -> Option<String> {
    api_key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty())
}

/// Client for stages that cannot run without the service.
pub fn require_client(api_key: Option<String>, base_url: Option<String>) -> Result<LlmClient, ConfigError> {
    let key = credential(api_key).ok_or(ConfigError::MissingCredential)?;
    Ok(LlmClient::new(base_url, key))
}

/// Client for optional stages; `None` means the stage is skipped.
pub fn optional_client(api_key: Option<String>, base_url: Option<String>) -> Option<LlmClient> {
    credential(api_key).map(|key| LlmClient::new(base_url, key))
}
