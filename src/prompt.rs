//! Prompt templates with `{name}` placeholders.

use std::path::Path;

use crate::error::ConfigError;

pub const DEFAULT_GENERATION_TEMPLATE: &str = "\
You are writing short text vignettes for a survey experiment.

Write {n} distinct vignettes, one for each of these policy topics, cycling through them in order: {policies}.
Each vignette must:
- be between {min_words} and {max_words} words long;
- read at a US school grade level between {min_grade} and {max_grade} (Flesch-Kincaid);
- frame the policy in terms of its {frame};
- stay neutral in tone: no partisan language, no party or politician names, no loaded adjectives.

Return ONLY a JSON array. Each element must be an object with exactly these keys:
\"id\" (integer), \"text\" (the vignette), \"words\" (your word count of text, integer), \"policy\" (the topic label).
Do not add commentary before or after the array.";

pub const DEFAULT_RATING_TEMPLATE: &str = "\
You are auditing a survey vignette. The vignette was meant to discuss the policy \"{policy}\" using a \"{frame}\" framing.

Vignette:
\"\"\"
{text}
\"\"\"

Rate the vignette on each scale from 1 (not at all) to 7 (completely):
- economic_emphasis: how much it emphasises economic costs and benefits
- moral_emphasis: how much it emphasises moral values, fairness or duty
- policy_match: how clearly it is about the intended policy
- neutrality: how neutral and balanced its tone is
- partisan_cues: how FREE it is of partisan cues (7 = no cues at all)

Return ONLY one JSON object with integer fields economic_emphasis, moral_emphasis, policy_match, neutrality, partisan_cues
and a string field flags describing any problem a human reviewer should look at, or \"none\".";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    body: String,
}

impl PromptTemplate {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    /// Reads `path` when given, otherwise uses `default`.
    pub fn load_or(path: Option<&Path>, default: &str) -> Result<Self, ConfigError> {
        match path {
            Some(p) => std::fs::read_to_string(p)
                .map(Self::new)
                .map_err(|source| ConfigError::Unreadable {
                    what: "prompt template",
                    path: p.to_path_buf(),
                    source,
                }),
            None => Ok(Self::new(default)),
        }
    }

    /// Single pass over the template: substituted values are never re-scanned,
    /// unknown placeholders are kept verbatim.
    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        let mut out = String::with_capacity(self.body.len());
        let mut rest = self.body.as_str();
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let name_end = after.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'));
            match name_end {
                Some(end) if after[end..].starts_with('}') => {
                    let name = &after[..end];
                    match vars.iter().find(|(k, _)| *k == name) {
                        Some((_, v)) => out.push_str(v),
                        None => {
                            out.push('{');
                            out.push_str(name);
                            out.push('}');
                        }
                    }
                    rest = &after[end + 1..];
                }
                _ => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}
