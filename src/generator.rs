//! Builds the generation prompt, calls the service once for the whole batch
//! and turns the reply into vignette rows.

use serde::Deserialize;
use tracing::{error, info};

use crate::config::GeneratorConfig;
use crate::decode::decode;
use crate::error::GenerateError;
use crate::llm::{Llm, TokenUsage};
use crate::segments::count_words;
use crate::types::GeneratedVignette;
use crate::validation::{GRADE_BAND, WORD_BAND};

/// Element of the array the service is asked to return. Any `id` it sends is
/// ignored; ids are assigned from array position.
#[derive(Debug, Deserialize)]
struct ServiceVignette {
    text: String,
    words: u32,
    policy: String,
}

#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub vignettes: Vec<GeneratedVignette>,
    pub usage: Option<TokenUsage>,
}

pub fn build_prompt(cfg: &GeneratorConfig) -> String {
    let n = cfg.count.to_string();
    let policies = cfg.policies.join(", ");
    let min_words = (WORD_BAND.min as u32).to_string();
    let max_words = (WORD_BAND.max as u32).to_string();
    let min_grade = GRADE_BAND.min.to_string();
    let max_grade = GRADE_BAND.max.to_string();
    cfg.template.render(&[
        ("n", &n),
        ("frame", &cfg.frame),
        ("policies", &policies),
        ("min_words", &min_words),
        ("max_words", &max_words),
        ("min_grade", &min_grade),
        ("max_grade", &max_grade),
    ])
}

/// Strict parse of the service reply into rows with recomputed word counts.
pub fn parse_batch(raw: &str) -> Result<Vec<GeneratedVignette>, GenerateError> {
    let items: Vec<ServiceVignette> = decode(raw)?;
    if items.is_empty() {
        return Err(GenerateError::EmptyBatch);
    }
    Ok(items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            let actual = count_words(&item.text);
            GeneratedVignette {
                id: idx as u32 + 1,
                declared_word_count: item.words,
                policy: item.policy,
                actual_word_count: actual,
                word_diff: i64::from(actual) - i64::from(item.words),
                in_range: WORD_BAND.contains(f64::from(actual)),
                text: item.text,
            }
        })
        .collect())
}

pub async fn generate(client: &dyn Llm, cfg: &GeneratorConfig) -> Result<GenerationOutcome, GenerateError> {
    let prompt = build_prompt(cfg);
    info!(model = %cfg.params.model, count = cfg.count, frame = %cfg.frame, "requesting vignettes");
    let reply = client.chat(&cfg.params, &prompt).await?;
    let vignettes = parse_batch(&reply.text).map_err(|e| {
        if let GenerateError::Decode(d) = &e {
            error!(raw = d.raw().unwrap_or_default(), "unparseable generation reply");
        }
        e
    })?;
    info!(generated = vignettes.len(), "vignettes parsed");
    Ok(GenerationOutcome { vignettes, usage: reply.usage })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DecodeError, LlmError};
    use crate::llm::{ChatParams, Completion};
    use crate::prompt::{PromptTemplate, DEFAULT_GENERATION_TEMPLATE};

    struct FixedReply(Result<&'static str, &'static str>);

    #[async_trait::async_trait]
    impl Llm for FixedReply {
        async fn chat(&self, _params: &ChatParams, _prompt: &str) -> Result<Completion, LlmError> {
            match self.0 {
                Ok(text) => Ok(Completion { text: text.into(), usage: None }),
                Err(msg) => Err(LlmError::Service { message: msg.into() }),
            }
        }
    }

    fn cfg() -> GeneratorConfig {
        GeneratorConfig {
            params: ChatParams { model: "test-model".into(), temperature: 0.7, max_tokens: Some(4000) },
            template: PromptTemplate::new(DEFAULT_GENERATION_TEMPLATE),
            count: 3,
            frame: "economic benefits".into(),
            policies: vec!["immigration".into(), "healthcare".into()],
        }
    }

    #[test]
    fn prompt_carries_targets() {
        let p = build_prompt(&cfg());
        assert!(p.contains("Write 3 distinct vignettes"));
        assert!(p.contains("immigration, healthcare"));
        assert!(p.contains("between 150 and 175 words"));
        assert!(p.contains("between 6 and 10"));
        assert!(p.contains("economic benefits"));
    }

    #[test]
    fn recomputes_word_count_and_assigns_ids() {
        let raw = r#"```json
[{"id": 9, "text": "It's a well-known fact.", "words": 40, "policy": "tax"},
 {"id": 9, "text": "Short one.", "words": 2, "policy": "housing"}]
```"#;
        let rows = parse_batch(raw).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].id, rows[1].id), (1, 2));
        assert_eq!(rows[0].actual_word_count, 5);
        assert_eq!(rows[0].declared_word_count, 40);
        assert_eq!(rows[0].word_diff, -35);
        assert!(!rows[0].in_range);
        assert_eq!(rows[1].policy, "housing");
    }

    #[test]
    fn empty_array_is_rejected() {
        assert!(matches!(parse_batch("[]"), Err(GenerateError::EmptyBatch)));
    }

    #[test]
    fn missing_field_is_parse_error_with_raw_text() {
        let raw = r#"[{"text": "no policy", "words": 2}]"#;
        match parse_batch(raw) {
            Err(GenerateError::Decode(e @ DecodeError::InvalidJson { .. })) => assert_eq!(e.raw(), Some(raw)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn service_error_aborts_generation() {
        let err = generate(&FixedReply(Err("status 429")), &cfg()).await.unwrap_err();
        assert!(matches!(err, GenerateError::Service(LlmError::Service { .. })));
    }

    #[tokio::test]
    async fn prose_reply_aborts_generation() {
        let err = generate(&FixedReply(Ok("I'm sorry, I can't do that.")), &cfg()).await.unwrap_err();
        assert!(matches!(err, GenerateError::Decode(DecodeError::NoPayload { .. })));
    }
}
