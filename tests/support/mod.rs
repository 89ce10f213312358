#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use vignette_check::error::LlmError;
use vignette_check::llm::{ChatParams, Completion, Llm, TokenUsage};

/// Fake service: `handler` gets the zero-based call index and the prompt.
pub struct FakeLlm {
    pub handler: Box<dyn Fn(usize, &str) -> Result<String, LlmError> + Send + Sync>,
    pub calls: AtomicUsize,
}

impl FakeLlm {
    pub fn new(handler: impl Fn(usize, &str) -> Result<String, LlmError> + Send + Sync + 'static) -> Self {
        Self { handler: Box::new(handler), calls: AtomicUsize::new(0) }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Llm for FakeLlm {
    async fn chat(&self, _params: &ChatParams, prompt: &str) -> Result<Completion, LlmError> {
        let idx = self.calls.fetch_add(1, Ordering::SeqCst);
        let text = (self.handler)(idx, prompt)?;
        Ok(Completion {
            text,
            usage: Some(TokenUsage { prompt_tokens: 10, completion_tokens: 5, total_tokens: 15 }),
        })
    }
}

const SENTENCE: [&str; 18] = [
    "local", "workers", "build", "new", "homes", "and", "small", "shops", "in", "the", "town", "which", "helps",
    "families", "save", "money", "every", "year",
];

/// Plain prose of exactly `n` words, in capitalised sentences of 18 words.
pub fn text_of_words(n: usize) -> String {
    let mut out = String::new();
    for i in 0..n {
        if i > 0 {
            out.push(' ');
        }
        let word = SENTENCE[i % SENTENCE.len()];
        if i % SENTENCE.len() == 0 {
            // sentence breaks need an uppercase start
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        } else {
            out.push_str(word);
        }
        if (i + 1) % SENTENCE.len() == 0 || i + 1 == n {
            out.push('.');
        }
    }
    out
}

/// Generation reply carrying one vignette per entry of `(words, declared, policy)`.
pub fn generation_reply(items: &[(usize, u32, &str)]) -> String {
    let arr: Vec<serde_json::Value> = items
        .iter()
        .enumerate()
        .map(|(i, (n, declared, policy))| {
            serde_json::json!({ "id": i + 1, "text": text_of_words(*n), "words": declared, "policy": policy })
        })
        .collect();
    format!("```json\n{}\n```", serde_json::to_string_pretty(&arr).unwrap_or_default())
}

pub const GOOD_RATING: &str = r#"{"economic_emphasis": 6, "moral_emphasis": 2, "policy_match": 6, "neutrality": 6, "partisan_cues": 7, "flags": "none"}"#;
