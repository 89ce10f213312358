use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
    Client,
};
use tracing::debug;

use super::{ChatParams, Completion, Llm, TokenUsage};
use crate::error::LlmError;

/// Client for any OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct LlmClient {
    client: Client<OpenAIConfig>,
}

impl LlmClient {
    pub fn new(base_url: Option<String>, api_key: String) -> Self {
        let mut cfg = OpenAIConfig::default().with_api_key(api_key);
        if let Some(url) = base_url {
            cfg = cfg.with_api_base(url);
        }
        Self { client: Client::with_config(cfg) }
    }
}

fn map_err(e: OpenAIError) -> LlmError {
    match e {
        OpenAIError::ApiError(api) => LlmError::Service { message: api.message },
        other => LlmError::Transport(other.to_string()),
    }
}

#[async_trait::async_trait]
impl Llm for LlmClient {
    async fn chat(&self, params: &ChatParams, prompt: &str) -> Result<Completion, LlmError> {
        let message: ChatCompletionRequestMessage = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt.to_string())
            .build()
            .map_err(map_err)?
            .into();

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(params.model.as_str())
            .messages(vec![message])
            .temperature(params.temperature);
        if let Some(n) = params.max_tokens {
            args.max_tokens(n);
        }
        let request = args.build().map_err(map_err)?;

        debug!(model = %params.model, prompt_chars = prompt.len(), "chat request");
        let resp = self.client.chat().create(request).await.map_err(map_err)?;

        let usage = resp.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });
        let choice = resp.choices.into_iter().next().ok_or(LlmError::NoChoices)?;
        let text = choice.message.content.unwrap_or_default();
        if let Some(u) = usage {
            debug!(prompt_tokens = u.prompt_tokens, completion_tokens = u.completion_tokens, "chat usage");
        }
        Ok(Completion { text, usage })
    }
}
