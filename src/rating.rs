//! Optional LLM pass that rates framing fidelity per vignette.

use tracing::{info, warn};

use crate::config::RaterConfig;
use crate::decode::decode;
use crate::error::RatingError;
use crate::llm::{Llm, TokenUsage};
use crate::types::{LlmRating, RatingOutcome, VignetteRecord};

#[derive(Debug, Clone, Default)]
pub struct RatingPass {
    pub outcomes: Vec<(u32, RatingOutcome)>,
    pub usage: TokenUsage,
}

pub fn build_rating_prompt(cfg: &RaterConfig, record: &VignetteRecord) -> String {
    cfg.template.render(&[
        ("text", &record.text),
        ("frame", &cfg.frame),
        ("policy", &record.policy),
    ])
}

pub fn parse_rating(raw: &str) -> Result<LlmRating, RatingError> {
    let rating: LlmRating = decode(raw)?;
    for (field, value) in rating.scales() {
        if !(1..=7).contains(&value) {
            return Err(RatingError::OutOfScale { field, value });
        }
    }
    Ok(rating)
}

pub async fn rate_record(
    client: &dyn Llm,
    cfg: &RaterConfig,
    record: &VignetteRecord,
) -> Result<(LlmRating, Option<TokenUsage>), RatingError> {
    let prompt = build_rating_prompt(cfg, record);
    let reply = client.chat(&cfg.params, &prompt).await?;
    Ok((parse_rating(&reply.text)?, reply.usage))
}

/// Rates each record in turn. A failed call or unparseable reply marks only
/// that record missing.
pub async fn rate_batch(client: &dyn Llm, cfg: &RaterConfig, records: &[VignetteRecord]) -> RatingPass {
    let mut pass = RatingPass::default();
    for record in records {
        let outcome = match rate_record(client, cfg, record).await {
            Ok((rating, usage)) => {
                if let Some(u) = usage {
                    pass.usage.add(u);
                }
                RatingOutcome::Rated(rating)
            }
            Err(e) => {
                warn!(id = record.id, error = %e, "rating failed; marking missing");
                RatingOutcome::Missing { reason: e.to_string() }
            }
        };
        pass.outcomes.push((record.id, outcome));
    }
    let rated = pass.outcomes.iter().filter(|(_, o)| o.rating().is_some()).count();
    info!(rated, missing = records.len() - rated, "rating pass done");
    pass
}
