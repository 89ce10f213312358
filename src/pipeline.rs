//! Stage drivers: call the service, persist, print.

use tracing::info;

use crate::config::{GeneratorConfig, OutputPaths, RaterConfig, ValidatorConfig};
use crate::console;
use crate::error::{GenerateError, ValidateError};
use crate::generator::generate;
use crate::llm::Llm;
use crate::rating::rate_batch;
use crate::report::{assemble, ValidationReport};
use crate::store;
use crate::types::{GeneratedVignette, ValidatedVignette, VignetteRecord};
use crate::validation::{attach_ratings, validate_batch};

pub async fn run_generate(
    client: &dyn Llm,
    cfg: &GeneratorConfig,
    paths: &OutputPaths,
) -> Result<Vec<GeneratedVignette>, GenerateError> {
    let outcome = generate(client, cfg).await?;
    store::write_generated(paths, &outcome.vignettes)?;
    console::print_generation(&outcome.vignettes, outcome.usage);
    Ok(outcome.vignettes)
}

#[derive(Debug, Clone)]
pub struct ValidationRun {
    pub records: Vec<ValidatedVignette>,
    pub report: ValidationReport,
}

/// Reads the generator's JSON output, runs the checks (and the rater when a
/// client is given), then writes the annotated CSV and the report.
pub async fn run_validate(
    rater: Option<(&dyn Llm, &RaterConfig)>,
    cfg: &ValidatorConfig,
    paths: &OutputPaths,
) -> Result<ValidationRun, ValidateError> {
    let input = paths.generated_json();
    if !input.exists() {
        return Err(ValidateError::MissingInput { path: input });
    }
    let records: Vec<VignetteRecord> = store::read_generated(&input)?
        .iter()
        .map(GeneratedVignette::record)
        .collect();
    info!(path = %input.display(), records = records.len(), "validating");

    let mut validated = validate_batch(records.clone(), cfg)?;
    console::print_checks(&validated);

    match rater {
        Some((client, rater_cfg)) => {
            let pass = rate_batch(client, rater_cfg, &records).await;
            attach_ratings(&mut validated, pass.outcomes);
            console::print_ratings(&validated, pass.usage);
        }
        None => info!("llm rating skipped"),
    }

    let report = assemble(&validated, cfg.outlier_rule);
    store::write_validated(paths, &validated, &report)?;
    console::print_verdict(&report, &validated);
    Ok(ValidationRun { records: validated, report })
}
