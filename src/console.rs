//! Operator-facing tables on stdout. Diagnostics go through `tracing`.

use crate::llm::TokenUsage;
use crate::report::ValidationReport;
use crate::types::{GeneratedVignette, RatingOutcome, ValidatedVignette};

pub fn print_generation(rows: &[GeneratedVignette], usage: Option<TokenUsage>) {
    println!("Generated {} vignettes", rows.len());
    println!("{:>4}  {:<20} {:>8} {:>8}  {}", "id", "policy", "declared", "actual", "in_range");
    for r in rows {
        println!(
            "{:>4}  {:<20} {:>8} {:>8}  {}",
            r.id, r.policy, r.declared_word_count, r.actual_word_count, r.in_range
        );
    }
    if let Some(u) = usage {
        println!("tokens: {} prompt + {} completion", u.prompt_tokens, u.completion_tokens);
    }
}

fn print_check(
    name: &str,
    records: &[ValidatedVignette],
    ok: impl Fn(&ValidatedVignette) -> bool,
    detail: impl Fn(&ValidatedVignette) -> String,
) {
    let failing: Vec<&ValidatedVignette> = records.iter().filter(|v| !ok(v)).collect();
    println!("{name}: {}/{} pass", records.len() - failing.len(), records.len());
    for v in failing {
        println!("  id {:>4}  {:<20} {}", v.record.id, v.record.policy, detail(v));
    }
}

pub fn print_checks(records: &[ValidatedVignette]) {
    print_check("word count [150, 175]", records, |v| v.checks.length_ok, |v| {
        format!("{} words", v.metrics.actual_word_count)
    });
    print_check("reading grade [6, 10]", records, |v| v.checks.readability_ok, |v| {
        format!("grade {:.2} (ease {:.1})", v.metrics.reading_grade, v.metrics.reading_ease)
    });
    print_check("sentiment outlier", records, |v| v.checks.sentiment_ok, |v| {
        format!("score {}", v.metrics.sentiment_score)
    });
}

pub fn print_ratings(records: &[ValidatedVignette], usage: TokenUsage) {
    print_check("llm rating", records, |v| v.llm_ok().unwrap_or(true), |v| match &v.rating {
        Some(RatingOutcome::Rated(r)) => r
            .scales()
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join(" "),
        Some(RatingOutcome::Missing { reason }) => format!("missing: {reason}"),
        None => String::new(),
    });
    let notes: Vec<(u32, &str)> = records
        .iter()
        .filter_map(|v| Some((v.record.id, v.rating.as_ref()?.rating()?.flag_note()?)))
        .collect();
    if !notes.is_empty() {
        println!("Flags for review:");
        for (id, note) in notes {
            println!("  id {id:>4}  {note}");
        }
    }
    println!("tokens: {} prompt + {} completion", usage.prompt_tokens, usage.completion_tokens);
}

pub fn print_verdict(report: &ValidationReport, records: &[ValidatedVignette]) {
    let bar = "=".repeat(60);
    println!("{bar}");
    if report.all_pass {
        println!("ALL {} VIGNETTES PASS", report.n_vignettes);
    } else {
        let failed: Vec<&ValidatedVignette> = records.iter().filter(|v| !v.all_ok()).collect();
        println!("{} OF {} VIGNETTES FAILED", failed.len(), report.n_vignettes);
        for v in failed {
            println!("  id {:>4}  {:<20} {}", v.record.id, v.record.policy, v.failed_gates().join(", "));
        }
    }
    if report.llm_rating.is_none() {
        println!("(llm rating skipped)");
    }
    println!("{bar}");
}
