//! Plain-text rendering of interaction results

use mmd_core::pipeline::{InteractionStatus, SummaryOutcome};
use mmd_core::{InteractionReport, MetricsReport, Summary, SummaryStats, Translation};
use std::fmt::Write;

pub fn translation(translation: &Translation) -> String {
    let mut out = String::new();
    if let Some(source) = &translation.source_language {
        let _ = writeln!(out, "Detected language: {}", source);
    }
    let _ = writeln!(out, "Translated Text ({}):", translation.selector);
    let _ = write!(out, "{}", translation.text);
    out
}

pub fn summary(summary: &Summary) -> String {
    let mut out = String::new();
    if let Some(truncation) = &summary.truncation {
        let _ = writeln!(out, "Warning: {}", truncation.notice);
    }
    let _ = writeln!(out, "Summary:");
    let _ = write!(out, "{}", summary.text);
    out
}

pub fn summary_outcome(outcome: &SummaryOutcome) -> String {
    match outcome {
        SummaryOutcome::Summarized(s) => summary(s),
        SummaryOutcome::Unavailable { message } => message.clone(),
    }
}

pub fn stats(stats: &SummaryStats) -> String {
    format!(
        "Original Text Length: {} words\nSummary Length: {} words\nCompression Ratio: {:.2}",
        stats.original_words, stats.summary_words, stats.compression_ratio
    )
}

pub fn metrics(metrics: &MetricsReport) -> String {
    let mut out = String::from("Evaluation:");
    for (name, value) in metrics.entries() {
        let _ = write!(out, "\n  {}: {:.4}", name, value);
    }
    out
}

/// Every section of a finished interaction, separated by blank lines
pub fn report(report: &InteractionReport) -> String {
    if report.status == InteractionStatus::EmptyInput {
        return report.notices.join("\n");
    }

    let mut sections = Vec::new();
    if let Some(t) = &report.translation {
        sections.push(translation(t));
    }
    match &report.summary {
        Some(s) => sections.push(summary(s)),
        None => sections.extend(report.notices.iter().cloned()),
    }
    if let Some(s) = &report.stats {
        sections.push(stats(s));
    }
    if let Some(m) = &report.metrics {
        sections.push(metrics(m));
    }
    if report.status == InteractionStatus::EvaluationFailed {
        if let Some(error) = report.notices.last() {
            sections.push(error.clone());
        }
    }
    sections.join("\n\n")
}
