//! Consumes an `Explanation` and emits text, JSON, or YAML (§4.8). Never
//! reorders arrays or recomputes confidence; `confidence` is always
//! rendered to three decimal places regardless of format.

use kubediag_types::Explanation;

/// Output format selected by the CLI's `--output` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, tree-like summary.
    Text,
    /// Pretty-printed JSON.
    Json,
    /// YAML.
    Yaml,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Text
    }
}

/// Render an `Explanation` in the requested format. JSON/YAML render the
/// value as-is (field order is the struct's declared order, so neither
/// format reorders arrays); text renders a hand-built tree.
pub fn render(explanation: &Explanation, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => render_text(explanation),
        OutputFormat::Json => serde_json::to_string_pretty(explanation).expect("Explanation always serializes"),
        OutputFormat::Yaml => serde_yaml::to_string(explanation).expect("Explanation always serializes"),
    }
}

fn render_text(explanation: &Explanation) -> String {
    let mut out = String::new();
    use std::fmt::Write as _;

    match &explanation.root_cause {
        Some(cause) => {
            let _ = writeln!(out, "Root cause: {} ({})", cause.kind, cause.involved_object);
            let _ = writeln!(out, "  {}", cause.message);
        }
        None => {
            let _ = writeln!(out, "Root cause: none identified");
        }
    }
    let _ = writeln!(out, "Confidence: {:.3}", explanation.confidence);

    if !explanation.causal_chain.contributing.is_empty() {
        let _ = writeln!(out, "\nContributing:");
        for cause in &explanation.causal_chain.contributing {
            let _ = writeln!(out, "  - {} ({})", cause.kind, cause.involved_object);
        }
    }

    if !explanation.causal_chain.symptoms.is_empty() {
        let _ = writeln!(out, "\nSymptoms:");
        for cause in &explanation.causal_chain.symptoms {
            let _ = writeln!(out, "  - {} ({})", cause.kind, cause.involved_object);
        }
    }

    if !explanation.evidence.is_empty() {
        let _ = writeln!(out, "\nEvidence:");
        for ev in &explanation.evidence {
            let _ = writeln!(out, "  - [{:?}] {}: {}", ev.source, ev.locator, ev.snippet);
        }
    }

    if !explanation.suppressed_rules.is_empty() {
        let _ = writeln!(out, "\nSuppressed rules:");
        for s in &explanation.suppressed_rules {
            let _ = writeln!(out, "  - {} ({})", s.name, s.reason);
        }
    }

    if !explanation.suggested_next_checks.is_empty() {
        let _ = writeln!(out, "\nSuggested next checks:");
        for check in &explanation.suggested_next_checks {
            let _ = writeln!(out, "  - {check}");
        }
    }

    let _ = writeln!(
        out,
        "\nEngine: v{}, rules evaluated {}, matched {}",
        explanation.metadata.engine_version, explanation.metadata.rules_evaluated, explanation.metadata.rules_matched
    );
    if let Some(error) = &explanation.metadata.error {
        let _ = writeln!(out, "Error: {error}");
    }

    out
}
