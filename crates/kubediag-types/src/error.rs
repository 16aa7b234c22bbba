use thiserror::Error;

/// Errors the diagnostic engine can surface. Corresponds 1:1 to the
/// error kinds enumerated in §7 of the specification.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiagnosticError {
    /// Required object missing or structurally malformed. Fails the
    /// invocation; the caller receives an `Explanation` with
    /// `root_cause = null`, `confidence = 0`, and `metadata.error` set to
    /// this error's `Display` text.
    #[error("InputInvalid: {0}")]
    InputInvalid(String),

    /// Discovered at registry construction time. Fails engine
    /// construction, not invocation.
    #[error("RuleMalformed: rule {rule_name} — {detail}")]
    RuleMalformed { rule_name: String, detail: String },

    /// Two rules in the registry declared the same name.
    #[error("RuleMalformed: duplicate rule name {0}")]
    DuplicateRuleName(String),
}
