use lsp_types::{Position, Range};
use serde::{Deserialize, Serialize};

/// Severity levels for synthesized diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A positional diagnostic produced by the heuristic linter.
///
/// Lines and columns are 1-based, matching the positions the editing client
/// displays. Invariant: `end_line >= start_line`, and when the lines are
/// equal, `end_column >= start_column`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintDiagnostic {
    pub severity: Severity,
    pub message: String,
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl LintDiagnostic {
    /// Construct an error diagnostic spanning a single line.
    pub fn error_on_line(
        message: impl Into<String>,
        line: u32,
        start_column: u32,
        end_column: u32,
    ) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            start_line: line,
            start_column,
            end_line: line,
            end_column,
        }
    }

    /// Convert the 1-based span to a 0-based LSP range.
    pub fn range(&self) -> Range {
        Range {
            start: Position {
                line: self.start_line.saturating_sub(1),
                character: self.start_column.saturating_sub(1),
            },
            end: Position {
                line: self.end_line.saturating_sub(1),
                character: self.end_column.saturating_sub(1),
            },
        }
    }
}

/// Convert lint diagnostics to LSP diagnostics.
///
/// Preserves the synthesizer's ordering; no de-duplication happens here.
pub fn lint_diagnostics_to_lsp(diagnostics: &[LintDiagnostic]) -> Vec<lsp_types::Diagnostic> {
    diagnostics.iter().map(lint_diagnostic_to_lsp).collect()
}

/// Convert a single lint diagnostic to an LSP diagnostic
fn lint_diagnostic_to_lsp(diagnostic: &LintDiagnostic) -> lsp_types::Diagnostic {
    let severity = match diagnostic.severity {
        Severity::Error => Some(lsp_types::DiagnosticSeverity::ERROR),
        Severity::Warning => Some(lsp_types::DiagnosticSeverity::WARNING),
    };

    lsp_types::Diagnostic {
        range: diagnostic.range(),
        severity,
        code: None,
        code_description: None,
        source: Some("sprout".to_string()),
        message: diagnostic.message.clone(),
        related_information: None,
        tags: None,
        data: None,
    }
}
