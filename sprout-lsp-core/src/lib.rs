pub mod advice;
pub mod assistant;
pub mod diagnostic;
pub mod document;
pub mod fix;
pub mod language;
pub mod lint;
pub mod runner;
pub mod storage;
pub mod workspace;

pub use advice::{explain, Advice};
pub use assistant::CommandAssistant;
pub use diagnostic::{lint_diagnostics_to_lsp, LintDiagnostic, Severity};
pub use document::Document;
pub use fix::{suggest_fix, EditDescriptor};
pub use language::Language;
pub use lint::synthesize;
pub use runner::{CodeRunner, ExecutionOutcome, ExecutionStatus};
pub use storage::{FileStore, StoredFile};
pub use workspace::Workspace;
