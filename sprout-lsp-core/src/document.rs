use crate::diagnostic::LintDiagnostic;
use crate::language::Language;
use crate::lint;
use anyhow::Result;
use lsp_textdocument::FullTextDocument;
use lsp_types::*;
use tracing::debug;

/// An open text document plus its cached lint results.
///
/// The editing client owns the real document; this is a synchronized
/// snapshot. Lint results are recomputed lazily after each change.
pub struct Document {
    text_document: FullTextDocument,
    uri: Url,
    language: Option<Language>,
    lint_results: Option<Vec<LintDiagnostic>>,
}

impl Document {
    pub fn new(text_document_item: TextDocumentItem) -> Self {
        let uri = text_document_item.uri.clone();
        let language = Language::from_language_id(&text_document_item.language_id);
        let text_document = FullTextDocument::new(
            text_document_item.language_id,
            text_document_item.version,
            text_document_item.text,
        );

        Self {
            text_document,
            uri,
            language,
            lint_results: None,
        }
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn version(&self) -> i32 {
        self.text_document.version()
    }

    pub fn text(&self) -> &str {
        self.text_document.get_content(None)
    }

    /// Get the language ID string of the document
    pub fn language_id(&self) -> &str {
        self.text_document.language_id()
    }

    /// The resolved language, if the id is in the supported set.
    pub fn language(&self) -> Option<Language> {
        self.language
    }

    pub fn apply_changes(&mut self, changes: Vec<TextDocumentContentChangeEvent>) -> Result<()> {
        let new_version = self.version() + 1;
        self.text_document.update(&changes, new_version);

        // Cached lint results no longer describe the text.
        self.invalidate_lint();

        Ok(())
    }

    pub fn position_to_offset(&self, position: Position) -> Option<usize> {
        Some(self.text_document.offset_at(position) as usize)
    }

    pub fn offset_to_position(&self, offset: usize) -> Option<Position> {
        Some(self.text_document.position_at(offset as u32))
    }

    /// Get the current lint diagnostics, relinting if necessary.
    pub fn lint_diagnostics(&mut self) -> &[LintDiagnostic] {
        if self.lint_results.is_none() {
            self.relint();
        }
        self.lint_results.as_deref().unwrap_or(&[])
    }

    /// Force a fresh lint pass over the current text.
    pub fn relint(&mut self) {
        let diagnostics = match self.language {
            Some(language) => lint::synthesize(self.text(), language),
            // Unsupported language id: nothing to say.
            None => Vec::new(),
        };
        debug!(
            "Lint pass for {}: {} diagnostics",
            self.uri,
            diagnostics.len()
        );
        self.lint_results = Some(diagnostics);
    }

    fn invalidate_lint(&mut self) {
        self.lint_results = None;
    }

    /// Check if the last lint pass found anything
    pub fn has_lint_errors(&mut self) -> bool {
        !self.lint_diagnostics().is_empty()
    }

    /// Get the size in bytes of the document
    pub fn size(&self) -> usize {
        self.text().len()
    }
}
