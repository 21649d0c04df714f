use crate::diagnostic::lint_diagnostics_to_lsp;
use crate::Document;
use anyhow::Result;
use lru::LruCache;
use lsp_types::*;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use tracing::{info, warn};

const DEFAULT_CACHE_SIZE: usize = 100;

pub struct Workspace {
    root_uri: Option<Url>,
    documents: HashMap<Url, Document>,
    recently_accessed: LruCache<Url, ()>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            root_uri: None,
            documents: HashMap::new(),
            recently_accessed: LruCache::new(NonZeroUsize::new(capacity.max(1)).unwrap()),
        }
    }

    pub fn set_root(&mut self, root_uri: Url) {
        info!("Setting workspace root: {}", root_uri);
        self.root_uri = Some(root_uri);
    }

    pub fn open_document(&mut self, text_document: TextDocumentItem) -> Result<()> {
        let uri = text_document.uri.clone();
        info!("Opening document: {}", uri);

        let mut document = Document::new(text_document);

        // Trigger initial lint pass
        document.relint();

        // Evict old documents if cache is at capacity
        self.evict_if_needed();

        // Insert document and update LRU cache
        self.documents.insert(uri.clone(), document);
        self.recently_accessed.put(uri, ());

        Ok(())
    }

    pub fn update_document(&mut self, params: DidChangeTextDocumentParams) -> Result<()> {
        let uri = params.text_document.uri.clone();

        if let Some(document) = self.documents.get_mut(&uri) {
            // Verify version matches or is newer
            if params.text_document.version < document.version() {
                warn!(
                    "Received older version for document {}: {} < {}",
                    uri,
                    params.text_document.version,
                    document.version()
                );
                return Ok(());
            }

            // Apply changes
            document.apply_changes(params.content_changes)?;

            // Update access time
            self.recently_accessed.put(uri.clone(), ());

            info!("Updated document: {} (version {})", uri, document.version());
        } else {
            warn!("Attempted to update non-existent document: {}", uri);
        }

        Ok(())
    }

    pub fn close_document(&mut self, uri: Url) -> Result<()> {
        info!("Closing document: {}", uri);

        self.documents.remove(&uri);
        self.recently_accessed.pop(&uri);

        Ok(())
    }

    pub fn get_document(&mut self, uri: &Url) -> Option<&mut Document> {
        if self.documents.contains_key(uri) {
            // Update access time
            self.recently_accessed.put(uri.clone(), ());
            self.documents.get_mut(uri)
        } else {
            None
        }
    }

    pub fn get_document_readonly(&self, uri: &Url) -> Option<&Document> {
        self.documents.get(uri)
    }

    /// Publish-ready LSP diagnostics for a document; empty if it is not open.
    pub fn diagnostics_for(&mut self, uri: &Url) -> Vec<Diagnostic> {
        match self.documents.get_mut(uri) {
            Some(document) => {
                self.recently_accessed.put(uri.clone(), ());
                lint_diagnostics_to_lsp(document.lint_diagnostics())
            }
            None => Vec::new(),
        }
    }

    /// Evict least recently used documents if we're at capacity
    fn evict_if_needed(&mut self) {
        while self.documents.len() >= self.recently_accessed.cap().get() {
            if let Some((uri_to_evict, _)) = self.recently_accessed.pop_lru() {
                info!("Evicting document from cache: {}", uri_to_evict);
                self.documents.remove(&uri_to_evict);
            } else {
                break;
            }
        }
    }

    /// Get workspace statistics
    pub fn stats(&self) -> WorkspaceStats {
        WorkspaceStats {
            document_count: self.documents.len(),
            cache_capacity: self.recently_accessed.cap().get(),
            root_uri: self.root_uri.clone(),
        }
    }

    /// Get all open document URIs
    pub fn open_documents(&self) -> Vec<&Url> {
        self.documents.keys().collect()
    }

    /// Check if document is open
    pub fn is_document_open(&self, uri: &Url) -> bool {
        self.documents.contains_key(uri)
    }

    /// Force a fresh lint pass on a document
    pub fn relint_document(&mut self, uri: &Url) -> Result<()> {
        if let Some(document) = self.documents.get_mut(uri) {
            document.relint();
            self.recently_accessed.put(uri.clone(), ());
        }
        Ok(())
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct WorkspaceStats {
    pub document_count: usize,
    pub cache_capacity: usize,
    pub root_uri: Option<Url>,
}
