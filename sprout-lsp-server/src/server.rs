use lsp_types::*;
use sprout_lsp_core::{CodeRunner, CommandAssistant, FileStore, Workspace};
use sprout_lsp_protocol::handlers::{self, Handlers};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tower_lsp::jsonrpc::Result;
use tower_lsp::{Client, LanguageServer};
use tracing::{error, info, warn};

/// Server configuration assembled from CLI flags and environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Delay between a change event and the lint pass it triggers
    pub debounce: Duration,
    /// Maximum number of documents kept open in memory
    pub cache_capacity: usize,
    /// Explicit runner path; probed from PATH when absent
    pub runner_path: Option<PathBuf>,
    /// Command answering assistant requests
    pub assistant_command: PathBuf,
    /// Directory holding learner files
    pub files_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            cache_capacity: 100,
            runner_path: None,
            assistant_command: PathBuf::from("sprout-assistant"),
            files_dir: PathBuf::from("user_files"),
        }
    }
}

/// One pending task per document. Rescheduling aborts the prior task, so
/// only the last scheduled pass runs (last-write-wins).
struct PendingLints {
    tasks: Mutex<HashMap<Url, JoinHandle<()>>>,
}

impl PendingLints {
    fn new() -> Self {
        Self {
            tasks: Mutex::new(HashMap::new()),
        }
    }

    async fn reschedule(&self, uri: Url, handle: JoinHandle<()>) {
        let mut tasks = self.tasks.lock().await;
        if let Some(previous) = tasks.insert(uri, handle) {
            previous.abort();
        }
    }

    async fn cancel(&self, uri: &Url) {
        if let Some(handle) = self.tasks.lock().await.remove(uri) {
            handle.abort();
        }
    }
}

pub struct SproutLanguageServer {
    client: Client,
    workspace: Arc<RwLock<Workspace>>,
    handlers: Handlers,
    debounce: Duration,
    pending_lints: PendingLints,
}

impl SproutLanguageServer {
    pub fn new(client: Client, config: ServerConfig) -> Self {
        info!("Initializing language server");

        let workspace = Arc::new(RwLock::new(Workspace::with_capacity(config.cache_capacity)));

        // Diagnostics keep working without the execution collaborator.
        let runner = match CodeRunner::new(config.runner_path) {
            Ok(runner) => Some(runner),
            Err(e) => {
                warn!("Code execution disabled: {}", e);
                None
            }
        };

        let handlers = Handlers::new(
            workspace.clone(),
            runner,
            CommandAssistant::new(config.assistant_command),
            FileStore::new(config.files_dir),
        );

        info!("Language server initialization complete");
        Self {
            client,
            workspace,
            handlers,
            debounce: config.debounce,
            pending_lints: PendingLints::new(),
        }
    }

    /// Lint and publish immediately, bypassing the debounce.
    async fn publish_now(&self, uri: Url) {
        let diagnostics = self.workspace.write().await.diagnostics_for(&uri);
        info!("Found {} diagnostics for document: {}", diagnostics.len(), uri);
        self.client.publish_diagnostics(uri, diagnostics, None).await;
    }

    /// Schedule a debounced lint pass, cancelling any pass already pending
    /// for this document.
    async fn schedule_lint(&self, uri: Url) {
        let client = self.client.clone();
        let workspace = self.workspace.clone();
        let delay = self.debounce;
        let task_uri = uri.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let diagnostics = workspace.write().await.diagnostics_for(&task_uri);
            info!(
                "Publishing {} diagnostics for changed document: {}",
                diagnostics.len(),
                task_uri
            );
            client.publish_diagnostics(task_uri, diagnostics, None).await;
        });
        self.pending_lints.reschedule(uri, handle).await;
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for SproutLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        info!("Initialize request received");

        // Set workspace root
        if let Some(root_uri) = params.root_uri {
            let mut workspace = self.workspace.write().await;
            workspace.set_root(root_uri);
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::INCREMENTAL,
                )),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                code_action_provider: Some(CodeActionProviderCapability::Simple(true)),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: handlers::supported_commands(),
                    work_done_progress_options: WorkDoneProgressOptions::default(),
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "sprout-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
            ..Default::default()
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        info!("Server initialized");
    }

    async fn shutdown(&self) -> Result<()> {
        info!("Shutdown request received");
        Ok(())
    }

    // Document synchronization
    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        info!("Document opened: {}", params.text_document.uri);

        let uri = params.text_document.uri.clone();
        {
            let mut workspace = self.workspace.write().await;
            if let Err(e) = workspace.open_document(params.text_document) {
                error!("Failed to open document: {}", e);
                return;
            }

            let stats = workspace.stats();
            info!("Workspace stats: {} documents open", stats.document_count);
        }

        // First open publishes without waiting for the debounce.
        self.publish_now(uri).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri.clone();
        let version = params.text_document.version;

        info!("Document changed: {} (version {})", uri, version);

        {
            let mut workspace = self.workspace.write().await;
            if let Err(e) = workspace.update_document(params) {
                error!("Failed to update document {}: {}", uri, e);
                return;
            }
        }

        self.schedule_lint(uri).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        info!("Document closed: {}", params.text_document.uri);

        let uri = params.text_document.uri.clone();
        self.pending_lints.cancel(&uri).await;

        let mut workspace = self.workspace.write().await;
        if let Err(e) = workspace.close_document(params.text_document.uri) {
            error!("Failed to close document: {}", e);
        }

        // Clear diagnostics for closed document
        self.client.publish_diagnostics(uri, Vec::new(), None).await;

        let stats = workspace.stats();
        info!("Workspace stats: {} documents open", stats.document_count);
    }

    // Language features
    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        self.handlers.hover(params).await
    }

    async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>> {
        self.handlers.code_action(params).await
    }

    async fn execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> Result<Option<serde_json::Value>> {
        self.handlers.execute_command(params).await
    }
}
