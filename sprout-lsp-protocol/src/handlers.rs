use lsp_types::*;
use serde::Deserialize;
use serde_json::{json, Value};
use sprout_lsp_core::{
    advice, fix, CodeRunner, CommandAssistant, EditDescriptor, FileStore, Language, Workspace,
};
use sprout_lsp_core::assistant::ChatTurn;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tower_lsp::jsonrpc::{Error, Result};
use tracing::{info, warn};

pub const CMD_RUN_CODE: &str = "sprout.runCode";
pub const CMD_ANALYZE_CODE: &str = "sprout.analyzeCode";
pub const CMD_CHAT: &str = "sprout.chat";
pub const CMD_LIST_FILES: &str = "sprout.listFiles";
pub const CMD_READ_FILE: &str = "sprout.readFile";
pub const CMD_SAVE_FILE: &str = "sprout.saveFile";
pub const CMD_DELETE_FILE: &str = "sprout.deleteFile";

/// Commands advertised in the server capabilities.
pub fn supported_commands() -> Vec<String> {
    vec![
        CMD_RUN_CODE.to_string(),
        CMD_ANALYZE_CODE.to_string(),
        CMD_CHAT.to_string(),
        CMD_LIST_FILES.to_string(),
        CMD_READ_FILE.to_string(),
        CMD_SAVE_FILE.to_string(),
        CMD_DELETE_FILE.to_string(),
    ]
}

#[derive(Debug, Deserialize)]
struct RunCodeArgs {
    #[serde(default)]
    uri: Option<Url>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    language: Option<Language>,
}

#[derive(Debug, Deserialize)]
struct AnalyzeCodeArgs {
    code: String,
    language: Language,
    #[serde(default)]
    context: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatArgs {
    message: String,
    #[serde(default)]
    language: Option<Language>,
    #[serde(default)]
    history: Vec<ChatTurn>,
}

#[derive(Debug, Deserialize)]
struct FileNameArgs {
    name: String,
}

#[derive(Debug, Deserialize)]
struct SaveFileArgs {
    name: String,
    content: String,
}

pub struct Handlers {
    workspace: Arc<RwLock<Workspace>>,
    runner: Option<Arc<Mutex<CodeRunner>>>,
    assistant: Arc<CommandAssistant>,
    store: Arc<FileStore>,
}

impl Handlers {
    pub fn new(
        workspace: Arc<RwLock<Workspace>>,
        runner: Option<CodeRunner>,
        assistant: CommandAssistant,
        store: FileStore,
    ) -> Self {
        Self {
            workspace,
            runner: runner.map(|r| Arc::new(Mutex::new(r))),
            assistant: Arc::new(assistant),
            store: Arc::new(store),
        }
    }

    /// Hover over a diagnostic returns its kid-friendly advice.
    pub async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        let mut workspace = self.workspace.write().await;
        let document = match workspace.get_document(&uri) {
            Some(document) => document,
            None => return Ok(None),
        };
        let language = match document.language() {
            Some(language) => language,
            None => return Ok(None),
        };

        let hover = document
            .lint_diagnostics()
            .iter()
            .map(|diagnostic| (diagnostic.range(), diagnostic.message.clone()))
            .find(|(range, _)| position_in_range(position, range))
            .map(|(range, message)| {
                let advice = advice::explain(&message, language);
                Hover {
                    contents: HoverContents::Markup(MarkupContent {
                        kind: MarkupKind::Markdown,
                        value: format!(
                            "**What happened:** {}\n\n**Try this:** {}",
                            advice.explanation, advice.suggestion
                        ),
                    }),
                    range: Some(range),
                }
            });

        Ok(hover)
    }

    /// Offer a quick fix for each diagnostic the client sent with the
    /// request. Edits are re-derived from the live snapshot, so a diagnostic
    /// that no longer applies simply produces no action.
    pub async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>> {
        let uri = params.text_document.uri;

        let mut workspace = self.workspace.write().await;
        let document = match workspace.get_document(&uri) {
            Some(document) => document,
            None => return Ok(None),
        };
        let language = match document.language() {
            Some(language) => language,
            None => return Ok(None),
        };
        let text = document.text();

        let mut actions = Vec::new();
        for diagnostic in &params.context.diagnostics {
            let line_number = diagnostic.range.start.line + 1;
            let suggestion = fix::suggest_fix(&diagnostic.message, language, line_number, text);

            if let Some(edit) = suggestion {
                let mut changes = HashMap::new();
                changes.insert(uri.clone(), vec![edit.to_text_edit()]);

                let code_action = CodeAction {
                    title: quick_fix_title(&edit),
                    kind: Some(CodeActionKind::QUICKFIX),
                    diagnostics: Some(vec![diagnostic.clone()]),
                    is_preferred: Some(true),
                    disabled: None,
                    edit: Some(WorkspaceEdit {
                        changes: Some(changes),
                        document_changes: None,
                        change_annotations: None,
                    }),
                    command: None,
                    data: None,
                };
                actions.push(CodeActionOrCommand::CodeAction(code_action));
            }
        }

        info!("Generated {} quick fixes for {}", actions.len(), uri);

        if actions.is_empty() {
            Ok(None)
        } else {
            Ok(Some(actions))
        }
    }

    /// Dispatch a collaborator command. Collaborator failures come back as
    /// displayable `{"error": ...}` payloads, not protocol errors.
    pub async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        match params.command.as_str() {
            CMD_RUN_CODE => self.run_code(parse_args(params.arguments)?).await,
            CMD_ANALYZE_CODE => self.analyze_code(parse_args(params.arguments)?).await,
            CMD_CHAT => self.chat(parse_args(params.arguments)?).await,
            CMD_LIST_FILES => self.list_files().await,
            CMD_READ_FILE => self.read_file(parse_args(params.arguments)?).await,
            CMD_SAVE_FILE => self.save_file(parse_args(params.arguments)?).await,
            CMD_DELETE_FILE => self.delete_file(parse_args(params.arguments)?).await,
            unknown => {
                warn!("Unknown command: {}", unknown);
                Err(Error::method_not_found())
            }
        }
    }

    async fn run_code(&self, args: RunCodeArgs) -> Result<Option<Value>> {
        let (code, language) = match self.resolve_submission(args).await? {
            Some(submission) => submission,
            None => {
                return Ok(Some(json!({ "error": "Code is required" })));
            }
        };

        let runner = match &self.runner {
            Some(runner) => runner,
            None => {
                return Ok(Some(json!({
                    "error": "Code execution is not available on this server"
                })));
            }
        };

        let outcome = runner.lock().await.execute(&code, language).await;
        match outcome {
            Ok(outcome) => Ok(Some(json!({
                "output": outcome.stdout,
                "error": outcome.stderr,
                "status": outcome.status.description(),
                "submissionId": outcome.submission_id,
            }))),
            Err(e) => {
                warn!("Code execution failed: {}", e);
                Ok(Some(json!({
                    "error": format!("Failed to execute code: {}", e)
                })))
            }
        }
    }

    /// Resolve a run request to a source snapshot, either inline code or an
    /// open document.
    async fn resolve_submission(&self, args: RunCodeArgs) -> Result<Option<(String, Language)>> {
        if let Some(uri) = args.uri {
            let workspace = self.workspace.read().await;
            let document = workspace
                .get_document_readonly(&uri)
                .ok_or_else(|| Error::invalid_params(format!("document not open: {}", uri)))?;
            let language = match document.language() {
                Some(language) => language,
                None => return Ok(None),
            };
            return Ok(Some((document.text().to_string(), language)));
        }

        match (args.code, args.language) {
            (Some(code), Some(language)) if !code.is_empty() => Ok(Some((code, language))),
            _ => Ok(None),
        }
    }

    async fn analyze_code(&self, args: AnalyzeCodeArgs) -> Result<Option<Value>> {
        match self
            .assistant
            .analyze(&args.code, args.language, args.context.as_deref())
            .await
        {
            Ok(analysis) => Ok(Some(json!({ "analysis": analysis }))),
            Err(e) => {
                warn!("Code analysis failed: {}", e);
                Ok(Some(json!({
                    "error": format!("Failed to analyze code: {}", e)
                })))
            }
        }
    }

    async fn chat(&self, args: ChatArgs) -> Result<Option<Value>> {
        match self
            .assistant
            .chat(&args.message, args.language, &args.history)
            .await
        {
            Ok(response) => Ok(Some(json!({ "response": response }))),
            Err(e) => {
                warn!("Chat request failed: {}", e);
                Ok(Some(json!({
                    "error": format!("Failed to answer: {}", e)
                })))
            }
        }
    }

    async fn list_files(&self) -> Result<Option<Value>> {
        match self.store.list().await {
            Ok(files) => Ok(Some(json!(files))),
            Err(e) => Ok(Some(json!({ "error": format!("Failed to list files: {}", e) }))),
        }
    }

    async fn read_file(&self, args: FileNameArgs) -> Result<Option<Value>> {
        match self.store.read(&args.name).await {
            Ok(content) => Ok(Some(json!({ "content": content }))),
            Err(e) => Ok(Some(json!({ "error": format!("Failed to read file: {}", e) }))),
        }
    }

    async fn save_file(&self, args: SaveFileArgs) -> Result<Option<Value>> {
        match self.store.write(&args.name, &args.content).await {
            Ok(()) => Ok(Some(json!({
                "success": true,
                "message": "File saved successfully"
            }))),
            Err(e) => Ok(Some(json!({ "error": format!("Failed to save file: {}", e) }))),
        }
    }

    async fn delete_file(&self, args: FileNameArgs) -> Result<Option<Value>> {
        match self.store.delete(&args.name).await {
            Ok(()) => Ok(Some(json!({
                "success": true,
                "message": "File deleted successfully"
            }))),
            Err(e) => Ok(Some(json!({ "error": format!("Failed to delete file: {}", e) }))),
        }
    }
}

/// Deserialize the first command argument into the expected shape.
fn parse_args<T: for<'de> Deserialize<'de>>(arguments: Vec<Value>) -> Result<T> {
    let first = arguments
        .into_iter()
        .next()
        .ok_or_else(|| Error::invalid_params("missing command argument"))?;
    serde_json::from_value(first)
        .map_err(|e| Error::invalid_params(format!("invalid command argument: {}", e)))
}

fn position_in_range(position: Position, range: &Range) -> bool {
    let start = (range.start.line, range.start.character);
    let end = (range.end.line, range.end.character);
    let point = (position.line, position.character);
    start <= point && point <= end
}

/// Human title for a quick fix action.
fn quick_fix_title(edit: &EditDescriptor) -> String {
    match edit {
        EditDescriptor::Insert { text, .. } => match text.as_str() {
            ";" => "Add the missing ';'".to_string(),
            ":" => "Add the missing ':'".to_string(),
            "    " => "Indent this line".to_string(),
            "#include <stdio.h>\n" => "Add #include <stdio.h> at the top".to_string(),
            other => match other.strip_prefix("let ").and_then(|r| r.strip_suffix(" = ")) {
                Some(name) => format!("Declare '{}' with let", name),
                None => format!("Insert '{}'", other.trim_end()),
            },
        },
        EditDescriptor::Replace { text, .. } => format!("Use '{}'", text),
    }
}
