use lsp_types::*;

/// Test utilities for LSP server testing
pub struct LspTestClient {}

impl LspTestClient {
    pub fn new() -> Self {
        Self {}
    }

    /// Create an initialize request with basic capabilities
    pub fn create_initialize_request() -> InitializeParams {
        InitializeParams {
            process_id: Some(1234),
            root_uri: Some(Url::parse("file:///test/workspace").unwrap()),
            initialization_options: None,
            capabilities: ClientCapabilities {
                workspace: Some(WorkspaceClientCapabilities {
                    apply_edit: Some(true),
                    workspace_edit: Some(WorkspaceEditClientCapabilities {
                        document_changes: Some(true),
                        ..Default::default()
                    }),
                    execute_command: Some(DynamicRegistrationClientCapabilities {
                        dynamic_registration: Some(true),
                    }),
                    workspace_folders: Some(true),
                    ..Default::default()
                }),
                text_document: Some(TextDocumentClientCapabilities {
                    synchronization: Some(TextDocumentSyncClientCapabilities {
                        dynamic_registration: Some(true),
                        will_save: Some(false),
                        will_save_wait_until: Some(false),
                        did_save: Some(true),
                    }),
                    hover: Some(HoverClientCapabilities {
                        dynamic_registration: Some(true),
                        content_format: Some(vec![MarkupKind::Markdown, MarkupKind::PlainText]),
                    }),
                    code_action: Some(CodeActionClientCapabilities {
                        dynamic_registration: Some(true),
                        code_action_literal_support: Some(CodeActionLiteralSupport {
                            code_action_kind: CodeActionKindLiteralSupport {
                                value_set: vec!["quickfix".to_string()],
                            },
                        }),
                        ..Default::default()
                    }),
                    publish_diagnostics: Some(PublishDiagnosticsClientCapabilities {
                        related_information: Some(true),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            },
            client_info: Some(ClientInfo {
                name: "test-client".to_string(),
                version: Some("1.0.0".to_string()),
            }),
            ..Default::default()
        }
    }

    /// Create a didOpen notification for a document
    pub fn create_did_open_notification(
        uri: &str,
        language_id: &str,
        text: &str,
    ) -> DidOpenTextDocumentParams {
        DidOpenTextDocumentParams {
            text_document: TextDocumentItem {
                uri: Url::parse(uri).unwrap(),
                language_id: language_id.to_string(),
                version: 1,
                text: text.to_string(),
            },
        }
    }

    /// Create a didChange notification replacing the whole document
    pub fn create_did_change_notification(
        uri: &str,
        version: i32,
        text: &str,
    ) -> DidChangeTextDocumentParams {
        DidChangeTextDocumentParams {
            text_document: VersionedTextDocumentIdentifier {
                uri: Url::parse(uri).unwrap(),
                version,
            },
            content_changes: vec![TextDocumentContentChangeEvent {
                range: None,
                range_length: None,
                text: text.to_string(),
            }],
        }
    }

    /// Create a hover request at a position
    pub fn create_hover_request(uri: &str, line: u32, character: u32) -> HoverParams {
        HoverParams {
            text_document_position_params: TextDocumentPositionParams {
                text_document: TextDocumentIdentifier {
                    uri: Url::parse(uri).unwrap(),
                },
                position: Position { line, character },
            },
            work_done_progress_params: WorkDoneProgressParams::default(),
        }
    }

    /// Create a codeAction request carrying one diagnostic
    pub fn create_code_action_request(uri: &str, diagnostic: Diagnostic) -> CodeActionParams {
        CodeActionParams {
            text_document: TextDocumentIdentifier {
                uri: Url::parse(uri).unwrap(),
            },
            range: diagnostic.range,
            context: CodeActionContext {
                diagnostics: vec![diagnostic],
                only: None,
                trigger_kind: None,
            },
            work_done_progress_params: WorkDoneProgressParams::default(),
            partial_result_params: PartialResultParams::default(),
        }
    }

    /// Create an executeCommand request with one JSON argument
    pub fn create_execute_command_request(
        command: &str,
        argument: serde_json::Value,
    ) -> ExecuteCommandParams {
        ExecuteCommandParams {
            command: command.to_string(),
            arguments: vec![argument],
            work_done_progress_params: WorkDoneProgressParams::default(),
        }
    }
}

impl Default for LspTestClient {
    fn default() -> Self {
        Self::new()
    }
}
