use lsp_types::*;
use sprout_lsp_core::Workspace;

fn test_document(uri: &str, language_id: &str, content: &str) -> TextDocumentItem {
    TextDocumentItem {
        uri: Url::parse(uri).unwrap(),
        language_id: language_id.to_string(),
        version: 1,
        text: content.to_string(),
    }
}

/// Test: Open and retrieve documents
#[test]
fn test_open_and_get_document() {
    let mut workspace = Workspace::new();

    workspace
        .open_document(test_document("file:///a.py", "python", "x = 1"))
        .unwrap();

    let uri = Url::parse("file:///a.py").unwrap();
    assert!(workspace.is_document_open(&uri));
    let document = workspace.get_document(&uri).unwrap();
    assert_eq!(document.text(), "x = 1");
}

/// Test: Diagnostics for an open document
/// Purpose: the workspace converts lint results to publish-ready LSP
/// diagnostics with 0-based positions
#[test]
fn test_diagnostics_for_open_document() {
    let mut workspace = Workspace::new();
    workspace
        .open_document(test_document("file:///broken.py", "python", "if x > 1\nprint(x)"))
        .unwrap();

    let uri = Url::parse("file:///broken.py").unwrap();
    let diagnostics = workspace.diagnostics_for(&uri);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].range.start.line, 0); // 0-based
    assert_eq!(diagnostics[0].source, Some("sprout".to_string()));
}

/// Test: Diagnostics for an unknown document
#[test]
fn test_diagnostics_for_unknown_document() {
    let mut workspace = Workspace::new();
    let uri = Url::parse("file:///nowhere.py").unwrap();
    assert!(workspace.diagnostics_for(&uri).is_empty());
}

/// Test: Update applies changes and refreshes diagnostics
#[test]
fn test_update_document_refreshes_diagnostics() {
    let mut workspace = Workspace::new();
    workspace
        .open_document(test_document("file:///t.py", "python", "if x > 1"))
        .unwrap();

    let uri = Url::parse("file:///t.py").unwrap();
    assert_eq!(workspace.diagnostics_for(&uri).len(), 1);

    let params = DidChangeTextDocumentParams {
        text_document: VersionedTextDocumentIdentifier {
            uri: uri.clone(),
            version: 2,
        },
        content_changes: vec![TextDocumentContentChangeEvent {
            range: None,
            range_length: None,
            text: "if x > 1:\n    print(x)".to_string(),
        }],
    };
    workspace.update_document(params).unwrap();

    assert!(workspace.diagnostics_for(&uri).is_empty());
}

/// Test: Stale versions are ignored
/// Purpose: an update carrying an older version than the open document must
/// not clobber newer content
#[test]
fn test_stale_version_update_ignored() {
    let mut workspace = Workspace::new();
    workspace
        .open_document(test_document("file:///t.py", "python", "x = 1"))
        .unwrap();

    let uri = Url::parse("file:///t.py").unwrap();
    let params = DidChangeTextDocumentParams {
        text_document: VersionedTextDocumentIdentifier {
            uri: uri.clone(),
            version: 0,
        },
        content_changes: vec![TextDocumentContentChangeEvent {
            range: None,
            range_length: None,
            text: "stale".to_string(),
        }],
    };
    workspace.update_document(params).unwrap();

    assert_eq!(workspace.get_document(&uri).unwrap().text(), "x = 1");
}

/// Test: Close removes the document
#[test]
fn test_close_document() {
    let mut workspace = Workspace::new();
    workspace
        .open_document(test_document("file:///t.py", "python", "x = 1"))
        .unwrap();

    let uri = Url::parse("file:///t.py").unwrap();
    workspace.close_document(uri.clone()).unwrap();

    assert!(!workspace.is_document_open(&uri));
    assert!(workspace.diagnostics_for(&uri).is_empty());
}

/// Test: LRU eviction at capacity
/// Purpose: opening past the cache capacity evicts the least recently used
/// document
#[test]
fn test_lru_eviction_at_capacity() {
    let mut workspace = Workspace::with_capacity(2);

    workspace
        .open_document(test_document("file:///a.py", "python", "a = 1"))
        .unwrap();
    workspace
        .open_document(test_document("file:///b.py", "python", "b = 2"))
        .unwrap();
    workspace
        .open_document(test_document("file:///c.py", "python", "c = 3"))
        .unwrap();

    let stats = workspace.stats();
    assert_eq!(stats.cache_capacity, 2);
    assert!(stats.document_count <= 2);
    assert!(!workspace.is_document_open(&Url::parse("file:///a.py").unwrap()));
    assert!(workspace.is_document_open(&Url::parse("file:///c.py").unwrap()));
}

/// Test: Workspace stats
#[test]
fn test_workspace_stats() {
    let mut workspace = Workspace::new();
    workspace.set_root(Url::parse("file:///project").unwrap());
    workspace
        .open_document(test_document("file:///a.py", "python", "a = 1"))
        .unwrap();

    let stats = workspace.stats();
    assert_eq!(stats.document_count, 1);
    assert_eq!(stats.root_uri, Some(Url::parse("file:///project").unwrap()));
}
