use lsp_types::*;
use sprout_lsp_core::{Document, Language};

/// Create a test text document item
fn create_test_lsp_item(uri: &str, language_id: &str, content: &str, version: i32) -> TextDocumentItem {
    TextDocumentItem {
        uri: Url::parse(uri).unwrap(),
        language_id: language_id.to_string(),
        version,
        text: content.to_string(),
    }
}

/// Test: Document Creation and Initialization
/// Purpose: Test conversion from LSP TextDocumentItem to internal Document
#[test]
fn test_document_from_lsp_item() {
    let lsp_item = create_test_lsp_item("file:///test.py", "python", "x = 1", 1);

    let document = Document::new(lsp_item);

    // Expected: Exact field mapping
    assert_eq!(document.uri().as_str(), "file:///test.py");
    assert_eq!(document.version(), 1);
    assert_eq!(document.text(), "x = 1");
    assert_eq!(document.language_id(), "python");
    assert_eq!(document.language(), Some(Language::Python));
}

/// Test: Incremental Text Updates
/// Purpose: Test range-based content changes
#[test]
fn test_incremental_text_update() {
    let initial = "def greet():\n    print(\"Hello\")";
    let lsp_item = create_test_lsp_item("file:///test.py", "python", initial, 1);
    let mut document = Document::new(lsp_item);

    // Change: Replace "Hello" with "Hi"
    let change = TextDocumentContentChangeEvent {
        range: Some(Range {
            start: Position { line: 1, character: 11 },
            end: Position { line: 1, character: 16 },
        }),
        range_length: Some(5),
        text: "Hi".to_string(),
    };

    document.apply_changes(vec![change]).unwrap();

    // Expected: Exact updated content
    assert_eq!(document.version(), 2);
    assert_eq!(document.text(), "def greet():\n    print(\"Hi\")");
}

/// Test: Full document replacement
#[test]
fn test_full_document_replacement() {
    let lsp_item = create_test_lsp_item("file:///test.py", "python", "x = 1", 1);
    let mut document = Document::new(lsp_item);

    // Full replacement (no range specified)
    let change = TextDocumentContentChangeEvent {
        range: None,
        range_length: None,
        text: "y = 2\nz = 3".to_string(),
    };

    document.apply_changes(vec![change]).unwrap();

    // Expected: Complete content replacement
    assert_eq!(document.version(), 2);
    assert_eq!(document.text(), "y = 2\nz = 3");
}

/// Test: Multiple incremental changes
#[test]
fn test_multiple_incremental_changes() {
    let initial = "value = 0";
    let lsp_item = create_test_lsp_item("file:///test.py", "python", initial, 1);
    let mut document = Document::new(lsp_item);

    // First change: Update value
    let change1 = TextDocumentContentChangeEvent {
        range: Some(Range {
            start: Position { line: 0, character: 8 },
            end: Position { line: 0, character: 9 },
        }),
        range_length: Some(1),
        text: "42".to_string(),
    };
    document.apply_changes(vec![change1]).unwrap();

    // Second change: Add new line
    let change2 = TextDocumentContentChangeEvent {
        range: Some(Range {
            start: Position { line: 0, character: 10 },
            end: Position { line: 0, character: 10 },
        }),
        range_length: Some(0),
        text: "\nother = 100".to_string(),
    };
    document.apply_changes(vec![change2]).unwrap();

    // Expected: Both changes applied correctly
    assert_eq!(document.version(), 3);
    assert_eq!(document.text(), "value = 42\nother = 100");
}

/// Test: Document with lint findings
/// Purpose: lint results are produced on demand and describe the current text
#[test]
fn test_document_with_lint_findings() {
    let lsp_item = create_test_lsp_item("file:///broken.py", "python", "if x > 1\nprint(x)", 1);
    let mut document = Document::new(lsp_item);

    assert!(document.has_lint_errors());
    let diagnostics = document.lint_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].start_line, 1);
}

/// Test: Lint results track edits
/// Purpose: cached results are invalidated by changes, never patched
#[test]
fn test_lint_results_track_edits() {
    let lsp_item = create_test_lsp_item("file:///t.py", "python", "if x > 1", 1);
    let mut document = Document::new(lsp_item);
    assert_eq!(document.lint_diagnostics().len(), 1);

    let change = TextDocumentContentChangeEvent {
        range: Some(Range {
            start: Position { line: 0, character: 8 },
            end: Position { line: 0, character: 8 },
        }),
        range_length: Some(0),
        text: ":".to_string(),
    };
    document.apply_changes(vec![change]).unwrap();

    assert!(!document.has_lint_errors());
}

/// Test: Empty document handling
#[test]
fn test_empty_document() {
    let lsp_item = create_test_lsp_item("file:///empty.py", "python", "", 1);
    let mut document = Document::new(lsp_item);

    assert_eq!(document.text(), "");
    assert!(document.lint_diagnostics().is_empty());
    assert_eq!(document.size(), 0);
}

/// Test: Unknown language id handling
/// Purpose: documents outside the supported set stay open but lint clean
#[test]
fn test_unknown_language_document() {
    let lsp_item = create_test_lsp_item("file:///test.rb", "ruby", "puts x", 1);
    let mut document = Document::new(lsp_item);

    assert_eq!(document.language(), None);
    assert!(document.lint_diagnostics().is_empty());
}

/// Test: Unicode content handling
#[test]
fn test_unicode_content() {
    let unicode_content = "# Unicode: áéíóú, 中文, 🚀\nif x > 1\n    print(\"¡Hola! 🌟\")";
    let lsp_item = create_test_lsp_item("file:///unicode.py", "python", unicode_content, 1);
    let mut document = Document::new(lsp_item);

    // Expected: Unicode content preserved exactly, diagnostics use character
    // columns
    assert_eq!(document.text(), unicode_content);
    let diagnostics = document.lint_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].start_line, 2);
    assert_eq!(diagnostics[0].end_column, "if x > 1".chars().count() as u32 + 1);
}

/// Test: Position/offset conversion
#[test]
fn test_position_offset_conversion() {
    let lsp_item = create_test_lsp_item("file:///t.py", "python", "abc\ndef", 1);
    let document = Document::new(lsp_item);

    let offset = document
        .position_to_offset(Position { line: 1, character: 1 })
        .unwrap();
    assert_eq!(offset, 5);

    let position = document.offset_to_position(5).unwrap();
    assert_eq!(position, Position { line: 1, character: 1 });
}
