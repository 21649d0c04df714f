//! Heuristic diagnostic synthesis.
//!
//! These are line-oriented substring rules, not a parser: the goal is to
//! catch the beginner mistakes the Sprout editor teaches about (a missing
//! colon, a missing semicolon, a forgotten `$` sigil) fast enough to run on
//! every debounced keystroke. False positives on unusual code are accepted
//! noise. JavaScript and TypeScript are deliberately absent: the editing
//! client's own engine owns diagnostics for those.

use crate::diagnostic::LintDiagnostic;
use crate::language::Language;
use regex::Regex;

pub const MISSING_COLON: &str = "Missing colon ':' at the end of the statement";
pub const UNEXPECTED_INDENT: &str = "Indentation error: unexpected indent";
pub const EXPECTED_SEMICOLON: &str = "Expected ';' at the end of the statement";
pub const MISSING_STDIO: &str =
    "Undeclared identifier 'printf'; did you forget to include <stdio.h>?";
pub const PHP_EXPECTED_SEMICOLON: &str =
    "Parse error: syntax error, unexpected end of file, expecting ';'";

/// Python control keywords that must end their line with a colon.
const PYTHON_CONTROL_KEYWORDS: [&str; 5] = ["if ", "for ", "while ", "def ", "class "];

/// Substrings that mark a C/C++ line as a statement needing a semicolon.
const C_STATEMENT_CUES: [&str; 4] = ["=", "return", "printf", "cout"];

/// Substrings that mark a PHP line as a statement needing a semicolon.
const PHP_STATEMENT_CUES: [&str; 3] = ["=", "return", "echo"];

const PHP_ASSIGNMENT_PATTERN: &str = r"\b([a-zA-Z_][a-zA-Z0-9_]*)\s*=";

/// Synthesize diagnostics for a source snapshot.
///
/// Pure function of its inputs: identical (text, language) pairs always
/// yield identical diagnostic lists, in line-scan order, with no
/// de-duplication or cross-rule suppression. Empty text yields no
/// diagnostics.
pub fn synthesize(source: &str, language: Language) -> Vec<LintDiagnostic> {
    if source.is_empty() {
        return Vec::new();
    }

    match language {
        Language::Python => lint_python(source),
        Language::C | Language::Cpp => lint_c_family(source),
        Language::Php => lint_php(source),
        // Owned by the editing client's native engine.
        Language::JavaScript | Language::TypeScript => Vec::new(),
    }
}

/// Number of characters in a line, as a 1-based end column past the line.
fn end_column(line: &str) -> u32 {
    line.chars().count() as u32 + 1
}

/// Count of leading whitespace characters.
fn leading_whitespace(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

fn lint_python(source: &str) -> Vec<LintDiagnostic> {
    let mut diagnostics = Vec::new();
    let mut previous_indent = 0usize;

    for (index, line) in source.lines().enumerate() {
        let line_number = index as u32 + 1;
        let trimmed = line.trim();

        // Blank lines and comments are skipped entirely, including for the
        // indentation tracker.
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if PYTHON_CONTROL_KEYWORDS.iter().any(|kw| line.contains(kw)) && !trimmed.ends_with(':') {
            diagnostics.push(LintDiagnostic::error_on_line(
                MISSING_COLON,
                line_number,
                1,
                end_column(line),
            ));
        }

        let indent = leading_whitespace(line);
        if indent > previous_indent + 4 && indent % 4 != 0 {
            diagnostics.push(LintDiagnostic::error_on_line(
                UNEXPECTED_INDENT,
                line_number,
                1,
                indent as u32 + 1,
            ));
        }
        // Updated even for flagged lines, so consecutive violations can
        // cascade. Accepted heuristic noise.
        previous_indent = indent;
    }

    diagnostics
}

fn lint_c_family(source: &str) -> Vec<LintDiagnostic> {
    let mut diagnostics = Vec::new();

    for (index, line) in source.lines().enumerate() {
        let trimmed = line.trim();

        // Preprocessor directives, comments, and lines already terminated by
        // ';', '{', or '}' are fine as-is.
        if trimmed.is_empty()
            || trimmed.starts_with('#')
            || trimmed.starts_with("//")
            || trimmed.ends_with(';')
            || trimmed.ends_with('{')
            || trimmed.ends_with('}')
        {
            continue;
        }

        if C_STATEMENT_CUES.iter().any(|cue| trimmed.contains(cue)) {
            diagnostics.push(LintDiagnostic::error_on_line(
                EXPECTED_SEMICOLON,
                index as u32 + 1,
                1,
                end_column(line),
            ));
        }
    }

    // A single missing-include diagnostic at the first printf, however many
    // printf calls the text contains.
    if source.contains("printf") && !source.contains("#include <stdio.h>") {
        if let Some((index, line)) = source
            .lines()
            .enumerate()
            .find(|(_, line)| line.contains("printf"))
        {
            diagnostics.push(LintDiagnostic::error_on_line(
                MISSING_STDIO,
                index as u32 + 1,
                1,
                end_column(line),
            ));
        }
    }

    diagnostics
}

fn lint_php(source: &str) -> Vec<LintDiagnostic> {
    let mut diagnostics = Vec::new();

    for (index, line) in source.lines().enumerate() {
        let trimmed = line.trim();

        if trimmed.is_empty()
            || trimmed.starts_with("<?php")
            || trimmed.starts_with("?>")
            || trimmed.starts_with("//")
            || trimmed.ends_with(';')
            || trimmed.ends_with('{')
            || trimmed.ends_with('}')
        {
            continue;
        }

        if PHP_STATEMENT_CUES.iter().any(|cue| trimmed.contains(cue)) {
            diagnostics.push(LintDiagnostic::error_on_line(
                PHP_EXPECTED_SEMICOLON,
                index as u32 + 1,
                1,
                end_column(line),
            ));
        }
    }

    diagnostics.extend(lint_php_sigils(source));
    diagnostics
}

/// Flag bare uses of assigned variables that are missing their `$` sigil.
///
/// For every `name =` assignment, every later occurrence of `name` that is
/// neither preceded by `$` nor followed by `=` gets its own diagnostic; no
/// de-duplication across overlapping assignments.
fn lint_php_sigils(source: &str) -> Vec<LintDiagnostic> {
    let mut diagnostics = Vec::new();

    let assignment = match Regex::new(PHP_ASSIGNMENT_PATTERN) {
        Ok(re) => re,
        Err(_) => return diagnostics,
    };

    let lines: Vec<&str> = source.lines().collect();

    for (assignment_index, line) in lines.iter().enumerate() {
        for capture in assignment.captures_iter(line) {
            let name = &capture[1];

            let word = match Regex::new(&format!(r"\b{}\b", regex::escape(name))) {
                Ok(re) => re,
                Err(_) => continue,
            };

            for (usage_index, usage_line) in lines.iter().enumerate().skip(assignment_index) {
                for found in word.find_iter(usage_line) {
                    if !is_bare_use(usage_line, found.start(), found.end()) {
                        continue;
                    }

                    let line_number = usage_index as u32 + 1;
                    let start_column = usage_line[..found.start()].chars().count() as u32 + 1;
                    let end_col = start_column + name.chars().count() as u32;
                    diagnostics.push(LintDiagnostic {
                        severity: crate::diagnostic::Severity::Error,
                        message: format!(
                            "Undefined variable: {}; did you forget the '$'?",
                            name
                        ),
                        start_line: line_number,
                        start_column,
                        end_line: line_number,
                        end_column: end_col,
                    });
                }
            }
        }
    }

    diagnostics
}

/// A word occurrence is a bare use when it is not preceded by `$` and is not
/// itself the left-hand side of an assignment.
fn is_bare_use(line: &str, start: usize, end: usize) -> bool {
    let preceded_by_sigil = line[..start].chars().next_back() == Some('$');
    let followed_by_assignment = line[end..].trim_start().starts_with('=');
    !preceded_by_sigil && !followed_by_assignment
}
