//! Single-edit fix proposals for diagnostics.
//!
//! Every fix is a one-shot [`EditDescriptor`] computed from the diagnostic
//! message and the current text snapshot. The caller applies it (or not) and
//! requests a fresh one after the document changes; nothing here mutates
//! text. Rules live in ordered per-language tables; the first rule whose
//! message patterns match and whose builder produces an edit wins.
//!
//! Message patterns are matched case-insensitively so that both the editing
//! client's engine ("';' expected.") and our own synthesizer
//! ("Expected ';' ...") trigger the same rule.

use crate::language::Language;
use lsp_types::{Position, Range, TextEdit};
use regex::Regex;
use serde::Serialize;

/// A proposed textual edit, not yet applied. Lines and columns are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EditDescriptor {
    Insert {
        text: String,
        line: u32,
        column: u32,
    },
    Replace {
        text: String,
        start_line: u32,
        start_column: u32,
        end_line: u32,
        end_column: u32,
    },
}

impl EditDescriptor {
    /// Convert to an LSP text edit (0-based, insert = empty range).
    pub fn to_text_edit(&self) -> TextEdit {
        match self {
            EditDescriptor::Insert { text, line, column } => {
                let position = Position {
                    line: line.saturating_sub(1),
                    character: column.saturating_sub(1),
                };
                TextEdit {
                    range: Range {
                        start: position,
                        end: position,
                    },
                    new_text: text.clone(),
                }
            }
            EditDescriptor::Replace {
                text,
                start_line,
                start_column,
                end_line,
                end_column,
            } => TextEdit {
                range: Range {
                    start: Position {
                        line: start_line.saturating_sub(1),
                        character: start_column.saturating_sub(1),
                    },
                    end: Position {
                        line: end_line.saturating_sub(1),
                        character: end_column.saturating_sub(1),
                    },
                },
                new_text: text.clone(),
            },
        }
    }
}

/// Everything a rule builder may consult.
struct FixContext<'a> {
    message: &'a str,
    message_lower: &'a str,
    line: &'a str,
    previous_line: Option<&'a str>,
    line_number: u32,
}

/// One fix rule: lowercase message patterns plus an edit builder.
struct FixRule {
    patterns: &'static [&'static str],
    build: fn(&FixContext) -> Option<EditDescriptor>,
}

const JS_RULES: &[FixRule] = &[
    FixRule {
        patterns: &["missing semicolon", "expected"],
        build: append_semicolon,
    },
    FixRule {
        patterns: &["undefined", "not defined"],
        build: declare_variable,
    },
];

const PYTHON_RULES: &[FixRule] = &[
    FixRule {
        patterns: &["syntaxerror", "missing colon"],
        build: append_colon,
    },
    FixRule {
        patterns: &["indentationerror", "unexpected indent"],
        build: indent_after_colon,
    },
];

const C_RULES: &[FixRule] = &[
    FixRule {
        patterns: &["expected ';'", "expected"],
        build: append_semicolon,
    },
    FixRule {
        patterns: &["undeclared identifier"],
        build: include_stdio,
    },
];

const PHP_RULES: &[FixRule] = &[
    FixRule {
        patterns: &["parse error", "syntax error"],
        build: append_semicolon,
    },
    FixRule {
        patterns: &["undefined variable"],
        build: prefix_dollar,
    },
];

fn rules_for(language: Language) -> &'static [FixRule] {
    match language {
        Language::JavaScript | Language::TypeScript => JS_RULES,
        Language::Python => PYTHON_RULES,
        Language::C | Language::Cpp => C_RULES,
        Language::Php => PHP_RULES,
    }
}

/// Compute a candidate fix for a diagnostic.
///
/// Returns `None` when the inputs are empty, the addressed line does not
/// exist, or no rule applies; there is no error case. `line_number` is
/// 1-based.
pub fn suggest_fix(
    message: &str,
    language: Language,
    line_number: u32,
    source: &str,
) -> Option<EditDescriptor> {
    if message.is_empty() || source.is_empty() || line_number == 0 {
        return None;
    }

    let line = source.lines().nth(line_number as usize - 1)?;
    let previous_line = if line_number > 1 {
        source.lines().nth(line_number as usize - 2)
    } else {
        None
    };
    let message_lower = message.to_lowercase();
    let context = FixContext {
        message,
        message_lower: &message_lower,
        line,
        previous_line,
        line_number,
    };

    // Builders re-check the line itself, so a matching pattern whose edit
    // does not apply falls through to later rules.
    rules_for(language).iter().find_map(|rule| {
        let matched = rule
            .patterns
            .iter()
            .any(|pattern| context.message_lower.contains(pattern));
        if matched {
            (rule.build)(&context)
        } else {
            None
        }
    })
}

fn line_end_column(line: &str) -> u32 {
    line.chars().count() as u32 + 1
}

fn ends_like_statement(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.ends_with(';') || trimmed.ends_with('{') || trimmed.ends_with('}')
}

fn append_semicolon(context: &FixContext) -> Option<EditDescriptor> {
    if ends_like_statement(context.line) {
        return None;
    }
    Some(EditDescriptor::Insert {
        text: ";".to_string(),
        line: context.line_number,
        column: line_end_column(context.line),
    })
}

fn declare_variable(context: &FixContext) -> Option<EditDescriptor> {
    let quoted = Regex::new(r"'([^']+)'").ok()?;
    let name = quoted.captures(context.message)?.get(1)?.as_str();
    Some(EditDescriptor::Insert {
        text: format!("let {} = ", name),
        line: context.line_number,
        column: 1,
    })
}

fn append_colon(context: &FixContext) -> Option<EditDescriptor> {
    const CONTROL_KEYWORDS: [&str; 5] = ["if ", "for ", "while ", "def ", "class "];
    if !CONTROL_KEYWORDS.iter().any(|kw| context.line.contains(kw)) {
        return None;
    }
    if context.line.trim().ends_with(':') {
        return None;
    }
    Some(EditDescriptor::Insert {
        text: ":".to_string(),
        line: context.line_number,
        column: line_end_column(context.line),
    })
}

fn indent_after_colon(context: &FixContext) -> Option<EditDescriptor> {
    // Only indent when the previous line opened a block.
    if !context.previous_line?.trim().ends_with(':') {
        return None;
    }
    Some(EditDescriptor::Insert {
        text: "    ".to_string(),
        line: context.line_number,
        column: 1,
    })
}

fn include_stdio(context: &FixContext) -> Option<EditDescriptor> {
    if !context.message_lower.contains("printf") {
        return None;
    }
    Some(EditDescriptor::Insert {
        text: "#include <stdio.h>\n".to_string(),
        line: 1,
        column: 1,
    })
}

fn prefix_dollar(context: &FixContext) -> Option<EditDescriptor> {
    let name = undefined_variable_name(context.message)
        .or_else(|| first_bare_word(context.line))?;

    if context.line.contains(&format!("${}", name)) {
        return None;
    }

    let word = Regex::new(&format!(r"\b{}\b", regex::escape(&name))).ok()?;
    let found = word.find_iter(context.line).find(|m| {
        let preceded_by_sigil = context.line[..m.start()].chars().next_back() == Some('$');
        let followed_by_assignment = context.line[m.end()..].trim_start().starts_with('=');
        !preceded_by_sigil && !followed_by_assignment
    })?;

    let start_column = context.line[..found.start()].chars().count() as u32 + 1;
    Some(EditDescriptor::Replace {
        text: format!("${}", name),
        start_line: context.line_number,
        start_column,
        end_line: context.line_number,
        end_column: start_column + name.chars().count() as u32,
    })
}

/// Pull the variable name out of an "Undefined variable" message.
fn undefined_variable_name(message: &str) -> Option<String> {
    let re = Regex::new(r"[Uu]ndefined variable:?\s*\$?'?([a-zA-Z_][a-zA-Z0-9_]*)").ok()?;
    Some(re.captures(message)?.get(1)?.as_str().to_string())
}

/// First word on the line that is not the left-hand side of an assignment.
fn first_bare_word(line: &str) -> Option<String> {
    let word = Regex::new(r"\b([a-zA-Z_][a-zA-Z0-9_]*)\b").ok()?;
    for m in word.find_iter(line) {
        if !line[m.end()..].trim_start().starts_with('=') {
            return Some(m.as_str().to_string());
        }
    }
    None
}
