//! Kid-friendly explanations for raw diagnostic messages.
//!
//! Each language carries an ordered table of (pattern, advice) entries. A raw
//! message is matched by plain substring search, first entry wins; there is
//! no specificity ranking. Messages nothing matches fall back to a generic
//! explanation, so the lookup is total.

use crate::language::Language;
use serde::Serialize;

/// An explanation/suggestion pair for display next to a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Advice {
    pub explanation: &'static str,
    pub suggestion: &'static str,
}

/// Returned when no pattern matches the raw message.
pub const FALLBACK: Advice = Advice {
    explanation: "There seems to be a problem with your code.",
    suggestion: "Check for typos, missing symbols, or other mistakes in this area.",
};

const JAVASCRIPT: &[(&str, Advice)] = &[
    (
        "Unexpected token",
        Advice {
            explanation: "Oops! There's something in your code that JavaScript doesn't understand.",
            suggestion: "Check for missing brackets, quotes, or parentheses near this line.",
        },
    ),
    (
        "Expected expression",
        Advice {
            explanation: "JavaScript was looking for a value or action here, but couldn't find one!",
            suggestion: "Make sure you haven't left any statements empty.",
        },
    ),
    (
        "Expected identifier",
        Advice {
            explanation: "JavaScript was expecting a name for something, but couldn't find one.",
            suggestion: "Check if you missed naming a variable or function.",
        },
    ),
    (
        "Missing semicolon",
        Advice {
            explanation: "You forgot a semicolon at the end of a line. Semicolons tell JavaScript when a statement is finished.",
            suggestion: "Add a semicolon (;) at the end of the line.",
        },
    ),
    (
        "Unexpected semicolon",
        Advice {
            explanation: "You put a semicolon where JavaScript wasn't expecting one.",
            suggestion: "Try removing the extra semicolon.",
        },
    ),
    (
        "Undefined variable",
        Advice {
            explanation: "You're trying to use a variable that hasn't been created yet.",
            suggestion: "Make sure you've declared the variable with 'let', 'const', or 'var' before using it.",
        },
    ),
    (
        "Cannot read property",
        Advice {
            explanation: "You're trying to use a property of something that doesn't exist or is undefined.",
            suggestion: "Check if your object or variable exists before trying to use its properties.",
        },
    ),
];

const TYPESCRIPT: &[(&str, Advice)] = &[
    (
        "Type error",
        Advice {
            explanation: "TypeScript expected one type but got a different type instead.",
            suggestion: "Make sure your variable types match what you're trying to do with them.",
        },
    ),
    (
        "Cannot find name",
        Advice {
            explanation: "TypeScript can't find the name of something you're trying to use.",
            suggestion: "Check if you've declared the variable or imported the module you're trying to use.",
        },
    ),
    (
        "Property does not exist",
        Advice {
            explanation: "You're trying to use a property that doesn't exist on this object.",
            suggestion: "Double-check the spelling or make sure the property exists on your object.",
        },
    ),
];

const PYTHON: &[(&str, Advice)] = &[
    (
        "SyntaxError",
        Advice {
            explanation: "There's a mistake in how you've written your Python code.",
            suggestion: "Check for missing colons after if/for/while statements or indentation issues.",
        },
    ),
    (
        "IndentationError",
        Advice {
            explanation: "Python uses spaces at the beginning of lines to organize code. Something is wrong with your spaces.",
            suggestion: "Make sure all lines inside functions or loops have the same number of spaces at the beginning.",
        },
    ),
    (
        "NameError",
        Advice {
            explanation: "You're trying to use a variable or function that doesn't exist yet.",
            suggestion: "Check if you've created the variable before using it. Remember Python is case-sensitive!",
        },
    ),
    (
        "TypeError",
        Advice {
            explanation: "You're trying to do something with an object that it can't do.",
            suggestion: "Check if you're using the right type of value. For example, you can't add a number to a string without converting it.",
        },
    ),
    (
        "ImportError",
        Advice {
            explanation: "Python couldn't find the module you're trying to import.",
            suggestion: "Check the spelling of the module name or make sure it's installed.",
        },
    ),
];

const CPP: &[(&str, Advice)] = &[
    (
        "expected",
        Advice {
            explanation: "C++ was expecting something different in your code.",
            suggestion: "Check for missing semicolons, brackets, or parentheses.",
        },
    ),
    (
        "undeclared identifier",
        Advice {
            explanation: "You're trying to use a variable that hasn't been created yet.",
            suggestion: "Make sure you've declared the variable before using it.",
        },
    ),
    (
        "no matching function",
        Advice {
            explanation: "C++ couldn't find a function that matches what you're trying to call.",
            suggestion: "Check if the function name is spelled correctly and if you're passing the right number and types of arguments.",
        },
    ),
    (
        "expected ';'",
        Advice {
            explanation: "You forgot a semicolon at the end of a line. Semicolons tell C++ when a statement is finished.",
            suggestion: "Add a semicolon (;) at the end of the line.",
        },
    ),
];

const PHP: &[(&str, Advice)] = &[
    (
        "Parse error",
        Advice {
            explanation: "PHP couldn't understand part of your code.",
            suggestion: "Check for missing semicolons, brackets, or the PHP opening tag (<?php).",
        },
    ),
    (
        "Undefined variable",
        Advice {
            explanation: "You're trying to use a variable that hasn't been created yet.",
            suggestion: "Make sure you've created the variable with '$' before using it.",
        },
    ),
    (
        "Call to undefined function",
        Advice {
            explanation: "You're trying to use a function that doesn't exist.",
            suggestion: "Check the spelling of the function name or if you need to include a library.",
        },
    ),
    (
        "Missing argument",
        Advice {
            explanation: "You didn't provide all the required information to a function.",
            suggestion: "Check how many arguments the function needs and provide all of them.",
        },
    ),
];

const C: &[(&str, Advice)] = &[
    (
        "undeclared identifier",
        Advice {
            explanation: "You're trying to use a variable that hasn't been created yet.",
            suggestion: "Make sure you've declared the variable before using it.",
        },
    ),
    (
        "expected",
        Advice {
            explanation: "C was expecting something different in your code.",
            suggestion: "Check for missing semicolons, brackets, or parentheses.",
        },
    ),
    (
        "implicit declaration",
        Advice {
            explanation: "You're using a function that C doesn't know about yet.",
            suggestion: "Make sure you've included the right header file for the function you're using.",
        },
    ),
];

/// Ordered knowledge entries for one language.
pub fn entries(language: Language) -> &'static [(&'static str, Advice)] {
    match language {
        Language::JavaScript => JAVASCRIPT,
        Language::TypeScript => TYPESCRIPT,
        Language::Python => PYTHON,
        Language::Cpp => CPP,
        Language::Php => PHP,
        Language::C => C,
    }
}

/// Look up a kid-friendly explanation for a raw diagnostic message.
///
/// Total function: unmatched messages get the generic [`FALLBACK`].
pub fn explain(raw_message: &str, language: Language) -> Advice {
    entries(language)
        .iter()
        .find(|(pattern, _)| raw_message.contains(pattern))
        .map(|(_, advice)| *advice)
        .unwrap_or(FALLBACK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_match_wins_in_declaration_order() {
        // "expected ';'" also contains "expected", which is declared earlier
        // for C++; the earlier entry wins.
        let advice = explain("error: expected ';' before 'return'", Language::Cpp);
        assert_eq!(
            advice.explanation,
            "C++ was expecting something different in your code."
        );
    }

    #[test]
    fn test_python_syntax_error_lookup() {
        let advice = explain("SyntaxError: invalid syntax", Language::Python);
        assert!(advice.suggestion.contains("missing colons"));
    }

    #[test]
    fn test_php_undefined_variable_lookup() {
        let advice = explain("Undefined variable: count", Language::Php);
        assert!(advice.suggestion.contains('$'));
    }

    #[test]
    fn test_fallback_is_identical_across_languages() {
        for language in Language::ALL {
            let advice = explain("some unmatched gibberish", language);
            assert_eq!(advice, FALLBACK);
        }
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        // The knowledge base matches raw compiler spellings exactly.
        assert_eq!(explain("syntaxerror: oops", Language::Python), FALLBACK);
    }
}
