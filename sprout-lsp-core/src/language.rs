use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of languages the Sprout editor supports.
///
/// Identifiers match the language ids the editing client sends in
/// `textDocument/didOpen` and the ids the execution runner accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    C,
    Cpp,
    JavaScript,
    TypeScript,
    Python,
    Php,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::C,
        Language::Cpp,
        Language::JavaScript,
        Language::TypeScript,
        Language::Python,
        Language::Php,
    ];

    /// Canonical language id string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Python => "python",
            Language::Php => "php",
        }
    }

    /// File extension used when handing source to the execution runner.
    pub fn extension(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::JavaScript => "js",
            Language::TypeScript => "ts",
            Language::Python => "py",
            Language::Php => "php",
        }
    }

    /// Resolve an editor-supplied language id, accepting the short aliases
    /// some clients send for JavaScript and TypeScript.
    pub fn from_language_id(id: &str) -> Option<Language> {
        match id.to_lowercase().as_str() {
            "c" => Some(Language::C),
            "cpp" | "c++" => Some(Language::Cpp),
            "javascript" | "js" => Some(Language::JavaScript),
            "typescript" | "ts" => Some(Language::TypeScript),
            "python" => Some(Language::Python),
            "php" => Some(Language::Php),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_language_id(s).ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

/// Error returned when a language id is outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language id: {0}")]
pub struct UnknownLanguage(pub String);
