//! Language family detection.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Coarse language bucket used to pick pattern detectors and style checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageFamily {
    Python,
    JavaScript,
    TypeScript,
    Java,
    Cpp,
    Rust,
    Go,
    Ruby,
    Php,
    Html,
    Css,
    Json,
    Markdown,
    Yaml,
    Unknown,
}

impl LanguageFamily {
    /// Detect the language family from a file path's extension.
    ///
    /// Paths without an extension map to [`LanguageFamily::Unknown`].
    pub fn detect(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unknown)
    }

    /// Get the language family for a file extension.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "py" | "pyi" => Self::Python,
            "js" | "mjs" | "cjs" | "jsx" => Self::JavaScript,
            "ts" | "tsx" | "mts" | "cts" => Self::TypeScript,
            "java" => Self::Java,
            "c" | "h" | "cpp" | "cc" | "cxx" | "hpp" | "hxx" | "hh" => Self::Cpp,
            "rs" => Self::Rust,
            "go" => Self::Go,
            "rb" | "rake" => Self::Ruby,
            "php" => Self::Php,
            "html" | "htm" => Self::Html,
            "css" => Self::Css,
            "json" => Self::Json,
            "md" | "markdown" => Self::Markdown,
            "yml" | "yaml" => Self::Yaml,
            _ => Self::Unknown,
        }
    }

    /// Stable lowercase identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Java => "java",
            Self::Cpp => "cpp",
            Self::Rust => "rust",
            Self::Go => "go",
            Self::Ruby => "ruby",
            Self::Php => "php",
            Self::Html => "html",
            Self::Css => "css",
            Self::Json => "json",
            Self::Markdown => "markdown",
            Self::Yaml => "yaml",
            Self::Unknown => "unknown",
        }
    }

    /// JavaScript and TypeScript share detectors and style rules.
    pub fn is_js_like(&self) -> bool {
        matches!(self, Self::JavaScript | Self::TypeScript)
    }

    /// Languages whose fixes tend to need more ceremony per change.
    pub fn is_verbose(&self) -> bool {
        matches!(self, Self::Java | Self::Cpp | Self::Rust)
    }
}

impl std::fmt::Display for LanguageFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
