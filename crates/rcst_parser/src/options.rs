//! Parser configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Knobs that change how permissive the grammar engine is.
///
/// Every field has a default, so a JSON document only needs to name the
/// options it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParserOptions {
    /// Nesting limit for recursive constructs. Deeper input is wrapped in an
    /// error node instead of recursing further.
    pub max_depth: u32,
    /// Accept the deprecated `fn f(u32)` parameter form.
    pub allow_anonymous_parameters: bool,
    /// Accept `static ref NAME: T = ...;`.
    pub allow_static_ref: bool,
    /// Keep comments as extra nodes in the tree.
    pub keep_comments: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_depth: 200,
            allow_anonymous_parameters: true,
            allow_static_ref: true,
            keep_comments: true,
        }
    }
}

#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("Failed to read options file '{path}': {error}")]
    Read { path: PathBuf, error: std::io::Error },
    #[error("Invalid parser options: {0}")]
    Invalid(#[from] serde_json::Error),
}

impl ParserOptions {
    /// Parse options from a JSON document.
    pub fn from_json(text: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|error| OptionsError::Read {
            path: path.to_path_buf(),
            error,
        })?;
        Self::from_json(&text)
    }

    /// Options that reject the lenient forms.
    pub fn strict() -> Self {
        Self {
            allow_anonymous_parameters: false,
            allow_static_ref: false,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_document() {
        assert_eq!(ParserOptions::from_json("{}").unwrap(), ParserOptions::default());
    }

    #[test]
    fn test_camel_case_fields() {
        let options =
            ParserOptions::from_json(r#"{"maxDepth": 8, "allowStaticRef": false}"#).unwrap();
        assert_eq!(options.max_depth, 8);
        assert!(!options.allow_static_ref);
        assert!(options.allow_anonymous_parameters);
        assert!(options.keep_comments);
    }

    #[test]
    fn test_invalid_document() {
        let err = ParserOptions::from_json(r#"{"maxDepth": "deep"}"#).unwrap_err();
        assert!(matches!(err, OptionsError::Invalid(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = ParserOptions::load("/nonexistent/rcst-options.json").unwrap_err();
        assert!(matches!(err, OptionsError::Read { .. }));
    }
}
