//! Dependency manifest scanning.
//!
//! The manifest is a script file declaring an ordered list of dependent
//! filenames: an assignment whose right-hand side is a bracketed list of
//! quoted strings. Declaration order is inclusion order.

use std::path::{Path, PathBuf};

use regex::Regex;
use thiserror::Error;

/// Manifest scanning errors.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The declared file list could not be located.
    #[error("Malformed manifest {path}: declared file list not found")]
    ListNotFound { path: PathBuf },
}

/// Result type for manifest operations.
pub type Result<T> = std::result::Result<T, ManifestError>;

/// One declared manifest entry, classified by extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestEntry {
    /// A `.js` file, folded in as a script.
    Script(String),
    /// A `.css` file, folded into the rule list.
    Style(String),
}

impl ManifestEntry {
    /// Classify a declared filename; unrecognized extensions yield `None`.
    #[must_use]
    pub fn classify(name: &str) -> Option<Self> {
        match Path::new(name).extension().and_then(|e| e.to_str()) {
            Some("js") => Some(Self::Script(name.to_string())),
            Some("css") => Some(Self::Style(name.to_string())),
            _ => None,
        }
    }
}

/// Scanner for the manifest's declared file list.
#[derive(Debug)]
pub struct ManifestScanner {
    list_re: Regex,
    name_re: Regex,
}

impl Default for ManifestScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestScanner {
    /// Create a scanner with its patterns compiled up front.
    #[must_use]
    pub fn new() -> Self {
        Self {
            list_re: Regex::new(r"files\s*=\s*\[([\s\S]*?)\]").unwrap(),
            name_re: Regex::new(r#""(.+?)""#).unwrap(),
        }
    }

    /// Extract the declared filenames in declaration order.
    ///
    /// `path` is used only for the error message when the list is absent.
    pub fn declared_files(&self, text: &str, path: &Path) -> Result<Vec<String>> {
        let list = self
            .list_re
            .captures(text)
            .ok_or_else(|| ManifestError::ListNotFound {
                path: path.to_path_buf(),
            })?;

        Ok(self
            .name_re
            .captures_iter(&list[1])
            .map(|caps| caps[1].to_string())
            .collect())
    }
}
