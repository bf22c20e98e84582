//! Source file handling.
//!
//! A [`SourceFile`] pairs a file's project-relative name with its text
//! content, read exactly once and immutable afterward.

use std::{fs, path::Path};

use crate::error::{CoreError, Result};

/// A source file participating in the bundle.
#[derive(Debug, Clone)]
pub struct SourceFile {
    name: String,
    text: String,
}

impl SourceFile {
    /// Read a source file from disk.
    ///
    /// `name` is the project-relative identifier used in filter lookups and
    /// output banners; `project_dir` is the directory it resolves against.
    pub fn read(project_dir: &Path, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let path = project_dir.join(&name);
        let text = fs::read_to_string(&path).map_err(|e| CoreError::read(path, e))?;
        Ok(Self { name, text })
    }

    /// Create a source file from already-loaded text.
    #[must_use]
    pub fn from_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Project-relative name of the file.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw text content.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume the file, yielding its text.
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_read_source_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("js")).unwrap();
        fs::write(dir.path().join("js/app.js"), "var x = 1;").unwrap();

        let file = SourceFile::read(dir.path(), "js/app.js").unwrap();
        assert_eq!(file.name(), "js/app.js");
        assert_eq!(file.text(), "var x = 1;");
    }

    #[test]
    fn test_read_missing_file_names_path() {
        let dir = TempDir::new().unwrap();
        let err = SourceFile::read(dir.path(), "js/missing.js").unwrap_err();
        assert!(err.to_string().contains("missing.js"));
    }

    #[test]
    fn test_from_text() {
        let file = SourceFile::from_text("inline", "body {}");
        assert_eq!(file.name(), "inline");
        assert_eq!(file.into_text(), "body {}");
    }
}
