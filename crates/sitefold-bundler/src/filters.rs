//! Per-file content transforms and post-emission hooks.
//!
//! A [`Transform`] rewrites one source file's text before it joins the
//! bundle. The registry maps project-relative file names to transforms;
//! files without an entry pass through unchanged. Hooks are the
//! post-emission counterpart: side-effecting follow-ups keyed the same way,
//! with a no-op default.

use std::{collections::HashMap, fs, path::PathBuf};

use base64::Engine;
use regex::Regex;
use thiserror::Error;

/// Filter errors.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A referenced image resource could not be read.
    #[error("Missing image resource {path}: {source}")]
    Resource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for filter operations.
pub type Result<T> = std::result::Result<T, FilterError>;

/// A per-file source-text transform.
pub trait Transform {
    /// Rewrite the file's text.
    fn apply(&self, text: &str) -> Result<String>;
}

/// Registry mapping file names to transforms, identity by default.
#[derive(Default)]
pub struct FilterRegistry {
    transforms: HashMap<String, Box<dyn Transform>>,
}

impl FilterRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transform for a file name, replacing any previous one.
    pub fn register(&mut self, file: impl Into<String>, transform: Box<dyn Transform>) {
        self.transforms.insert(file.into(), transform);
    }

    /// Apply the registered transform, or return the text unchanged.
    pub fn apply(&self, file: &str, text: String) -> Result<String> {
        match self.transforms.get(file) {
            Some(transform) => transform.apply(&text),
            None => Ok(text),
        }
    }
}

/// Side-effecting follow-up run after a file's content is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    /// Parse the file's declared dependency list and fold each entry in.
    ResolveManifest,
}

/// Registry mapping file names to hooks, no-op by default.
#[derive(Debug, Default)]
pub struct HookRegistry {
    hooks: HashMap<String, Hook>,
}

impl HookRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook for a file name.
    pub fn register(&mut self, file: impl Into<String>, hook: Hook) {
        self.hooks.insert(file.into(), hook);
    }

    /// Look up the hook for a file name.
    #[must_use]
    pub fn get(&self, file: &str) -> Option<Hook> {
        self.hooks.get(file).copied()
    }
}

/// Inline quoted image references as `data:` URIs.
///
/// Every quoted string literal ending in a recognized image extension is
/// resolved against the resource directory, base64-encoded, and substituted
/// throughout the text. Assignments to a `baseUrl` variable are blanked so
/// relative lookups become empty-prefixed; with every path inlined they are
/// dead anyway. Each distinct resource is read once. A missing resource
/// aborts the build.
pub struct InlineImages {
    resource_dir: PathBuf,
    image_re: Regex,
    base_url_re: Regex,
}

impl InlineImages {
    /// Create the transform for a resource directory.
    #[must_use]
    pub fn new(resource_dir: impl Into<PathBuf>) -> Self {
        Self {
            resource_dir: resource_dir.into(),
            image_re: Regex::new(r#"['"]([^'"]+\.(png|gif|jpe?g))['"]"#).unwrap(),
            base_url_re: Regex::new(r"(baseUrl\s*=\s*).*").unwrap(),
        }
    }

    /// Encode one resource file as a `data:` URI.
    fn data_uri(&self, filename: &str, ext: &str) -> Result<String> {
        let path = self.resource_dir.join(filename);
        let bytes = fs::read(&path).map_err(|source| FilterError::Resource { path, source })?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
        let subtype = if ext == "jpg" { "jpeg" } else { ext };
        Ok(format!("data:image/{subtype};base64,{encoded}"))
    }
}

impl Transform for InlineImages {
    fn apply(&self, text: &str) -> Result<String> {
        let mut out = self
            .base_url_re
            .replace_all(text, "${1}\"\";")
            .into_owned();

        let mut refs: Vec<(String, String)> = Vec::new();
        for caps in self.image_re.captures_iter(&out) {
            let filename = caps[1].to_string();
            if refs.iter().all(|(f, _)| f != &filename) {
                refs.push((filename, caps[2].to_string()));
            }
        }

        for (filename, ext) in &refs {
            let uri = self.data_uri(filename, ext)?;
            out = out.replace(filename.as_str(), &uri);
        }

        Ok(out)
    }
}

/// Literal rewrites removing runtime file-loading behavior.
///
/// Pattern-literal only, no semantic analysis: the progress-count term and
/// the load call are commented out, the version query token is deleted, and
/// everything else stays byte-identical.
pub struct StripRuntimeLoads {
    progress_re: Regex,
}

/// Progress-bar item-count term summing the declared file list.
const PROGRESS_TERM: &str = r"\+\s*files\.length";
/// Runtime loader entry call, dead once every file is folded in.
const LOAD_CALL: &str = "loadFiles()";
/// Version-lookup request doubling as a cache buster.
const VERSION_TOKEN: &str = "version_info.php";

impl Default for StripRuntimeLoads {
    fn default() -> Self {
        Self::new()
    }
}

impl StripRuntimeLoads {
    /// Create the transform.
    #[must_use]
    pub fn new() -> Self {
        Self {
            progress_re: Regex::new(PROGRESS_TERM).unwrap(),
        }
    }
}

impl Transform for StripRuntimeLoads {
    fn apply(&self, text: &str) -> Result<String> {
        let out = self.progress_re.replace_all(text, "/* ${0} */");
        let out = out.replace(LOAD_CALL, "/* loadFiles() */");
        Ok(out.replace(VERSION_TOKEN, ""))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_registry_default_is_identity() {
        let registry = FilterRegistry::new();
        let out = registry.apply("js/app.js", "var x = 1;".to_string()).unwrap();
        assert_eq!(out, "var x = 1;");
    }

    #[test]
    fn test_registry_dispatches_by_file() {
        let mut registry = FilterRegistry::new();
        registry.register("js/loader.js", Box::new(StripRuntimeLoads::new()));

        let touched = registry
            .apply("js/loader.js", "loadFiles();".to_string())
            .unwrap();
        assert_eq!(touched, "/* loadFiles() */;");

        let untouched = registry
            .apply("js/other.js", "loadFiles();".to_string())
            .unwrap();
        assert_eq!(untouched, "loadFiles();");
    }

    #[test]
    fn test_hook_registry_default_is_noop() {
        let hooks = HookRegistry::new();
        assert_eq!(hooks.get("js/app.js"), None);
    }

    #[test]
    fn test_hook_registry_lookup() {
        let mut hooks = HookRegistry::new();
        hooks.register("js/loader.js", Hook::ResolveManifest);
        assert_eq!(hooks.get("js/loader.js"), Some(Hook::ResolveManifest));
    }

    #[test]
    fn test_inline_images_encodes_fixture() {
        let dir = TempDir::new().unwrap();
        let bytes: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
        fs::write(dir.path().join("icon.png"), bytes).unwrap();

        let transform = InlineImages::new(dir.path());
        let out = transform.apply("var icon = 'icon.png';").unwrap();

        let expected = base64::engine::general_purpose::STANDARD.encode(bytes);
        assert!(out.contains(&format!("data:image/png;base64,{expected}")));
        assert!(!out.contains("'icon.png'"));
    }

    #[test]
    fn test_inline_images_replaces_every_occurrence() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("icon.png"), [1u8, 2, 3]).unwrap();

        let transform = InlineImages::new(dir.path());
        let out = transform
            .apply("var a = 'icon.png', b = \"icon.png\";")
            .unwrap();
        assert!(!out.contains("icon.png"));
        assert_eq!(out.matches("data:image/png;base64,").count(), 2);
    }

    #[test]
    fn test_inline_images_idempotent_once_inlined() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("icon.png"), [1u8, 2, 3]).unwrap();

        let transform = InlineImages::new(dir.path());
        let once = transform.apply("var icon = 'icon.png';").unwrap();
        let twice = transform.apply(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_inline_images_blanks_base_url() {
        let dir = TempDir::new().unwrap();
        let transform = InlineImages::new(dir.path());
        let out = transform.apply("theme.baseUrl = 'res/';").unwrap();
        assert_eq!(out, "theme.baseUrl = \"\";");
    }

    #[test]
    fn test_inline_images_missing_resource_is_fatal() {
        let dir = TempDir::new().unwrap();
        let transform = InlineImages::new(dir.path());
        let err = transform.apply("var icon = 'absent.png';").unwrap_err();
        assert!(err.to_string().contains("absent.png"));
    }

    #[test]
    fn test_inline_images_jpg_mime_subtype() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("photo.jpg"), [1u8]).unwrap();

        let transform = InlineImages::new(dir.path());
        let out = transform.apply("var p = 'photo.jpg';").unwrap();
        assert!(out.contains("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_strip_comments_out_progress_term() {
        let transform = StripRuntimeLoads::new();
        let out = transform.apply("items = 2 + files.length,").unwrap();
        assert_eq!(out, "items = 2 /* + files.length */,");
    }

    #[test]
    fn test_strip_comments_out_load_call() {
        let transform = StripRuntimeLoads::new();
        let out = transform.apply("\tloadFiles();").unwrap();
        assert_eq!(out, "\t/* loadFiles() */;");
    }

    #[test]
    fn test_strip_removes_version_token() {
        let transform = StripRuntimeLoads::new();
        let out = transform.apply("get('version_info.php?v=3');").unwrap();
        assert_eq!(out, "get('?v=3');");
    }

    #[test]
    fn test_strip_leaves_everything_else_untouched() {
        let transform = StripRuntimeLoads::new();
        let src = "var files = ['a.js'];\nconsole.log(files.length);";
        assert_eq!(transform.apply(src).unwrap(), src);
    }
}
