//! Build orchestration.
//!
//! Coordinates the full bundling pipeline for one invocation.

use std::{
    fs,
    path::PathBuf,
    time::Instant,
};

use sitefold_core::{Config, CoreError, SourceFile};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    bundle::{Bundle, BundleError},
    filters::{FilterRegistry, Hook, HookRegistry, InlineImages, StripRuntimeLoads},
    loader::DocumentLoader,
    resolver::{Include, ResolveError, Resolver},
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Core error.
    #[error("source error: {0}")]
    Source(#[from] CoreError),

    /// Resolution error.
    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    /// Bundle assembly error.
    #[error("bundle error: {0}")]
    Bundle(#[from] BundleError),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Number of scripts folded in.
    pub scripts: usize,

    /// Number of stylesheets folded in.
    pub stylesheets: usize,

    /// Number of style rules collected.
    pub rules: usize,

    /// Number of statement fragments emitted.
    pub fragments: usize,

    /// Size of the written artifact in bytes.
    pub output_bytes: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Bundler that orchestrates one build.
#[derive(Debug)]
pub struct Builder {
    config: Config,
    project_dir: PathBuf,
}

impl Builder {
    /// Create a new builder rooted at the project directory.
    #[must_use]
    pub fn new(config: Config, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            project_dir: project_dir.into(),
        }
    }

    /// Execute the full bundling pipeline and write the artifact.
    pub fn build(&self) -> Result<BuildStats> {
        let start = Instant::now();
        let mut stats = BuildStats::default();

        info!(
            document = %self.config.bundle.document,
            manifest = %self.config.bundle.manifest,
            output = %self.config.bundle.output,
            minify = self.config.bundle.minify,
            "starting bundle build"
        );

        // 1. Registries from configuration
        let filters = self.filter_registry();
        let hooks = self.hook_registry();

        // 2. The build context: one bundle, one worklist
        let mut bundle = Bundle::new(self.config.bundle.minify);
        let mut resolver = Resolver::new(&self.project_dir, &filters, &hooks);

        // 3. Root document first
        let document = SourceFile::read(&self.project_dir, &self.config.bundle.document)?;
        let loader = DocumentLoader::new(&self.config.bundle.root_id);
        loader.load(&document, &mut bundle, &mut resolver);

        // 4. Manifest script and everything it declares
        resolver.enqueue(Include::Script(self.config.bundle.manifest.clone()));
        resolver.run(&mut bundle)?;

        stats.scripts = resolver.scripts_included();
        stats.stylesheets = resolver.styles_included();
        stats.rules = bundle.rules().len();
        stats.fragments = bundle.fragments().len();

        // 5. Assemble and write the artifact
        let output = bundle.finalize()?;
        stats.output_bytes = output.len();

        let output_path = self.project_dir.join(&self.config.bundle.output);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, &output)?;
        debug!(path = %output_path.display(), bytes = stats.output_bytes, "wrote artifact");

        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            scripts = stats.scripts,
            stylesheets = stats.stylesheets,
            rules = stats.rules,
            fragments = stats.fragments,
            output_bytes = stats.output_bytes,
            duration_ms = stats.duration_ms,
            "bundle complete"
        );

        Ok(stats)
    }

    /// Build the filter registry from configuration.
    fn filter_registry(&self) -> FilterRegistry {
        let mut filters = FilterRegistry::new();

        if self.config.filters.strip_loader {
            filters.register(
                self.config.bundle.manifest.clone(),
                Box::new(StripRuntimeLoads::new()),
            );
        }

        let resource_dir = self.project_dir.join(&self.config.resources.dir);
        for file in &self.config.filters.inline_images {
            filters.register(file.clone(), Box::new(InlineImages::new(&resource_dir)));
        }

        filters
    }

    /// Build the hook registry: the manifest resolves its declared list.
    fn hook_registry(&self) -> HookRegistry {
        let mut hooks = HookRegistry::new();
        hooks.register(self.config.bundle.manifest.clone(), Hook::ResolveManifest);
        hooks
    }
}
