//! Dependency resolution and file inclusion.
//!
//! Folds declared scripts and stylesheets into the bundle through an
//! explicit worklist: discovered entries are pushed onto a queue and
//! drained in order, so manifest declaration order is emission order. The
//! manifest hook is the only producer of new work. Duplicate declarations
//! are re-read and re-emitted; there is no inclusion guard.

use std::{collections::VecDeque, path::Path};

use sitefold_core::{CoreError, SourceFile};
use sitefold_parser::{extract_rules, ManifestEntry, ManifestError, ManifestScanner};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    bundle::Bundle,
    filters::{FilterError, FilterRegistry, Hook, HookRegistry},
};

/// Rule suppressing the hosted-docs help affordance, which has nothing to
/// point at in a folded bundle; appended after every manifest resolution.
const HIDE_HELP_RULE: &str = ".helpButton.docs { display: none; }";

/// Resolution errors.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Source file error.
    #[error("source error: {0}")]
    Source(#[from] CoreError),

    /// Filter error.
    #[error("filter error: {0}")]
    Filter(#[from] FilterError),

    /// Manifest error.
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),
}

/// Result type for resolution operations.
pub type Result<T> = std::result::Result<T, ResolveError>;

/// One queued inclusion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Include {
    /// Fold a script file in as a fragment.
    Script(String),
    /// Fold a stylesheet file into the rule list.
    Style(String),
    /// Append one literal rule. Queued behind a manifest's declared
    /// entries so it lands after every rule they contribute.
    Rule(String),
}

/// Worklist-driven resolver over the project's declared files.
pub struct Resolver<'a> {
    project_dir: &'a Path,
    filters: &'a FilterRegistry,
    hooks: &'a HookRegistry,
    scanner: ManifestScanner,
    queue: VecDeque<Include>,
    scripts_included: usize,
    styles_included: usize,
}

impl<'a> Resolver<'a> {
    /// Create a resolver with an empty worklist.
    #[must_use]
    pub fn new(project_dir: &'a Path, filters: &'a FilterRegistry, hooks: &'a HookRegistry) -> Self {
        Self {
            project_dir,
            filters,
            hooks,
            scanner: ManifestScanner::new(),
            queue: VecDeque::new(),
            scripts_included: 0,
            styles_included: 0,
        }
    }

    /// Push an inclusion onto the worklist.
    pub fn enqueue(&mut self, include: Include) {
        self.queue.push_back(include);
    }

    /// Drain the worklist, folding every entry into the bundle.
    pub fn run(&mut self, bundle: &mut Bundle) -> Result<()> {
        while let Some(include) = self.queue.pop_front() {
            match include {
                Include::Script(name) => self.include_script(&name, bundle)?,
                Include::Style(name) => self.include_style(&name, bundle)?,
                Include::Rule(rule) => bundle.push_rule(rule),
            }
        }
        Ok(())
    }

    /// Number of scripts folded in so far.
    #[must_use]
    pub fn scripts_included(&self) -> usize {
        self.scripts_included
    }

    /// Number of stylesheets folded in so far.
    #[must_use]
    pub fn styles_included(&self) -> usize {
        self.styles_included
    }

    /// Read, filter, and emit one script; run its hook afterward.
    fn include_script(&mut self, name: &str, bundle: &mut Bundle) -> Result<()> {
        debug!(file = name, "including script");
        let file = SourceFile::read(self.project_dir, name)?;
        let text = self.filters.apply(name, file.into_text())?;
        bundle.push_file_fragment(name, &text);
        self.scripts_included += 1;

        if let Some(Hook::ResolveManifest) = self.hooks.get(name) {
            self.resolve_manifest(name, &text, bundle)?;
        }
        Ok(())
    }

    /// Read, filter, and extract one stylesheet into the rule list.
    fn include_style(&mut self, name: &str, bundle: &mut Bundle) -> Result<()> {
        debug!(file = name, "including stylesheet");
        let file = SourceFile::read(self.project_dir, name)?;
        let text = self.filters.apply(name, file.into_text())?;
        bundle.extend_rules(extract_rules(&text));
        self.styles_included += 1;
        Ok(())
    }

    /// Queue every declared manifest entry, then hide the help affordance.
    fn resolve_manifest(&mut self, name: &str, text: &str, bundle: &mut Bundle) -> Result<()> {
        let declared = self.scanner.declared_files(text, Path::new(name))?;
        info!(file = name, count = declared.len(), "resolving manifest");

        for entry in &declared {
            match ManifestEntry::classify(entry) {
                Some(ManifestEntry::Script(file)) => self.queue.push_back(Include::Script(file)),
                Some(ManifestEntry::Style(file)) => self.queue.push_back(Include::Style(file)),
                None => debug!(file = %entry, "skipping unrecognized manifest entry"),
            }
        }

        self.queue
            .push_back(Include::Rule(HIDE_HELP_RULE.to_string()));
        Ok(())
    }
}
