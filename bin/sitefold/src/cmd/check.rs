//! Check command - validate configuration and referenced files

use std::{fs, path::Path};

use color_eyre::eyre::{bail, Result};
use sitefold_bundler::{InlineImages, Transform};
use sitefold_core::Config;
use sitefold_parser::{ManifestEntry, ManifestScanner};

/// Validation result.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Validates the configuration and every file the build would touch,
/// without writing any output.
pub fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking configuration and inputs");

    let mut result = ValidationResult::default();

    // Validate configuration
    println!("Checking configuration...");
    let config = match Config::load(config_path) {
        Ok(c) => {
            println!("  ✓ Configuration valid");
            Some(c)
        }
        Err(e) => {
            result.add_error(format!("Configuration error: {e}"));
            println!("  ✗ Configuration invalid: {e}");
            None
        }
    };

    if let Some(ref config) = config {
        let project_dir = config_path.parent().unwrap_or(Path::new("."));

        println!("\nChecking input files...");
        check_inputs(config, project_dir, &mut result);

        println!("\nChecking manifest...");
        check_manifest(config, project_dir, &mut result);

        println!("\nChecking image resources...");
        check_resources(config, project_dir, &mut result);
    }

    // Print summary
    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    // Determine exit status
    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Check that the root document and manifest exist.
fn check_inputs(config: &Config, project_dir: &Path, result: &mut ValidationResult) {
    for name in [&config.bundle.document, &config.bundle.manifest] {
        if project_dir.join(name).is_file() {
            println!("  ✓ {name}");
        } else {
            result.add_error(format!("Missing input file: {name}"));
            println!("  ✗ {name}");
        }
    }
}

/// Check the manifest's declared file list.
fn check_manifest(config: &Config, project_dir: &Path, result: &mut ValidationResult) {
    let manifest_path = project_dir.join(&config.bundle.manifest);
    let Ok(text) = fs::read_to_string(&manifest_path) else {
        // Already reported as a missing input.
        return;
    };

    let scanner = ManifestScanner::new();
    let declared = match scanner.declared_files(&text, Path::new(&config.bundle.manifest)) {
        Ok(files) => files,
        Err(e) => {
            result.add_error(e.to_string());
            println!("  ✗ {e}");
            return;
        }
    };

    println!("  ✓ {} declared file(s)", declared.len());

    for name in &declared {
        match ManifestEntry::classify(name) {
            Some(_) => {
                if !project_dir.join(name).is_file() {
                    result.add_error(format!("Missing declared file: {name}"));
                    println!("  ✗ {name}");
                }
            }
            None => {
                result.add_warning(format!("Unrecognized manifest entry ignored: {name}"));
            }
        }
    }
}

/// Check image resources referenced by filtered files.
fn check_resources(config: &Config, project_dir: &Path, result: &mut ValidationResult) {
    let resource_dir = project_dir.join(&config.resources.dir);
    let inliner = InlineImages::new(&resource_dir);

    for name in &config.filters.inline_images {
        let path = project_dir.join(name);
        let Ok(text) = fs::read_to_string(&path) else {
            result.add_error(format!("Missing filtered file: {name}"));
            println!("  ✗ {name}");
            continue;
        };

        // Dry-run the inlining transform; it fails on the first missing
        // resource, naming the path.
        match inliner.apply(&text) {
            Ok(_) => println!("  ✓ {name}"),
            Err(e) => {
                result.add_error(e.to_string());
                println!("  ✗ {name}: {e}");
            }
        }
    }

    // Warn about resource files no filtered source references.
    if resource_dir.is_dir() {
        let referenced_names: Vec<String> = config
            .filters
            .inline_images
            .iter()
            .filter_map(|name| fs::read_to_string(project_dir.join(name)).ok())
            .collect();

        for entry in walkdir::WalkDir::new(&resource_dir)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_file())
        {
            let file_name = entry.file_name().to_string_lossy();
            if !referenced_names.iter().any(|text| text.contains(&*file_name)) {
                result.add_warning(format!("Unreferenced resource file: {file_name}"));
            }
        }
    } else if !config.filters.inline_images.is_empty() {
        result.add_warning(format!(
            "Resource directory does not exist: {}",
            resource_dir.display()
        ));
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn write_valid_project(dir: &Path) {
        fs::create_dir_all(dir.join("js")).unwrap();
        fs::write(
            dir.join("bundle.toml"),
            "[bundle]\ndocument = \"index.html\"\nmanifest = \"js/loader.js\"\noutput = \"dist/app.js\"\n",
        )
        .unwrap();
        fs::write(dir.join("index.html"), "<body>x</body>").unwrap();
        fs::write(dir.join("js/loader.js"), r#"files = ["js/app.js"];"#).unwrap();
        fs::write(dir.join("js/app.js"), "var a = 1;").unwrap();
    }

    #[test]
    fn test_check_valid_project() {
        let dir = TempDir::new().unwrap();
        write_valid_project(dir.path());

        assert!(run(&dir.path().join("bundle.toml"), true).is_ok());
    }

    #[test]
    fn test_check_missing_declared_file() {
        let dir = TempDir::new().unwrap();
        write_valid_project(dir.path());
        fs::remove_file(dir.path().join("js/app.js")).unwrap();

        assert!(run(&dir.path().join("bundle.toml"), false).is_err());
    }

    #[test]
    fn test_check_unrecognized_entry_warns_in_strict() {
        let dir = TempDir::new().unwrap();
        write_valid_project(dir.path());
        fs::write(
            dir.path().join("js/loader.js"),
            r#"files = ["js/app.js", "notes.txt"];"#,
        )
        .unwrap();

        assert!(run(&dir.path().join("bundle.toml"), false).is_ok());
        assert!(run(&dir.path().join("bundle.toml"), true).is_err());
    }

    #[test]
    fn test_check_missing_config() {
        let dir = TempDir::new().unwrap();
        assert!(run(&dir.path().join("absent.toml"), false).is_err());
    }
}
