//! Build command - runs the bundling pipeline once

use std::{path::Path, time::Instant};

use color_eyre::eyre::{Result, WrapErr};
use sitefold_bundler::Builder;
use sitefold_core::Config;

/// Run the build command.
///
/// Folds the configured document, manifest, and declared files into the
/// output artifact.
pub fn run(config_path: &Path, output: Option<&Path>, no_minify: bool) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, ?output, no_minify, "Starting bundle");

    // Load configuration
    let mut config = Config::load(config_path).wrap_err("Failed to load configuration")?;

    // Override output path if specified via CLI
    if let Some(out) = output {
        tracing::info!(output = %out.display(), "Overriding output path from CLI");
        config.bundle.output = out.to_string_lossy().to_string();
    }

    // Skip compaction if flag is set
    if no_minify {
        config.bundle.minify = false;
    }

    // Project files resolve relative to the configuration file
    let project_dir = config_path.parent().unwrap_or(Path::new(".")).to_path_buf();
    let output_name = config.bundle.output.clone();

    let builder = Builder::new(config, project_dir);
    let stats = builder.build().wrap_err("Bundle failed")?;

    let duration = start.elapsed();

    // Print build statistics
    println!();
    println!("  Bundle written successfully!");
    println!();
    println!("  Scripts:     {}", stats.scripts);
    println!("  Stylesheets: {}", stats.stylesheets);
    println!("  Rules:       {}", stats.rules);
    println!("  Fragments:   {}", stats.fragments);
    println!();
    println!("  Duration:    {:.2}s", duration.as_secs_f64());
    println!("  Output:      {} ({} bytes)", output_name, stats.output_bytes);
    println!();

    tracing::info!(?stats, ?duration, "Bundle completed successfully");

    Ok(())
}
