//! End-to-end tests for the sitefold bundling pipeline.
//!
//! Each test lays out a complete fixture project in a temporary directory,
//! runs the full builder, and inspects the written artifact.

use std::{fs, path::Path};

use base64::Engine;
use sitefold_bundler::Builder;
use sitefold_core::Config;
use tempfile::TempDir;

const CONFIG: &str = r#"
[bundle]
document = "index.html"
manifest = "js/loader.js"
output = "dist/app.js"
minify = false

[resources]
dir = "res"

[filters]
inline_images = ["js/theme.js"]
"#;

const DOCUMENT: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width">
    <style>
        h1 {
            color: red;
        }
    </style>
    <link rel="stylesheet" href="https://fonts.example.com/face.css" />
    <link rel="stylesheet" href="css/base.css" />
</head>
<body class="app" data-mode="light">
    <!-- launcher chrome -->
    <div id="root"></div>
    <div class="status">ready</div>
</body>
</html>"#;

const MANIFEST: &str = r#"var progress = 0,
    files = [
        "js/app.js",
        "css/panel.css",
        "js/theme.js",
    ],
    items = 2 + files.length;
loadFiles();
"#;

fn write_fixture(dir: &Path) {
    fs::create_dir_all(dir.join("js")).unwrap();
    fs::create_dir_all(dir.join("css")).unwrap();
    fs::create_dir_all(dir.join("res")).unwrap();

    fs::write(dir.join("bundle.toml"), CONFIG).unwrap();
    fs::write(dir.join("index.html"), DOCUMENT).unwrap();
    fs::write(dir.join("js/loader.js"), MANIFEST).unwrap();
    fs::write(dir.join("js/app.js"), "var app = { start: function () {} };").unwrap();
    fs::write(
        dir.join("js/theme.js"),
        "theme.baseUrl = 'res/';\ntheme.icon = 'icon.png';",
    )
    .unwrap();
    fs::write(dir.join("css/base.css"), "body { margin: 0; }").unwrap();
    fs::write(
        dir.join("css/panel.css"),
        "/* panel chrome */\n.panel { border: 1px solid; }",
    )
    .unwrap();
    fs::write(dir.join("res/icon.png"), [0x89, 0x50, 0x4e, 0x47]).unwrap();
}

fn build_fixture(dir: &Path) -> String {
    let config = Config::load(&dir.join("bundle.toml")).unwrap();
    Builder::new(config, dir).build().unwrap();
    fs::read_to_string(dir.join("dist/app.js")).unwrap()
}

#[test]
fn test_artifact_is_one_self_invoking_unit() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path());
    let artifact = build_fixture(dir.path());

    assert!(artifact.starts_with("!function(){"));
    assert!(artifact.trim_end().ends_with("}();"));
}

#[test]
fn test_style_injection_precedes_all_fragments() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path());
    let artifact = build_fixture(dir.path());

    let injection = artifact.find("insertRule").unwrap();
    let first_meta = artifact.find("createElement(\"meta\")").unwrap();
    let first_banner = artifact.find("=======").unwrap();
    assert!(injection < first_meta);
    assert!(injection < first_banner);
}

#[test]
fn test_rule_order_is_cascade_order() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path());
    let artifact = build_fixture(dir.path());

    // Inline style, local document link, manifest stylesheet, help-hiding
    // rule, in that order.
    let inline = artifact.find("color: red;").unwrap();
    let base = artifact.find("body { margin: 0; }").unwrap();
    let panel = artifact.find(".panel { border: 1px solid; }").unwrap();
    let help = artifact.find(".helpButton.docs { display: none; }").unwrap();
    assert!(inline < base && base < panel && panel < help);
}

#[test]
fn test_fragment_resolution_order() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path());
    let artifact = build_fixture(dir.path());

    // Document fragments come before manifest-triggered fragments, which
    // preserve declaration order.
    let meta = artifact.find("createElement(\"meta\")").unwrap();
    let remote_link = artifact.find("fonts.example.com/face.css").unwrap();
    let body_attr = artifact.find("setAttribute(\"class\", \"app\")").unwrap();
    let inner_html = artifact.find("innerHTML").unwrap();
    let loader = artifact.find("/* ======= js/loader.js ======= */").unwrap();
    let app = artifact.find("/* ======= js/app.js ======= */").unwrap();
    let theme = artifact.find("/* ======= js/theme.js ======= */").unwrap();

    assert!(meta < remote_link);
    assert!(remote_link < body_attr);
    assert!(body_attr < inner_html);
    assert!(inner_html < loader);
    assert!(loader < app);
    assert!(app < theme);
}

#[test]
fn test_body_markup_cleaned_and_comment_free() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path());
    let artifact = build_fixture(dir.path());

    assert!(!artifact.contains("launcher chrome"));
    // Newline+indent runs between tags are deleted outright; only
    // same-line gaps between tags collapse to a single space.
    assert!(artifact.contains(r#"<div id="root"></div><div class="status">ready</div>"#));
}

#[test]
fn test_manifest_filter_strips_runtime_loading() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path());
    let artifact = build_fixture(dir.path());

    assert!(artifact.contains("/* + files.length */"));
    assert!(artifact.contains("/* loadFiles() */"));
}

#[test]
fn test_theme_images_inlined() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path());
    let artifact = build_fixture(dir.path());

    let encoded = base64::engine::general_purpose::STANDARD.encode([0x89u8, 0x50, 0x4e, 0x47]);
    assert!(artifact.contains(&format!("data:image/png;base64,{encoded}")));
    assert!(!artifact.contains("'icon.png'"));
    assert!(artifact.contains("theme.baseUrl = \"\";"));
}

#[test]
fn test_missing_image_resource_aborts_without_output() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path());
    fs::remove_file(dir.path().join("res/icon.png")).unwrap();

    let config = Config::load(&dir.path().join("bundle.toml")).unwrap();
    let err = Builder::new(config, dir.path()).build().unwrap_err();
    assert!(err.to_string().contains("icon.png"));
    assert!(!dir.path().join("dist/app.js").exists());
}

#[test]
fn test_minified_build_is_smaller_and_comment_free() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path());
    let plain = build_fixture(dir.path());

    let mut config = Config::load(&dir.path().join("bundle.toml")).unwrap();
    config.bundle.minify = true;
    Builder::new(config, dir.path()).build().unwrap();
    let minified = fs::read_to_string(dir.path().join("dist/app.js")).unwrap();

    assert!(minified.len() < plain.len());
    assert!(!minified.contains("======="));
    assert!(!minified.contains("panel chrome"));
    // Quoted content survives compaction byte-identical.
    assert!(minified.contains("data:image/png;base64,"));
}
