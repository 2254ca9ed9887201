//! Golden-file test harness for gdt.
//!
//! Discovers `.input.ts` files under `tests/fixtures/`, runs the pipeline
//! (parse → transpile), and compares output against the corresponding
//! `.expected.gd` file.
//!
//! Set `GDT_UPDATE_FIXTURES=1` to overwrite expected files with actual output.

use std::path::{Path, PathBuf};

use anyhow::Result;
use gdt_ast::TranspileConfig;
use gdt_transpile::TranspiledFile;

fn fixtures_dir() -> PathBuf {
    // CARGO_MANIFEST_DIR is crates/gdt_test/, so go up two levels to workspace root.
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
}

fn collect_input_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if !dir.exists() {
        return files;
    }
    for entry in walkdir(dir) {
        if entry
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(".input.ts"))
        {
            files.push(entry);
        }
    }
    files.sort();
    files
}

fn walkdir(dir: &Path) -> Vec<PathBuf> {
    let mut result = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                result.extend(walkdir(&path));
            } else {
                result.push(path);
            }
        }
    }
    result
}

fn run_pipeline(source: &str, filename: &str) -> Result<TranspiledFile> {
    let parsed = gdt_parser::parse_typescript(source, filename)?;
    let config = TranspileConfig::default();
    Ok(gdt_transpile::transpile(
        &parsed.module,
        Some(&parsed.comments),
        &parsed.source_map,
        filename,
        &config,
    ))
}

#[test]
fn golden_file_tests() {
    let fixtures = fixtures_dir();
    let input_files = collect_input_files(&fixtures);

    assert!(
        !input_files.is_empty(),
        "No test fixtures found in {}",
        fixtures.display()
    );

    let update_mode = std::env::var("GDT_UPDATE_FIXTURES").is_ok();
    let mut failures = Vec::new();

    for input_path in &input_files {
        let expected_path = input_path
            .to_str()
            .unwrap()
            .replace(".input.ts", ".expected.gd");
        let expected_path = PathBuf::from(&expected_path);

        let test_name = input_path
            .strip_prefix(&fixtures)
            .unwrap()
            .display()
            .to_string();

        let source = match std::fs::read_to_string(input_path) {
            Ok(s) => s,
            Err(e) => {
                failures.push(format!("{test_name}: failed to read input: {e}"));
                continue;
            }
        };

        let filename = input_path.display().to_string();
        let actual = match run_pipeline(&source, &filename) {
            Ok(result) => result.source,
            Err(e) => {
                failures.push(format!("{test_name}: pipeline failed: {e}"));
                continue;
            }
        };

        if update_mode {
            if let Err(e) = std::fs::write(&expected_path, &actual) {
                failures.push(format!("{test_name}: failed to write expected: {e}"));
            }
            continue;
        }

        if !expected_path.exists() {
            failures.push(format!(
                "{test_name}: missing expected file: {}",
                expected_path.display()
            ));
            continue;
        }

        let expected = match std::fs::read_to_string(&expected_path) {
            Ok(s) => s,
            Err(e) => {
                failures.push(format!("{test_name}: failed to read expected: {e}"));
                continue;
            }
        };
        if actual.trim() != expected.trim() {
            failures.push(format!(
                "{test_name}: output mismatch\n--- expected ---\n{}\n--- actual ---\n{}",
                expected.trim(),
                actual.trim()
            ));
        }
    }

    if !failures.is_empty() {
        panic!(
            "\n{} golden test(s) failed:\n\n{}",
            failures.len(),
            failures.join("\n\n")
        );
    }
}

/// Every fixture is supported source; none may produce diagnostics.
#[test]
fn fixtures_transpile_clean() {
    let fixtures = fixtures_dir();
    let input_files = collect_input_files(&fixtures);

    let mut failures = Vec::new();
    for input_path in &input_files {
        let test_name = input_path
            .strip_prefix(&fixtures)
            .unwrap()
            .display()
            .to_string();

        let source = match std::fs::read_to_string(input_path) {
            Ok(s) => s,
            Err(e) => {
                failures.push(format!("{test_name}: failed to read: {e}"));
                continue;
            }
        };

        let filename = input_path.display().to_string();
        match run_pipeline(&source, &filename) {
            Ok(result) => {
                for diagnostic in &result.diagnostics {
                    failures.push(format!("{test_name}: {diagnostic}"));
                }
            }
            Err(e) => failures.push(format!("{test_name}: pipeline failed: {e}")),
        }
    }

    if !failures.is_empty() {
        panic!(
            "\n{} fixture(s) produced diagnostics:\n\n{}",
            failures.len(),
            failures.join("\n")
        );
    }
}
