use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use gdt_ast::TranspileConfig;
use gdt_transpile::TranspiledFile;
use rayon::prelude::*;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

/// Reference files whose declarations come from the static base definitions
/// instead of generation.
const DEFS_SKIP: &[&str] = &[
    "@GlobalScope.xml",
    "@GDScript.xml",
    "Array.xml",
    "bool.xml",
    "Dictionary.xml",
    "int.xml",
    "float.xml",
    "PackedScene.xml",
    "Signal.xml",
];

#[derive(Parser)]
#[command(name = "gdt", about = "gdt — TypeScript to GDScript transpiler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transpile every TypeScript file under a project directory.
    Build {
        /// Project root to scan for .ts files.
        project: PathBuf,
        /// Output root (defaults to writing .gd files next to their sources).
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
    /// Transpile one file.
    Transpile {
        /// Input .ts file.
        input: PathBuf,
        /// Output file (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Parse and transpile, reporting diagnostics without writing output.
    Check {
        input: PathBuf,
        /// Dump the parsed AST as JSON instead of transpiling.
        #[arg(long)]
        ast: bool,
    },
    /// Generate TypeScript declarations from the engine's XML class reference.
    Defs {
        /// Directory containing the XML class reference.
        docs: PathBuf,
        /// Directory to write .d.ts files into.
        #[arg(short, long)]
        out_dir: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the whole run completed without failures or diagnostics.
fn run(command: Commands) -> Result<bool> {
    match command {
        Commands::Build { project, out_dir } => build_project(&project, out_dir.as_deref()),
        Commands::Transpile { input, output } => {
            let config = TranspileConfig::default();
            let result = transpile_file(&input, &config)?;
            report_diagnostics(&result);
            match output {
                Some(path) => std::fs::write(&path, &result.source)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => print!("{}", result.source),
            }
            Ok(result.is_clean())
        }
        Commands::Check { input, ast } => {
            let source = std::fs::read_to_string(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let filename = input.display().to_string();
            let parsed = gdt_parser::parse_typescript(&source, &filename)?;

            if ast {
                let json = serde_json::to_string_pretty(&parsed.module)?;
                println!("{json}");
                return Ok(true);
            }

            let config = TranspileConfig::default();
            let result = gdt_transpile::transpile(
                &parsed.module,
                Some(&parsed.comments),
                &parsed.source_map,
                &filename,
                &config,
            );
            report_diagnostics(&result);
            if result.is_clean() {
                info!("OK: {filename}");
            }
            Ok(result.is_clean())
        }
        Commands::Defs { docs, out_dir } => generate_defs(&docs, &out_dir),
    }
}

fn transpile_file(path: &Path, config: &TranspileConfig) -> Result<TranspiledFile> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let filename = path.display().to_string();
    let parsed = gdt_parser::parse_typescript(&source, &filename)?;
    Ok(gdt_transpile::transpile(
        &parsed.module,
        Some(&parsed.comments),
        &parsed.source_map,
        &filename,
        config,
    ))
}

fn report_diagnostics(result: &TranspiledFile) {
    for diagnostic in &result.diagnostics {
        warn!("{diagnostic}");
    }
}

fn build_project(project: &Path, out_dir: Option<&Path>) -> Result<bool> {
    let sources: Vec<PathBuf> = WalkDir::new(project)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_transpilable(path))
        .collect();

    if sources.is_empty() {
        bail!("no TypeScript sources found under {}", project.display());
    }
    info!("transpiling {} files", sources.len());

    // One worker per file; files never depend on each other's output.
    let clean_flags: Vec<bool> = sources
        .par_iter()
        .map(|path| match process_source(path, project, out_dir) {
            Ok(clean) => clean,
            Err(err) => {
                error!("{}: {err:#}", path.display());
                false
            }
        })
        .collect();

    let failed = clean_flags.iter().filter(|clean| !**clean).count();
    if failed > 0 {
        error!("{failed} of {} files had errors", sources.len());
    }
    Ok(failed == 0)
}

fn process_source(path: &Path, project: &Path, out_dir: Option<&Path>) -> Result<bool> {
    let config = TranspileConfig::default();
    let result = transpile_file(path, &config)?;
    report_diagnostics(&result);

    // Partial output is still written: a file with diagnostics keeps its
    // supported siblings usable in the editor.
    let target = output_path(path, project, out_dir);
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(&target, &result.source)
        .with_context(|| format!("failed to write {}", target.display()))?;
    info!("{} -> {}", path.display(), target.display());
    Ok(result.is_clean())
}

fn is_transpilable(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".ts") && !name.ends_with(".d.ts")
}

fn output_path(source: &Path, project: &Path, out_dir: Option<&Path>) -> PathBuf {
    let gd = source.with_extension("gd");
    match out_dir {
        Some(out) => match gd.strip_prefix(project) {
            Ok(relative) => out.join(relative),
            Err(_) => out.join(gd.file_name().unwrap_or(gd.as_os_str())),
        },
        None => gd,
    }
}

fn generate_defs(docs: &Path, out_dir: &Path) -> Result<bool> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    // Phase one must run first; it yields the singleton set every class
    // file is generated against.
    let global_scope_path = docs.join("@GlobalScope.xml");
    let xml = std::fs::read_to_string(&global_scope_path)
        .with_context(|| format!("failed to read {}", global_scope_path.display()))?;
    let scope = gdt_defs::parse_global_scope(&xml)
        .with_context(|| format!("failed to parse {}", global_scope_path.display()))?;
    std::fs::write(out_dir.join("@globals.d.ts"), &scope.declarations)?;

    let gdscript_path = docs.join("@GDScript.xml");
    let xml = std::fs::read_to_string(&gdscript_path)
        .with_context(|| format!("failed to read {}", gdscript_path.display()))?;
    let globals = gdt_defs::generate_global_functions(&xml)
        .with_context(|| format!("failed to parse {}", gdscript_path.display()))?;
    std::fs::write(out_dir.join("@global_functions.d.ts"), globals)?;

    std::fs::write(out_dir.join("@base.d.ts"), gdt_defs::base_definitions())?;

    let mut failed = 0usize;
    let mut generated = 0usize;
    for entry in WalkDir::new(docs).max_depth(1) {
        let entry = entry?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.ends_with(".xml") || DEFS_SKIP.contains(&name) {
            continue;
        }

        let xml = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        // A malformed reference file fails alone; the rest still generate.
        match gdt_defs::generate_class_file(&xml, &scope.singletons) {
            Ok(file) => {
                let target = out_dir.join(format!("{}.d.ts", file.class_name));
                std::fs::write(&target, &file.declarations)
                    .with_context(|| format!("failed to write {}", target.display()))?;
                generated += 1;
            }
            Err(err) => {
                warn!("{}: {err:#}", path.display());
                failed += 1;
            }
        }
    }

    info!("generated {generated} class definition files");
    if failed > 0 {
        error!("{failed} reference files failed to generate");
    }
    Ok(failed == 0)
}
