use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use wxc_ast::{EntryEvent, TransformerOptions};
use wxc_parser::parse_source;
use wxc_template::{render_client_stubs, FunctionItem};
use wxc_transform::Transformer;

#[derive(Parser)]
#[command(name = "wxc", about = "wxc: cloud-function entry points from default exports")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse, add the cloud-function entry, and print the module.
    Transform {
        /// Input .ts/.js file.
        input: PathBuf,
        /// Output file (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// JSON file with transformer options.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write the functions found as JSON, for `wxc stubs`.
        #[arg(long)]
        entries: Option<PathBuf>,
        /// Generate a source map next to the output.
        #[arg(long)]
        source_map: bool,
    },
    /// Parse the file and report any syntax errors.
    Check { input: PathBuf },
    /// Render client-side call stubs from `--entries` files.
    Stubs {
        /// JSON files written by `wxc transform --entries`.
        #[arg(required = true)]
        entries: Vec<PathBuf>,
        /// Output file (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Transform {
            input,
            output,
            config,
            entries,
            source_map,
        } => {
            let options = match &config {
                Some(path) => load_options(path)?,
                None => TransformerOptions::default(),
            };
            let source = std::fs::read_to_string(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let filename = input.display().to_string();

            let parsed = parse_source(&source, &filename)?;
            let transformer = Transformer::new(options);
            let (module, events) = transformer.transform_collect(parsed.module, &filename);
            info!(file = %filename, entries = events.len(), "transformed");

            let comments = Some(&parsed.comments);
            let printed = if source_map {
                wxc_codegen::print_module_with_source_map(&module, &parsed.source_map, comments)?
            } else {
                wxc_codegen::Printed {
                    code: wxc_codegen::print_module(&module, &parsed.source_map, comments)?,
                    source_map: None,
                }
            };

            match &output {
                Some(path) => std::fs::write(path, &printed.code)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => print!("{}", printed.code),
            }

            if let Some(map) = printed.source_map {
                let map_path = match &output {
                    Some(path) => format!("{}.map", path.display()),
                    None => format!("{filename}.map"),
                };
                std::fs::write(&map_path, map)?;
                eprintln!("Source map written to {map_path}");
            }

            if let Some(path) = entries {
                let items = function_items(&function_name(&input), &events);
                let json = serde_json::to_string_pretty(&items)?;
                std::fs::write(&path, json)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                debug!(path = %path.display(), functions = items.len(), "entries written");
            }
        }
        Commands::Check { input } => {
            let source = std::fs::read_to_string(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let filename = input.display().to_string();
            parse_source(&source, &filename)?;
            eprintln!("OK: {filename}");
        }
        Commands::Stubs { entries, output } => {
            let mut functions = Vec::new();
            for path in &entries {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                let items: Vec<FunctionItem> = serde_json::from_str(&json)
                    .with_context(|| format!("invalid entries file {}", path.display()))?;
                functions.extend(items);
            }

            let text = render_client_stubs(&functions) + "\n";
            match &output {
                Some(path) => std::fs::write(path, text)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => print!("{text}"),
            }
        }
    }

    Ok(())
}

fn load_options(path: &Path) -> Result<TransformerOptions> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("invalid transformer options in {}", path.display()))
}

/// One stub per cloud function: a file names a single function, so only
/// its first entry is kept.
fn function_items(name: &str, events: &[EntryEvent]) -> Vec<FunctionItem> {
    if events.len() > 1 {
        warn!(function = name, entries = events.len(), "several entries found, keeping the first");
    }
    events
        .first()
        .map(|event| FunctionItem::from_entry(name, event))
        .into_iter()
        .collect()
}

/// Cloud functions are named after their file, or after their directory
/// when the file is an `index` module: `sum.ts` and `sum/index.ts` are
/// both `sum`.
fn function_name(path: &Path) -> String {
    let stem = path.file_stem().and_then(|stem| stem.to_str()).unwrap_or_default();
    if stem == "index" {
        if let Some(dir) = path.parent().and_then(Path::file_name).and_then(|dir| dir.to_str()) {
            return dir.to_string();
        }
    }
    stem.to_string()
}
