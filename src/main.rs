//! Sheetflow - spreadsheet engine command line

mod config;

use anyhow::{Context, Result, bail};
use sheetflow_core::Spreadsheet;
use std::env;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn print_usage() {
    eprintln!("Usage: sheetflow [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Spreadsheet file to open (.json)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -s, --set <CELL=CONTENT>  Set a cell (can be repeated, applied in order)");
    eprintln!("  -w, --write               Save back to FILE after applying edits");
    eprintln!("  -o, --output <FILE>       Save to another file");
    eprintln!("  -d, --deps <CELL>         Print the recalculation order for a cell");
    eprintln!("  --sheet-version <TAG>     Version tag for the spreadsheet file");
    eprintln!("  --config <FILE>           Load settings from TOML file");
    eprintln!("  --no-config               Ignore the user config file");
    eprintln!("  -v, --verbose             Log to stderr (filter with RUST_LOG)");
    eprintln!("  -h, --help                Print help");
}

#[derive(Debug, Default)]
struct Args {
    file_path: Option<PathBuf>,
    edits: Vec<String>,
    write: bool,
    output_file: Option<PathBuf>,
    deps: Option<String>,
    sheet_version: Option<String>,
    config_file: Option<PathBuf>,
    no_config: bool,
    verbose: bool,
}

fn parse_args() -> Args {
    let args: Vec<String> = env::args().collect();
    let mut parsed = Args::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                std::process::exit(0);
            }
            "-s" | "--set" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --set requires CELL=CONTENT");
                    std::process::exit(1);
                }
                parsed.edits.push(args[i].to_string());
            }
            "-w" | "--write" => parsed.write = true,
            "-o" | "--output" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --output requires a file path");
                    std::process::exit(1);
                }
                parsed.output_file = Some(PathBuf::from(&args[i]));
            }
            "-d" | "--deps" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --deps requires a cell name");
                    std::process::exit(1);
                }
                parsed.deps = Some(args[i].to_string());
            }
            "--sheet-version" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --sheet-version requires a value");
                    std::process::exit(1);
                }
                parsed.sheet_version = Some(args[i].to_string());
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a file path");
                    std::process::exit(1);
                }
                parsed.config_file = Some(PathBuf::from(&args[i]));
            }
            "--no-config" => parsed.no_config = true,
            "-v" | "--verbose" => parsed.verbose = true,
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            _ => {
                if parsed.file_path.is_none() {
                    parsed.file_path = Some(PathBuf::from(&args[i]));
                } else {
                    eprintln!("Error: Unexpected argument: {}", args[i]);
                    print_usage();
                    std::process::exit(1);
                }
            }
        }
        i += 1;
    }

    parsed
}

fn run(args: Args) -> Result<()> {
    if args.write && args.file_path.is_none() {
        bail!("--write requires a FILE");
    }

    let settings = if args.no_config {
        config::Settings::default()
    } else {
        let (settings, warnings) = config::load_settings(args.config_file.as_deref());
        for warning in warnings {
            eprintln!("Warning: {}", warning);
        }
        settings
    };
    debug!(?settings, "settings loaded");
    let options = settings.sheet_options(args.sheet_version.as_deref());

    let mut sheet = match &args.file_path {
        Some(path) if path.exists() => Spreadsheet::open(path, options)
            .with_context(|| format!("Failed to open {}", path.display()))?,
        _ => Spreadsheet::with_options(options),
    };

    for edit in &args.edits {
        let (cell, content) = edit
            .split_once('=')
            .with_context(|| format!("Invalid edit '{edit}'. Expected CELL=CONTENT"))?;
        sheet
            .set_contents_of_cell(cell.trim(), content)
            .with_context(|| format!("Failed to set {}", cell.trim()))?;
    }

    if let Some(cell) = &args.deps {
        let order = sheet
            .all_dependents(cell)
            .with_context(|| format!("Failed to compute dependents of {cell}"))?;
        println!("{}", order.join(" "));
    } else {
        for name in sheet.nonempty_cell_names() {
            let content = sheet.cell_contents(&name)?;
            let value = sheet.cell_value(&name)?;
            println!("{name}\t{content}\t{value}");
        }
    }

    if let Some(path) = args.file_path.as_ref().filter(|_| args.write) {
        sheet
            .save(path)
            .with_context(|| format!("Failed to save {}", path.display()))?;
    }
    if let Some(path) = &args.output_file {
        sheet
            .save(path)
            .with_context(|| format!("Failed to save {}", path.display()))?;
    }

    Ok(())
}

fn main() {
    let args = parse_args();

    if args.verbose {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
