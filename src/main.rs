//! Root certificate store dump CLI
//!
//! Entry point for the `rootcert-dump` command-line tool.

use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use winc_rootcert::dump;
use winc_rootcert::format::decode_store;
use winc_rootcert::{
    lookup_entry, CliOverrides, DumpConfig, EntryReport, ExitCode, FlashImage, HeaderInfo,
    InspectError, OutputFormat, ReportError, StoreReport,
};

#[derive(Parser)]
#[command(name = "rootcert-dump")]
#[command(about = "Decode the root certificate store of a WINC flash image", version)]
struct Cli {
    /// Path to config file (default: ./rootcert.toml if present)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode and print every entry in the store
    Dump {
        /// Flash image containing the store at offset 0
        image: PathBuf,

        /// Output in JSON format
        #[arg(long)]
        json: bool,

        /// Stop after this many entries
        #[arg(long)]
        limit: Option<u32>,

        /// Omit modulus, exponent and curve point bytes
        #[arg(long)]
        no_key_material: bool,
    },

    /// Print header facts only (schema, entry count)
    Info {
        /// Flash image containing the store at offset 0
        image: PathBuf,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Decode a single entry by index
    Entry {
        /// Flash image containing the store at offset 0
        image: PathBuf,

        /// Entry index, counting from zero
        #[arg(long, short = 'n')]
        index: u32,

        /// Output in JSON format
        #[arg(long)]
        json: bool,

        /// Omit modulus, exponent and curve point bytes
        #[arg(long)]
        no_key_material: bool,
    },
}

fn main() {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Dump {
            image,
            json,
            limit,
            no_key_material,
        } => {
            let overrides = CliOverrides {
                json,
                limit,
                hide_key_material: no_key_material,
            };
            let config = resolve_config(cli.config.as_deref(), &overrides);
            run_dump(&image, &config)
        }
        Commands::Info { image, json } => {
            let overrides = CliOverrides {
                json,
                ..Default::default()
            };
            let config = resolve_config(cli.config.as_deref(), &overrides);
            run_info(&image, &config)
        }
        Commands::Entry {
            image,
            index,
            json,
            no_key_material,
        } => {
            let overrides = CliOverrides {
                json,
                hide_key_material: no_key_material,
                ..Default::default()
            };
            let config = resolve_config(cli.config.as_deref(), &overrides);
            run_entry(&image, index, &config)
        }
    };

    process::exit(code.as_i32());
}

fn resolve_config(path: Option<&Path>, overrides: &CliOverrides) -> DumpConfig {
    match DumpConfig::load_or_default(path).and_then(|c| c.with_overrides(overrides)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            process::exit(ExitCode::Usage.as_i32());
        }
    }
}

fn load_image(path: &Path, config: &DumpConfig) -> FlashImage {
    match FlashImage::load(path, config.max_image_bytes) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("Error loading image: {}", e);
            process::exit(ExitCode::Usage.as_i32());
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(ExitCode::Usage.as_i32());
        }
    }
}

fn run_dump(path: &Path, config: &DumpConfig) -> ExitCode {
    let image = load_image(path, config);

    match config.format {
        OutputFormat::Json => {
            let report = match StoreReport::from_buffer(image.bytes(), config.limit, config.show_key_material) {
                Ok(report) => report.with_image(path.display().to_string()),
                Err(ReportError::Decode(e)) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::from_decode_error(&e);
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::Usage;
                }
            };
            print_json(&report);

            match report.failure() {
                Some(err) => {
                    log::warn!("store decoding stopped after {} entries: {}", report.entries.len(), err);
                    ExitCode::from_decode_error(err)
                }
                None => ExitCode::Success,
            }
        }
        OutputFormat::Human => {
            let store = match decode_store(image.bytes()) {
                Ok(store) => store,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::from_decode_error(&e);
                }
            };

            let stdout = io::stdout();
            let mut out = stdout.lock();
            let outcome = match dump::write_store(&mut out, store, config.limit, config.show_key_material) {
                Ok(outcome) => outcome,
                Err(e) => {
                    eprintln!("Error writing output: {}", e);
                    return ExitCode::Usage;
                }
            };
            let _ = out.flush();

            match outcome.error {
                Some(ref err) => {
                    log::warn!("store decoding stopped after {} entries: {}", outcome.printed, err);
                    ExitCode::from_decode_error(err)
                }
                None => ExitCode::Success,
            }
        }
    }
}

fn run_info(path: &Path, config: &DumpConfig) -> ExitCode {
    let image = load_image(path, config);

    let info = match HeaderInfo::from_buffer(image.bytes()) {
        Ok(info) => info,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from_decode_error(&e);
        }
    };

    match config.format {
        OutputFormat::Json => print_json(&info),
        OutputFormat::Human => println!("{}", info.to_human()),
    }
    ExitCode::Success
}

fn run_entry(path: &Path, index: u32, config: &DumpConfig) -> ExitCode {
    let image = load_image(path, config);

    let entry = match lookup_entry(image.bytes(), index) {
        Ok(entry) => entry,
        Err(InspectError::Decode(e)) => {
            eprintln!("Error: {}", e);
            return ExitCode::from_decode_error(&e);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::Usage;
        }
    };

    match config.format {
        OutputFormat::Json => print_json(&EntryReport::from_entry(&entry, config.show_key_material)),
        OutputFormat::Human => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            if let Err(e) = dump::write_entry(&mut out, &entry, config.show_key_material) {
                eprintln!("Error writing output: {}", e);
                return ExitCode::Usage;
            }
        }
    }
    ExitCode::Success
}
