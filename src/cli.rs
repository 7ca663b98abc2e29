//! Command-line interface implementation

use clap::{ArgAction, Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::color::Color;
use crate::config::{load_config, merge_cli_overrides, CliOverrides, EcopalConfig, OutputFormat};
use crate::generate::Generator;
use crate::harmony::HarmonyStrategy;
use crate::output::{write_color_text, write_json, write_palette_text, ColorReport, OutputError, PaletteReport};
use crate::parser::parse_stream;
use crate::session::Session;

/// Exit codes
const EXIT_SUCCESS: u8 = 0;
const EXIT_ERROR: u8 = 1;
const EXIT_INVALID_ARGS: u8 = 2;

/// Ecopalette - generate and edit energy-aware colour palettes
#[derive(Parser)]
#[command(name = "ecopal")]
#[command(about = "Ecopalette - generate and edit energy-aware colour palettes")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to ecopal.toml (default: search upward from the current directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a sustainable palette
    Generate {
        /// Harmony strategy: random, analogous, monochromatic, triad, complementary
        #[arg(short = 'H', long)]
        harmony: Option<HarmonyStrategy>,

        /// RNG seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Attempts before falling back to a random palette
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        max_attempts: Option<u32>,

        /// Minimum palette sustainability to accept (0-100)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        min_score: Option<u8>,

        /// Minimum base color sustainability (0-100)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        min_base_score: Option<u8>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show sustainability, RGB and HSL for colors
    Score {
        /// Colors as #RRGGBB
        #[arg(required = true)]
        colors: Vec<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Apply a JSONL edit script and print the resulting palette
    Apply {
        /// Edit script, one JSON5 edit object per entry
        script: PathBuf,

        /// RNG seed for any generate edits
        #[arg(long)]
        seed: Option<u64>,

        /// Strict mode: rejected edits and parse warnings are errors
        #[arg(long)]
        strict: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List the available harmony strategies
    Harmonies,
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate { harmony, seed, max_attempts, min_score, min_base_score, json } => {
            let overrides = CliOverrides {
                max_attempts,
                min_base_score,
                min_palette_score: min_score,
                harmony,
                seed,
                json,
            };
            match resolve_config(cli.config.as_deref(), &overrides) {
                Ok(config) => run_generate(&config),
                Err(code) => code,
            }
        }
        Commands::Score { colors, json } => run_score(&colors, json),
        Commands::Apply { script, seed, strict, json } => {
            let overrides = CliOverrides { seed, json, ..Default::default() };
            match resolve_config(cli.config.as_deref(), &overrides) {
                Ok(config) => run_apply(&script, &config, strict),
                Err(code) => code,
            }
        }
        Commands::Harmonies => run_harmonies(),
    }
}

/// Install the stderr log subscriber.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn resolve_config(path: Option<&Path>, overrides: &CliOverrides) -> Result<EcopalConfig, ExitCode> {
    let mut config = load_config(path).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })?;
    merge_cli_overrides(&mut config, overrides).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })?;
    Ok(config)
}

fn session_for(config: &EcopalConfig) -> Session {
    let policy = config.generation.policy();
    let generator = match config.generation.seed {
        Some(seed) => Generator::seeded(seed, policy),
        None => Generator::from_entropy(policy),
    };
    Session::with_generator(generator).with_default_harmony(config.generation.harmony)
}

/// Execute the generate command
fn run_generate(config: &EcopalConfig) -> ExitCode {
    let mut session = session_for(config);
    let generated = session.generate(config.generation.harmony);
    debug!(attempts = generated.attempts, fallback = generated.fallback, "generation finished");

    let report = PaletteReport::from_generated(&generated);
    finish(emit_palette(&report, config.output.format))
}

/// Execute the score command
fn run_score(colors: &[String], json: bool) -> ExitCode {
    let mut reports = Vec::with_capacity(colors.len());
    for raw in colors {
        match Color::from_hex(raw) {
            Ok(color) => reports.push(ColorReport::new(color)),
            Err(e) => {
                eprintln!("Error: '{}': {}", raw, e);
                return ExitCode::from(EXIT_INVALID_ARGS);
            }
        }
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = if json {
        write_json(&mut out, &reports)
    } else {
        reports.iter().try_for_each(|r| write_color_text(&mut out, r))
    };
    finish(result)
}

/// Execute the apply command
fn run_apply(script: &Path, config: &EcopalConfig, strict: bool) -> ExitCode {
    let file = match File::open(script) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: Cannot open script '{}': {}", script.display(), e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let parse_result = parse_stream(BufReader::new(file));
    let mut all_warnings: Vec<String> =
        parse_result.warnings.iter().map(|w| format!("line {}: {}", w.line, w.message)).collect();

    if strict && !all_warnings.is_empty() {
        for warning in &all_warnings {
            eprintln!("Error: {}", warning);
        }
        return ExitCode::from(EXIT_ERROR);
    }

    let mut session = session_for(config);
    for scripted in &parse_result.edits {
        if let Err(e) = session.apply(&scripted.edit) {
            let message = format!("line {}: edit rejected: {}", scripted.line, e);
            if strict {
                eprintln!("Error: {}", message);
                return ExitCode::from(EXIT_ERROR);
            }
            all_warnings.push(message);
        }
    }

    for warning in &all_warnings {
        eprintln!("Warning: {}", warning);
    }

    let report = PaletteReport::new(session.palette());
    finish(emit_palette(&report, config.output.format))
}

/// Execute the harmonies command
fn run_harmonies() -> ExitCode {
    for harmony in HarmonyStrategy::ALL {
        println!("{:<14} {}", harmony.as_str(), harmony.description());
    }
    ExitCode::from(EXIT_SUCCESS)
}

fn emit_palette(report: &PaletteReport, format: OutputFormat) -> Result<(), OutputError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Text => write_palette_text(&mut out, report),
        OutputFormat::Json => write_json(&mut out, report),
    }
}

fn finish(result: Result<(), OutputError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
