//! F Checker - semantic validator for the F expression language
//!
//! Usage: fcheck [OPTIONS] <input>

use anyhow::Context;
use clap::{Parser as ClapParser, ValueEnum};
use codespan_reporting::term::termcolor::ColorChoice;
use f_checker::common::DiagnosticReporter;
use f_checker::driver::{check_source, CheckConfig, CheckContext};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// When to colorize diagnostics
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Default)]
enum ColorMode {
    /// Colorize when writing to a terminal
    #[default]
    Auto,
    /// Always colorize
    Always,
    /// Never colorize
    Never,
}

impl From<ColorMode> for ColorChoice {
    fn from(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Auto => ColorChoice::Auto,
            ColorMode::Always => ColorChoice::Always,
            ColorMode::Never => ColorChoice::Never,
        }
    }
}

#[derive(ClapParser, Debug)]
#[command(name = "fcheck")]
#[command(author = "F Language Team")]
#[command(version)]
#[command(about = "Semantic checker for the F expression language", long_about = None)]
struct Args {
    /// Input source file (.f)
    #[arg(required = true)]
    input: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Dump tokens (for debugging)
    #[arg(long)]
    dump_tokens: bool,

    /// Dump AST (for debugging)
    #[arg(long)]
    dump_ast: bool,

    /// Dump the symbol table after validation
    #[arg(long)]
    dump_symbols: bool,

    /// Diagnostic coloring
    #[arg(long, value_enum, default_value = "auto")]
    color: ColorMode,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins; otherwise `debug` with `--verbose` and `warn` without
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> anyhow::Result<ExitCode> {
    // Read input file
    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let filename = args.input.display().to_string();

    // Set up diagnostic reporter
    let mut reporter = DiagnosticReporter::with_color(args.color.into());
    let file_id = reporter.add_file(&filename, &source);

    let config = CheckConfig {
        dump_tokens: args.dump_tokens,
        dump_ast: args.dump_ast,
        dump_symbols: args.dump_symbols,
        verbose: args.verbose,
    };
    let ctx = CheckContext::new(filename.clone(), file_id, &reporter);

    if args.verbose {
        eprintln!("Checking {}", filename);
    }

    // Syntax errors have already been rendered by the reporter
    let Ok(outcome) = check_source(&source, &ctx, &config) else {
        return Ok(ExitCode::FAILURE);
    };

    if outcome.is_accepted() {
        if args.verbose {
            eprintln!("{}: no errors", filename);
        }
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("{}: {} error(s)", filename, outcome.errors.len());
        Ok(ExitCode::FAILURE)
    }
}
