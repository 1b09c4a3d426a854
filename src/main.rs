//! Shortcode CLI
//!
//! Usage:
//!   shortcode [OPTIONS] [FILE]
//!
//! Options:
//!   -c, --config <FILE>        Handlers, syntax and limits (TOML format)
//!   --inspect                  List the shortcodes found instead of processing
//!   --recursion-depth <N>      Levels of nested content to resolve
//!   --max-iterations <N>       Passes over the text (0 = until it settles)
//!   --no-auto-process          Hand raw content to handlers
//!   -h, --help                 Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use shortcode::{report, Config, RegularParser, ShortcodeParser};

#[derive(Parser)]
#[command(name = "shortcode")]
#[command(about = "Replace shortcodes in text using template handlers")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Config file with handlers, syntax and limits (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print an annotated list of the shortcodes found instead of processing
    #[arg(long)]
    inspect: bool,

    /// Levels of nested content to resolve
    #[arg(long, value_name = "N")]
    recursion_depth: Option<usize>,

    /// Passes over the text; 0 repeats until the output stops changing
    #[arg(long, value_name = "N")]
    max_iterations: Option<usize>,

    /// Hand raw, unresolved content to handlers
    #[arg(long)]
    no_auto_process: bool,
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => match Config::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };

    if let Some(depth) = cli.recursion_depth {
        config.processor.recursion_depth = Some(depth);
    }
    if let Some(iterations) = cli.max_iterations {
        config.processor.max_iterations = (iterations > 0).then_some(iterations);
    }
    if cli.no_auto_process {
        config.processor.auto_process_content = false;
    }

    // Read input
    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let processor = match config.build_processor() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if cli.inspect {
        let shortcodes = RegularParser::new(config.syntax.clone()).parse(&source);
        let output = if io::stdout().is_terminal() {
            report::render(&source, &filename, &shortcodes)
        } else {
            report::render_plain(&source, &filename, &shortcodes)
        };
        print!("{}", output);
        return;
    }

    print!("{}", processor.process(&source));
}
