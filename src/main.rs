use clap::{Parser, Subcommand};
use lexana::config::Config;
use lexana::output::{create_results_file, OutputFormat, ResultWriter};
use lexana::{LexanaError, Lexer, LexerOptions, Result, UnrecognizedPolicy};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(author, version, about = "Lexical analyser for a small C-like language")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored log output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a source file and write its token records
    Scan {
        /// Source file to scan (prompted for when omitted)
        input: Option<PathBuf>,
        /// Directory receiving the results file (default: from config)
        #[arg(short = 'o', long)]
        results_dir: Option<PathBuf>,
        /// Record format (default: from config)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
        /// Drop characters that cannot start a token instead of reporting them
        #[arg(long)]
        skip_unrecognized: bool,
        /// Write records to stdout instead of a results file
        #[arg(long)]
        stdout: bool,
    },
    /// Manage lexana configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Write a config file with defaults
    Init,
    /// Print the config file location
    Path,
}

struct ScanSettings {
    results_dir: PathBuf,
    format: OutputFormat,
    options: LexerOptions,
    stdout: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.no_color) {
        eprintln!("{}", e);
    }

    if let Err(e) = run(cli.command) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool, no_color: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(!no_color)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| LexanaError::Config(format!("Failed to initialize logging: {}", e)))
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Scan {
            input,
            results_dir,
            format,
            skip_unrecognized,
            stdout,
        } => {
            let config = Config::load()?;
            config.validate()?;

            let input = match input {
                Some(path) => path,
                None => ask_user("Path of the source file to scan: ")?,
            };
            let policy = if skip_unrecognized || config.skip_unrecognized {
                UnrecognizedPolicy::Skip
            } else {
                UnrecognizedPolicy::Emit
            };
            let settings = ScanSettings {
                results_dir: results_dir.unwrap_or(config.results_dir),
                format: format.unwrap_or(config.format),
                options: LexerOptions {
                    unrecognized: policy,
                },
                stdout,
            };
            scan(&input, &settings)
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                let config = Config::load()?;
                println!("{}", serde_json::to_string_pretty(&config)?);
                Ok(())
            }
            ConfigCommands::Init => {
                let path = Config::get_config_path();
                if path.exists() {
                    println!("Config file already exists at: {}", path.display());
                } else {
                    Config::default().save()?;
                    println!("Initialized new config file at: {}", path.display());
                }
                Ok(())
            }
            ConfigCommands::Path => {
                println!("{}", Config::get_config_path().display());
                Ok(())
            }
        },
    }
}

fn scan(input: &Path, settings: &ScanSettings) -> Result<()> {
    if !input.is_file() {
        return Err(LexanaError::FileNotFound(format!(
            "Input file not found: {}",
            input.display()
        )));
    }
    let source = BufReader::new(File::open(input)?);

    info!(input = %input.display(), "scanning");
    if settings.stdout {
        let stdout = io::stdout();
        return write_tokens(source, input, settings, stdout.lock()).map(|_| ());
    }

    let (path, file) = create_results_file(&settings.results_dir, settings.format)?;
    write_tokens(source, input, settings, file)?;
    info!(results = %path.display(), "results written");
    Ok(())
}

fn write_tokens<R: BufRead, W: Write>(
    source: R,
    input: &Path,
    settings: &ScanSettings,
    out: W,
) -> Result<W> {
    let mut writer = ResultWriter::new(out, settings.format);
    let mut errors = 0;

    for token in Lexer::with_options(source, input, settings.options) {
        let token = token?;
        if token.is_error() {
            errors += 1;
        }
        writer.write(&token)?;
    }

    info!(tokens = writer.written(), errors, "scan finished");
    Ok(writer.finish()?)
}

fn ask_user(message: &str) -> Result<PathBuf> {
    println!("{}", message);
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    let answer = answer.trim();
    if answer.is_empty() {
        return Err(LexanaError::FileNotFound("no input file given".to_string()));
    }
    Ok(PathBuf::from(answer))
}
