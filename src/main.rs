use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use ogonki::config::{Config, ConfigError, UnrecognizedPolicy};
use ogonki::{DetectedState, Detection, ObservedBytes};
use tracing_subscriber::EnvFilter;

/// Detect ISO-8859-2 / Windows-1250 / UTF-8 Polish text and convert it to UTF-8
#[derive(Parser, Debug)]
#[command(name = "ogonki", version, about)]
struct Cli {
    /// Config file (defaults to <config dir>/ogonki/config.json)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the detected state of each file
    Detect {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Observed byte override, two hex digits per value (repeatable)
        #[arg(long = "observed", value_name = "HEX")]
        observed: Vec<String>,
    },
    /// Convert a file to UTF-8
    Convert {
        file: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Skip detection and treat the input as this state: utf-8,
        /// iso-8859-2, windows-1250, mixed, ambiguous, or the code 0-4
        #[arg(long, value_name = "STATE", value_parser = parse_assumed_state)]
        assume: Option<DetectedState>,

        /// Observed byte override, two hex digits per value (repeatable)
        #[arg(long = "observed", value_name = "HEX")]
        observed: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let (config, default_config_error) = load_config(cli.config.as_deref())?;

    init_tracing(&config.log_filter);
    if let Some(e) = default_config_error {
        tracing::warn!("{}, using defaults", e);
    }

    match cli.command {
        Command::Detect { files, observed } => {
            let observed = observed_override(&config, observed);
            run_detect(&files, &observed)
        }
        Command::Convert {
            file,
            output,
            assume,
            observed,
        } => {
            let observed = observed_override(&config, observed);
            run_convert(
                &file,
                output.as_deref(),
                assume.or(config.assume),
                observed,
                config.on_unrecognized,
            )
        }
    }
}

/// An explicit `--config` must load. A broken default config falls back to
/// the defaults and hands the error back so it can be logged once tracing
/// is initialized.
fn load_config(explicit: Option<&Path>) -> Result<(Config, Option<ConfigError>)> {
    match explicit {
        Some(path) => {
            let config = Config::load_from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            Ok((config, None))
        }
        None => Ok(config_or_defaults(Config::load_default())),
    }
}

fn config_or_defaults(loaded: Result<Config, ConfigError>) -> (Config, Option<ConfigError>) {
    match loaded {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    }
}

/// States `--assume` accepts; `unrecognized` (code 5) can not be asserted.
fn parse_assumed_state(value: &str) -> Result<DetectedState, String> {
    let state: DetectedState = value.parse().map_err(|e| format!("{}", e))?;
    if !state.is_assertable() {
        return Err(format!("state {} can not be assumed", state));
    }
    Ok(state)
}

/// Log to stderr; `OGONKI_LOG` takes precedence over the configured filter.
fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_env("OGONKI_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Command line tokens win over the config file.
fn observed_override(config: &Config, tokens: Vec<String>) -> ObservedBytes {
    if tokens.is_empty() {
        config.observed_bytes()
    } else {
        ObservedBytes::Tokens(tokens)
    }
}

fn read_content(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn run_detect(files: &[PathBuf], observed: &ObservedBytes) -> Result<()> {
    let mut failed = 0;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for path in files {
        let detection = read_content(path).and_then(|content| {
            Detection::new(content, None, observed.clone())
                .with_context(|| format!("Failed to detect encoding of {}", path.display()))
        });
        match detection {
            Ok(detection) => {
                let label = detection
                    .label()
                    .map(|encoding| encoding.label())
                    .unwrap_or("-");
                writeln!(out, "{}: {} ({})", path.display(), detection.state(), label)?;
            }
            Err(e) => {
                tracing::warn!("{:#}", e);
                eprintln!("{}: {:#}", path.display(), e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} files could not be classified", failed, files.len());
    }
    Ok(())
}

fn run_convert(
    file: &Path,
    output: Option<&Path>,
    assume: Option<DetectedState>,
    observed: ObservedBytes,
    on_unrecognized: UnrecognizedPolicy,
) -> Result<()> {
    let content = read_content(file)?;
    let mut detection = Detection::new(content, assume, observed)
        .with_context(|| format!("Failed to detect encoding of {}", file.display()))?;
    tracing::info!("{} detected as {}", file.display(), detection.state());

    if detection.converted().is_none() {
        match on_unrecognized {
            UnrecognizedPolicy::Fail => {
                bail!(
                    "{} is in an unrecognized encoding and can not be converted",
                    file.display()
                );
            }
            UnrecognizedPolicy::Passthrough => {
                tracing::warn!("{} is unrecognized, writing it unchanged", file.display());
                return write_output(output, detection.content());
            }
        }
    }

    let converted = detection.try_converted()?;
    write_output(output, converted)
}

fn write_output(output: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, bytes)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            out.write_all(bytes)?;
            out.flush()?;
            Ok(())
        }
    }
}
