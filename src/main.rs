//! Command-line interface for the repo-insight binary.
//!
//! The CLI supplies a repository URL and a GitHub token to the analyzer and
//! prints the resulting report as JSON. Diagnostics go to stderr so stdout
//! stays machine-readable.

use std::{io, path::PathBuf, process};

use clap::{ArgAction, Args, Parser, Subcommand};
use repo_insight::{Analyzer, AnalyzerConfig, Credentials, Error};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Command line interface for repository insight reports.
#[derive(Debug, Parser,)]
#[command(name = "repo-insight", version, about = "Analyze a GitHub repository")]
struct Cli
{
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand,)]
/// Supported commands exposed by the CLI.
enum Command
{
    /// Fetch sources and print the aggregated report.
    Analyze(AnalyzeArgs,),
    /// Validate a repository URL without contacting the API.
    Normalize(NormalizeArgs,),
    /// Print the effective configuration.
    Config(ConfigArgs,),
}

#[derive(Debug, Args,)]
/// Arguments accepted by the `analyze` subcommand.
struct AnalyzeArgs
{
    /// Repository URL, e.g. https://github.com/owner/name.
    #[arg(long = "url", value_name = "URL")]
    url: String,

    /// GitHub token used to authorize every request.
    #[arg(long = "token", env = "GITHUB_TOKEN", hide_env_values = true, value_name = "TOKEN")]
    token: String,

    /// Optional YAML configuration file.
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf,>,

    /// Output formatted JSON for easier inspection.
    #[arg(long = "pretty", action = ArgAction::SetTrue)]
    pretty: bool,
}

#[derive(Debug, Args,)]
struct NormalizeArgs
{
    /// Repository URL to validate.
    #[arg(long = "url", value_name = "URL")]
    url: String,

    /// Optional YAML configuration file providing the web host.
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf,>,
}

#[derive(Debug, Args,)]
struct ConfigArgs
{
    /// Optional YAML configuration file.
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf,>,

    /// GitHub token; only its presence is reported.
    #[arg(long = "token", env = "GITHUB_TOKEN", hide_env_values = true, value_name = "TOKEN")]
    token: Option<String,>,
}

/// Effective configuration with the credential reduced to its presence.
#[derive(Debug, Serialize,)]
struct ConfigReport<'config,>
{
    #[serde(flatten)]
    config: &'config AnalyzerConfig,
    token:  &'static str,
}

/// Entry point that reports errors and sets the appropriate exit status.
#[tokio::main]
async fn main()
{
    init_tracing();

    if let Err(error,) = run().await {
        eprintln!("{}", error.to_display_string());
        process::exit(1,);
    }
}

fn init_tracing()
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn",),);
    tracing_subscriber::fmt().with_env_filter(filter,).with_writer(io::stderr,).init();
}

/// Executes the CLI using parsed arguments.
///
/// # Errors
///
/// Propagates configuration, validation and analysis errors.
async fn run() -> Result<(), Error,>
{
    let cli = Cli::parse();

    match cli.command {
        Command::Analyze(args,) => run_analyze(args,).await,
        Command::Normalize(args,) => run_normalize(&args,),
        Command::Config(args,) => run_config(&args,),
    }
}

async fn run_analyze(args: AnalyzeArgs,) -> Result<(), Error,>
{
    let config = AnalyzerConfig::load_or_default(args.config.as_deref(),)?;
    let credentials = Credentials::new(args.token,)?;
    let analyzer = Analyzer::new(config,);

    let report = analyzer.analyze(&args.url, &credentials,).await?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_json(&mut handle, &report, args.pretty,)
}

fn run_normalize(args: &NormalizeArgs,) -> Result<(), Error,>
{
    let config = AnalyzerConfig::load_or_default(args.config.as_deref(),)?;
    let reference = Analyzer::new(config,).normalize(&args.url,)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_json(&mut handle, &reference, false,)
}

fn run_config(args: &ConfigArgs,) -> Result<(), Error,>
{
    let config = AnalyzerConfig::load_or_default(args.config.as_deref(),)?;
    let report = config_report(&config, args.token.as_deref(),);

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_json(&mut handle, &report, true,)
}

fn config_report<'config,>(
    config: &'config AnalyzerConfig,
    token: Option<&str,>,
) -> ConfigReport<'config,>
{
    let token = match token.map(str::trim,) {
        Some(value,) if !value.is_empty() => "set",
        _ => "missing",
    };

    ConfigReport {
        config,
        token,
    }
}

fn write_json<W: io::Write, T: Serialize + ?Sized,>(
    writer: &mut W,
    value: &T,
    pretty: bool,
) -> Result<(), Error,>
{
    if pretty {
        serde_json::to_writer_pretty(writer, value,)?;
    } else {
        serde_json::to_writer(writer, value,)?;
    }

    Ok((),)
}

#[cfg(test)]
mod tests
{
    use std::io::Cursor;

    use clap::Parser;
    use repo_insight::{AnalyzerConfig, normalize};

    use super::{Cli, Command, config_report, run_normalize, write_json};

    #[test]
    fn analyze_accepts_url_and_token()
    {
        let cli = Cli::try_parse_from([
            env!("CARGO_PKG_NAME"),
            "analyze",
            "--url",
            "https://github.com/a/b",
            "--token",
            "ghp_example",
            "--pretty",
        ],)
        .expect("failed to parse CLI",);

        match cli.command {
            Command::Analyze(args,) => {
                assert_eq!(args.url, "https://github.com/a/b");
                assert_eq!(args.token, "ghp_example");
                assert!(args.pretty);
                assert!(args.config.is_none());
            }
            other => panic!("unexpected command variant: {other:?}"),
        }
    }

    #[test]
    fn normalize_requires_url()
    {
        assert!(Cli::try_parse_from([env!("CARGO_PKG_NAME"), "normalize"],).is_err());
    }

    #[test]
    fn normalize_rejects_foreign_host()
    {
        let cli = Cli::try_parse_from([
            env!("CARGO_PKG_NAME"),
            "normalize",
            "--url",
            "https://example.com/a/b",
        ],)
        .expect("failed to parse CLI",);

        let args = match cli.command {
            Command::Normalize(args,) => args,
            other => panic!("unexpected command variant: {other:?}"),
        };

        let error = run_normalize(&args,).expect_err("expected invalid reference",);
        assert!(matches!(error, repo_insight::Error::InvalidReference { .. }));
    }

    #[test]
    fn compact_writer_emits_single_line()
    {
        let reference = normalize("https://github.com/a/b.git",).expect("valid reference",);
        let mut buffer = Cursor::new(Vec::new(),);
        write_json(&mut buffer, &reference, false,).expect("failed to serialize",);

        let output = String::from_utf8(buffer.into_inner(),).expect("invalid UTF-8",);
        assert_eq!(output, "{\"owner\":\"a\",\"name\":\"b\"}");
    }

    #[test]
    fn config_report_hides_token_value()
    {
        let config = AnalyzerConfig::default();
        let report = config_report(&config, Some("ghp_secret",),);
        let mut buffer = Cursor::new(Vec::new(),);
        write_json(&mut buffer, &report, false,).expect("failed to serialize",);

        let output = String::from_utf8(buffer.into_inner(),).expect("invalid UTF-8",);
        assert!(output.contains("\"token\":\"set\""));
        assert!(!output.contains("ghp_secret"));
        assert!(output.contains("\"contributors_limit\":10"));

        let missing = config_report(&config, Some("  ",),);
        assert_eq!(missing.token, "missing");
    }
}
