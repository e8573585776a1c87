//! HTTP Analyzer CLI
//!
//! Issues a single HTTP request and reports the status, final URL, redirect
//! count and elapsed time.
//!
//! Usage:
//!   http-analyzer analyze <URL> [OPTIONS]
//!   http-analyzer version

use clap::{Args, Parser, Subcommand, ValueEnum};
use http_analyzer::render::{self, RenderOptions};
use http_analyzer::{
    AnalysisResult, AnalyzerError, Executor, RequestBuilder, RequestConfig, DEFAULT_METHOD,
    DEFAULT_TIMEOUT_SECS,
};
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// HTTP Analyzer CLI - Analyze HTTP requests and responses
#[derive(Parser, Debug)]
#[command(name = "http-analyzer")]
#[command(author, version, about = "Analyze HTTP requests and responses")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze an HTTP request to URL
    Analyze(AnalyzeArgs),
    /// Show version information
    Version,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Target URL (https:// is assumed when no scheme is given)
    url: String,

    /// HTTP method to use
    #[arg(short, long, default_value = DEFAULT_METHOD)]
    method: String,

    /// Custom header (key:value), repeatable
    #[arg(short = 'H', long = "header", value_name = "KEY:VALUE")]
    headers: Vec<String>,

    /// Request body data
    #[arg(short, long)]
    data: Option<String>,

    /// Request timeout in seconds
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_TIMEOUT_SECS,
        env = "HTTP_ANALYZER_TIMEOUT",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout: u64,

    /// Show response headers and a body preview
    #[arg(short, long)]
    verbose: bool,

    /// Do not follow redirects
    #[arg(long)]
    no_follow: bool,

    /// Output format
    #[arg(
        short,
        long,
        value_enum,
        default_value_t = OutputFormat::Text,
        env = "HTTP_ANALYZER_OUTPUT"
    )]
    output: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Command::Analyze(args) => analyze(args).await,
        Command::Version => {
            println!("HTTP Analyzer CLI v{}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Logs go to stderr so they never mix with the report on stdout.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn analyze(args: AnalyzeArgs) -> anyhow::Result<ExitCode> {
    let stdout = io::stdout();
    let options = RenderOptions {
        verbose: args.verbose,
        color: !args.no_color && stdout.is_terminal(),
    };
    let mut out = stdout.lock();

    if args.output == OutputFormat::Text {
        render::render_banner(&mut out, &args.url, options)?;
        out.flush()?;
    }

    let config = match request_config(&args) {
        Ok(config) => config,
        Err(err) => return report_error(&mut out, &err, args.output, options),
    };

    match Executor::new().execute(&config).await {
        Ok(response) => {
            match args.output {
                OutputFormat::Text => render::render_response(&mut out, &response, options)?,
                OutputFormat::Json => {
                    render::render_json(&mut out, &AnalysisResult::new(config, response))?
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report_error(&mut out, &err, args.output, options),
    }
}

fn request_config(args: &AnalyzeArgs) -> http_analyzer::Result<RequestConfig> {
    let mut builder = RequestBuilder::new(&args.url)?
        .method(&args.method)
        .timeout(args.timeout)
        .header_specs(&args.headers)
        .follow_redirects(!args.no_follow);

    if let Some(data) = args.data.as_deref().filter(|d| !d.is_empty()) {
        builder = builder.body(data);
    }

    Ok(builder.build())
}

fn report_error<W: Write>(
    out: &mut W,
    err: &AnalyzerError,
    format: OutputFormat,
    options: RenderOptions,
) -> anyhow::Result<ExitCode> {
    match format {
        OutputFormat::Text => render::render_error(out, err, options)?,
        OutputFormat::Json => render::render_error_json(out, err)?,
    }
    Ok(ExitCode::from(err.exit_code() as u8))
}
