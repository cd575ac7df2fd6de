use anyhow::Result;
use clap::{ArgGroup, Args, Parser, Subcommand};
use corsprobe::{
    config::{parse_header_arg, Config},
    output::{print_cors_table, print_summary, OutputFormat},
    runner::{ScanJob, TargetSource},
    scan::Coordinator,
    ScanConfig, ScanResultSet,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Exit codes for CI integration
mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
    pub const CORS_FOUND: u8 = 2;
}

#[derive(Parser)]
#[command(name = "corsprobe")]
#[command(
    author,
    version,
    about = "Probe HTTP endpoints for CORS misconfigurations with a spoofed Origin header"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe one URL or every URL in a file
    Scan(ScanArgs),

    /// Show or create config file
    Config {
        /// Generate default config file
        #[arg(long)]
        init: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

#[derive(Args)]
#[command(group(ArgGroup::new("input").required(true).args(["url", "file"])))]
struct ScanArgs {
    /// Single URL to test
    #[arg(short, long, value_parser = clap::builder::NonEmptyStringValueParser::new())]
    url: Option<String>,

    /// File containing URLs (one per line)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Report file [default: cors_results.txt]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// HTTP method to use [default: GET]
    #[arg(short, long)]
    method: Option<String>,

    /// Number of concurrent requests [default: 5]
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Request timeout in seconds [default: 10]
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Extra request header, repeatable
    #[arg(short = 'H', long = "header", value_name = "NAME: VALUE")]
    headers: Vec<String>,

    /// Report format (text, json)
    #[arg(long)]
    format: Option<String>,

    /// Exit with code 2 if any target exposes CORS headers
    #[arg(long)]
    fail_on_cors: bool,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

async fn run() -> Result<u8> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan(args) => run_scan(args).await,
        Commands::Config { init, path } => {
            handle_config(init, path)?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose { "corsprobe=info" } else { "corsprobe=error" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_scan(args: ScanArgs) -> Result<u8> {
    init_logging(args.verbose);

    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "ignoring unreadable config file");
            Config::default()
        }
    };
    if let Some(method) = args.method {
        config.method = method;
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }
    if let Some(output) = args.output {
        config.output = output;
    }
    if let Some(format) = args.format {
        config.format = format;
    }
    for raw in &args.headers {
        let (name, value) = parse_header_arg(raw)?;
        config.headers.insert(name, value);
    }

    let format = OutputFormat::from_str(&config.format).map_err(|e| anyhow::anyhow!(e))?;
    let scan_config = Arc::new(config.to_scan_config()?);

    let source = match (args.url, args.file) {
        (Some(url), _) => TargetSource::Url(url),
        (None, Some(path)) => TargetSource::File(path),
        (None, None) => return Err(corsprobe::ScanError::NoTargets.into()),
    };
    let job = ScanJob {
        source,
        output: config.output.clone(),
        format,
    };

    let targets = job.source.resolve()?;

    let show_progress = !args.no_progress
        && !args.verbose
        && targets.len() > 1
        && std::io::stderr().is_terminal();
    let progress = if show_progress {
        let pb = ProgressBar::new(targets.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} Probing targets...")?
                .progress_chars("#>-"),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let mut coordinator = Coordinator::from_config(scan_config)?;
    if let Some(pb) = progress.clone() {
        coordinator = coordinator.on_result(move |_| pb.inc(1));
    }

    let results = job.run_targets(targets, &coordinator).await;

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    let results = results?;

    print_cors_table(&results);
    print_summary(&results);

    Ok(scan_exit_code(&results, args.fail_on_cors))
}

fn scan_exit_code(results: &ScanResultSet, fail_on_cors: bool) -> u8 {
    if fail_on_cors && results.with_cors().next().is_some() {
        exit_codes::CORS_FOUND
    } else {
        exit_codes::SUCCESS
    }
}

fn handle_config(init: bool, show_path: bool) -> Result<()> {
    let config_path = Config::config_path();

    if show_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if init {
        if config_path.exists() {
            println!("Config file already exists at: {}", config_path.display());
            return Ok(());
        }

        Config::default().save()?;
        println!("Created config file at: {}", config_path.display());
        println!();
        println!("{}", Config::generate_default_config());
        return Ok(());
    }

    if config_path.exists() {
        println!("Config file: {}", config_path.display());
    } else {
        println!("Config file: {} (not found, using defaults)", config_path.display());
        println!("Run 'corsprobe config --init' to create one.");
    }
    println!();

    let config = Config::load()?;
    let scan_config = config.to_scan_config()?;
    print!("{}", describe_settings(&config, &scan_config));

    Ok(())
}

/// Effective scan settings, as a scan without CLI overrides would use them.
fn describe_settings(config: &Config, scan_config: &ScanConfig) -> String {
    let timeout = if scan_config.timeout.is_zero() {
        "none".to_string()
    } else {
        format!("{}s", scan_config.timeout.as_secs())
    };

    let mut out = String::from("Effective settings:\n");
    out.push_str(&format!("  Method:      {}\n", scan_config.method));
    out.push_str(&format!("  Concurrency: {}\n", scan_config.concurrency));
    out.push_str(&format!("  Timeout:     {}\n", timeout));
    out.push_str(&format!("  Report:      {} ({})\n", config.output.display(), config.format));
    out.push_str("  Headers:\n");
    for (name, value) in &scan_config.headers {
        out.push_str(&format!("    {}: {}\n", name, value));
    }
    out
}
