// # cfddns - Cloudflare DDNS updater
//
// Thin integration layer: parses the command line, sets up logging and the
// runtime, then drives one pass of `cfddns_core::Engine` over the
// configuration file and replaces it with the rewritten text.
//
// All line interpretation and reconciliation lives in cfddns-core.
//
// ## Options
//
// Every option can also be set through the environment:
//
// - `--dry-run` / `CFDDNS_DRY_RUN`: never update records, print the rewritten
//   file to stdout instead of replacing it
// - `--log-secrets` / `CFDDNS_LOG_SECRETS`: show API keys and identifiers in
//   the per-line log
// - `--api-base` / `CFDDNS_API_BASE`: provider API base URL
// - `--timeout-secs` / `CFDDNS_HTTP_TIMEOUT_SECS`: per-request timeout
// - `--log-level` / `CFDDNS_LOG_LEVEL`: trace, debug, info, warn, error
// - `--backup` / `CFDDNS_BACKUP`: keep the previous file as `<file>.backup`
//
// ## Example
//
// ```bash
// cfddns /etc/cfddns.conf
//
// # from cron, every five minutes
// */5 * * * * cfddns --backup /etc/cfddns.conf
// ```

use anyhow::Result;
use cfddns_core::config::DEFAULT_API_BASE;
use cfddns_core::{ConfigFile, Engine, EngineConfig};
use cfddns_http::{DEFAULT_TIMEOUT_SECS, ReqwestTransport, TransportConfig};
use clap::Parser;
use clap::error::ErrorKind;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes
///
/// Lines that end with a diagnostic still count as success; only conditions
/// that leave the file untouched are failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CfddnsExitCode {
    /// Pass completed
    Success = 0,
    /// Usage error, unreadable file, invalid configuration or failed replace
    Failure = 1,
}

impl From<CfddnsExitCode> for ExitCode {
    fn from(code: CfddnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "cfddns", version)]
#[command(about = "Update Cloudflare DNS records from a self-rewriting configuration file", long_about = None)]
struct Args {
    /// Configuration file to interpret and rewrite
    config_file: PathBuf,

    /// Do not update any record and print the result instead of writing it
    #[arg(long, env = "CFDDNS_DRY_RUN")]
    dry_run: bool,

    /// Include API keys and identifiers in the log
    #[arg(long, env = "CFDDNS_LOG_SECRETS")]
    log_secrets: bool,

    /// Provider API base URL
    #[arg(long, env = "CFDDNS_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Timeout for a single HTTP request, in seconds
    #[arg(long, env = "CFDDNS_HTTP_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CFDDNS_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Keep the previous file as <file>.backup
    #[arg(long, env = "CFDDNS_BACKUP")]
    backup: bool,
}

fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "Log level '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            level
        ),
    }
}

/// Help and version requests are not errors
fn usage_exit_code(err: &clap::Error) -> CfddnsExitCode {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => CfddnsExitCode::Success,
        _ => CfddnsExitCode::Failure,
    }
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // help goes to stdout, usage errors to stderr
            let _ = e.print();
            return usage_exit_code(&e).into();
        }
    };

    let log_level = match parse_log_level(&args.log_level) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return CfddnsExitCode::Failure.into();
        }
    };

    // stdout is reserved for --dry-run output
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return CfddnsExitCode::Failure.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return CfddnsExitCode::Failure.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run(&args).await {
            error!("{:#}", e);
            CfddnsExitCode::Failure
        } else {
            CfddnsExitCode::Success
        }
    });

    result.into()
}

/// One pass: load, interpret, replace
async fn run(args: &Args) -> Result<()> {
    let transport =
        ReqwestTransport::new(TransportConfig::new().with_timeout_secs(args.timeout_secs))?;

    let config = EngineConfig::new()
        .with_api_base(args.api_base.as_str())
        .with_dry_run(args.dry_run)
        .with_log_secrets(args.log_secrets);
    let engine = Engine::new(Box::new(transport), config)?;

    let file = ConfigFile::new(&args.config_file).with_backup(args.backup);
    let input = file.load().await?;

    info!("Processing {}", file.path().display());
    let report = engine.run(&input).await;

    if args.dry_run {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&report.output)?;
        stdout.flush()?;
        info!("Dry run: {} left unchanged", file.path().display());
    } else {
        file.store(&report.output).await?;
        info!("Rewrote {}", file.path().display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_is_required() {
        let err = Args::try_parse_from(["cfddns"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_eq!(usage_exit_code(&err), CfddnsExitCode::Failure);
    }

    #[test]
    fn help_exits_successfully() {
        let err = Args::try_parse_from(["cfddns", "--help"]).unwrap_err();
        assert_eq!(usage_exit_code(&err), CfddnsExitCode::Success);
    }

    #[test]
    fn unknown_flag_is_a_failure() {
        let err = Args::try_parse_from(["cfddns", "--frobnicate", "x.conf"]).unwrap_err();
        assert_eq!(usage_exit_code(&err), CfddnsExitCode::Failure);
    }

    #[test]
    fn options_are_parsed() {
        let args = Args::try_parse_from([
            "cfddns",
            "--dry-run",
            "--backup",
            "--api-base",
            "http://127.0.0.1:8080/client/v4",
            "--timeout-secs",
            "5",
            "/etc/cfddns.conf",
        ])
        .unwrap();

        assert_eq!(args.config_file, PathBuf::from("/etc/cfddns.conf"));
        assert!(args.dry_run);
        assert!(args.backup);
        assert_eq!(args.api_base, "http://127.0.0.1:8080/client/v4");
        assert_eq!(args.timeout_secs, 5);
    }

    #[test]
    fn log_levels() {
        assert_eq!(parse_log_level("info").unwrap(), Level::INFO);
        assert_eq!(parse_log_level("DEBUG").unwrap(), Level::DEBUG);
        assert!(parse_log_level("verbose").is_err());
    }
}
