//! ocpp-check - conformance checker for OCPP 2.0.1 payloads
//!
//! Decodes a JSON payload as the request (or response) type of an action and
//! reports whether it satisfies every field constraint.
//!
//! # Usage
//!
//! ```bash
//! # Check a request payload from a file
//! ocpp-check --action SetChargingProfile profile.json
//!
//! # Check a response from stdin, listing every violation
//! echo '{"status": "Accepted"}' | ocpp-check --action ReserveNow --response --exhaustive
//!
//! # Machine-readable report
//! ocpp-check --action BootNotification --json boot.json
//! ```
//!
//! Exit status: 0 conformant, 1 non-conformant, 2 unreadable input.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ocpp_model::{Action, CheckReport, Checker, CheckerConfig, Direction};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

/// OCPP 2.0.1 payload conformance checker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// OCPP action name (e.g. BootNotification)
    #[arg(short, long)]
    action: String,

    /// Treat the payload as the action's response instead of its request
    #[arg(long)]
    response: bool,

    /// Report every violation instead of stopping at the first
    #[arg(long)]
    exhaustive: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Maximum payload size in bytes
    #[arg(long, default_value = "65536")]
    max_bytes: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Payload file (stdin when omitted)
    input: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let outcome = init_logging(&args.log_level).and_then(|()| run(&args));
    if let Err(e) = &outcome {
        eprintln!("error: {}", e);
    }
    ExitCode::from(exit_code(&outcome))
}

/// 0 conformant, 1 non-conformant, 2 the payload could not be checked at all
fn exit_code(outcome: &Result<CheckReport, Box<dyn std::error::Error>>) -> u8 {
    match outcome {
        Ok(report) if report.valid => 0,
        Ok(_) => 1,
        Err(_) => 2,
    }
}

fn init_logging(log_level: &str) -> Result<(), Box<dyn std::error::Error>> {
    let level = match log_level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn run(args: &Args) -> Result<CheckReport, Box<dyn std::error::Error>> {
    let report = check(args)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(report)
}

fn check(args: &Args) -> Result<CheckReport, Box<dyn std::error::Error>> {
    let action: Action = args.action.parse()?;

    // Build configuration
    let direction = if args.response {
        Direction::Response
    } else {
        Direction::Request
    };
    let mut config = CheckerConfig::new(direction).with_max_payload_bytes(args.max_bytes);
    if args.exhaustive {
        config = config.exhaustive();
    }
    debug!("Checker config: {:?}", config);

    let checker = Checker::new(config);
    let report = match &args.input {
        Some(path) => checker.check_file(action, path)?,
        None => {
            let mut bytes = Vec::new();
            std::io::stdin().read_to_end(&mut bytes)?;
            checker.check(action, &bytes)?
        }
    };
    Ok(report)
}

fn print_report(report: &CheckReport) {
    let verdict = if report.valid { "CONFORMANT" } else { "NON-CONFORMANT" };
    println!("{} {}: {}", report.action, report.direction, verdict);

    if let Some(code) = report.error_code {
        println!("  error code: {:?}", code);
    }
    for violation in &report.violations {
        println!("  - {}", violation);
    }
    if let Some(rendered) = &report.rendered {
        println!("  {}", rendered);
    }
}
