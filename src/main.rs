use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;
use simple_logger::SimpleLogger;

use ynabify::convert::{AccountType, ConvertError, ConvertOptions, convert, detect_account_type};

#[derive(Parser, Debug)]
#[command(
    version,
    disable_version_flag = true,
    about = "Convert DKB CSV exports into YNAB4 compatible CSV files"
)]
struct Cli {
    /// Source CSV export file
    file: PathBuf,

    /// Account type of the export; auto-detected from the header when omitted
    account_type: Option<AccountType>,

    /// Output file path (defaults to the source name with a -ynab.csv suffix)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Process the file but print rows to stdout instead of writing output
    #[arg(long)]
    dry_run: bool,

    /// Maximum number of rows printed in dry-run mode
    #[arg(long, default_value_t = 10, requires = "dry_run")]
    limit: usize,

    /// Enable debug logging
    #[arg(long)]
    verbose: bool,

    /// Print version
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    version: Option<bool>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    if let Err(e) = SimpleLogger::new().with_level(level).env().init() {
        eprintln!("ynabify: failed to initialise logging: {e}");
        return ExitCode::from(1);
    }

    log::debug!("Application started");

    match run(&cli) {
        Ok(()) => {
            log::debug!("Application finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("ynabify: {}: {err}", cli.file.display());
            ExitCode::from(exit_code_for(&err))
        }
    }
}

/// Validation failures and I/O failures exit with different statuses.
fn exit_code_for(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<ConvertError>() {
        Some(e) if e.is_validation() => 2,
        _ => 1,
    }
}

fn run(cli: &Cli) -> Result<()> {
    let account_type = match cli.account_type {
        Some(t) => t,
        None => {
            log::debug!("No account type given, detecting from header");
            let detected = detect_account_type(&cli.file)?;
            log::debug!("Detected account type: {detected:?}");
            detected
        }
    };

    let options = ConvertOptions {
        output: cli.output.clone(),
        preview_limit: cli.dry_run.then_some(cli.limit),
    };

    let summary = convert(&cli.file, account_type, &options)?;

    match summary.output {
        Some(path) => log::info!(
            "Wrote {} rows to {} ({} skipped)",
            summary.written,
            path.display(),
            summary.skipped
        ),
        None => log::info!(
            "Previewed {} rows ({} skipped)",
            summary.written,
            summary.skipped
        ),
    }

    Ok(())
}
