// src/main.rs

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use std::io::Write;
use std::sync::Arc;
use tokio::task::spawn_blocking;
use tracing::{error, info, warn};

use oob_prober::cli::{Cli, Commands, ImportNmapArgs, ScanArgs};
use oob_prober::core::nmap;
use oob_prober::{logging, App, TracingSink};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let log_path = logging::initialize_logging(cli.log.as_deref())?;
    info!(log = %log_path.display(), "oob-prober starting.");

    match cli.command {
        Commands::Scan(args) => scan(args).await,
        Commands::ImportNmap(args) => import_nmap(args),
    }
}

/// Loads the input, then runs the blocking worker pool off the async runtime.
/// Ctrl-C ends the process; in-flight deliveries are not waited for.
async fn scan(args: ScanArgs) -> Result<()> {
    let app = App::load(args.into(), Arc::new(TracingSink))?;
    println!("Probing {} jobs; transport failures go to the log.", app.job_count());

    let handle = spawn_blocking(move || app.run());
    tokio::select! {
        joined = handle => {
            let report = joined.wrap_err("scan task panicked")??;
            println!(
                "Scan finished: {} attempted, {} sent, {} failed ({:.2}s)",
                report.attempted,
                report.sent,
                report.failures(),
                report.elapsed.as_secs_f64()
            );
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("Scan interrupted, exiting without waiting for workers.");
            std::process::exit(130);
        }
    }
    Ok(())
}

fn import_nmap(args: ImportNmapArgs) -> Result<()> {
    let xml = std::fs::read_to_string(&args.report)
        .inspect_err(|e| error!(error = %e, "Cannot read nmap report."))
        .wrap_err_with(|| format!("cannot read {}", args.report.display()))?;
    let lines = nmap::domain_lines(&xml, &args.protocol);
    info!(hosts = lines.len(), report = %args.report.display(), "nmap report converted.");

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(std::io::stdout().lock()),
    };
    for line in &lines {
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(())
}
