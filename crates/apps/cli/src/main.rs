use std::process::ExitCode;

use clap::Parser;
use focus_drive_cli::{run_drive, shutdown_on, Args, DriveOutcome};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    match real_main(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("focus-drive: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn real_main(args: Args) -> Result<(), String> {
    let json = args.json;
    let shutdown = shutdown_on(tokio::signal::ctrl_c());
    let report = run_drive(args.into_options(), shutdown).await?;

    if json {
        let out = serde_json::to_string_pretty(&report.snapshot).map_err(|e| e.to_string())?;
        println!("{out}");
        return Ok(());
    }

    let snap = &report.snapshot;
    match report.outcome {
        DriveOutcome::Arrived => println!("{} after {:.0} min", snap.status, snap.duration_min),
        DriveOutcome::Interrupted => println!(
            "Stopped at {:.0}% with {} left",
            snap.progress * 100.0,
            snap.countdown
        ),
    }
    if snap.route_fallback == Some(true) {
        println!("(routing was unavailable; drove a straight line)");
    }
    Ok(())
}
