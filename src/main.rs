//! jsrecon - JavaScript reconnaissance for a single web page.
//!
//! CLI entry point.

use clap::Parser;
use jsrecon::output::{json, ConsoleOutput};
use jsrecon::{Commands, Config, ScanConfig, Scanner, SetupConfig};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config.verbose {
            EnvFilter::new("jsrecon=debug,info")
        } else {
            EnvFilter::new("jsrecon=info,warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let run = async {
        match config.command.clone() {
            Commands::Scan(scan_config) => run_scan(scan_config, config.verbose).await,
            Commands::Setup(setup_config) => run_setup(setup_config).await,
        }
    };

    // Dropping the run future drops the browser session, which kills Chrome
    tokio::select! {
        result = run => match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(code) => code,
        },
        _ = shutdown_signal() => {
            eprintln!("\nSignal received, aborting scan...");
            ExitCode::from(130)
        }
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {},
                    _ = sigint.recv() => {},
                }
            }
            _ => {
                error!("Failed to register signal handlers");
                std::future::pending::<()>().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

async fn run_scan(scan_config: ScanConfig, verbose: bool) -> Result<(), ExitCode> {
    let console = ConsoleOutput::new(verbose, scan_config.json, scan_config.quiet);

    let scanner = match Scanner::from_config(&scan_config) {
        Ok(s) => s.with_console(console.clone()),
        Err(e) => {
            error!("Failed to create scanner: {}", e);
            return Err(ExitCode::FAILURE);
        }
    };

    // Print banner unless JSON or quiet mode
    if !scan_config.json && !scan_config.quiet {
        print_banner();
    }

    let report = match scanner
        .scan_to_file(&scan_config.domain, &scan_config.output)
        .await
    {
        Ok(r) => r,
        Err(e) => {
            error!("Scan of {} failed: {}", scan_config.domain, e);
            return Err(ExitCode::FAILURE);
        }
    };

    console.print_summary(&report);

    if scan_config.json {
        match json::to_string(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize report: {}", e);
                return Err(ExitCode::FAILURE);
            }
        }
    }

    console.print_info(&format!(
        "Results saved to {}",
        scan_config.output.display()
    ));

    Ok(())
}

async fn run_setup(setup_config: SetupConfig) -> Result<(), ExitCode> {
    eprintln!("Setting up Chromium browser...");
    match jsrecon::browser::download_chrome(setup_config.force).await {
        Ok(path) => {
            eprintln!("Chromium ready at: {}", path.display());
            Ok(())
        }
        Err(e) => {
            error!("Setup failed: {}", e);
            Err(ExitCode::FAILURE)
        }
    }
}

fn print_banner() {
    println!();
    println!("\x1b[36m╔══════════════════════════════════════════════════════════════╗\x1b[0m");
    println!("\x1b[36m║                    JSRECON v{:<8}                         ║\x1b[0m", env!("CARGO_PKG_VERSION"));
    println!("\x1b[36m║           JavaScript Route & Token Recon                     ║\x1b[0m");
    println!("\x1b[36m╚══════════════════════════════════════════════════════════════╝\x1b[0m");
    println!();
}
