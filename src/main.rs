use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod busy;
mod cli;
mod config;
mod deliver;
mod error;
mod glob;
mod report;
mod resolve;
mod tmux;

use cli::Args;
use config::Config;
use error::QueueError;
use report::PreviewEntry;
use tmux::{is_agent_window, PsInspector, TmuxClient};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging; stdout is reserved for reports
    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = config::load()?;
    let mux = TmuxClient::with_binary(&config.tmux);
    let inspector = PsInspector::new();
    let message = args.message();

    let resolution = resolve::resolve(
        &mux,
        &inspector,
        &config.agent,
        args.session(),
        &args.filters(),
    )
    .await?;

    if resolution.targets.is_empty() {
        eprintln!("No windows to send message to");
        return Ok(());
    }

    if args.dry_run {
        return preview(&args, &config, &inspector, &resolution, &message).await;
    }

    let report = deliver::deliver(
        &mux,
        &inspector,
        &config.agent,
        &resolution.session,
        &resolution.targets,
        &message,
        &args.delivery(config.retry),
        |window, outcome| {
            if let Some(notice) = report::notice(window, outcome) {
                eprintln!("{notice}");
            }
        },
    )
    .await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report::summary(&report));
    }

    if !report.is_success() {
        return Err(QueueError::Delivery(report.failed).into());
    }
    Ok(())
}

async fn preview(
    args: &Args,
    config: &Config,
    inspector: &PsInspector,
    resolution: &resolve::Resolution,
    message: &str,
) -> Result<()> {
    let mut entries = Vec::with_capacity(resolution.targets.len());
    for window in &resolution.targets {
        entries.push(PreviewEntry {
            window: window.clone(),
            agent: is_agent_window(window, &config.agent, inspector).await,
        });
    }

    if args.json {
        println!("{}", report::dry_run_json(&resolution.session, &entries, message)?);
    } else {
        println!("{}", report::dry_run(&resolution.session, &entries, message));
    }
    Ok(())
}
