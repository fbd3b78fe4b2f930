use std::{path::PathBuf, sync::Arc};

mod commands;
mod config;
mod render;

use anyhow::{bail, Context, Result};
use clap::Parser;
use client_core::{HttpDataService, UploadCandidate, WorkflowController, WorkflowError};
use shared::domain::ElementId;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    commands::{dispatch, Flow, SessionCommand, HELP_TEXT},
    render::render,
};

/// Upload a CSV file to the data service and browse its element series.
#[derive(Parser, Debug)]
struct Args {
    /// Base URL of the data service; overrides config file and environment.
    #[arg(long)]
    endpoint: Option<String>,
    /// Config file to read instead of ./series_browser.toml.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Element to chart after a one-shot upload.
    #[arg(long, requires = "file")]
    select: Option<String>,
    /// Upload this file, print the view and exit. Starts an interactive
    /// session when omitted.
    file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings(args.config.as_deref())?;
    if let Some(endpoint) = args.endpoint {
        settings.endpoint = endpoint;
    }
    let service_config = settings
        .data_service_config()
        .context("data service endpoint is not usable")?;
    info!(endpoint = service_config.endpoint(), "using data service");
    let service = HttpDataService::new(service_config).context("failed to build HTTP client")?;
    let controller = WorkflowController::new(Arc::new(service));

    match args.file {
        Some(file) => run_once(&controller, file, args.select).await,
        None => run_session(controller).await,
    }
}

async fn run_once(
    controller: &Arc<WorkflowController>,
    file: PathBuf,
    select: Option<String>,
) -> Result<()> {
    let selected = controller.select_file(UploadCandidate::from_path(file)).await;
    let submitted = match selected {
        Ok(()) => controller.submit().await,
        Err(err) => Err(err),
    };
    if let Some(element) = select {
        controller.toggle_element(ElementId::from(element)).await;
    }
    println!("{}", render(&controller.projection().await));

    match submitted {
        Ok(()) => Ok(()),
        Err(WorkflowError::Upload { message }) => bail!("upload failed: {message}"),
        Err(err) => Err(err.into()),
    }
}

async fn run_session(controller: Arc<WorkflowController>) -> Result<()> {
    println!("{HELP_TEXT}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut status = String::new();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let cmd = match SessionCommand::parse(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        if dispatch(&controller, cmd, &mut status).await == Flow::Quit {
            break;
        }
        if !status.is_empty() {
            println!("{status}");
        }
    }

    Ok(())
}
