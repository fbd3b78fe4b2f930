use std::{path::PathBuf, sync::Arc};

use anyhow::bail;
use client_core::{UploadCandidate, WorkflowController, WorkflowError};
use shared::domain::ElementId;
use tracing::debug;

use crate::render::render;

pub const HELP_TEXT: &str = "\
commands:
  file <path>     pick a CSV file to upload
  upload          upload the picked file and fetch its elements
  toggle <id>     show or hide the chart for an element
  reset           clear the file, preview, elements and selection
  show            print the current view
  help            print this help
  quit            leave the session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    SelectFile { path: PathBuf },
    Upload,
    Toggle { element: ElementId },
    Reset,
    Show,
    Help,
    Quit,
}

impl SessionCommand {
    /// Parses one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> anyhow::Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match (word.to_ascii_lowercase().as_str(), rest) {
            ("file", "") => bail!("usage: file <path>"),
            ("file", path) => SessionCommand::SelectFile {
                path: PathBuf::from(path),
            },
            ("upload", _) => SessionCommand::Upload,
            ("toggle", "") => bail!("usage: toggle <element>"),
            ("toggle", element) => SessionCommand::Toggle {
                element: ElementId::from(element),
            },
            ("reset", _) => SessionCommand::Reset,
            ("show", _) => SessionCommand::Show,
            ("help" | "?", _) => SessionCommand::Help,
            ("quit" | "exit", _) => SessionCommand::Quit,
            (other, _) => bail!("unknown command '{other}'; type 'help'"),
        };
        Ok(Some(command))
    }

    pub fn name(&self) -> &'static str {
        match self {
            SessionCommand::SelectFile { .. } => "select_file",
            SessionCommand::Upload => "upload",
            SessionCommand::Toggle { .. } => "toggle",
            SessionCommand::Reset => "reset",
            SessionCommand::Show => "show",
            SessionCommand::Help => "help",
            SessionCommand::Quit => "quit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Applies `cmd` and writes what the user should see next into `status`.
/// Uploads run on a background task so the prompt stays responsive; their
/// outcome is printed when the cycle resolves.
pub async fn dispatch(
    controller: &Arc<WorkflowController>,
    cmd: SessionCommand,
    status: &mut String,
) -> Flow {
    debug!(command = cmd.name(), "dispatching session command");
    status.clear();

    match cmd {
        SessionCommand::SelectFile { path } => {
            // Validation failures are already folded into the view.
            let _ = controller.select_file(UploadCandidate::from_path(path)).await;
            *status = render(&controller.projection().await);
        }
        SessionCommand::Upload => {
            let snapshot = controller.snapshot().await;
            if snapshot.is_busy() {
                *status = busy_message().to_string();
            } else if snapshot.candidate.is_none() {
                let _ = controller.submit().await;
                *status = render(&controller.projection().await);
            } else {
                let controller = controller.clone();
                tokio::spawn(async move {
                    let outcome = controller.submit().await;
                    let view = render(&controller.projection().await);
                    match outcome {
                        Err(WorkflowError::Busy) => println!("{}", busy_message()),
                        _ => println!("\n{view}"),
                    }
                });
                *status = "Uploading...".to_string();
            }
        }
        SessionCommand::Toggle { element } => {
            controller.toggle_element(element).await;
            *status = render(&controller.projection().await);
        }
        SessionCommand::Reset => match controller.reset().await {
            Ok(()) => *status = render(&controller.projection().await),
            Err(_) => *status = busy_message().to_string(),
        },
        SessionCommand::Show => *status = render(&controller.projection().await),
        SessionCommand::Help => *status = HELP_TEXT.to_string(),
        SessionCommand::Quit => return Flow::Quit,
    }

    Flow::Continue
}

fn busy_message() -> &'static str {
    "An upload is in progress; wait for it to finish before uploading or resetting."
}
