use std::{fmt, sync::Arc};

use shared::domain::{DatasetMap, ElementCatalog, ElementId, PreviewTable};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    error::{MetadataStage, WorkflowError},
    projector::{project, ViewProjection},
    selection::SelectionState,
    types::{SubmitOutcome, UploadCandidate},
    DataService,
};

pub const REQUIRED_EXTENSION: &str = ".csv";
pub const INVALID_FILE_MESSAGE: &str = "Only CSV files are allowed.";
pub const NO_FILE_SELECTED_MESSAGE: &str = "no file selected";
pub const UPLOAD_FAILED_MESSAGE: &str = "File upload failed.";
pub const UPLOAD_SUCCEEDED_NOTICE: &str = "File uploaded successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowStatus {
    #[default]
    Idle,
    ValidationFailed,
    Uploading,
    Ready,
    UploadFailed,
}

impl WorkflowStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowStatus::Idle => "idle",
            WorkflowStatus::ValidationFailed => "validating-failed",
            WorkflowStatus::Uploading => "uploading",
            WorkflowStatus::Ready => "ready",
            WorkflowStatus::UploadFailed => "upload-failed",
        }
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowSnapshot {
    pub status: WorkflowStatus,
    pub candidate: Option<UploadCandidate>,
    pub preview: Option<PreviewTable>,
    pub catalog: ElementCatalog,
    pub datasets: DatasetMap,
    pub selection: SelectionState,
    pub error: Option<String>,
    pub notice: Option<String>,
    /// Last non-fatal catalog/dataset failure of the most recent cycle.
    pub metadata_fault: Option<WorkflowError>,
}

impl WorkflowSnapshot {
    pub fn is_busy(&self) -> bool {
        self.status == WorkflowStatus::Uploading
    }

    fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.notice = None;
    }

    fn clear_derived(&mut self) {
        self.preview = None;
        self.catalog = ElementCatalog::default();
        self.datasets = DatasetMap::default();
        self.selection.retain_in(&self.catalog);
    }
}

pub struct WorkflowController {
    service: Arc<dyn DataService>,
    inner: Mutex<WorkflowSnapshot>,
}

impl WorkflowController {
    pub fn new(service: Arc<dyn DataService>) -> Arc<Self> {
        Arc::new(Self {
            service,
            inner: Mutex::new(WorkflowSnapshot::default()),
        })
    }

    pub async fn snapshot(&self) -> WorkflowSnapshot {
        self.inner.lock().await.clone()
    }

    pub async fn projection(&self) -> ViewProjection {
        project(&*self.inner.lock().await)
    }

    pub async fn select_file(&self, candidate: UploadCandidate) -> Result<(), WorkflowError> {
        let mut state = self.inner.lock().await;
        let busy = state.is_busy();

        if !candidate.has_extension(REQUIRED_EXTENSION) {
            warn!(
                file_name = candidate.file_name(),
                "workflow: rejected file with unsupported extension"
            );
            state.candidate = None;
            state.set_error(INVALID_FILE_MESSAGE);
            if !busy {
                state.status = WorkflowStatus::ValidationFailed;
            }
            return Err(WorkflowError::Validation {
                file_name: candidate.file_name().to_string(),
            });
        }

        debug!(file_name = candidate.file_name(), busy, "workflow: file selected");
        state.candidate = Some(candidate);
        state.error = None;
        state.notice = None;
        if !busy {
            state.status = WorkflowStatus::Idle;
        }
        Ok(())
    }

    /// Runs one full cycle for the pending candidate. Upload failures are
    /// terminal for the cycle; catalog/dataset failures leave the workflow
    /// `ready` with whatever could be fetched.
    pub async fn submit(&self) -> Result<(), WorkflowError> {
        let candidate = {
            let mut state = self.inner.lock().await;
            if state.is_busy() {
                return Err(WorkflowError::Busy);
            }
            let Some(candidate) = state.candidate.clone() else {
                state.set_error(NO_FILE_SELECTED_MESSAGE);
                return Err(WorkflowError::NoFileSelected);
            };
            state.status = WorkflowStatus::Uploading;
            state.error = None;
            state.notice = None;
            state.metadata_fault = None;
            candidate
        };

        info!(file_name = candidate.file_name(), "workflow: upload started");
        let SubmitOutcome {
            preview,
            message: service_message,
        } = match self.service.submit(&candidate).await {
            Ok(outcome) => outcome,
            Err(err) => {
                let message = err
                    .user_message()
                    .map(str::to_owned)
                    .unwrap_or_else(|| UPLOAD_FAILED_MESSAGE.to_string());
                warn!(
                    file_name = candidate.file_name(),
                    error = %err,
                    "workflow: upload failed"
                );
                let mut state = self.inner.lock().await;
                state.clear_derived();
                state.status = WorkflowStatus::UploadFailed;
                state.set_error(message.clone());
                return Err(WorkflowError::Upload { message });
            }
        };

        {
            let mut state = self.inner.lock().await;
            state.clear_derived();
            state.preview = Some(preview);
        }

        let mut fault = None;
        let catalog = match self.service.fetch_catalog().await {
            Ok(catalog) => catalog,
            Err(err) => {
                warn!(error = %err, "workflow: catalog fetch failed; continuing without elements");
                fault = Some(WorkflowError::MetadataFetch {
                    stage: MetadataStage::Catalog,
                    message: err.to_string(),
                });
                ElementCatalog::default()
            }
        };
        {
            let mut state = self.inner.lock().await;
            state.catalog = catalog.clone();
            state.selection.retain_in(&catalog);
        }

        let datasets = match self.service.fetch_datasets().await {
            Ok(mut datasets) => {
                let dropped = datasets.retain_catalog(&catalog);
                if dropped > 0 {
                    warn!(dropped, "workflow: discarded datasets missing from catalog");
                }
                datasets
            }
            Err(err) => {
                warn!(error = %err, "workflow: dataset fetch failed; continuing without charts");
                fault = Some(WorkflowError::MetadataFetch {
                    stage: MetadataStage::Datasets,
                    message: err.to_string(),
                });
                DatasetMap::default()
            }
        };

        let mut state = self.inner.lock().await;
        state.datasets = datasets;
        state.selection.clear();
        if state.candidate.as_ref() == Some(&candidate) {
            state.candidate = None;
        }
        // `error` was cleared when the cycle started; anything present now is a
        // rejected file pick made mid-flight and stays visible.
        state.status = WorkflowStatus::Ready;
        state.notice = Some(UPLOAD_SUCCEEDED_NOTICE.to_string());
        state.metadata_fault = fault;
        info!(
            file_name = candidate.file_name(),
            service_message = service_message.as_deref().unwrap_or_default(),
            preview_rows = state.preview.as_ref().map_or(0, PreviewTable::len),
            elements = state.catalog.len(),
            datasets = state.datasets.len(),
            "workflow: ready"
        );
        Ok(())
    }

    pub async fn reset(&self) -> Result<(), WorkflowError> {
        let mut state = self.inner.lock().await;
        if state.is_busy() {
            return Err(WorkflowError::Busy);
        }
        *state = WorkflowSnapshot::default();
        info!("workflow: reset");
        Ok(())
    }

    /// Toggles `element` and returns the resulting selection. Outside an
    /// upload, elements missing from the catalog are ignored; during one they
    /// are accepted and revalidated when the cycle completes.
    pub async fn toggle_element(&self, element: ElementId) -> Option<ElementId> {
        let mut state = self.inner.lock().await;
        if !state.is_busy() && !state.catalog.contains(&element) {
            debug!(%element, "workflow: ignoring toggle for unknown element");
            return state.selection.selected().cloned();
        }
        state.selection.toggle(element);
        state.selection.selected().cloned()
    }
}

#[cfg(test)]
#[path = "tests/workflow_tests.rs"]
mod tests;
