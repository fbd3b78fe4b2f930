use async_trait::async_trait;
use shared::domain::{DatasetMap, ElementCatalog};

pub mod error;
pub mod projector;
pub mod selection;
pub mod transport;
pub mod types;
pub mod workflow;

pub use error::{ConfigError, DataServiceError, MetadataStage, WorkflowError};
pub use projector::{project, ChartPanel, ElementButton, PreviewView, ViewProjection};
pub use selection::SelectionState;
pub use transport::{DataServiceConfig, HttpDataService};
pub use types::{SubmitOutcome, UploadCandidate};
pub use workflow::{WorkflowController, WorkflowSnapshot, WorkflowStatus};

#[async_trait]
pub trait DataService: Send + Sync {
    async fn submit(&self, candidate: &UploadCandidate) -> Result<SubmitOutcome, DataServiceError>;
    async fn fetch_catalog(&self) -> Result<ElementCatalog, DataServiceError>;
    async fn fetch_datasets(&self) -> Result<DatasetMap, DataServiceError>;
}
