use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use shared::{
    domain::{DatasetMap, ElementCatalog},
    error::ServiceErrorBody,
    protocol::{
        datasets_from_graphs, ElementTitlesResponse, GraphsResponse, UploadResponse,
        ELEMENT_TITLES_PATH, GRAPHS_PATH, UPLOAD_FILE_FIELD, UPLOAD_PATH,
    },
};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    error::{ConfigError, DataServiceError},
    types::{SubmitOutcome, UploadCandidate},
    DataService,
};

const CSV_MIME_TYPE: &str = "text/csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataServiceConfig {
    endpoint: String,
    request_timeout: Option<Duration>,
}

impl DataServiceConfig {
    pub fn new(endpoint: &str) -> Result<Self, ConfigError> {
        let trimmed = endpoint.trim();
        let parsed = Url::parse(trimmed).map_err(|e| ConfigError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        Ok(Self {
            endpoint: trimmed.trim_end_matches('/').to_string(),
            request_timeout: None,
        })
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }
}

pub struct HttpDataService {
    http: Client,
    config: DataServiceConfig,
}

impl HttpDataService {
    pub fn new(config: DataServiceConfig) -> Result<Self, DataServiceError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            config,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.endpoint)
    }
}

/// Turns a non-success response into [`DataServiceError::Rejected`], keeping
/// the service's `message` when the body carries one.
async fn reject_unless_success(response: Response) -> Result<Response, DataServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ServiceErrorBody>(&body)
        .ok()
        .and_then(|body| body.message);
    debug!(status = status.as_u16(), ?message, "data service rejected request");
    Err(DataServiceError::Rejected {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl DataService for HttpDataService {
    async fn submit(&self, candidate: &UploadCandidate) -> Result<SubmitOutcome, DataServiceError> {
        let bytes = tokio::fs::read(candidate.path())
            .await
            .map_err(|source| DataServiceError::ReadFile {
                path: candidate.path().to_path_buf(),
                source,
            })?;
        let size_bytes = bytes.len();
        let part = Part::bytes(bytes)
            .file_name(candidate.file_name().to_string())
            .mime_str(CSV_MIME_TYPE)?;
        let form = Form::new().part(UPLOAD_FILE_FIELD, part);

        let response = self
            .http
            .post(self.url(UPLOAD_PATH))
            .multipart(form)
            .send()
            .await?;
        let body: UploadResponse = reject_unless_success(response).await?.json().await?;
        let message = body.message.clone();
        let preview = body.into_preview_table()?;
        info!(
            file_name = candidate.file_name(),
            size_bytes,
            preview_rows = preview.len(),
            "data service accepted upload"
        );

        Ok(SubmitOutcome { preview, message })
    }

    async fn fetch_catalog(&self) -> Result<ElementCatalog, DataServiceError> {
        let response = self.http.get(self.url(ELEMENT_TITLES_PATH)).send().await?;
        let body: ElementTitlesResponse = reject_unless_success(response).await?.json().await?;
        Ok(body.into_catalog())
    }

    async fn fetch_datasets(&self) -> Result<DatasetMap, DataServiceError> {
        let response = self.http.get(self.url(GRAPHS_PATH)).send().await?;
        let body: GraphsResponse = reject_unless_success(response).await?.json().await?;
        let (datasets, rejected) = datasets_from_graphs(body);
        for err in &rejected {
            warn!(error = %err, "skipping malformed dataset entry");
        }
        Ok(datasets)
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
