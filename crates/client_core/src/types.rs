use std::path::{Path, PathBuf};

use shared::domain::PreviewTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    path: PathBuf,
    file_name: String,
}

impl UploadCandidate {
    /// Uses the last path component as the file name.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, file_name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn has_extension(&self, extension: &str) -> bool {
        self.file_name.ends_with(extension)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub preview: PreviewTable,
    pub message: Option<String>,
}
