use std::{
    io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Parse,
    Schema,
    Internal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("snapshot file '{}' was not found", path.display())]
    NotFound { path: PathBuf },
    #[error("snapshot file '{}' could not be read: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("snapshot file '{}' is not a JSON array of records: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    pub fn code(&self) -> ErrorCode {
        match self {
            LoadError::NotFound { .. } | LoadError::Unreadable { .. } => ErrorCode::NotFound,
            LoadError::Parse { .. } => ErrorCode::Parse,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            LoadError::NotFound { path }
            | LoadError::Unreadable { path, .. }
            | LoadError::Parse { path, .. } => path.as_path(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("missing required columns: {}", missing.join(", "))]
    Schema { missing: Vec<String> },
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("{0}")]
    Internal(String),
}

impl ReportError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ReportError::Schema { .. } => ErrorCode::Schema,
            ReportError::Load(error) => error.code(),
            ReportError::Internal(_) => ErrorCode::Internal,
        }
    }
}

impl From<LoadError> for ApiError {
    fn from(value: LoadError) -> Self {
        Self::new(value.code(), value.to_string())
    }
}

impl From<ReportError> for ApiError {
    fn from(value: ReportError) -> Self {
        Self::new(value.code(), value.to_string())
    }
}
