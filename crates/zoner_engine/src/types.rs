use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type TimerId = u64;
pub type QueryId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadDocumentRequest {
    pub document_type: String,
    pub document_info: String,
    pub upload_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryRequest {
    pub query: String,
    pub document_type: String,
    pub document_info: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoadedDocument {
    pub document_type: String,
    pub document_info: String,
    #[serde(default)]
    pub upload_path: String,
    pub processing_status: String,
    pub document_summary: String,
    #[serde(default)]
    pub key_sections: Vec<String>,
    pub total_pages: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueryAnswer {
    pub query: String,
    pub response: String,
    pub confidence_score: u32,
    #[serde(default)]
    pub relevant_sections: Vec<String>,
    #[serde(default)]
    pub citations: Vec<String>,
    #[serde(default)]
    pub regenerated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueTicket {
    pub message: String,
    pub ticket_id: String,
}

/// Outcome of the backend self-test endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionCheck {
    pub load_ok: bool,
    pub query_ok: bool,
}

impl ConnectionCheck {
    pub fn is_healthy(&self) -> bool {
        self.load_ok && self.query_ok
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Query,
    Regenerate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    TimerFired(TimerId),
    DocumentLoaded(Result<LoadedDocument, ApiError>),
    QueryCompleted {
        query_id: QueryId,
        kind: QueryKind,
        result: Result<QueryAnswer, ApiError>,
    },
    IssueReported(Result<IssueTicket, ApiError>),
    ConnectionChecked(Result<ConnectionCheck, ApiError>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    /// Body was not the JSON shape we expected.
    Decode,
    /// Backend answered with `status` other than `"success"`.
    Backend,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Backend => write!(f, "backend error"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
