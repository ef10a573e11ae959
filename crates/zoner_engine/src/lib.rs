//! Zoner engine: HTTP client, quiet-period timers and effect execution.
mod client;
mod engine;
mod timers;
mod types;

pub use client::{ClientSettings, ReqwestZonerApi, ZonerApi};
pub use engine::{EngineError, EngineEvents, EngineHandle};
pub use timers::QuietTimers;
pub use types::{
    ApiError, ConnectionCheck, EngineEvent, FailureKind, IssueTicket, LoadDocumentRequest,
    LoadedDocument, QueryAnswer, QueryId, QueryKind, QueryRequest, TimerId,
};
