use std::time::Duration;

use crate::{DocumentForm, QueryId, TimerId};

/// Document the queries are asked against.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentContext {
    pub document_type: String,
    pub document_info: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Arm a one-shot timer; its expiry comes back as `Msg::QuietPeriodElapsed`.
    ScheduleTimer { timer: TimerId, delay: Duration },
    CancelTimer { timer: TimerId },
    IssueQuery {
        query_id: QueryId,
        query: String,
        document: DocumentContext,
    },
    IssueRegenerate {
        query_id: QueryId,
        query: String,
        document: DocumentContext,
    },
    LoadDocument { form: DocumentForm },
    ReportIssue,
}
