use std::time::Duration;

use zoner_core::{DocumentContext, Effect, RequestSink, TimerId, TimerScheduler};
use zoner_engine::{EngineHandle, LoadDocumentRequest, QueryRequest};
use zoner_logging::{zoner_debug, zoner_info, zoner_warn};

/// Quiet-period timers backed by the engine runtime.
pub struct EngineTimers {
    engine: EngineHandle,
}

impl EngineTimers {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }
}

impl TimerScheduler for EngineTimers {
    fn schedule(&mut self, timer: TimerId, delay: Duration) {
        zoner_debug!("ScheduleTimer timer={} delay_ms={}", timer, delay.as_millis());
        self.engine.schedule_timer(timer, delay);
    }

    fn cancel(&mut self, timer: TimerId) {
        zoner_debug!("CancelTimer timer={}", timer);
        self.engine.cancel_timer(timer);
    }
}

/// Forwards request effects to the engine's HTTP client.
pub struct EngineRequests {
    engine: EngineHandle,
}

impl EngineRequests {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }
}

impl RequestSink for EngineRequests {
    fn issue(&mut self, effect: Effect) {
        match effect {
            Effect::IssueQuery {
                query_id,
                query,
                document,
            } => {
                zoner_info!("IssueQuery query_id={} query_len={}", query_id, query.len());
                self.engine.query(query_id, query_request(query, document));
            }
            Effect::IssueRegenerate {
                query_id,
                query,
                document,
            } => {
                zoner_info!("IssueRegenerate query_id={}", query_id);
                self.engine.regenerate(query_id, query_request(query, document));
            }
            Effect::LoadDocument { form } => {
                zoner_info!(
                    "LoadDocument type={} upload_path={}",
                    form.document_type,
                    form.upload_path
                );
                self.engine.load_document(LoadDocumentRequest {
                    document_type: form.document_type.trim().to_string(),
                    document_info: form.document_info,
                    upload_path: form.upload_path,
                });
            }
            Effect::ReportIssue => {
                zoner_info!("ReportIssue");
                self.engine.report_issue();
            }
            Effect::ScheduleTimer { timer, .. } | Effect::CancelTimer { timer } => {
                zoner_warn!("timer effect {} reached the request sink; ignored", timer);
            }
        }
    }
}

fn query_request(query: String, document: DocumentContext) -> QueryRequest {
    QueryRequest {
        query,
        document_type: document.document_type,
        document_info: document.document_info,
    }
}
