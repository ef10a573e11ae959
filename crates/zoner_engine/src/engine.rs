use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use thiserror::Error;
use zoner_logging::{zoner_debug, zoner_info};

use crate::client::{ClientSettings, ReqwestZonerApi, ZonerApi};
use crate::timers::QuietTimers;
use crate::{ApiError, EngineEvent, LoadDocumentRequest, QueryId, QueryKind, QueryRequest, TimerId};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] io::Error),
    #[error("failed to set up http client: {0}")]
    Client(#[from] ApiError),
}

enum EngineCommand {
    ScheduleTimer { timer: TimerId, delay: Duration },
    CancelTimer { timer: TimerId },
    LoadDocument(LoadDocumentRequest),
    Query {
        query_id: QueryId,
        kind: QueryKind,
        request: QueryRequest,
    },
    ReportIssue,
    CheckConnection,
}

/// Sending half of the engine. Cheap to clone; the engine thread stops when
/// every handle is dropped.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

/// Receiving half of the engine: timer expiries and request results.
pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineEvents {
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<(Self, EngineEvents), EngineError> {
        let api = ReqwestZonerApi::new(settings)?;
        Self::with_api(Arc::new(api))
    }

    pub fn with_api(api: Arc<dyn ZonerApi>) -> Result<(Self, EngineEvents), EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::Builder::new()
            .name("zoner-engine".to_string())
            .spawn(move || {
                let mut timers = QuietTimers::new(runtime.handle().clone(), event_tx.clone());
                while let Ok(command) = cmd_rx.recv() {
                    match command {
                        EngineCommand::ScheduleTimer { timer, delay } => {
                            timers.schedule(timer, delay);
                        }
                        EngineCommand::CancelTimer { timer } => {
                            timers.cancel(timer);
                        }
                        command => {
                            let api = api.clone();
                            let event_tx = event_tx.clone();
                            runtime.spawn(async move {
                                handle_command(api.as_ref(), command, event_tx).await;
                            });
                        }
                    }
                }
                zoner_info!("engine command channel closed; shutting down");
                drop(timers);
            })?;

        Ok((Self { cmd_tx }, EngineEvents { event_rx }))
    }

    pub fn schedule_timer(&self, timer: TimerId, delay: Duration) {
        self.send(EngineCommand::ScheduleTimer { timer, delay });
    }

    pub fn cancel_timer(&self, timer: TimerId) {
        self.send(EngineCommand::CancelTimer { timer });
    }

    pub fn load_document(&self, request: LoadDocumentRequest) {
        self.send(EngineCommand::LoadDocument(request));
    }

    pub fn query(&self, query_id: QueryId, request: QueryRequest) {
        self.send(EngineCommand::Query {
            query_id,
            kind: QueryKind::Query,
            request,
        });
    }

    pub fn regenerate(&self, query_id: QueryId, request: QueryRequest) {
        self.send(EngineCommand::Query {
            query_id,
            kind: QueryKind::Regenerate,
            request,
        });
    }

    pub fn report_issue(&self) {
        self.send(EngineCommand::ReportIssue);
    }

    pub fn check_connection(&self) {
        self.send(EngineCommand::CheckConnection);
    }

    fn send(&self, command: EngineCommand) {
        let _ = self.cmd_tx.send(command);
    }
}

async fn handle_command(
    api: &dyn ZonerApi,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::LoadDocument(request) => {
            EngineEvent::DocumentLoaded(api.load_document(&request).await)
        }
        EngineCommand::Query {
            query_id,
            kind,
            request,
        } => {
            zoner_debug!("query {} ({:?}) in flight", query_id, kind);
            let result = match kind {
                QueryKind::Query => api.query(&request).await,
                QueryKind::Regenerate => api.regenerate(&request).await,
            };
            EngineEvent::QueryCompleted {
                query_id,
                kind,
                result,
            }
        }
        EngineCommand::ReportIssue => EngineEvent::IssueReported(api.report_issue().await),
        EngineCommand::CheckConnection => {
            EngineEvent::ConnectionChecked(api.check_connection().await)
        }
        // Timers never leave the engine thread.
        EngineCommand::ScheduleTimer { .. } | EngineCommand::CancelTimer { .. } => return,
    };
    let _ = event_tx.send(event);
}
