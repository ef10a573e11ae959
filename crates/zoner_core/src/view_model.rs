use crate::{DispatchOutcome, DocumentContext, DocumentStatus, FormError};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryView {
    pub raw_text: String,
    pub ready: bool,
    pub timer_pending: bool,
    pub last_dispatched: Option<String>,
    pub last_outcome: Option<DispatchOutcome>,
    pub document_status: DocumentStatus,
    pub document: DocumentContext,
    pub form_error: Option<FormError>,
    pub dirty: bool,
}
