use std::time::Duration;

use crate::effect::DocumentContext;
use crate::view_model::QueryView;
use crate::FormError;

pub type TimerId = u64;
pub type QueryId = u64;

/// Quiet period after the last input change before an automatic dispatch.
pub const QUIET_PERIOD: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DocumentStatus {
    #[default]
    NotLoaded,
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotReady,
    EmptyQuery,
    NoPreviousQuery,
}

/// Result of the most recent attempt to forward a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Dispatched { query_id: QueryId, query: String },
    Regenerated { query_id: QueryId, query: String },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    raw_text: String,
    ready: bool,
    pending_timer: Option<TimerId>,
    next_timer_id: TimerId,
    next_query_id: QueryId,
    quiet_period: Duration,
    last_dispatched: Option<String>,
    last_outcome: Option<DispatchOutcome>,
    document_status: DocumentStatus,
    /// Context submitted with the load currently in flight.
    pending_document: Option<DocumentContext>,
    document: DocumentContext,
    form_error: Option<FormError>,
    dirty: bool,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::with_quiet_period(QUIET_PERIOD)
    }
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quiet_period(quiet_period: Duration) -> Self {
        Self {
            raw_text: String::new(),
            ready: false,
            pending_timer: None,
            next_timer_id: 1,
            next_query_id: 1,
            quiet_period,
            last_dispatched: None,
            last_outcome: None,
            document_status: DocumentStatus::NotLoaded,
            pending_document: None,
            document: DocumentContext::default(),
            form_error: None,
            dirty: false,
        }
    }

    pub fn view(&self) -> QueryView {
        QueryView {
            raw_text: self.raw_text.clone(),
            ready: self.ready,
            timer_pending: self.pending_timer.is_some(),
            last_dispatched: self.last_dispatched.clone(),
            last_outcome: self.last_outcome.clone(),
            document_status: self.document_status.clone(),
            document: self.document.clone(),
            form_error: self.form_error,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything visible changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn pending_timer(&self) -> Option<TimerId> {
        self.pending_timer
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    pub fn last_dispatched(&self) -> Option<&str> {
        self.last_dispatched.as_deref()
    }

    pub(crate) fn query_text(&self) -> &str {
        self.raw_text.trim()
    }

    pub(crate) fn document(&self) -> &DocumentContext {
        &self.document
    }

    pub(crate) fn document_status(&self) -> &DocumentStatus {
        &self.document_status
    }

    pub(crate) fn set_raw_text(&mut self, text: String) {
        if self.raw_text != text {
            self.raw_text = text;
            self.dirty = true;
        }
    }

    pub(crate) fn set_ready(&mut self, ready: bool) {
        if self.ready != ready {
            self.ready = ready;
            self.dirty = true;
        }
    }

    /// Replaces the pending timer with a fresh id and returns `(new, superseded)`.
    pub(crate) fn arm_timer(&mut self) -> (TimerId, Option<TimerId>) {
        let timer = self.next_timer_id;
        self.next_timer_id += 1;
        let superseded = self.pending_timer.replace(timer);
        self.dirty = true;
        (timer, superseded)
    }

    pub(crate) fn take_pending_timer(&mut self) -> Option<TimerId> {
        let taken = self.pending_timer.take();
        if taken.is_some() {
            self.dirty = true;
        }
        taken
    }

    pub(crate) fn allocate_query_id(&mut self) -> QueryId {
        let id = self.next_query_id;
        self.next_query_id += 1;
        id
    }

    pub(crate) fn record_dispatch(&mut self, query: String) {
        self.last_dispatched = Some(query);
        self.dirty = true;
    }

    pub(crate) fn record_outcome(&mut self, outcome: DispatchOutcome) {
        self.last_outcome = Some(outcome);
        self.dirty = true;
    }

    /// Clears the draft and the regenerate target; `ready` is left untouched.
    pub(crate) fn clear_session(&mut self) {
        self.raw_text.clear();
        self.last_dispatched = None;
        self.last_outcome = None;
        self.dirty = true;
    }

    pub(crate) fn begin_document_load(&mut self, context: DocumentContext) {
        self.document_status = DocumentStatus::Loading;
        self.pending_document = Some(context);
        self.form_error = None;
        self.dirty = true;
    }

    pub(crate) fn complete_document_load(&mut self) {
        if let Some(context) = self.pending_document.take() {
            self.document = context;
        }
        self.document_status = DocumentStatus::Loaded;
        self.dirty = true;
    }

    pub(crate) fn fail_document_load(&mut self, message: String) {
        self.pending_document = None;
        self.document_status = DocumentStatus::Failed(message);
        self.dirty = true;
    }

    pub(crate) fn set_form_error(&mut self, error: FormError) {
        self.form_error = Some(error);
        self.dirty = true;
    }
}
