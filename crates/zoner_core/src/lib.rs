//! Zoner core: pure query-dispatch state machine and view-model helpers.
mod dispatcher;
mod effect;
mod form;
mod msg;
mod state;
mod update;
mod view_model;

pub use dispatcher::{Dispatcher, RequestSink, TimerScheduler};
pub use effect::{DocumentContext, Effect};
pub use form::{DocumentForm, FormError, PLACEHOLDER_DOCUMENT_TYPE};
pub use msg::Msg;
pub use state::{
    DispatchOutcome, DocumentStatus, QueryId, QueryState, SkipReason, TimerId, QUIET_PERIOD,
};
pub use update::update;
pub use view_model::QueryView;
