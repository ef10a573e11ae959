use std::time::Duration;

use crate::{update, DocumentForm, Effect, Msg, QueryState, QueryView, TimerId};

/// Arms and cancels the one-shot timers requested by the state machine.
///
/// An expired timer must be reported back through
/// [`Dispatcher::on_quiet_period_elapsed`] with the same id.
pub trait TimerScheduler {
    fn schedule(&mut self, timer: TimerId, delay: Duration);
    fn cancel(&mut self, timer: TimerId);
}

/// Receives every non-timer effect: queries, regenerations, document loads and issue reports.
pub trait RequestSink {
    fn issue(&mut self, effect: Effect);
}

/// Debounced query dispatcher: owns the [`QueryState`] and routes the effects
/// produced by [`update`] to the injected capabilities.
#[derive(Debug)]
pub struct Dispatcher<T, R> {
    state: QueryState,
    timers: T,
    requests: R,
}

impl<T: TimerScheduler, R: RequestSink> Dispatcher<T, R> {
    pub fn new(timers: T, requests: R) -> Self {
        Self::with_state(QueryState::new(), timers, requests)
    }

    pub fn with_state(state: QueryState, timers: T, requests: R) -> Self {
        Self {
            state,
            timers,
            requests,
        }
    }

    /// Applies one message and executes the resulting effects in order.
    pub fn handle(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        for effect in effects {
            match effect {
                Effect::ScheduleTimer { timer, delay } => self.timers.schedule(timer, delay),
                Effect::CancelTimer { timer } => self.timers.cancel(timer),
                other => self.requests.issue(other),
            }
        }
    }

    pub fn on_input_changed(&mut self, text: impl Into<String>) {
        self.handle(Msg::InputChanged(text.into()));
    }

    pub fn on_submit_key(&mut self, has_modifier: bool) {
        self.handle(Msg::SubmitKey { has_modifier });
    }

    pub fn on_quiet_period_elapsed(&mut self, timer: TimerId) {
        self.handle(Msg::QuietPeriodElapsed(timer));
    }

    pub fn dispatch(&mut self) {
        self.handle(Msg::DispatchNow);
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.handle(Msg::SetReady(ready));
    }

    pub fn reset(&mut self) {
        self.handle(Msg::Reset);
    }

    pub fn regenerate(&mut self) {
        self.handle(Msg::RegenerateClicked);
    }

    pub fn load_document(&mut self, form: DocumentForm) {
        self.handle(Msg::LoadDocumentClicked(form));
    }

    pub fn report_issue(&mut self) {
        self.handle(Msg::ReportIssueClicked);
    }

    pub fn view(&self) -> QueryView {
        self.state.view()
    }

    pub fn consume_dirty(&mut self) -> bool {
        self.state.consume_dirty()
    }

    pub fn requests(&self) -> &R {
        &self.requests
    }
}
