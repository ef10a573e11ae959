use crate::{DocumentForm, TimerId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The query box now holds this text.
    InputChanged(String),
    /// Enter was pressed; with a modifier it inserts a newline instead of submitting.
    SubmitKey { has_modifier: bool },
    /// A timer armed by `Effect::ScheduleTimer` expired.
    QuietPeriodElapsed(TimerId),
    /// Forward the current text right away, bypassing the quiet period.
    DispatchNow,
    /// External ready gate.
    SetReady(bool),
    /// Drop the draft, the pending timer and the regenerate target.
    Reset,
    /// Ask for an alternative answer to the last dispatched query.
    RegenerateClicked,
    /// User submitted the document load form.
    LoadDocumentClicked(DocumentForm),
    /// Backend accepted the document.
    DocumentLoaded,
    /// Backend or network rejected the document load.
    DocumentLoadFailed(String),
    ReportIssueClicked,
}
