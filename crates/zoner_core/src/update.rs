use crate::{DispatchOutcome, DocumentContext, DocumentStatus, Effect, Msg, QueryState, SkipReason};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: QueryState, msg: Msg) -> (QueryState, Vec<Effect>) {
    let mut effects = Vec::new();
    match msg {
        Msg::InputChanged(text) => {
            let has_text = !text.trim().is_empty();
            state.set_raw_text(text);
            if !has_text {
                cancel_pending(&mut state, &mut effects);
            } else if state.is_ready() {
                let delay = state.quiet_period();
                let (timer, superseded) = state.arm_timer();
                if let Some(old) = superseded {
                    effects.push(Effect::CancelTimer { timer: old });
                }
                effects.push(Effect::ScheduleTimer { timer, delay });
            }
        }
        Msg::SubmitKey { has_modifier } => {
            if !has_modifier {
                cancel_pending(&mut state, &mut effects);
                dispatch(&mut state, &mut effects);
            }
        }
        Msg::QuietPeriodElapsed(timer) => {
            // Expiry of a superseded timer that raced its cancellation.
            if state.pending_timer() == Some(timer) {
                state.take_pending_timer();
                dispatch(&mut state, &mut effects);
            }
        }
        Msg::DispatchNow => {
            cancel_pending(&mut state, &mut effects);
            dispatch(&mut state, &mut effects);
        }
        Msg::SetReady(ready) => {
            // A timer armed before the gate closed must not fire for text typed while closed.
            if !ready {
                cancel_pending(&mut state, &mut effects);
            }
            state.set_ready(ready);
        }
        Msg::Reset => {
            cancel_pending(&mut state, &mut effects);
            state.clear_session();
        }
        Msg::RegenerateClicked => regenerate(&mut state, &mut effects),
        Msg::LoadDocumentClicked(form) => {
            if *state.document_status() == DocumentStatus::Loading {
                return (state, effects);
            }
            match form.validate() {
                Ok(()) => {
                    state.begin_document_load(DocumentContext {
                        document_type: form.document_type.trim().to_owned(),
                        document_info: form.document_info.clone(),
                    });
                    effects.push(Effect::LoadDocument { form });
                }
                Err(error) => state.set_form_error(error),
            }
        }
        Msg::DocumentLoaded => {
            cancel_pending(&mut state, &mut effects);
            state.clear_session();
            state.complete_document_load();
            state.set_ready(true);
        }
        Msg::DocumentLoadFailed(message) => {
            cancel_pending(&mut state, &mut effects);
            state.fail_document_load(message);
            state.set_ready(false);
        }
        Msg::ReportIssueClicked => effects.push(Effect::ReportIssue),
    }

    (state, effects)
}

fn cancel_pending(state: &mut QueryState, effects: &mut Vec<Effect>) {
    if let Some(timer) = state.take_pending_timer() {
        effects.push(Effect::CancelTimer { timer });
    }
}

fn dispatch(state: &mut QueryState, effects: &mut Vec<Effect>) {
    if !state.is_ready() {
        state.record_outcome(DispatchOutcome::Skipped(SkipReason::NotReady));
        return;
    }
    let query = state.query_text().to_owned();
    if query.is_empty() {
        state.record_outcome(DispatchOutcome::Skipped(SkipReason::EmptyQuery));
        return;
    }

    let query_id = state.allocate_query_id();
    state.record_dispatch(query.clone());
    state.record_outcome(DispatchOutcome::Dispatched {
        query_id,
        query: query.clone(),
    });
    effects.push(Effect::IssueQuery {
        query_id,
        query,
        document: state.document().clone(),
    });
}

fn regenerate(state: &mut QueryState, effects: &mut Vec<Effect>) {
    if !state.is_ready() {
        state.record_outcome(DispatchOutcome::Skipped(SkipReason::NotReady));
        return;
    }
    let Some(query) = state.last_dispatched().map(ToOwned::to_owned) else {
        state.record_outcome(DispatchOutcome::Skipped(SkipReason::NoPreviousQuery));
        return;
    };

    let query_id = state.allocate_query_id();
    state.record_outcome(DispatchOutcome::Regenerated {
        query_id,
        query: query.clone(),
    });
    effects.push(Effect::IssueRegenerate {
        query_id,
        query,
        document: state.document().clone(),
    });
}
