use std::sync::Once;

use pretty_assertions::assert_eq;
use zoner_core::{
    update, DispatchOutcome, DocumentContext, Effect, Msg, QueryState, SkipReason, QUIET_PERIOD,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(zoner_logging::initialize_for_tests);
}

fn ready_state() -> QueryState {
    let (mut state, _) = update(QueryState::new(), Msg::SetReady(true));
    state.consume_dirty();
    state
}

fn type_text(state: QueryState, text: &str) -> (QueryState, Vec<Effect>) {
    update(state, Msg::InputChanged(text.to_string()))
}

#[test]
fn input_arms_quiet_period_timer() {
    init_logging();
    let (mut state, effects) = type_text(ready_state(), "height limits");

    assert_eq!(
        effects,
        vec![Effect::ScheduleTimer {
            timer: 1,
            delay: QUIET_PERIOD,
        }]
    );
    assert_eq!(state.pending_timer(), Some(1));
    let view = state.view();
    assert_eq!(view.raw_text, "height limits");
    assert!(view.timer_pending);
    assert!(state.consume_dirty());
}

#[test]
fn second_input_supersedes_pending_timer() {
    init_logging();
    let (state, _) = type_text(ready_state(), "parking");
    let (state, effects) = type_text(state, "parking density");

    assert_eq!(
        effects,
        vec![
            Effect::CancelTimer { timer: 1 },
            Effect::ScheduleTimer {
                timer: 2,
                delay: QUIET_PERIOD,
            },
        ]
    );
    assert_eq!(state.pending_timer(), Some(2));
}

#[test]
fn custom_quiet_period_is_used() {
    init_logging();
    let state = QueryState::with_quiet_period(std::time::Duration::from_millis(750));
    let (state, _) = update(state, Msg::SetReady(true));
    let (_, effects) = type_text(state, "setback");

    assert_eq!(
        effects,
        vec![Effect::ScheduleTimer {
            timer: 1,
            delay: std::time::Duration::from_millis(750),
        }]
    );
}

#[test]
fn empty_input_cancels_without_dispatch() {
    init_logging();
    let (state, _) = type_text(ready_state(), "setback");
    let (state, effects) = type_text(state, "");

    assert_eq!(effects, vec![Effect::CancelTimer { timer: 1 }]);
    assert_eq!(state.pending_timer(), None);

    // Whitespace-only counts as empty and there is nothing left to cancel.
    let (state, effects) = type_text(state, "   \n");
    assert!(effects.is_empty());
    assert_eq!(state.pending_timer(), None);
}

#[test]
fn expiry_of_pending_timer_dispatches_trimmed_text() {
    init_logging();
    let (state, _) = type_text(ready_state(), "  commercial zones \n");
    let (state, effects) = update(state, Msg::QuietPeriodElapsed(1));

    assert_eq!(
        effects,
        vec![Effect::IssueQuery {
            query_id: 1,
            query: "commercial zones".to_string(),
            document: DocumentContext::default(),
        }]
    );
    assert_eq!(state.pending_timer(), None);
    assert_eq!(state.last_dispatched(), Some("commercial zones"));
    assert_eq!(
        state.view().last_outcome,
        Some(DispatchOutcome::Dispatched {
            query_id: 1,
            query: "commercial zones".to_string(),
        })
    );
}

#[test]
fn stale_timer_expiry_is_ignored() {
    init_logging();
    let (state, _) = type_text(ready_state(), "parking");
    let (state, _) = type_text(state, "parking rules");
    let (next, effects) = update(state.clone(), Msg::QuietPeriodElapsed(1));

    assert!(effects.is_empty());
    assert_eq!(next, state);
}

#[test]
fn submit_key_cancels_timer_and_dispatches() {
    init_logging();
    let (state, _) = type_text(ready_state(), "setback");
    let (state, effects) = update(state, Msg::SubmitKey { has_modifier: false });

    assert_eq!(
        effects,
        vec![
            Effect::CancelTimer { timer: 1 },
            Effect::IssueQuery {
                query_id: 1,
                query: "setback".to_string(),
                document: DocumentContext::default(),
            },
        ]
    );
    assert_eq!(state.pending_timer(), None);
}

#[test]
fn submit_key_with_empty_text_is_skipped() {
    init_logging();
    let (state, effects) = update(ready_state(), Msg::SubmitKey { has_modifier: false });

    assert!(effects.is_empty());
    assert_eq!(
        state.view().last_outcome,
        Some(DispatchOutcome::Skipped(SkipReason::EmptyQuery))
    );
}

#[test]
fn input_while_not_ready_records_text_only() {
    init_logging();
    let (state, effects) = type_text(QueryState::new(), "height");
    assert!(effects.is_empty());
    assert_eq!(state.view().raw_text, "height");
    assert_eq!(state.pending_timer(), None);

    let (state, effects) = update(state, Msg::SubmitKey { has_modifier: false });
    assert!(effects.is_empty());
    assert_eq!(
        state.view().last_outcome,
        Some(DispatchOutcome::Skipped(SkipReason::NotReady))
    );
}

#[test]
fn becoming_ready_does_not_dispatch() {
    init_logging();
    let (state, _) = type_text(QueryState::new(), "height");
    let (state, effects) = update(state, Msg::SetReady(true));

    assert!(effects.is_empty());
    assert!(state.is_ready());
    assert_eq!(state.pending_timer(), None);
    assert_eq!(state.last_dispatched(), None);
}

#[test]
fn closing_ready_gate_cancels_pending_timer() {
    init_logging();
    let (state, _) = type_text(ready_state(), "parking");
    let (state, effects) = update(state, Msg::SetReady(false));

    assert_eq!(effects, vec![Effect::CancelTimer { timer: 1 }]);
    assert_eq!(state.pending_timer(), None);

    let (state, effects) = update(state, Msg::QuietPeriodElapsed(1));
    assert!(effects.is_empty());
    assert_eq!(state.view().last_outcome, None);
}

#[test]
fn dispatch_now_bypasses_quiet_period() {
    init_logging();
    let (state, _) = type_text(ready_state(), "height");
    let (_, effects) = update(state, Msg::DispatchNow);

    assert_eq!(
        effects,
        vec![
            Effect::CancelTimer { timer: 1 },
            Effect::IssueQuery {
                query_id: 1,
                query: "height".to_string(),
                document: DocumentContext::default(),
            },
        ]
    );
}

#[test]
fn repeated_dispatches_are_not_deduplicated() {
    init_logging();
    let (state, _) = type_text(ready_state(), "height");
    let (state, first) = update(state, Msg::DispatchNow);
    let (_, second) = update(state, Msg::DispatchNow);

    let ids: Vec<_> = first
        .iter()
        .chain(second.iter())
        .filter_map(|effect| match effect {
            Effect::IssueQuery { query_id, .. } => Some(*query_id),
            _ => None,
        })
        .collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn regenerate_reuses_last_dispatched_query() {
    init_logging();
    let (state, _) = type_text(ready_state(), "parking");
    let (state, _) = update(state, Msg::SubmitKey { has_modifier: false });
    // Editing the draft does not change the regenerate target.
    let (state, _) = type_text(state, "something else");
    let (state, effects) = update(state, Msg::RegenerateClicked);

    assert_eq!(
        effects,
        vec![Effect::IssueRegenerate {
            query_id: 2,
            query: "parking".to_string(),
            document: DocumentContext::default(),
        }]
    );
    assert_eq!(
        state.view().last_outcome,
        Some(DispatchOutcome::Regenerated {
            query_id: 2,
            query: "parking".to_string(),
        })
    );
}

#[test]
fn regenerate_without_previous_query_is_skipped() {
    init_logging();
    let (state, effects) = update(ready_state(), Msg::RegenerateClicked);
    assert!(effects.is_empty());
    assert_eq!(
        state.view().last_outcome,
        Some(DispatchOutcome::Skipped(SkipReason::NoPreviousQuery))
    );

    let (state, effects) = update(QueryState::new(), Msg::RegenerateClicked);
    assert!(effects.is_empty());
    assert_eq!(
        state.view().last_outcome,
        Some(DispatchOutcome::Skipped(SkipReason::NotReady))
    );
}

#[test]
fn reset_clears_session_but_keeps_ready() {
    init_logging();
    let (state, _) = type_text(ready_state(), "parking");
    let (state, _) = update(state, Msg::DispatchNow);
    let (state, _) = type_text(state, "parking rules");
    let (mut state, effects) = update(state, Msg::Reset);

    assert_eq!(effects, vec![Effect::CancelTimer { timer: 2 }]);
    let view = state.view();
    assert_eq!(view.raw_text, "");
    assert_eq!(view.last_dispatched, None);
    assert!(!view.timer_pending);
    assert!(view.ready);
    assert!(state.consume_dirty());

    let (_, effects) = update(state, Msg::RegenerateClicked);
    assert!(effects.is_empty());
}

#[test]
fn report_issue_always_emits_effect() {
    init_logging();
    let (_, effects) = update(QueryState::new(), Msg::ReportIssueClicked);
    assert_eq!(effects, vec![Effect::ReportIssue]);
}
