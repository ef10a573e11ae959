use chrono::{DateTime, Local};
use zoner_core::{DispatchOutcome, DocumentForm, DocumentStatus, QueryId, QueryView, SkipReason};
use zoner_engine::{ApiError, ConnectionCheck, IssueTicket, LoadedDocument, QueryAnswer, QueryKind};

pub fn loaded_document(document: &LoadedDocument) -> String {
    let mut text = format!(
        "DOCUMENT LOADED\n\
         Type:    {}\n\
         Info:    {}\n\
         Pages:   {}\n\
         Status:  {}\n\n\
         Summary: {}\n",
        document.document_type,
        document.document_info,
        document.total_pages,
        document.processing_status,
        document.document_summary,
    );
    if !document.key_sections.is_empty() {
        text.push_str("\nKey sections:\n");
        text.push_str(&bullets(&document.key_sections));
    }
    text.push_str("\nYou can now ask questions about this document.");
    text
}

pub fn answer(
    query_id: QueryId,
    kind: QueryKind,
    answer: &QueryAnswer,
    superseded_by: Option<QueryId>,
    received_at: DateTime<Local>,
) -> String {
    let heading = match kind {
        QueryKind::Query => "ANALYSIS",
        QueryKind::Regenerate => "REGENERATED ANALYSIS",
    };
    let mut text = format!(
        "[#{query_id} {}] QUERY: {}\n",
        received_at.format("%H:%M:%S"),
        answer.query
    );
    if let Some(latest) = superseded_by {
        text.push_str(&format!("(late answer; #{latest} was sent after this one)\n"));
    }
    text.push_str(&format!(
        "\n{heading}:\n{}\n\nConfidence: {}%\n",
        answer.response, answer.confidence_score
    ));
    if !answer.relevant_sections.is_empty() {
        text.push_str("\nRelevant sections:\n");
        text.push_str(&bullets(&answer.relevant_sections));
    }
    if !answer.citations.is_empty() {
        text.push_str("\nCitations:\n");
        text.push_str(&bullets(&answer.citations));
    }
    text.trim_end().to_string()
}

pub fn query_failed(query_id: QueryId, kind: QueryKind, error: &ApiError) -> String {
    match kind {
        QueryKind::Query => format!("[#{query_id}] Error processing query: {error}"),
        QueryKind::Regenerate => format!("[#{query_id}] Error regenerating: {error}"),
    }
}

pub fn load_failed(error: &ApiError) -> String {
    format!("Failed to load document. Please try again.\nError: {error}")
}

pub fn ticket(ticket: &IssueTicket) -> String {
    format!("{} Ticket ID: {}", ticket.message, ticket.ticket_id)
}

pub fn report_failed(error: &ApiError) -> String {
    format!("Error reporting issue: {error}")
}

pub fn connection(check: &ConnectionCheck) -> String {
    if check.is_healthy() {
        "Backend connection test passed.".to_string()
    } else {
        format!(
            "Backend connection test failed (load: {}, query: {}).",
            pass_fail(check.load_ok),
            pass_fail(check.query_ok)
        )
    }
}

pub fn connection_failed(error: &ApiError) -> String {
    format!("Backend connection test failed: {error}")
}

/// Message for the outcome of an explicit send or regenerate.
pub fn outcome(outcome: &DispatchOutcome) -> String {
    match outcome {
        DispatchOutcome::Dispatched { query_id, .. } => {
            format!("[#{query_id}] Analyzing document and generating response...")
        }
        DispatchOutcome::Regenerated { query_id, .. } => {
            format!("[#{query_id}] Regenerating alternative response...")
        }
        DispatchOutcome::Skipped(SkipReason::NotReady) => {
            "Load a document before asking questions.".to_string()
        }
        DispatchOutcome::Skipped(SkipReason::EmptyQuery) => "Type a question first.".to_string(),
        DispatchOutcome::Skipped(SkipReason::NoPreviousQuery) => {
            "Please load a document and ask a question first.".to_string()
        }
    }
}

pub fn status(view: &QueryView, form: &DocumentForm) -> String {
    let document = match &view.document_status {
        DocumentStatus::NotLoaded => "not loaded".to_string(),
        DocumentStatus::Loading => "loading".to_string(),
        DocumentStatus::Loaded => format!(
            "loaded ({}: {})",
            view.document.document_type, view.document.document_info
        ),
        DocumentStatus::Failed(message) => format!("failed ({message})"),
    };
    let mut lines = vec![
        format!("Document: {document}"),
        format!(
            "Form: type={:?} info={:?} path={:?} terms={}",
            form.document_type,
            form.document_info,
            form.upload_path,
            if form.terms_accepted { "accepted" } else { "not accepted" }
        ),
        format!("Ready: {}", if view.ready { "yes" } else { "no" }),
        format!("Question: {:?}", view.raw_text),
        format!(
            "Auto-send: {}",
            if view.timer_pending { "pending" } else { "idle" }
        ),
    ];
    if let Some(last) = &view.last_dispatched {
        lines.push(format!("Last query: {last}"));
    }
    lines.join("\n")
}

fn bullets(items: &[String]) -> String {
    items.iter().map(|item| format!("  - {item}\n")).collect()
}

fn pass_fail(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "failed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use zoner_engine::FailureKind;

    fn sample_answer() -> QueryAnswer {
        QueryAnswer {
            query: "setback".to_string(),
            response: "Minimum setback is 6 meters.".to_string(),
            confidence_score: 92,
            relevant_sections: vec!["Section 7.1 - Development Standards".to_string()],
            citations: Vec::new(),
            regenerated: false,
        }
    }

    #[test]
    fn answer_lists_sections_and_skips_empty_citations() {
        let at = Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let text = answer(3, QueryKind::Query, &sample_answer(), None, at);

        assert_eq!(
            text,
            "[#3 09:30:00] QUERY: setback\n\n\
             ANALYSIS:\nMinimum setback is 6 meters.\n\n\
             Confidence: 92%\n\n\
             Relevant sections:\n  - Section 7.1 - Development Standards"
        );
    }

    #[test]
    fn late_answer_is_flagged() {
        let at = Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let text = answer(1, QueryKind::Regenerate, &sample_answer(), Some(2), at);
        assert!(text.contains("late answer; #2 was sent after this one"));
        assert!(text.contains("REGENERATED ANALYSIS:"));
    }

    #[test]
    fn failures_name_the_query() {
        let error = ApiError {
            kind: FailureKind::HttpStatus(502),
            message: "502 Bad Gateway".to_string(),
        };
        assert_eq!(
            query_failed(4, QueryKind::Query, &error),
            "[#4] Error processing query: http status 502: 502 Bad Gateway"
        );
    }

    #[test]
    fn skipped_outcomes_explain_themselves() {
        assert_eq!(
            outcome(&DispatchOutcome::Skipped(SkipReason::NotReady)),
            "Load a document before asking questions."
        );
    }
}
