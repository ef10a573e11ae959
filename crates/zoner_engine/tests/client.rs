use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zoner_engine::{
    ClientSettings, FailureKind, LoadDocumentRequest, QueryRequest, ReqwestZonerApi, ZonerApi,
};

fn api_for(server: &MockServer) -> ReqwestZonerApi {
    ReqwestZonerApi::new(ClientSettings {
        api_base: server.uri(),
        ..ClientSettings::default()
    })
    .expect("client")
}

fn query_request(query: &str) -> QueryRequest {
    QueryRequest {
        query: query.to_string(),
        document_type: "Zoning By-law".to_string(),
        document_info: "Bylaw 569-2013".to_string(),
    }
}

fn answer_body(query: &str) -> serde_json::Value {
    json!({
        "query": query,
        "response": "Minimum setback requirements are 6 meters from the front property line.",
        "confidence_score": 91,
        "relevant_sections": ["Section 4.2 - Zoning Classifications"],
        "citations": ["Zoning Bylaw 2023-045, Article 7"],
        "status": "success"
    })
}

#[tokio::test]
async fn load_document_posts_form_and_decodes_summary() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/zoner/load-document"))
        .and(body_json(json!({
            "document_type": "Zoning By-law",
            "document_info": "Bylaw 569-2013",
            "upload_path": "sample-bylaw.pdf"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "document_type": "Zoning By-law",
            "document_info": "Bylaw 569-2013",
            "upload_path": "sample-bylaw.pdf",
            "processing_status": "loaded",
            "document_summary": "Successfully loaded Zoning By-law document.",
            "key_sections": ["Height Restrictions", "Setback Requirements"],
            "total_pages": 42,
            "status": "success"
        })))
        .mount(&server)
        .await;

    let loaded = api_for(&server)
        .load_document(&LoadDocumentRequest {
            document_type: "Zoning By-law".to_string(),
            document_info: "Bylaw 569-2013".to_string(),
            upload_path: "sample-bylaw.pdf".to_string(),
        })
        .await
        .expect("load ok");

    assert_eq!(loaded.processing_status, "loaded");
    assert_eq!(loaded.total_pages, 42);
    assert_eq!(
        loaded.key_sections,
        vec!["Height Restrictions", "Setback Requirements"]
    );
}

#[tokio::test]
async fn query_returns_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/zoner/query"))
        .and(body_json(json!({
            "query": "setback",
            "document_type": "Zoning By-law",
            "document_info": "Bylaw 569-2013"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(answer_body("setback")))
        .mount(&server)
        .await;

    let answer = api_for(&server)
        .query(&query_request("setback"))
        .await
        .expect("query ok");

    assert_eq!(answer.query, "setback");
    assert_eq!(answer.confidence_score, 91);
    assert_eq!(answer.citations, vec!["Zoning Bylaw 2023-045, Article 7"]);
    assert!(!answer.regenerated);
}

#[tokio::test]
async fn regenerate_hits_its_own_endpoint() {
    let server = MockServer::start().await;
    let mut body = answer_body("parking");
    body["regenerated"] = json!(true);
    Mock::given(method("POST"))
        .and(path("/zoner/regenerate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let answer = api_for(&server)
        .regenerate(&query_request("parking"))
        .await
        .expect("regenerate ok");
    assert!(answer.regenerated);
}

#[tokio::test]
async fn report_issue_returns_ticket() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/zoner/report-issue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Issue reported successfully",
            "ticket_id": "ZONER-4821",
            "status": "success"
        })))
        .mount(&server)
        .await;

    let ticket = api_for(&server).report_issue().await.expect("report ok");
    assert_eq!(ticket.ticket_id, "ZONER-4821");
}

#[tokio::test]
async fn backend_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/zoner/query"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"error": "model unavailable", "status": "error"})),
        )
        .mount(&server)
        .await;

    let err = api_for(&server)
        .query(&query_request("height"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Backend);
    assert_eq!(err.message, "model unavailable");
}

#[tokio::test]
async fn http_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/zoner/query"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .query(&query_request("height"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
}

#[tokio::test]
async fn malformed_body_is_a_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/zoner/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .query(&query_request("height"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn slow_backend_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/zoner/query"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(answer_body("height")),
        )
        .mount(&server)
        .await;

    let api = ReqwestZonerApi::new(ClientSettings {
        api_base: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..ClientSettings::default()
    })
    .expect("client");

    let err = api.query(&query_request("height")).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn oversized_response_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/zoner/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(answer_body("height")))
        .mount(&server)
        .await;

    let api = ReqwestZonerApi::new(ClientSettings {
        api_base: server.uri(),
        max_response_bytes: 16,
        ..ClientSettings::default()
    })
    .expect("client");

    let err = api.query(&query_request("height")).await.unwrap_err();
    assert!(matches!(
        err.kind,
        FailureKind::TooLarge { max_bytes: 16, .. }
    ));
}

#[tokio::test]
async fn connection_check_reads_both_self_tests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/test/zoner"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "load_test": {"status": "success"},
            "query_test": {"error": "boom", "status": "error"}
        })))
        .mount(&server)
        .await;

    let check = api_for(&server).check_connection().await.expect("check ok");
    assert!(check.load_ok);
    assert!(!check.query_ok);
    assert!(!check.is_healthy());
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = ReqwestZonerApi::new(ClientSettings {
        api_base: "not a url".to_string(),
        ..ClientSettings::default()
    })
    .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
