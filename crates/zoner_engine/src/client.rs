use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use zoner_logging::{zoner_debug, zoner_warn};

use crate::{
    ApiError, ConnectionCheck, FailureKind, IssueTicket, LoadDocumentRequest, LoadedDocument,
    QueryAnswer, QueryRequest,
};

const LOAD_DOCUMENT_PATH: &str = "zoner/load-document";
const QUERY_PATH: &str = "zoner/query";
const REGENERATE_PATH: &str = "zoner/regenerate";
const REPORT_ISSUE_PATH: &str = "zoner/report-issue";
const SELF_TEST_PATH: &str = "test/zoner";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub api_base: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_response_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_response_bytes: 1024 * 1024,
        }
    }
}

/// The Zoner backend as seen by the client.
#[async_trait::async_trait]
pub trait ZonerApi: Send + Sync {
    async fn load_document(
        &self,
        request: &LoadDocumentRequest,
    ) -> Result<LoadedDocument, ApiError>;

    async fn query(&self, request: &QueryRequest) -> Result<QueryAnswer, ApiError>;

    async fn regenerate(&self, request: &QueryRequest) -> Result<QueryAnswer, ApiError>;

    async fn report_issue(&self) -> Result<IssueTicket, ApiError>;

    async fn check_connection(&self) -> Result<ConnectionCheck, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestZonerApi {
    settings: ClientSettings,
    base: Url,
    client: reqwest::Client,
}

impl ReqwestZonerApi {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let base = parse_base(&settings.api_base)?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            settings,
            base,
            client,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn post<B, T>(&self, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Send,
    {
        let url = self.endpoint(path)?;
        zoner_debug!("POST {}", url);
        let mut request = self
            .client
            .post(url)
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }
        let value = self.read_json(request).await?;
        decode(expect_success(value)?)
    }

    async fn read_json(&self, request: reqwest::RequestBuilder) -> Result<Value, ApiError> {
        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_response_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ApiError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(ApiError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        serde_json::from_slice(&bytes)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
    }
}

#[async_trait::async_trait]
impl ZonerApi for ReqwestZonerApi {
    async fn load_document(
        &self,
        request: &LoadDocumentRequest,
    ) -> Result<LoadedDocument, ApiError> {
        self.post(LOAD_DOCUMENT_PATH, Some(request)).await
    }

    async fn query(&self, request: &QueryRequest) -> Result<QueryAnswer, ApiError> {
        self.post(QUERY_PATH, Some(request)).await
    }

    async fn regenerate(&self, request: &QueryRequest) -> Result<QueryAnswer, ApiError> {
        self.post(REGENERATE_PATH, Some(request)).await
    }

    async fn report_issue(&self) -> Result<IssueTicket, ApiError> {
        self.post::<(), _>(REPORT_ISSUE_PATH, None).await
    }

    async fn check_connection(&self) -> Result<ConnectionCheck, ApiError> {
        let url = self.endpoint(SELF_TEST_PATH)?;
        zoner_debug!("GET {}", url);
        let request = self.client.get(url).header(ACCEPT, "application/json");
        let value = self.read_json(request).await?;
        Ok(ConnectionCheck {
            load_ok: is_success(value.get("load_test")),
            query_ok: is_success(value.get("query_test")),
        })
    }
}

/// Base URLs are treated as directories so relative endpoint paths append.
fn parse_base(raw: &str) -> Result<Url, ApiError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash)
        .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::new(
            FailureKind::InvalidUrl,
            format!("unsupported scheme {}", url.scheme()),
        ));
    }
    Ok(url)
}

fn is_success(value: Option<&Value>) -> bool {
    value
        .and_then(|v| v.get("status"))
        .and_then(Value::as_str)
        .is_some_and(|status| status == "success")
}

fn expect_success(value: Value) -> Result<Value, ApiError> {
    if is_success(Some(&value)) {
        return Ok(value);
    }
    let message = value
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("request failed")
        .to_string();
    zoner_warn!("backend reported failure: {}", message);
    Err(ApiError::new(FailureKind::Backend, message))
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
