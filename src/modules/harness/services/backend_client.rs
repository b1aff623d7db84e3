use crate::config::HarnessConfig;
use crate::core::{AppError, Result};
use crate::modules::conversion::models::ConversionResult;
use crate::modules::polling::{wait_until, PollOptions, PollOutcome, DEFAULT_POLL_INTERVAL};
use reqwest::{multipart, Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Job states after which no further transitions occur
pub const TERMINAL_STATUSES: [&str; 2] = ["completed", "failed"];

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JobStatus {
    #[serde(default)]
    pub id: Option<String>,
    pub status: String,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        TERMINAL_STATUSES.contains(&self.status.as_str())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreatedApiKey {
    pub id: String,
    pub name: String,
    pub key: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CurrentUser {
    pub email: String,
    #[serde(default)]
    pub authenticated: bool,
}

/// Status and decoded body of a call whose status the test asserts on
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

async fn into_api_response(response: Response) -> Result<ApiResponse> {
    let status = response.status();
    let text = response.text().await?;
    let body = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };
    Ok(ApiResponse { status, body })
}

/// HTTP client for the system under test and the mock conversion service
///
/// Every backend call carries the forwarded-identity headers the auth proxy
/// would normally inject.
#[derive(Clone)]
pub struct BackendClient {
    config: HarnessConfig,
    client: Client,
}

impl BackendClient {
    pub fn new(config: HarnessConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    fn api_request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.config.api_url, path))
            .header("X-Forwarded-Email", &self.config.test_user_email)
            .header("X-Forwarded-User", "test-user")
    }

    /// Send a backend request without asserting on the status
    pub async fn api_call(&self, method: Method, path: &str, body: Option<&Value>) -> Result<ApiResponse> {
        let mut request = self.api_request(method, path);
        if let Some(body) = body {
            request = request.json(body);
        }
        into_api_response(request.send().await?).await
    }

    /// GET /health on the backend
    pub async fn health(&self) -> Result<ApiResponse> {
        self.api_call(Method::GET, "/health", None).await
    }

    /// GET /api/v1/me
    pub async fn me(&self) -> Result<CurrentUser> {
        let response = self.api_request(Method::GET, "/api/v1/me").send().await?;
        expect_status(&response, "/api/v1/me", StatusCode::OK)?;
        Ok(response.json().await?)
    }

    /// POST /api/v1/files/upload with one file part
    pub async fn upload_file(&self, file_name: &str, mime: &str, bytes: Vec<u8>) -> Result<ApiResponse> {
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .api_request(Method::POST, "/api/v1/files/upload")
            .multipart(form)
            .send()
            .await?;
        into_api_response(response).await
    }

    /// POST /api/v1/files/upload with no body at all
    pub async fn upload_without_file(&self) -> Result<ApiResponse> {
        self.api_call(Method::POST, "/api/v1/files/upload", None).await
    }

    /// GET /api/v1/files/{id}/status
    pub async fn file_status(&self, job_id: &str) -> Result<JobStatus> {
        let endpoint = format!("/api/v1/files/{}/status", job_id);
        let response = self.api_request(Method::GET, &endpoint).send().await?;
        expect_status(&response, &endpoint, StatusCode::OK)?;
        Ok(response.json().await?)
    }

    /// POST /api/v1/api-keys, expecting 201 `{id, name, key}`
    pub async fn create_api_key(&self, name: &str) -> Result<CreatedApiKey> {
        let response = self
            .api_request(Method::POST, "/api/v1/api-keys")
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await?;
        expect_status(&response, "/api/v1/api-keys", StatusCode::CREATED)?;
        Ok(response.json().await?)
    }

    /// DELETE /api/v1/api-keys/{id}
    pub async fn delete_api_key(&self, key_id: &str) -> Result<ApiResponse> {
        let path = format!("/api/v1/api-keys/{}", key_id);
        self.api_call(Method::DELETE, &path, None).await
    }

    /// GET / on the frontend, returning the page body
    pub async fn frontend_index(&self) -> Result<String> {
        let response = self
            .client
            .get(format!("{}/", self.config.base_url))
            .send()
            .await?;
        expect_status(&response, "/", StatusCode::OK)?;
        Ok(response.text().await?)
    }

    /// GET /health on the mock conversion service
    pub async fn mock_health(&self) -> Result<ApiResponse> {
        let response = self
            .client
            .get(format!("{}/health", self.config.mock_conversion_url))
            .send()
            .await?;
        into_api_response(response).await
    }

    /// POST a document straight to the mock conversion service
    pub async fn mock_convert(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        query: &[(&str, &str)],
    ) -> Result<ApiResponse> {
        let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/v1/convert/file", self.config.mock_conversion_url))
            .query(query)
            .multipart(form)
            .send()
            .await?;
        into_api_response(response).await
    }

    /// Decode a successful mock conversion body
    pub fn conversion_result(response: &ApiResponse) -> Result<ConversionResult> {
        Ok(serde_json::from_value(response.body.clone())?)
    }

    /// Poll the job status until it is `completed` or `failed`
    pub async fn wait_for_processing_complete(
        &self,
        job_id: &str,
        timeout: Duration,
    ) -> Result<PollOutcome> {
        let options = PollOptions::new(timeout, DEFAULT_POLL_INTERVAL).with_message(format!(
            "Processing job {} did not complete within {}ms",
            job_id,
            timeout.as_millis()
        ));

        wait_until(options, || async move {
            let status = self.file_status(job_id).await?;
            tracing::debug!(job_id = %job_id, status = %status.status, "Polled job status");
            Ok(status.is_terminal())
        })
        .await
    }
}

fn expect_status(response: &Response, endpoint: &str, expected: StatusCode) -> Result<()> {
    if response.status() == expected {
        Ok(())
    } else {
        Err(AppError::UnexpectedResponse {
            endpoint: endpoint.to_string(),
            status: response.status().as_u16(),
        })
    }
}
