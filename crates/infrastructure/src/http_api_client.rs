//! Shared HTTP plumbing for the access management REST adapters.

use std::time::Duration;

use reqwest::{Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use tilgang_core::{AppError, AppResult, BasePath};

const API_SEGMENTS: [&str; 3] = ["api", "accessmanagement", "v1"];

/// HTTP client bound to one backend origin.
///
/// Idempotent requests (`GET`, `PUT`, `DELETE`) are retried on transport
/// errors, `5xx` and `429` with a linear backoff. `POST` is sent exactly once.
#[derive(Clone)]
pub struct HttpApiClient {
    http_client: reqwest::Client,
    api_url: Url,
    max_attempts: u8,
    retry_backoff_ms: u64,
}

impl HttpApiClient {
    /// Creates a client for the backend at `api_url`.
    pub fn new(
        http_client: reqwest::Client,
        api_url: &str,
        max_attempts: u8,
        retry_backoff_ms: u64,
    ) -> AppResult<Self> {
        let api_url = Url::parse(api_url.trim()).map_err(|error| {
            AppError::Validation(format!("invalid API url '{api_url}': {error}"))
        })?;
        if api_url.cannot_be_a_base() {
            return Err(AppError::Validation(format!(
                "API url '{api_url}' cannot carry resource paths"
            )));
        }

        Ok(Self {
            http_client,
            api_url,
            max_attempts: max_attempts.max(1),
            retry_backoff_ms: retry_backoff_ms.max(50),
        })
    }

    /// Builds `{api_url}{base_path}/api/accessmanagement/v1/{segments}`.
    ///
    /// Every segment is percent-encoded, so ids can never inject path parts.
    pub fn endpoint(&self, base_path: &BasePath, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.api_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                AppError::Internal(format!("API url '{}' cannot be a base", self.api_url))
            })?;
            path.pop_if_empty();
            path.extend(base_path.prefix().split('/').filter(|part| !part.is_empty()));
            path.extend(API_SEGMENTS);
            path.extend(segments);
        }
        Ok(url)
    }

    /// Sends a `GET` and parses the JSON body.
    pub async fn get_json<T>(&self, url: Url) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self.send(Method::GET, &url, |builder| builder).await?;
        parse_json(&url, response).await
    }

    /// Sends a `PUT` with a JSON body and parses the JSON response.
    pub async fn put_json<B, T>(&self, url: Url, body: &B) -> AppResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .send(Method::PUT, &url, |builder| builder.json(body))
            .await?;
        parse_json(&url, response).await
    }

    /// Sends a `POST` with a JSON body, ignoring the response body.
    pub async fn post_json<B>(&self, url: Url, body: &B) -> AppResult<()>
    where
        B: Serialize + Sync,
    {
        self.send(Method::POST, &url, |builder| builder.json(body))
            .await
            .map(drop)
    }

    /// Sends a `DELETE`, ignoring the response body.
    pub async fn delete(&self, url: Url) -> AppResult<()> {
        self.send(Method::DELETE, &url, |builder| builder)
            .await
            .map(drop)
    }

    async fn send<F>(&self, method: Method, url: &Url, build: F) -> AppResult<Response>
    where
        F: Fn(reqwest::RequestBuilder) -> reqwest::RequestBuilder,
    {
        let max_attempts = if is_idempotent(&method) {
            self.max_attempts
        } else {
            1
        };
        let mut attempt = 0_u8;
        let mut last_error: Option<String> = None;

        while attempt < max_attempts {
            attempt = attempt.saturating_add(1);
            let builder = self.http_client.request(method.clone(), url.clone());
            let response = build(builder).send().await;

            match response {
                Ok(response) if response.status().is_success() => {
                    debug!(%method, url = %url, status = %response.status(), "request succeeded");
                    return Ok(response);
                }
                Ok(response) if is_transient(response.status()) => {
                    last_error = Some(format!(
                        "transient HTTP status {} for {method} {url}",
                        response.status()
                    ));
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "<response body unavailable>".to_owned());
                    return Err(error_for_status(status, &method, url, &body));
                }
                Err(error) => {
                    last_error = Some(format!("{method} {url} failed: {error}"));
                }
            }

            if attempt < max_attempts {
                warn!(
                    %method,
                    url = %url,
                    attempt,
                    error = last_error.as_deref().unwrap_or_default(),
                    "retrying request"
                );
                let delay = self.retry_backoff_ms.saturating_mul(u64::from(attempt));
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
        }

        Err(AppError::Transport(last_error.unwrap_or_else(|| {
            format!("{method} {url} exhausted retries")
        })))
    }
}

fn is_idempotent(method: &Method) -> bool {
    *method == Method::GET || *method == Method::PUT || *method == Method::DELETE
}

fn is_transient(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

/// Maps a non-success, non-transient status to the application error taxonomy.
fn error_for_status(status: StatusCode, method: &Method, url: &Url, body: &str) -> AppError {
    let message = format!("{method} {} returned {status}: {body}", url.path());
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            AppError::Validation(message)
        }
        StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
        StatusCode::FORBIDDEN => AppError::Forbidden(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::CONFLICT => AppError::Conflict(message),
        _ => AppError::Internal(message),
    }
}

async fn parse_json<T>(url: &Url, response: Response) -> AppResult<T>
where
    T: DeserializeOwned,
{
    let body = response.bytes().await.map_err(|error| {
        AppError::Transport(format!("failed to read response of {}: {error}", url.path()))
    })?;

    serde_json::from_slice(&body).map_err(|error| {
        AppError::MalformedResponse(format!(
            "unexpected response schema from {}: {error}",
            url.path()
        ))
    })
}
