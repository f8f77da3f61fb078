use std::future::Future;
use log::{debug, error};
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::Serialize;
use shared::utils::{concat_path, CONTENT_TYPE_JSON};
use crate::error::TransportError;

/// Status and raw body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The calls the session layer makes against the auth backend.
/// Any reply with a status is `Ok`; `Err` means the request never completed.
pub trait AuthApi {
    fn base_url(&self) -> &str;

    fn post_json<B: Serialize + Sync>(&self, path: &str, body: &B) -> impl Future<Output=Result<HttpReply, TransportError>> + Send;

    fn options(&self, path: &str) -> impl Future<Output=Result<HttpReply, TransportError>> + Send;
}

pub struct HttpAuthApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthApi {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder, url: &str) -> Result<HttpReply, TransportError> {
        match request.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                // An unreadable body is reported as empty; the status still counts.
                let body = response.text().await.unwrap_or_else(|err| {
                    debug!("Failed to read response body from {url}: {err}");
                    String::new()
                });
                debug!("{url} responded with {status}");
                Ok(HttpReply { status, body })
            }
            Err(err) => {
                error!("Request to {url} failed: {err}");
                Err(TransportError::Connect { url: url.to_string(), reason: err.to_string() })
            }
        }
    }
}

impl AuthApi for HttpAuthApi {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<HttpReply, TransportError> {
        let url = concat_path(&self.base_url, path);
        let json = serde_json::to_string(body).map_err(|err| TransportError::Request(err.to_string()))?;
        debug!("POST {url}");
        let request = self.client.post(&url).header(CONTENT_TYPE, CONTENT_TYPE_JSON).body(json);
        self.send(request, &url).await
    }

    async fn options(&self, path: &str) -> Result<HttpReply, TransportError> {
        let url = concat_path(&self.base_url, path);
        debug!("OPTIONS {url}");
        let request = self.client.request(Method::OPTIONS, &url);
        self.send(request, &url).await
    }
}
