use async_trait::async_trait;
use oracle_consensus::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use oracle_types::OracleError;
use reqwest::Client;
use std::time::Duration;

/// [`HttpClient`] backed by reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    pub fn new(timeout: Duration) -> Result<Self, OracleError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OracleError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, OracleError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| upstream_error(&request.url, e, "request failed"))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| upstream_error(&request.url, e, "failed to read body"))?
            .to_vec();

        tracing::trace!(url = %request.url, status, bytes = body.len(), "HTTP response");
        Ok(HttpResponse { status, body })
    }
}

fn upstream_error(url: &str, err: reqwest::Error, context: &str) -> OracleError {
    if err.is_timeout() {
        OracleError::timeout(url)
    } else {
        OracleError::upstream(url, format!("{context}: {err}"))
    }
}
