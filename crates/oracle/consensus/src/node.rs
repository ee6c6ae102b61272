//! Per-node execution context

use crate::ConsensusValue;
use async_trait::async_trait;
use futures::future::BoxFuture;
use oracle_types::OracleError;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn indexed(index: usize) -> Self {
        Self(format!("node-{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Outbound request issued by a node task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post_json(url: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: Some(body),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Transport a node uses for every outbound call.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, OracleError>;
}

/// Identity and transport handed to a node task.
#[derive(Clone)]
pub struct NodeContext {
    id: NodeId,
    http: Arc<dyn HttpClient>,
}

impl NodeContext {
    pub fn new(id: NodeId, http: Arc<dyn HttpClient>) -> Self {
        Self { id, http }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn http(&self) -> Arc<dyn HttpClient> {
        Arc::clone(&self.http)
    }

    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, OracleError> {
        self.http.send(request).await
    }
}

impl fmt::Debug for NodeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeContext").field("id", &self.id).finish()
    }
}

/// Deterministic procedure executed once per node.
///
/// Implementations must not read the wall clock or any other node-local
/// entropy, and should map failures to [`ConsensusValue::Error`] rather
/// than panicking.
pub trait NodeTask: Send + Sync {
    fn run(&self, ctx: NodeContext) -> BoxFuture<'_, ConsensusValue>;
}

impl<F, Fut> NodeTask for F
where
    F: Fn(NodeContext) -> Fut + Send + Sync,
    Fut: Future<Output = ConsensusValue> + Send + 'static,
{
    fn run(&self, ctx: NodeContext) -> BoxFuture<'_, ConsensusValue> {
        Box::pin(self(ctx))
    }
}
