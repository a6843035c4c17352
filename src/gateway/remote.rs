//! Outbound seam — executes an [`OutboundRequest`] against the remote service.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use super::operation::OutboundRequest;
use crate::types::{Error, RemoteConfig, Result};

/// Executes one outbound call and returns the parsed JSON body.
///
/// Implementations never inspect the status code; the body is parsed as JSON
/// regardless.
#[async_trait]
pub trait RemoteService: Send + Sync {
    async fn send(&self, request: OutboundRequest) -> Result<Value>;
}

/// `reqwest`-backed remote service.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpRemote {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("botemail-mcp/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl RemoteService for HttpRemote {
    async fn send(&self, request: OutboundRequest) -> Result<Value> {
        let url = format!("{}{}", self.base_url, request.path);
        tracing::debug!(method = %request.method, path = %request.path, "sending remote request");

        let mut builder = self.client.request(request.method, &url);
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| self.classify(e))?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|e| self.classify(e))?;

        tracing::debug!(status, body_length = bytes.len(), "remote response received");

        serde_json::from_slice(&bytes).map_err(|e| Error::Decode {
            status,
            reason: e.to_string(),
        })
    }
}

impl HttpRemote {
    fn classify(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout(self.timeout.as_secs())
        } else {
            Error::Transport(err)
        }
    }
}
