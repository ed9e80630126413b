//! Message dispatcher: turns an accepted submission into a request to the
//! agent endpoint and the outcome back into a displayable message.
//!
//! The dispatcher never fails. Every path — a good reply, a reply with no
//! usable text, a transport error, an unparseable body — resolves to an
//! assistant [`Message`], so the session layer has no error branch.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{AgentReply, AgentRequest, Message};

/// Shown when a reply parsed fine but carried no usable text.
pub const MALFORMED_REPLY_FALLBACK: &str =
    "I apologize, I encountered an issue processing your request. Please try again.";

/// Shown when the endpoint could not be reached or its body not parsed.
pub const DELIVERY_FAILURE_FALLBACK: &str =
    "I apologize, but I encountered an error while processing your message. Please try again.";

/// Transport seam to the remote agent service.
#[async_trait]
pub trait AgentEndpoint: Send + Sync {
    /// Perform one request/response exchange.
    async fn exchange(&self, request: &AgentRequest) -> Result<AgentReply>;
}

/// HTTP transport posting JSON to a fixed route.
pub struct HttpEndpoint {
    client: reqwest::Client,
    url: String,
}

impl HttpEndpoint {
    /// Create an endpoint posting to `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl AgentEndpoint for HttpEndpoint {
    async fn exchange(&self, request: &AgentRequest) -> Result<AgentReply> {
        let response = self.client.post(&self.url).json(request).send().await?;

        // The status code is not a gate: error replies often carry a JSON
        // body, and a parseable body is handled by the fallback chain.
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Converts submissions into endpoint requests and outcomes into messages.
#[derive(Clone)]
pub struct Dispatcher {
    endpoint: Arc<dyn AgentEndpoint>,
}

impl Dispatcher {
    /// Create a dispatcher over `endpoint`.
    pub fn new(endpoint: Arc<dyn AgentEndpoint>) -> Self {
        Self { endpoint }
    }

    /// Dispatcher talking to an HTTP agent endpoint at `url`.
    pub fn over_http(url: impl Into<String>) -> Self {
        Self::new(Arc::new(HttpEndpoint::new(url)))
    }

    /// Send `content` on behalf of `persona_id`; always resolves to an
    /// assistant message.
    pub async fn send(&self, content: &str, persona_id: &str) -> Message {
        let request = AgentRequest {
            message: content.to_string(),
            agent_id: persona_id.to_string(),
        };

        tracing::debug!(agent_id = %request.agent_id, "dispatching message");

        match self.endpoint.exchange(&request).await {
            Ok(reply) => {
                let text = reply.reply_text().unwrap_or(MALFORMED_REPLY_FALLBACK);
                Message::assistant(text)
            }
            Err(e) => {
                tracing::warn!(error = %e, "agent endpoint exchange failed");
                Message::assistant(DELIVERY_FAILURE_FALLBACK)
            }
        }
    }
}
