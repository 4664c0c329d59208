//! HTTP transport used by the PagerDuty clients.
//!
//! Requests are described as plain data so the API layer can be exercised
//! against a scripted transport in tests.
use anyhow::{Context, Result};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }
}

/// Status and raw body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a request and returns whatever status the server answered with.
///
/// Only connection-level failures are errors; non-2xx replies are returned.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpReply>;
}

/// Blocking transport backed by a ureq agent.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(timeout)
            .http_status_as_error(false)
            .build();
        Self {
            agent: config.into(),
        }
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpReply> {
        let result = match request.method {
            Method::Get => {
                let builder = with_parts(self.agent.get(request.url.as_str()), request);
                builder.call()
            }
            Method::Put => {
                let builder = with_parts(self.agent.put(request.url.as_str()), request);
                match &request.body {
                    Some(body) => builder.send_json(body),
                    None => builder.send_empty(),
                }
            }
            Method::Post => {
                let builder = with_parts(self.agent.post(request.url.as_str()), request);
                match &request.body {
                    Some(body) => builder.send_json(body),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response =
            result.with_context(|| format!("{} {}", request.method, request.url))?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .with_context(|| format!("read response body from {}", request.url))?;
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            status,
            body_bytes = body.len(),
            "http exchange complete"
        );
        Ok(HttpReply { status, body })
    }
}

fn with_parts<B>(
    mut builder: ureq::RequestBuilder<B>,
    request: &HttpRequest,
) -> ureq::RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    for (key, value) in &request.query {
        builder = builder.query(key, value);
    }
    builder
}

#[cfg(test)]
pub(crate) mod fake {
    //! Scripted transport for unit tests.
    use super::{HttpReply, HttpRequest, Transport};
    use anyhow::{anyhow, Result};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// Clones share one script and one request log.
    #[derive(Clone, Default)]
    pub struct FakeTransport {
        replies: Rc<RefCell<VecDeque<Result<HttpReply>>>>,
        requests: Rc<RefCell<Vec<HttpRequest>>>,
    }

    impl FakeTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(self, status: u16, body: impl Into<String>) -> Self {
            self.replies.borrow_mut().push_back(Ok(HttpReply {
                status,
                body: body.into(),
            }));
            self
        }

        pub fn reply_json(self, body: &serde_json::Value) -> Self {
            self.reply(200, body.to_string())
        }

        pub fn fail(self, message: &str) -> Self {
            self.replies
                .borrow_mut()
                .push_back(Err(anyhow!(message.to_string())));
            self
        }

        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests.borrow().clone()
        }
    }

    impl Transport for FakeTransport {
        fn send(&self, request: &HttpRequest) -> Result<HttpReply> {
            self.requests.borrow_mut().push(request.clone());
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow!("no scripted reply for {}", request.url)))
        }
    }
}
