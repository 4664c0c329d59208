//! PagerDuty REST API v2 client.
//!
//! List endpoints page with `offset`/`limit` and report `more` until the last
//! page. Every failure fails the whole pull: there is no retry.
pub mod transport;

use serde::de::DeserializeOwned;
use serde_json::Value;
use transport::{HttpReply, HttpRequest, Method, Transport};

pub const DEFAULT_BASE_URL: &str = "https://api.pagerduty.com";
pub const MAX_QUERY_LIMIT: usize = 100;

const ACCEPT: &str = "application/vnd.pagerduty+json;version=2";

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("invalid route {0:?}, must start with '/'")]
    InvalidRoute(String),
    #[error("{route} returned HTTP {status}: {body}")]
    Status {
        route: String,
        status: u16,
        body: String,
    },
    #[error("{route} response has no `{field}` list")]
    MissingField { route: String, field: String },
    #[error("request to {route} failed: {message}")]
    Transport { route: String, message: String },
    #[error("decode {route} response")]
    Decode {
        route: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Route, result key, and extra parameters for a list endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    route: String,
    object_name: String,
    params: Vec<(String, String)>,
}

impl ListQuery {
    /// `route` looks like `/schedules` or `/incidents/{id}/log_entries`;
    /// `object_name` is the response key holding the page (`schedules`, `log_entries`).
    pub fn new(
        route: impl Into<String>,
        object_name: impl Into<String>,
    ) -> Result<Self, QueryError> {
        let route = route.into();
        if !route.starts_with('/') {
            return Err(QueryError::InvalidRoute(route));
        }
        Ok(Self {
            route,
            object_name: object_name.into(),
            params: Vec::new(),
        })
    }

    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.push((key.to_string(), value.into()));
        self
    }

    /// Repeats `key` once per value, as PagerDuty expects for `foo[]` parameters.
    pub fn params<I, V>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        for value in values {
            self = self.param(key, value);
        }
        self
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub objects: Vec<Value>,
    pub more: bool,
    pub total: u64,
}

pub struct PagerDutyApi {
    base_url: String,
    headers: Vec<(String, String)>,
    transport: Box<dyn Transport>,
}

impl PagerDutyApi {
    pub fn new(
        base_url: impl Into<String>,
        token: &str,
        email: Option<&str>,
        transport: Box<dyn Transport>,
    ) -> Self {
        let mut headers = vec![
            ("Accept".to_string(), ACCEPT.to_string()),
            ("Authorization".to_string(), format!("Token token={token}")),
        ];
        if let Some(email) = email.filter(|email| !email.is_empty()) {
            headers.push(("From".to_string(), email.to_string()));
        }
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            headers,
            transport,
        }
    }

    /// Fetch a single page starting at `offset`.
    pub fn list_page(
        &self,
        query: &ListQuery,
        offset: usize,
        limit: usize,
        total: bool,
    ) -> Result<Page, QueryError> {
        let mut params = vec![
            ("offset".to_string(), offset.to_string()),
            ("limit".to_string(), limit.to_string()),
            ("total".to_string(), total.to_string()),
        ];
        params.extend(query.params.iter().cloned());
        tracing::debug!(object = %query.object_name, offset, limit, "list page");

        let reply = self.send(Method::Get, &query.route, params, None)?;
        if !reply.is_success() {
            tracing::error!(route = %query.route, status = reply.status, body = %reply.body, "list request failed");
            return Err(QueryError::Status {
                route: query.route.clone(),
                status: reply.status,
                body: reply.body,
            });
        }

        let mut body = decode_json(&query.route, &reply.body)?;
        let more = body.get("more").and_then(Value::as_bool).unwrap_or(false);
        let total = body.get("total").and_then(Value::as_u64).unwrap_or(0);
        let objects = match body.get_mut(&query.object_name).map(Value::take) {
            Some(Value::Array(objects)) => objects,
            _ => {
                return Err(QueryError::MissingField {
                    route: query.route.clone(),
                    field: query.object_name.clone(),
                })
            }
        };
        tracing::debug!(object = %query.object_name, pulled = objects.len(), "page pulled");
        Ok(Page {
            objects,
            more,
            total,
        })
    }

    /// Walk every page of a list endpoint, `limit` objects at a time.
    pub fn list_all(&self, query: &ListQuery, limit: usize) -> Result<Vec<Value>, QueryError> {
        let mut objects = Vec::new();
        let mut offset = 0;
        loop {
            let page = self.list_page(query, offset, limit, offset == 0)?;
            if offset == 0 {
                tracing::debug!(object = %query.object_name, total = page.total, "list started");
            }
            objects.extend(page.objects);
            if !page.more {
                break;
            }
            offset += limit;
        }
        Ok(objects)
    }

    /// [`Self::list_all`], decoding each object as `T`.
    pub fn list_all_as<T: DeserializeOwned>(
        &self,
        query: &ListQuery,
        limit: usize,
    ) -> Result<Vec<T>, QueryError> {
        self.list_all(query, limit)?
            .into_iter()
            .map(|object| {
                serde_json::from_value(object).map_err(|source| QueryError::Decode {
                    route: query.route.clone(),
                    source,
                })
            })
            .collect()
    }

    /// GET a single resource. A non-2xx reply is logged and yields `None`.
    pub fn get(&self, route: &str, params: &[(&str, &str)]) -> Result<Option<Value>, QueryError> {
        let params = params
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        let reply = self.send(Method::Get, route, params, None)?;
        if !reply.is_success() {
            tracing::error!(route, status = reply.status, body = %reply.body, "get failed");
            return Ok(None);
        }
        decode_json(route, &reply.body).map(Some)
    }

    /// PUT a JSON payload. A non-2xx reply is logged and yields `None`; a
    /// success body that is not JSON comes back as a JSON string.
    pub fn put(&self, route: &str, payload: &Value) -> Result<Option<Value>, QueryError> {
        let reply = self.send(Method::Put, route, Vec::new(), Some(payload.clone()))?;
        if !reply.is_success() {
            tracing::error!(route, status = reply.status, body = %reply.body, "put failed");
            return Ok(None);
        }
        if reply.body.trim().is_empty() {
            return Ok(Some(Value::Null));
        }
        Ok(Some(
            serde_json::from_str(&reply.body).unwrap_or(Value::String(reply.body)),
        ))
    }

    fn send(
        &self,
        method: Method,
        route: &str,
        query: Vec<(String, String)>,
        body: Option<Value>,
    ) -> Result<HttpReply, QueryError> {
        if !route.starts_with('/') {
            return Err(QueryError::InvalidRoute(route.to_string()));
        }
        let mut request = HttpRequest::new(method, format!("{}{}", self.base_url, route));
        request.headers = self.headers.clone();
        request.query = query;
        request.body = body;
        self.transport
            .send(&request)
            .map_err(|err| QueryError::Transport {
                route: route.to_string(),
                message: format!("{err:#}"),
            })
    }
}

fn decode_json(route: &str, body: &str) -> Result<Value, QueryError> {
    serde_json::from_str(body).map_err(|source| QueryError::Decode {
        route: route.to_string(),
        source,
    })
}

#[cfg(test)]
#[path = "pagerduty_tests.rs"]
mod tests;
