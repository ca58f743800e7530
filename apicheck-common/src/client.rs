//! One-shot HTTP calls returning a uniform outcome.
//!
//! [`RequestClient`] never returns an error: every transport problem becomes
//! a [`TransportFailure`] inside [`CheckOutcome`], so callers pattern-match
//! on the tag instead of propagating faults.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::debug;
use ureq::Agent;

/// Default per-call timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP method used by a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        })
    }
}

/// Everything needed to issue one request against the service.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: HttpMethod,
    /// Path relative to the base URL, starting with `/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Overrides the client's default timeout.
    pub timeout: Option<Duration>,
}

impl RequestSpec {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            timeout: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// `path?k=v&...` for logs and messages (values not percent-encoded).
    pub fn display_target(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query: Vec<String> = self
            .query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        format!("{}?{}", self.path, query.join("&"))
    }
}

/// Transport failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorKind {
    Timeout,
    ConnectionError,
    DecodeError,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Timeout => "timeout",
            Self::ConnectionError => "connection error",
            Self::DecodeError => "decode error",
        })
    }
}

/// A completed response with a decoded object body.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Map<String, Value>,
    pub elapsed_ms: u64,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Resolve a JSON pointer (`""`, `/data`, `/data/list/0`) into the body.
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        if pointer.is_empty() {
            return None;
        }
        let mut segments = pointer.trim_start_matches('/').splitn(2, '/');
        let head = segments.next()?;
        let value = self.body.get(head)?;
        match segments.next() {
            Some(rest) => value.pointer(&format!("/{rest}")),
            None => Some(value),
        }
    }
}

/// A call that did not produce a usable response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    pub kind: TransportErrorKind,
    pub message: String,
    /// Wall-clock time until the failure, when measurable.
    pub elapsed_ms: Option<u64>,
    /// Status line of the response, for decode failures.
    pub status: Option<u16>,
}

/// Tagged result of one HTTP call.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    Response(HttpResponse),
    Failure(TransportFailure),
}

/// Something that can execute a [`RequestSpec`].
///
/// The runner depends on this seam rather than on [`RequestClient`] directly.
pub trait Transport {
    fn call(&self, request: &RequestSpec) -> CheckOutcome;
}

/// Blocking HTTP client bound to one base URL.
pub struct RequestClient {
    base_url: String,
    default_timeout: Duration,
    agent: Agent,
}

impl RequestClient {
    pub fn new(base_url: impl Into<String>, default_timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            agent: build_agent(default_timeout),
            base_url,
            default_timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn send(
        &self,
        agent: &Agent,
        url: &str,
        request: &RequestSpec,
    ) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
        let payload = request
            .body
            .as_ref()
            .map(Value::to_string)
            .unwrap_or_default();

        match request.method {
            HttpMethod::Get => with_query(agent.get(url), &request.query).call(),
            HttpMethod::Delete => with_query(agent.delete(url), &request.query).call(),
            HttpMethod::Post => with_query(agent.post(url), &request.query)
                .header("Content-Type", "application/json")
                .send(payload.as_bytes()),
            HttpMethod::Put => with_query(agent.put(url), &request.query)
                .header("Content-Type", "application/json")
                .send(payload.as_bytes()),
        }
    }
}

impl Transport for RequestClient {
    fn call(&self, request: &RequestSpec) -> CheckOutcome {
        let url = self.url_for(&request.path);
        let custom_agent = request
            .timeout
            .filter(|timeout| *timeout != self.default_timeout)
            .map(build_agent);
        let agent = custom_agent.as_ref().unwrap_or(&self.agent);

        debug!(method = %request.method, target = %request.display_target(), "issuing request");
        let started = Instant::now();

        let mut response = match self.send(agent, &url, request) {
            Ok(response) => response,
            Err(err) => {
                let failure = transport_failure(&err, elapsed_ms(started), None);
                debug!(kind = %failure.kind, error = %failure.message, "request failed");
                return CheckOutcome::Failure(failure);
            }
        };

        let status = response.status().as_u16();
        let bytes = match response.body_mut().read_to_vec() {
            Ok(bytes) => bytes,
            Err(err) => {
                return CheckOutcome::Failure(transport_failure(
                    &err,
                    elapsed_ms(started),
                    Some(status),
                ));
            }
        };
        let elapsed = elapsed_ms(started);
        debug!(status, elapsed_ms = elapsed, bytes = bytes.len(), "response received");

        match decode_body(&bytes) {
            Ok(body) => CheckOutcome::Response(HttpResponse {
                status,
                body,
                elapsed_ms: elapsed,
            }),
            Err(message) => CheckOutcome::Failure(TransportFailure {
                kind: TransportErrorKind::DecodeError,
                message,
                elapsed_ms: Some(elapsed),
                status: Some(status),
            }),
        }
    }
}

fn build_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

fn with_query<B>(
    mut builder: ureq::RequestBuilder<B>,
    query: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (key, value) in query {
        builder = builder.query(key, value);
    }
    builder
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn transport_failure(err: &ureq::Error, elapsed: u64, status: Option<u16>) -> TransportFailure {
    let kind = match err {
        ureq::Error::Timeout(_) => TransportErrorKind::Timeout,
        ureq::Error::Io(io) if io.kind() == std::io::ErrorKind::TimedOut => {
            TransportErrorKind::Timeout
        }
        ureq::Error::BodyExceedsLimit(_) => TransportErrorKind::DecodeError,
        _ => TransportErrorKind::ConnectionError,
    };
    let message = match err {
        ureq::Error::BodyExceedsLimit(limit) => {
            format!("response body exceeds the {limit} byte read limit")
        }
        other => other.to_string(),
    };
    TransportFailure {
        kind,
        message,
        elapsed_ms: Some(elapsed),
        status,
    }
}

/// Decode a body into a JSON object. An empty body decodes as `{}`.
pub fn decode_body(bytes: &[u8]) -> Result<Map<String, Value>, String> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(format!(
            "expected a JSON object, got {} ({} bytes)",
            crate::schema::ValueKind::of(&other),
            bytes.len()
        )),
        Err(err) => Err(format!("invalid JSON in {} byte body: {err}", bytes.len())),
    }
}
