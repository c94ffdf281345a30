//! Error types for the Graph API client.
//!
//! # Design
//! Two layers. `MalformedResponse` is raised by the mapping code whenever a
//! body does not have the shape an entity or envelope expects; it always wraps
//! exactly one `ParseError` describing what went wrong. `ServiceError` is the
//! only error the method layer surfaces: a failed transport, a non-2xx status
//! and a malformed body all become a `ServiceError`, and the underlying reason
//! is reachable through `source()`.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Low-level reason a JSON body could not be mapped.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The body is not syntactically valid JSON.
    #[error("invalid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    /// A value had a different JSON type than the mapper expected.
    #[error("`{field}`: expected {expected}, found {found}")]
    WrongType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A required field is absent or null.
    #[error("missing required field `{0}`")]
    MissingField(String),

    /// A timestamp did not match the accepted ISO-8601 profile.
    #[error("`{field}`: invalid timestamp {value:?}")]
    Timestamp {
        field: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A numeric field held a non-numeric or out-of-range value.
    #[error("`{field}`: invalid number {value:?}")]
    InvalidNumber { field: String, value: String },
}

/// The response body does not conform to the expected entity or envelope.
#[derive(Debug, Error)]
#[error("malformed response: {source}")]
pub struct MalformedResponse {
    #[from]
    source: ParseError,
}

impl MalformedResponse {
    pub fn cause(&self) -> &ParseError {
        &self.source
    }
}

/// The client configuration is unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base URL {url:?}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The URL parses but has no hierarchical path to append segments to.
    #[error("base URL {0:?} cannot carry a path")]
    NotABase(String),
}

/// The `error` object Graph returns alongside non-2xx statuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphApiError {
    pub message: Option<String>,
    pub error_type: Option<String>,
    pub code: Option<i32>,
    pub error_subcode: Option<i32>,
    pub fbtrace_id: Option<String>,
}

impl fmt::Display for GraphApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (type={}, code={})",
            self.message.as_deref().unwrap_or("unknown error"),
            self.error_type.as_deref().unwrap_or("-"),
            self.code.map_or_else(|| "-".to_string(), |c| c.to_string()),
        )
    }
}

impl StdError for GraphApiError {}

/// A remote call could not be completed.
///
/// Callers that need to tell a network failure from a rejected request or a
/// malformed body walk the `source()` chain.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ServiceError {
    message: String,
    status: Option<u16>,
    #[source]
    cause: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl ServiceError {
    /// The transport failed before a response was received.
    pub fn transport<E>(cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            message: format!("transport failed: {cause}"),
            status: None,
            cause: Some(Box::new(cause)),
        }
    }

    /// The server answered with an unexpected status.
    pub fn status(status: u16, body: &str, graph_error: Option<GraphApiError>) -> Self {
        let message = match &graph_error {
            Some(err) => format!("HTTP {status}: {err}"),
            None => format!("HTTP {status}: {body}"),
        };
        Self {
            message,
            status: Some(status),
            cause: graph_error.map(|e| Box::new(e) as Box<dyn StdError + Send + Sync>),
        }
    }

    /// The response arrived but its body could not be mapped.
    pub fn malformed(status: u16, cause: MalformedResponse) -> Self {
        Self {
            message: cause.to_string(),
            status: Some(status),
            cause: Some(Box::new(cause)),
        }
    }

    /// HTTP status of the response, when one was received.
    pub fn status_code(&self) -> Option<u16> {
        self.status
    }

    /// Graph's structured error, when the failing response carried one.
    pub fn graph_error(&self) -> Option<&GraphApiError> {
        self.cause.as_deref()?.downcast_ref()
    }

    /// The mapping failure, when the body was malformed.
    pub fn malformed_response(&self) -> Option<&MalformedResponse> {
        self.cause.as_deref()?.downcast_ref()
    }
}

impl From<MalformedResponse> for ServiceError {
    fn from(cause: MalformedResponse) -> Self {
        Self {
            message: cause.to_string(),
            status: None,
            cause: Some(Box::new(cause)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_response_keeps_parse_error_as_source() {
        let err = MalformedResponse::from(ParseError::MissingField("id".to_string()));
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "missing required field `id`");
        assert!(matches!(err.cause(), ParseError::MissingField(_)));
    }

    #[test]
    fn service_error_exposes_graph_error() {
        let graph = GraphApiError {
            message: Some("Unsupported get request".to_string()),
            error_type: Some("GraphMethodException".to_string()),
            code: Some(100),
            error_subcode: None,
            fbtrace_id: None,
        };
        let err = ServiceError::status(400, "{}", Some(graph.clone()));
        assert_eq!(err.status_code(), Some(400));
        assert_eq!(err.graph_error(), Some(&graph));
        assert!(err.malformed_response().is_none());
        assert!(err.to_string().contains("GraphMethodException"));
    }

    #[test]
    fn service_error_wraps_malformed_response() {
        let malformed = MalformedResponse::from(ParseError::MissingField("id".to_string()));
        let err = ServiceError::malformed(200, malformed);
        assert_eq!(err.status_code(), Some(200));
        let bare = ServiceError::from(MalformedResponse::from(ParseError::MissingField("id".to_string())));
        assert_eq!(bare.status_code(), None);
        assert!(bare.malformed_response().is_some());
        assert!(err.graph_error().is_none());
        assert!(matches!(
            err.malformed_response().map(MalformedResponse::cause),
            Some(ParseError::MissingField(_))
        ));
    }

    #[test]
    fn transport_error_has_no_status() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = ServiceError::transport(io);
        assert_eq!(err.status_code(), None);
        assert!(err.source().is_some());
    }
}
