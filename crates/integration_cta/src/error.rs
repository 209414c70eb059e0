//! CTA client error types
//!
//! Every facade operation returns [`CtaError`], whose variant names the stage
//! of the request pipeline that failed. The stage-specific enums carry the
//! detail and convert into [`CtaError`] with `?`.

use std::fmt;

use thiserror::Error;

use crate::document::ServiceFault;
use crate::endpoints::ServiceFamily;

/// Errors returned by the CTA facade
#[derive(Debug, Error)]
pub enum CtaError {
    /// Arguments failed local validation; no request was sent
    #[error("Invalid arguments: {0}")]
    InvalidArguments(#[from] ValidationError),

    /// The HTTP exchange failed or returned a non-success status
    #[error("Transport failure: {0}")]
    TransportFailure(#[from] TransportError),

    /// The response body was not the expected XML document
    #[error("Parse failure: {0}")]
    ParseFailure(#[from] ParseError),

    /// The service answered with a well-formed error payload
    #[error("Service error: {0}")]
    ServiceError(ServiceFault),

    /// Client configuration is unusable
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Pipeline stage that produced a [`CtaError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validation,
    Transport,
    Parse,
    Service,
    Configuration,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validation => "validation",
            Self::Transport => "transport",
            Self::Parse => "parse",
            Self::Service => "service",
            Self::Configuration => "configuration",
        };
        f.write_str(name)
    }
}

impl CtaError {
    /// The stage of the request pipeline that failed
    #[must_use]
    pub const fn stage(&self) -> Stage {
        match self {
            Self::InvalidArguments(_) => Stage::Validation,
            Self::TransportFailure(_) => Stage::Transport,
            Self::ParseFailure(_) => Stage::Parse,
            Self::ServiceError(_) => Stage::Service,
            Self::Configuration(_) => Stage::Configuration,
        }
    }

    /// Returns true if repeating the same call may succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::TransportFailure(err) => err.is_retryable(),
            _ => false,
        }
    }
}

/// Reasons an operation's arguments are rejected before any request is sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A value does not have the form the parameter requires
    #[error("Wrong shape for `{param}`: {reason}")]
    WrongShape {
        /// Query parameter name
        param: &'static str,
        /// What is wrong with the value
        reason: String,
    },

    /// Both branches of an exclusive group were supplied
    #[error("Conflicting arguments: `{first}` and `{second}` cannot be combined")]
    ConflictingGroups {
        /// First supplied parameter
        first: &'static str,
        /// Second supplied parameter
        second: &'static str,
    },

    /// None of the parameters in a required group was supplied
    #[error("Missing required arguments: expected at least one of {}", .params.join(", "))]
    MissingRequiredGroup {
        /// Parameters of which one must be supplied
        params: Vec<&'static str>,
    },

    /// A list parameter exceeds the service's documented maximum
    #[error("Too many values for `{param}`: {count} given, at most {max} allowed")]
    TooManyItems {
        /// Query parameter name
        param: &'static str,
        /// Number of values supplied
        count: usize,
        /// Maximum accepted by the service
        max: usize,
    },

    /// The operation's service family has no API key configured
    #[error("No API key configured for the {family} service")]
    MissingCredential {
        /// Family whose key is missing
        family: ServiceFamily,
    },
}

/// Failures of the HTTP exchange itself
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request did not complete within the configured timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// The caller cancelled the request while it was in flight
    #[error("Request cancelled")]
    Cancelled,

    /// No connection to the host could be established
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The request failed after the connection was established
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The service answered with a non-success HTTP status
    #[error("HTTP {status}")]
    Status {
        /// Status code returned by the service
        status: u16,
        /// Response body, truncated
        body: String,
    },
}

impl TransportError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::ConnectionFailed(_) | Self::RequestFailed(_) => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Cancelled => false,
        }
    }
}

/// Reasons a response body cannot be turned into a document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The body contained no element at all
    #[error("Response body is empty")]
    Empty,

    /// The body is not well-formed XML
    #[error("Malformed XML at byte {position}: {message}")]
    Malformed {
        /// Byte offset reported by the reader
        position: u64,
        /// Reader error message
        message: String,
    },

    /// The body ended before an element was closed
    #[error("Response ended inside element <{element}>")]
    Truncated {
        /// Innermost unclosed element
        element: String,
    },

    /// The document root is not the one the operation answers with
    #[error("Unexpected root element <{found}>, expected <{expected}>")]
    UnexpectedRoot {
        /// Root element the operation answers with
        expected: &'static str,
        /// Root element found in the body
        found: String,
    },
}
