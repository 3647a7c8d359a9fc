//! Typed errors for the extraction library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.
//!
//! Note that a *validation rejection* is not an error anywhere in this
//! crate: a candidate field value that fails validation is silently
//! dropped and its field omitted from the consolidated record. Errors
//! here cover acquisition and facade-level failures only.

use thiserror::Error;

/// Errors surfaced by the extraction facade.
///
/// Acquisition-level failures are recovered inside the fallback chain and
/// folded into a `success = false` result. The facade only returns `Err`
/// when it cannot even start the chain or when the caller cancels.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The target could not be normalized into a fetchable URL
    #[error("invalid target: {reason}")]
    InvalidTarget { reason: String },

    /// The normalized target failed security validation
    #[error("blocked target: {0}")]
    BlockedTarget(#[from] SecurityError),

    /// Operation was cancelled by the caller
    #[error("operation cancelled")]
    Cancelled,

    /// No acquisition backends were configured for the chain
    #[error("no backends configured")]
    NoBackends,
}

/// Errors that can occur while acquiring content from a single backend.
///
/// These never escape the fallback chain; they cause an advance to the
/// next backend and are recorded on the attempt report.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    /// HTTP transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend's API answered with a non-success payload
    #[error("backend API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The backend answered but produced no usable document
    #[error("no content returned for: {url}")]
    NoContent { url: String },

    /// The backend call exceeded its timeout
    #[error("timeout acquiring: {url}")]
    Timeout { url: String },

    /// Security validation failed for the fetch target
    #[error("security error: {0}")]
    Security(#[from] SecurityError),

    /// Response body could not be decoded
    #[error("malformed backend response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The in-flight call was cancelled
    #[error("acquisition cancelled")]
    Cancelled,
}

/// Security-related errors, primarily for SSRF protection of
/// direct-fetch backends.
#[derive(Debug, Error)]
pub enum SecurityError {
    /// URL scheme not allowed (e.g., file://, ftp://)
    #[error("disallowed URL scheme: {0}")]
    DisallowedScheme(String),

    /// Host is blocked (e.g., localhost, internal IPs)
    #[error("blocked host: {0}")]
    BlockedHost(String),

    /// IP in blocked CIDR range (e.g., 10.0.0.0/8)
    #[error("blocked IP range: {0}")]
    BlockedCidr(String),

    /// URL has no host
    #[error("URL has no host")]
    NoHost,

    /// DNS resolution failed
    #[error("DNS resolution failed: {0}")]
    DnsResolution(String),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias for facade operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Result type alias for backend acquisition calls.
pub type AcquisitionResult<T> = std::result::Result<T, AcquisitionError>;

/// Result type alias for security checks.
pub type SecurityResult<T> = std::result::Result<T, SecurityError>;
