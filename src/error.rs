// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for the requests crate
//!
//! Every failure carries enough context to tell which stage of the
//! request pipeline failed: URL parsing, body encoding, sending, or the
//! lazy decoding of a response body.

use thiserror::Error;

/// Result type alias for requests operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type
#[derive(Error, Debug)]
pub enum Error {
    /// Target URL (or redirect location) could not be parsed
    #[error("failed to parse URL: {url}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Request body could not be serialized
    #[error("failed to serialize request body: {0}")]
    Serialization(#[from] serde_json::Error),

    /// JSON body option was not a JSON object
    #[error("invalid JSON body: {0}")]
    InvalidBody(String),

    /// Transport-level failure reported by reqwest
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Transport-level failure from any other transport
    #[error("Network error: {0}")]
    Network(String),

    /// Reading the response body failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Decompression or charset conversion failed
    #[error("Decode error: {0}")]
    Decode(String),

    /// Response body was not valid JSON for the requested type
    #[error("failed to decode JSON response: {0}")]
    JsonDecode(#[source] serde_json::Error),

    /// Redirect chain exceeded the configured hop limit
    #[error("too many redirects ({max}) while requesting {url}")]
    TooManyRedirects { url: String, max: usize },

    /// Invalid session or transport configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error wrapped with pipeline-stage context
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<Error>,
    },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a URL parse error
    pub fn invalid_url(url: impl Into<String>, source: url::ParseError) -> Self {
        Error::InvalidUrl {
            url: url.into(),
            source,
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(msg: S) -> Self {
        Error::Network(msg.into())
    }

    /// Create a new decode error
    pub fn decode<S: Into<String>>(msg: S) -> Self {
        Error::Decode(msg.into())
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// The innermost error, skipping context wrappers
    pub fn root(&self) -> &Error {
        match self {
            Error::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// Check if sending the request failed
    pub fn is_transport(&self) -> bool {
        matches!(self.root(), Error::Http(_) | Error::Network(_))
    }

    /// Check if decoding a response body failed
    pub fn is_decode(&self) -> bool {
        matches!(
            self.root(),
            Error::Io(_) | Error::Decode(_) | Error::JsonDecode(_)
        )
    }

    /// Check if the error happened before anything was sent
    pub fn is_request_build(&self) -> bool {
        matches!(
            self.root(),
            Error::InvalidUrl { .. } | Error::Serialization(_) | Error::InvalidBody(_)
        )
    }

    /// Get URL if available
    pub fn url(&self) -> Option<&str> {
        match self.root() {
            Error::InvalidUrl { url, .. } => Some(url),
            Error::TooManyRedirects { url, .. } => Some(url),
            _ => None,
        }
    }
}

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add pipeline-stage context to error
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add lazily built context to error
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Context {
            context: msg.into(),
            source: Box::new(e.into()),
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| Error::Context {
            context: f(),
            source: Box::new(e.into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_error() {
        let source = url::Url::parse("not a url").unwrap_err();
        let err = Error::invalid_url("not a url", source);

        assert!(err.is_request_build());
        assert_eq!(err.url(), Some("not a url"));
        assert_eq!(err.to_string(), "failed to parse URL: not a url");
    }

    #[test]
    fn test_context_keeps_root() {
        let result: std::result::Result<(), Error> = Err(Error::network("connection refused"));
        let err = result
            .context("failed to send GET http://example.com/")
            .unwrap_err();

        assert!(err.is_transport());
        assert!(!err.is_decode());
        assert_eq!(
            err.to_string(),
            "failed to send GET http://example.com/: Network error: connection refused"
        );
    }

    #[test]
    fn test_decode_predicates() {
        assert!(Error::decode("bad gzip header").is_decode());
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        assert!(Error::from(io).is_decode());
        assert!(!Error::config("bad proxy").is_decode());
    }
}
