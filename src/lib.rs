// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # Requests - blocking HTTP sessions
//!
//! A convenience layer over a pooled HTTP client with session semantics:
//! persistent headers and query parameters, an append-only cookie jar, and
//! redirect following with full response history.
//!
//! ## Features
//!
//! - Layered options: session defaults plus per-call overrides
//! - Body negotiation: JSON, multipart, or URL-encoded form
//! - Cookie persistence with simple domain/path scoping
//! - Redirect chains recorded in `Response::history`, oldest first
//! - Lazy body decoding: gzip, charset conversion, JSON
//!
//! ## Example
//!
//! ```rust,no_run
//! use requests::{RequestOptions, Session, SessionConfig};
//!
//! fn main() -> requests::Result<()> {
//!     // one-shot
//!     let resp = requests::get("https://httpbin.org/get", RequestOptions::new().param("q", "1"))?;
//!     println!("{}", resp.text()?);
//!
//!     // session
//!     let session = Session::with_config(SessionConfig::new().header("x-api-key", "secret"))?;
//!     let resp = session.post(
//!         "https://httpbin.org/post",
//!         RequestOptions::new().data_field("name", "value"),
//!     )?;
//!     println!("{} after {} redirects", resp.status, resp.history.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod http;

// Re-exports for convenience

// Transport types used in the public API
pub use reqwest::{header, Method, StatusCode};

// Configuration
pub use config::{SessionConfig, DEFAULT_MAX_REDIRECTS};

// Errors
pub use error::{Error, ErrorContext, Result};

// HTTP
pub use http::{
    Cookie, CookieJar, Data, Files, JsonBody, Params, PreparedRequest, Request, RequestOption,
    RequestOptions, Response, Session, Transport, TransportConfig,
};

/// Requests version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// One-shot GET
pub fn get(url: impl AsRef<str>, options: RequestOptions) -> Result<Response> {
    request(Method::GET, url, options)
}

/// One-shot POST
pub fn post(url: impl AsRef<str>, options: RequestOptions) -> Result<Response> {
    request(Method::POST, url, options)
}

/// One-shot PUT
pub fn put(url: impl AsRef<str>, options: RequestOptions) -> Result<Response> {
    request(Method::PUT, url, options)
}

/// One-shot DELETE
pub fn delete(url: impl AsRef<str>, options: RequestOptions) -> Result<Response> {
    request(Method::DELETE, url, options)
}

/// One-shot PATCH
pub fn patch(url: impl AsRef<str>, options: RequestOptions) -> Result<Response> {
    request(Method::PATCH, url, options)
}

/// One-shot HEAD
pub fn head(url: impl AsRef<str>, options: RequestOptions) -> Result<Response> {
    request(Method::HEAD, url, options)
}

/// One-shot OPTIONS
pub fn options(url: impl AsRef<str>, options: RequestOptions) -> Result<Response> {
    request(Method::OPTIONS, url, options)
}

/// One-shot request with any method
///
/// Builds a throwaway [`Session`] from `options` (so `redirect`, `verify`
/// and `proxy` apply here, unlike on an existing session) and sends one call
/// through it.
pub fn request(method: Method, url: impl AsRef<str>, options: RequestOptions) -> Result<Response> {
    let session = Session::with_config(SessionConfig::from_options(&options))?;
    session.request(method, url, options.body_only())
}
