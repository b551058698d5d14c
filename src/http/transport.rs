// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Transport seam between the session pipeline and the network
//!
//! Connection pooling, TLS, DNS and proxying all live behind [`Transport`].
//! The default implementation is a blocking reqwest client that never
//! follows redirects, stores no cookies and does not decompress, so the
//! session sees every hop exactly as it came off the wire.

use std::fmt;
use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use url::Url;

use super::encoding::RequestBody;
use super::request::PreparedRequest;
use super::DEFAULT_USER_AGENT;
use crate::error::{Error, Result};

/// Sends one prepared request and hands back the unread response
pub trait Transport: Send + Sync {
    /// Send a single request; redirects are never followed here
    fn send(&self, request: PreparedRequest) -> Result<RawResponse>;
}

/// A response whose body has not been read yet
pub struct RawResponse {
    /// Response status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// URL the response came from
    pub url: Url,
    /// Unread body stream
    pub body: Box<dyn Read + Send>,
}

impl fmt::Debug for RawResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("url", &self.url.as_str())
            .finish_non_exhaustive()
    }
}

/// Transport settings fixed at session construction
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Verify TLS certificates
    pub verify: bool,
    /// Fixed proxy URL, replacing proxy discovery from the environment
    pub proxy: Option<String>,
    /// User-Agent sent unless a request sets its own
    pub user_agent: Option<String>,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// TCP keep-alive interval
    pub keep_alive: Duration,
    /// How long idle pooled connections are kept
    pub idle_timeout: Duration,
    /// Upper bound of idle pooled connections per host
    pub max_idle_per_host: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            verify: true,
            proxy: None,
            user_agent: Some(DEFAULT_USER_AGENT.to_string()),
            connect_timeout: Duration::from_secs(30),
            keep_alive: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(90),
            max_idle_per_host: 100,
        }
    }
}

/// Blocking reqwest transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build the pooled client
    pub fn new(config: &TransportConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .redirect(Policy::none())
            .danger_accept_invalid_certs(!config.verify)
            .connect_timeout(config.connect_timeout)
            .tcp_keepalive(config.keep_alive)
            .pool_idle_timeout(config.idle_timeout)
            .pool_max_idle_per_host(config.max_idle_per_host)
            .timeout(None::<Duration>);

        if let Some(ref user_agent) = config.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }

        if let Some(ref proxy_url) = config.proxy {
            if !proxy_url.is_empty() {
                builder = builder.proxy(
                    reqwest::Proxy::all(proxy_url.as_str())
                        .map_err(|e| Error::config(format!("Invalid proxy URL: {}", e)))?,
                );
            }
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: PreparedRequest) -> Result<RawResponse> {
        let mut headers = request.headers;
        let builder = match request.body {
            Some(RequestBody::Bytes(bytes)) => self
                .client
                .request(request.method, request.url)
                .headers(headers)
                .body(bytes.to_vec()),
            Some(RequestBody::Multipart(form)) => {
                // reqwest appends its own Content-Type with the same boundary
                headers.remove(CONTENT_TYPE);
                self.client
                    .request(request.method, request.url)
                    .headers(headers)
                    .multipart(form)
            }
            None => self
                .client
                .request(request.method, request.url)
                .headers(headers),
        };

        let response = builder.send()?;

        Ok(RawResponse {
            status: response.status(),
            headers: response.headers().clone(),
            url: response.url().clone(),
            body: Box::new(response),
        })
    }
}
