// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Sessions: persistent defaults, cookies and one owned transport

use std::sync::Arc;

use parking_lot::RwLock;
use reqwest::header::{HeaderMap, SET_COOKIE};
use reqwest::Method;

use super::cookie::{Cookie, CookieJar};
use super::options::{insert_header, Defaults, Params, RequestOptions};
use super::redirect::RedirectEngine;
use super::request::Request;
use super::response::Response;
use super::transport::{RawResponse, ReqwestTransport, Transport};
use crate::config::SessionConfig;
use crate::error::{ErrorContext, Result};

/// Mutable defaults shared by every clone of a session
#[derive(Debug, Default)]
struct SessionState {
    headers: HeaderMap,
    params: Params,
}

/// HTTP session with default headers, params and a cookie jar
///
/// Clones share state and transport. Every response received through the
/// session appends its cookies to the jar.
#[derive(Clone)]
pub struct Session {
    transport: Arc<dyn Transport>,
    state: Arc<RwLock<SessionState>>,
    cookie_jar: CookieJar,
    config: Arc<SessionConfig>,
}

impl Session {
    /// Create a new session with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(SessionConfig::default())
    }

    /// Create a new session backed by a pooled reqwest client
    pub fn with_config(config: SessionConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config.transport_config())?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a session on top of any transport
    ///
    /// `verify` and `proxy` in `config` are the transport's business here.
    pub fn with_transport(config: SessionConfig, transport: Arc<dyn Transport>) -> Self {
        let state = SessionState {
            headers: config.headers.clone(),
            params: config.params.clone(),
        };

        Self {
            transport,
            state: Arc::new(RwLock::new(state)),
            cookie_jar: CookieJar::with_cookies(config.cookies.clone()),
            config: Arc::new(config),
        }
    }

    /// Execute a GET request
    pub fn get(&self, url: impl AsRef<str>, options: RequestOptions) -> Result<Response> {
        self.request(Method::GET, url, options)
    }

    /// Execute a POST request
    pub fn post(&self, url: impl AsRef<str>, options: RequestOptions) -> Result<Response> {
        self.request(Method::POST, url, options)
    }

    /// Execute a PUT request
    pub fn put(&self, url: impl AsRef<str>, options: RequestOptions) -> Result<Response> {
        self.request(Method::PUT, url, options)
    }

    /// Execute a DELETE request
    pub fn delete(&self, url: impl AsRef<str>, options: RequestOptions) -> Result<Response> {
        self.request(Method::DELETE, url, options)
    }

    /// Execute a PATCH request
    pub fn patch(&self, url: impl AsRef<str>, options: RequestOptions) -> Result<Response> {
        self.request(Method::PATCH, url, options)
    }

    /// Execute a HEAD request
    pub fn head(&self, url: impl AsRef<str>, options: RequestOptions) -> Result<Response> {
        self.request(Method::HEAD, url, options)
    }

    /// Execute an OPTIONS request
    pub fn options(&self, url: impl AsRef<str>, options: RequestOptions) -> Result<Response> {
        self.request(Method::OPTIONS, url, options)
    }

    /// Execute a request with any method
    ///
    /// A `redirect`, `verify` or `proxy` value in `options` is ignored: those
    /// are fixed when the session is built.
    pub fn request(
        &self,
        method: Method,
        url: impl AsRef<str>,
        options: RequestOptions,
    ) -> Result<Response> {
        if options.redirect.is_some() || options.verify.is_some() || options.proxy.is_some() {
            tracing::debug!("Ignoring construction-only options on an existing session");
        }

        let request = options.resolve(method, url.as_ref(), &self.defaults())?;
        RedirectEngine::new(self, self.config.redirect, self.config.max_redirects).execute(request)
    }

    /// Prepare and send one attempt, folding its cookies into the jar
    pub(crate) fn dispatch(&self, request: &mut Request) -> Result<RawResponse> {
        let prepared = request.prepare()?;
        let method = prepared.method.clone();
        let url = prepared.url.clone();

        tracing::info!(method = %method, url = %url, "Request");

        let raw = self
            .transport
            .send(prepared)
            .with_context(|| format!("failed to send {} {}", method, url))?;

        let cookies: Vec<Cookie> = raw
            .headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(Cookie::parse)
            .collect();
        if !cookies.is_empty() {
            tracing::debug!(url = %url, count = cookies.len(), "Storing cookies");
            self.cookie_jar.extend(cookies);
        }

        tracing::info!(url = %url, status = %raw.status, "Response");
        Ok(raw)
    }

    /// Snapshot of headers, params and cookies requests start from
    pub fn defaults(&self) -> Defaults {
        let state = self.state.read();
        Defaults {
            headers: state.headers.clone(),
            params: state.params.clone(),
            cookies: self.cookie_jar.snapshot(),
        }
    }

    /// Set a default header
    pub fn set_header(&self, name: impl AsRef<str>, value: impl AsRef<str>) {
        insert_header(&mut self.state.write().headers, name.as_ref(), value.as_ref());
    }

    /// Set a default query parameter
    pub fn set_param(&self, name: impl Into<String>, value: impl Into<String>) {
        self.state.write().params.insert(name.into(), value.into());
    }

    /// Append a cookie to the jar
    pub fn add_cookie(&self, cookie: Cookie) {
        self.cookie_jar.add(cookie);
    }

    /// Get the cookie jar
    pub fn cookie_jar(&self) -> &CookieJar {
        &self.cookie_jar
    }

    /// Copy of every accumulated cookie, oldest first
    pub fn cookies(&self) -> Vec<Cookie> {
        self.cookie_jar.snapshot()
    }

    /// Export the cookie jar as JSON
    pub fn cookies_json(&self) -> Result<String> {
        Ok(self.cookie_jar.to_json()?)
    }

    /// Get session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("cookies", &self.cookie_jar.len())
            .finish_non_exhaustive()
    }
}
