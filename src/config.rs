// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Session configuration

use reqwest::header::HeaderMap;

use crate::error::Result;
use crate::http::options::{insert_header, merge_headers};
use crate::http::{Cookie, CookieJar, Params, RequestOptions, TransportConfig};

/// Default cap on followed redirects per call
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Headers sent with every request
    pub headers: HeaderMap,
    /// Query parameters added to every request
    pub params: Params,
    /// Initial cookie jar contents
    pub cookies: Vec<Cookie>,
    /// Follow 3xx redirects
    pub redirect: bool,
    /// Maximum redirects followed per call
    pub max_redirects: usize,
    /// Verify TLS certificates
    pub verify: bool,
    /// Fixed proxy URL
    pub proxy: Option<String>,
    /// Text encoding forced on every response
    pub encoding: Option<String>,
    /// User agent string
    pub user_agent: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let transport = TransportConfig::default();
        Self {
            headers: HeaderMap::new(),
            params: Params::new(),
            cookies: Vec::new(),
            redirect: true,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            verify: transport.verify,
            proxy: transport.proxy,
            encoding: None,
            user_agent: transport.user_agent,
        }
    }
}

impl SessionConfig {
    /// Create a new session config
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the construction-time settings out of a call's options
    ///
    /// Used by the one-shot helpers: headers, params, cookies, `redirect`,
    /// `verify` and `proxy` become session defaults.
    pub fn from_options(options: &RequestOptions) -> Self {
        let mut config = Self::default();
        merge_headers(&mut config.headers, &options.headers);
        config.params = options.params.clone();
        config.cookies = options.cookies.clone();
        if let Some(redirect) = options.redirect {
            config.redirect = redirect;
        }
        if let Some(verify) = options.verify {
            config.verify = verify;
        }
        if let Some(ref proxy) = options.proxy {
            config.proxy = Some(proxy.clone());
        }
        config
    }

    /// Add default header
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        insert_header(&mut self.headers, name.as_ref(), value.as_ref());
        self
    }

    /// Merge default headers
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        merge_headers(&mut self.headers, &headers);
        self
    }

    /// Add default query parameter
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Add initial cookie
    pub fn cookie(mut self, cookie: Cookie) -> Self {
        self.cookies.push(cookie);
        self
    }

    /// Seed the cookie jar from a JSON export
    pub fn cookies_from_json(mut self, json: &str) -> Result<Self> {
        self.cookies.extend(CookieJar::from_json(json)?.snapshot());
        Ok(self)
    }

    /// Set redirect policy
    pub fn redirect(mut self, follow: bool) -> Self {
        self.redirect = follow;
        self
    }

    /// Set redirect cap
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    /// Verify TLS certificates
    pub fn verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Set proxy
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Force a text encoding on responses
    pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Transport settings derived from this config
    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            verify: self.verify,
            proxy: self.proxy.clone().filter(|p| !p.is_empty()),
            user_agent: self.user_agent.clone(),
            ..TransportConfig::default()
        }
    }
}
