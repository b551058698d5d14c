// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Cookies and the append-only session cookie jar
//!
//! Scoping is deliberately simple: a cookie is sent when it has no domain
//! or its domain equals the request host, and when it has no path or the
//! request path starts with its path. No suffix matching, no expiry or
//! `Secure` enforcement.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use url::Url;

/// A single HTTP cookie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// Host the cookie is restricted to
    pub domain: Option<String>,
    /// Path prefix the cookie is restricted to
    pub path: Option<String>,
    /// Expiration time as announced by the server (informational)
    pub expires: Option<DateTime<Utc>>,
    /// Secure flag as announced by the server (informational)
    pub secure: bool,
    /// HttpOnly flag as announced by the server (informational)
    pub http_only: bool,
}

impl Cookie {
    /// Create a new unscoped cookie
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: None,
            path: None,
            expires: None,
            secure: false,
            http_only: false,
        }
    }

    /// Set the domain
    ///
    /// Stored lowercase without a leading dot, like parsed domains.
    pub fn domain(mut self, domain: impl AsRef<str>) -> Self {
        self.domain = Some(domain.as_ref().trim_start_matches('.').to_lowercase());
        self
    }

    /// Set the path
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Check if the cookie should be attached to a request for `url`
    pub fn matches(&self, url: &Url) -> bool {
        if let Some(ref domain) = self.domain {
            if url.host_str() != Some(domain.as_str()) {
                return false;
            }
        }

        if let Some(ref path) = self.path {
            if !url.path().starts_with(path.as_str()) {
                return false;
            }
        }

        true
    }

    /// Parse a Set-Cookie header value
    ///
    /// Domain and path stay unset unless the header carries them.
    pub fn parse(header: &str) -> Option<Self> {
        let mut parts = header.split(';');
        let first = parts.next()?.trim();

        let (name, value) = first.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let mut cookie = Cookie::new(name, value.trim().trim_matches('"'));

        for part in parts {
            let part = part.trim();
            if let Some((attr, val)) = part.split_once('=') {
                let attr = attr.trim().to_lowercase();
                let val = val.trim();
                match attr.as_str() {
                    "domain" => {
                        let domain = val.trim_start_matches('.');
                        if !domain.is_empty() {
                            cookie.domain = Some(domain.to_lowercase());
                        }
                    }
                    "path" => {
                        if !val.is_empty() {
                            cookie.path = Some(val.to_string());
                        }
                    }
                    "expires" => {
                        if let Ok(dt) = DateTime::parse_from_rfc2822(val) {
                            cookie.expires = Some(dt.with_timezone(&Utc));
                        }
                    }
                    "max-age" => {
                        if let Ok(secs) = val.parse::<i64>() {
                            cookie.expires = Some(Utc::now() + chrono::Duration::seconds(secs));
                        }
                    }
                    _ => {}
                }
            } else {
                match part.to_lowercase().as_str() {
                    "secure" => cookie.secure = true,
                    "httponly" => cookie.http_only = true,
                    _ => {}
                }
            }
        }

        Some(cookie)
    }

    /// Convert to cookie header format
    pub fn to_header_value(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

/// Turn a name/value map into unscoped cookies
pub fn cookies_from_map(map: &BTreeMap<String, String>) -> Vec<Cookie> {
    map.iter().map(|(k, v)| Cookie::new(k, v)).collect()
}

/// Build the `Cookie` request header for `url` out of `cookies`
pub fn cookie_header(cookies: &[Cookie], url: &Url) -> Option<String> {
    let value = cookies
        .iter()
        .filter(|c| c.matches(url))
        .map(Cookie::to_header_value)
        .collect::<Vec<_>>()
        .join("; ");

    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Thread-safe, append-only cookie storage
///
/// Cookies are never replaced or deduplicated: a later cookie with the same
/// name simply sits next to the earlier one.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    cookies: Arc<RwLock<Vec<Cookie>>>,
}

impl CookieJar {
    /// Create a new empty cookie jar
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a jar seeded with `cookies`
    pub fn with_cookies(cookies: Vec<Cookie>) -> Self {
        Self {
            cookies: Arc::new(RwLock::new(cookies)),
        }
    }

    /// Append a cookie
    pub fn add(&self, cookie: Cookie) {
        self.cookies.write().push(cookie);
    }

    /// Append several cookies, keeping their order
    pub fn extend(&self, cookies: impl IntoIterator<Item = Cookie>) {
        self.cookies.write().extend(cookies);
    }

    /// Copy of every stored cookie, oldest first
    pub fn snapshot(&self) -> Vec<Cookie> {
        self.cookies.read().clone()
    }

    /// Cookies that would be attached to a request for `url`
    pub fn matching(&self, url: &Url) -> Vec<Cookie> {
        self.cookies
            .read()
            .iter()
            .filter(|c| c.matches(url))
            .cloned()
            .collect()
    }

    /// Get total cookie count
    pub fn len(&self) -> usize {
        self.cookies.read().len()
    }

    /// Check if jar is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Export all cookies as JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&*self.cookies.read())
    }

    /// Import cookies from JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let cookies: Vec<Cookie> = serde_json::from_str(json)?;
        Ok(Self::with_cookies(cookies))
    }
}
