// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request options and their resolution into a request descriptor
//!
//! Options are layered on top of the session defaults:
//!
//! - headers and params are seeded from the session, then merged key by key,
//!   later values overwriting earlier ones
//! - body options (JSON, form data, files) replace any earlier option of the
//!   same kind wholesale
//! - cookies are appended after the session cookies
//! - `Redirect`, `Verify` and `Proxy` only take effect when a session is
//!   built from the options; a session that already exists ignores them

use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::Serialize;
use url::Url;

use super::cookie::{cookies_from_map, Cookie};
use super::request::Request;
use crate::error::{Error, Result};

/// Query parameters
pub type Params = BTreeMap<String, String>;

/// Form fields
pub type Data = BTreeMap<String, String>;

/// File fields, sent as raw bytes
pub type Files = BTreeMap<String, Vec<u8>>;

/// JSON object body
pub type JsonBody = serde_json::Map<String, serde_json::Value>;

/// A single configuration option
#[derive(Debug, Clone)]
pub enum RequestOption {
    /// Headers, merged key by key
    Headers(HeaderMap),
    /// Query parameters, merged key by key
    Params(Params),
    /// JSON body; disables form data and files
    Json(JsonBody),
    /// Form body
    Data(Data),
    /// Multipart file fields
    Files(Files),
    /// Cookies by name, appended without domain or path
    Cookies(BTreeMap<String, String>),
    /// Explicit cookie list, appended
    CookieList(Vec<Cookie>),
    /// Follow redirects (session construction only)
    Redirect(bool),
    /// Verify TLS certificates (session construction only)
    Verify(bool),
    /// Fixed proxy URL (session construction only)
    Proxy(String),
}

/// Resolved option set for one call
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: HeaderMap,
    pub params: Params,
    pub json: Option<JsonBody>,
    pub data: Option<Data>,
    pub files: Option<Files>,
    pub cookies: Vec<Cookie>,
    pub redirect: Option<bool>,
    pub verify: Option<bool>,
    pub proxy: Option<String>,
}

/// Session-level values every request starts from
#[derive(Debug, Clone, Default)]
pub struct Defaults {
    pub headers: HeaderMap,
    pub params: Params,
    pub cookies: Vec<Cookie>,
}

impl RequestOptions {
    /// Create an empty option set
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold an ordered option list, skipping absent entries
    pub fn from_options<I>(options: I) -> Self
    where
        I: IntoIterator<Item = Option<RequestOption>>,
    {
        options
            .into_iter()
            .flatten()
            .fold(Self::default(), |mut acc, opt| {
                acc.apply(opt);
                acc
            })
    }

    /// Apply one option on top of the current set
    pub fn apply(&mut self, option: RequestOption) {
        match option {
            RequestOption::Headers(headers) => merge_headers(&mut self.headers, &headers),
            RequestOption::Params(params) => self.params.extend(params),
            RequestOption::Json(json) => self.json = Some(json),
            RequestOption::Data(data) => self.data = Some(data),
            RequestOption::Files(files) => self.files = Some(files),
            RequestOption::Cookies(map) => self.cookies.extend(cookies_from_map(&map)),
            RequestOption::CookieList(list) => self.cookies.extend(list),
            RequestOption::Redirect(follow) => self.redirect = Some(follow),
            RequestOption::Verify(verify) => self.verify = Some(verify),
            RequestOption::Proxy(proxy) => self.proxy = Some(proxy),
        }
    }

    /// Set a header
    ///
    /// Names or values that are not valid HTTP are skipped.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        insert_header(&mut self.headers, name.as_ref(), value.as_ref());
        self
    }

    /// Merge a header map
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.apply(RequestOption::Headers(headers));
        self
    }

    /// Set a query parameter
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Merge query parameters
    pub fn params(mut self, params: Params) -> Self {
        self.apply(RequestOption::Params(params));
        self
    }

    /// Replace the JSON body
    pub fn json(mut self, json: JsonBody) -> Self {
        self.apply(RequestOption::Json(json));
        self
    }

    /// Replace the JSON body with any serializable object
    pub fn json_value<T: Serialize>(self, value: &T) -> Result<Self> {
        match serde_json::to_value(value)? {
            serde_json::Value::Object(map) => Ok(self.json(map)),
            other => Err(Error::InvalidBody(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Replace the form data
    pub fn data(mut self, data: Data) -> Self {
        self.apply(RequestOption::Data(data));
        self
    }

    /// Add one form field
    pub fn data_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.data
            .get_or_insert_with(Data::new)
            .insert(name.into(), value.into());
        self
    }

    /// Replace the file fields
    pub fn files(mut self, files: Files) -> Self {
        self.apply(RequestOption::Files(files));
        self
    }

    /// Add one file field
    pub fn file(mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.files
            .get_or_insert_with(Files::new)
            .insert(name.into(), content.into());
        self
    }

    /// Append an unscoped cookie
    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push(Cookie::new(name, value));
        self
    }

    /// Append cookies
    pub fn cookies(mut self, cookies: Vec<Cookie>) -> Self {
        self.apply(RequestOption::CookieList(cookies));
        self
    }

    /// Set the redirect policy for a session built from these options
    pub fn redirect(mut self, follow: bool) -> Self {
        self.redirect = Some(follow);
        self
    }

    /// Set certificate verification for a session built from these options
    pub fn verify(mut self, verify: bool) -> Self {
        self.verify = Some(verify);
        self
    }

    /// Set a fixed proxy for a session built from these options
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Keep only the body options
    ///
    /// The rest is carried by the session the one-shot helpers build.
    pub(crate) fn body_only(self) -> Self {
        Self {
            json: self.json,
            data: self.data,
            files: self.files,
            ..Self::default()
        }
    }

    /// Resolve into a request descriptor on top of `defaults`
    pub fn resolve(self, method: Method, url: &str, defaults: &Defaults) -> Result<Request> {
        let url = Url::parse(url).map_err(|e| Error::invalid_url(url, e))?;

        let mut headers = defaults.headers.clone();
        merge_headers(&mut headers, &self.headers);

        let mut params = defaults.params.clone();
        params.extend(self.params);

        let mut cookies = defaults.cookies.clone();
        cookies.extend(self.cookies);

        Ok(Request {
            method,
            url,
            headers,
            params,
            cookies,
            json: self.json,
            data: self.data,
            files: self.files,
            body: None,
        })
    }
}

impl FromIterator<RequestOption> for RequestOptions {
    fn from_iter<I: IntoIterator<Item = RequestOption>>(iter: I) -> Self {
        Self::from_options(iter.into_iter().map(Some))
    }
}

/// Overwrite `target` with every header in `source`, key by key
pub(crate) fn merge_headers(target: &mut HeaderMap, source: &HeaderMap) {
    for name in source.keys() {
        target.remove(name);
        for value in source.get_all(name) {
            target.append(name.clone(), value.clone());
        }
    }
}

/// Insert a header from strings, skipping invalid names or values
pub(crate) fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) {
    match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
        (Ok(name), Ok(value)) => {
            headers.insert(name, value);
        }
        _ => tracing::warn!(header = name, "Skipping invalid header"),
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn header_map(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            insert_header(&mut map, k, v);
        }
        map
    }

    #[test]
    fn test_later_header_wins() {
        let opts = RequestOptions::from_options(vec![
            Some(RequestOption::Headers(header_map(&[("X-Token", "first")]))),
            None,
            Some(RequestOption::Headers(header_map(&[("x-token", "second")]))),
        ]);
        assert_eq!(opts.headers.get("x-token").unwrap(), "second");
        assert_eq!(opts.headers.len(), 1);
    }

    #[test]
    fn test_call_headers_override_session_defaults() {
        let defaults = Defaults {
            headers: header_map(&[("accept", "text/html"), ("x-session", "1")]),
            ..Default::default()
        };
        let req = RequestOptions::new()
            .header("Accept", "application/json")
            .resolve(Method::GET, "http://example.com/", &defaults)
            .unwrap();

        assert_eq!(req.headers.get("accept").unwrap(), "application/json");
        assert_eq!(req.headers.get("x-session").unwrap(), "1");
    }

    #[test]
    fn test_params_merge_key_by_key() {
        let mut defaults = Defaults::default();
        defaults.params.insert("a".into(), "session".into());
        defaults.params.insert("b".into(), "session".into());

        let req = RequestOptions::new()
            .param("a", "call")
            .resolve(Method::GET, "http://example.com/", &defaults)
            .unwrap();

        assert_eq!(req.params.get("a").map(String::as_str), Some("call"));
        assert_eq!(req.params.get("b").map(String::as_str), Some("session"));
    }

    #[test]
    fn test_body_options_replace_wholesale() {
        let first: Data = [("a".to_string(), "1".to_string())].into();
        let second: Data = [("b".to_string(), "2".to_string())].into();
        let opts: RequestOptions = vec![RequestOption::Data(first), RequestOption::Data(second)]
            .into_iter()
            .collect();

        let data = opts.data.unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data.get("b").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_cookies_appended_after_session_cookies() {
        let defaults = Defaults {
            cookies: vec![Cookie::new("session", "s")],
            ..Default::default()
        };
        let map: BTreeMap<String, String> = [("call".to_string(), "c".to_string())].into();
        let opts = RequestOptions::from_options(vec![
            Some(RequestOption::Cookies(map)),
            Some(RequestOption::CookieList(vec![Cookie::new("list", "l").path("/")])),
        ]);
        let req = opts
            .resolve(Method::GET, "http://example.com/", &defaults)
            .unwrap();

        let names: Vec<_> = req.cookies.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["session", "call", "list"]);
        assert_eq!(req.cookies[1].domain, None);
        assert_eq!(req.cookies[1].path, None);
    }

    #[test]
    fn test_json_value_requires_object() {
        let ok = RequestOptions::new().json_value(&json!({"x": [1, 2]})).unwrap();
        assert!(ok.json.is_some());

        let err = RequestOptions::new().json_value(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, Error::InvalidBody(_)));
    }

    #[test]
    fn test_invalid_url_is_reported() {
        let err = RequestOptions::new()
            .resolve(Method::GET, "::not-a-url", &Defaults::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "failed to parse URL: ::not-a-url");
    }

    #[test]
    fn test_invalid_header_skipped() {
        let opts = RequestOptions::new().header("bad header", "v").header("ok", "v");
        assert_eq!(opts.headers.len(), 1);
    }
}
