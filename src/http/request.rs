// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request descriptor and its transport-ready form

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, COOKIE};
use reqwest::Method;
use url::Url;

use super::cookie::{cookie_header, Cookie};
use super::encoding::{encode_body, RequestBody};
use super::options::{Data, Files, JsonBody, Params};
use crate::error::{Error, Result};

/// One fully resolved HTTP attempt
///
/// Built by [`RequestOptions::resolve`](super::RequestOptions::resolve) or by
/// the redirect engine, then frozen by [`Request::prepare`].
#[derive(Debug, Clone)]
pub struct Request {
    /// Request method
    pub method: Method,
    /// Request URL; holds the merged query once prepared
    pub url: Url,
    /// Request headers; holds the body Content-Type once prepared
    pub headers: HeaderMap,
    /// Query parameters appended to the URL query
    pub params: Params,
    /// Candidate cookies, filtered by scope when prepared
    pub cookies: Vec<Cookie>,
    /// JSON body
    pub json: Option<JsonBody>,
    /// Form fields
    pub data: Option<Data>,
    /// File fields
    pub files: Option<Files>,
    /// Encoded JSON or form body, set once prepared
    ///
    /// Multipart bodies are streamed by the transport and not kept here.
    pub body: Option<Bytes>,
}

/// What actually goes over the wire
#[derive(Debug)]
pub struct PreparedRequest {
    /// Request method
    pub method: Method,
    /// Final URL
    pub url: Url,
    /// Final headers, including `Cookie`
    pub headers: HeaderMap,
    /// Encoded body
    pub body: Option<RequestBody>,
}

impl Request {
    /// Create a bare request without options
    pub fn new(method: Method, url: impl AsRef<str>) -> Result<Self> {
        let url = Url::parse(url.as_ref()).map_err(|e| Error::invalid_url(url.as_ref(), e))?;
        Ok(Self {
            method,
            url,
            headers: HeaderMap::new(),
            params: Params::new(),
            cookies: Vec::new(),
            json: None,
            data: None,
            files: None,
            body: None,
        })
    }

    /// Encode the body, merge the query and pick the cookies to send
    ///
    /// The chosen Content-Type and the merged URL are written back into the
    /// descriptor so it reflects what was sent.
    pub fn prepare(&mut self) -> Result<PreparedRequest> {
        let explicit_content_type = self
            .headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let mut body = None;
        if let Some(encoded) = encode_body(
            self.json.as_ref(),
            self.files.as_ref(),
            self.data.as_ref(),
            explicit_content_type.as_deref(),
        )? {
            let content_type = HeaderValue::try_from(encoded.content_type.as_str())
                .map_err(|e| Error::InvalidBody(format!("invalid content type: {}", e)))?;
            self.headers.insert(CONTENT_TYPE, content_type);
            if let RequestBody::Bytes(ref bytes) = encoded.body {
                self.body = Some(bytes.clone());
            }
            body = Some(encoded.body);
        }

        if !self.params.is_empty() {
            let mut pairs = self.url.query_pairs_mut();
            for (k, v) in &self.params {
                pairs.append_pair(k, v);
            }
        }

        let mut headers = self.headers.clone();
        if let Some(cookies) = cookie_header(&self.cookies, &self.url) {
            match HeaderValue::try_from(cookies) {
                Ok(value) => {
                    headers.append(COOKIE, value);
                }
                Err(_) => tracing::warn!(url = %self.url, "Skipping unencodable Cookie header"),
            }
        }

        tracing::debug!(
            method = %self.method,
            url = %self.url,
            body_len = self.body.as_ref().map_or(0, Bytes::len),
            multipart = body.as_ref().map_or(false, RequestBody::is_multipart),
            "Prepared request"
        );

        Ok(PreparedRequest {
            method: self.method.clone(),
            url: self.url.clone(),
            headers,
            body,
        })
    }

    /// Get the host
    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }
}
