// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP response wrapper with lazily decoded body
//!
//! The body stream is read at most once, on the first call to
//! [`Response::content`] (or anything built on it). Decoded bytes, text and
//! cookies are each cached after the first successful computation.

use std::fmt;
use std::io::Read;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;
use reqwest::header::{HeaderMap, CONTENT_ENCODING, CONTENT_TYPE, LOCATION, SET_COOKIE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use super::body::{charset_from_content_type, convert, read_body, UTF_8};
use super::cookie::Cookie;
use super::request::Request;
use super::transport::RawResponse;
use crate::error::{Error, Result};

/// HTTP response representation
pub struct Response {
    /// Response status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// URL this response came from
    pub url: Url,
    /// Earlier responses of the redirect chain, oldest first
    pub history: Vec<Arc<Response>>,
    request: Request,
    encoding: String,
    raw_body: Mutex<Option<Box<dyn Read + Send>>>,
    content: Mutex<Option<Bytes>>,
    text: Mutex<Option<String>>,
    cookies: Mutex<Option<Vec<Cookie>>>,
}

impl Response {
    /// Wrap a raw transport response
    ///
    /// `encoding` overrides the charset declared in Content-Type; without
    /// either the body is read as UTF-8.
    pub fn new(
        raw: RawResponse,
        request: Request,
        history: Vec<Arc<Response>>,
        encoding: Option<&str>,
    ) -> Self {
        let encoding = encoding
            .map(str::to_string)
            .or_else(|| {
                raw.headers
                    .get(CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .and_then(charset_from_content_type)
            })
            .unwrap_or_else(|| UTF_8.to_string());

        Self {
            status: raw.status,
            headers: raw.headers,
            url: raw.url,
            history,
            request,
            encoding,
            raw_body: Mutex::new(Some(raw.body)),
            content: Mutex::new(None),
            text: Mutex::new(None),
            cookies: Mutex::new(None),
        }
    }

    /// Check if status is success (2xx)
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Check if status is redirect (3xx)
    pub fn is_redirect(&self) -> bool {
        self.status.is_redirection()
    }

    /// Check if status is client error (4xx)
    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }

    /// Check if status is server error (5xx)
    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }

    /// Get status code as u16
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// The request descriptor that produced this response
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Encoding used by [`Response::text`]
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// Change the encoding used by [`Response::text`]
    ///
    /// Has no effect once the text has been decoded.
    pub fn set_encoding(&mut self, encoding: impl Into<String>) {
        self.encoding = encoding.into();
    }

    /// Decoded body bytes, gunzipped if needed
    pub fn content(&self) -> Result<Bytes> {
        let mut cache = self.content.lock();
        if let Some(ref content) = *cache {
            return Ok(content.clone());
        }

        let body = self
            .raw_body
            .lock()
            .take()
            .ok_or_else(|| Error::decode("response body was already consumed by a failed read"))?;
        let content = Bytes::from(read_body(body, self.header(CONTENT_ENCODING.as_str()))?);

        *cache = Some(content.clone());
        Ok(content)
    }

    /// Body as text, converted from [`Response::encoding`]
    pub fn text(&self) -> Result<String> {
        let mut cache = self.text.lock();
        if let Some(ref text) = *cache {
            return Ok(text.clone());
        }

        let text = convert(&self.content()?, &self.encoding)?;
        *cache = Some(text.clone());
        Ok(text)
    }

    /// Parse body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.content()?).map_err(Error::JsonDecode)
    }

    /// Cookies set along the whole redirect chain
    ///
    /// Every history entry's own Set-Cookie cookies in order, followed by
    /// this response's.
    pub fn cookies(&self) -> Vec<Cookie> {
        let mut cache = self.cookies.lock();
        if let Some(ref cookies) = *cache {
            return cookies.clone();
        }

        let mut cookies: Vec<Cookie> = self.history.iter().flat_map(|r| r.wire_cookies()).collect();
        cookies.extend(self.wire_cookies());

        *cache = Some(cookies.clone());
        cookies
    }

    /// Cookies from this response's own Set-Cookie headers
    pub fn wire_cookies(&self) -> Vec<Cookie> {
        self.set_cookies().into_iter().filter_map(Cookie::parse).collect()
    }

    /// Get a header value
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get all values for a header
    pub fn header_all(&self, name: &str) -> Vec<&str> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    /// Get content type
    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE.as_str())
    }

    /// Non-empty Location header
    pub fn location(&self) -> Option<&str> {
        self.header(LOCATION.as_str()).filter(|l| !l.is_empty())
    }

    /// Get Set-Cookie headers
    pub fn set_cookies(&self) -> Vec<&str> {
        self.header_all(SET_COOKIE.as_str())
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("url", &self.url.as_str())
            .field("headers", &self.headers)
            .field("history", &self.history.len())
            .field("encoding", &self.encoding)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use reqwest::header::HeaderValue;
    use reqwest::Method;
    use std::io::{self, Cursor, Write};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails any read attempted after the stream reported EOF
    struct OneShotReader {
        inner: Cursor<Vec<u8>>,
        finished: bool,
        read_to_end_calls: Arc<AtomicUsize>,
    }

    impl Read for OneShotReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.finished {
                return Err(io::Error::new(io::ErrorKind::Other, "stream already consumed"));
            }
            let n = self.inner.read(buf)?;
            if n == 0 {
                self.finished = true;
                self.read_to_end_calls.fetch_add(1, Ordering::SeqCst);
            }
            Ok(n)
        }
    }

    fn response(status: u16, headers: &[(&'static str, &'static str)], body: Box<dyn Read + Send>) -> Response {
        let mut map = HeaderMap::new();
        for (k, v) in headers {
            map.append(*k, HeaderValue::from_static(*v));
        }
        let raw = RawResponse {
            status: StatusCode::from_u16(status).unwrap(),
            headers: map,
            url: Url::parse("https://example.com/").unwrap(),
            body,
        };
        let request = Request::new(Method::GET, "https://example.com/").unwrap();
        Response::new(raw, request, Vec::new(), None)
    }

    #[test]
    fn test_content_reads_stream_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let reader = OneShotReader {
            inner: Cursor::new(b"payload".to_vec()),
            finished: false,
            read_to_end_calls: calls.clone(),
        };
        let resp = response(200, &[], Box::new(reader));

        let first = resp.content().unwrap();
        let second = resp.content().unwrap();
        assert_eq!(first, second);
        assert_eq!(&first[..], b"payload");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_gzip_content() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"compressed body").unwrap();
        let body = encoder.finish().unwrap();

        let resp = response(200, &[("content-encoding", "gzip")], Box::new(Cursor::new(body)));
        assert_eq!(resp.text().unwrap(), "compressed body");
    }

    #[test]
    fn test_text_uses_declared_charset() {
        let resp = response(
            200,
            &[("content-type", "text/plain; charset=GBK")],
            Box::new(Cursor::new(vec![0xC4, 0xE3, 0xBA, 0xC3])),
        );
        assert_eq!(resp.encoding(), "GBK");
        assert_eq!(resp.text().unwrap(), "你好");
    }

    #[test]
    fn test_json_decode() {
        #[derive(serde::Deserialize, Debug)]
        struct Body {
            ok: bool,
        }

        let resp = response(200, &[], Box::new(Cursor::new(br#"{"ok":true}"#.to_vec())));
        assert!(resp.json::<Body>().unwrap().ok);

        let bad = response(200, &[], Box::new(Cursor::new(b"{oops".to_vec())));
        let err = bad.json::<Body>().unwrap_err();
        assert!(matches!(err, Error::JsonDecode(_)));
        assert!(err.is_decode());
    }

    #[test]
    fn test_failed_read_is_not_retried() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            }
        }

        let resp = response(200, &[], Box::new(Broken));
        assert!(matches!(resp.content().unwrap_err(), Error::Io(_)));
        assert!(matches!(resp.content().unwrap_err(), Error::Decode(_)));
    }

    #[test]
    fn test_response_status() {
        let resp = response(302, &[("location", "/next")], Box::new(io::empty()));
        assert!(resp.is_redirect());
        assert_eq!(resp.status_code(), 302);
        assert_eq!(resp.location(), Some("/next"));

        let empty = response(302, &[("location", "")], Box::new(io::empty()));
        assert_eq!(empty.location(), None);

        let missing = response(404, &[], Box::new(io::empty()));
        assert!(missing.is_client_error());
        assert!(!missing.is_server_error());
        assert!(!missing.is_success());

        let failed = response(503, &[], Box::new(io::empty()));
        assert!(failed.is_server_error());
        assert!(!failed.is_client_error());
    }

    #[test]
    fn test_cookies_include_history() {
        let first = Arc::new(response(
            302,
            &[("set-cookie", "a=1; Path=/"), ("set-cookie", "b=2")],
            Box::new(io::empty()),
        ));
        let mut last = response(200, &[("set-cookie", "c=3")], Box::new(io::empty()));
        last.history = vec![first];

        let names: Vec<_> = last.cookies().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(last.wire_cookies().len(), 1);
    }
}
