// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Redirect following
//!
//! A 3xx response with a non-empty `Location` is followed while the
//! session's redirect flag is on. Each hop is a fresh GET without a body,
//! carrying the session defaults, the accumulated cookies and a `Referer`
//! pointing at the previous request. Every completed response becomes part
//! of the next response's history.

use std::sync::Arc;

use reqwest::header::REFERER;
use reqwest::Method;
use url::Url;

use super::options::{insert_header, Defaults};
use super::request::Request;
use super::response::Response;
use super::session::Session;
use crate::error::{Error, Result};

/// Drives one logical call through its redirect chain
pub struct RedirectEngine<'a> {
    session: &'a Session,
    follow: bool,
    max_redirects: usize,
}

impl<'a> RedirectEngine<'a> {
    /// Create an engine for one call
    pub fn new(session: &'a Session, follow: bool, max_redirects: usize) -> Self {
        Self {
            session,
            follow,
            max_redirects,
        }
    }

    /// Send `request` and follow redirects until a final response
    pub fn execute(self, mut request: Request) -> Result<Response> {
        let encoding = self.session.config().encoding.clone();
        let mut history: Vec<Arc<Response>> = Vec::new();

        loop {
            let raw = self.session.dispatch(&mut request)?;
            let response = Response::new(raw, request, history.clone(), encoding.as_deref());

            let next = match next_location(&response, self.follow)? {
                Some(next) => next,
                None => return Ok(response),
            };

            if history.len() >= self.max_redirects {
                return Err(Error::TooManyRedirects {
                    url: next.to_string(),
                    max: self.max_redirects,
                });
            }

            tracing::debug!(
                from = %response.url,
                to = %next,
                status = %response.status,
                hop = history.len() + 1,
                "Following redirect"
            );

            request = follow_up(&self.session.defaults(), response.request(), next);
            history.push(Arc::new(response));
        }
    }
}

/// Where to go next, if anywhere
///
/// Relative locations are resolved against the URL of the request that
/// produced `response`.
pub fn next_location(response: &Response, follow: bool) -> Result<Option<Url>> {
    if !follow || !response.is_redirect() {
        return Ok(None);
    }

    match response.location() {
        Some(location) => response
            .request()
            .url
            .join(location)
            .map(Some)
            .map_err(|e| Error::invalid_url(location, e)),
        None => Ok(None),
    }
}

/// Build the GET request for the next hop
pub fn follow_up(defaults: &Defaults, previous: &Request, location: Url) -> Request {
    let mut headers = defaults.headers.clone();
    insert_header(&mut headers, REFERER.as_str(), previous.url.as_str());

    Request {
        method: Method::GET,
        url: location,
        headers,
        params: defaults.params.clone(),
        cookies: defaults.cookies.clone(),
        json: None,
        data: None,
        files: None,
        body: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::http::options::RequestOptions;
    use crate::http::transport::mock::{Reply, ScriptedTransport};
    use reqwest::header::{CONTENT_TYPE, COOKIE};

    fn session(config: SessionConfig, replies: Vec<Reply>) -> (Session, Arc<ScriptedTransport>) {
        let transport = Arc::new(ScriptedTransport::new(replies));
        (Session::with_transport(config, transport.clone()), transport)
    }

    #[test]
    fn test_three_hop_chain_history() {
        let (session, transport) = session(
            SessionConfig::new(),
            vec![
                Reply::new(301).header("location", "/two"),
                Reply::new(301).header("location", "http://example.com/three"),
                Reply::new(200).body("done"),
            ],
        );

        let resp = session.get("http://example.com/one", RequestOptions::new()).unwrap();

        assert_eq!(resp.status_code(), 200);
        assert_eq!(resp.text().unwrap(), "done");
        assert_eq!(resp.history.len(), 2);
        assert_eq!(resp.history[0].url.as_str(), "http://example.com/one");
        assert_eq!(resp.history[1].url.as_str(), "http://example.com/two");
        // intermediate responses carry their own prefix of the chain
        assert_eq!(resp.history[0].history.len(), 0);
        assert_eq!(resp.history[1].history.len(), 1);

        let urls: Vec<_> = transport.sent().iter().map(|r| r.url.to_string()).collect();
        assert_eq!(
            urls,
            vec![
                "http://example.com/one",
                "http://example.com/two",
                "http://example.com/three"
            ]
        );
    }

    #[test]
    fn test_redirect_disabled_returns_3xx() {
        let (session, transport) = session(
            SessionConfig::new().redirect(false),
            vec![Reply::new(302).header("location", "/elsewhere")],
        );

        let resp = session.get("http://example.com/", RequestOptions::new()).unwrap();
        assert_eq!(resp.status_code(), 302);
        assert!(resp.history.is_empty());
        assert_eq!(transport.sent().len(), 1);
    }

    #[test]
    fn test_per_call_redirect_ignored_by_existing_session() {
        // Only the one-shot helpers honor a per-call redirect flag.
        let (session, transport) = session(
            SessionConfig::new(),
            vec![
                Reply::new(302).header("location", "/next"),
                Reply::new(200),
            ],
        );

        let resp = session
            .get("http://example.com/", RequestOptions::new().redirect(false))
            .unwrap();
        assert_eq!(resp.status_code(), 200);
        assert_eq!(resp.history.len(), 1);
        assert_eq!(transport.sent().len(), 2);
    }

    #[test]
    fn test_location_on_non_3xx_is_not_followed() {
        let (session, _) = session(
            SessionConfig::new(),
            vec![Reply::new(201).header("location", "/created/1")],
        );
        let resp = session.post("http://example.com/items", RequestOptions::new()).unwrap();
        assert_eq!(resp.status_code(), 201);
    }

    #[test]
    fn test_follow_up_request_shape() {
        let config = SessionConfig::new()
            .header("x-session", "1")
            .param("lang", "en");
        let (session, transport) = session(
            config,
            vec![
                Reply::new(303)
                    .header("location", "/done")
                    .header("set-cookie", "sid=abc"),
                Reply::new(200),
            ],
        );

        session
            .post(
                "http://example.com/submit",
                RequestOptions::new()
                    .header("x-call", "only-first")
                    .json(serde_json::Map::new()),
            )
            .unwrap();

        let sent = transport.sent();
        let hop = &sent[1];
        assert_eq!(hop.method, Method::GET);
        assert!(hop.body.is_none());
        assert!(hop.headers.get(CONTENT_TYPE).is_none());
        assert!(hop.headers.get("x-call").is_none());
        assert_eq!(hop.headers.get("x-session").unwrap(), "1");
        assert_eq!(
            hop.headers.get(REFERER).unwrap(),
            "http://example.com/submit?lang=en"
        );
        assert_eq!(hop.url.as_str(), "http://example.com/done?lang=en");
        assert_eq!(hop.headers.get(COOKIE).unwrap(), "sid=abc");
    }

    #[test]
    fn test_redirect_cap() {
        let replies = (0..3)
            .map(|_| Reply::new(302).header("location", "/loop"))
            .collect();
        let (session, transport) = session(SessionConfig::new().max_redirects(2), replies);

        let err = session.get("http://example.com/loop", RequestOptions::new()).unwrap_err();
        assert!(matches!(err, Error::TooManyRedirects { max: 2, .. }));
        assert_eq!(transport.sent().len(), 3);
    }

    #[test]
    fn test_cookies_across_chain() {
        let (session, _) = session(
            SessionConfig::new(),
            vec![
                Reply::new(302)
                    .header("location", "/b")
                    .header("set-cookie", "first=1"),
                Reply::new(200).header("set-cookie", "second=2"),
            ],
        );

        let resp = session.get("http://example.com/a", RequestOptions::new()).unwrap();
        let names: Vec<_> = resp.cookies().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(session.cookies().len(), 2);
    }

    #[test]
    fn test_bad_location_is_url_error() {
        let (session, _) = session(
            SessionConfig::new(),
            vec![Reply::new(302).header("location", "http://[::1")],
        );
        let err = session.get("http://example.com/", RequestOptions::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { .. }));
    }
}
