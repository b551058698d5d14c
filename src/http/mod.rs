// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP session pipeline
//!
//! Options are resolved against session defaults into a [`Request`], the
//! request is prepared (body encoding, query merge, cookie scoping), sent
//! through a [`Transport`], and redirects are followed until a final
//! [`Response`] with its history.

pub mod body;
mod cookie;
pub mod encoding;
pub(crate) mod options;
pub mod redirect;
mod request;
mod response;
mod session;
mod transport;

pub use cookie::{cookie_header, cookies_from_map, Cookie, CookieJar};
pub use encoding::{BodyKind, EncodedBody, RequestBody};
pub use options::{Data, Defaults, Files, JsonBody, Params, RequestOption, RequestOptions};
pub use request::{PreparedRequest, Request};
pub use response::Response;
pub use session::Session;
pub use transport::{RawResponse, ReqwestTransport, Transport, TransportConfig};

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str = concat!("requests/", env!("CARGO_PKG_VERSION"));
