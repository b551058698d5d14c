// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request body encoding policy
//!
//! Exactly one body kind is chosen per request, in this order:
//! JSON, then multipart (files, plus any form data), then
//! URL-encoded form data, then no body at all.

use std::fmt;

use bytes::Bytes;
use reqwest::blocking::multipart::{Form, Part};

use super::options::{Data, Files, JsonBody};
use crate::error::Result;

/// `application/json`
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// `application/x-www-form-urlencoded`
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// The mutually exclusive request body representations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Compact JSON object
    Json,
    /// `multipart/form-data` with flattened file and data fields
    Multipart,
    /// `application/x-www-form-urlencoded`
    Form,
    /// No body
    Empty,
}

impl BodyKind {
    /// Pick the body kind from the options that are present
    ///
    /// Presence is what counts: an empty JSON map still selects JSON.
    pub fn select(json: Option<&JsonBody>, files: Option<&Files>, data: Option<&Data>) -> Self {
        if json.is_some() {
            BodyKind::Json
        } else if files.is_some() {
            BodyKind::Multipart
        } else if data.is_some() {
            BodyKind::Form
        } else {
            BodyKind::Empty
        }
    }
}

/// Encoded request body as handed to the transport
pub enum RequestBody {
    /// Fully serialized JSON or form body
    Bytes(Bytes),
    /// Multipart form, streamed by the transport under its own boundary
    Multipart(Form),
}

impl RequestBody {
    /// Serialized bytes, when the body is not multipart
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            RequestBody::Bytes(bytes) => Some(bytes.as_ref()),
            RequestBody::Multipart(_) => None,
        }
    }

    /// Whether this is a multipart form
    pub fn is_multipart(&self) -> bool {
        matches!(self, RequestBody::Multipart(_))
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestBody::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            RequestBody::Multipart(form) => f
                .debug_tuple("Multipart")
                .field(&form.boundary())
                .finish(),
        }
    }
}

/// A wire-ready body together with the Content-Type it must be sent with
#[derive(Debug)]
pub struct EncodedBody {
    /// Body kind that produced this body
    pub kind: BodyKind,
    /// Encoded body
    pub body: RequestBody,
    /// Content-Type to send
    pub content_type: String,
}

/// Encode the request body
///
/// `explicit_content_type` is the caller's own Content-Type header, which
/// wins for JSON and URL-encoded bodies. Multipart always uses the
/// generated boundary type.
pub fn encode_body(
    json: Option<&JsonBody>,
    files: Option<&Files>,
    data: Option<&Data>,
    explicit_content_type: Option<&str>,
) -> Result<Option<EncodedBody>> {
    let kind = BodyKind::select(json, files, data);
    let keep_or = |default: &str| {
        explicit_content_type
            .filter(|ct| !ct.is_empty())
            .unwrap_or(default)
            .to_string()
    };

    let encoded = match (kind, json, files) {
        (BodyKind::Json, Some(json), _) => EncodedBody {
            kind,
            body: RequestBody::Bytes(Bytes::from(serde_json::to_vec(json)?)),
            content_type: keep_or(JSON_CONTENT_TYPE),
        },
        (BodyKind::Multipart, _, Some(files)) => {
            let form = encode_multipart(multipart_fields(files, data));
            EncodedBody {
                kind,
                content_type: format!("multipart/form-data; boundary={}", form.boundary()),
                body: RequestBody::Multipart(form),
            }
        }
        (BodyKind::Form, _, _) => EncodedBody {
            kind,
            body: RequestBody::Bytes(Bytes::from(encode_form(data.into_iter().flatten()))),
            content_type: keep_or(FORM_CONTENT_TYPE),
        },
        _ => return Ok(None),
    };

    Ok(Some(encoded))
}

/// URL-encode key/value pairs as a form body or query string
pub fn encode_form<'a>(pairs: impl IntoIterator<Item = (&'a String, &'a String)>) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

/// Multipart fields in wire order: file fields first, then data fields
pub fn multipart_fields(files: &Files, data: Option<&Data>) -> Vec<(String, Vec<u8>)> {
    files
        .iter()
        .map(|(name, content)| (name.clone(), content.clone()))
        .chain(
            data.into_iter()
                .flatten()
                .map(|(name, value)| (name.clone(), value.clone().into_bytes())),
        )
        .collect()
}

/// Build a multipart form from ordered fields
///
/// Every field is a plain part carrying the raw bytes, without a filename
/// or content type.
fn encode_multipart(fields: Vec<(String, Vec<u8>)>) -> Form {
    fields
        .into_iter()
        .fold(Form::new(), |form, (name, value)| {
            form.part(name, Part::bytes(value))
        })
}
