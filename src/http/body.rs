// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Response body readers and charset conversion

use std::io::Read;

use encoding_rs::Encoding;
use flate2::read::GzDecoder;

use crate::error::{Error, Result};

/// Default text encoding
pub const UTF_8: &str = "UTF-8";

/// Read a body stream to the end, gunzipping when `content_encoding` is gzip
///
/// Any other content encoding is treated as identity.
pub fn read_body(mut body: impl Read, content_encoding: Option<&str>) -> Result<Vec<u8>> {
    let mut content = Vec::new();
    match content_encoding.map(str::trim) {
        Some(enc) if enc.eq_ignore_ascii_case("gzip") => {
            GzDecoder::new(body)
                .read_to_end(&mut content)
                .map_err(|e| Error::decode(format!("gzip: {}", e)))?;
        }
        _ => {
            body.read_to_end(&mut content)?;
        }
    }
    Ok(content)
}

/// Decompress a complete gzip buffer
pub fn decompress(bytes: &[u8]) -> Result<Vec<u8>> {
    read_body(bytes, Some("gzip"))
}

/// Convert `bytes` in `encoding` to a UTF-8 string
///
/// The label is matched case-insensitively; `UTF-8` is a fast path.
pub fn convert(bytes: &[u8], encoding: &str) -> Result<String> {
    let label = encoding.trim();
    if label.eq_ignore_ascii_case(UTF_8) || label.eq_ignore_ascii_case("utf8") {
        return Ok(String::from_utf8_lossy(bytes).into_owned());
    }

    let encoding = Encoding::for_label(label.as_bytes())
        .ok_or_else(|| Error::decode(format!("unknown encoding: {}", label)))?;
    let (text, _, _) = encoding.decode(bytes);
    Ok(text.into_owned())
}

/// Pull the `charset` parameter out of a Content-Type value
pub fn charset_from_content_type(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("charset") {
            let value = value.trim().trim_matches('"');
            (!value.is_empty()).then(|| value.to_string())
        } else {
            None
        }
    })
}
