//! Multipart framing for the FCM batch endpoint.
//!
//! Each message becomes one `application/http` sub-request inside a single
//! `multipart/mixed` outer request. Sub-responses come back in the same
//! framing, correlated by `Content-ID` rather than position; the dispatcher
//! in [`crate::client`] assembles the ordered outcome list from the parsed
//! parts.

use serde::Serialize;

/// Boundary token for outgoing batch bodies
const PART_BOUNDARY: &str = "__END_OF_PART__";

/// A framed outgoing batch request
#[derive(Debug)]
pub(crate) struct EncodedBatch {
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Frames each serialized envelope into one sub-request of a
/// `multipart/mixed` body.
///
/// `send_path` is the request target of every embedded sub-request (they all
/// address the same logical send endpoint). Content-IDs are 1-based input
/// positions.
pub(crate) fn encode_batch<T: Serialize>(
    send_path: &str,
    requests: &[T],
) -> Result<EncodedBatch, serde_json::Error> {
    let mut body = String::new();

    for (index, request) in requests.iter().enumerate() {
        let payload = serde_json::to_string(request)?;
        body.push_str(&format!("--{PART_BOUNDARY}\r\n"));
        body.push_str("Content-Type: application/http\r\n");
        body.push_str("Content-Transfer-Encoding: binary\r\n");
        body.push_str(&format!("Content-ID: {}\r\n", index + 1));
        body.push_str("\r\n");
        body.push_str(&format!("POST {send_path} HTTP/1.1\r\n"));
        body.push_str("Content-Type: application/json; charset=UTF-8\r\n");
        body.push_str("\r\n");
        body.push_str(&payload);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{PART_BOUNDARY}--\r\n"));

    Ok(EncodedBatch {
        content_type: format!("multipart/mixed; boundary={PART_BOUNDARY}"),
        body: body.into_bytes(),
    })
}

/// One sub-response extracted from the outer multipart payload
#[derive(Debug, PartialEq)]
pub(crate) struct SubResponse {
    /// Zero-based input slot from the `Content-ID` header, when present and
    /// parseable
    pub content_id: Option<usize>,
    pub status: u16,
    pub body: String,
}

/// Extracts the boundary token from the outer response content type
pub(crate) fn boundary_from_content_type(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .map(str::trim)
        .find_map(|param| param.strip_prefix("boundary="))
        .map(|boundary| boundary.trim_matches('"').to_string())
        .filter(|boundary| !boundary.is_empty())
}

/// Splits a `multipart/mixed` payload into its sub-responses.
///
/// Parts that cannot be parsed down to an embedded status line are dropped
/// here; the dispatcher reports the corresponding input slots as failures.
pub(crate) fn decode_batch(boundary: &str, payload: &str) -> Vec<SubResponse> {
    let delimiter = format!("--{boundary}");
    let mut parts = Vec::new();

    let mut segments = payload.split(delimiter.as_str());
    // Everything before the first delimiter is preamble
    segments.next();

    for segment in segments {
        if segment.starts_with("--") {
            // Closing delimiter
            break;
        }
        if let Some(part) = parse_part(segment) {
            parts.push(part);
        }
    }

    parts
}

fn parse_part(segment: &str) -> Option<SubResponse> {
    let segment = strip_leading_newline(segment);

    // Part headers, then the embedded HTTP response
    let (part_headers, embedded) = split_once_blank_line(segment)?;
    let content_id = part_headers.lines().find_map(parse_content_id);

    // Embedded response: status line and headers, then the payload
    let (head, body) = split_once_blank_line(embedded).unwrap_or((embedded, ""));
    let status = parse_status_line(head.lines().next()?)?;

    Some(SubResponse {
        content_id,
        status,
        body: body.trim_end().to_string(),
    })
}

fn strip_leading_newline(text: &str) -> &str {
    let text = text.strip_prefix("\r\n").unwrap_or(text);
    text.strip_prefix('\n').unwrap_or(text)
}

fn split_once_blank_line(text: &str) -> Option<(&str, &str)> {
    let crlf = text.find("\r\n\r\n").map(|index| (index, 4));
    let lf = text.find("\n\n").map(|index| (index, 2));
    let (index, len) = match (crlf, lf) {
        (Some(a), Some(b)) => {
            if a.0 <= b.0 {
                a
            } else {
                b
            }
        }
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (None, None) => return None,
    };
    Some((&text[..index], &text[index + len..]))
}

/// Parses `Content-ID: response-<n>` (or a bare `<n>`) into a zero-based slot
fn parse_content_id(line: &str) -> Option<usize> {
    let (name, value) = line.split_once(':')?;
    if !name.trim().eq_ignore_ascii_case("content-id") {
        return None;
    }
    let value = value.trim().trim_matches(['<', '>']);
    let value = value.strip_prefix("response-").unwrap_or(value);
    let id: usize = value.parse().ok()?;
    // Wire ids are 1-based
    id.checked_sub(1)
}

fn parse_status_line(line: &str) -> Option<u16> {
    let mut tokens = line.split_whitespace();
    let version = tokens.next()?;
    if !version.starts_with("HTTP/") {
        return None;
    }
    tokens.next()?.parse().ok()
}
