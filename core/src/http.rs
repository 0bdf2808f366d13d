//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. The core builds `HttpRequest`
//! values and classifies `HttpResponse` values without touching the network;
//! the gateway executes the round-trip with whatever transport it holds.
//! Every upstream call is a GET, so the request carries no method or body.
//!
//! Response bodies stay raw bytes. Previews and excerpts cut the bytes first
//! and decode afterwards, so a split multi-byte character shows up as U+FFFD.

/// An outbound GET request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// An upstream response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Case-insensitive header lookup; the first match wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The `Content-Type` header, or an empty string.
    pub fn content_type(&self) -> &str {
        self.header("content-type").unwrap_or("")
    }

    /// The first `max` bytes of the body, decoded lossily.
    pub fn excerpt(&self, max: usize) -> String {
        excerpt(&self.body, max)
    }

    /// True when the body opens with an HTML document marker.
    pub fn is_html(&self) -> bool {
        looks_like_html(&self.body)
    }

    /// True when the content type says JSON or the body opens an object.
    pub fn is_json(&self) -> bool {
        self.content_type().contains("application/json") || self.body.first() == Some(&b'{')
    }
}

pub fn excerpt(body: &[u8], max: usize) -> String {
    let end = body.len().min(max);
    String::from_utf8_lossy(&body[..end]).into_owned()
}

pub fn looks_like_html(body: &[u8]) -> bool {
    let start = body
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(body.len());
    let head = &body[start..];
    starts_with_ignore_case(head, b"<!doctype html") || starts_with_ignore_case(head, b"<html")
}

fn starts_with_ignore_case(haystack: &[u8], prefix: &[u8]) -> bool {
    haystack.len() >= prefix.len() && haystack[..prefix.len()].eq_ignore_ascii_case(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(headers: &[(&str, &str)], body: &[u8]) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: body.to_vec(),
        }
    }

    #[test]
    fn header_lookup_ignores_case() {
        let resp = response(&[("Content-Type", "application/json; charset=utf-8")], b"{}");
        assert_eq!(resp.header("content-type"), Some("application/json; charset=utf-8"));
        assert_eq!(resp.content_type(), "application/json; charset=utf-8");
        assert!(resp.header("x-missing").is_none());
    }

    #[test]
    fn excerpt_truncates_bytes() {
        assert_eq!(excerpt(b"abcdef", 3), "abc");
        assert_eq!(excerpt(b"ab", 200), "ab");
        assert_eq!(excerpt(b"", 10), "");
    }

    #[test]
    fn excerpt_replaces_split_character() {
        // "é" is two bytes; cutting after the first leaves an invalid tail.
        let body = "aé".as_bytes();
        assert_eq!(excerpt(body, 2), "a\u{FFFD}");
    }

    #[test]
    fn html_detection() {
        assert!(looks_like_html(b"<!DOCTYPE html><html></html>"));
        assert!(looks_like_html(b"  \n<!doctype HTML>"));
        assert!(looks_like_html(b"<html lang=\"en\">"));
        assert!(!looks_like_html(b"{\"items\":[]}"));
        assert!(!looks_like_html(b"<!DOC"));
        assert!(!looks_like_html(b""));
    }

    #[test]
    fn json_detection_uses_header_or_first_byte() {
        assert!(response(&[("content-type", "application/json")], b"[]").is_json());
        assert!(response(&[], b"{\"a\":1}").is_json());
        assert!(!response(&[("content-type", "text/html")], b"<html>").is_json());
    }
}
