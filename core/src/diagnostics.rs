//! Typed records for the upstream diagnostics report.

use serde::{Deserialize, Serialize};

use crate::client::Endpoint;
use crate::http::HttpResponse;

/// Bytes of each probed body included in the report.
pub const PROBE_PREVIEW_BYTES: usize = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeVerdict {
    Success,
    Unauthorized,
    NotJson,
    UnexpectedStatus,
    TransportError,
}

impl ProbeVerdict {
    pub fn classify(status: u16, is_json: bool) -> Self {
        match (status, is_json) {
            (200, true) => ProbeVerdict::Success,
            (401, _) => ProbeVerdict::Unauthorized,
            (_, false) => ProbeVerdict::NotJson,
            _ => ProbeVerdict::UnexpectedStatus,
        }
    }
}

/// Result of probing one upstream endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeReport {
    pub name: String,
    pub url: String,
    pub description: String,
    pub status: Option<u16>,
    pub content_type: Option<String>,
    pub is_json: bool,
    pub body_length: usize,
    pub body_preview: String,
    pub verdict: ProbeVerdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProbeReport {
    pub fn from_response(endpoint: Endpoint, url: &str, response: &HttpResponse) -> Self {
        let is_json = response.is_json();
        Self {
            name: probe_name(endpoint),
            url: url.to_string(),
            description: endpoint.description().to_string(),
            status: Some(response.status),
            content_type: Some(response.content_type().to_string()),
            is_json,
            body_length: response.body.len(),
            body_preview: response.excerpt(PROBE_PREVIEW_BYTES),
            verdict: ProbeVerdict::classify(response.status, is_json),
            error: None,
        }
    }

    pub fn from_transport_error(endpoint: Endpoint, url: &str, error: impl ToString) -> Self {
        Self {
            name: probe_name(endpoint),
            url: url.to_string(),
            description: endpoint.description().to_string(),
            status: None,
            content_type: None,
            is_json: false,
            body_length: 0,
            body_preview: String::new(),
            verdict: ProbeVerdict::TransportError,
            error: Some(error.to_string()),
        }
    }
}

fn probe_name(endpoint: Endpoint) -> String {
    format!("GET {}", endpoint.path())
}
