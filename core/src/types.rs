//! Domain DTOs shared by the live and mock listing paths.
//!
//! # Design
//! Field names follow the upstream JSON schema (camelCase) so the gateway can
//! relay upstream payloads without a second mapping layer. The mock generator
//! produces the same types, which keeps both paths on one response shape.

use serde::{Deserialize, Serialize};

/// A single connection as reported by the upstream listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRecord {
    pub id: String,
    /// ISO-8601 creation time, relayed verbatim from upstream.
    pub created: String,
    pub remote_addr: String,
    pub bytes_received: u64,
    pub bytes_sent: u64,
    /// Session bound to this connection. Serialized as `null` when absent;
    /// a missing field on input also reads as `None`.
    #[serde(default)]
    pub session: Option<String>,
    pub tunnel: String,
}

/// One page of connections together with upstream-computed totals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    pub page_count: u64,
    pub item_count: u64,
    pub items: Vec<ConnectionRecord>,
}

impl ListingResponse {
    /// Drop items beyond `items_per_page`, leaving the counts untouched.
    /// Returns how many items were discarded.
    pub fn truncate_items(&mut self, items_per_page: u32) -> usize {
        let limit = items_per_page as usize;
        let surplus = self.items.len().saturating_sub(limit);
        self.items.truncate(limit);
        surplus
    }
}

/// Body returned for every non-success outcome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorPayload {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorPayload {
    pub fn new(error: impl Into<String>, message: Option<String>) -> Self {
        Self {
            error: error.into(),
            message,
        }
    }
}
