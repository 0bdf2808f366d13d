//! Stateless request builder and response classifier for the upstream API.
//!
//! # Design
//! `ConnectionsClient` holds only the base URL and credentials. Each call is
//! split into a `build_*` method that produces an `HttpRequest` and a
//! `parse_*` / `check_*` method that consumes an `HttpResponse`. The caller
//! executes the round-trip and owns any transport state (cookies, pools),
//! which keeps classification deterministic and testable without a network.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{ConnectivityError, UpstreamError};
use crate::http::{HttpRequest, HttpResponse};
use crate::types::ListingResponse;

/// Bytes of an error body relayed back to the caller.
pub const BODY_EXCERPT_BYTES: usize = 200;

/// Basic-auth credentials sent with every upstream request.
#[derive(Clone)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    fn authorization(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.user, self.password));
        format!("Basic {token}")
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

/// Upstream listing endpoints the gateway knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    RtspConnections,
    WebRtcSessions,
    RtspSessions,
}

impl Endpoint {
    /// Endpoints probed by the diagnostics report, in report order.
    pub const ALL: [Endpoint; 3] = [
        Endpoint::RtspConnections,
        Endpoint::WebRtcSessions,
        Endpoint::RtspSessions,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::RtspConnections => "/api/v3/rtspconns/list",
            Endpoint::WebRtcSessions => "/api/v3/webrtcsessions/list",
            Endpoint::RtspSessions => "/api/v3/rtspsessions/list",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Endpoint::RtspConnections => "RTSP connections",
            Endpoint::WebRtcSessions => "WebRTC sessions",
            Endpoint::RtspSessions => "RTSP sessions",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConnectionsClient {
    base_url: String,
    credentials: Credentials,
}

impl ConnectionsClient {
    pub fn new(base_url: &str, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn user(&self) -> &str {
        &self.credentials.user
    }

    /// GET request for one page of `endpoint`. `page_index` is zero-based.
    pub fn build_list(&self, endpoint: Endpoint, page_index: u32, items_per_page: u32) -> HttpRequest {
        HttpRequest {
            url: format!(
                "{}{}?page={page_index}&itemsPerPage={items_per_page}",
                self.base_url,
                endpoint.path()
            ),
            headers: vec![
                ("accept".to_string(), "application/json".to_string()),
                ("authorization".to_string(), self.credentials.authorization()),
            ],
        }
    }

    pub fn build_list_connections(&self, page_index: u32, items_per_page: u32) -> HttpRequest {
        self.build_list(Endpoint::RtspConnections, page_index, items_per_page)
    }

    /// Single-item request used to check reachability at startup.
    pub fn build_connectivity_probe(&self) -> HttpRequest {
        self.build_list_connections(0, 1)
    }

    /// Classify a listing response. HTML bodies win over any status code
    /// and mean the caller should drop its transport state.
    pub fn parse_list_connections(&self, response: HttpResponse) -> Result<ListingResponse, UpstreamError> {
        if response.is_html() {
            return Err(UpstreamError::AuthOrProtocol);
        }
        if response.status != 200 {
            return Err(UpstreamError::UpstreamStatus {
                status: response.status,
                body_excerpt: response.excerpt(BODY_EXCERPT_BYTES),
            });
        }
        serde_json::from_slice(&response.body).map_err(|e| UpstreamError::MalformedResponse(e.to_string()))
    }

    pub fn check_connectivity_probe(&self, response: &HttpResponse) -> Result<(), ConnectivityError> {
        if response.status == 401 {
            return Err(ConnectivityError::Unauthorized);
        }
        if response.status != 200 {
            return Err(ConnectivityError::UnexpectedStatus {
                status: response.status,
                body_excerpt: response.excerpt(BODY_EXCERPT_BYTES),
            });
        }
        let content_type = response.content_type();
        if !content_type.contains("application/json") {
            return Err(ConnectivityError::NotJson {
                content_type: content_type.to_string(),
            });
        }
        Ok(())
    }
}
