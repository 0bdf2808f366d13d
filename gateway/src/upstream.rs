//! Upstream client adapter: executes core requests over the shared transport.

use std::time::Duration;

use conngate_core::{
    ConnectionsClient, ConnectivityError, HttpRequest, HttpResponse, ListingResponse, UpstreamError,
};
use tracing::{debug, info, warn};

use crate::error::GatewayError;
use crate::session::SessionCache;

/// Timeout for the one-off reachability check made at startup.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

const RESPONSE_PREVIEW_BYTES: usize = 500;
const PARSE_FAILURE_PREVIEW_BYTES: usize = 1000;

pub struct Upstream {
    client: ConnectionsClient,
    sessions: SessionCache<reqwest::Client>,
}

impl Upstream {
    pub fn new(client: ConnectionsClient, sessions: SessionCache<reqwest::Client>) -> Self {
        Self { client, sessions }
    }

    pub fn client(&self) -> &ConnectionsClient {
        &self.client
    }

    pub fn sessions(&self) -> &SessionCache<reqwest::Client> {
        &self.sessions
    }

    /// Fetch one page of connections. `page_index` is zero-based.
    ///
    /// An HTML answer drops the shared session before the error is returned,
    /// so the next call starts without stale cookies.
    pub async fn list_connections(
        &self,
        page_index: u32,
        items_per_page: u32,
    ) -> Result<ListingResponse, GatewayError> {
        let session = self.sessions.acquire().await?;
        let request = self.client.build_list_connections(page_index, items_per_page);
        info!(
            url = %request.url,
            page_index,
            items_per_page,
            user = self.client.user(),
            "Requesting connections from upstream"
        );

        let response = execute(session.transport(), &request).await.inspect_err(|e| {
            warn!(error = %e, "Upstream request failed");
        })?;
        info!(
            status = response.status,
            content_type = response.content_type(),
            bytes = response.body.len(),
            "Upstream responded"
        );
        debug!(preview = %response.excerpt(RESPONSE_PREVIEW_BYTES), "Upstream response body");

        let preview = response.excerpt(PARSE_FAILURE_PREVIEW_BYTES);
        match self.client.parse_list_connections(response) {
            Ok(mut listing) => {
                let surplus = listing.truncate_items(items_per_page);
                if surplus > 0 {
                    warn!(surplus, items_per_page, "Upstream returned more items than requested; extra items dropped");
                }
                Ok(listing)
            }
            Err(UpstreamError::AuthOrProtocol) => {
                warn!("Upstream returned HTML instead of JSON; resetting session");
                self.sessions.invalidate().await;
                Err(UpstreamError::AuthOrProtocol.into())
            }
            Err(err @ UpstreamError::MalformedResponse(_)) => {
                warn!(error = %err, %preview, "Could not parse upstream listing");
                Err(err.into())
            }
            Err(err) => {
                warn!(error = %err, "Upstream listing failed");
                Err(err.into())
            }
        }
    }

    /// One-off reachability check on a fresh transport with a short timeout.
    /// The shared session is left untouched.
    pub async fn check_connectivity(&self) -> Result<(), ConnectivityError> {
        let transport = reqwest::Client::builder()
            .timeout(PROBE_TIMEOUT)
            .build()
            .map_err(|e| ConnectivityError::Transport(e.to_string()))?;
        let request = self.client.build_connectivity_probe();
        let response = execute(&transport, &request)
            .await
            .map_err(|e| ConnectivityError::Transport(e.to_string()))?;
        self.client.check_connectivity_probe(&response)
    }
}

/// Execute a core request. Only transport-level problems are errors here;
/// every status code comes back as data for the core to classify.
pub(crate) async fn execute(
    transport: &reqwest::Client,
    request: &HttpRequest,
) -> Result<HttpResponse, UpstreamError> {
    let mut builder = transport.get(&request.url);
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    let response = builder
        .send()
        .await
        .map_err(|e| UpstreamError::Unreachable(e.to_string()))?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or_default().to_string()))
        .collect();
    let body = response
        .bytes()
        .await
        .map_err(|e| UpstreamError::Unreachable(e.to_string()))?
        .to_vec();

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}
