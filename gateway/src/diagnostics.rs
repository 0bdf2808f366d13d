//! `/api/debug` report: configuration echo plus live probes of the upstream.

use conngate_core::{Endpoint, ProbeReport, ProbeVerdict};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::GatewayError;
use crate::upstream::{execute, Upstream};

const PROBE_PAGE_SIZE: u32 = 10;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigEcho {
    pub base_url: String,
    pub auth_user: String,
    pub mock_mode: bool,
}

impl From<&Config> for ConfigEcho {
    fn from(config: &Config) -> Self {
        Self {
            base_url: config.base_url.clone(),
            auth_user: config.auth_user.clone(),
            mock_mode: config.mock_mode,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DebugReport {
    pub config: ConfigEcho,
    pub probes: Vec<ProbeReport>,
}

/// Probe every known listing endpoint in order through the shared session.
pub async fn build_report(config: &Config, upstream: &Upstream) -> Result<DebugReport, GatewayError> {
    let session = upstream.sessions().acquire().await?;

    let mut probes = Vec::with_capacity(Endpoint::ALL.len());
    for endpoint in Endpoint::ALL {
        let request = upstream.client().build_list(endpoint, 0, PROBE_PAGE_SIZE);
        info!(endpoint = endpoint.path(), "Probing upstream endpoint");

        let report = match execute(session.transport(), &request).await {
            Ok(response) => ProbeReport::from_response(endpoint, &request.url, &response),
            Err(err) => ProbeReport::from_transport_error(endpoint, &request.url, err),
        };
        match report.verdict {
            ProbeVerdict::Success => info!(endpoint = endpoint.path(), "Probe succeeded"),
            ProbeVerdict::Unauthorized => warn!(endpoint = endpoint.path(), "Probe got 401, check credentials"),
            ProbeVerdict::NotJson => warn!(
                endpoint = endpoint.path(),
                content_type = report.content_type.as_deref().unwrap_or(""),
                "Probe got a non-JSON answer"
            ),
            ProbeVerdict::UnexpectedStatus => warn!(endpoint = endpoint.path(), status = ?report.status, "Probe got an unexpected status"),
            ProbeVerdict::TransportError => warn!(endpoint = endpoint.path(), error = ?report.error, "Probe failed"),
        }
        probes.push(report);
    }

    Ok(DebugReport {
        config: ConfigEcho::from(config),
        probes,
    })
}
