//! Routes a normalized page request to the mock generator or the upstream.

use chrono::Utc;
use conngate_core::{mock, ListingResponse, PageRequest};
use tracing::info;

use crate::error::GatewayError;
use crate::AppState;

pub async fn handle_list_request(state: &AppState, request: PageRequest) -> Result<ListingResponse, GatewayError> {
    if state.config.mock_mode {
        info!(
            page = request.page(),
            items_per_page = request.items_per_page(),
            "Mock mode: serving synthetic connections"
        );
        return Ok(mock::generate(request.page(), request.items_per_page(), Utc::now()));
    }

    state
        .upstream
        .list_connections(request.zero_based_index(), request.items_per_page())
        .await
}
