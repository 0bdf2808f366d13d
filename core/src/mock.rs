//! Synthetic connection listings for offline testing.
//!
//! The dataset is a fixed set of `MOCK_TOTAL_ITEMS` connections. Every field
//! except `created` is a pure function of the item's ordinal, so repeated
//! calls with the same clock produce identical pages.

use chrono::{DateTime, Duration, SecondsFormat, Utc};

use crate::types::{ConnectionRecord, ListingResponse};

pub const MOCK_TOTAL_ITEMS: u64 = 47;

const TUNNEL_COUNT: u64 = 5;
const MIB: u64 = 1024 * 1024;

/// Build page `page` (1-based) of the synthetic dataset. Pages past the end
/// yield no items but still report the totals.
pub fn generate(page: u32, items_per_page: u32, now: DateTime<Utc>) -> ListingResponse {
    let size = u64::from(items_per_page.max(1));
    let start = u64::from(page.max(1) - 1).saturating_mul(size);
    let end = start.saturating_add(size).min(MOCK_TOTAL_ITEMS);

    ListingResponse {
        page_count: MOCK_TOTAL_ITEMS.div_ceil(size),
        item_count: MOCK_TOTAL_ITEMS,
        items: (start..end).map(|i| record(i, now)).collect(),
    }
}

fn record(i: u64, now: DateTime<Utc>) -> ConnectionRecord {
    let ordinal = i + 1;
    let hours = i64::try_from(i).unwrap_or(i64::MAX);
    ConnectionRecord {
        id: format!("conn_{ordinal:03}"),
        created: (now - Duration::hours(hours)).to_rfc3339_opts(SecondsFormat::Secs, true),
        remote_addr: format!("192.168.{}.{}:{}", (i / 100) % 256, i % 256, 50000 + i),
        bytes_received: ordinal * MIB,
        bytes_sent: ordinal * 2 * MIB,
        session: Some(format!("session_{ordinal:03}")),
        tunnel: format!("tunnel_{}", (i % TUNNEL_COUNT) + 1),
    }
}
