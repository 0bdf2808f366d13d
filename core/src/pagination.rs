//! Translation between the gateway's 1-based pages and the upstream's 0-based
//! page index.
//!
//! The page size is never altered, and totals coming back from the upstream
//! are relayed as-is.

/// Page size used when the caller omits `itemsPerPage` or sends a value that
/// is not a positive integer.
pub const DEFAULT_ITEMS_PER_PAGE: u32 = 100;

/// A normalized, 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    items_per_page: u32,
}

impl PageRequest {
    /// Normalize user input. Missing or non-positive pages become page 1;
    /// missing or non-positive sizes become `DEFAULT_ITEMS_PER_PAGE`.
    pub fn new(page: Option<i64>, items_per_page: Option<i64>) -> Self {
        Self {
            page: positive(page).unwrap_or(1),
            items_per_page: positive(items_per_page).unwrap_or(DEFAULT_ITEMS_PER_PAGE),
        }
    }

    /// Same as `new`, from raw query-string values. Unparsable values count
    /// as missing.
    pub fn from_query(page: Option<&str>, items_per_page: Option<&str>) -> Self {
        Self::new(parse_int(page), parse_int(items_per_page))
    }

    /// The 1-based page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn items_per_page(&self) -> u32 {
        self.items_per_page
    }

    /// Index sent upstream: `max(page, 1) - 1`.
    pub fn zero_based_index(&self) -> u32 {
        self.page.max(1) - 1
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

fn parse_int(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse().ok())
}

fn positive(value: Option<i64>) -> Option<u32> {
    match value {
        Some(v) if v > 0 => Some(u32::try_from(v).unwrap_or(u32::MAX)),
        _ => None,
    }
}
