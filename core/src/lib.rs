//! I/O-free core of the connections gateway.
//!
//! # Overview
//! Builds `HttpRequest` values and classifies `HttpResponse` values for the
//! upstream media-server API without touching the network (host-does-IO
//! pattern). The gateway crate executes the round-trips and owns the shared
//! transport.
//!
//! # Design
//! - `ConnectionsClient` holds only the base URL and credentials.
//! - Each upstream call is split into `build_*` and `parse_*` / `check_*`.
//! - `pagination` and `mock` are pure functions over their inputs (the mock
//!   generator takes the clock as a parameter).
//! - Upstream failures are a closed enum mapped to statuses and error codes
//!   here, so every caller reports them the same way.

pub mod client;
pub mod diagnostics;
pub mod error;
pub mod http;
pub mod mock;
pub mod pagination;
pub mod types;

pub use client::{ConnectionsClient, Credentials, Endpoint};
pub use diagnostics::{ProbeReport, ProbeVerdict};
pub use error::{ConnectivityError, UpstreamError};
pub use http::{HttpRequest, HttpResponse};
pub use pagination::PageRequest;
pub use types::{ConnectionRecord, ErrorPayload, ListingResponse};
