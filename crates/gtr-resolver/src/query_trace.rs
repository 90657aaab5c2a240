//! Structured query tracing for resolver entry points.
//!
//! Events use target `gtr::query_json` and are intended to be consumed with:
//! `GTR_LOG=gtr::query_json=trace GTR_LOG_FORMAT=json`.
//!
//! Environment:
//! - `GTR_QUERY_RUN_ID`: optional run identifier attached to every event.

use gtr_hierarchy::ClassId;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{Level, trace};

static NEXT_QUERY_ID: AtomicU64 = AtomicU64::new(1);
static QUERY_RUN_ID: OnceLock<String> = OnceLock::new();

#[inline]
pub(crate) fn enabled() -> bool {
    tracing::enabled!(target: "gtr::query_json", Level::TRACE)
}

#[inline]
pub(crate) fn next_query_id() -> u64 {
    NEXT_QUERY_ID.fetch_add(1, Ordering::Relaxed)
}

#[inline]
fn run_id() -> &'static str {
    QUERY_RUN_ID
        .get_or_init(|| std::env::var("GTR_QUERY_RUN_ID").unwrap_or_else(|_| "default".to_string()))
        .as_str()
}

#[inline]
pub(crate) fn resolve_start(query_id: u64, site: ClassId, provider: ClassId) {
    trace!(
        target: "gtr::query_json",
        event = "query",
        phase = "start",
        run_id = run_id(),
        query_id,
        op = "resolve",
        site_class_id = site.0,
        provider_class_id = provider.0
    );
}

#[inline]
pub(crate) fn resolve_end(query_id: u64, resolved: Option<ClassId>, path: &'static str) {
    trace!(
        target: "gtr::query_json",
        event = "query",
        phase = "end",
        run_id = run_id(),
        query_id,
        op = "resolve",
        resolved_class_id = resolved.map_or(0, |class| class.0),
        ok = resolved.is_some(),
        path
    );
}
