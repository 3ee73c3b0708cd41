//! Pre-built [`tracing::Span`] constructors for request processing.
//!
//! Consistent span names and field sets make it easy to filter and
//! correlate log lines for one block or one request.

use tracing::{info_span, Span};

use exp_types::{AccountId, RequestKind, Timestamp};

/// Span covering both request passes of one block.
pub fn block_span(now: Timestamp) -> Span {
    info_span!("process_block", now = now.as_secs())
}

/// Span covering one execution step of a single request.
pub fn request_step_span(kind: RequestKind, account: &AccountId) -> Span {
    info_span!("request_step", kind = kind.name(), account = %account)
}
