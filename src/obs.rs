//! Optional observability helpers for client operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (on by default) to emit spans named `bearer_client.operation` with the
//!   `operation` and `stage` fields, plus `debug`/`warn` events for token refreshes and provider
//!   failures.
//! - Enable `metrics` to increment the `bearer_client_operation_total` counter for every
//!   attempt/cache hit/success/failure, labeled by `operation` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Client-credentials exchange against the token endpoint.
	TokenFetch,
	/// Authenticated call against the wrapped API.
	ApiRequest,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::TokenFetch => "token_fetch",
			OperationKind::ApiRequest => "api_request",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to an operation that will touch the network.
	Attempt,
	/// Token served from the cache without a network call.
	CacheHit,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::CacheHit => "cache_hit",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
