// self
use crate::{_prelude::*, obs::OperationKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOperation<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOperation<F> = F;

/// A span builder used by client operations.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Creates a new span tagged with the provided operation kind + stage.
	pub fn new(kind: OperationKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("bearer_client.operation", operation = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOperation<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Logs a non-success upstream response. The body goes to logs only, never to end users.
pub fn log_provider_failure(kind: OperationKind, status: u16, body: &str) {
	#[cfg(feature = "tracing")]
	tracing::warn!(operation = kind.as_str(), status, body, "Upstream returned a failure status.");
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, status, body);
	}
}

/// Logs a freshly cached token. Only timing is recorded.
pub fn log_token_refreshed(expires_at: OffsetDateTime) {
	#[cfg(feature = "tracing")]
	tracing::debug!(%expires_at, "Cached a new access token.");
	#[cfg(not(feature = "tracing"))]
	{
		let _ = expires_at;
	}
}

/// Logs a token served from the cache.
pub fn log_cache_hit(remaining: Duration) {
	#[cfg(feature = "tracing")]
	tracing::trace!(remaining_secs = remaining.whole_seconds(), "Reusing cached access token.");
	#[cfg(not(feature = "tracing"))]
	{
		let _ = remaining;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = OperationSpan::new(OperationKind::ApiRequest, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}

	#[test]
	fn log_helpers_accept_any_input() {
		log_provider_failure(OperationKind::TokenFetch, 401, "{\"error\":\"invalid_client\"}");
		log_token_refreshed(OffsetDateTime::UNIX_EPOCH);
		log_cache_hit(Duration::seconds(-5));
	}
}
