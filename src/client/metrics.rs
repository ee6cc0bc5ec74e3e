// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for token cache activity on one client.
#[derive(Debug, Default)]
pub struct TokenCacheMetrics {
	hits: AtomicU64,
	fetches: AtomicU64,
	fetch_failures: AtomicU64,
}
impl TokenCacheMetrics {
	/// Returns how many token requests were answered from the cache.
	pub fn hits(&self) -> u64 {
		self.hits.load(Ordering::Relaxed)
	}

	/// Returns how many tokens were fetched successfully from the token endpoint.
	pub fn fetches(&self) -> u64 {
		self.fetches.load(Ordering::Relaxed)
	}

	/// Returns how many token endpoint exchanges failed.
	pub fn fetch_failures(&self) -> u64 {
		self.fetch_failures.load(Ordering::Relaxed)
	}

	pub(crate) fn record_hit(&self) {
		self.hits.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_fetch(&self) {
		self.fetches.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_fetch_failure(&self) {
		self.fetch_failures.fetch_add(1, Ordering::Relaxed);
	}
}
