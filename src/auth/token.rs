//! Cached token record and its expiry arithmetic.

// self
use crate::{_prelude::*, auth::BearerToken, error::AuthenticationError};

/// Margin subtracted from the advertised lifetime so refreshes happen before the real expiry.
pub const TOKEN_EXPIRY_SKEW: Duration = Duration::seconds(300);

/// Immutable access token plus the instant after which it must not be reused.
///
/// Records are replaced wholesale on refresh; nothing mutates a cached record in place.
#[derive(Clone)]
pub struct CachedToken {
	/// Bearer credential; callers must avoid logging it.
	pub access_token: BearerToken,
	/// Clock reading taken when the token response arrived.
	pub issued_at: OffsetDateTime,
	/// `issued_at + expires_in - TOKEN_EXPIRY_SKEW`.
	pub expires_at: OffsetDateTime,
}
impl CachedToken {
	/// Builds a record from the provider's `expires_in`, applying [`TOKEN_EXPIRY_SKEW`].
	///
	/// Lifetimes at or below the skew yield a record that is already stale; it is still handed to
	/// the caller that fetched it but never served from the cache.
	pub fn issue(
		access_token: impl Into<String>,
		issued_at: OffsetDateTime,
		expires_in: Duration,
	) -> Result<Self, AuthenticationError> {
		if !expires_in.is_positive() {
			return Err(AuthenticationError::NonPositiveExpiresIn);
		}

		let expires_at = expires_in
			.checked_sub(TOKEN_EXPIRY_SKEW)
			.and_then(|lifetime| issued_at.checked_add(lifetime))
			.ok_or(AuthenticationError::ExpiresInOutOfRange)?;

		Ok(Self { access_token: BearerToken::new(access_token), issued_at, expires_at })
	}

	/// Returns `true` while `instant` is strictly before `expires_at`.
	pub fn is_valid_at(&self, instant: OffsetDateTime) -> bool {
		instant < self.expires_at
	}

	/// Remaining reuse window at `instant`, clamped at zero.
	pub fn remaining_at(&self, instant: OffsetDateTime) -> Duration {
		let remaining = self.expires_at - instant;

		if remaining.is_negative() { Duration::ZERO } else { remaining }
	}
}
impl Debug for CachedToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CachedToken")
			.field("access_token", &"<redacted>")
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn expiry_subtracts_safety_margin() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let record = CachedToken::issue("tok", issued, Duration::seconds(3600))
			.expect("Record should build for a one-hour token.");

		assert_eq!(record.expires_at, macros::datetime!(2025-01-01 00:55 UTC));
		assert!(record.is_valid_at(issued + Duration::seconds(3000)));
		assert!(record.is_valid_at(issued + Duration::seconds(3299)));
		assert!(!record.is_valid_at(issued + Duration::seconds(3300)));
		assert!(!record.is_valid_at(issued + Duration::seconds(3301)));
	}

	#[test]
	fn short_lifetimes_are_stale_immediately() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let record = CachedToken::issue("tok", issued, Duration::seconds(120))
			.expect("Short-lived tokens are still accepted.");

		assert!(!record.is_valid_at(issued));
		assert_eq!(record.remaining_at(issued), Duration::ZERO);
	}

	#[test]
	fn rejects_unusable_lifetimes() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);

		assert!(matches!(
			CachedToken::issue("tok", issued, Duration::ZERO),
			Err(AuthenticationError::NonPositiveExpiresIn)
		));
		assert!(matches!(
			CachedToken::issue("tok", issued, Duration::seconds(i64::MAX)),
			Err(AuthenticationError::ExpiresInOutOfRange)
		));
	}

	#[test]
	fn debug_redacts_access_token() {
		let record = CachedToken::issue(
			"very-secret",
			macros::datetime!(2025-01-01 00:00 UTC),
			Duration::hours(1),
		)
		.expect("Record fixture should build.");

		assert!(!format!("{record:?}").contains("very-secret"));
		assert_eq!(record.remaining_at(record.issued_at), Duration::minutes(55));
	}
}
