//! Bearer credential wrapper that keeps token material out of logs.

// self
use crate::_prelude::*;

/// Opaque bearer credential; formatting never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);
impl BearerToken {
	/// Wraps a token string issued by the token endpoint.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the raw token. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Renders the `Authorization` header value, `Bearer <token>`.
	pub fn authorization_value(&self) -> String {
		format!("Bearer {}", self.0)
	}
}
impl AsRef<str> for BearerToken {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for BearerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("BearerToken").field(&"<redacted>").finish()
	}
}
impl Display for BearerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn formatters_redact_and_header_exposes() {
		let token = BearerToken::new("tok-123");

		assert_eq!(format!("{token:?}"), "BearerToken(\"<redacted>\")");
		assert_eq!(format!("{token}"), "<redacted>");
		assert_eq!(token.authorization_value(), "Bearer tok-123");
	}
}
