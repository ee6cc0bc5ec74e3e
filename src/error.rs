//! Client-level error types shared across configuration, token acquisition, and API calls.

// self
use crate::{_prelude::*, obs::OperationKind};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;
type JsonPathError = serde_path_to_error::Error<serde_json::Error>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem; fatal and never retried.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Token endpoint refused or garbled the client-credentials exchange.
	#[error(transparent)]
	Authentication(#[from] AuthenticationError),
	/// Transport failure (DNS, TCP, TLS, timeouts).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Wrapped API call returned a non-success status.
	#[error("API request failed with status {status}: {body}")]
	ApiRequest {
		/// HTTP status code returned by the API.
		status: u16,
		/// Raw response body text; not assumed to be JSON.
		body: String,
	},
	/// Wrapped API call succeeded but its body could not be decoded.
	#[error("API response with status {status} could not be decoded.")]
	ResponseParse {
		/// HTTP status code returned by the API.
		status: u16,
		/// Structured decoding failure naming the offending JSON path.
		#[source]
		source: JsonPathError,
	},
}
impl Error {
	/// Returns the upstream HTTP status, when the failure carried one.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Authentication(AuthenticationError::Rejected { status, .. })
			| Self::ApiRequest { status, .. }
			| Self::ResponseParse { status, .. } => Some(*status),
			_ => None,
		}
	}

	/// Message that is safe to hand to end users of a host service.
	///
	/// Provider text never appears here; log the full error instead.
	pub fn public_message(&self) -> &'static str {
		match self {
			Self::Config(_) => "The service is not configured correctly.",
			Self::Authentication(_) => "Authentication with the upstream API failed.",
			Self::Transport(_) => "The upstream API could not be reached.",
			Self::ApiRequest { .. } => "The upstream API rejected the request.",
			Self::ResponseParse { .. } => "The upstream API returned an unreadable response.",
		}
	}
}

/// Configuration and request-construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// `client_id` was absent or blank.
	#[error("Client identifier is required.")]
	MissingClientId,
	/// `client_secret` was absent or blank.
	#[error("Client secret is required.")]
	MissingClientSecret,
	/// Base URL cannot be parsed.
	#[error("Base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL uses a scheme other than HTTP(S).
	#[error("Base URL must use http or https, got `{scheme}`.")]
	UnsupportedScheme {
		/// Scheme that was supplied.
		scheme: String,
	},
	/// Endpoint path does not form a valid URL when appended to the base URL.
	#[error("Endpoint `{endpoint}` does not form a valid URL.")]
	InvalidEndpoint {
		/// Endpoint that was supplied.
		endpoint: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Header name or value is not valid HTTP.
	#[error("Header `{name}` has an invalid name or value.")]
	InvalidHeader {
		/// Header name as supplied.
		name: String,
	},
	/// Request body could not be serialized as JSON.
	#[error("Request body could not be serialized as JSON.")]
	InvalidBody {
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Token endpoint failures. None of these leave a token in the cache.
#[derive(Debug, ThisError)]
pub enum AuthenticationError {
	/// Token endpoint answered with a non-success status.
	#[error("Token endpoint rejected the client credentials: {status} {status_text}.")]
	Rejected {
		/// HTTP status code.
		status: u16,
		/// Canonical reason phrase for the status.
		status_text: String,
	},
	/// Token endpoint responded with malformed JSON.
	#[error("Token endpoint returned malformed JSON.")]
	MalformedResponse {
		/// Structured parsing failure.
		#[source]
		source: JsonPathError,
	},
	/// Token endpoint response omitted `access_token` or returned it empty.
	#[error("Token endpoint response is missing access_token.")]
	MissingAccessToken,
	/// Token endpoint response omitted `expires_in`.
	#[error("Token endpoint response is missing expires_in.")]
	MissingExpiresIn,
	/// Token endpoint returned a non-positive lifetime.
	#[error("The expires_in value must be positive.")]
	NonPositiveExpiresIn,
	/// Token endpoint returned a lifetime that overflows the clock.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred during the {operation} call.")]
	Network {
		/// Operation that was in flight.
		operation: OperationKind,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the upstream API.")]
	Io(#[from] std::io::Error),
	/// Transport reported a failure it could not classify.
	#[error("HTTP client error occurred during the {operation} call: {message}.")]
	Other {
		/// Operation that was in flight.
		operation: OperationKind,
		/// Transport-supplied description.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(
		operation: OperationKind,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { operation, source: Box::new(src) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn api_request_display_carries_status_and_body() {
		let err = Error::ApiRequest { status: 404, body: "not found".into() };
		let rendered = err.to_string();

		assert!(rendered.contains("404"));
		assert!(rendered.contains("not found"));
		assert_eq!(err.status(), Some(404));
	}

	#[test]
	fn public_message_never_echoes_provider_text() {
		let err = Error::ApiRequest { status: 500, body: "stack trace: secret-db-host".into() };

		assert!(!err.public_message().contains("secret-db-host"));

		let err = Error::from(AuthenticationError::Rejected {
			status: 401,
			status_text: "Unauthorized".into(),
		});

		assert_eq!(err.status(), Some(401));
		assert_eq!(err.public_message(), "Authentication with the upstream API failed.");
	}

	#[test]
	fn config_errors_have_no_status() {
		let err = Error::from(ConfigError::MissingClientSecret);

		assert_eq!(err.status(), None);
		assert_eq!(err.to_string(), "Client secret is required.");
	}
}
