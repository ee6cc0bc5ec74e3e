//! Client-credentials token endpoint protocol and transport error mapping.
//!
//! The exchange is a single `POST {base}/oauth/token` carrying
//! `grant_type=client_credentials&client_id=..&client_secret=..` as a form body. The response must
//! be JSON with `access_token` and `expires_in`; anything else is an
//! [`AuthenticationError`] and leaves the cache untouched.

pub use oauth2;

// crates.io
use oauth2::{
	ClientId, ClientSecret, HttpClientError, HttpRequest, HttpResponse,
	http::{
		Method, Request,
		header::{ACCEPT, CONTENT_TYPE},
	},
};
use url::form_urlencoded::Serializer;
// self
use crate::{
	_prelude::*,
	auth::CachedToken,
	error::{AuthenticationError, ConfigError, TransportError},
	obs::OperationKind,
};

/// Path of the token endpoint, relative to the configured base URL.
pub const TOKEN_PATH: &str = "/oauth/token";

const GRANT_TYPE: &str = "client_credentials";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Maps HTTP transport failures into client [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a client error.
	fn map_transport_error(&self, operation: OperationKind, error: HttpClientError<E>) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		operation: OperationKind,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(operation, *inner),
			other => map_common_transport_error(operation, other),
		}
	}
}

/// Mapper for custom transports that have no builder-vs-network distinction.
///
/// Every transport-specific error is reported as [`TransportError::Network`].
#[derive(Clone, Debug, Default)]
pub struct GenericTransportErrorMapper;
impl<E> TransportErrorMapper<E> for GenericTransportErrorMapper
where
	E: 'static + Send + Sync + StdError,
{
	fn map_transport_error(&self, operation: OperationKind, err: HttpClientError<E>) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => TransportError::network(operation, *inner).into(),
			other => map_common_transport_error(operation, other),
		}
	}
}

/// Builds the form-encoded client-credentials request for `token_url`.
pub fn token_request(
	token_url: &Url,
	client_id: &ClientId,
	client_secret: &ClientSecret,
) -> Result<HttpRequest> {
	let body = Serializer::new(String::new())
		.append_pair("grant_type", GRANT_TYPE)
		.append_pair("client_id", client_id.as_str())
		.append_pair("client_secret", client_secret.secret())
		.finish();
	let request = Request::builder()
		.method(Method::POST)
		.uri(token_url.as_str())
		.header(CONTENT_TYPE, FORM_CONTENT_TYPE)
		.header(ACCEPT, "application/json")
		.body(body.into_bytes())
		.map_err(ConfigError::from)?;

	Ok(request)
}

/// Interprets a token endpoint response, stamping the record with `issued_at`.
pub fn parse_token_response(
	response: &HttpResponse,
	issued_at: OffsetDateTime,
) -> Result<CachedToken, AuthenticationError> {
	let status = response.status();

	if !status.is_success() {
		return Err(AuthenticationError::Rejected {
			status: status.as_u16(),
			status_text: status.canonical_reason().unwrap_or("Unknown Status").into(),
		});
	}

	let mut de = serde_json::Deserializer::from_slice(response.body());
	let body: TokenResponseBody = serde_path_to_error::deserialize(&mut de)
		.map_err(|source| AuthenticationError::MalformedResponse { source })?;
	let access_token = body
		.access_token
		.filter(|token| !token.is_empty())
		.ok_or(AuthenticationError::MissingAccessToken)?;
	let expires_in = body.expires_in.ok_or(AuthenticationError::MissingExpiresIn)?;

	CachedToken::issue(access_token, issued_at, Duration::seconds(expires_in))
}

// Fields are optional so absent values surface as dedicated errors instead of parse failures.
#[derive(Debug, Deserialize)]
struct TokenResponseBody {
	access_token: Option<String>,
	expires_in: Option<i64>,
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(operation: OperationKind, err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::http_client_build(err).into();
	}

	TransportError::network(operation, err).into()
}

fn map_common_transport_error<E>(operation: OperationKind, err: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => TransportError::network(operation, *inner).into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => TransportError::Other { operation, message }.into(),
		_ => TransportError::Other { operation, message: "unclassified transport failure".into() }
			.into(),
	}
}
