//! Per-call options for wrapped API requests.

// crates.io
use oauth2::{
	HttpRequest,
	http::{
		HeaderMap, HeaderName, HeaderValue, Method, Request,
		header::{AUTHORIZATION, CONTENT_TYPE},
	},
};
use serde_json::Value;
// self
use crate::{_prelude::*, auth::BearerToken, error::ConfigError};

/// Method, JSON body, and extra headers for [`ApiClient::request`](crate::client::ApiClient::request).
///
/// Everything is optional; the default is a `GET` without a body.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
	/// HTTP method; defaults to `GET`.
	pub method: Method,
	/// JSON body, serialized when present.
	pub body: Option<Value>,
	/// Caller headers; these replace the client's defaults on conflict.
	pub headers: HeaderMap,
}
impl RequestOptions {
	/// Creates options for a plain `GET`.
	pub fn new() -> Self {
		Self::default()
	}

	/// Overrides the HTTP method.
	pub fn method(mut self, method: Method) -> Self {
		self.method = method;

		self
	}

	/// Sets an already-built JSON body.
	pub fn body(mut self, body: Value) -> Self {
		self.body = Some(body);

		self
	}

	/// Serializes `body` into the JSON payload.
	pub fn json<T>(self, body: &T) -> Result<Self, ConfigError>
	where
		T: ?Sized + Serialize,
	{
		let value =
			serde_json::to_value(body).map_err(|source| ConfigError::InvalidBody { source })?;

		Ok(self.body(value))
	}

	/// Adds a header, replacing any earlier value with the same name.
	pub fn header(
		mut self,
		name: impl AsRef<str>,
		value: impl AsRef<str>,
	) -> Result<Self, ConfigError> {
		let name = name.as_ref();
		let invalid = || ConfigError::InvalidHeader { name: name.to_owned() };
		let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
		let header_value = HeaderValue::from_str(value.as_ref()).map_err(|_| invalid())?;

		self.headers.insert(header_name, header_value);

		Ok(self)
	}

	/// Builds the outbound request: defaults first, caller headers layered on top.
	pub(crate) fn into_http_request(self, url: &Url, token: &BearerToken) -> Result<HttpRequest> {
		let mut authorization = HeaderValue::from_str(&token.authorization_value())
			.map_err(|_| ConfigError::InvalidHeader { name: AUTHORIZATION.to_string() })?;

		authorization.set_sensitive(true);

		let mut headers = HeaderMap::new();

		headers.insert(AUTHORIZATION, authorization);
		headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		headers.extend(self.headers);

		let body = match &self.body {
			Some(value) =>
				serde_json::to_vec(value).map_err(|source| ConfigError::InvalidBody { source })?,
			None => Vec::new(),
		};
		let mut request = Request::builder()
			.method(self.method)
			.uri(url.as_str())
			.body(body)
			.map_err(ConfigError::from)?;

		*request.headers_mut() = headers;

		Ok(request)
	}
}
