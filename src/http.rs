//! Transport primitives shared by token exchanges and wrapped API calls.
//!
//! The module exposes [`ApiTransport`] so downstream crates can plug in a custom HTTP stack.
//! Requests and responses are plain [`oauth2::HttpRequest`]/[`oauth2::HttpResponse`] values
//! (`http` types over byte bodies), and failures are reported as [`HttpClientError`] so a
//! [`TransportErrorMapper`](crate::oauth::TransportErrorMapper) can classify them uniformly.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
use oauth2::{HttpClientError, HttpRequest, HttpResponse};
// self
use crate::_prelude::*;

/// Boxed future returned by [`ApiTransport::execute`].
pub type TransportFuture<'a, E> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, HttpClientError<E>>> + 'a + Send>>;

/// Abstraction over HTTP transports that execute one request and buffer the full response.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can back a client
/// shared across tasks. Non-success statuses are not errors at this layer; they come back as
/// ordinary responses and the client decides how to surface them. Only failures that prevent
/// a response from arriving (DNS, TCP, TLS, timeouts) belong in the error channel.
pub trait ApiTransport
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Sends `request` and resolves once the whole response body has been read.
	fn execute(&self, request: HttpRequest) -> TransportFuture<'_, Self::TransportError>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Timeouts, proxies, and redirect policy come from the wrapped client; configure them on a
/// custom [`ReqwestClient`] and pass it through [`ReqwestHttpClient::with_client`]. Token
/// endpoints are expected to answer directly, so disabling redirects is recommended.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiTransport for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(&self, request: HttpRequest) -> TransportFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let response =
				client.execute(request.try_into().map_err(Box::new)?).await.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut converted = HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*converted.status_mut() = status;
			*converted.headers_mut() = headers;

			Ok(converted)
		})
	}
}
