//! Token-caching API client with lazy refresh and single-flight guards.
//!
//! [`ApiClient::access_token`] serves the cached bearer token while the clock is strictly before
//! its `expires_at` (the advertised lifetime minus [`TOKEN_EXPIRY_SKEW`]). On a miss it takes a
//! per-client guard, re-checks the cache, and only then performs the client-credentials exchange,
//! so concurrent callers piggy-back on one in-flight fetch instead of stampeding the token
//! endpoint. [`ApiClient::request`] layers bearer authentication and uniform error surfacing on
//! top of every wrapped API call. Nothing is retried.
//!
//! [`TOKEN_EXPIRY_SKEW`]: crate::auth::TOKEN_EXPIRY_SKEW

pub mod options;

mod metrics;

pub use metrics::TokenCacheMetrics;
pub use options::RequestOptions;

// crates.io
use oauth2::{
	HttpRequest, HttpResponse,
	http::{Method, StatusCode},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	auth::{BearerToken, CachedToken},
	clock::{Clock, SystemClock},
	config::ClientConfig,
	http::ApiTransport,
	oauth::{self, TransportErrorMapper},
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport stack.
pub type ReqwestApiClient = ApiClient<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Authenticated JSON client for one set of client credentials.
///
/// The cached token is private to the instance, so independent clients (for example one per
/// tenant) never share or overwrite each other's tokens. Share one client across tasks behind an
/// [`Arc`]; all methods take `&self`.
pub struct ApiClient<C, M>
where
	C: ?Sized + ApiTransport,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	config: ClientConfig,
	http_client: Arc<C>,
	transport_mapper: Arc<M>,
	clock: Arc<dyn Clock>,
	token: RwLock<Option<Arc<CachedToken>>>,
	refresh_guard: AsyncMutex<()>,
	metrics: TokenCacheMetrics,
}
impl<C, M> ApiClient<C, M>
where
	C: ?Sized + ApiTransport,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a client that reuses the caller-provided transport + mapper pair.
	///
	/// `config` has already been validated, so construction cannot fail and performs no I/O.
	pub fn with_http_client(
		config: ClientConfig,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			config,
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			clock: Arc::new(SystemClock),
			token: Default::default(),
			refresh_guard: Default::default(),
			metrics: Default::default(),
		}
	}

	/// Replaces the clock used for expiry stamping and freshness checks.
	pub fn with_clock(mut self, clock: impl Clock) -> Self {
		self.clock = Arc::new(clock);

		self
	}

	/// Validated configuration backing this client.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Token cache counters for this client.
	pub fn cache_metrics(&self) -> &TokenCacheMetrics {
		&self.metrics
	}

	/// Snapshot of the cached token record, fresh or not.
	pub fn cached_token(&self) -> Option<Arc<CachedToken>> {
		self.token.read().clone()
	}

	/// Drops the cached token so the next call performs a new exchange.
	pub fn invalidate_token(&self) {
		*self.token.write() = None;
	}

	/// Returns a bearer token that is valid at the instant of return.
	///
	/// A cache hit performs no network call. A miss performs exactly one token exchange per
	/// client, however many callers are waiting. Failures never populate the cache.
	pub async fn access_token(&self) -> Result<BearerToken> {
		const KIND: OperationKind = OperationKind::TokenFetch;

		if let Some(token) = self.fresh_token() {
			return Ok(token);
		}

		let span = OperationSpan::new(KIND, "access_token");

		span.instrument(async move {
			let _singleflight = self.refresh_guard.lock().await;

			if let Some(token) = self.fresh_token() {
				return Ok(token);
			}

			obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

			let record = match self.fetch_token().await {
				Ok(record) => record,
				Err(err) => {
					self.metrics.record_fetch_failure();
					obs::record_operation_outcome(KIND, OperationOutcome::Failure);

					return Err(err);
				},
			};
			let token = record.access_token.clone();

			obs::log_token_refreshed(record.expires_at);
			*self.token.write() = Some(Arc::new(record));
			self.metrics.record_fetch();
			obs::record_operation_outcome(KIND, OperationOutcome::Success);

			Ok(token)
		})
		.await
	}

	/// Performs an authenticated call and returns the decoded JSON body.
	///
	/// `endpoint` is appended verbatim to the base URL. A non-success status becomes
	/// [`Error::ApiRequest`] with the raw body text; an empty success body yields [`Value::Null`].
	pub async fn request(&self, endpoint: &str, options: RequestOptions) -> Result<Value> {
		self.request_as(endpoint, options).await
	}

	/// Same as [`ApiClient::request`] but decodes the body into `T`.
	///
	/// Decoding failures become [`Error::ResponseParse`] naming the offending JSON path.
	pub async fn request_as<T>(&self, endpoint: &str, options: RequestOptions) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let response = self.send(endpoint, options).await?;

		decode_body(&response)
	}

	/// Shorthand for a `GET` without extra headers.
	pub async fn get(&self, endpoint: &str) -> Result<Value> {
		self.request(endpoint, RequestOptions::new()).await
	}

	/// Shorthand for a `POST` with a JSON body.
	pub async fn post<B>(&self, endpoint: &str, body: &B) -> Result<Value>
	where
		B: ?Sized + Serialize,
	{
		let options = RequestOptions::new().method(Method::POST).json(body)?;

		self.request(endpoint, options).await
	}

	async fn send(&self, endpoint: &str, options: RequestOptions) -> Result<HttpResponse> {
		const KIND: OperationKind = OperationKind::ApiRequest;

		let span = OperationSpan::new(KIND, "request");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				let url = self.config.endpoint_url(endpoint)?;
				let token = self.access_token().await?;
				let request = options.into_http_request(&url, &token)?;
				let response = self.execute(KIND, request).await?;
				let status = response.status();

				if !status.is_success() {
					let body = String::from_utf8_lossy(response.body()).into_owned();

					obs::log_provider_failure(KIND, status.as_u16(), &body);

					return Err(Error::ApiRequest { status: status.as_u16(), body });
				}

				Ok(response)
			})
			.await;

		match &result {
			Ok(_) => obs::record_operation_outcome(KIND, OperationOutcome::Success),
			Err(_) => obs::record_operation_outcome(KIND, OperationOutcome::Failure),
		}

		result
	}

	fn fresh_token(&self) -> Option<BearerToken> {
		let now = self.clock.now();
		let guard = self.token.read();
		let record = guard.as_ref().filter(|record| record.is_valid_at(now))?;

		self.metrics.record_hit();
		obs::record_operation_outcome(OperationKind::TokenFetch, OperationOutcome::CacheHit);
		obs::log_cache_hit(record.remaining_at(now));

		Some(record.access_token.clone())
	}

	async fn fetch_token(&self) -> Result<CachedToken> {
		const KIND: OperationKind = OperationKind::TokenFetch;

		let token_url = self.config.token_url()?;
		let request = oauth::token_request(
			&token_url,
			self.config.client_id(),
			self.config.client_secret(),
		)?;
		let response = self.execute(KIND, request).await?;

		if !response.status().is_success() {
			obs::log_provider_failure(
				KIND,
				response.status().as_u16(),
				&String::from_utf8_lossy(response.body()),
			);
		}

		let issued_at = self.clock.now();

		oauth::parse_token_response(&response, issued_at).map_err(Error::from)
	}

	async fn execute(&self, operation: OperationKind, request: HttpRequest) -> Result<HttpResponse> {
		self.http_client
			.execute(request)
			.await
			.map_err(|err| self.transport_mapper.map_transport_error(operation, err))
	}
}
#[cfg(feature = "reqwest")]
impl ApiClient<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a client backed by a default reqwest transport.
	pub fn new(config: ClientConfig) -> Self {
		Self::with_http_client(config, ReqwestHttpClient::default(), ReqwestTransportErrorMapper)
	}

	/// Validates credentials and builds a client against [`DEFAULT_BASE_URL`].
	///
	/// [`DEFAULT_BASE_URL`]: crate::config::DEFAULT_BASE_URL
	pub fn with_credentials(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> Result<Self> {
		Ok(Self::new(ClientConfig::new(client_id, client_secret)?))
	}

	/// Builds a client from `CLIENT_ID`, `CLIENT_SECRET`, and `BASE_URL`.
	///
	/// Fails before any network activity when a credential is missing, so a host can refuse to
	/// start serving.
	pub fn from_env() -> Result<Self> {
		Ok(Self::new(ClientConfig::from_env()?))
	}
}
impl<C, M> Debug for ApiClient<C, M>
where
	C: ?Sized + ApiTransport,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("config", &self.config)
			.field("cached_token", &self.token.read().as_deref())
			.field("metrics", &self.metrics)
			.finish()
	}
}

fn decode_body<T>(response: &HttpResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	let status = response.status();
	let body = response.body();
	let payload: &[u8] =
		if status == StatusCode::NO_CONTENT || body.iter().all(u8::is_ascii_whitespace) {
			b"null"
		} else {
			body
		};
	let mut de = serde_json::Deserializer::from_slice(payload);

	serde_path_to_error::deserialize(&mut de)
		.map_err(|source| Error::ResponseParse { status: status.as_u16(), source })
}
