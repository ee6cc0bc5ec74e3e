//! Validated client configuration: credentials plus the API base URL.
//!
//! Values can be assembled in code or read from the environment (`CLIENT_ID`, `CLIENT_SECRET`,
//! `BASE_URL`). Missing credentials are rejected here, before a client or any network call
//! exists, so a host process can refuse to start.

// crates.io
use oauth2::{ClientId, ClientSecret};
// self
use crate::{_prelude::*, error::ConfigError, oauth::TOKEN_PATH};

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.payments.example.com";
/// Environment key holding the OAuth client identifier.
pub const ENV_CLIENT_ID: &str = "CLIENT_ID";
/// Environment key holding the OAuth client secret.
pub const ENV_CLIENT_SECRET: &str = "CLIENT_SECRET";
/// Environment key holding the optional base URL override.
pub const ENV_BASE_URL: &str = "BASE_URL";

/// Credentials and endpoint settings for an [`ApiClient`](crate::client::ApiClient).
#[derive(Clone)]
pub struct ClientConfig {
	client_id: ClientId,
	client_secret: ClientSecret,
	base_url: Url,
}
impl ClientConfig {
	/// Validates credentials and targets [`DEFAULT_BASE_URL`].
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> Result<Self, ConfigError> {
		let client_id = client_id.into();
		let client_secret = client_secret.into();

		if client_id.trim().is_empty() {
			return Err(ConfigError::MissingClientId);
		}
		if client_secret.trim().is_empty() {
			return Err(ConfigError::MissingClientSecret);
		}

		Ok(Self {
			client_id: ClientId::new(client_id),
			client_secret: ClientSecret::new(client_secret),
			base_url: parse_base_url(DEFAULT_BASE_URL)?,
		})
	}

	/// Reads `CLIENT_ID`, `CLIENT_SECRET`, and `BASE_URL` from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Same as [`ClientConfig::from_env`] but resolves keys through `lookup`.
	///
	/// A blank `BASE_URL` counts as unset.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let client_id = lookup(ENV_CLIENT_ID).ok_or(ConfigError::MissingClientId)?;
		let client_secret = lookup(ENV_CLIENT_SECRET).ok_or(ConfigError::MissingClientSecret)?;
		let config = Self::new(client_id, client_secret)?;

		match lookup(ENV_BASE_URL).filter(|value| !value.trim().is_empty()) {
			Some(base_url) => config.with_base_url(&base_url),
			None => Ok(config),
		}
	}

	/// Overrides the base URL every endpoint path is appended to.
	pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
		self.base_url = parse_base_url(base_url.trim())?;

		Ok(self)
	}

	/// OAuth client identifier.
	pub fn client_id(&self) -> &ClientId {
		&self.client_id
	}

	/// OAuth client secret; callers must avoid logging it.
	pub fn client_secret(&self) -> &ClientSecret {
		&self.client_secret
	}

	/// Base URL for both the token endpoint and wrapped API calls.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Absolute URL of the client-credentials token endpoint.
	pub fn token_url(&self) -> Result<Url, ConfigError> {
		self.endpoint_url(TOKEN_PATH)
	}

	/// Appends `endpoint` to the base URL verbatim.
	///
	/// This is string concatenation rather than [`Url::join`], so a base path such as
	/// `https://host/api` is kept: `/v1/orders` becomes `https://host/api/v1/orders`.
	pub fn endpoint_url(&self, endpoint: &str) -> Result<Url, ConfigError> {
		let base = self.base_url.as_str().trim_end_matches('/');
		let joined = if endpoint.starts_with('/') {
			format!("{base}{endpoint}")
		} else {
			format!("{base}/{endpoint}")
		};

		Url::parse(&joined)
			.map_err(|source| ConfigError::InvalidEndpoint { endpoint: endpoint.into(), source })
	}
}
impl Debug for ClientConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientConfig")
			.field("client_id", &self.client_id.as_str())
			.field("client_secret", &"<redacted>")
			.field("base_url", &self.base_url.as_str())
			.finish()
	}
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
	let url = Url::parse(raw).map_err(|source| ConfigError::InvalidBaseUrl { source })?;

	match url.scheme() {
		"http" | "https" => Ok(url),
		other => Err(ConfigError::UnsupportedScheme { scheme: other.into() }),
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashMap;
	// self
	use super::*;

	fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let map: HashMap<String, String> =
			pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();

		move |key: &str| map.get(key).cloned()
	}

	#[test]
	fn blank_credentials_are_rejected() {
		assert!(matches!(ClientConfig::new("", "secret"), Err(ConfigError::MissingClientId)));
		assert!(matches!(ClientConfig::new("id", ""), Err(ConfigError::MissingClientSecret)));
		assert!(matches!(ClientConfig::new("id", "  \t"), Err(ConfigError::MissingClientSecret)));
	}

	#[test]
	fn defaults_to_production_base_url() {
		let config = ClientConfig::new("id", "secret").expect("Config fixture should be valid.");

		assert_eq!(config.base_url().as_str(), "https://api.payments.example.com/");
		assert_eq!(
			config.token_url().expect("Token URL should build.").as_str(),
			"https://api.payments.example.com/oauth/token",
		);
	}

	#[test]
	fn endpoint_url_preserves_base_path() {
		let config = ClientConfig::new("id", "secret")
			.and_then(|config| config.with_base_url("https://sandbox.example.com/api/"))
			.expect("Config fixture should be valid.");

		assert_eq!(
			config.endpoint_url("/v1/checkouts").expect("Endpoint should build.").as_str(),
			"https://sandbox.example.com/api/v1/checkouts",
		);
		assert_eq!(
			config.endpoint_url("v1/checkouts?limit=5").expect("Endpoint should build.").as_str(),
			"https://sandbox.example.com/api/v1/checkouts?limit=5",
		);
	}

	#[test]
	fn rejects_unusable_base_urls() {
		let config = ClientConfig::new("id", "secret").expect("Config fixture should be valid.");

		assert!(matches!(
			config.clone().with_base_url("not a url"),
			Err(ConfigError::InvalidBaseUrl { .. })
		));
		assert!(matches!(
			config.with_base_url("ftp://files.example.com"),
			Err(ConfigError::UnsupportedScheme { scheme }) if scheme == "ftp"
		));
	}

	#[test]
	fn lookup_requires_credentials() {
		let err = ClientConfig::from_lookup(lookup_from(&[("CLIENT_ID", "id")]))
			.expect_err("Missing secret must fail.");

		assert!(matches!(err, ConfigError::MissingClientSecret));

		let err = ClientConfig::from_lookup(lookup_from(&[]))
			.expect_err("Missing identifier must fail.");

		assert!(matches!(err, ConfigError::MissingClientId));
	}

	#[test]
	fn lookup_applies_base_url_override() {
		let config = ClientConfig::from_lookup(lookup_from(&[
			("CLIENT_ID", "svc"),
			("CLIENT_SECRET", "hunter2"),
			("BASE_URL", "http://127.0.0.1:8080"),
		]))
		.expect("Lookup config should be valid.");

		assert_eq!(config.client_id().as_str(), "svc");
		assert_eq!(config.base_url().as_str(), "http://127.0.0.1:8080/");

		let config = ClientConfig::from_lookup(lookup_from(&[
			("CLIENT_ID", "svc"),
			("CLIENT_SECRET", "hunter2"),
			("BASE_URL", " "),
		]))
		.expect("Blank base URL should fall back to the default.");

		assert_eq!(config.base_url().as_str(), "https://api.payments.example.com/");
	}

	#[test]
	fn debug_redacts_secret() {
		let config =
			ClientConfig::new("svc", "hunter2").expect("Config fixture should be valid.");
		let rendered = format!("{config:?}");

		assert!(rendered.contains("svc"));
		assert!(!rendered.contains("hunter2"));
	}
}
