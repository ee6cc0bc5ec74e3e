//! Shared fixtures for the integration suites.

#![allow(dead_code)]

// crates.io
use httpmock::{Mock, prelude::*};
use time::{OffsetDateTime, macros};
// self
use bearer_client::{client::ReqwestApiClient, clock::ManualClock, config::ClientConfig};

pub const CLIENT_ID: &str = "svc-checkout";
pub const CLIENT_SECRET: &str = "svc-secret";
pub const TOKEN_PATH: &str = "/oauth/token";
pub const T0: OffsetDateTime = macros::datetime!(2025-01-01 00:00 UTC);

/// Builds a reqwest-backed client pointed at `server` with a manually driven clock.
pub fn build_client(server: &MockServer, clock: &ManualClock) -> ReqwestApiClient {
	let config = ClientConfig::new(CLIENT_ID, CLIENT_SECRET)
		.and_then(|config| config.with_base_url(&server.base_url()))
		.expect("Mock server config should be valid.");

	ReqwestApiClient::new(config).with_clock(clock.clone())
}

/// Registers a token endpoint that always issues `token` with the given lifetime.
pub async fn mock_token<'a>(server: &'a MockServer, token: &str, expires_in: i64) -> Mock<'a> {
	let body = format!(
		"{{\"access_token\":\"{token}\",\"token_type\":\"Bearer\",\"expires_in\":{expires_in}}}"
	);

	server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_PATH)
				.header("content-type", "application/x-www-form-urlencoded");
			then.status(200).header("content-type", "application/json").body(body);
		})
		.await
}
