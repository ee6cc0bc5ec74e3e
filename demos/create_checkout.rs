//! Demonstrates a host checkout handler built on the token-caching client: the first call performs
//! the client-credentials exchange, later calls reuse the cached token, and upstream failures are
//! turned into safe HTTP responses while the provider text is only logged.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde::Serialize;
// self
use bearer_client::{client::ReqwestApiClient, config::ClientConfig};

#[derive(Serialize)]
struct NewCheckout<'a> {
	amount: u64,
	currency: &'a str,
	description: &'a str,
}

/// What a host route would send back to its own caller.
struct HostResponse {
	status: u16,
	body: String,
}

async fn create_checkout(client: &ReqwestApiClient, amount: u64) -> HostResponse {
	let checkout = NewCheckout { amount, currency: "USD", description: "Demo order" };

	match client.post("/v1/checkouts", &checkout).await {
		Ok(created) => HostResponse { status: 201, body: created.to_string() },
		Err(err) => {
			eprintln!("Checkout creation failed: {err}.");

			HostResponse { status: 500, body: err.public_message().into() }
		},
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"Bearer\",\"expires_in\":3600}",
			);
		})
		.await;
	let _created_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/checkouts").header("authorization", "Bearer demo-access");
			then.status(201)
				.header("content-type", "application/json")
				.body("{\"id\":\"chk_demo\",\"status\":\"created\"}");
		})
		.await;
	let config = ClientConfig::new("demo-client", "super-secret")?.with_base_url(&server.base_url())?;
	let client = ReqwestApiClient::new(config);

	for amount in [1_999, 2_499] {
		let response = create_checkout(&client, amount).await;

		println!("Host responded {} with {}.", response.status, response.body);
	}

	token_mock.assert_calls_async(1).await;

	Ok(())
}
