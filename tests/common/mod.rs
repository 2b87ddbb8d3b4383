//! Shared fixtures for the integration tests.

#![allow(dead_code)]

// crates.io
use httpmock::prelude::*;
// self
use pubsub_rest::{
	auth::{Credential, SubscriptionId, TopicId},
	config::ClientConfig,
	oauth::JWT_BEARER_GRANT_TYPE,
	pubsub::ReqwestMessageClient,
	url::Url,
};

pub const ACCESS_TOKEN: &str = "ya29.integration-token";
pub const BEARER: &str = "Bearer ya29.integration-token";
pub const PROJECT: &str = "test-project";

pub fn credential() -> Credential {
	Credential::from_slice(include_bytes!("../fixtures/service_account.json"))
		.expect("Service-account fixture should decode.")
}

pub fn config(server: &MockServer) -> ClientConfig {
	ClientConfig::builder()
		.api_base(Url::parse(&server.url("/v1")).expect("Mock API base should parse."))
		.token_endpoint(Url::parse(&server.url("/token")).expect("Mock token endpoint should parse."))
		.allow_insecure_endpoints()
		.build()
		.expect("Mock configuration should validate.")
}

pub fn client(server: &MockServer) -> ReqwestMessageClient {
	ReqwestMessageClient::new(&config(server)).expect("Reqwest client should build.")
}

pub fn topic(value: &str) -> TopicId {
	TopicId::new(value).expect("Topic fixture should be valid.")
}

pub fn subscription(value: &str) -> SubscriptionId {
	SubscriptionId::new(value).expect("Subscription fixture should be valid.")
}

/// Token endpoint that accepts any well-formed JWT-bearer grant.
pub fn mock_token(server: &MockServer) -> httpmock::Mock<'_> {
	server.mock(|when, then| {
		when.method(POST)
			.path("/token")
			.header("content-type", "application/x-www-form-urlencoded")
			.form_urlencoded_tuple("grant_type", JWT_BEARER_GRANT_TYPE)
			.form_urlencoded_tuple_exists("assertion");
		then.status(200).header("content-type", "application/json").json_body(
			serde_json::json!({
				"access_token": ACCESS_TOKEN,
				"token_type": "Bearer",
				"expires_in": 3599,
			}),
		);
	})
}

pub fn resource(collection: &str, name: &str, verb: &str) -> String {
	format!("/v1/projects/{PROJECT}/{collection}/{name}:{verb}")
}
