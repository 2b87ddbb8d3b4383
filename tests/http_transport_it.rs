mod common;

// std
use std::{
	collections::{BTreeMap, VecDeque},
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
};
// crates.io
use base64::prelude::{BASE64_URL_SAFE_NO_PAD, Engine as _};
use parking_lot::Mutex;
use serde_json::{Value, json};
// self
use common::*;
use pubsub_rest::{
	config::ClientConfig,
	error::{Error, TransportError},
	http::HttpTransport,
	oauth::oauth2::{
		HttpClientError, HttpRequest, HttpResponse,
		http::{StatusCode, header::AUTHORIZATION},
	},
	pubsub::MessageClient,
	url::{Url, form_urlencoded},
};

#[derive(Debug)]
struct FakeTransportError;
impl Display for FakeTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Transport offline.")
	}
}
impl StdError for FakeTransportError {}

type Step = Result<(u16, Value), HttpClientError<FakeTransportError>>;

struct RecordedRequest {
	uri: String,
	authorization: Option<String>,
	body: Vec<u8>,
}

/// Replays canned responses in order and records every request it sees.
#[derive(Default)]
struct ScriptedTransport {
	responses: Mutex<VecDeque<Step>>,
	requests: Mutex<Vec<RecordedRequest>>,
}
impl ScriptedTransport {
	fn respond(self, status: u16, body: Value) -> Self {
		self.script(Ok((status, body)))
	}

	fn fail(self, err: HttpClientError<FakeTransportError>) -> Self {
		self.script(Err(err))
	}

	fn script(self, step: Step) -> Self {
		self.responses.lock().push_back(step);

		self
	}

	fn take_recorded(&self) -> Vec<RecordedRequest> {
		std::mem::take(&mut *self.requests.lock())
	}
}
impl HttpTransport for ScriptedTransport {
	type TransportError = FakeTransportError;

	fn execute(
		&self,
		request: HttpRequest,
	) -> Result<HttpResponse, HttpClientError<Self::TransportError>> {
		let authorization = request
			.headers()
			.get(AUTHORIZATION)
			.and_then(|value| value.to_str().ok())
			.map(ToOwned::to_owned);

		self.requests.lock().push(RecordedRequest {
			uri: request.uri().to_string(),
			authorization,
			body: request.into_body(),
		});

		let (status, body) = self
			.responses
			.lock()
			.pop_front()
			.expect("Every request should have a scripted response.")?;
		let mut response = HttpResponse::new(
			serde_json::to_vec(&body).expect("Scripted response body should serialize."),
		);

		*response.status_mut() =
			StatusCode::from_u16(status).expect("Scripted status should be valid.");

		Ok(response)
	}
}

fn config() -> ClientConfig {
	ClientConfig::builder()
		.api_base(Url::parse("https://pubsub.test/v1").expect("Test API base should parse."))
		.token_endpoint(Url::parse("https://oauth.test/token").expect("Test token URL should parse."))
		.build()
		.expect("Test configuration should validate.")
}

fn form(request: &RecordedRequest) -> BTreeMap<String, String> {
	form_urlencoded::parse(&request.body).into_owned().collect()
}

fn claims(assertion: &str) -> Value {
	let payload = assertion.split('.').nth(1).expect("Assertion should carry a claims segment.");
	let bytes = BASE64_URL_SAFE_NO_PAD.decode(payload).expect("Claims segment should be base64url.");

	serde_json::from_slice(&bytes).expect("Claims segment should be JSON.")
}

#[test]
fn custom_transport_carries_token_then_publish() {
	let transport = ScriptedTransport::default()
		.respond(200, json!({ "access_token": ACCESS_TOKEN, "expires_in": 3599 }))
		.respond(200, json!({ "messageIds": ["1"] }));
	let client = MessageClient::<ScriptedTransport>::with_http_client(&config(), transport);

	client
		.publish(&credential(), &topic("events"), "hello", BTreeMap::new())
		.expect("Publish should succeed.");

	let requests = client.tokens.http_client.take_recorded();

	assert_eq!(requests.len(), 2);

	let token_form = form(&requests[0]);
	let claims = claims(&token_form["assertion"]);

	assert_eq!(requests[0].uri, "https://oauth.test/token");
	assert_eq!(token_form["grant_type"], "urn:ietf:params:oauth:grant-type:jwt-bearer");
	assert_eq!(claims["iss"], "publisher@test-project.iam.gserviceaccount.com");
	assert_eq!(claims["aud"], "https://oauth.test/token");
	assert_eq!(claims["scope"], "https://www.googleapis.com/auth/pubsub");
	assert_eq!(claims["exp"].as_i64().zip(claims["iat"].as_i64()).map(|(e, i)| e - i), Some(3600));

	assert_eq!(
		requests[1].uri,
		"https://pubsub.test/v1/projects/test-project/topics/events:publish"
	);
	assert_eq!(requests[1].authorization.as_deref(), Some(BEARER));
	assert_eq!(
		serde_json::from_slice::<Value>(&requests[1].body).expect("Publish body should be JSON."),
		json!({ "messages": [{ "data": "aGVsbG8=" }] })
	);
}

#[test]
fn custom_transport_errors_keep_endpoint_label() {
	let transport = ScriptedTransport::default()
		.respond(200, json!({ "access_token": ACCESS_TOKEN }))
		.fail(HttpClientError::Other("socket closed".into()));
	let client = MessageClient::<ScriptedTransport>::with_http_client(&config(), transport);
	let err = client
		.pull(&credential(), &subscription("orders-sub"), 1, false)
		.expect_err("Transport failure must surface.");

	assert!(matches!(
		err,
		Error::Transport(TransportError::Other { endpoint: "pull", ref message })
			if message == "socket closed"
	));
}
