//! Transport primitives for token exchanges and Pub/Sub REST calls.
//!
//! [`HttpTransport`] is the client's only dependency on an HTTP stack. It speaks the
//! `oauth2` crate's [`HttpRequest`]/[`HttpResponse`] types (plain `http` requests with `Vec<u8>`
//! bodies) and reports failures as [`HttpClientError`], so any blocking client can be plugged
//! in. The default implementation, [`ReqwestHttpClient`], wraps `reqwest::blocking::Client`.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
use oauth2::{
	HttpClientError, HttpRequest, HttpResponse,
	http::{
		HeaderValue, Method, Request, StatusCode,
		header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
	},
};
#[cfg(feature = "reqwest")] use oauth2::SyncHttpClient;
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	error::{ConfigError, DecodeError, TransportError},
};

pub(crate) const JSON_UTF8: &str = "application/json; charset=utf-8";

/// Blocking HTTP transport used for every outbound request.
///
/// Implementations must be `Send + Sync + 'static` so one transport (typically behind
/// `Arc<T>`) can serve concurrent callers. Each call is a single request/response exchange;
/// implementations should not follow redirects or retry on their own.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Sends `request` and returns the full response, whatever its status.
	fn execute(
		&self,
		request: HttpRequest,
	) -> Result<HttpResponse, HttpClientError<Self::TransportError>>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Token and API endpoints answer directly, so a client built through
/// [`ReqwestHttpClient::new`] disables redirect following; configure any custom
/// [`ReqwestClient`] the same way.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Builds a blocking reqwest client that never follows redirects.
	pub fn new() -> Result<Self> {
		let client = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.map_err(ConfigError::from)?;

		Ok(Self(client))
	}

	/// Wraps an existing blocking reqwest [`ReqwestClient`].
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
impl Debug for ReqwestHttpClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("ReqwestHttpClient(..)")
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(
		&self,
		request: HttpRequest,
	) -> Result<HttpResponse, HttpClientError<Self::TransportError>> {
		SyncHttpClient::call(&self.0, request)
	}
}

/// Executes `request`, mapping transport failures into client errors tagged with `endpoint`.
pub(crate) fn send<C>(transport: &C, endpoint: &'static str, request: HttpRequest) -> Result<HttpResponse>
where
	C: ?Sized + HttpTransport,
{
	let response =
		transport.execute(request).map_err(|err| map_transport_error(endpoint, err))?;

	#[cfg(feature = "tracing")]
	tracing::debug!(endpoint, status = response.status().as_u16(), "received response");

	Ok(response)
}

/// Builds an authorized JSON `POST` for the Pub/Sub API.
pub(crate) fn json_post<T>(url: &Url, token: &AccessToken, body: &T) -> Result<HttpRequest>
where
	T: ?Sized + Serialize,
{
	let body = serde_json::to_vec(body).map_err(ConfigError::from)?;
	let mut authorization = HeaderValue::try_from(format!("Bearer {}", token.expose()))
		.map_err(|e| ConfigError::from(oauth2::http::Error::from(e)))?;

	authorization.set_sensitive(true);

	Request::builder()
		.method(Method::POST)
		.uri(url.as_str())
		.header(AUTHORIZATION, authorization)
		.header(ACCEPT, JSON_UTF8)
		.header(CONTENT_TYPE, JSON_UTF8)
		.body(body)
		.map_err(|e| ConfigError::from(e).into())
}

/// Fails with [`Error::UnexpectedStatus`] unless the response carries `expected`.
pub(crate) fn ensure_status(
	endpoint: &'static str,
	response: &HttpResponse,
	expected: StatusCode,
) -> Result<()> {
	if response.status() == expected {
		return Ok(());
	}

	Err(unexpected_status(endpoint, response))
}

pub(crate) fn unexpected_status(endpoint: &'static str, response: &HttpResponse) -> Error {
	Error::UnexpectedStatus {
		endpoint,
		status: response.status().as_u16(),
		body: String::from_utf8_lossy(response.body()).into_owned(),
	}
}

/// Parses a JSON response body with path-aware diagnostics.
pub(crate) fn decode_json<T>(endpoint: &'static str, response: &HttpResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut de = serde_json::Deserializer::from_slice(response.body());

	serde_path_to_error::deserialize(&mut de).map_err(|source| {
		DecodeError::Response { endpoint, status: response.status().as_u16(), source }.into()
	})
}

fn map_transport_error<E>(endpoint: &'static str, err: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		#[cfg(feature = "reqwest")]
		HttpClientError::Reqwest(inner) => TransportError::network(endpoint, *inner).into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(source) => TransportError::Io { endpoint, source }.into(),
		HttpClientError::Other(message) => TransportError::Other { endpoint, message }.into(),
		other => TransportError::Other { endpoint, message: other.to_string() }.into(),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn response(status: u16, body: &str) -> HttpResponse {
		let mut response = HttpResponse::new(body.as_bytes().to_vec());

		*response.status_mut() = StatusCode::from_u16(status).expect("Test status should be valid.");

		response
	}

	#[test]
	fn json_post_sets_headers_and_marks_token_sensitive() {
		let url = Url::parse("https://pubsub.googleapis.com/v1/projects/p/topics/t:publish")
			.expect("Test URL should parse.");
		let request = json_post(&url, &AccessToken::new("ya29.token"), &serde_json::json!({"a": 1}))
			.expect("Request should build.");
		let headers = request.headers();

		assert_eq!(request.method(), Method::POST);
		assert_eq!(request.uri().to_string(), url.as_str());
		assert_eq!(headers[AUTHORIZATION], "Bearer ya29.token");
		assert!(headers[AUTHORIZATION].is_sensitive());
		assert_eq!(headers[ACCEPT], JSON_UTF8);
		assert_eq!(headers[CONTENT_TYPE], JSON_UTF8);
		assert_eq!(request.body().as_slice(), br#"{"a":1}"#);
	}

	#[test]
	fn json_post_rejects_tokens_that_break_headers() {
		let url = Url::parse("https://pubsub.googleapis.com/v1").expect("Test URL should parse.");
		let err = json_post(&url, &AccessToken::new("bad\ntoken"), &())
			.expect_err("Newlines cannot appear in header values.");

		assert!(matches!(err, Error::Config(ConfigError::HttpRequest(_))));
	}

	#[test]
	fn ensure_status_keeps_body_text() {
		assert!(ensure_status("pull", &response(200, "{}"), StatusCode::OK).is_ok());

		match ensure_status("pull", &response(403, "denied"), StatusCode::OK) {
			Err(Error::UnexpectedStatus { endpoint, status, body }) => {
				assert_eq!(endpoint, "pull");
				assert_eq!(status, 403);
				assert_eq!(body, "denied");
			},
			other => panic!("Unexpected result: {other:?}."),
		}
	}

	#[test]
	fn decode_json_reports_path_and_status() {
		#[derive(Debug, Deserialize)]
		#[allow(dead_code)]
		struct Body {
			items: Vec<u32>,
		}

		let err = decode_json::<Body>("pull", &response(200, r#"{"items":[1,"two"]}"#))
			.expect_err("Mistyped items must fail.");

		match err {
			Error::Decode(DecodeError::Response { endpoint, status, source }) => {
				assert_eq!(endpoint, "pull");
				assert_eq!(status, 200);
				assert_eq!(source.path().to_string(), "items[1]");
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn transport_errors_keep_endpoint_label() {
		let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
		let err = map_transport_error::<std::io::Error>("token", HttpClientError::Io(io));

		assert!(matches!(err, Error::Transport(TransportError::Io { endpoint: "token", .. })));

		let err =
			map_transport_error::<std::io::Error>("publish", HttpClientError::Other("boom".into()));

		assert_eq!(
			err.to_string(),
			"HTTP client error occurred while calling the publish endpoint: boom."
		);
	}
}
