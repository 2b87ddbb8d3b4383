//! JWT-bearer token exchange (RFC 7523) against the OAuth 2.0 token endpoint.

pub use oauth2;

// crates.io
use oauth2::http::{
	Method, Request,
	header::{ACCEPT, CONTENT_TYPE},
};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Assertion, AssertionBuilder, Credential},
	config::ClientConfig,
	error::{ConfigError, DecodeError},
	http::{self, HttpTransport},
	obs::{self, OperationKind},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Grant type sent with every assertion.
pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

const ENDPOINT: &str = "token";
const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

#[cfg(feature = "reqwest")]
/// Token exchanger specialized for the crate's default reqwest transport.
pub type ReqwestTokenExchanger = TokenExchanger<ReqwestHttpClient>;

#[derive(Deserialize)]
struct TokenResponse {
	#[serde(default)]
	access_token: Option<String>,
	#[serde(default)]
	#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
	token_type: Option<String>,
	#[serde(default)]
	#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
	expires_in: Option<u64>,
}

#[derive(Deserialize)]
struct TokenErrorResponse {
	error: String,
	#[serde(default)]
	error_description: Option<String>,
}

/// Exchanges signed assertions for bearer access tokens.
///
/// Every call signs a new assertion and performs one full round trip to the token endpoint;
/// nothing is cached, so callers that need reuse should hold on to the returned
/// [`AccessToken`] themselves.
#[derive(Clone)]
pub struct TokenExchanger<C>
where
	C: ?Sized + HttpTransport,
{
	/// HTTP transport used for the token request.
	pub http_client: Arc<C>,
	/// OAuth 2.0 token endpoint.
	pub token_endpoint: Url,
	/// Builder that signs the assertion (audience + scope).
	pub assertions: AssertionBuilder,
}
impl<C> TokenExchanger<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates an exchanger that reuses the caller-provided transport.
	pub fn with_http_client(config: &ClientConfig, http_client: impl Into<Arc<C>>) -> Self {
		Self {
			http_client: http_client.into(),
			token_endpoint: config.token_endpoint.clone(),
			assertions: AssertionBuilder::from_config(config),
		}
	}

	/// Signs an assertion for `credential` and exchanges it for an access token.
	pub fn fetch_access_token(&self, credential: &Credential) -> Result<AccessToken> {
		obs::observe(OperationKind::TokenExchange, "fetch_access_token", || {
			let assertion = self.assertions.build(credential)?;

			self.exchange(&assertion)
		})
	}

	/// Exchanges an already-signed assertion for an access token.
	pub fn exchange(&self, assertion: &Assertion) -> Result<AccessToken> {
		let body = form_urlencoded::Serializer::new(String::new())
			.append_pair("grant_type", JWT_BEARER_GRANT_TYPE)
			.append_pair("assertion", assertion.expose())
			.finish();
		let request = Request::builder()
			.method(Method::POST)
			.uri(self.token_endpoint.as_str())
			.header(CONTENT_TYPE, FORM_URLENCODED)
			.header(ACCEPT, "application/json")
			.body(body.into_bytes())
			.map_err(ConfigError::from)?;
		let response = http::send(self.http_client.as_ref(), ENDPOINT, request)?;

		if !response.status().is_success() {
			return Err(map_token_error(&response));
		}

		let token: TokenResponse = http::decode_json(ENDPOINT, &response)?;

		#[cfg(feature = "tracing")]
		tracing::debug!(
			token_type = token.token_type.as_deref(),
			expires_in = token.expires_in,
			"access token issued"
		);

		match token.access_token {
			Some(secret) if !secret.is_empty() => Ok(AccessToken::new(secret)),
			_ => Err(DecodeError::MissingAccessToken.into()),
		}
	}
}
#[cfg(feature = "reqwest")]
impl TokenExchanger<ReqwestHttpClient> {
	/// Creates an exchanger backed by a fresh redirect-free reqwest client.
	pub fn new(config: &ClientConfig) -> Result<Self> {
		Ok(Self::with_http_client(config, ReqwestHttpClient::new()?))
	}
}
impl<C> Debug for TokenExchanger<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenExchanger")
			.field("token_endpoint", &self.token_endpoint.as_str())
			.field("assertions", &self.assertions)
			.finish()
	}
}

fn map_token_error(response: &oauth2::HttpResponse) -> Error {
	let Ok(oauth_error) = serde_json::from_slice::<TokenErrorResponse>(response.body()) else {
		return http::unexpected_status(ENDPOINT, response);
	};
	let reason = oauth_error.error_description.unwrap_or_else(|| oauth_error.error.clone());

	match oauth_error.error.as_str() {
		"invalid_grant" => Error::InvalidGrant { reason },
		"invalid_client" | "unauthorized_client" => Error::InvalidClient { reason },
		_ => http::unexpected_status(ENDPOINT, response),
	}
}
