//! Endpoint and scope configuration shared by the token exchanger and the message client.
//!
//! [`ClientConfig::google`] targets Google's production endpoints. Use
//! [`ClientConfig::builder`] to point the client at a regional endpoint, an emulator, or a local
//! mock; the builder insists on HTTPS unless insecure endpoints are explicitly allowed.

// self
use crate::_prelude::*;

/// Default Pub/Sub REST API base.
pub const DEFAULT_API_BASE: &str = "https://pubsub.googleapis.com/v1";
/// Default OAuth 2.0 token endpoint, also used as the assertion audience.
pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v4/token";
/// OAuth scope granting Pub/Sub access.
pub const PUBSUB_SCOPE: &str = "https://www.googleapis.com/auth/pubsub";

/// Errors raised while constructing or validating a [`ClientConfig`].
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ClientConfigError {
	/// A built-in endpoint constant failed to parse.
	#[error("The default {endpoint} endpoint is not a valid URL.")]
	InvalidDefault {
		/// Which endpoint failed to parse.
		endpoint: &'static str,
	},
	/// Endpoints must use HTTPS unless insecure endpoints are allowed.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Endpoint cannot carry path segments (e.g. `mailto:` or `data:` URLs).
	#[error("The {endpoint} endpoint cannot be used as a base URL: {url}.")]
	CannotBeABase {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Scope must be a single non-empty token.
	#[error("OAuth scope must be non-empty and contain no whitespace.")]
	InvalidScope,
}

/// Immutable endpoint configuration consumed by [`TokenExchanger`](crate::oauth::TokenExchanger)
/// and [`MessageClient`](crate::pubsub::MessageClient).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
	/// Pub/Sub REST API base (`.../v1`); resource paths are appended to it.
	pub api_base: Url,
	/// OAuth 2.0 token endpoint; doubles as the JWT `aud` claim.
	pub token_endpoint: Url,
	/// OAuth scope placed in the JWT `scope` claim.
	pub scope: String,
}
impl ClientConfig {
	/// Creates a new builder seeded with the default endpoints.
	pub fn builder() -> ClientConfigBuilder {
		ClientConfigBuilder::new()
	}

	/// Returns the production configuration.
	pub fn google() -> Result<Self, ClientConfigError> {
		Self::builder().build()
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
	/// API base override.
	pub api_base: Option<Url>,
	/// Token endpoint override.
	pub token_endpoint: Option<Url>,
	/// Scope override.
	pub scope: Option<String>,
	/// Accepts `http://` endpoints when set.
	pub allow_insecure: bool,
}
impl ClientConfigBuilder {
	/// Creates an empty builder; unset fields fall back to the defaults.
	pub fn new() -> Self {
		Self::default()
	}

	/// Overrides the API base.
	pub fn api_base(mut self, url: Url) -> Self {
		self.api_base = Some(url);

		self
	}

	/// Overrides the token endpoint (and therefore the assertion audience).
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Overrides the OAuth scope.
	pub fn scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = Some(scope.into());

		self
	}

	/// Accepts plain-HTTP endpoints, for emulators and local test servers.
	pub fn allow_insecure_endpoints(mut self) -> Self {
		self.allow_insecure = true;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ClientConfigError> {
		let api_base = match self.api_base {
			Some(url) => url,
			None => parse_default("api", DEFAULT_API_BASE)?,
		};
		let token_endpoint = match self.token_endpoint {
			Some(url) => url,
			None => parse_default("token", DEFAULT_TOKEN_ENDPOINT)?,
		};
		let config = ClientConfig {
			api_base,
			token_endpoint,
			scope: self.scope.unwrap_or_else(|| PUBSUB_SCOPE.into()),
		};

		config.validate(self.allow_insecure)?;

		Ok(config)
	}
}

impl ClientConfig {
	fn validate(&self, allow_insecure: bool) -> Result<(), ClientConfigError> {
		validate_endpoint("api", &self.api_base, allow_insecure)?;
		validate_endpoint("token", &self.token_endpoint, allow_insecure)?;

		if self.scope.is_empty() || self.scope.chars().any(char::is_whitespace) {
			return Err(ClientConfigError::InvalidScope);
		}

		Ok(())
	}
}

fn validate_endpoint(
	name: &'static str,
	url: &Url,
	allow_insecure: bool,
) -> Result<(), ClientConfigError> {
	if url.cannot_be_a_base() {
		return Err(ClientConfigError::CannotBeABase { endpoint: name, url: url.to_string() });
	}

	match url.scheme() {
		"https" => Ok(()),
		"http" if allow_insecure => Ok(()),
		_ => Err(ClientConfigError::InsecureEndpoint { endpoint: name, url: url.to_string() }),
	}
}

fn parse_default(name: &'static str, raw: &str) -> Result<Url, ClientConfigError> {
	Url::parse(raw).map_err(|_| ClientConfigError::InvalidDefault { endpoint: name })
}
