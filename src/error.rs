//! Client-level error types shared across assertion signing, token exchange, and the message API.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;
type JsonPathError = serde_path_to_error::Error<serde_json::Error>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration or request-construction problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Malformed credential, token response, or message payload.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Assertion could not be built or signed.
	#[error(transparent)]
	Assertion(#[from] AssertionError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Endpoint answered with a status the operation does not accept.
	#[error("The {endpoint} endpoint returned HTTP {status}: {body}")]
	UnexpectedStatus {
		/// Endpoint label (`token`, `publish`, `pull`, `acknowledge`).
		endpoint: &'static str,
		/// HTTP status code.
		status: u16,
		/// Response body text kept for diagnostics.
		body: String,
	},
	/// Token endpoint rejected the signed assertion.
	#[error("Token endpoint rejected the assertion: {reason}.")]
	InvalidGrant {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Token endpoint does not recognize or trust the service account.
	#[error("Service account authentication failed: {reason}.")]
	InvalidClient {
		/// Provider-supplied reason string.
		reason: String,
	},
}

/// Configuration and request-construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Endpoint URL cannot carry resource path segments.
	#[error("The {endpoint} endpoint cannot be used as a base URL: {url}.")]
	InvalidEndpoint {
		/// Endpoint label.
		endpoint: &'static str,
		/// Offending URL.
		url: String,
	},
	/// JSON request body could not be serialized.
	#[error("Request body could not be serialized.")]
	RequestBody(#[from] serde_json::Error),
	/// Pull requests must ask for at least one message.
	#[error("The maxMessages value must be at least 1.")]
	ZeroMaxMessages,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Decoding failures for inbound JSON.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Service-account JSON could not be parsed.
	#[error("Service account credential is malformed.")]
	Credential {
		/// Structured parsing failure.
		#[source]
		source: JsonPathError,
	},
	/// Endpoint responded with JSON that could not be parsed.
	#[error("The {endpoint} endpoint returned malformed JSON (HTTP {status}).")]
	Response {
		/// Endpoint label.
		endpoint: &'static str,
		/// HTTP status code.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: JsonPathError,
	},
	/// Token endpoint response carried no usable `access_token`.
	#[error("Token endpoint response is missing access_token.")]
	MissingAccessToken,
}

/// Failures while building or signing a JWT assertion.
#[derive(Debug, ThisError)]
pub enum AssertionError {
	/// Private key is not a PEM-encoded PKCS#8 RSA key.
	#[error("Service account private key is not a PEM-encoded PKCS#8 RSA key.")]
	InvalidKey {
		/// Underlying PKCS#8 failure.
		#[source]
		source: rsa::pkcs8::Error,
	},
	/// RSASSA-PKCS1-v1_5 signing failed.
	#[error("Assertion could not be signed.")]
	Signing {
		/// Underlying signature failure.
		#[source]
		source: rsa::signature::Error,
	},
	/// JWT header or claim could not be serialized.
	#[error("Assertion segment could not be serialized.")]
	Encode(#[from] serde_json::Error),
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the {endpoint} endpoint.")]
	Network {
		/// Endpoint label.
		endpoint: &'static str,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the {endpoint} endpoint.")]
	Io {
		/// Endpoint label.
		endpoint: &'static str,
		/// IO failure.
		#[source]
		source: std::io::Error,
	},
	/// HTTP client reported a failure without a structured source.
	#[error("HTTP client error occurred while calling the {endpoint} endpoint: {message}.")]
	Other {
		/// Endpoint label.
		endpoint: &'static str,
		/// Client-supplied message.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(endpoint: &'static str, src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { endpoint, source: Box::new(src) }
	}
}
