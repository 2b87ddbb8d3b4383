//! RS256 JWT assertions for the OAuth 2.0 JWT-bearer grant.
//!
//! An assertion is `b64url(header).b64url(claims).b64url(signature)` with padding stripped from
//! every segment. The signature is RSASSA-PKCS1-v1_5 over SHA-256 of the first two segments,
//! produced with the service account's PKCS#8 RSA key. PKCS1-v1_5 is deterministic, so the same
//! credential signed at the same second yields the same assertion.

// crates.io
use base64::prelude::{BASE64_URL_SAFE_NO_PAD, Engine as _};
use rsa::{
	RsaPrivateKey,
	pkcs1v15::SigningKey,
	pkcs8::DecodePrivateKey,
	signature::{SignatureEncoding, Signer},
};
use sha2::Sha256;
// self
use crate::{
	_prelude::*,
	auth::{Assertion, Credential, PrivateKeyPem},
	config::{ClientConfig, DEFAULT_TOKEN_ENDPOINT, PUBSUB_SCOPE},
	error::AssertionError,
};

/// Validity window written into every assertion (`exp - iat`).
pub const ASSERTION_LIFETIME: Duration = Duration::seconds(3600);

const HEADER: JwtHeader = JwtHeader { alg: "RS256", typ: "JWT" };

#[derive(Serialize)]
struct JwtHeader {
	alg: &'static str,
	typ: &'static str,
}

#[derive(Serialize)]
struct JwtClaims<'a> {
	iss: &'a str,
	scope: &'a str,
	aud: &'a str,
	#[serde(with = "time::serde::timestamp")]
	iat: OffsetDateTime,
	#[serde(with = "time::serde::timestamp")]
	exp: OffsetDateTime,
}

/// Signs assertions for a fixed audience and scope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssertionBuilder {
	/// Token endpoint the assertion is addressed to (`aud`).
	pub audience: String,
	/// Space-free OAuth scope requested by the assertion (`scope`).
	pub scope: String,
}
impl AssertionBuilder {
	/// Creates a builder for an explicit audience and scope.
	pub fn new(audience: impl Into<String>, scope: impl Into<String>) -> Self {
		Self { audience: audience.into(), scope: scope.into() }
	}

	/// Creates a builder that targets the configured token endpoint and scope.
	pub fn from_config(config: &ClientConfig) -> Self {
		Self::new(config.token_endpoint.as_str(), config.scope.as_str())
	}

	/// Builds and signs an assertion issued now.
	pub fn build(&self, credential: &Credential) -> Result<Assertion> {
		self.build_at(credential, OffsetDateTime::now_utc())
	}

	/// Builds and signs an assertion issued at `issued_at`; sub-second precision is dropped.
	pub fn build_at(&self, credential: &Credential, issued_at: OffsetDateTime) -> Result<Assertion> {
		let claims = JwtClaims {
			iss: &credential.client_email,
			scope: &self.scope,
			aud: &self.audience,
			iat: issued_at,
			exp: issued_at + ASSERTION_LIFETIME,
		};
		let signing_input = format!("{}.{}", encode_segment(&HEADER)?, encode_segment(&claims)?);
		let signature = sign(&credential.private_key, signing_input.as_bytes())?;

		Ok(Assertion::new(format!(
			"{signing_input}.{}",
			BASE64_URL_SAFE_NO_PAD.encode(signature)
		)))
	}
}
impl Default for AssertionBuilder {
	fn default() -> Self {
		Self::new(DEFAULT_TOKEN_ENDPOINT, PUBSUB_SCOPE)
	}
}

/// Builds an assertion for Google's token endpoint and the Pub/Sub scope.
pub fn build_assertion(credential: &Credential) -> Result<Assertion> {
	AssertionBuilder::default().build(credential)
}

fn encode_segment<T>(value: &T) -> Result<String, AssertionError>
where
	T: Serialize,
{
	let json = serde_json::to_vec(value)?;

	Ok(BASE64_URL_SAFE_NO_PAD.encode(json))
}

fn sign(key: &PrivateKeyPem, message: &[u8]) -> Result<Box<[u8]>, AssertionError> {
	let key = RsaPrivateKey::from_pkcs8_pem(key.expose())
		.map_err(|source| AssertionError::InvalidKey { source })?;
	let signature = SigningKey::<Sha256>::new(key)
		.try_sign(message)
		.map_err(|source| AssertionError::Signing { source })?;

	Ok(signature.to_bytes())
}
