//! Service-account credential decoding.

// std
use std::io::Read;
// self
use crate::{
	_prelude::*,
	auth::{PrivateKeyPem, ProjectId},
	error::DecodeError,
};

/// Service-account identity used to sign assertions and address project resources.
///
/// Only `private_key`, `client_email`, and `project_id` are read from the JSON key file; the
/// remaining fields Google writes (`type`, `private_key_id`, `client_id`, `token_uri`, ...) are
/// ignored. The value is never mutated after decoding and is safe to share across threads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
	/// PEM-encoded PKCS#8 RSA private key.
	pub private_key: PrivateKeyPem,
	/// Service-account email, used as the JWT issuer.
	pub client_email: String,
	/// Project that owns the topics and subscriptions addressed by this credential.
	pub project_id: ProjectId,
}
impl Credential {
	/// Creates a credential from already-loaded parts.
	pub fn new(
		private_key: impl Into<String>,
		client_email: impl Into<String>,
		project_id: ProjectId,
	) -> Self {
		Self {
			private_key: PrivateKeyPem::new(private_key),
			client_email: client_email.into(),
			project_id,
		}
	}

	/// Decodes a service-account JSON document from any reader.
	pub fn from_reader(reader: impl Read) -> Result<Self> {
		Self::decode(serde_json::Deserializer::from_reader(reader))
	}

	/// Decodes a service-account JSON document from bytes.
	pub fn from_slice(bytes: &[u8]) -> Result<Self> {
		Self::decode(serde_json::Deserializer::from_slice(bytes))
	}

	fn decode<'de, R>(mut de: serde_json::Deserializer<R>) -> Result<Self>
	where
		R: serde_json::de::Read<'de>,
	{
		serde_path_to_error::deserialize(&mut de)
			.map_err(|source| DecodeError::Credential { source }.into())
	}
}
impl FromStr for Credential {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		Self::from_slice(s.as_bytes())
	}
}
