//! Minimal blocking Google Cloud Pub/Sub REST client: service-account JWT assertions, bearer
//! token exchange, and publish/pull/acknowledge over JSON/HTTPS.
//!
//! Every operation signs a fresh assertion, exchanges it for a fresh access token, and then issues
//! exactly one API call (pull with auto-acknowledge issues a second call with the same token).
//! Nothing is cached and nothing is global: the [`Credential`](auth::Credential) is passed to each
//! call explicitly so one client can serve many service accounts from many threads.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod pubsub;

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		str::FromStr,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Error as ReqwestError, blocking::Client as ReqwestClient};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, parking_lot as _};
