//! Optional observability helpers for client operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `pubsub_rest.operation` with the
//!   `operation` and `stage` (call site) fields, plus `debug!` events carrying HTTP statuses and
//!   message counts. Tokens, assertions, and keys are never recorded.
//! - Enable `metrics` to increment the `pubsub_rest_operation_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// JWT-bearer assertion exchanged for an access token.
	TokenExchange,
	/// Single-message publish.
	Publish,
	/// Synchronous pull (with optional auto-acknowledge).
	Pull,
	/// Acknowledge of previously pulled messages.
	Acknowledge,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::TokenExchange => "token_exchange",
			OperationKind::Publish => "publish",
			OperationKind::Pull => "pull",
			OperationKind::Acknowledge => "acknowledge",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to a client operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `op` inside an operation span and records attempt plus success/failure outcomes.
pub(crate) fn observe<T>(
	kind: OperationKind,
	stage: &'static str,
	op: impl FnOnce() -> Result<T>,
) -> Result<T> {
	let _guard = OperationSpan::new(kind, stage).entered();

	record_operation_outcome(kind, OperationOutcome::Attempt);

	let result = op();

	match &result {
		Ok(_) => record_operation_outcome(kind, OperationOutcome::Success),
		Err(_e) => {
			#[cfg(feature = "tracing")]
			::tracing::debug!(error = %_e, "operation failed");

			record_operation_outcome(kind, OperationOutcome::Failure);
		},
	}

	result
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::ConfigError;

	#[test]
	fn labels_are_stable() {
		assert_eq!(OperationKind::TokenExchange.to_string(), "token_exchange");
		assert_eq!(OperationKind::Acknowledge.as_str(), "acknowledge");
		assert_eq!(OperationOutcome::Failure.to_string(), "failure");
	}

	#[test]
	fn observe_passes_results_through() {
		let ok = observe(OperationKind::Publish, "test", || Ok(7));

		assert_eq!(ok.expect("Closure result should pass through."), 7);

		let err = observe::<()>(OperationKind::Pull, "test", || {
			Err(ConfigError::ZeroMaxMessages.into())
		});

		assert!(matches!(err, Err(Error::Config(ConfigError::ZeroMaxMessages))));
	}
}
