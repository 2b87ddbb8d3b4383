//! Service-account credentials, resource identifiers, secrets, and JWT assertions.

pub mod assertion;
pub mod credential;
pub mod id;
pub mod secret;

pub use assertion::*;
pub use credential::*;
pub use id::*;
pub use secret::*;
