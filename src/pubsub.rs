//! Pub/Sub message models and the blocking message client.

pub mod client;
pub mod message;

pub use client::*;
pub use message::*;
