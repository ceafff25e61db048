//! Adapters - Concrete implementations of ports, plus the HTTP entry point.

#[cfg(feature = "aws")]
pub mod aws;

pub mod http;
pub mod local;
