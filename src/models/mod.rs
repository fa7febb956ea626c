//! Models Module - Data Structures & Configuration
//!
//! Decoded-metadata types, service configuration and the service error type.

pub mod config;
pub mod errors;
pub mod types;

pub use config::*;
pub use errors::*;
pub use types::*;
