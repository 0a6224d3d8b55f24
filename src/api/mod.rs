//! REST API client module for the Classeviva platform.
//!
//! This module provides the `Client` for authenticating against the
//! platform, keeping the session alive, and fetching register data.
//!
//! Authentication uses an opaque bearer token carried in the `Z-Auth-Token`
//! header, obtained from the login endpoint and renewed in the background.

pub mod client;
mod endpoint;
pub mod error;

pub use client::Client;
pub use error::ApiError;
