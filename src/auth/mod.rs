//! Authentication module for session state and its durable cache.
//!
//! This module provides:
//! - `Session`: the in-memory token + expiry pair with derived authorization
//! - `LoginPayload`: the raw login response, also the on-disk record shape
//! - `SessionCache`: the JSON file that survives process restarts
//!
//! A cached record is adopted only while its expiry is in the future;
//! anything else is treated as absent and left untouched on disk.

pub mod session;

pub use session::{LoginPayload, Session, SessionCache};
