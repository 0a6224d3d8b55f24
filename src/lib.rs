//! Client library for the Classeviva school platform REST API.
//!
//! The crate logs in with a credential pair, keeps the session alive across
//! process restarts through an on-disk cache, renews it in the background on
//! a fixed cadence, and exposes the platform's data endpoints (grades,
//! absences, agenda, lessons, noticeboard, documents, ...) as typed async
//! methods.
//!
//! ```no_run
//! use classeviva::{Client, ClientConfig};
//!
//! # async fn run() -> Result<(), classeviva::ApiError> {
//! let client = Client::new(ClientConfig::with_credentials("S1234567X", "password"))?;
//! let profile = client.login().await?;
//! println!("hello {}", profile.name);
//! for grade in client.grades().await? {
//!     println!("{:?}: {:?}", grade.subject_desc, grade.display_value);
//! }
//! client.logout().await;
//! # Ok(())
//! # }
//! ```
//!
//! Failures never panic: every method returns `Result` and also emits a
//! `tracing` event, so embedders choose their own log subscriber.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod utils;

pub use api::{ApiError, Client};
pub use config::{ClientConfig, Region};
pub use models::{AgendaFilter, Profile};
