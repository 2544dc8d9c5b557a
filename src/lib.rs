//! Auto-update engine for desktop applications.
//!
//! Fetches a release feed, projects it against the running version and the
//! early-access opt-in, downloads the matching installer into a local
//! cache, verifies its SHA-512 checksum, and hands the validated path to a
//! launcher. The pipeline is a chain of immutable state values; see
//! [`update::UpdateState`].

pub mod cache;
pub mod config;
pub mod error;
pub mod feed;
pub mod http;
pub mod logging;
pub mod update;

pub use error::{Result, UpdateError};
