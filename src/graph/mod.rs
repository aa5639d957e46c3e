//! Microsoft Graph access for the B2C directory.
//!
//! Provides the request dispatcher plus the request/response types the
//! command router builds and inspects.

pub mod client;
pub mod models;

pub use client::GraphClient;
pub use models::{GraphRequest, GraphResponse};
