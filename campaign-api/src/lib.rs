//! Typed client for the campaign backend.
//!
//! [`client::ApiClient`] is the thin HTTP layer; [`CampaignApi`] adds the
//! operating group, per-entity data hooks, the query cache and mutations
//! that invalidate it.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod hooks;
pub mod mutations;
pub mod params;

pub use cache::{QueryCache, QueryKey};
pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::ApiError;
pub use hooks::CampaignApi;
pub use params::QueryParams;
