//! Consumed campaign data model and the derived views built from it.
//!
//! Everything here is pure: no I/O, no shared state. The API and UI crates
//! fetch collections and hand them to these functions on every render.

pub mod aggregates;
pub mod bulk;
pub mod dialog;
pub mod error;
pub mod heatmap;
pub mod models;
pub mod notify;
pub mod pagination;
pub mod support;

pub use error::CoreError;
pub use support::SupportLevel;
