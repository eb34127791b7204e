//! In-memory stand-in for the campaign backend.
//!
//! Serves the endpoints the dashboard consumes, with the same PascalCase
//! JSON shapes, from a seeded in-process store. Used for local UI work and
//! as the backend of the client integration tests. Nothing is persisted.

pub mod error;
pub mod hexgrid;
pub mod routes;
pub mod seed;
pub mod store;

pub use routes::router;
pub use store::StubState;
