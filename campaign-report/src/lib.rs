//! Command-line views over the campaign API: the dashboard's derived
//! aggregations rendered as JSON documents.

pub mod cli;
pub mod report;

pub use cli::{Cli, Command};
pub use report::run;
