//! Watches a varaosahaku.fi category page and raises an alert when a
//! category's parts become available.
//!
//! The scraping core is [`parser::extract`] plus [`matcher::find`] and
//! [`matcher::suggest`]; both are pure and do no I/O.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod matcher;
pub mod models;
pub mod monitor;
pub mod notifier;
pub mod parser;
pub mod report;

pub use matcher::{find, suggest};
pub use models::{Category, CategoryStatus};
pub use parser::extract;
