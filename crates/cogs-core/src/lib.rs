#![forbid(unsafe_code)]
//! cogs-core library.
//!
//! Catalog data model, market segment classification, analysis
//! configuration, and the error taxonomy shared by the cogs crates.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums at the catalog boundary, `anyhow::Result`
//!   for file loading.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod catalog;
pub mod config;
pub mod error;
pub mod segment;

pub use catalog::{Catalog, Usage};
pub use config::{AnalysisConfig, SegmentConfig};
pub use error::{CatalogError, ConfigError, ErrorCode};
pub use segment::{Segment, SegmentClassifier, SegmentMap};
