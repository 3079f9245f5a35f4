//! Core library for the municipal profile reporting suite.
//!
//! Each topical part of a profile report (introduction, demographics,
//! economics, ...) is produced by a section manager that reconciles raw
//! census facts into a deterministic, versioned content object for the
//! rendering stage. This crate hosts the introduction section manager, the
//! census ingestion pipeline that feeds it, and the service plumbing shared
//! by every section (config, telemetry, errors).

pub mod config;
pub mod error;
pub mod sections;
pub mod sources;
pub mod telemetry;
