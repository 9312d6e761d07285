//! # mfsync-core
//!
//! Core library for the metafield/metaobject synchronization tool.
//!
//! This library provides everything needed to copy custom data-schema
//! definitions (metafield definitions and metaobject definitions) and
//! metaobject entries from one store to another through the Admin GraphQL
//! API, independently of any terminal or argument parsing.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Core error types for the mfsync library
pub mod error {
    /// Result type alias using `anyhow::Error`
    pub type Result<T> = anyhow::Result<T>;
}

/// Definitions, entries and owner types
pub mod model;

/// Remote schema client seam and the GraphQL implementation
pub mod client;

/// Manifest parsing and matching
pub mod manifest;

/// Entry conflict resolution
pub mod conflict;

/// Definition synchronization engine
pub mod sync;

/// Markdown listing of definitions
pub mod report;

/// Configuration file parsing and management
pub mod config;

#[cfg(test)]
pub(crate) mod testing;
