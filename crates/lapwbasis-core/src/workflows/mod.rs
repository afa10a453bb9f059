//! # Workflows Module
//!
//! High-level entry points that drive the engine components through a complete repository
//! operation.
//!
//! ## Overview
//!
//! Each workflow takes a [`Backend`](crate::engine::backend::Backend) and a configuration,
//! orchestrates the content store and family registry, reports progress and returns a plain
//! summary value.
//!
//! ## Architecture
//!
//! - **Upload Workflow** ([`upload`]) - Discovers the species files of a directory, deduplicates
//!   them by content hash and commits the new members of a family in one pass.
//! - **Listing Workflow** ([`list`]) - Lists families of a kind, optionally restricted to an owner
//!   or to families covering a set of elements.

pub mod list;
pub mod upload;
