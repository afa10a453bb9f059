//! # Core Module
//!
//! This module provides the fundamental building blocks of the repository: the data model for
//! species files and families, and the stateless I/O routines that turn files on disk into that
//! model.
//!
//! ## Architecture
//!
//! - **Data Model** ([`models`]) - Content hashes, basis files, families and identities
//! - **File I/O** ([`io`]) - Species metadata extraction and candidate file discovery
//! - **Utilities** ([`utils`]) - Chemical symbol normalization
//!
//! Nothing in this module touches persistent state. Every function is either a pure transformation
//! or a read-only filesystem query, which keeps the engine free to decide when, and in which order,
//! anything is written.

pub mod io;
pub mod models;
pub mod utils;
