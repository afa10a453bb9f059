//! Provides input functionality for LAPW species files.
//!
//! This module reads species files in their supported formats and extracts the one attribute the
//! repository indexes on, the chemical symbol. It also discovers candidate files in a directory.
//! Every function here is free of side effects on repository state.

pub mod discovery;
pub mod species;
pub mod traits;
