//! # Core Models Module
//!
//! The data structures shared by every layer of the repository.
//!
//! ## Key Components
//!
//! - [`hash`] - The content hash that identifies a file by its bytes
//! - [`basis_file`] - Basis file records, their identifiers and source formats
//! - [`family`] - Families, family kinds and caller identities
//!
//! ## Usage
//!
//! ```ignore
//! use lapwbasis::core::models::{family::{Family, FamilyKind, UserId}, hash::ContentHash};
//!
//! let mut family = Family::new("set1", FamilyKind::basis_set(), UserId::new("alice"));
//! family.add_members([ContentHash::of(b"<sp chemicalSymbol=\"H\"/>")]);
//! ```

pub mod basis_file;
pub mod family;
pub mod hash;
