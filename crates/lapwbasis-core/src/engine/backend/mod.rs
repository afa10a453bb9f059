//! The persistence contract the repository is built on.
//!
//! The engine never talks to a database directly. It is handed a [`Backend`] and relies only on
//! the operations below: create, lookup by key, update, and "all records whose attribute equals
//! a value" (basis files by content hash, families by kind). Implementations must offer
//! read-your-writes consistency to the calling process and be shareable across threads.

mod memory;

pub use memory::MemoryBackend;

use crate::core::models::basis_file::{BasisFile, BasisFileId};
use crate::core::models::family::{Family, FamilyKind};
use crate::core::models::hash::ContentHash;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Record already exists: {0}")]
    AlreadyExists(String),
    #[error("Record does not exist: {0}")]
    Missing(String),
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

pub trait Backend: Send + Sync {
    /// Stores a new basis file and returns the identifier assigned to it.
    ///
    /// Identifiers must increase with every call. Uniqueness of the content hash is not enforced
    /// here; duplicates are detected and resolved by the content store.
    fn insert_basis_file(&self, file: &BasisFile) -> Result<BasisFileId, BackendError>;

    fn basis_file(&self, id: BasisFileId) -> Result<Option<BasisFile>, BackendError>;

    /// Returns every stored basis file carrying `hash`, in any order.
    fn basis_files_with_hash(&self, hash: &ContentHash) -> Result<Vec<BasisFile>, BackendError>;

    /// Stores a family that does not exist yet under its `(name, kind)`.
    fn insert_family(&self, family: &Family) -> Result<(), BackendError>;

    /// Replaces the stored state of an existing family.
    fn update_family(&self, family: &Family) -> Result<(), BackendError>;

    fn family(&self, name: &str, kind: &FamilyKind) -> Result<Option<Family>, BackendError>;

    /// Returns every family of `kind`, in any order.
    fn families(&self, kind: &FamilyKind) -> Result<Vec<Family>, BackendError>;
}
