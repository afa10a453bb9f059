//! # Engine Module
//!
//! The stateful layer of the repository. Everything here works against an injected
//! [`Backend`](backend::Backend) and never assumes a particular persistence engine.
//!
//! ## Architecture
//!
//! - **Persistence Contract** ([`backend`]) - The `Backend` trait and the `MemoryBackend`
//! - **Content Store** ([`content_store`]) - Hash lookup and get-or-create for basis files
//! - **Family Registry** ([`family_registry`]) - Fetch-or-create, ownership, filtered listing
//! - **Staging** ([`staging`]) - Holds the decisions of an upload and commits them in a safe order
//! - **Configuration** ([`config`]) - Upload parameters, conflict policy and repository settings
//! - **Progress Monitoring** ([`progress`]) - Progress events for callers that display them
//! - **Error Handling** ([`error`]) - The error type shared by the store, registry and workflows
//!
//! ## Decide, Then Write
//!
//! Both `ContentStore::get_or_create` and `FamilyRegistry::fetch_or_create` return a `created`
//! flag together with a record that is not persisted yet. Nothing reaches the backend until an
//! `UploadStaging` is committed, which stores content strictly before it updates membership.

pub mod backend;
pub mod config;
pub mod content_store;
pub mod error;
pub mod family_registry;
pub mod progress;
pub mod staging;
