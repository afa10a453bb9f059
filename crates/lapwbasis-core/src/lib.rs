//! # LAPW Basis Repository
//!
//! A content-addressed repository for LAPW species files ("basis-set files"), organized into named,
//! ownable collections called families.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture to keep concerns separated and each layer
//! testable on its own.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`BasisFile`, `Family`, `ContentHash`) and
//!   pure I/O utilities: metadata extraction from species files and candidate file discovery.
//!
//! - **[`engine`]: The Logic Core.** The stateful layer built on an injected persistence
//!   [`Backend`](engine::backend::Backend). It provides the `ContentStore` with get-or-create
//!   semantics, the `FamilyRegistry` with ownership enforcement and filtered listing, and the
//!   staging structure that commits an upload in a crash-safe order.
//!
//! - **[`workflows`]: The Public API.** High-level entry points that tie `engine` and `core`
//!   together: the deduplicating family upload and the family listing.

pub mod core;
pub mod engine;
pub mod workflows;
