use super::backend::Backend;
use super::content_store::ContentStore;
use super::error::RepositoryError;
use super::family_registry::FamilyRegistry;
use crate::core::models::basis_file::BasisFile;
use crate::core::models::family::Family;
use crate::core::models::hash::ContentHash;
use std::collections::HashSet;
use tracing::{debug, info};

/// Per-file decisions of one upload, held in memory until they are committed together.
///
/// The known set starts with the family's current members, so content that is already in the
/// family is skipped even when it is new to this call.
pub struct UploadStaging {
    known: HashSet<ContentHash>,
    pending: Vec<(BasisFile, bool)>,
}

impl UploadStaging {
    pub fn seeded_from(family: &Family) -> Self {
        Self {
            known: family.members().iter().cloned().collect(),
            pending: Vec::new(),
        }
    }

    /// Stages a resolved file unless its content is already known. Returns whether it was staged.
    pub fn stage(&mut self, file: BasisFile, created: bool) -> bool {
        if !self.known.insert(file.content_hash().clone()) {
            return false;
        }
        self.pending.push((file, created));
        true
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of staged files that are new to the repository.
    pub fn new_file_count(&self) -> usize {
        self.pending.iter().filter(|(_, created)| *created).count()
    }

    /// Writes the staged decisions and returns how many new basis files were stored.
    ///
    /// Writes happen in a fixed order: the family itself if `family_created`, then every new
    /// basis file, then the family's description and membership. An interruption can leave
    /// stored content that no family references, but never a family member without content.
    pub fn commit<B: Backend + ?Sized>(
        self,
        store: &ContentStore<'_, B>,
        registry: &FamilyRegistry<'_, B>,
        family: &mut Family,
        family_created: bool,
        description: &str,
    ) -> Result<usize, RepositoryError> {
        if family_created {
            registry.create(family)?;
            debug!("Stored new family '{}'.", family.name());
        }

        let mut uploaded = 0;
        let mut hashes = Vec::with_capacity(self.pending.len());
        for (file, created) in self.pending {
            hashes.push(file.content_hash().clone());
            if created {
                let filename = file.filename().to_string();
                let stored = store.store(file)?;
                uploaded += 1;
                debug!(
                    "New basis file {} created for {}",
                    stored.id().map(|id| id.to_string()).unwrap_or_default(),
                    filename
                );
            } else {
                debug!(
                    "Reusing basis file {} for {}",
                    file.id().map(|id| id.to_string()).unwrap_or_default(),
                    file.filename()
                );
            }
        }

        family.set_description(description);
        let added = family.add_members(hashes);
        registry.save(family)?;

        info!(
            family = family.name(),
            uploaded,
            added,
            members = family.len(),
            "Upload committed."
        );
        Ok(uploaded)
    }
}
