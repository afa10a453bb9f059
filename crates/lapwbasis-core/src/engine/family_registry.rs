use super::backend::Backend;
use super::error::RepositoryError;
use crate::core::models::basis_file::BasisFile;
use crate::core::models::family::{Family, FamilyKind, UserId};
use crate::core::utils::symbols::{normalize_symbol, normalize_symbols};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Optional constraints for [`FamilyRegistry::list_families`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FamilyFilter {
    elements: Option<BTreeSet<String>>,
    owner: Option<UserId>,
}

impl FamilyFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps only families with at least one member for every given element. Symbols are
    /// matched case-insensitively.
    pub fn elements<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.elements = Some(normalize_symbols(symbols));
        self
    }

    /// Keeps only families owned by `owner`.
    pub fn owner(mut self, owner: UserId) -> Self {
        self.owner = Some(owner);
        self
    }
}

/// Named, owned families of basis files.
///
/// Like the content store, the registry separates deciding from writing:
/// [`fetch_or_create`](FamilyRegistry::fetch_or_create) may return a family that only exists in
/// memory, and [`create`](FamilyRegistry::create) / [`save`](FamilyRegistry::save) persist it.
pub struct FamilyRegistry<'a, B: Backend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: Backend + ?Sized> FamilyRegistry<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Returns the stored family, or a new unpersisted one owned by `owner`.
    pub fn fetch_or_create(
        &self,
        name: &str,
        kind: &FamilyKind,
        owner: &UserId,
    ) -> Result<(Family, bool), RepositoryError> {
        match self.backend.family(name, kind)? {
            Some(family) => Ok((family, false)),
            None => {
                debug!("Family '{}' does not exist yet; creating it for {}.", name, owner);
                Ok((Family::new(name, kind.clone(), owner.clone()), true))
            }
        }
    }

    pub fn get(&self, name: &str, kind: &FamilyKind) -> Result<Family, RepositoryError> {
        self.backend
            .family(name, kind)?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "Family",
                key: format!("{} ({})", name, kind),
            })
    }

    /// Checks that `caller` may mutate `family`.
    ///
    /// A family created in the current call has no prior owner to protect and always passes.
    pub fn assert_owner(
        &self,
        family: &Family,
        caller: &UserId,
        created: bool,
    ) -> Result<(), RepositoryError> {
        if created || family.owner() == caller {
            return Ok(());
        }
        Err(RepositoryError::Ownership {
            family: family.name().to_string(),
            owner: family.owner().clone(),
            caller: caller.clone(),
        })
    }

    /// Persists a family created by [`fetch_or_create`](FamilyRegistry::fetch_or_create).
    pub fn create(&self, family: &Family) -> Result<(), RepositoryError> {
        self.backend.insert_family(family)?;
        Ok(())
    }

    /// Persists the current description and members of a stored family.
    pub fn save(&self, family: &Family) -> Result<(), RepositoryError> {
        self.backend.update_family(family)?;
        Ok(())
    }

    /// Lists families of `kind` that pass `filter`, ordered by name.
    pub fn list_families(
        &self,
        kind: &FamilyKind,
        filter: &FamilyFilter,
    ) -> Result<Vec<Family>, RepositoryError> {
        let mut selected = Vec::new();

        for family in self.backend.families(kind)? {
            if let Some(owner) = &filter.owner {
                if family.owner() != owner {
                    continue;
                }
            }
            if let Some(required) = &filter.elements {
                let covered = self.member_symbols(&family)?;
                if !required.is_subset(&covered) {
                    continue;
                }
            }
            selected.push(family);
        }

        selected.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(selected)
    }

    /// Like [`list_families`](FamilyRegistry::list_families), but pairs every family with the
    /// symbols its members cover. Members are resolved once per family whether or not the filter
    /// constrains elements.
    pub fn list_families_with_symbols(
        &self,
        kind: &FamilyKind,
        filter: &FamilyFilter,
    ) -> Result<Vec<(Family, BTreeSet<String>)>, RepositoryError> {
        let mut selected = Vec::new();

        for family in self.backend.families(kind)? {
            if let Some(owner) = &filter.owner {
                if family.owner() != owner {
                    continue;
                }
            }
            let symbols = self.member_symbols(&family)?;
            if let Some(required) = &filter.elements {
                if !required.is_subset(&symbols) {
                    continue;
                }
            }
            selected.push((family, symbols));
        }

        selected.sort_by(|(a, _), (b, _)| a.name().cmp(b.name()));
        Ok(selected)
    }

    /// Resolves the members of a family to their stored records, ordered by creation.
    ///
    /// Each hash resolves to the earliest record carrying it. Hashes with no stored record are
    /// logged and skipped.
    pub fn member_files(&self, family: &Family) -> Result<Vec<BasisFile>, RepositoryError> {
        let mut files = Vec::with_capacity(family.len());
        for hash in family.members() {
            let earliest = self
                .backend
                .basis_files_with_hash(hash)?
                .into_iter()
                .min_by_key(BasisFile::id);
            match earliest {
                Some(file) => files.push(file),
                None => warn!(
                    "Family '{}' references content {} that is not stored.",
                    family.name(),
                    hash.short()
                ),
            }
        }
        files.sort_by_key(BasisFile::id);
        Ok(files)
    }

    /// The normalized chemical symbols covered by a family's members.
    pub fn member_symbols(&self, family: &Family) -> Result<BTreeSet<String>, RepositoryError> {
        Ok(self
            .member_files(family)?
            .iter()
            .map(|file| normalize_symbol(file.chemical_symbol()))
            .collect())
    }

    /// Picks one member per requested chemical symbol, as needed to reference species files
    /// from a calculation input.
    ///
    /// When several members share a symbol the earliest stored one is chosen.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::MissingSymbol`] for the first requested symbol the family does
    /// not cover.
    pub fn select_for_symbols<I, S>(
        &self,
        family: &Family,
        symbols: I,
    ) -> Result<BTreeMap<String, BasisFile>, RepositoryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut by_symbol: BTreeMap<String, BasisFile> = BTreeMap::new();
        for file in self.member_files(family)? {
            by_symbol
                .entry(normalize_symbol(file.chemical_symbol()))
                .or_insert(file);
        }

        let mut selection = BTreeMap::new();
        for symbol in normalize_symbols(symbols) {
            let file = by_symbol
                .get(&symbol)
                .cloned()
                .ok_or_else(|| RepositoryError::MissingSymbol {
                    family: family.name().to_string(),
                    symbol: symbol.clone(),
                })?;
            selection.insert(symbol, file);
        }
        Ok(selection)
    }
}
