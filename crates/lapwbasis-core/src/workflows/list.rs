use crate::core::models::family::{FamilyKind, UserId};
use crate::engine::backend::Backend;
use crate::engine::error::RepositoryError;
use crate::engine::family_registry::{FamilyFilter, FamilyRegistry};
use std::collections::BTreeSet;
use tracing::{info, instrument};

/// One row of a family listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilySummary {
    pub name: String,
    pub owner: UserId,
    pub description: String,
    /// Number of distinct contents in the family.
    pub species_count: usize,
    /// Chemical symbols covered by the family's stored members.
    pub elements: BTreeSet<String>,
}

#[instrument(skip_all, name = "list_workflow", fields(kind = %kind))]
pub fn run<B: Backend + ?Sized>(
    backend: &B,
    kind: &FamilyKind,
    filter: &FamilyFilter,
) -> Result<Vec<FamilySummary>, RepositoryError> {
    let registry = FamilyRegistry::new(backend);
    let summaries: Vec<FamilySummary> = registry
        .list_families_with_symbols(kind, filter)?
        .into_iter()
        .map(|(family, elements)| FamilySummary {
            name: family.name().to_string(),
            owner: family.owner().clone(),
            description: family.description().to_string(),
            species_count: family.len(),
            elements,
        })
        .collect();

    info!(count = summaries.len(), "Listed families.");
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::basis_file::{BasisFile, SpeciesFormat};
    use crate::core::models::family::Family;
    use crate::engine::backend::MemoryBackend;
    use crate::engine::content_store::ContentStore;

    fn populate(backend: &MemoryBackend) {
        let store = ContentStore::new(backend);
        let registry = FamilyRegistry::new(backend);
        let mut stored = Vec::new();
        for symbol in ["O", "H", "Fe"] {
            let contents = format!("<sp chemicalSymbol=\"{}\"/>", symbol).into_bytes();
            let file = BasisFile::new(
                format!("{}.xml", symbol),
                contents,
                symbol,
                SpeciesFormat::Xml,
            );
            stored.push(store.store(file).unwrap());
        }

        let mut water = Family::new("water", FamilyKind::basis_set(), UserId::new("alice"));
        water.set_description("H2O species");
        water.add_members(stored[..2].iter().map(|f| f.content_hash().clone()));
        registry.create(&water).unwrap();

        let mut iron = Family::new("iron", FamilyKind::basis_set(), UserId::new("bob"));
        iron.add_members([stored[2].content_hash().clone()]);
        registry.create(&iron).unwrap();
    }

    #[test]
    fn summaries_carry_members_and_elements() {
        let backend = MemoryBackend::new();
        populate(&backend);

        let summaries = run(&backend, &FamilyKind::basis_set(), &FamilyFilter::new()).unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].name, "iron");
        let water = &summaries[1];
        assert_eq!(water.owner, UserId::new("alice"));
        assert_eq!(water.description, "H2O species");
        assert_eq!(water.species_count, 2);
        assert_eq!(
            water.elements.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["H", "O"]
        );
    }

    #[test]
    fn filters_are_applied() {
        let backend = MemoryBackend::new();
        populate(&backend);

        let by_element = run(
            &backend,
            &FamilyKind::basis_set(),
            &FamilyFilter::new().elements(["fe"]),
        )
        .unwrap();
        assert_eq!(by_element.len(), 1);
        assert_eq!(by_element[0].name, "iron");

        let by_owner = run(
            &backend,
            &FamilyKind::basis_set(),
            &FamilyFilter::new().owner(UserId::new("alice")),
        )
        .unwrap();
        assert_eq!(by_owner.len(), 1);
        assert_eq!(by_owner[0].name, "water");
    }

    #[test]
    fn empty_repository_lists_nothing() {
        let backend = MemoryBackend::new();
        let summaries = run(&backend, &FamilyKind::basis_set(), &FamilyFilter::new()).unwrap();
        assert!(summaries.is_empty());
    }
}
