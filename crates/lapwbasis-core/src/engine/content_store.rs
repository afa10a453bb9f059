use super::backend::Backend;
use super::config::ConflictPolicy;
use super::error::RepositoryError;
use crate::core::io::species;
use crate::core::models::basis_file::{BasisFile, BasisFileId, SpeciesFormat};
use crate::core::models::hash::ContentHash;
use std::path::Path;
use tracing::{debug, trace};

/// Content-addressed access to basis files.
///
/// The store decides whether content is new, but never writes as a side effect of that decision:
/// [`get_or_create`](ContentStore::get_or_create) hands back unpersisted records and only
/// [`store`](ContentStore::store) writes. This lets the upload workflow settle every file before
/// anything reaches the backend.
pub struct ContentStore<'a, B: Backend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: Backend + ?Sized> ContentStore<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Returns the earliest stored record carrying `hash`, if any.
    pub fn lookup_by_hash(&self, hash: &ContentHash) -> Result<Option<BasisFile>, RepositoryError> {
        Ok(self.find_all_by_hash(hash)?.into_iter().next())
    }

    /// Returns every stored record carrying `hash`, ordered by creation.
    ///
    /// More than one record is an anomaly left behind by non-atomic writes; normal operation keeps
    /// zero or one.
    pub fn find_all_by_hash(&self, hash: &ContentHash) -> Result<Vec<BasisFile>, RepositoryError> {
        let mut files = self.backend.basis_files_with_hash(hash)?;
        files.sort_by_key(BasisFile::id);
        Ok(files)
    }

    pub fn get(&self, id: BasisFileId) -> Result<BasisFile, RepositoryError> {
        self.backend
            .basis_file(id)?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "Basis file",
                key: id.to_string(),
            })
    }

    /// Resolves the contents of a species file to a basis file record.
    ///
    /// Known content returns the stored record with `created = false`. Novel content is parsed
    /// and returned as an unpersisted record with `created = true`; persisting it is up to the
    /// caller. When several stored records share the hash, `policy` decides between reusing the
    /// earliest one and failing.
    ///
    /// # Errors
    ///
    /// * [`RepositoryError::Parse`] if novel content does not conform to `format`.
    /// * [`RepositoryError::AmbiguousContent`] under [`ConflictPolicy::Strict`].
    pub fn get_or_create(
        &self,
        path: &Path,
        contents: Vec<u8>,
        format: SpeciesFormat,
        policy: ConflictPolicy,
    ) -> Result<(BasisFile, bool), RepositoryError> {
        let hash = ContentHash::of(&contents);
        let mut matches = self.find_all_by_hash(&hash)?;

        match (matches.len(), policy) {
            (0, _) => {
                let metadata =
                    species::extract(&contents, format).map_err(|source| RepositoryError::Parse {
                        path: path.to_path_buf(),
                        source,
                    })?;
                let filename = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                trace!(
                    "Parsed {:?}: symbol {}, hash {}",
                    path,
                    metadata.chemical_symbol,
                    hash.short()
                );
                Ok((
                    BasisFile::new(filename, contents, metadata.chemical_symbol, format),
                    true,
                ))
            }
            (1, _) | (_, ConflictPolicy::UseFirst) => {
                if matches.len() > 1 {
                    debug!(
                        "{} records share hash {}; reusing the earliest.",
                        matches.len(),
                        hash.short()
                    );
                }
                Ok((matches.swap_remove(0), false))
            }
            (_, ConflictPolicy::Strict) => Err(RepositoryError::AmbiguousContent {
                hash,
                ids: matches.iter().filter_map(BasisFile::id).collect(),
            }),
        }
    }

    /// Persists a new record and returns it with its assigned identifier.
    pub fn store(&self, file: BasisFile) -> Result<BasisFile, RepositoryError> {
        let id = self.backend.insert_basis_file(&file)?;
        Ok(file.with_id(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::backend::MemoryBackend;

    const HYDROGEN: &[u8] = br#"<spdb><sp chemicalSymbol="H"/></spdb>"#;

    fn stored(backend: &MemoryBackend, contents: &[u8]) -> BasisFile {
        let file = BasisFile::new("h.xml", contents.to_vec(), "H", SpeciesFormat::Xml);
        ContentStore::new(backend).store(file).unwrap()
    }

    #[test]
    fn novel_content_is_created_but_not_persisted() {
        let backend = MemoryBackend::new();
        let store = ContentStore::new(&backend);

        let (file, created) = store
            .get_or_create(
                Path::new("/data/h.xml"),
                HYDROGEN.to_vec(),
                SpeciesFormat::Xml,
                ConflictPolicy::Strict,
            )
            .unwrap();

        assert!(created);
        assert!(!file.is_stored());
        assert_eq!(file.chemical_symbol(), "H");
        assert_eq!(file.filename(), "h.xml");
        assert_eq!(backend.basis_file_count().unwrap(), 0);
        assert!(
            store
                .lookup_by_hash(&ContentHash::of(HYDROGEN))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn known_content_is_reused_without_parsing() {
        let backend = MemoryBackend::new();
        let existing = stored(&backend, b"not even xml");
        let store = ContentStore::new(&backend);

        let (file, created) = store
            .get_or_create(
                Path::new("copy.xml"),
                b"not even xml".to_vec(),
                SpeciesFormat::Xml,
                ConflictPolicy::Strict,
            )
            .unwrap();

        assert!(!created);
        assert_eq!(file.id(), existing.id());
    }

    #[test]
    fn strict_policy_rejects_duplicate_hash_records() {
        let backend = MemoryBackend::new();
        let first = stored(&backend, HYDROGEN);
        let second = stored(&backend, HYDROGEN);
        let store = ContentStore::new(&backend);

        let result = store.get_or_create(
            Path::new("h.xml"),
            HYDROGEN.to_vec(),
            SpeciesFormat::Xml,
            ConflictPolicy::Strict,
        );

        match result {
            Err(RepositoryError::AmbiguousContent { hash, ids }) => {
                assert_eq!(hash, ContentHash::of(HYDROGEN));
                assert_eq!(ids, vec![first.id().unwrap(), second.id().unwrap()]);
            }
            other => panic!("Expected AmbiguousContent, got {:?}", other),
        }
    }

    #[test]
    fn use_first_policy_picks_the_earliest_record() {
        let backend = MemoryBackend::new();
        let first = stored(&backend, HYDROGEN);
        stored(&backend, HYDROGEN);
        let store = ContentStore::new(&backend);

        let (file, created) = store
            .get_or_create(
                Path::new("h.xml"),
                HYDROGEN.to_vec(),
                SpeciesFormat::Xml,
                ConflictPolicy::UseFirst,
            )
            .unwrap();

        assert!(!created);
        assert_eq!(file.id(), first.id());
        assert_eq!(
            store.lookup_by_hash(&ContentHash::of(HYDROGEN)).unwrap(),
            Some(first)
        );
        assert_eq!(
            store
                .find_all_by_hash(&ContentHash::of(HYDROGEN))
                .unwrap()
                .len(),
            2
        );
    }

    #[test]
    fn parse_failure_carries_the_offending_path() {
        let backend = MemoryBackend::new();
        let store = ContentStore::new(&backend);

        let result = store.get_or_create(
            Path::new("/data/broken.json"),
            b"{ not json".to_vec(),
            SpeciesFormat::Json,
            ConflictPolicy::UseFirst,
        );

        match result {
            Err(RepositoryError::Parse { path, .. }) => {
                assert_eq!(path, Path::new("/data/broken.json"));
            }
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn get_by_id_reports_missing_records() {
        let backend = MemoryBackend::new();
        let existing = stored(&backend, HYDROGEN);
        let store = ContentStore::new(&backend);

        assert_eq!(store.get(existing.id().unwrap()).unwrap(), existing);
        assert!(matches!(
            store.get(BasisFileId(999)),
            Err(RepositoryError::NotFound { .. })
        ));
    }
}
