use crate::core::io::discovery::{SpeciesCandidate, find_species_files};
use crate::core::models::basis_file::BasisFile;
use crate::engine::backend::Backend;
use crate::engine::config::UploadConfig;
use crate::engine::content_store::ContentStore;
use crate::engine::error::RepositoryError;
use crate::engine::family_registry::FamilyRegistry;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::staging::UploadStaging;
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

type ResolveResult = Result<(BasisFile, bool), RepositoryError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadSummary {
    /// Candidate files found in the directory.
    pub files_found: usize,
    /// Basis files that were new to the repository and got stored.
    pub files_uploaded: usize,
}

/// Uploads every species file of a directory into a family.
///
/// The upload is all-or-nothing up to the commit: discovery, the ownership check, reading,
/// hashing and parsing all happen before anything is written, and any failure among them leaves
/// the backend untouched. The ownership check runs before a single file is read.
#[instrument(skip_all, name = "upload_workflow", fields(family = %config.family_name))]
pub fn run<B: Backend + ?Sized>(
    backend: &B,
    config: &UploadConfig,
    reporter: &ProgressReporter,
) -> Result<UploadSummary, RepositoryError> {
    // === Phase 1: Discover candidate files ===
    reporter.report(Progress::PhaseStart { name: "Discovery" });
    let candidates = discover(&config.directory, config)?;
    let files_found = candidates.len();
    info!(files_found, directory = ?config.directory, "Discovered candidate species files.");
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Resolve the family and check ownership ===
    let registry = FamilyRegistry::new(backend);
    let (mut family, family_created) =
        registry.fetch_or_create(&config.family_name, &config.family_kind, &config.caller)?;
    registry.assert_owner(&family, &config.caller, family_created)?;

    // === Phase 3: Hash, parse and deduplicate ===
    let store = ContentStore::new(backend);
    let resolved = resolve_candidates(&store, &candidates, config, reporter)?;

    let mut staging = UploadStaging::seeded_from(&family);
    for (file, created) in resolved {
        let filename = file.filename().to_string();
        if staging.stage(file, created) {
            reporter.report(Progress::FileStaged { filename, created });
        } else {
            debug!("Content of {} is already in the family; skipping.", filename);
            reporter.report(Progress::FileSkipped { filename });
        }
    }
    info!(
        staged = staging.len(),
        new = staging.new_file_count(),
        "Resolved all candidate files."
    );

    // === Phase 4: Commit ===
    reporter.report(Progress::PhaseStart { name: "Commit" });
    let files_uploaded = staging.commit(
        &store,
        &registry,
        &mut family,
        family_created,
        &config.description,
    )?;
    reporter.report(Progress::PhaseFinish);
    reporter.report(Progress::Message(format!(
        "Family '{}': {} of {} candidate files were new to the repository.",
        config.family_name, files_uploaded, files_found
    )));

    Ok(UploadSummary {
        files_found,
        files_uploaded,
    })
}

fn discover(
    directory: &Path,
    config: &UploadConfig,
) -> Result<Vec<SpeciesCandidate>, RepositoryError> {
    if !directory.is_dir() {
        return Err(RepositoryError::InvalidDirectory(directory.to_path_buf()));
    }
    find_species_files(directory, config.format).map_err(|source| RepositoryError::Io {
        path: directory.to_path_buf(),
        source,
    })
}

fn resolve_candidates<B: Backend + ?Sized>(
    store: &ContentStore<'_, B>,
    candidates: &[SpeciesCandidate],
    config: &UploadConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<(BasisFile, bool)>, RepositoryError> {
    reporter.report(Progress::PhaseStart {
        name: "Resolving species files",
    });
    reporter.report(Progress::TaskStart {
        total_steps: candidates.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = candidates.iter();

    #[cfg(feature = "parallel")]
    let iterator = candidates.par_iter();

    let results: Vec<ResolveResult> = iterator
        .map(|candidate| {
            let result = resolve_one(store, candidate, config);
            reporter.report(Progress::TaskIncrement);
            result
        })
        .collect();

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    // Errors surface in enumeration order regardless of which worker hit them first.
    results.into_iter().collect()
}

fn resolve_one<B: Backend + ?Sized>(
    store: &ContentStore<'_, B>,
    candidate: &SpeciesCandidate,
    config: &UploadConfig,
) -> ResolveResult {
    let contents = fs::read(&candidate.real_path).map_err(|source| RepositoryError::Io {
        path: candidate.path.clone(),
        source,
    })?;
    store.get_or_create(
        &candidate.path,
        contents,
        config.format,
        config.conflict_policy,
    )
}
