use crate::core::models::basis_file::SpeciesFormat;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::trace;

/// A species file found in a scanned directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesCandidate {
    /// The entry as it appears in the scanned directory. Used for naming and error reporting.
    pub path: PathBuf,
    /// The resolved target the contents are read from.
    pub real_path: PathBuf,
}

impl SpeciesCandidate {
    pub fn file_name(&self) -> Option<&OsStr> {
        self.path.file_name()
    }
}

/// Lists the candidate species files directly under `directory`.
///
/// Only regular files (after following symbolic links) whose extension matches `format`
/// case-insensitively are returned. Each candidate keeps its directory entry and the real target
/// it resolves to. Candidates are ordered by their file name in the directory so that repeated
/// scans agree. Subdirectories are never descended into.
///
/// Two links to the same target both count as candidates.
pub fn find_species_files(
    directory: &Path,
    format: SpeciesFormat,
) -> io::Result<Vec<SpeciesCandidate>> {
    let mut candidates = Vec::new();

    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        let path = entry.path();

        if !path.is_file() || !has_extension(&path, format) {
            trace!("Skipping non-candidate entry {:?}", &path);
            continue;
        }

        let real_path = fs::canonicalize(&path)?;
        candidates.push(SpeciesCandidate { path, real_path });
    }

    candidates.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(candidates)
}

fn has_extension(path: &Path, format: SpeciesFormat) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(format.extension()))
}
