use super::backend::BackendError;
use crate::core::io::species::SpeciesParseError;
use crate::core::models::basis_file::BasisFileId;
use crate::core::models::family::UserId;
use crate::core::models::hash::ContentHash;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Failed to parse species file '{path}': {source}", path = .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: SpeciesParseError,
    },

    #[error(
        "More than one stored basis file shares content hash {hash} (ids: {})",
        join_ids(.ids)
    )]
    AmbiguousContent {
        hash: ContentHash,
        ids: Vec<BasisFileId>,
    },

    #[error(
        "Family '{family}' belongs to user '{owner}', therefore '{caller}' cannot modify it"
    )]
    Ownership {
        family: String,
        owner: UserId,
        caller: UserId,
    },

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Family '{family}' has no basis file for element '{symbol}'")]
    MissingSymbol { family: String, symbol: String },

    #[error("Not a directory: '{}'", .0.display())]
    InvalidDirectory(PathBuf),

    #[error("I/O error for '{path}': {source}", path = .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Backend(#[from] BackendError),
}

fn join_ids(ids: &[BasisFileId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambiguous_content_message_lists_every_id() {
        let err = RepositoryError::AmbiguousContent {
            hash: ContentHash::of(b"H"),
            ids: vec![BasisFileId(3), BasisFileId(9)],
        };
        let message = err.to_string();
        assert!(message.contains("#3, #9"));
        assert!(message.contains(ContentHash::of(b"H").as_str()));
    }

    #[test]
    fn ownership_message_names_owner_and_caller() {
        let err = RepositoryError::Ownership {
            family: "set1".to_string(),
            owner: UserId::new("alice"),
            caller: UserId::new("bob"),
        };
        assert_eq!(
            err.to_string(),
            "Family 'set1' belongs to user 'alice', therefore 'bob' cannot modify it"
        );
    }
}
