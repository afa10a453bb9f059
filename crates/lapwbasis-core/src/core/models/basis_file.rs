use super::hash::ContentHash;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The declared on-disk format of a species file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeciesFormat {
    /// Structured markup with an `<sp chemicalSymbol="...">` element.
    Xml,
    /// A JSON object with a `symbol` field.
    Json,
}

impl SpeciesFormat {
    /// The file extension (without the dot) that candidate files of this format carry.
    pub fn extension(self) -> &'static str {
        match self {
            SpeciesFormat::Xml => "xml",
            SpeciesFormat::Json => "json",
        }
    }
}

impl fmt::Display for SpeciesFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported species format '{0}' (expected 'xml' or 'json')")]
pub struct UnknownFormatError(pub String);

impl FromStr for SpeciesFormat {
    type Err = UnknownFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xml" => Ok(SpeciesFormat::Xml),
            "json" => Ok(SpeciesFormat::Json),
            _ => Err(UnknownFormatError(s.to_string())),
        }
    }
}

/// Identifier assigned by the persistence backend when a basis file is first stored.
///
/// Identifiers increase monotonically, so ordering them is ordering by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BasisFileId(pub u64);

impl fmt::Display for BasisFileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single species file known to the repository.
///
/// A `BasisFile` is immutable once created: its hash, symbol and payload never change. The `id` is
/// `None` while the record has only been decided on and not yet written, which is the state
/// `ContentStore::get_or_create` hands back for novel content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasisFile {
    id: Option<BasisFileId>,
    content_hash: ContentHash,
    chemical_symbol: String,
    format: SpeciesFormat,
    filename: String,
    contents: Vec<u8>,
}

impl BasisFile {
    /// Creates an unpersisted record. The content hash is derived from `contents`.
    pub fn new(
        filename: impl Into<String>,
        contents: Vec<u8>,
        chemical_symbol: impl Into<String>,
        format: SpeciesFormat,
    ) -> Self {
        Self {
            id: None,
            content_hash: ContentHash::of(&contents),
            chemical_symbol: chemical_symbol.into(),
            format,
            filename: filename.into(),
            contents,
        }
    }

    /// Returns a copy of this record carrying the identifier assigned by the backend.
    pub fn with_id(mut self, id: BasisFileId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn id(&self) -> Option<BasisFileId> {
        self.id
    }

    pub fn is_stored(&self) -> bool {
        self.id.is_some()
    }

    pub fn content_hash(&self) -> &ContentHash {
        &self.content_hash
    }

    pub fn chemical_symbol(&self) -> &str {
        &self.chemical_symbol
    }

    pub fn format(&self) -> SpeciesFormat {
        self.format
    }

    /// The base name of the file this record was created from.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn contents(&self) -> &[u8] {
        &self.contents
    }
}
