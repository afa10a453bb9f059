use super::species::{SpeciesMetadata, SpeciesParseError};
use crate::core::models::basis_file::SpeciesFormat;
use std::fs;
use std::path::Path;

/// Defines the interface for reading metadata out of a species file format.
///
/// Implementors handle the format-specific parsing; the repository only ever asks for the
/// identifying metadata, never for the full physical content of the file.
pub trait SpeciesFile {
    /// The format this implementor reads.
    const FORMAT: SpeciesFormat;

    /// Reads the identifying metadata from the raw bytes of a species file.
    ///
    /// # Arguments
    ///
    /// * `bytes` - The complete file contents.
    ///
    /// # Return
    ///
    /// Returns the extracted metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes do not form a valid document of this format, or if the
    /// document lacks the expected element, attribute or field.
    fn read_metadata(bytes: &[u8]) -> Result<SpeciesMetadata, SpeciesParseError>;

    /// Reads the identifying metadata from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsing fails.
    fn read_metadata_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<SpeciesMetadata, SpeciesParseError> {
        let bytes = fs::read(path)?;
        Self::read_metadata(&bytes)
    }
}
