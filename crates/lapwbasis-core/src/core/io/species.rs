use super::traits::SpeciesFile;
use crate::core::models::basis_file::SpeciesFormat;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use serde_json::Value;
use std::io;
use thiserror::Error;

const SPECIES_ELEMENT: &str = "sp";
const SYMBOL_ATTRIBUTE: &str = "chemicalSymbol";
const SYMBOL_FIELD: &str = "symbol";

/// The identifying metadata of a species file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesMetadata {
    pub chemical_symbol: String,
}

#[derive(Debug, Error)]
pub enum SpeciesParseError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed XML document: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("Malformed JSON document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Malformed XML document: {0}")]
    Malformed(&'static str),
    #[error("No <{0}> element found in document")]
    MissingElement(&'static str),
    #[error("Element <{element}> has no '{attribute}' attribute")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
    #[error("JSON document root must be an object")]
    NotAnObject,
    #[error("Field '{0}' is missing or is not a string")]
    MissingField(&'static str),
    #[error("Chemical symbol is empty")]
    EmptySymbol,
}

/// Species files in the structured-markup format.
///
/// The chemical symbol is the `chemicalSymbol` attribute of the first `<sp>` element. The whole
/// document is still read to the end and must be well-formed: exactly one root element, every
/// element closed, and nothing but whitespace outside the root.
pub struct XmlSpeciesFile;

impl SpeciesFile for XmlSpeciesFile {
    const FORMAT: SpeciesFormat = SpeciesFormat::Xml;

    fn read_metadata(bytes: &[u8]) -> Result<SpeciesMetadata, SpeciesParseError> {
        let mut reader = Reader::from_reader(bytes);
        let mut symbol: Option<String> = None;
        let mut depth: usize = 0;
        let mut root_seen = false;

        loop {
            match reader.read_event()? {
                Event::Start(element) => {
                    open_element(depth, &mut root_seen)?;
                    if symbol.is_none() && element.name().as_ref() == SPECIES_ELEMENT.as_bytes() {
                        symbol = Some(species_symbol(&element)?);
                    }
                    depth += 1;
                }
                Event::Empty(element) => {
                    open_element(depth, &mut root_seen)?;
                    if symbol.is_none() && element.name().as_ref() == SPECIES_ELEMENT.as_bytes() {
                        symbol = Some(species_symbol(&element)?);
                    }
                }
                Event::End(_) => {
                    depth = depth.checked_sub(1).ok_or(SpeciesParseError::Malformed(
                        "end tag without a matching start",
                    ))?;
                }
                Event::Text(text) if depth == 0 => {
                    if text.iter().any(|byte| !byte.is_ascii_whitespace()) {
                        return Err(SpeciesParseError::Malformed("text outside the root element"));
                    }
                }
                Event::CData(_) if depth == 0 => {
                    return Err(SpeciesParseError::Malformed("text outside the root element"));
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if depth != 0 {
            return Err(SpeciesParseError::Malformed("document ends inside an open element"));
        }
        let symbol = symbol.ok_or(SpeciesParseError::MissingElement(SPECIES_ELEMENT))?;
        finish(symbol)
    }
}

fn open_element(depth: usize, root_seen: &mut bool) -> Result<(), SpeciesParseError> {
    if depth == 0 {
        if *root_seen {
            return Err(SpeciesParseError::Malformed("more than one root element"));
        }
        *root_seen = true;
    }
    Ok(())
}

fn species_symbol(element: &BytesStart<'_>) -> Result<String, SpeciesParseError> {
    let attribute = element
        .try_get_attribute(SYMBOL_ATTRIBUTE)
        .map_err(quick_xml::Error::from)?
        .ok_or(SpeciesParseError::MissingAttribute {
            element: SPECIES_ELEMENT,
            attribute: SYMBOL_ATTRIBUTE,
        })?;
    Ok(attribute.unescape_value()?.into_owned())
}

/// Species files in the JSON record format, read from the top-level `symbol` field.
pub struct JsonSpeciesFile;

impl SpeciesFile for JsonSpeciesFile {
    const FORMAT: SpeciesFormat = SpeciesFormat::Json;

    fn read_metadata(bytes: &[u8]) -> Result<SpeciesMetadata, SpeciesParseError> {
        let document: Value = serde_json::from_slice(bytes)?;
        let record = document
            .as_object()
            .ok_or(SpeciesParseError::NotAnObject)?;
        let symbol = record
            .get(SYMBOL_FIELD)
            .and_then(Value::as_str)
            .ok_or(SpeciesParseError::MissingField(SYMBOL_FIELD))?;
        finish(symbol.to_string())
    }
}

fn finish(symbol: String) -> Result<SpeciesMetadata, SpeciesParseError> {
    let trimmed = symbol.trim();
    if trimmed.is_empty() {
        return Err(SpeciesParseError::EmptySymbol);
    }
    Ok(SpeciesMetadata {
        chemical_symbol: trimmed.to_string(),
    })
}

/// Extracts the identifying metadata from a species file of the declared format.
pub fn extract(bytes: &[u8], format: SpeciesFormat) -> Result<SpeciesMetadata, SpeciesParseError> {
    match format {
        SpeciesFormat::Xml => XmlSpeciesFile::read_metadata(bytes),
        SpeciesFormat::Json => JsonSpeciesFile::read_metadata(bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const HELIUM_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<spdb>
  <sp chemicalSymbol="He" name="helium" z="-2.0" mass="7296.297">
    <muffinTin rmin="0.1e-5" radius="1.5" rinf="21.0" radialmeshPoints="250"/>
    <atomicState n="1" l="0" kappa="1" occ="2.0" core="false"/>
  </sp>
</spdb>
"#;

    mod xml_tests {
        use super::*;

        #[test]
        fn reads_symbol_from_first_species_element() {
            let metadata = extract(HELIUM_XML.as_bytes(), SpeciesFormat::Xml).unwrap();
            assert_eq!(metadata.chemical_symbol, "He");
        }

        #[test]
        fn only_the_first_species_element_is_used() {
            let doc = r#"<spdb><sp chemicalSymbol="O"/><sp chemicalSymbol="N"/></spdb>"#;
            let metadata = extract(doc.as_bytes(), SpeciesFormat::Xml).unwrap();
            assert_eq!(metadata.chemical_symbol, "O");
        }

        #[test]
        fn symbol_whitespace_is_trimmed() {
            let doc = r#"<spdb><sp chemicalSymbol=" Li "/></spdb>"#;
            let metadata = extract(doc.as_bytes(), SpeciesFormat::Xml).unwrap();
            assert_eq!(metadata.chemical_symbol, "Li");
        }

        #[test]
        fn fails_without_species_element() {
            let doc = r#"<spdb><species chemicalSymbol="H"/></spdb>"#;
            let result = extract(doc.as_bytes(), SpeciesFormat::Xml);
            assert!(matches!(
                result,
                Err(SpeciesParseError::MissingElement("sp"))
            ));
        }

        #[test]
        fn fails_without_symbol_attribute() {
            let doc = r#"<spdb><sp name="hydrogen"/></spdb>"#;
            let result = extract(doc.as_bytes(), SpeciesFormat::Xml);
            assert!(matches!(
                result,
                Err(SpeciesParseError::MissingAttribute {
                    attribute: "chemicalSymbol",
                    ..
                })
            ));
        }

        #[test]
        fn fails_on_empty_symbol() {
            let doc = r#"<spdb><sp chemicalSymbol="  "/></spdb>"#;
            let result = extract(doc.as_bytes(), SpeciesFormat::Xml);
            assert!(matches!(result, Err(SpeciesParseError::EmptySymbol)));
        }

        #[test]
        fn fails_on_mismatched_end_tag_after_species_element() {
            let doc = r#"<spdb><sp chemicalSymbol="H"></species></spdb>"#;
            let result = extract(doc.as_bytes(), SpeciesFormat::Xml);
            assert!(matches!(result, Err(SpeciesParseError::Xml(_))));
        }

        #[test]
        fn fails_on_unclosed_root_element() {
            let doc = r#"<spdb><sp chemicalSymbol="H"/>"#;
            let result = extract(doc.as_bytes(), SpeciesFormat::Xml);
            assert!(matches!(result, Err(SpeciesParseError::Malformed(_))));
        }

        #[test]
        fn fails_on_document_truncated_inside_species_element() {
            let doc = r#"<spdb><sp chemicalSymbol="H">"#;
            let result = extract(doc.as_bytes(), SpeciesFormat::Xml);
            assert!(matches!(result, Err(SpeciesParseError::Malformed(_))));
        }

        #[test]
        fn fails_on_truncated_copy_of_a_real_species_file() {
            let truncated = &HELIUM_XML[..HELIUM_XML.find("<atomicState").unwrap()];
            let result = extract(truncated.as_bytes(), SpeciesFormat::Xml);
            assert!(matches!(result, Err(SpeciesParseError::Malformed(_))));
        }

        #[test]
        fn fails_on_several_root_elements() {
            let doc = r#"<sp chemicalSymbol="H"/><sp chemicalSymbol="O"/>"#;
            let result = extract(doc.as_bytes(), SpeciesFormat::Xml);
            assert!(matches!(
                result,
                Err(SpeciesParseError::Malformed("more than one root element"))
            ));
        }

        #[test]
        fn fails_on_text_before_the_root_element() {
            let doc = r#"garbage <sp chemicalSymbol="H"/>"#;
            let result = extract(doc.as_bytes(), SpeciesFormat::Xml);
            assert!(matches!(
                result,
                Err(SpeciesParseError::Malformed("text outside the root element"))
            ));
        }

        #[test]
        fn fails_on_text_after_the_root_element() {
            let doc = "<spdb><sp chemicalSymbol=\"H\"/></spdb>\ntrailing";
            let result = extract(doc.as_bytes(), SpeciesFormat::Xml);
            assert!(matches!(result, Err(SpeciesParseError::Malformed(_))));
        }

        #[test]
        fn whitespace_and_comments_around_the_root_are_accepted() {
            let doc = "<?xml version=\"1.0\"?>\n<!-- species -->\n<sp chemicalSymbol=\"N\"/>\n\n";
            let metadata = extract(doc.as_bytes(), SpeciesFormat::Xml).unwrap();
            assert_eq!(metadata.chemical_symbol, "N");
        }

        #[test]
        fn json_document_is_not_valid_xml_species() {
            let result = extract(br#"{"symbol": "H"}"#, SpeciesFormat::Xml);
            assert!(result.is_err());
        }
    }

    mod json_tests {
        use super::*;

        #[test]
        fn reads_symbol_field() {
            let doc = br#"{"symbol": "Li", "z": -3.0, "mass": 12652.669}"#;
            let metadata = extract(doc, SpeciesFormat::Json).unwrap();
            assert_eq!(metadata.chemical_symbol, "Li");
        }

        #[test]
        fn fails_on_missing_symbol_field() {
            let result = extract(br#"{"name": "lithium"}"#, SpeciesFormat::Json);
            assert!(matches!(
                result,
                Err(SpeciesParseError::MissingField("symbol"))
            ));
        }

        #[test]
        fn fails_on_non_string_symbol() {
            let result = extract(br#"{"symbol": 3}"#, SpeciesFormat::Json);
            assert!(matches!(
                result,
                Err(SpeciesParseError::MissingField("symbol"))
            ));
        }

        #[test]
        fn fails_when_root_is_not_an_object() {
            let result = extract(br#"["H"]"#, SpeciesFormat::Json);
            assert!(matches!(result, Err(SpeciesParseError::NotAnObject)));
        }

        #[test]
        fn fails_on_malformed_json() {
            let result = extract(br#"{"symbol": "H""#, SpeciesFormat::Json);
            assert!(matches!(result, Err(SpeciesParseError::Json(_))));
        }
    }

    #[test]
    fn read_metadata_from_path_reads_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("He.xml");
        fs::write(&path, HELIUM_XML).unwrap();

        let metadata = XmlSpeciesFile::read_metadata_from_path(&path).unwrap();
        assert_eq!(metadata.chemical_symbol, "He");
    }

    #[test]
    fn read_metadata_from_missing_path_is_an_io_error() {
        let dir = tempdir().unwrap();
        let result = JsonSpeciesFile::read_metadata_from_path(dir.path().join("missing.json"));
        assert!(matches!(result, Err(SpeciesParseError::Io(_))));
    }

    #[test]
    fn format_constants_match_implementors() {
        assert_eq!(XmlSpeciesFile::FORMAT, SpeciesFormat::Xml);
        assert_eq!(JsonSpeciesFile::FORMAT, SpeciesFormat::Json);
    }
}
