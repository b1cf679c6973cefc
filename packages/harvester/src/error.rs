//! Error types for the harvester.
//!
//! Every variant names the pipeline stage that failed (extraction, parsing,
//! configuration or writing) so the CLI can report it without extra context.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the harvester library.
#[derive(Debug, Error)]
pub enum HarvesterError {
    /// Archive path does not exist.
    #[error("Extraction failed: archive not found: {}", .0.display())]
    ArchiveNotFound(PathBuf),

    /// Archive could not be opened or unpacked.
    #[error("Extraction failed: could not unpack {}: {source}", .path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// Filesystem failure while unpacking or scanning the extraction directory.
    #[error("Extraction failed: {}: {source}", .path.display())]
    Extract {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No XML document inside the extracted archive.
    #[error("Extraction failed: no XML document found in {}", .0.display())]
    NoXmlDocument(PathBuf),

    /// More than one XML document and strict selection is active.
    #[error(
        "Extraction failed: {} XML documents found in {} ({}); use --first-xml to pick the first",
        .candidates.len(),
        .dir.display(),
        .candidates.join(", ")
    )]
    AmbiguousXmlDocument {
        dir: PathBuf,
        candidates: Vec<String>,
    },

    /// The selected document could not be read as UTF-8 text.
    #[error("Parsing failed: cannot read {}: {source}", .path.display())]
    ReadDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// XML parsing failed.
    #[error("Parsing failed: {}: {source}", .path.display())]
    XmlParse {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    /// Missing required XML attribute.
    #[error("Parsing failed: missing attribute '{attribute}' on {context}")]
    MissingAttribute { attribute: String, context: String },

    /// Bracket-term list could not be read.
    #[error("Configuration failed: cannot read bracket terms from {}: {source}", .path.display())]
    BracketTerms {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid input or output path.
    #[error("Configuration failed: {0}")]
    InvalidPath(String),

    /// Output file could not be written.
    #[error("Writing failed: {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for harvester operations.
pub type Result<T> = std::result::Result<T, HarvesterError>;
