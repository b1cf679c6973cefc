//! Configuration constants, run settings and validation functions.

use std::path::{Path, PathBuf};

use crate::error::{HarvesterError, Result};

/// Top-level chemical element.
pub const CHEMICAL_TAG: &str = "Chemical";

/// Attribute holding the chemical's display name.
pub const DISPLAY_NAME_ATTR: &str = "displayName";

/// Attribute holding the chemical's record id (diagnostics only).
pub const ID_ATTR: &str = "id";

/// Citation element nested under classification codes and synonyms.
pub const SOURCE_TAG: &str = "Source";

/// Classification code element.
pub const CLASSIFICATION_TAG: &str = "ClassificationCode";

/// Synonym element.
pub const SYNONYMS_TAG: &str = "Synonyms";

/// Source value written for algorithmically derived synonyms.
pub const GENERATED_SOURCE: &str = "GENERATED";

/// Separator between multiple sources in one cell.
pub const SOURCE_SEPARATOR: &str = ";";

/// Header row of the classes table.
pub const CLASSES_HEADER: &str = "Molecule\tClass\tClass_source\n";

/// Header row of the synonyms table.
pub const SYNONYMS_HEADER: &str = "Molecule\tSynonym\tSynonym_source\n";

/// Default bracket-term list, one term per line.
pub const DEFAULT_BRACKET_TERMS_FILE: &str = "bracket_terms.txt";

/// Default classes output file.
pub const DEFAULT_CLASSES_OUTPUT: &str = "classes_chemIDplus.txt";

/// Default synonyms output file.
pub const DEFAULT_SYNONYMS_OUTPUT: &str = "synonyms_chemIDplus.txt";

/// Extension of the XML document inside the archive, matched case-insensitively.
pub const XML_EXTENSION: &str = "xml";

/// How to choose the document when the archive holds several XML files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DocumentSelection {
    /// Fail unless exactly one XML file is present.
    #[default]
    Strict,
    /// Use the lexicographically first XML file.
    First,
}

/// How bracket terms are removed from existing synonyms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StripMode {
    /// Only the removal of the last configured term is kept.
    #[default]
    LastTermOnly,
    /// Every configured term is removed in turn.
    Cumulative,
}

/// What to do with a chemical that lacks a `displayName` attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnnamedPolicy {
    /// Abort the run.
    #[default]
    Fail,
    /// Log a warning and leave the chemical out.
    Skip,
}

/// Where the archive lives and how to unpack it.
#[derive(Debug, Clone, Default)]
pub struct ArchiveConfig {
    pub archive: PathBuf,
    /// Extraction target. A temporary directory is used when unset.
    pub extract_dir: Option<PathBuf>,
    pub selection: DocumentSelection,
    pub unnamed: UnnamedPolicy,
}

impl ArchiveConfig {
    pub fn new(archive: impl Into<PathBuf>) -> Self {
        Self {
            archive: archive.into(),
            ..Self::default()
        }
    }
}

/// Synonym extraction settings.
#[derive(Debug, Clone)]
pub struct SynonymOptions {
    /// Derive extra synonyms by stripping bracket terms.
    pub generate: bool,
    pub bracket_terms: PathBuf,
    pub strip_mode: StripMode,
}

impl Default for SynonymOptions {
    fn default() -> Self {
        Self {
            generate: true,
            bracket_terms: PathBuf::from(DEFAULT_BRACKET_TERMS_FILE),
            strip_mode: StripMode::default(),
        }
    }
}

/// Full configuration of a harvest run writing both tables.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    pub archive: ArchiveConfig,
    pub synonyms: SynonymOptions,
    pub classes_output: PathBuf,
    pub synonyms_output: PathBuf,
}

impl HarvestConfig {
    pub fn new(archive: impl Into<PathBuf>) -> Self {
        Self {
            archive: ArchiveConfig::new(archive),
            synonyms: SynonymOptions::default(),
            classes_output: PathBuf::from(DEFAULT_CLASSES_OUTPUT),
            synonyms_output: PathBuf::from(DEFAULT_SYNONYMS_OUTPUT),
        }
    }
}

/// Check whether a file name looks like an XML document.
///
/// # Examples
/// ```
/// use chemidplus_harvester::config::is_xml_file_name;
///
/// assert!(is_xml_file_name("CurrentChemID.xml"));
/// assert!(is_xml_file_name("dump.XML"));
/// assert!(!is_xml_file_name("chemid.xml.md5"));
/// ```
pub fn is_xml_file_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(XML_EXTENSION))
}

/// Validate that the archive exists and is a regular file.
///
/// # Returns
/// * `Ok(())` if the path is an existing file
/// * `Err(HarvesterError::ArchiveNotFound)` if nothing exists there
/// * `Err(HarvesterError::InvalidPath)` if it is not a file
pub fn validate_archive_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(HarvesterError::ArchiveNotFound(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(HarvesterError::InvalidPath(format!(
            "archive is not a file: {}",
            path.display()
        )));
    }
    Ok(())
}

/// Validate that an output file can be created: its parent directory must
/// exist and the path itself must not be a directory.
pub fn validate_output_path(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Err(HarvesterError::InvalidPath(format!(
            "output path is a directory: {}",
            path.display()
        )));
    }
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
            Err(HarvesterError::InvalidPath(format!(
                "output directory does not exist: {}",
                parent.display()
            )))
        }
        _ => Ok(()),
    }
}
