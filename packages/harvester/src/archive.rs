//! Archive unpacking and XML document loading.
//!
//! The ChemIDplus subset ships as a zip archive holding one XML document
//! (e.g. `chemid-20230222.zip`). The archive is unpacked into the configured
//! directory, or a temporary one, and the XML document is selected by name.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use roxmltree::{Document, ParsingOptions};
use zip::ZipArchive;

use crate::config::{is_xml_file_name, validate_archive_path, ArchiveConfig, DocumentSelection};
use crate::error::{HarvesterError, Result};

/// Raw XML text of the selected document.
#[derive(Debug)]
pub struct LoadedDocument {
    /// Where the document was unpacked to. Under a temporary extraction
    /// directory this path no longer exists once loading returns.
    pub path: PathBuf,
    pub text: String,
}

impl LoadedDocument {
    /// Parse the document into a DOM tree.
    ///
    /// DTD declarations are accepted since the NLM dump carries one.
    pub fn parse(&self) -> Result<Document<'_>> {
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        Document::parse_with_options(&self.text, options).map_err(|source| {
            HarvesterError::XmlParse {
                path: self.path.clone(),
                source,
            }
        })
    }
}

/// Unpack the archive and read its XML document.
pub fn load_document(config: &ArchiveConfig) -> Result<LoadedDocument> {
    validate_archive_path(&config.archive)?;

    let temp_dir;
    let target: &Path = match &config.extract_dir {
        Some(dir) => {
            fs::create_dir_all(dir).map_err(extract_error(dir))?;
            dir.as_path()
        }
        None => {
            temp_dir = tempfile::tempdir().map_err(extract_error(&std::env::temp_dir()))?;
            temp_dir.path()
        }
    };

    extract_archive(&config.archive, target)?;
    let path = select_xml_document(target, config.selection)?;
    let text = fs::read_to_string(&path).map_err(|source| HarvesterError::ReadDocument {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), bytes = text.len(), "Read XML document");

    Ok(LoadedDocument { path, text })
}

/// Unpack every entry of a zip archive into `target`.
pub fn extract_archive(archive: &Path, target: &Path) -> Result<()> {
    let zip_error = |source| HarvesterError::Archive {
        path: archive.to_path_buf(),
        source,
    };

    let file = File::open(archive).map_err(extract_error(archive))?;
    let mut zip = ZipArchive::new(file).map_err(zip_error)?;
    tracing::info!(
        archive = %archive.display(),
        target = %target.display(),
        entries = zip.len(),
        "Extracting archive"
    );
    zip.extract(target).map_err(zip_error)
}

/// Pick the XML document among the top-level files of `dir`.
///
/// Candidates are sorted by file name, so the outcome does not depend on
/// directory listing order.
pub fn select_xml_document(dir: &Path, selection: DocumentSelection) -> Result<PathBuf> {
    let scan_error = extract_error(dir);
    let mut candidates: Vec<String> = Vec::new();
    for entry in fs::read_dir(dir).map_err(&scan_error)? {
        let entry = entry.map_err(&scan_error)?;
        if !entry.file_type().map_err(&scan_error)?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if is_xml_file_name(name) {
                candidates.push(name.to_string());
            }
        }
    }
    candidates.sort();

    if candidates.is_empty() {
        return Err(HarvesterError::NoXmlDocument(dir.to_path_buf()));
    }
    if candidates.len() > 1 && selection == DocumentSelection::Strict {
        return Err(HarvesterError::AmbiguousXmlDocument {
            dir: dir.to_path_buf(),
            candidates,
        });
    }
    if candidates.len() > 1 {
        tracing::warn!(
            count = candidates.len(),
            selected = %candidates[0],
            "Multiple XML documents in archive, using the first"
        );
    }

    let path = dir.join(&candidates[0]);
    tracing::info!(path = %path.display(), "Selected XML document");
    Ok(path)
}

fn extract_error(path: &Path) -> impl Fn(std::io::Error) -> HarvesterError + '_ {
    move |source| HarvesterError::Extract {
        path: path.to_path_buf(),
        source,
    }
}
