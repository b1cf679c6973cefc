//! Main harvester service that ties all components together.

use std::fs;
use std::path::Path;

use roxmltree::Document;

use crate::archive::{load_document, LoadedDocument};
use crate::bracket::BracketTerms;
use crate::config::{
    ArchiveConfig, HarvestConfig, StripMode, SynonymOptions, UnnamedPolicy, CHEMICAL_TAG,
};
use crate::error::{HarvesterError, Result};
use crate::extract::extract_info_list;
use crate::synonyms::extract_synonyms_with_generated;
use crate::tsv::{stage_records, StagedTable};
use crate::types::{describe, Chemical, Record, RecordKind};
use crate::xml::find_children;

/// Counts reported after a table has been written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableSummary {
    /// Data rows written, excluding the header.
    pub rows: usize,
    /// Rows with source `GENERATED`.
    pub generated: usize,
}

/// Counts reported after a full harvest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HarvestSummary {
    pub chemicals: usize,
    /// Chemicals left out because they had no `displayName`.
    pub skipped: usize,
    pub classes: TableSummary,
    pub synonyms: TableSummary,
}

/// Parser over one unpacked ChemIDplus document.
///
/// The XML text is kept in memory and parsed once per table, so each
/// extraction borrows a fresh DOM tree.
#[derive(Debug)]
pub struct ChemIdPlusParser {
    document: LoadedDocument,
    unnamed: UnnamedPolicy,
}

impl ChemIdPlusParser {
    /// Unpack the archive and read its XML document.
    pub fn open(config: &ArchiveConfig) -> Result<Self> {
        let document = load_document(config)?;
        Ok(Self {
            document,
            unnamed: config.unnamed,
        })
    }

    /// Build a parser over XML text that is already in memory.
    pub fn from_document(document: LoadedDocument, unnamed: UnnamedPolicy) -> Self {
        Self { document, unnamed }
    }

    /// Parse the document and count its chemicals.
    ///
    /// Returns `(total, skipped)` where `skipped` counts chemicals the unnamed
    /// policy leaves out. Fails on malformed XML and, under
    /// `UnnamedPolicy::Fail`, on the first chemical without `displayName`.
    pub fn chemical_counts(&self) -> Result<(usize, usize)> {
        let doc = self.document.parse()?;
        let total = chemical_nodes(&doc).count();
        tracing::info!("The list contains {total} compounds");
        let (_, skipped) = resolve_chemicals(&doc, self.unnamed)?;
        Ok((total, skipped))
    }

    /// Write every classification code to `output`.
    pub fn extract_all_classes(&self, output: &Path) -> Result<TableSummary> {
        let (table, summary) = self.stage_classes(output)?;
        table.commit()?;
        Ok(summary)
    }

    /// Write every synonym to `output`, with generated synonyms unless
    /// `options.generate` is off.
    pub fn extract_all_synonyms(
        &self,
        output: &Path,
        options: &SynonymOptions,
    ) -> Result<TableSummary> {
        let terms = if options.generate {
            Some(BracketTerms::load(&options.bracket_terms)?)
        } else {
            None
        };
        let (table, summary) = self.stage_synonyms(output, terms.as_ref(), options.strip_mode)?;
        table.commit()?;
        Ok(summary)
    }

    fn stage_classes(&self, output: &Path) -> Result<(StagedTable, TableSummary)> {
        let doc = self.document.parse()?;
        let (chemicals, _) = resolve_chemicals(&doc, self.unnamed)?;

        let rows = chemicals
            .iter()
            .map(|c| extract_info_list(c, RecordKind::Classes.tag()));
        stage_table(output, RecordKind::Classes, rows)
    }

    fn stage_synonyms(
        &self,
        output: &Path,
        terms: Option<&BracketTerms>,
        mode: StripMode,
    ) -> Result<(StagedTable, TableSummary)> {
        let doc = self.document.parse()?;
        let (chemicals, _) = resolve_chemicals(&doc, self.unnamed)?;

        match terms {
            Some(terms) => {
                let rows = chemicals
                    .iter()
                    .map(|c| extract_synonyms_with_generated(c, terms, mode));
                stage_table(output, RecordKind::Synonyms, rows)
            }
            None => {
                let rows = chemicals
                    .iter()
                    .map(|c| extract_info_list(c, RecordKind::Synonyms.tag()));
                stage_table(output, RecordKind::Synonyms, rows)
            }
        }
    }
}

/// Run the whole pipeline: unpack, parse, write both tables.
///
/// Bracket terms are loaded and the document is parsed before any output is
/// touched. Both tables are then staged to temp files and only renamed into
/// place once both have been written. If the second rename fails, the first
/// table is removed again so a failed run never leaves a fresh classes
/// table next to a stale synonyms table.
pub fn harvest(config: &HarvestConfig) -> Result<HarvestSummary> {
    let terms = if config.synonyms.generate {
        Some(BracketTerms::load(&config.synonyms.bracket_terms)?)
    } else {
        None
    };

    let parser = ChemIdPlusParser::open(&config.archive)?;
    let (chemicals, skipped) = parser.chemical_counts()?;

    let (classes_table, classes) = parser.stage_classes(&config.classes_output)?;
    let (synonyms_table, synonyms) = parser.stage_synonyms(
        &config.synonyms_output,
        terms.as_ref(),
        config.synonyms.strip_mode,
    )?;

    classes_table.commit()?;
    if let Err(e) = synonyms_table.commit() {
        if let Err(remove) = fs::remove_file(&config.classes_output) {
            tracing::warn!(
                path = %config.classes_output.display(),
                error = %remove,
                "Could not remove classes table after failed run"
            );
        }
        return Err(e);
    }

    Ok(HarvestSummary {
        chemicals,
        skipped,
        classes,
        synonyms,
    })
}

/// Top-level `Chemical` elements, in document order.
fn chemical_nodes<'a, 'input>(
    doc: &'a Document<'input>,
) -> impl Iterator<Item = roxmltree::Node<'a, 'input>> {
    find_children(doc.root_element(), CHEMICAL_TAG)
}

/// Resolve display names for every chemical, applying the unnamed policy.
///
/// Returns the chemicals and the number skipped.
fn resolve_chemicals<'a, 'input>(
    doc: &'a Document<'input>,
    policy: UnnamedPolicy,
) -> Result<(Vec<Chemical<'a, 'input>>, usize)> {
    let mut chemicals = Vec::new();
    let mut skipped = 0;

    for (index, node) in chemical_nodes(doc).enumerate() {
        match Chemical::from_node(node, index) {
            Ok(chemical) => chemicals.push(chemical),
            Err(HarvesterError::MissingAttribute { .. }) if policy == UnnamedPolicy::Skip => {
                tracing::warn!(
                    chemical = %describe(node, index),
                    "Skipping chemical without displayName"
                );
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok((chemicals, skipped))
}

fn stage_table<I>(
    output: &Path,
    kind: RecordKind,
    rows: I,
) -> Result<(StagedTable, TableSummary)>
where
    I: Iterator<Item = Vec<Record>>,
{
    let mut generated = 0;
    let rows = rows.inspect(|list| generated += list.iter().filter(|r| r.is_generated()).count());
    let table = stage_records(output, kind, rows)?;
    let summary = TableSummary {
        rows: table.rows(),
        generated,
    };
    Ok((table, summary))
}
