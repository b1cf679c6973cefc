//! Synonym extraction with generated synonyms.
//!
//! Besides the sourced synonyms of a chemical, extra candidates are derived by
//! stripping bracket terms from the display name and from synonyms that
//! contain a `[`. A candidate is emitted only if stripping changed something
//! and no existing or earlier generated synonym of the same chemical has the
//! same trimmed text.

use std::collections::HashSet;

use crate::bracket::BracketTerms;
use crate::config::{StripMode, SYNONYMS_TAG};
use crate::extract::element_record;
use crate::types::{Chemical, Record};
use crate::xml::{find_descendants, own_text};

/// Trimmed synonym texts already known for one chemical.
#[derive(Debug, Default)]
struct SeenSynonyms(HashSet<String>);

impl SeenSynonyms {
    fn contains(&self, text: &str) -> bool {
        self.0.contains(text.trim())
    }

    fn insert(&mut self, text: &str) {
        self.0.insert(text.trim().to_string());
    }
}

/// Extract the synonyms of a chemical, interleaved with generated ones.
///
/// Output order: the synonym generated from the display name (if any), then
/// every sourced synonym, each directly followed by the synonym generated
/// from it (if any). A chemical with an empty display name yields nothing.
///
/// The display name is stripped of every term; synonyms are stripped
/// according to `mode`.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use chemidplus_harvester::bracket::BracketTerms;
/// use chemidplus_harvester::config::StripMode;
/// use chemidplus_harvester::synonyms::extract_synonyms_with_generated;
/// use chemidplus_harvester::types::Chemical;
///
/// let doc = Document::parse(r#"<Chemical displayName="Aspirin [USP]"/>"#).unwrap();
/// let chemical = Chemical::from_node(doc.root_element(), 0).unwrap();
/// let terms = BracketTerms::new([" [USP]"]);
///
/// let records = extract_synonyms_with_generated(&chemical, &terms, StripMode::LastTermOnly);
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].value, "Aspirin");
/// assert!(records[0].is_generated());
/// ```
pub fn extract_synonyms_with_generated(
    chemical: &Chemical<'_, '_>,
    terms: &BracketTerms,
    mode: StripMode,
) -> Vec<Record> {
    let molecule = chemical.display_name;
    if molecule.is_empty() {
        return Vec::new();
    }

    let synonyms: Vec<_> = find_descendants(chemical.node, SYNONYMS_TAG).collect();

    let mut seen = SeenSynonyms::default();
    for text in synonyms.iter().filter_map(|s| own_text(*s)) {
        seen.insert(text);
    }

    let mut records = Vec::with_capacity(synonyms.len() + 1);

    let cleaned_name = terms.strip_all(molecule);
    if let Some(record) = generate(molecule, molecule, cleaned_name, &mut seen) {
        records.push(record);
    }

    for element in synonyms {
        let Some(record) = element_record(molecule, element) else {
            continue;
        };
        let derived = if record.value.contains('[') {
            let cleaned = terms.strip(&record.value, mode);
            generate(molecule, &record.value, cleaned, &mut seen)
        } else {
            None
        };
        records.push(record);
        records.extend(derived);
    }

    records
}

/// Emit a generated record for `cleaned` unless it is empty, unchanged from
/// `original` or already seen.
fn generate(
    molecule: &str,
    original: &str,
    cleaned: String,
    seen: &mut SeenSynonyms,
) -> Option<Record> {
    if cleaned.is_empty() || cleaned == original || seen.contains(&cleaned) {
        return None;
    }
    seen.insert(&cleaned);
    Some(Record::generated(molecule, cleaned))
}
