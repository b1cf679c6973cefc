//! Record extraction from a single `Chemical` element.

use roxmltree::Node;

use crate::config::SOURCE_TAG;
use crate::types::{Chemical, Record};
use crate::xml::{descendant_texts, find_descendants, get_tag_name, own_text};

/// Extract one record per `tag` descendant of a chemical.
///
/// Each record carries the chemical's display name, the element's trimmed
/// text and the texts of its nested `Source` elements. Elements without text
/// are skipped. Returns an empty list when nothing matches.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use chemidplus_harvester::extract::extract_info_list;
/// use chemidplus_harvester::types::Chemical;
///
/// let xml = r#"<Chemical displayName="Foo">
///     <NameList><Synonyms>Bar<SourceList><Source>DTP</Source></SourceList></Synonyms></NameList>
/// </Chemical>"#;
/// let doc = Document::parse(xml).unwrap();
/// let chemical = Chemical::from_node(doc.root_element(), 0).unwrap();
///
/// let records = extract_info_list(&chemical, "Synonyms");
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].value, "Bar");
/// assert_eq!(records[0].source_list(), "DTP");
/// ```
pub fn extract_info_list(chemical: &Chemical<'_, '_>, tag: &str) -> Vec<Record> {
    find_descendants(chemical.node, tag)
        .filter_map(|element| element_record(chemical.display_name, element))
        .collect()
}

/// Build a record from one matching element, or `None` if it has no text.
pub(crate) fn element_record(molecule: &str, element: Node<'_, '_>) -> Option<Record> {
    let Some(value) = own_text(element) else {
        tracing::debug!(
            molecule,
            tag = get_tag_name(element),
            "Skipping element without text"
        );
        return None;
    };
    Some(Record::new(
        molecule,
        value,
        descendant_texts(element, SOURCE_TAG),
    ))
}
