//! Core data types for the harvester.

use roxmltree::Node;

use crate::config::{
    CHEMICAL_TAG, CLASSES_HEADER, CLASSIFICATION_TAG, DISPLAY_NAME_ATTR, GENERATED_SOURCE,
    ID_ATTR, SOURCE_SEPARATOR, SYNONYMS_HEADER, SYNONYMS_TAG,
};
use crate::error::{HarvesterError, Result};

/// Kind of table being extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Classification codes.
    Classes,
    /// Synonyms, sourced or generated.
    Synonyms,
}

impl RecordKind {
    /// Header line written at the top of the table.
    #[must_use]
    pub fn header(&self) -> &'static str {
        match self {
            Self::Classes => CLASSES_HEADER,
            Self::Synonyms => SYNONYMS_HEADER,
        }
    }

    /// Element tag extracted for this kind.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Classes => CLASSIFICATION_TAG,
            Self::Synonyms => SYNONYMS_TAG,
        }
    }
}

/// One output row: `(molecule, value, sources)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// The chemical's display name.
    pub molecule: String,
    /// Classification code or synonym text.
    pub value: String,
    /// Source citations in document order.
    pub sources: Vec<String>,
}

impl Record {
    pub fn new(
        molecule: impl Into<String>,
        value: impl Into<String>,
        sources: Vec<String>,
    ) -> Self {
        Self {
            molecule: molecule.into(),
            value: value.into(),
            sources,
        }
    }

    /// A synonym derived by stripping bracket terms.
    pub fn generated(molecule: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(molecule, value, vec![GENERATED_SOURCE.to_string()])
    }

    /// Whether this row was produced by synonym generation.
    #[must_use]
    pub fn is_generated(&self) -> bool {
        matches!(self.sources.as_slice(), [s] if s == GENERATED_SOURCE)
    }

    /// Sources joined with `;`, possibly empty.
    #[must_use]
    pub fn source_list(&self) -> String {
        self.sources.join(SOURCE_SEPARATOR)
    }
}

/// A `Chemical` element with its resolved display name.
#[derive(Debug, Clone, Copy)]
pub struct Chemical<'a, 'input> {
    pub node: Node<'a, 'input>,
    pub display_name: &'a str,
}

impl<'a, 'input> Chemical<'a, 'input> {
    /// Wrap a `Chemical` node, resolving its `displayName`.
    ///
    /// `index` is the zero-based position among its siblings and only feeds
    /// the error message.
    pub fn from_node(node: Node<'a, 'input>, index: usize) -> Result<Self> {
        let display_name = node.attribute(DISPLAY_NAME_ATTR).ok_or_else(|| {
            HarvesterError::MissingAttribute {
                attribute: DISPLAY_NAME_ATTR.to_string(),
                context: describe(node, index),
            }
        })?;
        Ok(Self { node, display_name })
    }
}

/// Human-readable location of a chemical for diagnostics.
pub(crate) fn describe(node: Node<'_, '_>, index: usize) -> String {
    match node.attribute(ID_ATTR) {
        Some(id) => format!("{CHEMICAL_TAG} #{} (id={id})", index + 1),
        None => format!("{CHEMICAL_TAG} #{}", index + 1),
    }
}
