//! Bracket-term list: qualifier substrings stripped from chemical names.
//!
//! Terms are literal substrings such as `" [USP]"` or `" [INN]"`. Leading and
//! trailing spaces are significant and are kept as written in the file.

use std::fs;
use std::path::Path;

use crate::config::StripMode;
use crate::error::{HarvesterError, Result};

/// Ordered, immutable list of bracket terms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BracketTerms {
    terms: Vec<String>,
}

impl BracketTerms {
    /// Build from an explicit list, dropping empty terms.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terms: terms
                .into_iter()
                .map(Into::into)
                .filter(|t: &String| !t.is_empty())
                .collect(),
        }
    }

    /// Parse a newline-separated term list.
    ///
    /// Empty lines (including the one after a trailing newline) are ignored
    /// and a trailing `\r` is removed from each line. A line holding only
    /// spaces is a term like any other.
    ///
    /// # Examples
    /// ```
    /// use chemidplus_harvester::bracket::BracketTerms;
    ///
    /// let terms = BracketTerms::parse(" [USP]\r\n [INN]\n\n");
    /// assert_eq!(terms.as_slice(), &[" [USP]".to_string(), " [INN]".to_string()]);
    /// ```
    pub fn parse(content: &str) -> Self {
        Self::new(content.split('\n').map(|line| line.trim_end_matches('\r')))
    }

    /// Load the term list from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| HarvesterError::BracketTerms {
            path: path.to_path_buf(),
            source,
        })?;
        let terms = Self::parse(&content);
        tracing::info!(count = terms.len(), path = %path.display(), "Loaded bracket terms");
        Ok(terms)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.terms
    }

    /// Remove every term from `text`, in list order, and trim the result.
    ///
    /// # Examples
    /// ```
    /// use chemidplus_harvester::bracket::BracketTerms;
    ///
    /// let terms = BracketTerms::new([" [USP]", " [INN]"]);
    /// assert_eq!(terms.strip_all("Aspirin [INN] [USP]"), "Aspirin");
    /// ```
    #[must_use]
    pub fn strip_all(&self, text: &str) -> String {
        self.terms
            .iter()
            .fold(text.to_string(), |acc, term| acc.replace(term.as_str(), ""))
            .trim()
            .to_string()
    }

    /// Remove only the last term from `text` and trim the result.
    ///
    /// Each term is applied to the untouched input, so earlier removals are
    /// discarded and only the last one survives.
    #[must_use]
    pub fn strip_last(&self, text: &str) -> String {
        match self.terms.last() {
            Some(term) => text.replace(term.as_str(), "").trim().to_string(),
            None => text.trim().to_string(),
        }
    }

    /// Strip according to `mode`.
    #[must_use]
    pub fn strip(&self, text: &str, mode: StripMode) -> String {
        match mode {
            StripMode::Cumulative => self.strip_all(text),
            StripMode::LastTermOnly => self.strip_last(text),
        }
    }
}
