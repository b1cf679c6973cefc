//! ChemIDplus Harvester - Extract chemical synonyms and classifications from
//! the NIH ChemIDplus subset XML dump.
//!
//! This crate unpacks the zipped ChemIDplus dump, walks its `Chemical`
//! elements and writes two tab-separated tables: classification codes and
//! synonyms. Synonyms can be enriched with generated entries obtained by
//! stripping bracketed qualifiers such as `" [USP]"` from names.
//!
//! # Example
//!
//! ```
//! use chemidplus_harvester::bracket::BracketTerms;
//!
//! let terms = BracketTerms::parse(" [USP]\n [INN]\n");
//! assert_eq!(terms.strip_all("Aspirin [USP]"), "Aspirin");
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Constants, run configuration and validation
//! - [`error`]: Error types and Result alias
//! - [`types`]: Core data types (Record, RecordKind, Chemical)
//! - [`xml`]: XML utilities
//! - [`archive`]: Archive unpacking and document loading
//! - [`bracket`]: Bracket-term list and stripping
//! - [`extract`]: Record extraction per chemical
//! - [`synonyms`]: Synonym extraction with generated synonyms
//! - [`tsv`]: TSV output
//! - [`cli`]: Command-line interface
//! - [`harvester`]: Main harvester service

pub mod archive;
pub mod bracket;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod harvester;
pub mod synonyms;
pub mod tsv;
pub mod types;
pub mod xml;

// Re-export main functions
pub use harvester::{harvest, ChemIdPlusParser, HarvestSummary, TableSummary};

// Re-export commonly used items
pub use config::{HarvestConfig, StripMode};
pub use error::{HarvesterError, Result};
pub use types::{Record, RecordKind};
