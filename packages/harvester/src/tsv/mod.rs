//! Tab-separated output generation.

mod writer;

pub use writer::{render_row, sanitize_field, stage_records, write_records, StagedTable};
