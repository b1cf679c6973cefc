//! XML utilities.

mod utils;

pub use utils::{descendant_texts, find_children, find_descendants, get_tag_name, own_text};
