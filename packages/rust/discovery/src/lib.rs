//! File discovery and textual usage detection for component-relations.
//!
//! Components are found by walking component roots for single-file
//! components; consumers are found by scanning every candidate file's text
//! for tag openings (PascalCase or kebab-case) and async loader imports.
//! No parsing happens here: everything is regex over raw text.

mod comments;
mod detector;
mod files;
mod naming;

pub use comments::extract_comments;
pub use detector::{ComponentPattern, FileScan, is_used};
pub use files::{component_pattern, enumerate};
pub use naming::{to_kebab_case, to_pascal_case};
