//! Frontmatter detection and parsing for markdown documents.
//!
//! Frontmatter is optional: a document without a well-formed block simply has
//! no frontmatter fields.

pub mod parser;
pub mod types;

pub use parser::{FrontmatterParseError, parse_yaml, split};
pub use types::Frontmatter;
