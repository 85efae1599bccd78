//! Frontmatter parsing from markdown documents.

use super::types::Frontmatter;
use thiserror::Error;

const DELIMITER: &str = "---";

/// Errors that can occur during frontmatter parsing.
#[derive(Debug, Error)]
pub enum FrontmatterParseError {
    #[error("invalid YAML frontmatter: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),
}

/// Split a document into its raw frontmatter block and body.
///
/// Frontmatter is delimited by `---` lines at the very start of the document:
/// ```markdown
/// ---
/// tags: [project]
/// ---
/// # Document content
/// ```
///
/// Returns `None` when the document does not open with a delimiter line or the
/// block is never closed; the whole content is then body.
pub fn split(content: &str) -> Option<(&str, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let after_open = content.strip_prefix(DELIMITER)?;
    let block = after_open
        .strip_prefix('\n')
        .or_else(|| after_open.strip_prefix("\r\n"))?;

    let mut offset = 0;
    for line in block.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            return Some((&block[..offset], &block[offset + line.len()..]));
        }
        offset += line.len();
    }

    None
}

/// Parse the YAML inside a frontmatter block.
pub fn parse_yaml(yaml: &str) -> Result<Frontmatter, FrontmatterParseError> {
    if yaml.trim().is_empty() {
        return Ok(Frontmatter::default());
    }
    Ok(serde_yaml::from_str(yaml)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_no_frontmatter() {
        assert!(split("# Hello\n\nSome content").is_none());
    }

    #[test]
    fn split_simple_frontmatter() {
        let (yaml, body) = split("---\ntitle: Hello\n---\n# Content").unwrap();
        assert_eq!(yaml, "title: Hello\n");
        assert_eq!(body, "# Content");
    }

    #[test]
    fn split_crlf_frontmatter() {
        let (yaml, body) = split("---\r\ntags: [a]\r\n---\r\nBody").unwrap();
        assert_eq!(yaml, "tags: [a]\r\n");
        assert_eq!(body, "Body");
    }

    #[test]
    fn split_empty_frontmatter() {
        let (yaml, body) = split("---\n---\n# Content").unwrap();
        assert_eq!(yaml, "");
        assert_eq!(body, "# Content");
    }

    #[test]
    fn split_closing_delimiter_at_eof() {
        let (yaml, body) = split("---\ntitle: x\n---").unwrap();
        assert_eq!(yaml, "title: x\n");
        assert_eq!(body, "");
    }

    #[test]
    fn split_unclosed_block_is_not_frontmatter() {
        assert!(split("---\ntitle: never closed\n").is_none());
    }

    #[test]
    fn split_requires_delimiter_on_first_line() {
        assert!(split("\n---\ntitle: x\n---\n").is_none());
        assert!(split("--- title\n---\n").is_none());
    }

    #[test]
    fn parse_yaml_fields() {
        let fm = parse_yaml("title: Test\ntags:\n  - rust\n  - cli\n").unwrap();
        assert_eq!(fm.fields.get("title").and_then(|v| v.as_str()), Some("Test"));
        assert!(fm.fields.contains_key("tags"));
    }

    #[test]
    fn parse_yaml_blank_is_empty() {
        assert!(parse_yaml("  \n").unwrap().fields.is_empty());
    }

    #[test]
    fn parse_yaml_malformed() {
        let err = parse_yaml("tags: [unclosed\n").unwrap_err();
        assert!(matches!(err, FrontmatterParseError::InvalidYaml(_)));
    }
}
