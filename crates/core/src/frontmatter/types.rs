//! Frontmatter types and data structures.

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::HashMap;

/// Represents parsed YAML frontmatter from a markdown document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Frontmatter {
    /// Fields as key-value pairs.
    #[serde(flatten)]
    pub fields: HashMap<String, Value>,
}

impl Frontmatter {
    /// The `title` field, if it is a string.
    pub fn title(&self) -> Option<&str> {
        self.fields.get("title").and_then(Value::as_str)
    }

    /// Tags declared by the `tags` (or `tag`) field.
    ///
    /// Accepts a sequence (`[a, b]` or a block list) or a single string of
    /// comma and/or whitespace separated names. A leading `#` is dropped.
    pub fn tags(&self) -> Vec<String> {
        let Some(value) = self.fields.get("tags").or_else(|| self.fields.get("tag")) else {
            return Vec::new();
        };

        let raw: Vec<String> = match value {
            Value::Sequence(items) => items.iter().filter_map(scalar_to_string).collect(),
            Value::String(s) => s
                .split(|c: char| c == ',' || c.is_whitespace())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };

        raw.iter()
            .map(|tag| tag.trim().trim_start_matches('#'))
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::frontmatter::parse_yaml;

    #[test]
    fn tags_from_flow_sequence() {
        let fm = parse_yaml("tags: [project, urgent]").unwrap();
        assert_eq!(fm.tags(), vec!["project", "urgent"]);
    }

    #[test]
    fn tags_from_block_sequence() {
        let fm = parse_yaml("tags:\n  - rust\n  - '#cli'\n  - 2024\n").unwrap();
        assert_eq!(fm.tags(), vec!["rust", "cli", "2024"]);
    }

    #[test]
    fn tags_from_delimited_string() {
        let fm = parse_yaml("tags: first, second third").unwrap();
        assert_eq!(fm.tags(), vec!["first", "second", "third"]);
    }

    #[test]
    fn tag_alias_is_accepted() {
        let fm = parse_yaml("tag: solo").unwrap();
        assert_eq!(fm.tags(), vec!["solo"]);
    }

    #[test]
    fn non_string_tags_are_ignored() {
        let fm = parse_yaml("tags:\n  nested: map\n").unwrap();
        assert!(fm.tags().is_empty());

        let fm = parse_yaml("tags: [true, {a: b}, kept]").unwrap();
        assert_eq!(fm.tags(), vec!["kept"]);
    }

    #[test]
    fn missing_tags_field() {
        let fm = parse_yaml("title: Only a title").unwrap();
        assert!(fm.tags().is_empty());
        assert_eq!(fm.title(), Some("Only a title"));
    }
}
