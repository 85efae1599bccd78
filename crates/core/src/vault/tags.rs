//! Tag extraction from frontmatter and inline `#tag` markers.
//!
//! Both rules are pure functions of the document text. Their results are
//! unioned into an ordered set, so extraction order never matters.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::frontmatter::{self, Frontmatter};

/// `#` followed by word characters with internal `-` or `/`, not glued to a
/// preceding word, `#`, `&` or `/` (URL fragments, entities, `##` headings).
static INLINE_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\p{L}\p{N}_#&/])#([\p{L}\p{N}_]+(?:[-/][\p{L}\p{N}_]+)*)").unwrap()
});

/// Extract every tag a document declares.
///
/// Malformed frontmatter contributes no tags; it is never an error.
pub fn extract_tags(content: &str) -> BTreeSet<String> {
    let (frontmatter, body) = split_document(content);
    collect_tags(frontmatter.as_ref(), body)
}

/// Tags declared in the document's frontmatter `tags` field.
pub fn frontmatter_tags(content: &str) -> BTreeSet<String> {
    let (frontmatter, _) = split_document(content);
    frontmatter.map(|fm| fm.tags().into_iter().collect()).unwrap_or_default()
}

/// Tags written inline in a document body, marker stripped.
///
/// Fenced code blocks and inline code spans are skipped.
pub fn inline_tags(body: &str) -> BTreeSet<String> {
    let mut tags = BTreeSet::new();
    let mut fence: Option<&str> = None;

    for line in body.lines() {
        let trimmed = line.trim_start();
        if let Some(marker) = fence_marker(trimmed) {
            match fence {
                Some(open) if open == marker => fence = None,
                None => fence = Some(marker),
                Some(_) => {}
            }
            continue;
        }
        if fence.is_some() {
            continue;
        }

        let text = strip_inline_code(line);
        for cap in INLINE_TAG_RE.captures_iter(&text) {
            let tag = &cap[1];
            // Purely numeric tokens such as issue numbers are not tags.
            if tag.chars().any(|c| !c.is_numeric()) {
                tags.insert(tag.to_string());
            }
        }
    }

    tags
}

/// Split off and parse the frontmatter, falling back to "no frontmatter" when
/// the YAML is malformed. The body never includes the frontmatter block.
pub(crate) fn split_document(content: &str) -> (Option<Frontmatter>, &str) {
    match frontmatter::split(content) {
        Some((yaml, body)) => {
            let parsed = frontmatter::parse_yaml(yaml)
                .inspect_err(|e| tracing::debug!("ignoring malformed frontmatter: {}", e))
                .ok();
            (parsed, body)
        }
        None => (None, content),
    }
}

pub(crate) fn collect_tags(frontmatter: Option<&Frontmatter>, body: &str) -> BTreeSet<String> {
    let mut tags: BTreeSet<String> =
        frontmatter.map(|fm| fm.tags().into_iter().collect()).unwrap_or_default();
    tags.extend(inline_tags(body));
    tags
}

fn fence_marker(line: &str) -> Option<&'static str> {
    if line.starts_with("```") {
        Some("```")
    } else if line.starts_with("~~~") {
        Some("~~~")
    } else {
        None
    }
}

fn strip_inline_code(line: &str) -> Cow<'_, str> {
    let ticks = line.matches('`').count();
    if ticks == 0 || ticks % 2 != 0 {
        return Cow::Borrowed(line);
    }
    let outside: Vec<&str> = line.split('`').step_by(2).collect();
    Cow::Owned(outside.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn set(tags: &[&str]) -> BTreeSet<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn frontmatter_and_inline_tags_are_unioned() {
        let content = "---\ntags: [project, urgent]\n---\nRemember to #followup.\n";
        assert_eq!(extract_tags(content), set(&["followup", "project", "urgent"]));
    }

    #[test]
    fn no_tags_is_empty_set() {
        assert!(extract_tags("Just some text.\n").is_empty());
        assert!(extract_tags("").is_empty());
    }

    #[test]
    fn duplicates_collapse_but_case_is_preserved() {
        let content = "---\ntags: [Rust, rust]\n---\n#rust and #Rust and #RUST\n";
        assert_eq!(extract_tags(content), set(&["RUST", "Rust", "rust"]));
    }

    #[test]
    fn malformed_frontmatter_yields_only_inline_tags() {
        let content = "---\ntags: [broken\n---\nBody with #inline\n";
        assert_eq!(extract_tags(content), set(&["inline"]));
        assert!(frontmatter_tags(content).is_empty());
    }

    #[test]
    fn frontmatter_is_not_scanned_for_inline_tags() {
        let content = "---\ntitle: About #nothing\n---\nBody\n";
        assert!(extract_tags(content).is_empty());
    }

    #[test]
    fn unclosed_frontmatter_is_body() {
        let content = "---\ntags: [a]\n#loose\n";
        assert_eq!(extract_tags(content), set(&["loose"]));
    }

    #[rstest]
    #[case("Document with #inline tags #after", &["inline", "after"])]
    #[case("#start of line", &["start"])]
    #[case("nested #area/sub-topic/leaf here", &["area/sub-topic/leaf"])]
    #[case("snake #my_tag.", &["my_tag"])]
    #[case("trailing #dash- and #slash/", &["dash", "slash"])]
    #[case("unicode #café and #日本語", &["café", "日本語"])]
    #[case("(#paren) [#bracket], #comma,#next", &["paren", "bracket", "comma", "next"])]
    #[case("year #2024 but #2024-review", &["2024-review"])]
    fn inline_tag_cases(#[case] body: &str, #[case] expected: &[&str]) {
        assert_eq!(inline_tags(body), set(expected));
    }

    #[rstest]
    #[case("# Heading")]
    #[case("## Second level")]
    #[case("see https://example.com/page#section")]
    #[case("entity &#123; here")]
    #[case("issue#42 and word#tag")]
    #[case("just a # sign")]
    #[case("only digits #12345")]
    fn inline_non_tags(#[case] body: &str) {
        assert!(inline_tags(body).is_empty(), "{body:?} should have no tags");
    }

    #[test]
    fn code_is_skipped() {
        let body = "\
before #real
```rust
let x = 1; // #not-a-tag
```
~~~
#also-not
~~~
inline `#code` then #after
";
        assert_eq!(inline_tags(body), set(&["after", "real"]));
    }

    #[test]
    fn frontmatter_tags_string_form() {
        let content = "---\ntags: first, second\n---\nBody\n";
        assert_eq!(frontmatter_tags(content), set(&["first", "second"]));
    }
}
