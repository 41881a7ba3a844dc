//! Topic records read from Markdown/MDX files with a `---` YAML frontmatter block.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::entities::ContentNode;

/// Error parsing a topic file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentParseError {
    pub message: String,
}

/// Frontmatter keys the tree understands; everything else is kept as metadata.
#[derive(Debug, Default, Deserialize)]
struct Frontmatter {
    slug: Option<String>,
    #[serde(alias = "parentSlug")]
    parent: Option<String>,
    order: Option<i64>,
    title: Option<String>,
    #[serde(flatten)]
    metadata: BTreeMap<String, serde_json::Value>,
}

impl ContentNode {
    /// Parse a topic file.
    ///
    /// Recognized frontmatter keys: `slug`, `parent` (or `parentSlug`),
    /// `order`, `title`. Other keys land in `metadata` with their YAML
    /// structure intact. Without frontmatter the whole file is the body.
    ///
    /// # Arguments
    /// * `content` - File content to parse
    /// * `default_slug` - Slug used when the frontmatter has none (usually derived from the path)
    pub fn from_markdown(content: &str, default_slug: &str) -> Result<Self, ContentParseError> {
        let mut node = ContentNode::new(default_slug);
        let Some((frontmatter, body)) = split_frontmatter(content) else {
            node.body = content.to_string();
            return Ok(node);
        };
        node.body = body.trim_start_matches(['\r', '\n']).to_string();

        let fields = parse_frontmatter(frontmatter)?;
        if let Some(slug) = fields.slug.filter(|s| !s.trim().is_empty()) {
            node.slug = slug;
        }
        node.parent = fields.parent.filter(|p| !p.trim().is_empty());
        node.order = fields.order.unwrap_or_default();
        node.title = fields.title.unwrap_or_default();
        node.metadata = fields.metadata;

        Ok(node)
    }
}

fn parse_frontmatter(block: &str) -> Result<Frontmatter, ContentParseError> {
    // An empty block (or comments only) is not a YAML mapping
    if block
        .lines()
        .all(|l| l.trim().is_empty() || l.trim_start().starts_with('#'))
    {
        return Ok(Frontmatter::default());
    }
    serde_yaml::from_str(block).map_err(|e| ContentParseError {
        message: format!("frontmatter: {e}"),
    })
}

/// Split `---\n<frontmatter>\n---\n<body>`; `None` when the file has no frontmatter.
fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let rest = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let body_start = offset + line.len();
            return Some((&rest[..offset], &rest[body_start..]));
        }
        offset += line.len();
    }
    None
}
