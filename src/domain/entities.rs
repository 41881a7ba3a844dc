//! Domain entities: core data structures

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::ParseValueError;

/// One unit of hierarchical content (a topic or article).
///
/// Only `slug`, `parent` and `order` are interpreted by the tree logic;
/// everything else is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentNode {
    pub slug: String,
    /// Slug of the parent node; `None` means root
    #[serde(default, alias = "parentSlug", skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Sibling ordering hint (ascending)
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
    /// Arbitrary frontmatter/metadata, opaque to the core
    #[serde(flatten)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl ContentNode {
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            parent: None,
            order: 0,
            title: String::new(),
            body: String::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Title for links, falling back to the slug for untitled content.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.slug
        } else {
            &self.title
        }
    }

    pub fn link(&self) -> NavLink {
        NavLink {
            slug: self.slug.clone(),
            title: self.display_title().to_string(),
        }
    }
}

/// `{ slug, title }` descriptor consumed by page rendering to build hyperlinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub slug: String,
    pub title: String,
}

impl fmt::Display for NavLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.slug)
    }
}

/// Difficulty level of a curriculum item or issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseValueError::new("difficulty", s)),
        }
    }
}

impl TryFrom<String> for Difficulty {
    type Error = ParseValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Fixed tag vocabulary for curriculum resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Tag {
    Guide,
    Course,
    Book,
    Video,
    Podcast,
    Article,
    Tool,
    Workshop,
}

impl Tag {
    pub const ALL: [Tag; 8] = [
        Tag::Guide,
        Tag::Course,
        Tag::Book,
        Tag::Video,
        Tag::Podcast,
        Tag::Article,
        Tag::Tool,
        Tag::Workshop,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Guide => "guide",
            Tag::Course => "course",
            Tag::Book => "book",
            Tag::Video => "video",
            Tag::Podcast => "podcast",
            Tag::Article => "article",
            Tag::Tool => "tool",
            Tag::Workshop => "workshop",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::ALL
            .iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| ParseValueError::new("tag", s))
    }
}

impl TryFrom<String> for Tag {
    type Error = ParseValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A curated learning resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurriculumItem {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default, alias = "publishedAt")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub url: Option<String>,
}

/// An open-source "good first issue".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub title: String,
    #[serde(default, alias = "body")]
    pub description: String,
    pub repository: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub url: Option<String>,
}
