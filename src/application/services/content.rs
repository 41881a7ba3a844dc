//! Topic content service
//!
//! The single "load snapshot" boundary for topics: reads records, validates
//! them, builds the forest and composes what a topic page needs.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use regex::Regex;
use tracing::{debug, instrument};

use crate::application::services::snapshot::read_records;
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{ContentNode, Forest, NavLink, Navigation, TreeBuilder};
use crate::infrastructure::traits::FileSystem;
use crate::util::path::{slug_from_path, PathExt};

fn slug_regex() -> &'static Regex {
    static SLUG: OnceLock<Regex> = OnceLock::new();
    SLUG.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._/-]*$").expect("static regex"))
}

/// Everything a topic page renders besides the body markup.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicPage {
    pub link: NavLink,
    pub body: String,
    pub metadata: BTreeMap<String, serde_json::Value>,
    /// Root-to-page chain, the page itself last
    pub breadcrumbs: Vec<NavLink>,
    pub children: Vec<NavLink>,
    pub navigation: Navigation,
}

/// Service for loading topics and resolving topic pages.
pub struct ContentService {
    fs: Arc<dyn FileSystem>,
}

impl ContentService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Load topic records from a JSON file or a directory of `.md`/`.mdx` files.
    #[instrument(level = "debug", skip(self))]
    pub fn load_topics(&self, source: &Path) -> ApplicationResult<Vec<ContentNode>> {
        let nodes = if self.fs.is_dir(source) {
            self.load_topic_dir(source)?
        } else {
            read_records(self.fs.as_ref(), source, "topics")?
        };
        Self::validate(source, &nodes)?;
        Ok(nodes)
    }

    /// Load and build the forest in one step.
    pub fn build_forest(&self, source: &Path) -> ApplicationResult<Forest> {
        let nodes = self.load_topics(source)?;
        let forest = TreeBuilder::new().build(nodes)?;
        Ok(forest)
    }

    /// Resolve the page for `slug`; unknown slugs yield the not-found signal.
    #[instrument(level = "debug", skip(self, forest))]
    pub fn page(&self, forest: &Forest, slug: &str) -> ApplicationResult<TopicPage> {
        let (idx, node) = forest.locate(slug)?;
        let children = node
            .children
            .iter()
            .filter_map(|&child| forest.nav_link(child))
            .collect();

        Ok(TopicPage {
            link: node.data.link(),
            body: node.data.body.clone(),
            metadata: node.data.metadata.clone(),
            breadcrumbs: forest.breadcrumbs(idx),
            children,
            navigation: forest.navigation(idx),
        })
    }

    fn load_topic_dir(&self, dir: &Path) -> ApplicationResult<Vec<ContentNode>> {
        let mut nodes = Vec::new();

        // File order is the tie-breaker for equal `order` values
        let files = self.fs.list_files(dir).with_path_context("scan topics", dir)?;
        for path in files.iter().map(PathBuf::as_path) {
            if !path.is_content_file() {
                continue;
            }

            let default_slug = slug_from_path(dir, path).ok_or_else(|| {
                ApplicationError::invalid_content(path, "cannot derive slug from path")
            })?;
            let content = self
                .fs
                .read_to_string(path)
                .with_path_context("read topic", path)?;
            let node = ContentNode::from_markdown(&content, &default_slug)
                .map_err(|e| ApplicationError::invalid_content(path, e.message))?;
            nodes.push(node);
        }

        debug!("load_topic_dir: {} topics in {}", nodes.len(), dir.display());
        Ok(nodes)
    }

    fn validate(source: &Path, nodes: &[ContentNode]) -> ApplicationResult<()> {
        for node in nodes {
            if !slug_regex().is_match(&node.slug) {
                return Err(ApplicationError::invalid_content(
                    PathBuf::from(source),
                    format!("invalid slug: {:?}", node.slug),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::traits::RealFileSystem;
    use std::io;
    use tempfile::TempDir;

    /// Topic files held in memory, keyed by absolute path.
    struct InMemoryFs(BTreeMap<PathBuf, String>);

    impl InMemoryFs {
        fn with_files(files: &[(&str, &str)]) -> Self {
            Self(
                files
                    .iter()
                    .map(|(path, content)| (PathBuf::from(path), content.to_string()))
                    .collect(),
            )
        }
    }

    impl FileSystem for InMemoryFs {
        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.0
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
        }

        fn write(&self, _path: &Path, _content: &str) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::PermissionDenied))
        }

        fn exists(&self, path: &Path) -> bool {
            self.0.contains_key(path) || self.is_dir(path)
        }

        fn is_dir(&self, path: &Path) -> bool {
            self.0.keys().any(|p| p != path && p.starts_with(path))
        }

        fn ensure_parent(&self, _path: &Path) -> io::Result<()> {
            Ok(())
        }

        fn list_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
            Ok(self.0.keys().filter(|p| p.starts_with(dir)).cloned().collect())
        }
    }

    #[test]
    fn given_topic_dir_behind_file_system_trait_when_loading_then_reads_markdown_only() {
        let fs = InMemoryFs::with_files(&[
            ("/site/topics/basics.md", "---
title: Basics
---
"),
            (
                "/site/topics/basics/keys.mdx",
                "---
parent: basics
title: Keys
---
Private and public keys
",
            ),
            ("/site/topics/notes.txt", "not a topic"),
        ]);
        let service = ContentService::new(Arc::new(fs));

        let forest = service.build_forest(Path::new("/site/topics")).unwrap();

        let order: Vec<_> = forest
            .reading_order()
            .into_iter()
            .map(|link| link.slug)
            .collect();
        assert_eq!(order, vec!["basics", "basics/keys"]);
    }

    #[test]
    fn given_blank_slug_when_validating_then_rejects() {
        let nodes = vec![ContentNode::new("ok"), ContentNode::new("  ")];

        let err = ContentService::validate(Path::new("topics.json"), &nodes).unwrap_err();

        assert!(matches!(err, ApplicationError::InvalidContent { .. }));
    }

    #[test]
    fn given_page_request_when_resolving_then_includes_navigation() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("topics.json");
        std::fs::write(
            &path,
            r#"[{"slug":"a","title":"A"},{"slug":"b","parent":"a"},{"slug":"c","order":1}]"#,
        )
        .unwrap();
        let service = ContentService::new(Arc::new(RealFileSystem));
        let forest = service.build_forest(&path).unwrap();

        let page = service.page(&forest, "b").unwrap();

        assert_eq!(page.navigation.previous.unwrap().slug, "a");
        assert_eq!(page.navigation.next.unwrap().slug, "c");
        assert_eq!(page.breadcrumbs.len(), 2);
        assert!(page.children.is_empty());
    }
}
