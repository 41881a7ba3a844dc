//! Tests for CatalogService: snapshot loading plus the filter pipeline

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rstest::{fixture, rstest};
use tempfile::TempDir;

use learnpath::application::services::CatalogService;
use learnpath::application::ApplicationError;
use learnpath::domain::{FilterCriteria, SortOrder};
use learnpath::infrastructure::traits::RealFileSystem;

const CURRICULA: &str = r#"[
  {"slug": "mastering", "title": "Mastering Bitcoin", "description": "The classic technical book",
   "tags": ["book"], "difficulty": "hard", "publishedAt": "2017-06-01T00:00:00Z"},
  {"slug": "intro-video", "title": "Bitcoin in ten minutes", "description": "Short intro",
   "tags": ["video"], "difficulty": "easy", "publishedAt": "2023-01-15T00:00:00Z"},
  {"slug": "lightning-workshop", "title": "Lightning hands-on", "description": "Run a node, open channels",
   "tags": ["workshop", "course"], "difficulty": "medium"},
  {"slug": "wallet-guide", "title": "Choosing a wallet", "description": "A guide to self custody",
   "tags": ["guide"], "difficulty": "easy", "publishedAt": "2020-03-10T00:00:00Z"}
]"#;

const ISSUES: &str = r#"[
  {"id": "101", "title": "Fix typo in README", "repository": "bitcoin/bitcoin",
   "labels": ["good first issue", "docs"], "language": "C++", "difficulty": "easy",
   "createdAt": "2024-02-01T00:00:00Z"},
  {"id": "7", "title": "Add fee estimation test", "body": "Cover the mempool edge case",
   "repository": "lightningdevkit/rust-lightning", "labels": ["good first issue"],
   "language": "Rust", "difficulty": "medium", "createdAt": "2024-03-01T00:00:00Z"},
  {"id": "42", "title": "Improve CLI help", "repository": "btcpayserver/btcpayserver",
   "labels": ["ux"], "language": "C#"}
]"#;

struct Snapshot {
    _temp: TempDir,
    curricula: PathBuf,
    issues: PathBuf,
}

fn write_file(root: &Path, name: &str, content: &str) -> PathBuf {
    let path = root.join(name);
    std::fs::write(&path, content).expect("write snapshot");
    path
}

#[fixture]
fn snapshot() -> Snapshot {
    let temp = TempDir::new().unwrap();
    let curricula = write_file(temp.path(), "curricula.json", CURRICULA);
    let issues = write_file(temp.path(), "issues.json", ISSUES);
    Snapshot {
        _temp: temp,
        curricula,
        issues,
    }
}

fn service() -> CatalogService {
    CatalogService::new(Arc::new(RealFileSystem))
}

fn slugs(criteria: &FilterCriteria, snapshot: &Snapshot) -> Vec<String> {
    service()
        .curricula(&snapshot.curricula, criteria)
        .unwrap()
        .into_iter()
        .map(|i| i.slug)
        .collect()
}

#[rstest]
fn given_no_criteria_when_listing_then_input_order(snapshot: Snapshot) {
    let result = slugs(&FilterCriteria::default(), &snapshot);

    assert_eq!(
        result,
        ["mastering", "intro-video", "lightning-workshop", "wallet-guide"]
    );
}

#[rstest]
fn given_search_and_tag_when_listing_then_both_apply(snapshot: Snapshot) {
    let criteria = FilterCriteria {
        search: Some("BITCOIN".to_string()),
        tags: ["video".to_string()].into(),
        ..FilterCriteria::default()
    };

    assert_eq!(slugs(&criteria, &snapshot), ["intro-video"]);
}

#[rstest]
fn given_several_tags_when_listing_then_any_tag_matches(snapshot: Snapshot) {
    let criteria = FilterCriteria {
        tags: ["book".to_string(), "guide".to_string()].into(),
        ..FilterCriteria::default()
    };

    assert_eq!(slugs(&criteria, &snapshot), ["mastering", "wallet-guide"]);
}

#[rstest]
#[case(SortOrder::Newest, ["intro-video", "wallet-guide", "mastering", "lightning-workshop"])]
#[case(SortOrder::Oldest, ["mastering", "wallet-guide", "intro-video", "lightning-workshop"])]
fn given_date_sort_when_listing_then_undated_last(
    snapshot: Snapshot,
    #[case] sort: SortOrder,
    #[case] expected: [&str; 4],
) {
    let criteria = FilterCriteria {
        sort,
        ..FilterCriteria::default()
    };

    assert_eq!(slugs(&criteria, &snapshot), expected);
}

#[rstest]
fn given_difficulty_when_listing_then_only_that_level(snapshot: Snapshot) {
    let criteria = FilterCriteria {
        difficulty: Some("easy".to_string()),
        ..FilterCriteria::default()
    };

    assert_eq!(slugs(&criteria, &snapshot), ["intro-video", "wallet-guide"]);
}

#[rstest]
fn given_label_and_language_when_listing_issues_then_both_apply(snapshot: Snapshot) {
    let criteria = FilterCriteria {
        tags: ["good first issue".to_string()].into(),
        language: Some("Rust".to_string()),
        ..FilterCriteria::default()
    };

    let issues = service().issues(&snapshot.issues, &criteria).unwrap();

    let ids: Vec<_> = issues.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["7"]);
    assert_eq!(issues[0].description, "Cover the mempool edge case");
}

#[rstest]
fn given_search_in_issue_body_when_listing_then_matches(snapshot: Snapshot) {
    let criteria = FilterCriteria {
        search: Some("mempool".to_string()),
        ..FilterCriteria::default()
    };

    let issues = service().issues(&snapshot.issues, &criteria).unwrap();

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].repository, "lightningdevkit/rust-lightning");
}

#[test]
fn given_item_without_title_when_loading_then_invalid_content() {
    let temp = TempDir::new().unwrap();
    let path = write_file(
        temp.path(),
        "curricula.json",
        r#"[{"slug": "x", "title": "  "}]"#,
    );

    let err = service().load_curricula(&path).unwrap_err();

    assert!(matches!(err, ApplicationError::InvalidContent { .. }));
}

#[test]
fn given_unknown_tag_in_snapshot_when_loading_then_invalid_content() {
    let temp = TempDir::new().unwrap();
    let path = write_file(
        temp.path(),
        "curricula.json",
        r#"[{"slug": "x", "title": "X", "tags": ["meme"]}]"#,
    );

    let err = service().load_curricula(&path).unwrap_err();

    assert!(matches!(err, ApplicationError::InvalidContent { .. }));
}

#[test]
fn given_mixed_case_tags_in_snapshot_when_filtering_then_matches_lowercase_facet() {
    let temp = TempDir::new().unwrap();
    let path = write_file(
        temp.path(),
        "curricula.json",
        r#"[{"slug": "x", "title": "X", "tags": ["Guide", "VIDEO"], "difficulty": "Easy"}]"#,
    );
    let criteria = FilterCriteria {
        tags: ["guide".to_string()].into(),
        difficulty: Some("easy".into()),
        ..FilterCriteria::default()
    };

    let items = service().curricula(&path, &criteria).unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].slug, "x");
}
