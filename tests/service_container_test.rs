//! End-to-end wiring through ServiceContainer with real files

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use learnpath::config::Settings;
use learnpath::infrastructure::di::ServiceContainer;
use learnpath::infrastructure::traits::{JsonFileStore, KeyValueStore, RealFileSystem};

fn settings_for(temp: &TempDir) -> Settings {
    Settings {
        content_dir: temp.path().to_path_buf(),
        topics: "topics.json".into(),
        state_file: "state/learnpath.json".into(),
        ..Settings::default()
    }
}

#[test]
fn given_container_when_dismissing_banner_then_state_survives_restart() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let settings = settings_for(&temp);
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();

    // Act
    ServiceContainer::new(settings.clone())
        .banners
        .dismiss("cohort-signup", at)
        .unwrap();
    let restarted = ServiceContainer::new(settings);

    // Assert
    assert_eq!(
        restarted.banners.dismissed_at("cohort-signup").unwrap(),
        Some(at)
    );
    assert!(!restarted.banners.is_dismissed("newsletter").unwrap());
    assert!(temp.path().join("state/learnpath.json").exists());
}

#[test]
fn given_garbled_timestamp_when_checking_banner_then_still_dismissed() {
    let temp = TempDir::new().unwrap();
    let settings = settings_for(&temp);
    let fs = Arc::new(RealFileSystem);
    let store = Arc::new(JsonFileStore::new(settings.state_path(), fs.clone()));
    store.set("banner.dismissed.promo", "yesterday").unwrap();

    let container = ServiceContainer::with_deps(settings, fs, store);

    assert!(container.banners.is_dismissed("promo").unwrap());
}

#[test]
fn given_topics_snapshot_when_using_container_then_builds_navigation() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("topics.json"),
        r#"[{"slug": "intro"}, {"slug": "keys", "order": 1}]"#,
    )
    .unwrap();
    let container = ServiceContainer::new(settings_for(&temp));

    let forest = container
        .content
        .build_forest(&container.settings.topics_path())
        .unwrap();
    let page = container.content.page(&forest, "keys").unwrap();

    assert_eq!(page.navigation.previous.unwrap().slug, "intro");
    assert!(page.navigation.next.is_none());
}
