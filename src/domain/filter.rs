//! Filter pipeline for curricula and issues.
//!
//! Stages run in a fixed order: search, tags, difficulty, language, sort.
//! Each facet is optional and facets combine with AND semantics. Values
//! nothing can match (an unknown tag, say) produce an empty list, never an
//! error.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::entities::{CurriculumItem, Difficulty, Issue};
use crate::domain::error::ParseValueError;

/// Attributes the pipeline inspects.
pub trait Filterable {
    fn title(&self) -> &str;
    fn description(&self) -> &str;
    /// Case-insensitive tag membership.
    fn has_tag(&self, tag: &str) -> bool;
    fn difficulty(&self) -> Option<Difficulty>;
    fn language(&self) -> Option<&str> {
        None
    }
    fn published_at(&self) -> Option<DateTime<Utc>>;
}

impl Filterable for CurriculumItem {
    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn has_tag(&self, tag: &str) -> bool {
        self.tags
            .iter()
            .any(|t| t.as_str().eq_ignore_ascii_case(tag.trim()))
    }

    fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }
}

impl Filterable for Issue {
    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn has_tag(&self, tag: &str) -> bool {
        self.labels
            .iter()
            .any(|label| label.trim().eq_ignore_ascii_case(tag.trim()))
    }

    fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    fn published_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

/// Requested ordering of the filtered list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum SortOrder {
    /// Input order, untouched
    #[default]
    Relevance,
    /// Publication date descending
    Newest,
    /// Publication date ascending
    Oldest,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortOrder::Relevance => "relevance",
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
        };
        f.write_str(s)
    }
}

impl FromStr for SortOrder {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relevance" => Ok(SortOrder::Relevance),
            "newest" | "desc" => Ok(SortOrder::Newest),
            "oldest" | "asc" => Ok(SortOrder::Oldest),
            _ => Err(ParseValueError::new("sort order", s)),
        }
    }
}

impl TryFrom<String> for SortOrder {
    type Error = ParseValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Filter criteria as received from the page: every facet optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub search: Option<String>,
    pub tags: BTreeSet<String>,
    pub difficulty: Option<String>,
    pub language: Option<String>,
    pub sort: SortOrder,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.search_term().is_none()
            && self.tags.is_empty()
            && self.difficulty_term().is_none()
            && self.language_term().is_none()
            && self.sort == SortOrder::Relevance
    }

    fn search_term(&self) -> Option<String> {
        non_blank(self.search.as_deref()).map(str::to_lowercase)
    }

    fn difficulty_term(&self) -> Option<&str> {
        non_blank(self.difficulty.as_deref())
    }

    fn language_term(&self) -> Option<&str> {
        non_blank(self.language.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Run the pipeline. The source list is left untouched.
#[instrument(level = "debug", skip(items), fields(count = items.len()))]
pub fn filter<T: Filterable + Clone>(items: &[T], criteria: &FilterCriteria) -> Vec<T> {
    let search = criteria.search_term();

    let mut result: Vec<T> = items
        .iter()
        .filter(|item| matches_search(*item, search.as_deref()))
        .filter(|item| matches_tags(*item, &criteria.tags))
        .filter(|item| matches_difficulty(*item, criteria.difficulty_term()))
        .filter(|item| matches_language(*item, criteria.language_term()))
        .cloned()
        .collect();

    sort_items(&mut result, criteria.sort);
    debug!("filter kept {} of {} items", result.len(), items.len());
    result
}

/// `term` is already lowercased.
fn matches_search<T: Filterable>(item: &T, term: Option<&str>) -> bool {
    match term {
        None => true,
        Some(term) => {
            item.title().to_lowercase().contains(term)
                || item.description().to_lowercase().contains(term)
        }
    }
}

/// OR within the facet: one shared tag is enough.
fn matches_tags<T: Filterable>(item: &T, tags: &BTreeSet<String>) -> bool {
    tags.is_empty() || tags.iter().any(|tag| item.has_tag(tag))
}

fn matches_difficulty<T: Filterable>(item: &T, wanted: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(wanted) => item
            .difficulty()
            .is_some_and(|d| d.as_str().eq_ignore_ascii_case(wanted)),
    }
}

fn matches_language<T: Filterable>(item: &T, wanted: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(wanted) => item
            .language()
            .is_some_and(|lang| lang.trim().eq_ignore_ascii_case(wanted)),
    }
}

/// Stable sort; undated items go last in both date orders.
fn sort_items<T: Filterable>(items: &mut [T], order: SortOrder) {
    let by_date = |a: &T, b: &T, newest_first: bool| match (a.published_at(), b.published_at()) {
        (Some(x), Some(y)) if newest_first => y.cmp(&x),
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };

    match order {
        SortOrder::Relevance => {}
        SortOrder::Newest => items.sort_by(|a, b| by_date(a, b, true)),
        SortOrder::Oldest => items.sort_by(|a, b| by_date(a, b, false)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Tag;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    fn item(slug: &str, tags: &[Tag], difficulty: Difficulty, year: Option<i32>) -> CurriculumItem {
        CurriculumItem {
            slug: slug.into(),
            title: format!("Learn {slug}"),
            description: format!("All about {slug}"),
            tags: tags.to_vec(),
            difficulty: Some(difficulty),
            published_at: year.map(|y| Utc.with_ymd_and_hms(y, 1, 1, 0, 0, 0).unwrap()),
            url: None,
        }
    }

    #[fixture]
    fn items() -> Vec<CurriculumItem> {
        vec![
            item("mining", &[Tag::Guide], Difficulty::Easy, Some(2021)),
            item("taproot", &[Tag::Course, Tag::Video], Difficulty::Hard, Some(2023)),
            item("lightning", &[Tag::Book, Tag::Guide], Difficulty::Medium, None),
            item("script", &[Tag::Article], Difficulty::Hard, Some(2019)),
        ]
    }

    fn slugs(items: &[CurriculumItem]) -> Vec<&str> {
        items.iter().map(|i| i.slug.as_str()).collect()
    }

    #[rstest]
    fn given_empty_criteria_when_filtering_then_returns_all_in_order(items: Vec<CurriculumItem>) {
        let result = filter(&items, &FilterCriteria::default());
        assert_eq!(result, items);
    }

    #[rstest]
    fn given_tag_when_filtering_then_returns_intersecting_subset(items: Vec<CurriculumItem>) {
        let criteria = FilterCriteria {
            tags: ["GUIDE".to_string()].into(),
            ..Default::default()
        };

        let result = filter(&items, &criteria);

        assert_eq!(slugs(&result), vec!["mining", "lightning"]);
    }

    #[rstest]
    fn given_several_tags_when_filtering_then_uses_or_within_facet(items: Vec<CurriculumItem>) {
        let criteria = FilterCriteria {
            tags: ["video".to_string(), "article".to_string()].into(),
            ..Default::default()
        };

        let result = filter(&items, &criteria);

        assert_eq!(slugs(&result), vec!["taproot", "script"]);
    }

    #[rstest]
    #[case("TAPROOT", vec!["taproot"])]
    #[case("all about", vec!["mining", "taproot", "lightning", "script"])]
    #[case("   ", vec!["mining", "taproot", "lightning", "script"])]
    #[case("fiat", vec![])]
    fn given_search_term_when_filtering_then_matches_title_or_description(
        items: Vec<CurriculumItem>,
        #[case] search: &str,
        #[case] expected: Vec<&str>,
    ) {
        let criteria = FilterCriteria {
            search: Some(search.into()),
            ..Default::default()
        };

        let result = filter(&items, &criteria);

        assert_eq!(slugs(&result), expected);
    }

    #[rstest]
    fn given_facets_when_filtering_then_combines_with_and(items: Vec<CurriculumItem>) {
        let criteria = FilterCriteria {
            tags: ["course".to_string(), "article".to_string()].into(),
            difficulty: Some("hard".into()),
            search: Some("script".into()),
            ..Default::default()
        };

        let result = filter(&items, &criteria);

        assert_eq!(slugs(&result), vec!["script"]);
    }

    #[rstest]
    #[case(Some("legendary"), None)]
    #[case(None, Some("newsletter"))]
    fn given_unrecognized_value_when_filtering_then_matches_nothing(
        items: Vec<CurriculumItem>,
        #[case] difficulty: Option<&str>,
        #[case] tag: Option<&str>,
    ) {
        let criteria = FilterCriteria {
            difficulty: difficulty.map(String::from),
            tags: tag.map(String::from).into_iter().collect(),
            ..Default::default()
        };

        assert!(filter(&items, &criteria).is_empty());
    }

    #[rstest]
    #[case(SortOrder::Newest, vec!["taproot", "mining", "script", "lightning"])]
    #[case(SortOrder::Oldest, vec!["script", "mining", "taproot", "lightning"])]
    #[case(SortOrder::Relevance, vec!["mining", "taproot", "lightning", "script"])]
    fn given_sort_order_when_filtering_then_sorts_by_date_with_undated_last(
        items: Vec<CurriculumItem>,
        #[case] sort: SortOrder,
        #[case] expected: Vec<&str>,
    ) {
        let criteria = FilterCriteria {
            sort,
            ..Default::default()
        };

        assert_eq!(slugs(&filter(&items, &criteria)), expected);
    }

    #[rstest]
    fn given_equal_dates_when_sorting_then_keeps_input_order() {
        let same = vec![
            item("first", &[], Difficulty::Easy, Some(2020)),
            item("second", &[], Difficulty::Easy, Some(2020)),
            item("third", &[], Difficulty::Easy, Some(2020)),
        ];
        let criteria = FilterCriteria {
            sort: SortOrder::Newest,
            ..Default::default()
        };

        assert_eq!(slugs(&filter(&same, &criteria)), vec!["first", "second", "third"]);
    }

    #[rstest]
    fn given_any_criteria_when_filtering_twice_then_result_is_unchanged(items: Vec<CurriculumItem>) {
        let criteria = FilterCriteria {
            tags: ["guide".to_string(), "course".to_string()].into(),
            sort: SortOrder::Newest,
            ..Default::default()
        };

        let once = filter(&items, &criteria);
        let twice = filter(&once, &criteria);

        assert_eq!(once, twice);
    }

    #[test]
    fn given_issue_language_when_filtering_then_matches_case_insensitively() {
        let issue = |id: &str, lang: Option<&str>| Issue {
            id: id.into(),
            title: format!("issue {id}"),
            description: String::new(),
            repository: "bitcoin/bitcoin".into(),
            labels: vec!["good first issue".into()],
            language: lang.map(String::from),
            difficulty: None,
            created_at: None,
            url: None,
        };
        let issues = vec![issue("1", Some("C++")), issue("2", Some("Rust")), issue("3", None)];
        let criteria = FilterCriteria {
            language: Some("rust".into()),
            tags: ["Good First Issue".to_string()].into(),
            ..Default::default()
        };

        let result = filter(&issues, &criteria);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "2");
    }

    #[rstest]
    #[case("newest", SortOrder::Newest)]
    #[case("ASC", SortOrder::Oldest)]
    #[case("relevance", SortOrder::Relevance)]
    fn given_sort_name_when_parsing_then_resolves(#[case] input: &str, #[case] expected: SortOrder) {
        assert_eq!(input.parse::<SortOrder>().unwrap(), expected);
    }

    #[test]
    fn given_query_with_mixed_case_sort_when_deserializing_then_uses_parser() {
        let criteria: FilterCriteria =
            serde_json::from_str(r#"{"tags":["guide"],"sort":"Newest"}"#).unwrap();

        assert_eq!(criteria.sort, SortOrder::Newest);
        assert_eq!(serde_json::to_value(criteria.sort).unwrap(), "newest");
    }
}
