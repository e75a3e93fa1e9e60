use super::VacancyItem;
use std::collections::BTreeSet;

/// Criteria the feed is narrowed by
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FeedFilter {
    /// Case-insensitive substring, empty means no search
    pub search: String,
    /// An item passes if it carries at least one of these
    pub tags: BTreeSet<String>,
    /// Exact, case-sensitive city match
    pub city: Option<String>,
}

impl FeedFilter {
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.tags.is_empty() && self.city_criterion().is_none()
    }

    /// Adds the tag if absent, removes it otherwise
    pub fn toggle_tag(&mut self, tag: &str) {
        if !self.tags.remove(tag) {
            self.tags.insert(tag.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.search.clear();
        self.tags.clear();
        self.city = None;
    }

    fn city_criterion(&self) -> Option<&str> {
        self.city.as_deref().filter(|c| !c.is_empty())
    }

    fn matches(&self, item: &VacancyItem, needle: &str) -> bool {
        if !item.is_published() {
            return false;
        }

        if !needle.is_empty()
            && !item
                .searchable_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(needle))
        {
            return false;
        }

        if !self.tags.is_empty() && !item.has_any_tag(&self.tags) {
            return false;
        }

        match self.city_criterion() {
            Some(city) => item.city == city,
            None => true,
        }
    }
}

/// Derives the visible feed: published items passing every criterion,
/// ordered by employer tier with ties kept in source order.
pub fn filter_and_sort(raw: &[VacancyItem], filter: &FeedFilter) -> Vec<VacancyItem> {
    let needle = filter.search.to_lowercase();

    let mut items: Vec<VacancyItem> = raw
        .iter()
        .filter(|item| filter.matches(item, &needle))
        .cloned()
        .collect();

    // sort_by is stable
    items.sort_by(|a, b| b.employer_tier.rank().cmp(&a.employer_tier.rank()));
    items
}

/// Memoized output of [`filter_and_sort`].
///
/// The result is keyed on the source revision and the filter. Every recompute
/// produces a new list identity, exposed as [`FeedView::generation`], which the
/// swipe controller uses to know when its index went stale.
#[derive(Debug, Default)]
pub struct FeedView {
    key: Option<(u64, FeedFilter)>,
    items: Vec<VacancyItem>,
    generation: u64,
}

impl FeedView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes when `revision` or `filter` differ from the last call.
    /// Returns whether a recompute happened.
    pub fn refresh(&mut self, revision: u64, raw: &[VacancyItem], filter: &FeedFilter) -> bool {
        if let Some((last_revision, last_filter)) = &self.key {
            if *last_revision == revision && last_filter == filter {
                return false;
            }
        }

        self.items = filter_and_sort(raw, filter);
        self.key = Some((revision, filter.clone()));
        self.generation += 1;
        tracing::debug!(
            generation = self.generation,
            visible = self.items.len(),
            "feed recomputed"
        );
        true
    }

    pub fn items(&self) -> &[VacancyItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&VacancyItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::{published, vacancy};
    use crate::domain::{EmployerTier, VacancyStatus};

    fn ids(items: &[VacancyItem]) -> Vec<&str> {
        items.iter().map(|v| v.id.as_str()).collect()
    }

    mod filter_tests {
        use super::*;

        #[test]
        fn test_status_and_tier_order() {
            let raw = vec![
                published("A", EmployerTier::Econom),
                published("B", EmployerTier::Premium),
                vacancy("C", EmployerTier::Vip, VacancyStatus::Pending),
            ];

            let result = filter_and_sort(&raw, &FeedFilter::default());
            assert_eq!(ids(&result), vec!["B", "A"]);
        }

        #[test]
        fn test_rejected_items_excluded() {
            let raw = vec![
                vacancy("A", EmployerTier::Premium, VacancyStatus::Rejected),
                published("B", EmployerTier::Free),
            ];
            let result = filter_and_sort(&raw, &FeedFilter::default());
            assert_eq!(ids(&result), vec!["B"]);
        }

        #[test]
        fn test_stable_for_equal_tiers() {
            let raw = vec![
                published("v1", EmployerTier::Vip),
                published("e1", EmployerTier::Econom),
                published("v2", EmployerTier::Vip),
                published("p1", EmployerTier::Premium),
                published("e2", EmployerTier::Econom),
                published("v3", EmployerTier::Vip),
            ];

            let result = filter_and_sort(&raw, &FeedFilter::default());
            assert_eq!(ids(&result), vec!["p1", "v1", "v2", "v3", "e1", "e2"]);
        }

        #[test]
        fn test_free_tier_sorts_last() {
            let raw = vec![
                published("f", EmployerTier::Free),
                published("e", EmployerTier::Econom),
            ];
            let result = filter_and_sort(&raw, &FeedFilter::default());
            assert_eq!(ids(&result), vec!["e", "f"]);
        }

        #[test]
        fn test_search_is_case_insensitive_across_fields() {
            let mut courier = published("1", EmployerTier::Econom);
            courier.title = "Courier".to_string();
            let mut loader = published("2", EmployerTier::Econom);
            loader.title = "Warehouse loader".to_string();
            loader.responsibilities = Some("Unloading TRUCKS".to_string());
            let mut cashier = published("3", EmployerTier::Econom);
            cashier.title = "Cashier".to_string();
            cashier.schedule = Some("Shift work, trucks nearby".to_string());

            let raw = vec![courier, loader, cashier];

            let filter = FeedFilter {
                search: "TrUcK".to_string(),
                ..Default::default()
            };
            assert_eq!(ids(&filter_and_sort(&raw, &filter)), vec!["2", "3"]);

            let filter = FeedFilter {
                search: "courier".to_string(),
                ..Default::default()
            };
            assert_eq!(ids(&filter_and_sort(&raw, &filter)), vec!["1"]);
        }

        #[test]
        fn test_search_ignores_non_text_fields() {
            let mut item = published("1", EmployerTier::Econom);
            item.city = "Kirov".to_string();
            let filter = FeedFilter {
                search: "kirov".to_string(),
                ..Default::default()
            };
            assert!(filter_and_sort(&[item], &filter).is_empty());
        }

        #[test]
        fn test_tags_require_intersection_not_superset() {
            let mut a = published("a", EmployerTier::Econom);
            a.tags = vec!["Part-time".to_string()];
            let mut b = published("b", EmployerTier::Econom);
            b.tags = vec!["Daily pay".to_string(), "For students".to_string()];
            let c = published("c", EmployerTier::Econom);

            let mut filter = FeedFilter::default();
            filter.toggle_tag("Part-time");
            filter.toggle_tag("For students");

            let result = filter_and_sort(&[a, b, c], &filter);
            assert_eq!(ids(&result), vec!["a", "b"]);
        }

        #[test]
        fn test_city_is_exact_and_case_sensitive() {
            let mut a = published("a", EmployerTier::Econom);
            a.city = "Moscow".to_string();
            let mut b = published("b", EmployerTier::Econom);
            b.city = "moscow".to_string();
            let mut c = published("c", EmployerTier::Econom);
            c.city = "Moscow Oblast".to_string();

            let filter = FeedFilter {
                city: Some("Moscow".to_string()),
                ..Default::default()
            };
            assert_eq!(ids(&filter_and_sort(&[a, b, c], &filter)), vec!["a"]);
        }

        #[test]
        fn test_empty_city_means_unset() {
            let item = published("a", EmployerTier::Econom);
            let filter = FeedFilter {
                city: Some(String::new()),
                ..Default::default()
            };
            assert!(filter.is_empty());
            assert_eq!(filter_and_sort(&[item], &filter).len(), 1);
        }

        #[test]
        fn test_empty_input() {
            let filter = FeedFilter {
                search: "anything".to_string(),
                ..Default::default()
            };
            assert!(filter_and_sort(&[], &filter).is_empty());
        }

        #[test]
        fn test_idempotent() {
            let raw = vec![
                published("1", EmployerTier::Vip),
                published("2", EmployerTier::Premium),
                published("3", EmployerTier::Vip),
            ];
            let filter = FeedFilter::default();

            let first = filter_and_sort(&raw, &filter);
            let second = filter_and_sort(&raw, &filter);
            assert_eq!(first, second);

            let again = filter_and_sort(&first, &filter);
            assert_eq!(first, again);
        }

        #[test]
        fn test_toggle_and_clear() {
            let mut filter = FeedFilter::default();
            filter.toggle_tag("Rotational");
            assert!(filter.tags.contains("Rotational"));
            filter.toggle_tag("Rotational");
            assert!(filter.tags.is_empty());

            filter.search = "x".to_string();
            filter.city = Some("Kirov".to_string());
            filter.toggle_tag("Part-time");
            filter.clear();
            assert!(filter.is_empty());
        }
    }

    mod feed_view_tests {
        use super::*;

        #[test]
        fn test_first_refresh_computes() {
            let raw = vec![published("1", EmployerTier::Vip)];
            let mut view = FeedView::new();
            assert_eq!(view.generation(), 0);

            assert!(view.refresh(1, &raw, &FeedFilter::default()));
            assert_eq!(view.generation(), 1);
            assert_eq!(view.len(), 1);
        }

        #[test]
        fn test_unchanged_inputs_are_memoized() {
            let raw = vec![published("1", EmployerTier::Vip)];
            let filter = FeedFilter::default();
            let mut view = FeedView::new();
            view.refresh(1, &raw, &filter);

            for _ in 0..100 {
                assert!(!view.refresh(1, &raw, &filter));
            }
            assert_eq!(view.generation(), 1);
        }

        #[test]
        fn test_filter_change_bumps_generation() {
            let raw = vec![
                published("1", EmployerTier::Vip),
                published("2", EmployerTier::Vip),
            ];
            let mut view = FeedView::new();
            view.refresh(1, &raw, &FeedFilter::default());

            let filter = FeedFilter {
                search: "Vacancy 2".to_string(),
                ..Default::default()
            };
            assert!(view.refresh(1, &raw, &filter));
            assert_eq!(view.generation(), 2);
            assert_eq!(ids(view.items()), vec!["2"]);
        }

        #[test]
        fn test_revision_change_bumps_generation() {
            let raw = vec![published("1", EmployerTier::Vip)];
            let filter = FeedFilter::default();
            let mut view = FeedView::new();
            view.refresh(1, &raw, &filter);

            assert!(view.refresh(2, &raw, &filter));
            assert_eq!(view.generation(), 2);
        }

        #[test]
        fn test_get_out_of_range() {
            let mut view = FeedView::new();
            view.refresh(0, &[], &FeedFilter::default());
            assert!(view.is_empty());
            assert!(view.get(0).is_none());
        }
    }
}
