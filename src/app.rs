//! Application state driven by the event loop
//!
//! Owns the vacancy source, the memoized feed, the swipe controller and the
//! active filter, and keeps them consistent: every change to the source or the
//! filter is followed by a resync so the controller never points past the
//! list it was given.

use crate::domain::{FeedFilter, FeedView, SwipeController, SwipeOutcome, VacancyItem, TAG_CATALOG};
use crate::refresh::{RefreshStatus, SyncRefreshManager};
use crate::source::VacancySource;
use crate::tui::{FeedFrame, GestureAction, KeyAction, SearchAction, ViewState};
use std::collections::BTreeSet;

/// What the event loop should do after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Continue,
    Quit,
    /// The city filter changed and should be remembered
    CityChanged(Option<String>),
}

pub struct App {
    source: Box<dyn VacancySource>,
    view: FeedView,
    controller: SwipeController,
    filter: FeedFilter,
    refresh: Option<SyncRefreshManager>,
    pub view_state: ViewState,
}

impl App {
    pub fn new(
        source: Box<dyn VacancySource>,
        filter: FeedFilter,
        controller: SwipeController,
    ) -> Self {
        let mut app = Self {
            source,
            view: FeedView::new(),
            controller,
            filter,
            refresh: None,
            view_state: ViewState::Browsing,
        };
        app.sync();
        app
    }

    pub fn with_refresh(mut self, manager: SyncRefreshManager) -> Self {
        self.refresh = Some(manager);
        self
    }

    /// Re-derives the feed if its inputs changed and lines the cursor up with it
    pub fn sync(&mut self) {
        self.view
            .refresh(self.source.revision(), self.source.list(), &self.filter);
        self.controller.sync(self.view.generation(), self.view.len());
    }

    pub fn current(&self) -> Option<&VacancyItem> {
        self.controller
            .active_index()
            .and_then(|index| self.view.get(index))
    }

    pub fn feed(&self) -> &FeedView {
        &self.view
    }

    pub fn controller(&self) -> &SwipeController {
        &self.controller
    }

    pub fn filter(&self) -> &FeedFilter {
        &self.filter
    }

    pub fn source(&self) -> &dyn VacancySource {
        self.source.as_ref()
    }

    pub fn refresh_status(&self) -> Option<&RefreshStatus> {
        self.refresh.as_ref().map(|m| m.status())
    }

    /// Snapshot for the renderer
    pub fn frame(&self) -> FeedFrame<'_> {
        FeedFrame {
            items: self.view.items(),
            cursor: self.controller.cursor(),
            threshold: self.controller.threshold(),
            policy: self.controller.policy(),
            filter: &self.filter,
            searching: self.view_state == ViewState::Search,
            refresh: self.refresh_status(),
        }
    }

    pub fn handle_action(&mut self, action: KeyAction) -> AppEvent {
        match action {
            KeyAction::Quit => return AppEvent::Quit,
            KeyAction::Next => {
                self.controller.advance();
            }
            KeyAction::Previous => {
                self.controller.retreat();
            }
            KeyAction::Search => self.view_state = ViewState::Search,
            KeyAction::ToggleTag(i) => {
                if let Some(tag) = TAG_CATALOG.get(i) {
                    self.filter.toggle_tag(tag);
                    self.sync();
                }
            }
            KeyAction::CycleCity => return AppEvent::CityChanged(self.cycle_city()),
            KeyAction::ClearFilters => {
                let had_city = self.filter.city.is_some();
                self.filter.clear();
                self.sync();
                if had_city {
                    return AppEvent::CityChanged(None);
                }
            }
            KeyAction::Refresh => self.request_refresh(),
            KeyAction::Help => self.view_state = ViewState::Help,
            KeyAction::None => {}
        }
        AppEvent::Continue
    }

    pub fn handle_search(&mut self, action: SearchAction) {
        match action {
            SearchAction::Insert(c) => {
                self.filter.search.push(c);
                self.sync();
            }
            SearchAction::Backspace => {
                if self.filter.search.pop().is_some() {
                    self.sync();
                }
            }
            SearchAction::Done => self.view_state = ViewState::Browsing,
            SearchAction::None => {}
        }
    }

    pub fn handle_gesture(&mut self, action: GestureAction) -> SwipeOutcome {
        match action {
            GestureAction::Start(y) => {
                self.controller.gesture_start(y);
                SwipeOutcome::Ignored
            }
            GestureAction::Move(y) => {
                self.controller.gesture_move(y);
                SwipeOutcome::Ignored
            }
            GestureAction::End => self.controller.gesture_end(),
            GestureAction::None => SwipeOutcome::Ignored,
        }
    }

    /// Distinct cities of the raw list, alphabetically
    pub fn cities(&self) -> Vec<String> {
        self.source
            .list()
            .iter()
            .filter(|v| !v.city.is_empty())
            .map(|v| v.city.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Steps the city filter through every known city and then back to all
    pub fn cycle_city(&mut self) -> Option<String> {
        let cities = self.cities();
        let next = match self.filter.city.as_deref() {
            None => cities.first().cloned(),
            Some(current) => match cities.iter().position(|c| c == current) {
                Some(p) => cities.get(p + 1).cloned(),
                None => cities.first().cloned(),
            },
        };
        self.filter.city = next.clone();
        self.sync();
        next
    }

    pub fn request_refresh(&mut self) {
        match self.refresh.as_mut() {
            Some(manager) => manager.request_refresh(),
            None => tracing::debug!("refresh requested while offline"),
        }
    }

    /// Merges finished refreshes into the source
    pub fn poll_refresh(&mut self) {
        let Some(manager) = self.refresh.as_mut() else {
            return;
        };
        let batches = manager.poll();
        if batches.is_empty() {
            return;
        }
        for batch in batches {
            if let Err(e) = batch.apply(self.source.as_mut()) {
                tracing::warn!(error = %e, "could not merge refreshed vacancies");
            }
        }
        self.sync();
    }

    pub fn shutdown(&self) {
        if let Some(manager) = &self.refresh {
            manager.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::published;
    use crate::domain::{EmployerTier, Provenance, WrapPolicy};
    use crate::refresh::{FeedBatch, VacancyFeed};
    use crate::source::MemorySource;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    fn in_city(id: &str, tier: EmployerTier, city: &str) -> VacancyItem {
        let mut item = published(id, tier);
        item.city = city.to_string();
        item
    }

    fn sample_app() -> App {
        let source = MemorySource::new(vec![
            in_city("a", EmployerTier::Econom, "Moscow"),
            in_city("b", EmployerTier::Premium, "Kirov"),
            in_city("c", EmployerTier::Vip, "Moscow"),
        ]);
        App::new(
            Box::new(source),
            FeedFilter::default(),
            SwipeController::new(WrapPolicy::Wrap),
        )
    }

    fn current_id(app: &App) -> Option<&str> {
        app.current().map(|v| v.id.as_str())
    }

    mod navigation_tests {
        use super::*;

        #[test]
        fn test_starts_on_highest_tier() {
            let app = sample_app();
            assert_eq!(current_id(&app), Some("b"));
            assert_eq!(app.feed().len(), 3);
        }

        #[test]
        fn test_keyboard_navigation_wraps() {
            let mut app = sample_app();
            app.handle_action(KeyAction::Next);
            assert_eq!(current_id(&app), Some("c"));
            app.handle_action(KeyAction::Next);
            app.handle_action(KeyAction::Next);
            assert_eq!(current_id(&app), Some("b"));
            app.handle_action(KeyAction::Previous);
            assert_eq!(current_id(&app), Some("a"));
        }

        #[test]
        fn test_mouse_drag_commits_past_threshold() {
            let mut app = sample_app();
            app.handle_gesture(GestureAction::Start(320.0));
            app.handle_gesture(GestureAction::Move(200.0));
            assert_eq!(app.frame().cursor.live_offset, -120.0);

            let outcome = app.handle_gesture(GestureAction::End);
            assert_eq!(outcome, SwipeOutcome::Advanced);
            assert_eq!(current_id(&app), Some("c"));
            assert_eq!(app.frame().cursor.live_offset, 0.0);
        }

        #[test]
        fn test_short_drag_snaps_back() {
            let mut app = sample_app();
            app.handle_gesture(GestureAction::Start(320.0));
            app.handle_gesture(GestureAction::Move(288.0));
            assert_eq!(app.handle_gesture(GestureAction::End), SwipeOutcome::SnappedBack);
            assert_eq!(current_id(&app), Some("b"));
        }

        #[test]
        fn test_quit() {
            let mut app = sample_app();
            assert_eq!(app.handle_action(KeyAction::Quit), AppEvent::Quit);
        }
    }

    mod filter_tests {
        use super::*;

        #[test]
        fn test_search_resets_cursor() {
            let mut app = sample_app();
            app.handle_action(KeyAction::Next);
            assert_eq!(current_id(&app), Some("c"));

            app.handle_action(KeyAction::Search);
            assert_eq!(app.view_state, ViewState::Search);
            assert!(app.frame().searching);

            for c in "vacancy".chars() {
                app.handle_search(SearchAction::Insert(c));
            }
            assert_eq!(app.controller().active_index(), Some(0));
            assert_eq!(current_id(&app), Some("b"));

            app.handle_search(SearchAction::Insert('x'));
            assert!(app.current().is_none());

            app.handle_search(SearchAction::Backspace);
            assert_eq!(app.feed().len(), 3);

            app.handle_search(SearchAction::Done);
            assert_eq!(app.view_state, ViewState::Browsing);
            assert_eq!(app.filter().search, "vacancy");
        }

        #[test]
        fn test_toggle_tag() {
            let mut tagged = in_city("t", EmployerTier::Free, "Kirov");
            tagged.tags = vec![TAG_CATALOG[1].to_string()];
            let source = MemorySource::new(vec![in_city("a", EmployerTier::Vip, "Kirov"), tagged]);
            let mut app = App::new(
                Box::new(source),
                FeedFilter::default(),
                SwipeController::default(),
            );

            app.handle_action(KeyAction::ToggleTag(1));
            assert_eq!(current_id(&app), Some("t"));
            assert_eq!(app.feed().len(), 1);

            app.handle_action(KeyAction::ToggleTag(1));
            assert_eq!(app.feed().len(), 2);

            // Out of catalog range is ignored
            app.handle_action(KeyAction::ToggleTag(9));
            assert_eq!(app.feed().len(), 2);
        }

        #[test]
        fn test_cycle_city() {
            let mut app = sample_app();
            assert_eq!(app.cities(), vec!["Kirov", "Moscow"]);

            assert_eq!(
                app.handle_action(KeyAction::CycleCity),
                AppEvent::CityChanged(Some("Kirov".to_string()))
            );
            assert_eq!(app.feed().len(), 1);

            assert_eq!(app.cycle_city(), Some("Moscow".to_string()));
            assert_eq!(app.feed().len(), 2);

            assert_eq!(app.cycle_city(), None);
            assert_eq!(app.feed().len(), 3);
        }

        #[test]
        fn test_unknown_saved_city_cycles_to_first() {
            let mut app = sample_app();
            app.filter.city = Some("Atlantis".to_string());
            app.sync();
            assert!(app.current().is_none());

            assert_eq!(app.cycle_city(), Some("Kirov".to_string()));
        }

        #[test]
        fn test_clear_filters() {
            let mut app = sample_app();
            app.cycle_city();
            app.handle_action(KeyAction::ToggleTag(0));
            assert!(app.current().is_none());

            assert_eq!(
                app.handle_action(KeyAction::ClearFilters),
                AppEvent::CityChanged(None)
            );
            assert!(app.filter().is_empty());
            assert_eq!(app.feed().len(), 3);

            assert_eq!(app.handle_action(KeyAction::ClearFilters), AppEvent::Continue);
        }
    }

    mod refresh_tests {
        use super::*;
        use crate::refresh::SyncRefreshManager;

        struct FixedFeed(FeedBatch);

        #[async_trait]
        impl VacancyFeed for FixedFeed {
            fn name(&self) -> &str {
                "fixed"
            }

            async fn fetch(&self) -> crate::error::Result<FeedBatch> {
                Ok(self.0.clone())
            }
        }

        #[test]
        fn test_offline_refresh_is_noop() {
            let mut app = sample_app();
            app.handle_action(KeyAction::Refresh);
            app.poll_refresh();
            assert!(app.refresh_status().is_none());
            assert_eq!(app.feed().len(), 3);
        }

        #[test]
        fn test_refresh_merges_and_resets_cursor() {
            let mut remote = in_city("x", EmployerTier::Free, "Kirov");
            remote.source = Provenance::ExternalFeed;
            let feeds: Vec<Arc<dyn VacancyFeed>> = vec![Arc::new(FixedFeed(FeedBatch::new(
                Provenance::ExternalFeed,
                vec![remote],
            )))];
            let manager = SyncRefreshManager::new(feeds).unwrap();
            let mut app = sample_app().with_refresh(manager);

            app.handle_action(KeyAction::Next);
            assert_eq!(app.controller().active_index(), Some(1));

            app.handle_action(KeyAction::Refresh);
            for _ in 0..40 {
                app.poll_refresh();
                if app.feed().len() == 4 {
                    break;
                }
                std::thread::sleep(Duration::from_millis(25));
            }

            assert_eq!(app.feed().len(), 4);
            assert_eq!(app.controller().active_index(), Some(0));
            assert_eq!(app.refresh_status(), Some(&RefreshStatus::Idle));
            app.shutdown();
        }
    }
}
