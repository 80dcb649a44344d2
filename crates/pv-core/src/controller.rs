//! Gallery controller: the single source of truth for the presentation
//!
//! Holds the session [`ViewState`] behind a lock, feeds intents through
//! [`ViewState::apply`], publishes events and notifies render subscribers
//! with a fresh [`ViewSnapshot`] after every accepted transition.

use std::num::NonZeroUsize;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::data::PhotoSource;
use crate::events::{events, EventBus};
use crate::item::{Item, ItemId};
use crate::navigation::PageDirection;
use crate::pipeline::{find_by_id, item_stats, ItemStats, PageResult};
use crate::state::{Intent, LoadState, ViewState};

/// Identifies the load currently in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(Uuid);

/// What a render pass needs
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSnapshot {
    pub load_state: LoadState,
    pub search_query: String,
    pub page: PageResult,
}

/// Trait for components that re-render on view changes
pub trait ViewSubscriber: Send + Sync {
    /// Called after every accepted transition
    fn on_view_change(&self, snapshot: &ViewSnapshot);
}

/// Session state guarded as one unit so a ticket and the state it
/// belongs to never diverge
struct Session {
    view: ViewState,
    pending: Option<LoadTicket>,
}

/// The main gallery controller
pub struct GalleryController {
    session: Arc<RwLock<Session>>,
    subscribers: Arc<RwLock<Vec<Weak<dyn ViewSubscriber>>>>,
    event_bus: Arc<EventBus>,
}

impl GalleryController {
    /// Create a controller with its own event bus
    pub fn new(per_page: NonZeroUsize) -> Self {
        Self::with_event_bus(per_page, Arc::new(EventBus::new()))
    }

    /// Create a controller publishing on a shared event bus
    pub fn with_event_bus(per_page: NonZeroUsize, event_bus: Arc<EventBus>) -> Self {
        Self {
            session: Arc::new(RwLock::new(Session {
                view: ViewState::new(per_page),
                pending: None,
            })),
            subscribers: Arc::new(RwLock::new(Vec::new())),
            event_bus,
        }
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    /// Fetch from `source` and apply the result
    ///
    /// Returns `None` without touching the source when another load is
    /// already pending.
    pub async fn load(&self, source: &dyn PhotoSource) -> Option<LoadState> {
        let ticket = self.begin_load()?;

        info!("Loading photos from {}", source.source_name());
        let result = source.fetch().await;
        self.finish_load(ticket, source.source_name(), result);

        Some(self.load_state())
    }

    /// Enter the loading state
    ///
    /// Returns `None` if a load is already in flight; the caller must then
    /// not start another fetch.
    pub fn begin_load(&self) -> Option<LoadTicket> {
        let mut session = self.session.write();
        let Some(view) = session.view.apply(Intent::LoadStarted) else {
            debug!("Load already pending, ignoring trigger");
            return None;
        };

        let ticket = LoadTicket(Uuid::new_v4());
        session.view = view;
        session.pending = Some(ticket);
        drop(session);

        self.notify_subscribers();
        Some(ticket)
    }

    /// Apply the outcome of the load identified by `ticket`
    ///
    /// Results for any other ticket are discarded. Returns whether the
    /// result was applied.
    pub fn finish_load(
        &self,
        ticket: LoadTicket,
        source_name: &str,
        result: anyhow::Result<Vec<Item>>,
    ) -> bool {
        let mut session = self.session.write();
        if session.pending != Some(ticket) {
            warn!("Discarding stale load result from {}", source_name);
            return false;
        }
        session.pending = None;

        match result {
            Ok(items) => {
                let item_count = items.len();
                if let Some(view) = session.view.apply(Intent::LoadSucceeded(items)) {
                    session.view = view;
                }
                drop(session);

                info!("Loaded {} photos from {}", item_count, source_name);
                self.event_bus.publish(events::PhotosLoaded {
                    source_name: source_name.to_string(),
                    item_count,
                    loaded_at: chrono::Utc::now(),
                });
            }
            Err(err) => {
                if let Some(view) = session.view.apply(Intent::LoadFailed) {
                    session.view = view;
                }
                drop(session);

                error!("Failed to load photos from {}: {:#}", source_name, err);
                self.event_bus.publish(events::PhotosLoadFailed {
                    source_name: source_name.to_string(),
                    error: format!("{:#}", err),
                });
            }
        }

        self.notify_subscribers();
        true
    }

    /// Update the search query
    ///
    /// Returns the new page when the query actually changed.
    pub fn on_query_changed(&self, query: &str) -> Option<PageResult> {
        let view = self.dispatch(Intent::QueryChanged(query.to_string()))?;
        let result = view.page_result();
        self.event_bus.publish(events::QueryChanged {
            query: view.search_query().to_string(),
            matches: result.total_items,
        });
        Some(result)
    }

    /// Move one page in `direction`
    ///
    /// Returns `None` when already at that boundary.
    pub fn on_page_requested(&self, direction: PageDirection) -> Option<PageResult> {
        let result = self.dispatch(Intent::PageRequested(direction))?.page_result();
        self.event_bus.publish(events::PageChanged {
            page: result.page,
            total_pages: result.total_pages,
        });
        Some(result)
    }

    /// Look up an item for the detail view; `None` is a no-op for callers
    pub fn on_item_selected(&self, id: ItemId) -> Option<Item> {
        let session = self.session.read();
        let item = find_by_id(session.view.all_items(), id).cloned();
        if item.is_none() {
            debug!("No photo with id {}", id);
        }
        item
    }

    pub fn current_page_result(&self) -> PageResult {
        self.session.read().view.page_result()
    }

    pub fn load_state(&self) -> LoadState {
        self.session.read().view.load_state().clone()
    }

    pub fn search_query(&self) -> String {
        self.session.read().view.search_query().to_string()
    }

    /// Album statistics over all loaded items
    pub fn stats(&self) -> ItemStats {
        item_stats(self.session.read().view.all_items())
    }

    /// Current state as one consistent snapshot
    pub fn snapshot(&self) -> ViewSnapshot {
        let session = self.session.read();
        ViewSnapshot {
            load_state: session.view.load_state().clone(),
            search_query: session.view.search_query().to_string(),
            page: session.view.page_result(),
        }
    }

    /// Add a subscriber
    pub fn subscribe(&self, subscriber: Arc<dyn ViewSubscriber>) {
        self.subscribers.write().push(Arc::downgrade(&subscriber));
    }

    /// Apply `intent` and return the state it produced, as of this transition
    fn dispatch(&self, intent: Intent) -> Option<ViewState> {
        let mut session = self.session.write();
        let Some(view) = session.view.apply(intent.clone()) else {
            debug!("Ignoring {:?}", intent);
            return None;
        };
        session.view = view.clone();
        drop(session);

        self.notify_subscribers();
        Some(view)
    }

    /// Notify all subscribers of a view change
    ///
    /// Callbacks run after the subscriber list lock is released, so a
    /// subscriber may subscribe others or read the controller.
    fn notify_subscribers(&self) {
        let snapshot = self.snapshot();
        let live: Vec<Arc<dyn ViewSubscriber>> = {
            let mut subscribers = self.subscribers.write();

            // Remove any dead weak references
            subscribers.retain(|weak| weak.strong_count() > 0);
            subscribers.iter().filter_map(|weak| weak.upgrade()).collect()
        };

        for subscriber in live {
            subscriber.on_view_change(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::handler_from_fn;
    use crate::state::LOAD_FAILURE_MESSAGE;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct StaticSource {
        items: Vec<Item>,
        fetches: AtomicUsize,
        delay: Option<Duration>,
    }

    impl StaticSource {
        fn new(count: u64) -> Self {
            Self {
                items: (1..=count)
                    .map(|id| Item::new(id, format!("photo {}", id), "t", "u", id % 3 + 1))
                    .collect(),
                fetches: AtomicUsize::new(0),
                delay: None,
            }
        }

        fn slow(count: u64) -> Self {
            Self {
                delay: Some(Duration::from_millis(20)),
                ..Self::new(count)
            }
        }
    }

    #[async_trait::async_trait]
    impl PhotoSource for StaticSource {
        async fn fetch(&self) -> anyhow::Result<Vec<Item>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            Ok(self.items.clone())
        }

        fn source_name(&self) -> &str {
            "static"
        }
    }

    struct FailingSource;

    #[async_trait::async_trait]
    impl PhotoSource for FailingSource {
        async fn fetch(&self) -> anyhow::Result<Vec<Item>> {
            Err(anyhow::anyhow!("HTTP 503"))
        }

        fn source_name(&self) -> &str {
            "failing"
        }
    }

    #[derive(Default)]
    struct Recorder {
        snapshots: Mutex<Vec<ViewSnapshot>>,
    }

    impl ViewSubscriber for Recorder {
        fn on_view_change(&self, snapshot: &ViewSnapshot) {
            self.snapshots.lock().push(snapshot.clone());
        }
    }

    fn controller() -> GalleryController {
        GalleryController::new(NonZeroUsize::new(12).unwrap())
    }

    /// Subscribes a [`Recorder`] the first time it is notified
    struct Recruiter {
        controller: Arc<GalleryController>,
        recruit: Arc<Recorder>,
        calls: AtomicUsize,
    }

    impl ViewSubscriber for Recruiter {
        fn on_view_change(&self, _snapshot: &ViewSnapshot) {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                let recruit: Arc<dyn ViewSubscriber> = self.recruit.clone();
                self.controller.subscribe(recruit);
            }
        }
    }

    #[tokio::test]
    async fn test_load_populates_first_page() {
        let controller = controller();
        assert_eq!(controller.load_state(), LoadState::Initial);

        let state = controller.load(&StaticSource::new(13)).await;
        assert_eq!(state, Some(LoadState::Loaded));

        let page = controller.current_page_result();
        assert_eq!(page.items.len(), 12);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.page, 1);
    }

    #[tokio::test]
    async fn test_overlapping_load_is_ignored() {
        let controller = controller();
        let source = StaticSource::slow(5);

        let (first, second) = tokio::join!(controller.load(&source), controller.load(&source));
        let outcomes = [first, second];
        assert_eq!(outcomes.iter().filter(|o| o.is_none()).count(), 1);
        assert!(outcomes.contains(&Some(LoadState::Loaded)));
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(controller.current_page_result().items.len(), 5);
    }

    #[tokio::test]
    async fn test_failure_then_retry() {
        let controller = controller();
        let state = controller.load(&FailingSource).await;
        assert_eq!(
            state,
            Some(LoadState::Error {
                message: LOAD_FAILURE_MESSAGE.to_string()
            })
        );
        assert!(controller.current_page_result().is_empty());

        let state = controller.load(&StaticSource::new(3)).await;
        assert_eq!(state, Some(LoadState::Loaded));
        assert_eq!(controller.current_page_result().items.len(), 3);
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let controller = controller();
        let ticket = controller.begin_load().unwrap();
        assert!(controller.begin_load().is_none());

        assert!(controller.finish_load(ticket, "static", Ok(Vec::new())));
        assert!(!controller.finish_load(ticket, "static", Err(anyhow::anyhow!("late"))));
        assert_eq!(controller.load_state(), LoadState::Loaded);
    }

    #[tokio::test]
    async fn test_next_on_last_page_is_noop() {
        let controller = controller();
        controller.load(&StaticSource::new(13)).await;

        let second = controller.on_page_requested(PageDirection::Next).unwrap();
        assert_eq!(second.page, 2);
        assert_eq!(second.items.len(), 1);

        assert!(controller.on_page_requested(PageDirection::Next).is_none());
        assert_eq!(controller.current_page_result(), second);
    }

    #[tokio::test]
    async fn test_query_change_publishes_and_resets_page() {
        let controller = controller();
        controller.load(&StaticSource::new(30)).await;
        controller.on_page_requested(PageDirection::Next).unwrap();

        let matches = Arc::new(AtomicUsize::new(usize::MAX));
        let seen = matches.clone();
        controller
            .event_bus()
            .subscribe::<events::QueryChanged>(handler_from_fn(move |event| {
                if let Some(changed) = event.as_any().downcast_ref::<events::QueryChanged>() {
                    seen.store(changed.matches, Ordering::SeqCst);
                }
            }));

        // "photo 1", "photo 10".."photo 19"
        let page = controller.on_query_changed("Photo 1").unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.total_items, 11);
        assert_eq!(matches.load(Ordering::SeqCst), 11);
        assert_eq!(controller.search_query(), "Photo 1");

        assert!(controller.on_query_changed("Photo 1").is_none());
    }

    #[tokio::test]
    async fn test_item_selection() {
        let controller = controller();
        assert!(controller.on_item_selected(1).is_none());

        controller.load(&StaticSource::new(5)).await;
        assert_eq!(controller.on_item_selected(4).map(|item| item.id), Some(4));
        assert!(controller.on_item_selected(99).is_none());
    }

    #[tokio::test]
    async fn test_subscribers_see_each_transition() {
        let controller = controller();
        let recorder = Arc::new(Recorder::default());
        controller.subscribe(recorder.clone());

        controller.load(&StaticSource::new(30)).await;
        controller.on_page_requested(PageDirection::Next);
        controller.on_page_requested(PageDirection::Previous);
        controller.on_page_requested(PageDirection::Previous);

        let snapshots = recorder.snapshots.lock();
        let states: Vec<_> = snapshots.iter().map(|s| s.load_state.clone()).collect();
        assert_eq!(
            states,
            vec![LoadState::Loading, LoadState::Loaded, LoadState::Loaded, LoadState::Loaded]
        );
        let pages: Vec<_> = snapshots.iter().map(|s| s.page.page).collect();
        assert_eq!(pages, vec![1, 1, 2, 1]);
    }

    #[tokio::test]
    async fn test_stats_cover_all_items() {
        let controller = controller();
        controller.load(&StaticSource::new(9)).await;
        controller.on_query_changed("photo 9");

        let stats = controller.stats();
        assert_eq!(stats.total_items, 9);
        assert_eq!(stats.total_albums, 3);
    }

    #[tokio::test]
    async fn test_query_event_carries_trimmed_query() {
        let controller = controller();
        controller.load(&StaticSource::new(30)).await;

        let queries = Arc::new(Mutex::new(Vec::new()));
        let seen = queries.clone();
        controller
            .event_bus()
            .subscribe::<events::QueryChanged>(handler_from_fn(move |event| {
                if let Some(changed) = event.as_any().downcast_ref::<events::QueryChanged>() {
                    seen.lock().push(changed.query.clone());
                }
            }));

        controller.on_query_changed("  photo 2 ").unwrap();
        controller.on_query_changed("photo 3").unwrap();
        assert_eq!(*queries.lock(), vec!["photo 2".to_string(), "photo 3".to_string()]);
    }

    #[tokio::test]
    async fn test_load_publishes_photos_loaded() {
        let controller = controller();
        let loaded = Arc::new(Mutex::new(Vec::new()));
        let seen = loaded.clone();
        controller
            .event_bus()
            .subscribe::<events::PhotosLoaded>(handler_from_fn(move |event| {
                if let Some(event) = event.as_any().downcast_ref::<events::PhotosLoaded>() {
                    seen.lock().push(event.clone());
                }
            }));

        let before = chrono::Utc::now();
        controller.load(&StaticSource::new(7)).await;

        let loaded = loaded.lock();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].source_name, "static");
        assert_eq!(loaded[0].item_count, 7);
        assert!(loaded[0].loaded_at >= before);
    }

    #[tokio::test]
    async fn test_failed_load_publishes_cause() {
        let controller = controller();
        let failures = Arc::new(Mutex::new(Vec::new()));
        let seen = failures.clone();
        controller
            .event_bus()
            .subscribe::<events::PhotosLoadFailed>(handler_from_fn(move |event| {
                if let Some(event) = event.as_any().downcast_ref::<events::PhotosLoadFailed>() {
                    seen.lock().push(event.clone());
                }
            }));

        controller.load(&FailingSource).await;
        // a stale result publishes nothing
        let ticket = controller.begin_load().unwrap();
        controller.finish_load(ticket, "static", Ok(Vec::new()));
        assert!(!controller.finish_load(ticket, "failing", Err(anyhow::anyhow!("late"))));

        let failures = failures.lock();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].source_name, "failing");
        assert_eq!(failures[0].error, "HTTP 503");
    }

    #[tokio::test]
    async fn test_subscriber_can_subscribe_during_notification() {
        let controller = Arc::new(controller());
        let recruit = Arc::new(Recorder::default());
        let recruiter = Arc::new(Recruiter {
            controller: controller.clone(),
            recruit: recruit.clone(),
            calls: AtomicUsize::new(0),
        });
        controller.subscribe(recruiter.clone());

        controller.load(&StaticSource::new(3)).await;

        // Joined during the Loading notification, sees the Loaded one
        assert_eq!(recruiter.calls.load(Ordering::SeqCst), 2);
        let states: Vec<_> = recruit
            .snapshots
            .lock()
            .iter()
            .map(|s| s.load_state.clone())
            .collect();
        assert_eq!(states, vec![LoadState::Loaded]);
    }
}
