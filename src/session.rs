use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local};

use crate::feed::{Feed, Subscription};
use crate::filter::{Paginator, TimeFilter};
use crate::history::{HistorySnapshot, HistoryView, LocationRecord, RawRecord};
use crate::location::Point;
use crate::stats::HistoryStats;

const ITEMS_PER_PAGE: usize = 10;

struct HistoryState {
    view: HistoryView,
    stats: HistoryStats,
    filter: TimeFilter,
    filtered: Vec<LocationRecord>,
    paginator: Paginator,
}

impl HistoryState {
    fn apply_snapshot(&mut self, snapshot: &HistorySnapshot) {
        self.view = HistoryView::from_snapshot(snapshot);
        self.stats = HistoryStats::compute(&self.view);
        self.refilter();
    }

    fn refilter(&mut self) {
        self.filtered = self.filter.apply(&self.view.display, Local::now());
        self.paginator.clamp_to(self.filtered.len());
    }
}

/// One mounted history view: a feed subscription wired to the
/// normalizer, statistics, filter and paginator. Every push recomputes
/// the whole state synchronously; dropping the session unsubscribes.
pub struct HistorySession {
    state: Arc<Mutex<HistoryState>>,
    _subscription: Subscription<HistorySnapshot>,
}

impl HistorySession {
    pub fn open(feed: &Feed<HistorySnapshot>) -> Self {
        let state = Arc::new(Mutex::new(HistoryState {
            view: HistoryView::default(),
            stats: HistoryStats::default(),
            filter: TimeFilter::All,
            filtered: Vec::new(),
            paginator: Paginator::new(ITEMS_PER_PAGE),
        }));

        let state_for_updates = state.clone();
        let subscription = feed.subscribe(move |snapshot| {
            let mut state = state_for_updates.lock().unwrap();
            state.apply_snapshot(snapshot);
            debug!(
                "[session] history snapshot applied, {} records",
                state.view.display.len()
            );
        });

        HistorySession {
            state,
            _subscription: subscription,
        }
    }

    pub fn stats(&self) -> HistoryStats {
        self.state.lock().unwrap().stats.clone()
    }

    /// Chronological route for the map polyline and playback.
    pub fn route(&self) -> Vec<Point> {
        self.state.lock().unwrap().view.route.clone()
    }

    pub fn latest(&self) -> Option<LocationRecord> {
        self.state.lock().unwrap().view.latest().cloned()
    }

    pub fn filter(&self) -> TimeFilter {
        self.state.lock().unwrap().filter
    }

    pub fn set_filter(&self, filter: TimeFilter) {
        let mut state = self.state.lock().unwrap();
        state.filter = filter;
        state.refilter();
    }

    pub fn filtered_len(&self) -> usize {
        self.state.lock().unwrap().filtered.len()
    }

    pub fn current_page(&self) -> usize {
        self.state.lock().unwrap().paginator.current_page()
    }

    pub fn total_pages(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.paginator.total_pages(state.filtered.len())
    }

    pub fn set_page(&self, page: usize) {
        let mut state = self.state.lock().unwrap();
        let item_count = state.filtered.len();
        state.paginator.set_page(page, item_count);
    }

    pub fn next_page(&self) {
        let mut state = self.state.lock().unwrap();
        let item_count = state.filtered.len();
        state.paginator.next_page(item_count);
    }

    pub fn previous_page(&self) {
        self.state.lock().unwrap().paginator.previous_page();
    }

    pub fn first_page(&self) {
        self.state.lock().unwrap().paginator.first_page();
    }

    pub fn last_page(&self) {
        let mut state = self.state.lock().unwrap();
        let item_count = state.filtered.len();
        state.paginator.last_page(item_count);
    }

    pub fn page_slice(&self) -> Vec<LocationRecord> {
        let state = self.state.lock().unwrap();
        state.paginator.page_slice(&state.filtered).to_vec()
    }

    pub fn page_numbers(&self) -> Vec<usize> {
        let state = self.state.lock().unwrap();
        state.paginator.page_numbers(state.filtered.len())
    }
}

struct LiveState {
    current: Option<RawRecord>,
    last_update: Option<DateTime<Local>>,
}

/// One mounted live-position view. "No data yet" until the first push
/// arrives; connectivity loss only ever shows up as silence.
pub struct LiveSession {
    state: Arc<Mutex<LiveState>>,
    _subscription: Subscription<RawRecord>,
}

impl LiveSession {
    pub fn open(feed: &Feed<RawRecord>) -> Self {
        let state = Arc::new(Mutex::new(LiveState {
            current: None,
            last_update: None,
        }));

        let state_for_updates = state.clone();
        let subscription = feed.subscribe(move |record| {
            let mut state = state_for_updates.lock().unwrap();
            state.current = Some(record.clone());
            state.last_update = Some(Local::now());
        });

        LiveSession {
            state,
            _subscription: subscription,
        }
    }

    pub fn current(&self) -> Option<RawRecord> {
        self.state.lock().unwrap().current.clone()
    }

    pub fn last_update(&self) -> Option<DateTime<Local>> {
        self.state.lock().unwrap().last_update
    }

    pub fn has_signal(&self) -> bool {
        self.state.lock().unwrap().current.is_some()
    }
}
