use chrono::{DateTime, Duration, Local};

use crate::history::LocationRecord;

const MAX_VISIBLE_PAGES: usize = 5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimeFilter {
    #[default]
    All,
    Today,
    Week,
}

impl TimeFilter {
    // Buckets are computed against local wall-clock time with no
    // timezone normalization, so a record near midnight can change
    // buckets as `now` crosses the day boundary.
    pub fn matches(&self, record: &LocationRecord, now: DateTime<Local>) -> bool {
        match self {
            TimeFilter::All => true,
            TimeFilter::Today => DateTime::from_timestamp_millis(record.sort_key_ms())
                .map(|time| time.with_timezone(&Local).date_naive() == now.date_naive())
                .unwrap_or(false),
            TimeFilter::Week => {
                record.sort_key_ms() >= (now - Duration::days(7)).timestamp_millis()
            }
        }
    }

    /// Narrows `records` without mutating them.
    pub fn apply(&self, records: &[LocationRecord], now: DateTime<Local>) -> Vec<LocationRecord> {
        records
            .iter()
            .filter(|record| self.matches(record, now))
            .cloned()
            .collect()
    }
}

/// Fixed-size paging over an already-filtered sequence. Pages are
/// 1-based; the current page is clamped so navigation never points
/// past the end, even after the filtered set shrinks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    current_page: usize,
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        if page_size == 0 {
            panic!("page size must be bigger than zero!");
        }
        Paginator {
            page_size,
            current_page: 1,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self, item_count: usize) -> usize {
        item_count.div_ceil(self.page_size).max(1)
    }

    pub fn set_page(&mut self, page: usize, item_count: usize) {
        self.current_page = page.clamp(1, self.total_pages(item_count));
    }

    /// Re-clamps the current page after the underlying set changed.
    pub fn clamp_to(&mut self, item_count: usize) {
        let total = self.total_pages(item_count);
        if self.current_page > total {
            self.current_page = total;
        }
    }

    pub fn first_page(&mut self) {
        self.current_page = 1;
    }

    pub fn last_page(&mut self, item_count: usize) {
        self.current_page = self.total_pages(item_count);
    }

    pub fn next_page(&mut self, item_count: usize) {
        self.set_page(self.current_page + 1, item_count);
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.saturating_sub(1).max(1);
    }

    /// Items of the current page. Empty for an empty input, which is a
    /// valid state, not an error.
    pub fn page_slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = (self.current_page - 1) * self.page_size;
        if start >= items.len() {
            return &[];
        }
        let end = (start + self.page_size).min(items.len());
        &items[start..end]
    }

    /// Page numbers for the pager control: all of them when there are
    /// at most 5 pages, otherwise a 5-wide window around the current
    /// page, clamped at both ends.
    pub fn page_numbers(&self, item_count: usize) -> Vec<usize> {
        let total = self.total_pages(item_count);
        if total <= MAX_VISIBLE_PAGES {
            return (1..=total).collect();
        }
        let window = if self.current_page <= 3 {
            1..=MAX_VISIBLE_PAGES
        } else if self.current_page >= total - 2 {
            (total - 4)..=total
        } else {
            (self.current_page - 2)..=(self.current_page + 2)
        };
        window.collect()
    }
}
