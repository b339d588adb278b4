use std::collections::HashSet;

use chrono::{DateTime, Local, NaiveDate};
use itertools::Itertools;

use crate::history::HistoryView;

/// Summary metrics for one history snapshot. Recomputed in full on
/// every feed update; an empty view yields all zeros.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HistoryStats {
    pub total_locations: usize,
    pub today_locations: usize,
    pub unique_days: usize,
    pub total_distance_km: f64,
    pub avg_speed_kmh: f64,
    pub start_time_ms: Option<i64>,
    pub end_time_ms: Option<i64>,
}

fn local_date_of_ms(timestamp_ms: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|time| time.with_timezone(&Local).date_naive())
}

impl HistoryStats {
    pub fn compute(view: &HistoryView) -> Self {
        Self::compute_at(view, Local::now().date_naive())
    }

    // `today` is injected so tests don't depend on the wall clock.
    pub fn compute_at(view: &HistoryView, today: NaiveDate) -> Self {
        if view.display.is_empty() {
            return HistoryStats::default();
        }

        let mut days = HashSet::new();
        let mut today_locations = 0;
        for record in &view.display {
            if let Some(date) = local_date_of_ms(record.sort_key_ms()) {
                if date == today {
                    today_locations += 1;
                }
                days.insert(date);
            }
        }

        let total_distance_km: f64 = view
            .route
            .iter()
            .tuple_windows()
            .map(|(a, b)| a.haversine_distance(b))
            .sum();

        // display is newest first
        let end_time_ms = view.display.first().map(|r| r.sort_key_ms());
        let start_time_ms = view.display.last().map(|r| r.sort_key_ms());

        let mut avg_speed_kmh = 0.0;
        if view.display.len() >= 2 {
            if let (Some(start), Some(end)) = (start_time_ms, end_time_ms) {
                let elapsed_hours = (end - start) as f64 / 3_600_000.0;
                if elapsed_hours > 0.0 {
                    avg_speed_kmh = total_distance_km / elapsed_hours;
                }
            }
        }

        HistoryStats {
            total_locations: view.display.len(),
            today_locations,
            unique_days: days.len(),
            total_distance_km,
            avg_speed_kmh,
            start_time_ms,
            end_time_ms,
        }
    }
}
