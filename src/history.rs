use std::collections::HashMap;

use serde::Deserialize;

use crate::location::Point;

/// A record as it arrives from the history feed. The shape is not
/// guaranteed: some writers put the timestamp under the legacy `time`
/// field, coordinates may be missing on half-written records, and
/// unknown fields are ignored.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct RawRecord {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timestamp: Option<i64>,
    pub time: Option<i64>,
    pub accuracy: Option<f32>,
    pub speed: Option<f32>,
}

/// Full snapshot of the history path: record id to record.
pub type HistorySnapshot = HashMap<String, RawRecord>;

#[derive(Clone, Debug, PartialEq)]
pub struct LocationRecord {
    pub id: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timestamp_ms: Option<i64>,
    pub accuracy: Option<f32>,
    pub speed: Option<f32>,
}

impl LocationRecord {
    fn from_raw(id: &str, raw: &RawRecord) -> Self {
        LocationRecord {
            id: id.to_string(),
            latitude: raw.latitude,
            longitude: raw.longitude,
            timestamp_ms: raw.timestamp.or(raw.time),
            accuracy: raw.accuracy,
            speed: raw.speed,
        }
    }

    /// Resolved timestamp used for all ordering and bucketing. A
    /// missing timestamp sorts at 0, same as the upstream feed.
    pub fn sort_key_ms(&self) -> i64 {
        self.timestamp_ms.unwrap_or(0)
    }

    pub fn point(&self) -> Option<Point> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Point {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }
}

/// The two parallel orderings every consumer works from. `route` keeps
/// only records with both coordinates, oldest first; `display` keeps
/// everything, newest first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HistoryView {
    pub route: Vec<Point>,
    pub display: Vec<LocationRecord>,
}

impl HistoryView {
    /// Normalizes one full snapshot. An empty snapshot produces empty
    /// views, which is the valid "no data yet" state.
    pub fn from_snapshot(snapshot: &HistorySnapshot) -> Self {
        let records: Vec<LocationRecord> = snapshot
            .iter()
            .map(|(id, raw)| LocationRecord::from_raw(id, raw))
            .collect();

        let mut chronological = records.clone();
        chronological.sort_by_key(LocationRecord::sort_key_ms);
        let route = chronological
            .iter()
            .filter_map(LocationRecord::point)
            .collect();

        let mut display = records;
        display.sort_by(|a, b| b.sort_key_ms().cmp(&a.sort_key_ms()));

        HistoryView { route, display }
    }

    /// Newest record, used to recenter the map.
    pub fn latest(&self) -> Option<&LocationRecord> {
        self.display.first()
    }

    pub fn is_empty(&self) -> bool {
        self.display.is_empty()
    }
}
