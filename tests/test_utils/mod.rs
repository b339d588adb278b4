use netra_core::history::{HistorySnapshot, RawRecord};

pub fn record(latitude: f64, longitude: f64, timestamp_ms: i64) -> RawRecord {
    RawRecord {
        latitude: Some(latitude),
        longitude: Some(longitude),
        timestamp: Some(timestamp_ms),
        ..Default::default()
    }
}

pub fn snapshot(entries: Vec<(&str, RawRecord)>) -> HistorySnapshot {
    entries
        .into_iter()
        .map(|(id, raw)| (id.to_string(), raw))
        .collect()
}
