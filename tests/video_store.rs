use chrono::{DateTime, Duration, Utc};
use netra_core::video_store::{
    format_bytes, format_duration, sort_recordings, storage_summary, time_ago, BackendStatus,
    SortBy, VideoEntry, VideoRecording, VideoStore,
};

fn entry(public_id: &str, title: Option<&str>, created_at: &str) -> VideoEntry {
    serde_json::from_value(serde_json::json!({
        "public_id": public_id,
        "title": title,
        "created_at": created_at,
        "bytes": 1_048_576,
        "duration": 65.0,
        "url": format!("https://res.cloudinary.com/demo/video/upload/{public_id}.mp4"),
        "thumbnail": null,
        "format": "mp4",
    }))
    .unwrap()
}

#[test]
fn title_fallback_chain() {
    let explicit = VideoRecording::from_entry(entry(
        "netra_sarthi_videos/morning_walk",
        Some("Morning Walk"),
        "2024-01-15T10:30:00Z",
    ));
    assert_eq!(explicit.title, "Morning Walk");

    let derived = VideoRecording::from_entry(entry(
        "netra_sarthi_videos/market_visit_2",
        None,
        "2024-01-15T10:30:00Z",
    ));
    assert_eq!(derived.title, "market visit 2");

    let untitled = VideoRecording::from_entry(entry("", None, "2024-01-15T10:30:00Z"));
    assert_eq!(untitled.title, "Untitled Video");
}

#[test]
fn thumbnail_is_derived_from_the_upload_url() {
    let recording = VideoRecording::from_entry(entry(
        "netra_sarthi_videos/walk",
        None,
        "2024-01-15T10:30:00Z",
    ));
    assert_eq!(
        recording.thumbnail.as_deref(),
        Some("https://res.cloudinary.com/demo/video/upload/w_400,h_300,c_fill/netra_sarthi_videos/walk.mp4")
    );

    let mut with_thumb = entry("netra_sarthi_videos/walk", None, "2024-01-15T10:30:00Z");
    with_thumb.thumbnail = Some("https://example.com/thumb.jpg".to_string());
    let recording = VideoRecording::from_entry(with_thumb);
    assert_eq!(
        recording.thumbnail.as_deref(),
        Some("https://example.com/thumb.jpg")
    );

    let mut plain = entry("walk", None, "2024-01-15T10:30:00Z");
    plain.url = "https://example.com/walk.mp4".to_string();
    assert_eq!(VideoRecording::from_entry(plain).thumbnail, None);
}

#[test]
fn creation_time_parsing() {
    let recording = VideoRecording::from_entry(entry(
        "netra_sarthi_videos/walk",
        None,
        "2024-01-15T10:30:00Z",
    ));
    assert_eq!(recording.date_label(), "2024-01-15");

    let broken = VideoRecording::from_entry(entry("netra_sarthi_videos/walk", None, "not a date"));
    assert_eq!(broken.created_at, None);
    assert_eq!(broken.date_label(), "Unknown date");
}

#[test]
fn byte_and_duration_labels() {
    assert_eq!(format_bytes(0), "0 Bytes");
    assert_eq!(format_bytes(500), "500 Bytes");
    assert_eq!(format_bytes(1024), "1 KB");
    assert_eq!(format_bytes(1536), "1.5 KB");
    assert_eq!(format_bytes(1_048_576), "1 MB");
    assert_eq!(format_bytes(5_767_168), "5.5 MB");
    assert_eq!(format_bytes(2_147_483_648), "2 GB");

    assert_eq!(format_duration(0.0), "00:00");
    assert_eq!(format_duration(-3.0), "00:00");
    assert_eq!(format_duration(65.0), "01:05");
    assert_eq!(format_duration(59.9), "00:59");
    assert_eq!(format_duration(600.0), "10:00");
}

#[test]
fn relative_age_labels() {
    let now: DateTime<Utc> = "2024-06-01T12:00:00Z".parse().unwrap();
    let at = |offset: Duration| Some(now - offset);

    assert_eq!(time_ago(at(Duration::seconds(30)), now), "Just now");
    assert_eq!(time_ago(at(Duration::seconds(90)), now), "1 minute ago");
    assert_eq!(time_ago(at(Duration::hours(2)), now), "2 hours ago");
    assert_eq!(time_ago(at(Duration::days(3)), now), "3 days ago");
    assert_eq!(time_ago(at(Duration::weeks(2)), now), "2 weeks ago");
    assert_eq!(time_ago(at(Duration::days(40)), now), "1 month ago");
    assert_eq!(time_ago(at(Duration::days(800)), now), "2 years ago");
    assert_eq!(time_ago(None, now), "Unknown date");
}

#[test]
fn sort_orders() {
    let mut recordings: Vec<VideoRecording> = [
        ("b_walk", "2024-01-02T00:00:00Z", 200_u64),
        ("a_walk", "2024-01-03T00:00:00Z", 100),
        ("c_walk", "2024-01-01T00:00:00Z", 300),
    ]
    .iter()
    .map(|(id, created, bytes)| {
        let mut entry = entry(id, None, created);
        entry.bytes = *bytes;
        VideoRecording::from_entry(entry)
    })
    .collect();

    sort_recordings(&mut recordings, SortBy::Recent);
    let ids: Vec<&str> = recordings.iter().map(|r| r.public_id.as_str()).collect();
    assert_eq!(ids, vec!["a_walk", "b_walk", "c_walk"]);

    sort_recordings(&mut recordings, SortBy::Oldest);
    let ids: Vec<&str> = recordings.iter().map(|r| r.public_id.as_str()).collect();
    assert_eq!(ids, vec!["c_walk", "b_walk", "a_walk"]);

    sort_recordings(&mut recordings, SortBy::Size);
    let ids: Vec<&str> = recordings.iter().map(|r| r.public_id.as_str()).collect();
    assert_eq!(ids, vec!["c_walk", "b_walk", "a_walk"]);

    sort_recordings(&mut recordings, SortBy::Name);
    let titles: Vec<&str> = recordings.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["a walk", "b walk", "c walk"]);
}

#[test]
fn storage_usage_summary() {
    let recordings: Vec<VideoRecording> = [1_048_576_u64, 2_097_152]
        .iter()
        .map(|bytes| {
            let mut entry = entry("walk", None, "2024-01-01T00:00:00Z");
            entry.bytes = *bytes;
            VideoRecording::from_entry(entry)
        })
        .collect();

    let summary = storage_summary(&recordings);
    assert_eq!(summary.used_mb, 3.0);
    assert_eq!(summary.total_mb, 2048.0);
    assert!((summary.percent_used - 3.0 / 2048.0 * 100.0).abs() < 1e-12);
}

#[tokio::test]
async fn failed_probe_disconnects_and_gates_calls() {
    // nothing listens on this port, the probe fails fast
    let store = VideoStore::new("http://127.0.0.1:9/");
    assert_eq!(store.status(), BackendStatus::Unchecked);

    assert_eq!(store.check_connection().await, BackendStatus::Disconnected);
    assert_eq!(store.status(), BackendStatus::Disconnected);

    let err = store.list_videos().await.unwrap_err();
    assert!(err.to_string().contains("disconnected"));
    let err = store.delete_video("walk").await.unwrap_err();
    assert!(err.to_string().contains("disconnected"));
}
