use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Fixed quota the storage summary is reported against, in MB.
pub const STORAGE_QUOTA_MB: f64 = 2048.0;

const TIME_AGO_INTERVALS: [(&str, i64); 6] = [
    ("year", 31_536_000),
    ("month", 2_592_000),
    ("week", 604_800),
    ("day", 86_400),
    ("hour", 3_600),
    ("minute", 60),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendStatus {
    Unchecked,
    Connected,
    Disconnected,
}

/// A video entry as the backend returns it.
#[derive(Clone, Debug, Deserialize)]
pub struct VideoEntry {
    pub public_id: String,
    pub title: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub bytes: u64,
    #[serde(default)]
    pub duration: f64,
    pub url: String,
    pub thumbnail: Option<String>,
    pub format: Option<String>,
}

#[derive(Deserialize)]
struct VideoListResponse {
    success: bool,
    #[serde(default)]
    videos: Vec<VideoEntry>,
}

#[derive(Deserialize)]
struct DeleteResponse {
    success: bool,
}

/// A catalog entry after the transformations the dashboard applies:
/// display title fallback, parsed creation time, derived thumbnail.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoRecording {
    pub public_id: String,
    pub title: String,
    pub created_at: Option<DateTime<Utc>>,
    pub bytes: u64,
    pub duration_secs: f64,
    pub url: String,
    pub thumbnail: Option<String>,
    pub format: Option<String>,
}

impl VideoRecording {
    pub fn from_entry(entry: VideoEntry) -> Self {
        let title = entry
            .title
            .clone()
            .or_else(|| {
                entry
                    .public_id
                    .rsplit('/')
                    .next()
                    .filter(|segment| !segment.is_empty())
                    .map(|segment| segment.replace('_', " "))
            })
            .unwrap_or_else(|| "Untitled Video".to_string());

        let thumbnail = entry.thumbnail.clone().or_else(|| {
            entry
                .url
                .contains("/upload/")
                .then(|| entry.url.replacen("/upload/", "/upload/w_400,h_300,c_fill/", 1))
        });

        let created_at = DateTime::parse_from_rfc3339(&entry.created_at)
            .ok()
            .map(|time| time.with_timezone(&Utc));

        VideoRecording {
            public_id: entry.public_id,
            title,
            created_at,
            bytes: entry.bytes,
            duration_secs: entry.duration,
            url: entry.url,
            thumbnail,
            format: entry.format,
        }
    }

    pub fn size_label(&self) -> String {
        format_bytes(self.bytes)
    }

    pub fn duration_label(&self) -> String {
        format_duration(self.duration_secs)
    }

    pub fn date_label(&self) -> String {
        match self.created_at {
            Some(time) => time.format("%Y-%m-%d").to_string(),
            None => "Unknown date".to_string(),
        }
    }

    pub fn age_label(&self, now: DateTime<Utc>) -> String {
        time_ago(self.created_at, now)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortBy {
    #[default]
    Recent,
    Oldest,
    Size,
    Name,
}

pub fn sort_recordings(recordings: &mut [VideoRecording], sort_by: SortBy) {
    match sort_by {
        SortBy::Recent => recordings.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortBy::Oldest => recordings.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortBy::Size => recordings.sort_by(|a, b| b.bytes.cmp(&a.bytes)),
        SortBy::Name => recordings.sort_by(|a, b| a.title.cmp(&b.title)),
    }
}

/// "1.5 MB"-style label, 1024-based, at most two decimals.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let exponent = ((bytes as f64).ln() / 1024_f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024_f64.powi(exponent as i32);
    format!("{} {}", (value * 100.0).round() / 100.0, UNITS[exponent])
}

/// "MM:SS" label; zero or negative durations render as "00:00".
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "00:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// "3 days ago"-style relative age; anything under a minute floors to
/// "Just now", and a missing creation time reads "Unknown date".
pub fn time_ago(created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let created_at = match created_at {
        Some(time) => time,
        None => return "Unknown date".to_string(),
    };
    let seconds = (now - created_at).num_seconds();
    for (unit, seconds_in_unit) in TIME_AGO_INTERVALS {
        let interval = seconds / seconds_in_unit;
        if interval >= 1 {
            let plural = if interval == 1 { "" } else { "s" };
            return format!("{interval} {unit}{plural} ago");
        }
    }
    "Just now".to_string()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StorageSummary {
    pub used_mb: f64,
    pub total_mb: f64,
    pub percent_used: f64,
}

pub fn storage_summary(recordings: &[VideoRecording]) -> StorageSummary {
    let used_mb = recordings
        .iter()
        .map(|recording| recording.bytes as f64 / (1024.0 * 1024.0))
        .sum::<f64>();
    StorageSummary {
        used_mb,
        total_mb: STORAGE_QUOTA_MB,
        percent_used: used_mb / STORAGE_QUOTA_MB * 100.0,
    }
}

/// Client for the recordings backend. A failed liveness probe marks
/// the backend disconnected and short-circuits list/delete calls until
/// another probe succeeds; there is no automatic retry anywhere, the
/// caller owns the retry action.
pub struct VideoStore {
    base_url: String,
    client: reqwest::Client,
    status: Mutex<BackendStatus>,
}

impl VideoStore {
    pub fn new(base_url: &str) -> Self {
        VideoStore {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            status: Mutex::new(BackendStatus::Unchecked),
        }
    }

    pub fn status(&self) -> BackendStatus {
        *self.status.lock().unwrap()
    }

    pub async fn check_connection(&self) -> BackendStatus {
        let url = format!("{}/api/test", self.base_url);
        let status = match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => BackendStatus::Connected,
            Ok(response) => {
                warn!(
                    "[video_store] liveness probe returned {}",
                    response.status()
                );
                BackendStatus::Disconnected
            }
            Err(err) => {
                warn!("[video_store] liveness probe failed: {err}");
                BackendStatus::Disconnected
            }
        };
        *self.status.lock().unwrap() = status;
        status
    }

    fn ensure_not_disconnected(&self) -> Result<()> {
        if self.status() == BackendStatus::Disconnected {
            bail!("video backend is disconnected, check the connection first");
        }
        Ok(())
    }

    pub async fn list_videos(&self) -> Result<Vec<VideoRecording>> {
        self.ensure_not_disconnected()?;
        let url = format!("{}/api/cloudinary/videos", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("video listing request failed")?;
        if !response.status().is_success() {
            bail!("video listing returned {}", response.status());
        }
        let body: VideoListResponse = response
            .json()
            .await
            .context("malformed video listing response")?;
        if !body.success {
            bail!("video backend reported a listing failure");
        }
        info!("[video_store] listed {} videos", body.videos.len());
        Ok(body
            .videos
            .into_iter()
            .map(VideoRecording::from_entry)
            .collect())
    }

    pub async fn delete_video(&self, public_id: &str) -> Result<()> {
        self.ensure_not_disconnected()?;
        let url = format!("{}/api/cloudinary/videos/{}", self.base_url, public_id);
        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .context("video delete request failed")?;
        if !response.status().is_success() {
            bail!("video delete returned {}", response.status());
        }
        let body: DeleteResponse = response
            .json()
            .await
            .context("malformed video delete response")?;
        if !body.success {
            bail!("video backend refused to delete {public_id}");
        }
        info!("[video_store] deleted {public_id}");
        Ok(())
    }
}
