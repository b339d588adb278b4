use std::sync::OnceLock;

use crate::feed::MemoryStore;
use crate::logs;
use crate::session::{HistorySession, LiveSession};
use crate::video_store::VideoStore;

pub struct Config {
    pub video_backend_url: String,
    /// Directory for rotating log files; `None` leaves logging to the
    /// host process.
    pub log_dir: Option<String>,
}

struct MainState {
    store: MemoryStore,
    video_store: VideoStore,
}

static MAIN_STATE: OnceLock<MainState> = OnceLock::new();

/// Builds the process-wide state exactly once; repeat calls reuse the
/// existing instance.
pub fn init(config: Config) {
    let mut already_initialized = true;
    MAIN_STATE.get_or_init(|| {
        already_initialized = false;

        if let Some(log_dir) = &config.log_dir {
            if let Err(err) = logs::init(log_dir) {
                eprintln!("failed to initialize logging: {err}");
            }
        }
        info!("initialized");

        MainState {
            store: MemoryStore::new(),
            video_store: VideoStore::new(&config.video_backend_url),
        }
    });
    if already_initialized {
        warn!("`init` is called multiple times");
    }
}

fn get() -> &'static MainState {
    MAIN_STATE.get().expect("main state is not initialized")
}

pub fn store() -> &'static MemoryStore {
    &get().store
}

pub fn video_store() -> &'static VideoStore {
    &get().video_store
}

pub fn open_history_session() -> HistorySession {
    HistorySession::open(get().store.location_history())
}

pub fn open_live_session() -> LiveSession {
    LiveSession::open(get().store.live_location())
}
