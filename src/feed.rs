use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use uuid::Uuid;

use crate::history::{HistorySnapshot, RawRecord};

type Callback<T> = Box<dyn Fn(&T) + Send + Sync>;

struct FeedInner<T> {
    current: Option<T>,
    subscribers: HashMap<Uuid, Callback<T>>,
}

/// A push-style value feed: every push replaces the current value and
/// delivers the full new value to every subscriber (most-recent-wins,
/// no ordering guarantee beyond arrival order).
pub struct Feed<T> {
    inner: Arc<Mutex<FeedInner<T>>>,
}

impl<T> Clone for Feed<T> {
    fn clone(&self) -> Self {
        Feed {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Feed<T> {
    pub fn new() -> Self {
        Feed {
            inner: Arc::new(Mutex::new(FeedInner {
                current: None,
                subscribers: HashMap::new(),
            })),
        }
    }

    pub fn push(&self, value: T) {
        let mut inner = self.inner.lock().unwrap();
        inner.current = Some(value);
        // callbacks run under the feed lock, so they must not
        // re-enter the feed
        let current = inner.current.as_ref().unwrap();
        for callback in inner.subscribers.values() {
            callback(current);
        }
    }

    /// Registers `callback` and replays the current value to it right
    /// away, the way the upstream store primes a new listener. The
    /// returned handle unregisters on `close` or drop.
    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription<T> {
        let id = Uuid::new_v4();
        let mut inner = self.inner.lock().unwrap();
        if let Some(current) = &inner.current {
            callback(current);
        }
        inner.subscribers.insert(id, Box::new(callback));
        Subscription {
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().unwrap().subscribers.len()
    }
}

impl<T: Clone> Feed<T> {
    pub fn current(&self) -> Option<T> {
        self.inner.lock().unwrap().current.clone()
    }
}

pub struct Subscription<T> {
    id: Uuid,
    inner: Weak<Mutex<FeedInner<T>>>,
}

impl<T> Subscription<T> {
    /// Unregisters the callback. Safe to call more than once.
    pub fn close(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.lock().unwrap().subscribers.remove(&self.id);
        } else {
            debug!("[feed] closing subscription {} after feed is gone", self.id);
        }
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Process-local stand-in for the external realtime store: one mutable
/// live-position record and one id-to-record history mapping, each at
/// a fixed logical path. The transport behind the real store is out of
/// scope here; writers push whole snapshots into these feeds.
pub struct MemoryStore {
    live_location: Feed<RawRecord>,
    location_history: Feed<HistorySnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            live_location: Feed::new(),
            location_history: Feed::new(),
        }
    }

    pub fn live_location(&self) -> &Feed<RawRecord> {
        &self.live_location
    }

    pub fn location_history(&self) -> &Feed<HistorySnapshot> {
        &self.location_history
    }
}
