use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tokio::time::Duration;

use crate::location::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PlaybackState {
    Stopped,
    Playing,
}

/// Timer-driven cursor over a route. The controller itself is clock
/// free: `tick` is one scheduler step, so tests can drive it manually
/// and `spawn_driver` supplies the real recurring timer.
pub struct PlaybackController {
    route: Vec<Point>,
    index: usize,
    rate: f64,
    state: PlaybackState,
}

impl PlaybackController {
    pub fn new(route: Vec<Point>) -> Self {
        PlaybackController {
            route,
            index: 0,
            rate: 1.0,
            state: PlaybackState::Stopped,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn route_len(&self) -> usize {
        self.route.len()
    }

    pub fn current_point(&self) -> Option<&Point> {
        self.route.get(self.index)
    }

    /// Play/pause. At the last index this rewinds to the start before
    /// playing again. A no-op on an empty route.
    pub fn toggle(&mut self) {
        if self.route.is_empty() {
            return;
        }
        if self.index + 1 >= self.route.len() {
            self.index = 0;
        }
        self.state = match self.state {
            PlaybackState::Stopped => PlaybackState::Playing,
            PlaybackState::Playing => PlaybackState::Stopped,
        };
    }

    /// One scheduler step. While playing, advances the cursor and
    /// returns the new focus point; reaching the final index stops
    /// playback (no wraparound).
    pub fn tick(&mut self) -> Option<&Point> {
        if self.state != PlaybackState::Playing {
            return None;
        }
        if self.index + 1 >= self.route.len() {
            self.state = PlaybackState::Stopped;
            return None;
        }
        self.index += 1;
        if self.index + 1 == self.route.len() {
            self.state = PlaybackState::Stopped;
        }
        self.route.get(self.index)
    }

    /// Rewinds to the start, stopped, and returns the first point as
    /// the new focus position.
    pub fn reset(&mut self) -> Option<&Point> {
        self.index = 0;
        self.state = PlaybackState::Stopped;
        self.route.first()
    }

    /// Changes the tick interval for subsequent ticks only.
    pub fn set_rate(&mut self, rate: f64) {
        if !rate.is_finite() || rate <= 0.0 {
            warn!("[playback] ignoring invalid rate {rate}");
            return;
        }
        self.rate = rate;
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.rate)
    }

    /// Replaces the route. The cursor rewinds and playback stops so a
    /// running timer can never advance a stale sequence.
    pub fn set_route(&mut self, route: Vec<Point>) {
        self.route = route;
        self.index = 0;
        self.state = PlaybackState::Stopped;
    }
}

/// Cancellation handle for a running playback timer. Stopping (or just
/// dropping) the handle tears the timer down.
pub struct PlaybackHandle {
    handle: JoinHandle<()>,
}

impl PlaybackHandle {
    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for PlaybackHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Drives `controller` with a real recurring timer, invoking
/// `on_focus` for every point the cursor advances to. The interval is
/// re-read every cycle so `set_rate` takes effect on the next tick.
pub fn spawn_driver<F>(controller: Arc<Mutex<PlaybackController>>, mut on_focus: F) -> PlaybackHandle
where
    F: FnMut(Point) + Send + 'static,
{
    let handle = tokio::spawn(async move {
        loop {
            let wait = controller.lock().unwrap().tick_interval();
            tokio::time::sleep(wait).await;
            let focus = controller.lock().unwrap().tick().cloned();
            if let Some(point) = focus {
                on_focus(point);
            }
        }
    });
    PlaybackHandle { handle }
}
