use std::time::{Duration, Instant};

use log::{debug, info};

/// Wall-clock timer around a run.
#[derive(Debug, Default, Clone)]
pub struct Statistics {
    started: Option<Instant>,
    stopped: Option<Instant>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.started = Some(Instant::now());
        self.stopped = None;
        debug!("Statistics: start time recorded");
    }

    pub fn stop(&mut self) {
        self.stopped = Some(Instant::now());
        debug!("Statistics: end time recorded");
    }

    /// Time between `start` and `stop`; `None` unless both were recorded.
    pub fn elapsed(&self) -> Option<Duration> {
        match (self.started, self.stopped) {
            (Some(start), Some(stop)) => Some(stop.saturating_duration_since(start)),
            _ => None,
        }
    }

    pub fn log(&self) {
        match self.elapsed() {
            Some(elapsed) => info!("Statistics: elapsed time={:.6} seconds", elapsed.as_secs_f64()),
            None => info!("Statistics: timer has not been started and stopped"),
        }
    }
}
