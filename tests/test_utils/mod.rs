#![allow(dead_code)]

use std::cell::Cell;
use std::fs::File;
use std::rc::Rc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use journey_tracker_core::config::TrackerConfig;
use journey_tracker_core::gps_processor::Fix;
use journey_tracker_core::map_renderer::CommandRecorder;
use journey_tracker_core::position_source::{ChannelPositionSource, ReplayPositionSource};
use journey_tracker_core::tracker::{Clock, JourneyTracker};

/// A clock the test moves by hand. Clones share the same time.
#[derive(Clone)]
pub struct ManualClock {
    now_ms: Rc<Cell<i64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        let start = Utc.with_ymd_and_hms(2024, 7, 1, 8, 0, 0).unwrap();
        ManualClock {
            now_ms: Rc::new(Cell::new(start.timestamp_millis())),
        }
    }

    pub fn advance(&self, duration: Duration) {
        self.now_ms
            .set(self.now_ms.get() + duration.num_milliseconds());
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.now_ms.get()).unwrap()
    }
}

pub type TestTracker = JourneyTracker<ChannelPositionSource, CommandRecorder, ManualClock>;

pub fn new_tracker() -> (TestTracker, ManualClock) {
    let clock = ManualClock::new();
    let tracker = JourneyTracker::with_clock(
        ChannelPositionSource::new(),
        CommandRecorder::new(),
        clock.clone(),
        TrackerConfig::default(),
    );
    (tracker, clock)
}

pub fn fix(latitude: f64, longitude: f64, timestamp_ms: i64) -> Fix {
    Fix {
        latitude,
        longitude,
        accuracy_m: 8.0,
        timestamp_ms,
    }
}

pub fn load_walk_replay() -> ReplayPositionSource {
    ReplayPositionSource::from_csv(File::open("./tests/data/walk_zurich.csv").unwrap()).unwrap()
}
