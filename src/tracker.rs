use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::config::TrackerConfig;
use crate::error::TrackerError;
use crate::gps_processor::{Fix, Point, VelocityEstimator};
use crate::journey_data::{Journey, JourneyHistory, JourneySummary};
use crate::map_renderer::{self, MapRenderer};
use crate::position_source::{PositionEvent, PositionSource, Subscription};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

struct TrackingSession {
    name: String,
    subscription: Subscription,
    velocity_estimator: VelocityEstimator,
    route: Vec<Point>,
    velocity_samples: Vec<f64>,
    start_time: DateTime<Utc>,
    current_velocity: f64,
}

enum TrackerState {
    Idle,
    Tracking(TrackingSession),
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrackerStatus {
    pub tracking: bool,
    pub journey_name: Option<String>,
    pub coordinates: Option<Point>,
    pub velocity_kmh: f64,
    pub point_count: usize,
}

impl TrackerStatus {
    pub fn coordinates_text(&self) -> String {
        match &self.coordinates {
            Some(p) => format!("Coordinates: {:.6}, {:.6}", p.latitude, p.longitude),
            None => "Coordinates: Not available".to_string(),
        }
    }

    pub fn velocity_text(&self) -> String {
        format!("Velocity: {:.2} km/h", self.velocity_kmh)
    }
}

/// Owns everything the tracking page used to keep in globals: the position
/// source, the map, the active session and the saved journeys.
pub struct JourneyTracker<S: PositionSource, R: MapRenderer, C: Clock = SystemClock> {
    position_source: S,
    renderer: R,
    clock: C,
    config: TrackerConfig,
    state: TrackerState,
    history: JourneyHistory,
}

impl<S: PositionSource, R: MapRenderer> JourneyTracker<S, R, SystemClock> {
    pub fn new(position_source: S, renderer: R, config: TrackerConfig) -> Self {
        Self::with_clock(position_source, renderer, SystemClock, config)
    }
}

impl<S: PositionSource, R: MapRenderer, C: Clock> JourneyTracker<S, R, C> {
    pub fn with_clock(position_source: S, mut renderer: R, clock: C, config: TrackerConfig) -> Self {
        map_renderer::setup_map(&mut renderer, &config.map);
        info!("[tracker] initialized");
        JourneyTracker {
            position_source,
            renderer,
            clock,
            config,
            state: TrackerState::Idle,
            history: JourneyHistory::new(),
        }
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self.state, TrackerState::Tracking(_))
    }

    /// Returns `false` without doing anything when a journey is already being
    /// tracked.
    pub fn start_journey(&mut self, name: &str) -> Result<bool> {
        if self.is_tracking() {
            warn!("[tracker] `start_journey` called while tracking, ignored");
            return Ok(false);
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(TrackerError::MissingJourneyName.into());
        }
        let subscription = self
            .position_source
            .subscribe(&self.config.watch_options)
            .inspect_err(|e| error!("[tracker] failed to watch position: {}", e))?;
        info!(
            "[tracker] journey started: name={}, watch={}",
            name,
            subscription.id()
        );
        self.state = TrackerState::Tracking(TrackingSession {
            name: name.to_string(),
            subscription,
            velocity_estimator: VelocityEstimator::new(),
            route: Vec::new(),
            velocity_samples: Vec::new(),
            start_time: self.clock.now(),
            current_velocity: 0.,
        });
        Ok(true)
    }

    /// Processes every queued position event, in order. Returns how many
    /// fixes were applied. A position error aborts the journey without saving
    /// it and is returned to the caller.
    pub fn pump_events(&mut self) -> Result<usize> {
        let mut processed = 0;
        loop {
            let event = match &self.state {
                TrackerState::Idle => return Ok(processed),
                TrackerState::Tracking(session) => match session.subscription.try_next() {
                    None => return Ok(processed),
                    Some(event) => event,
                },
            };
            match event {
                PositionEvent::Fix(fix) => {
                    self.on_fix(&fix);
                    processed += 1;
                }
                PositionEvent::Error(position_error) => {
                    let error = TrackerError::from(position_error);
                    self.abort_journey(&error);
                    return Err(error.into());
                }
            }
        }
    }

    fn on_fix(&mut self, fix: &Fix) {
        let TrackerState::Tracking(session) = &mut self.state else {
            return;
        };
        let point = fix.point();
        session.route.push(point);
        session.current_velocity = match session.velocity_estimator.estimate(fix) {
            None => 0.,
            Some(velocity) => {
                session.velocity_samples.push(velocity);
                velocity
            }
        };

        self.renderer
            .update_position(point, fix.accuracy_m * self.config.accuracy_circle_scale);
        if session.route.len() > 1 {
            self.renderer.draw_route(&session.route);
        }
        self.renderer.set_view(point, self.config.map.follow_zoom);
    }

    fn end_session(&mut self) -> Option<TrackingSession> {
        match std::mem::replace(&mut self.state, TrackerState::Idle) {
            TrackerState::Idle => None,
            TrackerState::Tracking(session) => {
                self.position_source.unsubscribe(session.subscription.id());
                self.renderer.clear_position();
                Some(session)
            }
        }
    }

    fn abort_journey(&mut self, error: &TrackerError) {
        if let Some(session) = self.end_session() {
            warn!(
                "[tracker] journey aborted: name={}, points={}, error={}",
                session.name,
                session.route.len(),
                error
            );
        }
    }

    /// Saves the active journey. Returns `None` if nothing was being tracked.
    /// Fixes already delivered to the subscription are applied first; a
    /// queued position error aborts the journey instead.
    pub fn stop_journey(&mut self) -> Result<Option<&Journey>> {
        self.pump_events()?;
        let session = match self.end_session() {
            None => {
                warn!("[tracker] `stop_journey` called while idle");
                return Ok(None);
            }
            Some(session) => session,
        };
        let journey = Journey::finalize(
            session.name,
            session.route,
            session.velocity_samples,
            session.start_time,
            self.clock.now(),
        );
        info!(
            "[tracker] journey saved: id={}, name={}, points={}, duration={}s, avg={:.2}km/h",
            journey.id(),
            journey.name(),
            journey.route().len(),
            journey.duration_secs(),
            journey.average_velocity_kmh()
        );
        Ok(Some(self.history.push(journey)))
    }

    /// Draws a saved journey on the map and returns its summary.
    pub fn select_journey(&mut self, index: usize) -> Result<JourneySummary> {
        let journey = self
            .history
            .get(index)
            .ok_or(TrackerError::JourneyIndexOutOfRange {
                index,
                len: self.history.len(),
            })?;
        self.renderer.draw_route(journey.route());
        match journey.bounds() {
            None => (),
            Some(bounds) if bounds.is_single_point() => {
                self.renderer
                    .set_view(bounds.center(), self.config.map.follow_zoom);
            }
            Some(bounds) => self.renderer.fit_bounds(bounds),
        }
        debug!("[tracker] journey selected: index={}", index);
        Ok(journey.summary())
    }

    pub fn on_viewport_resize(&mut self) {
        self.renderer.invalidate_size();
    }

    pub fn status(&self) -> TrackerStatus {
        match &self.state {
            TrackerState::Idle => TrackerStatus {
                tracking: false,
                journey_name: None,
                coordinates: None,
                velocity_kmh: 0.,
                point_count: 0,
            },
            TrackerState::Tracking(session) => TrackerStatus {
                tracking: true,
                journey_name: Some(session.name.clone()),
                coordinates: session.route.last().copied(),
                velocity_kmh: session.current_velocity,
                point_count: session.route.len(),
            },
        }
    }

    pub fn journeys(&self) -> &JourneyHistory {
        &self.history
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn position_source(&self) -> &S {
        &self.position_source
    }

    pub fn position_source_mut(&mut self) -> &mut S {
        &mut self.position_source
    }
}
