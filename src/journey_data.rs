use anyhow::Result;
use chrono::{DateTime, Utc};
use geo_types::LineString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::gps_processor::Point;
use crate::utils;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn from_points(points: &[Point]) -> Option<Bounds> {
        let (south, north) = utils::min_max(points.iter().map(|p| p.latitude))?;
        let (west, east) = utils::min_max(points.iter().map(|p| p.longitude))?;
        Some(Bounds {
            south,
            west,
            north,
            east,
        })
    }

    pub fn contains(&self, point: &Point) -> bool {
        (self.south..=self.north).contains(&point.latitude)
            && (self.west..=self.east).contains(&point.longitude)
    }

    pub fn is_single_point(&self) -> bool {
        self.south == self.north && self.west == self.east
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.south + self.north) / 2.,
            (self.west + self.east) / 2.,
        )
    }
}

/// A finished, named recording. Nothing mutates it after `stop_journey`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Journey {
    id: Uuid,
    name: String,
    route: Vec<Point>,
    velocity_samples: Vec<f64>,
    duration_secs: f64,
    average_velocity_kmh: f64,
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
}

impl Journey {
    pub(crate) fn finalize(
        name: String,
        route: Vec<Point>,
        velocity_samples: Vec<f64>,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
    ) -> Journey {
        let duration_secs = ((ended_at - started_at).num_milliseconds() as f64 / 1000.).max(0.);
        let average_velocity_kmh = utils::mean(&velocity_samples);
        Journey {
            id: Uuid::new_v4(),
            name,
            route,
            velocity_samples,
            duration_secs,
            average_velocity_kmh,
            started_at,
            ended_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn route(&self) -> &[Point] {
        &self.route
    }

    pub fn velocity_samples(&self) -> &[f64] {
        &self.velocity_samples
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn average_velocity_kmh(&self) -> f64 {
        self.average_velocity_kmh
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn ended_at(&self) -> DateTime<Utc> {
        self.ended_at
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(&self.route)
    }

    pub fn to_line_string(&self) -> LineString<f64> {
        self.route
            .iter()
            .map(|p| geo_types::Point::from(*p))
            .collect::<Vec<_>>()
            .into()
    }

    pub fn summary(&self) -> JourneySummary {
        JourneySummary {
            name: self.name.clone(),
            duration: utils::format_duration_hms(self.duration_secs),
            average_velocity_kmh: self.average_velocity_kmh,
            point_count: self.route.len(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct JourneySummary {
    pub name: String,
    pub duration: String,
    pub average_velocity_kmh: f64,
    pub point_count: usize,
}

impl JourneySummary {
    pub fn average_velocity_text(&self) -> String {
        format!("Average Velocity: {:.2} km/h", self.average_velocity_kmh)
    }
}

// Saved journeys for the lifetime of the process, oldest first.
#[derive(Debug, Default)]
pub struct JourneyHistory {
    journeys: Vec<Journey>,
}

impl JourneyHistory {
    pub fn new() -> Self {
        JourneyHistory {
            journeys: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, journey: Journey) -> &Journey {
        self.journeys.push(journey);
        &self.journeys[self.journeys.len() - 1]
    }

    pub fn get(&self, index: usize) -> Option<&Journey> {
        self.journeys.get(index)
    }

    pub fn len(&self) -> usize {
        self.journeys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.journeys.is_empty()
    }

    pub fn latest(&self) -> Option<&Journey> {
        self.journeys.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Journey> {
        self.journeys.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.journeys.iter().map(|j| j.name()).collect()
    }
}
