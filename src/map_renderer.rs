use anyhow::Result;
use serde::Serialize;

use crate::config::MapConfig;
use crate::gps_processor::Point;
use crate::journey_data::Bounds;

/// What the tracker needs from the map widget. Implementations forward to
/// the actual map library.
pub trait MapRenderer {
    fn add_tile_layer(&mut self, url: &str);
    fn set_max_bounds(&mut self, bounds: Bounds, min_zoom: u8, max_zoom: u8);
    /// Creates the marker and accuracy circle on first use, moves them after.
    fn update_position(&mut self, position: Point, accuracy_radius_m: f64);
    fn clear_position(&mut self);
    /// Replaces the currently drawn route.
    fn draw_route(&mut self, route: &[Point]);
    fn set_view(&mut self, center: Point, zoom: u8);
    fn fit_bounds(&mut self, bounds: Bounds);
    fn invalidate_size(&mut self);
}

pub(crate) fn setup_map<R: MapRenderer + ?Sized>(renderer: &mut R, config: &MapConfig) {
    renderer.add_tile_layer(&config.tile_url);
    renderer.set_max_bounds(config.max_bounds, config.min_zoom, config.max_zoom);
    renderer.set_view(config.center, config.initial_zoom);
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapCommand {
    AddTileLayer {
        url: String,
    },
    SetMaxBounds {
        bounds: Bounds,
        min_zoom: u8,
        max_zoom: u8,
    },
    UpdatePosition {
        position: Point,
        accuracy_radius_m: f64,
    },
    ClearPosition,
    DrawRoute {
        route: Vec<Point>,
    },
    SetView {
        center: Point,
        zoom: u8,
    },
    FitBounds {
        bounds: Bounds,
    },
    InvalidateSize,
}

/// A headless renderer. Commands queue up until the front end drains them.
#[derive(Debug, Default)]
pub struct CommandRecorder {
    commands: Vec<MapCommand>,
    marker_visible: bool,
}

impl CommandRecorder {
    pub fn new() -> Self {
        CommandRecorder {
            commands: Vec::new(),
            marker_visible: false,
        }
    }

    pub fn commands(&self) -> &[MapCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<MapCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn marker_visible(&self) -> bool {
        self.marker_visible
    }

    pub fn last_route(&self) -> Option<&[Point]> {
        self.commands.iter().rev().find_map(|c| match c {
            MapCommand::DrawRoute { route } => Some(route.as_slice()),
            _ => None,
        })
    }

    pub fn drain_as_json(&mut self) -> Result<String> {
        let json = serde_json::to_string(&self.commands)?;
        self.commands.clear();
        Ok(json)
    }
}

impl MapRenderer for CommandRecorder {
    fn add_tile_layer(&mut self, url: &str) {
        self.commands.push(MapCommand::AddTileLayer {
            url: url.to_string(),
        });
    }

    fn set_max_bounds(&mut self, bounds: Bounds, min_zoom: u8, max_zoom: u8) {
        self.commands.push(MapCommand::SetMaxBounds {
            bounds,
            min_zoom,
            max_zoom,
        });
    }

    fn update_position(&mut self, position: Point, accuracy_radius_m: f64) {
        self.marker_visible = true;
        self.commands.push(MapCommand::UpdatePosition {
            position,
            accuracy_radius_m,
        });
    }

    fn clear_position(&mut self) {
        if self.marker_visible {
            self.marker_visible = false;
            self.commands.push(MapCommand::ClearPosition);
        }
    }

    fn draw_route(&mut self, route: &[Point]) {
        self.commands.push(MapCommand::DrawRoute {
            route: route.to_vec(),
        });
    }

    fn set_view(&mut self, center: Point, zoom: u8) {
        self.commands.push(MapCommand::SetView { center, zoom });
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        self.commands.push(MapCommand::FitBounds { bounds });
    }

    fn invalidate_size(&mut self) {
        self.commands.push(MapCommand::InvalidateSize);
    }
}
