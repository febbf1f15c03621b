use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::gps_processor::Point;
use crate::journey_data::Bounds;

/// Options handed to the position source when a journey starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchOptions {
    pub enable_high_accuracy: bool,
    pub timeout_ms: u64,
    // 0 forces a fresh reading every time
    pub maximum_age_ms: u64,
}

impl Default for WatchOptions {
    fn default() -> Self {
        WatchOptions {
            enable_high_accuracy: true,
            timeout_ms: 10_000,
            maximum_age_ms: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub tile_url: String,
    pub center: Point,
    pub initial_zoom: u8,
    pub follow_zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub max_bounds: Bounds,
}

impl Default for MapConfig {
    fn default() -> Self {
        // swisstopo pixel map, limited to Switzerland
        MapConfig {
            tile_url: "https://wmts20.geo.admin.ch/1.0.0/ch.swisstopo.pixelkarte-farbe/default/current/3857/{z}/{x}/{y}.jpeg".to_string(),
            center: Point::new(46.8182, 8.2275),
            initial_zoom: 8,
            follow_zoom: 13,
            min_zoom: 7,
            max_zoom: 18,
            max_bounds: Bounds {
                south: 45.817995,
                west: 5.955911,
                north: 47.808455,
                east: 10.492294,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub watch_options: WatchOptions,
    pub map: MapConfig,
    // The accuracy circle is drawn at this fraction of the reported accuracy.
    pub accuracy_circle_scale: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            watch_options: WatchOptions::default(),
            map: MapConfig::default(),
            accuracy_circle_scale: 0.5,
        }
    }
}

impl TrackerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: TrackerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let config = Self::from_json_str(&content)
            .with_context(|| format!("invalid config: {}", path.display()))?;
        info!("[config] loaded from {}", path.display());
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<()> {
        let map = &self.map;
        if map.min_zoom > map.max_zoom {
            bail!(
                "min_zoom ({}) is greater than max_zoom ({})",
                map.min_zoom,
                map.max_zoom
            );
        }
        if !(map.min_zoom..=map.max_zoom).contains(&map.follow_zoom) {
            bail!("follow_zoom ({}) is outside the zoom range", map.follow_zoom);
        }
        if map.max_bounds.south > map.max_bounds.north || map.max_bounds.west > map.max_bounds.east
        {
            bail!("max_bounds is inverted: {:?}", map.max_bounds);
        }
        if !self.accuracy_circle_scale.is_finite() || self.accuracy_circle_scale < 0. {
            bail!(
                "accuracy_circle_scale must be a non-negative number, got {}",
                self.accuracy_circle_scale
            );
        }
        Ok(())
    }
}
