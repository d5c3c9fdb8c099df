use std::time::Duration;

use thiserror::Error;

use crate::actor::{Actor, DEFAULT_FACING};
use crate::grid::{GridError, GridModel};

pub const DEFAULT_CELL_SIZE: f32 = 48.0;
pub const DEFAULT_ZOOM: f32 = 1.0;
pub const MAX_MAP_DIMENSION: u32 = 4096;
pub const DEFAULT_MAP_WIDTH: u32 = 10;
pub const DEFAULT_MAP_HEIGHT: u32 = 10;
pub const DEFAULT_ENDPOINT_URL: &str = "http://localhost:8000/api/robot/next_action";
pub const DEFAULT_REPORT_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub cell_size: f32,
    /// Scales `cell_size` for everything drawn on screen.
    pub zoom: f32,
    pub map_width: u32,
    pub map_height: u32,
    /// `None` starts the actor on the map center.
    pub initial_position: Option<(i32, i32)>,
    pub endpoint_url: String,
    pub report_timeout: Duration,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_title: "Tile Viewer".to_string(),
            window_width: 1280,
            window_height: 720,
            cell_size: DEFAULT_CELL_SIZE,
            zoom: DEFAULT_ZOOM,
            map_width: DEFAULT_MAP_WIDTH,
            map_height: DEFAULT_MAP_HEIGHT,
            initial_position: None,
            endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
            report_timeout: DEFAULT_REPORT_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("cell size must be a positive finite number, got {0}")]
    InvalidCellSize(f32),
    #[error("zoom must be a positive finite number, got {0}")]
    InvalidZoom(f32),
    #[error("map {width}x{height} exceeds the {max}x{max} limit")]
    MapTooLarge { width: u32, height: u32, max: u32 },
    #[error("invalid map: {0}")]
    Map(#[source] GridError),
    #[error("initial position is not on the map: {0}")]
    InitialPosition(#[source] GridError),
    #[error("decision endpoint url is empty")]
    EmptyEndpoint,
    #[error("report timeout must be non-zero")]
    ZeroReportTimeout,
}

impl ViewerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.build_actor().map(|_| ())?;
        if self.endpoint_url.trim().is_empty() {
            return Err(ConfigError::EmptyEndpoint);
        }
        if self.report_timeout.is_zero() {
            return Err(ConfigError::ZeroReportTimeout);
        }
        Ok(())
    }

    /// On-screen size of one cell.
    pub fn render_cell_size(&self) -> f32 {
        self.cell_size * self.zoom
    }

    pub fn build_grid(&self) -> Result<GridModel, ConfigError> {
        if !is_positive_finite(self.cell_size) {
            return Err(ConfigError::InvalidCellSize(self.cell_size));
        }
        if !is_positive_finite(self.zoom) || !is_positive_finite(self.render_cell_size()) {
            return Err(ConfigError::InvalidZoom(self.zoom));
        }
        if self.map_width > MAX_MAP_DIMENSION || self.map_height > MAX_MAP_DIMENSION {
            return Err(ConfigError::MapTooLarge {
                width: self.map_width,
                height: self.map_height,
                max: MAX_MAP_DIMENSION,
            });
        }
        GridModel::new(self.map_width, self.map_height).map_err(ConfigError::Map)
    }

    pub fn build_actor(&self) -> Result<Actor, ConfigError> {
        let grid = self.build_grid()?;
        match self.initial_position {
            Some(start) => {
                Actor::new(grid, start, DEFAULT_FACING).map_err(ConfigError::InitialPosition)
            }
            None => Ok(Actor::at_center(grid)),
        }
    }
}

fn is_positive_finite(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
