use thiserror::Error;

pub const TERRAIN_GRASS: u16 = 0;
pub const TERRAIN_DIRT: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridDimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfRange {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
    #[error("grid dimensions must be positive and fit in i32, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Generated checkerboard map.
/// - Cell (x,y) exists for `0 <= x < width` and `0 <= y < height`.
/// - Terrain is `(x + y) mod 2`; nothing is stored per cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridModel {
    dimensions: GridDimensions,
}

impl GridModel {
    pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
        let limit = i32::MAX as u32;
        if width == 0 || height == 0 || width > limit || height > limit {
            return Err(GridError::InvalidDimensions { width, height });
        }
        Ok(Self {
            dimensions: GridDimensions { width, height },
        })
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    pub fn width(&self) -> u32 {
        self.dimensions.width
    }

    pub fn height(&self) -> u32 {
        self.dimensions.height
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height()
    }

    pub fn terrain_at(&self, x: i32, y: i32) -> Result<u16, GridError> {
        if !self.contains(x, y) {
            return Err(GridError::OutOfRange {
                x,
                y,
                width: self.width(),
                height: self.height(),
            });
        }
        Ok(parity_terrain(x, y))
    }

    pub fn clamp(&self, x: i32, y: i32) -> (i32, i32) {
        let max_x = self.width() as i32 - 1;
        let max_y = self.height() as i32 - 1;
        (x.clamp(0, max_x), y.clamp(0, max_y))
    }

    pub fn center(&self) -> (i32, i32) {
        ((self.width() / 2) as i32, (self.height() / 2) as i32)
    }

    /// Row-major walk over every cell with its terrain id.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, u16)> + '_ {
        let width = self.width() as i32;
        let height = self.height() as i32;
        (0..height).flat_map(move |y| {
            (0..width).map(move |x| (x, y, parity_terrain(x, y)))
        })
    }
}

fn parity_terrain(x: i32, y: i32) -> u16 {
    ((x as i64 + y as i64).rem_euclid(2)) as u16
}
