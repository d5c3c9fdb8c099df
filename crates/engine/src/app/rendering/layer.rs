use crate::grid::GridModel;

use super::{Viewport, WorldOffset};

const ACTOR_RADIUS_DIVISOR: f32 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ScreenRect {
    pub fn for_cell(cell: (i32, i32), cell_size: f32) -> Self {
        Self {
            x: cell.0 as f32 * cell_size,
            y: cell.1 as f32 * cell_size,
            width: cell_size,
            height: cell_size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileRect {
    pub cell: (i32, i32),
    pub terrain: u16,
    pub rect: ScreenRect,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorMarker {
    pub radius: f32,
}

/// Inclusive cell range that intersects the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleCells {
    pub x_min: i32,
    pub x_max: i32,
    pub y_min: i32,
    pub y_max: i32,
}

/// Everything drawn inside the scrolled layer, in layer-local pixels.
/// Tiles are derived from the grid on demand so the layer stays the same
/// size for any map; only its translation changes after it is built.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldLayer {
    grid: GridModel,
    cell_size: f32,
    center_marker: ScreenRect,
    actor_marker: ActorMarker,
}

impl WorldLayer {
    pub fn from_grid(grid: &GridModel, cell_size: f32) -> Self {
        Self {
            grid: *grid,
            cell_size,
            center_marker: ScreenRect::for_cell(grid.center(), cell_size),
            actor_marker: ActorMarker {
                radius: cell_size / ACTOR_RADIUS_DIVISOR,
            },
        }
    }

    pub fn tile_count(&self) -> u64 {
        self.grid.width() as u64 * self.grid.height() as u64
    }

    /// Every tile in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = TileRect> + '_ {
        self.grid
            .cells()
            .map(|(x, y, terrain)| self.tile_rect((x, y), terrain))
    }

    /// Cells whose rects overlap the viewport once `offset` is applied, or
    /// `None` when the layer is scrolled fully out of view.
    pub fn visible_cells(&self, offset: WorldOffset, viewport: Viewport) -> Option<VisibleCells> {
        if !viewport.is_drawable() || !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return None;
        }
        let left = -offset.x / self.cell_size;
        let right = (viewport.width as f32 - offset.x) / self.cell_size;
        let top = -offset.y / self.cell_size;
        let bottom = (viewport.height as f32 - offset.y) / self.cell_size;

        let x_min = (left.floor() as i32).max(0);
        let x_max = (right.ceil() as i32)
            .saturating_sub(1)
            .min(self.grid.width() as i32 - 1);
        let y_min = (top.floor() as i32).max(0);
        let y_max = (bottom.ceil() as i32)
            .saturating_sub(1)
            .min(self.grid.height() as i32 - 1);
        if x_min > x_max || y_min > y_max {
            return None;
        }
        Some(VisibleCells {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    pub fn visible_tiles(
        &self,
        offset: WorldOffset,
        viewport: Viewport,
    ) -> impl Iterator<Item = TileRect> + '_ {
        self.visible_cells(offset, viewport)
            .into_iter()
            .flat_map(move |cells| {
                (cells.y_min..=cells.y_max).flat_map(move |y| {
                    (cells.x_min..=cells.x_max).filter_map(move |x| {
                        let terrain = self.grid.terrain_at(x, y).ok()?;
                        Some(self.tile_rect((x, y), terrain))
                    })
                })
            })
    }

    pub fn center_marker(&self) -> ScreenRect {
        self.center_marker
    }

    pub fn actor_marker(&self) -> ActorMarker {
        self.actor_marker
    }

    fn tile_rect(&self, cell: (i32, i32), terrain: u16) -> TileRect {
        TileRect {
            cell,
            terrain,
            rect: ScreenRect::for_cell(cell, self.cell_size),
        }
    }
}

/// Surface that paints the world layer. It receives values only; the core
/// never holds drawable handles.
pub trait RenderBinding {
    type Error: std::error::Error + 'static;

    fn build_world_layer(&mut self, layer: &WorldLayer);
    fn set_world_offset(&mut self, offset: WorldOffset);
    fn resize_surface(&mut self, viewport: Viewport) -> Result<(), Self::Error>;
}
