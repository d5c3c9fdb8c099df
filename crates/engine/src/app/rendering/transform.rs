use crate::actor::ActorState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn is_drawable(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width as f32 * 0.5, self.height as f32 * 0.5)
    }
}

/// Translation applied to the whole world layer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WorldOffset {
    pub x: f32,
    pub y: f32,
}

pub fn compute_offset(actor_cell: (i32, i32), viewport: Viewport, cell_size: f32) -> WorldOffset {
    let (center_x, center_y) = viewport.center();
    let half_cell = cell_size * 0.5;
    WorldOffset {
        x: -(actor_cell.0 as f32 * cell_size) + center_x - half_cell,
        y: -(actor_cell.1 as f32 * cell_size) + center_y - half_cell,
    }
}

/// Top-left corner of a grid cell on screen once `offset` is applied.
pub fn cell_to_screen(cell: (i32, i32), offset: WorldOffset, cell_size: f32) -> (f32, f32) {
    (
        cell.0 as f32 * cell_size + offset.x,
        cell.1 as f32 * cell_size + offset.y,
    )
}

/// Fixed on-screen top-left of the actor's cell.
pub fn actor_anchor(viewport: Viewport, cell_size: f32) -> (f32, f32) {
    let (center_x, center_y) = viewport.center();
    (center_x - cell_size * 0.5, center_y - cell_size * 0.5)
}

/// Current surface size, if a surface exists. Offsets are derived on
/// demand and never cached.
#[derive(Debug, Clone, Copy)]
pub struct ViewportState {
    viewport: Option<Viewport>,
    cell_size: f32,
}

impl ViewportState {
    pub fn new(cell_size: f32) -> Self {
        Self {
            viewport: None,
            cell_size,
        }
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// A zero-sized surface (minimized window) counts as no surface.
    pub fn resize(&mut self, width: u32, height: u32) -> Option<Viewport> {
        let viewport = Viewport { width, height };
        self.viewport = viewport.is_drawable().then_some(viewport);
        self.viewport
    }

    pub fn offset_for(&self, actor: &ActorState) -> Option<WorldOffset> {
        self.viewport
            .map(|viewport| compute_offset(actor.cell(), viewport, self.cell_size))
    }
}
