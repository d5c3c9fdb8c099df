mod layer;
mod renderer;
mod transform;

pub use layer::{ActorMarker, RenderBinding, ScreenRect, TileRect, VisibleCells, WorldLayer};
pub use renderer::{HeadlessBinding, Renderer};
pub use transform::{
    actor_anchor, cell_to_screen, compute_offset, Viewport, ViewportState, WorldOffset,
};
