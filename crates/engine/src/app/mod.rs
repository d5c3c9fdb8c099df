mod input;
mod loop_runner;
mod rendering;
mod session;

pub use input::{InputAction, InputRouter, KeyOutcome};
pub use loop_runner::{run_app, AppError};
pub use rendering::{
    actor_anchor, cell_to_screen, compute_offset, ActorMarker, HeadlessBinding, RenderBinding,
    Renderer, ScreenRect, TileRect, Viewport, ViewportState, VisibleCells, WorldLayer,
    WorldOffset,
};
pub use session::ViewerSession;
