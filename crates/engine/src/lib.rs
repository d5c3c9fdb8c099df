pub mod actor;
pub mod app;
pub mod config;
pub mod grid;
pub mod report;

pub use actor::{Actor, ActorState, Facing, MoveOutcome, DEFAULT_FACING};
pub use app::{
    actor_anchor, cell_to_screen, compute_offset, run_app, ActorMarker, AppError,
    HeadlessBinding, InputAction, InputRouter, KeyOutcome, RenderBinding, Renderer, ScreenRect,
    TileRect, Viewport, ViewerSession, ViewportState, VisibleCells, WorldLayer, WorldOffset,
};
pub use config::{ConfigError, ViewerConfig, MAX_MAP_DIMENSION};
pub use grid::{GridDimensions, GridError, GridModel, TERRAIN_DIRT, TERRAIN_GRASS};
pub use report::{
    parse_decision_response, DecisionReporter, DecisionResponse, HttpDecisionReporter,
    RecordingReporter, ReportError, ReportMetricsHandle, ReportMetricsSnapshot,
};
