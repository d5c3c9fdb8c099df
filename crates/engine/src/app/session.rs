use tracing::{debug, info};

use crate::actor::ActorState;

use super::input::{InputRouter, KeyOutcome};
use super::rendering::{RenderBinding, Viewport, ViewportState, WorldLayer, WorldOffset};

/// Ties the router, the viewport and an optional render binding together.
/// Every actor or viewport change pushes a freshly computed offset to the
/// binding; nothing is patched incrementally.
pub struct ViewerSession<B: RenderBinding> {
    router: InputRouter,
    viewport: ViewportState,
    layer: WorldLayer,
    binding: Option<B>,
}

impl<B: RenderBinding> ViewerSession<B> {
    pub fn new(router: InputRouter, cell_size: f32) -> Self {
        let layer = WorldLayer::from_grid(router.grid(), cell_size);
        info!(
            tiles = layer.tile_count(),
            cell_size,
            "world_layer_built"
        );
        Self {
            router,
            viewport: ViewportState::new(cell_size),
            layer,
            binding: None,
        }
    }

    pub fn actor(&self) -> ActorState {
        self.router.actor()
    }

    pub fn layer(&self) -> &WorldLayer {
        &self.layer
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport.viewport()
    }

    /// `None` while no drawable surface exists.
    pub fn world_offset(&self) -> Option<WorldOffset> {
        self.viewport.offset_for(&self.router.actor())
    }

    pub fn binding(&self) -> Option<&B> {
        self.binding.as_ref()
    }

    pub fn binding_mut(&mut self) -> Option<&mut B> {
        self.binding.as_mut()
    }

    pub fn attach_binding(&mut self, mut binding: B) -> Result<(), B::Error> {
        binding.build_world_layer(&self.layer);
        if let Some(viewport) = self.viewport.viewport() {
            binding.resize_surface(viewport)?;
        }
        if let Some(offset) = self.world_offset() {
            binding.set_world_offset(offset);
        }
        self.binding = Some(binding);
        Ok(())
    }

    pub fn handle_key(&mut self, key: &str) -> KeyOutcome {
        let outcome = self.router.handle_key(key);
        if outcome.moved_state().is_some() {
            self.push_offset();
        }
        outcome
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<Option<WorldOffset>, B::Error> {
        let Some(viewport) = self.viewport.resize(width, height) else {
            debug!(width, height, "viewport_unavailable");
            return Ok(None);
        };
        if let Some(binding) = self.binding.as_mut() {
            binding.resize_surface(viewport)?;
        }
        let offset = self.push_offset();
        info!(
            width,
            height,
            offset_x = offset.map(|offset| offset.x),
            offset_y = offset.map(|offset| offset.y),
            "viewport_resized"
        );
        Ok(offset)
    }

    fn push_offset(&mut self) -> Option<WorldOffset> {
        let offset = self.world_offset()?;
        if let Some(binding) = self.binding.as_mut() {
            binding.set_world_offset(offset);
        }
        Some(offset)
    }
}
