use std::convert::Infallible;
use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture, TextureError};
use tracing::debug;
use winit::window::Window;

use crate::grid::{TERRAIN_DIRT, TERRAIN_GRASS};

use super::{RenderBinding, ScreenRect, Viewport, WorldLayer, WorldOffset};

const CLEAR_COLOR: [u8; 4] = [0x22, 0x22, 0x22, 0xff];
const TILE_GRASS_COLOR: [u8; 4] = [0x88, 0xcc, 0x88, 0xff];
const TILE_DIRT_COLOR: [u8; 4] = [0xcc, 0xb9, 0x7e, 0xff];
const TILE_UNKNOWN_COLOR: [u8; 4] = [0x44, 0x4a, 0x3e, 0xff];
const CENTER_MARKER_COLOR: [u8; 4] = [0xf0, 0xd8, 0x50, 0xff];
const ACTOR_COLOR: [u8; 4] = [0x33, 0x66, 0xff, 0xff];
const CENTER_MARKER_INSET_PX: i32 = 4;

pub struct Renderer {
    pixels: Pixels<'static>,
    viewport: Viewport,
    layer: Option<WorldLayer>,
    world_offset: WorldOffset,
}

impl Renderer {
    pub fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let surface = SurfaceTexture::new(size.width, size.height, window);
        let pixels = Pixels::new(size.width.max(1), size.height.max(1), surface)?;
        Ok(Self {
            pixels,
            viewport: Viewport {
                width: size.width,
                height: size.height,
            },
            layer: None,
            world_offset: WorldOffset::default(),
        })
    }

    pub fn render(&mut self) -> Result<(), Error> {
        if !self.viewport.is_drawable() {
            return Ok(());
        }
        let frame = self.pixels.frame_mut();
        paint_frame(frame, self.viewport, self.layer.as_ref(), self.world_offset);
        self.pixels.render()
    }
}

impl RenderBinding for Renderer {
    type Error = TextureError;

    fn build_world_layer(&mut self, layer: &WorldLayer) {
        self.layer = Some(layer.clone());
    }

    fn set_world_offset(&mut self, offset: WorldOffset) {
        self.world_offset = offset;
    }

    fn resize_surface(&mut self, viewport: Viewport) -> Result<(), TextureError> {
        if !viewport.is_drawable() || viewport == self.viewport {
            return Ok(());
        }
        self.pixels.resize_surface(viewport.width, viewport.height)?;
        self.pixels.resize_buffer(viewport.width, viewport.height)?;
        self.viewport = viewport;
        debug!(
            width = viewport.width,
            height = viewport.height,
            "surface_resized"
        );
        Ok(())
    }
}

/// Binding that only remembers what it was told. Useful headless.
#[derive(Debug, Default, Clone)]
pub struct HeadlessBinding {
    pub layer: Option<WorldLayer>,
    pub offsets: Vec<WorldOffset>,
    pub viewports: Vec<Viewport>,
}

impl RenderBinding for HeadlessBinding {
    type Error = Infallible;

    fn build_world_layer(&mut self, layer: &WorldLayer) {
        self.layer = Some(layer.clone());
    }

    fn set_world_offset(&mut self, offset: WorldOffset) {
        self.offsets.push(offset);
    }

    fn resize_surface(&mut self, viewport: Viewport) -> Result<(), Infallible> {
        self.viewports.push(viewport);
        Ok(())
    }
}

pub(crate) fn paint_frame(
    frame: &mut [u8],
    viewport: Viewport,
    layer: Option<&WorldLayer>,
    offset: WorldOffset,
) {
    for chunk in frame.chunks_exact_mut(4) {
        chunk.copy_from_slice(&CLEAR_COLOR);
    }
    let Some(layer) = layer else {
        return;
    };

    for tile in layer.visible_tiles(offset, viewport) {
        fill_rect_clipped(
            frame,
            viewport,
            translate(tile.rect, offset),
            tile_color(tile.terrain),
        );
    }

    draw_rect_outline_clipped(
        frame,
        viewport,
        translate(layer.center_marker(), offset),
        CENTER_MARKER_INSET_PX,
        CENTER_MARKER_COLOR,
    );

    // The actor is not part of the scrolled layer.
    let (cx, cy) = viewport.center();
    fill_circle_clipped(frame, viewport, cx, cy, layer.actor_marker().radius, ACTOR_COLOR);
}

fn tile_color(terrain: u16) -> [u8; 4] {
    match terrain {
        TERRAIN_GRASS => TILE_GRASS_COLOR,
        TERRAIN_DIRT => TILE_DIRT_COLOR,
        _ => TILE_UNKNOWN_COLOR,
    }
}

fn translate(rect: ScreenRect, offset: WorldOffset) -> ScreenRect {
    ScreenRect {
        x: rect.x + offset.x,
        y: rect.y + offset.y,
        ..rect
    }
}

/// Edges are rounded independently so adjacent tiles share edges.
fn rect_edges_px(rect: ScreenRect) -> (i32, i32, i32, i32) {
    (
        rect.x.round() as i32,
        (rect.x + rect.width).round() as i32,
        rect.y.round() as i32,
        (rect.y + rect.height).round() as i32,
    )
}

fn fill_rect_clipped(frame: &mut [u8], viewport: Viewport, rect: ScreenRect, color: [u8; 4]) {
    let (left, right, top, bottom) = rect_edges_px(rect);
    let left = left.max(0);
    let top = top.max(0);
    let right = right.min(viewport.width as i32);
    let bottom = bottom.min(viewport.height as i32);
    for y in top..bottom {
        for x in left..right {
            write_pixel_rgba_clipped(frame, viewport.width as usize, x, y, color);
        }
    }
}

fn draw_rect_outline_clipped(
    frame: &mut [u8],
    viewport: Viewport,
    rect: ScreenRect,
    inset: i32,
    color: [u8; 4],
) {
    let (left, right, top, bottom) = rect_edges_px(rect);
    let left = left + inset;
    let top = top + inset;
    let right = right - inset - 1;
    let bottom = bottom - inset - 1;
    if left > right || top > bottom {
        return;
    }

    let width = viewport.width as i32;
    let height = viewport.height as i32;
    for x in left..=right {
        if x < 0 || x >= width {
            continue;
        }
        write_pixel_rgba_clipped(frame, viewport.width as usize, x, top, color);
        write_pixel_rgba_clipped(frame, viewport.width as usize, x, bottom, color);
    }
    for y in top..=bottom {
        if y < 0 || y >= height {
            continue;
        }
        write_pixel_rgba_clipped(frame, viewport.width as usize, left, y, color);
        write_pixel_rgba_clipped(frame, viewport.width as usize, right, y, color);
    }
}

fn fill_circle_clipped(
    frame: &mut [u8],
    viewport: Viewport,
    center_x: f32,
    center_y: f32,
    radius: f32,
    color: [u8; 4],
) {
    if !radius.is_finite() || radius <= 0.0 {
        return;
    }
    let radius_sq = radius * radius;
    let x_min = ((center_x - radius).floor() as i32).max(0);
    let x_max = ((center_x + radius).ceil() as i32).min(viewport.width as i32 - 1);
    let y_min = ((center_y - radius).floor() as i32).max(0);
    let y_max = ((center_y + radius).ceil() as i32).min(viewport.height as i32 - 1);

    for y in y_min..=y_max {
        for x in x_min..=x_max {
            let dx = x as f32 + 0.5 - center_x;
            let dy = y as f32 + 0.5 - center_y;
            if dx * dx + dy * dy <= radius_sq {
                write_pixel_rgba_clipped(frame, viewport.width as usize, x, y, color);
            }
        }
    }
}

fn write_pixel_rgba_clipped(frame: &mut [u8], width: usize, x: i32, y: i32, color: [u8; 4]) {
    if x < 0 || y < 0 || x as usize >= width {
        return;
    }
    let x = x as usize;
    let y = y as usize;
    let Some(pixel_offset) = y.checked_mul(width).and_then(|row| row.checked_add(x)) else {
        return;
    };
    let Some(byte_offset) = pixel_offset.checked_mul(4) else {
        return;
    };
    let Some(end) = byte_offset.checked_add(4) else {
        return;
    };
    if end > frame.len() {
        return;
    }
    frame[byte_offset..end].copy_from_slice(&color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::rendering::compute_offset;
    use crate::grid::GridModel;

    fn blank_frame(viewport: Viewport) -> Vec<u8> {
        vec![0; viewport.width as usize * viewport.height as usize * 4]
    }

    fn pixel_at(frame: &[u8], viewport: Viewport, x: u32, y: u32) -> [u8; 4] {
        let start = (y as usize * viewport.width as usize + x as usize) * 4;
        let mut pixel = [0; 4];
        pixel.copy_from_slice(&frame[start..start + 4]);
        pixel
    }

    fn layer_for(width: u32, height: u32, cell_size: f32) -> WorldLayer {
        let grid = GridModel::new(width, height).expect("grid");
        WorldLayer::from_grid(&grid, cell_size)
    }

    #[test]
    fn renderer_type_is_non_generic() {
        fn assert_binding<T: RenderBinding>() {}
        assert_binding::<Renderer>();
    }

    #[test]
    fn frame_without_layer_is_cleared() {
        let viewport = Viewport {
            width: 8,
            height: 4,
        };
        let mut frame = blank_frame(viewport);
        paint_frame(&mut frame, viewport, None, WorldOffset::default());
        assert!(frame.chunks_exact(4).all(|chunk| chunk == CLEAR_COLOR));
    }

    #[test]
    fn actor_is_painted_at_viewport_center_and_tiles_scroll() {
        let viewport = Viewport {
            width: 200,
            height: 150,
        };
        let layer = layer_for(10, 10, 20.0);
        let offset = compute_offset((2, 2), viewport, 20.0);
        let mut frame = blank_frame(viewport);

        paint_frame(&mut frame, viewport, Some(&layer), offset);

        assert_eq!(pixel_at(&frame, viewport, 100, 75), ACTOR_COLOR);
        assert_eq!(pixel_at(&frame, viewport, 0, 0), CLEAR_COLOR);
        assert_eq!(pixel_at(&frame, viewport, 60, 30), TILE_GRASS_COLOR);
        assert_eq!(pixel_at(&frame, viewport, 80, 30), TILE_DIRT_COLOR);
    }

    #[test]
    fn large_map_paints_only_the_cells_around_the_actor() {
        let viewport = Viewport {
            width: 96,
            height: 96,
        };
        let layer = layer_for(4096, 4096, 48.0);
        let offset = compute_offset((2048, 2048), viewport, 48.0);
        let mut frame = blank_frame(viewport);

        paint_frame(&mut frame, viewport, Some(&layer), offset);

        assert_eq!(pixel_at(&frame, viewport, 48, 48), ACTOR_COLOR);
        // (2047, 2047) starts at pixel 0 with this offset.
        assert_eq!(pixel_at(&frame, viewport, 0, 0), TILE_GRASS_COLOR);
        assert_eq!(pixel_at(&frame, viewport, 95, 0), TILE_DIRT_COLOR);
        assert!(frame.chunks_exact(4).all(|chunk| chunk != CLEAR_COLOR));
    }

    #[test]
    fn center_marker_outline_is_drawn_inside_center_cell() {
        let viewport = Viewport {
            width: 200,
            height: 200,
        };
        let layer = layer_for(10, 10, 20.0);
        let mut frame = blank_frame(viewport);

        paint_frame(&mut frame, viewport, Some(&layer), WorldOffset::default());

        let right_edge = 120 - CENTER_MARKER_INSET_PX as u32 - 1;
        assert_eq!(
            pixel_at(&frame, viewport, right_edge, 110),
            CENTER_MARKER_COLOR
        );
        assert_eq!(pixel_at(&frame, viewport, 110, 110), TILE_GRASS_COLOR);
    }

    #[test]
    fn primitives_clip_to_frame_without_panic() {
        let viewport = Viewport {
            width: 3,
            height: 2,
        };
        let layer = layer_for(4, 4, 48.0);
        let mut frame = blank_frame(viewport);
        paint_frame(
            &mut frame,
            viewport,
            Some(&layer),
            WorldOffset {
                x: -1000.5,
                y: 7000.25,
            },
        );
        fill_circle_clipped(&mut frame, viewport, -5.0, -5.0, 100.0, ACTOR_COLOR);
        write_pixel_rgba_clipped(&mut frame, 3, 3, 0, ACTOR_COLOR);
        assert_eq!(frame.len(), 24);
    }

    #[test]
    fn adjacent_tiles_share_edges_at_fractional_offsets() {
        let viewport = Viewport {
            width: 64,
            height: 16,
        };
        let layer = layer_for(4, 1, 16.0);
        let mut frame = blank_frame(viewport);
        paint_frame(
            &mut frame,
            viewport,
            Some(&layer),
            WorldOffset { x: 0.5, y: 0.0 },
        );
        for x in 1..64 {
            assert_ne!(pixel_at(&frame, viewport, x, 0), CLEAR_COLOR, "gap at x={x}");
        }
    }

    #[test]
    fn headless_binding_records_commands() {
        let mut binding = HeadlessBinding::default();
        let layer = layer_for(2, 2, 10.0);
        binding.build_world_layer(&layer);
        binding.set_world_offset(WorldOffset { x: 1.0, y: 2.0 });
        binding
            .resize_surface(Viewport {
                width: 5,
                height: 6,
            })
            .expect("resize");
        assert_eq!(binding.layer.as_ref(), Some(&layer));
        assert_eq!(binding.offsets, vec![WorldOffset { x: 1.0, y: 2.0 }]);
        assert_eq!(binding.viewports.len(), 1);
    }
}
