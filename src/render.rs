//! Drawing seam between the simulation and whatever puts pixels on screen.
//!
//! # Architecture
//!
//! - `Renderer` trait: the only drawing interface game objects see
//! - `DrawList`: a `Renderer` that records calls so a frontend (or a test) can
//!   replay them sorted by depth
//! - `draw_wrapped()`: sprite drawing with a duplicate on the far edge for
//!   objects straddling the horizontal world boundary
//!
//! Depth runs from -1.0 (back) to 1.0 (front). Calls with equal depth keep
//! submission order.

use crate::geometry::{Rect, Vector2};
use crate::sprite::{SheetId, Sprite};

pub trait Renderer {
    /// Draws the `uv` region of `sheet` centred on `position`.
    ///
    /// `mirror` flips the image horizontally.
    fn draw_sprite(
        &mut self,
        sheet: SheetId,
        uv: Rect,
        position: Vector2,
        dimensions: Vector2,
        mirror: bool,
        depth: f32,
    );

    /// Debug outline of a collision box. Ignored unless a renderer cares.
    fn draw_outline(&mut self, _bounds: Rect) {}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub sheet: SheetId,
    pub uv: Rect,
    pub position: Vector2,
    pub dimensions: Vector2,
    pub mirror: bool,
    pub depth: f32,
}

impl DrawCall {
    /// Screen rectangle covered by this call.
    pub fn destination(&self) -> Rect {
        Rect::from_center(self.position, self.dimensions)
    }
}

/// Records one frame of draw calls.
#[derive(Debug, Default)]
pub struct DrawList {
    calls: Vec<DrawCall>,
    outlines: Vec<Rect>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
        self.outlines.clear();
    }

    /// Calls in submission order.
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn outlines(&self) -> &[Rect] {
        &self.outlines
    }

    /// Calls sorted back to front (painter's algorithm).
    ///
    /// `sort_by` is stable, so equal depths keep submission order.
    pub fn sorted(&self) -> Vec<&DrawCall> {
        let mut sorted: Vec<&DrawCall> = self.calls.iter().collect();
        sorted.sort_by(|a, b| a.depth.total_cmp(&b.depth));
        sorted
    }
}

impl Renderer for DrawList {
    fn draw_sprite(
        &mut self,
        sheet: SheetId,
        uv: Rect,
        position: Vector2,
        dimensions: Vector2,
        mirror: bool,
        depth: f32,
    ) {
        self.calls.push(DrawCall {
            sheet,
            uv,
            position,
            dimensions,
            mirror,
            depth,
        });
    }

    fn draw_outline(&mut self, bounds: Rect) {
        self.outlines.push(bounds);
    }
}

/// Draws `sprite` over `bounds`, plus a second copy on the opposite side of
/// `world` when `bounds` sticks out past the left or right edge.
pub fn draw_wrapped(renderer: &mut dyn Renderer, sprite: &Sprite, bounds: Rect, world: Rect, mirror: bool) {
    let position = bounds.center();
    let dimensions = bounds.dimensions();
    sprite.draw(renderer, position, dimensions, mirror);

    let half_width = dimensions.x / 2.0;
    if bounds.top_left.x < world.top_left.x {
        let overhang = world.top_left.x - bounds.top_left.x;
        let wrapped = Vector2::new(world.bot_right.x + (half_width - overhang), position.y);
        sprite.draw(renderer, wrapped, dimensions, mirror);
    } else if bounds.bot_right.x > world.bot_right.x {
        let overhang = bounds.bot_right.x - world.bot_right.x;
        let wrapped = Vector2::new(world.top_left.x - (half_width - overhang), position.y);
        sprite.draw(renderer, wrapped, dimensions, mirror);
    }
}
