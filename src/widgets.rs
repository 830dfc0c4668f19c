//! Non-colliding screen furniture: backgrounds and HUD counters.
//!
//! # Architecture
//!
//! - `Background`: one sprite stretched over its size, drawn at the back
//! - `NumberDisplay`: fixed-width decimal counter laid out right to left
//! - `LivesDisplay`: row of life icons
//! - `Widget`: the HUD kinds as one `GameObject` variant

use crate::entity::SCREEN_SIZE;
use crate::geometry::{Rect, Vector2};
use crate::object::Object;
use crate::render::Renderer;
use crate::sprite::{BACKGROUND_DEPTH, Sprite, SpriteAtlas};

#[derive(Debug, Clone, PartialEq)]
pub struct Background {
    pub object: Object,
    sprite: Sprite,
}

impl Background {
    /// A background centred on the screen.
    pub fn new(sprite: Sprite, size: Vector2) -> Self {
        Background {
            object: Object::new(SCREEN_SIZE / 2.0, size, false),
            sprite: Sprite {
                depth: BACKGROUND_DEPTH,
                ..sprite
            },
        }
    }

    pub fn draw(&self, renderer: &mut dyn Renderer) {
        self.sprite.draw(renderer, self.object.position, self.object.size, false);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigitColor {
    Yellow,
    Blue,
    White,
}

/// Equal-width cells across a box, `gap` pixels apart, rightmost cell first.
fn layout_cells(bounds: Rect, count: u8, gap: f32) -> (Vector2, Vec<Vector2>) {
    assert!(count > 0, "a display needs at least one cell");
    let count_f = f32::from(count);
    let size = bounds.dimensions();
    assert!(
        gap * (count_f - 1.0) < size.x,
        "gaps wider than the display box"
    );

    let cell = Vector2::new((size.x - gap * (count_f - 1.0)) / count_f, size.y);
    let centers = (0..count)
        .map(|i| {
            let from_left = f32::from(count - 1 - i);
            Vector2::new(
                bounds.top_left.x + from_left * (cell.x + gap) + cell.x / 2.0,
                bounds.top_left.y + cell.y / 2.0,
            )
        })
        .collect();
    (cell, centers)
}

/// Fixed-width decimal counter.
///
/// Leading zeros are not drawn, but at least the ones digit always is. Values
/// too wide for the display show as all nines.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberDisplay {
    pub object: Object,
    color: DigitColor,
    value: u32,
    digit_count: u8,
    gap: f32,
    digit_size: Vector2,
    /// Centre of each digit, ones digit first.
    digit_positions: Vec<Vector2>,
}

impl NumberDisplay {
    pub fn new(color: DigitColor, bounds: Rect, digit_count: u8, gap: f32) -> Self {
        let (digit_size, digit_positions) = layout_cells(bounds, digit_count, gap);
        NumberDisplay {
            object: Object::new(bounds.center(), bounds.dimensions(), false),
            color,
            value: 0,
            digit_count,
            gap,
            digit_size,
            digit_positions,
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn set_value(&mut self, value: u32) {
        self.value = value;
    }

    pub fn add(&mut self, amount: u32) {
        self.value = self.value.saturating_add(amount);
    }

    pub fn top_left(&self) -> Vector2 {
        self.object.bounds().top_left
    }

    /// Moves the display so its box starts at `top_left`.
    pub fn set_position(&mut self, top_left: Vector2) {
        let bounds = Rect::from_top_left(top_left, self.object.size);
        self.object.position = bounds.center();
        let (_, positions) = layout_cells(bounds, self.digit_count, self.gap);
        self.digit_positions = positions;
    }

    pub fn digit_positions(&self) -> &[Vector2] {
        &self.digit_positions
    }

    /// Digits to draw as (cell index, digit), most significant first.
    pub fn visible_digits(&self) -> Vec<(usize, u8)> {
        let max = 10u32.saturating_pow(u32::from(self.digit_count)).saturating_sub(1);
        let shown = self.value.min(max);

        let mut digits = Vec::new();
        for cell in (0..usize::from(self.digit_count)).rev() {
            let power = 10u32.pow(cell as u32);
            if shown < power && cell > 0 {
                continue;
            }
            digits.push((cell, ((shown / power) % 10) as u8));
        }
        digits
    }

    pub fn draw(&self, renderer: &mut dyn Renderer, atlas: &SpriteAtlas) {
        for (cell, digit) in self.visible_digits() {
            atlas
                .digit(self.color, digit)
                .draw(renderer, self.digit_positions[cell], self.digit_size, false);
        }
    }
}

/// Row of life icons showing how many lives are in reserve.
///
/// The count is stored as given; only the first `MAX_ICONS` are drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct LivesDisplay {
    pub object: Object,
    count: u8,
    icon_size: Vector2,
    /// Centre of each icon, rightmost first.
    icon_positions: Vec<Vector2>,
}

impl LivesDisplay {
    pub const MAX_ICONS: u8 = 5;

    pub fn new(bounds: Rect, gap: f32) -> Self {
        let (icon_size, icon_positions) = layout_cells(bounds, Self::MAX_ICONS, gap);
        LivesDisplay {
            object: Object::new(bounds.center(), bounds.dimensions(), false),
            count: 0,
            icon_size,
            icon_positions,
        }
    }

    pub fn count(&self) -> u8 {
        self.count
    }

    pub fn icons_shown(&self) -> u8 {
        self.count.min(Self::MAX_ICONS)
    }

    pub fn set_count(&mut self, count: u8) {
        self.count = count;
    }

    pub fn draw(&self, renderer: &mut dyn Renderer, atlas: &SpriteAtlas) {
        let slots = usize::from(Self::MAX_ICONS);
        for i in 0..usize::from(self.icons_shown()) {
            atlas
                .life_icon
                .draw(renderer, self.icon_positions[slots - 1 - i], self.icon_size, false);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    Number(NumberDisplay),
    Lives(LivesDisplay),
}

impl Widget {
    pub fn object(&self) -> &Object {
        match self {
            Widget::Number(n) => &n.object,
            Widget::Lives(l) => &l.object,
        }
    }

    pub fn object_mut(&mut self) -> &mut Object {
        match self {
            Widget::Number(n) => &mut n.object,
            Widget::Lives(l) => &mut l.object,
        }
    }

    pub fn as_number(&self) -> Option<&NumberDisplay> {
        match self {
            Widget::Number(n) => Some(n),
            Widget::Lives(_) => None,
        }
    }

    pub fn as_number_mut(&mut self) -> Option<&mut NumberDisplay> {
        match self {
            Widget::Number(n) => Some(n),
            Widget::Lives(_) => None,
        }
    }

    pub fn as_lives(&self) -> Option<&LivesDisplay> {
        match self {
            Widget::Lives(l) => Some(l),
            Widget::Number(_) => None,
        }
    }

    pub fn as_lives_mut(&mut self) -> Option<&mut LivesDisplay> {
        match self {
            Widget::Lives(l) => Some(l),
            Widget::Number(_) => None,
        }
    }

    pub fn draw(&self, renderer: &mut dyn Renderer, atlas: &SpriteAtlas) {
        match self {
            Widget::Number(n) => n.draw(renderer, atlas),
            Widget::Lives(l) => l.draw(renderer, atlas),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::DrawList;

    fn score_box() -> Rect {
        Rect::from_top_left(Vector2::new(100.0, 50.0), Vector2::new(100.0, 20.0))
    }

    #[test]
    fn test_digits_laid_out_right_to_left() {
        // 4 cells of 22 px with 4 px gaps
        let display = NumberDisplay::new(DigitColor::Yellow, score_box(), 4, 4.0);
        let positions = display.digit_positions();

        assert_eq!(positions[3], Vector2::new(111.0, 60.0));
        assert_eq!(positions[0], Vector2::new(189.0, 60.0));
        assert!(positions[0].x > positions[1].x);
    }

    #[test]
    fn test_leading_zeros_hidden() {
        let mut display = NumberDisplay::new(DigitColor::Yellow, score_box(), 4, 4.0);
        assert_eq!(display.visible_digits(), vec![(0, 0)]);

        display.set_value(305);
        assert_eq!(display.visible_digits(), vec![(2, 3), (1, 0), (0, 5)]);

        display.set_value(123_456);
        assert_eq!(display.visible_digits(), vec![(3, 9), (2, 9), (1, 9), (0, 9)]);
    }

    #[test]
    fn test_set_position_moves_digits() {
        let mut display = NumberDisplay::new(DigitColor::White, score_box(), 4, 4.0);
        display.set_position(Vector2::new(0.0, 0.0));

        assert_eq!(display.top_left(), Vector2::ZERO);
        assert_eq!(display.digit_positions()[3], Vector2::new(11.0, 10.0));
        assert_eq!(display.object.position, Vector2::new(50.0, 10.0));
    }

    #[test]
    fn test_number_draw_uses_color() {
        let atlas = SpriteAtlas::new();
        let mut display = NumberDisplay::new(DigitColor::White, score_box(), 4, 4.0);
        display.set_value(42);
        let mut list = DrawList::new();

        display.draw(&mut list, &atlas);

        assert_eq!(list.calls().len(), 2);
        assert_eq!(list.calls()[0].uv, atlas.digit(DigitColor::White, 4).uv);
        assert_eq!(list.calls()[1].uv, atlas.digit(DigitColor::White, 2).uv);
        assert_eq!(list.calls()[1].dimensions, Vector2::new(22.0, 20.0));
    }

    #[test]
    fn test_lives_display_clamps_only_when_drawn() {
        let atlas = SpriteAtlas::new();
        let mut lives = LivesDisplay::new(score_box(), 4.0);
        lives.set_count(6);
        assert_eq!(lives.count(), 6);
        assert_eq!(lives.icons_shown(), LivesDisplay::MAX_ICONS);

        let mut list = DrawList::new();
        lives.draw(&mut list, &atlas);
        assert_eq!(list.calls().len(), 5);
    }

    #[test]
    fn test_lives_display_draws_from_left() {
        let atlas = SpriteAtlas::new();
        let mut lives = LivesDisplay::new(score_box(), 4.0);
        lives.set_count(2);

        let mut list = DrawList::new();
        lives.draw(&mut list, &atlas);
        assert_eq!(list.calls().len(), 2);
        // five 16.8 px cells, first icon in the leftmost one
        assert!((list.calls()[0].position.x - 108.4).abs() < 1e-3);
        assert!(list.calls()[1].position.x > list.calls()[0].position.x);
    }

    #[test]
    fn test_background_centred_at_the_back() {
        let atlas = SpriteAtlas::new();
        let background = Background::new(atlas.hiscores_background, Vector2::new(510.0, 120.0));
        let mut list = DrawList::new();

        background.draw(&mut list);

        assert_eq!(list.calls()[0].position, Vector2::new(512.0, 384.0));
        assert_eq!(list.calls()[0].depth, BACKGROUND_DEPTH);
    }
}
