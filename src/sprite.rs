//! Sprite sheet regions and the animation strips built from them.
//!
//! # Architecture
//!
//! - `SheetRegion`: pixel bounds as authored against the sheet image, with rows
//!   counted from the bottom of the image
//! - `Sprite`: one region converted to a y-down UV rectangle plus a draw depth
//! - `Animation`: a horizontal strip of equally sized frames
//! - `SpriteAtlas`: every sprite and animation the game draws, built once
//!
//! Sheet regions are flipped to y-down exactly once, in `Sprite::from_region`.
//! Everything downstream of the atlas uses the screen-space `Rect` convention.

use crate::animation::AnimationState;
use crate::enemy::EnemyKind;
use crate::geometry::{Rect, Vector2};
use crate::render::Renderer;
use crate::widgets::DigitColor;
use serde::{Deserialize, Serialize};

/// The two sprite sheet images the game draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SheetId {
    Title,
    Main,
}

impl SheetId {
    pub fn pixel_size(self) -> Vector2 {
        match self {
            SheetId::Title => Vector2::new(302.0, 255.0),
            SheetId::Main => Vector2::new(1353.0, 1269.0),
        }
    }
}

/// Pixel bounds on a sheet, rows counted upward from the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetRegion {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl SheetRegion {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        SheetRegion {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub sheet: SheetId,
    /// Normalised, y-down source rectangle.
    pub uv: Rect,
    pub depth: f32,
}

impl Sprite {
    pub fn from_region(sheet: SheetId, region: SheetRegion, depth: f32) -> Self {
        let size = sheet.pixel_size();
        let uv = Rect::new(
            Vector2::new(region.left / size.x, 1.0 - region.top / size.y),
            Vector2::new(region.right / size.x, 1.0 - region.bottom / size.y),
        );
        Sprite { sheet, uv, depth }
    }

    /// Source size in sheet pixels.
    pub fn pixel_size(&self) -> Vector2 {
        let sheet = self.sheet.pixel_size();
        let uv = self.uv.dimensions();
        Vector2::new(uv.x * sheet.x, uv.y * sheet.y)
    }

    pub fn draw(&self, renderer: &mut dyn Renderer, position: Vector2, dimensions: Vector2, mirror: bool) {
        renderer.draw_sprite(self.sheet, self.uv, position, dimensions, mirror, self.depth);
    }
}

/// A horizontal strip of frames on one sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    frames: Vec<Sprite>,
}

impl Animation {
    /// Builds `frame_count` frames laid out left to right, starting at `first`,
    /// with `gap` pixels between neighbours.
    pub fn strip(sheet: SheetId, first: SheetRegion, frame_count: u8, gap: f32, depth: f32) -> Self {
        assert!(frame_count > 0, "animation strip needs at least one frame");
        let step = first.width() + gap;
        let frames = (0..frame_count)
            .map(|i| {
                let offset = step * f32::from(i);
                let region = SheetRegion::new(first.left + offset, first.top, first.right + offset, first.bottom);
                Sprite::from_region(sheet, region, depth)
            })
            .collect();
        Animation { frames }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// # Panics
    ///
    /// When `index` is past the last frame.
    pub fn frame(&self, index: u8) -> &Sprite {
        let index = usize::from(index);
        assert!(
            index < self.frames.len(),
            "frame {} out of range for a {}-frame animation",
            index,
            self.frames.len()
        );
        &self.frames[index]
    }
}

/// One animation per state for a rider.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationSet {
    pub idle: Animation,
    pub running: Animation,
    pub run_slowing: Animation,
    pub flying: Animation,
}

impl AnimationSet {
    pub fn get(&self, state: AnimationState) -> &Animation {
        match state {
            AnimationState::Idle => &self.idle,
            AnimationState::Running => &self.running,
            AnimationState::RunSlowing => &self.run_slowing,
            AnimationState::Flying => &self.flying,
        }
    }
}

/// Layout of a rider's four animation strips on the main sheet.
struct RiderStrips {
    idle: SheetRegion,
    idle_frames: u8,
    running: SheetRegion,
    running_gap: f32,
    run_slowing: SheetRegion,
    flying: SheetRegion,
    flying_gap: f32,
}

impl RiderStrips {
    fn build(&self) -> AnimationSet {
        let main = SheetId::Main;
        AnimationSet {
            idle: Animation::strip(main, self.idle, self.idle_frames, 0.0, 0.0),
            running: Animation::strip(main, self.running, 4, self.running_gap, 0.0),
            run_slowing: Animation::strip(main, self.run_slowing, 1, 0.0, 0.0),
            flying: Animation::strip(main, self.flying, 2, self.flying_gap, 0.0),
        }
    }
}

const PLAYER_STRIPS: RiderStrips = RiderStrips {
    idle: SheetRegion::new(745.0, 1136.0, 781.7, 1084.0),
    idle_frames: 1,
    running: SheetRegion::new(745.0, 1076.0, 781.5, 1024.0),
    running_gap: 8.5,
    run_slowing: SheetRegion::new(745.0, 1016.0, 782.0, 970.0),
    flying: SheetRegion::new(745.0, 962.0, 782.0, 928.0),
    flying_gap: 7.5,
};

const BOUNDER_STRIPS: RiderStrips = RiderStrips {
    idle: SheetRegion::new(744.0, 686.0, 782.0, 633.0),
    idle_frames: 1,
    running: SheetRegion::new(745.0, 686.0, 782.0, 634.0),
    running_gap: 8.0,
    run_slowing: SheetRegion::new(880.0, 746.0, 917.0, 694.0),
    flying: SheetRegion::new(745.0, 626.0, 782.0, 591.5),
    flying_gap: 7.5,
};

const HUNTER_STRIPS: RiderStrips = RiderStrips {
    idle: SheetRegion::new(975.0, 615.0, 1013.0, 562.0),
    idle_frames: 1,
    running: SheetRegion::new(976.5, 615.0, 1013.0, 563.0),
    running_gap: 8.25,
    run_slowing: SheetRegion::new(1111.0, 557.0, 1148.0, 505.0),
    flying: SheetRegion::new(976.5, 555.0, 1013.0, 521.0),
    flying_gap: 7.75,
};

const SHADOW_LORD_STRIPS: RiderStrips = RiderStrips {
    idle: SheetRegion::new(975.0, 496.0, 1013.0, 443.0),
    idle_frames: 1,
    running: SheetRegion::new(976.5, 496.0, 1013.0, 444.0),
    running_gap: 8.25,
    run_slowing: SheetRegion::new(1111.0, 437.0, 1148.0, 385.0),
    flying: SheetRegion::new(976.5, 436.0, 1013.0, 402.0),
    flying_gap: 7.75,
};

const TITLE_BACKGROUND: SheetRegion = SheetRegion::new(0.0, 254.0, 301.0, 0.0);
const WAVE_BACKGROUND: SheetRegion = SheetRegion::new(6.0, 1136.0, 713.0, 555.0);
const HISCORES_BACKGROUND: SheetRegion = SheetRegion::new(6.0, 1262.0, 515.0, 1144.0);

const DIGIT_SPACING: f32 = 18.0;
const YELLOW_ZERO: SheetRegion = SheetRegion::new(6.7, 371.0, 20.0, 352.0);
const BLUE_ZERO: SheetRegion = SheetRegion::new(6.7, 344.0, 20.0, 325.0);
const WHITE_ZERO: SheetRegion = SheetRegion::new(6.7, 317.0, 20.0, 298.0);
const LIFE_ICON: SheetRegion = SheetRegion::new(195.5, 371.0, 209.0, 352.0);

const WORD_WAVE: SheetRegion = SheetRegion::new(6.0, 188.0, 80.0, 168.5);
const WORD_PREPARE_TO_JOUST: SheetRegion = SheetRegion::new(6.0, 161.0, 290.0, 141.0);

pub const BACKGROUND_DEPTH: f32 = -0.99;
pub const WORD_DEPTH: f32 = 0.99;

/// Every sprite the game draws.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteAtlas {
    pub player: AnimationSet,
    pub bounder: AnimationSet,
    pub hunter: AnimationSet,
    pub shadow_lord: AnimationSet,
    pub title_background: Sprite,
    pub wave_background: Sprite,
    pub hiscores_background: Sprite,
    pub life_icon: Sprite,
    pub word_wave: Sprite,
    pub word_prepare_to_joust: Sprite,
    yellow_digits: Vec<Sprite>,
    blue_digits: Vec<Sprite>,
    white_digits: Vec<Sprite>,
}

impl SpriteAtlas {
    pub fn new() -> Self {
        let main = SheetId::Main;
        let digits = |zero: SheetRegion| -> Vec<Sprite> {
            (0..10u8)
                .map(|d| {
                    let offset = DIGIT_SPACING * f32::from(d);
                    let region = SheetRegion::new(zero.left + offset, zero.top, zero.right + offset, zero.bottom);
                    Sprite::from_region(main, region, 0.0)
                })
                .collect()
        };

        SpriteAtlas {
            player: PLAYER_STRIPS.build(),
            bounder: BOUNDER_STRIPS.build(),
            hunter: HUNTER_STRIPS.build(),
            shadow_lord: SHADOW_LORD_STRIPS.build(),
            title_background: Sprite::from_region(SheetId::Title, TITLE_BACKGROUND, BACKGROUND_DEPTH),
            wave_background: Sprite::from_region(main, WAVE_BACKGROUND, BACKGROUND_DEPTH),
            hiscores_background: Sprite::from_region(main, HISCORES_BACKGROUND, BACKGROUND_DEPTH),
            life_icon: Sprite::from_region(main, LIFE_ICON, 0.0),
            word_wave: Sprite::from_region(main, WORD_WAVE, WORD_DEPTH),
            word_prepare_to_joust: Sprite::from_region(main, WORD_PREPARE_TO_JOUST, WORD_DEPTH),
            yellow_digits: digits(YELLOW_ZERO),
            blue_digits: digits(BLUE_ZERO),
            white_digits: digits(WHITE_ZERO),
        }
    }

    pub fn enemy(&self, kind: EnemyKind) -> &AnimationSet {
        match kind {
            EnemyKind::Bounder => &self.bounder,
            EnemyKind::Hunter => &self.hunter,
            EnemyKind::ShadowLord => &self.shadow_lord,
        }
    }

    /// Sprite for a single decimal digit.
    pub fn digit(&self, color: DigitColor, value: u8) -> &Sprite {
        let digits = match color {
            DigitColor::Yellow => &self.yellow_digits,
            DigitColor::Blue => &self.blue_digits,
            DigitColor::White => &self.white_digits,
        };
        &digits[usize::from(value % 10)]
    }
}

impl Default for SpriteAtlas {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_region_flips_to_y_down_uv() {
        let sprite = Sprite::from_region(SheetId::Title, TITLE_BACKGROUND, 0.0);

        assert!(sprite.uv.top_left.y.abs() < 0.01);
        assert!(sprite.uv.height() > 0.0);
        assert!(!sprite.uv.is_degenerate());
        assert!((sprite.pixel_size().x - 301.0).abs() < 1e-3);
        assert!((sprite.pixel_size().y - 254.0).abs() < 1e-3);
    }

    #[test]
    fn test_strip_steps_by_width_plus_gap() {
        let first = SheetRegion::new(745.0, 1076.0, 781.5, 1024.0);
        let strip = Animation::strip(SheetId::Main, first, 4, 8.5, 0.0);
        let sheet_width = SheetId::Main.pixel_size().x;

        assert_eq!(strip.len(), 4);
        let step = strip.frame(1).uv.top_left.x - strip.frame(0).uv.top_left.x;
        assert!((step - 45.0 / sheet_width).abs() < EPS);
        for i in 0..4 {
            assert!((strip.frame(i).uv.width() - 36.5 / sheet_width).abs() < EPS);
        }
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_frame_past_end_panics() {
        let strip = Animation::strip(SheetId::Main, WORD_WAVE, 2, 0.0, 0.0);
        strip.frame(2);
    }

    #[test]
    fn test_atlas_contents() {
        let atlas = SpriteAtlas::new();

        assert_eq!(atlas.player.running.len(), 4);
        assert_eq!(atlas.player.flying.len(), 2);
        assert_eq!(atlas.enemy(EnemyKind::Hunter).get(AnimationState::RunSlowing).len(), 1);
        assert_eq!(atlas.wave_background.depth, BACKGROUND_DEPTH);

        let zero = atlas.digit(DigitColor::Yellow, 0).uv.top_left.x;
        let nine = atlas.digit(DigitColor::Yellow, 9).uv.top_left.x;
        let sheet_width = SheetId::Main.pixel_size().x;
        assert!((nine - zero - 9.0 * DIGIT_SPACING / sheet_width).abs() < EPS);
    }
}
