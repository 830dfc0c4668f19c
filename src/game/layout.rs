// Screen layout for the arena and HUD
//
// Platform, spawn point and HUD positions are measured in pixels on the wave
// background image (708 x 582) and scaled to the screen when the level manager
// builds its objects. The wave counter and popup words are placed directly in
// screen pixels.

use crate::entity::SCREEN_SIZE;
use crate::geometry::{Rect, Vector2};
use crate::sprite::Sprite;

pub const WAVE_BACKGROUND_SIZE: Vector2 = Vector2::new(708.0, 582.0);
pub const HISCORES_BACKGROUND_SIZE: Vector2 = Vector2::new(510.0, 120.0);

const fn px(left: f32, top: f32, right: f32, bottom: f32) -> Rect {
    Rect::new(Vector2::new(left, top), Vector2::new(right, bottom))
}

const PLATFORMS: [Rect; 8] = [
    px(0.0, 471.0, 2000.0, 560.0),  // bottom
    px(0.0, 273.0, 146.0, 293.0),   // middle left
    px(243.0, 342.0, 395.0, 362.0), // middle
    px(474.0, 249.0, 611.0, 278.0), // middle right
    px(603.0, 273.0, 707.0, 290.0), // middle right, wraps
    px(0.0, 87.0, 71.0, 104.0),     // top left
    px(195.0, 120.0, 404.0, 146.0), // top middle
    px(594.0, 87.0, 707.0, 104.0),  // top right
];

/// One pixel tall strips along the top of the ledges riders appear on.
const SPAWN_STRIPS: [Rect; 4] = [
    px(276.0, 471.0, 344.0, 471.0), // bottom
    px(27.0, 273.0, 92.0, 273.0),   // left
    px(525.0, 249.0, 593.0, 249.0), // right
    px(243.0, 120.0, 308.0, 120.0), // top
];

const SCOREBOARD: Rect = px(165.0, 489.0, 265.0, 512.0);
const LIVES_BOX: Rect = px(273.0, 489.0, 332.0, 512.0);

pub const SCORE_DIGITS: u8 = 7;
pub const HUD_GAP: f32 = 6.0;

pub const WAVE_COUNTER_DIGITS: u8 = 3;
pub const WAVE_COUNTER_BOX: Rect = px(475.0, 238.0, 555.0, 262.0);

/// Where a wave's enemies wait, disabled, until they spawn.
pub const ENEMY_STAGING: [Vector2; 3] = [
    Vector2::new(500.0, 150.0),
    Vector2::new(100.0, 150.0),
    Vector2::new(250.0, 150.0),
];

pub const WAVE_WORD_POSITION: Vector2 = Vector2::new(400.0, 250.0);
pub const PREPARE_WORD_POSITION: Vector2 = Vector2::new(465.0, 385.0);
const WORD_SCALE: f32 = 2.0;

fn to_screen(rect: Rect) -> Rect {
    rect.rescale(WAVE_BACKGROUND_SIZE, SCREEN_SIZE)
}

/// Platform boxes in screen space.
pub fn platforms() -> Vec<Rect> {
    PLATFORMS.iter().copied().map(to_screen).collect()
}

/// Spawn points in screen space: the bottom centre of whoever appears there.
pub fn spawn_points() -> [Vector2; 4] {
    SPAWN_STRIPS.map(|strip| to_screen(strip).center())
}

pub fn scoreboard() -> Rect {
    to_screen(SCOREBOARD)
}

pub fn lives_box() -> Rect {
    to_screen(LIVES_BOX)
}

/// Top-left corner of the score while the hiscores screen shows it.
pub fn hiscore_score_position() -> Vector2 {
    SCREEN_SIZE / 2.0 - Vector2::new(scoreboard().width() / 2.0, 0.0)
}

/// The hiscores banner slides from just above the screen to its resting spot.
pub fn hiscores_banner_path() -> (Vector2, Vector2) {
    let x = SCREEN_SIZE.x / 2.0;
    (
        Vector2::new(x, -HISCORES_BACKGROUND_SIZE.y),
        Vector2::new(x, HISCORES_BACKGROUND_SIZE.y),
    )
}

/// On-screen size of a popup word: its share of the sheet, stretched over the
/// screen and doubled.
pub fn word_size(sprite: &Sprite) -> Vector2 {
    Vector2::new(
        sprite.uv.width() * SCREEN_SIZE.x * WORD_SCALE,
        sprite.uv.height() * SCREEN_SIZE.y * WORD_SCALE,
    )
}
