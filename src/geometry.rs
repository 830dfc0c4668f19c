//! 2D math primitives shared by the physics, collision and layout code.
//!
//! # Conventions
//!
//! Every `Rect` in this crate lives in screen space: y grows downward, so
//! `bot_right.y` is numerically larger than `top_left.y` and
//! `Rect::dimensions()` is positive on both axes. Sprite UV rectangles follow
//! the same convention (the atlas flips sheet rows once when it is built), so
//! there is exactly one height formula in the codebase.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Vector2 { x, y }
    }

    pub fn distance_squared(self, other: Vector2) -> f32 {
        let d = other - self;
        d.x * d.x + d.y * d.y
    }

    pub fn distance(self, other: Vector2) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Linear interpolation towards `end`. `t` is not clamped here.
    pub fn lerp(self, end: Vector2, t: f32) -> Vector2 {
        Vector2::new(self.x + t * (end.x - self.x), self.y + t * (end.y - self.y))
    }

    fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vector2 {
    type Output = Vector2;
    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, rhs: Vector2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector2 {
    type Output = Vector2;
    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vector2 {
    fn sub_assign(&mut self, rhs: Vector2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Vector2 {
    type Output = Vector2;
    fn mul(self, rhs: f32) -> Vector2 {
        Vector2::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Vector2 {
    type Output = Vector2;
    fn div(self, rhs: f32) -> Vector2 {
        Vector2::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vector2 {
    type Output = Vector2;
    fn neg(self) -> Vector2 {
        Vector2::new(-self.x, -self.y)
    }
}

/// Axis-aligned rectangle described by two corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top_left: Vector2,
    pub bot_right: Vector2,
}

impl Rect {
    pub const fn new(top_left: Vector2, bot_right: Vector2) -> Self {
        Rect { top_left, bot_right }
    }

    pub fn from_center(center: Vector2, size: Vector2) -> Self {
        let half = size / 2.0;
        Rect::new(center - half, center + half)
    }

    pub fn from_top_left(top_left: Vector2, size: Vector2) -> Self {
        Rect::new(top_left, top_left + size)
    }

    pub fn center(&self) -> Vector2 {
        (self.top_left + self.bot_right) / 2.0
    }

    pub fn dimensions(&self) -> Vector2 {
        self.bot_right - self.top_left
    }

    pub fn width(&self) -> f32 {
        self.bot_right.x - self.top_left.x
    }

    pub fn height(&self) -> f32 {
        self.bot_right.y - self.top_left.y
    }

    /// Maps a rect authored against a reference resolution onto another one.
    ///
    /// Layout data (platforms, spawn points, HUD boxes) is authored against the
    /// wave background image and scaled to the screen with this.
    pub fn rescale(&self, from: Vector2, to: Vector2) -> Rect {
        let scale = |v: Vector2| Vector2::new(v.x / from.x * to.x, v.y / from.y * to.y);
        Rect::new(scale(self.top_left), scale(self.bot_right))
    }

    /// True when the rect cannot take part in an overlap test: non-finite
    /// corners or corners in the wrong order.
    pub fn is_degenerate(&self) -> bool {
        !self.top_left.is_finite()
            || !self.bot_right.is_finite()
            || self.width() < 0.0
            || self.height() < 0.0
    }
}

/// Result of an AABB overlap test.
///
/// `intersect` holds per-axis separation: negative values are the overlap depth,
/// zero or positive values mean the boxes are apart (touching is not colliding).
/// `delta` is the centre-to-centre offset. Collision handlers always receive
/// `delta = target centre - initiator centre`, so `delta.y > 0` means the
/// initiator is above the thing it hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionInfo {
    pub is_colliding: bool,
    pub delta: Vector2,
    pub intersect: Vector2,
}

impl CollisionInfo {
    /// The x overlap is deeper than the y overlap: resolve along y.
    pub fn resolves_vertically(&self) -> bool {
        self.intersect.x < self.intersect.y
    }

    /// The y overlap is deeper than the x overlap: resolve along x.
    pub fn resolves_horizontally(&self) -> bool {
        self.intersect.x > self.intersect.y
    }

    /// Anything that is not a clean landing on top of a platform.
    pub fn is_side_hit(&self) -> bool {
        self.intersect.x >= self.intersect.y || self.delta.y <= 0.0
    }
}

/// Tests two rectangles for overlap.
///
/// `delta = center(a) - center(b)` and
/// `intersect = |delta| - (half_extent(a) + half_extent(b))` per axis. The boxes
/// collide only when both intersect components are strictly negative.
///
/// # Panics
///
/// In debug builds, when either rect is degenerate (see [`Rect::is_degenerate`]).
pub fn overlap(a: &Rect, b: &Rect) -> CollisionInfo {
    debug_assert!(!a.is_degenerate(), "overlap: degenerate rect {:?}", a);
    debug_assert!(!b.is_degenerate(), "overlap: degenerate rect {:?}", b);

    let half_a = a.dimensions() / 2.0;
    let half_b = b.dimensions() / 2.0;
    let delta = a.center() - b.center();
    let intersect = Vector2::new(
        delta.x.abs() - (half_a.x + half_b.x),
        delta.y.abs() - (half_a.y + half_b.y),
    );

    CollisionInfo {
        is_colliding: intersect.x < 0.0 && intersect.y < 0.0,
        delta,
        intersect,
    }
}

/// Clamp that never panics, unlike `f32::clamp` with `min > max` or NaN bounds.
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    let low = if value < min { min } else { value };
    if low > max { max } else { low }
}
