//! Physics layer shared by every collidable object.
//!
//! An `Entity` is an `Object` plus velocity, a collision category and two
//! hitboxes: the full grounded box and a shorter flying box that shares its
//! top-left corner. `default_update` integrates gravity and velocity and keeps
//! the entity inside its world bounds; `default_collide` resolves contact with
//! platforms.

use crate::collision::CollisionCategory;
use crate::geometry::{self, CollisionInfo, Rect, Vector2};
use crate::object::Object;

/// Downward acceleration in px/s².
pub const GRAVITY: f32 = 300.0;
/// Horizontal speed added per frame of steering.
pub const VELOCITY_CHANGE: f32 = 5.0;
pub const FLAP_IMPULSE: f32 = 25.0 * VELOCITY_CHANGE;
/// Gap kept between a landed entity and the platform top so it is not
/// re-detected as penetrating next frame.
pub const PLATFORM_EPSILON: f32 = 0.00005;
pub const DEFAULT_TERMINAL_VELOCITY: Vector2 = Vector2::new(200.0, 200.0);
pub const SCREEN_SIZE: Vector2 = Vector2::new(1024.0, 768.0);
pub const SCREEN_BOUNDS: Rect = Rect::new(Vector2::ZERO, SCREEN_SIZE);

/// Which hitbox is authoritative right now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhysicalState {
    Grounded(Rect),
    Airborne(Rect),
}

impl PhysicalState {
    pub fn hitbox(&self) -> Rect {
        match self {
            PhysicalState::Grounded(r) | PhysicalState::Airborne(r) => *r,
        }
    }

    pub fn center(&self) -> Vector2 {
        self.hitbox().center()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub object: Object,
    /// Only awake entities initiate collision checks.
    pub awake: bool,
    pub is_grounded: bool,
    pub game_bounds: Rect,
    pub velocity: Vector2,
    pub terminal_velocity: Vector2,
    pub category: CollisionCategory,
    pub flying_size: Vector2,
}

impl Entity {
    pub fn new(position: Vector2, size: Vector2, category: CollisionCategory) -> Self {
        Entity {
            object: Object::new(position, size, true),
            awake: false,
            is_grounded: true,
            game_bounds: SCREEN_BOUNDS,
            velocity: Vector2::ZERO,
            terminal_velocity: DEFAULT_TERMINAL_VELOCITY,
            category,
            flying_size: size,
        }
    }

    pub fn with_flying_size(mut self, size: Vector2) -> Self {
        self.flying_size = size;
        self
    }

    /// The full (grounded) hitbox.
    pub fn bounds(&self) -> Rect {
        self.object.bounds()
    }

    /// Flying hitbox: same top-left corner as the grounded box, shorter.
    ///
    /// Derived from `position` on every call, so it can never lag behind a
    /// position change.
    pub fn flying_bounds(&self) -> Rect {
        Rect::from_top_left(self.bounds().top_left, self.flying_size)
    }

    pub fn flying_position(&self) -> Vector2 {
        self.flying_bounds().center()
    }

    pub fn physical_state(&self) -> PhysicalState {
        if self.is_grounded {
            PhysicalState::Grounded(self.bounds())
        } else {
            PhysicalState::Airborne(self.flying_bounds())
        }
    }

    /// Adds one frame of steering towards `right` (or left). Airborne
    /// steering is half as strong.
    pub fn accelerate(&mut self, right: bool) {
        let direction = if right { 1.0 } else { -1.0 };
        let divisor = if self.is_grounded { 1.0 } else { 2.0 };
        self.velocity.x += direction * VELOCITY_CHANGE / divisor;
    }

    /// Applies an upward flap impulse. Returns true if this flap took the
    /// entity off the ground.
    pub fn flap(&mut self) -> bool {
        self.velocity.y -= FLAP_IMPULSE;
        if !self.is_grounded {
            return false;
        }
        self.is_grounded = false;
        self.object.position.y -= PLATFORM_EPSILON * 2.0;
        true
    }

    /// Reverses velocity along the axis of least penetration; both axes on an
    /// exact tie.
    pub fn reflect_velocity(&mut self, info: &CollisionInfo) {
        if !info.resolves_horizontally() {
            self.velocity.y = -self.velocity.y;
        }
        if !info.resolves_vertically() {
            self.velocity.x = -self.velocity.x;
        }
    }

    /// One physics step. Returns true when a deferred delete should fire.
    pub fn default_update(&mut self, milliseconds: u32) -> bool {
        let seconds = milliseconds as f32 / 1000.0;
        let terminal = self.terminal_velocity;
        self.velocity.x = geometry::clamp(self.velocity.x, -terminal.x, terminal.x);
        self.velocity.y = geometry::clamp(self.velocity.y, -terminal.y, terminal.y);

        let position = &mut self.object.position;
        position.x += self.velocity.x * seconds;
        position.y += self.velocity.y * seconds + 0.5 * GRAVITY * seconds * seconds;

        let half_height = self.object.size.y / 2.0;
        let bounds = self.game_bounds;
        if position.y + half_height > bounds.bot_right.y {
            position.y = bounds.bot_right.y - half_height;
            self.velocity.y = 0.0;
            self.is_grounded = true;
        } else if position.y - half_height < bounds.top_left.y {
            position.y = bounds.top_left.y + half_height;
            self.velocity.y = -self.velocity.y;
        }

        if position.x < bounds.top_left.x {
            position.x = bounds.bot_right.x - (bounds.top_left.x - position.x);
        } else if position.x > bounds.bot_right.x {
            position.x = bounds.top_left.x + (position.x - bounds.bot_right.x);
        }

        let delete = self.object.default_update();
        self.velocity.y += GRAVITY * seconds;
        delete
    }

    /// Resolves contact with a platform; other categories are ignored.
    ///
    /// `info.delta` points from this entity towards `other`.
    pub fn default_collide(&mut self, other: &Entity, info: &CollisionInfo) {
        if other.category != CollisionCategory::Platform {
            return;
        }

        let mine = self.object.size;
        let theirs = other.object.size;
        let target = other.object.position;
        let position = &mut self.object.position;

        if info.resolves_vertically() {
            if info.delta.y > 0.0 {
                position.y = target.y - theirs.y / 2.0 - mine.y / 2.0 + PLATFORM_EPSILON;
                self.is_grounded = true;
                self.velocity.y = 0.0;
            } else {
                position.y = target.y + theirs.y / 2.0 + mine.y / 2.0;
                self.velocity.y = -self.velocity.y;
            }
        } else if info.resolves_horizontally() {
            if info.delta.x > 0.0 {
                position.x = target.x - theirs.x / 2.0 - mine.x / 2.0;
            } else {
                position.x = target.x + theirs.x / 2.0 + mine.x / 2.0;
            }
            self.velocity.x = -self.velocity.x;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::overlap;

    const RIDER: Vector2 = Vector2::new(39.0, 54.0);

    fn rider(x: f32, y: f32) -> Entity {
        Entity::new(Vector2::new(x, y), RIDER, CollisionCategory::Player)
            .with_flying_size(Vector2::new(39.0, 36.0))
    }

    fn platform(x: f32, y: f32, w: f32, h: f32) -> Entity {
        Entity::new(Vector2::new(x, y), Vector2::new(w, h), CollisionCategory::Platform)
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!((actual - expected).abs() < 1e-3, "{} != {}", actual, expected);
    }

    #[test]
    fn test_default_update_integrates_gravity() {
        let mut e = rider(100.0, 300.0);
        e.velocity = Vector2::new(0.0, -100.0);

        assert!(!e.default_update(16));

        assert_close(e.object.position.y, 300.0 - 1.6 + 0.5 * GRAVITY * 0.016 * 0.016);
        assert_close(e.velocity.y, -100.0 + GRAVITY * 0.016);
        assert_eq!(e.object.position.x, 100.0);
    }

    #[test]
    fn test_default_update_bounces_off_top_bound() {
        let mut e = rider(0.0, 0.0);
        e.velocity = Vector2::new(0.0, -100.0);

        e.default_update(16);

        assert_eq!(e.object.position.y, RIDER.y / 2.0);
        assert_close(e.velocity.y, 100.0 + GRAVITY * 0.016);
    }

    #[test]
    fn test_default_update_lands_on_bottom_bound() {
        let mut e = rider(500.0, 760.0);
        e.is_grounded = false;
        e.velocity = Vector2::new(0.0, 150.0);

        e.default_update(16);

        assert!(e.is_grounded);
        assert_eq!(e.object.position.y, 768.0 - RIDER.y / 2.0);
        assert_close(e.velocity.y, GRAVITY * 0.016);
    }

    #[test]
    fn test_terminal_velocity_clamps_before_integration() {
        let mut e = rider(500.0, 300.0);
        e.velocity = Vector2::new(-900.0, 900.0);

        e.default_update(10);

        assert_eq!(e.velocity.x, -200.0);
        assert_close(e.object.position.x, 498.0);
        assert_close(e.velocity.y, 200.0 + GRAVITY * 0.01);
    }

    #[test]
    fn test_velocity_stays_bounded_under_steering() {
        let mut e = rider(500.0, 300.0);
        for _ in 0..500 {
            e.accelerate(true);
            e.default_update(16);
            assert!(e.velocity.x.abs() <= e.terminal_velocity.x + VELOCITY_CHANGE);
            assert!(e.velocity.y.abs() <= e.terminal_velocity.y + GRAVITY * 0.016 + 1e-3);
        }
    }

    #[test]
    fn test_horizontal_wrap() {
        let mut e = rider(1025.0, 300.0);
        e.default_update(0);
        assert_eq!(e.object.position.x, 1.0);

        let mut e = rider(-3.0, 300.0);
        e.default_update(0);
        assert_eq!(e.object.position.x, 1021.0);
    }

    #[test]
    fn test_deferred_delete_reported() {
        let mut e = rider(100.0, 100.0);
        assert!(!e.default_update(16));
        e.object.mark_for_delete();
        assert!(e.default_update(16));
    }

    #[test]
    fn test_flying_box_tracks_position() {
        let mut e = rider(100.0, 100.0);
        assert_eq!(e.flying_bounds().top_left, Vector2::new(80.5, 73.0));
        assert_eq!(e.flying_position(), Vector2::new(100.0, 91.0));

        e.object.position.y += 10.0;
        assert_eq!(e.flying_position(), Vector2::new(100.0, 101.0));

        e.is_grounded = false;
        assert_eq!(e.physical_state(), PhysicalState::Airborne(e.flying_bounds()));
    }

    #[test]
    fn test_flap_from_ground_lifts_off() {
        let mut e = rider(100.0, 100.0);
        assert!(e.flap());
        assert!(!e.is_grounded);
        assert_eq!(e.velocity.y, -FLAP_IMPULSE);
        assert!(e.object.position.y < 100.0);

        assert!(!e.flap());
        assert_eq!(e.velocity.y, -2.0 * FLAP_IMPULSE);
    }

    #[test]
    fn test_land_on_platform_snaps_to_top() {
        let mut e = rider(300.0, 500.0);
        e.is_grounded = false;
        e.velocity = Vector2::new(30.0, 80.0);
        let floor = platform(300.0, 510.0, 200.0, 40.0);

        let info = overlap(&floor.bounds(), &e.bounds());
        assert!(info.is_colliding);
        e.default_collide(&floor, &info);

        assert_close(e.object.position.y, 463.00005);
        assert!(e.is_grounded);
        assert_eq!(e.velocity.y, 0.0);
        assert_eq!(e.velocity.x, 30.0);
    }

    #[test]
    fn test_hit_platform_from_below() {
        let mut e = rider(300.0, 550.0);
        e.velocity = Vector2::new(0.0, -80.0);
        let ceiling = platform(300.0, 510.0, 200.0, 40.0);

        let info = overlap(&ceiling.bounds(), &e.bounds());
        e.default_collide(&ceiling, &info);

        assert_eq!(e.object.position.y, 557.0);
        assert_eq!(e.velocity.y, 80.0);
    }

    #[test]
    fn test_hit_platform_side() {
        let mut e = rider(195.0, 510.0);
        e.velocity = Vector2::new(60.0, 0.0);
        let wall = platform(300.0, 510.0, 200.0, 40.0);

        let info = overlap(&wall.bounds(), &e.bounds());
        assert!(info.resolves_horizontally());
        e.default_collide(&wall, &info);

        assert_eq!(e.object.position.x, 180.5);
        assert_eq!(e.velocity.x, -60.0);
    }

    #[test]
    fn test_non_platform_collisions_are_ignored() {
        let mut e = rider(100.0, 100.0);
        let other = rider(110.0, 100.0);
        let before = e.clone();

        let info = overlap(&other.bounds(), &e.bounds());
        e.default_collide(&other, &info);
        assert_eq!(e, before);
    }
}
