//! Base game-object data, handles and the arena that owns every object.
//!
//! # Architecture
//!
//! - `Object`: fields every object has (position, size, enabled, deferred delete)
//! - `GameObject`: closed set of object kinds, dispatching update/draw/collide
//! - `Arena` + `Handle`: owning storage addressed by generational handles, so a
//!   stale handle to a deleted object is detected instead of aliasing a new one
//! - `UpdateContext`: per-object view of the frame handed to `update`
//!
//! Managers hold handles, never references. `Arena::pair_mut` hands out the two
//! mutable borrows a collision callback needs.

use crate::collision::CollisionCategory;
use crate::enemy::{Enemy, PlayerSighting};
use crate::entity::Entity;
use crate::event::GameEvent;
use crate::geometry::{CollisionInfo, Rect, Vector2};
use crate::input::InputState;
use crate::platform::Platform;
use crate::player::Player;
use crate::render::Renderer;
use crate::sprite::SpriteAtlas;
use crate::widgets::{Background, Widget};
use rand::RngCore;

#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    /// Centre of the object.
    pub position: Vector2,
    pub size: Vector2,
    enabled: bool,
    marked_for_delete: bool,
    collidable: bool,
}

impl Object {
    pub fn new(position: Vector2, size: Vector2, collidable: bool) -> Self {
        Object {
            position,
            size,
            enabled: true,
            marked_for_delete: false,
            collidable,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.position, self.size)
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_collidable(&self) -> bool {
        self.collidable
    }

    /// Requests deletion at the end of this object's next update.
    pub fn mark_for_delete(&mut self) {
        self.marked_for_delete = true;
    }

    pub fn is_marked_for_delete(&self) -> bool {
        self.marked_for_delete
    }

    /// Base update every object runs last. Returns true when the object asked
    /// to be deleted; the caller performs the delete.
    pub fn default_update(&self) -> bool {
        self.marked_for_delete
    }
}

/// Generational reference to an object in an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl Handle {
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

#[derive(Debug)]
struct Entry {
    generation: u32,
    value: Option<GameObject>,
}

/// Owning storage for every game object.
#[derive(Debug, Default)]
pub struct Arena {
    entries: Vec<Entry>,
    free: Vec<usize>,
    len: usize,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, object: GameObject) -> Handle {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let entry = &mut self.entries[index];
            entry.value = Some(object);
            return Handle {
                index: index as u32,
                generation: entry.generation,
            };
        }
        self.entries.push(Entry {
            generation: 0,
            value: Some(object),
        });
        Handle {
            index: (self.entries.len() - 1) as u32,
            generation: 0,
        }
    }

    /// Removes and returns the object. Its handle and any copies go stale.
    pub fn remove(&mut self, handle: Handle) -> Option<GameObject> {
        let entry = self.entries.get_mut(handle.index())?;
        if entry.generation != handle.generation {
            return None;
        }
        let value = entry.value.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(handle.index());
        self.len -= 1;
        Some(value)
    }

    pub fn get(&self, handle: Handle) -> Option<&GameObject> {
        self.entries
            .get(handle.index())
            .filter(|e| e.generation == handle.generation)
            .and_then(|e| e.value.as_ref())
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut GameObject> {
        self.entries
            .get_mut(handle.index())
            .filter(|e| e.generation == handle.generation)
            .and_then(|e| e.value.as_mut())
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.get(handle).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Mutable access to two distinct objects at once.
    ///
    /// # Panics
    ///
    /// When both handles point at the same slot.
    pub fn pair_mut(&mut self, a: Handle, b: Handle) -> Option<(&mut GameObject, &mut GameObject)> {
        assert_ne!(a.index, b.index, "pair_mut needs two distinct objects");

        let (low, high) = if a.index < b.index { (a, b) } else { (b, a) };
        let (head, tail) = self.entries.split_at_mut(high.index());
        let low_entry = head.get_mut(low.index())?;
        let high_entry = tail.get_mut(0)?;
        if low_entry.generation != low.generation || high_entry.generation != high.generation {
            return None;
        }
        let low_value = low_entry.value.as_mut()?;
        let high_value = high_entry.value.as_mut()?;

        if a.index < b.index {
            Some((low_value, high_value))
        } else {
            Some((high_value, low_value))
        }
    }
}

/// What an object sees of the frame while it updates.
pub struct UpdateContext<'a> {
    pub milliseconds: u32,
    pub input: InputState,
    /// The player as it looked just before this object's update.
    pub target: Option<PlayerSighting>,
    pub rng: &'a mut dyn RngCore,
    pub events: &'a mut Vec<GameEvent>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameObject {
    Player(Player),
    Enemy(Enemy),
    Platform(Platform),
    Background(Background),
    Widget(Widget),
}

impl GameObject {
    pub fn object(&self) -> &Object {
        match self {
            GameObject::Player(p) => &p.entity.object,
            GameObject::Enemy(e) => &e.entity.object,
            GameObject::Platform(p) => &p.entity.object,
            GameObject::Background(b) => &b.object,
            GameObject::Widget(w) => w.object(),
        }
    }

    pub fn object_mut(&mut self) -> &mut Object {
        match self {
            GameObject::Player(p) => &mut p.entity.object,
            GameObject::Enemy(e) => &mut e.entity.object,
            GameObject::Platform(p) => &mut p.entity.object,
            GameObject::Background(b) => &mut b.object,
            GameObject::Widget(w) => w.object_mut(),
        }
    }

    /// Physics data, for the kinds that take part in collisions.
    pub fn entity(&self) -> Option<&Entity> {
        match self {
            GameObject::Player(p) => Some(&p.entity),
            GameObject::Enemy(e) => Some(&e.entity),
            GameObject::Platform(p) => Some(&p.entity),
            GameObject::Background(_) | GameObject::Widget(_) => None,
        }
    }

    pub fn entity_mut(&mut self) -> Option<&mut Entity> {
        match self {
            GameObject::Player(p) => Some(&mut p.entity),
            GameObject::Enemy(e) => Some(&mut e.entity),
            GameObject::Platform(p) => Some(&mut p.entity),
            GameObject::Background(_) | GameObject::Widget(_) => None,
        }
    }

    pub fn category(&self) -> CollisionCategory {
        self.entity().map_or(CollisionCategory::None, |e| e.category)
    }

    pub fn as_player(&self) -> Option<&Player> {
        match self {
            GameObject::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut Player> {
        match self {
            GameObject::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_enemy(&self) -> Option<&Enemy> {
        match self {
            GameObject::Enemy(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_enemy_mut(&mut self) -> Option<&mut Enemy> {
        match self {
            GameObject::Enemy(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_background_mut(&mut self) -> Option<&mut Background> {
        match self {
            GameObject::Background(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_widget(&self) -> Option<&Widget> {
        match self {
            GameObject::Widget(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_widget_mut(&mut self) -> Option<&mut Widget> {
        match self {
            GameObject::Widget(w) => Some(w),
            _ => None,
        }
    }

    /// Runs one update step. Returns true when the object asked to be deleted.
    pub fn update(&mut self, ctx: &mut UpdateContext<'_>) -> bool {
        match self {
            GameObject::Player(p) => p.update(ctx.milliseconds, &ctx.input, ctx.events),
            GameObject::Enemy(e) => e.update(ctx.milliseconds, ctx.target, &mut *ctx.rng),
            GameObject::Platform(p) => p.update(),
            GameObject::Background(b) => b.object.default_update(),
            GameObject::Widget(w) => w.object().default_update(),
        }
    }

    pub fn draw(&mut self, renderer: &mut dyn Renderer, atlas: &SpriteAtlas) {
        match self {
            GameObject::Player(p) => p.draw(renderer, atlas),
            GameObject::Enemy(e) => e.draw(renderer, atlas),
            GameObject::Platform(p) => p.draw(renderer),
            GameObject::Background(b) => b.draw(renderer),
            GameObject::Widget(w) => w.draw(renderer, atlas),
        }
    }

    /// Lets this object react to touching `other`.
    ///
    /// Only the initiator reacts; `info.delta` points from this object towards
    /// `other`. Kinds without a collide reaction ignore the call.
    pub fn collide(
        &mut self,
        other: &mut GameObject,
        other_handle: Handle,
        info: CollisionInfo,
        events: &mut Vec<GameEvent>,
    ) {
        match self {
            GameObject::Player(p) => p.collide(other, other_handle, info, events),
            GameObject::Enemy(e) => e.collide(other, info, events),
            GameObject::Platform(_) | GameObject::Background(_) | GameObject::Widget(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::Background;

    fn background() -> GameObject {
        let sprite = SpriteAtlas::new().wave_background;
        GameObject::Background(Background::new(sprite, Vector2::new(1024.0, 768.0)))
    }

    #[test]
    fn test_enable_disable_idempotent() {
        let mut object = Object::new(Vector2::ZERO, Vector2::new(10.0, 10.0), false);
        object.disable();
        object.disable();
        assert!(!object.is_enabled());

        object.enable();
        object.enable();
        assert!(object.is_enabled());
    }

    #[test]
    fn test_mark_for_delete_is_reported_by_default_update() {
        let mut object = Object::new(Vector2::ZERO, Vector2::ZERO, false);
        assert!(!object.default_update());
        object.mark_for_delete();
        object.mark_for_delete();
        assert!(object.is_marked_for_delete());
        assert!(object.default_update());
    }

    #[test]
    fn test_arena_handles_go_stale() {
        let mut arena = Arena::new();
        let first = arena.insert(background());
        assert_eq!(arena.len(), 1);

        assert!(arena.remove(first).is_some());
        assert!(arena.remove(first).is_none());
        assert!(arena.get(first).is_none());

        let second = arena.insert(background());
        assert_eq!(second.index(), first.index()); // slot reused
        assert_ne!(second, first);
        assert!(arena.get(first).is_none());
        assert!(arena.contains(second));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_pair_mut_returns_in_argument_order() {
        let mut arena = Arena::new();
        let a = arena.insert(background());
        let b = arena.insert(background());

        let (second, first) = arena.pair_mut(b, a).unwrap();
        second.object_mut().position = Vector2::new(2.0, 0.0);
        first.object_mut().position = Vector2::new(1.0, 0.0);

        assert_eq!(arena.get(a).unwrap().object().position.x, 1.0);
        assert_eq!(arena.get(b).unwrap().object().position.x, 2.0);
    }

    #[test]
    #[should_panic(expected = "distinct")]
    fn test_pair_mut_same_handle_panics() {
        let mut arena = Arena::new();
        let a = arena.insert(background());
        let _ = arena.pair_mut(a, a);
    }
}
