//! Update and draw passes over every registered object.
//!
//! # Architecture
//!
//! - Fixed-capacity slot array of handles, iterated in slot order
//! - Collidable objects are mirrored into the `CollisionManager` on add/remove
//! - Each enabled object updates, then (if collidable) resolves its own
//!   collisions before the next object updates
//! - An object whose update reports a deferred delete is deregistered from both
//!   registries and dropped from the arena before the pass moves on

use crate::collision::CollisionManager;
use crate::event::GameEvent;
use crate::input::InputState;
use crate::object::{Arena, GameObject, Handle, UpdateContext};
use crate::player::Player;
use crate::render::Renderer;
use crate::sprite::SpriteAtlas;
use log::debug;
use rand::RngCore;

/// Inputs shared by every object during one update pass.
pub struct FrameInput<'a> {
    pub milliseconds: u32,
    pub input: InputState,
    /// Object enemies chase, if any.
    pub player: Option<Handle>,
    pub rng: &'a mut dyn RngCore,
    pub events: &'a mut Vec<GameEvent>,
}

#[derive(Debug)]
pub struct ObjectManager {
    slots: Vec<Option<Handle>>,
    count: usize,
    first_update: bool,
}

impl ObjectManager {
    pub fn new(capacity: usize) -> Self {
        ObjectManager {
            slots: vec![None; capacity],
            count: 0,
            first_update: true,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.slots.contains(&Some(handle))
    }

    /// Registers `handle`, and with the collision registry too when collidable.
    ///
    /// # Panics
    ///
    /// When every slot is taken.
    pub fn add(&mut self, handle: Handle, collidable: bool, collisions: &mut CollisionManager) {
        let Some(slot) = self.slots.iter_mut().find(|s| s.is_none()) else {
            panic!("object registry full ({} slots)", self.capacity());
        };
        *slot = Some(handle);
        self.count += 1;
        if collidable {
            collisions.add(handle);
        }
    }

    /// # Panics
    ///
    /// When `handle` was never registered.
    pub fn remove(&mut self, handle: Handle, collidable: bool, collisions: &mut CollisionManager) {
        let Some(slot) = self.slots.iter_mut().find(|s| **s == Some(handle)) else {
            panic!("object registry: {:?} is not registered", handle);
        };
        *slot = None;
        self.count -= 1;
        if collidable {
            collisions.remove(handle);
        }
    }

    pub fn draw_all(&self, arena: &mut Arena, renderer: &mut dyn Renderer, atlas: &SpriteAtlas) {
        for handle in self.slots.iter().flatten() {
            let Some(object) = arena.get_mut(*handle) else {
                panic!("object registry: {:?} missing from arena", handle);
            };
            if object.object().is_enabled() {
                object.draw(renderer, atlas);
            }
        }
    }

    /// Updates every enabled object in slot order, interleaving each
    /// collidable object's collision pass right after its update.
    ///
    /// The very first pass runs with a zero time step.
    pub fn update_all(&mut self, arena: &mut Arena, collisions: &mut CollisionManager, mut frame: FrameInput<'_>) {
        let mut milliseconds = frame.milliseconds;
        if self.first_update {
            debug!("first update: clamping {} ms time step to 0", milliseconds);
            milliseconds = 0;
            self.first_update = false;
        }

        for index in 0..self.slots.len() {
            let Some(handle) = self.slots[index] else {
                continue;
            };

            let target = frame
                .player
                .and_then(|p| arena.get(p))
                .and_then(GameObject::as_player)
                .map(Player::sighting);

            let Some(object) = arena.get_mut(handle) else {
                panic!("object registry: {:?} missing from arena", handle);
            };
            if !object.object().is_enabled() {
                continue;
            }
            let collidable = object.object().is_collidable();

            let mut ctx = UpdateContext {
                milliseconds,
                input: frame.input,
                target,
                rng: &mut *frame.rng,
                events: &mut *frame.events,
            };
            if object.update(&mut ctx) {
                debug!("deleting {:?}", handle);
                self.remove(handle, collidable, collisions);
                arena.remove(handle);
                continue;
            }

            if collidable {
                collisions.handle_all_collisions(handle, arena, frame.events);
            }
        }
    }
}
