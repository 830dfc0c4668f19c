//! Collision registry and pairwise collision pass.
//!
//! # Architecture
//!
//! - `CollisionCategory`: tag on every entity that drives collide branching
//! - `CollisionManager`: fixed-capacity registry of collidable handles
//! - `detect()`: grounded-box overlap between an initiator and a target
//!
//! Each awake object runs `handle_all_collisions` right after its own update,
//! so objects later in the update order see the results of earlier ones.
//! Only the initiator's `collide` is called; the other party reacts when its
//! own turn comes.

use crate::entity::Entity;
use crate::event::GameEvent;
use crate::geometry::{CollisionInfo, overlap};
use crate::object::{Arena, GameObject, Handle};
use log::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionCategory {
    /// Never reacts to anything.
    None,
    Player,
    Enemy,
    Platform,
    Egg,
    GameBounds,
}

/// Grounded-box overlap of `this` (the initiator) against `other`.
///
/// The returned delta points from `this` towards `other`.
pub fn detect(this: &Entity, other: &Entity) -> CollisionInfo {
    overlap(&other.bounds(), &this.bounds())
}

/// Registry of every collidable object currently in play.
#[derive(Debug)]
pub struct CollisionManager {
    slots: Vec<Option<Handle>>,
    count: usize,
}

impl CollisionManager {
    pub fn new(capacity: usize) -> Self {
        CollisionManager {
            slots: vec![None; capacity],
            count: 0,
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

    /// Registers `handle` in the first free slot.
    ///
    /// # Panics
    ///
    /// When every slot is taken.
    pub fn add(&mut self, handle: Handle) {
        let Some(slot) = self.slots.iter_mut().find(|s| s.is_none()) else {
            panic!("collision registry full ({} slots)", self.capacity());
        };
        *slot = Some(handle);
        self.count += 1;
    }

    /// # Panics
    ///
    /// When `handle` was never registered.
    pub fn remove(&mut self, handle: Handle) {
        let Some(slot) = self.slots.iter_mut().find(|s| **s == Some(handle)) else {
            panic!("collision registry: {:?} is not registered", handle);
        };
        *slot = None;
        self.count -= 1;
    }

    /// Tests `handle` against every registered object and lets it react.
    ///
    /// Does nothing unless the initiator is awake. Disabled targets and the
    /// initiator itself are skipped. The scan stops at the first empty slot,
    /// so objects registered after a freed slot are not seen until that slot
    /// is filled again.
    pub fn handle_all_collisions(&self, handle: Handle, arena: &mut Arena, events: &mut Vec<GameEvent>) {
        let Some(initiator) = arena.get(handle) else {
            return;
        };
        let Some(entity) = initiator.entity() else {
            unreachable!("collidable object without physics data");
        };
        if !entity.awake {
            return;
        }

        for slot in &self.slots {
            let Some(other_handle) = *slot else {
                break;
            };
            if other_handle == handle {
                continue;
            }
            let Some((this, other)) = arena.pair_mut(handle, other_handle) else {
                continue;
            };
            if !other.object().is_enabled() {
                continue;
            }

            let (Some(this_entity), Some(other_entity)) = (this.entity(), other.entity()) else {
                unreachable!("collidable object without physics data");
            };
            let info = detect(this_entity, other_entity);
            if info.is_colliding {
                trace!(
                    "{:?} hit {:?} ({:?} -> {:?})",
                    handle,
                    other_handle,
                    this_entity.category,
                    other_entity.category
                );
                this.collide(other, other_handle, info, events);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemy::{Enemy, EnemyKind};
    use crate::geometry::Vector2;
    use crate::platform::Platform;
    use crate::player::Player;
    use rand::rngs::mock::StepRng;

    fn setup() -> (Arena, CollisionManager) {
        (Arena::new(), CollisionManager::new(4))
    }

    fn enemy(arena: &mut Arena, x: f32, y: f32) -> Handle {
        let mut rng = StepRng::new(0, 0);
        arena.insert(GameObject::Enemy(Enemy::new(Vector2::new(x, y), EnemyKind::Bounder, &mut rng)))
    }

    #[test]
    #[should_panic(expected = "full")]
    fn test_add_past_capacity_panics() {
        let (mut arena, mut collisions) = setup();
        for i in 0..5 {
            let h = enemy(&mut arena, i as f32 * 100.0, 100.0);
            collisions.add(h);
        }
    }

    #[test]
    #[should_panic(expected = "not registered")]
    fn test_remove_unregistered_panics() {
        let (mut arena, mut collisions) = setup();
        let h = enemy(&mut arena, 100.0, 100.0);
        collisions.remove(h);
    }

    #[test]
    fn test_add_reuses_freed_slot() {
        let (mut arena, mut collisions) = setup();
        let a = enemy(&mut arena, 100.0, 100.0);
        let b = enemy(&mut arena, 200.0, 100.0);
        collisions.add(a);
        collisions.add(b);
        collisions.remove(a);
        assert_eq!(collisions.len(), 1);

        let c = enemy(&mut arena, 300.0, 100.0);
        collisions.add(c);
        assert_eq!(collisions.slots[0], Some(c));
        assert_eq!(collisions.len(), 2);
    }

    #[test]
    fn test_player_above_enemy_wins() {
        let (mut arena, mut collisions) = setup();
        let player = arena.insert(GameObject::Player(Player::new(Vector2::new(300.0, 280.0))));
        let target = enemy(&mut arena, 310.0, 300.0);
        collisions.add(player);
        collisions.add(target);

        let mut events = Vec::new();
        collisions.handle_all_collisions(player, &mut arena, &mut events);

        assert!(!arena.get(target).unwrap().object().is_enabled());
        assert_eq!(
            events,
            vec![GameEvent::EnemyKilled {
                enemy: target,
                kind: EnemyKind::Bounder
            }]
        );
    }

    #[test]
    fn test_scan_stops_at_first_empty_slot() {
        let (mut arena, mut collisions) = setup();
        let player = arena.insert(GameObject::Player(Player::new(Vector2::new(300.0, 280.0))));
        let gone = enemy(&mut arena, 800.0, 600.0);
        let target = enemy(&mut arena, 310.0, 300.0);
        collisions.add(player);
        collisions.add(gone);
        collisions.add(target);
        collisions.remove(gone);

        let mut events = Vec::new();
        collisions.handle_all_collisions(player, &mut arena, &mut events);

        assert!(arena.get(target).unwrap().object().is_enabled());
        assert!(events.is_empty());
    }

    #[test]
    fn test_sleeping_initiator_and_disabled_targets_skipped() {
        let (mut arena, mut collisions) = setup();
        let floor = arena.insert(GameObject::Platform(Platform::new(
            Vector2::new(200.0, 300.0),
            Vector2::new(300.0, 20.0),
        )));
        let player = arena.insert(GameObject::Player(Player::new(Vector2::new(300.0, 290.0))));
        collisions.add(floor);
        collisions.add(player);

        let mut events = Vec::new();
        collisions.handle_all_collisions(floor, &mut arena, &mut events);
        assert_eq!(arena.get(player).unwrap().object().position.y, 290.0);

        arena.get_mut(floor).unwrap().object_mut().disable();
        collisions.handle_all_collisions(player, &mut arena, &mut events);
        assert_eq!(arena.get(player).unwrap().object().position.y, 290.0);

        arena.get_mut(floor).unwrap().object_mut().enable();
        collisions.handle_all_collisions(player, &mut arena, &mut events);
        let landed = arena.get(player).unwrap().entity().unwrap();
        assert!(landed.is_grounded);
        assert!((landed.object.position.y - 273.00005).abs() < 1e-3);
    }
}
