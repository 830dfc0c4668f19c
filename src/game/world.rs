// World: owns every game object and runs the per-frame update pass
//
// The arena owns the objects; the object and collision managers only hold
// handles into it. Events raised while objects update are queued here and
// handed back to the caller once the whole pass is done.

use crate::collision::CollisionManager;
use crate::event::GameEvent;
use crate::input::InputState;
use crate::object::{Arena, GameObject, Handle};
use crate::object_manager::{FrameInput, ObjectManager};
use crate::player::Player;
use crate::render::Renderer;
use crate::sprite::SpriteAtlas;
use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;

pub struct World {
    arena: Arena,
    objects: ObjectManager,
    collisions: CollisionManager,
    rng: StdRng,
    events: Vec<GameEvent>,
    player: Option<Handle>,
}

impl World {
    /// `capacity` bounds both registries. A `seed` makes every random choice
    /// reproducible.
    pub fn new(capacity: usize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        World {
            arena: Arena::new(),
            objects: ObjectManager::new(capacity),
            collisions: CollisionManager::new(capacity),
            rng,
            events: Vec::new(),
            player: None,
        }
    }

    /// Takes ownership of `object` and registers it for updates, drawing and,
    /// when collidable, collisions.
    pub fn spawn(&mut self, object: GameObject) -> Handle {
        let collidable = object.object().is_collidable();
        let handle = self.arena.insert(object);
        self.objects.add(handle, collidable, &mut self.collisions);
        debug!("spawned {:?} (collidable: {})", handle, collidable);
        handle
    }

    /// Deregisters and drops the object behind `handle`.
    ///
    /// # Panics
    ///
    /// When `handle` is stale or was never spawned.
    pub fn despawn(&mut self, handle: Handle) -> GameObject {
        let Some(object) = self.arena.get(handle) else {
            panic!("despawn of unknown object {:?}", handle);
        };
        let collidable = object.object().is_collidable();
        self.objects.remove(handle, collidable, &mut self.collisions);
        if self.player == Some(handle) {
            self.player = None;
        }
        let Some(object) = self.arena.remove(handle) else {
            unreachable!("object vanished between lookup and removal");
        };
        debug!("despawned {:?}", handle);
        object
    }

    pub fn get(&self, handle: Handle) -> Option<&GameObject> {
        self.arena.get(handle)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut GameObject> {
        self.arena.get_mut(handle)
    }

    /// Marks which object enemies chase.
    pub fn set_player(&mut self, handle: Handle) {
        assert!(
            self.arena.get(handle).and_then(GameObject::as_player).is_some(),
            "{:?} is not a player",
            handle
        );
        self.player = Some(handle);
    }

    pub fn player_handle(&self) -> Option<Handle> {
        self.player
    }

    pub fn player(&self) -> Option<&Player> {
        self.arena.get(self.player?)?.as_player()
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.arena.get_mut(self.player?)?.as_player_mut()
    }

    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.objects.capacity()
    }

    pub fn collidable_count(&self) -> usize {
        self.collisions.len()
    }

    /// Runs one update pass and returns the events it raised, oldest first.
    pub fn update(&mut self, milliseconds: u32, input: InputState) -> Vec<GameEvent> {
        self.objects.update_all(
            &mut self.arena,
            &mut self.collisions,
            FrameInput {
                milliseconds,
                input,
                player: self.player,
                rng: &mut self.rng,
                events: &mut self.events,
            },
        );
        std::mem::take(&mut self.events)
    }

    pub fn draw(&mut self, renderer: &mut dyn Renderer, atlas: &SpriteAtlas) {
        self.objects.draw_all(&mut self.arena, renderer, atlas);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemy::{Enemy, EnemyKind};
    use crate::event::{Cue, CueSource};
    use crate::geometry::Vector2;
    use crate::input::Key;
    use crate::platform::Platform;
    use crate::render::DrawList;
    use crate::widgets::Background;

    fn world() -> World {
        World::new(16, Some(42))
    }

    #[test]
    fn test_spawn_registers_collidables() {
        let mut world = world();
        let atlas = SpriteAtlas::new();
        world.spawn(GameObject::Background(Background::new(
            atlas.wave_background,
            Vector2::new(1024.0, 768.0),
        )));
        let ledge = world.spawn(GameObject::Platform(Platform::new(
            Vector2::new(0.0, 600.0),
            Vector2::new(1024.0, 40.0),
        )));

        assert_eq!(world.len(), 2);
        assert_eq!(world.collidable_count(), 1);

        world.despawn(ledge);
        assert_eq!(world.len(), 1);
        assert_eq!(world.collidable_count(), 0);
        assert!(world.get(ledge).is_none());
    }

    #[test]
    #[should_panic(expected = "unknown object")]
    fn test_despawn_twice_panics() {
        let mut world = world();
        let handle = world.spawn(GameObject::Player(Player::new(Vector2::ZERO)));
        world.despawn(handle);
        world.despawn(handle);
    }

    #[test]
    #[should_panic(expected = "not a player")]
    fn test_set_player_rejects_other_kinds() {
        let mut world = world();
        let enemy = Enemy::new(Vector2::ZERO, EnemyKind::Hunter, world.rng_mut());
        let handle = world.spawn(GameObject::Enemy(enemy));
        world.set_player(handle);
    }

    #[test]
    fn test_update_drains_events() {
        let mut world = world();
        let handle = world.spawn(GameObject::Player(Player::new(Vector2::new(500.0, 300.0))));
        world.set_player(handle);

        let events = world.update(16, InputState::with_keys(&[Key::Flap]));
        assert_eq!(
            events,
            vec![GameEvent::Cue {
                cue: Cue::Flap,
                source: CueSource::Player,
            }]
        );
        assert!(world.update(16, InputState::default()).is_empty());
    }

    #[test]
    fn test_despawning_player_clears_target() {
        let mut world = world();
        let handle = world.spawn(GameObject::Player(Player::new(Vector2::ZERO)));
        world.set_player(handle);
        assert!(world.player().is_some());

        world.despawn(handle);
        assert!(world.player_handle().is_none());
        assert!(world.player().is_none());
    }

    #[test]
    fn test_draw_skips_disabled() {
        let mut world = world();
        let atlas = SpriteAtlas::new();
        let handle = world.spawn(GameObject::Player(Player::new(Vector2::new(500.0, 300.0))));
        let mut list = DrawList::new();

        world.draw(&mut list, &atlas);
        assert_eq!(list.calls().len(), 1);

        world.get_mut(handle).unwrap().object_mut().disable();
        list.clear();
        world.draw(&mut list, &atlas);
        assert!(list.calls().is_empty());
    }
}
