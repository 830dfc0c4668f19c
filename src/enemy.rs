use crate::animation::{AnimationState, Animator, WingFrames};
use crate::collision::CollisionCategory;
use crate::entity::Entity;
use crate::event::{Cue, CueSource, GameEvent};
use crate::geometry::{CollisionInfo, Vector2, overlap};
use crate::object::GameObject;
use crate::render::{Renderer, draw_wrapped};
use crate::sprite::SpriteAtlas;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::Range;

pub const ENEMY_SIZE_GROUNDED: Vector2 = Vector2::new(39.0, 54.0);
pub const ENEMY_SIZE_FLYING: Vector2 = Vector2::new(39.0, 36.0);

const WINGS: WingFrames = WingFrames { up: 1, down: 0 };
const FLAP_INTERVAL_MS: Range<u32> = 350..850;
const DIRECTION_INTERVAL_MS: Range<u32> = 1000..10000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Bounder,
    Hunter,
    ShadowLord,
}

impl EnemyKind {
    /// Distance at which this kind notices the player.
    pub fn sight_radius(self) -> f32 {
        match self {
            EnemyKind::Bounder => 200.0,
            EnemyKind::Hunter => 400.0,
            EnemyKind::ShadowLord => 600.0,
        }
    }

    pub fn terminal_velocity(self) -> Vector2 {
        match self {
            EnemyKind::Bounder => Vector2::new(100.0, 100.0),
            EnemyKind::Hunter => Vector2::new(200.0, 200.0),
            EnemyKind::ShadowLord => Vector2::new(300.0, 300.0),
        }
    }

    pub fn points(self) -> u32 {
        match self {
            EnemyKind::Bounder => 500,
            EnemyKind::Hunter => 750,
            EnemyKind::ShadowLord => 1500,
        }
    }
}

/// Snapshot of the player taken right before an enemy updates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSighting {
    /// Centre of whichever hitbox is current.
    pub position: Vector2,
    pub enabled: bool,
}

/// Countdown timers driving the wander behaviour.
#[derive(Debug, Clone, PartialEq)]
struct WanderTimers {
    per_flap: u32,
    flap: u32,
    per_direction: u32,
    direction: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub entity: Entity,
    kind: EnemyKind,
    timers: WanderTimers,
    animator: Animator,
    facing_right: bool,
    intended_right: bool,
}

impl Enemy {
    pub fn new<R: Rng + ?Sized>(position: Vector2, kind: EnemyKind, rng: &mut R) -> Self {
        let mut entity = Entity::new(position, ENEMY_SIZE_GROUNDED, CollisionCategory::Enemy)
            .with_flying_size(ENEMY_SIZE_FLYING);
        entity.awake = true;
        entity.terminal_velocity = kind.terminal_velocity();

        let timers = WanderTimers {
            per_flap: rng.gen_range(FLAP_INTERVAL_MS),
            flap: 0,
            per_direction: rng.gen_range(DIRECTION_INTERVAL_MS),
            direction: 0,
        };
        let facing_right = rng.gen_range(0..2) != 0;

        Enemy {
            entity,
            kind,
            timers,
            animator: Animator::new(AnimationState::Idle, 0),
            facing_right,
            intended_right: facing_right,
        }
    }

    pub fn kind(&self) -> EnemyKind {
        self.kind
    }

    pub fn is_facing_right(&self) -> bool {
        self.facing_right
    }

    pub fn intends_right(&self) -> bool {
        self.intended_right
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    /// Where this enemy measures distances from.
    fn eye_position(&self) -> Vector2 {
        if self.entity.is_grounded {
            self.entity.object.position
        } else {
            self.entity.flying_position()
        }
    }

    pub fn update<R: Rng + ?Sized>(
        &mut self,
        milliseconds: u32,
        target: Option<PlayerSighting>,
        rng: &mut R,
    ) -> bool {
        let eye = self.eye_position();
        let radius = self.kind.sight_radius();
        let prey = target.filter(|t| t.enabled && t.position.distance_squared(eye) <= radius * radius);

        match prey {
            Some(prey) => self.pursue(prey.position, eye),
            None => self.wander(milliseconds, rng),
        }

        let delete = self.entity.default_update(milliseconds);
        self.animator.accumulate(milliseconds, self.entity.velocity.x, WINGS);

        if self.entity.is_grounded {
            let vx = self.entity.velocity.x;
            if vx > 0.0 && !self.facing_right {
                self.facing_right = true;
                self.animator.set(AnimationState::Running, 0);
            } else if vx < 0.0 && self.facing_right {
                self.facing_right = false;
                self.animator.set(AnimationState::Running, 0);
            }
        } else if self.animator.state() != AnimationState::Flying {
            self.animator.set(AnimationState::Flying, 0);
        }

        self.entity.is_grounded = false;
        delete
    }

    fn pursue(&mut self, prey: Vector2, eye: Vector2) {
        if prey.y <= eye.y {
            self.flap();
        }
        if prey.x < eye.x {
            self.head(false);
        } else if prey.x > eye.x {
            self.head(true);
        }
    }

    fn wander<R: Rng + ?Sized>(&mut self, milliseconds: u32, rng: &mut R) {
        if self.entity.is_grounded && self.animator.state() != AnimationState::Running {
            self.animator.set(AnimationState::Running, 0);
        }

        self.timers.flap = self.timers.flap.saturating_add(milliseconds);
        if self.timers.flap >= self.timers.per_flap {
            self.timers.flap = 0;
            self.timers.per_flap = rng.gen_range(FLAP_INTERVAL_MS);
            self.flap();
        }

        self.timers.direction = self.timers.direction.saturating_add(milliseconds);
        if self.timers.direction >= self.timers.per_direction {
            self.intended_right = !self.facing_right;
            if self.entity.is_grounded {
                self.animator.set(AnimationState::RunSlowing, 0);
            } else {
                self.facing_right = self.intended_right;
            }
            self.timers.direction = 0;
            self.timers.per_direction = rng.gen_range(DIRECTION_INTERVAL_MS);
        }

        self.entity.accelerate(self.facing_right);
    }

    /// Steers towards one side. In the air the turn is immediate; on the
    /// ground the mount skids and the landing facing update finishes it.
    fn head(&mut self, right: bool) {
        self.intended_right = right;
        if self.entity.is_grounded {
            self.animator.set(AnimationState::RunSlowing, 0);
        } else {
            self.facing_right = right;
        }
        self.entity.accelerate(right);
    }

    fn flap(&mut self) {
        self.animator.set_frame(WINGS.down);
        if self.entity.flap() {
            self.animator.set(AnimationState::Flying, WINGS.up);
        }
    }

    fn reverse(&mut self) {
        self.intended_right = !self.intended_right;
        self.facing_right = self.intended_right;
    }

    pub fn collide(&mut self, other: &mut GameObject, info: CollisionInfo, events: &mut Vec<GameEvent>) {
        match other.category() {
            CollisionCategory::Enemy => {
                let GameObject::Enemy(rival) = other else {
                    unreachable!("enemy category on a non-enemy object");
                };
                self.shove(rival, info);
            }
            CollisionCategory::Platform => {
                if info.is_side_hit() {
                    events.push(GameEvent::Cue {
                        cue: Cue::Platform,
                        source: CueSource::Enemy,
                    });
                }
                if let Some(platform) = other.entity() {
                    self.entity.default_collide(platform, &info);
                }
            }
            _ => {
                if let Some(entity) = other.entity() {
                    self.entity.default_collide(entity, &info);
                }
            }
        }
    }

    /// Pushes two overlapping enemies apart, half the overlap each, and
    /// bounces both along the resolving axis.
    fn shove(&mut self, rival: &mut Enemy, info: CollisionInfo) {
        let info = if self.entity.is_grounded && rival.entity.is_grounded {
            info
        } else {
            let tight = overlap(
                &rival.entity.physical_state().hitbox(),
                &self.entity.physical_state().hitbox(),
            );
            if !tight.is_colliding {
                return;
            }
            tight
        };

        if info.resolves_vertically() {
            let push = info.intersect.y.abs() / 2.0;
            // rival below moves down, this one up
            let direction = if info.delta.y > 0.0 { 1.0 } else { -1.0 };
            self.entity.object.position.y -= direction * push;
            rival.entity.object.position.y += direction * push;
            self.entity.velocity.y = -self.entity.velocity.y;
            rival.entity.velocity.y = -rival.entity.velocity.y;
        } else if info.resolves_horizontally() {
            let push = info.intersect.x.abs() / 2.0;
            let direction = if info.delta.x > 0.0 { 1.0 } else { -1.0 };
            self.entity.object.position.x -= direction * push;
            rival.entity.object.position.x += direction * push;
            self.entity.velocity.x = -self.entity.velocity.x;
            rival.entity.velocity.x = -rival.entity.velocity.x;
            self.reverse();
            rival.reverse();
        }
    }

    pub fn draw(&mut self, renderer: &mut dyn Renderer, atlas: &SpriteAtlas) {
        let state = self.animator.state();
        let animation = atlas.enemy(self.kind).get(state);
        self.animator.advance(animation.len(), WINGS);

        let bounds = if state == AnimationState::Flying {
            self.entity.flying_bounds()
        } else {
            self.entity.bounds()
        };
        let sprite = animation.frame(self.animator.frame());
        draw_wrapped(renderer, sprite, bounds, self.entity.game_bounds, !self.facing_right);
    }
}
