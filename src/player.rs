use crate::animation::{AnimationState, Animator, WingFrames};
use crate::collision::CollisionCategory;
use crate::enemy::{Enemy, PlayerSighting};
use crate::entity::Entity;
use crate::event::{Cue, CueSource, GameEvent};
use crate::geometry::{CollisionInfo, Vector2, overlap};
use crate::input::{EdgeLatch, InputState, Key};
use crate::object::{GameObject, Handle};
use crate::render::{Renderer, draw_wrapped};
use crate::sprite::SpriteAtlas;
use log::info;

pub const PLAYER_SIZE_GROUNDED: Vector2 = Vector2::new(39.0, 54.0);
pub const PLAYER_SIZE_FLYING: Vector2 = Vector2::new(39.0, 36.0);
pub const MAX_LIVES: u8 = 6;
pub const STARTING_LIVES: u8 = MAX_LIVES - 1;

const WINGS: WingFrames = WingFrames { up: 0, down: 1 };
/// Frame of the run cycle shown while standing still.
const STANDING_FRAME: u8 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub entity: Entity,
    lives: u8,
    animator: Animator,
    facing_right: bool,
    flap_latch: EdgeLatch,
}

impl Player {
    pub fn new(position: Vector2) -> Self {
        let mut entity = Entity::new(position, PLAYER_SIZE_GROUNDED, CollisionCategory::Player)
            .with_flying_size(PLAYER_SIZE_FLYING);
        entity.awake = true;

        Player {
            entity,
            lives: STARTING_LIVES,
            animator: Animator::new(AnimationState::Running, STANDING_FRAME),
            facing_right: true,
            flap_latch: EdgeLatch::default(),
        }
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    /// Adds a life unless already at the maximum. Returns whether it did.
    pub fn add_life(&mut self) -> bool {
        if self.lives >= MAX_LIVES {
            return false;
        }
        self.lives += 1;
        true
    }

    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
    }

    pub fn reset_lives(&mut self) {
        self.lives = STARTING_LIVES;
    }

    pub fn is_facing_right(&self) -> bool {
        self.facing_right
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    /// What an enemy sees when it looks for the player.
    pub fn sighting(&self) -> PlayerSighting {
        let position = if self.entity.is_grounded {
            self.entity.object.position
        } else {
            self.entity.flying_position()
        };
        PlayerSighting {
            position,
            enabled: self.entity.object.is_enabled(),
        }
    }

    pub fn update(&mut self, milliseconds: u32, input: &InputState, events: &mut Vec<GameEvent>) -> bool {
        match (input.is_down(Key::Left), input.is_down(Key::Right)) {
            (true, true) => {}
            (false, true) => self.steer(true),
            (true, false) => self.steer(false),
            (false, false) => {
                if self.entity.is_grounded && self.animator.state() != AnimationState::Running {
                    self.animator.set(AnimationState::Running, STANDING_FRAME);
                }
            }
        }

        if self.flap_latch.pressed(input.is_down(Key::Flap)) {
            self.animator.set_frame(WINGS.down);
            if self.entity.flap() {
                self.animator.set(AnimationState::Flying, WINGS.up);
            }
            events.push(GameEvent::Cue {
                cue: Cue::Flap,
                source: CueSource::Player,
            });
        }

        let delete = self.entity.default_update(milliseconds);
        self.animator.accumulate(milliseconds, self.entity.velocity.x, WINGS);

        if self.entity.is_grounded {
            if self.entity.velocity.x > 0.0 {
                self.facing_right = true;
            } else if self.entity.velocity.x < 0.0 {
                self.facing_right = false;
            }
        } else if self.animator.state() != AnimationState::Flying {
            self.animator.set(AnimationState::Flying, 0);
        }

        // Platforms re-ground the player during the collision pass.
        self.entity.is_grounded = false;
        delete
    }

    fn steer(&mut self, right: bool) {
        self.entity.accelerate(right);
        if !self.entity.is_grounded {
            self.facing_right = right;
        } else if self.facing_right != right {
            // skid while the mount turns around
            if self.animator.state() != AnimationState::RunSlowing {
                self.animator.set(AnimationState::RunSlowing, 0);
            }
        } else if self.animator.state() != AnimationState::Running {
            self.animator.set(AnimationState::Running, STANDING_FRAME);
        }
    }

    pub fn collide(
        &mut self,
        other: &mut GameObject,
        other_handle: Handle,
        info: CollisionInfo,
        events: &mut Vec<GameEvent>,
    ) {
        match other.category() {
            CollisionCategory::Enemy => {
                let GameObject::Enemy(enemy) = other else {
                    unreachable!("enemy category on a non-enemy object");
                };
                self.joust(enemy, other_handle, info, events);
            }
            CollisionCategory::Platform => {
                if info.is_side_hit() {
                    events.push(GameEvent::Cue {
                        cue: Cue::Platform,
                        source: CueSource::Player,
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

    /// The higher rider wins. Equal heights is a standoff and nothing happens.
    fn joust(&mut self, enemy: &mut Enemy, enemy_handle: Handle, info: CollisionInfo, events: &mut Vec<GameEvent>) {
        let info = if self.entity.is_grounded {
            info
        } else {
            let tight = overlap(&enemy.entity.physical_state().hitbox(), &self.entity.flying_bounds());
            if !tight.is_colliding {
                return;
            }
            tight
        };

        let mine = self.entity.object.position.y;
        let theirs = enemy.entity.object.position.y;
        if mine < theirs {
            self.entity.reflect_velocity(&info);
            enemy.entity.object.disable();
            info!("{:?} unseated", enemy.kind());
            events.push(GameEvent::EnemyKilled {
                enemy: enemy_handle,
                kind: enemy.kind(),
            });
        } else if mine > theirs {
            self.lose_life();
            self.entity.velocity = Vector2::ZERO;
            enemy.entity.reflect_velocity(&info);
            self.entity.object.disable();
            info!("player unseated, {} lives left", self.lives);
            events.push(GameEvent::PlayerKilled);
        }
    }

    pub fn draw(&mut self, renderer: &mut dyn Renderer, atlas: &SpriteAtlas) {
        let state = self.animator.state();
        let animation = atlas.player.get(state);
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
