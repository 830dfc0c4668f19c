// Level sequencing: title screen, waves, hiscores
//
// The level manager builds every persistent object once (player, HUD,
// backgrounds, platforms) and toggles them as levels load and unload. Only a
// wave's enemies are created and destroyed per level. It also owns the spawn
// cycle, scoring, extra lives, and turns gameplay events into sounds.

use super::layout::{self, ENEMY_STAGING, HISCORES_BACKGROUND_SIZE};
use super::world::World;
use crate::config::GameConfig;
use crate::enemy::{Enemy, EnemyKind};
use crate::entity::SCREEN_SIZE;
use crate::event::{Cue, CueSource, GameEvent};
use crate::geometry::{Vector2, clamp};
use crate::input::{EdgeLatch, InputState, Key};
use crate::object::{GameObject, Handle, Object};
use crate::platform::Platform;
use crate::player::Player;
use crate::render::Renderer;
use crate::sound::{AudioBackend, OneShotPlayer, Sound};
use crate::sprite::SpriteAtlas;
use crate::widgets::{Background, DigitColor, LivesDisplay, NumberDisplay, Widget};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// How long the "WAVE" popup stays up after a wave loads.
const POPUP_DISPLAY_MS: u32 = 5000;
/// Time for the score and banner to slide into place on the hiscores screen.
const HISCORES_SLIDE_MS: f32 = 3000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelKind {
    Title,
    Hiscores,
    Wave,
    /// Last wave in the table, replayed forever.
    EndlessWave,
}

impl LevelKind {
    pub fn is_wave(self) -> bool {
        matches!(self, LevelKind::Wave | LevelKind::EndlessWave)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDef {
    pub kind: LevelKind,
    pub bounders: u8,
    pub hunters: u8,
    pub shadow_lords: u8,
}

const fn wave(bounders: u8, hunters: u8, shadow_lords: u8) -> LevelDef {
    LevelDef {
        kind: LevelKind::Wave,
        bounders,
        hunters,
        shadow_lords,
    }
}

impl LevelDef {
    pub const TITLE: LevelDef = LevelDef {
        kind: LevelKind::Title,
        bounders: 0,
        hunters: 0,
        shadow_lords: 0,
    };

    pub const HISCORES: LevelDef = LevelDef {
        kind: LevelKind::Hiscores,
        ..LevelDef::TITLE
    };

    pub const ENDLESS_WAVE: LevelDef = LevelDef {
        kind: LevelKind::EndlessWave,
        ..wave(0, 0, 6)
    };

    /// Definition of the wave at `index` (0 is wave 1). Past the end of the
    /// table every wave is the endless one.
    pub fn wave(index: usize) -> LevelDef {
        WAVES.get(index).copied().unwrap_or(LevelDef::ENDLESS_WAVE)
    }

    pub const fn enemy_count(&self) -> usize {
        self.bounders as usize + self.hunters as usize + self.shadow_lords as usize
    }

    /// Every enemy in spawn order: bounders, then hunters, then shadow lords.
    pub fn enemies(&self) -> impl Iterator<Item = EnemyKind> {
        std::iter::repeat_n(EnemyKind::Bounder, usize::from(self.bounders))
            .chain(std::iter::repeat_n(EnemyKind::Hunter, usize::from(self.hunters)))
            .chain(std::iter::repeat_n(EnemyKind::ShadowLord, usize::from(self.shadow_lords)))
    }
}

/// Objects that live for the whole run: 3 backgrounds, score, wave counter,
/// player, lives display and 8 platforms.
pub const PERSISTENT_OBJECTS: usize = 15;

/// Smallest registry that fits the persistent objects and the biggest wave.
pub const MIN_OBJECT_CAPACITY: usize = PERSISTENT_OBJECTS + largest_wave();

const fn largest_wave() -> usize {
    let mut largest = LevelDef::ENDLESS_WAVE.enemy_count();
    let mut i = 0;
    while i < WAVES.len() {
        let count = WAVES[i].enemy_count();
        if count > largest {
            largest = count;
        }
        i += 1;
    }
    largest
}

pub const WAVES: [LevelDef; 30] = [
    wave(3, 0, 0),
    wave(4, 0, 0),
    wave(6, 0, 0),
    wave(3, 3, 0),
    wave(0, 0, 1),
    wave(3, 3, 0),
    wave(2, 4, 0),
    wave(0, 6, 0),
    wave(0, 6, 0),
    wave(0, 0, 2),
    wave(3, 5, 0),
    wave(2, 6, 0),
    wave(0, 7, 0),
    wave(0, 8, 0),
    wave(0, 0, 3),
    wave(0, 5, 1),
    wave(0, 5, 1),
    wave(0, 5, 1),
    wave(0, 4, 2),
    wave(0, 0, 4),
    wave(0, 3, 3),
    wave(0, 2, 4),
    wave(0, 2, 4),
    wave(0, 2, 4),
    wave(0, 0, 5),
    wave(0, 3, 5),
    wave(0, 3, 5),
    wave(0, 3, 5),
    wave(0, 3, 5),
    wave(0, 0, 6),
];

/// What the game loop should do after a level update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelOutcome {
    Continue,
    Title,
    Hiscores,
    StartWaves,
    NextWave,
}

/// A loaded level.
#[derive(Debug)]
pub struct Level {
    def: LevelDef,
    background: Handle,
    enemies: Vec<Handle>,
}

impl Level {
    pub fn def(&self) -> LevelDef {
        self.def
    }

    pub fn kind(&self) -> LevelKind {
        self.def.kind
    }

    /// This wave's enemies in spawn order, spawned or not.
    pub fn enemies(&self) -> &[Handle] {
        &self.enemies
    }
}

#[derive(Debug)]
pub struct LevelManager {
    player: Handle,
    title_background: Handle,
    wave_background: Handle,
    hiscores_background: Handle,
    score: Handle,
    wave_counter: Handle,
    lives_display: Handle,
    platforms: Vec<Handle>,

    spawn_points: [Vector2; 4],
    spawn_cursor: usize,
    spawn_timer: u32,
    spawned_enemies: usize,
    alive_enemies: usize,

    score_wave_position: Vector2,
    score_hiscore_position: Vector2,
    banner_path: (Vector2, Vector2),
    slide_timer: u32,
    popup_timer: u32,
    extra_life_counter: u32,

    spawn_cycle_ms: u32,
    safe_spawn_radius: f32,
    allow_spawn_camping: bool,
    extra_life_points: u32,

    sounds: OneShotPlayer,
    confirm: EdgeLatch,
}

fn disabled(mut object: GameObject) -> GameObject {
    object.object_mut().disable();
    object
}

impl LevelManager {
    /// Creates every persistent object, all hidden, and registers the player
    /// as the world's chase target.
    pub fn new(world: &mut World, atlas: &SpriteAtlas, config: &GameConfig) -> Self {
        let title_background = world.spawn(disabled(GameObject::Background(Background::new(
            atlas.title_background,
            SCREEN_SIZE,
        ))));
        let wave_background = world.spawn(disabled(GameObject::Background(Background::new(
            atlas.wave_background,
            SCREEN_SIZE,
        ))));
        let hiscores_background = world.spawn(disabled(GameObject::Background(Background::new(
            atlas.hiscores_background,
            HISCORES_BACKGROUND_SIZE,
        ))));

        let scoreboard = layout::scoreboard();
        let score = world.spawn(disabled(GameObject::Widget(Widget::Number(NumberDisplay::new(
            DigitColor::Yellow,
            scoreboard,
            layout::SCORE_DIGITS,
            layout::HUD_GAP,
        )))));
        let wave_counter = world.spawn(disabled(GameObject::Widget(Widget::Number(NumberDisplay::new(
            DigitColor::White,
            layout::WAVE_COUNTER_BOX,
            layout::WAVE_COUNTER_DIGITS,
            layout::HUD_GAP,
        )))));

        let player = world.spawn(disabled(GameObject::Player(Player::new(Vector2::ZERO))));
        world.set_player(player);

        let lives_display = world.spawn(disabled(GameObject::Widget(Widget::Lives(LivesDisplay::new(
            layout::lives_box(),
            layout::HUD_GAP,
        )))));

        let platforms = layout::platforms()
            .into_iter()
            .map(|rect| {
                let platform = Platform::new(rect.top_left, rect.dimensions()).with_debug_draw(config.debug_draw_platforms);
                world.spawn(disabled(GameObject::Platform(platform)))
            })
            .collect();

        LevelManager {
            player,
            title_background,
            wave_background,
            hiscores_background,
            score,
            wave_counter,
            lives_display,
            platforms,
            spawn_points: layout::spawn_points(),
            spawn_cursor: 0,
            spawn_timer: 0,
            spawned_enemies: 0,
            alive_enemies: 0,
            score_wave_position: scoreboard.top_left,
            score_hiscore_position: layout::hiscore_score_position(),
            banner_path: layout::hiscores_banner_path(),
            slide_timer: 0,
            popup_timer: 0,
            extra_life_counter: 0,
            spawn_cycle_ms: config.spawn_cycle_ms,
            safe_spawn_radius: config.safe_spawn_radius,
            allow_spawn_camping: config.allow_spawn_camping,
            extra_life_points: config.extra_life_points,
            sounds: OneShotPlayer::new(),
            confirm: EdgeLatch::default(),
        }
    }

    pub fn player(&self) -> Handle {
        self.player
    }

    pub fn score(&self, world: &World) -> u32 {
        number(world, self.score).value()
    }

    /// Number of the wave in progress (or last played), starting at 1.
    pub fn wave_number(&self, world: &World) -> u32 {
        number(world, self.wave_counter).value()
    }

    pub fn alive_enemies(&self) -> usize {
        self.alive_enemies
    }

    pub fn spawned_enemies(&self) -> usize {
        self.spawned_enemies
    }

    pub fn extra_life_counter(&self) -> u32 {
        self.extra_life_counter
    }

    pub fn sounds(&self) -> &OneShotPlayer {
        &self.sounds
    }

    /// Shows the objects `def` needs and, for waves, creates its enemies.
    ///
    /// Sounds are left to [`LevelManager::announce`].
    pub fn load(&mut self, world: &mut World, def: LevelDef) -> Level {
        let (background, enemies) = match def.kind {
            LevelKind::Title => (self.title_background, Vec::new()),
            LevelKind::Hiscores => {
                object_mut(world, self.hiscores_background).position = self.banner_path.0;
                self.slide_timer = 0;
                (self.hiscores_background, Vec::new())
            }
            LevelKind::Wave | LevelKind::EndlessWave => {
                let counter = number_mut(world, self.wave_counter);
                counter.add(1);
                let wave_number = counter.value();
                object_mut(world, self.wave_counter).enable();
                if wave_number == 1 {
                    self.spawn_cursor = 0;
                }
                self.popup_timer = 0;
                self.spawn_timer = 0;

                number_mut(world, self.score).set_position(self.score_wave_position);
                object_mut(world, self.score).enable();
                object_mut(world, self.lives_display).enable();
                for &platform in &self.platforms {
                    object_mut(world, platform).enable();
                }

                self.alive_enemies = def.enemy_count();
                self.spawned_enemies = 0;
                let enemies = def
                    .enemies()
                    .enumerate()
                    .map(|(i, kind)| {
                        let staging = ENEMY_STAGING[i % ENEMY_STAGING.len()];
                        let enemy = Enemy::new(staging, kind, world.rng_mut());
                        world.spawn(disabled(GameObject::Enemy(enemy)))
                    })
                    .collect();

                info!(
                    "wave {} loaded: {} bounders, {} hunters, {} shadow lords",
                    wave_number, def.bounders, def.hunters, def.shadow_lords
                );
                (self.wave_background, enemies)
            }
        };
        object_mut(world, background).enable();
        info!("loaded {:?}", def.kind);

        Level {
            def,
            background,
            enemies,
        }
    }

    /// Plays the fanfare for a freshly loaded level.
    pub fn announce(&mut self, level: &Level, world: &World, audio: &mut dyn AudioBackend) {
        if !level.kind().is_wave() {
            return;
        }
        let sound = if self.wave_number(world) == 1 {
            Sound::Start
        } else {
            Sound::WaveStart
        };
        self.sounds.play_isolated(sound, true, audio);
    }

    /// Hides the level's background and destroys a wave's enemies.
    pub fn unload(&mut self, world: &mut World, level: &mut Level) {
        object_mut(world, level.background).disable();
        for enemy in level.enemies.drain(..) {
            world.despawn(enemy);
        }
        info!("unloaded {:?}", level.kind());
    }

    pub fn update(
        &mut self,
        level: &mut Level,
        world: &mut World,
        input: &InputState,
        milliseconds: u32,
        audio: &mut dyn AudioBackend,
    ) -> LevelOutcome {
        self.sounds.advance(milliseconds);
        let confirmed = self.confirm.pressed(input.is_down(Key::Confirm));

        match level.kind() {
            LevelKind::Title => {
                if confirmed {
                    player_mut(world, self.player).reset_lives();
                    self.sync_lives_display(world);
                    number_mut(world, self.score).set_value(0);
                    number_mut(world, self.wave_counter).set_value(0);
                    self.extra_life_counter = 0;
                    return LevelOutcome::StartWaves;
                }
            }
            LevelKind::Hiscores => {
                self.slide_timer = self.slide_timer.saturating_add(milliseconds);
                let t = clamp(self.slide_timer as f32 / HISCORES_SLIDE_MS, 0.0, 1.0);
                let score_position = self.score_wave_position.lerp(self.score_hiscore_position, t);
                number_mut(world, self.score).set_position(score_position);
                object_mut(world, level.background).position = self.banner_path.0.lerp(self.banner_path.1, t);

                if confirmed {
                    object_mut(world, self.score).disable();
                    object_mut(world, self.lives_display).disable();
                    return LevelOutcome::Title;
                }
            }
            LevelKind::Wave | LevelKind::EndlessWave => {
                self.popup_timer = self.popup_timer.saturating_add(milliseconds);
                if self.popup_timer > POPUP_DISPLAY_MS {
                    object_mut(world, self.wave_counter).disable();
                }

                if self.alive_enemies == 0 {
                    return LevelOutcome::NextWave;
                }
                if player(world, self.player).lives() == 0 {
                    return LevelOutcome::Hiscores;
                }
                self.spawn_next(level, world, milliseconds, audio);
            }
        }
        LevelOutcome::Continue
    }

    /// Brings the player back, or the next waiting enemy in, once per spawn
    /// cycle. The player always goes first.
    fn spawn_next(&mut self, level: &Level, world: &mut World, milliseconds: u32, audio: &mut dyn AudioBackend) {
        self.spawn_timer = self.spawn_timer.saturating_add(milliseconds);
        if self.spawn_timer < self.spawn_cycle_ms {
            return;
        }

        let player = player(world, self.player);
        let player_waiting = !player.entity.object.is_enabled() && player.lives() > 0;

        if player_waiting {
            let threats = enabled_positions(world, &level.enemies);
            let Some(point) = self.open_spawn_point(&threats) else {
                debug!("every spawn point is camped, player waits");
                return;
            };

            let object = object_mut(world, self.player);
            object.position = Vector2::new(point.x, point.y - object.size.y / 2.0);
            object.enable();
            self.sync_lives_display(world);
            self.sounds.play_isolated(Sound::Spawn, true, audio);
            debug!("player spawned at {:?}", point);
        } else if self.spawned_enemies < level.enemies.len() {
            let threats = enabled_positions(world, &[self.player]);
            let Some(point) = self.open_spawn_point(&threats) else {
                debug!("every spawn point is camped, enemy waits");
                return;
            };

            let handle = level.enemies[self.spawned_enemies];
            let object = object_mut(world, handle);
            object.position = Vector2::new(point.x, point.y - object.size.y / 2.0);
            object.enable();
            self.spawned_enemies += 1;
            self.sounds.play_isolated(Sound::Spawn, false, audio);
            debug!("enemy {:?} spawned at {:?}", handle, point);
        } else {
            return;
        }

        self.spawn_timer = 0;
        self.advance_spawn_cursor();
    }

    /// First spawn point, from the cursor on, with no threat inside the safe
    /// radius. Leaves the cursor on the point it picked.
    fn open_spawn_point(&mut self, threats: &[Vector2]) -> Option<Vector2> {
        if self.allow_spawn_camping {
            return Some(self.spawn_points[self.spawn_cursor]);
        }
        for _ in 0..self.spawn_points.len() {
            let point = self.spawn_points[self.spawn_cursor];
            if threats.iter().all(|t| t.distance(point) > self.safe_spawn_radius) {
                return Some(point);
            }
            self.advance_spawn_cursor();
        }
        None
    }

    fn advance_spawn_cursor(&mut self) {
        self.spawn_cursor = (self.spawn_cursor + 1) % self.spawn_points.len();
    }

    /// Shows the lives in reserve: all of them while the player waits to
    /// spawn, one fewer while the player is on screen.
    fn sync_lives_display(&self, world: &mut World) {
        let player = player(world, self.player);
        let on_screen = u8::from(player.entity.object.is_enabled());
        let reserve = player.lives().saturating_sub(on_screen);
        lives_mut(world, self.lives_display).set_count(reserve);
    }

    /// Applies one gameplay event: scoring, lives and sound.
    pub fn handle_event(&mut self, event: GameEvent, world: &mut World, audio: &mut dyn AudioBackend) {
        match event {
            GameEvent::EnemyKilled { enemy, kind } => {
                self.alive_enemies = self.alive_enemies.saturating_sub(1);
                self.sounds.play_isolated(Sound::Death, false, audio);

                let points = kind.points();
                number_mut(world, self.score).add(points);
                info!("{:?} {:?} killed for {} points", kind, enemy, points);

                self.extra_life_counter += points;
                if self.extra_life_counter >= self.extra_life_points {
                    self.extra_life_counter -= self.extra_life_points;
                    if player_mut(world, self.player).add_life() {
                        self.sync_lives_display(world);
                        self.sounds.play_isolated(Sound::ExtraLife, true, audio);
                        info!("extra life awarded");
                    }
                }
            }
            GameEvent::PlayerKilled => {
                self.spawn_timer = 0;
                self.sounds.play_isolated(Sound::Death, true, audio);
            }
            GameEvent::Cue {
                cue,
                source: CueSource::Player,
            } => {
                let sound = match cue {
                    Cue::Flap => Sound::Flap,
                    Cue::Platform => Sound::PlatformBounce,
                };
                self.sounds.play_isolated(sound, false, audio);
            }
            GameEvent::Cue {
                source: CueSource::Enemy,
                ..
            } => {}
        }
    }

    /// Popup words shown at the start of a wave.
    pub fn draw(&self, level: &Level, world: &World, renderer: &mut dyn Renderer, atlas: &SpriteAtlas) {
        if !level.kind().is_wave() || self.popup_timer > POPUP_DISPLAY_MS {
            return;
        }
        let wave = &atlas.word_wave;
        wave.draw(renderer, layout::WAVE_WORD_POSITION, layout::word_size(wave), false);
        if self.wave_number(world) == 1 {
            let prepare = &atlas.word_prepare_to_joust;
            prepare.draw(renderer, layout::PREPARE_WORD_POSITION, layout::word_size(prepare), false);
        }
    }
}

fn object_mut(world: &mut World, handle: Handle) -> &mut Object {
    let Some(object) = world.get_mut(handle) else {
        panic!("level object {:?} no longer exists", handle);
    };
    object.object_mut()
}

/// Centres of the enabled objects among `handles`.
fn enabled_positions(world: &World, handles: &[Handle]) -> Vec<Vector2> {
    handles
        .iter()
        .filter_map(|&handle| world.get(handle))
        .map(GameObject::object)
        .filter(|object| object.is_enabled())
        .map(|object| object.position)
        .collect()
}

fn player(world: &World, handle: Handle) -> &Player {
    let Some(player) = world.get(handle).and_then(GameObject::as_player) else {
        panic!("{:?} is not the player", handle);
    };
    player
}

fn player_mut(world: &mut World, handle: Handle) -> &mut Player {
    let Some(player) = world.get_mut(handle).and_then(GameObject::as_player_mut) else {
        panic!("{:?} is not the player", handle);
    };
    player
}

fn number(world: &World, handle: Handle) -> &NumberDisplay {
    let Some(display) = world
        .get(handle)
        .and_then(GameObject::as_widget)
        .and_then(Widget::as_number)
    else {
        panic!("{:?} is not a number display", handle);
    };
    display
}

fn number_mut(world: &mut World, handle: Handle) -> &mut NumberDisplay {
    let Some(display) = world
        .get_mut(handle)
        .and_then(GameObject::as_widget_mut)
        .and_then(Widget::as_number_mut)
    else {
        panic!("{:?} is not a number display", handle);
    };
    display
}

fn lives_mut(world: &mut World, handle: Handle) -> &mut LivesDisplay {
    let Some(display) = world
        .get_mut(handle)
        .and_then(GameObject::as_widget_mut)
        .and_then(Widget::as_lives_mut)
    else {
        panic!("{:?} is not a lives display", handle);
    };
    display
}
