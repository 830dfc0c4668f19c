// Game module - ties the world, the level sequence and the HUD together
//
// This module contains:
// - world.rs: World struct owning every object and the update pass
// - level.rs: level definitions, wave table and the level manager
// - layout.rs: arena and HUD geometry
//
// `Game` is the only thing a front end talks to: feed it elapsed time, an
// input source and an audio backend every frame, then ask it to draw.

pub mod layout;
pub mod level;
pub mod world;

pub use level::{Level, LevelDef, LevelKind, LevelManager, LevelOutcome};
pub use world::World;

use crate::config::GameConfig;
use crate::input::{InputSource, InputState};
use crate::player::Player;
use crate::render::Renderer;
use crate::sound::AudioBackend;
use crate::sprite::SpriteAtlas;
use log::info;

pub struct Game {
    world: World,
    atlas: SpriteAtlas,
    levels: LevelManager,
    level: Level,
    /// Index into the wave table of the wave in progress.
    wave_index: usize,
}

impl Game {
    /// Builds every persistent object and opens on the title screen.
    pub fn new(config: &GameConfig) -> Self {
        let mut world = World::new(config.max_objects, config.rng_seed);
        let atlas = SpriteAtlas::new();
        let mut levels = LevelManager::new(&mut world, &atlas, config);
        let level = levels.load(&mut world, LevelDef::TITLE);
        info!(
            "game ready: {} objects, capacity {}",
            world.len(),
            world.capacity()
        );

        Game {
            world,
            atlas,
            levels,
            level,
            wave_index: 0,
        }
    }

    /// Advances the game by `milliseconds`.
    ///
    /// Input is sampled once up front, so everything in this frame sees the
    /// same key state.
    pub fn update<I: InputSource + ?Sized>(&mut self, milliseconds: u32, input: &I, audio: &mut dyn AudioBackend) {
        let input = InputState::sample(input);

        let outcome = self
            .levels
            .update(&mut self.level, &mut self.world, &input, milliseconds, audio);
        match outcome {
            LevelOutcome::Continue => {}
            LevelOutcome::Title => self.change_level(LevelDef::TITLE, audio),
            LevelOutcome::Hiscores => self.change_level(LevelDef::HISCORES, audio),
            LevelOutcome::StartWaves => {
                self.wave_index = 0;
                self.change_level(LevelDef::wave(self.wave_index), audio);
            }
            LevelOutcome::NextWave => {
                if self.level.kind() == LevelKind::Wave {
                    self.wave_index += 1;
                }
                self.change_level(LevelDef::wave(self.wave_index), audio);
            }
        }

        for event in self.world.update(milliseconds, input) {
            self.levels.handle_event(event, &mut self.world, audio);
        }
    }

    fn change_level(&mut self, def: LevelDef, audio: &mut dyn AudioBackend) {
        self.levels.unload(&mut self.world, &mut self.level);
        self.level = self.levels.load(&mut self.world, def);
        self.levels.announce(&self.level, &self.world, audio);
    }

    /// Draws every enabled object, then the level's popups on top.
    pub fn draw(&mut self, renderer: &mut dyn Renderer) {
        self.world.draw(renderer, &self.atlas);
        self.levels.draw(&self.level, &self.world, renderer, &self.atlas);
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn atlas(&self) -> &SpriteAtlas {
        &self.atlas
    }

    pub fn player(&self) -> Option<&Player> {
        self.world.player()
    }

    pub fn score(&self) -> u32 {
        self.levels.score(&self.world)
    }

    pub fn wave_number(&self) -> u32 {
        self.levels.wave_number(&self.world)
    }
}
