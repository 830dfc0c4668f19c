//! Joust: a single-player arcade jousting game
//!
//! The library holds the whole simulation and knows nothing about windows,
//! textures or audio devices. A front end drives it through [`game::Game`]:
//! it supplies elapsed time, an [`input::InputSource`] and a
//! [`sound::AudioBackend`] each frame, and replays the [`render::DrawList`]
//! the game fills in.

pub mod animation;
pub mod collision;
pub mod config;
pub mod enemy;
pub mod entity;
pub mod error;
pub mod event;
pub mod game;
pub mod geometry;
pub mod input;
pub mod object;
pub mod object_manager;
pub mod platform;
pub mod player;
pub mod render;
pub mod sound;
pub mod sprite;
pub mod widgets;
