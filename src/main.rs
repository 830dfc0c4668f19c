use joust::config::GameConfig;
use joust::game::Game;
use joust::input::{InputSource, Key};
use joust::render::DrawList;
use joust::sound::{AudioBackend, Sound};
use joust::sprite::SheetId;
use log::{debug, info};
use sdl2::event::Event;
use sdl2::image::LoadTexture;
use sdl2::keyboard::{KeyboardState, Keycode, Scancode};
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use std::path::Path;
use std::time::{Duration, Instant};

// Game resolution constants
const GAME_WIDTH: u32 = 1024;
const GAME_HEIGHT: u32 = 768;
const CONFIG_PATH: &str = "joust.json";

/// Arrow keys steer, space flaps, return confirms.
struct SdlKeyboard<'a> {
    state: KeyboardState<'a>,
}

impl InputSource for SdlKeyboard<'_> {
    fn is_key_down(&self, key: Key) -> bool {
        let scancode = match key {
            Key::Left => Scancode::Left,
            Key::Right => Scancode::Right,
            Key::Flap => Scancode::Space,
            Key::Confirm => Scancode::Return,
        };
        self.state.is_scancode_pressed(scancode)
    }
}

/// Reports sound requests to the log; no mixer is wired up.
struct LoggingAudio;

impl AudioBackend for LoggingAudio {
    fn play(&mut self, sound: Sound) {
        debug!("play {} ({} ms)", sound.file_name(), sound.length_ms());
    }

    fn stop(&mut self, sound: Sound) {
        debug!("stop {}", sound.file_name());
    }
}

struct SpriteSheets<'a> {
    title: Texture<'a>,
    main: Texture<'a>,
}

impl<'a> SpriteSheets<'a> {
    fn load(texture_creator: &'a TextureCreator<WindowContext>, config: &GameConfig) -> Result<Self, String> {
        Ok(SpriteSheets {
            title: load_texture(texture_creator, &config.assets.title_sheet)?,
            main: load_texture(texture_creator, &config.assets.main_sheet)?,
        })
    }

    fn get(&self, sheet: SheetId) -> &Texture<'a> {
        match sheet {
            SheetId::Title => &self.title,
            SheetId::Main => &self.main,
        }
    }
}

/// Loads a texture from the given path with consistent error handling
fn load_texture<'a>(
    texture_creator: &'a TextureCreator<WindowContext>,
    path: &str,
) -> Result<Texture<'a>, String> {
    texture_creator
        .load_texture(path)
        .map_err(|e| format!("Failed to load {}: {}", path, e))
}

/// Uses `joust.json` when there is one; a broken file is an error, not a
/// silent fallback.
fn load_config() -> Result<GameConfig, Box<dyn std::error::Error>> {
    if Path::new(CONFIG_PATH).exists() {
        return Ok(GameConfig::load_from_file(CONFIG_PATH)?);
    }
    info!("no {} found, using default settings", CONFIG_PATH);
    Ok(GameConfig::default())
}

/// Replays one frame of draw calls back to front.
fn present_frame(canvas: &mut Canvas<Window>, sheets: &SpriteSheets, frame: &DrawList) -> Result<(), String> {
    canvas.set_draw_color(Color::RGB(0, 0, 0));
    canvas.clear();

    for call in frame.sorted() {
        let texture = sheets.get(call.sheet);
        let query = texture.query();
        let (width, height) = (query.width as f32, query.height as f32);
        let src = Rect::new(
            (call.uv.top_left.x * width).round() as i32,
            (call.uv.top_left.y * height).round() as i32,
            (call.uv.width() * width).round() as u32,
            (call.uv.height() * height).round() as u32,
        );
        let dest = call.destination();
        let dst = Rect::new(
            dest.top_left.x.round() as i32,
            dest.top_left.y.round() as i32,
            dest.width().round() as u32,
            dest.height().round() as u32,
        );
        canvas.copy_ex(texture, Some(src), Some(dst), 0.0, None, call.mirror, false)?;
    }

    canvas.set_draw_color(Color::RGB(255, 0, 0));
    for outline in frame.outlines() {
        canvas.draw_rect(Rect::new(
            outline.top_left.x.round() as i32,
            outline.top_left.y.round() as i32,
            outline.width().round() as u32,
            outline.height().round() as u32,
        ))?;
    }

    canvas.present();
    Ok(())
}

fn run(config: &GameConfig) -> Result<(), String> {
    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;
    let _image_context = sdl2::image::init(sdl2::image::InitFlag::PNG)?;

    // Nearest neighbour scaling keeps the pixel art crisp
    sdl2::hint::set("SDL_RENDER_SCALE_QUALITY", "0");

    let window_width = (GAME_WIDTH as f32 * config.window_scale).round() as u32;
    let window_height = (GAME_HEIGHT as f32 * config.window_scale).round() as u32;
    info!("window: {}x{} (scale {})", window_width, window_height, config.window_scale);

    let window = video_subsystem
        .window("Joust", window_width, window_height)
        .position_centered()
        .build()
        .map_err(|e| e.to_string())?;

    let mut canvas = window.into_canvas().present_vsync().build().map_err(|e| e.to_string())?;
    canvas.set_logical_size(GAME_WIDTH, GAME_HEIGHT).map_err(|e| e.to_string())?;

    let texture_creator = canvas.texture_creator();
    let sheets = SpriteSheets::load(&texture_creator, config)?;
    let mut event_pump = sdl_context.event_pump()?;

    let mut game = Game::new(config);
    let mut audio = LoggingAudio;
    let mut frame = DrawList::new();
    let mut last_tick = Instant::now();

    'running: loop {
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'running,
                _ => {}
            }
        }

        // Whole milliseconds only; the remainder carries into the next frame
        let elapsed = last_tick.elapsed().as_millis() as u32;
        last_tick += Duration::from_millis(u64::from(elapsed));

        let keyboard = SdlKeyboard {
            state: event_pump.keyboard_state(),
        };
        game.update(elapsed, &keyboard, &mut audio);

        frame.clear();
        game.draw(&mut frame);
        present_frame(&mut canvas, &sheets, &frame)?;
    }

    info!("final score: {}", game.score());
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    run(&config)?;
    Ok(())
}
