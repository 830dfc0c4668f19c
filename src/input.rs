/// Logical keys the simulation reads.
///
/// The window layer decides which physical keys map to these; the core never
/// sees scancodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Flap,
    Confirm,
}

impl Key {
    pub const ALL: [Key; 4] = [Key::Left, Key::Right, Key::Flap, Key::Confirm];
}

/// Anything that can answer "is this key held right now".
pub trait InputSource {
    fn is_key_down(&self, key: Key) -> bool;
}

/// Start-of-frame snapshot of every logical key.
///
/// Sampled once per frame so every reader in that frame sees the same state,
/// however long the frame takes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    left: bool,
    right: bool,
    flap: bool,
    confirm: bool,
}

impl InputState {
    pub fn sample<I: InputSource + ?Sized>(source: &I) -> Self {
        InputState {
            left: source.is_key_down(Key::Left),
            right: source.is_key_down(Key::Right),
            flap: source.is_key_down(Key::Flap),
            confirm: source.is_key_down(Key::Confirm),
        }
    }

    /// Builds a snapshot with exactly `keys` held.
    pub fn with_keys(keys: &[Key]) -> Self {
        let mut state = InputState::default();
        for key in keys {
            match key {
                Key::Left => state.left = true,
                Key::Right => state.right = true,
                Key::Flap => state.flap = true,
                Key::Confirm => state.confirm = true,
            }
        }
        state
    }

    pub fn is_down(&self, key: Key) -> bool {
        match key {
            Key::Left => self.left,
            Key::Right => self.right,
            Key::Flap => self.flap,
            Key::Confirm => self.confirm,
        }
    }
}

impl InputSource for InputState {
    fn is_key_down(&self, key: Key) -> bool {
        self.is_down(key)
    }
}

/// Rising-edge detector for a held key.
///
/// Fires once when the key goes from released to pressed, then stays quiet
/// until the key is released again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeLatch {
    was_down: bool,
}

impl EdgeLatch {
    pub fn pressed(&mut self, down: bool) -> bool {
        if !down {
            self.was_down = false;
            return false;
        }
        let fired = !self.was_down;
        self.was_down = true;
        fired
    }
}
