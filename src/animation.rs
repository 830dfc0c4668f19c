use serde::{Deserialize, Serialize};

/// Animation states shared by the player and every enemy kind.
///
/// The player never sits in `Idle`; it shows a still frame of `Running`
/// instead. Enemies start out in `Idle` until their first grounded update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationState {
    Idle,
    Running,
    RunSlowing,
    Flying,
}

impl AnimationState {
    /// Timer value at which the next frame is shown.
    ///
    /// `Running` is measured in ms * |x velocity|, so faster runners animate
    /// faster. A zero duration advances on every draw.
    pub fn frame_duration(self) -> u32 {
        match self {
            AnimationState::Idle => 0,
            AnimationState::Running => 5000,
            AnimationState::RunSlowing => 0,
            AnimationState::Flying => 150,
        }
    }

    fn timer_index(self) -> usize {
        match self {
            AnimationState::Idle => 0,
            AnimationState::Running => 1,
            AnimationState::RunSlowing => 2,
            AnimationState::Flying => 3,
        }
    }
}

/// Which flying frames show the wings up and down for a sprite set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WingFrames {
    pub up: u8,
    pub down: u8,
}

/// Current animation state, frame and one timer per state.
///
/// Timers are fed during update and consumed during draw, where the frame
/// actually advances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animator {
    state: AnimationState,
    frame: u8,
    timers: [u32; 4],
}

impl Animator {
    pub fn new(state: AnimationState, frame: u8) -> Self {
        Animator {
            state,
            frame,
            timers: [0; 4],
        }
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn frame(&self) -> u8 {
        self.frame
    }

    pub fn timer(&self, state: AnimationState) -> u32 {
        self.timers[state.timer_index()]
    }

    pub fn set(&mut self, state: AnimationState, frame: u8) {
        self.state = state;
        self.frame = frame;
    }

    pub fn set_frame(&mut self, frame: u8) {
        self.frame = frame;
    }

    /// Feeds the active state's timer after a physics step.
    ///
    /// The flying timer only runs on the wing-down frame so a flap holds its
    /// downstroke for a moment and never animates through the upstroke.
    pub fn accumulate(&mut self, milliseconds: u32, speed_x: f32, wings: WingFrames) {
        let elapsed = match self.state {
            AnimationState::Idle | AnimationState::RunSlowing => milliseconds,
            AnimationState::Running => milliseconds.saturating_mul(speed_x.abs() as u32),
            AnimationState::Flying if self.frame == wings.down => milliseconds,
            AnimationState::Flying => return,
        };
        let timer = &mut self.timers[self.state.timer_index()];
        *timer = timer.saturating_add(elapsed);
    }

    /// Moves to the next frame once the active timer has run out.
    ///
    /// Flying loops back to the wing-up frame, everything else to frame 0.
    pub fn advance(&mut self, frame_count: usize, wings: WingFrames) {
        let state = self.state;
        let timer = &mut self.timers[state.timer_index()];
        if *timer < state.frame_duration() {
            return;
        }
        *timer = 0;
        self.frame += 1;
        if usize::from(self.frame) >= frame_count {
            self.frame = match state {
                AnimationState::Flying => wings.up,
                _ => 0,
            };
        }
    }
}
