use log::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    Death,
    ExtraLife,
    Flap,
    PlatformBounce,
    Spawn,
    Start,
    WaveStart,
}

impl Sound {
    pub fn length_ms(self) -> u32 {
        match self {
            Sound::Death => 500,
            Sound::ExtraLife => 1000,
            Sound::Flap => 200,
            Sound::PlatformBounce => 200,
            Sound::Spawn => 300,
            Sound::Start => 2200,
            Sound::WaveStart => 1100,
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Sound::Death => "asset/sounds/jDeath.wav",
            Sound::ExtraLife => "asset/sounds/jExtraLife.wav",
            Sound::Flap => "asset/sounds/jFlap.wav",
            Sound::PlatformBounce => "asset/sounds/jPlatformBounce.wav",
            Sound::Spawn => "asset/sounds/jSpawn1.wav",
            Sound::Start => "asset/sounds/jStart.wav",
            Sound::WaveStart => "asset/sounds/jWaveStart.wav",
        }
    }
}

/// Whatever actually makes noise.
pub trait AudioBackend {
    fn play(&mut self, sound: Sound);
    fn stop(&mut self, sound: Sound);
}

/// Plays at most one sound at a time.
///
/// A new sound only starts when nothing is playing, unless it has priority,
/// in which case it cuts off the current one.
#[derive(Debug, Default)]
pub struct OneShotPlayer {
    current: Option<Sound>,
    timer_ms: u32,
    playing: bool,
}

impl OneShotPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn current(&self) -> Option<Sound> {
        self.current
    }

    /// Must be called once per frame.
    pub fn advance(&mut self, milliseconds: u32) {
        self.timer_ms = self.timer_ms.saturating_add(milliseconds);
        let length = self.current.map_or(0, Sound::length_ms);
        if self.timer_ms >= length {
            self.playing = false;
        }
    }

    /// Returns whether `sound` started.
    pub fn play_isolated(&mut self, sound: Sound, priority: bool, backend: &mut dyn AudioBackend) -> bool {
        if self.playing && !priority {
            trace!("dropped {:?}, {:?} still playing", sound, self.current);
            return false;
        }
        if let Some(previous) = self.current {
            backend.stop(previous);
        }
        trace!("playing {:?} (priority: {})", sound, priority);
        self.current = Some(sound);
        self.timer_ms = 0;
        self.playing = true;
        backend.play(sound);
        true
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Records every backend call in order.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingAudio {
        pub played: Vec<Sound>,
        pub stopped: Vec<Sound>,
    }

    impl AudioBackend for RecordingAudio {
        fn play(&mut self, sound: Sound) {
            self.played.push(sound);
        }

        fn stop(&mut self, sound: Sound) {
            self.stopped.push(sound);
        }
    }

    #[test]
    fn test_non_priority_waits_for_current_sound() {
        let mut player = OneShotPlayer::new();
        let mut audio = RecordingAudio::default();

        assert!(player.play_isolated(Sound::Death, false, &mut audio));
        assert!(!player.play_isolated(Sound::Flap, false, &mut audio));

        player.advance(499);
        assert!(player.is_playing());
        player.advance(1);
        assert!(!player.is_playing());

        assert!(player.play_isolated(Sound::Flap, false, &mut audio));
        assert_eq!(audio.played, vec![Sound::Death, Sound::Flap]);
        assert_eq!(audio.stopped, vec![Sound::Death]);
    }

    #[test]
    fn test_priority_cuts_off_current_sound() {
        let mut player = OneShotPlayer::new();
        let mut audio = RecordingAudio::default();

        player.play_isolated(Sound::Start, true, &mut audio);
        player.advance(100);
        assert!(player.play_isolated(Sound::Spawn, true, &mut audio));

        assert_eq!(player.current(), Some(Sound::Spawn));
        assert_eq!(audio.stopped, vec![Sound::Start]);
        player.advance(299);
        assert!(player.is_playing());
    }
}
