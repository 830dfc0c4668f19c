use crate::enemy::EnemyKind;
use crate::object::Handle;

/// Short feedback cues raised by actors, mapped to sounds by the level layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Flap,
    Platform,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueSource {
    Player,
    Enemy,
}

/// Things that happened during the update pass that the orchestration layer
/// reacts to (scoring, lives, sounds).
///
/// Actors push these in the order they happen; the game loop drains the queue
/// once the object update pass is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Cue { cue: Cue, source: CueSource },
    EnemyKilled { enemy: Handle, kind: EnemyKind },
    PlayerKilled,
}
