/// Events emitted by the rules engine as it applies input.
/// The presentation layer consumes these for sound.

use crate::domain::board::Pos;
use crate::domain::snapshot::PlayerId;

#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(dead_code)]
pub enum GameEvent {
    WorkerPlaced { player: PlayerId, at: Pos },
    WorkerMoved { player: PlayerId, from: Pos, to: Pos },
    MoveRejected,
    WorkerTrapped { player: PlayerId, at: Pos },
    MercyGranted { player: PlayerId },
    MercyDeclined { player: PlayerId },
    WorkerRelocated { player: PlayerId, to: Pos },
    GameWon { winner: PlayerId },
}
