/// Phase selection: which single surface the screen shows.
///
/// Precedence, first match wins:
///   1. game not over              → Play
///   2. loser present and eligible → Benevolence
///   3. otherwise                  → Final
///
/// The game-over flag is authoritative. A snapshot that names a loser while
/// the game is still running selects Play.

use crate::domain::snapshot::GameSnapshot;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Play,
    Benevolence,
    Final,
}

impl Phase {
    pub fn evaluate(snapshot: &GameSnapshot) -> Phase {
        if !snapshot.is_game_over {
            Phase::Play
        } else if snapshot.loser.is_some() && snapshot.benevolence_eligible {
            Phase::Benevolence
        } else {
            Phase::Final
        }
    }

    /// Final is never left once entered.
    pub fn is_terminal(self) -> bool {
        self == Phase::Final
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Play => "Play",
            Phase::Benevolence => "Benevolence",
            Phase::Final => "Final",
        }
    }
}

/// True when the snapshot's flags contradict each other.
pub fn is_inconsistent(snapshot: &GameSnapshot) -> bool {
    !snapshot.is_game_over && snapshot.loser.is_some()
}
