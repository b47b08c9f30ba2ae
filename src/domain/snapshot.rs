/// Rules-engine contract consumed by the screen.
///
/// The screen never mutates game state directly. It forwards clicks through
/// `handle_user_input` and reads everything else back as a `GameSnapshot`.

use std::fmt;

/// Player identity: zero-based seat index.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PlayerId(pub u8);

impl PlayerId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.0 + 1)
    }
}

/// Read-only view of the rules engine, taken after every mutation.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct GameSnapshot {
    pub is_game_over: bool,
    pub loser: Option<PlayerId>,
    pub benevolence_eligible: bool,
    pub stage_message: String,
    pub rows: u32,
    pub cols: u32,
    // ── surface-only fields ──
    pub winner: Option<PlayerId>,
    pub player_names: Vec<String>,
    pub moves: u32,
}

impl GameSnapshot {
    /// Display name for a player, falling back to "Player N".
    pub fn name_of(&self, id: PlayerId) -> String {
        self.player_names
            .get(id.index())
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }
}

pub trait RulesEngine {
    fn is_game_over(&self) -> bool;
    fn loser(&self) -> Option<PlayerId>;
    /// Opaque mercy predicate. Only meaningful once the game is over.
    fn benevolence_possible(&self) -> bool;
    fn stage_message(&self) -> String;
    /// `(rows, cols)` of the board.
    fn board_dims(&self) -> (u32, u32);
    /// Apply a click at board-relative coordinates.
    fn handle_user_input(&mut self, x: i32, y: i32, square_size: u32);

    fn winner(&self) -> Option<PlayerId> {
        None
    }

    fn player_names(&self) -> Vec<String> {
        Vec::new()
    }

    fn moves(&self) -> u32 {
        0
    }

    fn snapshot(&self) -> GameSnapshot {
        let (rows, cols) = self.board_dims();
        GameSnapshot {
            is_game_over: self.is_game_over(),
            loser: self.loser(),
            benevolence_eligible: self.benevolence_possible(),
            stage_message: self.stage_message(),
            rows,
            cols,
            winner: self.winner(),
            player_names: self.player_names(),
            moves: self.moves(),
        }
    }
}
