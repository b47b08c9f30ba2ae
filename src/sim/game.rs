/// Bundled rules engine: two players place workers, then move them one
/// square at a time. Every square a worker leaves is blocked for good.
///
/// Turn order interleaves the players' workers (P1 w1, P2 w1, P1 w2, ...)
/// so the worker to act is fixed per turn and a click only picks the target.
///
/// A worker with no open neighbour at the start of its turn is trapped and
/// its owner loses. Once per game the winner may show benevolence: the
/// trapped worker then jumps to any open square and play resumes.

use tracing::{debug, info};

use super::event::GameEvent;
use crate::config::GameConfig;
use crate::domain::board::{Board, Pos};
use crate::domain::snapshot::{PlayerId, RulesEngine};

const PLAYERS: u8 = 2;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Stage {
    Placement,
    Movement,
    /// Mercy granted: the trapped worker's next click relocates it.
    Relocation,
    Over,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Worker {
    pub owner: PlayerId,
    /// 1-based number within the owner's workers.
    pub number: usize,
    pub pos: Option<Pos>,
}

pub struct IsolationGame {
    board: Board,
    workers: Vec<Worker>,
    current: usize,
    stage: Stage,
    names: Vec<String>,
    loser: Option<PlayerId>,
    winner: Option<PlayerId>,
    mercy_used: bool,
    mercy_declined: bool,
    moves: u32,
    notice: Option<&'static str>,
    events: Vec<GameEvent>,
}

impl IsolationGame {
    pub fn new(rows: usize, cols: usize, workers_per_player: usize, names: Vec<String>) -> Self {
        let mut workers = Vec::with_capacity(workers_per_player * PLAYERS as usize);
        for number in 1..=workers_per_player {
            for p in 0..PLAYERS {
                workers.push(Worker { owner: PlayerId(p), number, pos: None });
            }
        }

        IsolationGame {
            board: Board::new(rows, cols),
            workers,
            current: 0,
            stage: Stage::Placement,
            names,
            loser: None,
            winner: None,
            mercy_used: false,
            mercy_declined: false,
            moves: 0,
            notice: None,
            events: Vec::new(),
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.board.rows,
            config.board.cols,
            config.board.workers_per_player,
            config.players.names.clone(),
        )
    }

    // ── Queries ──

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    pub fn current_worker(&self) -> &Worker {
        &self.workers[self.current]
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn worker_at(&self, pos: Pos) -> Option<&Worker> {
        self.workers.iter().find(|w| w.pos == Some(pos))
    }

    /// Open and unoccupied.
    pub fn is_free(&self, pos: Pos) -> bool {
        self.board.is_open(pos) && self.worker_at(pos).is_none()
    }

    /// Squares the current worker may click right now.
    pub fn legal_targets(&self) -> Vec<Pos> {
        match self.stage {
            Stage::Placement | Stage::Relocation => {
                self.board.positions().filter(|&p| self.is_free(p)).collect()
            }
            Stage::Movement => match self.current_worker().pos {
                Some(from) => self.board.neighbours(from).filter(|&p| self.is_free(p)).collect(),
                None => Vec::new(),
            },
            Stage::Over => Vec::new(),
        }
    }

    pub fn name(&self, id: PlayerId) -> String {
        self.names.get(id.index()).cloned().unwrap_or_else(|| id.to_string())
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Mercy ──

    /// Winner's answer to the benevolence prompt.
    /// Returns false when no decision is pending.
    pub fn resolve_benevolence(&mut self, grant: bool) -> bool {
        if !self.benevolence_possible() {
            return false;
        }
        let Some(loser) = self.loser else {
            return false;
        };

        if grant {
            info!(player = %loser, "benevolence granted");
            self.stage = Stage::Relocation;
            self.loser = None;
            self.winner = None;
            self.notice = None;
            self.events.push(GameEvent::MercyGranted { player: loser });
        } else {
            info!(player = %loser, "benevolence declined");
            self.mercy_declined = true;
            self.events.push(GameEvent::MercyDeclined { player: loser });
            if let Some(winner) = self.winner {
                self.events.push(GameEvent::GameWon { winner });
            }
        }
        true
    }

    // ── Actions ──

    fn place(&mut self, pos: Pos) {
        if !self.is_free(pos) {
            return self.reject("square taken");
        }
        let worker = &mut self.workers[self.current];
        worker.pos = Some(pos);
        let player = worker.owner;
        self.notice = None;
        self.events.push(GameEvent::WorkerPlaced { player, at: pos });

        if self.current + 1 == self.workers.len() {
            self.stage = Stage::Movement;
            self.current = 0;
            self.check_trapped();
        } else {
            self.current += 1;
        }
    }

    fn step_to(&mut self, to: Pos) {
        let Some(from) = self.current_worker().pos else {
            return self.reject("worker not on the board");
        };
        let adjacent = self.board.neighbours(from).any(|p| p == to);
        if !adjacent {
            return self.reject("not adjacent");
        }
        if !self.is_free(to) {
            return self.reject("square unavailable");
        }

        self.board.block(from);
        let worker = &mut self.workers[self.current];
        worker.pos = Some(to);
        let player = worker.owner;
        self.moves += 1;
        self.notice = None;
        self.events.push(GameEvent::WorkerMoved { player, from, to });
        self.advance_turn();
    }

    fn relocate(&mut self, to: Pos) {
        if !self.is_free(to) {
            return self.reject("square unavailable");
        }
        let worker = &mut self.workers[self.current];
        if let Some(from) = worker.pos {
            self.board.block(from);
        }
        worker.pos = Some(to);
        let player = worker.owner;
        self.mercy_used = true;
        self.stage = Stage::Movement;
        self.moves += 1;
        self.notice = None;
        self.events.push(GameEvent::WorkerRelocated { player, to });
        self.advance_turn();
    }

    fn reject(&mut self, reason: &'static str) {
        debug!(reason, "input rejected");
        self.notice = Some(reason);
        self.events.push(GameEvent::MoveRejected);
    }

    fn advance_turn(&mut self) {
        self.current = (self.current + 1) % self.workers.len();
        self.check_trapped();
    }

    fn check_trapped(&mut self) {
        let worker = *self.current_worker();
        let can_move = worker
            .pos
            .map(|p| self.board.neighbours(p).any(|n| self.is_free(n)))
            .unwrap_or(false);
        if can_move {
            return;
        }

        let loser = worker.owner;
        let winner = PlayerId((loser.0 + 1) % PLAYERS);
        self.stage = Stage::Over;
        self.loser = Some(loser);
        self.winner = Some(winner);
        info!(loser = %loser, winner = %winner, moves = self.moves, "worker trapped");

        if let Some(at) = worker.pos {
            self.events.push(GameEvent::WorkerTrapped { player: loser, at });
        }
        if !self.benevolence_possible() {
            self.events.push(GameEvent::GameWon { winner });
        }
    }
}

impl RulesEngine for IsolationGame {
    fn is_game_over(&self) -> bool {
        self.stage == Stage::Over
    }

    fn loser(&self) -> Option<PlayerId> {
        self.loser
    }

    fn benevolence_possible(&self) -> bool {
        self.stage == Stage::Over
            && self.loser.is_some()
            && !self.mercy_used
            && !self.mercy_declined
            && self.board.positions().any(|p| self.is_free(p))
    }

    fn stage_message(&self) -> String {
        let w = self.current_worker();
        let base = match self.stage {
            Stage::Placement => format!("{}: place worker {}", self.name(w.owner), w.number),
            Stage::Movement => format!("{}: move worker {}", self.name(w.owner), w.number),
            Stage::Relocation => format!(
                "{}: benevolence shown, pick any open square for worker {}",
                self.name(w.owner),
                w.number
            ),
            Stage::Over => match (self.loser, self.winner) {
                (Some(loser), Some(winner)) if self.benevolence_possible() => format!(
                    "{} is trapped. {}, show benevolence? [Y/N]",
                    self.name(loser),
                    self.name(winner)
                ),
                (_, Some(winner)) => format!("{} wins after {} moves", self.name(winner), self.moves),
                _ => "Game over".to_string(),
            },
        };

        match self.notice {
            Some(notice) => format!("{base} ({notice})"),
            None => base,
        }
    }

    fn board_dims(&self) -> (u32, u32) {
        (self.board.rows() as u32, self.board.cols() as u32)
    }

    fn handle_user_input(&mut self, x: i32, y: i32, square_size: u32) {
        if x < 0 || y < 0 || square_size == 0 {
            return self.reject("outside the board");
        }
        let pos = ((y as u32 / square_size) as usize, (x as u32 / square_size) as usize);
        if !self.board.contains(pos) {
            return self.reject("outside the board");
        }

        match self.stage {
            Stage::Placement => self.place(pos),
            Stage::Movement => self.step_to(pos),
            Stage::Relocation => self.relocate(pos),
            Stage::Over => debug!("input after game over ignored"),
        }
    }

    fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    fn player_names(&self) -> Vec<String> {
        (0..PLAYERS).map(|p| self.name(PlayerId(p))).collect()
    }

    fn moves(&self) -> u32 {
        self.moves
    }
}
