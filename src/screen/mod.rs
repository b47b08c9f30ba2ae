/// Main game screen: decides which surface is mounted after every event.
///
/// The screen owns the rules engine, the navigation host and the two
/// in-screen surfaces (board play, benevolence). The results page is built
/// on demand and handed to the host, after which the screen is terminal.
///
/// Event flow:
///   click → `on_click` → engine mutates → `evaluate` → surface swap + status
///
/// Rendering is the caller's business and happens after these return.

pub mod geometry;
pub mod phase;
pub mod status;
pub mod surface;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::snapshot::{GameSnapshot, RulesEngine};
use geometry::{ScreenGeometry, Viewport};
use phase::{is_inconsistent, Phase};
use status::StatusLine;
use surface::{DisplaySurface, NavigationHost, FINAL_ID};

/// Conditions the screen recovers from on its own. Logged, never returned.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum Absorbed {
    #[error("inconsistent snapshot: loser reported while the game is running, staying in play")]
    InconsistentSnapshot,
    #[error("degenerate viewport: square size clamped to 1")]
    InvalidGeometry,
    #[error("evaluation after the final page was mounted ignored")]
    TerminalReentry,
}

/// Result of one evaluation pass.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Evaluation {
    /// Same phase, same message: nothing touched.
    Unchanged,
    /// Same phase, status text updated.
    MessageRefreshed,
    /// One unmount/mount pair fired.
    Transitioned { from: Phase, to: Phase },
    /// Screen already handed over to the final page.
    Terminal,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ClickOutcome {
    /// Whether the click reached the rules engine.
    pub forwarded: bool,
    pub evaluation: Evaluation,
}

pub struct MainScreen<E, H, P, B>
where
    E: RulesEngine,
    H: NavigationHost,
    P: DisplaySurface,
    B: DisplaySurface,
{
    engine: E,
    host: H,
    play: P,
    benevolence: B,
    phase: Phase,
    status: StatusLine,
}

impl<E, H, P, B> MainScreen<E, H, P, B>
where
    E: RulesEngine,
    H: NavigationHost,
    P: DisplaySurface,
    B: DisplaySurface,
{
    pub fn new(engine: E, host: H, play: P, benevolence: B) -> Self {
        let snapshot = engine.snapshot();
        absorb_inconsistency(&snapshot);
        let phase = Phase::evaluate(&snapshot);
        let mut screen = MainScreen {
            engine,
            host,
            play,
            benevolence,
            phase,
            status: StatusLine::default(),
        };
        screen.status.refresh(&snapshot);
        info!(phase = phase.label(), "screen constructed");
        screen.enter(phase, &snapshot);
        screen
    }

    // ── Phase selection ──

    pub fn evaluate(&mut self) -> Evaluation {
        if self.phase.is_terminal() {
            debug!("{}", Absorbed::TerminalReentry);
            return Evaluation::Terminal;
        }

        let snapshot = self.engine.snapshot();
        absorb_inconsistency(&snapshot);

        let next = Phase::evaluate(&snapshot);
        let message_changed = self.status.refresh(&snapshot);

        if next == self.phase {
            return if message_changed {
                Evaluation::MessageRefreshed
            } else {
                Evaluation::Unchanged
            };
        }

        let from = self.phase;
        info!(from = from.label(), to = next.label(), "phase transition");
        self.leave(from);
        self.phase = next;
        self.enter(next, &snapshot);
        Evaluation::Transitioned { from, to: next }
    }

    /// Externally signalled state change.
    pub fn notify_state_changed(&mut self) -> Evaluation {
        self.evaluate()
    }

    /// Mutate the engine outside the click path, then re-evaluate.
    pub fn apply<R>(&mut self, f: impl FnOnce(&mut E) -> R) -> (R, Evaluation) {
        let result = f(&mut self.engine);
        (result, self.notify_state_changed())
    }

    fn enter(&mut self, phase: Phase, snapshot: &GameSnapshot) {
        match phase {
            Phase::Play => self.play.mount(snapshot),
            Phase::Benevolence => self.benevolence.mount(snapshot),
            Phase::Final => {
                let mut page = <H::Page as From<&GameSnapshot>>::from(snapshot);
                page.mount(snapshot);
                self.host.mount(FINAL_ID, page);
                self.host.show(FINAL_ID);
            }
        }
    }

    fn leave(&mut self, phase: Phase) {
        match phase {
            Phase::Play => self.play.unmount(),
            Phase::Benevolence => self.benevolence.unmount(),
            Phase::Final => {}
        }
    }

    // ── Input ──

    /// Pointer click at raw screen coordinates. Only forwarded during play.
    pub fn on_click(&mut self, column: u16, row: u16, viewport: &Viewport) -> ClickOutcome {
        let forwarded = if self.phase == Phase::Play {
            let (x, y) = viewport.to_board(column, row);
            let square_size = self.geometry(viewport).square_size;
            debug!(x, y, square_size, "click forwarded");
            self.engine.handle_user_input(x, y, square_size);
            true
        } else {
            debug!(phase = self.phase.label(), column, row, "click dropped");
            false
        };

        ClickOutcome {
            forwarded,
            evaluation: self.evaluate(),
        }
    }

    /// Layout or resize event.
    pub fn on_layout(&mut self, viewport: &Viewport) -> ScreenGeometry {
        let geometry = self.geometry(viewport);
        self.evaluate();
        geometry
    }

    pub fn geometry(&self, viewport: &Viewport) -> ScreenGeometry {
        let (rows, cols) = self.engine.board_dims();
        ScreenGeometry::compute(viewport, rows, cols)
    }

    // ── Accessors ──

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn status(&self) -> &str {
        self.status.text()
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Mutations through this skip evaluation; use `apply` for anything
    /// that can change the snapshot.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn play_surface(&self) -> &P {
        &self.play
    }

    pub fn benevolence_surface(&self) -> &B {
        &self.benevolence
    }
}

/// Logs a snapshot that reports a loser while the game is still running.
/// Phase selection treats it as play either way.
fn absorb_inconsistency(snapshot: &GameSnapshot) -> bool {
    let inconsistent = is_inconsistent(snapshot);
    if inconsistent {
        warn!(loser = ?snapshot.loser, "{}", Absorbed::InconsistentSnapshot);
    }
    inconsistent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::snapshot::PlayerId;

    // ── Test doubles ──

    struct ScriptedEngine {
        current: GameSnapshot,
        after_input: Option<GameSnapshot>,
        inputs: Vec<(i32, i32, u32)>,
    }

    impl ScriptedEngine {
        fn new(current: GameSnapshot) -> Self {
            ScriptedEngine { current, after_input: None, inputs: Vec::new() }
        }

        fn then(mut self, next: GameSnapshot) -> Self {
            self.after_input = Some(next);
            self
        }
    }

    impl RulesEngine for ScriptedEngine {
        fn is_game_over(&self) -> bool { self.current.is_game_over }
        fn loser(&self) -> Option<PlayerId> { self.current.loser }
        fn benevolence_possible(&self) -> bool { self.current.benevolence_eligible }
        fn stage_message(&self) -> String { self.current.stage_message.clone() }
        fn board_dims(&self) -> (u32, u32) { (self.current.rows, self.current.cols) }

        fn handle_user_input(&mut self, x: i32, y: i32, square_size: u32) {
            self.inputs.push((x, y, square_size));
            if let Some(next) = self.after_input.take() {
                self.current = next;
            }
        }
    }

    #[derive(Default)]
    struct Recorder {
        mounts: u32,
        unmounts: u32,
    }

    impl DisplaySurface for Recorder {
        fn mount(&mut self, _snapshot: &GameSnapshot) { self.mounts += 1; }
        fn unmount(&mut self) { self.unmounts += 1; }
    }

    struct Page {
        message: String,
        mounted: bool,
    }

    impl From<&GameSnapshot> for Page {
        fn from(s: &GameSnapshot) -> Self {
            Page { message: s.stage_message.clone(), mounted: false }
        }
    }

    impl DisplaySurface for Page {
        fn mount(&mut self, _snapshot: &GameSnapshot) { self.mounted = true; }
        fn unmount(&mut self) { self.mounted = false; }
    }

    #[derive(Default)]
    struct Host {
        pages: Vec<(&'static str, Page)>,
        shown: Vec<&'static str>,
    }

    impl NavigationHost for Host {
        type Page = Page;
        fn mount(&mut self, id: &'static str, page: Page) { self.pages.push((id, page)); }
        fn show(&mut self, id: &'static str) { self.shown.push(id); }
    }

    type TestScreen = MainScreen<ScriptedEngine, Host, Recorder, Recorder>;

    fn snap(over: bool, loser: Option<u8>, eligible: bool, msg: &str) -> GameSnapshot {
        GameSnapshot {
            is_game_over: over,
            loser: loser.map(PlayerId),
            benevolence_eligible: eligible,
            stage_message: msg.into(),
            rows: 6,
            cols: 6,
            ..GameSnapshot::default()
        }
    }

    fn screen(engine: ScriptedEngine) -> TestScreen {
        MainScreen::new(engine, Host::default(), Recorder::default(), Recorder::default())
    }

    fn viewport() -> Viewport {
        Viewport::new(900, 600)
    }

    // ── Construction ──

    #[test]
    fn construction_mounts_play_surface() {
        let s = screen(ScriptedEngine::new(snap(false, None, false, "P1 to move")));
        assert_eq!(s.phase(), Phase::Play);
        assert_eq!(s.play_surface().mounts, 1);
        assert_eq!(s.benevolence_surface().mounts, 0);
        assert_eq!(s.status(), "P1 to move");
    }

    #[test]
    fn construction_on_finished_game_is_terminal() {
        let s = screen(ScriptedEngine::new(snap(true, None, false, "Draw")));
        assert_eq!(s.phase(), Phase::Final);
        assert!(s.is_terminal());
        assert_eq!(s.host().pages.len(), 1);
        assert_eq!(s.play_surface().mounts, 0);
    }

    // ── Clicks ──

    #[test]
    fn click_during_play_forwards_square_size() {
        let mut s = screen(ScriptedEngine::new(snap(false, None, false, "go")));
        let out = s.on_click(120, 40, &viewport());
        assert!(out.forwarded);
        assert_eq!(out.evaluation, Evaluation::Unchanged);
        assert_eq!(s.engine().inputs, vec![(120, 40, 95)]);
        assert_eq!(s.phase(), Phase::Play);
    }

    #[test]
    fn click_converts_through_viewport_origin() {
        let mut s = screen(ScriptedEngine::new(snap(false, None, false, "go")));
        let vp = Viewport::new(900, 600).with_origin(2, 1).with_unit_cols(2);
        s.on_click(12, 6, &vp);
        assert_eq!(s.engine().inputs, vec![(5, 5, 95)]);
    }

    #[test]
    fn trapped_loser_with_mercy_moves_to_benevolence() {
        let engine = ScriptedEngine::new(snap(false, None, false, "go"))
            .then(snap(true, Some(1), true, "Player 2 is trapped"));
        let mut s = screen(engine);

        let out = s.on_click(10, 10, &viewport());
        assert_eq!(
            out.evaluation,
            Evaluation::Transitioned { from: Phase::Play, to: Phase::Benevolence }
        );
        assert_eq!(s.play_surface().unmounts, 1);
        assert_eq!(s.benevolence_surface().mounts, 1);
        assert_eq!(s.benevolence_surface().unmounts, 0);
        assert_eq!(s.status(), "Player 2 is trapped");
    }

    #[test]
    fn click_during_benevolence_is_dropped() {
        let mut s = screen(ScriptedEngine::new(snap(true, Some(0), true, "mercy?")));
        assert_eq!(s.phase(), Phase::Benevolence);
        let out = s.on_click(10, 10, &viewport());
        assert!(!out.forwarded);
        assert!(s.engine().inputs.is_empty());
        assert_eq!(out.evaluation, Evaluation::Unchanged);
    }

    #[test]
    fn game_without_loser_goes_final_once() {
        let engine = ScriptedEngine::new(snap(false, None, false, "go"))
            .then(snap(true, None, false, "Player 1 wins"));
        let mut s = screen(engine);

        let out = s.on_click(0, 0, &viewport());
        assert_eq!(out.evaluation, Evaluation::Transitioned { from: Phase::Play, to: Phase::Final });
        assert_eq!(s.host().pages.len(), 1);
        assert_eq!(s.host().pages[0].0, FINAL_ID);
        assert!(s.host().pages[0].1.mounted);
        assert_eq!(s.host().pages[0].1.message, "Player 1 wins");
        assert_eq!(s.host().shown, vec![FINAL_ID]);

        assert_eq!(s.evaluate(), Evaluation::Terminal);
        assert_eq!(s.host().pages.len(), 1);
        assert_eq!(s.host().shown.len(), 1);
        assert_eq!(s.play_surface().unmounts, 1);
    }

    #[test]
    fn click_after_final_is_not_forwarded() {
        let engine = ScriptedEngine::new(snap(false, None, false, "go"))
            .then(snap(true, None, false, "done"));
        let mut s = screen(engine);
        s.on_click(0, 0, &viewport());
        let out = s.on_click(0, 0, &viewport());
        assert!(!out.forwarded);
        assert_eq!(out.evaluation, Evaluation::Terminal);
        assert_eq!(s.engine().inputs.len(), 1);
    }

    // ── Idempotence ──

    #[test]
    fn repeated_evaluation_does_not_remount() {
        let mut s = screen(ScriptedEngine::new(snap(false, None, false, "go")));
        assert_eq!(s.evaluate(), Evaluation::Unchanged);
        assert_eq!(s.evaluate(), Evaluation::Unchanged);
        assert_eq!(s.play_surface().mounts, 1);
        assert_eq!(s.play_surface().unmounts, 0);
    }

    #[test]
    fn message_change_refreshes_without_remount() {
        let engine = ScriptedEngine::new(snap(false, None, false, "P1 to move"))
            .then(snap(false, None, false, "P2 to move"));
        let mut s = screen(engine);
        let out = s.on_click(0, 0, &viewport());
        assert_eq!(out.evaluation, Evaluation::MessageRefreshed);
        assert_eq!(s.status(), "P2 to move");
        assert_eq!(s.play_surface().mounts, 1);
    }

    #[test]
    fn layout_event_is_a_noop_when_nothing_changed() {
        let mut s = screen(ScriptedEngine::new(snap(false, None, false, "go")));
        let g = s.on_layout(&viewport());
        assert_eq!(g.square_size, 95);
        assert_eq!(s.play_surface().mounts, 1);
    }

    // ── External changes ──

    #[test]
    fn granted_mercy_returns_to_play() {
        let mut s = screen(ScriptedEngine::new(snap(true, Some(1), true, "mercy?")));
        let ((), eval) = s.apply(|e| e.current = snap(false, None, false, "relocate"));
        assert_eq!(eval, Evaluation::Transitioned { from: Phase::Benevolence, to: Phase::Play });
        assert_eq!(s.benevolence_surface().unmounts, 1);
        assert_eq!(s.play_surface().mounts, 1);
        assert!(!s.is_terminal());
    }

    #[test]
    fn declined_mercy_goes_final() {
        let mut s = screen(ScriptedEngine::new(snap(true, Some(1), true, "mercy?")));
        s.apply(|e| e.current = snap(true, Some(1), false, "Player 1 wins"));
        assert_eq!(s.phase(), Phase::Final);
        assert_eq!(s.benevolence_surface().unmounts, 1);
        assert_eq!(s.notify_state_changed(), Evaluation::Terminal);
    }

    #[test]
    fn benevolence_is_remounted_on_every_entry() {
        let mut s = screen(ScriptedEngine::new(snap(true, Some(1), true, "mercy?")));
        assert_eq!(s.benevolence_surface().mounts, 1);

        s.apply(|e| e.current = snap(false, None, false, "relocate"));
        let ((), eval) = s.apply(|e| e.current = snap(true, Some(0), true, "mercy again?"));

        assert_eq!(eval, Evaluation::Transitioned { from: Phase::Play, to: Phase::Benevolence });
        assert_eq!(s.benevolence_surface().mounts, 2);
        assert_eq!(s.benevolence_surface().unmounts, 1);
        assert_eq!(s.play_surface().mounts, 1);
        assert_eq!(s.play_surface().unmounts, 1);
        assert_eq!(s.status(), "mercy again?");
    }

    #[test]
    fn layout_right_after_transition_does_not_remount() {
        let engine = ScriptedEngine::new(snap(false, None, false, "go"))
            .then(snap(true, Some(1), true, "Player 2 is trapped"));
        let mut s = screen(engine);
        s.on_click(10, 10, &viewport());
        assert_eq!(s.phase(), Phase::Benevolence);

        s.on_layout(&viewport());
        assert_eq!(s.evaluate(), Evaluation::Unchanged);
        assert_eq!(s.benevolence_surface().mounts, 1);
        assert_eq!(s.benevolence_surface().unmounts, 0);
        assert_eq!(s.play_surface().mounts, 1);
        assert_eq!(s.play_surface().unmounts, 1);
    }

    #[test]
    fn inconsistent_snapshot_at_construction_starts_in_play() {
        let s = screen(ScriptedEngine::new(snap(false, Some(1), true, "go")));
        assert!(absorb_inconsistency(&s.engine().current));
        assert_eq!(s.phase(), Phase::Play);
        assert_eq!(s.play_surface().mounts, 1);
        assert_eq!(s.benevolence_surface().mounts, 0);
    }

    #[test]
    fn consistent_snapshots_are_not_absorbed() {
        assert!(!absorb_inconsistency(&snap(false, None, false, "go")));
        assert!(!absorb_inconsistency(&snap(true, Some(0), true, "mercy?")));
    }

    #[test]
    fn inconsistent_snapshot_stays_in_play() {
        let mut s = screen(ScriptedEngine::new(snap(false, None, false, "go")));
        s.apply(|e| e.current = snap(false, Some(0), true, "go"));
        assert_eq!(s.phase(), Phase::Play);
        assert_eq!(s.benevolence_surface().mounts, 0);
    }
}
