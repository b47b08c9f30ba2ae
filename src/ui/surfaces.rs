/// Terminal implementations of the screen's surfaces and navigation host.
///
/// The renderer reads these to decide what to draw; the screen only ever
/// mounts and unmounts them.

use tracing::debug;

use crate::domain::snapshot::GameSnapshot;
use crate::screen::surface::{DisplaySurface, NavigationHost, MAIN_ID};

// ── Play ──

#[derive(Debug, Default)]
pub struct BoardView {
    mounted: bool,
}

impl BoardView {
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }
}

impl DisplaySurface for BoardView {
    fn mount(&mut self, _snapshot: &GameSnapshot) {
        debug!("board view mounted");
        self.mounted = true;
    }

    fn unmount(&mut self) {
        debug!("board view unmounted");
        self.mounted = false;
    }
}

// ── Benevolence ──

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MercyPrompt {
    pub loser: String,
    pub winner: String,
}

/// Benevolence panel. The prompt is captured fresh on every mount.
#[derive(Debug, Default)]
pub struct MercyView {
    prompt: Option<MercyPrompt>,
}

impl MercyView {
    pub fn prompt(&self) -> Option<&MercyPrompt> {
        self.prompt.as_ref()
    }
}

impl DisplaySurface for MercyView {
    fn mount(&mut self, snapshot: &GameSnapshot) {
        let loser = snapshot.loser.map(|p| snapshot.name_of(p)).unwrap_or_default();
        let winner = snapshot.winner.map(|p| snapshot.name_of(p)).unwrap_or_default();
        debug!(%loser, %winner, "mercy view mounted");
        self.prompt = Some(MercyPrompt { loser, winner });
    }

    fn unmount(&mut self) {
        debug!("mercy view unmounted");
        self.prompt = None;
    }
}

// ── Final ──

/// One-shot results page, built from the snapshot that ended the game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsPage {
    pub winner: Option<String>,
    pub loser: Option<String>,
    pub moves: u32,
    pub message: String,
    mounted: bool,
}

impl ResultsPage {
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn headline(&self) -> String {
        match &self.winner {
            Some(w) => format!("{w} wins!"),
            None => "Game over".to_string(),
        }
    }
}

impl From<&GameSnapshot> for ResultsPage {
    fn from(s: &GameSnapshot) -> Self {
        ResultsPage {
            winner: s.winner.map(|p| s.name_of(p)),
            loser: s.loser.map(|p| s.name_of(p)),
            moves: s.moves,
            message: s.stage_message.clone(),
            mounted: false,
        }
    }
}

impl DisplaySurface for ResultsPage {
    fn mount(&mut self, _snapshot: &GameSnapshot) {
        self.mounted = true;
    }

    fn unmount(&mut self) {
        self.mounted = false;
    }
}

// ── Host ──

/// Page stack of the terminal app. Starts on the main screen.
#[derive(Debug)]
pub struct TerminalHost {
    pages: Vec<(&'static str, ResultsPage)>,
    shown: &'static str,
}

impl TerminalHost {
    pub fn new() -> Self {
        TerminalHost { pages: Vec::new(), shown: MAIN_ID }
    }

    pub fn shown(&self) -> &'static str {
        self.shown
    }

    pub fn page(&self, id: &str) -> Option<&ResultsPage> {
        self.pages.iter().find(|(pid, _)| *pid == id).map(|(_, p)| p)
    }

    /// The registered page currently shown, if it is not the main screen.
    pub fn current_page(&self) -> Option<&ResultsPage> {
        self.page(self.shown)
    }
}

impl NavigationHost for TerminalHost {
    type Page = ResultsPage;

    fn mount(&mut self, id: &'static str, page: ResultsPage) {
        debug!(id, "page registered");
        if let Some(slot) = self.pages.iter_mut().find(|(pid, _)| *pid == id) {
            slot.1.unmount();
            slot.1 = page;
        } else {
            self.pages.push((id, page));
        }
    }

    fn show(&mut self, id: &'static str) {
        debug!(id, "page shown");
        self.shown = id;
    }
}
