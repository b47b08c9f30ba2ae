pub mod input;
pub mod renderer;
pub mod sound;
pub mod surfaces;

use crate::screen::MainScreen;
use crate::sim::game::IsolationGame;
use surfaces::{BoardView, MercyView, TerminalHost};

/// The main screen as wired for the terminal front-end.
pub type TerminalScreen = MainScreen<IsolationGame, TerminalHost, BoardView, MercyView>;
