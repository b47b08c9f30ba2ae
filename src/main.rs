/// Entry point and event loop.

mod config;
mod domain;
mod error;
mod logging;
mod screen;
mod sim;
mod ui;

use std::time::Duration;

use crossterm::event::KeyCode;
use tracing::{debug, info};

use config::GameConfig;
use error::AppError;
use screen::phase::Phase;
use screen::MainScreen;
use sim::event::GameEvent;
use sim::game::IsolationGame;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;
use ui::surfaces::{BoardView, MercyView, TerminalHost};
use ui::TerminalScreen;

const FRAME_SLEEP: Duration = Duration::from_millis(16);

// ── Key Constants ──

const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q')];
const KEYS_GRANT: &[KeyCode] = &[KeyCode::Char('y'), KeyCode::Char('Y')];
const KEYS_DECLINE: &[KeyCode] = &[KeyCode::Char('n'), KeyCode::Char('N')];
const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' '), KeyCode::Esc];

fn main() {
    let config = GameConfig::load().unwrap_or_else(|e| {
        eprintln!("Warning: {e}");
        eprintln!("Using default settings.");
        GameConfig::default()
    });

    if let Err(e) = logging::init(&config.logging) {
        eprintln!("Warning: {e}");
    }
    info!(rows = config.board.rows, cols = config.board.cols, "starting");

    let mut screen: TerminalScreen = MainScreen::new(
        IsolationGame::from_config(&config),
        TerminalHost::new(),
        BoardView::default(),
        MercyView::default(),
    );

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = if config.sound.enabled { SoundEngine::new() } else { None };

    let result = event_loop(&mut screen, &mut renderer, sound.as_ref());

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    if let Some(page) = screen.host().current_page() {
        println!("{}", page.headline());
    }
    println!("Thanks for playing Benevolence!");
}

fn event_loop(
    screen: &mut TerminalScreen,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
) -> Result<(), AppError> {
    let mut input = InputState::new();

    loop {
        input.drain_events()?;

        if input.ctrl_c_pressed() || input.any_pressed(KEYS_QUIT) {
            break;
        }

        if input.resized {
            screen.on_layout(&Renderer::viewport());
        }

        // Each click is applied and evaluated before the next one.
        for &(column, row) in &input.clicks {
            let outcome = screen.on_click(column, row, &Renderer::viewport());
            debug!(?outcome, "click handled");
        }

        if screen.is_terminal() {
            if input.any_pressed(KEYS_CONFIRM) {
                break;
            }
        } else if screen.phase() == Phase::Benevolence {
            if input.any_pressed(KEYS_GRANT) {
                screen.apply(|game| game.resolve_benevolence(true));
            } else if input.any_pressed(KEYS_DECLINE) {
                screen.apply(|game| game.resolve_benevolence(false));
            }
        }

        process_sound_events(sound, &screen.engine_mut().take_events());

        renderer.render(screen)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn process_sound_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for event in events {
        match event {
            GameEvent::WorkerPlaced { .. } => sfx.play_place(),
            GameEvent::WorkerMoved { .. } | GameEvent::WorkerRelocated { .. } => sfx.play_move(),
            GameEvent::MoveRejected => sfx.play_reject(),
            GameEvent::WorkerTrapped { .. } => sfx.play_trapped(),
            GameEvent::MercyGranted { .. } => sfx.play_mercy(),
            GameEvent::GameWon { .. } => sfx.play_victory(),
            GameEvent::MercyDeclined { .. } => {}
        }
    }
}
