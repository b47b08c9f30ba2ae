/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Layout of the main screen:
///   row 0          HUD
///   rows 2..       board (left two thirds) + player panel (right third)
///   last 2 rows    status line, key help
///
/// One board unit is `CELL_W` terminal columns wide and one row high, so a
/// square of size `s` units covers `s * CELL_W` columns and `s` rows.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use super::surfaces::{MercyPrompt, ResultsPage};
use super::TerminalScreen;
use crate::domain::board::Square;
use crate::domain::snapshot::{PlayerId, RulesEngine};
use crate::screen::geometry::Viewport;
use crate::screen::phase::Phase;
use crate::sim::game::{IsolationGame, Stage};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit background for all "empty" terminal cells, so cleared
    /// areas and drawn cells share one colour.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell { ch, fg, bg });
        }
    }

    fn put_center(&mut self, y: usize, s: &str, fg: Color) {
        let len = s.chars().count();
        let x = self.width.saturating_sub(len) / 2;
        self.put_str(x, y, s, fg, Cell::BASE_BG);
    }

    fn fill(&mut self, x: usize, y: usize, w: usize, h: usize, cell: Cell) {
        for yy in y..y + h {
            for xx in x..x + w {
                self.set(xx, yy, cell);
            }
        }
    }
}

// ── Layout ──

const CELL_W: u16 = 2;
const HUD_ROW: usize = 0;
const BOARD_ROW: u16 = 2;
const BOARD_COL: u16 = 2;
const FOOTER_ROWS: u16 = 2;

const PLAYER_COLORS: [Color; 2] = [
    Color::Rgb { r: 120, g: 200, b: 255 },
    Color::Rgb { r: 255, g: 150, b: 110 },
];
const SQUARE_LIGHT: Color = Color::Rgb { r: 52, g: 60, b: 80 };
const SQUARE_DARK: Color = Color::Rgb { r: 44, g: 50, b: 68 };
const SQUARE_TARGET: Color = Color::Rgb { r: 40, g: 90, b: 60 };
const SQUARE_BLOCKED: Color = Color::Rgb { r: 12, g: 12, b: 18 };
const DIM: Color = Color::Rgb { r: 130, g: 130, b: 150 };

fn player_color(id: PlayerId) -> Color {
    PLAYER_COLORS[id.index() % PLAYER_COLORS.len()]
}

/// Board viewport for a terminal of `tw` x `th` cells.
fn viewport_for(tw: u16, th: u16) -> Viewport {
    let width = tw.saturating_sub(BOARD_COL) / CELL_W;
    let height = th.saturating_sub(BOARD_ROW + FOOTER_ROWS);
    Viewport::new(width as u32, height as u32)
        .with_origin(BOARD_COL, BOARD_ROW)
        .with_unit_cols(CELL_W)
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
        }
    }

    /// Current board viewport, read fresh from the terminal size.
    pub fn viewport() -> Viewport {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        viewport_for(tw, th)
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, screen: &TerminalScreen) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Phase change → clear for clean transition
        if self.last_phase != Some(screen.phase()) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(screen.phase());
        }

        self.front.clear();
        let host = screen.host();
        match host.page(host.shown()) {
            Some(page) if page.is_mounted() => self.compose_results(page),
            _ => self.compose_main(screen),
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_main(&mut self, screen: &TerminalScreen) {
        let game = screen.engine();
        let viewport = viewport_for(self.term_w as u16, self.term_h as u16);
        let geometry = screen.geometry(&viewport);

        let hud = format!(" BENEVOLENCE   {} ", screen.phase().label());
        self.front.put_str(0, HUD_ROW, &hud, Color::Black, Color::Rgb { r: 200, g: 190, b: 120 });

        if screen.play_surface().is_mounted() {
            self.compose_board(game, geometry.square_size as usize);
        } else if let Some(prompt) = screen.benevolence_surface().prompt() {
            let board_w = game.board().cols() * geometry.square_size as usize * CELL_W as usize;
            let board_h = game.board().rows() * geometry.square_size as usize;
            self.compose_mercy(prompt, board_w, board_h);
        }

        let panel_x = BOARD_COL as usize + geometry.board_width as usize * CELL_W as usize + 2;
        self.compose_panel(game, panel_x);

        let status_row = self.term_h.saturating_sub(2);
        let help_row = self.term_h.saturating_sub(1);
        self.front.put_str(1, status_row, screen.status(), Color::White, Cell::BASE_BG);
        let help = match screen.phase() {
            Phase::Benevolence => "[Y] grant benevolence  [N] decline  [Q] quit",
            _ => "[click] choose square  [Q] quit",
        };
        self.front.put_str(1, help_row, help, DIM, Cell::BASE_BG);
    }

    fn compose_board(&mut self, game: &IsolationGame, square: usize) {
        let board = game.board();
        let targets = game.legal_targets();
        let cur = *game.current_worker();
        let sq_w = square * CELL_W as usize;
        // Leave a gutter between squares once they are big enough.
        let (fill_w, fill_h) = if square >= 2 { (sq_w - 1, square - 1) } else { (sq_w, square) };

        for pos in board.positions() {
            let (r, c) = pos;
            let x0 = BOARD_COL as usize + c * sq_w;
            let y0 = BOARD_ROW as usize + r * square;

            let (ch, bg) = match board.square(pos) {
                Square::Blocked => ('░', SQUARE_BLOCKED),
                Square::Open if targets.contains(&pos) => (' ', SQUARE_TARGET),
                Square::Open if (r + c) % 2 == 0 => (' ', SQUARE_LIGHT),
                Square::Open => (' ', SQUARE_DARK),
            };
            self.front.fill(x0, y0, fill_w, fill_h, Cell { ch, fg: DIM, bg });

            if let Some(w) = game.worker_at(pos) {
                let initial = game.name(w.owner).chars().next().unwrap_or('?');
                let label = format!("{}{}", initial, w.number);
                let fg = if w.pos == cur.pos && game.stage() != Stage::Over {
                    Color::Yellow
                } else {
                    player_color(w.owner)
                };
                let lx = x0 + fill_w.saturating_sub(label.chars().count()) / 2;
                let ly = y0 + fill_h / 2;
                self.front.put_str(lx, ly, &label, fg, bg);
            }
        }
    }

    fn compose_mercy(&mut self, prompt: &MercyPrompt, board_w: usize, board_h: usize) {
        let lines = [
            " BENEVOLENCE ".to_string(),
            String::new(),
            format!("{} is trapped.", prompt.loser),
            format!("{}, show benevolence?", prompt.winner),
            String::new(),
            "[Y] grant    [N] decline".to_string(),
        ];
        let box_w = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 4;
        let box_h = lines.len() + 2;
        let x0 = BOARD_COL as usize + board_w.saturating_sub(box_w) / 2;
        let y0 = BOARD_ROW as usize + board_h.saturating_sub(box_h) / 2;
        let bg = Color::Rgb { r: 60, g: 40, b: 70 };

        self.front.fill(x0, y0, box_w, box_h, Cell { ch: ' ', fg: Color::White, bg });
        for (i, line) in lines.iter().enumerate() {
            let fg = if i == 0 { Color::Yellow } else { Color::White };
            self.front.put_str(x0 + 2, y0 + 1 + i, line, fg, bg);
        }
    }

    fn compose_panel(&mut self, game: &IsolationGame, x: usize) {
        let mut y = BOARD_ROW as usize;
        self.front.put_str(x, y, "PLAYERS", Color::White, Cell::BASE_BG);
        y += 2;

        for p in 0..2u8 {
            let id = PlayerId(p);
            let to_move = game.current_worker().owner == id && game.stage() != Stage::Over;
            let marker = if to_move { "▶ " } else { "  " };
            self.front.put_str(x, y, &format!("{marker}{}", game.name(id)), player_color(id), Cell::BASE_BG);
            y += 1;
            for w in game.workers().iter().filter(|w| w.owner == id) {
                let at = match w.pos {
                    Some((r, c)) => format!("({}, {})", r + 1, c + 1),
                    None => "unplaced".to_string(),
                };
                self.front.put_str(x + 2, y, &format!("worker {}: {at}", w.number), DIM, Cell::BASE_BG);
                y += 1;
            }
            y += 1;
        }

        self.front.put_str(x, y, &format!("Moves: {}", game.moves()), Color::White, Cell::BASE_BG);
        let stage = match game.stage() {
            Stage::Placement => "Placement",
            Stage::Movement => "Movement",
            Stage::Relocation => "Relocation",
            Stage::Over => "Over",
        };
        self.front.put_str(x, y + 1, &format!("Stage: {stage}"), Color::White, Cell::BASE_BG);
    }

    fn compose_results(&mut self, page: &ResultsPage) {
        let mid = self.term_h / 2;
        let top = mid.saturating_sub(4);
        self.front.put_center(top, "═══  FINAL  ═══", Color::Yellow);
        self.front.put_center(top + 2, &page.headline(), Color::White);
        if let Some(loser) = &page.loser {
            self.front.put_center(top + 3, &format!("{loser} was trapped"), DIM);
        }
        self.front.put_center(top + 4, &format!("Moves played: {}", page.moves), DIM);
        self.front.put_center(top + 6, &page.message, Color::White);
        self.front.put_center(top + 8, "[Enter] quit", DIM);
    }
}
