/// Board grid for the bundled rules engine.
///
/// Squares start open. A square becomes blocked when a worker leaves it,
/// and never reopens.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Square {
    Open,
    Blocked,
}

/// Board position as (row, col).
pub type Pos = (usize, usize);

#[derive(Clone, Debug)]
pub struct Board {
    rows: usize,
    cols: usize,
    squares: Vec<Square>,
}

impl Board {
    pub fn new(rows: usize, cols: usize) -> Self {
        Board {
            rows,
            cols,
            squares: vec![Square::Open; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, (r, c): Pos) -> bool {
        r < self.rows && c < self.cols
    }

    /// Out-of-bounds positions read as blocked.
    pub fn square(&self, (r, c): Pos) -> Square {
        if r < self.rows && c < self.cols {
            self.squares[r * self.cols + c]
        } else {
            Square::Blocked
        }
    }

    pub fn block(&mut self, (r, c): Pos) {
        if r < self.rows && c < self.cols {
            self.squares[r * self.cols + c] = Square::Blocked;
        }
    }

    pub fn is_open(&self, pos: Pos) -> bool {
        self.square(pos) == Square::Open
    }

    /// In-bounds 8-neighbourhood of `pos`.
    pub fn neighbours(&self, (r, c): Pos) -> impl Iterator<Item = Pos> + '_ {
        const OFFSETS: [(i32, i32); 8] = [
            (-1, -1), (-1, 0), (-1, 1),
            (0, -1),           (0, 1),
            (1, -1),  (1, 0),  (1, 1),
        ];
        OFFSETS.iter().filter_map(move |&(dr, dc)| {
            let nr = r as i32 + dr;
            let nc = c as i32 + dc;
            if nr < 0 || nc < 0 {
                return None;
            }
            let p = (nr as usize, nc as usize);
            self.contains(p).then_some(p)
        })
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.rows).flat_map(move |r| (0..self.cols).map(move |c| (r, c)))
    }
}
