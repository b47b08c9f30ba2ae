/// Viewport and square-size derivation.
///
/// The board takes the left two thirds of the viewport, the player panel
/// the remaining third. A square is 95% of the largest square that fits
/// both the height and the board's share of the width:
///
///   square = 95 * min(h / rows, (2 * w / 3) / cols) / 100,  at least 1
///
/// All divisions are integer divisions. Nothing here is cached; callers
/// recompute from the current viewport on every event.

use tracing::debug;

use super::Absorbed;

/// Drawable area in board units, plus where the board starts on screen.
///
/// `unit_cols` is how many raw columns make up one board unit horizontally
/// (the terminal renderer uses 2 so squares look square).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub origin_col: u16,
    pub origin_row: u16,
    pub unit_cols: u16,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Viewport { width, height, origin_col: 0, origin_row: 0, unit_cols: 1 }
    }

    pub fn with_origin(mut self, col: u16, row: u16) -> Self {
        self.origin_col = col;
        self.origin_row = row;
        self
    }

    pub fn with_unit_cols(mut self, unit_cols: u16) -> Self {
        self.unit_cols = unit_cols.max(1);
        self
    }

    /// Raw pointer position → board-relative coordinates.
    /// Positions left of or above the board come out negative.
    pub fn to_board(&self, column: u16, row: u16) -> (i32, i32) {
        let dx = column as i32 - self.origin_col as i32;
        let dy = row as i32 - self.origin_row as i32;
        (dx.div_euclid(self.unit_cols.max(1) as i32), dy)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ScreenGeometry {
    pub square_size: u32,
    /// Width of the board's share of the viewport, in board units.
    pub board_width: u32,
}

impl ScreenGeometry {
    pub fn compute(viewport: &Viewport, rows: u32, cols: u32) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        let board_width = 2 * viewport.width / 3;

        let fit = (viewport.height / rows).min(board_width / cols);
        let raw = 95 * fit / 100;
        if raw == 0 {
            debug!(
                width = viewport.width,
                height = viewport.height,
                rows, cols,
                "{}", Absorbed::InvalidGeometry
            );
        }

        ScreenGeometry {
            square_size: raw.max(1),
            board_width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn square_viewport_six_by_six() {
        let g = ScreenGeometry::compute(&Viewport::new(900, 600), 6, 6);
        assert_eq!(g.square_size, 95);
        assert_eq!(g.board_width, 600);
    }

    #[test]
    fn narrow_viewport_is_width_bound() {
        // height allows 100, width allows (2*300/3)/5 = 40
        let g = ScreenGeometry::compute(&Viewport::new(300, 500), 5, 5);
        assert_eq!(g.square_size, 38);
    }

    #[test]
    fn degenerate_viewport_clamps_to_one() {
        assert_eq!(ScreenGeometry::compute(&Viewport::new(0, 0), 6, 6).square_size, 1);
        assert_eq!(ScreenGeometry::compute(&Viewport::new(3, 3), 6, 6).square_size, 1);
    }

    #[test]
    fn zero_dimensions_are_treated_as_one() {
        let g = ScreenGeometry::compute(&Viewport::new(30, 20), 0, 0);
        assert_eq!(g.square_size, 19);
    }

    #[test]
    fn to_board_accounts_for_origin_and_unit_width() {
        let vp = Viewport::new(40, 20).with_origin(2, 1).with_unit_cols(2);
        assert_eq!(vp.to_board(2, 1), (0, 0));
        assert_eq!(vp.to_board(9, 4), (3, 3));
        assert_eq!(vp.to_board(1, 0), (-1, -1));
    }

    proptest! {
        #[test]
        fn square_size_is_at_least_one(w in 0u32..5000, h in 0u32..5000, rows in 0u32..40, cols in 0u32..40) {
            prop_assert!(ScreenGeometry::compute(&Viewport::new(w, h), rows, cols).square_size >= 1);
        }

        #[test]
        fn square_size_fits_both_axes(w in 1u32..5000, h in 1u32..5000, rows in 1u32..40, cols in 1u32..40) {
            let fit = (h / rows).min((2 * w / 3) / cols);
            prop_assume!(95 * fit / 100 >= 1);
            let s = ScreenGeometry::compute(&Viewport::new(w, h), rows, cols).square_size as f64;
            prop_assert!(s <= 0.95 * h as f64 / rows as f64);
            prop_assert!(s <= 0.95 * (2.0 / 3.0 * w as f64) / cols as f64);
        }
    }
}
