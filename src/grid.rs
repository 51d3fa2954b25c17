use crate::{Coords, TermInt};

/// The outermost row and column on every side belong to the frame and are
/// never playable.
pub fn in_bounds(cell: Coords, width: TermInt, height: TermInt) -> bool {
    cell.0 > 0 && cell.0 < width - 1 && cell.1 > 0 && cell.1 < height - 1
}

/// Every playable cell of the board, row by row.
pub fn playable_positions(width: TermInt, height: TermInt) -> impl Iterator<Item = Coords> {
    (1..height - 1).flat_map(move |y| (1..width - 1).map(move |x| (x, y)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_cells_are_out_of_bounds() {
        for x in 0..8 {
            assert!(!in_bounds((x, 0), 8, 8));
            assert!(!in_bounds((x, 7), 8, 8));
        }
        for y in 0..8 {
            assert!(!in_bounds((0, y), 8, 8));
            assert!(!in_bounds((7, y), 8, 8));
        }
    }

    #[test]
    fn interior_cells_are_in_bounds() {
        for y in 1..7 {
            for x in 1..7 {
                assert!(in_bounds((x, y), 8, 8));
            }
        }
    }

    #[test]
    fn playable_positions_cover_the_interior() {
        let cells: Vec<Coords> = playable_positions(8, 8).collect();
        assert_eq!(cells.len(), 36);
        assert!(cells.iter().all(|&cell| in_bounds(cell, 8, 8)));
    }
}
