use std::collections::HashSet;

use crossterm::style::Color;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::grid;
use crate::{Coords, TermInt};

/// A single consumable on the board. The position is only meaningful while
/// the item is active.
pub struct Item {
    position: Coords,
    active: bool,
    color: Color,
    glyph: char,
}

impl Item {
    pub fn new(color: Color, glyph: char) -> Self {
        Item {
            position: (0, 0),
            active: true,
            color,
            glyph,
        }
    }

    pub fn position(&self) -> Coords {
        self.position
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn glyph(&self) -> char {
        self.glyph
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Places the item on a uniformly chosen free playable cell and
    /// activates it. `None` means the board has no free cell left.
    pub fn spawn<R: Rng>(
        &mut self,
        width: TermInt,
        height: TermInt,
        occupied: &HashSet<Coords>,
        rng: &mut R,
    ) -> Option<Coords> {
        let free: Vec<Coords> = grid::playable_positions(width, height)
            .filter(|cell| !occupied.contains(cell))
            .collect();

        free.choose(rng).map(|&cell| {
            self.position = cell;
            self.active = true;
            cell
        })
    }

    #[cfg(test)]
    pub(crate) fn place_at(&mut self, cell: Coords) {
        self.position = cell;
        self.active = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn spawn_avoids_occupied_cells() {
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        // The whole border plus a three-cell snake on an 8x8 board
        let mut occupied: HashSet<Coords> = vec![(1, 1), (2, 1), (3, 1)].into_iter().collect();
        for x in 0..8 {
            occupied.insert((x, 0));
            occupied.insert((x, 7));
        }
        for y in 0..8 {
            occupied.insert((0, y));
            occupied.insert((7, y));
        }
        let mut item = Item::new(Color::Green, '●');

        for _ in 0..200 {
            let cell = item.spawn(8, 8, &occupied, &mut rng).unwrap();
            assert!(!occupied.contains(&cell));
            assert!(grid::in_bounds(cell, 8, 8));
        }
    }

    #[test]
    fn spawn_reactivates_the_item() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut item = Item::new(Color::Magenta, '★');
        item.deactivate();
        assert!(!item.is_active());

        let cell = item.spawn(8, 8, &HashSet::new(), &mut rng).unwrap();
        assert!(item.is_active());
        assert_eq!(item.position(), cell);
    }

    #[test]
    fn spawn_reports_a_full_board() {
        let mut rng = StdRng::seed_from_u64(7);
        let occupied: HashSet<Coords> = grid::playable_positions(4, 4).collect();
        let mut item = Item::new(Color::Green, '●');

        assert!(item.spawn(4, 4, &occupied, &mut rng).is_none());
    }
}
