use std::collections::VecDeque;

use crate::grid;
use crate::{Coords, TermInt};
use Direction::*;
use MoveResult::*;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn head_glyph(self) -> char {
        match self {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }

    fn apply(self, cell: Coords) -> Coords {
        let (dx, dy) = self.delta();
        (
            (cell.0 as i32 + dx) as TermInt,
            (cell.1 as i32 + dy) as TermInt,
        )
    }
}

pub enum MoveResult {
    Moved(Movement),
    Crashed,
}

/// The cells touched by one successful move, in the form the renderer
/// needs them: draw the head, repaint the old head as body, erase the tail.
#[derive(Copy, Clone, Debug)]
pub struct Movement {
    pub new_head: Coords,
    pub old_head: Coords,
    pub old_tail: Coords,
}

pub struct Snake {
    body: VecDeque<Coords>,
    heading: Direction,
    pending_tail: Option<Coords>,
}

impl Snake {
    pub fn new(x: TermInt, y: TermInt) -> Self {
        let body = VecDeque::from(vec![(x, y), (x - 1, y), (x - 2, y)]);
        Snake {
            body,
            heading: Right,
            pending_tail: None,
        }
    }

    pub fn head(&self) -> Coords {
        self.body[0]
    }

    pub fn body(&self) -> &VecDeque<Coords> {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn change_direction(&mut self, requested: Direction) {
        if requested != self.heading.opposite() {
            self.heading = requested;
        }
    }

    /// Advances one cell in the current heading. `Crashed` means the move
    /// was rejected and the round is over; the snake is left untouched.
    pub fn advance(&mut self, width: TermInt, height: TermInt) -> MoveResult {
        let old_head = self.head();
        let new_head = self.heading.apply(old_head);

        // The check scans the whole pre-move body: the current tail still
        // blocks the move even though it vacates on this very step.
        if !grid::in_bounds(new_head, width, height) || self.body.contains(&new_head) {
            return Crashed;
        }

        self.body.push_front(new_head);
        let old_tail = self.body.pop_back().unwrap();
        self.pending_tail = Some(old_tail);

        Moved(Movement {
            new_head,
            old_head,
            old_tail,
        })
    }

    /// Re-appends the tail cell vacated by the last move, growing the body
    /// by one. Only meaningful right after a move that consumed something.
    pub fn grow(&mut self) {
        if let Some(cell) = self.pending_tail.take() {
            self.body.push_back(cell);
        }
    }

    pub fn head_glyph(&self) -> char {
        self.heading.head_glyph()
    }

    #[cfg(test)]
    pub(crate) fn from_cells(cells: Vec<Coords>, heading: Direction) -> Self {
        Snake {
            body: VecDeque::from(cells),
            heading,
            pending_tail: None,
        }
    }
}
