use std::collections::HashSet;

use crossterm::style::Color;
use rand::rngs::ThreadRng;
use rand::Rng;

use crate::item::Item;
use crate::snake::{Direction, MoveResult, Movement, Snake};
use crate::{Coords, TermInt};

const FOOD_POINTS: u32 = 10;
const BONUS_POINTS: u32 = 50;

const INITIAL_TICK_DELAY_MS: u64 = 140;
const TICK_DELAY_STEP_MS: u64 = 5;
const TICK_DELAY_FLOOR_MS: u64 = 40;

// One roll per tick while the bonus is off the board
const BONUS_SPAWN_ODDS: u64 = 100;

const FOOD_COLOR: Color = Color::Green;
const FOOD_GLYPH: char = '●';
const BONUS_COLOR: Color = Color::Magenta;
const BONUS_GLYPH: char = '★';

/// What happened during one simulation tick.
pub enum TickResult {
    /// The session is paused; nothing advanced.
    Paused,
    /// The snake hit a wall or itself.
    Crashed,
    /// The last free cell was consumed; there is nowhere left to put food.
    Won,
    Moved(Step),
}

/// Everything the renderer needs to redraw after a successful tick.
pub struct Step {
    pub movement: Movement,
    pub food_eaten: bool,
    pub food_respawned: Option<Coords>,
    pub bonus_eaten: bool,
    pub bonus_spawned: Option<Coords>,
}

/// All mutable state of one round: the snake, both consumables, the score
/// and the pacing delay. Owned exclusively by the game loop.
pub struct Session<R: Rng = ThreadRng> {
    width: TermInt,
    height: TermInt,
    snake: Snake,
    food: Item,
    bonus: Item,
    score: u32,
    tick_delay_ms: u64,
    paused: bool,
    rng: R,
}

impl Session<ThreadRng> {
    pub fn new(width: TermInt, height: TermInt) -> Self {
        Session::with_rng(width, height, rand::thread_rng())
    }
}

impl<R: Rng> Session<R> {
    pub fn with_rng(width: TermInt, height: TermInt, rng: R) -> Self {
        let snake = Snake::new(width / 2, height / 2);
        let food = Item::new(FOOD_COLOR, FOOD_GLYPH);
        let mut bonus = Item::new(BONUS_COLOR, BONUS_GLYPH);
        bonus.deactivate();

        let mut session = Session {
            width,
            height,
            snake,
            food,
            bonus,
            score: 0,
            tick_delay_ms: INITIAL_TICK_DELAY_MS,
            paused: false,
            rng,
        };

        // A fresh board always has room for the first food
        let occupied = session.occupied_by_snake();
        session
            .food
            .spawn(width, height, &occupied, &mut session.rng);
        session
    }

    pub fn steer(&mut self, direction: Direction) {
        self.snake.change_direction(direction);
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn tick_delay_ms(&self) -> u64 {
        self.tick_delay_ms
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> &Item {
        &self.food
    }

    pub fn bonus(&self) -> &Item {
        &self.bonus
    }

    /// Runs one tick: move, consume, respawn, bonus roll. Pacing is the
    /// caller's job; the returned delay accessor tells it how long to wait.
    pub fn tick(&mut self) -> TickResult {
        if self.paused {
            return TickResult::Paused;
        }

        let movement = match self.snake.advance(self.width, self.height) {
            MoveResult::Crashed => return TickResult::Crashed,
            MoveResult::Moved(movement) => movement,
        };

        let mut step = Step {
            movement,
            food_eaten: false,
            food_respawned: None,
            bonus_eaten: false,
            bonus_spawned: None,
        };

        if self.food.is_active() && movement.new_head == self.food.position() {
            self.score += FOOD_POINTS;
            self.snake.grow();
            step.food_eaten = true;

            let occupied = self.occupied_by_snake();
            match self
                .food
                .spawn(self.width, self.height, &occupied, &mut self.rng)
            {
                Some(cell) => step.food_respawned = Some(cell),
                None => return TickResult::Won,
            }

            if self.tick_delay_ms > TICK_DELAY_FLOOR_MS {
                self.tick_delay_ms -= TICK_DELAY_STEP_MS;
            }
        }

        if self.bonus.is_active() && movement.new_head == self.bonus.position() {
            self.score += BONUS_POINTS;
            self.bonus.deactivate();
            step.bonus_eaten = true;
        }

        if !self.bonus.is_active() && self.rng.gen_range(0..BONUS_SPAWN_ODDS) == 0 {
            let occupied = self.occupied_by_snake();
            step.bonus_spawned =
                self.bonus
                    .spawn(self.width, self.height, &occupied, &mut self.rng);
        }

        TickResult::Moved(step)
    }

    fn occupied_by_snake(&self) -> HashSet<Coords> {
        self.snake.body().iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session() -> Session<StdRng> {
        Session::with_rng(20, 20, StdRng::seed_from_u64(0xFEED))
    }

    #[test]
    fn fresh_session_state() {
        let session = session();

        assert_eq!(session.score(), 0);
        assert_eq!(session.tick_delay_ms(), 140);
        assert!(!session.is_paused());
        assert_eq!(session.snake().len(), 3);
        assert!(session.food().is_active());
        assert!(!session.bonus().is_active());
        assert!(!session.snake().body().contains(&session.food().position()));
    }

    #[test]
    fn eating_food_scores_grows_and_speeds_up() {
        let mut session = session();
        let head = session.snake().head();
        session.food.place_at((head.0 + 1, head.1));

        match session.tick() {
            TickResult::Moved(step) => {
                assert!(step.food_eaten);
                let respawned = step.food_respawned.unwrap();
                assert!(!session.snake().body().contains(&respawned));
            }
            _ => panic!("expected a plain move"),
        }

        assert_eq!(session.score(), 10);
        assert_eq!(session.snake().len(), 4);
        assert_eq!(session.tick_delay_ms(), 135);
    }

    #[test]
    fn bonus_after_food_reaches_sixty() {
        let mut session = session();
        let head = session.snake().head();
        session.food.place_at((head.0 + 1, head.1));
        session.tick();
        assert_eq!(session.score(), 10);

        let head = session.snake().head();
        session.bonus.place_at((head.0 + 1, head.1));
        // Keep the food well away from the path
        session.food.place_at((1, 1));

        match session.tick() {
            TickResult::Moved(step) => {
                assert!(step.bonus_eaten);
                assert!(!step.food_eaten);
                // The bonus leaves the board unless the spawn roll
                // immediately brought it back
                if step.bonus_spawned.is_none() {
                    assert!(!session.bonus().is_active());
                }
            }
            _ => panic!("expected a plain move"),
        }

        assert_eq!(session.score(), 60);
    }

    #[test]
    fn pause_freezes_movement_and_score() {
        let mut session = session();
        let head = session.snake().head();

        session.toggle_pause();
        for _ in 0..5 {
            assert!(matches!(session.tick(), TickResult::Paused));
        }
        assert_eq!(session.snake().head(), head);
        assert_eq!(session.score(), 0);

        session.toggle_pause();
        assert!(matches!(session.tick(), TickResult::Moved(_)));
        assert_eq!(session.snake().head(), (head.0 + 1, head.1));
    }

    #[test]
    fn delay_never_drops_below_the_floor() {
        let mut session = session();
        session.tick_delay_ms = 40;
        let head = session.snake().head();
        session.food.place_at((head.0 + 1, head.1));

        session.tick();
        assert_eq!(session.tick_delay_ms(), 40);
    }

    #[test]
    fn forced_roll_spawns_the_bonus() {
        // A constant-zero generator makes the 1-in-100 roll hit at once
        let mut session = Session::with_rng(20, 20, StepRng::new(0, 0));
        assert!(!session.bonus().is_active());

        match session.tick() {
            TickResult::Moved(step) => {
                let cell = step.bonus_spawned.unwrap();
                assert!(session.bonus().is_active());
                assert_eq!(session.bonus().position(), cell);
                assert!(!session.snake().body().contains(&cell));
            }
            _ => panic!("expected a plain move"),
        }
    }

    #[test]
    fn hitting_the_wall_ends_the_round() {
        let mut session = session();
        session.snake = Snake::from_cells(vec![(18, 10), (17, 10), (16, 10)], Direction::Right);

        assert!(matches!(session.tick(), TickResult::Crashed));
    }

    #[test]
    fn consuming_the_last_free_cell_wins() {
        let mut session = Session::with_rng(5, 5, StdRng::seed_from_u64(1));
        // Eight of the nine playable cells under the snake, food on the ninth
        session.snake = Snake::from_cells(
            vec![
                (3, 2),
                (3, 1),
                (2, 1),
                (1, 1),
                (1, 2),
                (2, 2),
                (2, 3),
                (1, 3),
            ],
            Direction::Down,
        );
        session.food.place_at((3, 3));

        assert!(matches!(session.tick(), TickResult::Won));
        assert_eq!(session.score(), 10);
    }
}
