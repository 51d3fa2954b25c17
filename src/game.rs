use std::process::exit;
use std::thread::sleep;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent};
use crossterm::style::Color;
use log::info;

use crate::item::Item;
use crate::scores::HighScoreStore;
use crate::session::{Session, Step, TickResult};
use crate::snake::{Direction, Snake};
use crate::term::TermManager;
use crate::TermInt;

const GRID_WIDTH: TermInt = 50;
const GRID_HEIGHT: TermInt = 22;

const SCORE_FILE: &str = "highscore.txt";

const BODY_GLYPH: char = '■';
const HEAD_COLOR: Color = Color::Yellow;
const BODY_COLOR: Color = Color::White;
const FRAME_COLOR: Color = Color::DarkGrey;
const STATUS_COLOR: Color = Color::Yellow;

// Input keeps being polled at this cadence while the game is paused
const PAUSE_POLL_MS: u64 = 25;

const TITLE: [&str; 2] = [
    "█▀▀ █▄█ █▄▄ █▀▀ █▀█ █▀ █▄░█ ▄▀█ █▄▀ █▀▀",
    "█▄▄ ░█░ █▄█ ██▄ █▀▄ ▄█ █░▀█ █▀█ █░█ ██▄",
];

enum MenuChoice {
    Start,
    Exit,
}

enum RoundEnd {
    Crashed,
    Won,
}

pub struct SnakeGame {
    term: TermManager,
    scores: HighScoreStore,
    high_score: u32,
}

impl SnakeGame {
    pub fn new() -> Result<Self> {
        let term = TermManager::new(GRID_WIDTH, GRID_HEIGHT)?;
        let scores = HighScoreStore::new(SCORE_FILE);
        let high_score = scores.load().context("could not load the high score")?;

        Ok(SnakeGame {
            term,
            scores,
            high_score,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        self.term.setup()?;

        let result = self.main_loop();
        if result.is_err() {
            // Hand the terminal back before the error surfaces
            let _ = self.term.restore();
        }
        result
    }

    fn main_loop(&mut self) -> Result<()> {
        loop {
            match self.show_menu()? {
                MenuChoice::Exit => self.clean_exit()?,
                MenuChoice::Start => self.play()?,
            }
        }
    }

    ///////////////////////////////////////////////////////////////////////

    fn show_menu(&mut self) -> Result<MenuChoice> {
        self.term.clear()?;

        for (i, line) in TITLE.iter().enumerate() {
            self.term.print_text((4, 2 + i as TermInt), line, Color::Cyan)?;
        }

        let high_line = format!("[ HIGH SCORE: {} ]", self.high_score);
        self.term.print_text((8, 6), &high_line, Color::White)?;
        self.term.print_text((8, 8), "1. START GAME", Color::White)?;
        self.term
            .print_text((8, 9), "2. EXIT (or press ESC)", Color::White)?;
        self.term.flush()?;

        loop {
            let key = self.term.read_key_blocking()?;
            match key.code {
                KeyCode::Char('1') => return Ok(MenuChoice::Start),
                KeyCode::Char('2') | KeyCode::Esc => return Ok(MenuChoice::Exit),
                _ => {}
            }
        }
    }

    fn play(&mut self) -> Result<()> {
        self.term.clear()?;
        self.term.draw_borders(FRAME_COLOR)?;

        let mut session = Session::new(GRID_WIDTH, GRID_HEIGHT);
        self.draw_snake(session.snake())?;
        self.draw_item(session.food())?;
        self.draw_status(session.score())?;
        self.term.flush()?;
        info!("round started");

        let end = loop {
            for key in self.term.drain_key_events()? {
                self.handle_key(&mut session, &key)?;
            }

            match session.tick() {
                TickResult::Paused => {
                    sleep(Duration::from_millis(PAUSE_POLL_MS));
                    continue;
                }
                TickResult::Crashed => break RoundEnd::Crashed,
                TickResult::Won => break RoundEnd::Won,
                TickResult::Moved(step) => {
                    self.draw_step(&session, &step)?;
                    self.draw_status(session.score())?;
                    self.term.flush()?;
                }
            }

            sleep(Duration::from_millis(session.tick_delay_ms()));
        };

        self.finish_round(end, session.score())
    }

    fn handle_key(&mut self, session: &mut Session, key: &KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => self.clean_exit()?,
            KeyCode::Char(' ') => {
                session.toggle_pause();
                if session.is_paused() {
                    self.term
                        .show_message(&["PAUSED", "[SPACE] resume"], Color::Yellow)?;
                } else {
                    self.term.hide_message()?;
                }
            }
            KeyCode::Up => session.steer(Direction::Up),
            KeyCode::Down => session.steer(Direction::Down),
            KeyCode::Left => session.steer(Direction::Left),
            KeyCode::Right => session.steer(Direction::Right),
            _ => {}
        }

        Ok(())
    }

    fn draw_step(&mut self, session: &Session, step: &Step) -> Result<()> {
        let movement = &step.movement;
        self.term.print_at(movement.old_tail, ' ', Color::Reset)?;
        self.term
            .print_at(movement.old_head, BODY_GLYPH, BODY_COLOR)?;
        self.term
            .print_at(movement.new_head, session.snake().head_glyph(), HEAD_COLOR)?;

        if let Some(cell) = step.food_respawned {
            self.term
                .print_at(cell, session.food().glyph(), session.food().color())?;
        }
        if let Some(cell) = step.bonus_spawned {
            self.term
                .print_at(cell, session.bonus().glyph(), session.bonus().color())?;
        }

        if step.food_eaten {
            self.term.beep(800, 50);
        }
        if step.bonus_eaten {
            self.term.beep(1200, 100);
        }

        Ok(())
    }

    fn draw_snake(&mut self, snake: &Snake) -> Result<()> {
        for (i, pos) in snake.body().iter().enumerate() {
            let (ch, color) = if i == 0 {
                (snake.head_glyph(), HEAD_COLOR)
            } else {
                (BODY_GLYPH, BODY_COLOR)
            };
            self.term.print_at(*pos, ch, color)?;
        }
        Ok(())
    }

    fn draw_item(&mut self, item: &Item) -> Result<()> {
        self.term
            .print_at(item.position(), item.glyph(), item.color())?;
        Ok(())
    }

    fn draw_status(&mut self, score: u32) -> Result<()> {
        let line = format!(
            " SCORE: {} | HIGH: {} | [SPACE] PAUSE | [ESC] QUIT ",
            score, self.high_score
        );
        self.term.print_text((0, GRID_HEIGHT), &line, STATUS_COLOR)?;
        Ok(())
    }

    fn finish_round(&mut self, end: RoundEnd, score: u32) -> Result<()> {
        info!("round over, score {}", score);

        if score > self.high_score {
            self.high_score = score;
            self.scores
                .save(score)
                .context("could not save the high score")?;
            info!("new high score {}", score);
        }

        self.term.beep(200, 400);

        let (headline, color) = match end {
            RoundEnd::Crashed => ("G A M E   O V E R", Color::Red),
            RoundEnd::Won => ("Y O U   W O N !", Color::Green),
        };
        let score_line = format!("Score: {}", score);
        self.term.show_message(
            &[headline, &score_line, "", "[ENTER] Menu   [ESC] Exit"],
            color,
        )?;

        loop {
            let key = self.term.read_key_blocking()?;
            match key.code {
                KeyCode::Enter => return Ok(()),
                KeyCode::Esc => self.clean_exit()?,
                _ => {}
            }
        }
    }

    fn clean_exit(&mut self) -> Result<()> {
        info!("exiting at user request");
        self.term.restore()?;

        println!("\nThanks for playing CyberSnake!");
        sleep(Duration::from_millis(1000));
        exit(0);
    }
}
