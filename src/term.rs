use std::io::{stdout, Stdout, Write};
use std::time::Duration;

use anyhow::ensure;
use crossterm::event::{poll, read, Event, KeyEvent};
use crossterm::style::{Color, SetForegroundColor};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, style, terminal, Result};

use crate::{Coords, TermInt};

/// Cell-addressed view over the top-left corner of the terminal, sized to
/// the playfield plus one status row below it. Every write is mirrored
/// into a local buffer so that message overlays can restore what they
/// covered when they are dismissed.
pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<(char, Color)>,
    current_msg: Option<Message>,
}

struct Message {
    top_left: Coords,
    width: TermInt,
    height: TermInt,
}

impl TermManager {
    /// `width`/`height` cover the playfield; one extra row below it is
    /// reserved for the status line.
    pub fn new(width: TermInt, height: TermInt) -> anyhow::Result<Self> {
        let (term_width, term_height) = terminal::size()?;
        ensure!(
            term_width >= width && term_height > height,
            "terminal is {}x{}, need at least {}x{}",
            term_width,
            term_height,
            width,
            height + 1
        );

        let screen = vec![(' ', Color::Reset); width as usize * (height as usize + 1)];
        Ok(TermManager {
            width,
            height,
            stdout: stdout(),
            screen,
            current_msg: None,
        })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)
    }

    pub fn restore(&mut self) -> Result<()> {
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking)?;
        terminal::disable_raw_mode()?;
        execute!(self.stdout, LeaveAlternateScreen)
    }

    pub fn read_key_blocking(&self) -> Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read()? {
                return Ok(ev);
            }
        }
    }

    /// Collects every key event already waiting in the input queue without
    /// blocking for new ones.
    pub fn drain_key_events(&self) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];

        while poll(Duration::from_millis(1))? {
            if let Event::Key(ev) = read()? {
                events.push(ev);
            }
        }

        Ok(events)
    }

    pub fn print_at(&mut self, pos: Coords, ch: char, color: Color) -> Result<()> {
        queue!(
            self.stdout,
            cursor::MoveTo(pos.0, pos.1),
            SetForegroundColor(color),
            style::Print(ch)
        )?;
        self.screen[self.width as usize * pos.1 as usize + pos.0 as usize] = (ch, color);
        Ok(())
    }

    /// Writes a line of text starting at `pos`, clipped at the right edge.
    pub fn print_text(&mut self, pos: Coords, text: &str, color: Color) -> Result<()> {
        for (i, ch) in text.chars().enumerate() {
            let x = pos.0 + i as TermInt;
            if x >= self.width {
                break;
            }
            self.print_at((x, pos.1), ch, color)?;
        }
        Ok(())
    }

    pub fn draw_borders(&mut self, color: Color) -> Result<()> {
        let end_x = self.width - 1;
        let end_y = self.height - 1;

        for x in 0..self.width {
            self.print_at((x, 0), '█', color)?;
            self.print_at((x, end_y), '█', color)?;
        }

        for y in 1..self.height - 1 {
            self.print_at((0, y), '█', color)?;
            self.print_at((end_x, y), '█', color)?;
        }

        self.flush()
    }

    /// Shows a centered message box over the playfield. Whatever it covers
    /// is restored from the screen buffer on `hide_message`.
    pub fn show_message(&mut self, lines: &[&str], color: Color) -> Result<()> {
        if self.current_msg.is_some() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let center = (self.width / 2, self.height / 2);
        let top_left = (center.0 - msg_width / 2, center.1 - msg_height / 2);

        // Blank rows above and below the text
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for dx in 0..msg_width {
                self.print_at_no_save((top_left.0 + dx, *y), ' ', color)?;
            }
        }

        for (i, line) in lines.iter().enumerate() {
            let padded = format!("{:^width$}", line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (dx, ch) in padded.chars().enumerate() {
                self.print_at_no_save((top_left.0 + dx as TermInt, y), ch, color)?;
            }
        }

        self.current_msg = Some(Message {
            top_left,
            width: msg_width,
            height: msg_height,
        });
        self.flush()
    }

    pub fn hide_message(&mut self) -> Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };

        // Repaint the covered region from the screen buffer
        for dy in 0..msg.height {
            for dx in 0..msg.width {
                let (x, y) = (msg.top_left.0 + dx, msg.top_left.1 + dy);
                let (ch, color) = self.screen[self.width as usize * y as usize + x as usize];
                self.print_at_no_save((x, y), ch, color)?;
            }
        }

        self.flush()
    }

    pub fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All))?;
        self.screen = vec![(' ', Color::Reset); self.width as usize * (self.height as usize + 1)];
        // A wiped screen has no overlay left to restore
        self.current_msg = None;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush()?;
        Ok(())
    }

    /// Fire-and-forget audible cue. The terminal bell carries neither pitch
    /// nor duration, and a surface that cannot ring simply stays silent.
    pub fn beep(&mut self, _freq_hz: u16, _duration_ms: u64) {
        let _ = write!(self.stdout, "\x07");
        let _ = self.stdout.flush();
    }

    ///////////////////////////////////////////////////////////////////////

    fn print_at_no_save(&mut self, pos: Coords, ch: char, color: Color) -> Result<()> {
        // Message overlays bypass the screen buffer so it keeps holding the
        // content to restore once the message is hidden
        queue!(
            self.stdout,
            cursor::MoveTo(pos.0, pos.1),
            SetForegroundColor(color),
            style::Print(ch)
        )?;
        Ok(())
    }
}
