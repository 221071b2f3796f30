//! crossterm backend

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{self, Attribute, Color},
    terminal::{self, ClearType},
};

use super::layout::{Line, LineStyle, compose};
use crate::sim::SessionView;

/// Draws a session snapshot centered in the terminal
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    /// Last frame drawn, so unchanged frames are skipped
    last: Option<Vec<Line>>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force a full redraw on the next frame (e.g. after resize)
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    pub fn draw(&mut self, out: &mut impl Write, view: &SessionView) -> io::Result<()> {
        let lines = compose(view);
        if self.last.as_ref() == Some(&lines) {
            return Ok(());
        }

        let (cols, rows) = terminal::size()?;
        let top = rows.saturating_sub(lines.len() as u16) / 2;

        queue!(out, terminal::Clear(ClearType::All))?;
        for (i, line) in lines.iter().enumerate() {
            let width = line.width() as u16;
            let x = cols.saturating_sub(width) / 2;
            queue!(out, cursor::MoveTo(x, top + i as u16))?;
            print_line(out, line)?;
        }
        out.flush()?;

        self.last = Some(lines);
        Ok(())
    }
}

fn print_line(out: &mut impl Write, line: &Line) -> io::Result<()> {
    let (color, bold) = match line.style {
        LineStyle::Title => (Color::Magenta, true),
        LineStyle::Normal => (Color::Reset, false),
        LineStyle::Emphasis => (Color::White, true),
        LineStyle::CoinFront => (Color::Yellow, true),
        LineStyle::CoinBack => (Color::DarkYellow, true),
        LineStyle::CoinEdge => (Color::DarkGrey, false),
        LineStyle::Button => (Color::Cyan, true),
        LineStyle::Disabled => (Color::DarkGrey, false),
        LineStyle::Hint => (Color::DarkGrey, false),
    };

    queue!(out, style::SetForegroundColor(color))?;
    if bold {
        queue!(out, style::SetAttribute(Attribute::Bold))?;
    }
    queue!(
        out,
        style::Print(&line.text),
        style::SetAttribute(Attribute::Reset),
        style::ResetColor
    )
}
