//! Screen layout for a session snapshot

use unicode_width::UnicodeWidthStr;

use crate::consts::TITLE;
use crate::sim::{GamePhase, SessionView};

/// How a line should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Title,
    Normal,
    /// Result text
    Emphasis,
    /// Heads face
    CoinFront,
    /// Tails face
    CoinBack,
    /// Coin seen edge-on (both faces hidden)
    CoinEdge,
    Button,
    /// Button that ignores input right now
    Disabled,
    Hint,
}

/// One row of the screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub style: LineStyle,
}

impl Line {
    fn new(text: impl Into<String>, style: LineStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    fn blank() -> Self {
        Self::new("", LineStyle::Normal)
    }

    /// Terminal columns the text occupies (emoji take two)
    pub fn width(&self) -> usize {
        self.text.width()
    }
}

const HEADS_ART: [&str; 5] = [
    "  .-----.  ",
    " /       \\ ",
    "|    H    |",
    " \\       / ",
    "  '-----'  ",
];

const TAILS_ART: [&str; 5] = [
    "  .-----.  ",
    " / ~ ~ ~ \\ ",
    "|    T    |",
    " \\ ~ ~ ~ / ",
    "  '-----'  ",
];

const EDGE_ART: [&str; 5] = [
    "     |     ",
    "     |     ",
    "     |     ",
    "     |     ",
    "     |     ",
];

/// Coin rows for the given face opacities. A face shows once it is at least half visible.
fn coin(front_opacity: f32, back_opacity: f32) -> Vec<Line> {
    let (art, style) = if front_opacity >= 0.5 {
        (HEADS_ART, LineStyle::CoinFront)
    } else if back_opacity >= 0.5 {
        (TAILS_ART, LineStyle::CoinBack)
    } else {
        (EDGE_ART, LineStyle::CoinEdge)
    };
    art.iter().map(|row| Line::new(*row, style)).collect()
}

/// Build the full screen for `view`
pub fn compose(view: &SessionView) -> Vec<Line> {
    let mut lines = vec![
        Line::new(TITLE, LineStyle::Title),
        Line::new(view.score_line.as_str(), LineStyle::Normal),
        Line::blank(),
        Line::new(view.result_text.as_str(), LineStyle::Emphasis),
        Line::blank(),
    ];

    lines.extend(coin(view.front_opacity, view.back_opacity));
    lines.push(Line::blank());

    match view.phase {
        GamePhase::Choosing | GamePhase::Flipping => {
            let style = if view.choices_enabled {
                LineStyle::Button
            } else {
                LineStyle::Disabled
            };
            lines.push(Line::new("[H] Choose Heads    [T] Choose Tails", style));
        }
        GamePhase::Result => {
            lines.push(Line::new("[Enter] Play Again", LineStyle::Button));
        }
    }

    lines.push(Line::blank());
    lines.push(Line::new("[M] Mute    [Q] Quit", LineStyle::Hint));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Session, Side};

    fn styles(lines: &[Line]) -> Vec<LineStyle> {
        lines.iter().map(|l| l.style).collect()
    }

    #[test]
    fn test_choosing_screen() {
        let lines = compose(&Session::new().view());
        assert_eq!(lines[0].text, TITLE);
        assert_eq!(lines[1].text, "Score: 0/0");
        assert_eq!(lines[3].text, "Choose a side!");
        assert!(styles(&lines).contains(&LineStyle::CoinFront));
        assert!(lines.iter().any(|l| l.text.contains("Choose Heads") && l.style == LineStyle::Button));
    }

    #[test]
    fn test_flipping_disables_choices() {
        let mut session = Session::new();
        session.chosen_side = Some(Side::Tails);
        session.phase = GamePhase::Flipping;
        session.flip_progress = 0.5;

        let lines = compose(&session.view());
        assert!(styles(&lines).contains(&LineStyle::CoinEdge));
        assert!(lines.iter().any(|l| l.text.contains("Choose Tails") && l.style == LineStyle::Disabled));
        assert!(!lines.iter().any(|l| l.text.contains("Play Again")));
    }

    #[test]
    fn test_width_counts_wide_emoji() {
        let mut session = Session::new();
        session.chosen_side = Some(Side::Heads);
        session.phase = GamePhase::Flipping;
        session.record_outcome(Side::Heads);

        let lines = compose(&session.view());
        let result = &lines[3];
        assert_eq!(result.text, "Heads! You Won! 🎉");
        assert_eq!(result.width(), result.text.chars().count() + 1);
        assert_eq!(lines[0].width(), TITLE.len());
    }

    #[test]
    fn test_result_shows_play_again() {
        let mut session = Session::new();
        session.chosen_side = Some(Side::Heads);
        session.phase = GamePhase::Flipping;
        session.record_outcome(Side::Tails);

        let lines = compose(&session.view());
        assert_eq!(lines[1].text, "Score: 0/1");
        assert!(styles(&lines).contains(&LineStyle::CoinBack));
        assert!(lines.iter().any(|l| l.text.contains("Play Again")));
        assert!(!lines.iter().any(|l| l.text.contains("Choose Heads")));
    }
}
