//! Session state and core game types
//!
//! Everything a round needs lives in [`Session`]; the controller is the only writer.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// A face of the coin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Heads,
    Tails,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Heads, Side::Tails];

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Heads => "Heads",
            Side::Tails => "Tails",
        }
    }

    /// Map a uniform draw in [0, 1) onto a side
    pub fn from_draw(draw: f64) -> Self {
        if draw < HEADS_THRESHOLD {
            Side::Heads
        } else {
            Side::Tails
        }
    }

    /// Resting flip progress that shows this face (Heads front, Tails back)
    pub fn resting_progress(&self) -> f32 {
        match self {
            Side::Heads => 0.0,
            Side::Tails => 1.0,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the player to pick a side
    #[default]
    Choosing,
    /// Coin is animating, outcome not drawn yet
    Flipping,
    /// Outcome revealed, waiting for "play again"
    Result,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Choosing => "Choosing",
            GamePhase::Flipping => "Flipping",
            GamePhase::Result => "Result",
        }
    }
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opacity of the (front, back) faces for a flip progress value.
///
/// The crossover is a hard cut: below the midpoint only Heads shows, above it
/// only Tails, and exactly at 0.5 neither face is drawn.
pub fn face_opacity(progress: f32) -> (f32, f32) {
    if progress < 0.5 {
        (1.0, 0.0)
    } else if progress > 0.5 {
        (0.0, 1.0)
    } else {
        (0.0, 0.0)
    }
}

/// Per-process game session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Side the player picked this round (set while Flipping/Result)
    pub chosen_side: Option<Side>,
    pub phase: GamePhase,
    /// Side the coin landed on in the last resolved round
    pub last_outcome: Option<Side>,
    pub result_text: String,
    /// Rounds won
    pub score: u32,
    /// Rounds resolved
    pub total_plays: u32,
    /// Animation position in [0, 1]; 0 shows Heads, 1 shows Tails
    pub flip_progress: f32,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            chosen_side: None,
            phase: GamePhase::Choosing,
            last_outcome: None,
            result_text: PROMPT_TEXT.to_string(),
            score: 0,
            total_plays: 0,
            flip_progress: 0.0,
        }
    }

    /// Fraction of resolved rounds won
    pub fn win_rate(&self) -> Option<f64> {
        if self.total_plays == 0 {
            None
        } else {
            Some(self.score as f64 / self.total_plays as f64)
        }
    }

    /// Score line as shown in the HUD
    pub fn score_line(&self) -> String {
        format!("Score: {}/{}", self.score, self.total_plays)
    }

    /// Record a resolved round. Returns true if the player won.
    pub(crate) fn record_outcome(&mut self, outcome: Side) -> bool {
        let won = self.chosen_side == Some(outcome);
        self.total_plays += 1;
        if won {
            self.score += 1;
            self.result_text = format!("{}! You Won! 🎉", outcome);
        } else {
            self.result_text = format!("{}! You Lost 😢", outcome);
        }
        self.last_outcome = Some(outcome);
        self.flip_progress = outcome.resting_progress();
        self.phase = GamePhase::Result;
        won
    }

    /// Back to Choosing; score and total plays carry over
    pub(crate) fn clear_round(&mut self) {
        self.phase = GamePhase::Choosing;
        self.chosen_side = None;
        self.result_text = PROMPT_TEXT.to_string();
        self.flip_progress = 0.0;
    }

    /// Read-only snapshot for rendering
    pub fn view(&self) -> SessionView {
        let (front_opacity, back_opacity) = face_opacity(self.flip_progress);
        SessionView {
            phase: self.phase,
            chosen_side: self.chosen_side,
            choices_enabled: self.phase == GamePhase::Choosing,
            flip_progress: self.flip_progress,
            front_opacity,
            back_opacity,
            result_text: self.result_text.clone(),
            score: self.score,
            total_plays: self.total_plays,
            score_line: self.score_line(),
        }
    }
}

/// Snapshot of everything a renderer needs; never written back
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub phase: GamePhase,
    pub chosen_side: Option<Side>,
    /// Choice buttons accept input (greyed out otherwise)
    pub choices_enabled: bool,
    pub flip_progress: f32,
    pub front_opacity: f32,
    pub back_opacity: f32,
    pub result_text: String,
    pub score: u32,
    pub total_plays: u32,
    pub score_line: String,
}
