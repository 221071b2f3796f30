//! Coin Flip - pick a side, watch the coin spin, keep score
//!
//! Core modules:
//! - `sim`: Deterministic game logic (session state, flip timeline, outcome draw)
//! - `audio`: Best-effort sound cues
//! - `renderer`: Terminal rendering of a session snapshot
//! - `settings`: Player preferences

pub mod audio;
#[cfg(not(target_arch = "wasm32"))]
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;
pub use sim::{CoinFlipController, GamePhase, Session, SessionView, Side};

/// Game configuration constants
pub mod consts {
    /// Duration of a single half-turn of the coin (ms)
    pub const FLIP_STEP_MS: u64 = 100;
    /// Total flip animation duration (ms); the outcome resolves exactly here
    pub const FLIP_TOTAL_MS: u64 = 1200;
    /// Number of animation steps in a flip
    pub const FLIP_STEPS: u64 = FLIP_TOTAL_MS / FLIP_STEP_MS;

    /// Draws below this value land on Heads
    pub const HEADS_THRESHOLD: f64 = 0.5;

    /// Screen title
    pub const TITLE: &str = "Coin Flip Game";
    /// Result text shown while waiting for a choice
    pub const PROMPT_TEXT: &str = "Choose a side!";
}
