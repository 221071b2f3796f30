//! Deterministic game logic
//!
//! All gameplay lives here. This module must stay pure and deterministic:
//! - Virtual time only (frontends feed elapsed milliseconds)
//! - Injected outcome source only
//! - No rendering or platform dependencies

pub mod controller;
pub mod outcome;
pub mod schedule;
pub mod state;

pub use controller::{Action, CoinFlipController, FlipEvent, GameError};
pub use outcome::{FixedDraw, OutcomeSource, SeededDraw};
pub use schedule::{FlipStep, Scheduler, TimerId, VirtualClock, flip_sequence};
pub use state::{GamePhase, Session, SessionView, Side, face_opacity};
