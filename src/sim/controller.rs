//! Round controller
//!
//! Owns the [`Session`] and drives it through
//! `Choosing -> Flipping -> Result -> Choosing`. Input actions and timer events
//! are the only things that mutate state.

use thiserror::Error;

use super::outcome::{OutcomeSource, SeededDraw};
use super::schedule::{FlipStep, Scheduler, TimerId, VirtualClock, flip_sequence};
use super::state::{GamePhase, Session, SessionView, Side};
use crate::audio::{AudioManager, SoundEffect};
use crate::consts::*;

/// Player actions that can be refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ChooseSide,
    Reset,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::ChooseSide => f.write_str("choose a side"),
            Action::Reset => f.write_str("play again"),
        }
    }
}

/// Why an action was refused. State is untouched in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("cannot {action} while {phase}")]
    InvalidTransition { action: Action, phase: GamePhase },
    #[error("controller has been torn down")]
    TornDown,
}

/// Timer payloads for a flip
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlipEvent {
    /// Start tweening toward the step's target
    Step(FlipStep),
    /// Flip duration elapsed; draw the outcome
    Resolve,
}

/// Linear interpolation of flip progress over one step
#[derive(Debug, Clone, Copy)]
struct Tween {
    from: f32,
    to: f32,
    start_ms: u64,
    duration_ms: u64,
}

impl Tween {
    fn sample(&self, now_ms: u64) -> f32 {
        if self.duration_ms == 0 {
            return self.to;
        }
        let elapsed = now_ms.saturating_sub(self.start_ms) as f32;
        let t = (elapsed / self.duration_ms as f32).min(1.0);
        (self.from + (self.to - self.from) * t).clamp(0.0, 1.0)
    }
}

/// Coin flip game controller
#[derive(Debug)]
pub struct CoinFlipController<S, O>
where
    S: Scheduler<FlipEvent>,
    O: OutcomeSource,
{
    session: Session,
    scheduler: S,
    outcome: O,
    audio: AudioManager,
    /// Timers belonging to the flip in progress
    timers: Vec<TimerId>,
    tween: Option<Tween>,
    torn_down: bool,
}

impl CoinFlipController<VirtualClock<FlipEvent>, SeededDraw> {
    /// Controller on a virtual clock with a seeded draw
    pub fn seeded(seed: u64, audio: AudioManager) -> Self {
        let outcome = SeededDraw::new(seed);
        log::info!("Coin flip seeded with {}", outcome.seed());
        Self::new(VirtualClock::new(), outcome, audio)
    }
}

impl<S, O> CoinFlipController<S, O>
where
    S: Scheduler<FlipEvent>,
    O: OutcomeSource,
{
    pub fn new(scheduler: S, outcome: O, audio: AudioManager) -> Self {
        Self {
            session: Session::new(),
            scheduler,
            outcome,
            audio,
            timers: Vec::new(),
            tween: None,
            torn_down: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager {
        &mut self.audio
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Snapshot for the renderer
    pub fn view(&self) -> SessionView {
        self.session.view()
    }

    /// Pick a side and start the flip. Only valid while Choosing.
    pub fn choose_side(&mut self, side: Side) -> Result<(), GameError> {
        self.check(Action::ChooseSide, GamePhase::Choosing)?;

        self.session.chosen_side = Some(side);
        self.session.phase = GamePhase::Flipping;
        log::debug!("Chose {}, flipping", side);

        self.start_flip();
        Ok(())
    }

    /// Start a new round, keeping the score. Only valid in Result.
    pub fn reset(&mut self) -> Result<(), GameError> {
        self.check(Action::Reset, GamePhase::Result)?;

        self.session.clear_round();
        self.tween = None;
        log::debug!("Round reset ({})", self.session.score_line());
        Ok(())
    }

    /// Move time forward and apply any timers that came due
    pub fn advance(&mut self, elapsed_ms: u64) {
        if self.torn_down {
            return;
        }

        let fired = self.scheduler.advance(elapsed_ms);
        let now = self.scheduler.now();

        for (due, event) in fired {
            match event {
                FlipEvent::Step(step) => {
                    let from = match &self.tween {
                        Some(tween) => tween.sample(due),
                        None => self.session.flip_progress,
                    };
                    self.tween = Some(Tween {
                        from,
                        to: step.target,
                        start_ms: due,
                        duration_ms: step.duration_ms,
                    });
                }
                FlipEvent::Resolve => self.resolve_outcome(),
            }
        }

        if let Some(tween) = &self.tween {
            self.session.flip_progress = tween.sample(now);
        }
    }

    /// Cancel pending timers and release audio. Nothing mutates the session afterwards.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        for id in self.timers.drain(..) {
            self.scheduler.cancel(id);
        }
        self.tween = None;
        self.audio.release();
        self.torn_down = true;
        log::info!("Coin flip torn down ({})", self.session.score_line());
    }

    fn check(&self, action: Action, required: GamePhase) -> Result<(), GameError> {
        if self.torn_down {
            return Err(GameError::TornDown);
        }
        let phase = self.session.phase;
        if phase != required {
            log::debug!("Ignoring '{}' while {}", action, phase);
            return Err(GameError::InvalidTransition { action, phase });
        }
        Ok(())
    }

    /// Queue the half-turn steps and the resolve timer
    fn start_flip(&mut self) {
        self.audio.play(SoundEffect::Flip);

        for step in flip_sequence(FLIP_TOTAL_MS, FLIP_STEP_MS) {
            let id = self.scheduler.schedule(step.start_ms, FlipEvent::Step(step));
            self.timers.push(id);
        }
        // Scheduled last so it fires after a step due at the same instant
        let id = self.scheduler.schedule(FLIP_TOTAL_MS, FlipEvent::Resolve);
        self.timers.push(id);
    }

    fn resolve_outcome(&mut self) {
        if self.session.phase != GamePhase::Flipping {
            return;
        }

        let outcome = self.outcome.next_side();
        self.tween = None;
        self.timers.clear();

        let won = self.session.record_outcome(outcome);
        log::debug!(
            "Landed on {} ({}), {}",
            outcome,
            if won { "win" } else { "loss" },
            self.session.score_line()
        );

        self.audio
            .play(if won { SoundEffect::Win } else { SoundEffect::Lose });
    }
}

impl<S, O> Drop for CoinFlipController<S, O>
where
    S: Scheduler<FlipEvent>,
    O: OutcomeSource,
{
    fn drop(&mut self) {
        self.teardown();
    }
}
