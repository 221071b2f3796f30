//! Sound cues
//!
//! Audio is strictly best effort: a missing or failing backend never blocks a
//! phase change. Native builds ring the terminal bell, web builds synthesize
//! short tones with the Web Audio API.

use thiserror::Error;

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Coin leaves the thumb
    Flip,
    /// Outcome matched the chosen side
    Win,
    /// Outcome did not match
    Lose,
}

/// Audio backend failures
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio backend unavailable")]
    Unavailable,
    #[error("audio backend error: {0}")]
    Backend(String),
}

/// Something that can play a cue
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError>;
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Option<Box<dyn AudioSink>>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::silent()
    }
}

impl std::fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioManager")
            .field("available", &self.sink.is_some())
            .field("master_volume", &self.master_volume)
            .field("sfx_volume", &self.sfx_volume)
            .field("muted", &self.muted)
            .finish()
    }
}

impl AudioManager {
    pub fn new(sink: Option<Box<dyn AudioSink>>) -> Self {
        if sink.is_none() {
            log::warn!("No audio backend - audio disabled");
        }
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Manager with no backend at all
    pub fn silent() -> Self {
        Self {
            sink: None,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Manager with the volume preferences from `settings`
    pub fn with_settings(sink: Option<Box<dyn AudioSink>>, settings: &Settings) -> Self {
        let mut audio = Self::new(sink);
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);
        audio
    }

    /// Whether a backend is still attached
    pub fn is_available(&self) -> bool {
        self.sink.is_some()
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect. Fire and forget.
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(sink) = self.sink.as_mut() else { return };

        match sink.play(effect, vol) {
            Ok(()) => {}
            Err(AudioError::Unavailable) => {
                log::warn!("Audio backend went away - audio disabled");
                self.sink = None;
            }
            Err(e) => log::warn!("Failed to play {:?}: {}", effect, e),
        }
    }

    /// Drop the backend
    pub fn release(&mut self) {
        if self.sink.take().is_some() {
            log::debug!("Audio backend released");
        }
    }
}

/// Terminal bell backend
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct TerminalBell;

#[cfg(not(target_arch = "wasm32"))]
impl AudioSink for TerminalBell {
    fn play(&mut self, effect: SoundEffect, _volume: f32) -> Result<(), AudioError> {
        use std::io::Write;

        // Only the flip gets a bell; a bell per result is noisy
        if effect != SoundEffect::Flip {
            return Ok(());
        }
        let mut out = std::io::stdout();
        out.write_all(b"\x07")
            .and_then(|_| out.flush())
            .map_err(|e| AudioError::Backend(e.to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioError, AudioSink, SoundEffect};

    /// Web Audio backend (procedural tones, no asset files)
    pub struct WebAudio {
        ctx: AudioContext,
    }

    impl WebAudio {
        /// May fail outside a secure context
        pub fn new() -> Option<Self> {
            match AudioContext::new() {
                Ok(ctx) => Some(Self { ctx }),
                Err(_) => {
                    log::warn!("Failed to create AudioContext - audio disabled");
                    None
                }
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Result<(OscillatorNode, GainNode), AudioError> {
            let err = |_| AudioError::Backend("failed to build oscillator".to_string());
            let osc = self.ctx.create_oscillator().map_err(err)?;
            let gain = self.ctx.create_gain().map_err(err)?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).map_err(err)?;
            gain.connect_with_audio_node(&self.ctx.destination())
                .map_err(err)?;

            Ok((osc, gain))
        }

        /// Metallic ping sliding down, like a flicked coin
        fn play_flip(&self, vol: f32) -> Result<(), AudioError> {
            let (osc, gain) = self.create_osc(2400.0, OscillatorType::Triangle)?;
            let t = self.ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(1600.0, t + 0.25)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
            Ok(())
        }

        /// Two rising notes
        fn play_win(&self, vol: f32) -> Result<(), AudioError> {
            for (i, freq) in [523.0, 784.0].into_iter().enumerate() {
                let (osc, gain) = self.create_osc(freq, OscillatorType::Sine)?;
                let t = self.ctx.current_time() + i as f64 * 0.1;

                gain.gain().set_value_at_time(0.0, t).ok();
                gain.gain().linear_ramp_to_value_at_time(vol * 0.3, t + 0.02).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                    .ok();

                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.25).ok();
            }
            Ok(())
        }

        /// Low falling buzz
        fn play_lose(&self, vol: f32) -> Result<(), AudioError> {
            let (osc, gain) = self.create_osc(220.0, OscillatorType::Sawtooth)?;
            let t = self.ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.35)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(110.0, t + 0.35)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.4).ok();
            Ok(())
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError> {
            if self.ctx.state() == web_sys::AudioContextState::Closed {
                return Err(AudioError::Unavailable);
            }
            // Resume context if suspended (browsers require user gesture)
            if self.ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = self.ctx.resume();
            }

            match effect {
                SoundEffect::Flip => self.play_flip(volume),
                SoundEffect::Win => self.play_win(volume),
                SoundEffect::Lose => self.play_lose(volume),
            }
        }
    }

    impl Drop for WebAudio {
        fn drop(&mut self) {
            let _ = self.ctx.close();
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every cue it is asked to play
    #[derive(Clone, Default)]
    pub(crate) struct RecordingSink {
        pub played: Rc<RefCell<Vec<SoundEffect>>>,
    }

    impl AudioSink for RecordingSink {
        fn play(&mut self, effect: SoundEffect, _volume: f32) -> Result<(), AudioError> {
            self.played.borrow_mut().push(effect);
            Ok(())
        }
    }

    /// Fails every call with the given error kind
    pub(crate) struct BrokenSink {
        pub unavailable: bool,
    }

    impl AudioSink for BrokenSink {
        fn play(&mut self, _effect: SoundEffect, _volume: f32) -> Result<(), AudioError> {
            if self.unavailable {
                Err(AudioError::Unavailable)
            } else {
                Err(AudioError::Backend("device busy".to_string()))
            }
        }
    }

    #[test]
    fn test_muted_plays_nothing() {
        let sink = RecordingSink::default();
        let played = sink.played.clone();
        let mut audio = AudioManager::new(Some(Box::new(sink)));
        audio.set_muted(true);
        audio.play(SoundEffect::Flip);
        assert!(played.borrow().is_empty());

        audio.set_muted(false);
        audio.play(SoundEffect::Flip);
        assert_eq!(*played.borrow(), vec![SoundEffect::Flip]);
    }

    #[test]
    fn test_volume_clamps() {
        let mut audio = AudioManager::silent();
        audio.set_master_volume(2.0);
        audio.set_sfx_volume(-1.0);
        assert_eq!(audio.effective_volume(), 0.0);
        audio.set_sfx_volume(0.5);
        assert_eq!(audio.effective_volume(), 0.5);
    }

    #[test]
    fn test_backend_errors_degrade() {
        let mut audio = AudioManager::new(Some(Box::new(BrokenSink { unavailable: false })));
        audio.play(SoundEffect::Flip);
        assert!(audio.is_available());

        let mut audio = AudioManager::new(Some(Box::new(BrokenSink { unavailable: true })));
        audio.play(SoundEffect::Flip);
        assert!(!audio.is_available());
        audio.play(SoundEffect::Flip);
    }

    #[test]
    fn test_settings_applied() {
        let settings = Settings {
            muted: true,
            ..Settings::default()
        };
        let audio = AudioManager::with_settings(None, &settings);
        assert_eq!(audio.effective_volume(), 0.0);
    }
}
