//! Audio system using the Web Audio API
//!
//! Procedurally generated beeps - no asset files needed.

use web_sys::{AudioContext, AudioContextState, OscillatorType};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sfx {
    /// Gem collected
    Pickup,
    /// Obstacle hit, run over
    Hit,
    /// Run ended with a new best score
    NewBest,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    enabled: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self { ctx, enabled: true }
    }

    /// Follow the SFX settings toggle
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Resume the audio context (required after a user gesture on iOS)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Play a sound effect
    pub fn play(&self, sfx: Sfx) {
        if !self.enabled {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        if ctx.state() == AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match sfx {
            Sfx::Pickup => self.beep(ctx, 880.0, 0.10, OscillatorType::Square, 0.05, 0.0),
            Sfx::Hit => self.beep(ctx, 220.0, 0.12, OscillatorType::Sawtooth, 0.06, 0.0),
            Sfx::NewBest => {
                // Quick two-tone rise
                self.beep(ctx, 660.0, 0.08, OscillatorType::Square, 0.05, 0.0);
                self.beep(ctx, 880.0, 0.12, OscillatorType::Square, 0.05, 0.09);
            }
        }
    }

    /// One oscillator beep with a gain envelope, optionally delayed
    fn beep(
        &self,
        ctx: &AudioContext,
        freq: f32,
        length: f64,
        osc_type: OscillatorType,
        vol: f32,
        delay: f64,
    ) {
        let Ok(osc) = ctx.create_oscillator() else {
            return;
        };
        let Ok(gain) = ctx.create_gain() else { return };

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        if osc.connect_with_audio_node(&gain).is_err() {
            return;
        }
        if gain.connect_with_audio_node(&ctx.destination()).is_err() {
            return;
        }

        let t = ctx.current_time() + delay;
        let _ = gain.gain().set_value_at_time(vol, t);
        let _ = gain
            .gain()
            .exponential_ramp_to_value_at_time(0.001, t + length);

        let _ = osc.start_with_when(t);
        let _ = osc.stop_with_when(t + length);
    }
}
