//! Audio feedback using the Web Audio API
//!
//! Procedurally generated cues - no external files needed.

use web_sys::{AudioContext, OscillatorType};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Hold began, field converging
    HoldStart,
    /// Hold released early, field exploded
    Explosion,
    /// Stabilization completed
    Complete,
}

/// Audio manager for feedback cues
pub struct AudioManager {
    ctx: Option<AudioContext>,
    master_volume: f32,
    muted: bool,
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
        Self {
            ctx,
            master_volume: 0.8,
            muted: false,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::HoldStart => {
                // Rising hum as the field locks on
                self.play_sweep(ctx, 110.0, 440.0, 0.35, OscillatorType::Sine, vol * 0.3);
            }
            SoundEffect::Explosion => {
                // Harsh falling burst
                self.play_sweep(ctx, 660.0, 55.0, 0.5, OscillatorType::Sawtooth, vol * 0.4);
            }
            SoundEffect::Complete => {
                // Two-note chime
                self.play_sweep(ctx, 523.25, 523.25, 0.15, OscillatorType::Sine, vol * 0.4);
                self.play_sweep(ctx, 1046.5, 1046.5, 0.45, OscillatorType::Sine, vol * 0.3);
            }
        }
    }

    /// Single oscillator with a frequency sweep and exponential fade-out
    fn play_sweep(
        &self,
        ctx: &AudioContext,
        freq_start: f32,
        freq_end: f32,
        duration: f64,
        wave: OscillatorType,
        vol: f32,
    ) {
        let Ok(osc) = ctx.create_oscillator() else {
            return;
        };
        let Ok(gain) = ctx.create_gain() else { return };

        let now = ctx.current_time();
        osc.set_type(wave);
        let _ = osc.frequency().set_value_at_time(freq_start, now);
        let _ = osc
            .frequency()
            .exponential_ramp_to_value_at_time(freq_end.max(1.0), now + duration);

        let _ = gain.gain().set_value_at_time(vol, now);
        let _ = gain
            .gain()
            .exponential_ramp_to_value_at_time(0.001, now + duration);

        let _ = osc.connect_with_audio_node(&gain);
        let _ = gain.connect_with_audio_node(&ctx.destination());
        let _ = osc.start();
        let _ = osc.stop_with_when(now + duration);
    }
}
