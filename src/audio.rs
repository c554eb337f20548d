//! Audio system using Web Audio API
//!
//! Procedurally generated blips. No sample files are loaded.

use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

use crate::platform::SoundSink;
use crate::settings::Settings;
use crate::sim::SoundEvent;

pub struct AudioManager {
    ctx: Option<AudioContext>,
    settings: Settings,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Fails outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            settings: settings.clone(),
        }
    }

    /// Pick up changed preferences (mute toggle, volume)
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.settings = settings.clone();
    }

    /// Browsers keep the context suspended until a user gesture
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Short high ping
    fn play_wall(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 400.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.08)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.1).ok();
    }

    /// Falling thump
    fn play_paddle(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.4, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.1)
            .ok();
        osc.frequency().set_value_at_time(150.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(60.0, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Three descending notes
    fn play_goal(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [440.0, 330.0, 220.0].iter().enumerate() {
            let delay = i as f64 * 0.12;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.25).ok();
            }
        }
    }
}

impl SoundSink for AudioManager {
    fn play(&mut self, event: SoundEvent) {
        let vol = self.settings.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        if ctx.state() == AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match event {
            SoundEvent::Wall => self.play_wall(ctx, vol),
            SoundEvent::Paddle => self.play_paddle(ctx, vol),
            SoundEvent::Goal => self.play_goal(ctx, vol),
        }
    }
}
