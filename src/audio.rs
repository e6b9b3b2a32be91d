//! Audio system using Web Audio API
//!
//! Procedurally generated blips and chimes, no sound files to ship.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;
use crate::sim::{GameEvent, Verdict};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Runner jump or UI confirmation
    ButtonPress,
    /// Runner touched a non-200 obstacle
    Hit,
    /// Runner picked up a 200
    Score,
    /// Meter reached a new achievement distance
    Achievement,
    /// Runner crashed
    GameOver,
    /// Page kept correctly
    Keep,
    /// Page discarded correctly
    Discard,
    /// Wrong sorting decision
    Wrong,
    /// Sorter round clock ran out
    TimeUp,
}

impl SoundEffect {
    /// Sound to play for a gameplay event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match *event {
            GameEvent::Jump => Some(SoundEffect::ButtonPress),
            GameEvent::ObstacleHit { collected: true, .. } => Some(SoundEffect::Score),
            GameEvent::ObstacleHit { .. } => Some(SoundEffect::Hit),
            GameEvent::Achievement { .. } => Some(SoundEffect::Achievement),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::PageSorted { correct: false, .. } => Some(SoundEffect::Wrong),
            GameEvent::PageSorted {
                verdict: Verdict::Keep,
                ..
            } => Some(SoundEffect::Keep),
            GameEvent::PageSorted { .. } => Some(SoundEffect::Discard),
            GameEvent::TimeUp { .. } => Some(SoundEffect::TimeUp),
            GameEvent::NightMode { .. } | GameEvent::Restart => None,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
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
            volume: settings.effective_volume(),
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Pick up a changed volume or mute toggle
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.volume = settings.effective_volume();
    }

    /// Play the sound that goes with an event
    pub fn play_event(&self, event: &GameEvent) {
        if let Some(effect) = SoundEffect::for_event(event) {
            self.play(effect);
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.volume;
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::ButtonPress => self.play_button_press(ctx, vol),
            SoundEffect::Hit => self.play_hit(ctx, vol),
            SoundEffect::Score => self.play_score(ctx, vol),
            SoundEffect::Achievement => self.play_achievement(ctx, vol),
            SoundEffect::GameOver => self.play_game_over(ctx, vol),
            SoundEffect::Keep => self.play_keep(ctx, vol),
            SoundEffect::Discard => self.play_discard(ctx, vol),
            SoundEffect::Wrong => self.play_wrong(ctx, vol),
            SoundEffect::TimeUp => self.play_time_up(ctx, vol),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
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

    /// One decaying tone starting `delay` seconds from now
    fn blip(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
        level: f32,
        delay: f64,
        length: f64,
    ) {
        let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) else {
            return;
        };
        let t = ctx.current_time() + delay;
        gain.gain().set_value_at_time(level, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + length)
            .ok();
        osc.start_with_when(t).ok();
        osc.stop_with_when(t + length + 0.05).ok();
    }

    /// Short square-wave click, the classic jump beep
    fn play_button_press(&self, ctx: &AudioContext, vol: f32) {
        self.blip(ctx, 660.0, OscillatorType::Square, vol * 0.15, 0.0, 0.06);
    }

    /// Low buzz dropping in pitch
    fn play_hit(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 180.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.35, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                .ok();
            osc.frequency().set_value_at_time(180.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(60.0, t + 0.2)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.25).ok();
        }

        // Thump underneath
        self.blip(ctx, 60.0, OscillatorType::Sine, vol * 0.3, 0.0, 0.1);
    }

    /// Two rising notes
    fn play_score(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [880.0, 1320.0].iter().enumerate() {
            self.blip(
                ctx,
                *freq,
                OscillatorType::Sine,
                vol * 0.25,
                i as f64 * 0.07,
                0.12,
            );
        }
    }

    /// Bright arpeggio
    fn play_achievement(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [523.0, 659.0, 784.0, 1047.0].iter().enumerate() {
            self.blip(
                ctx,
                *freq,
                OscillatorType::Triangle,
                vol * 0.25,
                i as f64 * 0.08,
                0.25,
            );
        }
    }

    /// Sad descending
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
            self.blip(
                ctx,
                *freq,
                OscillatorType::Sine,
                vol * 0.3,
                i as f64 * 0.2,
                0.3,
            );
        }
    }

    /// Upward swoosh
    fn play_keep(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 400.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.18)
            .ok();
        osc.frequency().set_value_at_time(400.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(900.0, t + 0.15)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.2).ok();
    }

    /// Downward swoosh
    fn play_discard(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 700.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.18)
            .ok();
        osc.frequency().set_value_at_time(700.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(250.0, t + 0.15)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.2).ok();
    }

    /// Dissonant double buzz
    fn play_wrong(&self, ctx: &AudioContext, vol: f32) {
        self.blip(ctx, 150.0, OscillatorType::Square, vol * 0.2, 0.0, 0.12);
        self.blip(ctx, 142.0, OscillatorType::Square, vol * 0.2, 0.14, 0.12);
    }

    /// Three equal beeps then a long tone
    fn play_time_up(&self, ctx: &AudioContext, vol: f32) {
        for i in 0..3 {
            self.blip(
                ctx,
                880.0,
                OscillatorType::Square,
                vol * 0.15,
                i as f64 * 0.15,
                0.08,
            );
        }
        self.blip(ctx, 1320.0, OscillatorType::Square, vol * 0.15, 0.45, 0.4);
    }
}
