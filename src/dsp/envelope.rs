use crate::synth::instrument::Instrument;

/*
Fixed-Point ADSR Envelope
=========================

Per-voice amplitude envelope advanced once per output sample. Everything is
integer arithmetic so the audio context never touches floating point.

Vocabulary
----------

  value         The envelope's current level, unsigned 24-bit (0 ..= 0xFFFFFF)
                held in an i32. The mixer uses the top 16 bits.

  stage         Attack, Decay, Sustain, Release or Off.

  frames        Samples spent in the current stage.

  frames_target Length of the current stage in samples:
                    stage_ms * sample_rate / 1000

  step          Per-sample change of `value`, fixed when the stage is entered:
                    (stage_target - value) / frames_target


The Shape
---------

  value
  0xFFFFFF ┐     ╱╲
           │    ╱  ╲__________
  sustain  │   ╱              ╲
           │  ╱                ╲
         0 └─╱──────────────────╲──→ samples
            Attack Decay Sustain Release

Unlike a gate-driven envelope, sustain is timed: after `sustain_ms` the
release starts on its own, so a held chord eventually fades out.


The State Machine
-----------------

    Off ──note_on──→ Attack ──→ Decay ──→ Sustain ──→ Release ──→ Off
                        ↑                                │
                        └──────── note_on (retrigger) ───┘
    any stage ──note_off──→ Release
    any stage ──off──────→ Off

Each tick first checks `frames >= frames_target` and moves to the next stage
if so, THEN applies `value += step` and counts the frame. A zero-length stage
therefore lasts exactly one tick: an attack of 0 ms jumps to full scale when
triggered and starts decaying on the very first sample.

Integer division leaves a small remainder in `step`; the last frame of each
stage lands exactly on the stage target, so release always ends at 0.


Retrigger
---------

Re-pressing a note that is still sounding must not restart from zero (that is
an audible click). The attack ramp is replayed forward from zero until it
reaches the current value, and the envelope continues from that frame:

    frames = ceil(value / step)
*/

/// Full-scale envelope value.
pub const ENVELOPE_MAX: i32 = 0x00FF_FFFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Attack,
    Decay,
    Sustain,
    Release,
    Off,
}

/// Timing and level parameters for one envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdsrParams {
    pub attack_ms: u16,
    pub decay_ms: u16,
    /// 16-bit full scale.
    pub sustain_level: u16,
    pub sustain_ms: u16,
    pub release_ms: u16,
}

impl From<&Instrument> for AdsrParams {
    fn from(instrument: &Instrument) -> Self {
        Self {
            attack_ms: instrument.attack_ms,
            decay_ms: instrument.decay_ms,
            sustain_level: instrument.sustain_level,
            sustain_ms: instrument.sustain_ms,
            release_ms: instrument.release_ms,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Envelope {
    params: AdsrParams,
    sample_rate: u32,

    stage: EnvelopeState,
    value: i32,
    step: i32,
    stage_target: i32,
    frames: u32,
    frames_target: u32,
}

impl Envelope {
    pub fn new(params: AdsrParams, sample_rate: u32) -> Self {
        Self {
            params,
            sample_rate,
            stage: EnvelopeState::Off,
            value: 0,
            step: 0,
            stage_target: 0,
            frames: 0,
            frames_target: 0,
        }
    }

    /// Replace the timing parameters. The current stage keeps running with the
    /// step it was entered with; new values apply from the next stage on.
    pub fn set_params(&mut self, params: AdsrParams) {
        self.params = params;
    }

    pub fn params(&self) -> &AdsrParams {
        &self.params
    }

    fn frames_for(&self, ms: u16) -> u32 {
        (u64::from(ms) * u64::from(self.sample_rate) / 1000) as u32
    }

    fn enter(&mut self, stage: EnvelopeState, ms: u16, target: i32) {
        self.stage = stage;
        self.frames = 0;
        self.frames_target = self.frames_for(ms);
        self.stage_target = target;

        if self.frames_target == 0 {
            self.step = 0;
            self.value = target;
        } else {
            self.step = (target - self.value) / self.frames_target as i32;
        }
    }

    /// Start a note from silence.
    pub fn trigger_attack(&mut self) {
        self.value = 0;
        self.enter(EnvelopeState::Attack, self.params.attack_ms, ENVELOPE_MAX);
    }

    /// Restart the attack from the current value.
    pub fn retrigger_attack(&mut self) {
        let current = self.value;

        self.stage = EnvelopeState::Attack;
        self.stage_target = ENVELOPE_MAX;
        self.frames_target = self.frames_for(self.params.attack_ms);

        if self.frames_target == 0 {
            self.step = 0;
            self.frames = 0;
            self.value = ENVELOPE_MAX;
            return;
        }

        self.step = ENVELOPE_MAX / self.frames_target as i32;
        let frames = if self.step > 0 {
            ((current + self.step - 1) / self.step) as u32
        } else {
            0
        };
        self.frames = frames.min(self.frames_target);
        self.value = (self.frames as i32 * self.step).min(ENVELOPE_MAX);
    }

    fn trigger_decay(&mut self) {
        let sustain = i32::from(self.params.sustain_level) << 8;
        self.enter(EnvelopeState::Decay, self.params.decay_ms, sustain);
    }

    fn trigger_sustain(&mut self) {
        self.enter(EnvelopeState::Sustain, self.params.sustain_ms, self.value);
    }

    /// Fade out from the current value.
    pub fn trigger_release(&mut self) {
        self.enter(EnvelopeState::Release, self.params.release_ms, 0);
    }

    /// Silence immediately.
    pub fn off(&mut self) {
        self.stage = EnvelopeState::Off;
        self.value = 0;
        self.step = 0;
        self.stage_target = 0;
        self.frames = 0;
        self.frames_target = 0;
    }

    /// Advance by one sample.
    #[inline]
    pub fn tick(&mut self) {
        if self.stage == EnvelopeState::Off {
            return;
        }

        if self.frames >= self.frames_target {
            match self.stage {
                EnvelopeState::Attack => self.trigger_decay(),
                EnvelopeState::Decay => self.trigger_sustain(),
                EnvelopeState::Sustain => self.trigger_release(),
                EnvelopeState::Release => {
                    self.off();
                    return;
                }
                EnvelopeState::Off => {}
            }
        }

        self.value += self.step;
        self.frames += 1;
        if self.frames == self.frames_target {
            self.value = self.stage_target;
        }
        self.value = self.value.clamp(0, ENVELOPE_MAX);
    }

    pub fn state(&self) -> EnvelopeState {
        self.stage
    }

    /// Current value, 24-bit full scale.
    pub fn value(&self) -> i32 {
        self.value
    }

    /// Current value normalised to 0.0 ..= 1.0.
    pub fn level(&self) -> f32 {
        self.value as f32 / ENVELOPE_MAX as f32
    }

    pub fn step(&self) -> i32 {
        self.step
    }

    pub fn frames_in_phase(&self) -> u32 {
        self.frames
    }

    pub fn frames_target_in_phase(&self) -> u32 {
        self.frames_target
    }

    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeState::Off
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: u32 = 1_000;

    fn params(attack_ms: u16, decay_ms: u16, sustain_ms: u16, release_ms: u16) -> AdsrParams {
        AdsrParams {
            attack_ms,
            decay_ms,
            sustain_level: 0x8000,
            sustain_ms,
            release_ms,
        }
    }

    fn tick_n(env: &mut Envelope, n: usize) {
        for _ in 0..n {
            env.tick();
        }
    }

    #[test]
    fn starts_off() {
        let mut env = Envelope::new(params(10, 10, 10, 10), SAMPLE_RATE);
        assert_eq!(env.state(), EnvelopeState::Off);
        env.tick();
        assert_eq!(env.value(), 0);
    }

    #[test]
    fn zero_attack_decays_on_first_sample() {
        let mut env = Envelope::new(params(0, 50, 100, 50), SAMPLE_RATE);
        env.trigger_attack();
        assert_eq!(env.value(), ENVELOPE_MAX);

        env.tick();
        assert_eq!(env.state(), EnvelopeState::Decay);
        assert!(env.value() < ENVELOPE_MAX);
    }

    #[test]
    fn attack_reaches_full_scale() {
        let mut env = Envelope::new(params(10, 50, 100, 50), SAMPLE_RATE);
        env.trigger_attack();
        tick_n(&mut env, 10);

        assert_eq!(env.state(), EnvelopeState::Attack);
        assert_eq!(env.value(), ENVELOPE_MAX);

        env.tick();
        assert_eq!(env.state(), EnvelopeState::Decay);
    }

    #[test]
    fn decay_settles_on_sustain_level() {
        let mut env = Envelope::new(params(5, 20, 100, 50), SAMPLE_RATE);
        env.trigger_attack();
        tick_n(&mut env, 5 + 20 + 1);

        assert_eq!(env.state(), EnvelopeState::Sustain);
        assert_eq!(env.value(), 0x8000 << 8);

        tick_n(&mut env, 50);
        assert_eq!(env.value(), 0x8000 << 8);
    }

    #[test]
    fn timed_sustain_releases_to_off_in_exactly_release_frames() {
        let release_ms = 30;
        let mut env = Envelope::new(params(5, 5, 10, release_ms), SAMPLE_RATE);
        env.trigger_attack();

        let mut sample = 0;
        while env.state() != EnvelopeState::Release {
            env.tick();
            sample += 1;
        }
        let release_start = sample;

        while env.state() != EnvelopeState::Off {
            env.tick();
            sample += 1;
        }

        let expected = release_ms as usize * SAMPLE_RATE as usize / 1000;
        assert_eq!(sample - release_start, expected);
        assert_eq!(env.value(), 0);
    }

    #[test]
    fn note_off_release_ends_at_zero() {
        let mut env = Envelope::new(params(5, 5, 1000, 40), SAMPLE_RATE);
        env.trigger_attack();
        tick_n(&mut env, 20);

        env.trigger_release();
        // the first release sample is the next tick
        tick_n(&mut env, 40);
        assert_eq!(env.state(), EnvelopeState::Release);
        assert_eq!(env.value(), 0);

        env.tick();
        assert_eq!(env.state(), EnvelopeState::Off);
        assert_eq!(env.value(), 0);
    }

    #[test]
    fn retrigger_continues_from_current_value() {
        let mut env = Envelope::new(params(100, 10, 1000, 200), SAMPLE_RATE);
        env.trigger_attack();
        tick_n(&mut env, 150);
        env.trigger_release();
        tick_n(&mut env, 50);

        let before = env.value();
        assert!(before > 0);

        env.retrigger_attack();
        assert_eq!(env.state(), EnvelopeState::Attack);
        assert!(env.value() >= before);
        assert!(env.value() - before <= env.step());
        assert!(env.frames_in_phase() > 0);
        assert!(env.frames_in_phase() <= env.frames_target_in_phase());
    }

    #[test]
    fn off_is_immediate() {
        let mut env = Envelope::new(params(1, 1, 1000, 1000), SAMPLE_RATE);
        env.trigger_attack();
        tick_n(&mut env, 10);

        env.off();
        assert_eq!(env.state(), EnvelopeState::Off);
        assert_eq!(env.value(), 0);
        assert!(!env.is_active());
    }
}
