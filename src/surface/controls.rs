//! Encoder and button dispatch.
//!
//! Inputs are named by what they are on the panel, not by the pin they hang
//! off. A [`ControlRegistry`] built once at startup binds each of them to the
//! action it performs on the [`VoicingControl`].

use std::collections::HashMap;

use log::debug;

use crate::{chord::voicing::Voicing, config::VOICING_MAX};

/// Bass anchor value meaning "no bass note".
pub const BASS_DISABLED: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputId {
    VoicingEncoder,
    VoicingButton,
    BassButton,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlAction {
    /// Move the selected anchor by the encoder direction.
    AdjustVoicing,
    /// Switch the encoder between the chord and the bass anchor.
    ToggleVoicingTarget,
    /// Mute or restore the bass note.
    ToggleBass,
}

/// Already-decoded input from the encoder and button collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// One encoder detent, `direction` is +1 or -1.
    Rotate { input: InputId, direction: i8 },
    Press { input: InputId },
}

impl InputEvent {
    pub fn input(&self) -> InputId {
        match *self {
            InputEvent::Rotate { input, .. } | InputEvent::Press { input } => input,
        }
    }

    fn direction(&self) -> i32 {
        match *self {
            InputEvent::Rotate { direction, .. } => i32::from(direction.signum()),
            InputEvent::Press { .. } => 0,
        }
    }
}

/// Which anchor the encoder currently moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoicingTarget {
    #[default]
    Chord,
    Bass,
}

/// The two voicing anchors plus the encoder mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoicingControl {
    voicing: i32,
    voicing_bass: i32,
    // restored when the bass comes back on
    last_bass: i32,
    target: VoicingTarget,
    step: i32,
}

impl VoicingControl {
    pub fn new(voicing: i32, voicing_bass: i32, step: i32) -> Self {
        let voicing_bass = voicing_bass.clamp(BASS_DISABLED, VOICING_MAX);
        let last_bass = if voicing_bass == BASS_DISABLED {
            voicing.clamp(0, VOICING_MAX)
        } else {
            voicing_bass
        };

        Self {
            voicing: voicing.clamp(0, VOICING_MAX),
            voicing_bass,
            last_bass,
            target: VoicingTarget::Chord,
            step,
        }
    }

    /// Chord anchor, always within `0..=VOICING_MAX`.
    pub fn voicing(&self) -> i32 {
        self.voicing
    }

    /// Bass anchor, [`BASS_DISABLED`] when the bass is off.
    pub fn voicing_bass(&self) -> i32 {
        self.voicing_bass
    }

    pub fn bass_enabled(&self) -> bool {
        self.voicing_bass != BASS_DISABLED
    }

    pub fn target(&self) -> VoicingTarget {
        self.target
    }

    /// Anchors to resolve with. The bass anchor is only meaningful when enabled.
    pub fn anchors(&self) -> Voicing {
        Voicing::new(self.voicing, self.voicing_bass.max(0))
    }

    pub fn adjust(&mut self, direction: i32) {
        let delta = direction * self.step;
        match self.target {
            VoicingTarget::Chord => {
                self.voicing = (self.voicing + delta).clamp(0, VOICING_MAX);
            }
            VoicingTarget::Bass => {
                self.voicing_bass = (self.voicing_bass + delta).clamp(BASS_DISABLED, VOICING_MAX);
                if self.bass_enabled() {
                    self.last_bass = self.voicing_bass;
                }
            }
        }
    }

    pub fn toggle_target(&mut self) {
        self.target = match self.target {
            VoicingTarget::Chord => VoicingTarget::Bass,
            VoicingTarget::Bass => VoicingTarget::Chord,
        };
    }

    pub fn toggle_bass(&mut self) {
        if self.bass_enabled() {
            self.last_bass = self.voicing_bass;
            self.voicing_bass = BASS_DISABLED;
        } else {
            self.voicing_bass = self.last_bass;
        }
    }

    pub fn apply(&mut self, action: ControlAction, event: &InputEvent) {
        match action {
            ControlAction::AdjustVoicing => self.adjust(event.direction()),
            ControlAction::ToggleVoicingTarget => self.toggle_target(),
            ControlAction::ToggleBass => self.toggle_bass(),
        }
    }
}

/// Binding from logical input to action.
#[derive(Debug, Clone, Default)]
pub struct ControlRegistry {
    bindings: HashMap<InputId, ControlAction>,
}

impl ControlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encoder turns move the voicing, its push button switches anchors,
    /// the bass button mutes the bass.
    pub fn standard() -> Self {
        Self::new()
            .bind(InputId::VoicingEncoder, ControlAction::AdjustVoicing)
            .bind(InputId::VoicingButton, ControlAction::ToggleVoicingTarget)
            .bind(InputId::BassButton, ControlAction::ToggleBass)
    }

    pub fn bind(mut self, input: InputId, action: ControlAction) -> Self {
        self.bindings.insert(input, action);
        self
    }

    pub fn action(&self, input: InputId) -> Option<ControlAction> {
        self.bindings.get(&input).copied()
    }

    /// Run the action bound to the event's input. Unbound inputs are ignored.
    pub fn dispatch(&self, event: &InputEvent, control: &mut VoicingControl) -> Option<ControlAction> {
        let Some(action) = self.action(event.input()) else {
            debug!("no action bound to {:?}", event.input());
            return None;
        };
        control.apply(action, event);
        Some(action)
    }
}
