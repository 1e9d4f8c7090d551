use std::time::Duration;

use log::trace;

use crate::{
    chord::{
        diff::{diff, NoteDiff, NoteList},
        model::Chord,
        voicing::resolve,
    },
    config::ControllerConfig,
    engine::queue::EventSender,
    error::Error,
    io::midi::{MidiEvent, UsbMidiPacket},
    surface::{
        controls::{ControlAction, ControlRegistry, InputEvent, VoicingControl},
        keypad::{self, KeyboardSnapshot},
    },
    MAX_NOTES,
};

/// Worst case for one cycle: every old note off, every new note on, one program change.
pub const OUTGOING_CAPACITY: usize = 2 * MAX_NOTES + 1;

pub type PacketList = heapless::Vec<UsbMidiPacket, OUTGOING_CAPACITY>;

/// Highest MIDI program number. Switch banks above it all select this program.
pub const PROGRAM_MAX: u8 = 0x7F;

/// The input-processing context.
///
/// Turns keypad snapshots into note events. Owns the chord, the voicing and
/// the note lists of the previous cycle; the audio side only ever sees the
/// packets pushed into the queue.
pub struct Controller {
    chord: Chord,
    control: VoicingControl,
    registry: ControlRegistry,
    instrument: Option<u8>,
    previous: NoteList,
    last_diff: NoteDiff,
    outgoing: PacketList,
    cable: u8,
    poll_period: Duration,
    tx: EventSender,
}

impl Controller {
    pub fn new(config: &ControllerConfig, tx: EventSender) -> Result<Self, Error> {
        config.validate()?;

        Ok(Self {
            chord: Chord::new(),
            control: VoicingControl::new(config.voicing, config.voicing_bass, config.encoder_step),
            registry: ControlRegistry::standard(),
            instrument: None,
            previous: NoteList::new(),
            last_diff: NoteDiff::default(),
            outgoing: PacketList::new(),
            cable: config.cable,
            poll_period: config.poll_period,
            tx,
        })
    }

    /// Replace the input bindings.
    pub fn with_registry(mut self, registry: ControlRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Feed one encoder or button event. Takes effect on the next poll.
    pub fn handle_input(&mut self, event: InputEvent) -> Option<ControlAction> {
        self.registry.dispatch(&event, &mut self.control)
    }

    /// Run one input cycle against `snapshot` and return the packets it produced.
    pub fn poll(&mut self, snapshot: &KeyboardSnapshot) -> &[UsbMidiPacket] {
        self.outgoing.clear();

        let instrument = keypad::parse(snapshot, &mut self.chord).min(PROGRAM_MAX);
        if self.instrument != Some(instrument) {
            self.instrument = Some(instrument);
            self.emit(MidiEvent::program_change(instrument));
            // the program change silences every voice, so nothing is held any more
            self.previous.clear();
        }

        let mut chord = self.chord;
        if !self.control.bass_enabled() {
            chord.reset_bass();
        }
        let anchors = self.control.anchors();
        let current = resolve(&chord, anchors.chord, anchors.bass);

        let changes = diff(&current, &self.previous);
        for &note in &changes.to_deactivate {
            self.emit(MidiEvent::note_off(note));
        }
        for &note in &changes.to_activate {
            self.emit(MidiEvent::note_on(note));
        }

        self.previous = current;
        self.last_diff = changes;
        &self.outgoing
    }

    /// Packets produced by the last cycle, for the transport to send.
    pub fn outgoing(&self) -> &[UsbMidiPacket] {
        &self.outgoing
    }

    /// Swallow packets received from the transport. Returns how many there were.
    pub fn drain_incoming<I>(&mut self, packets: I) -> usize
    where
        I: IntoIterator<Item = UsbMidiPacket>,
    {
        packets
            .into_iter()
            .inspect(|packet| trace!("ignoring inbound {packet:?}"))
            .count()
    }

    fn emit(&mut self, event: MidiEvent) {
        let packet = event.to_packet(self.cable);
        // capacity covers a full cycle
        let _ = self.outgoing.push(packet);
        // a full queue is already reported by the sender
        let _ = self.tx.send(packet);
    }

    pub fn chord(&self) -> &Chord {
        &self.chord
    }

    pub fn control(&self) -> &VoicingControl {
        &self.control
    }

    /// Notes sounding after the last cycle.
    pub fn notes(&self) -> &NoteList {
        &self.previous
    }

    pub fn last_diff(&self) -> &NoteDiff {
        &self.last_diff
    }

    /// Program last sent, saturated at [`PROGRAM_MAX`].
    pub fn instrument(&self) -> Option<u8> {
        self.instrument
    }

    pub fn poll_period(&self) -> Duration {
        self.poll_period
    }
}
