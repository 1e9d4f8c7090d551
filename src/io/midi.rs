/*
USB-MIDI Event Packets
======================

Every MIDI message crossing the USB transport (and the cross-context queue) is
a fixed 4-byte event packet:

    byte 0   (cable << 4) | code index number (CIN)
    byte 1   status | channel
    byte 2   data 1  (note / program)
    byte 3   data 2  (velocity / unused)

    message          CIN    status
    note-off         0x8    0x80
    note-on          0x9    0x90
    program change   0xC    0xC0

The packet travels as a `u32` whose little-endian bytes are the wire bytes, so
`packet.to_bytes()` is exactly what the transport writes.
*/

use crate::error::Error;

pub const CIN_NOTE_OFF: u8 = 0x8;
pub const CIN_NOTE_ON: u8 = 0x9;
pub const CIN_PROGRAM_CHANGE: u8 = 0xC;

pub const STATUS_NOTE_OFF: u8 = 0x80;
pub const STATUS_NOTE_ON: u8 = 0x90;
pub const STATUS_PROGRAM_CHANGE: u8 = 0xC0;

/// Velocity used for every note-on the controller emits.
pub const NOTE_ON_VELOCITY: u8 = 127;
/// Velocity used for every note-off the controller emits.
pub const NOTE_OFF_VELOCITY: u8 = 0;
/// MIDI channel 1.
pub const DEFAULT_CHANNEL: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ProgramChange { channel: u8, program: u8 },
}

impl MidiEvent {
    pub fn note_on(key: u8) -> Self {
        MidiEvent::NoteOn {
            channel: DEFAULT_CHANNEL,
            key,
            velocity: NOTE_ON_VELOCITY,
        }
    }

    pub fn note_off(key: u8) -> Self {
        MidiEvent::NoteOff {
            channel: DEFAULT_CHANNEL,
            key,
            velocity: NOTE_OFF_VELOCITY,
        }
    }

    pub fn program_change(program: u8) -> Self {
        MidiEvent::ProgramChange {
            channel: DEFAULT_CHANNEL,
            program,
        }
    }

    /// Pack into a USB-MIDI event packet on `cable`.
    pub fn to_packet(self, cable: u8) -> UsbMidiPacket {
        let (cin, status, data1, data2) = match self {
            MidiEvent::NoteOn {
                channel,
                key,
                velocity,
            } => (CIN_NOTE_ON, STATUS_NOTE_ON | channel, key, velocity),
            MidiEvent::NoteOff {
                channel,
                key,
                velocity,
            } => (CIN_NOTE_OFF, STATUS_NOTE_OFF | channel, key, velocity),
            MidiEvent::ProgramChange { channel, program } => {
                (CIN_PROGRAM_CHANGE, STATUS_PROGRAM_CHANGE | channel, program, 0)
            }
        };

        UsbMidiPacket::from_bytes([
            ((cable & 0x0F) << 4) | cin,
            status,
            data1 & 0x7F,
            data2 & 0x7F,
        ])
    }
}

/// A 4-byte USB-MIDI event packet carried as one 32-bit word.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct UsbMidiPacket(u32);

impl UsbMidiPacket {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_le_bytes(bytes))
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Wire order: header, status, data 1, data 2.
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    pub const fn cable(self) -> u8 {
        self.to_bytes()[0] >> 4
    }

    pub const fn code_index(self) -> u8 {
        self.to_bytes()[0] & 0x0F
    }

    /// Decode the MIDI message carried by this packet.
    pub fn decode(self) -> Result<MidiEvent, Error> {
        let [header, status, data1, data2] = self.to_bytes();
        let channel = status & 0x0F;

        match (header & 0x0F, status & 0xF0) {
            (CIN_NOTE_ON, STATUS_NOTE_ON) => Ok(MidiEvent::NoteOn {
                channel,
                key: data1 & 0x7F,
                velocity: data2 & 0x7F,
            }),
            (CIN_NOTE_OFF, STATUS_NOTE_OFF) => Ok(MidiEvent::NoteOff {
                channel,
                key: data1 & 0x7F,
                velocity: data2 & 0x7F,
            }),
            (CIN_PROGRAM_CHANGE, STATUS_PROGRAM_CHANGE) => Ok(MidiEvent::ProgramChange {
                channel,
                program: data1 & 0x7F,
            }),
            _ => Err(Error::UnsupportedPacket(self.0)),
        }
    }
}

impl std::fmt::Debug for UsbMidiPacket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [b0, b1, b2, b3] = self.to_bytes();
        write!(f, "UsbMidiPacket[{b0:02X} {b1:02X} {b2:02X} {b3:02X}]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_on_wire_bytes() {
        let packet = MidiEvent::note_on(60).to_packet(0);
        assert_eq!(packet.to_bytes(), [0x09, 0x90, 60, 127]);
    }

    #[test]
    fn note_off_wire_bytes() {
        let packet = MidiEvent::note_off(38).to_packet(0);
        assert_eq!(packet.to_bytes(), [0x08, 0x80, 38, 0]);
    }

    #[test]
    fn program_change_on_cable_two() {
        let packet = MidiEvent::program_change(6).to_packet(2);
        assert_eq!(packet.to_bytes(), [0x2C, 0xC0, 6, 0]);
        assert_eq!(packet.cable(), 2);
        assert_eq!(packet.code_index(), CIN_PROGRAM_CHANGE);
    }

    #[test]
    fn decode_recovers_the_event() {
        let event = MidiEvent::note_on(72);
        assert_eq!(event.to_packet(0).decode(), Ok(event));
    }

    #[test]
    fn decode_rejects_unknown_messages() {
        // control change, CIN 0xB
        let packet = UsbMidiPacket::from_bytes([0x0B, 0xB0, 7, 100]);
        assert_eq!(packet.decode(), Err(Error::UnsupportedPacket(packet.raw())));

        // CIN and status disagree
        let packet = UsbMidiPacket::from_bytes([0x09, 0x80, 60, 0]);
        assert!(packet.decode().is_err());
    }
}
