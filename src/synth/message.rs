/// Control messages applied to the voice pool by the audio context.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SynthMessage {
    NoteOn { note: u8 },
    NoteOff { note: u8 },
    ProgramChange { program: u8 },
    AllNotesOff,
}
