//! The audio callback must not format or write log records.
//!
//! Kept in its own test binary: the logger is process-wide.

use std::sync::atomic::{AtomicUsize, Ordering};

use chordbox::{
    engine::{event_queue, AudioEngine},
    io::{MidiEvent, UsbMidiPacket},
    EngineConfig,
};
use log::{LevelFilter, Log, Metadata, Record};

struct Counting;

static RECORDS: AtomicUsize = AtomicUsize::new(0);
static LOGGER: Counting = Counting;

impl Log for Counting {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, _: &Record) {
        RECORDS.fetch_add(1, Ordering::SeqCst);
    }

    fn flush(&self) {}
}

#[test]
fn rendering_never_logs() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Trace);

    let config = EngineConfig::default().with_voice_count(2);
    let (mut tx, rx) = event_queue(config.queue_capacity);
    let mut engine = AudioEngine::new(&config, rx).unwrap();

    // program change, a steal, an unknown program and a garbage packet
    tx.send(MidiEvent::program_change(3).to_packet(0)).unwrap();
    for note in [60, 62, 64] {
        tx.send(MidiEvent::note_on(note).to_packet(0)).unwrap();
    }
    tx.send(MidiEvent::program_change(120).to_packet(0)).unwrap();
    tx.send(UsbMidiPacket::from_raw(0xFFFF_FFFF)).unwrap();

    let before = RECORDS.load(Ordering::SeqCst);
    engine.render(&mut [0i16; 64]);
    engine.render_f32(&mut [0.0f32; 64]);
    assert_eq!(RECORDS.load(Ordering::SeqCst), before);

    let stats = engine.stats();
    assert_eq!(stats.stolen_voices, 1);
    assert_eq!(stats.rejected_programs, 1);
    assert_eq!(stats.rejected_packets, 1);
}
