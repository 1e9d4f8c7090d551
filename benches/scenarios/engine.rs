//! Benchmarks for the audio engine: drain the queue, then fill a buffer.

use std::hint::black_box;

use chordbox::{
    engine::{event_queue, AudioEngine},
    io::MidiEvent,
    EngineConfig,
};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

const CHORD: [u8; 5] = [38, 60, 62, 65, 69];

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");
    let config = EngineConfig::default();

    for &size in BLOCK_SIZES {
        let (mut tx, rx) = event_queue(config.queue_capacity);
        let Ok(mut engine) = AudioEngine::new(&config, rx) else {
            return;
        };
        let mut out = vec![0.0f32; size];

        // Steady chord: retriggered every buffer, so it never decays away
        group.bench_with_input(BenchmarkId::new("held_chord", size), &size, |b, _| {
            b.iter(|| {
                for &note in &CHORD {
                    let _ = tx.send(MidiEvent::note_on(note).to_packet(0));
                }
                engine.render_f32(black_box(&mut out));
            })
        });

        // Chord change every buffer: offs, ons and a full drain
        group.bench_with_input(BenchmarkId::new("chord_change", size), &size, |b, _| {
            let mut up = false;
            b.iter(|| {
                let shift = if up { 2 } else { 0 };
                for &note in &CHORD {
                    let _ = tx.send(MidiEvent::note_off(note + 2 - shift).to_packet(0));
                    let _ = tx.send(MidiEvent::note_on(note + shift).to_packet(0));
                }
                up = !up;
                engine.render_f32(black_box(&mut out));
            })
        });
    }

    group.finish();
}
