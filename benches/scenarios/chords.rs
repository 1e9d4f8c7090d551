//! Benchmarks for one controller cycle: keypad parse, voicing, diff, encode.

use std::hint::black_box;

use chordbox::{
    engine::{event_queue, Controller},
    surface::{Key, KeyboardSnapshot, Modifier},
    ControllerConfig,
};
use criterion::Criterion;

pub fn bench_chords(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/chords");

    // Nothing changes: the common case between key presses
    {
        let (tx, mut rx) = event_queue(1024);
        let Ok(mut controller) = Controller::new(&ControllerConfig::default(), tx) else {
            return;
        };
        let mut pad = KeyboardSnapshot::new();
        pad.press(Key::Chromatic(2), 1);
        pad.press(Key::Modifier(Modifier::Add9), 1);
        controller.poll(&pad);

        group.bench_function("idle_cycle", |b| {
            b.iter(|| {
                let sent = controller.poll(black_box(&pad)).len();
                while rx.recv().is_some() {}
                sent
            })
        });
    }

    // Alternate between two chords every cycle
    {
        let (tx, mut rx) = event_queue(1024);
        let Ok(mut controller) = Controller::new(&ControllerConfig::default(), tx) else {
            return;
        };
        let mut a = KeyboardSnapshot::new();
        a.press(Key::Chromatic(0), 1);
        a.press(Key::Modifier(Modifier::Maj7), 1);
        let mut b_pad = KeyboardSnapshot::new();
        b_pad.press(Key::Chromatic(9), 2);
        b_pad.press(Key::Modifier(Modifier::Add11), 2);

        let mut flip = false;
        group.bench_function("chord_change", |b| {
            b.iter(|| {
                flip = !flip;
                let pad = if flip { &a } else { &b_pad };
                let sent = controller.poll(black_box(pad)).len();
                while rx.recv().is_some() {}
                sent
            })
        });
    }

    group.finish();
}
