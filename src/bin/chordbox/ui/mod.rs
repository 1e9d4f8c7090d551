//! TUI module for chordbox
//!
//! Runs the input-processing side: the simulated keypad is polled on the
//! controller's period and the resulting packets go to the audio callback.
//! The audio callback only talks back through ring buffers.

mod chord;
mod keymap;
mod packets;
pub mod state;
mod voices;
mod waveform;

use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;

use chordbox::{
    engine::{Controller, EngineStats},
    io::UsbMidiPacket,
    surface::{InputEvent, InputId, KeyboardSnapshot},
};

use chord::render_chord;
use packets::render_packets;
use state::VoiceSnapshot;
use voices::render_voices;
use waveform::render_waveform;

/// Audio visualization buffer size
pub const VIS_BUFFER_SIZE: usize = 1024;
/// Packets kept for the MIDI panel
const PACKET_HISTORY: usize = 64;

pub struct UiApp {
    controller: Controller,
    /// Latched keypad state
    pad: KeyboardSnapshot,
    started: Instant,
    last_poll: Option<Instant>,
    scope_rx: Consumer<f32>,
    voice_rx: Consumer<VoiceSnapshot>,
    voices: VoiceSnapshot,
    audio_buffer: Vec<f32>,
    packets: VecDeque<UsbMidiPacket>,
    sample_rate: u32,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        controller: Controller,
        scope_rx: Consumer<f32>,
        voice_rx: Consumer<VoiceSnapshot>,
        sample_rate: u32,
    ) -> Self {
        Self {
            controller,
            pad: KeyboardSnapshot::new(),
            started: Instant::now(),
            last_poll: None,
            scope_rx,
            voice_rx,
            voices: VoiceSnapshot::default(),
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            packets: VecDeque::with_capacity(PACKET_HISTORY),
            sample_rate,
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_controller();
            self.poll_audio();
            self.poll_voices();

            terminal.draw(|frame| self.render(frame))?;

            // Wait for input at most until the next controller cycle
            let timeout = self
                .controller
                .poll_period()
                .min(Duration::from_millis(16));
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        Ok(())
    }

    /// One controller cycle per poll period. A late cycle just runs late.
    fn poll_controller(&mut self) {
        let due = self
            .last_poll
            .map_or(true, |last| last.elapsed() >= self.controller.poll_period());
        if !due {
            return;
        }
        self.last_poll = Some(Instant::now());

        for &packet in self.controller.poll(&self.pad) {
            if self.packets.len() == PACKET_HISTORY {
                self.packets.pop_front();
            }
            self.packets.push_back(packet);
        }
    }

    /// Keep the last VIS_BUFFER_SIZE samples
    fn poll_audio(&mut self) {
        let mut new_samples = Vec::new();
        while let Ok(sample) = self.scope_rx.pop() {
            new_samples.push(sample);
        }

        if !new_samples.is_empty() {
            self.audio_buffer.extend(new_samples);
            if self.audio_buffer.len() > VIS_BUFFER_SIZE {
                let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
                self.audio_buffer.drain(0..excess);
            }
        }
    }

    fn poll_voices(&mut self) {
        while let Ok(snapshot) = self.voice_rx.pop() {
            report_stats(&self.voices.stats, &snapshot.stats);
            self.voices = snapshot;
        }
    }

    fn now(&self) -> u64 {
        self.started.elapsed().as_micros() as u64
    }

    fn handle_key(&mut self, code: KeyCode) {
        let input = |input| InputEvent::Press { input };
        let turn = |direction| InputEvent::Rotate {
            input: InputId::VoicingEncoder,
            direction,
        };

        match code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') => self.pad.release_all(),
            KeyCode::Up | KeyCode::Right => {
                self.controller.handle_input(turn(1));
            }
            KeyCode::Down | KeyCode::Left => {
                self.controller.handle_input(turn(-1));
            }
            KeyCode::Enter => {
                self.controller.handle_input(input(InputId::VoicingButton));
            }
            KeyCode::Char('b') | KeyCode::Char('B') => {
                self.controller.handle_input(input(InputId::BassButton));
            }
            KeyCode::Char(c) => {
                if let Some(key) = keymap::key_for(c) {
                    let now = self.now();
                    self.pad.toggle(key, now);
                }
            }
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(7), // Chord
                Constraint::Min(8),    // Voices + packets
                Constraint::Length(8), // Oscilloscope
                Constraint::Length(2), // Help
            ])
            .split(frame.area());

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[1]);

        render_chord(frame, rows[0], &self.controller);
        render_voices(frame, middle[0], &self.voices);
        render_packets(frame, middle[1], &self.packets);
        render_waveform(frame, rows[2], &self.audio_buffer, self.sample_rate);

        let help = Paragraph::new(format!(
            " [a..j] chord keys  {}  [z..] instrument\n \
             [←→↑↓] voicing  [Enter] chord/bass  [B] bass on/off  [Space] release  [Esc] quit  {:.1}kHz",
            keymap::modifier_help(),
            self.sample_rate as f32 / 1000.0,
        ))
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, rows[3]);
    }
}

/// Log what the audio callback counted since the last snapshot.
fn report_stats(old: &EngineStats, new: &EngineStats) {
    let delta = |old: u64, new: u64| new.saturating_sub(old);

    let stolen = delta(old.stolen_voices, new.stolen_voices);
    if stolen > 0 {
        log::debug!("voice pool saturated, stole {stolen} held voice(s)");
    }
    let dropped = delta(old.dropped_notes, new.dropped_notes);
    if dropped > 0 {
        log::debug!("empty voice pool, dropped {dropped} note(s)");
    }
    let programs = delta(old.rejected_programs, new.rejected_programs);
    if programs > 0 {
        log::warn!("ignored {programs} program change(s) for unknown instruments");
    }
    let packets = delta(old.rejected_packets, new.rejected_packets);
    if packets > 0 {
        log::warn!("skipped {packets} unsupported packet(s)");
    }
}
