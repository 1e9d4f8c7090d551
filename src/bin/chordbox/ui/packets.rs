//! Recently sent USB-MIDI packets

use std::collections::VecDeque;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use chordbox::io::{MidiEvent, UsbMidiPacket};

use super::state::note_name;

fn describe(packet: UsbMidiPacket) -> (String, Color) {
    match packet.decode() {
        Ok(MidiEvent::NoteOn { key, .. }) => (format!("on   {}", note_name(key)), Color::Green),
        Ok(MidiEvent::NoteOff { key, .. }) => (format!("off  {}", note_name(key)), Color::Red),
        Ok(MidiEvent::ProgramChange { program, .. }) => (format!("prog {program}"), Color::Yellow),
        Err(_) => ("?".to_string(), Color::DarkGray),
    }
}

pub fn render_packets(frame: &mut Frame, area: Rect, packets: &VecDeque<UsbMidiPacket>) {
    let block = Block::default().title(" MIDI out ").borders(Borders::ALL);

    let rows = area.height.saturating_sub(2) as usize;
    // newest first
    let lines: Vec<Line> = packets
        .iter()
        .rev()
        .take(rows)
        .map(|&packet| {
            let [b0, b1, b2, b3] = packet.to_bytes();
            let (text, color) = describe(packet);
            Line::from(vec![
                Span::styled(
                    format!(" {b0:02X} {b1:02X} {b2:02X} {b3:02X}  "),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(text, Style::default().fg(color)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
