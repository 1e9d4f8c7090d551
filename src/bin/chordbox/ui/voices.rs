//! Voice panel - one row per voice with its envelope level

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use chordbox::dsp::EnvelopeState;

use super::state::{note_name, VoiceSnapshot};

fn state_color(state: EnvelopeState) -> Color {
    match state {
        EnvelopeState::Attack => Color::LightRed,
        EnvelopeState::Decay => Color::LightYellow,
        EnvelopeState::Sustain => Color::LightGreen,
        EnvelopeState::Release => Color::LightBlue,
        EnvelopeState::Off => Color::DarkGray,
    }
}

pub fn render_voices(frame: &mut Frame, area: Rect, snapshot: &VoiceSnapshot) {
    let block = Block::default()
        .title(format!(" Voices {}/{} ", snapshot.active(), snapshot.voices.len()))
        .borders(Borders::ALL);

    // label takes 18 columns, the bar gets the rest
    let bar_width = area.width.saturating_sub(2 + 18) as usize;

    let lines: Vec<Line> = snapshot
        .voices
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let color = state_color(v.state);
            if v.state == EnvelopeState::Off {
                return Line::from(Span::styled(
                    format!(" {:>2}  -", i + 1),
                    Style::default().fg(color),
                ));
            }

            let filled = (v.level.clamp(0.0, 1.0) * bar_width as f32).round() as usize;
            Line::from(vec![
                Span::raw(format!(" {:>2} {:<4} ", i + 1, note_name(v.note))),
                Span::styled(format!("{:<8}", format!("{:?}", v.state)), Style::default().fg(color)),
                Span::styled("█".repeat(filled), Style::default().fg(color)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
