//! Chord panel - root, degrees, resolved notes, voicing anchors

use ratatui::{
    layout::Rect,
    style::{Color, Modifier as TextModifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use chordbox::{
    engine::Controller,
    surface::controls::VoicingTarget,
    synth::Instrument,
};

use super::state::{note_name, pitch_class_name};

const DEGREE_NAMES: [(u8, &str); 10] = [
    (0, "R"),
    (3, "m3"),
    (4, "M3"),
    (5, "4"),
    (6, "b5"),
    (7, "5"),
    (10, "m7"),
    (11, "M7"),
    (14, "9"),
    (17, "11"),
];

fn degree_name(offset: u8) -> &'static str {
    DEGREE_NAMES
        .iter()
        .find(|(o, _)| *o == offset)
        .map(|(_, name)| *name)
        .unwrap_or("?")
}

pub fn render_chord(frame: &mut Frame, area: Rect, controller: &Controller) {
    let block = Block::default().title(" Chord ").borders(Borders::ALL);

    let chord = controller.chord();
    let control = controller.control();

    let root = if chord.is_empty() {
        "no chord".to_string()
    } else {
        let bass = if control.bass_enabled() && chord.bass() != 0 {
            format!(" / {}", pitch_class_name(chord.bass()))
        } else {
            String::new()
        };
        format!("{}{}", pitch_class_name(chord.root()), bass)
    };

    let degrees = chord
        .offsets()
        .map(degree_name)
        .collect::<Vec<_>>()
        .join(" ");

    let notes = controller
        .notes()
        .iter()
        .map(|&n| note_name(n))
        .collect::<Vec<_>>()
        .join(" ");

    let instrument = controller
        .instrument()
        .map(|i| match Instrument::get(usize::from(i)) {
            Some(inst) => format!("{i}: {}", inst.name),
            None => format!("{i}: (none)"),
        })
        .unwrap_or_else(|| "-".to_string());

    let highlight = |selected: bool| {
        if selected {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::Cyan)
        }
    };
    let bass_anchor = if control.bass_enabled() {
        note_name(control.voicing_bass() as u8)
    } else {
        "off".to_string()
    };

    let lines = vec![
        Line::from(Span::styled(
            format!(" {root}"),
            Style::default().fg(Color::White).add_modifier(TextModifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(" degrees  ", Style::default().fg(Color::DarkGray)),
            Span::raw(degrees),
        ]),
        Line::from(vec![
            Span::styled(" notes    ", Style::default().fg(Color::DarkGray)),
            Span::raw(notes),
        ]),
        Line::from(vec![
            Span::styled(" voicing  ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!(" chord {} ", note_name(control.voicing() as u8)),
                highlight(control.target() == VoicingTarget::Chord),
            ),
            Span::raw(" "),
            Span::styled(
                format!(" bass {bass_anchor} "),
                highlight(control.target() == VoicingTarget::Bass),
            ),
        ]),
        Line::from(vec![
            Span::styled(" sound    ", Style::default().fg(Color::DarkGray)),
            Span::styled(instrument, Style::default().fg(Color::Green)),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
