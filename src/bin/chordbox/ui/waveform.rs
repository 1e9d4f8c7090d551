//! Output scope
//!
//! Shows the last stretch of mixed output against a time axis in milliseconds,
//! with the peak level in dBFS. The trace turns red once the mix saturates.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// Peak at or above this counts as saturated (one i16 step below full scale).
const CLIP_LEVEL: f32 = 32_767.0 / 32_768.0;

fn dbfs(peak: f32) -> String {
    if peak <= 0.0 {
        "-inf dBFS".to_string()
    } else {
        format!("{:.1} dBFS", 20.0 * peak.log10())
    }
}

pub fn render_waveform(frame: &mut Frame, area: Rect, audio_buffer: &[f32], sample_rate: u32) {
    let peak = audio_buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
    let clipping = peak >= CLIP_LEVEL;
    let window_ms = audio_buffer.len() as f64 * 1000.0 / f64::from(sample_rate.max(1));

    let block = Block::default()
        .title(format!(" Output  {} ", dbfs(peak)))
        .borders(Borders::ALL);

    // One point per column is all a braille chart can show
    let columns = usize::from(area.width.max(1)) * 2;
    let step = audio_buffer.len().div_ceil(columns).max(1);
    let ms_per_sample = 1000.0 / f64::from(sample_rate.max(1));
    let data: Vec<(f64, f64)> = audio_buffer
        .chunks(step)
        .enumerate()
        .map(|(i, chunk)| {
            // keep the larger excursion of each chunk so short peaks survive
            let y = chunk
                .iter()
                .copied()
                .fold(0.0f32, |acc, s| if s.abs() > acc.abs() { s } else { acc });
            ((i * step) as f64 * ms_per_sample, f64::from(y))
        })
        .collect();

    let trace = if clipping { Color::Red } else { Color::Green };
    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(trace))
        .data(&data);

    let axis_style = Style::default().fg(Color::DarkGray);
    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, window_ms.max(1.0)])
                .labels(vec![
                    Span::raw("0"),
                    Span::raw(format!("{window_ms:.0} ms")),
                ])
                .style(axis_style),
        )
        .y_axis(
            Axis::default()
                .bounds([-1.0, 1.0])
                .labels(vec![Span::raw("-1"), Span::raw("0"), Span::raw("+1")])
                .style(axis_style),
        );

    frame.render_widget(chart, area);
}
