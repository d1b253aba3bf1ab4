//! Voice slot table - note, generation and ring-out level per slot

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Row, Table},
    Frame,
};
use steelpan::synth::voice::VoiceSnapshot;

const METER_WIDTH: usize = 30;

pub fn render_voices(frame: &mut Frame, area: Rect, voices: &[VoiceSnapshot]) {
    let rows = voices.iter().enumerate().map(|(slot, v)| {
        let (note, level) = if v.playing {
            let note = v.note.map_or("?", |n| n.name());
            (note, meter(v.fundamental_amplitude))
        } else {
            ("-", String::new())
        };
        let style = if v.playing {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        Row::new(vec![
            format!("{slot}"),
            note.to_string(),
            format!("{}", v.generation),
            level,
        ])
        .style(style)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Length(6),
            Constraint::Length(8),
            Constraint::Min(10),
        ],
    )
    .header(Row::new(vec!["slot", "note", "gen", "level"]).style(Style::default().fg(Color::Cyan)))
    .block(Block::default().title(" Voices ").borders(Borders::ALL));

    frame.render_widget(table, area);
}

/// Bar on a -60..0 dB scale, matching the silence threshold.
fn meter(amplitude: f64) -> String {
    let db = 20.0 * amplitude.max(1e-6).log10();
    let fill = ((db + 60.0) / 60.0).clamp(0.0, 1.0);
    "█".repeat((fill * METER_WIDTH as f64).round() as usize)
}
