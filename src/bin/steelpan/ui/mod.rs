//! TUI for steelpan
//!
//! Two keyboard rows play the twenty notes; the screen shows every voice
//! slot and an oscilloscope of the master output.

mod keymap;
mod voices;
mod waveform;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use std::time::Duration;
use steelpan::{
    io::{CpalDriver, StreamInfo},
    Engine, NoteId,
};

use voices::render_voices;
use waveform::render_waveform;

/// Audio visualization buffer size
const VIS_BUFFER_SIZE: usize = 1024;

pub struct UiApp {
    engine: Engine<CpalDriver>,
    info: StreamInfo,
    /// Post-limiter samples from the render thread
    scope_rx: Option<Consumer<f32>>,
    audio_buffer: Vec<f32>,
    last_note: Option<NoteId>,
    rejected: u32,
    should_quit: bool,
}

impl UiApp {
    pub fn new(mut engine: Engine<CpalDriver>, info: StreamInfo) -> Self {
        let scope_rx = engine.take_scope();
        Self {
            engine,
            info,
            scope_rx,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            last_note: None,
            rejected: 0,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.engine.drain_events();

            terminal.draw(|frame| self.render(frame))?;

            // Handle keyboard input (non-blocking, ~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        self.engine.stop();
        Ok(())
    }

    /// Keep the newest VIS_BUFFER_SIZE samples from the scope ring
    fn poll_audio(&mut self) {
        let Some(rx) = self.scope_rx.as_mut() else {
            return;
        };

        while let Ok(sample) = rx.pop() {
            self.audio_buffer.push(sample);
        }
        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(c) => {
                let Some(id) = keymap::note_for_key(c) else {
                    return;
                };
                match self.engine.note_on(id) {
                    Ok(_) => self.last_note = NoteId::new(id),
                    Err(_) => self.rejected += 1,
                }
            }
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),  // Status bar
                Constraint::Length(12), // Voice slots
                Constraint::Min(6),     // Waveform
                Constraint::Length(2),  // Key help
            ])
            .split(frame.area());

        self.render_status(frame, chunks[0]);
        render_voices(frame, chunks[1], &self.engine.voice_snapshots());
        render_waveform(frame, chunks[2], &self.audio_buffer);

        let help = Paragraph::new(vec![
            Line::from(format!(" {}", keymap::legend())),
            Line::from(" [Esc] Quit"),
        ])
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }

    fn render_status(&self, frame: &mut Frame, area: ratatui::layout::Rect) {
        let block = Block::default().title(" steelpan ").borders(Borders::ALL);
        let last = self.last_note.map_or("-", NoteId::name);

        let line = Line::from(vec![
            Span::styled(
                format!(" {:.1}kHz  ", self.info.sample_rate as f32 / 1000.0),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(
                format!("{}ch  ", self.info.channels),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(
                format!(
                    "Voices {}/{}  ",
                    self.engine.active_voices(),
                    steelpan::MAX_POLYPHONY
                ),
                Style::default().fg(Color::Green),
            ),
            Span::styled(format!("Last {last}  "), Style::default().fg(Color::White)),
            Span::styled(
                format!("Next gen {}  ", self.engine.pool().next_generation()),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                format!("Rejected {}", self.rejected),
                Style::default().fg(Color::Yellow),
            ),
        ]);

        frame.render_widget(Paragraph::new(line).block(block), area);
    }
}
