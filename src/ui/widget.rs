use chrono::{DateTime, Local};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::error::Error;
use std::io::{self, Write};
use std::time::Duration;
use tokio::sync::mpsc;

use super::core::{
    apply_tick,
    history::PriceHistory,
    prefs::{self, PreferenceState},
    DisplayController, WidgetEvent,
};

type DynError = Box<dyn Error + Send + Sync>;

/// What is currently on screen. This is the concrete [`DisplayController`]:
/// the tick pipeline writes here, the render pass reads it back.
#[derive(Debug, Clone)]
pub struct WidgetScreen {
    text: String,
    font_black: bool,
    bell_pending: bool,
    last_update: Option<DateTime<Local>>,
}

impl WidgetScreen {
    fn new() -> Self {
        Self {
            text: "Fetching Price...".to_string(),
            font_black: false,
            bell_pending: false,
            last_update: None,
        }
    }

    /// Consumes the pending bell so it rings once per request.
    fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell_pending)
    }
}

impl DisplayController for WidgetScreen {
    fn set_text(&mut self, text: String) {
        self.text = text;
        self.last_update = Some(Local::now());
    }

    fn set_text_color(&mut self, black: bool) {
        self.font_black = black;
    }

    fn play_beep(&mut self) {
        self.bell_pending = true;
    }

    fn show_error(&mut self, message: String) {
        self.text = message;
        self.last_update = Some(Local::now());
    }
}

/// The terminal price widget: owns the screen state, the rolling history and
/// the user preferences, and is the single consumer of the event channel.
pub struct PriceWidget {
    screen: WidgetScreen,
    history: PriceHistory,
    prefs: PreferenceState,
    events_tx: mpsc::Sender<WidgetEvent>,
    running: bool,
}

impl PriceWidget {
    pub fn new(events_tx: mpsc::Sender<WidgetEvent>) -> Self {
        Self {
            screen: WidgetScreen::new(),
            history: PriceHistory::new(),
            prefs: PreferenceState::default(),
            events_tx,
            running: true,
        }
    }

    pub async fn run(&mut self, mut receiver: mpsc::Receiver<WidgetEvent>) -> Result<(), DynError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        while self.running {
            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key_input(key);
                }
            }

            while let Ok(event) = receiver.try_recv() {
                match event {
                    WidgetEvent::Tick(outcome) => {
                        apply_tick(outcome, &mut self.history, &self.prefs, &mut self.screen)
                    }
                    WidgetEvent::DndExpired => self.prefs.disable_do_not_disturb(),
                }
            }

            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Min(5),
                        Constraint::Length(3),
                    ])
                    .split(f.size());

                self.render_header(f, chunks[0]);
                self.render_price(f, chunks[1]);
                self.render_footer(f, chunks[2]);
            })?;

            if self.screen.take_bell() {
                ring_bell()?;
            }
        }

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        Ok(())
    }

    fn handle_key_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('f') => {
                self.prefs.toggle_font_color();
                let black = self.prefs.font_black;
                self.screen.set_text_color(black);
            }
            KeyCode::Char('s') => {
                self.prefs.toggle_sound();
                // Confirmation beep, whatever the new value.
                self.screen.play_beep();
            }
            KeyCode::Char('d') => {
                self.prefs.enable_do_not_disturb();
                let _ = prefs::schedule_dnd_expiry(self.events_tx.clone());
            }
            _ => (),
        }
    }

    fn render_header(&self, f: &mut Frame<CrosstermBackend<io::Stdout>>, area: Rect) {
        let mut title = vec![Span::styled(
            "PIWATCH ",
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        )];
        if self.prefs.do_not_disturb {
            title.push(Span::styled(
                "DO NOT DISTURB",
                Style::default().fg(Color::Yellow),
            ));
        }

        let last_update = match self.screen.last_update {
            Some(ts) => ts.format("%H:%M:%S").to_string(),
            None => "--:--:--".to_string(),
        };

        let header = Paragraph::new(Text::from(vec![
            Line::from(title),
            Line::from(Span::styled(
                format!(
                    "Last update: {} | Window: {}/60 samples",
                    last_update,
                    self.history.len()
                ),
                Style::default().fg(Color::Gray),
            )),
        ]))
        .block(Block::default().borders(Borders::BOTTOM));

        f.render_widget(header, area);
    }

    fn render_price(&self, f: &mut Frame<CrosstermBackend<io::Stdout>>, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Pi Network (USD)");
        let inner_area = block.inner(area);
        f.render_widget(block, area);

        if inner_area.height < 1 {
            return;
        }

        let color = if self.screen.font_black {
            Color::Black
        } else {
            Color::White
        };

        // Push the price line toward the vertical middle of the panel.
        let padding = inner_area.height.saturating_sub(1) / 2;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(padding), Constraint::Min(1)])
            .split(inner_area);

        let price = Paragraph::new(Span::styled(
            self.screen.text.clone(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center);

        f.render_widget(price, chunks[1]);
    }

    fn render_footer(&self, f: &mut Frame<CrosstermBackend<io::Stdout>>, area: Rect) {
        let sound = if self.prefs.sound_enabled {
            Span::styled("[s] sound: on", Style::default().fg(Color::Green))
        } else {
            // Stand-in for the original menu's sound-off marker.
            Span::styled("[s] sound: off", Style::default().fg(Color::Yellow))
        };

        let footer = Paragraph::new(Line::from(vec![
            Span::raw("[f] black/white font  "),
            sound,
            Span::raw("  [d] do not disturb (1 hour)  [q] quit"),
        ]))
        .block(Block::default().borders(Borders::TOP));

        f.render_widget(footer, area);
    }
}

/// Terminal bell, the widget's only sound output.
fn ring_bell() -> Result<(), DynError> {
    let mut stdout = io::stdout();
    stdout.write_all(b"\x07")?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_widget() -> (PriceWidget, mpsc::Receiver<WidgetEvent>) {
        let (tx, rx) = mpsc::channel(16);
        (PriceWidget::new(tx), rx)
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::from(KeyCode::Char(c))
    }

    #[test]
    fn font_key_flips_screen_color() {
        let (mut widget, _rx) = test_widget();
        assert!(!widget.screen.font_black);
        widget.handle_key_input(key('f'));
        assert!(widget.prefs.font_black);
        assert!(widget.screen.font_black);
        widget.handle_key_input(key('f'));
        assert!(!widget.screen.font_black);
    }

    #[test]
    fn sound_key_beeps_both_ways() {
        let (mut widget, _rx) = test_widget();
        widget.handle_key_input(key('s'));
        assert!(!widget.prefs.sound_enabled);
        assert!(widget.screen.take_bell());
        widget.handle_key_input(key('s'));
        assert!(widget.prefs.sound_enabled);
        assert!(widget.screen.take_bell());
    }

    #[tokio::test]
    async fn dnd_key_sets_flag_and_schedules_expiry() {
        let (mut widget, _rx) = test_widget();
        widget.handle_key_input(key('d'));
        assert!(widget.prefs.do_not_disturb);
    }

    #[test]
    fn quit_keys_stop_the_loop() {
        let (mut widget, _rx) = test_widget();
        widget.handle_key_input(key('q'));
        assert!(!widget.running);

        let (mut widget, _rx) = test_widget();
        widget.handle_key_input(KeyEvent::from(KeyCode::Esc));
        assert!(!widget.running);
    }

    #[test]
    fn bell_rings_once_per_request() {
        let mut screen = WidgetScreen::new();
        screen.play_beep();
        assert!(screen.take_bell());
        assert!(!screen.take_bell());
    }
}
