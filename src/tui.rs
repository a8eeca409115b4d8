#![cfg(feature = "tui")]

use crate::cli;
use crate::console::{BANNER, FOOTER};
use crate::driver::{Driver, FormValues, Surface};
use crate::guide::TravelGuide;
use anyhow::Context;
use chrono::{Days, NaiveDate};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use std::io;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Source,
    Destination,
    Date,
    Button,
}

impl Field {
    fn next(self) -> Self {
        match self {
            Field::Source => Field::Destination,
            Field::Destination => Field::Date,
            Field::Date => Field::Button,
            Field::Button => Field::Source,
        }
    }

    fn prev(self) -> Self {
        match self {
            Field::Source => Field::Button,
            Field::Destination => Field::Source,
            Field::Date => Field::Destination,
            Field::Button => Field::Date,
        }
    }
}

#[derive(Debug)]
struct Form {
    source: String,
    destination: String,
    date: NaiveDate,
    min_date: NaiveDate,
    focus: Field,
}

impl Form {
    fn new(today: NaiveDate) -> Self {
        Self {
            source: String::new(),
            destination: String::new(),
            date: today,
            min_date: today,
            focus: Field::Source,
        }
    }

    fn values(&self) -> FormValues {
        FormValues {
            source: self.source.clone(),
            destination: self.destination.clone(),
            date: self.date,
        }
    }

    fn later(&mut self) {
        if let Some(d) = self.date.checked_add_days(Days::new(1)) {
            self.date = d;
        }
    }

    fn earlier(&mut self) {
        // The picker never goes before the day the form was opened.
        if let Some(d) = self.date.checked_sub_days(Days::new(1)) {
            self.date = d.max(self.min_date);
        }
    }

    fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            Field::Source => Some(&mut self.source),
            Field::Destination => Some(&mut self.destination),
            Field::Date | Field::Button => None,
        }
    }
}

#[derive(Debug, Clone)]
enum UiMsg {
    Warning(String),
    Progress(String),
    Section { heading: String, body: String },
    Done,
}

/// Surface handed to the driver task; everything is forwarded to the UI loop.
struct ChannelSurface {
    tx: mpsc::UnboundedSender<UiMsg>,
}

impl Surface for ChannelSurface {
    fn warn(&mut self, message: &str) {
        let _ = self.tx.send(UiMsg::Warning(message.to_string()));
    }

    fn progress(&mut self, message: &str) {
        let _ = self.tx.send(UiMsg::Progress(message.to_string()));
    }

    fn show(&mut self, heading: &str, body: &str) {
        let _ = self.tx.send(UiMsg::Section {
            heading: heading.to_string(),
            body: body.to_string(),
        });
    }
}

#[derive(Debug, Default)]
struct Results {
    warning: Option<String>,
    progress: Option<String>,
    sections: Vec<(String, String)>,
    scroll: u16,
}

impl Results {
    /// Returns whether the run is still going.
    fn apply(&mut self, msg: UiMsg) -> bool {
        match msg {
            UiMsg::Warning(w) => {
                self.progress = None;
                self.warning = Some(w);
            }
            UiMsg::Progress(p) => self.progress = Some(p),
            UiMsg::Section { heading, body } => {
                self.progress = None;
                self.sections.push((heading, body));
            }
            UiMsg::Done => {
                self.progress = None;
                return false;
            }
        }
        true
    }
}

#[derive(Debug, PartialEq, Eq)]
enum KeyAction {
    None,
    Quit,
    Trigger,
}

fn handle_key(key: KeyEvent, form: &mut Form, results: &mut Results, busy: bool) -> KeyAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyAction::Quit;
    }

    match key.code {
        KeyCode::Esc => return KeyAction::Quit,
        KeyCode::PageDown => results.scroll = results.scroll.saturating_add(5),
        KeyCode::PageUp => results.scroll = results.scroll.saturating_sub(5),
        // The form is frozen until both answers are in.
        _ if busy => {}
        KeyCode::Tab | KeyCode::Down => form.focus = form.focus.next(),
        KeyCode::BackTab | KeyCode::Up => form.focus = form.focus.prev(),
        KeyCode::Enter => return KeyAction::Trigger,
        KeyCode::Char(' ') if form.focus == Field::Button => return KeyAction::Trigger,
        KeyCode::Char('+') | KeyCode::Right if form.focus == Field::Date => form.later(),
        KeyCode::Char('-') | KeyCode::Left if form.focus == Field::Date => form.earlier(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(text) = form.focused_text() {
                text.push(c);
            }
        }
        KeyCode::Backspace => {
            if let Some(text) = form.focused_text() {
                text.pop();
            }
        }
        _ => {}
    }

    KeyAction::None
}

pub async fn run_tui(guide: TravelGuide) -> anyhow::Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("enter alt screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let (ev_tx, mut ev_rx) = mpsc::unbounded_channel::<Event>();
    std::thread::spawn(move || {
        while let Ok(ev) = crossterm::event::read() {
            if ev_tx.send(ev).is_err() {
                break;
            }
        }
    });

    let (ui_tx, mut ui_rx) = mpsc::unbounded_channel::<UiMsg>();

    let mut form = Form::new(cli::today());
    let mut results = Results::default();
    let mut busy = false;

    let mut ticker = tokio::time::interval(std::time::Duration::from_millis(33));

    let res = loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = terminal.draw(|f| draw(f, &form, &results, busy)) {
                    break Err(anyhow::Error::new(e).context("draw frame"));
                }
            }
            Some(ev) = ev_rx.recv() => {
                if let Event::Key(key) = ev {
                    if key.kind == KeyEventKind::Press {
                        match handle_key(key, &mut form, &mut results, busy) {
                            KeyAction::Quit => break Ok(()),
                            KeyAction::Trigger => {
                                busy = true;
                                results = Results::default();
                                spawn_run(guide.clone(), form.values(), ui_tx.clone());
                            }
                            KeyAction::None => {}
                        }
                    }
                }
            }
            Some(msg) = ui_rx.recv() => {
                busy = results.apply(msg);
            }
        }
    };

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    res
}

/// Each trigger gets a fresh driver; nothing carries over between runs.
fn spawn_run(guide: TravelGuide, values: FormValues, tx: mpsc::UnboundedSender<UiMsg>) {
    tokio::spawn(async move {
        let mut surface = ChannelSurface { tx: tx.clone() };
        Driver::new(guide).trigger(&values, &mut surface).await;
        let _ = tx.send(UiMsg::Done);
    });
}

fn draw(f: &mut Frame, form: &Form, results: &Results, busy: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(2),
        ])
        .split(f.area());

    let header = Paragraph::new(Text::from(BANNER)).alignment(Alignment::Center);
    f.render_widget(header, chunks[0]);

    text_input(f, chunks[1], "📍 Enter Departure City", &form.source, "E.g., Hyderabad", form.focus == Field::Source);
    text_input(f, chunks[2], "🎯 Enter Destination", &form.destination, "E.g., Durgi", form.focus == Field::Destination);

    let date = Paragraph::new(Line::from(vec![
        Span::raw(form.date.format("%Y/%m/%d").to_string()),
        Span::styled("   (+/- to change)", Style::default().fg(Color::DarkGray)),
    ]))
    .block(field_block("📅 Pick Your Travel Date", form.focus == Field::Date));
    f.render_widget(date, chunks[3]);

    let label = if busy { "⏳ working..." } else { "[ 🌟 Find My Best Routes! 🛫 ]" };
    let mut style = Style::default().add_modifier(Modifier::BOLD);
    if form.focus == Field::Button {
        style = style.add_modifier(Modifier::REVERSED);
    }
    f.render_widget(Paragraph::new(Span::styled(label, style)).alignment(Alignment::Center), chunks[4]);

    let out = Paragraph::new(results_text(results))
        .block(Block::default().borders(Borders::ALL).title("results (PgUp/PgDn to scroll, Esc to quit)"))
        .wrap(Wrap { trim: false })
        .scroll((results.scroll, 0));
    f.render_widget(out, chunks[5]);

    let footer = Paragraph::new(Text::from(FOOTER))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(footer, chunks[6]);

    let cursor = match form.focus {
        Field::Source => Some((chunks[1], &form.source)),
        Field::Destination => Some((chunks[2], &form.destination)),
        Field::Date | Field::Button => None,
    };
    if let (Some((area, text)), false) = (cursor, busy) {
        f.set_cursor_position((cursor_x(area, text), area.y.saturating_add(1)));
    }
}

/// Column just past `text` inside a bordered box, pinned to the last inner cell.
fn cursor_x(area: Rect, text: &str) -> u16 {
    let width = u16::try_from(Line::raw(text).width()).unwrap_or(u16::MAX);
    let last = area.x.saturating_add(area.width.saturating_sub(2));
    area.x.saturating_add(1).saturating_add(width).min(last)
}

fn field_block(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default().borders(Borders::ALL).border_style(style).title(title)
}

fn text_input(f: &mut Frame, area: Rect, title: &str, value: &str, placeholder: &str, focused: bool) {
    let line = if value.is_empty() {
        Line::styled(placeholder.to_string(), Style::default().fg(Color::DarkGray))
    } else {
        Line::raw(value.to_string())
    };
    f.render_widget(Paragraph::new(line).block(field_block(title, focused)), area);
}

fn results_text(results: &Results) -> Text<'static> {
    let mut text = Text::default();

    if let Some(w) = &results.warning {
        text.lines.push(Line::styled(
            w.clone(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    }

    for (heading, body) in &results.sections {
        text.lines.push(Line::styled(heading.clone(), Style::default().add_modifier(Modifier::BOLD)));
        text.lines.push(Line::from(""));
        text.lines.extend(Text::from(body.clone()).lines);
        text.lines.push(Line::from(""));
    }

    if let Some(p) = &results.progress {
        text.lines.push(Line::styled(p.clone(), Style::default().add_modifier(Modifier::ITALIC)));
    }

    text
}
