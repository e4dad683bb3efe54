use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use cantera_terminal::catalog::Catalog;
use cantera_terminal::form::{FormField, FormResult, FormState};
use cantera_terminal::report;

pub fn run(catalog: &Catalog, default_height_cm: u16) -> Result<()> {
    let mut state = FormState::new(catalog, default_height_cm);
    state.push_log(format!("[INFO] {} clubs loaded", catalog.len()));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_form(&mut terminal, &mut state, catalog);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_form<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &mut FormState,
    catalog: &Catalog,
) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    loop {
        terminal.draw(|f| ui(f, state))?;

        if event::poll(tick_rate)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            on_key(state, catalog, key);
        }

        if state.should_quit {
            return Ok(());
        }
    }
}

fn on_key(state: &mut FormState, catalog: &Catalog, key: KeyEvent) {
    if state.help_overlay {
        state.help_overlay = false;
        return;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => state.should_quit = true,
        KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => state.focus_next(),
        KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => state.focus_prev(),
        KeyCode::Char('l') | KeyCode::Right => state.change_value(catalog, 1),
        KeyCode::Char('h') | KeyCode::Left => state.change_value(catalog, -1),
        KeyCode::Char('r') => state.reset(catalog),
        KeyCode::Char('?') => state.help_overlay = true,
        KeyCode::Enter => state.calculate(catalog),
        _ => {}
    }
}

fn ui(frame: &mut Frame, state: &FormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text())
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    render_fields(frame, columns[0], state);

    let result = Paragraph::new(result_text(state))
        .block(Block::default().title("Result").borders(Borders::ALL));
    frame.render_widget(result, columns[1]);

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(
        "j/k/↑/↓ Field | h/l/←/→ Change | Enter Calculate | r Reset | ? Help | q Quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if state.help_overlay {
        let area = frame.size();
        render_help_overlay(frame, area);
    }
}

fn header_text() -> String {
    let line1 = "  .-.  CANTERA | probability of reaching LaLiga".to_string();
    let line2 = " /___\\".to_string();
    let line3 = "  |_|".to_string();
    format!("{line1}\n{line2}\n{line3}")
}

fn render_fields(frame: &mut Frame, area: Rect, state: &FormState) {
    let block = Block::default().title("Player").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let focused = state.focused();
    let mut lines: Vec<Line> = Vec::with_capacity(FormField::ALL.len());
    for field in FormField::ALL {
        let selected = field == focused;
        let style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        let prefix = if selected { "> " } else { "  " };
        let text = if field == FormField::Calculate {
            format!("{prefix}{}", field.label())
        } else {
            let value = state.value(field).unwrap_or_else(|| "(none)".to_string());
            format!("{prefix}{:<14} ◀ {value} ▶", field.label())
        };
        lines.push(Line::styled(text, style));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn result_text(state: &FormState) -> String {
    match &state.result {
        Some(FormResult::Report(r)) => {
            let mut lines = vec![
                format!("Club: {}", r.club.as_deref().unwrap_or("-")),
                format!(
                    "Age group: {}",
                    r.age_group.map(|g| g.label()).unwrap_or("-")
                ),
                String::new(),
            ];
            lines.extend(report::result_lines(r));
            lines.join("\n")
        }
        Some(FormResult::Message(msg)) => msg.clone(),
        None => "Press Enter on Calculate".to_string(),
    }
}

fn console_text(state: &FormState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    let start = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Cantera - Help",
        "",
        "  j/k or ↑/↓   Move between fields",
        "  h/l or ←/→   Change value (height ±0.01 m)",
        "  Enter        Calculate",
        "  r            Reset form",
        "  ?            Toggle help",
        "  q / Esc      Quit",
        "",
        "Changing category, division or zone resets the fields below it.",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
