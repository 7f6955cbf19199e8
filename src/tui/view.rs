use crate::model::ImageKind;
use crate::screen::Phase;
use crate::tui::state::AppState;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub fn draw(f: &mut Frame, state: &AppState) {
    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    let body = centered(v_chunks[0], 9);
    let lines = match state.screen.phase() {
        Phase::Uninitialized => vec![Line::from(state.message.as_str())],
        Phase::NeverMounted => match &state.screen.last_error {
            Some(reason) => vec![Line::styled(
                format!("No duck today: {}", reason),
                Style::default().fg(Color::Red),
            )],
            None => vec![],
        },
        Phase::Loading => vec![Line::from(format!(
            "{} Loading...",
            SPINNER[state.spinner % SPINNER.len()]
        ))],
        Phase::Ready(url) => duck_lines(state, url, None),
        Phase::Failed { url, reason } => duck_lines(state, url, Some(reason)),
    };

    let card = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Random duck "));
    f.render_widget(card, body);

    let hints = if state.screen.is_mounted() && !state.screen.is_loading {
        " [g] Get duck  [q] Quit "
    } else {
        " [q] Quit "
    };
    let footer = Paragraph::new(hints)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Actions "));
    f.render_widget(footer, v_chunks[1]);
}

fn duck_lines<'a>(state: &'a AppState, url: &'a str, error: Option<&'a str>) -> Vec<Line<'a>> {
    let kind = match ImageKind::of(url) {
        ImageKind::Animated => "animated",
        ImageKind::Static => "still",
    };
    let shown_url = if url.is_empty() { "(no picture)" } else { url };
    let mut lines = vec![
        Line::from(Span::styled(
            shown_url,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("({})", kind),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    if !state.message.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(state.message.as_str()));
    }
    if let Some(reason) = error {
        lines.push(Line::from(""));
        lines.push(Line::styled(
            format!("{}  [d] dismiss", reason),
            Style::default().fg(Color::Red),
        ));
    }
    lines
}

fn centered(area: Rect, height: u16) -> Rect {
    let pad = area.height.saturating_sub(height) / 2;
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(pad),
            Constraint::Length(height.min(area.height)),
            Constraint::Min(0),
        ])
        .split(area)[1]
}
