use crate::orchestrator::{InitialOutcome, RefreshOutcome};
use crate::screen::RefreshTicket;
use crossterm::event::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Refresh(RefreshTicket),
    Quit,
}

#[derive(Debug)]
pub enum AppEvent {
    Initial(InitialOutcome),
    Refreshed(RefreshTicket, RefreshOutcome),
}

/// What a key press asks for, before any state is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyIntent {
    GetDuck,
    Dismiss,
    Quit,
}

pub fn intent_for(code: KeyCode) -> Option<KeyIntent> {
    match code {
        KeyCode::Char('g') | KeyCode::Char('r') | KeyCode::Enter => Some(KeyIntent::GetDuck),
        KeyCode::Char('d') => Some(KeyIntent::Dismiss),
        KeyCode::Char('q') | KeyCode::Esc => Some(KeyIntent::Quit),
        _ => None,
    }
}
