use crate::orchestrator::{InitialOutcome, RefreshOutcome};
use crate::screen::{RefreshTicket, ScreenState};
use crate::tui::action::AppEvent;

pub struct AppState {
    pub screen: ScreenState,
    pub message: String,
    pub spinner: usize,
}

impl AppState {
    pub fn new(show_errors: bool) -> Self {
        Self {
            screen: ScreenState::new(show_errors),
            message: "Fetching a duck...".to_string(),
            spinner: 0,
        }
    }

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::Initial(InitialOutcome::Mounted(duck)) => {
                self.message = duck.message.clone().unwrap_or_default();
                self.screen.apply_initial(Ok(duck));
            }
            AppEvent::Initial(InitialOutcome::Failed(e)) => {
                self.message.clear();
                self.screen.apply_initial(Err(e));
            }
            AppEvent::Initial(InitialOutcome::Cancelled) => {}
            AppEvent::Refreshed(ticket, RefreshOutcome::Fetched(res)) => {
                if let Ok(duck) = &res
                    && let Some(m) = &duck.message
                {
                    self.message = m.clone();
                }
                self.screen.finish_refresh(ticket, res);
            }
            AppEvent::Refreshed(ticket, RefreshOutcome::Cancelled) => {
                self.screen.cancel_refresh(ticket);
            }
        }
    }

    pub fn begin_refresh(&mut self) -> Option<RefreshTicket> {
        self.screen.begin_refresh()
    }

    pub fn tick(&mut self) {
        self.spinner = self.spinner.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::FetchError;
    use crate::model::DuckRecord;
    use crate::screen::Phase;

    fn duck(url: &str, message: Option<&str>) -> DuckRecord {
        DuckRecord {
            url: url.to_string(),
            message: message.map(str::to_string),
        }
    }

    #[test]
    fn test_initial_then_refresh() {
        let mut state = AppState::new(false);
        state.apply(AppEvent::Initial(InitialOutcome::Mounted(duck(
            "a.gif",
            Some("Powered by random-d.uk"),
        ))));
        assert_eq!(state.screen.phase(), Phase::Ready("a.gif"));
        assert_eq!(state.message, "Powered by random-d.uk");

        let ticket = state.begin_refresh().unwrap();
        assert_eq!(state.begin_refresh(), None);
        state.apply(AppEvent::Refreshed(
            ticket,
            RefreshOutcome::Fetched(Ok(duck("b.jpg", None))),
        ));
        assert_eq!(state.screen.phase(), Phase::Ready("b.jpg"));
        assert_eq!(state.message, "Powered by random-d.uk");
    }

    #[test]
    fn test_refresh_error_is_silent() {
        let mut state = AppState::new(false);
        state.apply(AppEvent::Initial(InitialOutcome::Mounted(duck("a.jpg", None))));
        let ticket = state.begin_refresh().unwrap();
        state.apply(AppEvent::Refreshed(
            ticket,
            RefreshOutcome::Fetched(Err(FetchError::Transport("reset".into()))),
        ));
        assert_eq!(state.screen.phase(), Phase::Ready("a.jpg"));
    }

    #[test]
    fn test_cancelled_refresh_clears_loading() {
        let mut state = AppState::new(false);
        state.apply(AppEvent::Initial(InitialOutcome::Mounted(duck("a.jpg", None))));
        let ticket = state.begin_refresh().unwrap();
        state.apply(AppEvent::Refreshed(ticket, RefreshOutcome::Cancelled));
        assert!(!state.screen.is_loading);
    }
}
