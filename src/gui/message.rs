use crate::orchestrator::{InitialOutcome, RefreshOutcome};
use crate::presenter::Presentation;
use crate::screen::RefreshTicket;
use iced::time::Instant;
use iced::window;

#[derive(Debug, Clone)]
pub enum Message {
    InitialFetched(InitialOutcome),
    GetDuck,
    Refreshed(RefreshTicket, RefreshOutcome),
    ImageLoaded(String, Presentation),
    Tick(Instant),
    DismissError,
    CloseRequested(window::Id),
}
