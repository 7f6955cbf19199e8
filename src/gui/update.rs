// File: ./src/gui/update.rs
use crate::gui::message::Message;
use crate::gui::state::{GuiApp, ShownImage};
use crate::orchestrator::{InitialOutcome, RefreshOutcome};
use crate::presenter;
use iced::time::Instant;
use iced::{Task, window};
use log::debug;
use std::sync::Arc;

pub fn update(app: &mut GuiApp, message: Message) -> Task<Message> {
    match message {
        Message::InitialFetched(outcome) => {
            match outcome {
                InitialOutcome::Mounted(duck) => app.screen.apply_initial(Ok(duck)),
                InitialOutcome::Failed(e) => app.screen.apply_initial(Err(e)),
                InitialOutcome::Cancelled => {}
            }
            load_current_image(app)
        }

        Message::GetDuck => {
            let orch = app.orchestrator();
            let Some(ticket) = app.screen.begin_refresh() else {
                return Task::none();
            };
            let scope = app.lifecycle.screen_scope();
            Task::perform(async move { orch.refresh(scope).await }, move |outcome| {
                Message::Refreshed(ticket, outcome)
            })
        }

        Message::Refreshed(ticket, RefreshOutcome::Fetched(res)) => {
            if app.screen.finish_refresh(ticket, res) {
                load_current_image(app)
            } else {
                Task::none()
            }
        }
        Message::Refreshed(ticket, RefreshOutcome::Cancelled) => {
            app.screen.cancel_refresh(ticket);
            Task::none()
        }

        Message::ImageLoaded(url, presentation) => {
            if app.screen.current_image_url.as_deref() != Some(url.as_str()) {
                debug!("Discarding image for superseded URL {}", url);
                return Task::none();
            }
            app.shown = ShownImage::new(url, presentation, Instant::now());
            Task::none()
        }

        Message::Tick(now) => {
            if let Some(shown) = &mut app.shown {
                shown.advance(now);
            }
            Task::none()
        }

        Message::DismissError => {
            app.screen.dismiss_error();
            Task::none()
        }

        Message::CloseRequested(id) => {
            app.lifecycle.hide();
            app.lifecycle.destroy();
            window::close(id)
        }
    }
}

/// Starts downloading the current URL unless it is already on screen.
/// The previous duck is taken down right away; the placeholder shows until
/// the new pixels arrive.
fn load_current_image(app: &mut GuiApp) -> Task<Message> {
    let Some(url) = app.screen.current_image_url.clone() else {
        return Task::none();
    };
    if app.shown.as_ref().is_some_and(|s| s.url == url) {
        return Task::none();
    }
    app.shown = None;
    let client = Arc::clone(&app.client);
    let viewport = app.viewport;
    Task::perform(
        async move {
            let shown = presenter::present(client.as_ref(), &url, viewport).await;
            (url, shown)
        },
        |(url, shown)| Message::ImageLoaded(url, shown),
    )
}
