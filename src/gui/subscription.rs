// File: ./src/gui/subscription.rs
use crate::gui::message::Message;
use crate::gui::state::GuiApp;
use iced::{Subscription, time, window};
use std::time::Duration;

/// Roughly 60 redraws per second while an animation is on screen.
const FRAME_TICK: Duration = Duration::from_millis(16);

pub fn subscription(app: &GuiApp) -> Subscription<Message> {
    let mut subs = vec![window::close_requests().map(Message::CloseRequested)];

    if app.is_animating() {
        subs.push(time::every(FRAME_TICK).map(Message::Tick));
    }

    Subscription::batch(subs)
}
