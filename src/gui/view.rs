// File: ./src/gui/view.rs
use crate::gui::message::Message;
use crate::gui::state::GuiApp;
use crate::screen::Phase;

use iced::widget::{Space, button, column, container, image, row, text};
use iced::{Alignment, ContentFit, Element, Length};

const SPACER_HEIGHT: f32 = 16.0;

pub fn root_view(app: &GuiApp) -> Element<'_, Message> {
    let content: Element<'_, Message> = match app.screen.phase() {
        // Not mounted yet, or never will be: the window stays blank unless
        // failures are meant to be seen.
        Phase::Uninitialized => Space::new(Length::Fill, Length::Fill).into(),
        Phase::NeverMounted => match &app.screen.last_error {
            Some(reason) => text(format!("No duck today: {}", reason)).into(),
            None => Space::new(Length::Fill, Length::Fill).into(),
        },
        Phase::Loading => text("Loading...").size(24).into(),
        Phase::Ready(_) => duck_block(app, None),
        Phase::Failed { reason, .. } => duck_block(app, Some(reason)),
    };

    container(content)
        .padding(16)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}

fn duck_block<'a>(app: &'a GuiApp, error: Option<&'a str>) -> Element<'a, Message> {
    let mut col = column![
        duck_image(app),
        Space::with_height(Length::Fixed(SPACER_HEIGHT)),
        button(text("Get duck")).on_press(Message::GetDuck),
    ]
    .align_x(Alignment::Center);

    if let Some(reason) = error {
        col = col.push(Space::with_height(Length::Fixed(SPACER_HEIGHT))).push(
            row![
                text(reason).size(14),
                button(text("Dismiss")).on_press(Message::DismissError),
            ]
            .spacing(8)
            .align_y(Alignment::Center),
        );
    }
    col.into()
}

fn duck_image(app: &GuiApp) -> Element<'_, Message> {
    let side = Length::Fixed(app.viewport.side as f32);
    match app.shown.as_ref().and_then(|s| s.handle()) {
        Some(handle) => image(handle.clone())
            .width(side)
            .height(side)
            .content_fit(ContentFit::Cover)
            .into(),
        None => container(Space::new(side, side))
            .style(container::rounded_box)
            .into(),
    }
}
