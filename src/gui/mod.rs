pub mod message;
pub mod state;
pub mod subscription;
pub mod update;
pub mod view;

use crate::client::DuckClient;
use crate::config::Config;

use anyhow::{Context, Result, anyhow};
use iced::{Element, Size, Subscription, Task, Theme, window};
use log::info;
use message::Message;
use state::GuiApp;

/// Builds the HTTP client for `config`. A failure here is fatal:
/// the window never opens and the process exits non-zero.
pub fn prepare(config: &Config) -> Result<DuckClient> {
    DuckClient::new(&config.api_url)
        .map_err(|e| anyhow!(e))
        .with_context(|| format!("building client for {}", config.api_url))
}

pub fn run() -> Result<()> {
    let config = Config::load().unwrap_or_else(|e| {
        info!("Using default config ({})", e);
        Config::default()
    });
    let client = prepare(&config)?;

    iced::application("Random duck", GuiApp::update, GuiApp::view)
        .subscription(GuiApp::subscription)
        .theme(GuiApp::theme)
        .window(window::Settings {
            size: Size::new(480.0, 560.0),
            // Close requests go through `Message::CloseRequested` so the
            // screen scopes are cancelled before the window goes away.
            exit_on_close_request: false,
            platform_specific: window::settings::PlatformSpecific {
                #[cfg(target_os = "linux")]
                application_id: String::from("randuck"),

                ..Default::default()
            },
            ..Default::default()
        })
        .run_with(move || GuiApp::new(&config, client))?;
    Ok(())
}

impl GuiApp {
    fn new(config: &Config, client: DuckClient) -> (Self, Task<Message>) {
        let mut app = Self::with_client(config, client);
        let task = app.start();
        (app, task)
    }

    /// Screen became visible: launch the initial fetch bound to visibility.
    pub fn start(&mut self) -> Task<Message> {
        let orch = self.orchestrator();
        let scope = self.lifecycle.show();
        Task::perform(
            async move { orch.initial(scope).await },
            Message::InitialFetched,
        )
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        update::update(self, message)
    }

    fn view(&self) -> Element<'_, Message> {
        view::root_view(self)
    }

    fn subscription(&self) -> Subscription<Message> {
        subscription::subscription(self)
    }

    fn theme(&self) -> Theme {
        Theme::Light
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_api_url_is_fatal() {
        let config = Config {
            api_url: "random-d.uk/api/v2/random".to_string(),
            ..Config::default()
        };
        let err = prepare(&config).unwrap_err();
        assert!(format!("{:#}", err).contains("random-d.uk/api/v2/random"));
    }

    #[test]
    fn test_default_config_starts() {
        assert!(prepare(&Config::default()).is_ok());
    }
}
