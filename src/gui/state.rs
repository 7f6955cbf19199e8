// File: ./src/gui/state.rs
use crate::client::DuckClient;
use crate::config::Config;
use crate::orchestrator::{FetchOrchestrator, Lifecycle};
use crate::presenter::{Frame, Presentation, Timeline, Viewport};
use crate::screen::ScreenState;
use iced::time::Instant;
use iced::widget::image;
use std::sync::Arc;
use std::time::Duration;

/// Decoded duck, converted to GPU-ready handles once. The decoded pixels
/// move into the handles; only the frame timing is kept beside them.
pub struct ShownImage {
    pub url: String,
    pub handles: Vec<image::Handle>,
    pub timeline: Option<Timeline>,
    pub started: Instant,
    pub current: usize,
}

fn to_handle(frame: Frame) -> image::Handle {
    image::Handle::from_rgba(frame.width, frame.height, Arc::unwrap_or_clone(frame.pixels))
}

impl ShownImage {
    /// `None` for a placeholder: nothing to draw.
    pub fn new(url: String, presentation: Presentation, now: Instant) -> Option<Self> {
        match presentation {
            Presentation::Placeholder => None,
            Presentation::Still(frame) => Some(Self {
                url,
                handles: vec![to_handle(frame)],
                timeline: None,
                started: now,
                current: 0,
            }),
            Presentation::Animation(anim) => {
                let (frames, timeline) = anim.into_parts();
                Some(Self {
                    url,
                    handles: frames.into_iter().map(to_handle).collect(),
                    timeline: Some(timeline),
                    started: now,
                    current: 0,
                })
            }
        }
    }

    /// Moves to the frame due at `now`. Returns true when it changed.
    pub fn advance(&mut self, now: Instant) -> bool {
        let Some(timeline) = &self.timeline else {
            return false;
        };
        let elapsed: Duration = now.saturating_duration_since(self.started);
        let next = timeline.index_at(elapsed);
        let changed = next != self.current;
        self.current = next;
        changed
    }

    pub fn handle(&self) -> Option<&image::Handle> {
        self.handles.get(self.current)
    }
}

pub struct GuiApp {
    pub screen: ScreenState,
    pub client: Arc<DuckClient>,
    pub lifecycle: Lifecycle,
    pub viewport: Viewport,
    pub shown: Option<ShownImage>,
}

impl GuiApp {
    pub fn with_client(config: &Config, client: DuckClient) -> Self {
        Self {
            screen: ScreenState::new(config.show_errors),
            client: Arc::new(client),
            lifecycle: Lifecycle::new(),
            viewport: Viewport::square(config.image_size),
            shown: None,
        }
    }

    pub fn orchestrator(&self) -> FetchOrchestrator<DuckClient> {
        FetchOrchestrator::new(Arc::clone(&self.client))
    }

    pub fn is_animating(&self) -> bool {
        !self.screen.is_loading
            && self
                .shown
                .as_ref()
                .is_some_and(|s| s.timeline.is_some())
    }
}
