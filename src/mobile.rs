// File: ./src/mobile.rs
use crate::client::DuckClient;
use crate::config::Config;
use crate::model::ImageKind;
use crate::orchestrator::{FetchOrchestrator, InitialOutcome, Lifecycle, RefreshOutcome};
use crate::paths::AppPaths;
use crate::presenter::{self, Presentation, Viewport};
use crate::screen::{Phase, ScreenState};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Mutex as AsyncMutex;

#[cfg(target_os = "android")]
use android_logger::Config as LogConfig;
#[cfg(target_os = "android")]
use log::LevelFilter;

#[derive(Debug, uniffi::Error)]
#[uniffi(flat_error)]
pub enum MobileError {
    Generic(String),
}
impl From<String> for MobileError {
    fn from(e: String) -> Self {
        Self::Generic(e)
    }
}
impl From<anyhow::Error> for MobileError {
    fn from(e: anyhow::Error) -> Self {
        Self::Generic(format!("{:#}", e))
    }
}
impl std::fmt::Display for MobileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                MobileError::Generic(s) => s,
            }
        )
    }
}
impl std::error::Error for MobileError {}

// --- DTOs ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum MobilePhase {
    Uninitialized,
    NeverMounted,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum MobileImageKind {
    Animated,
    Static,
}

impl From<ImageKind> for MobileImageKind {
    fn from(kind: ImageKind) -> Self {
        match kind {
            ImageKind::Animated => MobileImageKind::Animated,
            ImageKind::Static => MobileImageKind::Static,
        }
    }
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct MobileScreen {
    pub phase: MobilePhase,
    pub image_url: Option<String>,
    pub image_kind: Option<MobileImageKind>,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct MobileConfig {
    pub api_url: String,
    pub image_size: u32,
    pub show_errors: bool,
}

impl From<Config> for MobileConfig {
    fn from(c: Config) -> Self {
        Self {
            api_url: c.api_url,
            image_size: c.image_size,
            show_errors: c.show_errors,
        }
    }
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct MobileFrame {
    /// RGBA8, row-major, `width * height * 4` bytes.
    pub pixels: Vec<u8>,
    pub delay_ms: u32,
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct MobileImage {
    pub width: u32,
    pub height: u32,
    pub frames: Vec<MobileFrame>,
}

fn screen_to_mobile(state: &ScreenState) -> MobileScreen {
    let phase = match state.phase() {
        Phase::Uninitialized => MobilePhase::Uninitialized,
        Phase::NeverMounted => MobilePhase::NeverMounted,
        Phase::Loading => MobilePhase::Loading,
        Phase::Ready(_) => MobilePhase::Ready,
        Phase::Failed { .. } => MobilePhase::Failed,
    };
    MobileScreen {
        phase,
        image_url: state.current_image_url.clone(),
        image_kind: state.image_kind().map(MobileImageKind::from),
        is_loading: state.is_loading,
        error: state.last_error.clone(),
    }
}

fn presentation_to_mobile(presentation: Presentation) -> Option<MobileImage> {
    let frames = match presentation {
        Presentation::Placeholder => return None,
        Presentation::Still(frame) => vec![frame],
        Presentation::Animation(anim) => anim.into_parts().0,
    };
    let (width, height) = frames.first().map(|f| (f.width, f.height))?;
    Some(MobileImage {
        width,
        height,
        frames: frames
            .into_iter()
            .map(|f| MobileFrame {
                delay_ms: f.delay.as_millis().min(u32::MAX as u128) as u32,
                pixels: Arc::unwrap_or_clone(f.pixels),
            })
            .collect(),
    })
}

#[uniffi::export]
pub fn classify_url(url: String) -> MobileImageKind {
    ImageKind::of(&url).into()
}

// --- MAIN OBJECT ---

#[derive(uniffi::Object)]
pub struct DuckMobile {
    client: Result<Arc<DuckClient>, String>,
    screen: Arc<AsyncMutex<ScreenState>>,
    lifecycle: Mutex<Lifecycle>,
    viewport: Viewport,
}

impl DuckMobile {
    fn from_config(config: &Config) -> Self {
        let client = DuckClient::new(&config.api_url).map(Arc::new);
        if let Err(e) = &client {
            log::error!("Cannot build duck client for {}: {}", config.api_url, e);
        }
        Self {
            client,
            screen: Arc::new(AsyncMutex::new(ScreenState::new(config.show_errors))),
            lifecycle: Mutex::new(Lifecycle::new()),
            viewport: Viewport::square(config.image_size),
        }
    }

    fn lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn orchestrator(&self) -> Result<FetchOrchestrator<DuckClient>, MobileError> {
        match &self.client {
            Ok(c) => Ok(FetchOrchestrator::new(Arc::clone(c))),
            Err(e) => Err(MobileError::from(e.clone())),
        }
    }
}

#[uniffi::export(async_runtime = "tokio")]
impl DuckMobile {
    /// Reads `config.toml` from the app's files directory, if any.
    #[uniffi::constructor]
    pub fn new(android_files_dir: String) -> Self {
        #[cfg(target_os = "android")]
        android_logger::init_once(
            LogConfig::default()
                .with_max_level(LevelFilter::Debug)
                .with_tag("RanduckRust"),
        );
        AppPaths::init_android_path(android_files_dir);
        let config = Config::load().unwrap_or_default();
        Self::from_config(&config)
    }

    #[uniffi::constructor]
    pub fn with_api_url(api_url: String, show_errors: bool) -> Self {
        Self::from_config(&Config {
            api_url,
            show_errors,
            ..Config::default()
        })
    }

    /// Initial fetch, bound to the visible window opened by this call.
    pub async fn start(&self) -> Result<MobileScreen, MobileError> {
        let orch = self.orchestrator()?;
        let scope = self.lifecycle().show();
        let outcome = orch.initial(scope).await;
        let mut screen = self.screen.lock().await;
        match outcome {
            InitialOutcome::Mounted(duck) => screen.apply_initial(Ok(duck)),
            InitialOutcome::Failed(e) => screen.apply_initial(Err(e)),
            InitialOutcome::Cancelled => {}
        }
        Ok(screen_to_mobile(&screen))
    }

    /// The "Get duck" button. A press while a refresh is running is ignored.
    pub async fn refresh(&self) -> Result<MobileScreen, MobileError> {
        let orch = self.orchestrator()?;
        let ticket = {
            let mut screen = self.screen.lock().await;
            match screen.begin_refresh() {
                Some(ticket) => ticket,
                None => return Ok(screen_to_mobile(&screen)),
            }
        };
        let scope = self.lifecycle().screen_scope();
        let outcome = orch.refresh(scope).await;
        let mut screen = self.screen.lock().await;
        match outcome {
            RefreshOutcome::Fetched(res) => {
                screen.finish_refresh(ticket, res);
            }
            RefreshOutcome::Cancelled => {
                screen.cancel_refresh(ticket);
            }
        }
        Ok(screen_to_mobile(&screen))
    }

    pub async fn screen(&self) -> MobileScreen {
        screen_to_mobile(&*self.screen.lock().await)
    }

    pub async fn dismiss_error(&self) -> MobileScreen {
        let mut screen = self.screen.lock().await;
        screen.dismiss_error();
        screen_to_mobile(&screen)
    }

    /// Downloads and decodes `url`, cropped to the configured square.
    /// `None` means "show the placeholder".
    pub async fn load_image(&self, url: String) -> Option<MobileImage> {
        let client = self.client.as_ref().ok()?;
        presentation_to_mobile(presenter::present(client.as_ref(), &url, self.viewport).await)
    }

    pub fn get_config(&self) -> MobileConfig {
        Config::load().unwrap_or_default().into()
    }

    /// Writes the settings screen back to `config.toml`. Takes effect the
    /// next time a `DuckMobile` is constructed.
    pub fn save_config(
        &self,
        api_url: String,
        image_size: u32,
        show_errors: bool,
    ) -> Result<(), MobileError> {
        DuckClient::new(&api_url).map_err(MobileError::from)?;
        let mut c = Config::load().unwrap_or_default();
        c.api_url = api_url;
        c.image_size = image_size;
        c.show_errors = show_errors;
        c.save().map_err(MobileError::from)
    }

    pub fn on_show(&self) {
        self.lifecycle().show();
    }

    pub fn on_hide(&self) {
        self.lifecycle().hide();
    }

    pub fn destroy(&self) {
        self.lifecycle().destroy();
    }
}
