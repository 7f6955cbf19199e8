// File: src/screen.rs
use crate::client::FetchError;
use crate::model::{DuckRecord, ImageKind, classify};
use log::{debug, info};

#[derive(Default, PartialEq, Eq, Clone, Copy, Debug)]
pub enum Mount {
    #[default]
    Uninitialized,
    Mounted,
    /// The initial fetch failed. Terminal for this screen instance.
    NeverMounted,
}

/// What the screen should look like right now.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Phase<'a> {
    Uninitialized,
    NeverMounted,
    Loading,
    Ready(&'a str),
    Failed { url: &'a str, reason: &'a str },
}

/// Handed out by `begin_refresh`; the matching completion must bring it back.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct RefreshTicket(u64);

#[derive(Default, Debug, Clone)]
pub struct ScreenState {
    pub current_image_url: Option<String>,
    pub is_loading: bool,
    pub mount: Mount,
    pub last_error: Option<String>,
    show_errors: bool,
    generation: u64,
}

impl ScreenState {
    pub fn new(show_errors: bool) -> Self {
        Self {
            show_errors,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> Phase<'_> {
        match self.mount {
            Mount::Uninitialized => Phase::Uninitialized,
            Mount::NeverMounted => Phase::NeverMounted,
            Mount::Mounted if self.is_loading => Phase::Loading,
            Mount::Mounted => {
                let url = self.current_image_url.as_deref().unwrap_or_default();
                match &self.last_error {
                    Some(reason) => Phase::Failed { url, reason },
                    None => Phase::Ready(url),
                }
            }
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mount == Mount::Mounted
    }

    pub fn image_kind(&self) -> Option<ImageKind> {
        classify(self.current_image_url.as_deref())
    }

    /// Applies the result of the very first fetch. Ignored once the screen
    /// has left `Uninitialized`.
    pub fn apply_initial(&mut self, result: Result<DuckRecord, FetchError>) {
        if self.mount != Mount::Uninitialized {
            debug!("Ignoring initial fetch result in {:?}", self.mount);
            return;
        }
        match result {
            Ok(duck) => {
                info!("Screen mounted with {}", duck.url);
                self.current_image_url = Some(duck.url);
                self.mount = Mount::Mounted;
            }
            Err(e) => {
                self.mount = Mount::NeverMounted;
                if self.show_errors {
                    self.last_error = Some(e.to_string());
                }
            }
        }
    }

    /// Flips `is_loading` on and returns a ticket, unless the screen is not
    /// mounted or a refresh is already running.
    pub fn begin_refresh(&mut self) -> Option<RefreshTicket> {
        if !self.is_mounted() {
            return None;
        }
        if self.is_loading {
            debug!("Refresh already in flight; ignoring press");
            return None;
        }
        self.generation += 1;
        self.is_loading = true;
        self.last_error = None;
        Some(RefreshTicket(self.generation))
    }

    /// Applies a refresh result. Returns false when the ticket is stale.
    pub fn finish_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<DuckRecord, FetchError>,
    ) -> bool {
        if !self.owns(ticket) {
            debug!("Dropping stale refresh result {:?}", ticket);
            return false;
        }
        self.is_loading = false;
        match result {
            Ok(duck) => self.current_image_url = Some(duck.url),
            Err(e) => {
                if self.show_errors {
                    self.last_error = Some(e.to_string());
                }
            }
        }
        true
    }

    /// The refresh was abandoned (scope cancelled); nothing changes but the flag.
    pub fn cancel_refresh(&mut self, ticket: RefreshTicket) -> bool {
        if !self.owns(ticket) {
            return false;
        }
        self.is_loading = false;
        true
    }

    pub fn dismiss_error(&mut self) {
        if self.is_mounted() {
            self.last_error = None;
        }
    }

    fn owns(&self, ticket: RefreshTicket) -> bool {
        self.is_loading && ticket.0 == self.generation
    }
}
