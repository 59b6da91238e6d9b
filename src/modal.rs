//! Transcript overlay state machine.
//!
//! `open` starts a load generation and hands back a [`LoadTicket`]. Frame
//! signals carry the ticket so a load that was superseded by a later `open`
//! (or by `close`) is ignored instead of flipping the new state.

use crate::error::TranscriptLoadError;

const DEFAULT_TITLE: &str = "Transcript";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalStatus {
    Closed,
    Loading,
    Ready,
    Error,
    Fullscreen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Closed,
    Loading,
    Ready,
    Error,
}

/// Identifies one `open` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug, Default)]
pub struct TranscriptModal {
    load_state: LoadState,
    fullscreen: bool,
    frame_src: Option<String>,
    title: String,
    generation: u64,
    error: Option<TranscriptLoadError>,
}

impl TranscriptModal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the frame at `url` and show the spinner.
    ///
    /// Returns `None` without changing state when `url` is empty.
    pub fn open(&mut self, url: &str, title: &str) -> Option<LoadTicket> {
        if url.is_empty() {
            log::error!("Transcript link is empty, not opening modal");
            return None;
        }

        self.generation += 1;
        self.load_state = LoadState::Loading;
        self.frame_src = Some(url.to_string());
        self.title = if title.trim().is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            title.to_string()
        };
        self.error = None;

        log::info!("Opening transcript modal: {}", self.title);
        Some(LoadTicket(self.generation))
    }

    /// The frame reported `load`. Returns true when the caller should
    /// schedule [`reveal`](Self::reveal) after the display delay.
    pub fn frame_loaded(&self, ticket: LoadTicket) -> bool {
        self.is_current(ticket) && self.load_state == LoadState::Loading
    }

    /// Swap the spinner for the frame. Stale tickets are ignored.
    pub fn reveal(&mut self, ticket: LoadTicket) -> bool {
        if !self.frame_loaded(ticket) {
            return false;
        }
        self.load_state = LoadState::Ready;
        true
    }

    /// The frame reported `error`.
    pub fn frame_failed(&mut self, ticket: LoadTicket) -> Option<&TranscriptLoadError> {
        if !self.is_current(ticket) || self.load_state == LoadState::Closed {
            return None;
        }
        let url = self.frame_src.clone().unwrap_or_default();
        self.load_state = LoadState::Error;
        self.error = Some(TranscriptLoadError { url });
        self.error.as_ref()
    }

    /// Hide the overlay and drop the frame source.
    pub fn close(&mut self) {
        if self.load_state == LoadState::Closed {
            return;
        }
        // Bumping the generation invalidates any pending reveal.
        self.generation += 1;
        self.load_state = LoadState::Closed;
        self.fullscreen = false;
        self.frame_src = None;
        self.error = None;
        log::info!("Closed transcript modal");
    }

    /// Flip fullscreen while the overlay is open. Returns the new setting.
    pub fn toggle_fullscreen(&mut self) -> bool {
        if self.is_open() {
            self.fullscreen = !self.fullscreen;
            log::info!(
                "Transcript modal {} fullscreen",
                if self.fullscreen { "entered" } else { "left" }
            );
        }
        self.fullscreen
    }

    pub fn status(&self) -> ModalStatus {
        match self.load_state {
            LoadState::Closed => ModalStatus::Closed,
            _ if self.fullscreen => ModalStatus::Fullscreen,
            LoadState::Loading => ModalStatus::Loading,
            LoadState::Ready => ModalStatus::Ready,
            LoadState::Error => ModalStatus::Error,
        }
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn is_open(&self) -> bool {
        self.load_state != LoadState::Closed
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn frame_src(&self) -> Option<&str> {
        self.frame_src.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn current_ticket(&self) -> Option<LoadTicket> {
        self.is_open().then_some(LoadTicket(self.generation))
    }

    fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.generation
    }
}
