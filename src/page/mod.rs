//! Page controller: owns the state container and the transcript modal,
//! reacts to user events and timers, and pushes each render to a [`View`].

pub mod input;

#[cfg(test)]
mod tests;

use crate::api::EpisodeSource;
use crate::config::Config;
use crate::episodes::EpisodeId;
use crate::error::{LoadError, MediaError};
use crate::modal::{LoadTicket, TranscriptModal};
use crate::render::{Renderer, Stats};
use crate::state::{Action, PageState, Phase};
use crate::view::View;
use chrono::{Local, Utc};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

pub use input::{parse_command, UiEvent};

/// Timer settings the controller needs from [`Config`].
#[derive(Debug, Clone, Copy)]
pub struct Timings {
    pub refresh_interval: Duration,
    pub status_poll_interval: Duration,
    pub search_debounce: Duration,
    pub modal_reveal_delay: Duration,
}

impl From<&Config> for Timings {
    fn from(config: &Config) -> Self {
        Self {
            refresh_interval: config.refresh_interval(),
            status_poll_interval: config.status_poll_interval(),
            search_debounce: config.search_debounce(),
            modal_reveal_delay: config.modal_reveal_delay(),
        }
    }
}

pub struct PageController<S, V> {
    source: S,
    view: V,
    renderer: Renderer,
    state: PageState,
    modal: TranscriptModal,
    timings: Timings,
    page_size: usize,
    pending_search: Option<(String, Instant)>,
    reveal_tx: mpsc::UnboundedSender<LoadTicket>,
    reveal_rx: mpsc::UnboundedReceiver<LoadTicket>,
}

impl<S: EpisodeSource, V: View> PageController<S, V> {
    pub fn new(source: S, view: V, config: &Config) -> Self {
        let (reveal_tx, reveal_rx) = mpsc::unbounded_channel();
        Self {
            source,
            view,
            renderer: Renderer::new(config.base_url.clone()),
            state: PageState::new(config.episodes_per_page),
            modal: TranscriptModal::new(),
            timings: Timings::from(config),
            page_size: config.episodes_per_page,
            pending_search: None,
            reveal_tx,
            reveal_rx,
        }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn modal(&self) -> &TranscriptModal {
        &self.modal
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Drive the page until `Quit`, the event channel closes, or `cancel` fires.
    pub async fn run(&mut self, mut events: mpsc::Receiver<UiEvent>, cancel: CancellationToken) {
        if self.load().await.is_ok() {
            log::info!("Page initialized");
        }
        self.poll_file_status().await;

        let mut refresh = tokio::time::interval_at(
            Instant::now() + self.timings.refresh_interval,
            self.timings.refresh_interval,
        );
        refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut status = tokio::time::interval_at(
            Instant::now() + self.timings.status_poll_interval,
            self.timings.status_poll_interval,
        );
        status.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let search_deadline = self.pending_search.as_ref().map(|(_, at)| *at);

            tokio::select! {
                _ = cancel.cancelled() => {
                    log::info!("Page controller cancelled");
                    break;
                }
                event = events.recv() => match event {
                    Some(UiEvent::Quit) | None => {
                        log::info!("Page controller stopping");
                        break;
                    }
                    Some(event) => self.handle(event).await,
                },
                _ = refresh.tick() => self.auto_refresh().await,
                _ = status.tick() => self.poll_file_status().await,
                _ = wait_until(search_deadline) => self.apply_pending_search(),
                Some(ticket) = self.reveal_rx.recv() => {
                    if self.modal.reveal(ticket) {
                        self.render();
                    }
                }
            }
        }
    }

    /// Initial load, also used by the retry action.
    pub async fn load(&mut self) -> Result<(), LoadError> {
        self.dispatch(Action::LoadStarted);
        self.render();

        match self.source.fetch_episodes().await {
            Ok(episodes) => {
                self.dispatch(Action::Loaded {
                    episodes,
                    at: Local::now(),
                });
                self.render();
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load episodes: {}", e);
                self.dispatch(Action::LoadFailed(e.clone()));
                self.render();
                Err(e)
            }
        }
    }

    /// Periodic re-load. A larger collection reloads the whole page;
    /// failures leave the current page untouched.
    pub async fn auto_refresh(&mut self) {
        log::info!("Checking for episode updates...");
        let old_count = self.state.episode_count();

        match self.source.fetch_episodes().await {
            Ok(episodes) => {
                let grew = episodes.len() > old_count;
                self.dispatch(Action::Loaded {
                    episodes,
                    at: Local::now(),
                });
                if grew {
                    log::info!(
                        "Found {} new episodes, reloading page",
                        self.state.episode_count() - old_count
                    );
                    self.reload();
                } else {
                    self.render();
                }
            }
            Err(e) => log::warn!("Auto-refresh failed: {}", e),
        }
    }

    /// Status widget update. Failures are only logged.
    pub async fn poll_file_status(&mut self) {
        match self.source.fetch_file_status().await {
            Ok(status) => {
                self.dispatch(Action::FileStatusUpdated(status));
                self.render();
            }
            Err(e) => log::error!("Failed to fetch file status: {}", e),
        }
    }

    pub async fn handle(&mut self, event: UiEvent) {
        match event {
            UiEvent::Search(term) => {
                let deadline = Instant::now() + self.timings.search_debounce;
                self.pending_search = Some((term, deadline));
                return;
            }
            UiEvent::DateWindow(days) => self.dispatch(Action::DateWindowChanged(days)),
            UiEvent::LoadMore => self.dispatch(Action::LoadMore { now: Utc::now() }),
            UiEvent::OpenTranscript(id) => self.open_transcript(&id),
            UiEvent::CloseModal => self.modal.close(),
            UiEvent::ToggleFullscreen => {
                self.modal.toggle_fullscreen();
            }
            UiEvent::FrameLoaded => self.frame_loaded(),
            UiEvent::FrameFailed => {
                if let Some(ticket) = self.modal.current_ticket() {
                    if let Some(e) = self.modal.frame_failed(ticket) {
                        log::warn!("{}", e);
                    }
                }
            }
            UiEvent::Play(id) => {
                if self.state.find(&id).is_none() {
                    log::warn!("Play requested for unknown episode {}", id);
                    return;
                }
                self.dispatch(Action::Play(id));
            }
            UiEvent::MediaFailed(id) => {
                let e = MediaError {
                    episode_id: id.to_string(),
                };
                log::error!("{}", e);
                self.dispatch(Action::MediaFailed(id));
            }
            UiEvent::Escape => {
                if self.modal.is_open() {
                    self.modal.close();
                } else {
                    self.pending_search = None;
                    self.dispatch(Action::SearchChanged(String::new()));
                }
            }
            UiEvent::Retry => {
                let _ = self.load().await;
                return;
            }
            UiEvent::Quit => return,
        }
        self.render();
    }

    /// Apply a debounced search term now, if one is waiting.
    pub fn apply_pending_search(&mut self) {
        if let Some((term, _)) = self.pending_search.take() {
            log::debug!("Applying search: {:?}", term);
            self.dispatch(Action::SearchChanged(term));
            self.render();
        }
    }

    fn open_transcript(&mut self, id: &EpisodeId) {
        let (url, title) = match self.state.find(id) {
            Some(ep) => (self.renderer.transcript_url(ep), ep.title.clone()),
            None => {
                log::warn!("No episode with id {}", id);
                return;
            }
        };
        self.modal.open(&url, &title);
    }

    fn frame_loaded(&mut self) {
        let Some(ticket) = self.modal.current_ticket() else {
            return;
        };
        if !self.modal.frame_loaded(ticket) {
            return;
        }

        let delay = self.timings.modal_reveal_delay;
        let tx = self.reveal_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(ticket);
        });
    }

    /// Drain reveals that are already due. Used outside the run loop.
    pub fn process_due_reveals(&mut self) {
        let mut changed = false;
        while let Ok(ticket) = self.reveal_rx.try_recv() {
            changed |= self.modal.reveal(ticket);
        }
        if changed {
            self.render();
        }
    }

    /// Start over as if the page had just been opened, keeping the data.
    fn reload(&mut self) {
        self.pending_search = None;
        self.modal.close();
        self.dispatch(Action::Reset);
        self.render();
    }

    fn dispatch(&mut self, action: Action) {
        let state = std::mem::replace(&mut self.state, PageState::new(self.page_size));
        self.state = state.reduce(action);
    }

    fn render(&mut self) {
        match &self.state.phase {
            Phase::Loading => {
                self.view.set_episodes(&self.renderer.loading());
                self.view.set_load_more_visible(false);
            }
            Phase::Failed(message) => {
                self.view.set_latest("");
                self.view.set_episodes(&self.renderer.error(message));
                self.view.set_load_more_visible(false);
            }
            Phase::Ready => {
                let list = self.state.list_view(Utc::now());
                self.view
                    .set_latest(&self.renderer.latest_panel(&self.state, &list));
                self.view
                    .set_episodes(&self.renderer.episode_list(&self.state, &list));
                self.view.set_load_more_visible(list.has_more);
            }
        }

        self.view
            .set_stats(&self.renderer.stats(&Stats::from_state(&self.state)));
        if let Some(status) = &self.state.file_status {
            self.view.set_file_status(&self.renderer.file_status(status));
        }
        self.view.set_modal(&self.renderer.modal(&self.modal));

        if let Err(e) = self.view.flush() {
            log::error!("Failed to write page: {}", e);
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}
