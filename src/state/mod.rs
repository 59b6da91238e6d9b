//! Page state container.
//!
//! All page data lives in one [`PageState`] value. Transitions go through
//! [`PageState::reduce`], which consumes the old state and returns the next;
//! filtering and pagination are derived from it on demand.

pub mod filter;
pub mod pagination;

use crate::episodes::{Episode, EpisodeId, FileStatus};
use crate::error::LoadError;
use chrono::{DateTime, Local, Utc};
use std::collections::HashSet;
use std::sync::Arc;

pub use filter::EpisodeFilter;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone)]
pub enum Action {
    LoadStarted,
    /// Replace the whole collection. Expects it already sorted.
    Loaded {
        episodes: Vec<Episode>,
        at: DateTime<Local>,
    },
    LoadFailed(LoadError),
    SearchChanged(String),
    DateWindowChanged(Option<u32>),
    /// Show one more page, if the filtered view has more at `now`.
    LoadMore { now: DateTime<Utc> },
    Play(EpisodeId),
    MediaFailed(EpisodeId),
    FileStatusUpdated(FileStatus),
    /// Back to a freshly opened page, keeping the loaded collection.
    Reset,
}

#[derive(Debug, Clone)]
pub struct PageState {
    pub episodes: Arc<Vec<Episode>>,
    pub filter: EpisodeFilter,
    pub page: usize,
    pub page_size: usize,
    pub phase: Phase,
    pub now_playing: Option<EpisodeId>,
    pub media_errors: HashSet<EpisodeId>,
    pub file_status: Option<FileStatus>,
    pub last_refreshed: Option<DateTime<Local>>,
}

/// What the list section shows for one render pass.
#[derive(Debug)]
pub struct ListView<'a> {
    pub displayed: Vec<&'a Episode>,
    pub filtered_count: usize,
    pub has_more: bool,
}

impl PageState {
    pub fn new(page_size: usize) -> Self {
        Self {
            episodes: Arc::new(Vec::new()),
            filter: EpisodeFilter::default(),
            page: 0,
            page_size: page_size.max(1),
            phase: Phase::Loading,
            now_playing: None,
            media_errors: HashSet::new(),
            file_status: None,
            last_refreshed: None,
        }
    }

    pub fn reduce(self, action: Action) -> Self {
        match action {
            Action::LoadStarted => Self {
                phase: Phase::Loading,
                ..self
            },
            Action::Loaded { episodes, at } => Self {
                episodes: Arc::new(episodes),
                phase: Phase::Ready,
                last_refreshed: Some(at),
                ..self
            },
            Action::LoadFailed(e) => Self {
                phase: Phase::Failed(e.to_string()),
                ..self
            },
            Action::SearchChanged(search) => Self {
                filter: EpisodeFilter {
                    search,
                    ..self.filter
                },
                page: 0,
                ..self
            },
            Action::DateWindowChanged(days) => Self {
                filter: EpisodeFilter {
                    date_window_days: days,
                    ..self.filter
                },
                page: 0,
                ..self
            },
            Action::LoadMore { now } => {
                if !self.list_view(now).has_more {
                    return self;
                }
                Self {
                    page: self.page.saturating_add(1),
                    ..self
                }
            }
            Action::Play(id) => Self {
                now_playing: Some(id),
                ..self
            },
            Action::MediaFailed(id) => {
                let mut media_errors = self.media_errors;
                media_errors.insert(id.clone());
                let now_playing = self.now_playing.filter(|playing| *playing != id);
                Self {
                    media_errors,
                    now_playing,
                    ..self
                }
            }
            Action::FileStatusUpdated(status) => Self {
                file_status: Some(status),
                ..self
            },
            Action::Reset => Self {
                filter: EpisodeFilter::default(),
                page: 0,
                now_playing: None,
                media_errors: HashSet::new(),
                ..self
            },
        }
    }

    pub fn episode_count(&self) -> usize {
        self.episodes.len()
    }

    pub fn find(&self, id: &EpisodeId) -> Option<&Episode> {
        self.episodes.iter().find(|ep| &ep.id == id)
    }

    pub fn filtered(&self, now: DateTime<Utc>) -> Vec<&Episode> {
        self.filter.apply(&self.episodes, now)
    }

    pub fn list_view(&self, now: DateTime<Utc>) -> ListView<'_> {
        let filtered = self.filtered(now);
        let displayed = pagination::visible_prefix(&filtered, self.page, self.page_size).to_vec();
        ListView {
            has_more: pagination::has_more(displayed.len(), filtered.len()),
            filtered_count: filtered.len(),
            displayed,
        }
    }
}
