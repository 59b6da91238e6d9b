//! Markup for each region of the page.
//!
//! Every string that comes from the episode index is escaped before it is
//! placed in markup.

pub mod format;

use crate::episodes::{build_url, Episode, FileStatus};
use crate::modal::{LoadState, TranscriptModal};
use crate::state::{ListView, PageState};
use chrono::{DateTime, Local};
use format::{format_date, format_file_size, format_total_duration, html_escape};

const DEFAULT_HIGHLIGHT: &str =
    "The latest from the publishing world, with in-depth analysis from industry voices";
const DEFAULT_CARD_HIGHLIGHT: &str = "The latest from the publishing world";

/// Values for the stats panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stats {
    pub total_episodes: usize,
    pub total_duration: String,
    pub last_update: Option<String>,
    pub refreshed_at: Option<String>,
}

impl Stats {
    pub fn from_state(state: &PageState) -> Self {
        Self {
            total_episodes: state.episode_count(),
            total_duration: format_total_duration(state.episode_count()),
            last_update: state.episodes.first().map(|ep| format_date(&ep.date)),
            refreshed_at: state.last_refreshed.map(format_local_time),
        }
    }
}

fn format_local_time(at: DateTime<Local>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Resolved media locations for one episode.
struct EpisodeLinks {
    audio: String,
    transcript: String,
}

pub struct Renderer {
    base_url: String,
}

impl Renderer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn links(&self, episode: &Episode) -> EpisodeLinks {
        EpisodeLinks {
            audio: build_url(
                &self.base_url,
                episode.audio_path.as_deref(),
                episode.local_audio_path.as_deref(),
            ),
            transcript: build_url(
                &self.base_url,
                episode.transcript_path.as_deref(),
                episode.local_transcript_path.as_deref(),
            ),
        }
    }

    /// Resolved transcript URL, empty when the episode has none.
    pub fn transcript_url(&self, episode: &Episode) -> String {
        self.links(episode).transcript
    }

    pub fn latest_panel(&self, state: &PageState, view: &ListView<'_>) -> String {
        let latest = match view.displayed.first() {
            Some(ep) => *ep,
            None if state.episode_count() == 0 => {
                return "<p>No episodes yet</p>".to_string();
            }
            None => return "<p>No episodes match the current filters</p>".to_string(),
        };

        let links = self.links(latest);
        let audio = if links.audio.is_empty() {
            "<p class=\"audio-missing\">Audio is not available yet</p>".to_string()
        } else {
            self.audio_control(latest, &links.audio, state)
        };

        let mut actions = String::new();
        if !links.transcript.is_empty() {
            actions.push_str(&transcript_button(latest, &links.transcript, "📄 View transcript"));
        }
        if !links.audio.is_empty() {
            actions.push_str(&format!(
                r#"<a href="{}" class="btn btn-secondary download-btn" download>⬇️ Download audio</a>"#,
                html_escape(&links.audio)
            ));
        }

        format!(
            r#"<div class="episode-info{playing}">
    <h3 class="episode-title">{title}</h3>
    <p class="episode-date">📅 {date}</p>
    <p class="episode-description">{description}</p>
</div>
<div class="episode-controls">
    {audio}
    <div class="episode-actions">{actions}</div>
</div>"#,
            playing = playing_class(latest, state),
            title = html_escape(&latest.title),
            date = html_escape(&format_date(&latest.date)),
            description = html_escape(latest.summary().unwrap_or(DEFAULT_HIGHLIGHT)),
            audio = audio,
            actions = actions,
        )
    }

    /// Cards for every displayed episode after the one in the latest panel.
    pub fn episode_list(&self, state: &PageState, view: &ListView<'_>) -> String {
        if view.displayed.is_empty() {
            return r#"<div class="loading"><p>No matching episodes found</p></div>"#.to_string();
        }

        view.displayed
            .iter()
            .skip(1)
            .map(|ep| self.episode_card(ep, state))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn episode_card(&self, episode: &Episode, state: &PageState) -> String {
        let links = self.links(episode);

        let audio = if links.audio.is_empty() {
            "<p class=\"audio-missing\">Audio unavailable</p>".to_string()
        } else {
            self.audio_control(episode, &links.audio, state)
        };

        let transcript = if links.transcript.is_empty() {
            "<span class=\"transcript-missing\">No transcript</span>".to_string()
        } else {
            transcript_button(episode, &links.transcript, "📄 Transcript")
        };

        let download = if links.audio.is_empty() {
            String::new()
        } else {
            format!(
                r#"<a href="{}" class="btn btn-secondary" download>⬇️ Download</a>"#,
                html_escape(&links.audio)
            )
        };

        format!(
            r#"<div class="episode-item{playing}" data-episode-id="{id}">
    <h3 class="episode-title">{title}</h3>
    <p class="episode-date">📅 {date}</p>
    <p class="episode-description">{description}</p>
    <div class="episode-actions">
        {audio}
        <div class="episode-buttons">{transcript}{download}</div>
    </div>
</div>"#,
            playing = playing_class(episode, state),
            id = html_escape(&episode.id.to_string()),
            title = html_escape(&episode.title),
            date = html_escape(&format_date(&episode.date)),
            description = html_escape(episode.summary().unwrap_or(DEFAULT_CARD_HIGHLIGHT)),
            audio = audio,
            transcript = transcript,
            download = download,
        )
    }

    fn audio_control(&self, episode: &Episode, audio_url: &str, state: &PageState) -> String {
        let mut html = format!(
            r#"<audio controls class="audio-player" data-episode-id="{}">
        <source src="{}" type="audio/mpeg">
        Your browser does not support audio playback.
    </audio>"#,
            html_escape(&episode.id.to_string()),
            html_escape(audio_url)
        );
        if state.media_errors.contains(&episode.id) {
            html.push_str(
                r#"<div class="audio-error">Audio failed to load. Check your connection or try again later.</div>"#,
            );
        }
        html
    }

    pub fn loading(&self) -> String {
        r#"<div class="loading">
    <div class="spinner"></div>
    <p>Loading episodes...</p>
</div>"#
            .to_string()
    }

    pub fn error(&self, message: &str) -> String {
        format!(
            r#"<div class="loading">
    <p class="error-message">❌ Failed to load episodes: {}</p>
    <button class="btn btn-primary retry-btn" data-action="retry">Reload</button>
</div>"#,
            html_escape(message)
        )
    }

    pub fn stats(&self, stats: &Stats) -> String {
        format!(
            r#"<div class="stats">
    <span id="total-episodes">{}</span>
    <span id="total-duration">{}</span>
    <span id="last-update">{}</span>
    <span id="auto-update-time">{}</span>
</div>"#,
            stats.total_episodes,
            stats.total_duration,
            html_escape(stats.last_update.as_deref().unwrap_or("-")),
            html_escape(stats.refreshed_at.as_deref().unwrap_or("-")),
        )
    }

    pub fn file_status(&self, status: &FileStatus) -> String {
        format!(
            r#"<div class="file-status-info">
    <span>🎵 Local audio: {}</span>
    <span>📄 Local transcripts: {}</span>
    <span>💾 Total size: {}</span>
</div>"#,
            status.audio_files,
            status.transcript_files,
            format_file_size(status.total_size)
        )
    }

    pub fn modal(&self, modal: &TranscriptModal) -> String {
        if !modal.is_open() {
            return r#"<div id="transcript-modal" class="modal"></div>"#.to_string();
        }

        let mut classes = String::from("modal active");
        if modal.is_fullscreen() {
            classes.push_str(" fullscreen");
        }

        let body = match modal.load_state() {
            LoadState::Loading => r#"<div class="modal-loading">
            <div class="spinner"></div>
            <p>Loading transcript...</p>
        </div>"#
                .to_string(),
            LoadState::Ready => format!(
                r#"<iframe id="transcript-iframe" src="{}"></iframe>"#,
                html_escape(modal.frame_src().unwrap_or_default())
            ),
            LoadState::Error => r#"<div class="modal-loading modal-error">
            <p>❌ Transcript failed to load</p>
            <p>Check your network connection or try again later</p>
        </div>"#
                .to_string(),
            LoadState::Closed => String::new(),
        };

        format!(
            r#"<div id="transcript-modal" class="{}">
    <div class="modal-container">
        <div class="modal-header">
            <h2 class="modal-title">{}</h2>
            <button class="modal-btn" data-action="fullscreen"><span class="btn-icon">⛶</span></button>
            <button class="modal-btn" data-action="close">✕</button>
        </div>
        {}
    </div>
</div>"#,
            classes,
            html_escape(modal.title()),
            body
        )
    }
}

fn playing_class(episode: &Episode, state: &PageState) -> &'static str {
    if state.now_playing.as_ref() == Some(&episode.id) {
        " playing"
    } else {
        ""
    }
}

fn transcript_button(episode: &Episode, url: &str, label: &str) -> String {
    format!(
        r#"<button class="btn btn-primary transcript-btn" data-episode-id="{}" data-transcript-url="{}">{}</button>"#,
        html_escape(&episode.id.to_string()),
        html_escape(url),
        label
    )
}
