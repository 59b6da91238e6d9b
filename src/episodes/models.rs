use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Episode identifier as served by the index; numeric or textual.
///
/// Ids compare by their display form, so `7` and `"7"` name the same episode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EpisodeId {
    Number(i64),
    Text(String),
}

impl Default for EpisodeId {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl PartialEq for EpisodeId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Number(n), Self::Text(s)) | (Self::Text(s), Self::Number(n)) => {
                *s == n.to_string()
            }
        }
    }
}

impl Eq for EpisodeId {}

impl Hash for EpisodeId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Number(n) => n.to_string().hash(state),
            Self::Text(s) => s.hash(state),
        }
    }
}

impl std::fmt::Display for EpisodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for EpisodeId {
    fn from(s: &str) -> Self {
        match s.parse::<i64>() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::Text(s.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Episode {
    #[serde(default)]
    pub id: EpisodeId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub highlight: Option<String>,
    #[serde(default)]
    pub audio_path: Option<String>,
    #[serde(default)]
    pub local_audio_path: Option<String>,
    #[serde(default)]
    pub transcript_path: Option<String>,
    #[serde(default)]
    pub local_transcript_path: Option<String>,
}

impl Episode {
    /// Parsed publication time, if `date` is in a recognised ISO form.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        parse_episode_date(&self.date)
    }

    /// Highlight text, treating an empty string as absent.
    pub fn summary(&self) -> Option<&str> {
        self.highlight.as_deref().filter(|h| !h.is_empty())
    }
}

/// Parse the date formats the index is known to carry: RFC 3339,
/// a bare `YYYY-MM-DDTHH:MM:SS` (taken as UTC) and a plain `YYYY-MM-DD`.
pub fn parse_episode_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Body of `GET /api/podcasts`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PodcastIndex {
    #[serde(default)]
    pub podcasts: Option<Vec<Episode>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of `GET /api/files/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileStatus {
    #[serde(default)]
    pub audio_files: u64,
    #[serde(default)]
    pub transcript_files: u64,
    #[serde(default)]
    pub total_size: u64,
}
