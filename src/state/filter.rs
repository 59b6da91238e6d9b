use crate::episodes::Episode;
use chrono::{DateTime, TimeDelta, Utc};

/// Active search and date-window predicates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EpisodeFilter {
    pub search: String,
    pub date_window_days: Option<u32>,
}

impl EpisodeFilter {
    pub fn is_identity(&self) -> bool {
        self.search.trim().is_empty() && self.date_window_days.is_none()
    }

    /// Keep the episodes matching every active predicate, in their given order.
    pub fn apply<'a>(&self, episodes: &'a [Episode], now: DateTime<Utc>) -> Vec<&'a Episode> {
        let term = self.search.trim().to_lowercase();
        let cutoff = self.date_window_days.map(|days| window_start(now, days));

        episodes
            .iter()
            .filter(|ep| term.is_empty() || matches_term(ep, &term))
            .filter(|ep| match cutoff {
                Some(cutoff) => ep.published_at().is_some_and(|d| d >= cutoff),
                None => true,
            })
            .collect()
    }
}

/// Earliest date inside an N-day window. Windows reaching past chrono's
/// range keep every dated episode.
fn window_start(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    TimeDelta::try_days(i64::from(days))
        .and_then(|delta| now.checked_sub_signed(delta))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn matches_term(episode: &Episode, term: &str) -> bool {
    episode.title.to_lowercase().contains(term)
        || episode
            .summary()
            .is_some_and(|h| h.to_lowercase().contains(term))
}
