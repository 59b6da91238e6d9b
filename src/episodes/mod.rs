pub mod models;
pub mod urls;

pub use models::{parse_episode_date, Episode, EpisodeId, FileStatus, PodcastIndex};
pub use urls::build_url;

/// Sort newest first. Stable: equal dates keep their served order, and
/// episodes without a parseable date go last.
pub fn sort_by_date_desc(episodes: &mut [Episode]) {
    episodes.sort_by_cached_key(|ep| std::cmp::Reverse(ep.published_at()));
}
