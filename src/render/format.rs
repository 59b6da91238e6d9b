use crate::episodes::parse_episode_date;

/// Minutes assumed per episode when estimating total listening time.
const MINUTES_PER_EPISODE: usize = 15;

/// "March 1, 2024"; input that does not parse is shown as-is.
pub fn format_date(raw: &str) -> String {
    match parse_episode_date(raw) {
        Some(d) => d.format("%B %-d, %Y").to_string(),
        None => raw.to_string(),
    }
}

/// Human-readable byte count, base 1024, at most two decimals.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

/// Estimated total duration for `episode_count` episodes, as `Hh Mm`.
pub fn format_total_duration(episode_count: usize) -> String {
    let minutes = episode_count * MINUTES_PER_EPISODE;
    format!("{}h {}m", minutes / 60, minutes % 60)
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
