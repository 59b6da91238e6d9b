use regex::Regex;
use std::sync::OnceLock;

fn leading_dot_slash() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\./").expect("static regex"))
}

/// Resolve a media or transcript location.
///
/// A local path always wins and is returned verbatim. Otherwise the remote
/// path is joined to `base_url` with exactly one `/`. Empty strings count as
/// absent; with nothing to resolve the result is empty.
pub fn build_url(base_url: &str, path: Option<&str>, local_path: Option<&str>) -> String {
    if let Some(local) = local_path.filter(|p| !p.is_empty()) {
        return local.to_string();
    }

    let path = match path.filter(|p| !p.is_empty()) {
        Some(p) => p,
        None => return String::new(),
    };

    let clean_path = leading_dot_slash().replace(path, "");
    let clean_path = clean_path.trim_start_matches('/');
    let clean_base = base_url.trim_end_matches('/');

    format!("{}/{}", clean_base, clean_path)
}
