use crate::episodes::EpisodeId;

/// User interactions the page reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Search box contents changed (debounced before it takes effect).
    Search(String),
    DateWindow(Option<u32>),
    LoadMore,
    OpenTranscript(EpisodeId),
    CloseModal,
    ToggleFullscreen,
    /// The transcript frame fired `load`.
    FrameLoaded,
    /// The transcript frame fired `error`.
    FrameFailed,
    Play(EpisodeId),
    MediaFailed(EpisodeId),
    /// Esc: close the modal if open, otherwise clear the search.
    Escape,
    Retry,
    Quit,
}

/// Parse one line of terminal input into an event.
///
/// `search` with no argument clears the search; `days all` clears the
/// date window. Keys are accepted by name (`esc`, `f11`).
pub fn parse_command(line: &str) -> Result<UiEvent, String> {
    let line = line.trim();
    let (cmd, arg) = match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    };

    let event = match cmd.to_lowercase().as_str() {
        "search" | "/" => UiEvent::Search(arg.to_string()),
        "days" => match arg {
            "" | "all" => UiEvent::DateWindow(None),
            n => UiEvent::DateWindow(Some(
                n.parse::<u32>()
                    .map_err(|_| format!("Invalid day count: {}", n))?,
            )),
        },
        "more" => UiEvent::LoadMore,
        "open" => UiEvent::OpenTranscript(require_id(cmd, arg)?),
        "close" => UiEvent::CloseModal,
        "fullscreen" | "f11" => UiEvent::ToggleFullscreen,
        "loaded" => UiEvent::FrameLoaded,
        "frame-error" => UiEvent::FrameFailed,
        "play" => UiEvent::Play(require_id(cmd, arg)?),
        "media-error" => UiEvent::MediaFailed(require_id(cmd, arg)?),
        "esc" | "escape" => UiEvent::Escape,
        "retry" | "reload" => UiEvent::Retry,
        "quit" | "exit" => UiEvent::Quit,
        "" => return Err("Empty command".to_string()),
        other => return Err(format!("Unknown command: {}", other)),
    };

    Ok(event)
}

fn require_id(cmd: &str, arg: &str) -> Result<EpisodeId, String> {
    if arg.is_empty() {
        return Err(format!("{} needs an episode id", cmd));
    }
    Ok(EpisodeId::from(arg))
}
