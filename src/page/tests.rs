// Controller tests: canned episode source, real HtmlPage output.
// Run with: cargo test --lib page::tests

use super::*;
use crate::episodes::{Episode, FileStatus};
use crate::error::AppError;
use crate::modal::ModalStatus;
use crate::view::HtmlPage;
use std::collections::VecDeque;
use std::sync::Mutex;
use tempfile::TempDir;

struct FakeSource {
    loads: Mutex<VecDeque<Result<Vec<Episode>, LoadError>>>,
    status: Mutex<Option<Result<FileStatus, String>>>,
}

impl FakeSource {
    fn new(loads: Vec<Result<Vec<Episode>, LoadError>>) -> Self {
        Self {
            loads: Mutex::new(loads.into()),
            status: Mutex::new(None),
        }
    }

    fn with_status(self, status: Result<FileStatus, String>) -> Self {
        *self.status.lock().unwrap() = Some(status);
        self
    }
}

impl EpisodeSource for FakeSource {
    async fn fetch_episodes(&self) -> Result<Vec<Episode>, LoadError> {
        self.loads
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LoadError::Network("no more canned responses".into())))
    }

    async fn fetch_file_status(&self) -> Result<FileStatus, AppError> {
        match self.status.lock().unwrap().clone() {
            Some(Ok(status)) => Ok(status),
            Some(Err(e)) => Err(AppError::Other(e)),
            None => Err(AppError::Other("status endpoint offline".into())),
        }
    }
}

/// `n` episodes dated one per day back from today, newest first.
fn recent_episodes(n: usize) -> Vec<Episode> {
    let today = Utc::now().date_naive();
    (0..n)
        .map(|i| Episode {
            id: EpisodeId::Number(i as i64 + 1),
            title: format!("Episode {}", i + 1),
            date: (today - chrono::Duration::days(i as i64))
                .format("%Y-%m-%d")
                .to_string(),
            highlight: Some(format!("Highlight {}", i + 1)),
            audio_path: Some(format!("./ep{}.mp3", i + 1)),
            transcript_path: Some(format!("./ep{}.html", i + 1)),
            ..Default::default()
        })
        .collect()
}

fn test_config(temp: &TempDir) -> Config {
    Config {
        base_url: "https://host/pod".to_string(),
        search_debounce_ms: 20,
        modal_reveal_delay_ms: 20,
        output_path: temp.path().join("index.html"),
        ..Config::default()
    }
}

fn controller(
    temp: &TempDir,
    loads: Vec<Result<Vec<Episode>, LoadError>>,
) -> PageController<FakeSource, HtmlPage> {
    let config = test_config(temp);
    let view = HtmlPage::new(config.output_path.clone());
    PageController::new(FakeSource::new(loads), view, &config)
}

#[tokio::test]
async fn test_initial_load_renders_first_page() {
    let temp = TempDir::new().unwrap();
    let mut page = controller(&temp, vec![Ok(recent_episodes(10))]);

    page.load().await.unwrap();

    let regions = page.view().regions();
    assert!(regions.latest.contains("Episode 1"));
    assert_eq!(regions.episodes.matches("episode-item").count(), 5);
    assert!(regions.load_more_visible);
    assert!(regions.stats.contains("2h 30m"));

    let written = std::fs::read_to_string(temp.path().join("index.html")).unwrap();
    assert!(written.contains("Episode 1"));
}

#[tokio::test]
async fn test_load_failure_shows_retry_then_recovers() {
    let temp = TempDir::new().unwrap();
    let mut page = controller(
        &temp,
        vec![Err(LoadError::Status(503)), Ok(recent_episodes(2))],
    );

    assert_eq!(page.load().await, Err(LoadError::Status(503)));
    let regions = page.view().regions();
    assert!(regions.episodes.contains("HTTP error! status: 503"));
    assert!(regions.episodes.contains(r#"data-action="retry""#));
    assert!(!regions.load_more_visible);

    page.handle(UiEvent::Retry).await;
    assert_eq!(page.state().phase, Phase::Ready);
    assert!(page.view().regions().latest.contains("Episode 1"));
}

#[tokio::test]
async fn test_api_error_field_is_load_error() {
    let temp = TempDir::new().unwrap();
    let mut page = controller(&temp, vec![Err(LoadError::Api("upstream down".into()))]);
    assert!(page.load().await.is_err());
    assert!(page.view().regions().episodes.contains("upstream down"));
}

#[tokio::test]
async fn test_load_more_grows_list() {
    let temp = TempDir::new().unwrap();
    let mut page = controller(&temp, vec![Ok(recent_episodes(14))]);
    page.load().await.unwrap();

    page.handle(UiEvent::LoadMore).await;
    assert_eq!(page.state().page, 1);
    assert_eq!(page.view().regions().episodes.matches("episode-item").count(), 11);
    assert!(page.view().regions().load_more_visible);

    page.handle(UiEvent::LoadMore).await;
    assert_eq!(page.view().regions().episodes.matches("episode-item").count(), 13);
    assert!(!page.view().regions().load_more_visible);

    // Past the last page, "more" changes nothing.
    page.handle(UiEvent::LoadMore).await;
    page.handle(UiEvent::LoadMore).await;
    assert_eq!(page.state().page, 2);
}

#[tokio::test]
async fn test_search_is_debounced() {
    let temp = TempDir::new().unwrap();
    let mut page = controller(&temp, vec![Ok(recent_episodes(8))]);
    page.load().await.unwrap();
    page.handle(UiEvent::LoadMore).await;

    page.handle(UiEvent::Search("budget".to_string())).await;
    // Nothing changes until the debounce fires.
    assert!(page.state().filter.search.is_empty());
    assert_eq!(page.state().page, 1);

    page.apply_pending_search();
    assert_eq!(page.state().filter.search, "budget");
    assert_eq!(page.state().page, 0);
    let regions = page.view().regions();
    assert!(regions.episodes.contains("No matching episodes found"));
    assert!(!regions.load_more_visible);
}

#[tokio::test]
async fn test_date_window_filters_and_resets_page() {
    let temp = TempDir::new().unwrap();
    let mut page = controller(&temp, vec![Ok(recent_episodes(30))]);
    page.load().await.unwrap();
    page.handle(UiEvent::LoadMore).await;

    page.handle(UiEvent::DateWindow(Some(3))).await;
    assert_eq!(page.state().page, 0);
    let list = page.state().list_view(Utc::now());
    assert_eq!(list.filtered_count, 3);
    assert!(!page.view().regions().load_more_visible);
}

#[tokio::test]
async fn test_huge_date_window_keeps_every_dated_episode() {
    let temp = TempDir::new().unwrap();
    let mut page = controller(&temp, vec![Ok(recent_episodes(8))]);
    page.load().await.unwrap();

    let event = parse_command("days 4000000000").unwrap();
    page.handle(event).await;
    assert_eq!(page.state().filter.date_window_days, Some(4_000_000_000));
    assert_eq!(page.state().list_view(Utc::now()).filtered_count, 8);
    assert!(page.view().regions().load_more_visible);
}

#[tokio::test]
async fn test_escape_clears_search_when_modal_closed() {
    let temp = TempDir::new().unwrap();
    let mut page = controller(&temp, vec![Ok(recent_episodes(4))]);
    page.load().await.unwrap();

    page.handle(UiEvent::Search("Episode 2".to_string())).await;
    page.apply_pending_search();
    assert_eq!(page.state().list_view(Utc::now()).filtered_count, 1);

    page.handle(UiEvent::Escape).await;
    assert!(page.state().filter.search.is_empty());
    assert_eq!(page.state().list_view(Utc::now()).filtered_count, 4);
}

#[tokio::test]
async fn test_transcript_modal_flow() {
    let temp = TempDir::new().unwrap();
    let mut page = controller(&temp, vec![Ok(recent_episodes(3))]);
    page.load().await.unwrap();

    page.handle(UiEvent::OpenTranscript(EpisodeId::Number(2))).await;
    assert_eq!(page.modal().status(), ModalStatus::Loading);
    assert_eq!(page.modal().frame_src(), Some("https://host/pod/ep2.html"));
    assert_eq!(page.modal().title(), "Episode 2");
    assert!(page.view().regions().modal.contains("modal-loading"));

    page.handle(UiEvent::FrameLoaded).await;
    assert_eq!(page.modal().status(), ModalStatus::Loading);

    tokio::time::sleep(Duration::from_millis(80)).await;
    page.process_due_reveals();
    assert_eq!(page.modal().status(), ModalStatus::Ready);
    assert!(page.view().regions().modal.contains("<iframe"));

    page.handle(UiEvent::ToggleFullscreen).await;
    assert_eq!(page.modal().status(), ModalStatus::Fullscreen);

    // Esc closes the modal and leaves the search alone.
    page.handle(UiEvent::Escape).await;
    assert_eq!(page.modal().status(), ModalStatus::Closed);
    assert_eq!(page.modal().frame_src(), None);
}

#[tokio::test]
async fn test_transcript_frame_error() {
    let temp = TempDir::new().unwrap();
    let mut page = controller(&temp, vec![Ok(recent_episodes(1))]);
    page.load().await.unwrap();

    page.handle(UiEvent::OpenTranscript(EpisodeId::Number(1))).await;
    page.handle(UiEvent::FrameFailed).await;
    assert_eq!(page.modal().status(), ModalStatus::Error);
    assert!(page.view().regions().modal.contains("Transcript failed to load"));
    // The rest of the page is untouched.
    assert!(page.view().regions().latest.contains("Episode 1"));
}

#[tokio::test]
async fn test_open_without_transcript_keeps_modal_closed() {
    let temp = TempDir::new().unwrap();
    let mut episodes = recent_episodes(2);
    episodes[1].transcript_path = None;
    let mut page = controller(&temp, vec![Ok(episodes)]);
    page.load().await.unwrap();

    page.handle(UiEvent::OpenTranscript(EpisodeId::Number(2))).await;
    assert_eq!(page.modal().status(), ModalStatus::Closed);

    page.handle(UiEvent::OpenTranscript(EpisodeId::Number(99))).await;
    assert_eq!(page.modal().status(), ModalStatus::Closed);
}

#[tokio::test]
async fn test_media_failure_is_inline_and_non_fatal() {
    let temp = TempDir::new().unwrap();
    let mut page = controller(&temp, vec![Ok(recent_episodes(3))]);
    page.load().await.unwrap();

    page.handle(UiEvent::Play(EpisodeId::Number(2))).await;
    page.handle(UiEvent::MediaFailed(EpisodeId::Number(2))).await;

    let regions = page.view().regions();
    assert_eq!(regions.episodes.matches("audio-error").count(), 1);
    assert_eq!(page.state().phase, Phase::Ready);
    assert_eq!(page.state().now_playing, None);
}

#[tokio::test]
async fn test_commands_find_episodes_with_numeric_string_ids() {
    let temp = TempDir::new().unwrap();
    let mut episodes = recent_episodes(3);
    for ep in &mut episodes {
        ep.id = EpisodeId::Text(ep.id.to_string());
    }
    let mut page = controller(&temp, vec![Ok(episodes)]);
    page.load().await.unwrap();

    page.handle(parse_command("play 2").unwrap()).await;
    assert_eq!(page.state().now_playing, Some(EpisodeId::Text("2".to_string())));

    page.handle(parse_command("media-error 2").unwrap()).await;
    assert_eq!(page.view().regions().episodes.matches("audio-error").count(), 1);

    page.handle(parse_command("open 2").unwrap()).await;
    assert_eq!(page.modal().status(), ModalStatus::Loading);
    assert_eq!(page.modal().title(), "Episode 2");
}

#[tokio::test]
async fn test_refresh_with_new_episodes_reloads_page() {
    let temp = TempDir::new().unwrap();
    let mut page = controller(&temp, vec![Ok(recent_episodes(3)), Ok(recent_episodes(5))]);
    page.load().await.unwrap();

    page.handle(UiEvent::DateWindow(Some(1))).await;
    page.handle(UiEvent::OpenTranscript(EpisodeId::Number(1))).await;

    page.auto_refresh().await;
    assert_eq!(page.state().episode_count(), 5);
    assert!(page.state().filter.is_identity());
    assert_eq!(page.modal().status(), ModalStatus::Closed);
    assert!(page.view().regions().stats.contains(">5<"));
}

#[tokio::test]
async fn test_refresh_without_growth_keeps_inputs() {
    let temp = TempDir::new().unwrap();
    let mut page = controller(&temp, vec![Ok(recent_episodes(3)), Ok(recent_episodes(3))]);
    page.load().await.unwrap();
    page.handle(UiEvent::DateWindow(Some(1))).await;

    page.auto_refresh().await;
    assert_eq!(page.state().filter.date_window_days, Some(1));
    assert_eq!(page.state().episode_count(), 3);
}

#[tokio::test]
async fn test_refresh_failure_is_swallowed() {
    let temp = TempDir::new().unwrap();
    let mut page = controller(&temp, vec![Ok(recent_episodes(3))]);
    page.load().await.unwrap();

    page.auto_refresh().await;
    assert_eq!(page.state().phase, Phase::Ready);
    assert_eq!(page.state().episode_count(), 3);
}

#[tokio::test]
async fn test_file_status_widget() {
    let temp = TempDir::new().unwrap();
    let config = test_config(&temp);
    let source = FakeSource::new(vec![Ok(recent_episodes(1))]).with_status(Ok(FileStatus {
        audio_files: 3,
        transcript_files: 2,
        total_size: 1_048_576,
    }));
    let mut page = PageController::new(source, HtmlPage::new(config.output_path.clone()), &config);

    page.poll_file_status().await;
    let widget = &page.view().regions().file_status;
    assert!(widget.contains("Local audio: 3"));
    assert!(widget.contains("1 MB"));
}

#[tokio::test]
async fn test_file_status_failure_is_silent() {
    let temp = TempDir::new().unwrap();
    let mut page = controller(&temp, vec![Ok(recent_episodes(1))]);
    page.load().await.unwrap();

    page.poll_file_status().await;
    assert!(page.view().regions().file_status.is_empty());
    assert_eq!(page.state().phase, Phase::Ready);
}

#[tokio::test]
async fn test_run_loop_applies_debounced_search_and_quits() {
    let temp = TempDir::new().unwrap();
    let mut page = controller(&temp, vec![Ok(recent_episodes(8))]);
    let (tx, rx) = mpsc::channel(16);
    let cancel = CancellationToken::new();

    let driver = async {
        tx.send(UiEvent::Search("episode 7".to_string())).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        tx.send(UiEvent::Quit).await.unwrap();
    };
    tokio::join!(page.run(rx, cancel), driver);

    assert_eq!(page.state().filter.search, "episode 7");
    assert_eq!(page.state().list_view(Utc::now()).filtered_count, 1);
    assert!(page.view().regions().latest.contains("Episode 7"));
}

#[tokio::test]
async fn test_run_loop_stops_on_cancel() {
    let temp = TempDir::new().unwrap();
    let mut page = controller(&temp, vec![Ok(recent_episodes(2))]);
    let (_tx, rx) = mpsc::channel(1);
    let cancel = CancellationToken::new();
    cancel.cancel();

    page.run(rx, cancel).await;
    assert_eq!(page.state().episode_count(), 2);
}
