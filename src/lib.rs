pub mod api;
pub mod config;
pub mod episodes;
pub mod error;
pub mod logging;
pub mod modal;
pub mod page;
pub mod render;
pub mod state;
pub mod view;

use anyhow::Context;
use api::ApiClient;
use config::Config;
use page::{parse_command, PageController, UiEvent};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use view::HtmlPage;

/// Load config, render the page and drive it from stdin until quit.
pub async fn run() -> anyhow::Result<()> {
    logging::init();

    let config = Config::load().context("Failed to load configuration")?;

    log::info!("🎧 Podcast shelf starting");
    log::info!("Data source: {}", config.endpoint_url(&config.data_source));

    let client = ApiClient::new(&config);
    let view = HtmlPage::new(config.output_path.clone());
    log::info!("Writing page to {:?}", view.output_path());
    let mut page = PageController::new(client, view, &config);

    let cancel = CancellationToken::new();
    let (tx, rx) = mpsc::channel(64);

    let input_cancel = cancel.clone();
    tokio::spawn(async move {
        read_commands(tx, input_cancel).await;
    });

    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Interrupt received, shutting down");
            signal_cancel.cancel();
        }
    });

    page.run(rx, cancel.clone()).await;
    cancel.cancel();

    log::info!("Podcast shelf stopped");
    Ok(())
}

/// Forward parsed stdin lines to the page. EOF ends the session.
async fn read_commands(tx: mpsc::Sender<UiEvent>, cancel: CancellationToken) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => match line {
                Ok(Some(line)) => match parse_command(&line) {
                    Ok(event) => {
                        if tx.send(event).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => log::warn!("{}", e),
                },
                Ok(None) => {
                    log::info!("Input closed");
                    cancel.cancel();
                    break;
                }
                Err(e) => {
                    log::error!("Failed to read input: {}", e);
                    cancel.cancel();
                    break;
                }
            },
        }
    }
}
