//! View binding: the only place page regions reach a presentation surface.

use crate::error::AppError;
use std::path::{Path, PathBuf};

/// Regions of the page the controller can update.
pub trait View {
    fn set_latest(&mut self, html: &str);
    fn set_episodes(&mut self, html: &str);
    fn set_load_more_visible(&mut self, visible: bool);
    fn set_stats(&mut self, html: &str);
    fn set_file_status(&mut self, html: &str);
    fn set_modal(&mut self, html: &str);

    /// Called once per render pass after the regions are updated.
    fn flush(&mut self) -> Result<(), AppError> {
        Ok(())
    }
}

/// In-memory page regions, composed into a full HTML document.
#[derive(Debug, Default, Clone)]
pub struct PageRegions {
    pub latest: String,
    pub episodes: String,
    pub load_more_visible: bool,
    pub stats: String,
    pub file_status: String,
    pub modal: String,
}

impl PageRegions {
    pub fn to_document(&self) -> String {
        let load_more_style = if self.load_more_visible { "block" } else { "none" };
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Podcast Shelf</title>
    <link rel="stylesheet" href="style.css">
</head>
<body>
    <header class="hero">
        <div id="stats">{stats}</div>
        <div id="file-status">{file_status}</div>
    </header>
    <main>
        <section id="latest-episode" class="latest-episode">{latest}</section>
        <section class="episodes">
            <div id="episodes-container">{episodes}</div>
            <button id="load-more-btn" class="btn btn-secondary" style="display: {load_more_style};">Load more</button>
        </section>
    </main>
    {modal}
</body>
</html>
"#,
            stats = self.stats,
            file_status = self.file_status,
            latest = self.latest,
            episodes = self.episodes,
            load_more_style = load_more_style,
            modal = self.modal,
        )
    }
}

/// Writes the composed document to disk on every flush.
pub struct HtmlPage {
    regions: PageRegions,
    output_path: PathBuf,
}

impl HtmlPage {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            regions: PageRegions::default(),
            output_path: output_path.into(),
        }
    }

    pub fn regions(&self) -> &PageRegions {
        &self.regions
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

impl View for HtmlPage {
    fn set_latest(&mut self, html: &str) {
        self.regions.latest = html.to_string();
    }

    fn set_episodes(&mut self, html: &str) {
        self.regions.episodes = html.to_string();
    }

    fn set_load_more_visible(&mut self, visible: bool) {
        self.regions.load_more_visible = visible;
    }

    fn set_stats(&mut self, html: &str) {
        self.regions.stats = html.to_string();
    }

    fn set_file_status(&mut self, html: &str) {
        self.regions.file_status = html.to_string();
    }

    fn set_modal(&mut self, html: &str) {
        self.regions.modal = html.to_string();
    }

    fn flush(&mut self) -> Result<(), AppError> {
        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Readers only ever see a complete page.
        let tmp_path = self.output_path.with_extension("html.tmp");
        std::fs::write(&tmp_path, self.regions.to_document())
            .map_err(|e| AppError::Io(format!("Failed to write {:?}: {}", tmp_path, e)))?;
        std::fs::rename(&tmp_path, &self.output_path)
            .map_err(|e| AppError::Io(format!("Failed to replace {:?}: {}", self.output_path, e)))?;

        log::debug!("Page written to {:?}", self.output_path);
        Ok(())
    }
}
