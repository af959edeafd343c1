//! Terminal progress over the archives of a directory run.

use indicatif::{ProgressBar, ProgressStyle};
use sift_pipeline::{ArchiveStats, ProgressObserver};
use std::path::Path;
use std::time::Duration;

/// Drives an `indicatif` bar from pipeline progress events.
#[derive(Debug)]
pub(crate) struct BarObserver {
    bar: ProgressBar,
}

impl BarObserver {
    pub(crate) fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("valid template")
                .progress_chars("█▓░"),
        );
        Self { bar }
    }

    pub(crate) fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressObserver for BarObserver {
    fn directory_started(&self, total_archives: usize) {
        self.bar.set_length(total_archives as u64);
        self.bar.enable_steady_tick(Duration::from_millis(100));
    }

    fn archive_started(&self, archive: &Path) {
        let name = archive
            .file_name()
            .map_or_else(|| archive.display().to_string(), |n| n.to_string_lossy().into_owned());
        self.bar.set_message(name);
    }

    fn archive_finished(&self, stats: &ArchiveStats) {
        if stats.failed > 0 {
            self.bar.println(format!(
                "{}: {} failed",
                stats.archive_id, stats.failed
            ));
        }
        self.bar.inc(1);
    }
}
