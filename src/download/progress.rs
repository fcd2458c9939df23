use std::sync::{
    Mutex,
    atomic::{AtomicU64, Ordering},
};

use colored::Colorize;
use std::time::Instant;

// Trait to homogenize the progress tracking, so the pack download is not tied to indicatif.
pub trait ProgressTracker: Send + Sync {
    fn begin(&self, total: usize);
    fn start(&self, position: usize, worker_id: usize);
    fn complete(&self, position: usize, bytes: u64);
    fn fail(&self, position: usize);
    fn finish(&self, msg: &str);
    fn abandon(&self, msg: &str);
}

/// Tracker that shows nothing, for `--quiet` runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressTracker for NoProgress {
    fn begin(&self, _total: usize) {}
    fn start(&self, _position: usize, _worker_id: usize) {}
    fn complete(&self, _position: usize, _bytes: u64) {}
    fn fail(&self, _position: usize) {}
    fn finish(&self, _msg: &str) {}
    fn abandon(&self, _msg: &str) {}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StickerState {
    Pending,
    Downloading { worker_id: usize },
    Completed,
    Failed,
}

/// Spinner with one cell per sticker of the pack.
pub struct StickerProgressBar {
    bar: indicatif::ProgressBar,
    stickers: Mutex<Vec<StickerState>>,
    bytes_downloaded: AtomicU64,
    start_time: Instant,
}

impl StickerProgressBar {
    pub fn new() -> Self {
        let bar = indicatif::ProgressBar::new_spinner();
        bar.enable_steady_tick(std::time::Duration::from_millis(100));
        Self::with_bar(bar)
    }

    fn with_bar(bar: indicatif::ProgressBar) -> Self {
        Self {
            bar,
            stickers: Mutex::new(Vec::new()),
            bytes_downloaded: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    fn set_state(&self, position: usize, state: StickerState) {
        if let Ok(mut stickers) = self.stickers.lock() {
            if position < stickers.len() {
                stickers[position] = state;
            }
        }
    }

    fn counts(&self) -> (usize, usize) {
        match self.stickers.lock() {
            Ok(stickers) => (
                stickers
                    .iter()
                    .filter(|s| **s == StickerState::Completed)
                    .count(),
                stickers.len(),
            ),
            Err(_) => (0, 0),
        }
    }

    fn render_stickers(&self) -> String {
        const DONE_CHAR: &str = "█";
        const WIP_CHAR: &str = "░";
        if let Ok(stickers) = self.stickers.lock() {
            let mut output = String::from("[");
            for sticker in stickers.iter() {
                let symbol = match sticker {
                    StickerState::Completed => DONE_CHAR.green(),
                    StickerState::Downloading { worker_id } => match worker_id % 3 {
                        0 => DONE_CHAR.yellow(),
                        1 => DONE_CHAR.cyan(),
                        _ => DONE_CHAR.magenta(),
                    },
                    StickerState::Pending => WIP_CHAR.bright_black(),
                    StickerState::Failed => DONE_CHAR.red(),
                };
                output.push_str(&symbol.to_string());
            }
            output.push(']');
            output
        } else {
            String::from("[?]")
        }
    }

    fn render(&self) {
        let downloaded = self.bytes_downloaded.load(Ordering::Relaxed);
        let elapsed = self.start_time.elapsed().as_secs().max(1);
        let (done, total) = self.counts();
        self.bar.set_message(format!(
            "{} {}/{} stickers, {} @ {}/s",
            self.render_stickers(),
            done,
            total,
            indicatif::HumanBytes(downloaded),
            indicatif::HumanBytes(downloaded / elapsed),
        ));
    }
}

impl Default for StickerProgressBar {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTracker for StickerProgressBar {
    fn begin(&self, total: usize) {
        if let Ok(mut stickers) = self.stickers.lock() {
            *stickers = vec![StickerState::Pending; total];
        }
        self.render();
    }

    fn start(&self, position: usize, worker_id: usize) {
        self.set_state(position, StickerState::Downloading { worker_id });
        self.render();
    }

    fn complete(&self, position: usize, bytes: u64) {
        self.bytes_downloaded.fetch_add(bytes, Ordering::Relaxed);
        self.set_state(position, StickerState::Completed);
        self.render();
    }

    fn fail(&self, position: usize) {
        self.set_state(position, StickerState::Failed);
        self.render();
    }

    fn finish(&self, msg: &str) {
        self.bar.finish_with_message(msg.to_string());
    }

    fn abandon(&self, msg: &str) {
        self.bar.abandon_with_message(msg.to_string());
    }
}
